// ── Feature flags and deployment settings ──
//
// Every setting is read from the mutable store first and falls back to the
// static value the process was deployed with. Resolution never fails: a
// store error is logged and treated like a missing key.

use std::sync::Arc;

use tracing::warn;

use crate::store::ConfigStore;

pub const DEMO_MODE: &str = "DEMO_MODE";
pub const ENABLE_MANAGEMENT: &str = "ENABLE_MANAGEMENT";
pub const SOLARWINDS_UI_BASE: &str = "SOLARWINDS_UI_BASE";
pub const SOLARWINDS_EXCLUDE_CAPTIONS: &str = "SOLARWINDS_EXCLUDE_CAPTIONS";

/// Static fallbacks, fixed for the lifetime of the process.
#[derive(Debug, Clone, Default)]
pub struct StaticSettings {
    pub demo_mode: Option<String>,
    pub enable_management: Option<String>,
    pub solarwinds_ui_base: Option<String>,
    pub solarwinds_exclude_captions: Option<String>,
}

impl StaticSettings {
    /// Look up the static value for a store key.
    pub fn get(&self, key: &str) -> Option<&str> {
        match key {
            DEMO_MODE => self.demo_mode.as_deref(),
            ENABLE_MANAGEMENT => self.enable_management.as_deref(),
            SOLARWINDS_UI_BASE => self.solarwinds_ui_base.as_deref(),
            SOLARWINDS_EXCLUDE_CAPTIONS => self.solarwinds_exclude_captions.as_deref(),
            _ => None,
        }
    }
}

/// Resolves typed settings: store first, static fallback second.
#[derive(Clone)]
pub struct ConfigResolver {
    store: Arc<dyn ConfigStore>,
    statics: StaticSettings,
}

impl ConfigResolver {
    pub fn new(store: Arc<dyn ConfigStore>, statics: StaticSettings) -> Self {
        Self { store, statics }
    }

    pub fn store(&self) -> &Arc<dyn ConfigStore> {
        &self.store
    }

    fn lookup(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "settings read failed, using static fallback");
                None
            }
        }
    }

    /// Boolean setting. `fallback` is used when the store has no usable
    /// value; the result is `false` when neither yields a recognised flag.
    pub fn get_bool(&self, key: &str, fallback: Option<&str>) -> bool {
        let raw = self.lookup(key);
        parse_flag(raw.as_deref().or(fallback).unwrap_or_default())
    }

    /// String setting, empty when neither the store nor `fallback` has it.
    pub fn get_string(&self, key: &str, fallback: Option<&str>) -> String {
        self.lookup(key)
            .or_else(|| fallback.map(str::to_owned))
            .unwrap_or_default()
    }

    // ── Named settings ───────────────────────────────────────────────

    pub fn demo_mode(&self) -> bool {
        self.get_bool(DEMO_MODE, self.statics.get(DEMO_MODE))
    }

    pub fn management_enabled(&self) -> bool {
        self.get_bool(ENABLE_MANAGEMENT, self.statics.get(ENABLE_MANAGEMENT))
    }

    /// Base URL that alert detail links are rewritten onto, if configured.
    pub fn solarwinds_ui_base(&self) -> Option<String> {
        let raw = self.get_string(SOLARWINDS_UI_BASE, self.statics.get(SOLARWINDS_UI_BASE));
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_owned())
    }

    /// Lower-cased alert captions to hide.
    pub fn excluded_captions(&self) -> Vec<String> {
        let raw = self.get_string(
            SOLARWINDS_EXCLUDE_CAPTIONS,
            self.statics.get(SOLARWINDS_EXCLUDE_CAPTIONS),
        );
        csv_list(&raw)
            .into_iter()
            .map(|caption| caption.to_lowercase())
            .collect()
    }
}

/// `true`, `1`, `yes`, `on` (any case, surrounding whitespace ignored).
pub fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

/// Comma-separated list, trimmed, empties dropped.
pub fn csv_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::store::{MemoryStore, StoreError};

    struct BrokenStore;

    impl ConfigStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Unavailable("connection reset".into()))
        }

        fn document(&self, _key: &str) -> Result<Option<Value>, StoreError> {
            Err(StoreError::Unavailable("connection reset".into()))
        }
    }

    fn resolver(store: Arc<dyn ConfigStore>, demo: Option<&str>) -> ConfigResolver {
        ConfigResolver::new(
            store,
            StaticSettings {
                demo_mode: demo.map(str::to_owned),
                ..StaticSettings::default()
            },
        )
    }

    #[test]
    fn flag_parsing_is_lenient() {
        for on in ["true", "TRUE", " 1 ", "yes", "On"] {
            assert!(parse_flag(on), "{on:?} should be on");
        }
        for off in ["", "false", "0", "no", "enabled", "y"] {
            assert!(!parse_flag(off), "{off:?} should be off");
        }
    }

    #[test]
    fn store_value_wins_over_static() {
        let store = Arc::new(MemoryStore::new());
        store.set(DEMO_MODE, "false");
        assert!(!resolver(store, Some("true")).demo_mode());
    }

    #[test]
    fn missing_key_uses_static() {
        let store = Arc::new(MemoryStore::new());
        assert!(resolver(store, Some("yes")).demo_mode());
    }

    #[test]
    fn store_outage_uses_static() {
        assert!(resolver(Arc::new(BrokenStore), Some("on")).demo_mode());
        assert!(!resolver(Arc::new(BrokenStore), None).demo_mode());
    }

    #[test]
    fn non_string_value_uses_static() {
        let store = Arc::new(MemoryStore::new());
        store.set(DEMO_MODE, json!(true));
        assert!(!resolver(store, None).demo_mode());
    }

    #[test]
    fn excluded_captions_are_trimmed_and_lowered() {
        let store = Arc::new(MemoryStore::new());
        store.set(SOLARWINDS_EXCLUDE_CAPTIONS, " Test Node , ,LAB-");
        assert_eq!(
            resolver(store, None).excluded_captions(),
            vec!["test node".to_owned(), "lab-".to_owned()]
        );
    }

    #[test]
    fn blank_ui_base_is_none() {
        let store = Arc::new(MemoryStore::new());
        store.set(SOLARWINDS_UI_BASE, "   ");
        assert_eq!(resolver(store, None).solarwinds_ui_base(), None);
    }
}
