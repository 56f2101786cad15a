// ── File-backed settings store ──
//
// The mutable settings document is a TOML file. It is read on every access
// so an operator's edit shows up on the next dashboard request. A missing
// file reads as an empty document.
//
//   DEMO_MODE = "false"
//
//   [servicenow]
//   enabled = true
//   instanceUrl = "https://acme.service-now.com"
//
//   [[vendors]]
//   id = "github"
//   name = "GitHub"
//   url = "https://www.githubstatus.com"

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;

use aegis_core::{ConfigStore, StoreError};

#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<toml::Table, StoreError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(toml::Table::new()),
            Err(e) => {
                return Err(StoreError::Unavailable(format!(
                    "{}: {e}",
                    self.path.display()
                )));
            }
        };
        text.parse::<toml::Table>().map_err(|e| {
            StoreError::Unavailable(format!("{} is not valid TOML: {e}", self.path.display()))
        })
    }
}

impl ConfigStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self.read()?.remove(key) {
            None => Ok(None),
            Some(toml::Value::String(value)) => Ok(Some(value)),
            Some(_) => Err(StoreError::NotAString { key: key.to_owned() }),
        }
    }

    fn document(&self, key: &str) -> Result<Option<Value>, StoreError> {
        self.read()?
            .remove(key)
            .map(|value| {
                serde_json::to_value(value).map_err(|e| StoreError::Malformed {
                    key: key.to_owned(),
                    message: e.to_string(),
                })
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn store_with(contents: &str) -> (tempfile::TempDir, FileStore) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, contents).unwrap();
        (dir, FileStore::new(path))
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("absent.toml"));
        assert_eq!(store.get("DEMO_MODE").unwrap(), None);
        assert_eq!(store.document("servicenow").unwrap(), None);
    }

    #[test]
    fn string_keys_and_documents() {
        let (_dir, store) = store_with(
            r#"
                DEMO_MODE = "true"
                ENABLE_MANAGEMENT = true

                [servicenow]
                enabled = true
                instanceUrl = "https://acme.service-now.com"
                historyDays = 3

                [[vendors]]
                id = "gh"
                name = "GitHub"
                url = "https://www.githubstatus.com"
            "#,
        );

        assert_eq!(store.get("DEMO_MODE").unwrap().as_deref(), Some("true"));
        assert!(matches!(
            store.get("ENABLE_MANAGEMENT"),
            Err(StoreError::NotAString { .. })
        ));
        assert_eq!(
            store.document("servicenow").unwrap(),
            Some(json!({
                "enabled": true,
                "instanceUrl": "https://acme.service-now.com",
                "historyDays": 3
            }))
        );
        assert_eq!(
            store.document("vendors").unwrap(),
            Some(json!([{ "id": "gh", "name": "GitHub", "url": "https://www.githubstatus.com" }]))
        );
    }

    #[test]
    fn edits_apply_on_next_read() {
        let (_dir, store) = store_with("DEMO_MODE = \"false\"\n");
        assert_eq!(store.get("DEMO_MODE").unwrap().as_deref(), Some("false"));

        std::fs::write(store.path(), "DEMO_MODE = \"true\"\n").unwrap();
        assert_eq!(store.get("DEMO_MODE").unwrap().as_deref(), Some("true"));
    }

    #[test]
    fn invalid_toml_is_unavailable() {
        let (_dir, store) = store_with("this is = = not toml");
        assert!(matches!(store.get("DEMO_MODE"), Err(StoreError::Unavailable(_))));
    }
}
