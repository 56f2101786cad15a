// ── Property resolution over untyped upstream records ──
//
// Upstream rows are arbitrary JSON; the field to read comes from
// configuration as a dotted path. This is the one place untyped values are
// turned into text. Nothing here panics: missing or null segments resolve
// to `Absent`.

use serde_json::{Map, Value};

/// Keys tried, in order, when a reference field comes back as an object.
const REFERENCE_KEYS: [&str; 3] = ["display_value", "name", "value"];

/// The value found at a configured path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Absent,
    /// A scalar rendered to text.
    Text(String),
    /// A reference object collapsed to its label.
    Reference(String),
    /// An unexpected shape, serialized as JSON.
    Opaque(String),
}

impl FieldValue {
    /// Resolve `path` against `record`, collapsing reference objects to
    /// their display label.
    pub fn resolve(record: &Value, path: &str) -> Self {
        Self::resolve_with(record, path, &REFERENCE_KEYS)
    }

    /// Like [`resolve`](Self::resolve) but prefers the raw `value` of a
    /// `{ display_value, value }` pair. Used with `sysparm_display_value=all`
    /// where the label is localized and the value is machine-readable.
    pub fn resolve_raw(record: &Value, path: &str) -> Self {
        Self::resolve_with(record, path, &["value", "display_value", "name"])
    }

    fn resolve_with(record: &Value, path: &str, keys: &[&str]) -> Self {
        match walk(record, path) {
            None | Some(Value::Null) => Self::Absent,
            Some(Value::Object(map)) => collapse(map, keys),
            Some(array @ Value::Array(_)) => Self::Opaque(array.to_string()),
            Some(scalar) => Self::Text(scalar_text(scalar)),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Absent => None,
            Self::Text(s) | Self::Reference(s) | Self::Opaque(s) => Some(s),
        }
    }

    /// The text, unless absent or blank.
    pub fn non_empty(&self) -> Option<&str> {
        self.as_str().filter(|s| !s.trim().is_empty())
    }

    /// The text, or `default` when absent or blank.
    pub fn text_or(&self, default: &str) -> String {
        self.non_empty().unwrap_or(default).to_owned()
    }

    pub fn into_option(self) -> Option<String> {
        match self {
            Self::Absent => None,
            Self::Text(s) | Self::Reference(s) | Self::Opaque(s) => {
                (!s.trim().is_empty()).then_some(s)
            }
        }
    }

    /// Truthiness of a flag-like field (`true`, `1`, non-empty text other
    /// than `false`/`0`).
    pub fn flag(&self) -> bool {
        self.non_empty()
            .is_some_and(|s| !matches!(s.trim().to_ascii_lowercase().as_str(), "false" | "0"))
    }
}

fn walk<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(record, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

fn collapse(map: &Map<String, Value>, keys: &[&str]) -> FieldValue {
    let mut present = keys.iter().filter_map(|key| map.get(*key)).peekable();
    // No reference keys at all: not a reference, keep the whole object.
    if present.peek().is_none() {
        return FieldValue::Opaque(Value::Object(map.clone()).to_string());
    }
    // A reference whose label and value are all blank is an empty field.
    present
        .find(|v| truthy(v))
        .map_or_else(|| FieldValue::Reference(String::new()), |v| match v {
            Value::Object(_) | Value::Array(_) => FieldValue::Opaque(v.to_string()),
            scalar => FieldValue::Reference(scalar_text(scalar)),
        })
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|f| f.abs() > 0.0),
        Value::Object(_) | Value::Array(_) => true,
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn missing_or_null_segments_are_absent() {
        let record = json!({ "a": { "b": null }, "c": 3 });
        assert_eq!(FieldValue::resolve(&record, "a.b.c"), FieldValue::Absent);
        assert_eq!(FieldValue::resolve(&record, "x.y"), FieldValue::Absent);
        assert_eq!(FieldValue::resolve(&record, "c.d"), FieldValue::Absent);
        assert_eq!(FieldValue::resolve(&json!(null), "a"), FieldValue::Absent);
    }

    #[test]
    fn reference_objects_collapse_to_label() {
        let record = json!({
            "ci": { "display_value": "X", "value": "abc" },
            "grp": { "value": "Y" },
            "team": { "display_value": "", "name": "Z" }
        });
        assert_eq!(FieldValue::resolve(&record, "ci"), FieldValue::Reference("X".into()));
        assert_eq!(FieldValue::resolve(&record, "grp"), FieldValue::Reference("Y".into()));
        assert_eq!(FieldValue::resolve(&record, "team"), FieldValue::Reference("Z".into()));
    }

    #[test]
    fn raw_mode_prefers_value() {
        let record = json!({ "start": { "display_value": "01/05/2024", "value": "2024-05-01 10:00:00" } });
        assert_eq!(
            FieldValue::resolve_raw(&record, "start").as_str(),
            Some("2024-05-01 10:00:00")
        );
    }

    #[test]
    fn blank_references_are_empty() {
        let record = json!({
            "start": { "display_value": "", "value": "" },
            "owner": { "value": null },
            "team": { "display_value": "", "link": "https://x.invalid/api" }
        });
        for path in ["start", "owner", "team"] {
            let resolved = FieldValue::resolve(&record, path);
            assert_eq!(resolved, FieldValue::Reference(String::new()), "{path}");
            assert_eq!(resolved.non_empty(), None);
            assert_eq!(FieldValue::resolve_raw(&record, path).into_option(), None);
        }
    }

    #[test]
    fn unexpected_shapes_are_serialized() {
        let record = json!({ "tags": ["a", "b"], "meta": { "link": "x" } });
        assert_eq!(
            FieldValue::resolve(&record, "tags"),
            FieldValue::Opaque(r#"["a","b"]"#.into())
        );
        assert_eq!(
            FieldValue::resolve(&record, "meta"),
            FieldValue::Opaque(r#"{"link":"x"}"#.into())
        );
    }

    #[test]
    fn scalars_render_as_json_text() {
        let record = json!({ "n": 42, "b": true, "s": "hi", "list": [{ "id": 7 }] });
        assert_eq!(FieldValue::resolve(&record, "n").as_str(), Some("42"));
        assert_eq!(FieldValue::resolve(&record, "b").as_str(), Some("true"));
        assert_eq!(FieldValue::resolve(&record, "s").as_str(), Some("hi"));
        assert_eq!(FieldValue::resolve(&record, "list.0.id").as_str(), Some("7"));
    }

    #[test]
    fn defaults_apply_to_blank_text() {
        let record = json!({ "summary": "  " });
        assert_eq!(FieldValue::resolve(&record, "summary").text_or("No summary"), "No summary");
        assert_eq!(FieldValue::resolve(&record, "summary").into_option(), None);
    }

    #[test]
    fn flags() {
        let record = json!({ "t": true, "f": false, "one": 1, "zero": 0, "s": "True" });
        assert!(FieldValue::resolve(&record, "t").flag());
        assert!(!FieldValue::resolve(&record, "f").flag());
        assert!(FieldValue::resolve(&record, "one").flag());
        assert!(!FieldValue::resolve(&record, "zero").flag());
        assert!(FieldValue::resolve(&record, "s").flag());
        assert!(!FieldValue::resolve(&record, "missing").flag());
    }
}
