//! Live form values keyed by dot-separated field path.

use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::errors::{FormError, FormResult};
use super::field::FormField;

static NULL: Value = Value::Null;

/// Current value of every field in a form
///
/// Nested groups are flattened to dot paths (`stammdaten.bank`). Absent fields
/// read as `null`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormSnapshot {
    values: BTreeMap<String, Value>,
}

impl FormSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flatten a JSON object into a snapshot
    pub fn from_json(value: &Value) -> FormResult<Self> {
        let object = value.as_object().ok_or_else(|| {
            FormError::Serialization(format!(
                "form payload must be a JSON object, got {}",
                json_kind(value)
            ))
        })?;

        let mut snapshot = Self::new();
        flatten_into(&mut snapshot.values, None, object);
        Ok(snapshot)
    }

    /// Rebuild the nested JSON object the gateway expects
    pub fn to_json(&self) -> Value {
        let mut root = Map::new();
        for (path, value) in &self.values {
            insert_nested(&mut root, path, value.clone());
        }
        Value::Object(root)
    }

    pub fn get(&self, path: &str) -> &Value {
        self.values.get(path).unwrap_or(&NULL)
    }

    pub fn get_field<F: FormField>(&self, field: F) -> &Value {
        self.get(field.path())
    }

    /// Non-blank string value of a field
    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path)
            .as_str()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Whether the field holds something a user would call "filled in"
    pub fn is_filled(&self, path: &str) -> bool {
        match self.get(path) {
            Value::Null => false,
            Value::String(s) => !s.trim().is_empty(),
            Value::Array(items) => !items.is_empty(),
            Value::Object(map) => !map.is_empty(),
            Value::Bool(_) | Value::Number(_) => true,
        }
    }

    /// Store a value, returning whether the snapshot changed
    pub fn set(&mut self, path: impl Into<String>, value: Value) -> bool {
        let path = path.into();
        if self.values.get(&path) == Some(&value) {
            return false;
        }
        if value.is_null() && !self.values.contains_key(&path) {
            return false;
        }
        self.values.insert(path, value);
        true
    }

    pub fn set_field<F: FormField>(&mut self, field: F, value: Value) -> bool {
        self.set(field.path(), value)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.values.contains_key(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for FormSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

fn flatten_into(out: &mut BTreeMap<String, Value>, prefix: Option<&str>, object: &Map<String, Value>) {
    for (key, value) in object {
        let path = match prefix {
            Some(prefix) => format!("{prefix}.{key}"),
            None => key.clone(),
        };
        match value {
            Value::Object(nested) if !nested.is_empty() => flatten_into(out, Some(&path), nested),
            other => {
                out.insert(path, other.clone());
            }
        }
    }
}

fn insert_nested(root: &mut Map<String, Value>, path: &str, value: Value) {
    match path.split_once('.') {
        None => {
            root.insert(path.to_string(), value);
        }
        Some((head, rest)) => {
            let entry = root
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            if let Value::Object(child) = entry {
                insert_nested(child, rest, value);
            }
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_groups_flatten_to_dot_paths() {
        let snapshot = FormSnapshot::from_json(&json!({
            "vorname": "Anna",
            "stammdaten": { "bank": "Erste Bank", "iban": "AT61 1904 3002 3457 3201" },
            "kinder": [ { "name": "Ben" } ]
        }))
        .unwrap();

        assert_eq!(snapshot.get("stammdaten.bank"), &json!("Erste Bank"));
        assert_eq!(snapshot.get("kinder"), &json!([{ "name": "Ben" }]));
        assert_eq!(snapshot.get("missing"), &Value::Null);
        assert_eq!(snapshot.len(), 4);
    }

    #[test]
    fn test_to_json_rebuilds_groups() {
        let mut snapshot = FormSnapshot::new();
        snapshot.set("stammdaten.bank", json!("Erste Bank"));
        snapshot.set("vorname", json!("Anna"));

        assert_eq!(
            snapshot.to_json(),
            json!({ "stammdaten": { "bank": "Erste Bank" }, "vorname": "Anna" })
        );
    }

    #[test]
    fn test_set_reports_changes_only() {
        let mut snapshot = FormSnapshot::new();
        assert!(snapshot.set("eintritt", json!("01.03.2026")));
        assert!(!snapshot.set("eintritt", json!("01.03.2026")));
        assert!(!snapshot.set("austritt", Value::Null));
        assert!(snapshot.set("eintritt", Value::Null));
    }

    #[test]
    fn test_rejects_non_object_payload() {
        assert!(matches!(
            FormSnapshot::from_json(&json!([1, 2])),
            Err(FormError::Serialization(_))
        ));
    }

    #[test]
    fn test_filled_semantics() {
        let snapshot: FormSnapshot = [
            ("blank", json!("  ")),
            ("text", json!("x")),
            ("flag", json!(false)),
        ]
        .into_iter()
        .collect();

        assert!(!snapshot.is_filled("blank"));
        assert!(snapshot.is_filled("text"));
        assert!(snapshot.is_filled("flag"));
        assert!(!snapshot.is_filled("absent"));
        assert_eq!(snapshot.get_str("blank"), None);
    }
}
