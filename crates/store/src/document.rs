//! Document shapes at the store boundary.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A named set of documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    /// Event documents.
    Events,
    /// Client documents.
    Clients,
}

impl Collection {
    /// Returns the collection name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Events => "events",
            Self::Clients => "clients",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Removes `null` object fields at every depth.
///
/// The store has no representation for an absent value, so optional fields
/// must be dropped rather than written as `null`.
#[must_use]
pub fn clean_document(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, clean_document(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(clean_document).collect()),
        other => other,
    }
}

/// Reads a reference that may be a bare identifier or a `{ "id": ... }` handle.
#[must_use]
pub fn normalize_reference(value: &Value) -> Option<String> {
    match value {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Object(map) => match map.get("id") {
            Some(Value::String(id)) if !id.is_empty() => Some(id.clone()),
            _ => None,
        },
        _ => None,
    }
}

/// Rewrites each named top-level field into a plain identifier, when it can.
pub(crate) fn normalize_fields(document: &mut Value, fields: &[&str]) {
    let Some(map) = document.as_object_mut() else {
        return;
    };
    for field in fields {
        if let Some(id) = map.get(*field).and_then(normalize_reference) {
            map.insert((*field).to_string(), Value::String(id));
        }
    }
}

/// Applies `normalize_fields` to every element of each named top-level array.
pub(crate) fn normalize_nested(document: &mut Value, nested: &[(&str, &[&str])]) {
    for (array, fields) in nested {
        if let Some(Value::Array(items)) = document.get_mut(*array) {
            for item in items {
                normalize_fields(item, fields);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clean_document_strips_nested_nulls() {
        let doc = json!({
            "name": "Sharma reception",
            "lostDetails": null,
            "charges": [{ "type": "DJ", "notes": null, "amount": "500" }],
        });
        let cleaned = clean_document(doc);
        assert_eq!(
            cleaned,
            json!({
                "name": "Sharma reception",
                "charges": [{ "type": "DJ", "amount": "500" }],
            })
        );
    }

    #[test]
    fn test_normalize_reference_shapes() {
        assert_eq!(normalize_reference(&json!("c-1")), Some("c-1".to_string()));
        assert_eq!(
            normalize_reference(&json!({ "id": "c-2", "path": "clients/c-2" })),
            Some("c-2".to_string())
        );
        assert_eq!(normalize_reference(&json!({ "path": "clients/c-3" })), None);
        assert_eq!(normalize_reference(&json!(42)), None);
        assert_eq!(normalize_reference(&json!("")), None);
    }

    #[test]
    fn test_normalize_fields_rewrites_handles() {
        let mut doc = json!({ "clientId": { "id": "c-9" }, "name": "x" });
        normalize_fields(&mut doc, &["clientId", "missing"]);
        assert_eq!(doc["clientId"], json!("c-9"));
        assert_eq!(doc["name"], json!("x"));
    }

    #[test]
    fn test_normalize_nested_rewrites_each_element() {
        let mut doc = json!({
            "charges": [
                { "menuTemplateId": { "id": "T1" }, "amount": "100" },
                { "liveCounterId": "chaat" },
                { "liveCounterId": { "id": "dosa" } },
            ],
        });
        normalize_nested(&mut doc, &[("charges", &["liveCounterId", "menuTemplateId"])]);
        assert_eq!(doc["charges"][0]["menuTemplateId"], json!("T1"));
        assert_eq!(doc["charges"][0]["amount"], json!("100"));
        assert_eq!(doc["charges"][1]["liveCounterId"], json!("chaat"));
        assert_eq!(doc["charges"][2]["liveCounterId"], json!("dosa"));
    }
}
