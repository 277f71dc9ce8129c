//! Types shared across the Swagger 2.0, OpenAPI 3.0, and OpenAPI 3.1 grammars.
//!
//! Everything here mirrors a construct that looks the same (or close enough
//! to share a generic) across all three source dialects: reference objects,
//! the boolean-or-schema `additionalProperties` shape, and the envelope
//! metadata (`info`, `servers`, contact/license).

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// A `{"$ref": "..."}` reference object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(rename = "$ref")]
    pub ref_path: String,
}

impl Reference {
    pub fn new(ref_path: impl Into<String>) -> Self {
        Self {
            ref_path: ref_path.into(),
        }
    }
}

/// Either a reference object or an inline item.
///
/// Deserialization is driven by the presence of a `$ref` key rather than by
/// untagged-enum field matching, because every inline item in these grammars
/// has only optional fields — an untagged `#[serde(untagged)]` enum would
/// always match the first variant regardless of shape.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum RefOr<T> {
    Reference(Reference),
    Item(T),
}

impl<T> RefOr<T> {
    pub fn as_item(&self) -> Option<&T> {
        match self {
            RefOr::Item(item) => Some(item),
            RefOr::Reference(_) => None,
        }
    }

    pub fn as_reference(&self) -> Option<&str> {
        match self {
            RefOr::Reference(r) => Some(&r.ref_path),
            RefOr::Item(_) => None,
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for RefOr<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        if let Some(ref_path) = value.get("$ref").and_then(|v| v.as_str()) {
            return Ok(RefOr::Reference(Reference::new(ref_path)));
        }
        T::deserialize(value)
            .map(RefOr::Item)
            .map_err(serde::de::Error::custom)
    }
}

/// `additionalProperties` / `additionalItems`: either a boolean gate or a
/// nested schema. Safe to derive untagged `Deserialize` for, since a JSON
/// boolean and a JSON object never overlap structurally.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BoolOrSchema<S> {
    Bool(bool),
    Schema(Box<S>),
}

impl<S> Default for BoolOrSchema<S> {
    fn default() -> Self {
        BoolOrSchema::Bool(true)
    }
}

/// `info` object, structurally identical across all four grammars.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Info {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(flatten)]
    pub extensions: BTreeMap<String, serde_json::Value>,
}

/// `servers[]` entry. Swagger 2.0 has no such array; the upgrader synthesizes
/// a one-element list from `host`/`basePath`/`schemes` (§4.D).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Server {
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// `tags[]` entry, identical across grammars.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A single entry of a `security[]` requirement: scheme name to scopes.
pub type SecurityRequirement = BTreeMap<String, Vec<String>>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Clone, Deserialize, PartialEq)]
    struct Item {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        schema_type: Option<String>,
    }

    #[test]
    fn ref_or_picks_reference_on_dollar_ref() {
        let value = serde_json::json!({ "$ref": "#/components/schemas/Pet" });
        let parsed: RefOr<Item> = serde_json::from_value(value).unwrap();
        assert_eq!(parsed.as_reference(), Some("#/components/schemas/Pet"));
    }

    #[test]
    fn ref_or_picks_item_without_dollar_ref() {
        let value = serde_json::json!({ "name": "x" });
        let parsed: RefOr<Item> = serde_json::from_value(value).unwrap();
        assert_eq!(
            parsed.as_item(),
            Some(&Item {
                name: Some("x".to_string()),
                schema_type: None
            })
        );
    }

    #[test]
    fn bool_or_schema_distinguishes_bool_from_object() {
        let b: BoolOrSchema<Item> = serde_json::from_value(serde_json::json!(false)).unwrap();
        assert!(matches!(b, BoolOrSchema::Bool(false)));

        let s: BoolOrSchema<Item> =
            serde_json::from_value(serde_json::json!({"name": "x"})).unwrap();
        assert!(matches!(s, BoolOrSchema::Schema(_)));
    }
}
