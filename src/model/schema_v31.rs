//! OpenAPI 3.1 (JSON Schema draft 2020-12) fragment (§4.B).
//!
//! `type` may be a single string or an array of strings; null is a type
//! rather than a `nullable` modifier; `exclusiveMinimum`/`exclusiveMaximum`
//! are numbers, not booleans. Admits `$recursiveRef` and `prefixItems`
//! alongside the legacy array-of-schemas `items` tuple form some generators
//! still emit.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::common::BoolOrSchema;

/// `type` is either a bare string or (2020-12) an array of strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeField {
    Single(String),
    Many(Vec<String>),
}

impl TypeField {
    pub fn as_slice(&self) -> Vec<&str> {
        match self {
            TypeField::Single(s) => vec![s.as_str()],
            TypeField::Many(items) => items.iter().map(String::as_str).collect(),
        }
    }
}

/// `items` is either a single schema (2020-12) or, in the legacy tuple
/// form some generators still emit, an array of per-position schemas.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemsField {
    Single(Box<Oas31Schema>),
    Tuple(Vec<Oas31Schema>),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Oas31Schema {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<TypeField>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,

    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub ref_path: Option<String>,

    #[serde(
        rename = "$recursiveRef",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub recursive_ref: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,

    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<serde_json::Value>>,

    #[serde(rename = "const", default, skip_serializing_if = "Option::is_none")]
    pub const_value: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<ItemsField>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix_items: Option<Vec<Oas31Schema>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_items: Option<BoolOrSchema<Oas31Schema>>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, Oas31Schema>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<BoolOrSchema<Oas31Schema>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    #[serde(rename = "oneOf", default, skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<Oas31Schema>>,
    #[serde(rename = "anyOf", default, skip_serializing_if = "Option::is_none")]
    pub any_of: Option<Vec<Oas31Schema>>,
    #[serde(rename = "allOf", default, skip_serializing_if = "Option::is_none")]
    pub all_of: Option<Vec<Oas31Schema>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not: Option<Box<Oas31Schema>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusive_minimum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusive_maximum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiple_of: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_items: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_properties: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_properties: Option<u64>,

    #[serde(flatten)]
    pub extensions: BTreeMap<String, serde_json::Value>,
}
