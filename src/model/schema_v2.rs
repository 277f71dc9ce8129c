//! Swagger 2.0 JSON Schema fragment (§4.B).
//!
//! Swagger 2.0's schema language lacks `nullable`, `oneOf`, and `anyOf`; the
//! `x-nullable`, `x-oneOf`, and `x-anyOf` vendor keys are the escape hatches
//! real-world Swagger 2.0 documents use instead. References point into
//! `#/definitions/...`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::common::BoolOrSchema;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Swagger2Schema {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,

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

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,

    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<serde_json::Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Swagger2Schema>>,

    /// Accepts the documented `properites` misspelling on input; always
    /// serialized back out under the correct key.
    #[serde(alias = "properites", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, Swagger2Schema>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<BoolOrSchema<Swagger2Schema>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusive_minimum: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusive_maximum: Option<bool>,
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

    /// Vendor escape hatch for `nullable`, absent from the 2.0 core.
    #[serde(rename = "x-nullable", default, skip_serializing_if = "Option::is_none")]
    pub x_nullable: Option<bool>,

    /// Vendor escape hatch for `oneOf`, absent from the 2.0 core.
    #[serde(rename = "x-oneOf", default, skip_serializing_if = "Option::is_none")]
    pub x_one_of: Option<Vec<Swagger2Schema>>,

    /// Vendor escape hatch for `anyOf`, absent from the 2.0 core.
    #[serde(rename = "x-anyOf", default, skip_serializing_if = "Option::is_none")]
    pub x_any_of: Option<Vec<Swagger2Schema>>,

    /// Every other `x-*` key, preserved verbatim (§4.C.1).
    #[serde(flatten)]
    pub extensions: BTreeMap<String, serde_json::Value>,
}
