//! Swagger 2.0 document envelope (§4.B, §4.D).
//!
//! Structurally different enough from the 3.x envelope (body parameters,
//! `definitions` instead of `components.schemas`, `produces`/`consumes`
//! media-type lists, a single `host` instead of a `servers` array) that it
//! is not worth forcing into the same generic as [`super::envelope`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::common::{Info, RefOr, SecurityRequirement, Tag};
use super::schema_v2::Swagger2Schema;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Swagger2Document {
    #[serde(default)]
    pub swagger: String,

    #[serde(default)]
    pub info: Info,

    #[serde(default)]
    pub host: Option<String>,

    #[serde(rename = "basePath", default)]
    pub base_path: Option<String>,

    #[serde(default)]
    pub schemes: Vec<String>,

    #[serde(default)]
    pub consumes: Vec<String>,

    #[serde(default)]
    pub produces: Vec<String>,

    #[serde(default)]
    pub paths: BTreeMap<String, Swagger2PathItem>,

    #[serde(default)]
    pub definitions: BTreeMap<String, Swagger2Schema>,

    #[serde(default)]
    pub parameters: BTreeMap<String, Swagger2Parameter>,

    #[serde(default)]
    pub responses: BTreeMap<String, Swagger2Response>,

    #[serde(rename = "securityDefinitions", default)]
    pub security_definitions: BTreeMap<String, Swagger2SecurityScheme>,

    #[serde(default)]
    pub security: Vec<SecurityRequirement>,

    #[serde(default)]
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Swagger2PathItem {
    #[serde(default)]
    pub parameters: Vec<RefOr<Swagger2Parameter>>,

    #[serde(default)]
    pub get: Option<Swagger2Operation>,
    #[serde(default)]
    pub post: Option<Swagger2Operation>,
    #[serde(default)]
    pub put: Option<Swagger2Operation>,
    #[serde(default)]
    pub delete: Option<Swagger2Operation>,
    #[serde(default)]
    pub options: Option<Swagger2Operation>,
    #[serde(default)]
    pub head: Option<Swagger2Operation>,
    #[serde(default)]
    pub patch: Option<Swagger2Operation>,
}

impl Swagger2PathItem {
    pub fn operations(&self) -> impl Iterator<Item = (super::emended::HttpMethod, &Swagger2Operation)> {
        use super::emended::HttpMethod::*;
        [
            (Get, &self.get),
            (Post, &self.post),
            (Put, &self.put),
            (Delete, &self.delete),
            (Options, &self.options),
            (Head, &self.head),
            (Patch, &self.patch),
        ]
        .into_iter()
        .filter_map(|(method, op)| op.as_ref().map(|op| (method, op)))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Swagger2Operation {
    #[serde(rename = "operationId", default)]
    pub operation_id: Option<String>,

    #[serde(default)]
    pub summary: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub consumes: Vec<String>,

    #[serde(default)]
    pub produces: Vec<String>,

    #[serde(default)]
    pub parameters: Vec<RefOr<Swagger2Parameter>>,

    #[serde(default)]
    pub responses: BTreeMap<String, RefOr<Swagger2Response>>,

    #[serde(default)]
    pub security: Option<Vec<SecurityRequirement>>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub deprecated: Option<bool>,
}

/// A Swagger 2.0 parameter. Non-body parameters carry their schema inline
/// (`type`/`format`/`items`/`enum`, not a nested `schema`); body parameters
/// carry `schema` and no `type`. §4.D's operation state machine partitions
/// on [`Swagger2Parameter::is_body`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Swagger2Parameter {
    pub name: String,

    #[serde(rename = "in")]
    pub location: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub required: Option<bool>,

    #[serde(default)]
    pub schema: Option<Swagger2Schema>,

    #[serde(rename = "type", default)]
    pub schema_type: Option<String>,

    #[serde(default)]
    pub format: Option<String>,

    #[serde(default)]
    pub items: Option<Box<Swagger2Schema>>,

    #[serde(rename = "enum", default)]
    pub enum_values: Option<Vec<serde_json::Value>>,

    #[serde(default)]
    pub default: Option<serde_json::Value>,

    /// `x-nestia-content-type` (downgrade only): other media types a
    /// flattened `in: body` request body carried besides the one chosen
    /// as this parameter's schema (§4.F).
    #[serde(flatten)]
    pub extensions: BTreeMap<String, serde_json::Value>,
}

impl Swagger2Parameter {
    pub fn is_body(&self) -> bool {
        self.location == "body"
    }

    /// Build the standalone [`Swagger2Schema`] this parameter describes,
    /// whether it came from `schema` (body parameters) or from the inline
    /// `type`/`format`/`items`/`enum` fields (everything else).
    pub fn inline_schema(&self) -> Swagger2Schema {
        if let Some(schema) = &self.schema {
            return schema.clone();
        }
        Swagger2Schema {
            schema_type: self.schema_type.clone(),
            format: self.format.clone(),
            items: self.items.clone(),
            enum_values: self.enum_values.clone(),
            default: self.default.clone(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Swagger2Response {
    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub schema: Option<Swagger2Schema>,

    #[serde(default)]
    pub headers: BTreeMap<String, Swagger2Header>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Swagger2Header {
    #[serde(default)]
    pub description: Option<String>,

    #[serde(rename = "type", default)]
    pub schema_type: Option<String>,

    #[serde(default)]
    pub format: Option<String>,

    #[serde(default)]
    pub items: Option<Box<Swagger2Schema>>,
}

impl Swagger2Header {
    pub fn inline_schema(&self) -> Swagger2Schema {
        Swagger2Schema {
            schema_type: self.schema_type.clone(),
            format: self.format.clone(),
            items: self.items.clone(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Swagger2SecurityScheme {
    #[serde(rename = "type")]
    pub scheme_type: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(rename = "in", default)]
    pub location: Option<String>,

    #[serde(default)]
    pub flow: Option<String>,

    #[serde(rename = "authorizationUrl", default)]
    pub authorization_url: Option<String>,

    #[serde(rename = "tokenUrl", default)]
    pub token_url: Option<String>,

    #[serde(default)]
    pub scopes: BTreeMap<String, String>,
}
