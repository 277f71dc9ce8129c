//! The emended grammar: the single OpenAPI-3.1-shaped dialect every source
//! document is normalized into (§3).
//!
//! `Schema` is deliberately NOT `Deserialize`: it is always constructed by
//! the normalizer (§4.C), never parsed directly off the wire. An
//! already-emended input is routed back through the OpenAPI 3.1 upgrade
//! path (§4.A rule 1 plus the routing note on [`crate::sniff::Version`]),
//! which is a structural no-op because the emended dialect is a strict
//! subset of valid 3.1 JSON Schema. `Schema` does implement [`Serialize`]
//! (via [`Schema::to_value`]) so that an [`EmendedDocument`] can be handed
//! straight to `serde_json::to_writer`.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use super::common::{Info, SecurityRequirement, Server, Tag};

/// Title, description, deprecated flag, and preserved `x-*` keys, collected
/// by the normalizer's attribute-hoisting pass (§4.C.1) and reattached to
/// every emended schema variant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaAttributes {
    pub title: Option<String>,
    pub description: Option<String>,
    pub deprecated: Option<bool>,
    pub extensions: BTreeMap<String, Value>,
}

impl SchemaAttributes {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.deprecated.is_none()
            && self.extensions.is_empty()
    }

    /// Write the bag's fields into an in-progress object map.
    fn write_into(&self, map: &mut Map<String, Value>) {
        if let Some(title) = &self.title {
            map.insert("title".to_string(), Value::String(title.clone()));
        }
        if let Some(description) = &self.description {
            map.insert("description".to_string(), Value::String(description.clone()));
        }
        if let Some(deprecated) = self.deprecated {
            map.insert("deprecated".to_string(), Value::Bool(deprecated));
        }
        for (key, value) in &self.extensions {
            map.insert(key.clone(), value.clone());
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstantSchema {
    pub value: Value,
    pub attributes: SchemaAttributes,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BooleanSchema {
    pub attributes: SchemaAttributes,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumericSchema {
    pub format: Option<String>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub exclusive_minimum: bool,
    pub exclusive_maximum: bool,
    pub multiple_of: Option<f64>,
    pub attributes: SchemaAttributes,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StringSchema {
    pub format: Option<String>,
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub pattern: Option<String>,
    pub attributes: SchemaAttributes,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArraySchema {
    pub items: Box<Schema>,
    pub min_items: Option<u64>,
    pub max_items: Option<u64>,
    pub attributes: SchemaAttributes,
}

/// Boolean-or-schema gate for `additionalProperties`/`additionalItems` in
/// the emended dialect.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaOrBool {
    Bool(bool),
    Schema(Box<Schema>),
}

impl Default for SchemaOrBool {
    fn default() -> Self {
        SchemaOrBool::Bool(true)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TupleSchema {
    pub prefix_items: Vec<Schema>,
    pub additional_items: SchemaOrBool,
    pub min_items: Option<u64>,
    pub max_items: Option<u64>,
    pub attributes: SchemaAttributes,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectSchema {
    pub properties: BTreeMap<String, Schema>,
    pub required: Vec<String>,
    pub additional_properties: SchemaOrBool,
    pub attributes: SchemaAttributes,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceSchema {
    pub ref_path: String,
    pub attributes: SchemaAttributes,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OneOfSchema {
    pub branches: Vec<Schema>,
    pub attributes: SchemaAttributes,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NullSchema {
    pub attributes: SchemaAttributes,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnknownSchema {
    pub attributes: SchemaAttributes,
}

/// The central sum type (§3). Exhaustive matching at every conversion site
/// is a correctness requirement (§9) — no catch-all arms over this enum.
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    Constant(ConstantSchema),
    Boolean(BooleanSchema),
    Integer(NumericSchema),
    Number(NumericSchema),
    String(StringSchema),
    Array(ArraySchema),
    Tuple(TupleSchema),
    Object(ObjectSchema),
    Reference(ReferenceSchema),
    OneOf(OneOfSchema),
    Null(NullSchema),
    Unknown(UnknownSchema),
}

impl Schema {
    pub fn attributes(&self) -> &SchemaAttributes {
        match self {
            Schema::Constant(s) => &s.attributes,
            Schema::Boolean(s) => &s.attributes,
            Schema::Integer(s) | Schema::Number(s) => &s.attributes,
            Schema::String(s) => &s.attributes,
            Schema::Array(s) => &s.attributes,
            Schema::Tuple(s) => &s.attributes,
            Schema::Object(s) => &s.attributes,
            Schema::Reference(s) => &s.attributes,
            Schema::OneOf(s) => &s.attributes,
            Schema::Null(s) => &s.attributes,
            Schema::Unknown(s) => &s.attributes,
        }
    }

    pub fn attributes_mut(&mut self) -> &mut SchemaAttributes {
        match self {
            Schema::Constant(s) => &mut s.attributes,
            Schema::Boolean(s) => &mut s.attributes,
            Schema::Integer(s) | Schema::Number(s) => &mut s.attributes,
            Schema::String(s) => &mut s.attributes,
            Schema::Array(s) => &mut s.attributes,
            Schema::Tuple(s) => &mut s.attributes,
            Schema::Object(s) => &mut s.attributes,
            Schema::Reference(s) => &mut s.attributes,
            Schema::OneOf(s) => &mut s.attributes,
            Schema::Null(s) => &mut s.attributes,
            Schema::Unknown(s) => &mut s.attributes,
        }
    }

    /// Render as a generic JSON tree, matching the textual shape described
    /// throughout §4 (`oneOf`, `const`, `prefixItems`, etc.).
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        match self {
            Schema::Constant(s) => {
                map.insert("const".to_string(), s.value.clone());
                s.attributes.write_into(&mut map);
            }
            Schema::Boolean(s) => {
                map.insert("type".to_string(), Value::String("boolean".to_string()));
                s.attributes.write_into(&mut map);
            }
            Schema::Integer(s) | Schema::Number(s) => {
                let type_name = if matches!(self, Schema::Integer(_)) {
                    "integer"
                } else {
                    "number"
                };
                map.insert("type".to_string(), Value::String(type_name.to_string()));
                if let Some(format) = &s.format {
                    map.insert("format".to_string(), Value::String(format.clone()));
                }
                if let Some(minimum) = s.minimum {
                    map.insert(
                        if s.exclusive_minimum {
                            "exclusiveMinimum"
                        } else {
                            "minimum"
                        }
                        .to_string(),
                        num_value(minimum),
                    );
                }
                if let Some(maximum) = s.maximum {
                    map.insert(
                        if s.exclusive_maximum {
                            "exclusiveMaximum"
                        } else {
                            "maximum"
                        }
                        .to_string(),
                        num_value(maximum),
                    );
                }
                if let Some(multiple_of) = s.multiple_of {
                    map.insert("multipleOf".to_string(), num_value(multiple_of));
                }
                s.attributes.write_into(&mut map);
            }
            Schema::String(s) => {
                map.insert("type".to_string(), Value::String("string".to_string()));
                if let Some(format) = &s.format {
                    map.insert("format".to_string(), Value::String(format.clone()));
                }
                if let Some(min_length) = s.min_length {
                    map.insert("minLength".to_string(), Value::from(min_length));
                }
                if let Some(max_length) = s.max_length {
                    map.insert("maxLength".to_string(), Value::from(max_length));
                }
                if let Some(pattern) = &s.pattern {
                    map.insert("pattern".to_string(), Value::String(pattern.clone()));
                }
                s.attributes.write_into(&mut map);
            }
            Schema::Array(s) => {
                map.insert("type".to_string(), Value::String("array".to_string()));
                map.insert("items".to_string(), s.items.to_value());
                if let Some(min_items) = s.min_items {
                    map.insert("minItems".to_string(), Value::from(min_items));
                }
                if let Some(max_items) = s.max_items {
                    map.insert("maxItems".to_string(), Value::from(max_items));
                }
                s.attributes.write_into(&mut map);
            }
            Schema::Tuple(s) => {
                map.insert("type".to_string(), Value::String("array".to_string()));
                map.insert(
                    "prefixItems".to_string(),
                    Value::Array(s.prefix_items.iter().map(Schema::to_value).collect()),
                );
                map.insert(
                    "additionalItems".to_string(),
                    match &s.additional_items {
                        SchemaOrBool::Bool(b) => Value::Bool(*b),
                        SchemaOrBool::Schema(schema) => schema.to_value(),
                    },
                );
                if let Some(min_items) = s.min_items {
                    map.insert("minItems".to_string(), Value::from(min_items));
                }
                if let Some(max_items) = s.max_items {
                    map.insert("maxItems".to_string(), Value::from(max_items));
                }
                s.attributes.write_into(&mut map);
            }
            Schema::Object(s) => {
                map.insert("type".to_string(), Value::String("object".to_string()));
                if !s.properties.is_empty() {
                    let mut props = Map::new();
                    for (name, schema) in &s.properties {
                        props.insert(name.clone(), schema.to_value());
                    }
                    map.insert("properties".to_string(), Value::Object(props));
                }
                if !s.required.is_empty() {
                    map.insert(
                        "required".to_string(),
                        Value::Array(s.required.iter().map(|r| Value::String(r.clone())).collect()),
                    );
                }
                map.insert(
                    "additionalProperties".to_string(),
                    match &s.additional_properties {
                        SchemaOrBool::Bool(b) => Value::Bool(*b),
                        SchemaOrBool::Schema(schema) => schema.to_value(),
                    },
                );
                s.attributes.write_into(&mut map);
            }
            Schema::Reference(s) => {
                map.insert("$ref".to_string(), Value::String(s.ref_path.clone()));
                s.attributes.write_into(&mut map);
            }
            Schema::OneOf(s) => {
                map.insert(
                    "oneOf".to_string(),
                    Value::Array(s.branches.iter().map(Schema::to_value).collect()),
                );
                s.attributes.write_into(&mut map);
            }
            Schema::Null(s) => {
                map.insert("type".to_string(), Value::String("null".to_string()));
                s.attributes.write_into(&mut map);
            }
            Schema::Unknown(s) => {
                s.attributes.write_into(&mut map);
            }
        }
        Value::Object(map)
    }
}

fn num_value(n: f64) -> Value {
    serde_json::Number::from_f64(n)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

impl Serialize for Schema {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_value().serialize(serializer)
    }
}

/// A reusable response/request-body content map: media type to `{schema}`.
pub type ContentMap = BTreeMap<String, MediaType>;

#[derive(Debug, Clone, Serialize)]
pub struct MediaType {
    pub schema: Schema,
}

/// Where a [`Parameter`] is bound. Body parameters (Swagger 2.0's `in:
/// body`) never reach this type — they are promoted into [`RequestBody`]
/// during upgrade (§4.D).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
}

#[derive(Debug, Clone, Serialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    pub schema: Schema,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RequestBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub required: bool,
    pub content: ContentMap,
    #[serde(rename = "x-nestia-encrypted", skip_serializing_if = "Option::is_none")]
    pub encrypted: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Response {
    #[serde(skip_serializing_if = "ContentMap::is_empty")]
    pub content: ContentMap,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, Parameter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "x-nestia-encrypted", skip_serializing_if = "Option::is_none")]
    pub encrypted: Option<bool>,
}

/// The eight methods a [`Path`] may carry an [`Operation`] for (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Options,
    Head,
    Patch,
    Trace,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 8] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Options,
        HttpMethod::Head,
        HttpMethod::Patch,
        HttpMethod::Trace,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Delete => "delete",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
            HttpMethod::Patch => "patch",
            HttpMethod::Trace => "trace",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Operation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    pub parameters: Vec<Parameter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,
    pub responses: BTreeMap<String, Response>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<Server>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub security: Vec<SecurityRequirement>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,
}

/// Unlike the source grammars, a `Path` carries no `parameters` field:
/// any path-level parameters are merged into each contained [`Operation`]
/// during upgrade (§3 invariant 5).
#[derive(Debug, Clone, Default, Serialize)]
pub struct Path {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<Server>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub operations: BTreeMap<&'static str, Operation>,
}

impl Path {
    pub fn set(&mut self, method: HttpMethod, operation: Operation) {
        self.operations.insert(method.as_str(), operation);
    }

    pub fn get(&self, method: HttpMethod) -> Option<&Operation> {
        self.operations.get(method.as_str())
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Components {
    pub schemas: BTreeMap<String, Schema>,
    #[serde(rename = "securitySchemes", skip_serializing_if = "BTreeMap::is_empty")]
    pub security_schemes: BTreeMap<String, SecurityScheme>,
}

/// A single OAuth2 flow (§4.D security-scheme mapping).
#[derive(Debug, Clone, Default, Serialize)]
pub struct OauthFlow {
    #[serde(rename = "authorizationUrl", skip_serializing_if = "Option::is_none")]
    pub authorization_url: Option<String>,
    #[serde(rename = "tokenUrl", skip_serializing_if = "Option::is_none")]
    pub token_url: Option<String>,
    #[serde(rename = "refreshUrl", skip_serializing_if = "Option::is_none")]
    pub refresh_url: Option<String>,
    pub scopes: BTreeMap<String, String>,
}

/// The emended flow-set keys every source oauth2 flow name is mapped onto
/// (Swagger 2.0's `implicit`/`accessCode`/`password`/`application` and
/// OpenAPI 3.x's native flow names both land here; §4.D, §4.F).
#[derive(Debug, Clone, Default, Serialize)]
pub struct OauthFlows {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub implicit: Option<OauthFlow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<OauthFlow>,
    #[serde(rename = "clientCredentials", skip_serializing_if = "Option::is_none")]
    pub client_credentials: Option<OauthFlow>,
    #[serde(rename = "authorizationCode", skip_serializing_if = "Option::is_none")]
    pub authorization_code: Option<OauthFlow>,
}

/// A security scheme normalized from either Swagger 2.0's `securityDefinitions`
/// or OpenAPI 3.x's `components.securitySchemes` (§4.D).
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SecurityScheme {
    ApiKey {
        name: String,
        #[serde(rename = "in")]
        location: ParameterLocation,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    Http {
        scheme: String,
        #[serde(rename = "bearerFormat", skip_serializing_if = "Option::is_none")]
        bearer_format: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    Oauth2 {
        flows: OauthFlows,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    OpenIdConnect {
        #[serde(rename = "openIdConnectUrl")]
        open_id_connect_url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
}

/// A webhook entry is a [`Path`] or a document-level reference to one.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum PathOrReference {
    Reference { #[serde(rename = "$ref")] ref_path: String },
    Path(Path),
}

/// The emended OpenAPI 3.1 document (§3). Once produced by upgrade, every
/// field here is immutable for the lifetime of the value — downgrade
/// consumes `&EmendedDocument` and produces a fresh target document rather
/// than mutating in place.
#[derive(Debug, Clone, Serialize)]
pub struct EmendedDocument {
    pub openapi: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<Server>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<Info>,
    pub components: Components,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub paths: BTreeMap<String, Path>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub webhooks: BTreeMap<String, PathOrReference>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub security: Vec<SecurityRequirement>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
    #[serde(rename = "x-samchon-emended")]
    pub emended_marker: bool,
}

impl EmendedDocument {
    /// A fresh, empty emended document with the marker already set (§3).
    pub fn new(openapi_version: impl Into<String>) -> Self {
        Self {
            openapi: openapi_version.into(),
            servers: Vec::new(),
            info: None,
            components: Components::default(),
            paths: BTreeMap::new(),
            webhooks: BTreeMap::new(),
            security: Vec::new(),
            tags: Vec::new(),
            emended_marker: true,
        }
    }
}
