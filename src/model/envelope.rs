//! OpenAPI 3.0 / 3.1 document envelope, generic over the embedded schema
//! dialect (§4.B, §4.D).
//!
//! OpenAPI 3.0 and 3.1 agree on every envelope-level construct (paths,
//! operations, parameters, responses, components, security) and differ
//! only in the JSON Schema dialect nested inside `schema` fields. Rather
//! than duplicating the envelope twice, it is generic over the schema type
//! `S`, instantiated as [`super::Oas30Document`] / [`super::Oas31Document`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::common::{Info, RefOr, SecurityRequirement, Server, Tag};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Oas3Document<S> {
    #[serde(default)]
    pub openapi: String,

    #[serde(default)]
    pub info: Info,

    #[serde(default)]
    pub servers: Vec<Server>,

    #[serde(default)]
    pub paths: BTreeMap<String, Oas3PathItem<S>>,

    #[serde(default)]
    pub webhooks: BTreeMap<String, RefOr<Oas3PathItem<S>>>,

    #[serde(default)]
    pub components: Oas3Components<S>,

    #[serde(default)]
    pub security: Vec<SecurityRequirement>,

    #[serde(default)]
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Oas3Components<S> {
    #[serde(default)]
    pub schemas: BTreeMap<String, S>,

    #[serde(default)]
    pub parameters: BTreeMap<String, RefOr<Oas3Parameter<S>>>,

    #[serde(default)]
    pub responses: BTreeMap<String, RefOr<Oas3Response<S>>>,

    #[serde(rename = "requestBodies", default)]
    pub request_bodies: BTreeMap<String, RefOr<Oas3RequestBody<S>>>,

    #[serde(default)]
    pub headers: BTreeMap<String, RefOr<Oas3Parameter<S>>>,

    #[serde(rename = "securitySchemes", default)]
    pub security_schemes: BTreeMap<String, Oas3SecurityScheme>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Oas3PathItem<S> {
    #[serde(default)]
    pub servers: Vec<Server>,

    #[serde(default)]
    pub summary: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub parameters: Vec<RefOr<Oas3Parameter<S>>>,

    #[serde(default)]
    pub get: Option<Oas3Operation<S>>,
    #[serde(default)]
    pub post: Option<Oas3Operation<S>>,
    #[serde(default)]
    pub put: Option<Oas3Operation<S>>,
    #[serde(default)]
    pub delete: Option<Oas3Operation<S>>,
    #[serde(default)]
    pub options: Option<Oas3Operation<S>>,
    #[serde(default)]
    pub head: Option<Oas3Operation<S>>,
    #[serde(default)]
    pub patch: Option<Oas3Operation<S>>,
    #[serde(default)]
    pub trace: Option<Oas3Operation<S>>,
}

impl<S> Oas3PathItem<S> {
    /// Iterate over every present `(method, operation)` pair, in the
    /// canonical order listed in §3.
    pub fn operations(&self) -> impl Iterator<Item = (super::emended::HttpMethod, &Oas3Operation<S>)> {
        use super::emended::HttpMethod::*;
        [
            (Get, &self.get),
            (Post, &self.post),
            (Put, &self.put),
            (Delete, &self.delete),
            (Options, &self.options),
            (Head, &self.head),
            (Patch, &self.patch),
            (Trace, &self.trace),
        ]
        .into_iter()
        .filter_map(|(method, op)| op.as_ref().map(|op| (method, op)))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Oas3Operation<S> {
    #[serde(rename = "operationId", default)]
    pub operation_id: Option<String>,

    #[serde(default)]
    pub summary: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub parameters: Vec<RefOr<Oas3Parameter<S>>>,

    #[serde(rename = "requestBody", default)]
    pub request_body: Option<RefOr<Oas3RequestBody<S>>>,

    #[serde(default)]
    pub responses: BTreeMap<String, RefOr<Oas3Response<S>>>,

    #[serde(default)]
    pub servers: Vec<Server>,

    #[serde(default)]
    pub security: Option<Vec<SecurityRequirement>>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub deprecated: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Oas3Parameter<S> {
    pub name: String,

    #[serde(rename = "in")]
    pub location: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub required: Option<bool>,

    #[serde(default)]
    pub deprecated: Option<bool>,

    #[serde(default)]
    pub schema: Option<S>,

    #[serde(default)]
    pub content: Option<BTreeMap<String, Oas3MediaType<S>>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Oas3RequestBody<S> {
    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub required: Option<bool>,

    #[serde(default)]
    pub content: BTreeMap<String, Oas3MediaType<S>>,

    #[serde(rename = "x-nestia-encrypted", default)]
    pub encrypted: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Oas3Response<S> {
    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub content: Option<BTreeMap<String, Oas3MediaType<S>>>,

    #[serde(default)]
    pub headers: Option<BTreeMap<String, RefOr<Oas3Parameter<S>>>>,

    #[serde(rename = "x-nestia-encrypted", default)]
    pub encrypted: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Oas3MediaType<S> {
    #[serde(default)]
    pub schema: Option<S>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Oas3OauthFlow {
    #[serde(rename = "authorizationUrl", default)]
    pub authorization_url: Option<String>,
    #[serde(rename = "tokenUrl", default)]
    pub token_url: Option<String>,
    #[serde(rename = "refreshUrl", default)]
    pub refresh_url: Option<String>,
    #[serde(default)]
    pub scopes: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Oas3OauthFlows {
    #[serde(default)]
    pub implicit: Option<Oas3OauthFlow>,
    #[serde(default)]
    pub password: Option<Oas3OauthFlow>,
    #[serde(rename = "clientCredentials", default)]
    pub client_credentials: Option<Oas3OauthFlow>,
    #[serde(rename = "authorizationCode", default)]
    pub authorization_code: Option<Oas3OauthFlow>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Oas3SecurityScheme {
    #[serde(rename = "type")]
    pub scheme_type: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub scheme: Option<String>,

    #[serde(rename = "bearerFormat", default)]
    pub bearer_format: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(rename = "in", default)]
    pub location: Option<String>,

    #[serde(default)]
    pub flows: Option<Oas3OauthFlows>,

    #[serde(rename = "openIdConnectUrl", default)]
    pub open_id_connect_url: Option<String>,
}
