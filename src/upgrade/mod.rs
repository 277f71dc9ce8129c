//! Document upgrader (§4.D): per-source-grammar envelope rewriting that
//! builds an [`EmendedDocument`] on top of [`crate::normalize`]'s schema
//! translation.
//!
//! OpenAPI 3.0 and 3.1 share one envelope shape and differ only in the
//! embedded schema dialect, so [`upgrade_oas3_envelope`] is generic over a
//! [`NormalizeSchema`] implementor the same way [`crate::model::envelope`]
//! is generic over the schema type — one operation-upgrade pipeline serves
//! both dialects. Swagger 2.0's envelope (body parameters, `definitions`,
//! a bare `host`) is different enough to need its own module.

pub mod oas30;
pub mod oas31;
pub mod swagger2;

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::{Diagnostic, Error, Result};
use crate::model::common::RefOr;
use crate::model::emended::{
    ContentMap, EmendedDocument, MediaType, OauthFlow, OauthFlows, Parameter, ParameterLocation,
    Path, RequestBody, Response, Schema, SecurityScheme,
};
use crate::model::envelope::{Oas3Document, Oas3MediaType, Oas3Operation, Oas3Parameter, Oas3PathItem, Oas3RequestBody, Oas3Response, Oas3SecurityScheme};
use crate::sniff::{self, Version};

/// Dispatch on [`sniff::sniff`] and run the matching upgrade pipeline. The
/// already-emended case is routed back through the OpenAPI 3.1 path: the
/// emended dialect is a strict subset of valid 3.1 JSON Schema, so this is
/// a structural no-op (§8 I1).
pub fn upgrade(value: &Value) -> Result<(EmendedDocument, Vec<Diagnostic>)> {
    match sniff::sniff(value) {
        Some(Version::Swagger2_0) => Ok(swagger2::upgrade(value)),
        Some(Version::OpenApi3_0) => Ok(oas30::upgrade(value)),
        Some(Version::OpenApi3_1) | Some(Version::Emended) => Ok(oas31::upgrade(value)),
        None => Err(Error::UnrecognizedVersion {
            context: "upgrade",
            detail: "document did not match the Swagger 2.0, OpenAPI 3.0, OpenAPI 3.1, \
                     or emended document shape"
                .to_string(),
        }),
    }
}

/// Normalize a source schema into the emended grammar. Implemented once per
/// dialect so [`upgrade_oas3_envelope`] can stay generic over `S`.
pub(crate) trait NormalizeSchema {
    fn normalize(&self, path: &str, diagnostics: &mut Vec<Diagnostic>) -> Schema;
}

impl NormalizeSchema for crate::model::schema_v30::Oas30Schema {
    fn normalize(&self, path: &str, diagnostics: &mut Vec<Diagnostic>) -> Schema {
        crate::normalize::oas30::normalize(self, path, diagnostics)
    }
}

impl NormalizeSchema for crate::model::schema_v31::Oas31Schema {
    fn normalize(&self, path: &str, diagnostics: &mut Vec<Diagnostic>) -> Schema {
        crate::normalize::oas31::normalize(self, path, diagnostics)
    }
}

/// Resolve a `RefOr<T>` against its component map, following exactly one
/// level of indirection. A dangling or doubly-indirect reference is
/// recorded as a [`Diagnostic`] and the item is dropped (§4.D state machine,
/// *dereference* transition).
fn deref_component<'a, T>(
    item: &'a RefOr<T>,
    components: &'a BTreeMap<String, RefOr<T>>,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<&'a T> {
    match item {
        RefOr::Item(value) => Some(value),
        RefOr::Reference(reference) => {
            let name = reference.ref_path.rsplit('/').next().unwrap_or(&reference.ref_path);
            match components.get(name) {
                Some(RefOr::Item(value)) => Some(value),
                Some(RefOr::Reference(_)) => {
                    Diagnostic::UnsupportedConstruct {
                        path: path.to_string(),
                        reason: format!("reference '{}' resolves to another reference; not followed", reference.ref_path),
                    }
                    .record(diagnostics);
                    None
                }
                None => {
                    Diagnostic::DanglingReference {
                        path: path.to_string(),
                        target: reference.ref_path.clone(),
                    }
                    .record(diagnostics);
                    None
                }
            }
        }
    }
}

pub(crate) fn location_from_str(raw: &str) -> Option<ParameterLocation> {
    match raw {
        "path" => Some(ParameterLocation::Path),
        "query" => Some(ParameterLocation::Query),
        "header" => Some(ParameterLocation::Header),
        "cookie" => Some(ParameterLocation::Cookie),
        _ => None,
    }
}

/// Build the emended envelope for an OpenAPI 3.0 or 3.1 document. Shared by
/// [`oas30::upgrade`] and [`oas31::upgrade`].
pub(crate) fn upgrade_oas3_envelope<S: NormalizeSchema>(
    doc: &Oas3Document<S>,
    diagnostics: &mut Vec<Diagnostic>,
) -> EmendedDocument {
    let mut out = EmendedDocument::new(doc.openapi.clone());
    out.info = Some(doc.info.clone());
    out.servers = doc.servers.clone();
    out.security = doc.security.clone();
    out.tags = doc.tags.clone();

    for (name, schema) in &doc.components.schemas {
        let normalized = schema.normalize(&format!("#/components/schemas/{name}"), diagnostics);
        out.components.schemas.insert(name.clone(), normalized);
    }

    for (name, scheme) in &doc.components.security_schemes {
        if let Some(mapped) = map_oas3_security_scheme(scheme, name, diagnostics) {
            out.components.security_schemes.insert(name.clone(), mapped);
        }
    }

    for (path_key, item) in &doc.paths {
        out.paths.insert(
            path_key.clone(),
            upgrade_oas3_path_item(item, doc, path_key, diagnostics),
        );
    }

    out
}

fn upgrade_oas3_path_item<S: NormalizeSchema>(
    item: &Oas3PathItem<S>,
    doc: &Oas3Document<S>,
    path_key: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Path {
    let mut out = Path {
        servers: item.servers.clone(),
        summary: item.summary.clone(),
        description: item.description.clone(),
        operations: BTreeMap::new(),
    };

    let path_params: Vec<&Oas3Parameter<S>> = item
        .parameters
        .iter()
        .filter_map(|p| deref_component(p, &doc.components.parameters, &format!("{path_key}.parameters"), diagnostics))
        .collect();

    for (method, operation) in item.operations() {
        let op_path = format!("{path_key}.{}", method.as_str());
        let op_out = upgrade_oas3_operation(operation, &path_params, doc, &op_path, diagnostics);
        out.set(method, op_out);
    }
    out
}

fn upgrade_oas3_operation<S: NormalizeSchema>(
    operation: &Oas3Operation<S>,
    path_params: &[&Oas3Parameter<S>],
    doc: &Oas3Document<S>,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> crate::model::emended::Operation {
    let mut parameters = Vec::new();
    for param in path_params {
        if let Some(p) = upgrade_oas3_parameter(param, path, diagnostics) {
            parameters.push(p);
        }
    }
    for refor in &operation.parameters {
        let Some(param) = deref_component(refor, &doc.components.parameters, path, diagnostics) else {
            continue;
        };
        if let Some(p) = upgrade_oas3_parameter(param, path, diagnostics) {
            parameters.push(p);
        }
    }

    let request_body = operation.request_body.as_ref().and_then(|refor| {
        deref_component(refor, &doc.components.request_bodies, path, diagnostics)
            .map(|rb| upgrade_oas3_request_body(rb, path, diagnostics))
    });

    let mut responses = BTreeMap::new();
    for (status, refor) in &operation.responses {
        if let Some(response) = deref_component(refor, &doc.components.responses, &format!("{path}.responses.{status}"), diagnostics) {
            responses.insert(
                status.clone(),
                upgrade_oas3_response(response, doc, &format!("{path}.responses.{status}"), diagnostics),
            );
        }
    }

    crate::model::emended::Operation {
        operation_id: operation.operation_id.clone(),
        parameters,
        request_body,
        responses,
        summary: operation.summary.clone(),
        description: operation.description.clone(),
        servers: operation.servers.clone(),
        security: operation.security.clone().unwrap_or_default(),
        tags: operation.tags.clone(),
        deprecated: operation.deprecated,
    }
}

fn upgrade_oas3_parameter<S: NormalizeSchema>(param: &Oas3Parameter<S>, path: &str, diagnostics: &mut Vec<Diagnostic>) -> Option<Parameter> {
    let location = match location_from_str(&param.location) {
        Some(location) => location,
        None => {
            Diagnostic::UnsupportedConstruct {
                path: format!("{path}.parameters.{}", param.name),
                reason: format!("unrecognized parameter location '{}'", param.location),
            }
            .record(diagnostics);
            return None;
        }
    };
    let schema = param
        .schema
        .as_ref()
        .map(|s| s.normalize(&format!("{path}.parameters.{}.schema", param.name), diagnostics))
        .or_else(|| {
            param.content.as_ref().and_then(|content| {
                content
                    .values()
                    .next()
                    .and_then(|mt| mt.schema.as_ref())
                    .map(|s| s.normalize(&format!("{path}.parameters.{}.content", param.name), diagnostics))
            })
        })
        .unwrap_or(Schema::Unknown(crate::model::emended::UnknownSchema::default()));

    Some(Parameter {
        name: param.name.clone(),
        location,
        schema,
        required: param.required.unwrap_or(false),
        description: param.description.clone(),
    })
}

fn upgrade_oas3_request_body<S: NormalizeSchema>(rb: &Oas3RequestBody<S>, path: &str, diagnostics: &mut Vec<Diagnostic>) -> RequestBody {
    RequestBody {
        description: rb.description.clone(),
        required: rb.required.unwrap_or(false),
        content: upgrade_content_map(&rb.content, path, diagnostics),
        encrypted: rb.encrypted,
    }
}

fn upgrade_oas3_response<S: NormalizeSchema>(
    response: &Oas3Response<S>,
    doc: &Oas3Document<S>,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Response {
    let content = response
        .content
        .as_ref()
        .map(|c| upgrade_content_map(c, path, diagnostics))
        .unwrap_or_default();

    let mut headers = BTreeMap::new();
    if let Some(raw_headers) = &response.headers {
        for (name, refor) in raw_headers {
            if let Some(header) = deref_component(refor, &doc.components.headers, &format!("{path}.headers.{name}"), diagnostics) {
                if let Some(p) = upgrade_oas3_parameter(header, &format!("{path}.headers"), diagnostics) {
                    headers.insert(name.clone(), Parameter { name: name.clone(), ..p });
                }
            }
        }
    }

    Response {
        content,
        headers,
        description: response.description.clone(),
        encrypted: response.encrypted,
    }
}

fn upgrade_content_map<S: NormalizeSchema>(content: &BTreeMap<String, Oas3MediaType<S>>, path: &str, diagnostics: &mut Vec<Diagnostic>) -> ContentMap {
    content
        .iter()
        .filter_map(|(media_type, mt)| {
            mt.schema.as_ref().map(|s| {
                (
                    media_type.clone(),
                    MediaType {
                        schema: s.normalize(&format!("{path}.content.{media_type}"), diagnostics),
                    },
                )
            })
        })
        .collect()
}

fn map_oas3_security_scheme(raw: &Oas3SecurityScheme, name: &str, diagnostics: &mut Vec<Diagnostic>) -> Option<SecurityScheme> {
    match raw.scheme_type.as_str() {
        "apiKey" => {
            let (Some(param_name), Some(location)) = (
                raw.name.clone(),
                raw.location.as_deref().and_then(location_from_str),
            ) else {
                Diagnostic::UnsupportedConstruct {
                    path: format!("#/components/securitySchemes/{name}"),
                    reason: "apiKey scheme missing name or in".to_string(),
                }
                .record(diagnostics);
                return None;
            };
            Some(SecurityScheme::ApiKey {
                name: param_name,
                location,
                description: raw.description.clone(),
            })
        }
        "http" => Some(SecurityScheme::Http {
            scheme: raw.scheme.clone().unwrap_or_default(),
            bearer_format: raw.bearer_format.clone(),
            description: raw.description.clone(),
        }),
        "oauth2" => Some(SecurityScheme::Oauth2 {
            flows: raw
                .flows
                .as_ref()
                .map(|flows| OauthFlows {
                    implicit: flows.implicit.as_ref().map(map_oauth_flow),
                    password: flows.password.as_ref().map(map_oauth_flow),
                    client_credentials: flows.client_credentials.as_ref().map(map_oauth_flow),
                    authorization_code: flows.authorization_code.as_ref().map(map_oauth_flow),
                })
                .unwrap_or_default(),
            description: raw.description.clone(),
        }),
        "openIdConnect" => raw.open_id_connect_url.clone().map(|url| SecurityScheme::OpenIdConnect {
            open_id_connect_url: url,
            description: raw.description.clone(),
        }),
        other => {
            Diagnostic::UnknownSecurityScheme { name: other.to_string() }.record(diagnostics);
            None
        }
    }
}

fn map_oauth_flow(flow: &crate::model::envelope::Oas3OauthFlow) -> OauthFlow {
    OauthFlow {
        authorization_url: flow.authorization_url.clone(),
        token_url: flow.token_url.clone(),
        refresh_url: flow.refresh_url.clone(),
        scopes: flow.scopes.clone(),
    }
}
