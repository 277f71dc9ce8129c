//! Swagger 2.0 document upgrade entry point (§4.D).
//!
//! The one dialect whose envelope needs its own pipeline: a single `host`
//! stands in for `servers`, a parameter's schema may be split across
//! `type`/`format`/`items` instead of a nested `schema`, and a request body
//! is encoded as a parameter with `in: body` rather than a top-level field.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::Diagnostic;
use crate::model::common::{RefOr, Server};
use crate::model::emended::{
    ContentMap, EmendedDocument, MediaType, Operation, OauthFlow, OauthFlows, Parameter,
    ParameterLocation, Path, RequestBody, Response, SecurityScheme,
};
use crate::model::swagger2_doc::{
    Swagger2Document, Swagger2Operation, Swagger2Parameter, Swagger2PathItem, Swagger2Response,
    Swagger2SecurityScheme,
};
use crate::normalize::swagger2::normalize;

use super::location_from_str;

pub fn upgrade(value: &Value) -> (EmendedDocument, Vec<Diagnostic>) {
    let mut diagnostics = Vec::new();
    let doc: Swagger2Document = match serde_json::from_value(value.clone()) {
        Ok(doc) => doc,
        Err(err) => {
            Diagnostic::UnsupportedConstruct {
                path: "#".to_string(),
                reason: format!("document did not match the Swagger 2.0 envelope: {err}"),
            }
            .record(&mut diagnostics);
            Swagger2Document::default()
        }
    };

    let mut out = EmendedDocument::new("3.1.0");
    out.info = Some(doc.info.clone());
    out.tags = doc.tags.clone();
    out.security = doc.security.clone();
    out.servers = build_servers(&doc);

    for (name, schema) in &doc.definitions {
        let normalized = normalize(schema, &format!("#/definitions/{name}"), &mut diagnostics);
        out.components.schemas.insert(name.clone(), normalized);
    }

    for (name, scheme) in &doc.security_definitions {
        if let Some(mapped) = map_security_scheme(scheme, name, &mut diagnostics) {
            out.components.security_schemes.insert(name.clone(), mapped);
        }
    }

    for (path_key, item) in &doc.paths {
        out.paths.insert(path_key.clone(), upgrade_path_item(item, &doc, path_key, &mut diagnostics));
    }

    (out, diagnostics)
}

fn build_servers(doc: &Swagger2Document) -> Vec<Server> {
    let Some(host) = &doc.host else {
        return Vec::new();
    };
    let scheme = doc.schemes.first().cloned().unwrap_or_else(|| "https".to_string());
    let base_path = doc.base_path.clone().unwrap_or_default();
    vec![Server {
        url: format!("{scheme}://{host}{base_path}"),
        description: None,
    }]
}

fn deref_parameter<'a>(
    item: &'a RefOr<Swagger2Parameter>,
    components: &'a BTreeMap<String, Swagger2Parameter>,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<&'a Swagger2Parameter> {
    match item {
        RefOr::Item(value) => Some(value),
        RefOr::Reference(reference) => {
            let name = reference.ref_path.rsplit('/').next().unwrap_or(&reference.ref_path);
            components.get(name).or_else(|| {
                Diagnostic::DanglingReference {
                    path: path.to_string(),
                    target: reference.ref_path.clone(),
                }
                .record(diagnostics);
                None
            })
        }
    }
}

fn deref_response<'a>(
    item: &'a RefOr<Swagger2Response>,
    components: &'a BTreeMap<String, Swagger2Response>,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<&'a Swagger2Response> {
    match item {
        RefOr::Item(value) => Some(value),
        RefOr::Reference(reference) => {
            let name = reference.ref_path.rsplit('/').next().unwrap_or(&reference.ref_path);
            components.get(name).or_else(|| {
                Diagnostic::DanglingReference {
                    path: path.to_string(),
                    target: reference.ref_path.clone(),
                }
                .record(diagnostics);
                None
            })
        }
    }
}

fn upgrade_path_item(item: &Swagger2PathItem, doc: &Swagger2Document, path_key: &str, diagnostics: &mut Vec<Diagnostic>) -> Path {
    let mut out = Path::default();

    let path_params: Vec<&Swagger2Parameter> = item
        .parameters
        .iter()
        .filter_map(|p| deref_parameter(p, &doc.parameters, &format!("{path_key}.parameters"), diagnostics))
        .collect();

    for (method, operation) in item.operations() {
        let op_path = format!("{path_key}.{}", method.as_str());
        if let Some(op_out) = upgrade_operation(operation, &path_params, doc, &op_path, diagnostics) {
            out.set(method, op_out);
        }
    }
    out
}

/// The collect → dereference → partition → emit state machine (§4.D).
fn upgrade_operation(
    op: &Swagger2Operation,
    path_params: &[&Swagger2Parameter],
    doc: &Swagger2Document,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<Operation> {
    // collect + dereference
    let mut all_params: Vec<&Swagger2Parameter> = path_params.to_vec();
    for refor in &op.parameters {
        if let Some(p) = deref_parameter(refor, &doc.parameters, path, diagnostics) {
            all_params.push(p);
        }
    }

    // partition
    let mut body_params = Vec::new();
    let mut regular_params = Vec::new();
    for p in all_params {
        if p.is_body() {
            body_params.push(p);
        } else {
            regular_params.push(p);
        }
    }
    if body_params.len() > 1 {
        Diagnostic::MalformedOperation {
            operation_id: op.operation_id.clone().unwrap_or_else(|| path.to_string()),
            reason: "more than one body parameter".to_string(),
        }
        .record(diagnostics);
        return None;
    }

    // emit
    let parameters = regular_params
        .into_iter()
        .filter_map(|p| upgrade_parameter(p, path, diagnostics))
        .collect();

    let request_body = body_params.first().map(|p| {
        let mut content = ContentMap::new();
        content.insert(
            "application/json".to_string(),
            MediaType {
                schema: normalize(&p.inline_schema(), &format!("{path}.body"), diagnostics),
            },
        );
        RequestBody {
            description: p.description.clone(),
            required: p.required.unwrap_or(false),
            content,
            encrypted: None,
        }
    });

    let responses = op
        .responses
        .iter()
        .filter_map(|(status, refor)| {
            deref_response(refor, &doc.responses, &format!("{path}.responses.{status}"), diagnostics)
                .map(|resp| (status.clone(), upgrade_response(resp, &format!("{path}.responses.{status}"), diagnostics)))
        })
        .collect();

    Some(Operation {
        operation_id: op.operation_id.clone(),
        parameters,
        request_body,
        responses,
        summary: op.summary.clone(),
        description: op.description.clone(),
        servers: Vec::new(),
        security: op.security.clone().unwrap_or_default(),
        tags: op.tags.clone(),
        deprecated: op.deprecated,
    })
}

fn upgrade_parameter(p: &Swagger2Parameter, path: &str, diagnostics: &mut Vec<Diagnostic>) -> Option<Parameter> {
    let location = match location_from_str(&p.location) {
        Some(location) => location,
        None => {
            Diagnostic::UnsupportedConstruct {
                path: format!("{path}.parameters.{}", p.name),
                reason: format!("unrepresentable parameter location '{}'", p.location),
            }
            .record(diagnostics);
            return None;
        }
    };
    let schema = normalize(&p.inline_schema(), &format!("{path}.parameters.{}", p.name), diagnostics);
    Some(Parameter {
        name: p.name.clone(),
        location,
        schema,
        required: p.required.unwrap_or(false),
        description: p.description.clone(),
    })
}

fn upgrade_response(resp: &Swagger2Response, path: &str, diagnostics: &mut Vec<Diagnostic>) -> Response {
    let mut content = ContentMap::new();
    if let Some(schema) = &resp.schema {
        content.insert(
            "application/json".to_string(),
            MediaType {
                schema: normalize(schema, &format!("{path}.schema"), diagnostics),
            },
        );
    }
    let headers = resp
        .headers
        .iter()
        .map(|(name, header)| {
            (
                name.clone(),
                Parameter {
                    name: name.clone(),
                    location: ParameterLocation::Header,
                    schema: normalize(&header.inline_schema(), &format!("{path}.headers.{name}"), diagnostics),
                    required: false,
                    description: header.description.clone(),
                },
            )
        })
        .collect();
    Response {
        content,
        headers,
        description: resp.description.clone(),
        encrypted: None,
    }
}

/// Map a `securityDefinitions` entry onto the emended flow-set (§4.D):
/// `basic` → `{type: http, scheme: basic}`; oauth2 flow names `implicit`,
/// `accessCode`, `password`, `application` map to `implicit`,
/// `authorizationCode`, `password`, `clientCredentials`.
fn map_security_scheme(raw: &Swagger2SecurityScheme, name: &str, diagnostics: &mut Vec<Diagnostic>) -> Option<SecurityScheme> {
    match raw.scheme_type.as_str() {
        "basic" => Some(SecurityScheme::Http {
            scheme: "basic".to_string(),
            bearer_format: None,
            description: raw.description.clone(),
        }),
        "apiKey" => {
            let (Some(param_name), Some(location)) = (
                raw.name.clone(),
                raw.location.as_deref().and_then(location_from_str),
            ) else {
                Diagnostic::UnsupportedConstruct {
                    path: format!("#/securityDefinitions/{name}"),
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
        "oauth2" => {
            let mut flows = OauthFlows::default();
            let flow = OauthFlow {
                authorization_url: raw.authorization_url.clone(),
                token_url: raw.token_url.clone(),
                refresh_url: None,
                scopes: raw.scopes.clone(),
            };
            match raw.flow.as_deref() {
                Some("implicit") => flows.implicit = Some(flow),
                Some("accessCode") => flows.authorization_code = Some(flow),
                Some("password") => flows.password = Some(flow),
                Some("application") => flows.client_credentials = Some(flow),
                other => {
                    Diagnostic::UnsupportedConstruct {
                        path: format!("#/securityDefinitions/{name}"),
                        reason: format!("unrecognized oauth2 flow name {other:?}"),
                    }
                    .record(diagnostics);
                }
            }
            Some(SecurityScheme::Oauth2 {
                flows,
                description: raw.description.clone(),
            })
        }
        other => {
            Diagnostic::UnknownSecurityScheme { name: other.to_string() }.record(diagnostics);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::emended::{HttpMethod, Schema};
    use pretty_assertions::assert_eq;

    fn sample() -> Value {
        serde_json::json!({
            "swagger": "2.0",
            "info": {"title": "Demo", "version": "1.0.0"},
            "host": "api.example.com",
            "basePath": "/v1",
            "schemes": ["https"],
            "definitions": {
                "Pet": {"type": "object", "properties": {"name": {"type": "string"}}}
            },
            "paths": {
                "/pets": {
                    "post": {
                        "operationId": "createPet",
                        "parameters": [
                            {"name": "body", "in": "body", "schema": {"$ref": "#/definitions/Pet"}}
                        ],
                        "responses": {
                            "201": {"description": "created", "schema": {"$ref": "#/definitions/Pet"}}
                        }
                    }
                }
            }
        })
    }

    #[test]
    fn host_and_base_path_become_a_server() {
        let (doc, diagnostics) = upgrade(&sample());
        assert!(diagnostics.is_empty());
        assert_eq!(doc.servers.len(), 1);
        assert_eq!(doc.servers[0].url, "https://api.example.com/v1");
    }

    #[test]
    fn body_parameter_promotes_to_request_body() {
        let (doc, _) = upgrade(&sample());
        let op = doc.paths.get("/pets").unwrap().get(HttpMethod::Post).unwrap();
        assert!(op.parameters.is_empty());
        let body = op.request_body.as_ref().expect("request body");
        assert!(matches!(
            body.content.get("application/json").unwrap().schema,
            Schema::Reference(_)
        ));
    }

    #[test]
    fn two_body_parameters_drop_the_operation() {
        let mut value = sample();
        value["paths"]["/pets"]["post"]["parameters"]
            .as_array_mut()
            .unwrap()
            .push(serde_json::json!({"name": "body2", "in": "body", "schema": {"type": "string"}}));
        let (doc, diagnostics) = upgrade(&value);
        assert!(doc.paths.get("/pets").unwrap().get(HttpMethod::Post).is_none());
        assert!(diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::MalformedOperation { .. })));
    }
}
