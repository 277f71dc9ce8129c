//! Downgrade an [`EmendedDocument`] to OpenAPI 3.0 (§4.E).

use std::collections::BTreeMap;

use crate::error::Diagnostic;
use crate::model::common::{BoolOrSchema, RefOr};
use crate::model::emended::{
    ContentMap, EmendedDocument, HttpMethod, NumericSchema, OauthFlow, OauthFlows, Operation,
    Parameter, Path, RequestBody, Response, Schema, SchemaAttributes, SchemaOrBool,
    SecurityScheme,
};
use crate::model::envelope::{
    Oas3Components, Oas3Document, Oas3MediaType, Oas3OauthFlow, Oas3OauthFlows, Oas3Operation,
    Oas3Parameter, Oas3PathItem, Oas3RequestBody, Oas3Response, Oas3SecurityScheme,
};
use crate::model::schema_v30::Oas30Schema;
use crate::model::Oas30Document;

pub fn downgrade(doc: &EmendedDocument, diagnostics: &mut Vec<Diagnostic>) -> Oas30Document {
    let mut schemas = BTreeMap::new();
    for (name, schema) in &doc.components.schemas {
        schemas.insert(
            name.clone(),
            downgrade_schema(schema, &format!("#/components/schemas/{name}"), diagnostics),
        );
    }

    let mut security_schemes = BTreeMap::new();
    for (name, scheme) in &doc.components.security_schemes {
        security_schemes.insert(name.clone(), downgrade_security_scheme(scheme));
    }

    let mut paths = BTreeMap::new();
    for (path_key, path) in &doc.paths {
        paths.insert(path_key.clone(), downgrade_path_item(path, path_key, diagnostics));
    }

    if !doc.webhooks.is_empty() {
        Diagnostic::UnsupportedConstruct {
            path: "#/webhooks".to_string(),
            reason: "webhooks are not representable in OpenAPI 3.0 and were dropped".to_string(),
        }
        .record(diagnostics);
    }

    Oas3Document {
        openapi: "3.0.3".to_string(),
        info: doc.info.clone().unwrap_or_default(),
        servers: doc.servers.clone(),
        paths,
        webhooks: BTreeMap::new(),
        components: Oas3Components {
            schemas,
            security_schemes,
            ..Default::default()
        },
        security: doc.security.clone(),
        tags: doc.tags.clone(),
    }
}

fn downgrade_path_item(path: &Path, path_key: &str, diagnostics: &mut Vec<Diagnostic>) -> Oas3PathItem<Oas30Schema> {
    let mut item = Oas3PathItem::<Oas30Schema>::default();
    item.servers = path.servers.clone();
    item.summary = path.summary.clone();
    item.description = path.description.clone();
    for method in HttpMethod::ALL {
        if let Some(op) = path.get(method) {
            let operation = downgrade_operation(op, &format!("{path_key}/{}", method.as_str()), diagnostics);
            match method {
                HttpMethod::Get => item.get = Some(operation),
                HttpMethod::Post => item.post = Some(operation),
                HttpMethod::Put => item.put = Some(operation),
                HttpMethod::Delete => item.delete = Some(operation),
                HttpMethod::Options => item.options = Some(operation),
                HttpMethod::Head => item.head = Some(operation),
                HttpMethod::Patch => item.patch = Some(operation),
                HttpMethod::Trace => item.trace = Some(operation),
            }
        }
    }
    item
}

fn downgrade_operation(op: &Operation, path: &str, diagnostics: &mut Vec<Diagnostic>) -> Oas3Operation<Oas30Schema> {
    Oas3Operation {
        operation_id: op.operation_id.clone(),
        summary: op.summary.clone(),
        description: op.description.clone(),
        parameters: op
            .parameters
            .iter()
            .map(|p| RefOr::Item(downgrade_parameter(p, path, diagnostics)))
            .collect(),
        request_body: op
            .request_body
            .as_ref()
            .map(|rb| RefOr::Item(downgrade_request_body(rb, path, diagnostics))),
        responses: op
            .responses
            .iter()
            .map(|(status, response)| {
                (
                    status.clone(),
                    RefOr::Item(downgrade_response(response, &format!("{path}/responses/{status}"), diagnostics)),
                )
            })
            .collect(),
        servers: op.servers.clone(),
        security: if op.security.is_empty() { None } else { Some(op.security.clone()) },
        tags: op.tags.clone(),
        deprecated: op.deprecated,
    }
}

fn downgrade_parameter(p: &Parameter, path: &str, diagnostics: &mut Vec<Diagnostic>) -> Oas3Parameter<Oas30Schema> {
    Oas3Parameter {
        name: p.name.clone(),
        location: super::location_to_str(p.location).to_string(),
        description: p.description.clone(),
        required: Some(p.required),
        deprecated: None,
        schema: Some(downgrade_schema(&p.schema, &format!("{path}/parameters/{}", p.name), diagnostics)),
        content: None,
    }
}

fn downgrade_request_body(rb: &RequestBody, path: &str, diagnostics: &mut Vec<Diagnostic>) -> Oas3RequestBody<Oas30Schema> {
    Oas3RequestBody {
        description: rb.description.clone(),
        required: Some(rb.required),
        content: downgrade_content_map(&rb.content, &format!("{path}/requestBody"), diagnostics),
        encrypted: rb.encrypted,
    }
}

fn downgrade_response(r: &Response, path: &str, diagnostics: &mut Vec<Diagnostic>) -> Oas3Response<Oas30Schema> {
    Oas3Response {
        description: r.description.clone(),
        content: if r.content.is_empty() {
            None
        } else {
            Some(downgrade_content_map(&r.content, path, diagnostics))
        },
        headers: if r.headers.is_empty() {
            None
        } else {
            Some(
                r.headers
                    .iter()
                    .map(|(name, p)| (name.clone(), RefOr::Item(downgrade_parameter(p, path, diagnostics))))
                    .collect(),
            )
        },
        encrypted: r.encrypted,
    }
}

fn downgrade_content_map(content: &ContentMap, path: &str, diagnostics: &mut Vec<Diagnostic>) -> BTreeMap<String, Oas3MediaType<Oas30Schema>> {
    content
        .iter()
        .map(|(media_type, media)| {
            (
                media_type.clone(),
                Oas3MediaType {
                    schema: Some(downgrade_schema(&media.schema, &format!("{path}/content/{media_type}"), diagnostics)),
                },
            )
        })
        .collect()
}

fn downgrade_security_scheme(scheme: &SecurityScheme) -> Oas3SecurityScheme {
    match scheme {
        SecurityScheme::ApiKey { name, location, description } => Oas3SecurityScheme {
            scheme_type: "apiKey".to_string(),
            description: description.clone(),
            scheme: None,
            bearer_format: None,
            name: Some(name.clone()),
            location: Some(super::location_to_str(*location).to_string()),
            flows: None,
            open_id_connect_url: None,
        },
        SecurityScheme::Http { scheme: http_scheme, bearer_format, description } => Oas3SecurityScheme {
            scheme_type: "http".to_string(),
            description: description.clone(),
            scheme: Some(http_scheme.clone()),
            bearer_format: bearer_format.clone(),
            name: None,
            location: None,
            flows: None,
            open_id_connect_url: None,
        },
        SecurityScheme::Oauth2 { flows, description } => Oas3SecurityScheme {
            scheme_type: "oauth2".to_string(),
            description: description.clone(),
            scheme: None,
            bearer_format: None,
            name: None,
            location: None,
            flows: Some(downgrade_oauth_flows(flows)),
            open_id_connect_url: None,
        },
        SecurityScheme::OpenIdConnect { open_id_connect_url, description } => Oas3SecurityScheme {
            scheme_type: "openIdConnect".to_string(),
            description: description.clone(),
            scheme: None,
            bearer_format: None,
            name: None,
            location: None,
            flows: None,
            open_id_connect_url: Some(open_id_connect_url.clone()),
        },
    }
}

fn downgrade_oauth_flows(flows: &OauthFlows) -> Oas3OauthFlows {
    Oas3OauthFlows {
        implicit: flows.implicit.as_ref().map(downgrade_oauth_flow),
        password: flows.password.as_ref().map(downgrade_oauth_flow),
        client_credentials: flows.client_credentials.as_ref().map(downgrade_oauth_flow),
        authorization_code: flows.authorization_code.as_ref().map(downgrade_oauth_flow),
    }
}

fn downgrade_oauth_flow(flow: &OauthFlow) -> Oas3OauthFlow {
    Oas3OauthFlow {
        authorization_url: flow.authorization_url.clone(),
        token_url: flow.token_url.clone(),
        refresh_url: flow.refresh_url.clone(),
        scopes: flow.scopes.clone(),
    }
}

fn apply_attributes(target: &mut Oas30Schema, attrs: &SchemaAttributes) {
    target.title = attrs.title.clone();
    target.description = attrs.description.clone();
    target.deprecated = attrs.deprecated;
    target.extensions = attrs.extensions.clone();
}

fn has_no_attributes(s: &Oas30Schema) -> bool {
    s.title.is_none() && s.description.is_none() && s.deprecated.is_none() && s.extensions.is_empty()
}

fn numeric_to_oas30(type_name: &str, n: &NumericSchema) -> Oas30Schema {
    let mut out = Oas30Schema {
        schema_type: Some(type_name.to_string()),
        format: n.format.clone(),
        minimum: n.minimum,
        maximum: n.maximum,
        multiple_of: n.multiple_of,
        ..Default::default()
    };
    if n.exclusive_minimum {
        out.exclusive_minimum = Some(true);
    }
    if n.exclusive_maximum {
        out.exclusive_maximum = Some(true);
    }
    apply_attributes(&mut out, &n.attributes);
    out
}

/// Render an emended [`Schema`] as an OpenAPI 3.0 JSON Schema fragment
/// (§4.E). Every lossy step — tuple flattening, dropped webhooks — records
/// a [`Diagnostic::UnsupportedConstruct`].
pub(crate) fn downgrade_schema(schema: &Schema, path: &str, diagnostics: &mut Vec<Diagnostic>) -> Oas30Schema {
    match schema {
        Schema::Constant(c) => {
            let mut out = Oas30Schema {
                schema_type: super::infer_primitive_type(&c.value).map(str::to_string),
                enum_values: Some(vec![c.value.clone()]),
                ..Default::default()
            };
            apply_attributes(&mut out, &c.attributes);
            out
        }
        Schema::Boolean(b) => {
            let mut out = Oas30Schema {
                schema_type: Some("boolean".to_string()),
                ..Default::default()
            };
            apply_attributes(&mut out, &b.attributes);
            out
        }
        Schema::Integer(n) => numeric_to_oas30("integer", n),
        Schema::Number(n) => numeric_to_oas30("number", n),
        Schema::String(s) => {
            let mut out = Oas30Schema {
                schema_type: Some("string".to_string()),
                format: s.format.clone(),
                min_length: s.min_length,
                max_length: s.max_length,
                pattern: s.pattern.clone(),
                ..Default::default()
            };
            apply_attributes(&mut out, &s.attributes);
            out
        }
        Schema::Array(a) => {
            let mut out = Oas30Schema {
                schema_type: Some("array".to_string()),
                items: Some(Box::new(downgrade_schema(&a.items, &format!("{path}/items"), diagnostics))),
                min_items: a.min_items,
                max_items: a.max_items,
                ..Default::default()
            };
            apply_attributes(&mut out, &a.attributes);
            out
        }
        Schema::Tuple(t) => {
            Diagnostic::UnsupportedConstruct {
                path: path.to_string(),
                reason: "tuple (prefixItems) downgraded to an array of oneOf items; fixed per-position typing is lost".to_string(),
            }
            .record(diagnostics);
            let branches = t
                .prefix_items
                .iter()
                .enumerate()
                .map(|(i, s)| downgrade_schema(s, &format!("{path}/prefixItems/{i}"), diagnostics))
                .collect();
            let n = t.prefix_items.len() as u64;
            let mut out = Oas30Schema {
                schema_type: Some("array".to_string()),
                items: Some(Box::new(Oas30Schema {
                    one_of: Some(branches),
                    ..Default::default()
                })),
                min_items: Some(n),
                max_items: if matches!(t.additional_items, SchemaOrBool::Bool(false)) {
                    Some(n)
                } else {
                    None
                },
                ..Default::default()
            };
            apply_attributes(&mut out, &t.attributes);
            out
        }
        Schema::Object(o) => {
            let mut out = Oas30Schema {
                schema_type: Some("object".to_string()),
                properties: o
                    .properties
                    .iter()
                    .map(|(name, s)| (name.clone(), downgrade_schema(s, &format!("{path}/properties/{name}"), diagnostics)))
                    .collect(),
                required: o.required.clone(),
                additional_properties: Some(match &o.additional_properties {
                    SchemaOrBool::Bool(b) => BoolOrSchema::Bool(*b),
                    SchemaOrBool::Schema(s) => BoolOrSchema::Schema(Box::new(downgrade_schema(s, &format!("{path}/additionalProperties"), diagnostics))),
                }),
                ..Default::default()
            };
            apply_attributes(&mut out, &o.attributes);
            out
        }
        Schema::Reference(r) => {
            let mut out = Oas30Schema {
                ref_path: Some(r.ref_path.clone()),
                ..Default::default()
            };
            apply_attributes(&mut out, &r.attributes);
            out
        }
        Schema::OneOf(o) => {
            let mut has_null = false;
            let mut remaining = Vec::new();
            for branch in &o.branches {
                if matches!(branch, Schema::Null(_)) {
                    has_null = true;
                } else {
                    remaining.push(branch);
                }
            }
            if remaining.is_empty() {
                let mut out = Oas30Schema {
                    nullable: Some(true),
                    ..Default::default()
                };
                apply_attributes(&mut out, &o.attributes);
                return out;
            }
            if remaining.len() == 1 {
                let mut out = downgrade_schema(remaining[0], path, diagnostics);
                if has_null {
                    out.nullable = Some(true);
                }
                if has_no_attributes(&out) {
                    apply_attributes(&mut out, &o.attributes);
                    if has_null {
                        out.nullable = Some(true);
                    }
                }
                return out;
            }
            let branches = remaining
                .iter()
                .enumerate()
                .map(|(i, b)| downgrade_schema(b, &format!("{path}/oneOf/{i}"), diagnostics))
                .collect();
            let mut out = Oas30Schema {
                one_of: Some(branches),
                nullable: if has_null { Some(true) } else { None },
                ..Default::default()
            };
            apply_attributes(&mut out, &o.attributes);
            out
        }
        Schema::Null(n) => {
            let mut out = Oas30Schema {
                nullable: Some(true),
                ..Default::default()
            };
            apply_attributes(&mut out, &n.attributes);
            out
        }
        Schema::Unknown(u) => {
            let mut out = Oas30Schema::default();
            apply_attributes(&mut out, &u.attributes);
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::emended::{ConstantSchema, NullSchema, OneOfSchema, StringSchema, TupleSchema};
    use pretty_assertions::assert_eq;

    #[test]
    fn one_of_with_null_becomes_nullable_string() {
        let schema = Schema::OneOf(OneOfSchema {
            branches: vec![
                Schema::String(StringSchema::default()),
                Schema::Null(NullSchema::default()),
            ],
            attributes: SchemaAttributes::default(),
        });
        let mut diagnostics = Vec::new();
        let out = downgrade_schema(&schema, "#", &mut diagnostics);
        assert_eq!(out.schema_type.as_deref(), Some("string"));
        assert_eq!(out.nullable, Some(true));
    }

    #[test]
    fn constant_becomes_single_member_enum() {
        let schema = Schema::Constant(ConstantSchema {
            value: serde_json::json!("ACTIVE"),
            attributes: SchemaAttributes::default(),
        });
        let mut diagnostics = Vec::new();
        let out = downgrade_schema(&schema, "#", &mut diagnostics);
        assert_eq!(out.schema_type.as_deref(), Some("string"));
        assert_eq!(out.enum_values, Some(vec![serde_json::json!("ACTIVE")]));
    }

    #[test]
    fn tuple_downgrades_to_bounded_array_and_records_a_diagnostic() {
        let schema = Schema::Tuple(TupleSchema {
            prefix_items: vec![Schema::String(StringSchema::default()), Schema::Boolean(Default::default())],
            additional_items: SchemaOrBool::Bool(false),
            min_items: None,
            max_items: None,
            attributes: SchemaAttributes::default(),
        });
        let mut diagnostics = Vec::new();
        let out = downgrade_schema(&schema, "#/components/schemas/Pair", &mut diagnostics);
        assert_eq!(out.schema_type.as_deref(), Some("array"));
        assert_eq!(out.min_items, Some(2));
        assert_eq!(out.max_items, Some(2));
        assert_eq!(diagnostics.len(), 1);
    }
}
