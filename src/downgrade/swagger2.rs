//! Downgrade an [`EmendedDocument`] to Swagger 2.0 (§4.F, building on the
//! OpenAPI 3.0 transformations in §4.E).

use std::collections::BTreeMap;

use crate::error::Diagnostic;
use crate::model::common::{BoolOrSchema, RefOr, Server};
use crate::model::emended::{
    ContentMap, EmendedDocument, HttpMethod, NumericSchema, OauthFlow, OauthFlows, Operation,
    Parameter, Path, RequestBody, Response, Schema, SchemaAttributes, SchemaOrBool,
    SecurityScheme,
};
use crate::model::swagger2_doc::{
    Swagger2Document, Swagger2Header, Swagger2Operation, Swagger2Parameter, Swagger2PathItem,
    Swagger2Response, Swagger2SecurityScheme,
};
use crate::model::schema_v2::Swagger2Schema;

pub fn downgrade(doc: &EmendedDocument, diagnostics: &mut Vec<Diagnostic>) -> Swagger2Document {
    let mut definitions = BTreeMap::new();
    for (name, schema) in &doc.components.schemas {
        definitions.insert(
            name.clone(),
            downgrade_schema_v2(schema, &format!("#/definitions/{name}"), diagnostics),
        );
    }

    let mut security_definitions = BTreeMap::new();
    for (name, scheme) in &doc.components.security_schemes {
        for (key, mapped) in downgrade_security_scheme(name, scheme, diagnostics) {
            security_definitions.insert(key, mapped);
        }
    }

    let (host, base_path, schemes) = servers_to_host(&doc.servers, diagnostics);

    let mut paths = BTreeMap::new();
    for (path_key, path) in &doc.paths {
        paths.insert(path_key.clone(), downgrade_path_item(path, path_key, diagnostics));
    }

    if !doc.webhooks.is_empty() {
        Diagnostic::UnsupportedConstruct {
            path: "#/webhooks".to_string(),
            reason: "webhooks are not representable in Swagger 2.0 and were dropped".to_string(),
        }
        .record(diagnostics);
    }

    Swagger2Document {
        swagger: "2.0".to_string(),
        info: doc.info.clone().unwrap_or_default(),
        host,
        base_path,
        schemes,
        consumes: Vec::new(),
        produces: Vec::new(),
        paths,
        definitions,
        parameters: BTreeMap::new(),
        responses: BTreeMap::new(),
        security_definitions,
        security: doc.security.clone(),
        tags: doc.tags.clone(),
    }
}

/// Split the first `servers[]` entry back into `host`/`basePath`/`schemes`
/// (the inverse of upgrade's `build_servers`). Extra servers are dropped
/// with a diagnostic, matching Swagger 2.0's single-host model.
fn servers_to_host(servers: &[Server], diagnostics: &mut Vec<Diagnostic>) -> (Option<String>, Option<String>, Vec<String>) {
    let Some(server) = servers.first() else {
        return (None, None, Vec::new());
    };
    if servers.len() > 1 {
        Diagnostic::UnsupportedConstruct {
            path: "#/servers".to_string(),
            reason: "multiple servers collapsed into a single Swagger 2.0 host; only the first was kept".to_string(),
        }
        .record(diagnostics);
    }
    let Some((scheme, rest)) = server.url.split_once("://") else {
        return (Some(server.url.clone()), None, Vec::new());
    };
    let (host, base_path) = match rest.split_once('/') {
        Some((host, tail)) => (host.to_string(), format!("/{tail}")),
        None => (rest.to_string(), String::new()),
    };
    (Some(host), if base_path.is_empty() { None } else { Some(base_path) }, vec![scheme.to_string()])
}

fn downgrade_path_item(path: &Path, path_key: &str, diagnostics: &mut Vec<Diagnostic>) -> Swagger2PathItem {
    let mut item = Swagger2PathItem::default();
    for method in HttpMethod::ALL {
        let Some(op) = path.get(method) else { continue };
        if method == HttpMethod::Trace {
            Diagnostic::UnsupportedConstruct {
                path: format!("{path_key}/trace"),
                reason: "trace operations are not representable in Swagger 2.0 and were dropped".to_string(),
            }
            .record(diagnostics);
            continue;
        }
        let operation = downgrade_operation(op, &format!("{path_key}/{}", method.as_str()), diagnostics);
        match method {
            HttpMethod::Get => item.get = Some(operation),
            HttpMethod::Post => item.post = Some(operation),
            HttpMethod::Put => item.put = Some(operation),
            HttpMethod::Delete => item.delete = Some(operation),
            HttpMethod::Options => item.options = Some(operation),
            HttpMethod::Head => item.head = Some(operation),
            HttpMethod::Patch => item.patch = Some(operation),
            HttpMethod::Trace => unreachable!("handled above"),
        }
    }
    item
}

fn downgrade_operation(op: &Operation, path: &str, diagnostics: &mut Vec<Diagnostic>) -> Swagger2Operation {
    let mut parameters: Vec<RefOr<Swagger2Parameter>> = op
        .parameters
        .iter()
        .map(|p| RefOr::Item(downgrade_parameter(p, path, diagnostics)))
        .collect();
    if let Some(rb) = &op.request_body {
        parameters.push(RefOr::Item(downgrade_request_body(rb, path, diagnostics)));
    }

    let responses = op
        .responses
        .iter()
        .map(|(status, response)| {
            (
                status.clone(),
                RefOr::Item(downgrade_response(response, &format!("{path}/responses/{status}"), diagnostics)),
            )
        })
        .collect();

    Swagger2Operation {
        operation_id: op.operation_id.clone(),
        summary: op.summary.clone(),
        description: op.description.clone(),
        consumes: Vec::new(),
        produces: Vec::new(),
        parameters,
        responses,
        security: if op.security.is_empty() { None } else { Some(op.security.clone()) },
        tags: op.tags.clone(),
        deprecated: op.deprecated,
    }
}

fn downgrade_parameter(p: &Parameter, path: &str, diagnostics: &mut Vec<Diagnostic>) -> Swagger2Parameter {
    let param_path = format!("{path}/parameters/{}", p.name);
    let schema = downgrade_schema_v2(&p.schema, &param_path, diagnostics);
    if matches!(schema.schema_type.as_deref(), Some("object")) || schema.x_one_of.is_some() {
        Diagnostic::UnsupportedConstruct {
            path: param_path,
            reason: "non-body parameter schema narrowed to its primitive shape; object/oneOf constructs are not representable outside a body parameter".to_string(),
        }
        .record(diagnostics);
    }
    Swagger2Parameter {
        name: p.name.clone(),
        location: super::location_to_str(p.location).to_string(),
        description: p.description.clone(),
        required: Some(p.required),
        schema: None,
        schema_type: schema.schema_type,
        format: schema.format,
        items: schema.items,
        enum_values: schema.enum_values,
        default: schema.default,
        extensions: BTreeMap::new(),
    }
}

/// Flatten a [`RequestBody`] into a single `in: body` parameter, using its
/// `application/json` entry (or the first entry present) as the schema;
/// any remaining media types are recorded as `x-nestia-content-type`.
fn downgrade_request_body(rb: &RequestBody, path: &str, diagnostics: &mut Vec<Diagnostic>) -> Swagger2Parameter {
    let primary_key = primary_media_type(&rb.content);
    let schema = primary_key
        .and_then(|key| rb.content.get(key))
        .map(|media| downgrade_schema_v2(&media.schema, &format!("{path}/requestBody"), diagnostics));

    let mut extensions = BTreeMap::new();
    let other: Vec<&str> = rb
        .content
        .keys()
        .map(String::as_str)
        .filter(|key| Some(*key) != primary_key)
        .collect();
    if !other.is_empty() {
        extensions.insert(
            "x-nestia-content-type".to_string(),
            serde_json::Value::Array(other.into_iter().map(|m| serde_json::Value::String(m.to_string())).collect()),
        );
    }

    Swagger2Parameter {
        name: "body".to_string(),
        location: "body".to_string(),
        description: rb.description.clone(),
        required: Some(rb.required),
        schema: Some(schema.unwrap_or_default()),
        schema_type: None,
        format: None,
        items: None,
        enum_values: None,
        default: None,
        extensions,
    }
}

fn primary_media_type(content: &ContentMap) -> Option<&str> {
    if content.contains_key("application/json") {
        Some("application/json")
    } else {
        content.keys().next().map(String::as_str)
    }
}

fn downgrade_response(r: &Response, path: &str, diagnostics: &mut Vec<Diagnostic>) -> Swagger2Response {
    let primary_key = primary_media_type(&r.content);
    let schema = primary_key
        .and_then(|key| r.content.get(key))
        .map(|media| downgrade_schema_v2(&media.schema, &format!("{path}/schema"), diagnostics));

    let other: Vec<&str> = r.content.keys().map(String::as_str).filter(|key| Some(*key) != primary_key).collect();
    if !other.is_empty() {
        Diagnostic::UnsupportedConstruct {
            path: path.to_string(),
            reason: format!("response content types {other:?} have no Swagger 2.0 equivalent and were dropped"),
        }
        .record(diagnostics);
    }

    let headers = r
        .headers
        .iter()
        .map(|(name, p)| (name.clone(), downgrade_header(p, &format!("{path}/headers/{name}"), diagnostics)))
        .collect();

    Swagger2Response {
        description: r.description.clone(),
        schema,
        headers,
    }
}

fn downgrade_header(p: &Parameter, path: &str, diagnostics: &mut Vec<Diagnostic>) -> Swagger2Header {
    let schema = downgrade_schema_v2(&p.schema, path, diagnostics);
    Swagger2Header {
        description: p.description.clone(),
        schema_type: schema.schema_type,
        format: schema.format,
        items: schema.items,
    }
}

/// Reverse a `securitySchemes` entry onto `securityDefinitions` (§4.F).
/// `http`/`basic` maps straight back; `oauth2` with more than one flow
/// splits into one scheme per flow, named `{name}_{flow}` deterministically
/// in the fixed order implicit, accessCode, password, application; schemes
/// with no Swagger 2.0 equivalent (`http` schemes other than basic,
/// `openIdConnect`) are dropped with a diagnostic.
fn downgrade_security_scheme(name: &str, scheme: &SecurityScheme, diagnostics: &mut Vec<Diagnostic>) -> Vec<(String, Swagger2SecurityScheme)> {
    match scheme {
        SecurityScheme::Http { scheme: http_scheme, description, .. } if http_scheme == "basic" => {
            vec![(name.to_string(), blank_scheme("basic", description.clone()))]
        }
        SecurityScheme::Http { scheme: http_scheme, description: _, .. } => {
            Diagnostic::UnsupportedConstruct {
                path: format!("#/components/securitySchemes/{name}"),
                reason: format!("http scheme '{http_scheme}' has no Swagger 2.0 equivalent and was dropped"),
            }
            .record(diagnostics);
            Vec::new()
        }
        SecurityScheme::ApiKey { name: param_name, location, description } => {
            let mut mapped = blank_scheme("apiKey", description.clone());
            mapped.name = Some(param_name.clone());
            mapped.location = Some(super::location_to_str(*location).to_string());
            vec![(name.to_string(), mapped)]
        }
        SecurityScheme::Oauth2 { flows, description } => downgrade_oauth_flows(name, flows, description),
        SecurityScheme::OpenIdConnect { .. } => {
            Diagnostic::UnsupportedConstruct {
                path: format!("#/components/securitySchemes/{name}"),
                reason: "openIdConnect has no Swagger 2.0 equivalent and was dropped".to_string(),
            }
            .record(diagnostics);
            Vec::new()
        }
    }
}

fn blank_scheme(scheme_type: &str, description: Option<String>) -> Swagger2SecurityScheme {
    Swagger2SecurityScheme {
        scheme_type: scheme_type.to_string(),
        description,
        name: None,
        location: None,
        flow: None,
        authorization_url: None,
        token_url: None,
        scopes: BTreeMap::new(),
    }
}

fn downgrade_oauth_flows(name: &str, flows: &OauthFlows, description: &Option<String>) -> Vec<(String, Swagger2SecurityScheme)> {
    let entries: [(&str, &Option<OauthFlow>); 4] = [
        ("implicit", &flows.implicit),
        ("accessCode", &flows.authorization_code),
        ("password", &flows.password),
        ("application", &flows.client_credentials),
    ];
    let present: Vec<(&str, &OauthFlow)> = entries.iter().filter_map(|(key, flow)| flow.as_ref().map(|f| (*key, f))).collect();
    let split = present.len() > 1;
    present
        .into_iter()
        .map(|(flow_name, flow)| {
            let key = if split { format!("{name}_{flow_name}") } else { name.to_string() };
            let mut mapped = blank_scheme("oauth2", description.clone());
            mapped.flow = Some(flow_name.to_string());
            mapped.authorization_url = flow.authorization_url.clone();
            mapped.token_url = flow.token_url.clone();
            mapped.scopes = flow.scopes.clone();
            (key, mapped)
        })
        .collect()
}

fn rewrite_ref(ref_path: &str) -> String {
    ref_path
        .strip_prefix("#/components/schemas/")
        .map(|name| format!("#/definitions/{name}"))
        .unwrap_or_else(|| ref_path.to_string())
}

fn apply_attributes(target: &mut Swagger2Schema, attrs: &SchemaAttributes) {
    target.title = attrs.title.clone();
    target.description = attrs.description.clone();
    target.deprecated = attrs.deprecated;
    target.extensions = attrs.extensions.clone();
}

fn has_no_attributes(s: &Swagger2Schema) -> bool {
    s.title.is_none() && s.description.is_none() && s.deprecated.is_none() && s.extensions.is_empty()
}

fn numeric_to_swagger2(type_name: &str, n: &NumericSchema) -> Swagger2Schema {
    let mut out = Swagger2Schema {
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

/// Render an emended [`Schema`] as a Swagger 2.0 JSON Schema fragment
/// (§4.F): `oneOf`/`nullable` become the `x-oneOf`/`x-nullable` vendor
/// extensions Swagger 2.0 has no native support for.
pub(crate) fn downgrade_schema_v2(schema: &Schema, path: &str, diagnostics: &mut Vec<Diagnostic>) -> Swagger2Schema {
    match schema {
        Schema::Constant(c) => {
            let mut out = Swagger2Schema {
                schema_type: super::infer_primitive_type(&c.value).map(str::to_string),
                enum_values: Some(vec![c.value.clone()]),
                ..Default::default()
            };
            apply_attributes(&mut out, &c.attributes);
            out
        }
        Schema::Boolean(b) => {
            let mut out = Swagger2Schema {
                schema_type: Some("boolean".to_string()),
                ..Default::default()
            };
            apply_attributes(&mut out, &b.attributes);
            out
        }
        Schema::Integer(n) => numeric_to_swagger2("integer", n),
        Schema::Number(n) => numeric_to_swagger2("number", n),
        Schema::String(s) => {
            let mut out = Swagger2Schema {
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
            let mut out = Swagger2Schema {
                schema_type: Some("array".to_string()),
                items: Some(Box::new(downgrade_schema_v2(&a.items, &format!("{path}/items"), diagnostics))),
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
                reason: "tuple (prefixItems) downgraded to an array of x-oneOf items; fixed per-position typing is lost".to_string(),
            }
            .record(diagnostics);
            let branches: Vec<Swagger2Schema> = t
                .prefix_items
                .iter()
                .enumerate()
                .map(|(i, s)| downgrade_schema_v2(s, &format!("{path}/prefixItems/{i}"), diagnostics))
                .collect();
            let n = t.prefix_items.len() as u64;
            let mut out = Swagger2Schema {
                schema_type: Some("array".to_string()),
                items: Some(Box::new(Swagger2Schema {
                    x_one_of: Some(branches),
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
            let mut out = Swagger2Schema {
                schema_type: Some("object".to_string()),
                properties: o
                    .properties
                    .iter()
                    .map(|(name, s)| (name.clone(), downgrade_schema_v2(s, &format!("{path}/properties/{name}"), diagnostics)))
                    .collect(),
                required: o.required.clone(),
                additional_properties: Some(match &o.additional_properties {
                    SchemaOrBool::Bool(b) => BoolOrSchema::Bool(*b),
                    SchemaOrBool::Schema(s) => BoolOrSchema::Schema(Box::new(downgrade_schema_v2(s, &format!("{path}/additionalProperties"), diagnostics))),
                }),
                ..Default::default()
            };
            apply_attributes(&mut out, &o.attributes);
            out
        }
        Schema::Reference(r) => {
            let mut out = Swagger2Schema {
                ref_path: Some(rewrite_ref(&r.ref_path)),
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
                let mut out = Swagger2Schema {
                    x_nullable: Some(true),
                    ..Default::default()
                };
                apply_attributes(&mut out, &o.attributes);
                return out;
            }
            if remaining.len() == 1 {
                let mut out = downgrade_schema_v2(remaining[0], path, diagnostics);
                if has_null {
                    out.x_nullable = Some(true);
                }
                if has_no_attributes(&out) {
                    apply_attributes(&mut out, &o.attributes);
                    if has_null {
                        out.x_nullable = Some(true);
                    }
                }
                return out;
            }
            let branches = remaining
                .iter()
                .enumerate()
                .map(|(i, b)| downgrade_schema_v2(b, &format!("{path}/x-oneOf/{i}"), diagnostics))
                .collect();
            let mut out = Swagger2Schema {
                x_one_of: Some(branches),
                x_nullable: if has_null { Some(true) } else { None },
                ..Default::default()
            };
            apply_attributes(&mut out, &o.attributes);
            out
        }
        Schema::Null(n) => {
            let mut out = Swagger2Schema {
                x_nullable: Some(true),
                ..Default::default()
            };
            apply_attributes(&mut out, &n.attributes);
            out
        }
        Schema::Unknown(u) => {
            let mut out = Swagger2Schema::default();
            apply_attributes(&mut out, &u.attributes);
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::emended::{ConstantSchema, NullSchema, OneOfSchema, StringSchema};
    use pretty_assertions::assert_eq;

    #[test]
    fn ref_is_rewritten_to_definitions() {
        let schema = Schema::Reference(crate::model::emended::ReferenceSchema {
            ref_path: "#/components/schemas/Pet".to_string(),
            attributes: SchemaAttributes::default(),
        });
        let mut diagnostics = Vec::new();
        let out = downgrade_schema_v2(&schema, "#", &mut diagnostics);
        assert_eq!(out.ref_path.as_deref(), Some("#/definitions/Pet"));
    }

    #[test]
    fn one_of_with_null_becomes_x_nullable() {
        let schema = Schema::OneOf(OneOfSchema {
            branches: vec![Schema::String(StringSchema::default()), Schema::Null(NullSchema::default())],
            attributes: SchemaAttributes::default(),
        });
        let mut diagnostics = Vec::new();
        let out = downgrade_schema_v2(&schema, "#", &mut diagnostics);
        assert_eq!(out.schema_type.as_deref(), Some("string"));
        assert_eq!(out.x_nullable, Some(true));
    }

    #[test]
    fn request_body_flattens_into_a_body_parameter() {
        let mut content = ContentMap::new();
        content.insert(
            "application/json".to_string(),
            crate::model::emended::MediaType {
                schema: Schema::Constant(ConstantSchema {
                    value: serde_json::json!("x"),
                    attributes: SchemaAttributes::default(),
                }),
            },
        );
        let rb = RequestBody {
            description: None,
            required: true,
            content,
            encrypted: None,
        };
        let mut diagnostics = Vec::new();
        let param = downgrade_request_body(&rb, "#/paths/~1pets/post", &mut diagnostics);
        assert_eq!(param.location, "body");
        assert!(param.schema.is_some());
    }

    #[test]
    fn oauth2_with_multiple_flows_splits_into_separate_schemes() {
        let flows = OauthFlows {
            implicit: Some(OauthFlow::default()),
            password: Some(OauthFlow::default()),
            client_credentials: None,
            authorization_code: None,
        };
        let mut diagnostics = Vec::new();
        let entries = downgrade_security_scheme(
            "oauth",
            &SecurityScheme::Oauth2 { flows, description: None },
            &mut diagnostics,
        );
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().any(|(name, _)| name == "oauth_implicit"));
        assert!(entries.iter().any(|(name, _)| name == "oauth_password"));
    }
}
