//! # oaemend
//!
//! Normalizes Swagger 2.0, OpenAPI 3.0, and OpenAPI 3.1 documents into a
//! single emended OpenAPI 3.1 dialect, and downgrades an emended document
//! back to OpenAPI 3.0 or Swagger 2.0.
//!
//! The crate is a pure, synchronous transformation over generic JSON trees:
//! [`sniff`] classifies an input document's version, [`convert`] upgrades it
//! into the emended dialect, and [`downgrade`] renders an emended document
//! back into an older grammar. File I/O and JSON text (de)serialization are
//! left to callers — see `src/bin/oaemend.rs` for the reference CLI.
//!
//! ## Modules
//!
//! - [`sniff`] - version classification (§4.A)
//! - [`model`] - the source and emended grammars (§4.B)
//! - [`normalize`] - schema-level normalization into the emended dialect (§4.C)
//! - [`upgrade`] - document-level upgrade into the emended dialect (§4.D)
//! - [`downgrade`] - document-level downgrade to OpenAPI 3.0 / Swagger 2.0 (§4.E, §4.F)
//! - [`error`] - the hard-failure [`error::Error`] type and non-fatal [`error::Diagnostic`] events (§7)

pub mod downgrade;
pub mod error;
pub mod model;
pub mod normalize;
pub mod sniff;
pub mod upgrade;

use error::{Diagnostic, Result};
use model::EmendedDocument;
use serde_json::Value;

/// Classify `value` and upgrade it into the emended OpenAPI 3.1 dialect
/// (§4.A–§4.D). Accepts Swagger 2.0, OpenAPI 3.0, OpenAPI 3.1, or an
/// already-emended document; idempotent on the last of those. Fails only
/// when the document cannot be classified at all.
pub fn convert(value: &Value) -> Result<(EmendedDocument, Vec<Diagnostic>)> {
    upgrade::upgrade(value)
}

/// Render an emended document back into `target` (`"2.0"` or `"3.0"`)
/// (§4.E, §4.F).
pub fn downgrade(doc: &EmendedDocument, target: &str) -> Result<(Value, Vec<Diagnostic>)> {
    downgrade::downgrade(doc, target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    fn swagger2_sample() -> Value {
        serde_json::json!({
            "swagger": "2.0",
            "info": {"title": "Pet Store", "version": "1.0.0"},
            "host": "api.example.com",
            "basePath": "/v1",
            "schemes": ["https"],
            "definitions": {
                "Pet": {
                    "type": "object",
                    "properties": {
                        "name": {"type": "string"},
                        "status": {"type": "string", "enum": ["available", "sold"]}
                    },
                    "required": ["name"]
                }
            },
            "paths": {
                "/pets": {
                    "post": {
                        "operationId": "createPet",
                        "parameters": [
                            {"name": "body", "in": "body", "required": true, "schema": {"$ref": "#/definitions/Pet"}}
                        ],
                        "responses": {
                            "201": {"description": "created", "schema": {"$ref": "#/definitions/Pet"}}
                        }
                    }
                }
            }
        })
    }

    fn oas30_sample() -> Value {
        serde_json::json!({
            "openapi": "3.0.3",
            "info": {"title": "Demo", "version": "1.0.0"},
            "components": {
                "schemas": {
                    "Nickname": {"type": "string", "nullable": true},
                    "Id": {"type": ["string", "integer"], "x-extra": "kept"}
                }
            },
            "paths": {}
        })
    }

    /// Walks `value` and fails if any key forbidden on emended output (§8 I2)
    /// is present anywhere in the tree.
    fn assert_no_forbidden_keys(value: &Value) {
        const FORBIDDEN: &[&str] = &["nullable", "anyOf", "allOf", "x-nullable", "x-oneOf", "x-anyOf", "$recursiveRef"];
        match value {
            Value::Object(map) => {
                for key in FORBIDDEN {
                    assert!(!map.contains_key(*key), "forbidden key '{key}' found in emended output: {value}");
                }
                if let Some(Value::Array(_)) = map.get("type") {
                    panic!("emended output must never carry a 'type' array: {value}");
                }
                for nested in map.values() {
                    assert_no_forbidden_keys(nested);
                }
            }
            Value::Array(items) => {
                for item in items {
                    assert_no_forbidden_keys(item);
                }
            }
            _ => {}
        }
    }

    /// Collects every `oneOf` array found anywhere in `value` and asserts
    /// none of its members is itself a `oneOf` (§8 I5).
    fn assert_one_of_never_nests(value: &Value) {
        if let Value::Object(map) = value {
            if let Some(Value::Array(branches)) = map.get("oneOf") {
                for branch in branches {
                    if let Value::Object(branch_map) = branch {
                        assert!(!branch_map.contains_key("oneOf"), "oneOf branch is itself a oneOf: {value}");
                    }
                }
            }
            for nested in map.values() {
                assert_one_of_never_nests(nested);
            }
        } else if let Value::Array(items) = value {
            for item in items {
                assert_one_of_never_nests(item);
            }
        }
    }

    fn operation_ids(value: &Value) -> BTreeSet<String> {
        let mut ids = BTreeSet::new();
        if let Some(paths) = value.get("paths").and_then(Value::as_object) {
            for item in paths.values() {
                let Some(item) = item.as_object() else { continue };
                for method in ["get", "post", "put", "delete", "options", "head", "patch", "trace"] {
                    if let Some(op_id) = item.get(method).and_then(|op| op.get("operationId")).and_then(Value::as_str) {
                        ids.insert(op_id.to_string());
                    }
                }
            }
        }
        ids
    }

    #[test]
    fn convert_is_idempotent() {
        let (first, _) = convert(&swagger2_sample()).unwrap();
        let reserialized = serde_json::to_value(&first).unwrap();
        let (second, diagnostics) = convert(&reserialized).unwrap();
        assert!(diagnostics.is_empty());
        assert_eq!(serde_json::to_value(&second).unwrap(), reserialized);
    }

    #[test]
    fn emended_output_carries_no_forbidden_constructs() {
        let (doc, _) = convert(&oas30_sample()).unwrap();
        let rendered = serde_json::to_value(&doc).unwrap();
        assert_no_forbidden_keys(&rendered);
        assert_eq!(rendered["x-samchon-emended"], serde_json::json!(true));
    }

    #[test]
    fn refs_always_point_into_components() {
        let (doc, _) = convert(&swagger2_sample()).unwrap();
        match doc.components.schemas.get("Pet") {
            Some(model::Schema::Object(_)) => {}
            other => panic!("expected Pet to normalize to an object, got {other:?}"),
        }
        let op = doc.paths.get("/pets").unwrap().get(model::HttpMethod::Post).unwrap();
        let body = op.request_body.as_ref().unwrap();
        match &body.content.get("application/json").unwrap().schema {
            model::Schema::Reference(r) => assert!(r.ref_path.starts_with("#/components/")),
            other => panic!("expected a reference, got {other:?}"),
        }
    }

    #[test]
    fn paths_carry_no_parameters_key() {
        let (doc, _) = convert(&swagger2_sample()).unwrap();
        let rendered = serde_json::to_value(&doc).unwrap();
        for path in rendered["paths"].as_object().unwrap().values() {
            assert!(path.get("parameters").is_none());
        }
    }

    #[test]
    fn one_of_never_nests() {
        let (doc, _) = convert(&oas30_sample()).unwrap();
        let rendered = serde_json::to_value(&doc).unwrap();
        assert_one_of_never_nests(&rendered);
    }

    #[test]
    fn downgrade_output_is_recognized_as_its_target_version() {
        let (doc, _) = convert(&swagger2_sample()).unwrap();
        let (rendered, _) = downgrade(&doc, "2.0").unwrap();
        assert_eq!(sniff::sniff(&rendered), Some(sniff::Version::Swagger2_0));

        let (oas30_doc, _) = convert(&oas30_sample()).unwrap();
        let (oas30_rendered, _) = downgrade(&oas30_doc, "3.0").unwrap();
        assert_eq!(sniff::sniff(&oas30_rendered), Some(sniff::Version::OpenApi3_0));
    }

    #[test]
    fn operation_ids_are_preserved() {
        let input = swagger2_sample();
        let (doc, _) = convert(&input).unwrap();
        let rendered = serde_json::to_value(&doc).unwrap();
        assert_eq!(operation_ids(&input), operation_ids(&rendered));
    }

    #[test]
    fn extension_keys_survive_conversion() {
        let (doc, _) = convert(&oas30_sample()).unwrap();
        match doc.components.schemas.get("Id") {
            Some(model::Schema::OneOf(one_of)) => {
                assert_eq!(one_of.attributes.extensions.get("x-extra"), Some(&serde_json::json!("kept")));
            }
            other => panic!("expected a oneOf union, got {other:?}"),
        }
    }
}
