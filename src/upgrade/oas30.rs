//! OpenAPI 3.0 document upgrade entry point (§4.D).

use serde_json::Value;

use crate::error::Diagnostic;
use crate::model::envelope::Oas3Document;
use crate::model::schema_v30::Oas30Schema;
use crate::model::emended::EmendedDocument;

use super::upgrade_oas3_envelope;

pub fn upgrade(value: &Value) -> (EmendedDocument, Vec<Diagnostic>) {
    let mut diagnostics = Vec::new();
    let doc: Oas3Document<Oas30Schema> = match serde_json::from_value(value.clone()) {
        Ok(doc) => doc,
        Err(err) => {
            Diagnostic::UnsupportedConstruct {
                path: "#".to_string(),
                reason: format!("document did not match the OpenAPI 3.0 envelope: {err}"),
            }
            .record(&mut diagnostics);
            Oas3Document::default()
        }
    };
    let emended = upgrade_oas3_envelope(&doc, &mut diagnostics);
    (emended, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use crate::model::emended::Schema;

    #[test]
    fn upgrades_a_minimal_document() {
        let value = serde_json::json!({
            "openapi": "3.0.3",
            "info": {"title": "Demo", "version": "1.0.0"},
            "components": {
                "schemas": {
                    "Pet": {"type": "object", "properties": {"name": {"type": "string"}}}
                }
            },
            "paths": {
                "/pets": {
                    "get": {
                        "operationId": "listPets",
                        "responses": {
                            "200": {
                                "description": "ok",
                                "content": {"application/json": {"schema": {"$ref": "#/components/schemas/Pet"}}}
                            }
                        }
                    }
                }
            }
        });
        let (doc, diagnostics) = upgrade(&value);
        assert!(diagnostics.is_empty());
        assert!(doc.emended_marker);
        assert!(matches!(doc.components.schemas.get("Pet"), Some(Schema::Object(_))));
        let op = doc.paths.get("/pets").unwrap().get(crate::model::emended::HttpMethod::Get).unwrap();
        assert_eq!(op.operation_id.as_deref(), Some("listPets"));
        let response = op.responses.get("200").unwrap();
        assert!(matches!(response.content.get("application/json").unwrap().schema, Schema::Reference(_)));
    }
}
