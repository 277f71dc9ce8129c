//! OpenAPI 3.1 document upgrade entry point (§4.D). Also serves
//! already-emended input, routed here by [`super::upgrade`] because the
//! emended dialect is valid 3.1 JSON Schema.

use serde_json::Value;

use crate::error::Diagnostic;
use crate::model::emended::EmendedDocument;
use crate::model::envelope::Oas3Document;
use crate::model::schema_v31::Oas31Schema;

use super::upgrade_oas3_envelope;

pub fn upgrade(value: &Value) -> (EmendedDocument, Vec<Diagnostic>) {
    let mut diagnostics = Vec::new();
    let doc: Oas3Document<Oas31Schema> = match serde_json::from_value(value.clone()) {
        Ok(doc) => doc,
        Err(err) => {
            Diagnostic::UnsupportedConstruct {
                path: "#".to_string(),
                reason: format!("document did not match the OpenAPI 3.1 envelope: {err}"),
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
    use crate::model::emended::Schema;
    use pretty_assertions::assert_eq;

    #[test]
    fn upgrades_a_type_array_schema() {
        let value = serde_json::json!({
            "openapi": "3.1.0",
            "info": {"title": "Demo", "version": "1.0.0"},
            "components": {
                "schemas": {
                    "Name": {"type": ["string", "null"]}
                }
            },
            "paths": {}
        });
        let (doc, diagnostics) = upgrade(&value);
        assert!(diagnostics.is_empty());
        match doc.components.schemas.get("Name") {
            Some(Schema::OneOf(one_of)) => assert_eq!(one_of.branches.len(), 2),
            other => panic!("expected oneOf, got {other:?}"),
        }
    }

    #[test]
    fn already_emended_input_is_idempotent() {
        let first = serde_json::json!({
            "openapi": "3.1.0",
            "info": {"title": "Demo", "version": "1.0.0"},
            "components": {"schemas": {"Id": {"type": "string"}}},
            "paths": {},
        });
        let (emended, _) = upgrade(&first);
        let reserialized = serde_json::to_value(&emended).unwrap();
        assert!(crate::sniff::is_emended(&reserialized));
        let (second, diagnostics) = upgrade(&reserialized);
        assert!(diagnostics.is_empty());
        assert_eq!(
            second.components.schemas.get("Id"),
            emended.components.schemas.get("Id")
        );
    }
}
