//! Swagger 2.0 → emended schema translation.
//!
//! Swagger 2.0 has no native `nullable`/`oneOf`/`anyOf`; real documents
//! signal them with the `x-nullable`/`x-oneOf`/`x-anyOf` vendor keys, which
//! [`super::RawView`] treats the same as their 3.x first-class equivalents.

use crate::error::Diagnostic;
use crate::model::common::BoolOrSchema;
use crate::model::emended::{Schema, SchemaAttributes, SchemaOrBool};
use crate::model::schema_v2::Swagger2Schema;
use crate::normalize::{finalize, NumericFacets, RawView, StringFacets};

/// Normalize one Swagger 2.0 schema fragment at `path` into an emended
/// [`Schema`], recording any non-fatal issues into `diagnostics`.
pub fn normalize(schema: &Swagger2Schema, path: &str, diagnostics: &mut Vec<Diagnostic>) -> Schema {
    let view = RawView {
        ref_path: schema.ref_path.as_deref().map(rewrite_ref),
        const_value: None,
        enum_values: schema.enum_values.clone(),
        nullable: schema.x_nullable.unwrap_or(false),
        one_of: normalize_list(schema.x_one_of.as_deref(), path, diagnostics),
        any_of: normalize_list(schema.x_any_of.as_deref(), path, diagnostics),
        all_of: Vec::new(),
        type_candidates: schema.schema_type.clone().into_iter().collect(),
        properties: schema
            .properties
            .iter()
            .map(|(name, child)| {
                (
                    name.clone(),
                    normalize(child, &format!("{path}.properties.{name}"), diagnostics),
                )
            })
            .collect(),
        required: schema.required.clone(),
        additional_properties: schema
            .additional_properties
            .as_ref()
            .map(|gate| normalize_gate(gate, &format!("{path}.additionalProperties"), diagnostics)),
        items: schema
            .items
            .as_deref()
            .map(|child| normalize(child, &format!("{path}.items"), diagnostics)),
        prefix_items: None,
        additional_items: None,
        min_items: schema.min_items,
        max_items: schema.max_items,
        numeric: NumericFacets {
            format: schema.format.clone(),
            minimum: schema.minimum,
            maximum: schema.maximum,
            exclusive_minimum: schema.exclusive_minimum.unwrap_or(false),
            exclusive_maximum: schema.exclusive_maximum.unwrap_or(false),
            multiple_of: schema.multiple_of,
        },
        string: StringFacets {
            format: schema.format.clone(),
            min_length: schema.min_length,
            max_length: schema.max_length,
            pattern: schema.pattern.clone(),
        },
        attributes: SchemaAttributes {
            title: schema.title.clone(),
            description: schema.description.clone(),
            deprecated: schema.deprecated,
            extensions: schema.extensions.clone(),
        },
    };
    finalize(view, path, diagnostics)
}

fn normalize_list(
    schemas: Option<&[Swagger2Schema]>,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<Schema> {
    schemas
        .unwrap_or_default()
        .iter()
        .enumerate()
        .map(|(i, child)| normalize(child, &format!("{path}[{i}]"), diagnostics))
        .collect()
}

fn normalize_gate(
    gate: &BoolOrSchema<Swagger2Schema>,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> SchemaOrBool {
    match gate {
        BoolOrSchema::Bool(b) => SchemaOrBool::Bool(*b),
        BoolOrSchema::Schema(schema) => SchemaOrBool::Schema(Box::new(normalize(schema, path, diagnostics))),
    }
}

/// `#/definitions/X` → `#/components/schemas/X` (§4.C.2). The inverse of
/// `downgrade::swagger2`'s own `rewrite_ref`.
fn rewrite_ref(ref_path: &str) -> String {
    match ref_path.strip_prefix("#/definitions/") {
        Some(rest) => format!("#/components/schemas/{rest}"),
        None => ref_path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn plain_object_normalizes_straight_through() {
        let schema: Swagger2Schema = serde_json::from_value(serde_json::json!({
            "type": "object",
            "properties": {"name": {"type": "string"}},
            "required": ["name"],
        }))
        .unwrap();
        let mut diagnostics = Vec::new();
        let result = normalize(&schema, "#/definitions/Pet", &mut diagnostics);
        assert!(diagnostics.is_empty());
        match result {
            Schema::Object(obj) => {
                assert_eq!(obj.required, vec!["name".to_string()]);
                assert!(matches!(obj.properties.get("name"), Some(Schema::String(_))));
            }
            other => panic!("expected object, got {other:?}"),
        }
    }

    #[test]
    fn x_nullable_adds_null_member() {
        let schema: Swagger2Schema = serde_json::from_value(serde_json::json!({
            "type": "string",
            "x-nullable": true,
        }))
        .unwrap();
        let mut diagnostics = Vec::new();
        let result = normalize(&schema, "#/definitions/Name", &mut diagnostics);
        match result {
            Schema::OneOf(one_of) => {
                assert_eq!(one_of.branches.len(), 2);
                assert!(one_of.branches.iter().any(|b| matches!(b, Schema::Null(_))));
                assert!(one_of.branches.iter().any(|b| matches!(b, Schema::String(_))));
            }
            other => panic!("expected oneOf, got {other:?}"),
        }
    }

    #[test]
    fn properites_typo_is_tolerated_as_properties() {
        let schema: Swagger2Schema = serde_json::from_value(serde_json::json!({
            "type": "object",
            "properites": {"name": {"type": "string"}},
        }))
        .unwrap();
        let mut diagnostics = Vec::new();
        let result = normalize(&schema, "#/definitions/Typo", &mut diagnostics);
        match result {
            Schema::Object(obj) => {
                assert_eq!(obj.properties.len(), 1);
                assert!(matches!(obj.properties.get("name"), Some(Schema::String(_))));
            }
            other => panic!("expected object, got {other:?}"),
        }
    }

    #[test]
    fn definitions_ref_is_rewritten_to_components() {
        let schema: Swagger2Schema = serde_json::from_value(serde_json::json!({
            "$ref": "#/definitions/Pet",
        }))
        .unwrap();
        let mut diagnostics = Vec::new();
        let result = normalize(&schema, "#/definitions/Wrapper", &mut diagnostics);
        match result {
            Schema::Reference(r) => assert_eq!(r.ref_path, "#/components/schemas/Pet"),
            other => panic!("expected a reference, got {other:?}"),
        }
    }

    #[test]
    fn enum_fans_out_into_constants() {
        let schema: Swagger2Schema = serde_json::from_value(serde_json::json!({
            "type": "string",
            "enum": ["a", "b", "c"],
        }))
        .unwrap();
        let mut diagnostics = Vec::new();
        let result = normalize(&schema, "#/definitions/Kind", &mut diagnostics);
        match result {
            Schema::OneOf(one_of) => assert_eq!(one_of.branches.len(), 3),
            other => panic!("expected oneOf, got {other:?}"),
        }
    }
}
