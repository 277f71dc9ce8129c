//! OpenAPI 3.0 → emended schema translation.
//!
//! `oneOf`/`anyOf`/`allOf`/`nullable` are first-class here, unlike Swagger
//! 2.0's vendor-extension workarounds — this module is the simplest of the
//! three dialect translators as a result.

use crate::error::Diagnostic;
use crate::model::common::BoolOrSchema;
use crate::model::emended::{Schema, SchemaAttributes, SchemaOrBool};
use crate::model::schema_v30::Oas30Schema;
use crate::normalize::{finalize, NumericFacets, RawView, StringFacets};

pub fn normalize(schema: &Oas30Schema, path: &str, diagnostics: &mut Vec<Diagnostic>) -> Schema {
    let view = RawView {
        ref_path: schema.ref_path.clone(),
        const_value: None,
        enum_values: schema.enum_values.clone(),
        nullable: schema.nullable.unwrap_or(false),
        one_of: normalize_list(schema.one_of.as_deref(), path, "oneOf", diagnostics),
        any_of: normalize_list(schema.any_of.as_deref(), path, "anyOf", diagnostics),
        all_of: normalize_list(schema.all_of.as_deref(), path, "allOf", diagnostics),
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
    schemas: Option<&[Oas30Schema]>,
    path: &str,
    keyword: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<Schema> {
    schemas
        .unwrap_or_default()
        .iter()
        .enumerate()
        .map(|(i, child)| normalize(child, &format!("{path}.{keyword}[{i}]"), diagnostics))
        .collect()
}

fn normalize_gate(gate: &BoolOrSchema<Oas30Schema>, path: &str, diagnostics: &mut Vec<Diagnostic>) -> SchemaOrBool {
    match gate {
        BoolOrSchema::Bool(b) => SchemaOrBool::Bool(*b),
        BoolOrSchema::Schema(schema) => SchemaOrBool::Schema(Box::new(normalize(schema, path, diagnostics))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn nullable_combines_with_one_of() {
        let schema: Oas30Schema = serde_json::from_value(serde_json::json!({
            "nullable": true,
            "oneOf": [{"type": "string"}, {"type": "integer"}],
        }))
        .unwrap();
        let mut diagnostics = Vec::new();
        let result = normalize(&schema, "#/components/schemas/Thing", &mut diagnostics);
        match result {
            Schema::OneOf(one_of) => assert_eq!(one_of.branches.len(), 3),
            other => panic!("expected oneOf, got {other:?}"),
        }
    }

    #[test]
    fn all_of_merges_object_branches() {
        let schema: Oas30Schema = serde_json::from_value(serde_json::json!({
            "allOf": [
                {"type": "object", "properties": {"a": {"type": "string"}}},
                {"type": "object", "properties": {"b": {"type": "integer"}}, "required": ["b"]},
            ],
        }))
        .unwrap();
        let mut diagnostics = Vec::new();
        let result = normalize(&schema, "#/components/schemas/Merged", &mut diagnostics);
        assert!(diagnostics.is_empty());
        match result {
            Schema::Object(obj) => {
                assert_eq!(obj.properties.len(), 2);
                assert_eq!(obj.required, vec!["b".to_string()]);
            }
            other => panic!("expected object, got {other:?}"),
        }
    }

    #[test]
    fn all_of_is_left_biased_on_colliding_property_names() {
        let schema: Oas30Schema = serde_json::from_value(serde_json::json!({
            "allOf": [
                {"type": "object", "properties": {"name": {"type": "string"}}},
                {"type": "object", "properties": {"name": {"type": "integer"}}},
            ],
        }))
        .unwrap();
        let mut diagnostics = Vec::new();
        let result = normalize(&schema, "#/components/schemas/Merged", &mut diagnostics);
        match result {
            Schema::Object(obj) => {
                assert_eq!(obj.properties.len(), 1);
                assert!(matches!(obj.properties.get("name"), Some(Schema::String(_))));
            }
            other => panic!("expected object, got {other:?}"),
        }
    }
}
