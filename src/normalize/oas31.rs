//! OpenAPI 3.1 (JSON Schema draft 2020-12) → emended schema translation.
//!
//! The one dialect where `type` can be an array, `exclusiveMinimum`/
//! `exclusiveMaximum` are numbers rather than boolean gates, and tuple
//! validation is spelled `prefixItems` rather than an array-shaped `items`.

use crate::error::Diagnostic;
use crate::model::common::BoolOrSchema;
use crate::model::emended::{Schema, SchemaAttributes, SchemaOrBool};
use crate::model::schema_v31::{ItemsField, Oas31Schema, TypeField};
use crate::normalize::{finalize, NumericFacets, RawView, StringFacets};

pub fn normalize(schema: &Oas31Schema, path: &str, diagnostics: &mut Vec<Diagnostic>) -> Schema {
    let ref_path = schema.ref_path.clone().or_else(|| {
        schema.recursive_ref.clone().inspect(|_| {
            Diagnostic::UnsupportedConstruct {
                path: path.to_string(),
                reason: "$recursiveRef treated as a plain $ref; dynamic anchor resolution is not modeled"
                    .to_string(),
            }
            .record(diagnostics);
        })
    });

    let (prefix_items, additional_items) = normalize_items(schema, path, diagnostics);

    let view = RawView {
        ref_path,
        const_value: schema.const_value.clone(),
        enum_values: schema.enum_values.clone(),
        nullable: false,
        one_of: normalize_list(schema.one_of.as_deref(), path, "oneOf", diagnostics),
        any_of: normalize_list(schema.any_of.as_deref(), path, "anyOf", diagnostics),
        all_of: normalize_list(schema.all_of.as_deref(), path, "allOf", diagnostics),
        type_candidates: schema
            .schema_type
            .as_ref()
            .map(|t| t.as_slice().into_iter().map(str::to_string).collect())
            .unwrap_or_default(),
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
        items: prefix_items
            .is_none()
            .then(|| normalize_single_items(schema, path, diagnostics))
            .flatten(),
        prefix_items,
        additional_items,
        min_items: schema.min_items,
        max_items: schema.max_items,
        numeric: NumericFacets {
            format: schema.format.clone(),
            minimum: schema.exclusive_minimum.or(schema.minimum),
            maximum: schema.exclusive_maximum.or(schema.maximum),
            exclusive_minimum: schema.exclusive_minimum.is_some(),
            exclusive_maximum: schema.exclusive_maximum.is_some(),
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

/// Resolve `items`/`prefixItems` into `(prefix_items, additional_items)`.
/// An explicit `prefixItems` always wins; `items` as a legacy tuple array is
/// treated the same way when `prefixItems` is absent (§9 edge case).
fn normalize_items(
    schema: &Oas31Schema,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> (Option<Vec<Schema>>, Option<SchemaOrBool>) {
    if let Some(prefix_items) = &schema.prefix_items {
        if matches!(schema.items, Some(ItemsField::Tuple(_))) {
            Diagnostic::UnsupportedConstruct {
                path: path.to_string(),
                reason: "both prefixItems and a tuple-form items were present; prefixItems won".to_string(),
            }
            .record(diagnostics);
        }
        let normalized = prefix_items
            .iter()
            .enumerate()
            .map(|(i, child)| normalize(child, &format!("{path}.prefixItems[{i}]"), diagnostics))
            .collect();
        let additional_items = schema
            .additional_items
            .as_ref()
            .map(|gate| normalize_gate(gate, &format!("{path}.additionalItems"), diagnostics));
        return (Some(normalized), additional_items);
    }

    if let Some(ItemsField::Tuple(items)) = &schema.items {
        let normalized = items
            .iter()
            .enumerate()
            .map(|(i, child)| normalize(child, &format!("{path}.items[{i}]"), diagnostics))
            .collect();
        return (Some(normalized), Some(SchemaOrBool::Bool(false)));
    }

    (None, None)
}

fn normalize_single_items(schema: &Oas31Schema, path: &str, diagnostics: &mut Vec<Diagnostic>) -> Option<Schema> {
    match &schema.items {
        Some(ItemsField::Single(item)) => Some(normalize(item, &format!("{path}.items"), diagnostics)),
        _ => None,
    }
}

fn normalize_list(
    schemas: Option<&[Oas31Schema]>,
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

fn normalize_gate(gate: &BoolOrSchema<Oas31Schema>, path: &str, diagnostics: &mut Vec<Diagnostic>) -> SchemaOrBool {
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
    fn type_array_expands_into_union() {
        let schema: Oas31Schema = serde_json::from_value(serde_json::json!({
            "type": ["string", "null"],
        }))
        .unwrap();
        let mut diagnostics = Vec::new();
        let result = normalize(&schema, "#/components/schemas/Name", &mut diagnostics);
        match result {
            Schema::OneOf(one_of) => {
                assert_eq!(one_of.branches.len(), 2);
                assert!(one_of.branches.iter().any(|b| matches!(b, Schema::Null(_))));
            }
            other => panic!("expected oneOf, got {other:?}"),
        }
    }

    #[test]
    fn prefix_items_becomes_tuple() {
        let schema: Oas31Schema = serde_json::from_value(serde_json::json!({
            "type": "array",
            "prefixItems": [{"type": "string"}, {"type": "integer"}],
            "additionalItems": false,
        }))
        .unwrap();
        let mut diagnostics = Vec::new();
        let result = normalize(&schema, "#/components/schemas/Pair", &mut diagnostics);
        match result {
            Schema::Tuple(tuple) => {
                assert_eq!(tuple.prefix_items.len(), 2);
                assert!(matches!(tuple.additional_items, SchemaOrBool::Bool(false)));
            }
            other => panic!("expected tuple, got {other:?}"),
        }
    }

    #[test]
    fn const_discards_type() {
        let schema: Oas31Schema = serde_json::from_value(serde_json::json!({
            "type": "string",
            "const": "fixed",
        }))
        .unwrap();
        let mut diagnostics = Vec::new();
        let result = normalize(&schema, "#/components/schemas/Fixed", &mut diagnostics);
        match result {
            Schema::Constant(c) => assert_eq!(c.value, serde_json::json!("fixed")),
            other => panic!("expected constant, got {other:?}"),
        }
    }
}
