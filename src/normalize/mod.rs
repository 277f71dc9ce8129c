//! Schema normalizer (§4.C): source-grammar schemas in, a single emended
//! [`Schema`] out.
//!
//! The three source dialects disagree on surface syntax (`x-nullable` vs.
//! `nullable` vs. a `type` array, `x-oneOf` vs. `oneOf`, tuple-shaped
//! `items` vs. `prefixItems`...) but the union-accumulation and
//! base-type-dispatch rules that turn any of them into a [`Schema`] are the
//! same rules applied to differently-shaped inputs. Each dialect module
//! (`swagger2`, `oas30`, `oas31`) only has to translate its own schema into
//! a [`RawView`]; [`finalize`] carries the one shared decision procedure,
//! mirroring the way the teacher's converter shares `Atom`/`TypeRef`
//! construction across `schema_v2_to_atom`/`schema_v3_to_atom`.

pub mod oas30;
pub mod oas31;
pub mod swagger2;

use crate::error::Diagnostic;
use crate::model::emended::{
    ArraySchema, BooleanSchema, ConstantSchema, NullSchema, NumericSchema, ObjectSchema,
    OneOfSchema, ReferenceSchema, Schema, SchemaAttributes, SchemaOrBool, StringSchema,
    TupleSchema, UnknownSchema,
};
use serde_json::Value;
use std::collections::BTreeMap;

/// Numeric-keyword facets, dialect-neutral (§4.C.3).
#[derive(Debug, Clone, Default)]
pub(crate) struct NumericFacets {
    pub format: Option<String>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub exclusive_minimum: bool,
    pub exclusive_maximum: bool,
    pub multiple_of: Option<f64>,
}

/// String-keyword facets, dialect-neutral.
#[derive(Debug, Clone, Default)]
pub(crate) struct StringFacets {
    pub format: Option<String>,
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub pattern: Option<String>,
}

/// The dialect-neutral view a source schema is translated into before
/// [`finalize`] runs the shared union/allOf/base-dispatch procedure over it.
/// Every child schema referenced here (`one_of`, `properties`, `items`...)
/// has already been recursively normalized into a [`Schema`] by the calling
/// dialect module.
#[derive(Debug, Clone, Default)]
pub(crate) struct RawView {
    pub ref_path: Option<String>,
    pub const_value: Option<Value>,
    pub enum_values: Option<Vec<Value>>,
    pub nullable: bool,
    pub one_of: Vec<Schema>,
    pub any_of: Vec<Schema>,
    pub all_of: Vec<Schema>,
    /// The `type` keyword's value(s); empty means the keyword was absent.
    pub type_candidates: Vec<String>,
    pub properties: BTreeMap<String, Schema>,
    pub required: Vec<String>,
    pub additional_properties: Option<SchemaOrBool>,
    pub items: Option<Schema>,
    pub prefix_items: Option<Vec<Schema>>,
    pub additional_items: Option<SchemaOrBool>,
    pub min_items: Option<u64>,
    pub max_items: Option<u64>,
    pub numeric: NumericFacets,
    pub string: StringFacets,
    pub attributes: SchemaAttributes,
}

/// Run the shared decision procedure (§4.C.2–5) over a translated view.
pub(crate) fn finalize(mut view: RawView, path: &str, diagnostics: &mut Vec<Diagnostic>) -> Schema {
    // $ref short-circuits everything else: JSON Reference semantics treat
    // sibling keywords on a reference node as ignored by the resolving tool.
    if let Some(ref_path) = view.ref_path.take() {
        return Schema::Reference(ReferenceSchema {
            ref_path,
            attributes: view.attributes,
        });
    }

    // `const` discards `type` and any enumeration (§9 edge case).
    if let Some(value) = view.const_value.take() {
        return Schema::Constant(ConstantSchema {
            value,
            attributes: view.attributes,
        });
    }

    let mut members: Vec<Schema> = Vec::new();
    members.append(&mut view.one_of);
    members.append(&mut view.any_of);
    let explicit_union = !members.is_empty();

    let mut type_set = view.type_candidates.clone();
    if view.nullable && !type_set.iter().any(|t| t == "null") {
        type_set.push("null".to_string());
    }

    // A `type` array (or a `nullable` sibling) is itself a union over its
    // members. A lone `type` string is only promoted into the union when
    // something else (`oneOf`/`anyOf`) already forced one open — otherwise
    // it stays the plain base type, handled by the single-type fallback
    // below. `enum` is handled separately, after this, precisely so that a
    // bare `type: string` + `enum: [...]` doesn't get double-counted as
    // both the enum fan-out and a redundant string branch.
    match type_set.len() {
        0 => {}
        1 => {
            if explicit_union {
                members.push(base_for_type(&type_set[0], &view, path, diagnostics));
            }
        }
        _ => {
            for type_name in &type_set {
                members.push(base_for_type(type_name, &view, path, diagnostics));
            }
        }
    }

    // `enum` fans out into a union of constants (§4.C.4 seed scenario); a
    // single-valued enum with nothing else going on collapses straight to
    // a bare constant.
    if let Some(values) = view.enum_values.take() {
        if values.len() == 1 && members.is_empty() && view.all_of.is_empty() {
            return Schema::Constant(ConstantSchema {
                value: values.into_iter().next().unwrap(),
                attributes: view.attributes,
            });
        }
        members.extend(values.into_iter().map(|value| {
            Schema::Constant(ConstantSchema {
                value,
                attributes: SchemaAttributes::default(),
            })
        }));
    }

    if !view.all_of.is_empty() {
        let merged = merge_all_of(std::mem::take(&mut view.all_of), &view, path, diagnostics);
        if members.is_empty() && type_set.is_empty() {
            return merged;
        }
        members.push(merged);
    }

    if members.len() > 1 {
        return Schema::OneOf(OneOfSchema {
            branches: members,
            attributes: view.attributes,
        });
    }
    if members.len() == 1 {
        let mut only = members.pop().unwrap();
        if only.attributes().is_empty() {
            *only.attributes_mut() = view.attributes;
        }
        return only;
    }

    if type_set.len() == 1 {
        return base_for_type(&type_set[0], &view, path, diagnostics);
    }

    if !view.properties.is_empty() || view.additional_properties.is_some() || !view.required.is_empty() {
        return build_object(&view);
    }

    Schema::Unknown(UnknownSchema {
        attributes: view.attributes,
    })
}

/// Build the base schema variant for one concrete `type` keyword value,
/// reusing `view`'s facets (§4.C.3).
fn base_for_type(type_name: &str, view: &RawView, path: &str, diagnostics: &mut Vec<Diagnostic>) -> Schema {
    match type_name {
        "object" => build_object(view),
        "array" => build_array(view),
        "string" => Schema::String(StringSchema {
            format: view.string.format.clone(),
            min_length: view.string.min_length,
            max_length: view.string.max_length,
            pattern: view.string.pattern.clone(),
            attributes: SchemaAttributes::default(),
        }),
        "integer" => Schema::Integer(build_numeric(view)),
        "number" => Schema::Number(build_numeric(view)),
        "boolean" => Schema::Boolean(BooleanSchema::default()),
        "null" => Schema::Null(NullSchema::default()),
        other => {
            Diagnostic::UnsupportedConstruct {
                path: path.to_string(),
                reason: format!("unrecognized type keyword '{other}'"),
            }
            .record(diagnostics);
            Schema::Unknown(UnknownSchema::default())
        }
    }
}

fn build_numeric(view: &RawView) -> NumericSchema {
    NumericSchema {
        format: view.numeric.format.clone(),
        minimum: view.numeric.minimum,
        maximum: view.numeric.maximum,
        exclusive_minimum: view.numeric.exclusive_minimum,
        exclusive_maximum: view.numeric.exclusive_maximum,
        multiple_of: view.numeric.multiple_of,
        attributes: SchemaAttributes::default(),
    }
}

fn build_object(view: &RawView) -> Schema {
    Schema::Object(ObjectSchema {
        properties: view.properties.clone(),
        required: view.required.clone(),
        additional_properties: view.additional_properties.clone().unwrap_or_default(),
        attributes: SchemaAttributes::default(),
    })
}

fn build_array(view: &RawView) -> Schema {
    if let Some(prefix_items) = view.prefix_items.clone() {
        return Schema::Tuple(TupleSchema {
            prefix_items,
            additional_items: view.additional_items.clone().unwrap_or_default(),
            min_items: view.min_items,
            max_items: view.max_items,
            attributes: SchemaAttributes::default(),
        });
    }
    Schema::Array(ArraySchema {
        items: Box::new(
            view.items
                .clone()
                .unwrap_or_else(|| Schema::Unknown(UnknownSchema::default())),
        ),
        min_items: view.min_items,
        max_items: view.max_items,
        attributes: SchemaAttributes::default(),
    })
}

/// `allOf`: merge every object-shaped branch's properties/required/
/// additionalProperties into one [`ObjectSchema`]. A branch that doesn't
/// normalize to an object is recorded as [`Diagnostic::UnsupportedConstruct`]
/// and dropped from the merge — the emended dialect has no intersection
/// variant to represent a non-object `allOf` member precisely (§9 open
/// question, resolved in DESIGN.md).
fn merge_all_of(branches: Vec<Schema>, view: &RawView, path: &str, diagnostics: &mut Vec<Diagnostic>) -> Schema {
    let mut merged = ObjectSchema::default();
    for branch in branches {
        match branch {
            Schema::Object(obj) => {
                // Left-biased: the first branch to define a given property
                // name wins (§4.C.4).
                for (name, child) in obj.properties {
                    merged.properties.entry(name).or_insert(child);
                }
                for required in obj.required {
                    if !merged.required.contains(&required) {
                        merged.required.push(required);
                    }
                }
                merged.additional_properties =
                    combine_additional_properties(merged.additional_properties, obj.additional_properties);
            }
            other => {
                Diagnostic::UnsupportedConstruct {
                    path: path.to_string(),
                    reason: format!(
                        "allOf branch normalized to a non-object schema ({other:?}); dropped from the merge"
                    ),
                }
                .record(diagnostics);
            }
        }
    }
    // Sibling keywords alongside `allOf` win over the merged branches.
    merged.properties.extend(view.properties.clone());
    for required in &view.required {
        if !merged.required.contains(required) {
            merged.required.push(required.clone());
        }
    }
    if let Some(own) = &view.additional_properties {
        merged.additional_properties = own.clone();
    }
    Schema::Object(merged)
}

/// `false` is the most restrictive `additionalProperties` value and always
/// wins; otherwise the later branch wins.
fn combine_additional_properties(left: SchemaOrBool, right: SchemaOrBool) -> SchemaOrBool {
    if matches!(left, SchemaOrBool::Bool(false)) {
        left
    } else {
        right
    }
}
