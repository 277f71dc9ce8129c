//! Downgraders (§4.E, §4.F): turn an [`EmendedDocument`] back into an
//! OpenAPI 3.0 or Swagger 2.0 JSON tree.
//!
//! Unlike upgrade, downgrade operates on the already-materialized typed
//! [`EmendedDocument`] (the output of [`crate::upgrade::upgrade`]), not on
//! raw JSON — there is nothing left to sniff or dereference; every
//! component reference in the input was already resolved during upgrade.

pub mod oas30;
pub mod swagger2;

use crate::error::{Diagnostic, Error, Result};
use crate::model::emended::{EmendedDocument, ParameterLocation};
use serde_json::Value;

/// Downgrade `doc` to `target` (`"3.0"` or `"2.0"`), returning the rendered
/// JSON tree alongside any non-fatal diagnostics recorded along the way.
pub fn downgrade(doc: &EmendedDocument, target: &str) -> Result<(Value, Vec<Diagnostic>)> {
    let mut diagnostics = Vec::new();
    let value = match target {
        "3.0" => serde_json::to_value(oas30::downgrade(doc, &mut diagnostics))
            .expect("Oas30Document always serializes"),
        "2.0" => serde_json::to_value(swagger2::downgrade(doc, &mut diagnostics))
            .expect("Swagger2Document always serializes"),
        other => {
            return Err(Error::UnrecognizedVersion {
                context: "downgrade",
                detail: format!("target '{other}' is not \"2.0\" or \"3.0\""),
            })
        }
    };
    Ok((value, diagnostics))
}

pub(crate) fn location_to_str(location: ParameterLocation) -> &'static str {
    match location {
        ParameterLocation::Path => "path",
        ParameterLocation::Query => "query",
        ParameterLocation::Header => "header",
        ParameterLocation::Cookie => "cookie",
    }
}

/// `"null"`, `"boolean"`, `"integer"`/`"number"`, `"string"`, `"array"`, or
/// `"object"`, inferred from a constant's JSON value (§4.E `Constant` →
/// `enum` transformation).
pub(crate) fn infer_primitive_type(value: &Value) -> Option<&'static str> {
    match value {
        Value::Null => None,
        Value::Bool(_) => Some("boolean"),
        Value::Number(n) if n.is_i64() || n.is_u64() => Some("integer"),
        Value::Number(_) => Some("number"),
        Value::String(_) => Some("string"),
        Value::Array(_) => Some("array"),
        Value::Object(_) => Some("object"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_target_is_an_error() {
        let doc = EmendedDocument::new("3.1.0");
        let err = downgrade(&doc, "1.0").unwrap_err();
        assert!(matches!(err, Error::UnrecognizedVersion { context: "downgrade", .. }));
    }
}
