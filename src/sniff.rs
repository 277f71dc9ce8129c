//! Version sniffer (§4.A): classify a generic JSON tree as one of the four
//! recognized document shapes before routing it into the matching
//! normalizer/upgrader pair.

use serde_json::Value;

/// The classification [`sniff`] assigns to a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Version {
    Swagger2_0,
    OpenApi3_0,
    OpenApi3_1,
    /// Already passed through upgrade (`x-samchon-emended: true`,
    /// `openapi` starting with `"3.1"`). `convert` routes this back
    /// through the OpenAPI 3.1 path rather than treating it specially —
    /// the emended dialect is a strict subset of valid 3.1 JSON Schema,
    /// so re-running the 3.1 upgrade is a structural no-op (§8 I1).
    Emended,
}

/// Classify `value` per the precedence order in §4.A. Returns `None` for
/// anything that doesn't match one of the four recognized shapes; callers
/// turn that into [`crate::Error::UnrecognizedVersion`].
pub fn sniff(value: &Value) -> Option<Version> {
    let object = value.as_object()?;

    let openapi = object.get("openapi").and_then(Value::as_str);

    let is_emended_marker = object
        .get("x-samchon-emended")
        .map(|v| v == &Value::Bool(true))
        .unwrap_or(false);

    if is_emended_marker && openapi.is_some_and(|v| v.starts_with("3.1")) {
        tracing::debug!("sniffed document as already-emended");
        return Some(Version::Emended);
    }

    if let Some(openapi) = openapi {
        if openapi.starts_with("3.1.") {
            tracing::debug!("sniffed document as OpenAPI 3.1");
            return Some(Version::OpenApi3_1);
        }
        if openapi.starts_with("3.0.") {
            tracing::debug!("sniffed document as OpenAPI 3.0");
            return Some(Version::OpenApi3_0);
        }
    }

    let swagger = object.get("swagger").and_then(Value::as_str);
    if swagger == Some("2.0") && (object.contains_key("definitions") || object.contains_key("paths")) {
        tracing::debug!("sniffed document as Swagger 2.0");
        return Some(Version::Swagger2_0);
    }

    None
}

pub fn is_swagger2(value: &Value) -> bool {
    sniff(value) == Some(Version::Swagger2_0)
}

pub fn is_openapi3_0(value: &Value) -> bool {
    sniff(value) == Some(Version::OpenApi3_0)
}

pub fn is_openapi3_1(value: &Value) -> bool {
    sniff(value) == Some(Version::OpenApi3_1)
}

pub fn is_emended(value: &Value) -> bool {
    sniff(value) == Some(Version::Emended)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn emended_marker_takes_precedence() {
        let value = json!({"openapi": "3.1.0", "x-samchon-emended": true});
        assert_eq!(sniff(&value), Some(Version::Emended));
    }

    #[test]
    fn emended_marker_without_3_1_prefix_is_not_emended() {
        let value = json!({"openapi": "3.0.3", "x-samchon-emended": true});
        assert_eq!(sniff(&value), Some(Version::OpenApi3_0));
    }

    #[test]
    fn sniffs_openapi_3_1() {
        assert_eq!(sniff(&json!({"openapi": "3.1.0"})), Some(Version::OpenApi3_1));
    }

    #[test]
    fn sniffs_openapi_3_0() {
        assert_eq!(sniff(&json!({"openapi": "3.0.3"})), Some(Version::OpenApi3_0));
    }

    #[test]
    fn sniffs_swagger_2_0_with_paths() {
        let value = json!({"swagger": "2.0", "paths": {}});
        assert_eq!(sniff(&value), Some(Version::Swagger2_0));
    }

    #[test]
    fn sniffs_swagger_2_0_with_definitions_only() {
        let value = json!({"swagger": "2.0", "definitions": {}});
        assert_eq!(sniff(&value), Some(Version::Swagger2_0));
    }

    #[test]
    fn swagger_2_0_without_paths_or_definitions_is_unrecognized() {
        let value = json!({"swagger": "2.0", "info": {}});
        assert_eq!(sniff(&value), None);
    }

    #[test]
    fn unrecognized_value_returns_none() {
        assert_eq!(sniff(&json!({"foo": "bar"})), None);
        assert_eq!(sniff(&json!([1, 2, 3])), None);
        assert_eq!(sniff(&Value::Null), None);
    }
}
