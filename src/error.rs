//! Error and diagnostic types for the conversion pipeline (§7).
//!
//! [`Error`] is the single hard-failure type — an unrecognized version is
//! the only way `convert`/`downgrade` fail outright (§6, §7.G): neither an
//! unclassifiable input document nor an unrecognized downgrade target tag
//! is its own failure class, both are the same "version wasn't one of the
//! ones this pipeline knows" event. Every other event in the taxonomy
//! (dangling reference, malformed operation, unsupported construct,
//! unknown security scheme) is non-fatal and accumulates into a
//! [`Diagnostic`] list returned alongside the output, following the
//! teacher's `ConversionResult { schema, errors }` shape.

use std::fmt;

/// The one hard-failure type raised by [`crate::convert`] and
/// [`crate::downgrade`] — exactly one fallible variant family (§7.G).
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Either the top-level document could not be classified as Swagger
    /// 2.0, OpenAPI 3.0, OpenAPI 3.1, or already-emended (§4.A), or
    /// `downgrade` was asked for a target other than `"2.0"`/`"3.0"`.
    #[error("unrecognized version ({context}): {detail}")]
    UnrecognizedVersion {
        /// Where the classification was attempted, e.g. `"convert"` or
        /// `"downgrade"`.
        context: &'static str,
        /// What about the version tag didn't match, e.g. the unparseable
        /// input shape or the caller-supplied target string.
        detail: String,
    },
}

/// Convenience alias used throughout the conversion pipeline's public API.
pub type Result<T> = std::result::Result<T, Error>;

/// A non-fatal event recorded during conversion (§7 items 2–5). Every
/// `Diagnostic` is also emitted via [`tracing::warn!`] at the point it is
/// created (§2.G), so callers can observe them through either channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A `$ref` pointed outside `#/definitions/`/`#/components/...`, or to
    /// a missing entry. Policy: emitted verbatim; downstream resolves it.
    DanglingReference { path: String, target: String },

    /// A Swagger-2.0 operation carried more than one `in: body` parameter.
    /// The operation is omitted from the upgraded document.
    MalformedOperation {
        operation_id: String,
        reason: String,
    },

    /// A construct the emended dialect — or, during downgrade, the target
    /// dialect — cannot faithfully express. The output is annotated with
    /// an `x-*` extension instead of failing.
    UnsupportedConstruct { path: String, reason: String },

    /// A security scheme type this implementation does not recognize was
    /// dropped from the output.
    UnknownSecurityScheme { name: String },
}

impl Diagnostic {
    /// Record the diagnostic into `sink` and emit it via `tracing::warn!`
    /// (§2.G, §7.G).
    pub fn record(self, sink: &mut Vec<Diagnostic>) {
        tracing::warn!(diagnostic = %self, "non-fatal conversion event");
        sink.push(self);
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::DanglingReference { path, target } => {
                write!(f, "{path}: dangling reference to '{target}'")
            }
            Diagnostic::MalformedOperation {
                operation_id,
                reason,
            } => write!(f, "operation '{operation_id}' dropped: {reason}"),
            Diagnostic::UnsupportedConstruct { path, reason } => {
                write!(f, "{path}: unsupported construct: {reason}")
            }
            Diagnostic::UnknownSecurityScheme { name } => {
                write!(f, "security scheme '{name}' dropped: unrecognized type")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_is_send_sync() {
        const fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }

    #[test]
    fn diagnostic_record_pushes_into_sink() {
        let mut sink = Vec::new();
        Diagnostic::UnknownSecurityScheme {
            name: "weird".to_string(),
        }
        .record(&mut sink);
        assert_eq!(sink.len(), 1);
    }
}
