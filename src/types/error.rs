use thiserror::Error;

use crate::codec::UnsupportedValueType;

/// Errors produced when rendering a structured rule as GRL text.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerateError {
    #[error("rule '{rule}': no {missing} defined")]
    MissingConditionsOrActions { rule: String, missing: &'static str },

    #[error("set-membership test used with empty list for field {field}")]
    EmptyCollection { field: String },

    #[error("no textual mapping registered for {kind} {identifier}")]
    UnmappedIdentifier {
        kind: &'static str,
        identifier: String,
    },

    #[error("rule {field} '{value}' cannot appear in a rule header: {reason}")]
    InvalidHeader {
        field: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("unsupported value for field {field}: {source}")]
    UnsupportedValueType {
        field: String,
        #[source]
        source: UnsupportedValueType,
    },
}
