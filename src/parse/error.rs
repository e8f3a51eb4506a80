use thiserror::Error;

use super::parser::Clause;

/// Errors produced when parsing GRL text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("parse error: {reason}")]
    MalformedInput { reason: String },

    #[error("parse error: rule '{rule}' has no '{clause}' clause")]
    MissingClause { rule: String, clause: Clause },
}

impl ParseError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            reason: reason.into(),
        }
    }
}
