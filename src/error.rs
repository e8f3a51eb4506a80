use thiserror::Error;

use crate::parse::ParseError;
use crate::GenerateError;

/// Unified error type covering both translation directions.
///
/// Lets callers that do both (e.g. normalising rule text by parsing and
/// regenerating it) use a single `?`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuleBridgeError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Generate(#[from] GenerateError),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalise(text: &str) -> Result<String, RuleBridgeError> {
        let rule = crate::parse(text)?;
        Ok(rule.to_grl()?)
    }

    #[test]
    fn parse_errors_convert() {
        let err = normalise("not a rule").unwrap_err();
        assert!(matches!(err, RuleBridgeError::Parse(ParseError::MalformedInput { .. })));
    }

    #[test]
    fn generate_errors_convert() {
        // Parses fine, but nothing in the when clause is recognised.
        let err = normalise("rule R \"d\" salience 1 {when Customer.Unknown > 1 then Offer.FreeShipping = true;}")
            .unwrap_err();
        assert!(matches!(
            err,
            RuleBridgeError::Generate(GenerateError::MissingConditionsOrActions { .. })
        ));
    }

    #[test]
    fn display_is_transparent() {
        let err = RuleBridgeError::from(GenerateError::EmptyCollection {
            field: "Customer.BrowsingCategories".into(),
        });
        assert_eq!(
            err.to_string(),
            "set-membership test used with empty list for field Customer.BrowsingCategories"
        );
    }
}
