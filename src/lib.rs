//! Bidirectional translation between structured offer rules and GRL text.
//!
//! A [`Rule`] pairs condition groups over customer attributes with actions on
//! offer attributes. [`Translator`] renders rules into the `rule ... { when ...
//! then ... }` layout a GRL engine loads, and parses that text back into rules.
//! Both directions are pure functions over immutable lookup tables.
//!
//! ```
//! use rulebridge::{input, Condition, InputField, Operator, OutputField, Rule};
//!
//! let rule = Rule::new("R", "d", 10)
//!     .condition(Condition::all([input(InputField::CartTotal).gt(500.0_f32)]))
//!     .action(OutputField::ApplyDiscountPercent, 10.0_f32);
//!
//! let text = rule.to_grl().unwrap();
//! let back = Rule::from_grl(&text).unwrap();
//! assert_eq!(back.conditions[0].expressions[0].operator, Operator::GreaterThan);
//! ```

pub mod codec;
mod error;
mod generate;
pub mod parse;
mod types;

pub use codec::{NumericLiterals, UnsupportedValueType, ValueCodec};
pub use error::RuleBridgeError;
pub use parse::{Clause, ParseError, ParsedRule, SkipReason, SkippedFragment};
pub use types::{
    input, render_all, Action, Condition, Expression, FieldRegistry, GenerateError, InputExpr,
    InputField, JoinOperator, Operator, OutputField, Rule, RuleTextEntity, RuleValue, Translator,
};

/// Parse a single GRL rule with the standard translator. For text holding
/// several rules use [`parse_many`].
///
/// # Errors
///
/// Returns [`ParseError`] if the text does not match the rule grammar.
pub fn parse(text: &str) -> Result<Rule, ParseError> {
    Translator::new().parse(text)
}

/// Parse a single GRL rule with the standard translator, reporting skipped fragments.
///
/// # Errors
///
/// Returns [`ParseError`] if the text does not match the rule grammar.
pub fn parse_detailed(text: &str) -> Result<ParsedRule, ParseError> {
    Translator::new().parse_detailed(text)
}

/// Parse a block of GRL rules with the standard translator.
///
/// # Errors
///
/// Returns the first [`ParseError`] encountered.
pub fn parse_many(text: &str) -> Result<Vec<ParsedRule>, ParseError> {
    Translator::new().parse_many(text)
}

/// Render several rules with the standard translator.
///
/// # Errors
///
/// Returns the first [`GenerateError`] encountered.
pub fn to_grl_many(rules: &[Rule]) -> Result<String, GenerateError> {
    Translator::new().to_grl_many(rules)
}
