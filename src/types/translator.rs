use crate::codec::ValueCodec;
use crate::parse::{self, ParseError, ParsedRule};

use super::entity::{render_all, RuleTextEntity};
use super::error::GenerateError;
use super::field_registry::FieldRegistry;
use super::rule::Rule;

/// Converts rules between their structured form and GRL text.
///
/// A translator is an immutable bundle of a [`FieldRegistry`] and a
/// [`ValueCodec`]. It holds no per-call state, so one instance can serve any
/// number of threads.
///
/// # Example
///
/// ```
/// use rulebridge::{NumericLiterals, RuleValue, Translator, ValueCodec};
///
/// let translator = Translator::new()
///     .with_codec(ValueCodec::new(NumericLiterals::IntegerFirst));
///
/// let rule = translator
///     .parse("rule R \"d\" salience 1 {when Customer.Age > 21 then Offer.AddLoyaltyPoints = 50;}")
///     .unwrap();
/// assert_eq!(rule.conditions[0].expressions[0].value, RuleValue::Int(21));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Translator {
    registry: FieldRegistry,
    codec: ValueCodec,
}

impl Translator {
    /// Standard e-commerce registry with the float-first codec.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            registry: FieldRegistry::ecommerce(),
            codec: ValueCodec::new(crate::NumericLiterals::FloatFirst),
        }
    }

    #[must_use]
    pub fn with_registry(mut self, registry: FieldRegistry) -> Self {
        self.registry = registry;
        self
    }

    #[must_use]
    pub fn with_codec(mut self, codec: ValueCodec) -> Self {
        self.codec = codec;
        self
    }

    #[must_use]
    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    #[must_use]
    pub fn codec(&self) -> &ValueCodec {
        &self.codec
    }

    /// Render a rule into its textual carrier without applying the block layout.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError`] if the rule has no conditions or actions, uses an
    /// unmapped identifier, or carries a value its position cannot hold.
    pub fn to_entity(&self, rule: &Rule) -> Result<RuleTextEntity, GenerateError> {
        crate::generate::generate(rule, &self.registry, &self.codec)
    }

    /// Render a rule as a GRL block.
    ///
    /// # Errors
    ///
    /// See [`to_entity`](Self::to_entity).
    pub fn to_grl(&self, rule: &Rule) -> Result<String, GenerateError> {
        self.to_entity(rule).map(|e| e.render())
    }

    /// Render several rules, separated by blank lines. Fails on the first rule
    /// that cannot be rendered.
    ///
    /// # Errors
    ///
    /// See [`to_entity`](Self::to_entity).
    pub fn to_grl_many(&self, rules: &[Rule]) -> Result<String, GenerateError> {
        let entities = rules
            .iter()
            .map(|r| self.to_entity(r))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(render_all(&entities))
    }

    /// Parse a single GRL rule, discarding the record of skipped fragments.
    /// Text holding several rules is rejected; use [`parse_many`](Self::parse_many).
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if the header is malformed, a clause is missing,
    /// or anything follows the rule's closing brace.
    pub fn parse(&self, text: &str) -> Result<Rule, ParseError> {
        self.parse_detailed(text).map(|p| p.rule)
    }

    /// Parse a single GRL rule and report every fragment that was skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if the header is malformed, a clause is missing,
    /// or anything follows the rule's closing brace.
    pub fn parse_detailed(&self, text: &str) -> Result<ParsedRule, ParseError> {
        let entity = parse::parse_entity(text)?;
        self.from_entity(&entity)
    }

    /// Interpret an already extracted textual carrier.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::MalformedInput`] if the salience is not a
    /// non-negative integer.
    pub fn from_entity(&self, entity: &RuleTextEntity) -> Result<ParsedRule, ParseError> {
        parse::interpret(entity, &self.registry, &self.codec)
    }

    /// Parse a block containing any number of rules.
    ///
    /// # Errors
    ///
    /// Returns the first [`ParseError`] encountered.
    pub fn parse_many(&self, text: &str) -> Result<Vec<ParsedRule>, ParseError> {
        parse::split_rules(text)?
            .into_iter()
            .map(|block| self.parse_detailed(block))
            .collect()
    }
}
