#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::expr::Expression;
use super::field::{JoinOperator, OutputField};
use super::value::RuleValue;

/// A structured offer rule: conditions paired with actions and a salience.
///
/// Rules are plain values. Converting one to text or parsing one from text never
/// mutates an existing rule; each call produces a fresh value.
///
/// # Example
///
/// ```
/// use rulebridge::{input, Condition, InputField, OutputField, Rule};
///
/// let rule = Rule::new("BigCart", "Discount for big carts", 10)
///     .condition(Condition::all([input(InputField::CartTotal).gt(500.0_f32)]))
///     .action(OutputField::ApplyDiscountPercent, 10.0_f32);
///
/// let text = rule.to_grl().unwrap();
/// assert!(text.starts_with("rule BigCart \"Discount for big carts\" salience 10 {"));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct Rule {
    pub name: String,
    pub description: String,
    /// Higher values are considered first by the rule engine.
    pub salience: u32,
    pub conditions: Vec<Condition>,
    pub condition_join_operator: JoinOperator,
    pub actions: Vec<Action>,
}

/// A group of expressions joined by one operator.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct Condition {
    pub expressions: Vec<Expression>,
    pub expression_join_operator: JoinOperator,
}

/// Assignment of a value to an output field.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Action {
    pub output: OutputField,
    pub value: RuleValue,
}

impl Rule {
    #[must_use]
    pub fn new(name: &str, description: &str, salience: u32) -> Self {
        Self {
            name: name.to_owned(),
            description: description.to_owned(),
            salience,
            ..Self::default()
        }
    }

    /// Append a condition group.
    #[must_use]
    pub fn condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Set how condition groups combine.
    #[must_use]
    pub fn join_conditions(mut self, op: JoinOperator) -> Self {
        self.condition_join_operator = op;
        self
    }

    /// Append an action.
    #[must_use]
    pub fn action(mut self, output: OutputField, value: impl Into<RuleValue>) -> Self {
        self.actions.push(Action {
            output,
            value: value.into(),
        });
        self
    }

    /// Render this rule as GRL text with the standard translator.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError`](crate::GenerateError) if the rule cannot be serialized.
    pub fn to_grl(&self) -> Result<String, crate::GenerateError> {
        crate::Translator::new().to_grl(self)
    }

    /// Parse GRL text into a rule with the standard translator.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`](crate::ParseError) if the text does not match the grammar.
    pub fn from_grl(text: &str) -> Result<Self, crate::ParseError> {
        crate::Translator::new().parse(text)
    }
}

impl Condition {
    /// Expressions that must all hold.
    #[must_use]
    pub fn all(expressions: impl IntoIterator<Item = Expression>) -> Self {
        Self {
            expressions: expressions.into_iter().collect(),
            expression_join_operator: JoinOperator::And,
        }
    }

    /// Expressions of which at least one must hold.
    #[must_use]
    pub fn any(expressions: impl IntoIterator<Item = Expression>) -> Self {
        Self {
            expressions: expressions.into_iter().collect(),
            expression_join_operator: JoinOperator::Or,
        }
    }
}

impl Action {
    #[must_use]
    pub fn new(output: OutputField, value: impl Into<RuleValue>) -> Self {
        Self {
            output,
            value: value.into(),
        }
    }
}
