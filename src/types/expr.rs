#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::field::{InputField, Operator};
use super::value::RuleValue;

/// A single `field operator value` comparison.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Expression {
    pub input: InputField,
    pub operator: Operator,
    pub value: RuleValue,
}

impl Expression {
    #[must_use]
    pub fn new(input: InputField, operator: Operator, value: impl Into<RuleValue>) -> Self {
        Self {
            input,
            operator,
            value: value.into(),
        }
    }
}

/// Intermediate builder for comparison expressions.
/// Created by [`input()`]; requires a comparison method to produce an [`Expression`].
#[derive(Debug, Clone, Copy)]
pub struct InputExpr {
    field: InputField,
}

impl InputExpr {
    #[must_use]
    pub fn eq(self, value: impl Into<RuleValue>) -> Expression {
        Expression::new(self.field, Operator::Equals, value)
    }

    #[must_use]
    pub fn neq(self, value: impl Into<RuleValue>) -> Expression {
        Expression::new(self.field, Operator::NotEquals, value)
    }

    #[must_use]
    pub fn gt(self, value: impl Into<RuleValue>) -> Expression {
        Expression::new(self.field, Operator::GreaterThan, value)
    }

    #[must_use]
    pub fn gte(self, value: impl Into<RuleValue>) -> Expression {
        Expression::new(self.field, Operator::GreaterThanEquals, value)
    }

    #[must_use]
    pub fn lt(self, value: impl Into<RuleValue>) -> Expression {
        Expression::new(self.field, Operator::LessThan, value)
    }

    #[must_use]
    pub fn lte(self, value: impl Into<RuleValue>) -> Expression {
        Expression::new(self.field, Operator::LessThanEquals, value)
    }

    /// Set-membership test against a list-valued field.
    #[must_use]
    pub fn has_category<I, S>(self, items: I) -> Expression
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Expression::new(self.field, Operator::HasCategory, RuleValue::list(items))
    }
}

#[must_use]
pub fn input(field: InputField) -> InputExpr {
    InputExpr { field }
}
