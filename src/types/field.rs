#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Customer attributes a rule condition can test.
///
/// `Unspecified` is the zero value a loader produces for a missing field. It has
/// no textual mapping, so generating a rule that uses it fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum InputField {
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "INPUT_FIELD_UNSPECIFIED"))]
    Unspecified,
    Age,
    Gender,
    Location,
    DeviceType,
    IsLoyaltyProgramMember,
    TotalLifetimeSpent,
    AvgOrderValue,
    LastPurchaseDaysAgo,
    LastCategoryPurchased,
    PreferredCategories,
    CartTotal,
    CartContainsCategories,
    BrowsingCategories,
    #[cfg_attr(feature = "serde", serde(rename = "PURCHASE_COUNT_LAST_30_DAYS"))]
    PurchaseCountLast30Days,
    ReturnRatePercent,
    HasCouponRedeemedBefore,
    SignupDaysAgo,
}

/// Offer attributes a rule action can assign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum OutputField {
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "OUTPUT_FIELD_UNSPECIFIED"))]
    Unspecified,
    ApplyDiscountPercent,
    ApplyFlatDiscount,
    ShowPromotionId,
    FreeShipping,
    AssignCouponCode,
    PromoMessage,
    AddLoyaltyPoints,
}

/// Comparison operators supported in rule expressions.
///
/// `HasCategory` is the set-membership test: it renders as a function call
/// rather than an infix comparison and takes a [`RuleValue::StringList`](super::RuleValue::StringList).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum Operator {
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "EXPRESSION_OPERATOR_UNSPECIFIED"))]
    Unspecified,
    LessThan,
    LessThanEquals,
    GreaterThan,
    GreaterThanEquals,
    Equals,
    NotEquals,
    #[cfg_attr(feature = "serde", serde(rename = "HAS_CATEGORY_FUNCTION"))]
    HasCategory,
}

impl Operator {
    /// Infix operators in the order the parser tries them. Multi-character
    /// tokens come before their single-character prefixes.
    pub(crate) const DETECTION_ORDER: [Operator; 6] = [
        Operator::GreaterThanEquals,
        Operator::LessThanEquals,
        Operator::GreaterThan,
        Operator::LessThan,
        Operator::Equals,
        Operator::NotEquals,
    ];
}

/// How expressions inside a condition, or conditions inside a rule, combine.
///
/// `Unspecified` behaves as `And`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum JoinOperator {
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "JOIN_OPERATOR_UNSPECIFIED"))]
    Unspecified,
    And,
    Or,
}

impl JoinOperator {
    /// Collapse `Unspecified` to the `And` default.
    #[must_use]
    pub fn resolved(self) -> JoinOperator {
        match self {
            JoinOperator::Unspecified => JoinOperator::And,
            other => other,
        }
    }
}
