use super::error::GenerateError;
use super::field::{InputField, JoinOperator, Operator, OutputField};

const INPUT_FIELDS: &[(InputField, &str)] = &[
    (InputField::Age, "Customer.Age"),
    (InputField::Gender, "Customer.Gender"),
    (InputField::Location, "Customer.Location"),
    (InputField::DeviceType, "Customer.DeviceType"),
    (InputField::IsLoyaltyProgramMember, "Customer.IsLoyaltyProgramMember"),
    (InputField::TotalLifetimeSpent, "Customer.TotalSpent"),
    (InputField::AvgOrderValue, "Customer.AvgOrderValue"),
    (InputField::LastPurchaseDaysAgo, "Customer.LastPurchaseDaysAgo"),
    (InputField::LastCategoryPurchased, "Customer.LastCategoryPurchased"),
    (InputField::PreferredCategories, "Customer.PreferredCategories"),
    (InputField::CartTotal, "Customer.CartTotal"),
    (InputField::CartContainsCategories, "Customer.CartContainsCategories"),
    (InputField::BrowsingCategories, "Customer.BrowsingCategories"),
    (InputField::PurchaseCountLast30Days, "Customer.PurchaseCount30d"),
    (InputField::ReturnRatePercent, "Customer.ReturnRatePercent"),
    (InputField::HasCouponRedeemedBefore, "Customer.HasRedeemedCouponBefore"),
    (InputField::SignupDaysAgo, "Customer.SignupDaysAgo"),
];

const OUTPUT_FIELDS: &[(OutputField, &str)] = &[
    (OutputField::ApplyDiscountPercent, "Offer.ApplyDiscountPercent"),
    (OutputField::ApplyFlatDiscount, "Offer.ApplyFlatDiscount"),
    (OutputField::ShowPromotionId, "Offer.ShowPromotionId"),
    (OutputField::FreeShipping, "Offer.FreeShipping"),
    (OutputField::AssignCouponCode, "Offer.AssignCoupon"),
    (OutputField::PromoMessage, "Offer.PromoMessage"),
    (OutputField::AddLoyaltyPoints, "Offer.AddLoyaltyPoints"),
];

// Infix tokens carry their surrounding spaces. The set-membership entry is the
// function name used in `<Owner>.HasCategory(<field>, ...)`.
const OPERATORS: &[(Operator, &str)] = &[
    (Operator::LessThan, " < "),
    (Operator::LessThanEquals, " <= "),
    (Operator::GreaterThan, " > "),
    (Operator::GreaterThanEquals, " >= "),
    (Operator::Equals, " == "),
    (Operator::NotEquals, " != "),
    (Operator::HasCategory, "HasCategory"),
];

const JOIN_OPERATORS: &[(JoinOperator, &str)] =
    &[(JoinOperator::And, " && "), (JoinOperator::Or, " || ")];

/// Bidirectional lookup tables between enumerated identifiers and their GRL text.
///
/// The tables are `'static` and never mutated, so a registry is `Copy` and can be
/// shared freely across threads. Supporting a new field or operator means adding
/// a table entry; the generator and parser pick it up without changes.
#[derive(Debug, Clone, Copy)]
pub struct FieldRegistry {
    inputs: &'static [(InputField, &'static str)],
    outputs: &'static [(OutputField, &'static str)],
    operators: &'static [(Operator, &'static str)],
    joins: &'static [(JoinOperator, &'static str)],
}

impl Default for FieldRegistry {
    fn default() -> Self {
        Self::ecommerce()
    }
}

impl FieldRegistry {
    /// Build a registry from custom tables.
    #[must_use]
    pub const fn new(
        inputs: &'static [(InputField, &'static str)],
        outputs: &'static [(OutputField, &'static str)],
        operators: &'static [(Operator, &'static str)],
        joins: &'static [(JoinOperator, &'static str)],
    ) -> Self {
        Self {
            inputs,
            outputs,
            operators,
            joins,
        }
    }

    /// The standard `Customer.*` / `Offer.*` tables.
    #[must_use]
    pub const fn ecommerce() -> Self {
        Self::new(INPUT_FIELDS, OUTPUT_FIELDS, OPERATORS, JOIN_OPERATORS)
    }

    /// GRL name of an input field.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::UnmappedIdentifier`] if the field has no entry.
    pub fn input_name(&self, field: InputField) -> Result<&'static str, GenerateError> {
        lookup(self.inputs, &field, "input field")
    }

    /// GRL name of an output field.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::UnmappedIdentifier`] if the field has no entry.
    pub fn output_name(&self, field: OutputField) -> Result<&'static str, GenerateError> {
        lookup(self.outputs, &field, "output field")
    }

    /// GRL token of an operator.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::UnmappedIdentifier`] if the operator has no entry.
    pub fn operator_token(&self, op: Operator) -> Result<&'static str, GenerateError> {
        lookup(self.operators, &op, "operator")
    }

    /// GRL token of a join operator. `Unspecified` resolves to AND first.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::UnmappedIdentifier`] if the operator has no entry.
    pub fn join_token(&self, op: JoinOperator) -> Result<&'static str, GenerateError> {
        lookup(self.joins, &op.resolved(), "join operator")
    }

    /// Input field whose GRL name is exactly `name`.
    #[must_use]
    pub fn input_named(&self, name: &str) -> Option<InputField> {
        self.inputs
            .iter()
            .find(|(_, text)| *text == name)
            .map(|(field, _)| *field)
    }

    /// Output field whose GRL name is exactly `name`.
    #[must_use]
    pub fn output_named(&self, name: &str) -> Option<OutputField> {
        self.outputs
            .iter()
            .find(|(_, text)| *text == name)
            .map(|(field, _)| *field)
    }

    /// Iterate over all registered (input field, name) pairs in table order.
    pub fn inputs(&self) -> impl Iterator<Item = (InputField, &'static str)> + '_ {
        self.inputs.iter().copied()
    }

    /// Token of the set-membership function, if registered.
    #[must_use]
    pub fn set_membership_token(&self) -> Option<&'static str> {
        self.operator_token(Operator::HasCategory).ok()
    }
}

fn lookup<K: PartialEq + std::fmt::Debug>(
    table: &'static [(K, &'static str)],
    key: &K,
    kind: &'static str,
) -> Result<&'static str, GenerateError> {
    table
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, text)| *text)
        .ok_or_else(|| GenerateError::UnmappedIdentifier {
            kind,
            identifier: format!("{key:?}"),
        })
}
