mod entity;
mod error;
mod expr;
mod field;
mod field_registry;
mod rule;
mod translator;
mod value;

pub use entity::{render_all, RuleTextEntity};
pub use error::GenerateError;
pub use expr::{input, Expression, InputExpr};
pub use field::{InputField, JoinOperator, Operator, OutputField};
pub use field_registry::FieldRegistry;
pub use rule::{Action, Condition, Rule};
pub use translator::Translator;
pub use value::RuleValue;
