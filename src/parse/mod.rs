mod error;
mod grammar;
mod parser;

pub use error::ParseError;
pub use parser::{Clause, ParsedRule, SkipReason, SkippedFragment};

pub(crate) use grammar::{parse_entity, split_rules};
pub(crate) use parser::interpret;
