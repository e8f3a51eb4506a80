use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Flattened textual form of a rule: header fields, the `when` clause and the
/// `then` lines, before (or after) the fixed GRL layout is applied.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RuleTextEntity {
    pub name: String,
    pub description: String,
    pub salience: String,
    pub when: String,
    pub then: Vec<String>,
}

impl RuleTextEntity {
    /// Render into the GRL block layout the rule engine expects.
    #[must_use]
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for RuleTextEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "rule {} \"{}\" salience {} {{",
            self.name, self.description, self.salience
        )?;
        writeln!(f, "when")?;
        writeln!(f, "\t{}", self.when)?;
        writeln!(f, "then")?;
        for line in &self.then {
            writeln!(f, "\t{line}")?;
        }
        write!(f, "}}")
    }
}

/// Render several entities, separated by a blank line.
#[must_use]
pub fn render_all(entities: &[RuleTextEntity]) -> String {
    entities
        .iter()
        .map(RuleTextEntity::render)
        .collect::<Vec<_>>()
        .join("\n\n")
}
