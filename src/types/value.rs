use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A typed literal carried by an expression or an action.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RuleValue {
    #[cfg_attr(feature = "serde", serde(rename = "boolVal"))]
    Bool(bool),
    #[cfg_attr(feature = "serde", serde(rename = "intVal"))]
    Int(i32),
    #[cfg_attr(feature = "serde", serde(rename = "floatVal"))]
    Float(f32),
    #[cfg_attr(feature = "serde", serde(rename = "stringVal"))]
    String(String),
    /// Comma-concatenated strings, e.g. `"Electronics, Home"`. Only valid with
    /// the set-membership operator.
    #[cfg_attr(feature = "serde", serde(rename = "stringListCommaConcatenated"))]
    StringList(String),
}

impl RuleValue {
    /// Build a string-list value from individual items.
    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined: Vec<String> = items
            .into_iter()
            .map(|s| s.as_ref().trim().to_owned())
            .collect();
        RuleValue::StringList(joined.join(", "))
    }

    /// Trimmed, non-empty items of a string list. Empty for any other variant.
    pub fn list_items(&self) -> impl Iterator<Item = &str> {
        let raw = match self {
            RuleValue::StringList(s) => s.as_str(),
            _ => "",
        };
        raw.split(',').map(str::trim).filter(|s| !s.is_empty())
    }
}

impl From<bool> for RuleValue {
    fn from(v: bool) -> Self {
        RuleValue::Bool(v)
    }
}

impl From<i32> for RuleValue {
    fn from(v: i32) -> Self {
        RuleValue::Int(v)
    }
}

impl From<f32> for RuleValue {
    fn from(v: f32) -> Self {
        RuleValue::Float(v)
    }
}

/// Narrows to `f32`; the rule schema stores 32-bit floats.
impl From<f64> for RuleValue {
    #[allow(clippy::cast_possible_truncation)]
    fn from(v: f64) -> Self {
        RuleValue::Float(v as f32)
    }
}

impl From<&str> for RuleValue {
    fn from(v: &str) -> Self {
        RuleValue::String(v.to_owned())
    }
}

impl From<String> for RuleValue {
    fn from(v: String) -> Self {
        RuleValue::String(v)
    }
}

impl fmt::Display for RuleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleValue::Bool(v) => write!(f, "{v}"),
            RuleValue::Int(v) => write!(f, "{v}"),
            RuleValue::Float(v) => write!(f, "{v}"),
            RuleValue::String(v) => write!(f, "\"{v}\""),
            RuleValue::StringList(v) => write!(f, "[{v}]"),
        }
    }
}
