//! Conversion between [`RuleValue`] and GRL literals.
//!
//! Decoding sniffs the literal's type: boolean first, then numeric, then string.
//! With the default [`NumericLiterals::FloatFirst`] order every bare integer
//! literal decodes as a float (`500` becomes `Float(500.0)`), matching the rule
//! engine's own loader. [`NumericLiterals::IntegerFirst`] opts into integer
//! classification instead.

use std::borrow::Cow;

use thiserror::Error;

use crate::RuleValue;

/// A value that has no literal form in the requested position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnsupportedValueType {
    #[error("string list values can only be used with a set-membership test")]
    ListOutsideSetMembership,

    #[error("float {value} has no finite literal form")]
    NonFiniteFloat { value: String },
}

/// Which numeric type a bare number literal decodes to first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumericLiterals {
    /// Try `f32` before `i32`; integer literals decode as floats.
    #[default]
    FloatFirst,
    /// Try `i32` before `f32`; only literals with a fraction or exponent are floats.
    IntegerFirst,
}

/// Stateless encoder/decoder for rule literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValueCodec {
    numeric: NumericLiterals,
}

impl ValueCodec {
    #[must_use]
    pub const fn new(numeric: NumericLiterals) -> Self {
        Self { numeric }
    }

    #[must_use]
    pub fn numeric_literals(&self) -> NumericLiterals {
        self.numeric
    }

    /// Decode a literal. Never fails: anything that is not a boolean or a
    /// number is a string, with surrounding quotes removed.
    #[must_use]
    pub fn decode(&self, text: &str) -> RuleValue {
        let (inner, quoted) = unquote(text);

        if let Some(b) = parse_bool(inner) {
            return RuleValue::Bool(b);
        }
        let numeric = match self.numeric {
            NumericLiterals::FloatFirst => parse_float(inner).or_else(|| parse_int(inner)),
            NumericLiterals::IntegerFirst => parse_int(inner).or_else(|| parse_float(inner)),
        };
        if let Some(v) = numeric {
            return v;
        }

        if quoted {
            RuleValue::String(unescape(inner).into_owned())
        } else {
            RuleValue::String(inner.to_owned())
        }
    }

    /// Encode a scalar value.
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedValueType`] for string lists, which only make sense
    /// as the argument list of a set-membership test (see [`encode_list`](Self::encode_list)),
    /// and for NaN or infinite floats.
    pub fn encode(&self, value: &RuleValue) -> Result<String, UnsupportedValueType> {
        match value {
            RuleValue::String(s) => Ok(quote(s)),
            RuleValue::Bool(b) => Ok(b.to_string()),
            RuleValue::Int(i) => Ok(i.to_string()),
            RuleValue::Float(f) if !f.is_finite() => Err(UnsupportedValueType::NonFiniteFloat {
                value: f.to_string(),
            }),
            RuleValue::Float(f) => Ok(format!("{f:.2}")),
            RuleValue::StringList(_) => Err(UnsupportedValueType::ListOutsideSetMembership),
        }
    }

    /// Encode the items of a string list as quoted, comma-separated arguments.
    /// Blank items are dropped; a non-list value yields an empty string.
    #[must_use]
    pub fn encode_list(&self, value: &RuleValue) -> String {
        value
            .list_items()
            .map(quote)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

// Word forms only; `1`/`0` stay numeric and `t`/`f` stay strings.
fn parse_bool(text: &str) -> Option<bool> {
    match text {
        "true" | "True" | "TRUE" => Some(true),
        "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}

fn parse_float(text: &str) -> Option<RuleValue> {
    text.parse::<f32>()
        .ok()
        .filter(|f| f.is_finite())
        .map(RuleValue::Float)
}

fn parse_int(text: &str) -> Option<RuleValue> {
    text.parse::<i32>().ok().map(RuleValue::Int)
}

/// Strip surrounding whitespace and quotes. Returns whether the literal was a
/// properly quoted string.
fn unquote(text: &str) -> (&str, bool) {
    let trimmed = text.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        let inner = &trimmed[1..trimmed.len() - 1];
        if !ends_with_escape(inner) {
            return (inner, true);
        }
    }
    (trimmed.trim_matches('"').trim(), false)
}

// An odd run of trailing backslashes escapes the closing quote.
fn ends_with_escape(s: &str) -> bool {
    s.bytes().rev().take_while(|b| *b == b'\\').count() % 2 == 1
}

pub(crate) fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

pub(crate) fn unescape(s: &str) -> Cow<'_, str> {
    if !s.contains('\\') {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    Cow::Owned(out)
}
