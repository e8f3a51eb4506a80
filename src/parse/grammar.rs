use winnow::ascii::{digit1, multispace0, multispace1};
use winnow::combinator::{cut_err, delimited};
use winnow::error::{ModalResult, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{rest, take_till};

use crate::RuleTextEntity;

use super::error::ParseError;
use super::parser::Clause;

// -- Header -----------------------------------------------------------------

#[derive(Debug, PartialEq)]
struct Header<'i> {
    name: &'i str,
    description: &'i str,
    salience: u32,
}

fn expected(what: &'static str) -> StrContext {
    StrContext::Expected(StrContextValue::Description(what))
}

/// `rule <name> "<description>" salience <digits> {`
fn header<'i>(input: &mut &'i str) -> ModalResult<Header<'i>> {
    "rule".parse_next(input)?;
    cut_err(multispace1).parse_next(input)?;

    let name = cut_err(take_till(1.., |c: char| c.is_whitespace()))
        .context(expected("rule name"))
        .parse_next(input)?;
    cut_err(multispace1).parse_next(input)?;

    let description = cut_err(delimited('"', take_till(0.., '"'), '"'))
        .context(expected("quoted description"))
        .parse_next(input)?;
    cut_err(multispace1).parse_next(input)?;

    cut_err("salience")
        .context(expected("'salience'"))
        .parse_next(input)?;
    cut_err(multispace1).parse_next(input)?;

    let salience = cut_err(digit1.try_map(|s: &str| s.parse::<u32>()))
        .context(expected("salience value"))
        .parse_next(input)?;
    multispace0.parse_next(input)?;
    cut_err('{').context(expected("'{'")).parse_next(input)?;

    Ok(Header {
        name,
        description,
        salience,
    })
}

// -- Quote-aware scanning ---------------------------------------------------

/// Byte offsets and characters of `text` that lie outside double-quoted strings.
/// The quote characters themselves are not yielded.
pub(crate) fn unquoted_chars(text: &str) -> impl Iterator<Item = (usize, char)> + '_ {
    let mut in_string = false;
    let mut escaped = false;
    text.char_indices().filter(move |&(_, c)| {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            false
        } else if c == '"' {
            in_string = true;
            false
        } else {
            true
        }
    })
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.'
}

/// Byte offset of the first occurrence of `word` outside string literals that
/// is not part of a longer identifier.
pub(crate) fn find_word(text: &str, word: &str) -> Option<usize> {
    unquoted_chars(text).map(|(i, _)| i).find(|&i| {
        text[i..].starts_with(word)
            && !text[..i].chars().next_back().is_some_and(is_ident_char)
            && !text[i + word.len()..].chars().next().is_some_and(is_ident_char)
    })
}

/// Whether `needle` occurs in `text` outside string literals.
pub(crate) fn contains_unquoted(text: &str, needle: &str) -> bool {
    unquoted_chars(text).any(|(i, _)| text[i..].starts_with(needle))
}

/// Split on every occurrence of `sep` outside string literals.
pub(crate) fn split_unquoted<'a>(text: &'a str, sep: &str) -> Vec<&'a str> {
    let mut parts = Vec::new();
    let mut start = 0;
    for (i, _) in unquoted_chars(text) {
        if i >= start && text[i..].starts_with(sep) {
            parts.push(&text[start..i]);
            start = i + sep.len();
        }
    }
    parts.push(&text[start..]);
    parts
}

// -- Rule blocks ------------------------------------------------------------

/// Byte offset of the `}` that closes a rule body. `body` starts just after
/// the opening `{`.
fn closing_brace(body: &str) -> Option<usize> {
    let mut depth = 1_usize;
    unquoted_chars(body).find_map(|(i, c)| {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        None
    })
}

/// Extract the header fields, `when` text and `then` statements of a single rule.
pub(crate) fn parse_entity(text: &str) -> Result<RuleTextEntity, ParseError> {
    let text = text.trim();
    if !text.starts_with("rule") {
        return Err(ParseError::malformed("rule text must start with 'rule'"));
    }

    let (head, body) = (header, rest)
        .parse(text)
        .map_err(|e| ParseError::malformed(format!("invalid rule header: {e}")))?;

    let missing = |clause| ParseError::MissingClause {
        rule: head.name.to_owned(),
        clause,
    };

    let close = closing_brace(body);
    let region = &body[..close.unwrap_or(body.len())];

    let when_at = find_word(region, "when").ok_or_else(|| missing(Clause::When))?;
    let when_start = when_at + "when".len();
    let then_at = find_word(&region[when_start..], "then")
        .map(|i| when_start + i)
        .ok_or_else(|| missing(Clause::Then))?;
    let then_start = then_at + "then".len();
    // An unterminated `then` section has no extent.
    let close = close.ok_or_else(|| missing(Clause::Then))?;
    if !body[close + 1..].trim().is_empty() {
        return Err(ParseError::malformed(format!(
            "unexpected text after the end of rule '{}'; use parse_many for several rules",
            head.name
        )));
    }

    let when = body[when_start..then_at].trim();
    let then = split_unquoted(&body[then_start..close], ";")
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| format!("{s};"))
        .collect();

    Ok(RuleTextEntity {
        name: head.name.to_owned(),
        description: head.description.to_owned(),
        salience: head.salience.to_string(),
        when: when.to_owned(),
        then,
    })
}

/// Split a block of text into individual `rule ... { ... }` blocks.
pub(crate) fn split_rules(text: &str) -> Result<Vec<&str>, ParseError> {
    let mut blocks = Vec::new();
    let mut start: Option<usize> = None;
    let mut depth = 0_usize;

    for (i, c) in unquoted_chars(text) {
        match (start, c) {
            (None, c) if c.is_whitespace() => {}
            (None, _) => {
                if !text[i..].starts_with("rule") {
                    return Err(ParseError::malformed(format!(
                        "expected 'rule' at byte {i}"
                    )));
                }
                start = Some(i);
            }
            (Some(_), '{') => depth += 1,
            (Some(s), '}') => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    blocks.push(&text[s..=i]);
                    start = None;
                }
            }
            _ => {}
        }
    }

    if let Some(s) = start {
        return Err(ParseError::malformed(format!(
            "unterminated rule block starting at byte {s}"
        )));
    }
    Ok(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_fields() {
        let mut input = "rule Promo \"Big carts\" salience 15 {";
        let h = header(&mut input).unwrap();
        assert_eq!(
            h,
            Header {
                name: "Promo",
                description: "Big carts",
                salience: 15
            }
        );
        assert_eq!(input, "");
    }

    #[test]
    fn header_rejects_non_numeric_salience() {
        let mut input = "rule Broken \"x\" salience x {";
        assert!(header(&mut input).is_err());
    }

    #[test]
    fn header_rejects_missing_description() {
        let mut input = "rule Broken salience 1 {";
        assert!(header(&mut input).is_err());
    }

    #[test]
    fn header_rejects_salience_overflow() {
        let mut input = "rule Big \"x\" salience 99999999999 {";
        assert!(header(&mut input).is_err());
    }

    #[test]
    fn find_word_respects_boundaries_and_quotes() {
        assert_eq!(find_word("a then b", "then"), Some(2));
        assert_eq!(find_word("authentic then", "then"), Some(10));
        assert_eq!(find_word("x == \"then\" ", "then"), None);
        assert_eq!(find_word("Customer.AgeGroup", "Customer.Age"), None);
        assert_eq!(find_word("(Customer.Age > 1)", "Customer.Age"), Some(1));
    }

    #[test]
    fn split_unquoted_ignores_separators_in_strings() {
        assert_eq!(
            split_unquoted("a = \"x;y\"; b = 2;", ";"),
            vec!["a = \"x;y\"", " b = 2", ""]
        );
        assert_eq!(split_unquoted("no separator", "&&"), vec!["no separator"]);
    }

    #[test]
    fn contains_unquoted_skips_strings() {
        assert!(contains_unquoted("a || b", "||"));
        assert!(!contains_unquoted("a == \"x || y\"", "||"));
    }

    #[test]
    fn entity_from_compact_text() {
        let e = parse_entity(
            "rule X \"y\" salience 5 {when (Customer.IsLoyaltyProgramMember == true) then Offer.FreeShipping = true;}",
        )
        .unwrap();
        assert_eq!(e.name, "X");
        assert_eq!(e.description, "y");
        assert_eq!(e.salience, "5");
        assert_eq!(e.when, "(Customer.IsLoyaltyProgramMember == true)");
        assert_eq!(e.then, vec!["Offer.FreeShipping = true;"]);
    }

    #[test]
    fn description_may_mention_keywords() {
        let e = parse_entity(
            "rule X \"when cart is big then discount\" salience 1 {\nwhen\n\t( Customer.CartTotal > 1.00 )\nthen\n\tOffer.FreeShipping = true;\n}",
        )
        .unwrap();
        assert_eq!(e.when, "( Customer.CartTotal > 1.00 )");
        assert_eq!(e.then.len(), 1);
    }

    #[test]
    fn entity_requires_rule_prefix() {
        assert!(matches!(
            parse_entity("rules are fun"),
            Err(ParseError::MalformedInput { .. })
        ));
        assert!(matches!(
            parse_entity("when x then y"),
            Err(ParseError::MalformedInput { .. })
        ));
    }

    #[test]
    fn entity_missing_when() {
        let err = parse_entity("rule MissingWhen \"No when\" salience 1 {then Offer.ShowPromotionId = \"PROMO123\";}")
            .unwrap_err();
        assert_eq!(
            err,
            ParseError::MissingClause {
                rule: "MissingWhen".into(),
                clause: Clause::When
            }
        );
    }

    #[test]
    fn entity_missing_then() {
        let err = parse_entity("rule MissingThen \"No then\" salience 1 {when Customer.Age > 18}")
            .unwrap_err();
        assert_eq!(
            err,
            ParseError::MissingClause {
                rule: "MissingThen".into(),
                clause: Clause::Then
            }
        );
    }

    #[test]
    fn entity_missing_closing_brace() {
        let err = parse_entity(
            "rule X \"y\" salience 1 {when Customer.Age > 1 then Offer.FreeShipping = true;",
        )
        .unwrap_err();
        assert_eq!(
            err,
            ParseError::MissingClause {
                rule: "X".into(),
                clause: Clause::Then
            }
        );
    }

    #[test]
    fn entity_rejects_text_after_closing_brace() {
        let two = "rule A \"a\" salience 1 {when Customer.Age > 1 then Offer.FreeShipping = true;}\n\nrule B \"b\" salience 2 {when Customer.Age > 2 then Offer.FreeShipping = false;}";
        assert!(matches!(
            parse_entity(two),
            Err(ParseError::MalformedInput { reason }) if reason.contains("parse_many")
        ));
        assert!(matches!(
            parse_entity("rule A \"a\" salience 1 {when x then y;} }"),
            Err(ParseError::MalformedInput { .. })
        ));
    }

    #[test]
    fn closing_brace_skips_strings_and_nesting() {
        assert_eq!(closing_brace("a \"}\" b}"), Some(7));
        assert_eq!(closing_brace("{ } }tail"), Some(4));
        assert_eq!(closing_brace("no end"), None);
    }

    #[test]
    fn split_rules_on_brace_boundaries() {
        let text = "rule A \"a}\" salience 1 {\nwhen\n\tx\nthen\n\ty;\n}\n\nrule B \"b\" salience 2 {when x then y;}\n";
        let blocks = split_rules(text).unwrap();
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].starts_with("rule A"));
        assert!(blocks[0].ends_with('}'));
        assert!(blocks[1].starts_with("rule B"));
    }

    #[test]
    fn split_rules_rejects_garbage_and_unterminated() {
        assert!(split_rules("garbage").is_err());
        assert!(split_rules("rule A \"a\" salience 1 { when").is_err());
        assert_eq!(split_rules("  \n ").unwrap().len(), 0);
    }
}
