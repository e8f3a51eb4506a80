use std::cmp::Reverse;
use std::fmt;

use crate::codec::{unescape, ValueCodec};
use crate::types::{
    Action, Condition, Expression, FieldRegistry, InputField, JoinOperator, Operator, Rule,
    RuleTextEntity, RuleValue,
};

use super::error::ParseError;
use super::grammar::{contains_unquoted, find_word, split_unquoted, unquoted_chars};

/// The two clauses of a rule body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Clause {
    When,
    Then,
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Clause::When => write!(f, "when"),
            Clause::Then => write!(f, "then"),
        }
    }
}

/// Why a fragment of a clause was left out of the parsed rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// No registered field name appears in the fragment.
    UnknownField,
    /// A field was found but no comparison operator follows it.
    UnknownOperator,
    /// The fragment joins expressions with `||`, which is not parsed.
    UnsupportedJoin,
    /// A `then` statement without an `=` assignment.
    MissingAssignment,
}

/// A piece of rule text the parser did not recognise and dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFragment {
    pub clause: Clause,
    pub text: String,
    pub reason: SkipReason,
}

/// The result of parsing one rule: the recovered rule plus anything that was
/// skipped along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRule {
    pub rule: Rule,
    pub skipped: Vec<SkippedFragment>,
}

impl ParsedRule {
    /// Whether every fragment of the text made it into the rule.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

struct Interpreter<'a> {
    registry: &'a FieldRegistry,
    codec: &'a ValueCodec,
    skipped: Vec<SkippedFragment>,
}

/// Turn an extracted text entity into a structured rule.
///
/// Unrecognised `when` expressions and `then` statements are dropped and
/// recorded in [`ParsedRule::skipped`] rather than failing the whole parse.
pub(crate) fn interpret(
    entity: &RuleTextEntity,
    registry: &FieldRegistry,
    codec: &ValueCodec,
) -> Result<ParsedRule, ParseError> {
    let salience = entity.salience.trim().parse::<u32>().map_err(|_| {
        ParseError::malformed(format!(
            "rule '{}' has invalid salience '{}'",
            entity.name, entity.salience
        ))
    })?;

    let mut interp = Interpreter {
        registry,
        codec,
        skipped: Vec::new(),
    };

    let expressions: Vec<Expression> = split_unquoted(&entity.when, "&&")
        .into_iter()
        .filter_map(|fragment| interp.expression(fragment))
        .collect();
    let actions: Vec<Action> = entity
        .then
        .iter()
        .filter_map(|line| interp.action(line))
        .collect();

    let conditions = if expressions.is_empty() {
        Vec::new()
    } else {
        vec![Condition::all(expressions)]
    };

    Ok(ParsedRule {
        rule: Rule {
            name: entity.name.clone(),
            description: entity.description.clone(),
            salience,
            conditions,
            condition_join_operator: JoinOperator::And,
            actions,
        },
        skipped: interp.skipped,
    })
}

impl Interpreter<'_> {
    fn skip(&mut self, clause: Clause, text: &str, reason: SkipReason) {
        tracing::debug!(%clause, fragment = text, ?reason, "skipping unrecognised fragment");
        self.skipped.push(SkippedFragment {
            clause,
            text: text.to_owned(),
            reason,
        });
    }

    fn expression(&mut self, fragment: &str) -> Option<Expression> {
        let text = fragment.trim_matches(|c: char| c.is_whitespace() || c == '(' || c == ')');
        if text.is_empty() {
            return None;
        }
        if contains_unquoted(text, "||") {
            self.skip(Clause::When, text, SkipReason::UnsupportedJoin);
            return None;
        }
        if let Some(args) = self.set_membership_args(text) {
            return self.set_membership(text, args);
        }

        let Some((input, end)) = self.locate_field(text) else {
            self.skip(Clause::When, text, SkipReason::UnknownField);
            return None;
        };

        let after = text[end..].trim_start();
        let found = Operator::DETECTION_ORDER.iter().find_map(|&op| {
            let token = self.registry.operator_token(op).ok()?.trim();
            after.strip_prefix(token).map(|value| (op, value))
        });
        let Some((operator, value)) = found else {
            self.skip(Clause::When, text, SkipReason::UnknownOperator);
            return None;
        };

        Some(Expression {
            input,
            operator,
            value: self.codec.decode(value),
        })
    }

    /// Argument text of `<Owner>.HasCategory(<field>, "a", "b")`, if `text` is
    /// such a call. The closing parenthesis may already have been trimmed away.
    fn set_membership_args<'t>(&self, text: &'t str) -> Option<&'t str> {
        let token = self.registry.set_membership_token()?;
        let at = unquoted_chars(text).map(|(i, _)| i).find(|&i| {
            text[i..].starts_with(token)
                && !text[..i]
                    .chars()
                    .next_back()
                    .is_some_and(|c| c.is_alphanumeric() || c == '_')
        })?;
        let args = text[at + token.len()..].trim_start().strip_prefix('(')?;
        let args = args.trim_end();
        Some(args.strip_suffix(')').unwrap_or(args))
    }

    fn set_membership(&mut self, text: &str, args: &str) -> Option<Expression> {
        let mut parts = split_unquoted(args, ",").into_iter();
        let field_name = parts.next().map(str::trim).unwrap_or_default();
        let Some(input) = self.registry.input_named(field_name) else {
            self.skip(Clause::When, text, SkipReason::UnknownField);
            return None;
        };

        let items: Vec<String> = parts
            .map(|item| {
                let item = item.trim();
                let item = item
                    .strip_prefix('"')
                    .and_then(|s| s.strip_suffix('"'))
                    .unwrap_or(item);
                unescape(item).into_owned()
            })
            .collect();

        Some(Expression {
            input,
            operator: Operator::HasCategory,
            value: RuleValue::list(items),
        })
    }

    /// The leftmost registered field name occurring in `text` as a whole word,
    /// preferring the longer name at equal offsets. Returns the field and the
    /// byte offset just past its name.
    fn locate_field(&self, text: &str) -> Option<(InputField, usize)> {
        self.registry
            .inputs()
            .filter_map(|(field, name)| find_word(text, name).map(|at| (field, name, at)))
            .min_by_key(|&(_, name, at)| (at, Reverse(name.len())))
            .map(|(field, name, at)| (field, at + name.len()))
    }

    fn action(&mut self, line: &str) -> Option<Action> {
        let stmt = line.trim().trim_end_matches(';').trim();
        if stmt.is_empty() {
            return None;
        }
        let Some((left, right)) = stmt.split_once('=') else {
            self.skip(Clause::Then, stmt, SkipReason::MissingAssignment);
            return None;
        };
        let Some(output) = self.registry.output_named(left.trim()) else {
            self.skip(Clause::Then, stmt, SkipReason::UnknownField);
            return None;
        };
        Some(Action {
            output,
            value: self.codec.decode(right),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OutputField;

    fn entity(when: &str, then: &[&str]) -> RuleTextEntity {
        RuleTextEntity {
            name: "R".into(),
            description: "d".into(),
            salience: "7".into(),
            when: when.into(),
            then: then.iter().map(|s| (*s).to_owned()).collect(),
        }
    }

    fn run(when: &str, then: &[&str]) -> ParsedRule {
        interpret(
            &entity(when, then),
            &FieldRegistry::ecommerce(),
            &ValueCodec::default(),
        )
        .unwrap()
    }

    fn only_expr(parsed: &ParsedRule) -> &Expression {
        assert_eq!(parsed.rule.conditions.len(), 1);
        assert_eq!(parsed.rule.conditions[0].expressions.len(), 1);
        &parsed.rule.conditions[0].expressions[0]
    }

    #[test]
    fn gte_beats_gt() {
        let parsed = run("Customer.CartTotal >= 500", &[]);
        assert_eq!(
            only_expr(&parsed),
            &Expression::new(InputField::CartTotal, Operator::GreaterThanEquals, 500.0_f32)
        );
    }

    #[test]
    fn lte_beats_lt() {
        let parsed = run("( Customer.Age <= 30 )", &[]);
        assert_eq!(only_expr(&parsed).operator, Operator::LessThanEquals);
    }

    #[test]
    fn all_infix_operators() {
        let ops = [
            ("<", Operator::LessThan),
            ("<=", Operator::LessThanEquals),
            (">", Operator::GreaterThan),
            (">=", Operator::GreaterThanEquals),
            ("==", Operator::Equals),
            ("!=", Operator::NotEquals),
        ];
        for (sym, expected) in ops {
            let parsed = run(&format!("( Customer.Age {sym} 3 )"), &[]);
            assert_eq!(only_expr(&parsed).operator, expected, "failed for {sym}");
            assert_eq!(only_expr(&parsed).value, RuleValue::Float(3.0));
        }
    }

    #[test]
    fn splits_on_and() {
        let parsed = run(
            "( Customer.Age > 25 ) && ( Customer.IsLoyaltyProgramMember == true )",
            &[],
        );
        let cond = &parsed.rule.conditions[0];
        assert_eq!(cond.expression_join_operator, JoinOperator::And);
        assert_eq!(cond.expressions.len(), 2);
        assert_eq!(cond.expressions[1].value, RuleValue::Bool(true));
    }

    #[test]
    fn string_values_are_unquoted() {
        let parsed = run("( Customer.LastCategoryPurchased == \"Electronics\" )", &[]);
        assert_eq!(
            only_expr(&parsed).value,
            RuleValue::String("Electronics".into())
        );
    }

    #[test]
    fn leftmost_field_name_wins() {
        let parsed = run("Customer.SignupDaysAgo > Customer.Age", &[]);
        assert_eq!(only_expr(&parsed).input, InputField::SignupDaysAgo);
        assert_eq!(
            only_expr(&parsed).value,
            RuleValue::String("Customer.Age".into())
        );
    }

    #[test]
    fn field_name_must_be_whole_word() {
        let parsed = run("Customer.AgeBand > 3", &[]);
        assert_eq!(parsed.skipped[0].reason, SkipReason::UnknownField);
    }

    #[test]
    fn set_membership_call() {
        let parsed = run(
            "( Customer.HasCategory(Customer.PreferredCategories, \"Electronics\", \"Home\") )",
            &[],
        );
        assert_eq!(
            only_expr(&parsed),
            &Expression::new(
                InputField::PreferredCategories,
                Operator::HasCategory,
                RuleValue::StringList("Electronics, Home".into())
            )
        );
    }

    #[test]
    fn set_membership_with_unknown_field_is_skipped() {
        let parsed = run("Customer.HasCategory(Customer.Wishlist, \"a\")", &[]);
        assert!(parsed.rule.conditions.is_empty());
        assert_eq!(parsed.skipped[0].reason, SkipReason::UnknownField);
    }

    #[test]
    fn unknown_field_is_skipped_and_recorded() {
        let parsed = run("( Customer.Height > 2 ) && ( Customer.Age > 1 )", &[]);
        assert_eq!(parsed.rule.conditions[0].expressions.len(), 1);
        assert_eq!(
            parsed.skipped,
            vec![SkippedFragment {
                clause: Clause::When,
                text: "Customer.Height > 2".into(),
                reason: SkipReason::UnknownField,
            }]
        );
        assert!(!parsed.is_complete());
    }

    #[test]
    fn missing_operator_is_skipped() {
        let parsed = run("Customer.Age ~ 3", &[]);
        assert!(parsed.rule.conditions.is_empty());
        assert_eq!(parsed.skipped[0].reason, SkipReason::UnknownOperator);
    }

    #[test]
    fn or_join_is_skipped() {
        let parsed = run("( Customer.Age > 1 ) || ( Customer.Age < 9 )", &[]);
        assert!(parsed.rule.conditions.is_empty());
        assert_eq!(parsed.skipped[0].reason, SkipReason::UnsupportedJoin);
    }

    #[test]
    fn actions_in_order() {
        let parsed = run(
            "Customer.Age > 1",
            &[
                "Offer.ApplyFlatDiscount = 200.00;",
                "Offer.ShowPromotionId = \"LOYAL25\";",
            ],
        );
        assert_eq!(
            parsed.rule.actions,
            vec![
                Action::new(OutputField::ApplyFlatDiscount, 200.0_f32),
                Action::new(OutputField::ShowPromotionId, "LOYAL25"),
            ]
        );
        assert!(parsed.is_complete());
    }

    #[test]
    fn action_value_may_contain_equals() {
        let parsed = run("Customer.Age > 1", &["Offer.PromoMessage = \"a=b\";"]);
        assert_eq!(parsed.rule.actions[0].value, RuleValue::String("a=b".into()));
    }

    #[test]
    fn unknown_action_field_and_bare_statement_are_skipped() {
        let parsed = run(
            "Customer.Age > 1",
            &["Offer.Unknown = 1;", "Retract(\"R\");", "Offer.FreeShipping = true;"],
        );
        assert_eq!(parsed.rule.actions.len(), 1);
        let reasons: Vec<_> = parsed.skipped.iter().map(|s| s.reason).collect();
        assert_eq!(
            reasons,
            vec![SkipReason::UnknownField, SkipReason::MissingAssignment]
        );
        assert!(parsed.skipped.iter().all(|s| s.clause == Clause::Then));
    }

    #[test]
    fn header_fields_carry_over() {
        let parsed = run("Customer.Age > 1", &[]);
        assert_eq!(parsed.rule.name, "R");
        assert_eq!(parsed.rule.description, "d");
        assert_eq!(parsed.rule.salience, 7);
    }

    #[test]
    fn invalid_salience_in_entity() {
        let mut e = entity("Customer.Age > 1", &[]);
        e.salience = "-1".into();
        let err = interpret(&e, &FieldRegistry::ecommerce(), &ValueCodec::default()).unwrap_err();
        assert!(matches!(err, ParseError::MalformedInput { .. }));
    }

    #[test]
    fn clause_display() {
        assert_eq!(Clause::When.to_string(), "when");
        assert_eq!(Clause::Then.to_string(), "then");
    }
}
