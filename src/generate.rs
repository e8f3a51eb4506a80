use crate::codec::ValueCodec;
use crate::types::{
    Condition, Expression, FieldRegistry, GenerateError, JoinOperator, Operator, Rule,
    RuleTextEntity,
};

/// Render a structured rule into its textual carrier.
///
/// Validates the rule up front, then renders conditions into the `when` clause
/// and actions into `then` lines in declaration order. Nothing is returned on
/// failure.
pub(crate) fn generate(
    rule: &Rule,
    registry: &FieldRegistry,
    codec: &ValueCodec,
) -> Result<RuleTextEntity, GenerateError> {
    check_header(rule)?;

    let groups: Vec<&Condition> = rule
        .conditions
        .iter()
        .filter(|c| !c.expressions.is_empty())
        .collect();
    if groups.is_empty() {
        return Err(missing(rule, "conditions"));
    }
    if rule.actions.is_empty() {
        return Err(missing(rule, "actions"));
    }

    let when = render_when(&groups, rule.condition_join_operator, registry, codec)?;

    let then = rule
        .actions
        .iter()
        .map(|action| {
            let field = registry.output_name(action.output)?;
            let value = codec.encode(&action.value).map_err(|source| {
                GenerateError::UnsupportedValueType {
                    field: field.to_owned(),
                    source,
                }
            })?;
            Ok(format!("{field} = {value};"))
        })
        .collect::<Result<Vec<_>, GenerateError>>()?;

    tracing::trace!(rule = %rule.name, conditions = groups.len(), actions = then.len(), "rendered rule");

    Ok(RuleTextEntity {
        name: rule.name.clone(),
        description: rule.description.clone(),
        salience: rule.salience.to_string(),
        when,
        then,
    })
}

/// The header is matched as `rule <token> "<text>" salience <digits> {`, so the
/// name must be a bare token and the description must not close its quotes early.
fn check_header(rule: &Rule) -> Result<(), GenerateError> {
    let invalid = |field, value: &str, reason| GenerateError::InvalidHeader {
        field,
        value: value.to_owned(),
        reason,
    };

    let name = rule.name.as_str();
    if name.is_empty() {
        return Err(invalid("name", name, "names cannot be empty"));
    }
    if name.chars().any(char::is_whitespace) {
        return Err(invalid("name", name, "names cannot contain whitespace"));
    }
    if name.contains(['"', '{', '}']) {
        return Err(invalid("name", name, "names cannot contain quotes or braces"));
    }

    let desc = rule.description.as_str();
    if desc.contains('"') {
        return Err(invalid("description", desc, "descriptions cannot contain quotes"));
    }
    if desc.ends_with('\\') {
        return Err(invalid("description", desc, "descriptions cannot end with a backslash"));
    }
    Ok(())
}

fn missing(rule: &Rule, what: &'static str) -> GenerateError {
    GenerateError::MissingConditionsOrActions {
        rule: rule.name.clone(),
        missing: what,
    }
}

fn render_when(
    groups: &[&Condition],
    join: JoinOperator,
    registry: &FieldRegistry,
    codec: &ValueCodec,
) -> Result<String, GenerateError> {
    let outer = join.resolved();
    let mut rendered = Vec::with_capacity(groups.len());
    for group in groups {
        let inner = group.expression_join_operator.resolved();
        let token = registry.join_token(inner)?;
        let exprs = group
            .expressions
            .iter()
            .map(|e| render_expression(e, registry, codec))
            .collect::<Result<Vec<_>, _>>()?;
        let joined = exprs.join(token);
        // `&&` binds tighter than `||` in the engine, so a group joined differently
        // from its neighbours needs its own parentheses.
        if groups.len() > 1 && exprs.len() > 1 && inner != outer {
            rendered.push(format!("( {joined} )"));
        } else {
            rendered.push(joined);
        }
    }
    Ok(rendered.join(registry.join_token(outer)?))
}

fn render_expression(
    expr: &Expression,
    registry: &FieldRegistry,
    codec: &ValueCodec,
) -> Result<String, GenerateError> {
    let field = registry.input_name(expr.input)?;
    let token = registry.operator_token(expr.operator)?;

    if expr.operator == Operator::HasCategory {
        let items = codec.encode_list(&expr.value);
        if items.is_empty() {
            return Err(GenerateError::EmptyCollection {
                field: field.to_owned(),
            });
        }
        let call = match field.split_once('.') {
            Some((owner, _)) => format!("{owner}.{token}"),
            None => token.to_owned(),
        };
        return Ok(format!("( {call}({field}, {items}) )"));
    }

    let value = codec
        .encode(&expr.value)
        .map_err(|source| GenerateError::UnsupportedValueType {
            field: field.to_owned(),
            source,
        })?;
    Ok(format!("( {field}{token}{value} )"))
}
