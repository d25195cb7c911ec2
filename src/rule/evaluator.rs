//! Rule evaluator

use crate::config::FieldLookup;
use crate::error::{Result, RuleError};
use crate::rule::ast::{Literal, Node, Operator};
use crate::rule::value::{Context, Value};
use std::cmp::Ordering;

/// Evaluate an AST against a context with permissive field lookup.
///
/// An absent tree evaluates to `false`.
pub fn evaluate<'n>(node: impl Into<Option<&'n Node>>, ctx: &Context) -> Result<Value> {
    evaluate_with(node, ctx, FieldLookup::Permissive)
}

/// Evaluate an AST against a context
pub fn evaluate_with<'n>(
    node: impl Into<Option<&'n Node>>,
    ctx: &Context,
    lookup: FieldLookup,
) -> Result<Value> {
    match node.into() {
        Some(node) => eval_node(node, ctx, lookup),
        None => Ok(Value::Bool(false)),
    }
}

/// Evaluate and reduce the result to a decision by truthiness
pub fn check<'n>(node: impl Into<Option<&'n Node>>, ctx: &Context) -> Result<bool> {
    check_with(node, ctx, FieldLookup::Permissive)
}

pub fn check_with<'n>(
    node: impl Into<Option<&'n Node>>,
    ctx: &Context,
    lookup: FieldLookup,
) -> Result<bool> {
    evaluate_with(node, ctx, lookup).map(|v| v.is_truthy())
}

/// Resolve a field reference. Under [`FieldLookup::Permissive`] a name
/// missing from the context evaluates to itself as text.
pub fn resolve_field(name: &str, ctx: &Context, lookup: FieldLookup) -> Result<Value> {
    match (ctx.get(name), lookup) {
        (Some(value), _) => Ok(value.clone()),
        (None, FieldLookup::Permissive) => Ok(Value::Text(name.to_string())),
        (None, FieldLookup::Strict) => Err(RuleError::FieldNotFound(name.to_string())),
    }
}

fn eval_node(node: &Node, ctx: &Context, lookup: FieldLookup) -> Result<Value> {
    // both sides are always evaluated, left first
    node.fold(
        |literal| match literal {
            Literal::Integer(i) => Ok(Value::Integer(*i)),
            Literal::Text(s) => Ok(Value::Text(s.clone())),
            Literal::Field(name) => resolve_field(name, ctx, lookup),
        },
        |op, left, right| apply(op, &left, &right),
    )
}

fn apply(op: &Operator, left: &Value, right: &Value) -> Result<Value> {
    match op {
        Operator::And => logical(op, left, right, |a, b| a & b, |a, b| a & b),
        Operator::Or => logical(op, left, right, |a, b| a | b, |a, b| a | b),
        Operator::Greater => ordered(op, left, right).map(|o| Value::Bool(o == Ordering::Greater)),
        Operator::Less => ordered(op, left, right).map(|o| Value::Bool(o == Ordering::Less)),
        Operator::Equal => Ok(Value::Bool(left.compare(right) == Some(Ordering::Equal))),
        Operator::Other(symbol) => Err(RuleError::UnknownOperator(symbol.clone())),
    }
}

/// Bool pairs combine logically; integer pairs (bools counted as 0/1) bitwise
fn logical(
    op: &Operator,
    left: &Value,
    right: &Value,
    on_bool: fn(bool, bool) -> bool,
    on_int: fn(i64, i64) -> i64,
) -> Result<Value> {
    if let (Value::Bool(a), Value::Bool(b)) = (left, right) {
        return Ok(Value::Bool(on_bool(*a, *b)));
    }

    match (left.as_integer(), right.as_integer()) {
        (Some(a), Some(b)) => Ok(Value::Integer(on_int(a, b))),
        _ => Err(mismatch(op, left, right)),
    }
}

fn ordered(op: &Operator, left: &Value, right: &Value) -> Result<Ordering> {
    left.compare(right).ok_or_else(|| mismatch(op, left, right))
}

fn mismatch(op: &Operator, left: &Value, right: &Value) -> RuleError {
    RuleError::TypeMismatch {
        operator: op.symbol().to_string(),
        left: left.type_name().to_string(),
        right: right.type_name().to_string(),
    }
}
