//! Unary operation evaluation

use crate::ast::{Expr, UnaryOp};
use crate::{Environment, EvalError, Value};

use super::Evaluate;

/// Evaluate `op operand`.
pub fn eval_unary(
    op: UnaryOp,
    operand: &Expr,
    offset: usize,
    env: &Environment<'_>,
) -> Result<Value, EvalError> {
    let value = operand.eval(env)?;
    apply_unary(op, value, offset)
}

/// Apply a unary operator to an evaluated operand.
pub fn apply_unary(op: UnaryOp, operand: Value, offset: usize) -> Result<Value, EvalError> {
    match (op, &operand) {
        // Negation keeps the operand's numeric kind
        (UnaryOp::Neg, Value::Int(n)) => n
            .checked_neg()
            .map(Value::Int)
            .ok_or_else(|| EvalError::IntegerOverflow {
                op: "-".to_string(),
                offset,
            }),
        (UnaryOp::Neg, Value::Float(n)) => Ok(Value::Float(-n)),

        // Logical NOT, no truthiness
        (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),

        // Bitwise NOT
        (UnaryOp::BitNot, Value::Int(n)) => Ok(Value::Int(!n)),

        _ => Err(EvalError::type_error(op.symbol(), &[&operand], offset)),
    }
}
