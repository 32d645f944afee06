//! Conditional expression evaluation

use super::Evaluate;
use crate::ast::Expr;
use crate::{Environment, EvalError, Value};

/// Evaluate `cond ? then_branch : else_branch`.
///
/// Exactly one branch is visited.
pub fn eval_ternary(
    cond: &Expr,
    then_branch: &Expr,
    else_branch: &Expr,
    offset: usize,
    env: &Environment<'_>,
) -> Result<Value, EvalError> {
    // Condition must be boolean
    match cond.eval(env)? {
        Value::Bool(true) => then_branch.eval(env),
        Value::Bool(false) => else_branch.eval(env),
        other => Err(EvalError::type_error("?:", &[&other], offset)),
    }
}
