//! Member access evaluation (`map.key`)

use crate::ast::Expr;
use crate::{Environment, EvalError, Value};

use super::Evaluate;

/// Evaluate `target.field`, the same lookup as `target["field"]`.
///
/// A missing key yields `nil`; a non-map target is a type error.
pub fn eval_member(
    target: &Expr,
    field: &str,
    offset: usize,
    env: &Environment<'_>,
) -> Result<Value, EvalError> {
    match target.eval(env)? {
        Value::Map(map) => Ok(map.get(field).cloned().unwrap_or(Value::Nil)),
        other => Err(EvalError::type_error(".", &[&other], offset)),
    }
}
