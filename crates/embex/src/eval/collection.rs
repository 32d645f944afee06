//! List and map literal evaluation

use crate::ast::Expr;
use crate::value::Map;
use crate::{Environment, EvalError, Value};

use super::Evaluate;

/// Evaluate `[a, b, ...]` left to right.
pub fn eval_list(items: &[Expr], env: &Environment<'_>) -> Result<Value, EvalError> {
    let values: Vec<Value> = items
        .iter()
        .map(|item| item.eval(env))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Value::list(values))
}

/// Evaluate `{k: v, ...}` in source order.
///
/// A repeated key keeps its first position and takes the last value.
pub fn eval_map(entries: &[(String, Expr)], env: &Environment<'_>) -> Result<Value, EvalError> {
    let mut map = Map::with_capacity(entries.len());
    for (key, expr) in entries {
        let value = expr.eval(env)?;
        map.insert(key.clone(), value);
    }
    Ok(Value::map(map))
}
