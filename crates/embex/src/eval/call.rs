//! Host function call evaluation

use crate::ast::Expr;
use crate::{Environment, EvalError, Value};

use super::Evaluate;

/// Evaluate `name(args...)`.
///
/// The function is resolved before any argument is evaluated, and the
/// arguments are evaluated left to right. A host error is wrapped in
/// [`EvalError::Callback`] without being altered.
///
/// # Errors
///
/// Returns `UndefinedFunction` if `name` is not bound.
pub fn eval_call(
    name: &str,
    args: &[Expr],
    offset: usize,
    env: &Environment<'_>,
) -> Result<Value, EvalError> {
    let func = env
        .function(name)
        .ok_or_else(|| EvalError::UndefinedFunction {
            name: name.to_string(),
            offset,
        })?;

    // Evaluate arguments
    let args: Vec<Value> = args
        .iter()
        .map(|arg| arg.eval(env))
        .collect::<Result<Vec<_>, _>>()?;

    tracing::trace!(function = name, argc = args.len(), offset, "calling host function");

    func(&args).map_err(|source| EvalError::Callback {
        function: name.to_string(),
        offset,
        source,
    })
}
