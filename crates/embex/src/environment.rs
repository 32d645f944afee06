//! Per-call environment: the host's variables and functions

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::value::Value;

/// Signature of a host function callable from expressions.
///
/// Receives the evaluated arguments in call order. An `Err` aborts the
/// evaluation and reaches the caller as
/// [`EvalError::Callback`](crate::EvalError::Callback), unchanged apart from
/// the function name and call offset added around it.
pub type HostFn = dyn Fn(&[Value]) -> anyhow::Result<Value> + Send + Sync;

/// Shared handle to a host function.
pub type Function = Arc<HostFn>;

/// Variable bindings supplied by the host.
pub type Variables = HashMap<String, Value>;

/// Function bindings supplied by the host.
pub type Functions = HashMap<String, Function>;

/// Wrap a closure as a [`Function`].
///
/// # Example
///
/// ```
/// use embex::{function, Functions, Value};
///
/// let mut functions = Functions::new();
/// functions.insert(
///     "len".to_string(),
///     function(|args| match args {
///         [Value::List(items)] => Ok(Value::Int(items.len() as i64)),
///         _ => anyhow::bail!("len expects one list"),
///     }),
/// );
/// ```
pub fn function<F>(f: F) -> Function
where
    F: Fn(&[Value]) -> anyhow::Result<Value> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// The bindings visible to one evaluation.
///
/// Both mappings are borrowed from the host for the duration of the call
/// and never mutated; values are handed out by cheap clone of their shared
/// storage, never deep-copied.
#[derive(Clone, Copy)]
pub struct Environment<'a> {
    variables: &'a Variables,
    functions: &'a Functions,
}

impl<'a> Environment<'a> {
    /// Pair a variables mapping with a functions mapping.
    pub fn new(variables: &'a Variables, functions: &'a Functions) -> Self {
        Self {
            variables,
            functions,
        }
    }

    /// Look up a variable by exact (case-sensitive) name.
    pub fn variable(&self, name: &str) -> Option<&'a Value> {
        self.variables.get(name)
    }

    /// Look up a function by exact (case-sensitive) name.
    pub fn function(&self, name: &str) -> Option<&'a Function> {
        self.functions.get(name)
    }
}

impl fmt::Debug for Environment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("Environment")
            .field("variables", self.variables)
            .field("functions", &names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_sensitive() {
        let mut variables = Variables::new();
        variables.insert("Total".to_string(), Value::Int(3));
        let functions = Functions::new();
        let env = Environment::new(&variables, &functions);

        assert_eq!(env.variable("Total"), Some(&Value::Int(3)));
        assert_eq!(env.variable("total"), None);
    }

    #[test]
    fn test_function_lookup() {
        let variables = Variables::new();
        let mut functions = Functions::new();
        functions.insert("one".to_string(), function(|_| Ok(Value::Int(1))));
        let env = Environment::new(&variables, &functions);

        let f = env.function("one").expect("registered");
        assert_eq!(f(&[]).unwrap(), Value::Int(1));
        assert!(env.function("two").is_none());
    }
}
