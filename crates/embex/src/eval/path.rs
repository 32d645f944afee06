//! Identifier evaluation (variable lookup)

use crate::{Environment, EvalError, Value};

/// Resolve a variable against the host's bindings.
///
/// There is no implicit `nil` for unknown names.
pub fn eval_ident(name: &str, offset: usize, env: &Environment<'_>) -> Result<Value, EvalError> {
    env.variable(name)
        .cloned()
        .ok_or_else(|| EvalError::UndefinedVariable {
            name: name.to_string(),
            offset,
        })
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{eval, eval_in};
    use crate::{EvalError, Functions, Value, Variables};
    use std::sync::Arc;

    #[test]
    fn test_eval_ident_defined() {
        let mut vars = Variables::new();
        vars.insert("x".to_string(), Value::Int(42));
        assert_eq!(
            eval_in("x", &vars, &Functions::new()).unwrap(),
            Value::Int(42)
        );
    }

    #[test]
    fn test_eval_ident_undefined() {
        let err = eval("unknownVar + 1").unwrap_err();
        assert!(matches!(
            err,
            EvalError::UndefinedVariable { ref name, offset: 0 } if name == "unknownVar"
        ));
    }

    #[test]
    fn test_eval_ident_shares_host_storage() {
        let list = Value::list(vec![Value::Int(1), Value::Int(2)]);
        let mut vars = Variables::new();
        vars.insert("xs".to_string(), list.clone());

        let result = eval_in("xs", &vars, &Functions::new()).unwrap();
        match (&result, &list) {
            (Value::List(a), Value::List(b)) => assert!(Arc::ptr_eq(a, b)),
            _ => panic!("expected list"),
        }
    }
}
