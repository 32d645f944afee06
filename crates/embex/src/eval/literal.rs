//! Literal evaluation

use crate::ast::Literal;
use crate::Value;

/// Evaluate a literal to a Value.
///
/// String literals get fresh storage, so the result never aliases the tree.
pub fn eval_literal(lit: &Literal) -> Value {
    match lit {
        Literal::Nil => Value::Nil,
        Literal::Bool(b) => Value::Bool(*b),
        Literal::Int(n) => Value::Int(*n),
        Literal::Float(n) => Value::Float(*n),
        Literal::Str(s) => Value::string(s),
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::eval;
    use crate::Value;

    #[test]
    fn test_eval_lit_scalars() {
        assert_eq!(eval("42").unwrap(), Value::Int(42));
        assert_eq!(eval("0x10").unwrap(), Value::Int(16));
        assert_eq!(eval("2.5").unwrap(), Value::Float(2.5));
        assert_eq!(eval("true").unwrap(), Value::Bool(true));
        assert_eq!(eval("nil").unwrap(), Value::Nil);
    }

    #[test]
    fn test_eval_lit_string() {
        assert_eq!(eval(r#""a\tb""#).unwrap(), Value::string("a\tb"));
        assert_eq!(eval("'single'").unwrap(), Value::string("single"));
    }
}
