//! # Embex
//!
//! An embeddable expression evaluator.
//!
//! A host application hands Embex a single-line expression together with a
//! set of named variables and host functions, and gets back a [`Value`] or a
//! precise error. Expressions are side-effect free apart from the host
//! functions they call: there is no assignment, no loops and no user-defined
//! functions.
//!
//! ```
//! use embex::{evaluate, function, Functions, Value, Variables};
//!
//! let mut variables = Variables::new();
//! variables.insert("price".to_string(), Value::Int(40));
//!
//! let mut functions = Functions::new();
//! functions.insert(
//!     "max".to_string(),
//!     function(|args| match args {
//!         [Value::Int(a), Value::Int(b)] => Ok(Value::Int(*a.max(b))),
//!         _ => anyhow::bail!("max expects two ints"),
//!     }),
//! );
//!
//! let value = evaluate("max(price, 50) > 45 ? 'high' : 'low'", &variables, &functions);
//! assert_eq!(value.unwrap(), Value::string("high"));
//! ```
//!
//! ## Architecture
//!
//! - **Lexer** ([`lexer`]): source text to offset-tagged tokens
//! - **Parser** ([`parser`]): precedence climbing into an [`Expr`] tree
//! - **Evaluator** ([`eval`]): tree-walking over the [`Environment`]
//!
//! Every error carries the byte offset in the source where it arose.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ast;
pub mod context;
pub mod environment;
pub mod error;
pub mod eval;
pub mod evaluator;
pub mod lexer;
pub mod parser;
mod stack;
pub mod value;

// Re-export main types
pub use ast::Expr;
pub use context::EvalContext;
pub use environment::{function, Environment, Function, Functions, HostFn, Variables};
pub use error::{Error, EvalError, LexError, ParseError, Result};
pub use eval::{eval_expr, Evaluate};
pub use evaluator::Evaluator;
pub use value::{Map, Value, ValueKind};

/// Parse and evaluate `src` with the default limits.
///
/// Shorthand for [`Evaluator::new().evaluate(..)`](Evaluator::evaluate).
pub fn evaluate(src: &str, variables: &Variables, functions: &Functions) -> Result<Value> {
    Evaluator::new().evaluate(src, variables, functions)
}

/// Parse `src` with the default limits.
pub fn parse(src: &str) -> Result<Expr> {
    Evaluator::new().parse(src)
}

/// Embex version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }
}
