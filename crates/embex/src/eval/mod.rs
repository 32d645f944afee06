//! Expression evaluation

pub mod binary;
pub mod call;
pub mod collection;
pub mod field;
pub mod index;
pub mod literal;
pub mod path;
pub mod ternary;
pub mod unary;

use crate::ast::{Expr, ExprKind};
use crate::stack::ensure_sufficient_stack;
use crate::{Environment, EvalError, Value};

/// Trait for evaluating AST nodes to values.
///
/// This is the core abstraction for the tree-walking interpreter.
/// Evaluation only reads the environment; the sole side effects are those
/// of host functions it calls.
pub trait Evaluate {
    /// Evaluate this AST node in the given environment.
    fn eval(&self, env: &Environment<'_>) -> Result<Value, EvalError>;
}

// ═══════════════════════════════════════════════════════════════════════
// Main Expression Dispatcher
// ═══════════════════════════════════════════════════════════════════════

impl Evaluate for Expr {
    fn eval(&self, env: &Environment<'_>) -> Result<Value, EvalError> {
        let offset = self.offset;

        ensure_sufficient_stack(|| match &self.kind {
            ExprKind::Literal(lit) => Ok(literal::eval_literal(lit)),
            ExprKind::Ident(name) => path::eval_ident(name, offset, env),

            ExprKind::Unary { op, operand } => unary::eval_unary(*op, operand, offset, env),
            ExprKind::Binary { op, left, right } => {
                binary::eval_binary(*op, left, right, offset, env)
            }
            ExprKind::Ternary {
                cond,
                then_branch,
                else_branch,
            } => ternary::eval_ternary(cond, then_branch, else_branch, offset, env),

            ExprKind::Index { target, index } => index::eval_index(target, index, offset, env),
            ExprKind::Slice { target, start, end } => {
                index::eval_slice(target, start.as_deref(), end.as_deref(), offset, env)
            }
            ExprKind::Member { target, field } => field::eval_member(target, field, offset, env),

            ExprKind::Call { name, args } => call::eval_call(name, args, offset, env),

            ExprKind::List(items) => collection::eval_list(items, env),
            ExprKind::Map(entries) => collection::eval_map(entries, env),
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Convenience Functions
// ═══════════════════════════════════════════════════════════════════════

/// Evaluate an expression (convenience wrapper).
pub fn eval_expr(expr: &Expr, env: &Environment<'_>) -> Result<Value, EvalError> {
    expr.eval(env)
}

// Re-export for use by other modules
pub use binary::apply_binary;
pub use index::index_value;
pub use unary::apply_unary;
