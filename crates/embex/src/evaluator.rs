//! Evaluator front door
//!
//! Ties the lexer, parser and tree-walker together. An [`Evaluator`] only
//! carries its [`EvalContext`]; all bindings arrive per call, so one
//! evaluator can be shared freely across threads.

use crate::ast::Expr;
use crate::context::EvalContext;
use crate::error::Result;
use crate::eval::Evaluate;
use crate::lexer::tokenize;
use crate::parser::Parser;
use crate::{Environment, Functions, Value, Variables};

/// Parses and evaluates expressions under a fixed set of limits.
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    ctx: EvalContext,
}

impl Evaluator {
    /// Create an evaluator with the default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an evaluator with custom limits.
    pub fn with_context(ctx: EvalContext) -> Self {
        Self { ctx }
    }

    /// The limits this evaluator enforces.
    pub fn context(&self) -> &EvalContext {
        &self.ctx
    }

    /// Parse `src` into a syntax tree without evaluating it.
    ///
    /// The tree can be evaluated any number of times with
    /// [`eval_ast`](Self::eval_ast).
    pub fn parse(&self, src: &str) -> Result<Expr> {
        let tokens = tokenize(src)?;
        let expr = Parser::new(tokens, self.ctx).parse()?;
        Ok(expr)
    }

    /// Evaluate an already parsed expression.
    pub fn eval_ast(
        &self,
        expr: &Expr,
        variables: &Variables,
        functions: &Functions,
    ) -> Result<Value> {
        let env = Environment::new(variables, functions);
        Ok(expr.eval(&env)?)
    }

    /// Parse and evaluate `src` against the given bindings.
    ///
    /// # Errors
    ///
    /// Returns the first lexical, syntactic or evaluation error met. No
    /// partial result is produced.
    pub fn evaluate(
        &self,
        src: &str,
        variables: &Variables,
        functions: &Functions,
    ) -> Result<Value> {
        tracing::debug!(
            len = src.len(),
            variables = variables.len(),
            functions = functions.len(),
            "evaluating expression"
        );

        let result = self
            .parse(src)
            .and_then(|expr| self.eval_ast(&expr, variables, functions));

        match &result {
            Ok(value) => tracing::debug!(kind = %value.kind(), "evaluation succeeded"),
            Err(err) => tracing::debug!(error = %err, "evaluation failed"),
        }
        result
    }
}
