//! Evaluation context configuration

/// Default maximum nesting depth of an expression.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Default maximum number of syntax tree nodes in an expression.
pub const DEFAULT_MAX_NODES: usize = 10_000;

/// Resource limits applied to every expression.
///
/// Evaluation recurses over the syntax tree, so an adversarially deep or
/// wide expression could exhaust the stack or take unbounded time. The
/// parser enforces both limits while building the tree and rejects the
/// expression with a dedicated error before anything is evaluated. Parsing
/// and evaluation grow the stack on demand, so any expression within the
/// limits runs on an ordinary 2 MiB thread stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalContext {
    /// Maximum nesting depth (parentheses, operators, postfix chains)
    pub max_depth: usize,

    /// Maximum number of syntax tree nodes
    pub max_nodes: usize,
}

impl Default for EvalContext {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_nodes: DEFAULT_MAX_NODES,
        }
    }
}

impl EvalContext {
    /// Create a new context with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the nesting depth limit.
    pub fn with_max_depth(self, max_depth: usize) -> Self {
        Self { max_depth, ..self }
    }

    /// Set the node count limit.
    pub fn with_max_nodes(self, max_nodes: usize) -> Self {
        Self { max_nodes, ..self }
    }
}
