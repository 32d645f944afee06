//! Syntax tree for parsed expressions
//!
//! The tree is owned and acyclic: every node owns its children, and a
//! parse produces a fresh tree that is dropped as a whole once the host is
//! done with it.

use std::fmt;

/// A node of the syntax tree together with its source position.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    /// What this node is
    pub kind: ExprKind,
    /// Byte offset of the token that identifies this node (the operator for
    /// operations, the first token for everything else)
    pub offset: usize,
}

impl Expr {
    /// Create a node
    pub fn new(kind: ExprKind, offset: usize) -> Self {
        Self { kind, offset }
    }
}

/// One variant per syntactic construct.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// `42`, `1.5`, `"s"`, `true`, `nil`
    Literal(Literal),

    /// Variable reference
    Ident(String),

    /// `-x`, `!x`, `~x`
    Unary {
        /// The operator
        op: UnaryOp,
        /// The operand
        operand: Box<Expr>,
    },

    /// `a + b` and every other infix operator
    Binary {
        /// The operator
        op: BinaryOp,
        /// Left operand
        left: Box<Expr>,
        /// Right operand
        right: Box<Expr>,
    },

    /// `cond ? then : else`
    Ternary {
        /// Condition, must evaluate to a bool
        cond: Box<Expr>,
        /// Evaluated when the condition is true
        then_branch: Box<Expr>,
        /// Evaluated when the condition is false
        else_branch: Box<Expr>,
    },

    /// `target[index]`
    Index {
        /// The indexed value
        target: Box<Expr>,
        /// The index or key
        index: Box<Expr>,
    },

    /// `target[start:end]` with either bound optional
    Slice {
        /// The sliced value
        target: Box<Expr>,
        /// Inclusive lower bound, defaults to 0
        start: Option<Box<Expr>>,
        /// Exclusive upper bound, defaults to the length
        end: Option<Box<Expr>>,
    },

    /// `target.field`
    Member {
        /// The accessed map
        target: Box<Expr>,
        /// Key name
        field: String,
    },

    /// `name(args...)`
    Call {
        /// Function name
        name: String,
        /// Arguments, evaluated left to right
        args: Vec<Expr>,
    },

    /// `[a, b, c]`
    List(Vec<Expr>),

    /// `{key: value, "other key": value}`
    Map(Vec<(String, Expr)>),
}

/// Literal constants.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// `nil`
    Nil,
    /// `true` / `false`
    Bool(bool),
    /// Integer literal
    Int(i64),
    /// Float literal
    Float(f64),
    /// String literal, escapes resolved
    Str(String),
}

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `-`
    Neg,
    /// `!`
    Not,
    /// `~`
    BitNot,
}

impl UnaryOp {
    /// Source symbol
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
            UnaryOp::BitNot => "~",
        }
    }
}

/// Infix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Rem,
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `&&`
    And,
    /// `||`
    Or,
    /// `&`
    BitAnd,
    /// `|`
    BitOr,
    /// `^`
    BitXor,
    /// `<<`
    Shl,
    /// `>>`
    Shr,
    /// `in`
    In,
}

impl BinaryOp {
    /// Source symbol
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::In => "in",
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
