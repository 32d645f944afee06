//! Error types for lexing, parsing and evaluation
//!
//! Every variant records the byte offset into the expression text of the
//! construct that failed, so a host can point at the problem without
//! re-parsing.

use thiserror::Error;

use crate::value::ValueKind;

/// Failure while tokenizing expression text.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LexError {
    /// A character that cannot start any token
    #[error("unexpected character {ch:?} at offset {offset}")]
    UnexpectedChar {
        /// The offending character
        ch: char,
        /// Byte offset of the character
        offset: usize,
    },

    /// A string literal with no closing quote
    #[error("unterminated string literal starting at offset {offset}")]
    UnterminatedString {
        /// Byte offset of the opening quote
        offset: usize,
    },

    /// A backslash escape outside the supported set
    #[error("invalid escape sequence `\\{escape}` in string literal at offset {offset}")]
    InvalidEscape {
        /// Character following the backslash
        escape: char,
        /// Byte offset of the string literal
        offset: usize,
    },

    /// A numeric literal that does not fit its type
    #[error("invalid numeric literal `{literal}` at offset {offset}")]
    InvalidNumber {
        /// Literal text
        literal: String,
        /// Byte offset of the literal
        offset: usize,
    },
}

impl LexError {
    /// Byte offset of the failure.
    pub fn offset(&self) -> usize {
        match self {
            LexError::UnexpectedChar { offset, .. }
            | LexError::UnterminatedString { offset }
            | LexError::InvalidEscape { offset, .. }
            | LexError::InvalidNumber { offset, .. } => *offset,
        }
    }
}

/// Failure while building the syntax tree.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// A token that does not fit the grammar at this point
    #[error("expected {expected}, found `{found}` at offset {offset}")]
    UnexpectedToken {
        /// Description of what the grammar required
        expected: String,
        /// Lexeme actually found
        found: String,
        /// Byte offset of the found token
        offset: usize,
    },

    /// Input ended before the expression was complete
    #[error("expected {expected}, found end of input at offset {offset}")]
    UnexpectedEnd {
        /// Description of what the grammar required
        expected: String,
        /// Byte offset of the end of input
        offset: usize,
    },

    /// Call syntax applied to something other than a function name
    #[error("only named functions can be called (offset {offset})")]
    InvalidCallTarget {
        /// Byte offset of the opening parenthesis
        offset: usize,
    },

    /// Nesting exceeded the configured maximum depth
    #[error("expression nested deeper than {limit} levels at offset {offset}")]
    TooDeeplyNested {
        /// Configured limit
        limit: usize,
        /// Byte offset where the limit was crossed
        offset: usize,
    },

    /// Node count exceeded the configured maximum
    #[error("expression has more than {limit} nodes (offset {offset})")]
    TooManyNodes {
        /// Configured limit
        limit: usize,
        /// Byte offset where the limit was crossed
        offset: usize,
    },
}

impl ParseError {
    /// Byte offset of the failure.
    pub fn offset(&self) -> usize {
        match self {
            ParseError::UnexpectedToken { offset, .. }
            | ParseError::UnexpectedEnd { offset, .. }
            | ParseError::InvalidCallTarget { offset }
            | ParseError::TooDeeplyNested { offset, .. }
            | ParseError::TooManyNodes { offset, .. } => *offset,
        }
    }
}

/// Failure while evaluating a syntax tree.
#[derive(Error, Debug)]
pub enum EvalError {
    /// Identifier not present in the variables mapping
    #[error("undefined variable `{name}` at offset {offset}")]
    UndefinedVariable {
        /// Variable name
        name: String,
        /// Byte offset of the identifier
        offset: usize,
    },

    /// Callee not present in the functions mapping
    #[error("undefined function `{name}` at offset {offset}")]
    UndefinedFunction {
        /// Function name
        name: String,
        /// Byte offset of the call
        offset: usize,
    },

    /// Operator applied to operands of the wrong kind
    #[error("type error at offset {offset}: cannot apply `{op}` to {}", kinds(.operands))]
    TypeError {
        /// Operator symbol (`+`, `[]`, `?:`, ...)
        op: String,
        /// Kinds of the operands, left to right
        operands: Vec<ValueKind>,
        /// Byte offset of the operator
        offset: usize,
    },

    /// Index outside the bounds of a list or string
    #[error("index {index} out of range for length {len} at offset {offset}")]
    IndexOutOfRange {
        /// Requested index
        index: i64,
        /// Length of the indexed value
        len: usize,
        /// Byte offset of the index expression
        offset: usize,
    },

    /// Integer division or remainder by zero
    #[error("division by zero in `{op}` at offset {offset}")]
    DivisionByZero {
        /// `/` or `%`
        op: String,
        /// Byte offset of the operator
        offset: usize,
    },

    /// Checked integer arithmetic overflowed
    #[error("integer overflow in `{op}` at offset {offset}")]
    IntegerOverflow {
        /// Operator symbol
        op: String,
        /// Byte offset of the operator
        offset: usize,
    },

    /// A host function returned an error
    #[error("function `{function}` failed at offset {offset}: {source}")]
    Callback {
        /// Name the function was called by
        function: String,
        /// Byte offset of the call
        offset: usize,
        /// The host's error, unchanged
        #[source]
        source: anyhow::Error,
    },
}

impl EvalError {
    /// Byte offset of the failure.
    pub fn offset(&self) -> usize {
        match self {
            EvalError::UndefinedVariable { offset, .. }
            | EvalError::UndefinedFunction { offset, .. }
            | EvalError::TypeError { offset, .. }
            | EvalError::IndexOutOfRange { offset, .. }
            | EvalError::DivisionByZero { offset, .. }
            | EvalError::IntegerOverflow { offset, .. }
            | EvalError::Callback { offset, .. } => *offset,
        }
    }

    pub(crate) fn type_error(op: &str, operands: &[&crate::Value], offset: usize) -> Self {
        EvalError::TypeError {
            op: op.to_string(),
            operands: operands.iter().map(|v| v.kind()).collect(),
            offset,
        }
    }
}

/// Render operand kinds as `int and bool` or `list, string and int`.
fn kinds(operands: &[ValueKind]) -> String {
    match operands {
        [] => "no operands".to_string(),
        [only] => only.to_string(),
        [init @ .., last] => {
            let head: Vec<&str> = init.iter().map(|k| k.name()).collect();
            format!("{} and {}", head.join(", "), last)
        }
    }
}

/// Any failure of the expression pipeline.
#[derive(Error, Debug)]
pub enum Error {
    /// Tokenizing failed
    #[error(transparent)]
    Lex(#[from] LexError),

    /// Parsing failed
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Evaluation failed
    #[error(transparent)]
    Eval(#[from] EvalError),
}

impl Error {
    /// Byte offset into the expression text where the failure occurred.
    pub fn offset(&self) -> usize {
        match self {
            Error::Lex(e) => e.offset(),
            Error::Parse(e) => e.offset(),
            Error::Eval(e) => e.offset(),
        }
    }
}

/// Result type alias for the whole pipeline
pub type Result<T> = std::result::Result<T, Error>;
