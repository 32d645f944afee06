//! Precedence-climbing parser
//!
//! Builds an [`Expr`] tree from the token sequence. Binding strength,
//! lowest first:
//!
//! | level | operators                  | associativity |
//! |-------|----------------------------|---------------|
//! | 0     | `?:`                       | right         |
//! | 1     | `\|\|`                     | left          |
//! | 2     | `&&`                       | left          |
//! | 3     | `\|`                       | left          |
//! | 4     | `^`                        | left          |
//! | 5     | `&`                        | left          |
//! | 6     | `==` `!=`                  | left          |
//! | 7     | `<` `<=` `>` `>=` `in`     | left          |
//! | 8     | `<<` `>>`                  | left          |
//! | 9     | `+` `-`                    | left          |
//! | 10    | `*` `/` `%`                | left          |
//! | 11    | unary `!` `-` `~`          | right         |
//! | 12    | `[]` `[:]` `.` call        | left          |
//!
//! There is no error recovery: the first error aborts the parse.

use crate::ast::{BinaryOp, Expr, ExprKind, Literal, UnaryOp};
use crate::context::EvalContext;
use crate::error::ParseError;
use crate::lexer::{Token, TokenKind};
use crate::stack::ensure_sufficient_stack;

/// Binding power of the loosest binary operator (`||`).
const LOWEST_BINARY_PREC: u8 = 1;

/// Map a token to its infix operator and binding power.
fn infix_op(kind: &TokenKind) -> Option<(BinaryOp, u8)> {
    let entry = match kind {
        TokenKind::PipePipe => (BinaryOp::Or, 1),
        TokenKind::AmpAmp => (BinaryOp::And, 2),
        TokenKind::Pipe => (BinaryOp::BitOr, 3),
        TokenKind::Caret => (BinaryOp::BitXor, 4),
        TokenKind::Amp => (BinaryOp::BitAnd, 5),
        TokenKind::EqEq => (BinaryOp::Eq, 6),
        TokenKind::NotEq => (BinaryOp::Ne, 6),
        TokenKind::Lt => (BinaryOp::Lt, 7),
        TokenKind::LtEq => (BinaryOp::Le, 7),
        TokenKind::Gt => (BinaryOp::Gt, 7),
        TokenKind::GtEq => (BinaryOp::Ge, 7),
        TokenKind::In => (BinaryOp::In, 7),
        TokenKind::Shl => (BinaryOp::Shl, 8),
        TokenKind::Shr => (BinaryOp::Shr, 8),
        TokenKind::Plus => (BinaryOp::Add, 9),
        TokenKind::Minus => (BinaryOp::Sub, 9),
        TokenKind::Star => (BinaryOp::Mul, 10),
        TokenKind::Slash => (BinaryOp::Div, 10),
        TokenKind::Percent => (BinaryOp::Rem, 10),
        _ => return None,
    };
    Some(entry)
}

fn prefix_op(kind: &TokenKind) -> Option<UnaryOp> {
    match kind {
        TokenKind::Minus => Some(UnaryOp::Neg),
        TokenKind::Bang => Some(UnaryOp::Not),
        TokenKind::Tilde => Some(UnaryOp::BitNot),
        _ => None,
    }
}

/// Build the error for a token the grammar did not expect here.
fn unexpected(expected: &str, tok: &Token<'_>) -> ParseError {
    match tok.kind {
        TokenKind::Eof => ParseError::UnexpectedEnd {
            expected: expected.to_string(),
            offset: tok.offset,
        },
        _ => ParseError::UnexpectedToken {
            expected: expected.to_string(),
            found: tok.lexeme.to_string(),
            offset: tok.offset,
        },
    }
}

/// Parser state for a single expression.
pub struct Parser<'src> {
    tokens: Vec<Token<'src>>,
    pos: usize,
    ctx: EvalContext,
    depth: usize,
    nodes: usize,
}

impl<'src> Parser<'src> {
    /// Create a parser over a token sequence.
    ///
    /// A trailing [`TokenKind::Eof`] is appended if the sequence lacks one.
    pub fn new(mut tokens: Vec<Token<'src>>, ctx: EvalContext) -> Self {
        if !matches!(tokens.last(), Some(t) if t.kind == TokenKind::Eof) {
            let offset = tokens.last().map_or(0, |t| t.offset + t.lexeme.len());
            tokens.push(Token {
                kind: TokenKind::Eof,
                lexeme: "",
                offset,
            });
        }
        Self {
            tokens,
            pos: 0,
            ctx,
            depth: 0,
            nodes: 0,
        }
    }

    /// Parse the whole token sequence as exactly one expression.
    pub fn parse(mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_expr()?;
        let next = self.peek();
        if next.kind != TokenKind::Eof {
            return Err(unexpected("end of input", next));
        }
        Ok(expr)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Token Cursor
    // ═══════════════════════════════════════════════════════════════════

    fn peek(&self) -> &Token<'src> {
        // `new` guarantees a final Eof and `advance` never moves past it
        &self.tokens[self.pos]
    }

    fn advance(&mut self) -> Token<'src> {
        let tok = self.tokens[self.pos].clone();
        if tok.kind != TokenKind::Eof {
            self.pos += 1;
        }
        tok
    }

    fn at(&self, kind: &TokenKind) -> bool {
        self.peek().kind == *kind
    }

    fn expect(&mut self, kind: &TokenKind, expected: &str) -> Result<Token<'src>, ParseError> {
        if self.at(kind) {
            Ok(self.advance())
        } else {
            Err(unexpected(expected, self.peek()))
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Resource Limits
    // ═══════════════════════════════════════════════════════════════════

    fn enter(&mut self, offset: usize) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > self.ctx.max_depth {
            return Err(ParseError::TooDeeplyNested {
                limit: self.ctx.max_depth,
                offset,
            });
        }
        Ok(())
    }

    fn leave(&mut self, levels: usize) {
        self.depth -= levels;
    }

    fn node(&mut self, kind: ExprKind, offset: usize) -> Result<Expr, ParseError> {
        self.nodes += 1;
        if self.nodes > self.ctx.max_nodes {
            return Err(ParseError::TooManyNodes {
                limit: self.ctx.max_nodes,
                offset,
            });
        }
        Ok(Expr::new(kind, offset))
    }

    // ═══════════════════════════════════════════════════════════════════
    // Grammar
    // ═══════════════════════════════════════════════════════════════════

    /// Every nested construct re-enters here, so this is where the stack
    /// is topped up.
    fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        ensure_sufficient_stack(|| self.parse_conditional())
    }

    /// `expr := binary ( '?' expr ':' expr )?`
    fn parse_conditional(&mut self) -> Result<Expr, ParseError> {
        self.enter(self.peek().offset)?;
        let cond = self.parse_binary(LOWEST_BINARY_PREC)?;

        let expr = if self.at(&TokenKind::Question) {
            let question = self.advance();
            let then_branch = self.parse_expr()?;
            self.expect(&TokenKind::Colon, "`:` in conditional expression")?;
            let else_branch = self.parse_expr()?;
            self.node(
                ExprKind::Ternary {
                    cond: Box::new(cond),
                    then_branch: Box::new(then_branch),
                    else_branch: Box::new(else_branch),
                },
                question.offset,
            )?
        } else {
            cond
        };

        self.leave(1);
        Ok(expr)
    }

    /// Precedence climbing over the binary operator table.
    fn parse_binary(&mut self, min_prec: u8) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;
        let mut levels = 0;

        while let Some((op, prec)) = infix_op(&self.peek().kind) {
            if prec < min_prec {
                break;
            }
            let op_tok = self.advance();
            // Each fold makes the left spine one level deeper
            self.enter(op_tok.offset)?;
            levels += 1;

            let right = self.parse_binary(prec + 1)?;
            left = self.node(
                ExprKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                op_tok.offset,
            )?;
        }

        self.leave(levels);
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let Some(op) = prefix_op(&self.peek().kind) else {
            return self.parse_postfix();
        };
        let op_tok = self.advance();
        self.enter(op_tok.offset)?;
        let operand = ensure_sufficient_stack(|| self.parse_unary())?;
        self.leave(1);

        self.node(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            op_tok.offset,
        )
    }

    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;
        let mut levels = 0;

        loop {
            match self.peek().kind {
                TokenKind::LBracket => {
                    let open = self.advance();
                    self.enter(open.offset)?;
                    levels += 1;
                    expr = self.parse_index(expr, open.offset)?;
                }
                TokenKind::Dot => {
                    let dot = self.advance();
                    self.enter(dot.offset)?;
                    levels += 1;
                    let field = self.expect(&TokenKind::Ident, "field name after `.`")?;
                    expr = self.node(
                        ExprKind::Member {
                            target: Box::new(expr),
                            field: field.lexeme.to_string(),
                        },
                        dot.offset,
                    )?;
                }
                TokenKind::LParen => {
                    return Err(ParseError::InvalidCallTarget {
                        offset: self.peek().offset,
                    });
                }
                _ => break,
            }
        }

        self.leave(levels);
        Ok(expr)
    }

    /// After `[`: either `index]` or a slice `start? : end? ]`.
    fn parse_index(&mut self, target: Expr, offset: usize) -> Result<Expr, ParseError> {
        let start = if self.at(&TokenKind::Colon) {
            None
        } else {
            Some(self.parse_expr()?)
        };

        if !self.at(&TokenKind::Colon) {
            self.expect(&TokenKind::RBracket, "`]` or `:`")?;
            return match start {
                Some(index) => self.node(
                    ExprKind::Index {
                        target: Box::new(target),
                        index: Box::new(index),
                    },
                    offset,
                ),
                // Unreachable: a missing start means we stopped at `:`
                None => Err(unexpected("index expression", self.peek())),
            };
        }

        self.advance();
        let end = if self.at(&TokenKind::RBracket) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(&TokenKind::RBracket, "`]` after slice")?;

        self.node(
            ExprKind::Slice {
                target: Box::new(target),
                start: start.map(Box::new),
                end: end.map(Box::new),
            },
            offset,
        )
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let tok = self.advance();
        let offset = tok.offset;

        let literal = match &tok.kind {
            TokenKind::Int(n) => Literal::Int(*n),
            TokenKind::Float(n) => Literal::Float(*n),
            TokenKind::Str(s) => Literal::Str(s.clone()),
            TokenKind::Bool(b) => Literal::Bool(*b),
            TokenKind::Nil => Literal::Nil,
            TokenKind::Ident if self.at(&TokenKind::LParen) => return self.parse_call(&tok),
            TokenKind::Ident => {
                return self.node(ExprKind::Ident(tok.lexeme.to_string()), offset);
            }
            TokenKind::LParen => {
                let inner = self.parse_expr()?;
                self.expect(&TokenKind::RParen, "`)`")?;
                return Ok(inner);
            }
            TokenKind::LBracket => {
                let items = self.parse_sequence(&TokenKind::RBracket, "`,` or `]`")?;
                return self.node(ExprKind::List(items), offset);
            }
            TokenKind::LBrace => return self.parse_map(offset),
            _ => return Err(unexpected("expression", &tok)),
        };

        self.node(ExprKind::Literal(literal), offset)
    }

    /// `name '(' args ')'`, positioned at the `(`.
    fn parse_call(&mut self, name: &Token<'src>) -> Result<Expr, ParseError> {
        self.advance();
        let args = self.parse_sequence(&TokenKind::RParen, "`,` or `)`")?;
        self.node(
            ExprKind::Call {
                name: name.lexeme.to_string(),
                args,
            },
            name.offset,
        )
    }

    /// Comma-separated expressions up to `close`, trailing comma allowed.
    fn parse_sequence(&mut self, close: &TokenKind, expected: &str) -> Result<Vec<Expr>, ParseError> {
        let mut items = Vec::new();
        loop {
            if self.at(close) {
                self.advance();
                return Ok(items);
            }
            items.push(self.parse_expr()?);
            if self.at(&TokenKind::Comma) {
                self.advance();
            } else if !self.at(close) {
                return Err(unexpected(expected, self.peek()));
            }
        }
    }

    /// `{ key: value, ... }`, positioned after the `{`.
    fn parse_map(&mut self, offset: usize) -> Result<Expr, ParseError> {
        let mut entries = Vec::new();
        loop {
            if self.at(&TokenKind::RBrace) {
                self.advance();
                break;
            }

            let key_tok = self.advance();
            let key = match &key_tok.kind {
                TokenKind::Ident => key_tok.lexeme.to_string(),
                TokenKind::Str(s) => s.clone(),
                _ => return Err(unexpected("map key", &key_tok)),
            };
            self.expect(&TokenKind::Colon, "`:` after map key")?;
            entries.push((key, self.parse_expr()?));

            if self.at(&TokenKind::Comma) {
                self.advance();
            } else if !self.at(&TokenKind::RBrace) {
                return Err(unexpected("`,` or `}`", self.peek()));
            }
        }

        self.node(ExprKind::Map(entries), offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn parse(src: &str) -> Result<Expr, ParseError> {
        let tokens = tokenize(src).expect("lex failed");
        Parser::new(tokens, EvalContext::default()).parse()
    }

    /// Render a tree as a fully parenthesized string.
    fn sexp(expr: &Expr) -> String {
        match &expr.kind {
            ExprKind::Literal(Literal::Int(n)) => n.to_string(),
            ExprKind::Literal(lit) => format!("{:?}", lit),
            ExprKind::Ident(name) => name.clone(),
            ExprKind::Unary { op, operand } => format!("({} {})", op, sexp(operand)),
            ExprKind::Binary { op, left, right } => {
                format!("({} {} {})", op, sexp(left), sexp(right))
            }
            ExprKind::Ternary {
                cond,
                then_branch,
                else_branch,
            } => format!(
                "(? {} {} {})",
                sexp(cond),
                sexp(then_branch),
                sexp(else_branch)
            ),
            ExprKind::Index { target, index } => format!("([] {} {})", sexp(target), sexp(index)),
            ExprKind::Slice { target, start, end } => format!(
                "([:] {} {} {})",
                sexp(target),
                start.as_deref().map_or("_".to_string(), sexp),
                end.as_deref().map_or("_".to_string(), sexp)
            ),
            ExprKind::Member { target, field } => format!("(. {} {})", sexp(target), field),
            ExprKind::Call { name, args } => {
                let args: Vec<String> = args.iter().map(sexp).collect();
                format!("({} {})", name, args.join(" "))
            }
            ExprKind::List(items) => {
                let items: Vec<String> = items.iter().map(sexp).collect();
                format!("[{}]", items.join(" "))
            }
            ExprKind::Map(entries) => {
                let entries: Vec<String> = entries
                    .iter()
                    .map(|(k, v)| format!("{}={}", k, sexp(v)))
                    .collect();
                format!("{{{}}}", entries.join(" "))
            }
        }
    }

    fn shape(src: &str) -> String {
        sexp(&parse(src).expect("parse failed"))
    }

    #[test]
    fn test_parse_arithmetic_precedence() {
        assert_eq!(shape("2 + 3 * 4"), "(+ 2 (* 3 4))");
        assert_eq!(shape("(2 + 3) * 4"), "(* (+ 2 3) 4)");
        assert_eq!(shape("1 - 2 - 3"), "(- (- 1 2) 3)");
    }

    #[test]
    fn test_parse_logical_precedence() {
        assert_eq!(shape("1 < 2 && 3 < 4"), "(&& (< 1 2) (< 3 4))");
        assert_eq!(shape("a || b && c"), "(|| a (&& b c))");
        assert_eq!(shape("a == b < c"), "(== a (< b c))");
    }

    #[test]
    fn test_parse_ternary_right_assoc() {
        assert_eq!(shape("a ? 1 : b ? 2 : 3"), "(? a 1 (? b 2 3))");
        assert_eq!(shape("a || b ? 1 : 2"), "(? (|| a b) 1 2)");
    }

    #[test]
    fn test_parse_unary() {
        assert_eq!(shape("-2 * 3"), "(* (- 2) 3)");
        assert_eq!(shape("!!a"), "(! (! a))");
        assert_eq!(shape("-a[0]"), "(- ([] a 0))");
    }

    #[test]
    fn test_parse_bitwise_levels() {
        assert_eq!(shape("1 | 2 ^ 3 & 4"), "(| 1 (^ 2 (& 3 4)))");
        assert_eq!(shape("1 << 2 + 3"), "(<< 1 (+ 2 3))");
        assert_eq!(shape("a & b == c"), "(& a (== b c))");
    }

    #[test]
    fn test_parse_postfix_chain() {
        assert_eq!(shape("f(1, x)[0].name"), "(. ([] (f 1 x) 0) name)");
        assert_eq!(shape("a[1:]"), "([:] a 1 _)");
        assert_eq!(shape("a[:2]"), "([:] a _ 2)");
        assert_eq!(shape("a[:]"), "([:] a _ _)");
    }

    #[test]
    fn test_parse_literals() {
        assert_eq!(shape("[1, 2,]"), "[1 2]");
        assert_eq!(shape("{a: 1, \"b c\": 2}"), "{a=1 b c=2}");
        assert_eq!(shape("f()"), "(f )");
    }

    #[test]
    fn test_parse_trailing_tokens() {
        assert_eq!(
            parse("1 2"),
            Err(ParseError::UnexpectedToken {
                expected: "end of input".to_string(),
                found: "2".to_string(),
                offset: 2,
            })
        );
    }

    #[test]
    fn test_parse_unexpected_end() {
        assert_eq!(
            parse("1 +"),
            Err(ParseError::UnexpectedEnd {
                expected: "expression".to_string(),
                offset: 3,
            })
        );
        assert!(matches!(
            parse("a ? 1"),
            Err(ParseError::UnexpectedEnd { offset: 5, .. })
        ));
    }

    #[test]
    fn test_parse_invalid_call_target() {
        assert_eq!(
            parse("a[0](1)"),
            Err(ParseError::InvalidCallTarget { offset: 4 })
        );
    }

    #[test]
    fn test_parse_depth_limit() {
        let src = format!("{}1{}", "(".repeat(20), ")".repeat(20));
        let tokens = tokenize(&src).unwrap();
        let ctx = EvalContext::default().with_max_depth(10);
        assert!(matches!(
            Parser::new(tokens, ctx).parse(),
            Err(ParseError::TooDeeplyNested { limit: 10, .. })
        ));
    }

    #[test]
    fn test_parse_flat_chain_counts_depth() {
        let src = vec!["1"; 50].join(" + ");
        let tokens = tokenize(&src).unwrap();
        let ctx = EvalContext::default().with_max_depth(20);
        assert!(matches!(
            Parser::new(tokens, ctx).parse(),
            Err(ParseError::TooDeeplyNested { .. })
        ));
    }

    #[test]
    fn test_parse_node_limit() {
        let src = format!("[{}]", vec!["1"; 100].join(", "));
        let tokens = tokenize(&src).unwrap();
        let ctx = EvalContext::default().with_max_nodes(50);
        assert!(matches!(
            Parser::new(tokens, ctx).parse(),
            Err(ParseError::TooManyNodes { limit: 50, .. })
        ));
    }

    #[test]
    fn test_parser_appends_missing_eof() {
        let mut tokens = tokenize("1 + 2").unwrap();
        tokens.pop();
        let expr = Parser::new(tokens, EvalContext::default()).parse().unwrap();
        assert_eq!(sexp(&expr), "(+ 1 2)");
    }
}
