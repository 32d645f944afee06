//! Lexer for expression text.
//!
//! Converts source text into a token sequence using the logos lexer
//! generator. Every token records the byte offset of its first character so
//! later phases can report positions without keeping the source around.
//!
//! # Token Categories
//!
//! - **Literals**: integers (`42`, `0x2A`), floats (`1.5`, `2e10`),
//!   strings (`"a"`, `'b'`), `true`, `false`, `nil`
//! - **Identifiers**: `[A-Za-z_][A-Za-z0-9_]*`
//! - **Operators**: `+ - * / % == != < <= > >= && || ! & | ^ ~ << >> in`
//! - **Punctuation**: `( ) [ ] { } , : ? .`

use logos::Logos;
use std::fmt;

use crate::error::LexError;

/// Failure reported by a logos callback. The default variant is what logos
/// produces for input that matches no token at all.
#[derive(Debug, Clone, PartialEq, Default)]
enum RawError {
    #[default]
    NoMatch,
    InvalidEscape(char),
    InvalidNumber,
}

/// Raw token from logos, before offsets are attached.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(error = RawError)]
enum RawToken {
    // === Keywords ===
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("nil")]
    Nil,
    #[token("in")]
    In,

    // === Literals ===
    // Digits are optional so a bare `0x` is rejected whole rather than
    // splitting into `0` and an identifier
    #[regex(r"0[xX][0-9a-fA-F]*", |lex| {
        i64::from_str_radix(&lex.slice()[2..], 16).map_err(|_| RawError::InvalidNumber)
    })]
    HexInt(i64),

    #[regex(r"[0-9]+", |lex| lex.slice().parse::<i64>().map_err(|_| RawError::InvalidNumber))]
    Int(i64),

    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?", parse_float)]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+", parse_float)]
    Float(f64),

    #[regex(r#""([^"\\]|\\.)*""#, unescape)]
    #[regex(r"'([^'\\]|\\.)*'", unescape)]
    Str(String),

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,

    // === Operators ===
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<<")]
    Shl,
    #[token("<=")]
    LtEq,
    #[token("<")]
    Lt,
    #[token(">>")]
    Shr,
    #[token(">=")]
    GtEq,
    #[token(">")]
    Gt,
    #[token("&&")]
    AmpAmp,
    #[token("&")]
    Amp,
    #[token("||")]
    PipePipe,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("!")]
    Bang,
    #[token("~")]
    Tilde,

    // === Punctuation ===
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token("?")]
    Question,
    #[token(".")]
    Dot,
}

fn parse_float(lex: &mut logos::Lexer<RawToken>) -> Result<f64, RawError> {
    lex.slice()
        .parse::<f64>()
        .map_err(|_| RawError::InvalidNumber)
}

/// Strip the quotes from a string literal and resolve its escapes.
fn unescape(lex: &mut logos::Lexer<RawToken>) -> Result<String, RawError> {
    let slice = lex.slice();
    let body = &slice[1..slice.len() - 1];
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        // The regex guarantees a character follows every backslash
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('0') => out.push('\0'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('\'') => out.push('\''),
            Some(other) => return Err(RawError::InvalidEscape(other)),
            None => return Err(RawError::InvalidEscape('\\')),
        }
    }

    Ok(out)
}

/// The kind of a token, carrying the decoded payload of literals.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Integer literal (decimal or hexadecimal)
    Int(i64),
    /// Float literal
    Float(f64),
    /// String literal with escapes resolved
    Str(String),
    /// `true` or `false`
    Bool(bool),
    /// `nil`
    Nil,
    /// Identifier; the name is the token's lexeme
    Ident,

    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `==`
    EqEq,
    /// `!=`
    NotEq,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,
    /// `&&`
    AmpAmp,
    /// `||`
    PipePipe,
    /// `!`
    Bang,
    /// `&`
    Amp,
    /// `|`
    Pipe,
    /// `^`
    Caret,
    /// `~`
    Tilde,
    /// `<<`
    Shl,
    /// `>>`
    Shr,
    /// `in`
    In,

    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `,`
    Comma,
    /// `:`
    Colon,
    /// `?`
    Question,
    /// `.`
    Dot,

    /// End of input
    Eof,
}

/// A token with its source text and position.
#[derive(Debug, Clone, PartialEq)]
pub struct Token<'src> {
    /// What was recognized
    pub kind: TokenKind,
    /// The exact source text of the token (empty for end of input)
    pub lexeme: &'src str,
    /// Byte offset of the first character
    pub offset: usize,
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => write!(f, "end of input"),
            _ => write!(f, "{}", self.lexeme),
        }
    }
}

/// Tokenize expression text.
///
/// The returned sequence always ends with a single [`TokenKind::Eof`] token
/// positioned at `src.len()`. Lexing stops at the first error.
pub fn tokenize(src: &str) -> Result<Vec<Token<'_>>, LexError> {
    let mut tokens = Vec::new();
    let mut lexer = RawToken::lexer(src);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let lexeme = lexer.slice();
        let offset = span.start;

        let raw = result.map_err(|err| lex_error(err, src, lexeme, offset))?;
        tokens.push(Token {
            kind: convert_token(raw),
            lexeme,
            offset,
        });
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        lexeme: "",
        offset: src.len(),
    });

    Ok(tokens)
}

fn convert_token(raw: RawToken) -> TokenKind {
    match raw {
        RawToken::True => TokenKind::Bool(true),
        RawToken::False => TokenKind::Bool(false),
        RawToken::Nil => TokenKind::Nil,
        RawToken::In => TokenKind::In,
        RawToken::HexInt(n) | RawToken::Int(n) => TokenKind::Int(n),
        RawToken::Float(n) => TokenKind::Float(n),
        RawToken::Str(s) => TokenKind::Str(s),
        RawToken::Ident => TokenKind::Ident,
        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Star => TokenKind::Star,
        RawToken::Slash => TokenKind::Slash,
        RawToken::Percent => TokenKind::Percent,
        RawToken::EqEq => TokenKind::EqEq,
        RawToken::NotEq => TokenKind::NotEq,
        RawToken::Shl => TokenKind::Shl,
        RawToken::LtEq => TokenKind::LtEq,
        RawToken::Lt => TokenKind::Lt,
        RawToken::Shr => TokenKind::Shr,
        RawToken::GtEq => TokenKind::GtEq,
        RawToken::Gt => TokenKind::Gt,
        RawToken::AmpAmp => TokenKind::AmpAmp,
        RawToken::Amp => TokenKind::Amp,
        RawToken::PipePipe => TokenKind::PipePipe,
        RawToken::Pipe => TokenKind::Pipe,
        RawToken::Caret => TokenKind::Caret,
        RawToken::Bang => TokenKind::Bang,
        RawToken::Tilde => TokenKind::Tilde,
        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::LBracket => TokenKind::LBracket,
        RawToken::RBracket => TokenKind::RBracket,
        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Colon => TokenKind::Colon,
        RawToken::Question => TokenKind::Question,
        RawToken::Dot => TokenKind::Dot,
    }
}

fn lex_error(err: RawError, src: &str, lexeme: &str, offset: usize) -> LexError {
    match err {
        RawError::InvalidEscape(escape) => LexError::InvalidEscape { escape, offset },
        RawError::InvalidNumber => LexError::InvalidNumber {
            literal: lexeme.to_string(),
            offset,
        },
        RawError::NoMatch => {
            let rest = &src[offset..];
            match rest.chars().next() {
                // An opening quote that never matched a full literal
                Some('"') | Some('\'') => LexError::UnterminatedString { offset },
                Some(ch) => LexError::UnexpectedChar { ch, offset },
                None => LexError::UnterminatedString { offset },
            }
        }
    }
}
