//! Text front end for expressions.
//!
//! Grammar (lowest to highest binding):
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('-' | '+') unary | power
//! power   := primary (('^' | '**') unary)?
//! primary := number | ident | ident '(' expr ')' | '(' expr ')'
//! ```
//!
//! `pi` and `e` are read as constants unless followed by `(`. Exponentiation
//! is right associative and binds tighter than unary minus, so `-x^2` reads
//! as `-(x^2)`.

use super::expr::{Expr, Func};
use crate::types::SymbolicError;

#[derive(Debug, Clone, PartialEq)]
enum TokenKind {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
    Eof,
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    position: usize,
}

fn parse_error(position: usize, message: impl Into<String>) -> SymbolicError {
    SymbolicError::Parse {
        position,
        message: message.into(),
    }
}

fn tokenize(text: &str) -> Result<Vec<Token>, SymbolicError> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let ch = bytes[pos] as char;
        let start = pos;

        if ch.is_ascii_whitespace() {
            pos += 1;
            continue;
        }

        let kind = match ch {
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '/' => TokenKind::Slash,
            '^' => TokenKind::Caret,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '*' if bytes.get(pos + 1) == Some(&b'*') => {
                pos += 1;
                TokenKind::Caret
            }
            '*' => TokenKind::Star,
            c if c.is_ascii_digit() || c == '.' => {
                while pos < bytes.len() && (bytes[pos].is_ascii_digit() || bytes[pos] == b'.') {
                    pos += 1;
                }
                // Scientific notation: 1e-3, 2.5E+4
                if pos < bytes.len() && (bytes[pos] == b'e' || bytes[pos] == b'E') {
                    let mut look = pos + 1;
                    if look < bytes.len() && (bytes[look] == b'+' || bytes[look] == b'-') {
                        look += 1;
                    }
                    if look < bytes.len() && bytes[look].is_ascii_digit() {
                        pos = look;
                        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                            pos += 1;
                        }
                    }
                }
                let literal = &text[start..pos];
                let value = literal
                    .parse::<f64>()
                    .map_err(|_| parse_error(start, format!("invalid number '{}'", literal)))?;
                tokens.push(Token {
                    kind: TokenKind::Number(value),
                    position: start,
                });
                continue;
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                while pos < bytes.len() && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'_')
                {
                    pos += 1;
                }
                tokens.push(Token {
                    kind: TokenKind::Ident(text[start..pos].to_string()),
                    position: start,
                });
                continue;
            }
            other => return Err(parse_error(start, format!("unexpected character '{}'", other))),
        };

        tokens.push(Token {
            kind,
            position: start,
        });
        pos += 1;
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        position: text.len(),
    });
    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn peek_kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<(), SymbolicError> {
        if *self.peek_kind() == kind {
            self.advance();
            Ok(())
        } else {
            Err(parse_error(self.peek().position, format!("expected {}", what)))
        }
    }

    fn parse_expr(&mut self) -> Result<Expr, SymbolicError> {
        let mut lhs = self.parse_term()?;
        loop {
            match self.peek_kind() {
                TokenKind::Plus => {
                    self.advance();
                    lhs = lhs + self.parse_term()?;
                }
                TokenKind::Minus => {
                    self.advance();
                    lhs = lhs - self.parse_term()?;
                }
                _ => return Ok(lhs),
            }
        }
    }

    fn parse_term(&mut self) -> Result<Expr, SymbolicError> {
        let mut lhs = self.parse_unary()?;
        loop {
            match self.peek_kind() {
                TokenKind::Star => {
                    self.advance();
                    lhs = lhs * self.parse_unary()?;
                }
                TokenKind::Slash => {
                    self.advance();
                    lhs = lhs / self.parse_unary()?;
                }
                _ => return Ok(lhs),
            }
        }
    }

    fn parse_unary(&mut self) -> Result<Expr, SymbolicError> {
        match self.peek_kind() {
            TokenKind::Minus => {
                self.advance();
                Ok(-self.parse_unary()?)
            }
            TokenKind::Plus => {
                self.advance();
                self.parse_unary()
            }
            _ => self.parse_power(),
        }
    }

    fn parse_power(&mut self) -> Result<Expr, SymbolicError> {
        let base = self.parse_primary()?;
        if *self.peek_kind() == TokenKind::Caret {
            self.advance();
            let exponent = self.parse_unary()?;
            return Ok(base.pow(exponent));
        }
        Ok(base)
    }

    fn parse_primary(&mut self) -> Result<Expr, SymbolicError> {
        let token = self.advance();
        match token.kind {
            TokenKind::Number(value) => Ok(Expr::Num(value)),
            TokenKind::Ident(name) => {
                if *self.peek_kind() == TokenKind::LParen {
                    let func = Func::from_name(&name).ok_or_else(|| {
                        parse_error(token.position, format!("unknown function '{}'", name))
                    })?;
                    self.advance();
                    let argument = self.parse_expr()?;
                    self.expect(TokenKind::RParen, "')' after function argument")?;
                    return Ok(argument.call(func));
                }
                Ok(match name.as_str() {
                    "pi" => Expr::Num(std::f64::consts::PI),
                    "e" => Expr::Num(std::f64::consts::E),
                    _ => Expr::Sym(name),
                })
            }
            TokenKind::LParen => {
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RParen, "')'")?;
                Ok(inner)
            }
            TokenKind::Eof => Err(parse_error(token.position, "unexpected end of input")),
            other => Err(parse_error(
                token.position,
                format!("unexpected token {:?}", other),
            )),
        }
    }
}

/// Parses `text` into an [`Expr`].
pub fn parse(text: &str) -> Result<Expr, SymbolicError> {
    let tokens = tokenize(text)?;
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.parse_expr()?;
    match parser.peek_kind() {
        TokenKind::Eof => Ok(expr),
        _ => Err(parse_error(
            parser.peek().position,
            "unexpected trailing input",
        )),
    }
}
