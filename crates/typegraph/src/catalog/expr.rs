// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type expressions used by catalog builders and catalog files.
//!
//! ```text
//! expr   := path args? suffix*
//! path   := ident ('.' ident)*
//! args   := '<' expr (',' expr)* '>'
//! suffix := '[]' | '?'
//! ```

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suffix {
    Array,
    Nullable,
}

/// Parsed type expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeExpr {
    /// Dotted path as written.
    pub path: String,
    pub args: Vec<TypeExpr>,
    /// Suffixes in application order (innermost first).
    pub suffixes: Vec<Suffix>,
}

/// Syntax error with the byte offset where parsing stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub offset: usize,
    pub message: &'static str,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at offset {}", self.message, self.offset)
    }
}

impl TypeExpr {
    pub fn parse(input: &str) -> Result<Self, SyntaxError> {
        let mut parser = Parser {
            src: input.as_bytes(),
            pos: 0,
        };
        let expr = parser.expr()?;
        parser.skip_ws();
        if parser.pos != parser.src.len() {
            return Err(parser.error("unexpected trailing input"));
        }
        Ok(expr)
    }

    /// Last path segment.
    pub fn short_name(&self) -> &str {
        self.path.rsplit('.').next().unwrap_or(&self.path)
    }

    pub fn is_simple(&self) -> bool {
        self.args.is_empty() && self.suffixes.is_empty() && !self.path.contains('.')
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)?;
        if !self.args.is_empty() {
            f.write_str("<")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", arg)?;
            }
            f.write_str(">")?;
        }
        for suffix in &self.suffixes {
            match suffix {
                Suffix::Array => f.write_str("[]")?,
                Suffix::Nullable => f.write_str("?")?,
            }
        }
        Ok(())
    }
}

struct Parser<'a> {
    src: &'a [u8],
    pos: usize,
}

impl Parser<'_> {
    fn error(&self, message: &'static str) -> SyntaxError {
        SyntaxError {
            offset: self.pos,
            message,
        }
    }

    fn skip_ws(&mut self) {
        while self.pos < self.src.len() && self.src[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    fn peek(&mut self) -> Option<u8> {
        self.skip_ws();
        self.src.get(self.pos).copied()
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn ident(&mut self) -> Result<&str, SyntaxError> {
        self.skip_ws();
        let start = self.pos;
        while self.pos < self.src.len()
            && (self.src[self.pos].is_ascii_alphanumeric() || self.src[self.pos] == b'_')
        {
            self.pos += 1;
        }
        if start == self.pos || self.src[start].is_ascii_digit() {
            self.pos = start;
            return Err(self.error("expected identifier"));
        }
        std::str::from_utf8(&self.src[start..self.pos]).map_err(|_| self.error("invalid utf-8"))
    }

    fn expr(&mut self) -> Result<TypeExpr, SyntaxError> {
        let mut path = self.ident()?.to_string();
        while self.eat(b'.') {
            path.push('.');
            path.push_str(self.ident()?);
        }

        let mut args = Vec::new();
        if self.eat(b'<') {
            loop {
                args.push(self.expr()?);
                if self.eat(b',') {
                    continue;
                }
                if self.eat(b'>') {
                    break;
                }
                return Err(self.error("expected `,` or `>`"));
            }
        }

        let mut suffixes = Vec::new();
        loop {
            if self.eat(b'[') {
                if !self.eat(b']') {
                    return Err(self.error("expected `]`"));
                }
                suffixes.push(Suffix::Array);
            } else if self.eat(b'?') {
                suffixes.push(Suffix::Nullable);
            } else {
                break;
            }
        }

        Ok(TypeExpr {
            path,
            args,
            suffixes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_and_qualified() {
        let e = TypeExpr::parse("Int32").unwrap();
        assert!(e.is_simple());
        let e = TypeExpr::parse(" System.Int32 ").unwrap();
        assert_eq!(e.path, "System.Int32");
        assert_eq!(e.short_name(), "Int32");
        assert!(!e.is_simple());
    }

    #[test]
    fn test_parse_nested_generics_and_suffixes() {
        let e = TypeExpr::parse("Dictionary<string, List<Order?>>[]?").unwrap();
        assert_eq!(e.path, "Dictionary");
        assert_eq!(e.args.len(), 2);
        assert_eq!(e.args[1].args[0].suffixes, vec![Suffix::Nullable]);
        assert_eq!(e.suffixes, vec![Suffix::Array, Suffix::Nullable]);
        assert_eq!(e.to_string(), "Dictionary<string, List<Order?>>[]?");
    }

    #[test]
    fn test_syntax_errors() {
        assert!(TypeExpr::parse("").is_err());
        assert!(TypeExpr::parse("List<").is_err());
        assert!(TypeExpr::parse("List<int").is_err());
        assert!(TypeExpr::parse("int[").is_err());
        assert!(TypeExpr::parse("1abc").is_err());
        let err = TypeExpr::parse("A B").unwrap_err();
        assert_eq!(err.offset, 2);
    }
}
