//! Literal expression parsing.
//!
//! This module provides the [`Parser`], which evaluates the expressions
//! produced by [`crate::ser`] back into bytes. It is the verification half of
//! the codec: every encoded literal must parse to the exact source blob.
//!
//! ## Grammar
//!
//! ```text
//! expr    := operand ( '+' operand )*
//! operand := '(' expr ')' | raw | interpreted
//! raw     := '`' any byte except '`' '`'          (carriage returns are dropped)
//! interpreted := '"' ( char | escape )* '"'
//! escape  := \a \b \f \n \r \t \v \\ \" | \xHH | \ooo | \uHHHH | \UHHHHHHHH
//! ```
//!
//! Whitespace, including newlines, may separate tokens.
//!
//! ## Usage
//!
//! ```rust
//! use go_bindata::de::{from_str, literal_depth};
//!
//! let bytes = from_str("(\"`\" + `ello`)").unwrap();
//! assert_eq!(bytes, b"`ello");
//! assert_eq!(literal_depth("(\"`\" + `ello`)").unwrap(), 1);
//! ```

use crate::{Error, Result};

/// Nesting deeper than this is rejected rather than recursed into.
pub const MAX_DEPTH: usize = 512;

/// The literal expression parser.
///
/// Created via [`Parser::from_str`]; tracks line and column for error reporting
/// and the deepest parenthesis nesting it has seen.
pub struct Parser<'de> {
    input: &'de str,
    position: usize,
    line: usize,
    column: usize,
    depth: usize,
    max_depth: usize,
}

impl<'de> Parser<'de> {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(input: &'de str) -> Self {
        Parser {
            input,
            position: 0,
            line: 1,
            column: 1,
            depth: 0,
            max_depth: 0,
        }
    }

    /// Deepest parenthesis nesting seen so far.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Parses the whole input as one expression.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Syntax`] for malformed input or trailing characters.
    pub fn parse(&mut self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(self.input.len());
        self.parse_expr(&mut out)?;
        self.skip_whitespace();
        if !self.at_end() {
            return Err(self.error("unexpected trailing input"));
        }
        Ok(out)
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn next_char(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.position += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek_char() {
            if ch.is_whitespace() {
                self.next_char();
            } else {
                break;
            }
        }
    }

    fn at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn error(&self, msg: &str) -> Error {
        Error::syntax(self.line, self.column, msg)
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        match self.next_char() {
            Some(ch) if ch == expected => Ok(()),
            Some(ch) => Err(self.error(&format!("expected '{expected}', found '{ch}'"))),
            None => Err(self.error(&format!("expected '{expected}', found end of input"))),
        }
    }

    fn parse_expr(&mut self, out: &mut Vec<u8>) -> Result<()> {
        self.parse_operand(out)?;
        loop {
            self.skip_whitespace();
            if self.peek_char() != Some('+') {
                return Ok(());
            }
            self.next_char();
            self.parse_operand(out)?;
        }
    }

    fn parse_operand(&mut self, out: &mut Vec<u8>) -> Result<()> {
        self.skip_whitespace();
        match self.peek_char() {
            Some('(') => {
                self.next_char();
                self.depth += 1;
                if self.depth > MAX_DEPTH {
                    return Err(self.error("expression nested too deeply"));
                }
                self.max_depth = self.max_depth.max(self.depth);
                self.parse_expr(out)?;
                self.skip_whitespace();
                self.expect(')')?;
                self.depth -= 1;
                Ok(())
            }
            Some('`') => self.parse_raw(out),
            Some('"') => self.parse_interpreted(out),
            Some(ch) => Err(self.error(&format!("expected literal or '(', found '{ch}'"))),
            None => Err(self.error("expected literal or '(', found end of input")),
        }
    }

    fn parse_raw(&mut self, out: &mut Vec<u8>) -> Result<()> {
        self.next_char(); // opening backquote
        let start = self.position;
        let Some(len) = self.input[start..].find('`') else {
            return Err(self.error("unterminated raw literal"));
        };

        out.extend(
            self.input.as_bytes()[start..start + len]
                .iter()
                .filter(|&&b| b != b'\r'),
        );
        while self.position <= start + len {
            self.next_char();
        }
        Ok(())
    }

    fn parse_interpreted(&mut self, out: &mut Vec<u8>) -> Result<()> {
        self.next_char(); // opening quote
        loop {
            match self.next_char() {
                Some('"') => return Ok(()),
                Some('\\') => self.parse_escape(out)?,
                Some('\n') | None => return Err(self.error("unterminated string literal")),
                Some(ch) => {
                    let mut buf = [0u8; 4];
                    out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
                }
            }
        }
    }

    fn parse_escape(&mut self, out: &mut Vec<u8>) -> Result<()> {
        let byte = match self.next_char() {
            Some('a') => 0x07,
            Some('b') => 0x08,
            Some('f') => 0x0C,
            Some('n') => b'\n',
            Some('r') => b'\r',
            Some('t') => b'\t',
            Some('v') => 0x0B,
            Some('\\') => b'\\',
            Some('"') => b'"',
            Some('x') => {
                let value = self.parse_digits(2, 16)?;
                value as u8
            }
            Some(first @ '0'..='7') => {
                let rest = self.parse_digits(2, 8)?;
                let value = (first as u32 - '0' as u32) * 64 + rest;
                u8::try_from(value).map_err(|_| self.error("octal escape value > 255"))?
            }
            Some(kind @ ('u' | 'U')) => {
                let width = if kind == 'u' { 4 } else { 8 };
                let code_point = self.parse_digits(width, 16)?;
                let ch = char::from_u32(code_point)
                    .ok_or_else(|| self.error("invalid unicode code point"))?;
                let mut buf = [0u8; 4];
                out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
                return Ok(());
            }
            Some(ch) => return Err(self.error(&format!("unknown escape sequence '\\{ch}'"))),
            None => return Err(self.error("unterminated escape sequence")),
        };
        out.push(byte);
        Ok(())
    }

    fn parse_digits(&mut self, count: usize, radix: u32) -> Result<u32> {
        let mut value = 0u32;
        for _ in 0..count {
            let digit = self
                .next_char()
                .and_then(|ch| ch.to_digit(radix))
                .ok_or_else(|| self.error(&format!("expected {count} base-{radix} digits")))?;
            value = value * radix + digit;
        }
        Ok(value)
    }
}

/// Evaluates a literal expression to bytes.
///
/// # Errors
///
/// Returns [`Error::Syntax`] if `expr` is not a well-formed expression.
pub fn from_str(expr: &str) -> Result<Vec<u8>> {
    Parser::from_str(expr).parse()
}

/// Returns the parenthesis nesting depth of a literal expression.
///
/// # Errors
///
/// Returns [`Error::Syntax`] if `expr` is not a well-formed expression.
pub fn literal_depth(expr: &str) -> Result<usize> {
    let mut parser = Parser::from_str(expr);
    parser.parse()?;
    Ok(parser.max_depth())
}

/// Finds `var <variable> = []byte(<expr>)` in generated source and evaluates it.
///
/// # Examples
///
/// ```rust
/// use go_bindata::de::from_declaration;
///
/// let source = "package p\n\nvar data = []byte(`hi`)\n";
/// assert_eq!(from_declaration(source, "data").unwrap(), b"hi");
/// ```
///
/// # Errors
///
/// Returns [`Error::Syntax`] if the declaration is missing or malformed.
pub fn from_declaration(source: &str, variable: &str) -> Result<Vec<u8>> {
    let lead_in = format!("var {variable} = []byte(");
    let start = source
        .find(&lead_in)
        .ok_or_else(|| Error::syntax(1, 1, &format!("no declaration of '{variable}'")))?
        + lead_in.len();

    let mut parser = Parser::from_str(&source[start..]);
    let mut out = Vec::new();
    parser.parse_expr(&mut out)?;
    parser.skip_whitespace();
    parser.expect(')')?;
    Ok(out)
}
