//! Single-pass tokenizer for the calculator's C-like expression syntax.
//!
//! Number literals keep their textual form (digits, radix, suffixes);
//! realizing them as values is the evaluator's job, so that the current
//! precision settings apply at evaluation time rather than parse time.

use abax_common::{CalcError, CalcResult};

/// Multi-character operators, longest first so maximal munch works by
/// scanning the table in order.
const MULTI_OPS: &[&str] = &[
    "**", "^^", "<<", ">>", "<=", ">=", "==", "!=", "//", ".*",
];

const SINGLE_OPS: &str = "|^&<>+-*/%~()[],:;=";

/// A number literal as written, before any value is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberText {
    /// Digit text with separators removed; excludes the radix prefix
    /// and suffixes. May contain `.` and an exponent marker.
    pub text: String,
    pub radix: u32,
    /// Literal had a fractional part or an exponent.
    pub is_float: bool,
    /// `l` suffix: binary float.
    pub binary_float: bool,
    /// `i` suffix: imaginary.
    pub imaginary: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Number(NumberText),
    Str(String),
    Ident(String),
    /// Operator or punctuation, interned as a static string.
    Op(&'static str),
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

pub struct Tokenizer<'a> {
    src: &'a [u8],
    pos: usize,
}

fn is_ident_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_' || c == b'$'
}

fn is_ident_part(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_' || c == b'$'
}

fn digit_value(c: u8) -> u32 {
    match c {
        b'0'..=b'9' => (c - b'0') as u32,
        b'a'..=b'z' => (c - b'a') as u32 + 10,
        b'A'..=b'Z' => (c - b'A') as u32 + 10,
        _ => 36,
    }
}

impl<'a> Tokenizer<'a> {
    pub fn new(src: &'a str) -> Self {
        Tokenizer {
            src: src.as_bytes(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn peek_at(&self, off: usize) -> Option<u8> {
        self.src.get(self.pos + off).copied()
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c == b' ' || c == b'\t' || c == b'\n' || c == b'\r' {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn error(&self, msg: impl Into<String>) -> CalcError {
        CalcError::syntax(format!("{} (at position {})", msg.into(), self.pos))
    }

    /// Tokenize the whole input, appending an EOF token.
    pub fn tokenize(mut self) -> CalcResult<Vec<Token>> {
        let mut out = Vec::new();
        loop {
            self.skip_whitespace();
            let start = self.pos;
            let Some(c) = self.peek() else {
                out.push(Token {
                    kind: TokenKind::Eof,
                    start,
                    end: start,
                });
                return Ok(out);
            };
            let kind = if c.is_ascii_digit()
                || (c == b'.' && self.peek_at(1).is_some_and(|d| d.is_ascii_digit()))
            {
                self.read_number()?
            } else if is_ident_start(c) {
                self.read_ident()
            } else if c == b'"' || c == b'\'' {
                self.read_string()?
            } else {
                self.read_op()?
            };
            out.push(Token {
                kind,
                start,
                end: self.pos,
            });
        }
    }

    fn read_op(&mut self) -> CalcResult<TokenKind> {
        let rest = &self.src[self.pos..];
        for op in MULTI_OPS {
            if rest.starts_with(op.as_bytes()) {
                self.pos += op.len();
                return Ok(TokenKind::Op(op));
            }
        }
        let c = rest[0];
        if let Some(idx) = SINGLE_OPS.find(c as char) {
            self.pos += 1;
            // reborrow the operator as a static one-char slice
            return Ok(TokenKind::Op(&SINGLE_OPS[idx..idx + 1]));
        }
        Err(self.error(format!("unexpected character '{}'", c as char)))
    }

    fn read_ident(&mut self) -> TokenKind {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_part) {
            self.pos += 1;
        }
        let s = std::str::from_utf8(&self.src[start..self.pos])
            .unwrap_or_default()
            .to_string();
        TokenKind::Ident(s)
    }

    fn read_digits(&mut self, radix: u32, text: &mut String) -> usize {
        let mut count = 0;
        while let Some(c) = self.peek() {
            if c == b'_' {
                self.pos += 1;
                continue;
            }
            if digit_value(c) < radix {
                text.push(c as char);
                self.pos += 1;
                count += 1;
            } else {
                break;
            }
        }
        count
    }

    fn read_number(&mut self) -> CalcResult<TokenKind> {
        let mut radix = 10u32;
        if self.peek() == Some(b'0') {
            match self.peek_at(1) {
                Some(b'x') | Some(b'X') => {
                    radix = 16;
                    self.pos += 2;
                }
                Some(b'b') | Some(b'B') => {
                    radix = 2;
                    self.pos += 2;
                }
                Some(b'o') | Some(b'O') => {
                    radix = 8;
                    self.pos += 2;
                }
                _ => {}
            }
        }
        let mut text = String::new();
        let int_digits = self.read_digits(radix, &mut text);
        let mut is_float = false;
        if self.peek() == Some(b'.') {
            // a '.' must be followed by a digit or stand after digits;
            // ".*" is an operator and was excluded by the caller
            if int_digits > 0 || self.peek_at(1).is_some_and(|d| digit_value(d) < radix) {
                is_float = true;
                text.push('.');
                self.pos += 1;
                self.read_digits(radix, &mut text);
            }
        }
        if int_digits == 0 && !is_float {
            return Err(self.error("invalid number"));
        }
        // exponent: 'e' for decimal, 'p' (power of two) otherwise
        let exp_char = if radix == 10 { b'e' } else { b'p' };
        if let Some(c) = self.peek() {
            if c.eq_ignore_ascii_case(&exp_char) {
                let mut off = 1;
                if matches!(self.peek_at(1), Some(b'+') | Some(b'-')) {
                    off = 2;
                }
                if self.peek_at(off).is_some_and(|d| d.is_ascii_digit()) {
                    is_float = true;
                    text.push(self.peek().unwrap().to_ascii_lowercase() as char);
                    self.pos += 1;
                    if let Some(s) = self.peek() {
                        if s == b'+' || s == b'-' {
                            if s == b'-' {
                                text.push('-');
                            }
                            self.pos += 1;
                        }
                    }
                    self.read_digits(10, &mut text);
                }
            }
        }
        let mut binary_float = false;
        let mut imaginary = false;
        if self.peek() == Some(b'l') {
            binary_float = true;
            self.pos += 1;
        }
        if self.peek() == Some(b'i') {
            imaginary = true;
            self.pos += 1;
        }
        if self.peek().is_some_and(is_ident_part) {
            return Err(self.error("invalid number suffix"));
        }
        Ok(TokenKind::Number(NumberText {
            text,
            radix,
            is_float,
            binary_float,
            imaginary,
        }))
    }

    fn read_string(&mut self) -> CalcResult<TokenKind> {
        let quote = self.peek().unwrap();
        self.pos += 1;
        let mut out = String::new();
        loop {
            let Some(c) = self.peek() else {
                return Err(self.error("unterminated string"));
            };
            self.pos += 1;
            if c == quote {
                break;
            }
            if c != b'\\' {
                // re-assemble multi-byte UTF-8 sequences untouched
                if c < 0x80 {
                    out.push(c as char);
                } else {
                    let start = self.pos - 1;
                    let mut end = self.pos;
                    while self.src.get(end).is_some_and(|b| b & 0xc0 == 0x80) {
                        end += 1;
                    }
                    match std::str::from_utf8(&self.src[start..end]) {
                        Ok(s) => out.push_str(s),
                        Err(_) => return Err(self.error("invalid UTF-8 in string")),
                    }
                    self.pos = end;
                }
                continue;
            }
            let Some(esc) = self.peek() else {
                return Err(self.error("unterminated escape"));
            };
            self.pos += 1;
            match esc {
                b'n' => out.push('\n'),
                b't' => out.push('\t'),
                b'r' => out.push('\r'),
                b'0' => out.push('\0'),
                b'\\' => out.push('\\'),
                b'\'' => out.push('\''),
                b'"' => out.push('"'),
                b'x' => out.push(self.read_hex_escape(2)?),
                b'u' => out.push(self.read_hex_escape(4)?),
                _ => return Err(self.error(format!("unknown escape '\\{}'", esc as char))),
            }
        }
        Ok(TokenKind::Str(out))
    }

    fn read_hex_escape(&mut self, len: usize) -> CalcResult<char> {
        let mut v = 0u32;
        for _ in 0..len {
            let Some(c) = self.peek() else {
                return Err(self.error("truncated escape"));
            };
            let d = digit_value(c);
            if d >= 16 {
                return Err(self.error("invalid hex escape"));
            }
            v = v * 16 + d;
            self.pos += 1;
        }
        char::from_u32(v).ok_or_else(|| self.error("invalid character escape"))
    }
}
