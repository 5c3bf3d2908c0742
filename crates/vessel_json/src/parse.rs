//! Strict recursive-descent JSON parser.
//!
//! # Grammar
//!
//! Whitespace (space, tab, CR, LF) may appear between tokens. The first
//! significant byte picks the production:
//!
//! | Byte        | Production                          |
//! |-------------|-------------------------------------|
//! | `{`         | object of `"key": value` pairs      |
//! | `[`         | array                               |
//! | `"`         | string                              |
//! | `n` `t` `f` | `null`, `true`, `false`             |
//! | `-` `0-9`   | number                              |
//!
//! After the top-level value only whitespace may remain.
//!
//! # Numbers
//!
//! `-? (0 | [1-9][0-9]*) (. [0-9]+)? ([eE] [+-]? [0-9]+)?`. Without a
//! fraction or exponent the result is an `Int`, accumulated with overflow
//! checks; otherwise a `Float`, converted from the validated text with a
//! single correct rounding.
//!
//! # Strings
//!
//! Decoded in two passes over the body: the first validates escapes and
//! measures the decoded length, the second writes into a buffer of exactly
//! that size. `\u0000` is refused, and UTF-16 surrogates must arrive as a
//! high/low pair of `\uXXXX` escapes.

use tracing::debug;
use vessel_value::{ensure_sufficient_stack, text, Sequence, Table, Value};

use crate::cursor::Cursor;
use crate::error::{ParseError, ParseErrorKind, ParseResult};

/// Parse a complete JSON document.
///
/// # Errors
///
/// Returns the first problem found. No partial value is ever returned.
#[tracing::instrument(level = "trace", skip_all, fields(len = input.len()))]
pub fn from_json(input: &str) -> Result<Value, ParseError> {
    let result = Parser::new(input).parse_document();
    if let Err(err) = &result {
        debug!(pos = err.pos, kind = %err.kind, "rejected JSON input");
    }
    result
}

struct Parser<'a> {
    cursor: Cursor<'a>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Parser {
            cursor: Cursor::new(input),
        }
    }

    fn parse_document(&mut self) -> ParseResult<Value> {
        let value = self.parse_value()?;
        self.cursor.skip_whitespace();
        if !self.cursor.is_eof() {
            return Err(self.cursor.error(ParseErrorKind::TrailingCharacters));
        }
        Ok(value)
    }

    /// `kind` at the current position, or `UnexpectedEof` if the input ran out.
    fn expected(&self, kind: ParseErrorKind) -> ParseError {
        if self.cursor.is_eof() {
            self.cursor.error(ParseErrorKind::UnexpectedEof)
        } else {
            self.cursor.error(kind)
        }
    }

    fn parse_value(&mut self) -> ParseResult<Value> {
        ensure_sufficient_stack(|| {
            self.cursor.skip_whitespace();
            match self.cursor.current() {
                Some(b'{') => self.parse_object(),
                Some(b'[') => self.parse_array(),
                Some(b'"') => self.parse_string().map(Value::from),
                Some(b'n') => self.parse_keyword("null", Value::NONE),
                Some(b't') => self.parse_keyword("true", Value::TRUE),
                Some(b'f') => self.parse_keyword("false", Value::FALSE),
                Some(b'-' | b'0'..=b'9') => self.parse_number(),
                _ => Err(self.cursor.unexpected()),
            }
        })
    }

    fn parse_keyword(&mut self, word: &str, value: Value) -> ParseResult<Value> {
        if self.cursor.rest().starts_with(word) {
            self.cursor.advance_n(word.len());
            Ok(value)
        } else {
            Err(self.cursor.error(ParseErrorKind::InvalidLiteral))
        }
    }

    // Containers

    fn parse_object(&mut self) -> ParseResult<Value> {
        debug_assert_eq!(self.cursor.current(), Some(b'{'));
        self.cursor.advance();
        let mut table = Table::new();
        self.cursor.skip_whitespace();
        if self.cursor.eat(b'}') {
            return Ok(Value::from(table));
        }
        loop {
            self.cursor.skip_whitespace();
            if self.cursor.current() != Some(b'"') {
                return Err(self.expected(ParseErrorKind::ExpectedKey));
            }
            let key = self.parse_string()?;
            self.cursor.skip_whitespace();
            if !self.cursor.eat(b':') {
                return Err(self.expected(ParseErrorKind::ExpectedColon));
            }
            let value = self.parse_value()?;
            // Duplicate keys: the last one wins.
            table.insert(Value::from(key), value);

            self.cursor.skip_whitespace();
            if self.cursor.eat(b'}') {
                return Ok(Value::from(table));
            }
            if !self.cursor.eat(b',') {
                return Err(self.expected(ParseErrorKind::ExpectedCommaOrClose));
            }
        }
    }

    fn parse_array(&mut self) -> ParseResult<Value> {
        debug_assert_eq!(self.cursor.current(), Some(b'['));
        self.cursor.advance();
        let mut items = Sequence::new();
        self.cursor.skip_whitespace();
        if self.cursor.eat(b']') {
            return Ok(Value::from(items));
        }
        loop {
            items.push(self.parse_value()?);
            self.cursor.skip_whitespace();
            if self.cursor.eat(b']') {
                return Ok(Value::from(items));
            }
            if !self.cursor.eat(b',') {
                return Err(self.expected(ParseErrorKind::ExpectedCommaOrClose));
            }
        }
    }

    // Numbers

    fn eat_digits(&mut self) -> usize {
        let start = self.cursor.pos();
        self.cursor.eat_while(|b| b.is_ascii_digit());
        self.cursor.pos() - start
    }

    fn parse_number(&mut self) -> ParseResult<Value> {
        let start = self.cursor.pos();
        let negative = self.cursor.eat(b'-');
        match self.cursor.current() {
            // A leading zero stands alone; "01" stops after the "0".
            Some(b'0') => self.cursor.advance(),
            Some(b'1'..=b'9') => {
                self.eat_digits();
            }
            _ => return Err(self.cursor.unexpected()),
        }
        let int_end = self.cursor.pos();

        let mut is_float = false;
        if self.cursor.eat(b'.') {
            is_float = true;
            if self.eat_digits() == 0 {
                return Err(self.cursor.error(ParseErrorKind::MissingFraction));
            }
        }
        if matches!(self.cursor.current(), Some(b'e' | b'E')) {
            is_float = true;
            self.cursor.advance();
            if matches!(self.cursor.current(), Some(b'+' | b'-')) {
                self.cursor.advance();
            }
            if self.eat_digits() == 0 {
                return Err(self.cursor.error(ParseErrorKind::MissingExponent));
            }
        }

        let lexeme = self.cursor.slice_from(start);
        if is_float {
            let out_of_range = ParseError::new(ParseErrorKind::NumberOutOfRange, start);
            let f: f64 = lexeme.parse().map_err(|_| out_of_range.clone())?;
            if !f.is_finite() {
                return Err(out_of_range);
            }
            return Ok(Value::float(f));
        }

        let digits = &lexeme.as_bytes()[usize::from(negative)..int_end - start];
        let mut n: i64 = 0;
        for &b in digits {
            let digit = i64::from(b - b'0');
            // Accumulate on the negative side so i64::MIN fits.
            n = n
                .checked_mul(10)
                .and_then(|n| {
                    if negative {
                        n.checked_sub(digit)
                    } else {
                        n.checked_add(digit)
                    }
                })
                .ok_or_else(|| ParseError::new(ParseErrorKind::NumberOutOfRange, start))?;
        }
        Ok(Value::int(n))
    }

    // Strings

    fn parse_string(&mut self) -> ParseResult<String> {
        debug_assert_eq!(self.cursor.current(), Some(b'"'));
        self.cursor.advance();
        let body = self.cursor;
        let len = self.scan_string(None)?;
        self.cursor = body;
        let mut out = String::with_capacity(len);
        self.scan_string(Some(&mut out))?;
        debug_assert_eq!(out.len(), len, "measured and decoded string lengths differ");
        Ok(out)
    }

    /// Walk a string body up to and past its closing quote, returning the
    /// decoded length and appending the decoded text to `out` when given.
    fn scan_string(&mut self, mut out: Option<&mut String>) -> ParseResult<usize> {
        let mut len = 0;
        loop {
            let Some(c) = self.cursor.next_char() else {
                return Err(self.cursor.error(ParseErrorKind::UnexpectedEof));
            };
            let decoded = match c {
                '"' => return Ok(len),
                '\\' => self.parse_escape()?,
                raw => raw,
            };
            len += text::encoded_len(decoded);
            if let Some(out) = out.as_deref_mut() {
                text::push_codepoint(out, decoded);
            }
        }
    }

    /// Decode the escape following a backslash.
    fn parse_escape(&mut self) -> ParseResult<char> {
        let backslash = self.cursor.pos() - 1;
        let Some(c) = self.cursor.next_char() else {
            return Err(self.cursor.error(ParseErrorKind::UnexpectedEof));
        };
        let decoded = match c {
            '"' => '"',
            '\\' => '\\',
            '/' => '/',
            'b' => '\u{8}',
            'f' => '\u{c}',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'u' => return self.parse_unicode_escape(backslash),
            other => return Err(ParseError::new(ParseErrorKind::InvalidEscape(other), backslash)),
        };
        Ok(decoded)
    }

    /// Exactly four hex digits.
    fn hex4(&mut self) -> ParseResult<u32> {
        let mut code = 0;
        for _ in 0..4 {
            let Some(b) = self.cursor.current() else {
                return Err(self.cursor.error(ParseErrorKind::UnexpectedEof));
            };
            let Some(digit) = char::from(b).to_digit(16) else {
                return Err(self.cursor.error(ParseErrorKind::InvalidUnicodeEscape));
            };
            code = code * 16 + digit;
            self.cursor.advance();
        }
        Ok(code)
    }

    fn parse_unicode_escape(&mut self, start: usize) -> ParseResult<char> {
        let at = |kind| ParseError::new(kind, start);
        let code = self.hex4()?;
        let code = match code {
            0 => return Err(at(ParseErrorKind::NulEscape)),
            0xD800..=0xDBFF => {
                if !self.cursor.rest().starts_with("\\u") {
                    return Err(at(ParseErrorKind::LoneSurrogate));
                }
                self.cursor.advance_n(2);
                let low = self.hex4()?;
                if !(0xDC00..=0xDFFF).contains(&low) {
                    return Err(at(ParseErrorKind::LoneSurrogate));
                }
                0x1_0000 + ((code - 0xD800) << 10) + (low - 0xDC00)
            }
            0xDC00..=0xDFFF => return Err(at(ParseErrorKind::LoneSurrogate)),
            scalar => scalar,
        };
        char::from_u32(code).ok_or_else(|| at(ParseErrorKind::InvalidUnicodeEscape))
    }
}

#[cfg(test)]
mod tests;
