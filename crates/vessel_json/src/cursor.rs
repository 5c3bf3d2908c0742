//! Byte cursor over JSON input.
//!
//! Every structural JSON token is ASCII, so the parser steers on single
//! bytes and only decodes full codepoints inside string bodies. End of input
//! reads as `None` rather than a sentinel byte.

use vessel_value::text;

use crate::error::{ParseError, ParseErrorKind};

/// Position-tracking reader over the input text.
///
/// [`Copy`], so a snapshot is just a saved cursor.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(src: &'a str) -> Self {
        Cursor { src, pos: 0 }
    }

    /// Byte at the current position, `None` at end of input.
    #[inline]
    pub(crate) fn current(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    #[inline]
    pub(crate) fn advance(&mut self) {
        self.pos += 1;
    }

    #[inline]
    pub(crate) fn advance_n(&mut self, n: usize) {
        self.pos += n;
    }

    #[inline]
    pub(crate) fn is_eof(&self) -> bool {
        self.pos >= self.src.len()
    }

    #[inline]
    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    /// Input from the current position on.
    #[inline]
    pub(crate) fn rest(&self) -> &'a str {
        self.src.get(self.pos..).unwrap_or("")
    }

    /// Input between `start` and the current position.
    #[inline]
    pub(crate) fn slice_from(&self, start: usize) -> &'a str {
        self.src.get(start..self.pos).unwrap_or("")
    }

    /// Decode the codepoint at the current position and step past it.
    #[inline]
    pub(crate) fn next_char(&mut self) -> Option<char> {
        text::next_codepoint(self.src, &mut self.pos)
    }

    /// Advance while `pred` holds for the current byte.
    #[inline]
    pub(crate) fn eat_while(&mut self, pred: impl Fn(u8) -> bool) {
        while self.current().is_some_and(&pred) {
            self.pos += 1;
        }
    }

    /// Skip JSON whitespace: space, tab, carriage return, line feed.
    #[inline]
    pub(crate) fn skip_whitespace(&mut self) {
        self.eat_while(|b| matches!(b, b' ' | b'\t' | b'\r' | b'\n'));
    }

    /// Consume `byte` if it is next.
    #[inline]
    pub(crate) fn eat(&mut self, byte: u8) -> bool {
        if self.current() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Error of `kind` at the current position.
    #[cold]
    pub(crate) fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::new(kind, self.pos)
    }

    /// Error describing whatever sits at the current position: the
    /// unexpected character, or end of input.
    #[cold]
    pub(crate) fn unexpected(&self) -> ParseError {
        let kind = self
            .rest()
            .chars()
            .next()
            .map_or(ParseErrorKind::UnexpectedEof, ParseErrorKind::UnexpectedChar);
        self.error(kind)
    }
}
