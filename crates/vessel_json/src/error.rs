//! Parse failures.
//!
//! Parsing is all-or-nothing: any failure anywhere in the input abandons the
//! whole document and reports the first problem found, with the byte offset
//! where the parser gave up.

use thiserror::Error;

/// A failed [`from_json`](crate::from_json) call.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{kind} at byte {pos}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// Byte offset into the input.
    pub pos: usize,
}

impl ParseError {
    pub(crate) fn new(kind: ParseErrorKind, pos: usize) -> Self {
        ParseError { kind, pos }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("unexpected character {0:?}")]
    UnexpectedChar(char),
    #[error("invalid literal")]
    InvalidLiteral,
    #[error("invalid escape '\\{0}'")]
    InvalidEscape(char),
    #[error("invalid unicode escape")]
    InvalidUnicodeEscape,
    #[error("\\u0000 is not allowed in strings")]
    NulEscape,
    #[error("unpaired surrogate in unicode escape")]
    LoneSurrogate,
    #[error("expected digits after '.'")]
    MissingFraction,
    #[error("expected digits in exponent")]
    MissingExponent,
    #[error("number out of range")]
    NumberOutOfRange,
    #[error("expected a string key")]
    ExpectedKey,
    #[error("expected ':' after object key")]
    ExpectedColon,
    #[error("expected ',' or closing bracket")]
    ExpectedCommaOrClose,
    #[error("trailing characters after value")]
    TrailingCharacters,
}

pub(crate) type ParseResult<T> = Result<T, ParseError>;
