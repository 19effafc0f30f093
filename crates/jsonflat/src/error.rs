//! Error types for the tokenizer, parser, value accessors, and generator.
//!
//! The tokenizer and parser never fail eagerly: malformed input drives them
//! into a terminal error state that is observable through their status
//! accessors, and the error value is retrievable afterwards. Value accessors
//! and the [`Generator`](crate::Generator) return `Result` directly, since
//! misusing them is a programmer error rather than an input error.

use core::fmt;

use thiserror::Error;

use crate::{token::TokenKind, value::ValueKind};

/// Why the tokenizer rejected a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenizeReason {
    /// A JSON value was required.
    #[error("expected a JSON value")]
    ExpectedValue,
    /// Inside an array, after an element.
    #[error("expected ',' or ']'")]
    ExpectedCommaOrArrayEnd,
    /// Inside an object, where a key or the closing brace may appear.
    #[error("expected '\"' or '}}'")]
    ExpectedKeyOrObjectEnd,
    /// Between an object key and its value.
    #[error("expected ':'")]
    ExpectedColon,
    /// Inside an object, after a value.
    #[error("expected ',' or '}}'")]
    ExpectedCommaOrObjectEnd,
    /// Raw control characters (U+0000..=U+001F) may not appear in strings.
    #[error("control character in string")]
    ControlCharacter,
    /// The character after `\` was not one of `" \ / b f n r t u`.
    #[error("invalid escape character")]
    InvalidEscape,
    /// A `\u` escape needs exactly four hex digits.
    #[error("expected a hex digit")]
    ExpectedHexDigit,
    /// A surrogate `\u` escape without its matching other half.
    #[error("unpaired surrogate escape")]
    UnpairedSurrogate,
    /// A `null` / `true` / `false` keyword went off the rails.
    #[error("invalid literal")]
    InvalidLiteral,
    /// A digit was required, e.g. after `-`, `.` or an exponent sign.
    #[error("expected a digit")]
    ExpectedDigit,
    /// Input finished while a string was still open.
    #[error("unterminated string")]
    UnterminatedString,
    /// Input finished in the middle of an escape sequence.
    #[error("truncated escape sequence")]
    TruncatedEscape,
}

/// The terminal error captured by a failed [`Tokenizer`](crate::Tokenizer).
///
/// Records where the failure happened (`position` counts characters fed), the
/// offending character (`None` when the input ended), the character fed just
/// before it, and the reason phrase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TokenizeError {
    /// Zero-based index of the offending character in the fed stream.
    pub position: usize,
    /// The character that could not be accepted; `None` on premature end.
    pub found: Option<char>,
    /// The character fed immediately before the offending one.
    pub preceding: Option<char>,
    /// What the state machine was expecting instead.
    pub reason: TokenizeReason,
}

impl fmt::Display for TokenizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.found {
            Some(c) => write!(
                f,
                "syntax error at position {}: unexpected character {:?}",
                self.position, c
            )?,
            None => write!(
                f,
                "syntax error at position {}: unexpected end of input",
                self.position
            )?,
        }
        if let Some(p) = self.preceding {
            write!(f, " after {p:?}")?;
        }
        write!(f, ": {}", self.reason)
    }
}

impl core::error::Error for TokenizeError {}

/// Errors surfaced by the [`Parser`](crate::Parser).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// [`last_parsed_root`](crate::Parser::last_parsed_root) was called
    /// before a document completed.
    #[error("no parsed document is available")]
    NotDone,
    /// The token stream violated the JSON structure.
    #[error("unexpected {0:?} token")]
    UnexpectedToken(TokenKind),
    /// The token stream stopped early because the tokenizer failed.
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),
}

/// Errors raised by [`Value`](crate::Value) accessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValueError {
    /// The value does not hold the requested kind.
    #[error("cannot read {actual:?} as {requested:?}")]
    InvalidCast {
        /// The kind the caller asked for.
        requested: ValueKind,
        /// The kind the value actually holds.
        actual: ValueKind,
    },
    /// Positional access past the end of a container.
    #[error("index {index} out of range for length {len}")]
    OutOfBounds {
        /// The requested position.
        index: usize,
        /// The container length.
        len: usize,
    },
}

/// Errors raised by the [`Generator`](crate::Generator) on invalid call
/// sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeneratorError {
    /// Only strings may appear in object-key position.
    #[error("object keys must be strings")]
    KeyExpected,
    /// A key was emitted but its value never followed.
    #[error("the last object key has no value")]
    KeyWithoutValue,
    /// `array_end` without a matching open array.
    #[error("no open array to close")]
    NotInArray,
    /// `object_end` without a matching open object.
    #[error("no open object to close")]
    NotInObject,
    /// The single top-level value has already been emitted.
    #[error("the document is already complete")]
    DocumentComplete,
    /// A previous violation left the generator in its error state.
    #[error("the generator has already failed")]
    Failed,
    /// JSON has no representation for NaN or infinities.
    #[error("number is not finite")]
    NonFinite,
    /// Walking a [`Value`](crate::Value) tree failed.
    #[error(transparent)]
    Value(#[from] ValueError),
}
