//! The character-fed JSON tokenizer.
//!
//! [`Tokenizer`] is a push-driven state machine: callers feed it one
//! character at a time (or convenience-feed a whole `&str`) and it emits
//! validated [`Token`]s into a growable array. String contents accumulate in
//! a single shared character buffer; emitted string tokens are byte ranges
//! into that buffer and stay stable until [`reset`](Tokenizer::reset).
//!
//! # Examples
//!
//! ```rust
//! use jsonflat::{Token, Tokenizer};
//!
//! let mut tokenizer = Tokenizer::new();
//! tokenizer.feed_str("[true,null]");
//! assert!(tokenizer.is_done());
//!
//! let tokens: Vec<_> = tokenizer.tokens().collect();
//! assert_eq!(
//!     tokens,
//!     vec![
//!         Token::ArrayBegin,
//!         Token::Bool(true),
//!         Token::Null,
//!         Token::ArrayEnd,
//!     ]
//! );
//! ```

use alloc::{string::String, vec::Vec};

use crate::{
    error::{TokenizeError, TokenizeReason},
    escape_buffer::UnicodeEscapeBuffer,
    token::{RawToken, Token},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    Done,
    Error,
    // structural states
    ArrayValue,
    ArrayComma,
    ObjectKey,
    ObjectColon,
    ObjectValue,
    ObjectComma,
    // strings
    StringChar,
    StringEscape,
    StringU1,
    StringU2,
    StringU3,
    StringU4,
    // numbers
    NumMinus,
    NumZero,
    NumWhole,
    NumFrac0,
    NumFrac,
    NumExp0,
    NumExp,
    // keyword literals, one state per consumed prefix
    N,
    Nu,
    Nul,
    T,
    Tr,
    Tru,
    F,
    Fa,
    Fal,
    Fals,
}

/// Outcome of handing one character to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// The character was consumed.
    Consumed,
    /// A token was emitted and the same character must be re-dispatched in
    /// the popped state. Only number terminators take this path.
    Again,
}

fn is_json_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n' | '\u{0B}' | '\u{0C}')
}

fn pow10(n: i32) -> f64 {
    // Repeated multiplication; anything past the f64 range saturates to
    // infinity which the caller turns into inf or zero.
    let mut p = 1.0_f64;
    for _ in 0..n.min(400) {
        p *= 10.0;
    }
    p
}

/// The push-fed tokenizer.
///
/// Construction gives an empty machine in its start state. Feeding drives it
/// until the single top-level value completes ([`is_done`](Self::is_done)) or
/// an invalid character is seen ([`is_failed`](Self::is_failed)); both states
/// are terminal and further feeds are ignored.
#[derive(Debug)]
pub struct Tokenizer {
    state: State,
    /// Return-to states, one per suspended enclosing context.
    returns: Vec<State>,
    tokens: Vec<RawToken>,
    /// Shared string storage. `string_start` marks the first byte of the
    /// token under construction; everything before it belongs to already
    /// emitted tokens.
    buffer: String,
    string_start: usize,
    escapes: UnicodeEscapeBuffer,
    // number accumulator
    num_sign: i64,
    num_whole: i64,
    num_frac: f64,
    num_frac_div: f64,
    num_exp: i32,
    num_exp_sign: i32,
    // position tracking for error reporting
    pos: usize,
    last_char: Option<char>,
    error: Option<TokenizeError>,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: State::Start,
            returns: Vec::with_capacity(16),
            tokens: Vec::new(),
            buffer: String::new(),
            string_start: 0,
            escapes: UnicodeEscapeBuffer::new(),
            num_sign: 1,
            num_whole: 0,
            num_frac: 0.0,
            num_frac_div: 1.0,
            num_exp: 0,
            num_exp_sign: 0,
            pos: 0,
            last_char: None,
            error: None,
        }
    }

    /// Feeds one character into the state machine.
    ///
    /// A no-op once the tokenizer is done or failed.
    pub fn feed(&mut self, c: char) {
        if matches!(self.state, State::Done | State::Error) {
            return;
        }
        loop {
            match self.step(c) {
                Step::Consumed => break,
                Step::Again => {
                    if matches!(self.state, State::Done | State::Error) {
                        break;
                    }
                }
            }
        }
        self.pos += 1;
        self.last_char = Some(c);
    }

    /// Feeds every character of `text`, stopping early once the tokenizer is
    /// done or failed.
    pub fn feed_str(&mut self, text: &str) {
        for c in text.chars() {
            if matches!(self.state, State::Done | State::Error) {
                break;
            }
            self.feed(c);
        }
    }

    /// Marks the end of input.
    ///
    /// A number at the top level has no terminator character, so this is how
    /// a bare `"-123"` becomes a token. Ending anywhere else short of a
    /// complete value records an unexpected-end error.
    pub fn finish(&mut self) {
        if matches!(self.state, State::Done | State::Error) {
            return;
        }
        if matches!(
            self.state,
            State::NumZero | State::NumWhole | State::NumFrac | State::NumExp
        ) {
            self.emit_number();
        }
        if self.state == State::Done {
            return;
        }
        let reason = Self::end_reason(self.state);
        self.fail(None, reason);
    }

    /// `true` once the single top-level value has completed.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.state == State::Done
    }

    /// `true` once an invalid character drove the machine into its terminal
    /// error state.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.state == State::Error
    }

    /// `true` while more input is expected: neither done nor failed.
    #[must_use]
    pub fn is_tokenizing(&self) -> bool {
        !self.is_done() && !self.is_failed()
    }

    /// Number of tokens emitted so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Returns the `index`-th emitted token.
    ///
    /// String tokens borrow the tokenizer's character buffer.
    #[must_use]
    pub fn get<'t>(&'t self, index: usize) -> Option<Token<'t>> {
        self.tokens.get(index).map(|raw| raw.resolve(&self.buffer))
    }

    /// Iterates over the emitted tokens.
    #[must_use]
    pub fn tokens(&self) -> Tokens<'_> {
        Tokens {
            tokenizer: self,
            index: 0,
        }
    }

    /// The captured error, once [`is_failed`](Self::is_failed) holds.
    #[must_use]
    pub fn error(&self) -> Option<&TokenizeError> {
        self.error.as_ref()
    }

    /// Discards the emitted tokens while preserving the parse position.
    ///
    /// If a string is under construction its prefix is shifted to the head
    /// of the buffer so tokenizing continues correctly; all previously
    /// emitted string tokens are invalidated.
    pub fn reset(&mut self) {
        self.tokens.clear();
        self.buffer.drain(..self.string_start);
        self.string_start = 0;
    }

    /// Returns the tokenizer to its initial state.
    pub fn clear(&mut self) {
        self.state = State::Start;
        self.returns.clear();
        self.tokens.clear();
        self.buffer.clear();
        self.string_start = 0;
        self.escapes.reset();
        self.num_sign = 1;
        self.num_whole = 0;
        self.num_frac = 0.0;
        self.num_frac_div = 1.0;
        self.num_exp = 0;
        self.num_exp_sign = 0;
        self.pos = 0;
        self.last_char = None;
        self.error = None;
    }

    // --------------------------------------------------------------------
    // State machine
    // --------------------------------------------------------------------

    #[allow(clippy::too_many_lines)]
    fn step(&mut self, c: char) -> Step {
        use State::*;

        match self.state {
            Done | Error => Step::Consumed,

            Start => {
                if is_json_space(c) {
                    Step::Consumed
                } else {
                    self.begin_value(c, Done)
                }
            }

            // ---------------------- structural states -----------------------
            ArrayValue => match c {
                ']' => self.emit_and_pop(RawToken::ArrayEnd),
                c if is_json_space(c) => Step::Consumed,
                c => self.begin_value(c, ArrayComma),
            },

            ArrayComma => match c {
                ',' => {
                    self.state = ArrayValue;
                    Step::Consumed
                }
                ']' => self.emit_and_pop(RawToken::ArrayEnd),
                c if is_json_space(c) => Step::Consumed,
                c => self.fail(Some(c), TokenizeReason::ExpectedCommaOrArrayEnd),
            },

            ObjectKey => match c {
                '}' => self.emit_and_pop(RawToken::ObjectEnd),
                '"' => {
                    self.returns.push(ObjectColon);
                    self.state = StringChar;
                    Step::Consumed
                }
                c if is_json_space(c) => Step::Consumed,
                c => self.fail(Some(c), TokenizeReason::ExpectedKeyOrObjectEnd),
            },

            ObjectColon => match c {
                ':' => {
                    self.state = ObjectValue;
                    Step::Consumed
                }
                c if is_json_space(c) => Step::Consumed,
                c => self.fail(Some(c), TokenizeReason::ExpectedColon),
            },

            ObjectValue => {
                if is_json_space(c) {
                    Step::Consumed
                } else {
                    self.begin_value(c, ObjectComma)
                }
            }

            ObjectComma => match c {
                ',' => {
                    self.state = ObjectKey;
                    Step::Consumed
                }
                '}' => self.emit_and_pop(RawToken::ObjectEnd),
                c if is_json_space(c) => Step::Consumed,
                c => self.fail(Some(c), TokenizeReason::ExpectedCommaOrObjectEnd),
            },

            // -------------------------- strings ----------------------------
            StringChar => match c {
                '"' => {
                    if self.escapes.has_pending() {
                        return self.fail(Some(c), TokenizeReason::UnpairedSurrogate);
                    }
                    self.emit_string()
                }
                '\\' => {
                    self.state = StringEscape;
                    Step::Consumed
                }
                c if (c as u32) < 0x20 => self.fail(Some(c), TokenizeReason::ControlCharacter),
                c => {
                    if self.escapes.has_pending() {
                        return self.fail(Some(c), TokenizeReason::UnpairedSurrogate);
                    }
                    self.buffer.push(c);
                    Step::Consumed
                }
            },

            StringEscape => {
                if self.escapes.has_pending() && c != 'u' {
                    return self.fail(Some(c), TokenizeReason::UnpairedSurrogate);
                }
                let decoded = match c {
                    '"' | '\\' | '/' => c,
                    'b' => '\u{0008}',
                    'f' => '\u{000C}',
                    'n' => '\n',
                    'r' => '\r',
                    't' => '\t',
                    'u' => {
                        self.escapes.begin();
                        self.state = StringU1;
                        return Step::Consumed;
                    }
                    c => return self.fail(Some(c), TokenizeReason::InvalidEscape),
                };
                self.buffer.push(decoded);
                self.state = StringChar;
                Step::Consumed
            }

            StringU1 => self.hex_digit(c, StringU2),
            StringU2 => self.hex_digit(c, StringU3),
            StringU3 => self.hex_digit(c, StringU4),
            StringU4 => match c.to_digit(16) {
                Some(d) => {
                    self.escapes.push(d as u16);
                    match self.escapes.complete() {
                        Ok(Some(decoded)) => {
                            self.buffer.push(decoded);
                            self.state = StringChar;
                            Step::Consumed
                        }
                        // High surrogate parked; the next escape supplies
                        // the low half.
                        Ok(None) => {
                            self.state = StringChar;
                            Step::Consumed
                        }
                        Err(reason) => self.fail(Some(c), reason),
                    }
                }
                None => self.fail(Some(c), TokenizeReason::ExpectedHexDigit),
            },

            // -------------------------- numbers ----------------------------
            NumMinus => match c.to_digit(10) {
                Some(0) => {
                    self.state = NumZero;
                    Step::Consumed
                }
                Some(d) => {
                    self.num_whole = i64::from(d);
                    self.state = NumWhole;
                    Step::Consumed
                }
                None => self.fail(Some(c), TokenizeReason::ExpectedDigit),
            },

            NumZero => match c {
                '.' => {
                    self.state = NumFrac0;
                    Step::Consumed
                }
                'e' | 'E' => {
                    self.state = NumExp0;
                    Step::Consumed
                }
                _ => {
                    self.emit_number();
                    Step::Again
                }
            },

            NumWhole => match c {
                '0'..='9' => {
                    let d = (c as u32 - '0' as u32) as i64;
                    self.num_whole = self.num_whole.wrapping_mul(10).wrapping_add(d);
                    Step::Consumed
                }
                '.' => {
                    self.state = NumFrac0;
                    Step::Consumed
                }
                'e' | 'E' => {
                    self.state = NumExp0;
                    Step::Consumed
                }
                _ => {
                    self.emit_number();
                    Step::Again
                }
            },

            NumFrac0 => match c.to_digit(10) {
                Some(d) => {
                    self.num_frac = self.num_frac * 10.0 + f64::from(d);
                    self.num_frac_div *= 10.0;
                    self.state = NumFrac;
                    Step::Consumed
                }
                None => self.fail(Some(c), TokenizeReason::ExpectedDigit),
            },

            NumFrac => match c {
                '0'..='9' => {
                    let d = f64::from(c as u32 - '0' as u32);
                    self.num_frac = self.num_frac * 10.0 + d;
                    self.num_frac_div *= 10.0;
                    Step::Consumed
                }
                'e' | 'E' => {
                    self.state = NumExp0;
                    Step::Consumed
                }
                _ => {
                    self.emit_number();
                    Step::Again
                }
            },

            NumExp0 => match c {
                '+' if self.num_exp_sign == 0 => {
                    self.num_exp_sign = 1;
                    Step::Consumed
                }
                '-' if self.num_exp_sign == 0 => {
                    self.num_exp_sign = -1;
                    Step::Consumed
                }
                '0'..='9' => {
                    self.num_exp = (c as u32 - '0' as u32) as i32;
                    self.state = NumExp;
                    Step::Consumed
                }
                c => self.fail(Some(c), TokenizeReason::ExpectedDigit),
            },

            NumExp => match c {
                '0'..='9' => {
                    let d = (c as u32 - '0' as u32) as i32;
                    self.num_exp = self.num_exp.saturating_mul(10).saturating_add(d);
                    Step::Consumed
                }
                _ => {
                    self.emit_number();
                    Step::Again
                }
            },

            // ---------------------- keyword literals ------------------------
            N => self.literal_char(c, 'u', Nu),
            Nu => self.literal_char(c, 'l', Nul),
            Nul => self.literal_emit(c, 'l', RawToken::Null),
            T => self.literal_char(c, 'r', Tr),
            Tr => self.literal_char(c, 'u', Tru),
            Tru => self.literal_emit(c, 'e', RawToken::Bool(true)),
            F => self.literal_char(c, 'a', Fa),
            Fa => self.literal_char(c, 'l', Fal),
            Fal => self.literal_char(c, 's', Fals),
            Fals => self.literal_emit(c, 'e', RawToken::Bool(false)),
        }
    }

    /// First-value dispatch: `follow` is pushed on the return stack and
    /// becomes the state again once the value completes.
    fn begin_value(&mut self, c: char, follow: State) -> Step {
        match c {
            '[' => {
                self.returns.push(follow);
                self.tokens.push(RawToken::ArrayBegin);
                self.state = State::ArrayValue;
            }
            '{' => {
                self.returns.push(follow);
                self.tokens.push(RawToken::ObjectBegin);
                self.state = State::ObjectKey;
            }
            '"' => {
                self.returns.push(follow);
                self.state = State::StringChar;
            }
            'n' => {
                self.returns.push(follow);
                self.state = State::N;
            }
            't' => {
                self.returns.push(follow);
                self.state = State::T;
            }
            'f' => {
                self.returns.push(follow);
                self.state = State::F;
            }
            '0' => {
                self.returns.push(follow);
                self.reset_number();
                self.state = State::NumZero;
            }
            '1'..='9' => {
                self.returns.push(follow);
                self.reset_number();
                self.num_whole = (c as u32 - '0' as u32) as i64;
                self.state = State::NumWhole;
            }
            '-' => {
                self.returns.push(follow);
                self.reset_number();
                self.num_sign = -1;
                self.state = State::NumMinus;
            }
            c => return self.fail(Some(c), TokenizeReason::ExpectedValue),
        }
        Step::Consumed
    }

    fn reset_number(&mut self) {
        self.num_sign = 1;
        self.num_whole = 0;
        self.num_frac = 0.0;
        self.num_frac_div = 1.0;
        self.num_exp = 0;
        self.num_exp_sign = 0;
    }

    /// Emits the accumulated number and pops back to the enclosing context.
    ///
    /// A number with no fractional digits and no exponent is a `Long`;
    /// everything else is a `Double`.
    fn emit_number(&mut self) {
        let token = if self.num_frac_div == 1.0 && self.num_exp == 0 {
            RawToken::Long(self.num_whole.wrapping_mul(self.num_sign))
        } else {
            let magnitude = self.num_whole as f64 + self.num_frac / self.num_frac_div;
            let scale = pow10(self.num_exp);
            let scaled = if self.num_exp_sign < 0 {
                magnitude / scale
            } else {
                magnitude * scale
            };
            RawToken::Double(scaled * self.num_sign as f64)
        };
        self.tokens.push(token);
        self.state = self.pop_return();
    }

    /// Emits the string under construction and advances `string_start` so the
    /// recorded range stays stable.
    fn emit_string(&mut self) -> Step {
        let offset = self.string_start as u32;
        let len = (self.buffer.len() - self.string_start) as u32;
        self.tokens.push(RawToken::Str { offset, len });
        self.string_start = self.buffer.len();
        self.state = self.pop_return();
        Step::Consumed
    }

    fn emit_and_pop(&mut self, token: RawToken) -> Step {
        self.tokens.push(token);
        self.state = self.pop_return();
        Step::Consumed
    }

    fn pop_return(&mut self) -> State {
        self.returns.pop().unwrap_or(State::Done)
    }

    fn hex_digit(&mut self, c: char, next: State) -> Step {
        match c.to_digit(16) {
            Some(d) => {
                self.escapes.push(d as u16);
                self.state = next;
                Step::Consumed
            }
            None => self.fail(Some(c), TokenizeReason::ExpectedHexDigit),
        }
    }

    fn literal_char(&mut self, c: char, expected: char, next: State) -> Step {
        if c == expected {
            self.state = next;
            Step::Consumed
        } else {
            self.fail(Some(c), TokenizeReason::InvalidLiteral)
        }
    }

    fn literal_emit(&mut self, c: char, expected: char, token: RawToken) -> Step {
        if c == expected {
            self.emit_and_pop(token)
        } else {
            self.fail(Some(c), TokenizeReason::InvalidLiteral)
        }
    }

    fn fail(&mut self, found: Option<char>, reason: TokenizeReason) -> Step {
        self.error = Some(TokenizeError {
            position: self.pos,
            found,
            preceding: self.last_char,
            reason,
        });
        self.state = State::Error;
        Step::Consumed
    }

    fn end_reason(state: State) -> TokenizeReason {
        use State::*;
        match state {
            Start | ArrayValue | ObjectValue => TokenizeReason::ExpectedValue,
            ArrayComma => TokenizeReason::ExpectedCommaOrArrayEnd,
            ObjectKey => TokenizeReason::ExpectedKeyOrObjectEnd,
            ObjectColon => TokenizeReason::ExpectedColon,
            ObjectComma => TokenizeReason::ExpectedCommaOrObjectEnd,
            StringChar => TokenizeReason::UnterminatedString,
            StringEscape | StringU1 | StringU2 | StringU3 | StringU4 => {
                TokenizeReason::TruncatedEscape
            }
            N | Nu | Nul | T | Tr | Tru | F | Fa | Fal | Fals => TokenizeReason::InvalidLiteral,
            NumMinus | NumFrac0 | NumExp0 => TokenizeReason::ExpectedDigit,
            // Handled before `end_reason` is consulted.
            NumZero | NumWhole | NumFrac | NumExp | Done | Error => TokenizeReason::ExpectedValue,
        }
    }
}

/// Iterator over a tokenizer's emitted tokens.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    tokenizer: &'a Tokenizer,
    index: usize,
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.tokenizer.get(self.index)?;
        self.index += 1;
        Some(token)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.tokenizer.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Tokens<'_> {}

impl<'a> IntoIterator for &'a Tokenizer {
    type Item = Token<'a>;
    type IntoIter = Tokens<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens()
    }
}
