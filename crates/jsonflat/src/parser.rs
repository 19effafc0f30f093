//! The token-fed JSON parser.
//!
//! [`Parser`] consumes a [`Token`] stream and builds a flat tree. Every value
//! in the document is one small tagged cell in a single `values` array;
//! container children are described by offset/length ranges into a side
//! `indexes` table, and string payloads live in a `strings` table of
//! [`StrSlice`]s. While a container is open its children's indices accumulate
//! in a pooled scratch list, so deeply nested documents reuse a handful of
//! integer vectors instead of allocating per node.
//!
//! # Examples
//!
//! ```rust
//! use jsonflat::{Parser, Tokenizer};
//!
//! let mut tokenizer = Tokenizer::new();
//! tokenizer.feed_str(r#"[true,false,null]"#);
//!
//! let mut parser = Parser::new();
//! parser.parse(&tokenizer).unwrap();
//!
//! let root = parser.last_parsed_root().unwrap();
//! assert_eq!(root.count().unwrap(), 3);
//! assert!(root.get(2).unwrap().is_null());
//! ```

use alloc::{string::String, vec::Vec};

use crate::{
    error::ParseError,
    slice::StrSlice,
    token::Token,
    tokenizer::Tokenizer,
    value::{RawValue, Value},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    Done,
    Error,
    ArrayValue,
    ObjectKey,
    ObjectValue,
}

/// One open container: its state and the scratch list collecting the indices
/// of its direct children.
#[derive(Debug)]
struct Context {
    state: State,
    children: Vec<u32>,
}

/// Scratch lists kept for reuse once their container closes.
const POOL_LIMIT: usize = 16;

/// The push-fed parser.
///
/// `'a` is the lifetime of the string data behind fed tokens — in the usual
/// pipeline, the tokenizer's character buffer. String values stay borrowed
/// from that buffer until [`copy_strings`](Self::copy_strings) moves them
/// into parser-owned storage.
///
/// [`reset`](Self::reset) starts a fresh document while keeping the
/// accumulated arenas, so many documents can share one allocation;
/// [`clear`](Self::clear) wipes the arenas too.
#[derive(Debug, Default)]
pub struct Parser<'a> {
    /// Root-level state; open containers override it via `stack`.
    state: State,
    stack: Vec<Context>,
    pool: Vec<Vec<u32>>,
    strings: Vec<StrSlice<'a>>,
    values: Vec<RawValue>,
    indexes: Vec<u32>,
    /// Destination buffer for `copy_strings`.
    owned: String,
    /// Entries of `strings` below this index have already been copied.
    copied: usize,
    error: Option<ParseError>,
}

impl Default for State {
    fn default() -> Self {
        State::Start
    }
}

impl<'a> Parser<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one token into the state machine.
    ///
    /// A no-op once the parser is done or failed.
    pub fn feed(&mut self, token: Token<'a>) {
        match self.current_state() {
            State::Done | State::Error => {}
            State::Start => {
                // Once the root value completes, the machine is done.
                self.state = State::Done;
                self.dispatch_value(token);
            }
            State::ArrayValue => match token {
                Token::ArrayEnd => self.close_array(),
                token => self.dispatch_value(token),
            },
            State::ObjectKey => match token {
                Token::ObjectEnd => self.close_object(),
                Token::Str(text) => {
                    let index = self.push_string(StrSlice::Borrowed(text));
                    if let Some(context) = self.stack.last_mut() {
                        context.children.push(index);
                        context.state = State::ObjectValue;
                    }
                }
                token => self.fail(token),
            },
            State::ObjectValue => self.dispatch_value(token),
        }
    }

    /// Feeds tokens until the stream ends or the parser is done or failed.
    pub fn feed_all<I>(&mut self, tokens: I)
    where
        I: IntoIterator<Item = Token<'a>>,
    {
        for token in tokens {
            if self.is_done() || self.is_failed() {
                break;
            }
            self.feed(token);
        }
    }

    /// Feeds every token the tokenizer emitted and surfaces failure from
    /// either machine.
    ///
    /// A tokenizer error wins over the parser's own state: the token stream
    /// was cut short, so the parser is merely unfinished rather than wrong.
    pub fn parse(&mut self, tokenizer: &'a Tokenizer) -> Result<(), ParseError> {
        self.feed_all(tokenizer.tokens());
        if let Some(error) = tokenizer.error() {
            return Err(ParseError::Tokenize(*error));
        }
        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        Ok(())
    }

    /// `true` once a complete document has been parsed.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.current_state() == State::Done
    }

    /// `true` once a malformed token sequence was fed.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.current_state() == State::Error
    }

    /// `true` while mid-document: neither done nor failed.
    #[must_use]
    pub fn is_parsing(&self) -> bool {
        !self.is_done() && !self.is_failed()
    }

    /// The captured error, once [`is_failed`](Self::is_failed) holds.
    #[must_use]
    pub fn error(&self) -> Option<&ParseError> {
        self.error.as_ref()
    }

    /// Returns a handle to the root of the most recently completed parse.
    ///
    /// # Errors
    ///
    /// [`ParseError::NotDone`] if no document has completed since the last
    /// [`reset`](Self::reset).
    pub fn last_parsed_root(&self) -> Result<Value<'_, 'a>, ParseError> {
        if !self.is_done() {
            return Err(ParseError::NotDone);
        }
        let raw = *self.values.last().ok_or(ParseError::NotDone)?;
        Ok(Value::new(raw, self))
    }

    /// Starts a fresh document, preserving the accumulated arenas.
    pub fn reset(&mut self) {
        while let Some(context) = self.stack.pop() {
            self.recycle(context.children);
        }
        self.state = State::Start;
        self.error = None;
    }

    /// Returns the parser to its initial state, dropping all parsed data.
    pub fn clear(&mut self) {
        self.reset();
        self.strings.clear();
        self.values.clear();
        self.indexes.clear();
        self.owned.clear();
        self.copied = 0;
    }

    /// Copies every string appended since the last call into parser-owned
    /// storage, severing the dependency on the tokenizer's buffer.
    ///
    /// The copy buffer grows once, by the exact byte total of the pending
    /// strings; existing `Value` handles keep resolving to equal text.
    pub fn copy_strings(&mut self) {
        let pending = &mut self.strings[self.copied..];
        let total: usize = pending
            .iter()
            .filter(|slice| slice.is_borrowed())
            .map(StrSlice::len)
            .sum();
        self.owned.reserve(total);
        for entry in pending.iter_mut() {
            if let StrSlice::Borrowed(text) = *entry {
                let offset = self.owned.len() as u32;
                self.owned.push_str(text);
                *entry = StrSlice::Owned {
                    offset,
                    len: text.len() as u32,
                };
            }
        }
        self.copied = self.strings.len();
    }

    // --------------------------------------------------------------------
    // State machine
    // --------------------------------------------------------------------

    fn current_state(&self) -> State {
        self.stack.last().map_or(self.state, |context| context.state)
    }

    fn dispatch_value(&mut self, token: Token<'a>) {
        match token {
            Token::Null => self.push_value(RawValue::Null),
            Token::Bool(value) => self.push_value(RawValue::Bool(value)),
            Token::Long(value) => self.push_value(RawValue::Long(value)),
            Token::Double(value) => self.push_value(RawValue::Double(value)),
            Token::Str(text) => {
                let index = self.push_string(StrSlice::Borrowed(text));
                self.push_value(RawValue::Str { index });
            }
            Token::ArrayBegin => self.open_container(State::ArrayValue),
            Token::ObjectBegin => self.open_container(State::ObjectKey),
            token @ (Token::ArrayEnd | Token::ObjectEnd) => self.fail(token),
        }
    }

    fn push_string(&mut self, slice: StrSlice<'a>) -> u32 {
        self.strings.push(slice);
        (self.strings.len() - 1) as u32
    }

    fn push_value(&mut self, raw: RawValue) {
        self.values.push(raw);
        self.record_child((self.values.len() - 1) as u32);
    }

    /// Records a completed value in the enclosing container, if any.
    fn record_child(&mut self, index: u32) {
        if let Some(context) = self.stack.last_mut() {
            context.children.push(index);
            if context.state == State::ObjectValue {
                context.state = State::ObjectKey;
            }
        }
    }

    fn open_container(&mut self, state: State) {
        let children = self.pool.pop().unwrap_or_default();
        self.stack.push(Context { state, children });
    }

    fn close_array(&mut self) {
        let Some(context) = self.stack.pop() else {
            return;
        };
        let offset = self.indexes.len() as u32;
        let len = context.children.len() as u32;
        self.values.push(RawValue::Array { offset, len });
        self.indexes.extend_from_slice(&context.children);
        self.recycle(context.children);
        self.record_child((self.values.len() - 1) as u32);
    }

    fn close_object(&mut self) {
        let Some(context) = self.stack.pop() else {
            return;
        };
        debug_assert!(context.children.len() % 2 == 0);
        let offset = self.indexes.len() as u32;
        let len = (context.children.len() / 2) as u32;
        self.values.push(RawValue::Object { offset, len });
        self.indexes.extend_from_slice(&context.children);
        self.recycle(context.children);
        self.record_child((self.values.len() - 1) as u32);
    }

    fn recycle(&mut self, mut children: Vec<u32>) {
        children.clear();
        if self.pool.len() < POOL_LIMIT {
            self.pool.push(children);
        }
    }

    fn fail(&mut self, token: Token<'a>) {
        self.error = Some(ParseError::UnexpectedToken(token.kind()));
        self.state = State::Error;
        while let Some(context) = self.stack.pop() {
            self.recycle(context.children);
        }
    }

    // --------------------------------------------------------------------
    // Arena access for `Value` handles
    // --------------------------------------------------------------------

    pub(crate) fn raw_at(&self, index: u32) -> RawValue {
        self.values[index as usize]
    }

    pub(crate) fn index_at(&self, slot: u32) -> u32 {
        self.indexes[slot as usize]
    }

    pub(crate) fn string_at(&self, index: u32) -> &str {
        self.strings[index as usize].resolve(&self.owned)
    }
}
