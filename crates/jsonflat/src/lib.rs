//! A streaming, push-driven JSON engine.
//!
//! The crate is built around two state machines and their inverse:
//!
//! - [`Tokenizer`] consumes characters one at a time and emits a validated
//!   stream of JSON tokens, accumulating string contents in a single growable
//!   buffer that emitted tokens borrow from.
//! - [`Parser`] consumes tokens and builds a flat tree: all values live in
//!   one contiguous array of small tagged cells, with container children
//!   described by offset/length ranges into a side index table. No per-node
//!   heap allocation takes place.
//! - [`Generator`] accepts typed emit calls and produces well-formed JSON
//!   text, compact or pretty-printed.
//!
//! # Examples
//!
//! ```rust
//! use jsonflat::{Parser, Tokenizer};
//!
//! let mut tokenizer = Tokenizer::new();
//! tokenizer.feed_str(r#"{"k":[1,2,3]}"#);
//! assert!(tokenizer.is_done());
//!
//! let mut parser = Parser::new();
//! parser.parse(&tokenizer).unwrap();
//!
//! let root = parser.last_parsed_root().unwrap();
//! assert_eq!(root.count().unwrap(), 1);
//! assert_eq!(root.get(0).unwrap().count().unwrap(), 3);
//! assert_eq!(root.to_json(), r#"{"k":[1,2,3]}"#);
//! ```
#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod error;
mod escape_buffer;
mod generator;
mod parser;
mod slice;
mod token;
mod tokenizer;
mod value;

pub use error::{GeneratorError, ParseError, TokenizeError, TokenizeReason, ValueError};
pub use generator::{Generator, GeneratorOptions, ToJson};
pub use parser::Parser;
pub use token::{Token, TokenKind};
pub use tokenizer::{Tokenizer, Tokens};
pub use value::{Entries, Keys, Value, ValueKind, Values};
