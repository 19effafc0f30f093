//! Value handles over the parser's flat arenas.
//!
//! A [`Value`] is a lightweight handle: one tagged cell plus a reference to
//! the [`Parser`] that owns the storage it points into. Child access,
//! iteration, and key lookups all resolve through the parser's `indexes` and
//! `strings` tables; nothing is materialized until asked for.

use core::fmt;

use alloc::string::String;

use crate::{
    error::ValueError,
    generator::{Generator, GeneratorOptions},
    parser::Parser,
};

/// The discriminator of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Null,
    Bool,
    Long,
    Double,
    Str,
    Array,
    Object,
}

/// Compact value cell as stored in the parser's `values` arena.
///
/// Same cell shape as a raw token: one tag plus eight payload bytes. String
/// cells index the parser's `strings` table; container cells describe a run
/// of entries in the `indexes` table — `len` entries for arrays, `2 * len`
/// alternating (string, value) entries for objects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum RawValue {
    Null,
    Bool(bool),
    Long(i64),
    Double(f64),
    Str { index: u32 },
    Array { offset: u32, len: u32 },
    Object { offset: u32, len: u32 },
}

impl RawValue {
    pub(crate) fn kind(&self) -> ValueKind {
        match self {
            RawValue::Null => ValueKind::Null,
            RawValue::Bool(_) => ValueKind::Bool,
            RawValue::Long(_) => ValueKind::Long,
            RawValue::Double(_) => ValueKind::Double,
            RawValue::Str { .. } => ValueKind::Str,
            RawValue::Array { .. } => ValueKind::Array,
            RawValue::Object { .. } => ValueKind::Object,
        }
    }
}

/// A node of a parsed document.
///
/// Handles stay valid for the lifetime of the parser; string extraction
/// additionally resolves through whichever buffer currently backs the string
/// table (the tokenizer's, or the parser's own after
/// [`copy_strings`](Parser::copy_strings)).
///
/// # Examples
///
/// ```rust
/// use jsonflat::{Parser, Tokenizer, ValueKind};
///
/// let mut tokenizer = Tokenizer::new();
/// tokenizer.feed_str(r#"{"name":"ada","scores":[1,2]}"#);
/// let mut parser = Parser::new();
/// parser.parse(&tokenizer).unwrap();
///
/// let root = parser.last_parsed_root().unwrap();
/// assert_eq!(root.kind(), ValueKind::Object);
/// let scores = root.get(1).unwrap();
/// assert_eq!(scores.iter().unwrap().count(), 2);
/// ```
#[derive(Clone, Copy)]
pub struct Value<'p, 'a> {
    raw: RawValue,
    parser: &'p Parser<'a>,
}

impl<'p, 'a> Value<'p, 'a> {
    pub(crate) fn new(raw: RawValue, parser: &'p Parser<'a>) -> Self {
        Self { raw, parser }
    }

    /// Returns the value's discriminator.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        self.raw.kind()
    }

    /// Returns `true` if the value is [`ValueKind::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self.raw, RawValue::Null)
    }

    /// Returns `true` if the value is a boolean.
    #[must_use]
    pub fn is_bool(&self) -> bool {
        matches!(self.raw, RawValue::Bool(_))
    }

    /// Returns `true` if the value is a `Long` or a `Double`.
    #[must_use]
    pub fn is_number(&self) -> bool {
        matches!(self.raw, RawValue::Long(_) | RawValue::Double(_))
    }

    /// Returns `true` if the value is a string.
    #[must_use]
    pub fn is_str(&self) -> bool {
        matches!(self.raw, RawValue::Str { .. })
    }

    /// Returns `true` if the value is an array.
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self.raw, RawValue::Array { .. })
    }

    /// Returns `true` if the value is an object.
    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self.raw, RawValue::Object { .. })
    }

    /// Extracts a boolean.
    ///
    /// # Errors
    ///
    /// [`ValueError::InvalidCast`] when the value is not a boolean.
    pub fn as_bool(&self) -> Result<bool, ValueError> {
        match self.raw {
            RawValue::Bool(value) => Ok(value),
            _ => Err(self.cast_error(ValueKind::Bool)),
        }
    }

    /// Extracts a 64-bit integer.
    ///
    /// # Errors
    ///
    /// [`ValueError::InvalidCast`] when the value is not a `Long`; a
    /// `Double` is not narrowed.
    pub fn as_long(&self) -> Result<i64, ValueError> {
        match self.raw {
            RawValue::Long(value) => Ok(value),
            _ => Err(self.cast_error(ValueKind::Long)),
        }
    }

    /// Extracts a 64-bit float. A `Long` widens losslessly.
    ///
    /// # Errors
    ///
    /// [`ValueError::InvalidCast`] for any non-numeric value.
    pub fn as_double(&self) -> Result<f64, ValueError> {
        match self.raw {
            RawValue::Double(value) => Ok(value),
            RawValue::Long(value) => Ok(value as f64),
            _ => Err(self.cast_error(ValueKind::Double)),
        }
    }

    /// Extracts a string as a borrowed view; copy with `to_owned` if needed.
    ///
    /// # Errors
    ///
    /// [`ValueError::InvalidCast`] when the value is not a string.
    pub fn as_str(&self) -> Result<&'p str, ValueError> {
        match self.raw {
            RawValue::Str { index } => Ok(self.parser.string_at(index)),
            _ => Err(self.cast_error(ValueKind::Str)),
        }
    }

    /// Number of elements of an array, or pairs of an object.
    ///
    /// # Errors
    ///
    /// [`ValueError::InvalidCast`] for non-containers.
    pub fn count(&self) -> Result<usize, ValueError> {
        match self.raw {
            RawValue::Array { len, .. } | RawValue::Object { len, .. } => Ok(len as usize),
            _ => Err(self.cast_error(ValueKind::Array)),
        }
    }

    /// Positional access: the `index`-th element of an array, or the
    /// `index`-th *value* (not key) of an object.
    ///
    /// # Errors
    ///
    /// [`ValueError::OutOfBounds`] past the end;
    /// [`ValueError::InvalidCast`] for non-containers.
    pub fn get(&self, index: usize) -> Result<Value<'p, 'a>, ValueError> {
        match self.raw {
            RawValue::Array { offset, len } => {
                if index >= len as usize {
                    return Err(ValueError::OutOfBounds {
                        index,
                        len: len as usize,
                    });
                }
                Ok(self.at_slot(offset + index as u32))
            }
            RawValue::Object { offset, len } => {
                if index >= len as usize {
                    return Err(ValueError::OutOfBounds {
                        index,
                        len: len as usize,
                    });
                }
                Ok(self.at_slot(offset + 2 * index as u32 + 1))
            }
            _ => Err(self.cast_error(ValueKind::Array)),
        }
    }

    /// Iterates the child values of an array or object, in insertion order.
    ///
    /// # Errors
    ///
    /// [`ValueError::InvalidCast`] for non-containers.
    pub fn iter(&self) -> Result<Values<'p, 'a>, ValueError> {
        match self.raw {
            RawValue::Array { offset, len } => Ok(Values {
                parser: self.parser,
                slot: offset,
                step: 1,
                remaining: len,
            }),
            RawValue::Object { offset, len } => Ok(Values {
                parser: self.parser,
                slot: offset + 1,
                step: 2,
                remaining: len,
            }),
            _ => Err(self.cast_error(ValueKind::Array)),
        }
    }

    /// Iterates an object's keys as slices, in insertion order.
    ///
    /// # Errors
    ///
    /// [`ValueError::InvalidCast`] for non-objects.
    pub fn keys(&self) -> Result<Keys<'p, 'a>, ValueError> {
        match self.raw {
            RawValue::Object { offset, len } => Ok(Keys {
                parser: self.parser,
                slot: offset,
                remaining: len,
            }),
            _ => Err(self.cast_error(ValueKind::Object)),
        }
    }

    /// Iterates an object's `(key, value)` pairs, in insertion order.
    ///
    /// # Errors
    ///
    /// [`ValueError::InvalidCast`] for non-objects.
    pub fn entries(&self) -> Result<Entries<'p, 'a>, ValueError> {
        match self.raw {
            RawValue::Object { offset, len } => Ok(Entries {
                parser: self.parser,
                slot: offset,
                remaining: len,
            }),
            _ => Err(self.cast_error(ValueKind::Object)),
        }
    }

    /// Renders the subtree as compact JSON.
    #[must_use]
    pub fn to_json(&self) -> String {
        let mut generator = Generator::new();
        let rendered = generator.value(self);
        debug_assert!(rendered.is_ok());
        generator.into_string()
    }

    fn cast_error(&self, requested: ValueKind) -> ValueError {
        ValueError::InvalidCast {
            requested,
            actual: self.kind(),
        }
    }

    fn at_slot(&self, slot: u32) -> Value<'p, 'a> {
        let value_index = self.parser.index_at(slot);
        Value::new(self.parser.raw_at(value_index), self.parser)
    }
}

/// Structural equality: same kind, same scalar payloads, same children in
/// the same order. `Long` and `Double` never compare equal across kinds.
impl PartialEq for Value<'_, '_> {
    fn eq(&self, other: &Self) -> bool {
        match (self.raw, other.raw) {
            (RawValue::Null, RawValue::Null) => true,
            (RawValue::Bool(a), RawValue::Bool(b)) => a == b,
            (RawValue::Long(a), RawValue::Long(b)) => a == b,
            (RawValue::Double(a), RawValue::Double(b)) => a == b,
            (RawValue::Str { .. }, RawValue::Str { .. }) => self.as_str().ok() == other.as_str().ok(),
            (RawValue::Array { .. }, RawValue::Array { .. }) => {
                match (self.iter(), other.iter()) {
                    (Ok(a), Ok(b)) => a.len() == b.len() && a.zip(b).all(|(x, y)| x == y),
                    _ => false,
                }
            }
            (RawValue::Object { .. }, RawValue::Object { .. }) => {
                match (self.entries(), other.entries()) {
                    (Ok(a), Ok(b)) => {
                        a.len() == b.len()
                            && a.zip(b).all(|((ka, va), (kb, vb))| ka == kb && va == vb)
                    }
                    _ => false,
                }
            }
            _ => false,
        }
    }
}

impl fmt::Debug for Value<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.raw {
            RawValue::Null => f.write_str("Null"),
            RawValue::Bool(value) => write!(f, "Bool({value})"),
            RawValue::Long(value) => write!(f, "Long({value})"),
            RawValue::Double(value) => write!(f, "Double({value})"),
            RawValue::Str { index } => write!(f, "Str({:?})", self.parser.string_at(index)),
            RawValue::Array { len, .. } => write!(f, "Array(len={len})"),
            RawValue::Object { len, .. } => write!(f, "Object(len={len})"),
        }
    }
}

/// Pretty-prints the subtree with the default four-space indent.
impl fmt::Display for Value<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut generator = Generator::with_options(GeneratorOptions {
            pretty: true,
            ..GeneratorOptions::default()
        });
        generator.value(self).map_err(|_| fmt::Error)?;
        f.write_str(generator.as_str())
    }
}

/// Iterator over the child values of a container.
#[derive(Debug, Clone)]
pub struct Values<'p, 'a> {
    parser: &'p Parser<'a>,
    slot: u32,
    step: u32,
    remaining: u32,
}

impl<'p, 'a> Iterator for Values<'p, 'a> {
    type Item = Value<'p, 'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let value_index = self.parser.index_at(self.slot);
        self.slot += self.step;
        self.remaining -= 1;
        Some(Value::new(self.parser.raw_at(value_index), self.parser))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining as usize, Some(self.remaining as usize))
    }
}

impl ExactSizeIterator for Values<'_, '_> {}

/// Iterator over an object's keys.
#[derive(Debug, Clone)]
pub struct Keys<'p, 'a> {
    parser: &'p Parser<'a>,
    slot: u32,
    remaining: u32,
}

impl<'p> Iterator for Keys<'p, '_> {
    type Item = &'p str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let string_index = self.parser.index_at(self.slot);
        self.slot += 2;
        self.remaining -= 1;
        Some(self.parser.string_at(string_index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining as usize, Some(self.remaining as usize))
    }
}

impl ExactSizeIterator for Keys<'_, '_> {}

/// Iterator over an object's `(key, value)` pairs.
#[derive(Debug, Clone)]
pub struct Entries<'p, 'a> {
    parser: &'p Parser<'a>,
    slot: u32,
    remaining: u32,
}

impl<'p, 'a> Iterator for Entries<'p, 'a> {
    type Item = (&'p str, Value<'p, 'a>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let key = self.parser.string_at(self.parser.index_at(self.slot));
        let value_index = self.parser.index_at(self.slot + 1);
        self.slot += 2;
        self.remaining -= 1;
        Some((key, Value::new(self.parser.raw_at(value_index), self.parser)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining as usize, Some(self.remaining as usize))
    }
}

impl ExactSizeIterator for Entries<'_, '_> {}
