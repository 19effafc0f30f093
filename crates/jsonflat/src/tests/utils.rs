use alloc::{string::String, vec::Vec};

use crate::{Generator, GeneratorError, GeneratorOptions, Parser, Tokenizer, Value, ValueKind};

/// A plainly-owned JSON tree used to drive the engine from tests.
///
/// Objects are pair lists rather than maps so that insertion order and
/// duplicate keys survive the trip.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TestDoc {
    Null,
    Bool(bool),
    Long(i64),
    Double(f64),
    Str(String),
    Array(Vec<TestDoc>),
    Object(Vec<(String, TestDoc)>),
}

impl TestDoc {
    pub(crate) fn render(&self, generator: &mut Generator) -> Result<(), GeneratorError> {
        match self {
            TestDoc::Null => generator.null(),
            TestDoc::Bool(value) => generator.bool(*value),
            TestDoc::Long(value) => generator.long(*value),
            TestDoc::Double(value) => generator.double(*value),
            TestDoc::Str(value) => generator.string(value),
            TestDoc::Array(items) => {
                generator.array_begin()?;
                for item in items {
                    item.render(generator)?;
                }
                generator.array_end()
            }
            TestDoc::Object(pairs) => {
                generator.object_begin()?;
                for (key, value) in pairs {
                    generator.string(key)?;
                    value.render(generator)?;
                }
                generator.object_end()
            }
        }
    }

    pub(crate) fn to_compact(&self) -> String {
        let mut generator = Generator::new();
        self.render(&mut generator).expect("compact render");
        generator.into_string()
    }

    pub(crate) fn to_pretty(&self) -> String {
        let mut generator = Generator::with_options(GeneratorOptions {
            pretty: true,
            ..GeneratorOptions::default()
        });
        self.render(&mut generator).expect("pretty render");
        generator.into_string()
    }

    /// Structural comparison against a parsed value.
    pub(crate) fn matches(&self, value: &Value<'_, '_>) -> bool {
        match self {
            TestDoc::Null => value.is_null(),
            TestDoc::Bool(expected) => value.as_bool() == Ok(*expected),
            TestDoc::Long(expected) => value.as_long() == Ok(*expected),
            TestDoc::Double(expected) => {
                value.kind() == ValueKind::Double && value.as_double() == Ok(*expected)
            }
            TestDoc::Str(expected) => value.as_str() == Ok(expected.as_str()),
            TestDoc::Array(items) => {
                let Ok(children) = value.iter() else {
                    return false;
                };
                value.count() == Ok(items.len())
                    && items
                        .iter()
                        .zip(children)
                        .all(|(item, child)| item.matches(&child))
            }
            TestDoc::Object(pairs) => {
                let Ok(entries) = value.entries() else {
                    return false;
                };
                value.count() == Ok(pairs.len())
                    && pairs
                        .iter()
                        .zip(entries)
                        .all(|((key, item), (entry_key, child))| {
                            key == entry_key && item.matches(&child)
                        })
            }
        }
    }
}

/// Feeds `text` to a fresh tokenizer and marks the end of input.
pub(crate) fn tokenize(text: &str) -> Tokenizer {
    let mut tokenizer = Tokenizer::new();
    tokenizer.feed_str(text);
    tokenizer.finish();
    tokenizer
}

/// Runs the parser over a tokenized document, asserting success.
pub(crate) fn parse_into<'a>(parser: &mut Parser<'a>, tokenizer: &'a Tokenizer) {
    parser
        .parse(tokenizer)
        .expect("document should parse cleanly");
}

/// Removes every space, tab, and newline that is not inside a string
/// literal: the compact projection of pretty-printed text.
pub(crate) fn strip_interstitial_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;
    for c in text.chars() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
        } else {
            match c {
                ' ' | '\t' | '\n' => {}
                '"' => {
                    in_string = true;
                    out.push(c);
                }
                c => out.push(c),
            }
        }
    }
    out
}
