//! End-to-end pipeline scenarios: characters in, tree out, text back.

use alloc::string::String;
use alloc::vec::Vec;

use super::utils::{parse_into, tokenize};
use crate::{
    Generator, GeneratorOptions, ParseError, Parser, TokenizeReason, ValueKind,
};

#[test]
fn object_holding_an_array() {
    let tokenizer = tokenize(r#"{"k":[1,2,3]}"#);
    let mut parser = Parser::new();
    parse_into(&mut parser, &tokenizer);

    let root = parser.last_parsed_root().unwrap();
    assert_eq!(root.kind(), ValueKind::Object);
    assert_eq!(root.count().unwrap(), 1);
    assert_eq!(root.keys().unwrap().collect::<Vec<_>>(), ["k"]);

    let array = root.get(0).unwrap();
    assert_eq!(array.count().unwrap(), 3);
    for (index, expected) in [1, 2, 3].into_iter().enumerate() {
        assert_eq!(array.get(index).unwrap().as_long().unwrap(), expected);
    }

    assert_eq!(root.to_json(), r#"{"k":[1,2,3]}"#);
}

#[test]
fn array_of_keyword_literals() {
    let tokenizer = tokenize("[true,false,null]");
    let mut parser = Parser::new();
    parse_into(&mut parser, &tokenizer);

    let root = parser.last_parsed_root().unwrap();
    assert_eq!(root.count().unwrap(), 3);
    assert_eq!(root.get(0).unwrap().as_bool().unwrap(), true);
    assert_eq!(root.get(1).unwrap().as_bool().unwrap(), false);
    assert!(root.get(2).unwrap().is_null());

    assert_eq!(root.to_json(), "[true,false,null]");
}

#[test]
fn escaped_string_decodes_to_its_code_points() {
    let tokenizer = tokenize(r#""test\u20ACas\t\tdf""#);
    let mut parser = Parser::new();
    parse_into(&mut parser, &tokenizer);

    let root = parser.last_parsed_root().unwrap();
    assert_eq!(root.as_str().unwrap(), "test\u{20AC}as\t\tdf");
    let units: Vec<char> = root.as_str().unwrap().chars().collect();
    assert_eq!(
        units,
        ['t', 'e', 's', 't', '\u{20AC}', 'a', 's', '\t', '\t', 'd', 'f']
    );
}

#[test]
fn empty_object_pretty_prints_without_interior_whitespace() {
    let tokenizer = tokenize("{}");
    let mut parser = Parser::new();
    parse_into(&mut parser, &tokenizer);

    let root = parser.last_parsed_root().unwrap();
    assert_eq!(root.count().unwrap(), 0);

    let mut generator = Generator::with_options(GeneratorOptions {
        pretty: true,
        ..GeneratorOptions::default()
    });
    generator.value(&root).unwrap();
    assert_eq!(generator.into_string(), "{}");
}

#[test]
fn bare_number_roots() {
    let tokenizer = tokenize("-123");
    let mut parser = Parser::new();
    parse_into(&mut parser, &tokenizer);
    assert_eq!(parser.last_parsed_root().unwrap().as_long().unwrap(), -123);

    let tokenizer = tokenize("453.234");
    let mut parser = Parser::new();
    parse_into(&mut parser, &tokenizer);
    assert_eq!(
        parser.last_parsed_root().unwrap().as_double().unwrap(),
        453.234
    );

    let tokenizer = tokenize("1.0e1");
    let mut parser = Parser::new();
    parse_into(&mut parser, &tokenizer);
    assert_eq!(
        parser.last_parsed_root().unwrap().as_double().unwrap(),
        10.0
    );
}

#[test]
fn missing_object_value_surfaces_the_tokenizer_error() {
    let tokenizer = tokenize(r#"{"k":}"#);
    assert!(tokenizer.is_failed());
    assert_eq!(
        tokenizer.error().map(|e| e.reason),
        Some(TokenizeReason::ExpectedValue)
    );

    let mut parser = Parser::new();
    let error = parser.parse(&tokenizer).unwrap_err();
    assert!(matches!(error, ParseError::Tokenize(_)));
    assert_eq!(parser.last_parsed_root().unwrap_err(), ParseError::NotDone);
}

#[test]
fn token_stream_replays_through_the_generator() {
    let text = r#"{"name":"ada","tags":["a","b"],"age":36,"score":2.5,"ok":true,"gone":null}"#;
    let tokenizer = tokenize(text);
    assert!(tokenizer.is_done());

    let mut generator = Generator::new();
    for token in tokenizer.tokens() {
        generator.token(token).unwrap();
    }
    assert!(generator.is_done());
    assert_eq!(generator.into_string(), text);
}

#[test]
fn display_pretty_prints() {
    let tokenizer = tokenize(r#"{"k":[1,2]}"#);
    let mut parser = Parser::new();
    parse_into(&mut parser, &tokenizer);
    let root = parser.last_parsed_root().unwrap();
    assert_eq!(
        alloc::format!("{root}"),
        "{\n    \"k\": [\n        1,\n        2\n    ]\n}"
    );
}

#[test]
fn arenas_serve_many_documents() {
    let first = tokenize(r#"{"a":1}"#);
    let second = tokenize(r#"[2,3]"#);

    let mut parser = Parser::new();
    parse_into(&mut parser, &first);
    parser.copy_strings();
    parser.reset();

    parse_into(&mut parser, &second);
    let root = parser.last_parsed_root().unwrap();
    assert_eq!(root.kind(), ValueKind::Array);
    assert_eq!(root.to_json(), "[2,3]");
}

#[test]
fn whitespace_heavy_document() {
    let text = "\t{ \"a\" :\u{0B} [ 1 ,\u{0C} 2 ] ,\r\n\"b\" : { } }\n";
    let tokenizer = tokenize(text);
    assert!(tokenizer.is_done());
    let mut parser = Parser::new();
    parse_into(&mut parser, &tokenizer);
    assert_eq!(
        parser.last_parsed_root().unwrap().to_json(),
        r#"{"a":[1,2],"b":{}}"#
    );
}

#[test]
fn string_values_survive_copy_strings() {
    let tokenizer = tokenize(r#"{"greeting":"hello","farewell":"bye"}"#);
    let mut parser = Parser::new();
    parse_into(&mut parser, &tokenizer);
    parser.copy_strings();

    let root = parser.last_parsed_root().unwrap();
    let collected: Vec<(String, String)> = root
        .entries()
        .unwrap()
        .map(|(key, value)| (key.into(), value.as_str().unwrap().into()))
        .collect();
    assert_eq!(
        collected,
        [
            (String::from("greeting"), String::from("hello")),
            (String::from("farewell"), String::from("bye")),
        ]
    );
}
