use jsonflat::{Generator, GeneratorOptions, Parser, Tokenizer};

fn parse_and_render(text: &str, pretty: bool) -> String {
    let mut tokenizer = Tokenizer::new();
    tokenizer.feed_str(text);
    tokenizer.finish();
    assert!(tokenizer.is_done(), "input must tokenize: {text:?}");

    let mut parser = Parser::new();
    parser.parse(&tokenizer).expect("input must parse");
    let root = parser.last_parsed_root().expect("root must exist");

    let mut generator = Generator::with_options(GeneratorOptions {
        pretty,
        ..GeneratorOptions::default()
    });
    generator.value(&root).expect("rendering cannot fail");
    assert!(generator.is_done());
    generator.into_string()
}

#[test]
fn snapshot_pretty_composite_document() {
    let text = r#"{"name":"ada","tags":["a",{"deep":[]}],"age":36,"extra":null}"#;
    insta::assert_snapshot!(parse_and_render(text, true), @r#"
    {
        "name": "ada",
        "tags": [
            "a",
            {
                "deep": []
            }
        ],
        "age": 36,
        "extra": null
    }
    "#);
}

#[test]
fn snapshot_compact_is_the_identity_on_compact_input() {
    let text = r#"{"k":[1,2,3],"s":"x","b":false}"#;
    insta::assert_snapshot!(parse_and_render(text, false), @r#"{"k":[1,2,3],"s":"x","b":false}"#);
}

#[test]
fn snapshot_pretty_array_of_scalars() {
    insta::assert_snapshot!(parse_and_render("[1,2.5,\"x\",null]", true), @r#"
    [
        1,
        2.5,
        "x",
        null
    ]
    "#);
}

#[test]
fn snapshot_escapes_reencode() {
    let text = "\"a\\nb\\tc\\\"d\\\\e\\u0001f\"";
    insta::assert_snapshot!(parse_and_render(text, false), @r#""a\nb\tc\"d\\e\u0001f""#);
}
