//! Feed a document through the tokenizer and parser, then print it back.

use jsonflat::{Generator, GeneratorOptions, Parser, Tokenizer};

fn main() {
    let text = r#"{"name":"jsonflat","versions":[1,2.5],"streaming":true,"notes":null}"#;

    let mut tokenizer = Tokenizer::new();
    tokenizer.feed_str(text);
    tokenizer.finish();

    let mut parser = Parser::new();
    parser.parse(&tokenizer).expect("valid document");
    let root = parser.last_parsed_root().expect("parse finished");

    println!("kind: {:?}, members: {}", root.kind(), root.count().unwrap());
    for (key, value) in root.entries().unwrap() {
        println!("  {key}: {value:?}");
    }

    let mut pretty = Generator::with_options(GeneratorOptions {
        pretty: true,
        ..GeneratorOptions::default()
    });
    pretty.value(&root).unwrap();
    println!("{}", pretty.as_str());
}
