//! Customizing parsing and output with Options.
//!
//! Run with: cargo run --example custom_options

use serde::{Deserialize, Serialize};
use serde_properties::{
    from_str_with_options, to_string_with_options, Delimiter, ListFormat, MissingFields, Options,
};
use std::error::Error;

#[derive(Debug, Serialize, Deserialize)]
struct Config {
    name: String,
    #[serde(default)]
    hosts: Vec<String>,
    #[serde(default = "default_retries")]
    retries: u32,
}

fn default_retries() -> u32 {
    3
}

fn main() -> Result<(), Box<dyn Error>> {
    let config = Config {
        name: "MyApp".to_string(),
        hosts: vec!["a.example.com".to_string(), "b.example.com".to_string()],
        retries: 5,
    };

    // Default format (indexed lists)
    println!("Indexed lists:");
    let default = serde_properties::to_string(&config)?;
    println!("{}", default);

    // Inline lists joined with a delimiter
    println!("Inline lists (pipe):");
    let pipe_options = Options::new().with_list_format(ListFormat::Inline(Delimiter::Pipe));
    let pipe_format = to_string_with_options(&config, pipe_options.clone())?;
    println!("{}", pipe_format);

    let back: Config = from_str_with_options(&pipe_format, pipe_options)?;
    println!("Read back: {:?}\n", back);

    // Semicolon comments, `=` only, serde defaults for missing fields
    let input = "; legacy file\nname = Legacy\nurl: ignored\n";
    let options = Options::new()
        .with_comment_markers(&[';'])
        .with_separators(&['='])
        .with_missing_fields(MissingFields::Skip);
    let legacy: Config = from_str_with_options(input, options)?;
    println!("Legacy config: {:?}", legacy);

    // Strict mode rejects lines no field consumed
    let strict = Options::strict();
    match from_str_with_options::<Config>("name=x\nnmae=y\n", strict) {
        Ok(_) => println!("unexpected success"),
        Err(e) => println!("Strict mode: {}", e),
    }

    Ok(())
}
