//! Basic properties serialization and deserialization.
//!
//! Run with: cargo run --example simple

use serde::{Deserialize, Serialize};
use serde_properties::{from_str, to_string};
use std::error::Error;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Listener {
    host: String,
    port: u16,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Server {
    name: String,
    listeners: Vec<Listener>,
    debug: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let server = Server {
        name: "gateway".to_string(),
        listeners: vec![
            Listener {
                host: "0.0.0.0".to_string(),
                port: 80,
            },
            Listener {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
        ],
        debug: false,
    };

    let text = to_string(&server)?;
    println!("Properties output:\n{}", text);

    let server_back: Server = from_str(&text)?;
    assert_eq!(server, server_back);
    println!("✓ Round-trip successful\n");

    // Hand-written input: comments, either separator, any order, gaps.
    let input = "\
# edge node
debug: yes
listeners[1].port = 9090
name = edge
";
    let edge: Server = from_str(input)?;
    println!("Parsed from text:\n{:#?}", edge);

    Ok(())
}
