//! Id Lookup Example
//!
//! Loads a connection list from a fixed file, looks up an element by its
//! `id` attribute, and prints the attribute pairs of its `tag` descendants.
//!
//! Run with `RUST_LOG=debug` to see the loader diagnostics.
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use xmldoc::Document;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let document = match Document::from_file("demos/conn.xml") {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let Some(element) = document.get_element_by_id("yahoo") else {
        eprintln!("no element with id `yahoo`");
        return ExitCode::FAILURE;
    };

    for tag in element.elements_by_name("tag") {
        let id = tag.attribute("id").unwrap_or("-");
        let value = tag.attribute("value").unwrap_or("-");
        println!("{id} = {value}");
    }

    ExitCode::SUCCESS
}
