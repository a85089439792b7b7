//! Comparing two versions of a serde struct.
//!
//! Run with: cargo run --example simple

use serde::Serialize;
use serde_deepdiff::diff;
use std::error::Error;

#[derive(Debug, Serialize)]
struct User {
    id: u32,
    name: String,
    email: String,
    roles: Vec<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let before = User {
        id: 42,
        name: "Alice Johnson".to_string(),
        email: "alice@example.com".to_string(),
        roles: vec!["admin".to_string()],
    };
    let after = User {
        id: 42,
        name: "Alice Johnson".to_string(),
        email: "alice.johnson@example.com".to_string(),
        roles: vec!["admin".to_string(), "billing".to_string()],
    };

    let result = diff(&before, &after)?;
    println!("Changes found: {}\n", result.report().len());

    // The bucketed report, as JSON
    println!("Report:\n{}\n", serde_json::to_string_pretty(&result)?);

    // One line per change
    for record in result.report() {
        println!("{} -> {}", record.path, record.change.bucket());
    }

    assert!(diff(&before, &before)?.is_empty());
    println!("\n✓ Identical values produce an empty report");

    Ok(())
}
