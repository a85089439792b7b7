//! Comparing sequences as multisets.
//!
//! Run with: cargo run --example ignore_order

use serde_deepdiff::{value, DeepDiff, DiffOptions, Value};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let old = value!({
        "servers": [
            {"host": "a.example.com", "port": 80},
            {"host": "b.example.com", "port": 443}
        ],
        "tags": ["web", "prod", "prod"]
    });
    let new = value!({
        "servers": [
            {"host": "b.example.com", "port": 8443},
            {"host": "a.example.com", "port": 80}
        ],
        "tags": ["prod", "web", "eu"]
    });

    // Positional comparison sees every element as changed
    let ordered = DeepDiff::new(old.clone(), new.clone());
    println!("Ordered: {} changes", ordered.report().len());

    // Order-insensitive comparison pairs the closest elements
    let unordered = DeepDiff::with_options(old, new, DiffOptions::new().ignore_order(true))?;
    println!("Unordered: {} changes", unordered.report().len());
    println!("{}\n", unordered.to_dict());

    // Sets are always compared without regard to order
    let sets = DeepDiff::new(
        Value::set(vec![value!("x"), value!("y")]),
        Value::set(vec![value!("y"), value!("x")]),
    );
    assert!(sets.is_empty());
    println!("✓ Sets with the same members are equal");

    Ok(())
}
