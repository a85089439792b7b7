//! Numeric tolerances and type groups.
//!
//! Run with: cargo run --example tolerances

use serde_deepdiff::{value, DeepDiff, DiffOptions, TypeTag};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let measured = value!({"temperature": 21.4996, "pressure": 1013.2, "count": 3});
    let expected = value!({"temperature": 21.5, "pressure": 1013.9, "count": 3.0});

    let cases = [
        ("exact", DiffOptions::new()),
        ("significant_digits(3)", DiffOptions::new().significant_digits(3)),
        ("math_epsilon(0.001)", DiffOptions::new().math_epsilon(0.001)),
        ("atol(0.01).rtol(0.001)", DiffOptions::new().atol(0.01).rtol(0.001)),
        (
            "ignore_numeric_type_changes",
            DiffOptions::new().ignore_numeric_type_changes(true),
        ),
    ];

    for (name, options) in cases {
        let result = DeepDiff::with_options(measured.clone(), expected.clone(), options)?;
        let paths: Vec<&str> = result.report().iter().map(|r| r.path.as_str()).collect();
        println!("{:<28} {:?}", name, paths);
    }

    // Values of grouped types are reported as value changes, not type changes
    let flags_before = value!({"enabled": true});
    let flags_after = value!({"enabled": "true"});

    let strict = DeepDiff::new(flags_before.clone(), flags_after.clone());
    println!("\nWithout groups: {}", strict.to_dict());

    let grouped = DeepDiff::with_options(
        flags_before,
        flags_after,
        DiffOptions::new().ignore_type_in_groups([[TypeTag::BOOL, TypeTag::STR]]),
    )?;
    println!("With groups:    {}", grouped.to_dict());

    // Invalid options are rejected before anything is compared
    let err = DeepDiff::with_options(value!(1), value!(2), DiffOptions::new().atol(-1.0))
        .unwrap_err();
    println!("\nRejected: {}", err);

    Ok(())
}
