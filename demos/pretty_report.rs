//! Rendering differences as a tree.
//!
//! Run with: cargo run --example pretty_report

use serde_deepdiff::{value, DeepDiff, PrettyOptions};

fn main() {
    let old = value!({
        "service": {
            "name": "billing",
            "replicas": 2,
            "ports": [80, 443, 8080, 9090],
            "env": {"LOG_LEVEL": "info", "REGION": "eu"}
        },
        "owner": "payments"
    });
    let new = value!({
        "service": {
            "name": "billing",
            "replicas": 3,
            "ports": [80, 443, 8081, 9090],
            "env": {"LOG_LEVEL": "debug", "REGION": "eu", "TRACE": "on"}
        },
        "owner": "payments"
    });
    let diff = DeepDiff::new(old, new);

    println!("Tree:\n{}\n", diff.pretty(PrettyOptions::new()));

    println!(
        "With context:\n{}\n",
        diff.pretty(PrettyOptions::new().no_color(true).context(1))
    );

    println!(
        "Compact:\n{}\n",
        diff.pretty(PrettyOptions::new().no_color(true).compact(true))
    );

    println!(
        "Limited depth:\n{}\n",
        diff.pretty(PrettyOptions::new().no_color(true).max_depth(1))
    );

    println!(
        "Path headers:\n{}",
        diff.pretty(PrettyOptions::new().no_color(true).path_header(true))
    );
}
