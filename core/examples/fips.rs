//! Pull census block codes out of an FCC block API response.
//!
//! The API answers in one of two shapes: a single block, or (for points on a
//! block boundary) a list of intersecting blocks. A `Switch` picks the shape
//! and captures the interesting parts in one pass.
//!
//! Run with: cargo run -p destructure-core --example fips --features json

use destructure::prelude::*;
use std::error::Error as StdError;

const SINGLE_BLOCK: &str = r#"{
    "Block": {"FIPS": "060750201001017"},
    "County": {"FIPS": "06075", "name": "San Francisco"},
    "State": {"FIPS": "06", "code": "CA", "name": "California"},
    "executionTime": "0",
    "status": "OK"
}"#;

const BOUNDARY: &str = r#"{
    "Block": {
        "FIPS": "060750201001017",
        "intersection": [{"FIPS": "060750201001017"}, {"FIPS": "060750201001018"}]
    },
    "County": {"FIPS": "06075", "name": "San Francisco"},
    "State": {"FIPS": "06", "code": "CA", "name": "California"},
    "executionTime": "0",
    "messages": ["FCC0001: The coordinate lies on the boundary of multiple blocks"],
    "status": "OK"
}"#;

fn schemas(results: &BindingSet) -> [Schema; 2] {
    let state = || {
        Schema::map()
            .entry("name", results.var("state"))
            .entry("code", Type::Text)
            .entry("FIPS", Type::Text)
    };
    let county = || {
        Schema::map()
            .entry("FIPS", Type::Text)
            .entry("name", results.var("county"))
    };

    let single = Schema::map()
        .entry("County", county())
        .entry("State", state())
        .entry("Block", Schema::map().entry("FIPS", results.var("fips")))
        .entry("executionTime", Type::Text)
        .entry("status", "OK");

    let intersection = Schema::map()
        .entry("County", county())
        .entry("State", state())
        .entry(
            "Block",
            Schema::map()
                .entry("FIPS", Type::Text)
                .entry("intersection", results.var("intersection")),
        )
        .entry("messages", Schema::list([Type::Text.into()]))
        .entry("executionTime", Type::Text)
        .entry("status", "OK");

    [single.into(), intersection.into()]
}

fn block_codes(response: &str) -> Result<Vec<String>, Box<dyn StdError>> {
    let results = BindingSet::new();
    let switch = Switch::new(Value::from_json(response)?, results.clone());

    let codes = match switch.select(&schemas(&results))? {
        Some(0) => vec![results.value("fips")],
        Some(_) => results
            .value("intersection")
            .and_then(|blocks| match blocks {
                Value::List(blocks) => Some(blocks),
                _ => None,
            })
            .unwrap_or_default()
            .iter()
            .map(|block| block.get("FIPS").cloned())
            .collect(),
        None => return Err("could not match any schema".into()),
    };

    let location = format!(
        "{:?}, {:?}",
        results.value("county").unwrap_or(Value::Null),
        results.value("state").unwrap_or(Value::Null)
    );
    tracing::info!(%location, blocks = codes.len(), "matched response");

    codes
        .into_iter()
        .map(|code| match code {
            Some(Value::Text(code)) => Ok(code),
            other => Err(format!("no FIPS code in {other:?}").into()),
        })
        .collect()
}

fn main() -> Result<(), Box<dyn StdError>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    for response in [SINGLE_BLOCK, BOUNDARY] {
        for code in block_codes(response)? {
            println!("{code}");
        }
    }
    Ok(())
}
