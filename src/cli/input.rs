//! Loading key/value records from CSV or JSON files.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::group::{MemoryGroup, Record};

#[derive(Debug, Deserialize)]
struct CsvRow {
    key: String,
    value: String,
}

/// Load a group from `path`; `.csv` files need a `key,value` header, anything else is JSON.
///
/// JSON input is either an array of `{key, value}` objects or an object with an `all` array.
pub fn load_group(path: &Path) -> Result<MemoryGroup<String, Value>> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    let group = if is_csv {
        load_csv(path)?
    } else {
        load_json(path)?
    };
    info!(path = %path.display(), records = group.len(), "loaded group");
    Ok(group)
}

fn load_csv(path: &Path) -> Result<MemoryGroup<String, Value>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let mut records = Vec::new();
    for result in reader.deserialize() {
        let row: CsvRow = result?;
        let value = match row.value.trim().parse::<f64>() {
            Ok(number) => json!(number),
            Err(_) => Value::String(row.value),
        };
        records.push(Record::new(row.key, value));
    }
    Ok(MemoryGroup::new(records))
}

fn load_json(path: &Path) -> Result<MemoryGroup<String, Value>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let parsed: Value =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;
    let source = match parsed {
        Value::Array(rows) => json!({ "all": rows }),
        other => other,
    };
    MemoryGroup::from_json(source).with_context(|| format!("loading group from {}", path.display()))
}
