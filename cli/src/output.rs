//! Command output: pretty JSON or one block per record.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;

/// Pretty-printed JSON.
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// One `*** [n] ***` block per record with `key: value` lines.
///
/// A top-level array yields one block per element; any other value is a
/// single record. Nested objects and arrays print as compact JSON.
pub fn to_vertical<T: Serialize>(value: &T) -> Result<String> {
    let value = serde_json::to_value(value)?;
    let records = match value {
        Value::Array(items) => items,
        other => vec![other],
    };

    let mut output = String::new();
    for (index, record) in records.iter().enumerate() {
        output.push_str(&format!(
            "*************************** [{}] ***************************\n",
            index + 1
        ));
        match record {
            Value::Object(fields) => {
                for (key, field) in fields {
                    output.push_str(&format!("{key}: {}\n", scalar(field)));
                }
            },
            other => output.push_str(&format!("{}\n", scalar(other))),
        }
        output.push('\n');
    }

    if output.is_empty() {
        output.push_str("(no rows)\n");
    }
    Ok(output)
}

fn scalar(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Write `content` to `dir/name`, creating `dir` if needed.
pub fn write_file(dir: &Path, name: &str, content: &str) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    let path = dir.join(name);
    fs::write(&path, content).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!("wrote {}", path.display());
    Ok(())
}
