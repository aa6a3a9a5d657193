use anyhow::{Result, Context as AnyhowContext};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Reads a workflow payload from disk without validating its shape.
///
/// The payload is handed to the graph translator as-is, so malformed
/// documents surface as empty/error view states instead of load failures.
/// `.yaml`/`.yml` files are parsed as YAML, everything else as JSON.
pub fn load_document(file_path: &str) -> Result<Value> {
    let content = fs::read_to_string(file_path)
        .with_context(|| format!("Failed to read workflow file from {}", file_path))?;

    let is_yaml = Path::new(file_path)
        .extension()
        .and_then(|s| s.to_str())
        .map(|ext| ext == "yaml" || ext == "yml")
        .unwrap_or(false);

    let payload: Value = if is_yaml {
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to deserialize YAML content from {}", file_path))?
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to deserialize JSON content from {}", file_path))?
    };

    Ok(payload)
}
