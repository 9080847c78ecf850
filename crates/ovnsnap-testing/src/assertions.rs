//! Custom assertions for generated helper scripts and JSON output.

use anyhow::{Context, Result};
use serde_json::Value;

/// Assert that a helper script defines exactly `expected` index shortcuts
/// (`ovndb_<n>() {`).
pub fn assert_shortcut_count(script: &str, expected: usize) -> Result<()> {
    let count = script
        .lines()
        .filter(|line| {
            line.strip_prefix("ovndb_")
                .and_then(|rest| rest.strip_suffix("() {"))
                .is_some_and(|index| {
                    !index.is_empty() && index.chars().all(|c| c.is_ascii_digit())
                })
        })
        .count();

    if count != expected {
        anyhow::bail!("Expected {} index shortcuts, got {}", expected, count);
    }
    Ok(())
}

/// Assert that the script's array entry for `index` names `container`.
pub fn assert_script_entry(script: &str, index: usize, container: &str) -> Result<()> {
    let needle = format!("OVNDB_CONTAINERS[{}]={}", index, container);
    if !script.lines().any(|line| line.trim() == needle) {
        anyhow::bail!("Script has no entry `{}`", needle);
    }
    Ok(())
}

/// Assert that JSON output lists the expected number of fleet records.
pub fn assert_record_count(json: &Value, expected: usize) -> Result<()> {
    let records = json["content"]["records"]
        .as_array()
        .context("Expected 'content.records' array in JSON")?;

    if records.len() != expected {
        anyhow::bail!("Expected {} records, got {}", expected, records.len());
    }
    Ok(())
}
