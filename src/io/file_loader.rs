//! JSON record files.
//!
//! Data files hold a top-level array of tree records. Loading goes through
//! the same lenient normalization as any other input, so a file with stray
//! non-object entries still loads.

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde_json::Value;

use crate::types::{records_from_value, TreeRecord};

/// Reads a record array from `path`.
///
/// # Returns
/// * `Ok(records)` - Normalized records (a non-array document yields none)
/// * `Err(e)` - The file could not be read or is not valid JSON
pub fn load_records(path: &Path) -> anyhow::Result<Vec<TreeRecord>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_records(&text).with_context(|| format!("failed to parse {}", path.display()))
}

/// Parses a record array from JSON text.
pub fn parse_records(text: &str) -> anyhow::Result<Vec<TreeRecord>> {
    let value: Value = serde_json::from_str(text)?;
    Ok(records_from_value(value))
}

/// Writes `records` to `path` as pretty-printed JSON.
pub fn save_records(path: &Path, records: &[TreeRecord]) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(records)?;
    fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tolerates_junk_entries() {
        let records = parse_records(r#"[{"label":"a","children":[{"label":"b"}]}, 42, "x"]"#).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].children[0].label, "b");
    }

    #[test]
    fn test_parse_rejects_invalid_json() {
        assert!(parse_records("[{").is_err());
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!("rtreeselect-{}.json", std::process::id()));
        let records = vec![TreeRecord::new("root")
            .expanded(true)
            .with_children(vec![TreeRecord::new("leaf").selected(true)])];

        save_records(&path, &records).unwrap();
        let loaded = load_records(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(loaded, records);
    }

    #[test]
    fn test_missing_file_is_error() {
        let err = load_records(Path::new("/nonexistent/rtreeselect.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }
}
