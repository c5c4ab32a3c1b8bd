//! Reading and writing the history file

use std::fs;
use std::path::Path;

use log::debug;

use super::calculation::{Calculation, CalculationRecord};
use crate::error::{CalcError, Result};

/// Write `calculations` to `path` as a JSON array.
///
/// The file is written next to its destination and renamed over it, so a
/// failed save never leaves a half-written history behind.
pub fn save(path: &Path, calculations: &[Calculation]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            CalcError::Storage(format!(
                "Failed to create history directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    let records: Vec<CalculationRecord> = calculations.iter().map(Calculation::to_record).collect();
    let json = serde_json::to_string_pretty(&records)
        .map_err(|e| CalcError::Storage(format!("Failed to encode history: {}", e)))?;

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json)
        .and_then(|_| fs::rename(&tmp, path))
        .map_err(|e| {
            let _ = fs::remove_file(&tmp);
            CalcError::Storage(format!("Failed to save history to {}: {}", path.display(), e))
        })?;

    debug!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}

/// Read a history file written by [`save`].
pub fn load(path: &Path) -> Result<Vec<Calculation>> {
    if !path.exists() {
        return Err(CalcError::Storage(format!(
            "History file not found: {}",
            path.display()
        )));
    }

    let content = fs::read_to_string(path).map_err(|e| {
        CalcError::Storage(format!("Failed to read history from {}: {}", path.display(), e))
    })?;
    let records: Vec<CalculationRecord> = serde_json::from_str(&content).map_err(|e| {
        CalcError::Storage(format!("Malformed history file {}: {}", path.display(), e))
    })?;

    records
        .iter()
        .enumerate()
        .map(|(i, record)| Calculation::from_record(record, i))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::Operation;
    use dashu::float::DBig;
    use std::str::FromStr;
    use tempfile::TempDir;

    fn calc(op: Operation, a: &str, b: &str, r: &str) -> Calculation {
        Calculation::new(
            op,
            DBig::from_str(a).unwrap(),
            DBig::from_str(b).unwrap(),
            DBig::from_str(r).unwrap(),
        )
    }

    #[test]
    fn test_save_then_load_keeps_order() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("history.json");
        let calculations = vec![
            calc(Operation::Add, "2", "3", "5"),
            calc(Operation::Divide, "7", "2", "3.5"),
        ];

        save(&path, &calculations).unwrap();
        let loaded = load(&path).unwrap();

        let shown: Vec<String> = loaded.iter().map(|c| c.to_string()).collect();
        assert_eq!(shown, vec!["Addition(2, 3) = 5", "Division(7, 2) = 3.5"]);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = load(&temp_dir.path().join("none.json")).unwrap_err();
        assert!(matches!(err, CalcError::Storage(_)));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_load_malformed_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("history.json");
        fs::write(&path, "operation,operand1\nadd,1").unwrap();

        let err = load(&path).unwrap_err();
        assert!(err.to_string().contains("Malformed"));
    }

    #[test]
    fn test_save_into_unwritable_location() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        let err = save(&blocker.join("history.json"), &[]).unwrap_err();
        assert!(matches!(err, CalcError::Storage(_)));
    }
}
