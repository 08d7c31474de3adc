//! # File I/O Module
//!
//! Reads JSON input documents and saves calculation reports:
//! - **Atomic saves**: write to `.tmp`, sync, rename so an interrupted save
//!   never leaves a half-written report
//! - **Version validation**: reports from a newer schema are refused
//!
//! The calculation engine never touches the filesystem; only hosts call
//! into this module.
//!
//! ## Example
//!
//! ```rust,no_run
//! use evcalc_core::calculations::CalculationInputs;
//! use evcalc_core::file_io::{load_json, save_report};
//! use evcalc_core::report::Report;
//! use std::path::Path;
//!
//! let inputs: CalculationInputs = load_json(Path::new("site.json"))?;
//! let report = Report::new("Installer", "Site");
//! save_report(&report, Path::new("site-report.json"))?;
//! # Ok::<(), evcalc_core::errors::CalcError>(())
//! ```

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::info;

use crate::errors::{CalcError, CalcResult};
use crate::report::{Report, SCHEMA_VERSION};

/// Read and parse a JSON document (inputs, limits, RCD tests).
pub fn load_json<T: DeserializeOwned>(path: &Path) -> CalcResult<T> {
    let mut file = File::open(path).map_err(|e| {
        CalcError::file_error("open", path.display().to_string(), e.to_string())
    })?;

    let mut contents = String::new();
    file.read_to_string(&mut contents).map_err(|e| {
        CalcError::file_error("read", path.display().to_string(), e.to_string())
    })?;

    serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError {
        reason: format!("Invalid JSON in {}: {}", path.display(), e),
    })
}

/// Save a report with atomic write semantics.
///
/// 1. Serialize report to JSON
/// 2. Write to a temporary file (`.tmp`)
/// 3. Sync to disk
/// 4. Rename over the target
pub fn save_report(report: &Report, path: &Path) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(report).map_err(|e| CalcError::SerializationError {
        reason: e.to_string(),
    })?;

    let tmp_path = path.with_extension("json.tmp");

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        CalcError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(json.as_bytes()).map_err(|e| {
        CalcError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        CalcError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CalcError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    info!(path = %path.display(), items = report.item_count(), "report saved");
    Ok(())
}

/// Load a report, refusing files written by a newer schema.
pub fn load_report(path: &Path) -> CalcResult<Report> {
    let report: Report = load_json(path)?;
    validate_version(&report.meta.version)?;
    Ok(report)
}

fn validate_version(file_version: &str) -> CalcResult<()> {
    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let file_parts: Vec<u32> = file_version.split('.').filter_map(|p| p.parse().ok()).collect();
    let current_parts: Vec<u32> = SCHEMA_VERSION.split('.').filter_map(|p| p.parse().ok()).collect();

    if file_parts.is_empty() || current_parts.is_empty() {
        return Err(mismatch());
    }

    // Major version must match
    if file_parts[0] != current_parts[0] {
        return Err(mismatch());
    }

    // For 0.x versions a newer minor may carry breaking changes
    if current_parts[0] == 0 && file_parts.len() > 1 && current_parts.len() > 1 && file_parts[1] > current_parts[1] {
        return Err(mismatch());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::{CalculationInputs, CalculationItem};
    use std::env::temp_dir;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        temp_dir().join(format!("evcalc_test_{}.json", name))
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = temp_path("roundtrip");

        let mut report = Report::new("Test Installer", "Test Site");
        let item = CalculationItem::ev_load("Bay 1", CalculationInputs::default(), &report.limits).unwrap();
        report.add_item(item);
        save_report(&report, &path).unwrap();

        let loaded = load_report(&path).unwrap();
        assert_eq!(loaded.meta.installer, "Test Installer");
        assert_eq!(loaded.item_count(), 1);
        assert_eq!(loaded.items[0].label(), "Bay 1");
        assert_eq!(loaded.meta.id, report.meta.id);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_atomic_save_creates_no_tmp_file() {
        let path = temp_path("atomic");
        let tmp_path = path.with_extension("json.tmp");

        save_report(&Report::new("Test", "Site"), &path).unwrap();

        assert!(!tmp_path.exists());
        assert!(path.exists());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_inputs_document() {
        let path = temp_path("inputs");
        fs::write(&path, r#"{ "chargingPoints": [{ "chargerType": "22kw-ac", "quantity": 1 }], "supplyVoltage": 400 }"#)
            .unwrap();

        let inputs: CalculationInputs = load_json(&path).unwrap();
        assert_eq!(inputs.charging_points[0].charger_type, "22kw-ac");
        assert_eq!(inputs.supply_voltage, 400.0);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file() {
        let err = load_json::<CalculationInputs>(Path::new("/nonexistent/evcalc.json")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }

    #[test]
    fn test_invalid_json() {
        let path = temp_path("invalid");
        fs::write(&path, "{ not json").unwrap();
        let err = load_json::<CalculationInputs>(&path).unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version("0.1.0").is_ok());
        assert!(validate_version("0.0.9").is_ok());
        assert!(validate_version("0.2.0").is_err());
        assert!(validate_version("1.0.0").is_err());
        assert!(validate_version("garbage").is_err());
    }
}
