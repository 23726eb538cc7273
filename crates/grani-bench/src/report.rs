//! JSON report export.
//!
//! Flattens a [`ResultSet`] into serializable rows with the aggregate
//! statistics precomputed, stamped with a schema version and timestamp.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{BenchError, BenchResult};
use crate::results::ResultSet;

/// Report format version.
const SCHEMA_VERSION: &str = "1";

/// One (metric, circuit, transpiler) cell of the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRow {
    /// Metric name.
    pub metric: String,
    /// Circuit name.
    pub circuit: String,
    /// Transpiler name.
    pub transpiler: String,
    /// Raw trial values.
    pub trials: Vec<f64>,
    /// Average per the metric's policy.
    pub average: f64,
    /// Best trial.
    pub best: f64,
    /// Worst trial.
    pub worst: f64,
    /// Standard error of the mean.
    pub std_error: f64,
}

/// A complete benchmark report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchReport {
    /// Schema version for forward compatibility.
    pub schema_version: String,
    /// When the sweep finished.
    pub timestamp: DateTime<Utc>,
    /// Trials per (circuit, transpiler) pairing.
    pub trials: usize,
    /// Transpilers under comparison.
    pub transpilers: Vec<String>,
    /// All result cells.
    pub rows: Vec<ReportRow>,
}

impl BenchReport {
    /// Build a report from a finished sweep.
    pub fn from_results(results: &ResultSet, trials: usize, transpilers: Vec<String>) -> Self {
        let rows = results
            .iter()
            .map(|(metric, circuit, transpiler, aggregate)| ReportRow {
                metric: metric.to_string(),
                circuit: circuit.to_string(),
                transpiler: transpiler.to_string(),
                trials: aggregate.values().to_vec(),
                average: aggregate.average(),
                best: aggregate.best().unwrap_or(0.0),
                worst: aggregate.worst().unwrap_or(0.0),
                std_error: aggregate.std_error(),
            })
            .collect();

        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            timestamp: Utc::now(),
            trials,
            transpilers,
            rows,
        }
    }

    /// Serialize to JSON.
    pub fn to_json(&self, pretty: bool) -> BenchResult<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    /// Write the report to a file.
    pub fn to_file(&self, path: impl AsRef<Path>, pretty: bool) -> BenchResult<()> {
        let path = path.as_ref();
        let json = self.to_json(pretty)?;
        fs::write(path, json).map_err(|source| BenchError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> BenchReport {
        let mut results = ResultSet::new();
        results.add_trial("two_qubit_depth", "ghz_n4", "preset_o1", 3.0, true, true);
        results.add_trial("two_qubit_depth", "ghz_n4", "preset_o1", 4.0, true, true);
        BenchReport::from_results(&results, 2, vec!["preset_o1".into()])
    }

    #[test]
    fn test_report_rows() {
        let report = sample();
        assert_eq!(report.rows.len(), 1);
        let row = &report.rows[0];
        assert_eq!(row.trials, vec![3.0, 4.0]);
        assert_eq!(row.best, 3.0);
        assert_eq!(row.worst, 4.0);
    }

    #[test]
    fn test_json_roundtrip() {
        let report = sample();
        let json = report.to_json(true).unwrap();
        assert!(json.contains("\"schema_version\": \"1\""));

        let parsed: BenchReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.rows.len(), report.rows.len());
        assert_eq!(parsed.trials, 2);
    }

    #[test]
    fn test_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        sample().to_file(&path, false).unwrap();
        assert!(path.exists());
    }
}
