//! Run configuration: YAML description of a benchmark sweep.
//!
//! A config names the suite directories and synthetic widths to draw
//! circuits from, the transpilers to compare, the metrics to record,
//! and where the outputs go. [`RunConfig::build`] turns it into a ready
//! [`Benchmark`].

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use grani_compile::{BasisGates, CouplingMap};

use crate::benchmark::{Benchmark, CircuitFilter};
use crate::error::{BenchError, BenchResult};
use crate::generate::{SyntheticFamily, SyntheticSource};
use crate::library::CircuitLibrary;
use crate::metric::{Metric, metric_by_name};
use crate::runner::{PresetTranspiler, Transpiler};
use crate::source::{CircuitSource, FilterConfig, QasmDirSource};

/// One suite directory of QASM files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteConfig {
    /// Suite name (for logs).
    pub name: String,
    /// Directory to scan recursively for `.qasm` files.
    pub path: PathBuf,
    /// Include regex patterns on circuit names (empty keeps all).
    #[serde(default)]
    pub include: Vec<String>,
    /// Exclude regex patterns on circuit names.
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Path substrings that skip a file entirely.
    #[serde(default = "default_skip_substrings")]
    pub skip_substrings: Vec<String>,
}

fn default_skip_substrings() -> Vec<String> {
    vec!["_transpiled".to_string()]
}

/// Synthetic circuit generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyntheticConfig {
    /// Families to generate (`ghz`, `qft`, `volume`).
    pub families: Vec<String>,
    /// Widths to generate each family at.
    pub widths: Vec<u32>,
    /// Seed for the volume circuits.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_seed() -> u64 {
    7
}

/// Device topology for a preset transpiler.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TopologyConfig {
    /// Linear chain of `qubits` qubits.
    Linear {
        /// Number of qubits.
        qubits: u32,
    },
    /// Ring of `qubits` qubits.
    Ring {
        /// Number of qubits.
        qubits: u32,
    },
    /// Rows × cols grid.
    Grid {
        /// Number of rows.
        rows: u32,
        /// Number of columns.
        cols: u32,
    },
    /// All-to-all connectivity.
    Full {
        /// Number of qubits.
        qubits: u32,
    },
}

impl TopologyConfig {
    /// Build the coupling map.
    pub fn build(&self) -> CouplingMap {
        match *self {
            TopologyConfig::Linear { qubits } => CouplingMap::linear(qubits),
            TopologyConfig::Ring { qubits } => CouplingMap::ring(qubits),
            TopologyConfig::Grid { rows, cols } => CouplingMap::grid(rows, cols),
            TopologyConfig::Full { qubits } => CouplingMap::full(qubits),
        }
    }
}

/// One preset transpiler under comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranspilerConfig {
    /// Display name; defaults to `preset_o{level}`.
    #[serde(default)]
    pub name: Option<String>,
    /// Optimization level (0-3).
    pub level: u8,
    /// Device topology.
    pub topology: TopologyConfig,
    /// Basis gate set: `ibm`, `cz`, or `universal`.
    #[serde(default = "default_basis")]
    pub basis: String,
}

fn default_basis() -> String {
    "ibm".to_string()
}

impl TranspilerConfig {
    fn build(&self) -> BenchResult<Box<dyn Transpiler>> {
        let basis = match self.basis.as_str() {
            "ibm" => BasisGates::ibm(),
            "cz" => BasisGates::cz_based(),
            "universal" => BasisGates::universal(),
            other => {
                return Err(BenchError::Config(format!(
                    "unknown basis '{other}' (expected ibm, cz, or universal)"
                )));
            }
        };
        let mut transpiler = PresetTranspiler::new(self.level, self.topology.build(), basis);
        if let Some(name) = &self.name {
            transpiler = transpiler.with_name(name);
        }
        Ok(Box::new(transpiler))
    }
}

/// Circuit pre-filter settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterSettings {
    /// Minimum qubit count.
    #[serde(default = "default_min_qubits")]
    pub min_qubits: usize,
    /// Maximum qubit count.
    #[serde(default = "default_max_qubits")]
    pub max_qubits: usize,
    /// Maximum two-qubit depth of the input circuit.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

fn default_min_qubits() -> usize {
    2
}
fn default_max_qubits() -> usize {
    36
}
fn default_max_depth() -> usize {
    800
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            min_qubits: default_min_qubits(),
            max_qubits: default_max_qubits(),
            max_depth: default_max_depth(),
        }
    }
}

/// Output locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Report file path.
    #[serde(default = "default_report_path")]
    pub report: PathBuf,
    /// Directory for chart SVGs.
    #[serde(default = "default_charts_dir")]
    pub charts_dir: PathBuf,
    /// Pretty-print the JSON report.
    #[serde(default = "default_true")]
    pub pretty: bool,
}

fn default_report_path() -> PathBuf {
    PathBuf::from("report.json")
}
fn default_charts_dir() -> PathBuf {
    PathBuf::from(".")
}
fn default_true() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            report: default_report_path(),
            charts_dir: default_charts_dir(),
            pretty: default_true(),
        }
    }
}

/// A full benchmark run description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Suite directories.
    #[serde(default)]
    pub suites: Vec<SuiteConfig>,
    /// Synthetic circuit generation.
    #[serde(default)]
    pub synthetic: Option<SyntheticConfig>,
    /// Explicit circuit list; empty means everything the sources offer.
    #[serde(default)]
    pub circuits: Vec<String>,
    /// Transpilers under comparison.
    pub transpilers: Vec<TranspilerConfig>,
    /// Metric names to record.
    #[serde(default = "default_metrics")]
    pub metrics: Vec<String>,
    /// Trials per pairing.
    #[serde(default = "default_trials")]
    pub trials: usize,
    /// Circuit pre-filter.
    #[serde(default)]
    pub filter: FilterSettings,
    /// Output locations.
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_metrics() -> Vec<String> {
    vec![
        "two_qubit_depth".to_string(),
        "two_qubit_gates".to_string(),
        "transpile_seconds".to_string(),
    ]
}

fn default_trials() -> usize {
    3
}

impl RunConfig {
    /// Load a config from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> BenchResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| BenchError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml_ng::from_str(&text)
            .map_err(|e| BenchError::Config(format!("{}: {e}", path.display())))
    }

    /// Build the circuit sources this config describes.
    pub fn build_sources(&self) -> BenchResult<Vec<Box<dyn CircuitSource>>> {
        let mut sources: Vec<Box<dyn CircuitSource>> = vec![];

        for suite in &self.suites {
            let filter = FilterConfig::new(&suite.include, &suite.exclude)?;
            sources.push(Box::new(QasmDirSource::new(
                &suite.name,
                &suite.path,
                &filter,
                &suite.skip_substrings,
            )?));
        }

        if let Some(synthetic) = &self.synthetic {
            let families = synthetic
                .families
                .iter()
                .map(|name| {
                    SyntheticFamily::from_name(name).ok_or_else(|| {
                        BenchError::Config(format!(
                            "unknown synthetic family '{name}' (expected ghz, qft, or volume)"
                        ))
                    })
                })
                .collect::<BenchResult<Vec<_>>>()?;
            sources.push(Box::new(SyntheticSource::new(
                families,
                synthetic.widths.clone(),
                synthetic.seed,
                FilterConfig::default(),
            )));
        }

        if sources.is_empty() {
            return Err(BenchError::Config(
                "no circuit sources configured (need suites or synthetic)".into(),
            ));
        }
        Ok(sources)
    }

    /// Build the configured benchmark.
    pub fn build(&self) -> BenchResult<Benchmark> {
        let sources = self.build_sources()?;
        let library = if self.circuits.is_empty() {
            CircuitLibrary::from_sources(sources)
        } else {
            CircuitLibrary::new(sources, self.circuits.clone())?
        };

        let transpilers = self
            .transpilers
            .iter()
            .map(TranspilerConfig::build)
            .collect::<BenchResult<Vec<_>>>()?;

        let metrics = self
            .metrics
            .iter()
            .map(|name| {
                metric_by_name(name)
                    .ok_or_else(|| BenchError::Config(format!("unknown metric '{name}'")))
            })
            .collect::<BenchResult<Vec<Box<dyn Metric>>>>()?;

        let filter = CircuitFilter {
            min_qubits: self.filter.min_qubits,
            max_qubits: self.filter.max_qubits,
            max_depth: self.filter.max_depth,
        };

        Benchmark::new(transpilers, library, metrics, self.trials, filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
synthetic:
  families: [ghz, qft]
  widths: [4, 8]
transpilers:
  - level: 1
    topology: { kind: linear, qubits: 8 }
  - name: grid_o3
    level: 3
    topology: { kind: grid, rows: 3, cols: 3 }
    basis: cz
metrics: [two_qubit_depth, inserted_swaps]
trials: 2
"#;

    #[test]
    fn test_parse_yaml() {
        let config: RunConfig = serde_yaml_ng::from_str(SAMPLE).unwrap();
        assert_eq!(config.transpilers.len(), 2);
        assert_eq!(config.trials, 2);
        assert_eq!(config.metrics, vec!["two_qubit_depth", "inserted_swaps"]);
        assert!(matches!(
            config.transpilers[1].topology,
            TopologyConfig::Grid { rows: 3, cols: 3 }
        ));
    }

    #[test]
    fn test_build_benchmark() {
        let config: RunConfig = serde_yaml_ng::from_str(SAMPLE).unwrap();
        let benchmark = config.build().unwrap();
        assert_eq!(benchmark.circuit_count(), 4);
        assert_eq!(benchmark.transpiler_names(), vec!["preset_o1", "grid_o3"]);
    }

    #[test]
    fn test_defaults_applied() {
        let minimal = r#"
synthetic:
  families: [ghz]
  widths: [4]
transpilers:
  - level: 0
    topology: { kind: full, qubits: 4 }
"#;
        let config: RunConfig = serde_yaml_ng::from_str(minimal).unwrap();
        assert_eq!(config.trials, 3);
        assert_eq!(config.metrics.len(), 3);
        assert_eq!(config.filter.max_qubits, 36);
        assert!(config.output.pretty);
    }

    #[test]
    fn test_unknown_metric_rejected() {
        let bad = r#"
synthetic:
  families: [ghz]
  widths: [4]
transpilers:
  - level: 1
    topology: { kind: linear, qubits: 4 }
metrics: [fidelity]
"#;
        let config: RunConfig = serde_yaml_ng::from_str(bad).unwrap();
        assert!(matches!(config.build(), Err(BenchError::Config(_))));
    }

    #[test]
    fn test_no_sources_rejected() {
        let empty = r#"
transpilers:
  - level: 1
    topology: { kind: linear, qubits: 4 }
"#;
        let config: RunConfig = serde_yaml_ng::from_str(empty).unwrap();
        assert!(matches!(config.build(), Err(BenchError::Config(_))));
    }
}
