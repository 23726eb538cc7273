//! Circuit sources: where benchmark circuits come from.
//!
//! A source is either a directory of static QASM files (the usual case,
//! one suite checkout per source) or a generator producing circuits at
//! requested widths. Sources expose the set of circuit names they can
//! provide and load one circuit per request, so a sweep never holds
//! more than one parsed circuit at a time.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::{debug, warn};

use grani_ir::Circuit;

use crate::error::{BenchError, BenchResult};

/// Name-based include/exclude filtering.
///
/// A circuit is kept when it matches at least one include pattern (an
/// empty include list keeps everything) and no exclude pattern.
#[derive(Debug, Clone, Default)]
pub struct FilterConfig {
    include: Vec<Regex>,
    exclude: Vec<Regex>,
}

impl FilterConfig {
    /// Compile a filter from pattern strings.
    pub fn new(include: &[String], exclude: &[String]) -> BenchResult<Self> {
        let compile = |patterns: &[String]| -> BenchResult<Vec<Regex>> {
            patterns
                .iter()
                .map(|p| {
                    Regex::new(p)
                        .map_err(|e| BenchError::Config(format!("bad filter pattern '{p}': {e}")))
                })
                .collect()
        };
        Ok(Self {
            include: compile(include)?,
            exclude: compile(exclude)?,
        })
    }

    /// Check whether a circuit name passes the filter.
    pub fn matches(&self, name: &str) -> bool {
        let included =
            self.include.is_empty() || self.include.iter().any(|re| re.is_match(name));
        included && !self.exclude.iter().any(|re| re.is_match(name))
    }
}

/// A source of benchmark circuits.
pub trait CircuitSource {
    /// Name of this source, for logs and reports.
    fn source_name(&self) -> &str;

    /// All circuit names this source provides, after filtering.
    fn circuit_names(&self) -> Vec<String>;

    /// Load one circuit by name.
    fn load(&self, name: &str) -> BenchResult<Circuit>;

    /// Whether this source generates circuits at any requested width.
    fn is_dynamic(&self) -> bool {
        false
    }

    /// Check whether this source can provide the named circuit.
    ///
    /// Dynamic sources match on the base name with the width suffix
    /// stripped.
    fn contains(&self, name: &str) -> bool {
        if self.is_dynamic() {
            let base = split_width(name).0;
            self.circuit_names()
                .iter()
                .any(|n| split_width(n).0 == base)
        } else {
            self.circuit_names().iter().any(|n| n == name)
        }
    }

    /// Estimated number of circuits.
    fn len(&self) -> usize {
        self.circuit_names().len()
    }

    /// Check if the source provides no circuits.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Normalize a file stem to the `name_n{qubits}` convention.
///
/// Suites disagree on naming: `adder_n4` and `adder_4` both appear.
/// A trailing `_<digits>` becomes `_n<digits>`; everything else is left
/// alone.
pub fn normalize_name(stem: &str) -> String {
    match stem.rsplit_once('_') {
        Some((base, suffix)) => {
            if suffix.chars().all(|c| c.is_ascii_digit()) && !suffix.is_empty() {
                format!("{base}_n{suffix}")
            } else {
                stem.to_string()
            }
        }
        None => stem.to_string(),
    }
}

/// Split `name_n{q}` into (base, Some(q)); names without a width suffix
/// return (name, None).
pub fn split_width(name: &str) -> (&str, Option<u32>) {
    if let Some((base, suffix)) = name.rsplit_once("_n") {
        if let Ok(width) = suffix.parse::<u32>() {
            return (base, Some(width));
        }
    }
    (name, None)
}

/// A directory tree of `.qasm` files.
///
/// Scans recursively on construction, normalizes file stems, and keeps
/// a name → path map. Paths containing any of the configured skip
/// substrings (transpiled outputs, for instance) are ignored.
pub struct QasmDirSource {
    name: String,
    paths: BTreeMap<String, PathBuf>,
}

impl QasmDirSource {
    /// Scan a suite directory.
    pub fn new(
        name: impl Into<String>,
        root: impl AsRef<Path>,
        filter: &FilterConfig,
        skip_substrings: &[String],
    ) -> BenchResult<Self> {
        let name = name.into();
        let root = root.as_ref();
        let mut files = vec![];
        collect_qasm_files(root, &mut files)?;

        let mut paths = BTreeMap::new();
        for path in files {
            let path_str = path.to_string_lossy();
            if skip_substrings.iter().any(|s| path_str.contains(s.as_str())) {
                continue;
            }
            let Some(stem) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
                continue;
            };
            let circuit_name = normalize_name(&stem);
            if !filter.matches(&circuit_name) {
                continue;
            }
            if let Some(previous) = paths.insert(circuit_name.clone(), path.clone()) {
                warn!(
                    circuit = %circuit_name,
                    kept = %path.display(),
                    shadowed = %previous.display(),
                    "duplicate circuit name in suite"
                );
            }
        }

        debug!(suite = %name, circuits = paths.len(), "scanned suite directory");
        Ok(Self { name, paths })
    }

    /// Path of a named circuit, if present.
    pub fn path_of(&self, name: &str) -> Option<&Path> {
        self.paths.get(name).map(PathBuf::as_path)
    }
}

fn collect_qasm_files(dir: &Path, out: &mut Vec<PathBuf>) -> BenchResult<()> {
    let entries = fs::read_dir(dir).map_err(|source| BenchError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    for entry in entries {
        let entry = entry.map_err(|source| BenchError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_dir() {
            collect_qasm_files(&path, out)?;
        } else if path.extension().is_some_and(|ext| ext == "qasm") {
            out.push(path);
        }
    }
    Ok(())
}

impl CircuitSource for QasmDirSource {
    fn source_name(&self) -> &str {
        &self.name
    }

    fn circuit_names(&self) -> Vec<String> {
        self.paths.keys().cloned().collect()
    }

    fn load(&self, name: &str) -> BenchResult<Circuit> {
        let path = self
            .paths
            .get(name)
            .ok_or_else(|| BenchError::CircuitNotFound(name.to_string()))?;
        let source = fs::read_to_string(path).map_err(|source| BenchError::Io {
            path: path.clone(),
            source,
        })?;
        let mut circuit = grani_qasm::parse(&source).map_err(|e| BenchError::LoadFailed {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
        circuit.set_name(name);
        Ok(circuit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("adder_n4"), "adder_n4");
        assert_eq!(normalize_name("adder_4"), "adder_n4");
        assert_eq!(normalize_name("grover"), "grover");
        assert_eq!(normalize_name("bv_mapping_12"), "bv_mapping_n12");
        assert_eq!(normalize_name("square_root_n18"), "square_root_n18");
    }

    #[test]
    fn test_split_width() {
        assert_eq!(split_width("qft_n8"), ("qft", Some(8)));
        assert_eq!(split_width("qft"), ("qft", None));
        assert_eq!(split_width("deep_nest"), ("deep_nest", None));
    }

    #[test]
    fn test_filter_include_exclude() {
        let filter = FilterConfig::new(
            &["qft".to_string(), "^adder".to_string()],
            &["n16$".to_string()],
        )
        .unwrap();
        assert!(filter.matches("qft_n8"));
        assert!(filter.matches("adder_n4"));
        assert!(!filter.matches("qft_n16"));
        assert!(!filter.matches("grover_n2"));
    }

    #[test]
    fn test_empty_filter_keeps_all() {
        let filter = FilterConfig::default();
        assert!(filter.matches("anything_n3"));
    }

    #[test]
    fn test_bad_pattern_is_config_error() {
        let result = FilterConfig::new(&["[unclosed".to_string()], &[]);
        assert!(matches!(result, Err(BenchError::Config(_))));
    }
}
