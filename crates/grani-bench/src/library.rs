//! Circuit library: aggregation over all configured sources.
//!
//! The library owns the list of circuits a sweep runs over and knows
//! which source provides each one. Lookup accepts both `name_n{q}` and
//! `name_{q}` spellings and canonicalizes to the former.

use std::fs;
use std::path::Path;

use tracing::debug;

use grani_ir::Circuit;

use crate::error::{BenchError, BenchResult};
use crate::source::{CircuitSource, normalize_name};

/// A library of benchmark circuits drawn from one or more sources.
pub struct CircuitLibrary {
    sources: Vec<Box<dyn CircuitSource>>,
    circuit_list: Vec<String>,
}

impl CircuitLibrary {
    /// Create a library over an explicit circuit list.
    ///
    /// Every requested circuit must be resolvable by some source;
    /// anything missing is an error up front rather than a surprise
    /// mid-sweep.
    pub fn new(
        sources: Vec<Box<dyn CircuitSource>>,
        circuit_list: Vec<String>,
    ) -> BenchResult<Self> {
        let circuit_list: Vec<String> =
            circuit_list.iter().map(|n| normalize_name(n)).collect();

        for name in &circuit_list {
            if !sources.iter().any(|s| s.contains(name)) {
                return Err(BenchError::CircuitNotFound(name.clone()));
            }
        }

        Ok(Self {
            sources,
            circuit_list,
        })
    }

    /// Create a library over everything the sources provide.
    pub fn from_sources(sources: Vec<Box<dyn CircuitSource>>) -> Self {
        let mut circuit_list = vec![];
        for source in &sources {
            for name in source.circuit_names() {
                if !circuit_list.contains(&name) {
                    circuit_list.push(name);
                }
            }
        }
        Self {
            sources,
            circuit_list,
        }
    }

    /// Create a library from a newline-delimited circuit list file.
    ///
    /// Blank lines and `#` comments are skipped.
    pub fn from_list_file(
        path: impl AsRef<Path>,
        sources: Vec<Box<dyn CircuitSource>>,
    ) -> BenchResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| BenchError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let circuit_list: Vec<String> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(String::from)
            .collect();
        Self::new(sources, circuit_list)
    }

    /// Number of circuits in the library.
    pub fn len(&self) -> usize {
        self.circuit_list.len()
    }

    /// Check if the library is empty.
    pub fn is_empty(&self) -> bool {
        self.circuit_list.is_empty()
    }

    /// Names of the circuits in the library, in sweep order.
    pub fn names(&self) -> &[String] {
        &self.circuit_list
    }

    /// Load one circuit by name.
    ///
    /// Sources are consulted in configuration order; the first that
    /// claims the name loads it.
    pub fn get(&self, name: &str) -> BenchResult<Circuit> {
        let canonical = normalize_name(name);
        for source in &self.sources {
            if source.contains(&canonical) {
                debug!(circuit = %canonical, source = source.source_name(), "loading circuit");
                let mut circuit = source.load(&canonical)?;
                circuit.set_name(canonical);
                return Ok(circuit);
            }
        }
        Err(BenchError::CircuitNotFound(canonical))
    }

    /// Iterate over the circuits, loading each lazily.
    pub fn circuits(&self) -> impl Iterator<Item = BenchResult<Circuit>> + '_ {
        self.circuit_list.iter().map(|name| self.get(name))
    }
}
