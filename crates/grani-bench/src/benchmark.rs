//! The benchmark driver.
//!
//! Loads circuits from the library, runs every configured transpiler on
//! each the configured number of times, computes every metric on each
//! successful run, and collects the values. Strictly sequential: one
//! circuit, one transpiler, one trial at a time.

use tracing::{debug, info, warn};

use grani_ir::Circuit;

use crate::error::{BenchError, BenchResult};
use crate::library::CircuitLibrary;
use crate::metric::Metric;
use crate::results::ResultSet;
use crate::runner::Transpiler;

/// Pre-filter applied to loaded circuits before any transpilation.
///
/// Keeps the sweep inside the sizes the baseline pipelines handle in
/// reasonable time.
#[derive(Debug, Clone)]
pub struct CircuitFilter {
    /// Minimum qubit count (two-qubit metrics need at least 2).
    pub min_qubits: usize,
    /// Maximum qubit count.
    pub max_qubits: usize,
    /// Maximum two-qubit depth of the input circuit.
    pub max_depth: usize,
}

impl Default for CircuitFilter {
    fn default() -> Self {
        Self {
            min_qubits: 2,
            max_qubits: 36,
            max_depth: 800,
        }
    }
}

impl CircuitFilter {
    /// Check whether a circuit should be benchmarked.
    pub fn accepts(&self, circuit: &Circuit) -> bool {
        let qubits = circuit.num_qubits();
        qubits >= self.min_qubits
            && qubits <= self.max_qubits
            && circuit.two_qubit_depth() <= self.max_depth
    }
}

/// A configured benchmark sweep.
pub struct Benchmark {
    transpilers: Vec<Box<dyn Transpiler>>,
    library: CircuitLibrary,
    metrics: Vec<Box<dyn Metric>>,
    trials: usize,
    filter: CircuitFilter,
}

impl Benchmark {
    /// Create a benchmark.
    ///
    /// Transpiler names must be unique; they key the results.
    pub fn new(
        transpilers: Vec<Box<dyn Transpiler>>,
        library: CircuitLibrary,
        metrics: Vec<Box<dyn Metric>>,
        trials: usize,
        filter: CircuitFilter,
    ) -> BenchResult<Self> {
        let mut seen = vec![];
        for transpiler in &transpilers {
            let name = transpiler.name();
            if seen.contains(&name) {
                return Err(BenchError::DuplicateTranspiler(name.to_string()));
            }
            seen.push(name);
        }

        Ok(Self {
            transpilers,
            library,
            metrics,
            trials: trials.max(1),
            filter,
        })
    }

    /// Number of circuits the sweep will consider.
    pub fn circuit_count(&self) -> usize {
        self.library.len()
    }

    /// Names of the configured transpilers.
    pub fn transpiler_names(&self) -> Vec<&str> {
        self.transpilers.iter().map(|t| t.name()).collect()
    }

    /// Run the full sweep.
    pub fn run(&self) -> ResultSet {
        self.run_with_observer(|_| {})
    }

    /// Run the full sweep, calling `observer` with each circuit name as
    /// it completes (progress reporting hook).
    pub fn run_with_observer(&self, mut observer: impl FnMut(&str)) -> ResultSet {
        info!(
            circuits = self.library.len(),
            transpilers = self.transpilers.len(),
            trials = self.trials,
            "running benchmark sweep"
        );

        let mut results = ResultSet::new();

        for name in self.library.names() {
            let circuit = match self.library.get(name) {
                Ok(circuit) => circuit,
                Err(e) => {
                    warn!(circuit = name.as_str(), error = %e, "skipping circuit: load failed");
                    observer(name);
                    continue;
                }
            };

            if !self.filter.accepts(&circuit) {
                debug!(circuit = name.as_str(), "skipping circuit: filtered out");
                observer(name);
                continue;
            }

            self.run_single_circuit(&circuit, &mut results);
            observer(name);
        }

        // Charts compare complete rows; drop circuits any transpiler
        // failed on.
        let names = self.transpiler_names();
        results.retain_complete(&names);

        results
    }

    /// Run every transpiler and metric on one circuit.
    fn run_single_circuit(&self, circuit: &Circuit, results: &mut ResultSet) {
        debug!(circuit = circuit.name(), "benchmarking circuit");

        for transpiler in &self.transpilers {
            for trial in 0..self.trials {
                let (dag, properties) = match transpiler.run(circuit) {
                    Ok(output) => output,
                    Err(e) => {
                        // One failure skips the pairing, not the sweep.
                        warn!(
                            circuit = circuit.name(),
                            transpiler = transpiler.name(),
                            trial,
                            error = %e,
                            "transpilation failed"
                        );
                        break;
                    }
                };

                for metric in &self.metrics {
                    match metric.measure(&dag, &properties) {
                        Ok(value) => {
                            info!(
                                circuit = circuit.name(),
                                transpiler = transpiler.name(),
                                metric = metric.name(),
                                value,
                                "recorded"
                            );
                            results.add_trial(
                                metric.name(),
                                circuit.name(),
                                transpiler.name(),
                                value,
                                metric.use_geometric_mean(),
                                metric.lower_is_better(),
                            );
                        }
                        Err(e) => {
                            warn!(
                                circuit = circuit.name(),
                                transpiler = transpiler.name(),
                                metric = metric.name(),
                                error = %e,
                                "metric failed"
                            );
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::{SyntheticFamily, SyntheticSource};
    use crate::metric::{DepthMetric, SwapCountMetric, TwoQubitCountMetric};
    use crate::runner::PresetTranspiler;
    use crate::source::FilterConfig;
    use grani_compile::{BasisGates, CouplingMap};

    fn library(widths: Vec<u32>) -> CircuitLibrary {
        CircuitLibrary::from_sources(vec![Box::new(SyntheticSource::new(
            vec![SyntheticFamily::Ghz, SyntheticFamily::Qft],
            widths,
            5,
            FilterConfig::default(),
        ))])
    }

    fn preset(level: u8) -> Box<dyn Transpiler> {
        Box::new(PresetTranspiler::new(
            level,
            CouplingMap::linear(8),
            BasisGates::ibm(),
        ))
    }

    #[test]
    fn test_duplicate_transpiler_names_rejected() {
        let result = Benchmark::new(
            vec![preset(1), preset(1)],
            library(vec![4]),
            vec![Box::new(DepthMetric)],
            1,
            CircuitFilter::default(),
        );
        assert!(matches!(result, Err(BenchError::DuplicateTranspiler(_))));
    }

    #[test]
    fn test_sweep_records_all_cells() {
        let benchmark = Benchmark::new(
            vec![preset(0), preset(2)],
            library(vec![4]),
            vec![Box::new(DepthMetric), Box::new(TwoQubitCountMetric)],
            2,
            CircuitFilter::default(),
        )
        .unwrap();

        let results = benchmark.run();

        for metric in ["two_qubit_depth", "two_qubit_gates"] {
            for circuit in ["ghz_n4", "qft_n4"] {
                for transpiler in ["preset_o0", "preset_o2"] {
                    let cell = results.get(metric, circuit, transpiler).unwrap_or_else(|| {
                        panic!("missing cell {metric}/{circuit}/{transpiler}")
                    });
                    assert_eq!(cell.count(), 2);
                }
            }
        }
    }

    #[test]
    fn test_filter_excludes_oversized() {
        let benchmark = Benchmark::new(
            vec![preset(1)],
            library(vec![4, 8]),
            vec![Box::new(DepthMetric)],
            1,
            CircuitFilter {
                min_qubits: 2,
                max_qubits: 4,
                max_depth: 800,
            },
        )
        .unwrap();

        let results = benchmark.run();
        assert!(results.get("two_qubit_depth", "ghz_n4", "preset_o1").is_some());
        assert!(results.get("two_qubit_depth", "ghz_n8", "preset_o1").is_none());
    }

    #[test]
    fn test_failed_transpiler_drops_circuit_rows() {
        // A 3-qubit device cannot hold qft_n4: that pairing fails and
        // the circuit row disappears, while ghz/qft at width 2 survive.
        let small_device = Box::new(PresetTranspiler::new(
            1,
            CouplingMap::linear(3),
            BasisGates::ibm(),
        ));
        let benchmark = Benchmark::new(
            vec![small_device],
            library(vec![2, 4]),
            vec![Box::new(DepthMetric)],
            1,
            CircuitFilter::default(),
        )
        .unwrap();

        let results = benchmark.run();
        assert!(results.get("two_qubit_depth", "ghz_n2", "preset_o1").is_some());
        assert!(results.get("two_qubit_depth", "qft_n4", "preset_o1").is_none());
    }

    #[test]
    fn test_observer_sees_every_circuit() {
        let benchmark = Benchmark::new(
            vec![preset(1)],
            library(vec![2, 4]),
            vec![Box::new(SwapCountMetric)],
            1,
            CircuitFilter::default(),
        )
        .unwrap();

        let mut seen = vec![];
        benchmark.run_with_observer(|name| seen.push(name.to_string()));
        assert_eq!(seen.len(), benchmark.circuit_count());
    }
}
