//! Metric interfaces and the provided metrics.
//!
//! A metric reads the transpiled DAG and the final property set of one
//! run and produces a single number. Lower is better for everything
//! shipped here; the flag exists so a fidelity-style metric can flip it.

use grani_compile::{PropertySet, SwapCount};
use grani_ir::CircuitDag;

use crate::error::{BenchError, BenchResult};
use crate::runner::RunTimings;

/// A metric computed per (circuit, transpiler) run.
pub trait Metric {
    /// Machine name, used as the report key.
    fn name(&self) -> &str;

    /// Human-readable name, used as the chart axis label.
    fn pretty_name(&self) -> &str;

    /// Whether smaller values are better.
    fn lower_is_better(&self) -> bool {
        true
    }

    /// Whether trials average with the geometric mean.
    fn use_geometric_mean(&self) -> bool {
        false
    }

    /// Compute the metric for one transpiled circuit.
    fn measure(&self, dag: &CircuitDag, properties: &PropertySet) -> BenchResult<f64>;
}

/// Two-qubit depth: the length of the longest dependency chain of
/// two-qubit operations. The headline metric of the harness.
pub struct DepthMetric;

impl Metric for DepthMetric {
    fn name(&self) -> &'static str {
        "two_qubit_depth"
    }

    fn pretty_name(&self) -> &'static str {
        "Average Depth"
    }

    fn use_geometric_mean(&self) -> bool {
        true
    }

    fn measure(&self, dag: &CircuitDag, _properties: &PropertySet) -> BenchResult<f64> {
        Ok(dag.two_qubit_depth() as f64)
    }
}

/// Total number of two-qubit gates after transpilation.
pub struct TwoQubitCountMetric;

impl Metric for TwoQubitCountMetric {
    fn name(&self) -> &'static str {
        "two_qubit_gates"
    }

    fn pretty_name(&self) -> &'static str {
        "Total 2Q Gates"
    }

    fn use_geometric_mean(&self) -> bool {
        true
    }

    fn measure(&self, dag: &CircuitDag, _properties: &PropertySet) -> BenchResult<f64> {
        Ok(dag.num_two_qubit_ops() as f64)
    }
}

/// SWAP gates inserted by routing.
///
/// Reads the routing pass's property; a pipeline that never routed
/// scores zero.
pub struct SwapCountMetric;

impl Metric for SwapCountMetric {
    fn name(&self) -> &'static str {
        "inserted_swaps"
    }

    fn pretty_name(&self) -> &'static str {
        "Inserted SWAPs"
    }

    fn measure(&self, _dag: &CircuitDag, properties: &PropertySet) -> BenchResult<f64> {
        Ok(properties.get::<SwapCount>().map_or(0, |s| s.0) as f64)
    }
}

/// Total transpile wall time in seconds.
///
/// Reads the timing record the runner leaves in the property set; no
/// DAG inspection at all.
pub struct RuntimeMetric;

impl Metric for RuntimeMetric {
    fn name(&self) -> &'static str {
        "transpile_seconds"
    }

    fn pretty_name(&self) -> &'static str {
        "Transpile Time (s)"
    }

    fn measure(&self, _dag: &CircuitDag, properties: &PropertySet) -> BenchResult<f64> {
        let timings =
            properties
                .get::<RunTimings>()
                .ok_or_else(|| BenchError::MetricUnavailable {
                    metric: "transpile_seconds".into(),
                    reason: "no timing record in the property set".into(),
                })?;
        Ok(timings.total.as_secs_f64())
    }
}

/// Look up a provided metric by its machine name.
pub fn metric_by_name(name: &str) -> Option<Box<dyn Metric>> {
    match name {
        "two_qubit_depth" => Some(Box::new(DepthMetric)),
        "two_qubit_gates" => Some(Box::new(TwoQubitCountMetric)),
        "inserted_swaps" => Some(Box::new(SwapCountMetric)),
        "transpile_seconds" => Some(Box::new(RuntimeMetric)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grani_ir::Circuit;

    #[test]
    fn test_depth_metric_counts_two_qubit_chain() {
        let circuit = Circuit::ghz(4).unwrap();
        let value = DepthMetric
            .measure(circuit.dag(), &PropertySet::new())
            .unwrap();
        assert_eq!(value, 3.0); // the CX cascade
    }

    #[test]
    fn test_two_qubit_count() {
        let circuit = Circuit::qft(3).unwrap();
        let value = TwoQubitCountMetric
            .measure(circuit.dag(), &PropertySet::new())
            .unwrap();
        assert_eq!(value, 4.0); // 3 cu1 + 1 swap
    }

    #[test]
    fn test_swap_count_defaults_to_zero() {
        let circuit = Circuit::bell().unwrap();
        let value = SwapCountMetric
            .measure(circuit.dag(), &PropertySet::new())
            .unwrap();
        assert_eq!(value, 0.0);
    }

    #[test]
    fn test_runtime_metric_requires_timings() {
        let circuit = Circuit::bell().unwrap();
        let result = RuntimeMetric.measure(circuit.dag(), &PropertySet::new());
        assert!(matches!(
            result,
            Err(BenchError::MetricUnavailable { .. })
        ));
    }

    #[test]
    fn test_metric_registry() {
        assert!(metric_by_name("two_qubit_depth").is_some());
        assert!(metric_by_name("transpile_seconds").is_some());
        assert!(metric_by_name("fidelity").is_none());
    }
}
