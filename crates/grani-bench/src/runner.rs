//! The transpiler wrapper: staged pipelines around the pass manager.
//!
//! A [`Transpiler`] is three pass-manager stages run in sequence over
//! one property set, so properties written by the pre stage (a layout,
//! say) are visible when the main stage is built and run. The provided
//! [`Transpiler::run`] times each stage and the whole pipeline and
//! leaves the timings in the property set for the runtime metric.

use std::time::{Duration, Instant};

use tracing::debug;

use grani_compile::{BasisGates, CouplingMap, PassManager, PassManagerBuilder, PropertySet};
use grani_ir::{Circuit, CircuitDag};

use crate::error::BenchResult;

/// Wall-clock timings for one transpiler run.
#[derive(Debug, Clone, Default)]
pub struct RunTimings {
    /// Per-stage durations, in execution order.
    pub stages: Vec<(String, Duration)>,
    /// Total pipeline duration.
    pub total: Duration,
}

/// A configured transpilation pipeline under benchmark.
///
/// Implementations provide the three stage builders; the harness calls
/// [`run`](Transpiler::run), which owns the shared-property-set
/// plumbing. Every run starts from a fresh property set, so no state
/// leaks between circuits or trials.
pub trait Transpiler {
    /// Unique name of this transpiler within a benchmark.
    fn name(&self) -> &str;

    /// Properties every run starts from (target coupling map, basis).
    fn base_properties(&self) -> PropertySet {
        PropertySet::new()
    }

    /// Build the pre-process stage. Defaults to empty.
    fn build_pre_stage(&self) -> PassManager {
        PassManager::new()
    }

    /// Build the main-process stage.
    fn build_main_stage(&self) -> PassManager;

    /// Build the post-process stage. Defaults to empty.
    fn build_post_stage(&self) -> PassManager {
        PassManager::new()
    }

    /// Run the staged pipeline on a circuit.
    ///
    /// Returns the transpiled DAG together with the final property set
    /// (layout, swap counts, timings) for the metrics to read.
    fn run(&self, circuit: &Circuit) -> BenchResult<(CircuitDag, PropertySet)> {
        let mut properties = self.base_properties();
        let mut dag = circuit.clone().into_dag();
        let mut timings = RunTimings::default();

        let pipeline_start = Instant::now();
        let stages = [
            ("pre", self.build_pre_stage()),
            ("main", self.build_main_stage()),
            ("post", self.build_post_stage()),
        ];
        for (label, stage) in stages {
            let stage_start = Instant::now();
            stage.run(&mut dag, &mut properties)?;
            let elapsed = stage_start.elapsed();
            debug!(
                transpiler = self.name(),
                stage = label,
                ms = elapsed.as_secs_f64() * 1e3,
                "stage complete"
            );
            timings.stages.push((label.to_string(), elapsed));
        }
        timings.total = pipeline_start.elapsed();
        properties.insert(timings);

        Ok((dag, properties))
    }
}

/// Baseline transpiler: the preset optimization levels of the pipeline
/// against a fixed target.
pub struct PresetTranspiler {
    name: String,
    optimization_level: u8,
    coupling_map: CouplingMap,
    basis_gates: BasisGates,
}

impl PresetTranspiler {
    /// Create a preset transpiler named after its level.
    pub fn new(optimization_level: u8, coupling_map: CouplingMap, basis_gates: BasisGates) -> Self {
        Self {
            name: format!("preset_o{optimization_level}"),
            optimization_level,
            coupling_map,
            basis_gates,
        }
    }

    /// Override the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl Transpiler for PresetTranspiler {
    fn name(&self) -> &str {
        &self.name
    }

    fn build_main_stage(&self) -> PassManager {
        let (pm, _) = PassManagerBuilder::new()
            .with_optimization_level(self.optimization_level)
            .with_target(self.coupling_map.clone(), self.basis_gates.clone())
            .build();
        pm
    }

    fn base_properties(&self) -> PropertySet {
        PropertySet::new().with_target(self.coupling_map.clone(), self.basis_gates.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grani_compile::SwapCount;
    use grani_ir::QubitId;

    #[test]
    fn test_preset_run_produces_timings() {
        let transpiler = PresetTranspiler::new(1, CouplingMap::linear(4), BasisGates::ibm());
        let circuit = Circuit::ghz(4).unwrap();

        let (dag, props) = transpiler.run(&circuit).unwrap();
        assert!(dag.num_ops() > 0);

        let timings = props.get::<RunTimings>().unwrap();
        assert_eq!(timings.stages.len(), 3);
        assert!(timings.total >= timings.stages[1].1);
    }

    #[test]
    fn test_preset_respects_basis() {
        let transpiler = PresetTranspiler::new(1, CouplingMap::linear(4), BasisGates::ibm());
        let circuit = Circuit::ghz(3).unwrap();

        let (dag, props) = transpiler.run(&circuit).unwrap();
        let basis = props.basis_gates.as_ref().unwrap();
        for (_, inst) in dag.topological_ops() {
            assert!(basis.contains(inst.name()), "{} not in basis", inst.name());
        }
    }

    #[test]
    fn test_runs_are_independent() {
        // A distant CX forces routing; the second run must see a fresh
        // layout and produce the identical result.
        let transpiler = PresetTranspiler::new(0, CouplingMap::linear(4), BasisGates::ibm());
        let mut circuit = Circuit::with_size("far_cx", 4, 0);
        circuit.cx(QubitId(0), QubitId(3)).unwrap();

        let (dag1, props1) = transpiler.run(&circuit).unwrap();
        let (dag2, props2) = transpiler.run(&circuit).unwrap();
        assert_eq!(dag1.num_ops(), dag2.num_ops());
        assert_eq!(
            props1.get::<SwapCount>().unwrap(),
            props2.get::<SwapCount>().unwrap()
        );
    }

    #[test]
    fn test_custom_staged_transpiler() {
        struct WithPost {
            inner: PresetTranspiler,
        }

        impl Transpiler for WithPost {
            fn name(&self) -> &'static str {
                "staged"
            }

            fn base_properties(&self) -> PropertySet {
                self.inner.base_properties()
            }

            fn build_main_stage(&self) -> PassManager {
                self.inner.build_main_stage()
            }

            fn build_post_stage(&self) -> PassManager {
                let mut pm = PassManager::new();
                pm.add_pass(grani_compile::passes::CancelAdjacentGates);
                pm
            }
        }

        let transpiler = WithPost {
            inner: PresetTranspiler::new(1, CouplingMap::full(3), BasisGates::universal()),
        };
        let mut circuit = Circuit::with_size("pair", 2, 0);
        circuit.cx(QubitId(0), QubitId(1)).unwrap();
        circuit.cx(QubitId(0), QubitId(1)).unwrap();

        let (dag, _) = transpiler.run(&circuit).unwrap();
        assert_eq!(dag.count_named("cx"), 0);
    }
}
