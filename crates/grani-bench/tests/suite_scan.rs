//! End-to-end suite scanning and sweep over a temporary QASM directory.

use std::fs;

use grani_bench::benchmark::{Benchmark, CircuitFilter};
use grani_bench::metric::{DepthMetric, TwoQubitCountMetric};
use grani_bench::runner::PresetTranspiler;
use grani_bench::source::{CircuitSource, FilterConfig, QasmDirSource};
use grani_bench::{BenchReport, CircuitLibrary};
use grani_compile::{BasisGates, CouplingMap};

const BELL: &str = r#"OPENQASM 2.0;
include "qelib1.inc";
qreg q[2];
creg c[2];
h q[0];
cx q[0], q[1];
measure q -> c;
"#;

const GHZ3: &str = r#"OPENQASM 2.0;
include "qelib1.inc";
qreg q[3];
h q[0];
cx q[0], q[1];
cx q[1], q[2];
"#;

const BROKEN: &str = "OPENQASM 2.0;\nqreg q[2];\nnot_a_gate q[0];\n";

fn write_suite(dir: &std::path::Path) {
    let nested = dir.join("small").join("bell_n2");
    fs::create_dir_all(&nested).unwrap();
    fs::write(nested.join("bell_n2.qasm"), BELL).unwrap();
    // Transpiled outputs next to the source file must be skipped.
    fs::write(nested.join("bell_n2_transpiled.qasm"), BELL).unwrap();

    let medium = dir.join("medium");
    fs::create_dir_all(&medium).unwrap();
    // Non-conventional stem: normalizes to ghz_n3.
    fs::write(medium.join("ghz_3.qasm"), GHZ3).unwrap();
    fs::write(medium.join("broken_n2.qasm"), BROKEN).unwrap();
    fs::write(medium.join("notes.txt"), "not a circuit").unwrap();
}

fn scan(dir: &std::path::Path) -> QasmDirSource {
    QasmDirSource::new(
        "tmp-suite",
        dir,
        &FilterConfig::default(),
        &["_transpiled".to_string()],
    )
    .unwrap()
}

#[test]
fn scan_normalizes_and_skips() {
    let dir = tempfile::tempdir().unwrap();
    write_suite(dir.path());

    let source = scan(dir.path());
    let names = source.circuit_names();
    assert_eq!(names, vec!["bell_n2", "broken_n2", "ghz_n3"]);
}

#[test]
fn load_parses_and_renames() {
    let dir = tempfile::tempdir().unwrap();
    write_suite(dir.path());

    let source = scan(dir.path());
    let circuit = source.load("ghz_n3").unwrap();
    assert_eq!(circuit.name(), "ghz_n3");
    assert_eq!(circuit.num_qubits(), 3);
    assert_eq!(circuit.two_qubit_depth(), 2);

    assert!(source.load("missing_n2").is_err());
    assert!(source.load("broken_n2").is_err());
}

#[test]
fn sweep_over_suite_skips_broken_circuit() {
    let dir = tempfile::tempdir().unwrap();
    write_suite(dir.path());

    let library = CircuitLibrary::from_sources(vec![Box::new(scan(dir.path()))]);
    let benchmark = Benchmark::new(
        vec![
            Box::new(PresetTranspiler::new(
                0,
                CouplingMap::linear(4),
                BasisGates::ibm(),
            )),
            Box::new(PresetTranspiler::new(
                2,
                CouplingMap::linear(4),
                BasisGates::ibm(),
            )),
        ],
        library,
        vec![Box::new(DepthMetric), Box::new(TwoQubitCountMetric)],
        2,
        CircuitFilter::default(),
    )
    .unwrap();

    let results = benchmark.run();

    // The broken file is skipped; both loadable circuits have full rows.
    for circuit in ["bell_n2", "ghz_n3"] {
        for transpiler in ["preset_o0", "preset_o2"] {
            let cell = results
                .get("two_qubit_depth", circuit, transpiler)
                .unwrap_or_else(|| panic!("missing {circuit}/{transpiler}"));
            assert_eq!(cell.count(), 2);
        }
    }
    assert!(results.get("two_qubit_depth", "broken_n2", "preset_o0").is_none());

    // Report round-trips through JSON.
    let report = BenchReport::from_results(&results, 2, vec!["preset_o0".into(), "preset_o2".into()]);
    let json = report.to_json(true).unwrap();
    let parsed: BenchReport = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.rows.len(), report.rows.len());
}
