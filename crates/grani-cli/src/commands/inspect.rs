//! Inspect command: metrics for a single QASM file.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use console::style;

use grani_bench::PresetTranspiler;
use grani_bench::Transpiler;
use grani_compile::{BasisGates, CouplingMap, SwapCount};
use grani_ir::{Circuit, CircuitDag};

/// Execute the inspect command.
pub fn execute(input: &str, level: Option<u8>, output: Option<&str>) -> Result<()> {
    let path = Path::new(input);
    if !path.exists() {
        bail!("input file not found: {input}");
    }

    let source = fs::read_to_string(path).with_context(|| format!("reading {input}"))?;
    let mut circuit = grani_qasm::parse(&source).with_context(|| format!("parsing {input}"))?;
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "circuit".to_string());
    circuit.set_name(&stem);

    println!(
        "{} {} ({} qubits)",
        style("→").cyan().bold(),
        style(circuit.name()).green(),
        circuit.num_qubits()
    );
    print_metrics("input", circuit.dag());

    let Some(level) = level else {
        return Ok(());
    };

    // Size a linear device to the circuit for a self-contained readout.
    let device_qubits = u32::try_from(circuit.num_qubits()).unwrap_or(u32::MAX);
    let transpiler = PresetTranspiler::new(
        level,
        CouplingMap::linear(device_qubits),
        BasisGates::ibm(),
    );
    let (dag, props) = transpiler
        .run(&circuit)
        .with_context(|| format!("transpiling at level {level}"))?;

    println!(
        "{} Transpiled at level {} (linear topology, ibm basis)",
        style("✓").green().bold(),
        level
    );
    print_metrics("output", &dag);
    if let Some(SwapCount(swaps)) = props.get::<SwapCount>() {
        println!("  inserted swaps:  {swaps}");
    }

    if let Some(output) = output {
        let transpiled = Circuit::from_dag(format!("{stem}_transpiled"), dag);
        let qasm = grani_qasm::emit(&transpiled)?;
        fs::write(output, qasm).with_context(|| format!("writing {output}"))?;
        println!(
            "{} Output: {}",
            style("✓").green().bold(),
            style(output).green()
        );
    }

    Ok(())
}

fn print_metrics(label: &str, dag: &CircuitDag) {
    println!("  {label}: {} ops", dag.num_ops());
    println!("    full depth:      {}", dag.depth());
    println!("    2q depth:        {}", dag.two_qubit_depth());
    println!("    2q gates:        {}", dag.num_two_qubit_ops());

    let mut counts: Vec<(String, usize)> = dag.count_ops().into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    let rendered: Vec<String> = counts
        .into_iter()
        .map(|(name, count)| format!("{name}×{count}"))
        .collect();
    println!("    gates:           {}", rendered.join(" "));
}
