//! List command: show the circuits a configuration can see.

use anyhow::{Context, Result};
use console::style;

use grani_bench::{CircuitLibrary, RunConfig};

/// Execute the list command.
pub fn execute(config_path: &str, detail: bool) -> Result<()> {
    let config = RunConfig::from_yaml_file(config_path)
        .with_context(|| format!("loading config {config_path}"))?;
    let sources = config.build_sources().context("building sources")?;
    let library = if config.circuits.is_empty() {
        CircuitLibrary::from_sources(sources)
    } else {
        CircuitLibrary::new(sources, config.circuits.clone())?
    };

    println!(
        "{} {} circuits",
        style("→").cyan().bold(),
        style(library.len()).green()
    );

    if detail {
        println!("  {:<28} {:>7} {:>10}", "circuit", "qubits", "2q depth");
        for name in library.names() {
            match library.get(name) {
                Ok(circuit) => println!(
                    "  {:<28} {:>7} {:>10}",
                    name,
                    circuit.num_qubits(),
                    circuit.two_qubit_depth()
                ),
                Err(e) => println!("  {:<28} {}", name, style(format!("({e})")).red()),
            }
        }
    } else {
        for name in library.names() {
            println!("  {name}");
        }
    }

    Ok(())
}
