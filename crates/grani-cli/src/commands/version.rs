//! Version command.

use console::style;

/// Print version information.
pub fn execute() {
    println!(
        "{} {}",
        style("grani").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("transpiler benchmarking over QASM circuit suites");
}
