//! Grani Benchmark Harness
//!
//! Comparative benchmarking of transpilation pipelines over suites of
//! static QASM circuits. The harness is glue by design: circuit sources
//! feed a staged transpiler wrapper around the [`grani_compile`] pass
//! manager, metrics read each transpiled result, and the collected
//! values render as grouped bar charts and a JSON report.
//!
//! # Architecture
//!
//! ```text
//! [suite dirs]──QasmDirSource──┐
//! [generators]─SyntheticSource─┤
//!                              ▼
//!                       CircuitLibrary
//!                              │
//!                              ▼
//!   Benchmark ──► Transpiler::run (pre │ main │ post stages)
//!      │                       │
//!      │              Metric::measure per run
//!      ▼                       │
//!   ResultSet ◄────────────────┘
//!      │
//!      ├──► render::bar_chart (SVG per metric)
//!      └──► BenchReport (JSON)
//! ```
//!
//! # Example
//!
//! ```rust
//! use grani_bench::benchmark::{Benchmark, CircuitFilter};
//! use grani_bench::generate::{SyntheticFamily, SyntheticSource};
//! use grani_bench::library::CircuitLibrary;
//! use grani_bench::metric::DepthMetric;
//! use grani_bench::runner::PresetTranspiler;
//! use grani_bench::source::FilterConfig;
//! use grani_compile::{BasisGates, CouplingMap};
//!
//! let library = CircuitLibrary::from_sources(vec![Box::new(SyntheticSource::new(
//!     vec![SyntheticFamily::Ghz],
//!     vec![4, 6],
//!     7,
//!     FilterConfig::default(),
//! ))]);
//!
//! let benchmark = Benchmark::new(
//!     vec![
//!         Box::new(PresetTranspiler::new(0, CouplingMap::linear(8), BasisGates::ibm())),
//!         Box::new(PresetTranspiler::new(3, CouplingMap::linear(8), BasisGates::ibm())),
//!     ],
//!     library,
//!     vec![Box::new(DepthMetric)],
//!     3,
//!     CircuitFilter::default(),
//! )
//! .unwrap();
//!
//! let results = benchmark.run();
//! assert!(!results.is_empty());
//! ```

pub mod benchmark;
pub mod config;
pub mod error;
pub mod generate;
pub mod library;
pub mod metric;
pub mod render;
pub mod report;
pub mod results;
pub mod runner;
pub mod source;

pub use benchmark::{Benchmark, CircuitFilter};
pub use config::RunConfig;
pub use error::{BenchError, BenchResult};
pub use library::CircuitLibrary;
pub use metric::{DepthMetric, Metric, RuntimeMetric, SwapCountMetric, TwoQubitCountMetric};
pub use report::BenchReport;
pub use results::{Aggregate, ResultSet};
pub use runner::{PresetTranspiler, RunTimings, Transpiler};
pub use source::{CircuitSource, FilterConfig, QasmDirSource};
