//! Grani Transpilation Pipeline
//!
//! Pass-based compilation of benchmark circuits toward hardware targets.
//! The benchmark harness wraps this pipeline through its transpiler
//! interface; everything here is also usable standalone.
//!
//! # Architecture
//!
//! ```text
//! Input Circuit
//!       │
//!       ▼
//! ┌─────────────┐
//! │ PassManager │ ◄── PropertySet (coupling map, basis gates, layout)
//! └─────────────┘
//!       │
//!       ├── TrivialLayout
//!       ├── BasicRouting
//!       ├── BasisTranslation
//!       └── Optimize1qGates / CancelAdjacentGates
//!       │
//!       ▼
//! Output Circuit (target-compatible)
//! ```
//!
//! # Example
//!
//! ```rust
//! use grani_compile::{PassManagerBuilder, CouplingMap, BasisGates};
//! use grani_ir::Circuit;
//!
//! let circuit = Circuit::ghz(4).unwrap();
//!
//! let (pm, mut props) = PassManagerBuilder::new()
//!     .with_optimization_level(2)
//!     .with_target(CouplingMap::linear(5), BasisGates::ibm())
//!     .build();
//!
//! let mut dag = circuit.into_dag();
//! pm.run(&mut dag, &mut props).unwrap();
//! ```
//!
//! # Optimization Levels
//!
//! | Level | Passes Included |
//! |-------|-----------------|
//! | 0 | Layout + routing only |
//! | 1 | + Basis translation |
//! | 2 | + Single-qubit rotation merging |
//! | 3 | + Adjacent-gate cancellation |
//!
//! Custom passes implement the [`Pass`] trait and slot into a
//! [`PassManager`] alongside the built-ins.

pub mod error;
pub mod manager;
pub mod pass;
pub mod property;

pub mod passes;

pub use error::{CompileError, CompileResult};
pub use manager::{PassManager, PassManagerBuilder};
pub use pass::{Pass, PassKind};
pub use passes::SwapCount;
pub use property::{BasisGates, CouplingMap, Layout, PropertySet};
