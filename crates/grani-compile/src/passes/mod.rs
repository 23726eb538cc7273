//! Built-in compilation passes.

pub mod layout;
pub mod optimization;
pub mod routing;
pub mod translation;

pub use layout::TrivialLayout;
pub use optimization::{CancelAdjacentGates, Optimize1qGates};
pub use routing::{BasicRouting, SwapCount};
pub use translation::BasisTranslation;
