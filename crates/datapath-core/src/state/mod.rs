//! Architectural state carried across cycles.

/// Register file types and storage model.
pub mod registers;
/// Cycle-to-cycle execution state.
pub mod run_state;

pub use registers::{RegisterFile, RegisterIndex, REGISTER_COUNT};
pub use run_state::RunState;
