//! Process execution helpers

pub mod subprocess;

pub use subprocess::{find_program, run_captured};
