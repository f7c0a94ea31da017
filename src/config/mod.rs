//! Launcher configuration
//!
//! - `profiles` - compiler/mode enums and the command template table
//! - `selection` - resolving command-line selectors into one (compiler, mode)

pub mod profiles;
pub mod selection;

pub use profiles::{BuildMode, Compiler, ProfileTable, OVERRIDE_FILE};
pub use selection::Selection;

/// Name of the directory that marks the project root
pub const PROJECT_NAME: &str = "TerraCraft";
