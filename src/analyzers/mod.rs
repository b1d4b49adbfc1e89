//! External analyzers: their definitions, the registry that names them and
//! the runner that executes them.

pub mod definition;
pub mod registry;
pub mod runner;

pub use definition::AnalyzerDefinition;
pub use registry::{AnalyzerRegistry, Resolved};
pub use runner::{split_output_lines, AnalyzerRunner, Runner};

use std::path::PathBuf;

/// Where an analyzer's program resolves on this machine, if anywhere.
pub fn locate_program(definition: &AnalyzerDefinition) -> Option<PathBuf> {
    which::which(definition.program()).ok()
}
