// Export modules for library usage
pub mod analyzers;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod io;
pub mod observability;
pub mod service;

// Re-export commonly used types
pub use crate::core::{AnalyzerResult, Error, Outcome, RegistrationReceipt, Report, Result};

pub use crate::analyzers::{
    AnalyzerDefinition, AnalyzerRegistry, AnalyzerRunner, Resolved, Runner,
};

pub use crate::config::{load_config, CodeLintConfig, ServerConfig, Transport};

pub use crate::io::artifact::{ArtifactMaterializer, TemporaryArtifact};
pub use crate::io::output::{create_writer, OutputFormat, OutputWriter};

pub use crate::service::{OrchestrationService, SOURCE_TARGET};
