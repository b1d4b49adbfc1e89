use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::server::ServerSettings;

/// Root configuration structure for codelint, read from `.codelint.toml`
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CodeLintConfig {
    /// Transport settings handed to the command surface
    #[serde(default)]
    pub server: ServerSettings,

    /// Orchestration settings
    #[serde(default)]
    pub analysis: AnalysisSettings,

    /// Extra analyzers registered at startup
    #[serde(default)]
    pub analyzers: Vec<AnalyzerEntry>,
}

/// Analysis behaviour settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisSettings {
    /// Per-analyzer timeout in seconds; no timeout when absent
    #[serde(default)]
    pub timeout_seconds: Option<u64>,

    /// Run selected analyzers concurrently (default: true)
    #[serde(default = "default_parallel")]
    pub parallel: bool,

    /// Suffix given to materialized source files (default: ".py")
    #[serde(default = "default_source_suffix")]
    pub source_suffix: String,

    /// Pre-register the built-in analyzers (default: true)
    #[serde(default = "default_include_defaults")]
    pub include_defaults: bool,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            timeout_seconds: None,
            parallel: default_parallel(),
            source_suffix: default_source_suffix(),
            include_defaults: default_include_defaults(),
        }
    }
}

impl AnalysisSettings {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

fn default_parallel() -> bool {
    true
}

fn default_source_suffix() -> String {
    ".py".to_string()
}

fn default_include_defaults() -> bool {
    true
}

/// An analyzer declared in the configuration file
///
/// ```toml
/// [[analyzers]]
/// name = "flake8"
/// command = ["flake8", "--select=E9,F63"]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalyzerEntry {
    pub name: String,
    pub command: Vec<String>,
}

/// Analyzers registered before any user configuration is applied.
///
/// `pylint -E` reports errors only; whether warnings surface is decided by
/// the fixed arguments of each definition.
pub fn default_analyzers() -> Vec<AnalyzerEntry> {
    vec![AnalyzerEntry {
        name: "pylint".to_string(),
        command: vec!["pylint".to_string(), "-E".to_string()],
    }]
}
