//! Orchestration entry point.
//!
//! [`OrchestrationService`] resolves a selection of analyzer names against
//! its registry, runs each analyzer once against the target and folds the
//! results into a [`Report`]. One analyzer failing (unknown name, spawn
//! failure, crash, timeout, even a panicking [`Runner`]) never stops the
//! others; only a missing target or a failed source materialization aborts
//! the call, and even then the caller receives a `Report`.

use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use rayon::prelude::*;
use tracing::{info, warn};

use crate::analyzers::{AnalyzerRegistry, AnalyzerRunner, Resolved, Runner};
use crate::config::{default_analyzers, CodeLintConfig};
use crate::core::errors::{Error, Result};
use crate::core::types::{AnalyzerResult, Outcome, RegistrationReceipt, Report};
use crate::io::artifact::ArtifactMaterializer;
use crate::observability::{increment_finished, set_phase, set_progress, set_target, Phase};

/// Target description used for reports on in-memory source.
pub const SOURCE_TARGET: &str = "<source>";

const DEFAULT_SOURCE_SUFFIX: &str = ".py";

pub struct OrchestrationService {
    registry: AnalyzerRegistry,
    runner: Box<dyn Runner>,
    materializer: ArtifactMaterializer,
    parallel: bool,
    source_suffix: String,
}

impl Default for OrchestrationService {
    fn default() -> Self {
        Self::new()
    }
}

impl OrchestrationService {
    /// Service with the built-in analyzers registered.
    pub fn new() -> Self {
        let service = Self::empty();
        for entry in default_analyzers() {
            service.register_or_warn(&entry.name, entry.command);
        }
        service
    }

    /// Service with an empty registry.
    pub fn empty() -> Self {
        Self {
            registry: AnalyzerRegistry::new(),
            runner: Box::new(AnalyzerRunner::new()),
            materializer: ArtifactMaterializer::new(),
            parallel: true,
            source_suffix: DEFAULT_SOURCE_SUFFIX.to_string(),
        }
    }

    /// Build a service from configuration. Invalid analyzer entries are
    /// logged and skipped.
    pub fn from_config(config: &CodeLintConfig) -> Self {
        let settings = &config.analysis;
        let base = if settings.include_defaults {
            Self::new()
        } else {
            Self::empty()
        };
        let service = base
            .with_runner(AnalyzerRunner::new().with_timeout(settings.timeout()))
            .with_parallel(settings.parallel)
            .with_source_suffix(settings.source_suffix.clone());

        for entry in &config.analyzers {
            service.register_or_warn(&entry.name, entry.command.clone());
        }
        service
    }

    pub fn with_runner(mut self, runner: impl Runner + 'static) -> Self {
        self.runner = Box::new(runner);
        self
    }

    pub fn with_materializer(mut self, materializer: ArtifactMaterializer) -> Self {
        self.materializer = materializer;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_source_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.source_suffix = suffix.into();
        self
    }

    pub fn registry(&self) -> &AnalyzerRegistry {
        &self.registry
    }

    /// Run the selected analyzers (all of them when `selected` is `None` or
    /// empty) against the file at `path`.
    pub fn analyze_file<S: AsRef<str>>(
        &self,
        path: impl AsRef<Path>,
        selected: Option<&[S]>,
    ) -> Report {
        let path = path.as_ref();
        let target = path.display().to_string();

        let report = match self.run_selected(path, selected) {
            Ok(results) => Report::completed(target, results),
            Err(e) => {
                warn!(target = %target, error = %e, "analysis aborted");
                Report::aborted(target, &e)
            }
        };
        log_summary(&report);
        report
    }

    /// Analyze in-memory source using the configured suffix hint.
    pub fn analyze_source<S: AsRef<str>>(&self, content: &str, selected: Option<&[S]>) -> Report {
        self.analyze_source_with_suffix(content, &self.source_suffix, selected)
    }

    /// Write `content` to a temporary file, analyze it, and remove the file
    /// before returning. The file is also removed if an analyzer panics
    /// through the runner boundary.
    pub fn analyze_source_with_suffix<S: AsRef<str>>(
        &self,
        content: &str,
        suffix: &str,
        selected: Option<&[S]>,
    ) -> Report {
        let artifact = {
            let _phase = set_phase(Phase::Materialization);
            match self.materializer.materialize(content, suffix) {
                Ok(artifact) => artifact,
                Err(e) => {
                    warn!(error = %e, "could not materialize source");
                    return Report::aborted(SOURCE_TARGET, &e);
                }
            }
        };

        let report = match self.run_selected(artifact.path(), selected) {
            Ok(results) => Report::completed(SOURCE_TARGET, results),
            Err(e) => Report::aborted(SOURCE_TARGET, &e),
        };

        if let Err(e) = artifact.release() {
            warn!(error = %e, "failed to remove temporary artifact");
        }
        log_summary(&report);
        report
    }

    /// Register (or replace) an analyzer.
    pub fn register_analyzer(
        &self,
        name: &str,
        invocation: Vec<String>,
    ) -> Result<RegistrationReceipt> {
        let definition = self.registry.register(name, invocation)?;
        info!(
            analyzer = definition.name(),
            command = %definition.command_line(),
            "registered analyzer"
        );
        Ok(RegistrationReceipt::added(definition.name()))
    }

    pub fn list_analyzers(&self) -> Vec<String> {
        self.registry.list()
    }

    fn register_or_warn(&self, name: &str, invocation: Vec<String>) {
        if let Err(e) = self.registry.register(name, invocation) {
            warn!(analyzer = name, error = %e, "skipping analyzer");
        }
    }

    fn run_selected<S: AsRef<str>>(
        &self,
        path: &Path,
        selected: Option<&[S]>,
    ) -> Result<Vec<AnalyzerResult>> {
        let _target = set_target(path);
        if !path.exists() {
            return Err(Error::target_not_found(path));
        }

        let resolved = {
            let _phase = set_phase(Phase::Resolution);
            self.registry.resolve(selected)
        };

        let _phase = set_phase(Phase::AnalyzerExecution);
        Ok(self.run_all(path, &resolved))
    }

    fn run_all(&self, path: &Path, resolved: &[Resolved]) -> Vec<AnalyzerResult> {
        set_progress(0, resolved.len());

        let run_one = |entry: &Resolved| {
            let result = self.run_isolated(entry, path);
            increment_finished();
            result
        };

        if self.parallel && resolved.len() > 1 {
            resolved.par_iter().map(run_one).collect()
        } else {
            resolved.iter().map(run_one).collect()
        }
    }

    fn run_isolated(&self, entry: &Resolved, path: &Path) -> AnalyzerResult {
        // Context is thread-local; rayon workers need it set again
        let _phase = set_phase(Phase::AnalyzerExecution);
        let _target = set_target(path);

        let definition = match entry {
            Resolved::Known(definition) => definition,
            Resolved::Unknown(name) => {
                warn!(analyzer = %name, "unknown analyzer requested");
                return AnalyzerResult::unknown_analyzer(name);
            }
        };

        panic::catch_unwind(AssertUnwindSafe(|| self.runner.run(definition, path)))
            .unwrap_or_else(|_| {
                warn!(analyzer = definition.name(), "analyzer runner panicked");
                AnalyzerResult::execution_error(definition.name(), "runner panicked")
            })
    }
}

fn log_summary(report: &Report) {
    let _phase = set_phase(Phase::Aggregation);
    info!(
        target = %report.target,
        success = report.success,
        clean = report.count(Outcome::Clean),
        issues = report.count(Outcome::IssuesFound),
        errors = report.count(Outcome::ExecutionError),
        "analysis finished"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::AnalyzerDefinition;
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;
    use std::sync::Arc;

    /// Records the targets it was asked to analyze and replies from a
    /// fixed script keyed by program name.
    #[derive(Default, Clone)]
    struct ScriptedRunner {
        seen: Arc<Mutex<Vec<(String, PathBuf)>>>,
    }

    impl Runner for ScriptedRunner {
        fn run(&self, definition: &AnalyzerDefinition, target: &Path) -> AnalyzerResult {
            self.seen
                .lock()
                .push((definition.name().to_string(), target.to_path_buf()));
            match definition.program() {
                "pass" => AnalyzerResult::clean(definition.name()),
                "fail" => AnalyzerResult::issues_found(
                    definition.name(),
                    definition.fixed_args().to_vec(),
                ),
                "panic" => panic!("scripted runner panic"),
                other => AnalyzerResult::execution_error(definition.name(), other),
            }
        }
    }

    fn cmd(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    fn service_with(runner: &ScriptedRunner) -> OrchestrationService {
        let service = OrchestrationService::empty().with_runner(runner.clone());
        service.register_analyzer("ok", cmd(&["pass"])).unwrap();
        service
            .register_analyzer("bad", cmd(&["fail", "E001: bad thing"]))
            .unwrap();
        service
    }

    fn target_file() -> tempfile::NamedTempFile {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "x = 1\n").unwrap();
        file
    }

    #[test]
    fn test_new_registers_default_analyzer() {
        assert_eq!(OrchestrationService::new().list_analyzers(), vec!["pylint"]);
        assert!(OrchestrationService::empty().list_analyzers().is_empty());
    }

    #[test]
    fn test_missing_target_aborts_without_results() {
        let runner = ScriptedRunner::default();
        let report = service_with(&runner).analyze_file::<&str>("/nonexistent/path", None);

        assert!(!report.success);
        assert!(report.results.is_none());
        assert_eq!(report.message, "File not found: /nonexistent/path");
        assert!(runner.seen.lock().is_empty());
    }

    #[test]
    fn test_runs_all_when_unselected() {
        let runner = ScriptedRunner::default();
        let file = target_file();
        let report = service_with(&runner).analyze_file::<&str>(file.path(), None);

        assert_eq!(report.len(), 2);
        assert!(!report.success);
        assert_eq!(report.result("ok").unwrap().outcome, Outcome::Clean);
        assert_eq!(
            report.result("bad").unwrap().raw_output_lines,
            vec!["E001: bad thing"]
        );
        assert_eq!(
            report.message,
            format!("Analysis completed for {}", file.path().display())
        );
    }

    #[test]
    fn test_unknown_analyzer_does_not_block_others() {
        let runner = ScriptedRunner::default();
        let file = target_file();
        let report = service_with(&runner)
            .analyze_file(file.path(), Some(&["not_registered", "ok"][..]));

        let unknown = report.result("not_registered").unwrap();
        assert_eq!(unknown.outcome, Outcome::ExecutionError);
        assert_eq!(unknown.message, "Unknown analyzer: not_registered");
        assert_eq!(report.result("ok").unwrap().outcome, Outcome::Clean);
        assert!(!report.success);
    }

    #[test]
    fn test_panicking_runner_is_isolated() {
        let runner = ScriptedRunner::default();
        let service = service_with(&runner);
        service.register_analyzer("boom", cmd(&["panic"])).unwrap();
        let file = target_file();

        let report = service.analyze_file::<&str>(file.path(), None);
        assert_eq!(report.len(), 3);
        assert_eq!(
            report.result("boom").unwrap().outcome,
            Outcome::ExecutionError
        );
        assert_eq!(report.result("ok").unwrap().outcome, Outcome::Clean);
    }

    #[test]
    fn test_sequential_and_parallel_agree() {
        let file = target_file();
        let parallel = service_with(&ScriptedRunner::default())
            .with_parallel(true)
            .analyze_file::<&str>(file.path(), None);
        let sequential = service_with(&ScriptedRunner::default())
            .with_parallel(false)
            .analyze_file::<&str>(file.path(), None);
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_source_artifact_removed_after_analysis() {
        let runner = ScriptedRunner::default();
        let report = service_with(&runner).analyze_source("x = 1\n", Some(&["ok"][..]));

        assert!(report.success);
        assert_eq!(report.target, SOURCE_TARGET);
        let seen = runner.seen.lock();
        assert_eq!(seen.len(), 1);
        assert!(!seen[0].1.exists());
        assert!(seen[0]
            .1
            .file_name()
            .unwrap()
            .to_string_lossy()
            .ends_with(".py"));
    }

    #[test]
    fn test_source_artifact_removed_when_runner_panics() {
        let runner = ScriptedRunner::default();
        let service = service_with(&runner);
        service.register_analyzer("boom", cmd(&["panic"])).unwrap();

        let report = service.analyze_source("x = 1\n", Some(&["boom", "bad"][..]));
        assert!(!report.success);
        for (_, path) in runner.seen.lock().iter() {
            assert!(!path.exists());
        }
    }

    #[test]
    fn test_materialization_failure_aborts() {
        let runner = ScriptedRunner::default();
        let report = service_with(&runner)
            .with_materializer(ArtifactMaterializer::in_dir("/nonexistent/codelint/dir"))
            .analyze_source::<&str>("x = 1\n", None);

        assert!(!report.success);
        assert!(report.results.is_none());
        assert!(report.message.starts_with("Failed to materialize source"));
        assert!(runner.seen.lock().is_empty());
    }

    #[test]
    fn test_suffix_hint_is_used() {
        let runner = ScriptedRunner::default();
        service_with(&runner).analyze_source_with_suffix("fn main() {}", ".rs", Some(&["ok"][..]));

        let seen = runner.seen.lock();
        assert!(seen[0].1.to_string_lossy().ends_with(".rs"));
    }

    #[test]
    fn test_register_analyzer_receipt() {
        let service = OrchestrationService::empty();
        let receipt = service.register_analyzer("x", cmd(&["echo"])).unwrap();

        assert!(receipt.success);
        assert_eq!(receipt.message, "Added analyzer: x");
        assert_eq!(service.list_analyzers(), vec!["x"]);
    }

    #[test]
    fn test_invalid_registration_is_rejected() {
        let service = OrchestrationService::empty();
        let err = service.register_analyzer("x", Vec::new()).unwrap_err();

        assert!(matches!(err, Error::InvalidDefinition { .. }));
        assert!(!service.list_analyzers().contains(&"x".to_string()));
    }

    #[test]
    fn test_from_config_registers_entries() {
        let config = crate::config::parse_config(
            "[analysis]\ninclude_defaults = false\nparallel = false\n\n\
             [[analyzers]]\nname = \"flake8\"\ncommand = [\"flake8\"]\n\n\
             [[analyzers]]\nname = \"broken\"\ncommand = []\n",
        )
        .unwrap();

        let service = OrchestrationService::from_config(&config);
        assert_eq!(service.list_analyzers(), vec!["flake8"]);
    }
}
