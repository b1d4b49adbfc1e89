use anyhow::{Context, Result};
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::core::types::Report;
use crate::io::output::{create_writer, OutputFormat};
use crate::observability::{set_phase, Phase};
use crate::service::OrchestrationService;

/// Exit code for a finished report: 0 when every analyzer came back clean.
pub fn report_exit_code(report: &Report) -> i32 {
    if report.success {
        0
    } else {
        1
    }
}

pub fn handle_analyze_file(
    service: &OrchestrationService,
    path: &Path,
    analyzers: Option<&[String]>,
    format: OutputFormat,
) -> Result<i32> {
    let report = service.analyze_file(path, analyzers);
    emit(&report, format)
}

/// Analyze source read from `input`, or from stdin when `input` is `None`.
pub fn handle_analyze_code(
    service: &OrchestrationService,
    input: Option<PathBuf>,
    suffix: &str,
    analyzers: Option<&[String]>,
    format: OutputFormat,
) -> Result<i32> {
    let content = read_source(input.as_deref())?;
    let report = service.analyze_source_with_suffix(&content, suffix, analyzers);
    emit(&report, format)
}

fn read_source(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read source from {}", path.display())),
        None => {
            let mut content = String::new();
            std::io::stdin()
                .read_to_string(&mut content)
                .context("Failed to read source from stdin")?;
            Ok(content)
        }
    }
}

fn emit(report: &Report, format: OutputFormat) -> Result<i32> {
    let _phase = set_phase(Phase::OutputGeneration);
    create_writer(format).write_report(report)?;
    Ok(report_exit_code(report))
}
