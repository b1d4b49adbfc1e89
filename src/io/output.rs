use crate::core::types::{AnalyzerResult, Outcome, Report};
use colored::*;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Markdown,
    Terminal,
}

pub trait OutputWriter {
    fn write_report(&mut self, report: &Report) -> anyhow::Result<()>;
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_report(&mut self, report: &Report) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        writeln!(self.writer, "{}", json)?;
        Ok(())
    }
}

pub struct MarkdownWriter<W: Write> {
    writer: W,
}

impl<W: Write> MarkdownWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn write_result(&mut self, result: &AnalyzerResult) -> anyhow::Result<()> {
        writeln!(self.writer, "### {}", result.analyzer_name)?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "**{}**: {}",
            status_label(result.outcome),
            result.message
        )?;
        if !result.raw_output_lines.is_empty() {
            writeln!(self.writer)?;
            let fence = code_fence(&result.raw_output_lines);
            writeln!(self.writer, "{}text", fence)?;
            for line in &result.raw_output_lines {
                writeln!(self.writer, "{}", line)?;
            }
            writeln!(self.writer, "{}", fence)?;
        }
        writeln!(self.writer)?;
        Ok(())
    }
}

impl<W: Write> OutputWriter for MarkdownWriter<W> {
    fn write_report(&mut self, report: &Report) -> anyhow::Result<()> {
        writeln!(self.writer, "# Code Lint Report")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "- Target: `{}`", report.target)?;
        writeln!(
            self.writer,
            "- Result: {}",
            if report.success { "passed" } else { "failed" }
        )?;
        writeln!(self.writer, "- {}", report.message)?;
        writeln!(self.writer)?;

        if let Some(results) = &report.results {
            writeln!(self.writer, "## Analyzers")?;
            writeln!(self.writer)?;
            for result in results.values() {
                self.write_result(result)?;
            }
        }
        Ok(())
    }
}

pub struct TerminalWriter<W: Write> {
    writer: W,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn write_result(&mut self, result: &AnalyzerResult) -> anyhow::Result<()> {
        let marker = match result.outcome {
            Outcome::Clean => "✓".green(),
            Outcome::IssuesFound => "✗".yellow(),
            Outcome::ExecutionError => "!".red(),
        };
        writeln!(
            self.writer,
            "  {} {}  {}",
            marker,
            result.analyzer_name.bold(),
            result.message
        )?;
        for line in &result.raw_output_lines {
            writeln!(self.writer, "      {}", line)?;
        }
        Ok(())
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_report(&mut self, report: &Report) -> anyhow::Result<()> {
        writeln!(self.writer, "{} {}", "codelint:".bold(), report.target)?;

        let Some(results) = &report.results else {
            writeln!(self.writer, "  {} {}", "!".red(), report.message)?;
            return Ok(());
        };

        for result in results.values() {
            self.write_result(result)?;
        }

        let summary = format!(
            "{} ({} clean, {} with issues, {} failed)",
            report.message,
            report.count(Outcome::Clean),
            report.count(Outcome::IssuesFound),
            report.count(Outcome::ExecutionError)
        );
        if report.success {
            writeln!(self.writer, "{}", summary.green())?;
        } else {
            writeln!(self.writer, "{}", summary.red())?;
        }
        Ok(())
    }
}

/// A backtick fence longer than any backtick run inside `lines`.
fn code_fence(lines: &[String]) -> String {
    let longest_run = lines
        .iter()
        .flat_map(|line| line.split(|c| c != '`'))
        .map(str::len)
        .max()
        .unwrap_or(0);
    "`".repeat(longest_run.max(2) + 1)
}

fn status_label(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Clean => "clean",
        Outcome::IssuesFound => "issues found",
        Outcome::ExecutionError => "error",
    }
}

pub fn create_writer(format: OutputFormat) -> Box<dyn OutputWriter> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(std::io::stdout())),
        OutputFormat::Markdown => Box::new(MarkdownWriter::new(std::io::stdout())),
        OutputFormat::Terminal => Box::new(TerminalWriter::new(std::io::stdout())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::Error;

    fn sample_report() -> Report {
        Report::completed(
            "/tmp/a.py",
            vec![
                AnalyzerResult::clean("ok"),
                AnalyzerResult::issues_found("bad", vec!["E001: bad thing".into()]),
                AnalyzerResult::unknown_analyzer("ghost"),
            ],
        )
    }

    fn render<W: OutputWriter>(writer: W, report: &Report) -> W {
        let mut writer = writer;
        writer.write_report(report).unwrap();
        writer
    }

    fn json(report: &Report) -> String {
        String::from_utf8(render(JsonWriter::new(Vec::new()), report).writer).unwrap()
    }

    fn markdown(report: &Report) -> String {
        String::from_utf8(render(MarkdownWriter::new(Vec::new()), report).writer).unwrap()
    }

    fn terminal(report: &Report) -> String {
        String::from_utf8(render(TerminalWriter::new(Vec::new()), report).writer).unwrap()
    }

    #[test]
    fn test_json_output_round_trips_as_value() {
        let out = json(&sample_report());
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(value["success"], false);
        assert_eq!(value["results"]["bad"]["issues"][0], "E001: bad thing");
        assert_eq!(value["results"]["ok"]["success"], true);
        assert_eq!(value["message"], "Analysis completed for /tmp/a.py");
    }

    #[test]
    fn test_markdown_output_lists_issues() {
        let out = markdown(&sample_report());

        assert!(out.starts_with("# Code Lint Report"));
        assert!(out.contains("### bad"));
        assert!(out.contains("**issues found**: bad found issues"));
        assert!(out.contains("E001: bad thing"));
        assert!(out.contains("**error**: Unknown analyzer: ghost"));
    }

    #[test]
    fn test_markdown_fence_outlasts_backticks_in_issues() {
        let report = Report::completed(
            "/tmp/a.md",
            vec![AnalyzerResult::issues_found(
                "docs",
                vec!["```".into(), "unterminated ```` block".into()],
            )],
        );
        let out = markdown(&report);

        assert!(out.contains("`````text\n```\nunterminated ```` block\n`````\n"));
        assert_eq!(code_fence(&["plain".to_string()]), "```");
    }

    #[test]
    fn test_terminal_output_contains_messages() {
        let out = terminal(&sample_report());

        assert!(out.contains("No issues found by ok"));
        assert!(out.contains("      E001: bad thing"));
        assert!(out.contains("Unknown analyzer: ghost"));
        assert!(out.contains("1 clean, 1 with issues, 1 failed"));
    }

    #[test]
    fn test_terminal_output_for_aborted_report() {
        let report = Report::aborted("/missing", &Error::target_not_found("/missing"));
        let out = terminal(&report);
        assert!(out.contains("File not found: /missing"));
    }
}
