//! Custom panic hook for structured crash reports.
//!
//! When codelint crashes the report names the phase, the target artifact
//! and the analyzer that was executing, plus how many analyzers had
//! finished.

use super::context::{get_current_context, get_progress, OperationContext};
use std::panic::PanicHookInfo;
use tracing::Span;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const WIDTH: usize = 78;

/// Install the custom panic hook.
///
/// Call early in `main()`, before any analysis begins.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        print_crash_report(info);
    }));
}

fn print_crash_report(info: &PanicHookInfo<'_>) {
    let context = get_current_context();
    let (finished, total) = get_progress();

    eprintln!();
    for line in crash_report_lines(info, &context, finished, total) {
        eprintln!("{}", line);
    }
    if std::env::var("RUST_BACKTRACE").is_ok() {
        eprintln!();
        eprintln!("{}", std::backtrace::Backtrace::capture());
    }
}

fn crash_report_lines(
    info: &PanicHookInfo<'_>,
    context: &OperationContext,
    finished: usize,
    total: usize,
) -> Vec<String> {
    let mut lines = header_lines();

    lines.push(boxed(&format!("PANIC: {}", extract_panic_message(info))));
    if let Some(location) = info.location() {
        lines.push(boxed(&format!(
            "Location: {}:{}:{}",
            location.file(),
            location.line(),
            location.column()
        )));
    }

    lines.push(rule('╠', '╣'));
    lines.extend(context_lines(context, finished, total));

    if let Some(metadata) = Span::current().metadata() {
        lines.push(boxed(&format!("  Span: {}", metadata.name())));
    }

    lines.push(rule('╠', '╣'));
    if std::env::var("RUST_BACKTRACE").is_ok() {
        lines.push(boxed("STACK TRACE follows"));
    } else {
        lines.push(boxed("Run with RUST_BACKTRACE=1 for stack trace"));
    }
    lines.push(rule('╚', '╝'));
    lines
}

fn header_lines() -> Vec<String> {
    let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
    vec![
        rule('╔', '╗'),
        boxed("CODELINT CRASH REPORT"),
        rule('╠', '╣'),
        boxed(&format!("Version: {}", VERSION)),
        boxed(&format!("Platform: {}", std::env::consts::OS)),
        boxed(&format!("Time: {}", timestamp)),
        rule('╠', '╣'),
    ]
}

fn context_lines(context: &OperationContext, finished: usize, total: usize) -> Vec<String> {
    let mut lines = vec![boxed("OPERATION CONTEXT:")];

    match &context.phase {
        Some(phase) => lines.push(boxed(&format!("  Phase: {}", phase))),
        None => lines.push(boxed("  Phase: (not set - crash occurred before analysis started)")),
    }
    if let Some(target) = &context.target {
        lines.push(boxed(&format!("  Target: {}", target.display())));
    }
    if let Some(analyzer) = &context.analyzer {
        lines.push(boxed(&format!("  Analyzer: {}", analyzer)));
    }
    if total > 0 {
        lines.push(boxed(&format!(
            "  Progress: {} / {} analyzers",
            finished, total
        )));
    }
    lines
}

fn rule(left: char, right: char) -> String {
    format!("{}{}{}", left, "═".repeat(WIDTH), right)
}

fn boxed(text: &str) -> String {
    let inner = WIDTH - 2;
    format!("║  {:<width$}║", truncate(text, inner), width = inner)
}

fn extract_panic_message(info: &PanicHookInfo<'_>) -> String {
    if let Some(s) = info.payload().downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = info.payload().downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
