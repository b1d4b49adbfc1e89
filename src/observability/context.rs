//! Thread-local context tracking for crash reports.
//!
//! Records which phase of an analysis call is running, which target is
//! being analyzed and which analyzer is executing. Uses thread-local
//! storage for per-thread context (works with rayon parallel iterators)
//! and atomic counters for global analyzer progress.
//!
//! ## Thread Safety
//!
//! - Thread-local context: Each thread has its own context (via `thread_local!`)
//! - Global progress: Atomic counters for analyzers finished/total
//! - Context guards use RAII for automatic cleanup on drop

use std::cell::RefCell;
use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

static ANALYZERS_FINISHED: AtomicUsize = AtomicUsize::new(0);
static ANALYZERS_TOTAL: AtomicUsize = AtomicUsize::new(0);

thread_local! {
    static CURRENT_CONTEXT: RefCell<OperationContext> = const { RefCell::new(OperationContext::new()) };
}

/// Context snapshot for the current operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationContext {
    pub phase: Option<Phase>,
    /// Artifact currently being analyzed
    pub target: Option<PathBuf>,
    /// Analyzer currently executing on this thread
    pub analyzer: Option<String>,
}

impl OperationContext {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: None,
            target: None,
            analyzer: None,
        }
    }
}

/// Stages of an analysis call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Writing in-memory source to a temporary artifact
    Materialization,
    /// Looking up the selected analyzers in the registry
    Resolution,
    /// Running analyzer processes
    AnalyzerExecution,
    /// Folding analyzer results into a report
    Aggregation,
    /// Rendering the report
    OutputGeneration,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Materialization => write!(f, "materialization"),
            Self::Resolution => write!(f, "resolution"),
            Self::AnalyzerExecution => write!(f, "analyzer_execution"),
            Self::Aggregation => write!(f, "aggregation"),
            Self::OutputGeneration => write!(f, "output_generation"),
        }
    }
}

/// RAII guard restoring the previous context on drop.
pub struct ContextGuard {
    previous: OperationContext,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        CURRENT_CONTEXT.with(|ctx| {
            *ctx.borrow_mut() = self.previous.clone();
        });
    }
}

fn update(apply: impl FnOnce(&mut OperationContext)) -> ContextGuard {
    CURRENT_CONTEXT.with(|ctx| {
        let previous = ctx.borrow().clone();
        apply(&mut ctx.borrow_mut());
        ContextGuard { previous }
    })
}

/// Set the current phase until the returned guard drops.
#[must_use]
pub fn set_phase(phase: Phase) -> ContextGuard {
    update(|ctx| ctx.phase = Some(phase))
}

/// Set the artifact being analyzed until the returned guard drops.
#[must_use]
pub fn set_target(path: impl Into<PathBuf>) -> ContextGuard {
    let path = path.into();
    update(|ctx| ctx.target = Some(path))
}

/// Set the analyzer executing on this thread until the returned guard drops.
#[must_use]
pub fn set_current_analyzer(name: impl Into<String>) -> ContextGuard {
    let name = name.into();
    update(|ctx| ctx.analyzer = Some(name))
}

pub fn set_progress(finished: usize, total: usize) {
    ANALYZERS_FINISHED.store(finished, Ordering::Relaxed);
    ANALYZERS_TOTAL.store(total, Ordering::Relaxed);
}

/// Thread-safe; called from rayon workers as analyzers complete.
pub fn increment_finished() {
    ANALYZERS_FINISHED.fetch_add(1, Ordering::Relaxed);
}

#[must_use]
pub fn get_current_context() -> OperationContext {
    CURRENT_CONTEXT.with(|ctx| ctx.borrow().clone())
}

/// Current progress as (finished, total).
#[must_use]
pub fn get_progress() -> (usize, usize) {
    (
        ANALYZERS_FINISHED.load(Ordering::Relaxed),
        ANALYZERS_TOTAL.load(Ordering::Relaxed),
    )
}

pub fn reset_context() {
    CURRENT_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = OperationContext::new();
    });
}
