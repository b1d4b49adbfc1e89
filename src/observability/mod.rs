//! Observability infrastructure for crash reports and debugging.
//!
//! - **Panic Hook**: Produces structured crash reports with context
//! - **Context Tracking**: Thread-local phase, target and analyzer tracking
//! - **Tracing**: Subscriber setup for structured logs on stderr
//!
//! Track context during an analysis call:
//!
//! ```ignore
//! use codelint::observability::{set_phase, set_target, Phase};
//!
//! let _phase = set_phase(Phase::AnalyzerExecution);
//! let _target = set_target(&path);
//! // If a panic occurs here, the crash report shows phase and target
//! ```

pub mod context;
pub mod panic_hook;
pub mod tracing;

pub use context::{
    get_current_context, get_progress, increment_finished, set_current_analyzer, set_phase,
    set_progress, set_target, ContextGuard, OperationContext, Phase,
};
pub use panic_hook::install_panic_hook;
pub use self::tracing::init_tracing;
