//! Execution of a single analyzer as a child process.
//!
//! The runner is the isolation boundary between the orchestration layer and
//! external programs: every way a child process can fail (missing
//! executable, permission errors, abnormal termination, undecodable output,
//! timeout) is turned into an [`Outcome::ExecutionError`] result here and
//! never escapes as an error or panic.
//!
//! Classification follows the exit status only:
//!
//! - exit `0` → [`Outcome::Clean`], output discarded
//! - any other exit code → [`Outcome::IssuesFound`], stdout then stderr
//!   split into lines
//!
//! [`Outcome::ExecutionError`]: crate::core::types::Outcome::ExecutionError
//! [`Outcome::Clean`]: crate::core::types::Outcome::Clean
//! [`Outcome::IssuesFound`]: crate::core::types::Outcome::IssuesFound

use std::io::{self, Read};
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use super::definition::AnalyzerDefinition;
use crate::core::types::AnalyzerResult;
use crate::observability::set_current_analyzer;

/// Interval between exit-status polls while a timeout is armed.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Executes one analyzer against one target path.
///
/// Implementations must not panic or return errors for analyzer-level
/// failures; those are reported through the returned result.
pub trait Runner: Send + Sync {
    fn run(&self, definition: &AnalyzerDefinition, target: &Path) -> AnalyzerResult;
}

/// Runs analyzers as child processes, one process per call, no retries.
#[derive(Debug, Clone, Default)]
pub struct AnalyzerRunner {
    timeout: Option<Duration>,
}

impl AnalyzerRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kill analyzers that run longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    fn execute(
        &self,
        definition: &AnalyzerDefinition,
        target: &Path,
    ) -> Result<CapturedOutput, ExecutionFailure> {
        debug!(
            analyzer = definition.name(),
            command = %definition.command_line(),
            target = %target.display(),
            "spawning analyzer"
        );

        let mut child = Command::new(definition.program())
            .args(definition.fixed_args())
            .arg(target)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ExecutionFailure::Spawn {
                program: definition.program().to_string(),
                source,
            })?;

        let deadline = self.timeout.map(Deadline::starting_now);

        // Drain both pipes concurrently so a chatty child can't block on a full pipe
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = match deadline {
            Some(deadline) => wait_with_deadline(&mut child, deadline)?,
            None => child.wait().map_err(ExecutionFailure::Wait)?,
        };

        // The pipes may outlive the child when it leaves background processes
        // behind, so reading them is bounded by the same deadline
        Ok(CapturedOutput {
            status,
            stdout: collect(stdout, deadline)?,
            stderr: collect(stderr, deadline)?,
        })
    }
}

impl Runner for AnalyzerRunner {
    fn run(&self, definition: &AnalyzerDefinition, target: &Path) -> AnalyzerResult {
        let _analyzer = set_current_analyzer(definition.name());
        let name = definition.name();

        let result = self
            .execute(definition, target)
            .and_then(|output| classify(name, output));

        match result {
            Ok(result) => {
                debug!(analyzer = name, outcome = %result.outcome, "analyzer finished");
                result
            }
            Err(failure) => {
                warn!(analyzer = name, error = %failure, "analyzer failed to run");
                AnalyzerResult::execution_error(name, failure)
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum ExecutionFailure {
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to wait for process: {0}")]
    Wait(#[source] io::Error),

    #[error("failed to capture output: {0}")]
    Capture(String),

    #[error("timed out after {}s", .0.as_secs_f64())]
    TimedOut(Duration),

    #[error("{0}")]
    Terminated(String),

    #[error("{stream} is not valid UTF-8")]
    InvalidUtf8 { stream: &'static str },
}

struct CapturedOutput {
    status: ExitStatus,
    stdout: Vec<u8>,
    stderr: Vec<u8>,
}

/// Time budget for one analyzer run, covering both the process and its pipes.
#[derive(Debug, Clone, Copy)]
struct Deadline {
    started: Instant,
    limit: Duration,
}

impl Deadline {
    fn starting_now(limit: Duration) -> Self {
        Self {
            started: Instant::now(),
            limit,
        }
    }

    /// Time left before the deadline; zero once it has passed.
    fn remaining(&self) -> Duration {
        self.limit.saturating_sub(self.started.elapsed())
    }

    fn expired(&self) -> ExecutionFailure {
        ExecutionFailure::TimedOut(self.limit)
    }
}

type Capture = Receiver<io::Result<Vec<u8>>>;

fn drain<R>(pipe: Option<R>) -> Option<Capture>
where
    R: Read + Send + 'static,
{
    pipe.map(|mut pipe| {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let mut buf = Vec::new();
            let read = pipe.read_to_end(&mut buf).map(|_| buf);
            // The receiver is gone once the run has timed out
            let _ = tx.send(read);
        });
        rx
    })
}

fn collect(capture: Option<Capture>, deadline: Option<Deadline>) -> Result<Vec<u8>, ExecutionFailure> {
    let Some(capture) = capture else {
        return Ok(Vec::new());
    };

    let read = match deadline {
        None => capture.recv().map_err(|_| reader_lost())?,
        Some(deadline) => match capture.recv_timeout(deadline.remaining()) {
            Ok(read) => read,
            Err(RecvTimeoutError::Timeout) => return Err(deadline.expired()),
            Err(RecvTimeoutError::Disconnected) => return Err(reader_lost()),
        },
    };
    read.map_err(|e| ExecutionFailure::Capture(e.to_string()))
}

fn reader_lost() -> ExecutionFailure {
    ExecutionFailure::Capture("reader thread exited without output".to_string())
}

fn wait_with_deadline(child: &mut Child, deadline: Deadline) -> Result<ExitStatus, ExecutionFailure> {
    loop {
        if let Some(status) = child.try_wait().map_err(ExecutionFailure::Wait)? {
            return Ok(status);
        }

        let remaining = deadline.remaining();
        if remaining.is_zero() {
            // Reader threads are left detached: a grandchild may still hold the pipes
            let _ = child.kill();
            let _ = child.wait();
            return Err(deadline.expired());
        }
        thread::sleep(POLL_INTERVAL.min(remaining));
    }
}

fn classify(name: &str, output: CapturedOutput) -> Result<AnalyzerResult, ExecutionFailure> {
    let stdout = String::from_utf8(output.stdout)
        .map_err(|_| ExecutionFailure::InvalidUtf8 { stream: "stdout" })?;
    let stderr = String::from_utf8(output.stderr)
        .map_err(|_| ExecutionFailure::InvalidUtf8 { stream: "stderr" })?;

    match output.status.code() {
        Some(0) => Ok(AnalyzerResult::clean(name)),
        Some(_) => Ok(AnalyzerResult::issues_found(
            name,
            split_output_lines(&(stdout + &stderr)),
        )),
        None => Err(ExecutionFailure::Terminated(describe_abnormal_exit(
            output.status,
        ))),
    }
}

/// Split captured output into lines, dropping leading and trailing blank
/// lines. Interior blank lines and indentation are preserved.
pub fn split_output_lines(output: &str) -> Vec<String> {
    let lines: Vec<&str> = output
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();

    let is_content = |line: &&str| !line.trim().is_empty();
    let Some(first) = lines.iter().position(is_content) else {
        return Vec::new();
    };
    let last = lines.iter().rposition(is_content).unwrap_or(first);

    lines[first..=last].iter().map(|s| s.to_string()).collect()
}

#[cfg(unix)]
fn describe_abnormal_exit(status: ExitStatus) -> String {
    use std::os::unix::process::ExitStatusExt;

    match status.signal() {
        Some(signal) => format!("terminated by signal {}", signal),
        None => "terminated abnormally".to_string(),
    }
}

#[cfg(not(unix))]
fn describe_abnormal_exit(_status: ExitStatus) -> String {
    "terminated abnormally".to_string()
}
