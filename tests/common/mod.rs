// Shared helpers for codelint integration tests
#![allow(dead_code)]

use codelint::{OrchestrationService, Report};
use std::path::PathBuf;

/// Write `content` to a file named `name` in a fresh temporary directory.
pub fn create_test_file(content: &str, name: &str) -> (tempfile::TempDir, PathBuf) {
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let file_path = temp_dir.path().join(name);
    std::fs::write(&file_path, content).expect("Failed to write test file");
    (temp_dir, file_path)
}

/// An invocation running `script` under `sh -c`; the target path is `$1`.
pub fn sh(script: &str) -> Vec<String> {
    vec![
        "sh".to_string(),
        "-c".to_string(),
        script.to_string(),
        "sh".to_string(),
    ]
}

/// Service with no defaults and a fixed set of shell-script analyzers:
///
/// - `clean`: always exits 0
/// - `bad`: prints `E001: bad thing` and exits 1
/// - `noisy`: echoes the target to stderr and exits 2
pub fn scripted_service() -> OrchestrationService {
    let service = OrchestrationService::empty();
    service
        .register_analyzer("clean", sh("exit 0"))
        .expect("register clean");
    service
        .register_analyzer("bad", sh("echo 'E001: bad thing'; exit 1"))
        .expect("register bad");
    service
        .register_analyzer("noisy", sh("echo \"checked $(basename \"$1\")\" >&2; exit 2"))
        .expect("register noisy");
    service
}

/// Report with the target description blanked out, for comparing runs on
/// different artifacts.
pub fn without_target(mut report: Report) -> Report {
    report.target = String::new();
    report.message = String::new();
    report
}

/// Files in `dir` whose name starts with the materializer prefix.
pub fn leftover_artifacts(dir: &std::path::Path) -> Vec<PathBuf> {
    std::fs::read_dir(dir)
        .expect("read temp dir")
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.file_name()
                .map(|n| n.to_string_lossy().starts_with("codelint-"))
                .unwrap_or(false)
        })
        .collect()
}
