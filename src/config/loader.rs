use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::core::CodeLintConfig;
use crate::core::errors::{Error, Result};

pub const CONFIG_FILE_NAME: &str = ".codelint.toml";

/// Directories searched, counting the start directory itself
const MAX_TRAVERSAL_DEPTH: usize = 10;

pub(crate) fn read_config_file(path: &Path) -> std::result::Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Parse configuration from a TOML string
pub fn parse_config(contents: &str) -> Result<CodeLintConfig> {
    toml::from_str::<CodeLintConfig>(contents)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", CONFIG_FILE_NAME, e)))
}

/// Try loading config from a specific path; `None` when missing or invalid
pub(crate) fn try_load_config_from_path(config_path: &Path) -> Option<CodeLintConfig> {
    let contents = match read_config_file(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            handle_read_error(config_path, &e);
            return None;
        }
    };

    match parse_config(&contents) {
        Ok(config) => {
            tracing::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            tracing::warn!("{}. Using defaults.", e);
            None
        }
    }
}

pub(crate) fn handle_read_error(config_path: &Path, error: &std::io::Error) {
    // Only log actual errors, not "file not found"
    if error.kind() != std::io::ErrorKind::NotFound {
        tracing::warn!(
            "Failed to read config file {}: {}",
            config_path.display(),
            error
        );
    }
}

/// `start` followed by its ancestors, at most `max_depth` entries
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Search `start` and its ancestors for `.codelint.toml`
pub fn load_config_from(start: PathBuf) -> CodeLintConfig {
    directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            tracing::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            CodeLintConfig::default()
        })
}

/// Load configuration from an explicit path, or search from the current
/// directory when none is given. Never fails: problems are logged and the
/// defaults are used.
pub fn load_config(explicit: Option<&Path>) -> CodeLintConfig {
    if let Some(path) = explicit {
        return try_load_config_from_path(path).unwrap_or_else(|| {
            tracing::warn!(
                "Config file {} could not be loaded. Using default config.",
                path.display()
            );
            CodeLintConfig::default()
        });
    }

    match std::env::current_dir() {
        Ok(dir) => load_config_from(dir),
        Err(e) => {
            tracing::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            CodeLintConfig::default()
        }
    }
}
