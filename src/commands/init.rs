use anyhow::{Context, Result};
use std::path::Path;

use crate::config::CONFIG_FILE_NAME;

const DEFAULT_CONFIG: &str = r#"# codelint configuration

[server]
transport = "stdio"
host = "0.0.0.0"
port = 8001

[analysis]
# timeout_seconds = 60
parallel = true
source_suffix = ".py"
include_defaults = true

# [[analyzers]]
# name = "flake8"
# command = ["flake8"]
"#;

/// Write a starter configuration file into `dir`.
pub fn init_config(dir: &Path, force: bool) -> Result<i32> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    println!("Created {} configuration file", config_path.display());

    Ok(0)
}
