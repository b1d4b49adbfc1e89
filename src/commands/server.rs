use anyhow::Result;

use crate::config::CodeLintConfig;

/// Print the resolved `{transport, host, port}` record as JSON.
pub fn handle_server_config(config: &CodeLintConfig) -> Result<i32> {
    let resolved = config.server.resolve();
    println!("{}", serde_json::to_string_pretty(&resolved)?);
    Ok(0)
}
