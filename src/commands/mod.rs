//! CLI command implementations.
//!
//! - **analyze**: Analyze a file or in-memory source
//! - **init**: Write a starter `.codelint.toml`
//! - **list**: Show registered analyzers
//! - **server**: Print the resolved server record
//!
//! Commands return the process exit code on success; errors bubble up to
//! `main` as `anyhow::Error`.

pub mod analyze;
pub mod init;
pub mod list;
pub mod server;

pub use analyze::{handle_analyze_code, handle_analyze_file, report_exit_code};
pub use init::init_config;
pub use list::handle_list;
pub use server::handle_server_config;
