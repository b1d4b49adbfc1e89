//! Transport record consumed by the command surface.
//!
//! The orchestration core never opens sockets; it only hands the resolved
//! `{transport, host, port}` record to whatever exposes it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8001;

/// Supported transports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Transport {
    #[default]
    Stdio,
    Http,
    Sse,
    StreamableHttp,
}

impl Transport {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stdio => "stdio",
            Self::Http => "http",
            Self::Sse => "sse",
            Self::StreamableHttp => "streamable-http",
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Transport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stdio" => Ok(Self::Stdio),
            "http" => Ok(Self::Http),
            "sse" => Ok(Self::Sse),
            "streamable-http" => Ok(Self::StreamableHttp),
            other => Err(format!("unknown transport '{}'", other)),
        }
    }
}

/// `[server]` section as written in the file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerSettings {
    #[serde(default = "default_transport")]
    pub transport: String,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            transport: default_transport(),
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_transport() -> String {
    Transport::Stdio.as_str().to_string()
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

/// Resolved transport record. `stdio` carries no address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerConfig {
    pub transport: Transport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            transport: Transport::Stdio,
            host: None,
            port: None,
        }
    }
}

impl ServerSettings {
    /// Validate the transport and drop the address for `stdio`.
    /// An unknown transport falls back to `stdio` with a warning.
    pub fn resolve(&self) -> ServerConfig {
        let transport = self.transport.parse::<Transport>().unwrap_or_else(|e| {
            tracing::warn!("Invalid server transport: {}. Using 'stdio'.", e);
            Transport::Stdio
        });

        match transport {
            Transport::Stdio => ServerConfig::default(),
            other => ServerConfig {
                transport: other,
                host: Some(self.host.clone()),
                port: Some(self.port),
            },
        }
    }
}
