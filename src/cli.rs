use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "codelint")]
#[command(about = "Run external code analyzers and aggregate their findings", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults to the nearest .codelint.toml)
    #[arg(long, global = true, env = "CODELINT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "terminal", global = true)]
    pub format: OutputFormat,

    /// Kill any analyzer running longer than this many seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Run analyzers one after another instead of concurrently
    #[arg(long = "no-parallel", global = true)]
    pub no_parallel: bool,

    /// Register an extra analyzer for this run (repeatable)
    #[arg(
        long = "analyzer",
        value_name = "NAME=COMMAND",
        value_parser = parse_analyzer_spec,
        global = true
    )]
    pub extra_analyzers: Vec<AnalyzerSpec>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a file on disk
    File {
        /// Path to analyze
        path: PathBuf,

        /// Analyzers to run (defaults to all registered)
        #[arg(short, long, value_delimiter = ',')]
        analyzers: Option<Vec<String>>,
    },

    /// Analyze source code read from a file or stdin
    Code {
        /// Read source from this file instead of stdin
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Suffix for the temporary source file (e.g. ".py")
        #[arg(long)]
        suffix: Option<String>,

        /// Analyzers to run (defaults to all registered)
        #[arg(short, long, value_delimiter = ',')]
        analyzers: Option<Vec<String>>,
    },

    /// List registered analyzers
    List {
        /// Also report whether each analyzer's program is on PATH
        #[arg(long)]
        check: bool,
    },

    /// Print the resolved server configuration
    Config,

    /// Write a starter .codelint.toml in the current directory
    Init {
        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Markdown,
    Terminal,
}

impl From<OutputFormat> for crate::io::output::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => Self::Json,
            OutputFormat::Markdown => Self::Markdown,
            OutputFormat::Terminal => Self::Terminal,
        }
    }
}

/// An analyzer given on the command line as `NAME=COMMAND`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerSpec {
    pub name: String,
    pub command: Vec<String>,
}

/// Parse `NAME=COMMAND`; the command is split on whitespace. Emptiness is
/// left to registration so the usual definition error is reported.
pub fn parse_analyzer_spec(value: &str) -> Result<AnalyzerSpec, String> {
    let (name, command) = value
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=COMMAND, got '{}'", value))?;

    Ok(AnalyzerSpec {
        name: name.trim().to_string(),
        command: command.split_whitespace().map(str::to_string).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_analyzer_spec() {
        let spec = parse_analyzer_spec("flake8=flake8 --select E9").unwrap();
        assert_eq!(spec.name, "flake8");
        assert_eq!(spec.command, vec!["flake8", "--select", "E9"]);
    }

    #[test]
    fn test_parse_analyzer_spec_requires_equals() {
        assert!(parse_analyzer_spec("flake8").is_err());
    }

    #[test]
    fn test_parse_analyzer_spec_allows_empty_command() {
        let spec = parse_analyzer_spec("x=").unwrap();
        assert!(spec.command.is_empty());
    }

    #[test]
    fn test_cli_parses_file_command() {
        let cli = Cli::parse_from([
            "codelint",
            "--format",
            "json",
            "file",
            "src/lib.rs",
            "--analyzers",
            "pylint,flake8",
            "--analyzer",
            "flake8=flake8",
        ]);

        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.extra_analyzers.len(), 1);
        match cli.command {
            Commands::File { path, analyzers } => {
                assert_eq!(path, PathBuf::from("src/lib.rs"));
                assert_eq!(
                    analyzers,
                    Some(vec!["pylint".to_string(), "flake8".to_string()])
                );
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_cli_verify() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
