use anyhow::{Context, Result};
use clap::Parser;
use codelint::cli::{Cli, Commands};
use codelint::commands;
use codelint::config::{load_config, CodeLintConfig};
use codelint::observability::{init_tracing, install_panic_hook};
use codelint::service::OrchestrationService;

/// Exit code for usage, configuration and I/O failures
const EXIT_USAGE: i32 = 2;

fn main() {
    let cli = Cli::parse();
    install_panic_hook();
    init_tracing(cli.verbosity);

    let code = run(cli).unwrap_or_else(|e| {
        eprintln!("Error: {:#}", e);
        EXIT_USAGE
    });
    std::process::exit(code);
}

fn run(cli: Cli) -> Result<i32> {
    let config = apply_overrides(load_config(cli.config.as_deref()), &cli);
    let format = cli.format.into();

    match cli.command {
        Commands::Config => commands::handle_server_config(&config),
        Commands::Init { force } => {
            let cwd = std::env::current_dir().context("Failed to get current directory")?;
            commands::init_config(&cwd, force)
        }
        Commands::List { check } => {
            let service = build_service(&config, &cli.extra_analyzers)?;
            commands::handle_list(&service, check, format)
        }
        Commands::File { path, analyzers } => {
            let service = build_service(&config, &cli.extra_analyzers)?;
            commands::handle_analyze_file(&service, &path, analyzers.as_deref(), format)
        }
        Commands::Code {
            input,
            suffix,
            analyzers,
        } => {
            let service = build_service(&config, &cli.extra_analyzers)?;
            let suffix = suffix.unwrap_or_else(|| config.analysis.source_suffix.clone());
            commands::handle_analyze_code(&service, input, &suffix, analyzers.as_deref(), format)
        }
    }
}

// Command-line flags win over the configuration file
fn apply_overrides(mut config: CodeLintConfig, cli: &Cli) -> CodeLintConfig {
    if let Some(timeout) = cli.timeout {
        config.analysis.timeout_seconds = Some(timeout);
    }
    if cli.no_parallel {
        config.analysis.parallel = false;
    }
    config
}

fn build_service(
    config: &CodeLintConfig,
    extra: &[codelint::cli::AnalyzerSpec],
) -> Result<OrchestrationService> {
    let service = OrchestrationService::from_config(config);
    for spec in extra {
        service
            .register_analyzer(&spec.name, spec.command.clone())
            .with_context(|| format!("Cannot register analyzer '{}'", spec.name))?;
    }
    Ok(service)
}
