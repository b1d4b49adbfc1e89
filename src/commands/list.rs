use anyhow::Result;
use colored::*;
use serde::Serialize;
use std::path::PathBuf;

use crate::analyzers::locate_program;
use crate::io::output::OutputFormat;
use crate::service::OrchestrationService;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyzerListing {
    pub name: String,
    pub command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_path: Option<PathBuf>,
}

/// Registered analyzers in registration order, optionally with PATH lookup
pub fn collect_listings(service: &OrchestrationService, check: bool) -> Vec<AnalyzerListing> {
    service
        .list_analyzers()
        .into_iter()
        .filter_map(|name| service.registry().get(&name))
        .map(|def| {
            let resolved_path = if check { locate_program(&def) } else { None };
            AnalyzerListing {
                name: def.name().to_string(),
                command: def.command_line(),
                available: check.then_some(resolved_path.is_some()),
                resolved_path,
            }
        })
        .collect()
}

pub fn handle_list(service: &OrchestrationService, check: bool, format: OutputFormat) -> Result<i32> {
    let listings = collect_listings(service, check);

    match format {
        OutputFormat::Json => {
            if check {
                println!("{}", serde_json::to_string_pretty(&listings)?);
            } else {
                println!("{}", serde_json::to_string_pretty(&service.list_analyzers())?);
            }
        }
        OutputFormat::Markdown => {
            println!("| Analyzer | Command | Available |");
            println!("|---|---|---|");
            for listing in &listings {
                let available = match listing.available {
                    Some(true) => "yes",
                    Some(false) => "no",
                    None => "-",
                };
                println!("| {} | `{}` | {} |", listing.name, listing.command, available);
            }
        }
        OutputFormat::Terminal => {
            for listing in &listings {
                match listing.available {
                    Some(true) => println!("{}  {}  {}", "✓".green(), listing.name.bold(), listing.command),
                    Some(false) => println!(
                        "{}  {}  {} (not found on PATH)",
                        "✗".red(),
                        listing.name.bold(),
                        listing.command
                    ),
                    None => println!("{}  {}", listing.name.bold(), listing.command),
                }
            }
        }
    }
    Ok(0)
}
