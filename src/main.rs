//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `email_posture` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - Collecting and normalizing the domains to analyze
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use email_posture::app::{json_report, normalize_all, read_domain_file, summary_line};
use email_posture::initialization::{init_logger_with, init_resolver};
use email_posture::{analyze_domains, Config, OutputFormat};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments into Config
    let config = Config::parse();

    // Initialize logger based on config
    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    match run(&config).await {
        Ok(()) => Ok(()),
        Err(e) => {
            eprintln!("email_posture error: {:#}", e);
            process::exit(1);
        }
    }
}

async fn run(config: &Config) -> Result<()> {
    let mut inputs = config.domains.clone();
    if let Some(path) = &config.file {
        let entries = read_domain_file(path)
            .await
            .with_context(|| format!("Failed to read domains from {}", path.display()))?;
        inputs.extend(entries);
    }

    let domains = normalize_all(inputs.iter().map(String::as_str));
    if domains.is_empty() {
        anyhow::bail!("no valid domain to analyze (pass domains as arguments or with --file)");
    }

    let resolver =
        init_resolver(&config.resolver_settings()).context("Failed to initialize DNS resolver")?;
    let reports = analyze_domains(&resolver, &domains, &config.selector).await;

    for report in &reports {
        match config.format {
            OutputFormat::Json => {
                let json = json_report(report).context("Failed to serialize report")?;
                println!("{json}");
            }
            OutputFormat::Summary => println!("{}", summary_line(report)),
        }
    }
    Ok(())
}
