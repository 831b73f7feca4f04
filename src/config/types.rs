//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::net::IpAddr;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::constants::{DEFAULT_DKIM_SELECTOR, DEFAULT_DNS_SERVERS, DNS_ATTEMPTS, DNS_TIMEOUT_SECS};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Report output format for the CLI.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Full report tree, one pretty-printed JSON document per domain
    Json,
    /// One line per domain with the overall score and passed checks
    Summary,
}

/// Upstream resolver configuration for the DNS adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverSettings {
    /// Fixed upstream servers, queried on port 53
    pub servers: Vec<IpAddr>,
    /// Per-query timeout in seconds
    pub timeout_secs: u64,
    /// Attempts per query before giving up
    pub attempts: usize,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            servers: DEFAULT_DNS_SERVERS.to_vec(),
            timeout_secs: DNS_TIMEOUT_SECS,
            attempts: DNS_ATTEMPTS,
        }
    }
}

/// Command-line options and configuration.
///
/// All options have defaults and can be overridden via command-line flags.
///
/// # Examples
///
/// ```bash
/// # Analyze a single domain
/// email_posture example.com
///
/// # Use a specific DKIM selector and other upstream resolvers
/// email_posture example.com --selector google --dns-servers 9.9.9.9,149.112.112.112
///
/// # Read domains from a file and print one summary line each
/// email_posture --file domains.txt --format summary
/// ```
#[derive(Debug, Clone, Parser)]
#[command(
    name = "email_posture",
    about = "Scores the SPF, DKIM, DMARC and MX configuration of domains."
)]
pub struct Config {
    /// Domains (or URLs) to analyze
    #[arg(value_name = "DOMAIN")]
    pub domains: Vec<String>,

    /// File with one domain per line (`#` starts a comment)
    #[arg(long, value_parser)]
    pub file: Option<PathBuf>,

    /// DKIM selector to look up
    #[arg(long, default_value = DEFAULT_DKIM_SELECTOR)]
    pub selector: String,

    /// Upstream DNS servers (comma separated)
    #[arg(long, value_delimiter = ',', default_values_t = DEFAULT_DNS_SERVERS.to_vec())]
    pub dns_servers: Vec<IpAddr>,

    /// DNS query timeout in seconds
    #[arg(long, default_value_t = DNS_TIMEOUT_SECS)]
    pub dns_timeout_secs: u64,

    /// Output format: json|summary
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}

impl Config {
    /// Resolver settings derived from the CLI options.
    pub fn resolver_settings(&self) -> ResolverSettings {
        ResolverSettings {
            servers: self.dns_servers.clone(),
            timeout_secs: self.dns_timeout_secs,
            attempts: DNS_ATTEMPTS,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            domains: Vec::new(),
            file: None,
            selector: DEFAULT_DKIM_SELECTOR.to_string(),
            dns_servers: DEFAULT_DNS_SERVERS.to_vec(),
            dns_timeout_secs: DNS_TIMEOUT_SECS,
            format: OutputFormat::Json,
            log_level: LogLevel::Warn,
            log_format: LogFormat::Plain,
        }
    }
}
