//! email_posture library: email-authentication posture analysis
//!
//! This library looks up the SPF, DKIM, DMARC and MX records of a domain,
//! parses each record's grammar, scores it with warnings and recommendations,
//! and merges the four analyses into one overall posture report.
//!
//! # Example
//!
//! ```no_run
//! use email_posture::{analyze_all, init_resolver, ResolverSettings};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let resolver = init_resolver(&ResolverSettings::default())?;
//! let report = analyze_all(&resolver, "example.com", "default").await;
//! println!(
//!     "{}: {}/{} ({})",
//!     report.domain, report.overall_score.value, report.overall_score.out_of, report.overall_score.level
//! );
//! # Ok(())
//! # }
//! ```
//!
//! Every analyzer is generic over [`DnsResolver`]; tests and embedders can
//! substitute [`MockResolver`] for the network-backed [`HickoryResolver`].
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

pub mod admission;
pub mod aggregate;
pub mod app;
pub mod config;
pub mod dkim;
pub mod dmarc;
pub mod dns;
pub mod error_handling;
pub mod initialization;
pub mod mx;
pub mod report;
pub mod scoring;
pub mod spf;
mod utils;

// Re-export public API
pub use admission::{Admission, AdmissionLedger, AdmissionPolicy};
pub use aggregate::{analyze_all, AggregateReport, Summary};
pub use config::{Config, LogFormat, LogLevel, OutputFormat, ResolverSettings};
pub use dkim::{analyze_dkim, DkimReport};
pub use dmarc::{analyze_dmarc, DmarcReport};
pub use dns::{DnsResolver, HickoryResolver, MockResolver};
pub use error_handling::{DnsError, DomainError, InitializationError};
pub use initialization::{init_admission_ledger, init_logger_with, init_resolver};
pub use mx::{analyze_mx, MxReport};
pub use report::{Priority, PriorityRecommendation, Protocol, ProtocolReport};
pub use run::analyze_domains;
pub use scoring::{Score, ScoreLevel};
pub use spf::{analyze_spf, SpfReport};

// Batch analysis used by the CLI
mod run {
    use futures::stream::{self, StreamExt};

    use crate::aggregate::{analyze_all, AggregateReport};
    use crate::config::MAX_CONCURRENT_DOMAINS;
    use crate::dns::DnsResolver;

    /// Analyzes each domain in `domains`, a few at a time.
    ///
    /// Reports come back in input order. Domains are expected to be
    /// normalized already (see [`crate::app::normalize_domain`]).
    pub async fn analyze_domains<R: DnsResolver>(
        resolver: &R,
        domains: &[String],
        selector: &str,
    ) -> Vec<AggregateReport> {
        let started = std::time::Instant::now();
        let reports: Vec<AggregateReport> = stream::iter(domains)
            .map(|domain| analyze_all(resolver, domain, selector))
            .buffered(MAX_CONCURRENT_DOMAINS)
            .collect()
            .await;

        log::info!(
            "Analyzed {} domain{} in {:.1}s",
            reports.len(),
            if reports.len() == 1 { "" } else { "s" },
            started.elapsed().as_secs_f64()
        );
        reports
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::dns::MockResolver;

        #[tokio::test]
        async fn test_reports_follow_input_order() {
            let resolver = MockResolver::new();
            resolver.add_txt("b.example", &["v=spf1 -all"]);
            let domains: Vec<String> = ["a.example", "b.example", "c.example"]
                .iter()
                .map(|d| d.to_string())
                .collect();

            let reports = analyze_domains(&resolver, &domains, "default").await;
            let order: Vec<&str> = reports.iter().map(|r| r.domain.as_str()).collect();
            assert_eq!(order, vec!["a.example", "b.example", "c.example"]);
            assert!(reports[1].spf.success);
            assert!(!reports[0].spf.success);
        }
    }
}
