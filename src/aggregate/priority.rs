//! Fixed-text priority items, derived from report outcomes rather than scores.

use crate::dkim::DkimReport;
use crate::dmarc::{DmarcReport, Policy};
use crate::mx::MxReport;
use crate::report::{Priority, PriorityRecommendation, Protocol};
use crate::spf::SpfReport;

fn item(priority: Priority, protocol: Protocol, message: &str) -> PriorityRecommendation {
    PriorityRecommendation {
        priority,
        protocol,
        message: message.to_string(),
    }
}

/// At most one item per protocol, ordered DMARC, SPF, DKIM, MX.
pub fn priority_recommendations(
    dmarc: &DmarcReport,
    spf: &SpfReport,
    dkim: &DkimReport,
    mx: &MxReport,
) -> Vec<PriorityRecommendation> {
    let mut items = Vec::new();

    if !dmarc.success {
        items.push(item(
            Priority::Critical,
            Protocol::Dmarc,
            "Set up a DMARC record to protect the domain against spoofing",
        ));
    } else if dmarc.details.as_ref().map(|d| d.parsed.p) == Some(Policy::None) {
        items.push(item(
            Priority::Important,
            Protocol::Dmarc,
            "Upgrade the DMARC policy from p=none to quarantine or reject",
        ));
    }

    if !spf.success {
        items.push(item(
            Priority::Critical,
            Protocol::Spf,
            "Publish a single valid SPF record listing the authorized mail servers",
        ));
    }

    if !dkim.success {
        items.push(item(
            Priority::Important,
            Protocol::Dkim,
            "Configure DKIM signing with your mail provider and publish the key",
        ));
    }

    if !mx.success {
        items.push(item(
            Priority::Critical,
            Protocol::Mx,
            "Publish MX records so the domain can receive email",
        ));
    }

    items
}
