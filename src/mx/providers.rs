//! Known mail providers, matched by exchange host name.

/// `(host substring, provider name)`; matched case-insensitively.
const PROVIDERS: &[(&str, &str)] = &[
    ("aspmx.l.google.com", "Google Workspace"),
    ("googlemail.com", "Google Workspace"),
    ("smtp.google.com", "Google Workspace"),
    ("mail.protection.outlook.com", "Microsoft 365"),
    ("outlook.com", "Microsoft 365"),
    ("pphosted.com", "Proofpoint"),
    ("ppe-hosted.com", "Proofpoint"),
    ("mimecast.com", "Mimecast"),
    ("barracudanetworks.com", "Barracuda"),
    ("messagelabs.com", "Broadcom Email Security"),
    ("zoho.com", "Zoho Mail"),
    ("zoho.eu", "Zoho Mail"),
    ("messagingengine.com", "Fastmail"),
    ("protonmail.ch", "Proton Mail"),
    ("icloud.com", "iCloud Mail"),
    ("yandex.net", "Yandex Mail"),
    ("secureserver.net", "GoDaddy"),
    ("emailsrvr.com", "Rackspace"),
    ("amazonaws.com", "Amazon SES"),
    ("mailgun.org", "Mailgun"),
    ("sendgrid.net", "SendGrid"),
    ("ovh.net", "OVHcloud"),
    ("one.com", "one.com"),
];

/// Providers behind `exchanges`, deduplicated, in first-seen order.
pub fn detect_providers<'a>(exchanges: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    for exchange in exchanges {
        let host = exchange.to_ascii_lowercase();
        let provider = PROVIDERS
            .iter()
            .find(|(pattern, _)| host.contains(pattern))
            .map(|(_, name)| *name);
        if let Some(name) = provider {
            if !found.iter().any(|f| f == name) {
                found.push(name.to_string());
            }
        }
    }
    found
}
