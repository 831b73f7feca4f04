//! Domain input normalization.

use log::warn;

use crate::config::MAX_DOMAIN_LENGTH;
use crate::error_handling::DomainError;

/// Reduces user input (a bare domain or a URL) to the domain to analyze.
///
/// Lower-cases the input and strips a scheme, path, query, port, leading
/// `www.` and trailing dot. Internationalized names come back in their ASCII
/// (punycode) form.
///
/// # Errors
///
/// Returns a [`DomainError`] when nothing usable is left, the input contains
/// whitespace or characters a host name cannot carry, or the result is longer
/// than [`MAX_DOMAIN_LENGTH`].
pub fn normalize_domain(input: &str) -> Result<String, DomainError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DomainError::Empty);
    }
    if trimmed.chars().any(char::is_whitespace) {
        return Err(DomainError::InvalidCharacters(trimmed.to_string()));
    }

    let lowered = trimmed.to_lowercase();
    let has_scheme = lowered.contains("://");
    let candidate = if has_scheme {
        lowered
    } else {
        format!("http://{lowered}")
    };

    let parsed = match url::Url::parse(&candidate) {
        Ok(parsed) => parsed,
        Err(_) if has_scheme => return Err(DomainError::NoHost(trimmed.to_string())),
        Err(_) => return Err(DomainError::InvalidCharacters(trimmed.to_string())),
    };
    let host = parsed
        .host_str()
        .ok_or_else(|| DomainError::NoHost(trimmed.to_string()))?;

    let host = host.strip_prefix("www.").unwrap_or(host);
    let host = host.trim_end_matches('.');
    if host.is_empty() {
        return Err(DomainError::Empty);
    }
    if host.len() > MAX_DOMAIN_LENGTH {
        return Err(DomainError::TooLong {
            len: host.len(),
            max: MAX_DOMAIN_LENGTH,
        });
    }

    Ok(host.to_string())
}

/// Normalizes every input, logging and dropping the ones that are rejected.
///
/// Duplicates (after normalization) are kept once, in first-seen order.
pub fn normalize_all<'a, I>(inputs: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut domains: Vec<String> = Vec::new();
    for input in inputs {
        match normalize_domain(input) {
            Ok(domain) if domains.contains(&domain) => {
                log::debug!("Skipping duplicate domain {domain}");
            }
            Ok(domain) => domains.push(domain),
            Err(e) => warn!("Skipping invalid domain {input:?}: {e}"),
        }
    }
    domains
}
