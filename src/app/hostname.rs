//! Hostname extraction from input lines.
//!
//! Input lines hold a bare hostname or a URL, optionally followed by a
//! `,label` column used when the output feeds classifier training.

use log::warn;

use crate::error_handling::EngineError;

/// Longest input accepted before parsing, matching common URL limits.
const MAX_INPUT_LENGTH: usize = 2048;

/// One hostname to resolve, with its optional training label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Normalized domain name
    pub hostname: String,
    /// Second input column, if any
    pub label: Option<String>,
}

/// Extracts the domain name from a hostname or URL.
///
/// Scheme, credentials, port, path, query and fragment are dropped; the name
/// is lowercased and the trailing root dot removed. IP literals are rejected
/// since they have no DNS records of their own.
///
/// Returns `None` (and logs a warning) when no domain name can be extracted.
pub fn normalize_hostname(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if input.len() > MAX_INPUT_LENGTH {
        warn!(
            "Skipping input exceeding maximum length ({} > {}): {}...",
            input.len(),
            MAX_INPUT_LENGTH,
            input.chars().take(50).collect::<String>()
        );
        return None;
    }

    let with_scheme = if input.contains("://") {
        input.to_string()
    } else {
        format!("http://{input}")
    };

    let parsed = match url::Url::parse(&with_scheme) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!("Skipping invalid hostname {input}: {e}");
            return None;
        }
    };

    match parsed.host() {
        Some(url::Host::Domain(domain)) => {
            let domain = domain.trim_end_matches('.').to_ascii_lowercase();
            if domain.is_empty() {
                warn!("Skipping input without a domain name: {input}");
                None
            } else {
                Some(domain)
            }
        }
        Some(_) => {
            warn!("Skipping IP address input: {input}");
            None
        }
        None => {
            warn!("Skipping input without a host: {input}");
            None
        }
    }
}

/// Parses one input line into a [`Target`].
///
/// Returns `None` for blank lines and `#` comments.
///
/// # Errors
///
/// `EngineError::InvalidHostname` when the first column yields no domain name.
pub fn parse_target_line(line: &str) -> Option<Result<Target, EngineError>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }

    let (host_part, label) = match trimmed.rsplit_once(',') {
        Some((host, label)) => {
            let label = label.trim();
            (host, (!label.is_empty()).then(|| label.to_string()))
        }
        None => (trimmed, None),
    };

    Some(
        normalize_hostname(host_part)
            .map(|hostname| Target { hostname, label })
            .ok_or_else(|| EngineError::InvalidHostname(host_part.trim().to_string())),
    )
}
