use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

/// Hostname syntax check: dot-separated labels of at most 63 chars, no
/// leading or trailing hyphen, at least two labels.
static DOMAIN_RE: OnceLock<Regex> = OnceLock::new();

fn domain_re() -> &'static Regex {
    DOMAIN_RE.get_or_init(|| {
        Regex::new(r"(?i)^(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z0-9][a-z0-9-]{0,61}[a-z0-9]$")
            .expect("valid regex")
    })
}

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("domain list is empty")]
    Empty,

    #[error("batch of {count} domains exceeds the maximum of {max}")]
    TooLarge { count: usize, max: usize },

    #[error("'{domain}' is not a valid domain name")]
    InvalidDomain { domain: String },

    #[error(transparent)]
    Invalid(#[from] garde::Report),
}

/// Split free-form input into candidate domains.
///
/// Accepts one domain per line or comma-separated lists, the two layouts the
/// batch upload accepts; blank entries are dropped.
pub fn parse_domain_list(input: &str) -> Vec<String> {
    input
        .split(|c| c == '\n' || c == '\r' || c == ',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Normalize a pasted domain: trim, lowercase, strip scheme and leading
/// `www.`, drop any path and port.
pub fn sanitize_domain(input: &str) -> String {
    let mut domain = input.trim().to_lowercase();

    if let Some(rest) = domain
        .strip_prefix("https://")
        .or_else(|| domain.strip_prefix("http://"))
    {
        domain = rest.to_string();
    }
    if let Some(rest) = domain.strip_prefix("www.") {
        domain = rest.to_string();
    }

    // Path, then port
    if let Some(idx) = domain.find('/') {
        domain.truncate(idx);
    }
    if let Some(idx) = domain.find(':') {
        domain.truncate(idx);
    }

    domain
}

pub fn is_valid_domain(domain: &str) -> bool {
    if domain.is_empty() || domain.len() > 255 {
        return false;
    }
    domain_re().is_match(domain)
}

/// Sanitize, dedup (first occurrence wins), and bound a candidate list,
/// producing the domains ready for submission. Fails before any network
/// call so a bad batch never reaches the server.
pub fn prepare_domains(candidates: Vec<String>, max: usize) -> Result<Vec<String>, ValidationError> {
    let mut seen = HashSet::new();
    let mut domains = Vec::new();

    for candidate in candidates {
        let domain = sanitize_domain(&candidate);
        if domain.is_empty() {
            continue;
        }
        if seen.insert(domain.clone()) {
            domains.push(domain);
        }
    }

    if domains.is_empty() {
        return Err(ValidationError::Empty);
    }
    if domains.len() > max {
        return Err(ValidationError::TooLarge {
            count: domains.len(),
            max,
        });
    }

    Ok(domains)
}

/// Strict single-domain validation for the synchronous scan path.
pub fn validate_single_domain(input: &str) -> Result<String, ValidationError> {
    let domain = sanitize_domain(input);
    if domain.is_empty() {
        return Err(ValidationError::Empty);
    }
    if !is_valid_domain(&domain) {
        return Err(ValidationError::InvalidDomain { domain });
    }
    Ok(domain)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_mixed_separators() {
        let parsed = parse_domain_list("a.com\nb.org, c.net\r\n\n ,d.io");
        assert_eq!(parsed, vec!["a.com", "b.org", "c.net", "d.io"]);
    }

    #[test]
    fn sanitize_strips_scheme_www_path_port() {
        assert_eq!(sanitize_domain("https://www.Example.COM/login?x=1"), "example.com");
        assert_eq!(sanitize_domain("http://evil.test:8080/path"), "evil.test");
        assert_eq!(sanitize_domain("  plain.org  "), "plain.org");
    }

    #[test]
    fn valid_domains() {
        assert!(is_valid_domain("example.com"));
        assert!(is_valid_domain("sub.domain.co.uk"));
        assert!(is_valid_domain("xn--bcher-kva.example"));
    }

    #[test]
    fn invalid_domains() {
        assert!(!is_valid_domain(""));
        assert!(!is_valid_domain("no-tld"));
        assert!(!is_valid_domain("-leading.com"));
        assert!(!is_valid_domain("spaces in.com"));
        assert!(!is_valid_domain(&format!("{}.com", "a".repeat(300))));
    }

    #[test]
    fn prepare_dedups_preserving_order() {
        let input = vec![
            "https://b.com".to_string(),
            "a.com".to_string(),
            "B.COM/path".to_string(),
            "a.com".to_string(),
        ];
        let domains = prepare_domains(input, 100).unwrap();
        assert_eq!(domains, vec!["b.com", "a.com"]);
    }

    #[test]
    fn prepare_rejects_empty() {
        assert!(matches!(
            prepare_domains(vec![], 100),
            Err(ValidationError::Empty)
        ));
        // Entries that sanitize to nothing count as empty too
        assert!(matches!(
            prepare_domains(vec!["   ".to_string()], 100),
            Err(ValidationError::Empty)
        ));
    }

    #[test]
    fn prepare_rejects_oversized() {
        let input: Vec<String> = (0..5).map(|i| format!("d{}.com", i)).collect();
        assert!(matches!(
            prepare_domains(input, 3),
            Err(ValidationError::TooLarge { count: 5, max: 3 })
        ));
    }

    #[test]
    fn single_domain_validation() {
        assert_eq!(validate_single_domain("https://Example.com").unwrap(), "example.com");
        assert!(validate_single_domain("not a domain").is_err());
        assert!(validate_single_domain("").is_err());
    }
}
