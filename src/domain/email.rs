//! Email address syntax checks.

use crate::domain::error::ValidationError;

/// Accept `local@domain.tld` where the local part is built from ASCII
/// alphanumerics and `._%+-`, the domain contains at least one dot and the
/// top-level label has two or more ASCII letters.
pub fn is_valid_email(candidate: &str) -> bool {
    let Some((local, domain)) = candidate.rsplit_once('@') else {
        return false;
    };

    if local.is_empty() || !local.chars().all(is_local_char) {
        return false;
    }

    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };

    if host.is_empty() || !host.chars().all(is_domain_char) {
        return false;
    }

    tld.len() >= 2 && tld.chars().all(|ch| ch.is_ascii_alphabetic())
}

/// Trim the candidate and return it when the syntax is acceptable.
pub fn validate_email(candidate: &str) -> Result<String, ValidationError> {
    let trimmed = candidate.trim();
    if is_valid_email(trimmed) {
        Ok(trimmed.to_string())
    } else {
        Err(ValidationError::InvalidEmailFormat {
            email: trimmed.to_string(),
        })
    }
}

fn is_local_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '%' | '+' | '-')
}

fn is_domain_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-')
}
