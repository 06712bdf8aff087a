//! Email syntax checks and canonicalization.

use validator::ValidateEmail;

/// Syntax check: RFC-style address via `validator`, plus a real top-level domain.
pub fn is_valid_email(candidate: &str) -> bool {
    let lowered = candidate.to_lowercase();
    if !lowered.validate_email() {
        return false;
    }

    let Some((_, domain)) = candidate.rsplit_once('@') else {
        return false;
    };

    // `validator` accepts bare hosts like `user@localhost`
    match domain.rsplit_once('.') {
        Some((_, tld)) => tld.len() >= 2 && !tld.chars().all(|c| c.is_ascii_digit()),
        None => false,
    }
}

/// Canonical form used for storage.
///
/// Lowercases the address and removes provider-specific aliasing so that
/// `First.Last+news@googlemail.com` and `firstlast@gmail.com` compare equal.
pub fn normalize_email(address: &str) -> String {
    let lowered = address.to_lowercase();
    let Some((local, domain)) = lowered.rsplit_once('@') else {
        return lowered;
    };

    let (local, domain) = match domain {
        "gmail.com" | "googlemail.com" => (strip_tag(local, '+').replace('.', ""), "gmail.com"),
        "outlook.com" | "hotmail.com" | "live.com" | "icloud.com" | "me.com" | "mac.com" => {
            (strip_tag(local, '+').to_string(), domain)
        }
        "yahoo.com" | "ymail.com" | "rocketmail.com" => (strip_tag(local, '-').to_string(), domain),
        _ => (local.to_string(), domain),
    };

    format!("{local}@{domain}")
}

fn strip_tag(local: &str, separator: char) -> &str {
    match local.split_once(separator) {
        Some((base, _)) if !base.is_empty() => base,
        _ => local,
    }
}
