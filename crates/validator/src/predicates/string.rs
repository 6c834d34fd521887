//! String predicates.
//!
//! Lengths are counted in Unicode scalar values, not bytes.

/// RFC 5321 limits.
const MAX_EMAIL_LEN: usize = 254;
const MAX_LOCAL_LEN: usize = 64;
const MAX_DOMAIN_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

#[must_use]
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

#[must_use]
pub fn not_blank(s: &str) -> bool {
    !s.trim().is_empty()
}

/// No cased character is uppercase.
#[must_use]
pub fn is_lowercase(s: &str) -> bool {
    !s.chars().any(char::is_uppercase)
}

/// No cased character is lowercase.
#[must_use]
pub fn is_uppercase(s: &str) -> bool {
    !s.chars().any(char::is_lowercase)
}

/// Structural email check: an unquoted dot-atom local part, one `@`, and a
/// hostname with at least two labels and a non-numeric top-level label.
///
/// ```
/// use warden_validator::predicates::string::is_email;
///
/// assert!(is_email("ada@example.com"));
/// assert!(is_email("first.last+tag@mail.example.co.uk"));
/// assert!(!is_email("bad"));
/// assert!(!is_email("a..b@example.com"));
/// ```
#[must_use]
pub fn is_email(s: &str) -> bool {
    if s.len() > MAX_EMAIL_LEN {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    is_local_part(local) && is_domain(domain)
}

fn is_local_part(local: &str) -> bool {
    const ATEXT: &str = "!#$%&'*+/=?^_`{|}~-";

    if local.is_empty() || local.len() > MAX_LOCAL_LEN {
        return false;
    }
    local.split('.').all(|atom| {
        !atom.is_empty()
            && atom
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || ATEXT.contains(c))
    })
}

fn is_domain(domain: &str) -> bool {
    if domain.is_empty() || domain.len() > MAX_DOMAIN_LEN {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }
    let labels_ok = labels.iter().all(|label| {
        !label.is_empty()
            && label.len() <= MAX_LABEL_LEN
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    });
    let tld_ok = labels
        .last()
        .is_some_and(|tld| !tld.chars().all(|c| c.is_ascii_digit()));
    labels_ok && tld_ok
}

/// An absolute `http` or `https` URL with a host.
#[must_use]
pub fn is_http_url(s: &str) -> bool {
    url::Url::parse(s)
        .is_ok_and(|url| matches!(url.scheme(), "http" | "https") && url.host().is_some())
}

#[must_use]
pub fn is_uuid(s: &str) -> bool {
    uuid::Uuid::try_parse(s).is_ok()
}
