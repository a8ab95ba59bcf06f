//! Validation utilities

use std::sync::LazyLock;

use regex::Regex;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("invalid email regex")
});

/// Structural email validation, matching what the directory accepts
pub fn is_valid_email(email: &str) -> bool {
    !email.is_empty() && EMAIL_REGEX.is_match(email)
}

/// Collapse a display name from its parts, skipping empty segments
pub fn full_name(first_name: &str, surname: &str) -> String {
    [first_name, surname]
        .iter()
        .filter(|s| !s.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("first.last+tag@justice.gov.uk"));
    }

    #[test]
    fn test_invalid_emails() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("@missing.local"));
    }

    #[test]
    fn test_full_name() {
        assert_eq!(full_name("Jane", "Doe"), "Jane Doe");
        assert_eq!(full_name("", "Doe"), "Doe");
        assert_eq!(full_name("Jane", ""), "Jane");
        assert_eq!(full_name("", ""), "");
    }
}
