//! Phone number rules shared by inquiry validation and phone lookups.

use validator::ValidationError;

/// Canonical stored form: `+`, a country code and at least ten subscriber
/// digits, at most fifteen digits overall (E.164).
pub fn is_canonical_phone(phone: &str) -> bool {
    match phone.strip_prefix('+') {
        Some(digits) => (11..=15).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit()),
        None => false,
    }
}

/// Looser form accepted by the existence check: `+` followed by at least ten digits.
pub fn is_lookup_phone(phone: &str) -> bool {
    match phone.strip_prefix('+') {
        Some(digits) => digits.len() >= 10 && digits.chars().all(|c| c.is_ascii_digit()),
        None => false,
    }
}

/// Strips whitespace, dashes and parentheses a user may have typed.
pub fn normalize(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '(' && *c != ')')
        .collect()
}

/// Search terms match phones with or without the leading `+`.
pub fn search_digits(term: &str) -> Option<String> {
    let cleaned = normalize(term);
    let digits = cleaned.strip_prefix('+').unwrap_or(&cleaned);
    if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
        Some(digits.to_string())
    } else {
        None
    }
}

pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if is_canonical_phone(phone) {
        Ok(())
    } else {
        let mut err = ValidationError::new("phone");
        err.message = Some("phone must be '+' followed by a country code and at least 10 digits".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_phone() {
        assert!(is_canonical_phone("+911234567890"));
        assert!(!is_canonical_phone("911234567890"));
        assert!(!is_canonical_phone("+1234567890"));
        assert!(!is_canonical_phone("+91 1234567890"));
        assert!(!is_canonical_phone("+9112345678901234"));
    }

    #[test]
    fn test_lookup_phone() {
        assert!(is_lookup_phone("+1234567890"));
        assert!(is_lookup_phone("+911234567890"));
        assert!(!is_lookup_phone("+123456789"));
        assert!(!is_lookup_phone("1234567890"));
    }

    #[test]
    fn test_search_digits() {
        assert_eq!(search_digits("+91 12345"), Some("9112345".to_string()));
        assert_eq!(search_digits("1234"), Some("1234".to_string()));
        assert_eq!(search_digits("john"), None);
        assert_eq!(search_digits("+"), None);
    }
}
