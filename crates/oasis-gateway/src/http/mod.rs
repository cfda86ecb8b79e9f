pub mod categories;
pub mod habits;
pub mod health;
pub mod insights;
pub mod journal;
pub mod users;

/// Cheap shape check — real deliverability is the mail server's problem.
pub(crate) fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !email.contains(char::is_whitespace)
}

/// Validate a `YYYY-MM-DD` calendar date string.
pub(crate) fn parse_date(s: &str) -> Option<chrono::NaiveDate> {
    // Strict shape first — chrono alone would accept unpadded fields.
    let b = s.as_bytes();
    if b.len() != 10 || b[4] != b'-' || b[7] != b'-' {
        return None;
    }
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("ana@example.com"));
        assert!(!is_valid_email("ana@example"));
        assert!(!is_valid_email("anaexample.com"));
        assert!(!is_valid_email("ana @example.com"));
        assert!(!is_valid_email("@example.com"));
    }

    #[test]
    fn date_shapes() {
        assert!(parse_date("2024-02-29").is_some());
        assert!(parse_date("2023-02-29").is_none());
        assert!(parse_date("2024-3-9").is_none());
        assert!(parse_date("march 9").is_none());
    }
}
