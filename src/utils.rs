//! Utility helpers shared across the crate.

/// Capitalise the first letter of a &str.
pub fn capitalise_first(s: &str) -> String {
    let mut c = s.chars();
    match c.next() {
        None => String::new(),
        Some(f) => f.to_uppercase().collect::<String>() + c.as_str(),
    }
}

/// Parse the leading integer of a string, `parseInt`-style.
///
/// Leading whitespace and an optional sign are accepted; parsing stops at the
/// first non-digit. Returns `None` when no digit is found.
pub fn parse_leading_int(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let (sign, rest) = match s.as_bytes().first() {
        Some(b'-') => (-1.0, &s[1..]),
        Some(b'+') => (1.0, &s[1..]),
        _ => (1.0, s),
    };
    let digits: &str = {
        let end = rest
            .char_indices()
            .find(|(_, c)| !c.is_ascii_digit())
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        &rest[..end]
    };
    if digits.is_empty() {
        return None;
    }
    digits.parse::<f64>().ok().map(|n| sign * n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalise_first() {
        assert_eq!(capitalise_first("update"), "Update");
        assert_eq!(capitalise_first(""), "");
        assert_eq!(capitalise_first("x"), "X");
    }

    #[test]
    fn test_parse_leading_int() {
        assert_eq!(parse_leading_int("50"), Some(50.0));
        assert_eq!(parse_leading_int("  42px"), Some(42.0));
        assert_eq!(parse_leading_int("-7"), Some(-7.0));
        assert_eq!(parse_leading_int("+3"), Some(3.0));
        assert_eq!(parse_leading_int("12.9"), Some(12.0));
        assert_eq!(parse_leading_int("abc"), None);
        assert_eq!(parse_leading_int("-"), None);
        assert_eq!(parse_leading_int(""), None);
    }
}
