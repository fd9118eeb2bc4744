use std::ops::RangeInclusive;

use once_cell::sync::Lazy;
use regex::Regex;

/// National number lengths (digits, excluding the dial code) per dial code.
/// Dial codes not listed fall back to [`DEFAULT_DIGITS`].
static DIGIT_RULES: &[(&str, RangeInclusive<usize>)] = &[
    ("1", 10..=10),    // US / Canada
    ("20", 10..=10),   // Egypt
    ("27", 9..=9),     // South Africa
    ("30", 10..=10),   // Greece
    ("31", 9..=9),     // Netherlands
    ("33", 9..=9),     // France
    ("34", 9..=9),     // Spain
    ("39", 9..=10),    // Italy
    ("44", 10..=11),   // United Kingdom
    ("49", 10..=11),   // Germany
    ("52", 10..=10),   // Mexico
    ("55", 10..=11),   // Brazil
    ("61", 9..=9),     // Australia
    ("63", 10..=10),   // Philippines
    ("65", 8..=8),     // Singapore
    ("81", 10..=10),   // Japan
    ("82", 9..=10),    // South Korea
    ("86", 11..=11),   // China
    ("91", 10..=10),   // India
    ("234", 10..=10),  // Nigeria
    ("254", 9..=9),    // Kenya
    ("971", 9..=9),    // UAE
];

/// Accepted range when the dial code has no explicit rule.
pub const DEFAULT_DIGITS: RangeInclusive<usize> = 6..=15;

static SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s\-\.\(\)]").unwrap());

/// Expected national-number digit range for a dial code ("+44", "44").
pub fn expected_digits(country_code: &str) -> RangeInclusive<usize> {
    let code = country_code.trim().trim_start_matches('+');
    DIGIT_RULES
        .iter()
        .find(|(dial, _)| *dial == code)
        .map(|(_, range)| range.clone())
        .unwrap_or(DEFAULT_DIGITS)
}

/// Strips common separators, leaving what should be bare digits.
pub fn normalize(phone: &str) -> String {
    SEPARATORS.replace_all(phone.trim(), "").to_string()
}

/// Validates a phone number against the selected country's digit rules.
/// Returns the user-facing message on failure.
pub fn validate(phone: &str, country_code: &str) -> Result<(), String> {
    let digits = normalize(phone);

    if digits.is_empty() {
        return Err("Enter a phone number".to_string());
    }
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err("Phone number may only contain digits and separators".to_string());
    }

    let expected = expected_digits(country_code);
    if !expected.contains(&digits.len()) {
        let msg = if expected.start() == expected.end() {
            format!("Phone number must have {} digits for the selected country", expected.start())
        } else {
            format!(
                "Phone number must have {}-{} digits for the selected country",
                expected.start(),
                expected.end()
            )
        };
        return Err(msg);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn us_number_with_ten_digits_is_valid() {
        assert!(validate("4035551234", "+1").is_ok());
    }

    #[test]
    fn separators_are_tolerated() {
        assert!(validate("(403) 555-1234", "1").is_ok());
        assert!(validate("07911 123.456", "+44").is_ok());
    }

    #[test]
    fn wrong_digit_count_is_rejected() {
        let err = validate("403555123", "+1").unwrap_err();
        assert!(err.contains("10 digits"));
    }

    #[test]
    fn uk_allows_ten_or_eleven_digits() {
        assert!(validate("7911123456", "+44").is_ok());
        assert!(validate("07911123456", "+44").is_ok());
        assert!(validate("791112345", "+44").is_err());
    }

    #[test]
    fn unknown_dial_code_uses_default_range() {
        assert!(validate("12345", "+999").is_err());
        assert!(validate("123456", "+999").is_ok());
        assert!(validate("123456789012345", "+999").is_ok());
        assert!(validate("1234567890123456", "+999").is_err());
    }

    #[test]
    fn letters_are_rejected() {
        assert!(validate("40355512ab", "+1").is_err());
    }

    #[test]
    fn empty_phone_is_rejected() {
        assert!(validate("   ", "+1").is_err());
    }
}
