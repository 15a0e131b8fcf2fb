//! Strength rule for the master passphrase.
//!
//! Only the master passphrase goes through this check; passwords stored
//! inside records are whatever the user wants them to be.

use thiserror::Error;

use crate::errors::Result;

/// Minimum master passphrase length, counted in characters.
pub const MIN_PASSPHRASE_CHARS: usize = 16;

/// Message returned when a candidate passes.
pub const ACCEPTED: &str = "Password is valid and strong enough.";

/// Why a candidate passphrase was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PolicyViolation {
    #[error("Password must be at least 16 characters!")]
    TooShort,

    #[error("Password must contain uppercase, lowercase, digits, and special characters!")]
    Composition,
}

/// Check a candidate master passphrase.
///
/// Rules are checked in order and the first failure wins:
/// 1. at least `MIN_PASSPHRASE_CHARS` characters;
/// 2. at least one uppercase letter, one lowercase letter, one digit,
///    and one character that is neither a letter nor a digit.
pub fn validate(candidate: &str) -> Result<&'static str> {
    if candidate.chars().count() < MIN_PASSPHRASE_CHARS {
        return Err(PolicyViolation::TooShort.into());
    }

    let has_upper = candidate.chars().any(char::is_uppercase);
    let has_lower = candidate.chars().any(char::is_lowercase);
    let has_digit = candidate.chars().any(|c| c.is_ascii_digit());
    let has_special = candidate.chars().any(|c| !c.is_alphanumeric());

    if !(has_upper && has_lower && has_digit && has_special) {
        return Err(PolicyViolation::Composition.into());
    }

    Ok(ACCEPTED)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::PassVaultError;

    fn violation(candidate: &str) -> Option<PolicyViolation> {
        match validate(candidate) {
            Ok(_) => None,
            Err(PassVaultError::WeakPassphrase(v)) => Some(v),
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn short_passphrase_is_rejected_for_length() {
        assert_eq!(violation("short1!"), Some(PolicyViolation::TooShort));
    }

    #[test]
    fn length_is_checked_before_composition() {
        // Fails both rules; length is reported.
        assert_eq!(violation("abc"), Some(PolicyViolation::TooShort));
    }

    #[test]
    fn missing_uppercase_is_rejected_for_composition() {
        assert_eq!(
            violation("alllowercase1234567!"),
            Some(PolicyViolation::Composition)
        );
    }

    #[test]
    fn each_class_is_required() {
        assert_eq!(
            violation("NOLOWERCASE1234567!"),
            Some(PolicyViolation::Composition)
        );
        assert_eq!(
            violation("NoDigitsAtAllHere!"),
            Some(PolicyViolation::Composition)
        );
        assert_eq!(
            violation("NoSpecialChars12345"),
            Some(PolicyViolation::Composition)
        );
    }

    #[test]
    fn numeric_symbols_are_not_digits() {
        assert_eq!(
            violation("ValidPassword\u{bd}\u{bd}\u{bd}!"),
            Some(PolicyViolation::Composition)
        );
        assert_eq!(
            violation("RomanNumeral\u{216b}Only!"),
            Some(PolicyViolation::Composition)
        );
    }

    #[test]
    fn valid_passphrase_is_accepted() {
        assert_eq!(validate("ValidPass1234567!").unwrap(), ACCEPTED);
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        // 15 characters, but more than 16 bytes.
        let candidate = "Ééééééééé1!Abcd";
        assert_eq!(candidate.chars().count(), 15);
        assert!(candidate.len() > MIN_PASSPHRASE_CHARS);
        assert_eq!(violation(candidate), Some(PolicyViolation::TooShort));
    }

    #[test]
    fn whitespace_counts_as_special() {
        assert!(validate("Valid Pass 1234567").is_ok());
    }
}
