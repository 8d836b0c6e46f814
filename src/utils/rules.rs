//! Field rules shared by the resource validators.

use std::sync::LazyLock;

use regex::Regex;
use validator::ValidateLength;

use ratingsapp_core::errors::{AppError, ErrorCode};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9._%+\-]+@[a-z0-9._\-]+\.[a-z0-9._\-]{2,16}$")
        .expect("email pattern compiles")
});

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern compiles"));

pub const MIN_PASSWORD_LEN: u64 = 8;
pub const MIN_FIRST_NAME_LEN: u64 = 2;
pub const MAX_SETTINGS_LEN: u64 = 8192;
pub const MIN_LABEL_LEN: u64 = 4;
pub const MAX_COMMENT_LEN: u64 = 512;
pub const MAX_EXTRA_LEN: u64 = 512;

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Lowercases, trims and collapses inner whitespace runs to one space.
pub fn normalize_label(label: &str) -> String {
    WHITESPACE_RE
        .replace_all(label.trim(), " ")
        .to_lowercase()
}

/// Expects an already normalized address.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Lengths below are counted in characters, the way `#[validate(length)]` counts.
pub fn required(value: &str) -> Result<(), AppError> {
    if !value.validate_length(Some(1), None, None) {
        return Err(ErrorCode::Required.into());
    }
    Ok(())
}

pub fn min_len(value: &str, min: u64) -> Result<(), AppError> {
    if !value.validate_length(Some(min), None, None) {
        return Err(ErrorCode::TooShort.into());
    }
    Ok(())
}

pub fn max_len(value: &str, max: u64) -> Result<(), AppError> {
    if !value.validate_length(None, Some(max), None) {
        return Err(ErrorCode::TooLong.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  USER@EXAMPLE.COM  "), "user@example.com");
    }

    #[test]
    fn test_email_format() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("first.last+tag@sub.example.co"));
        assert!(!is_valid_email("user@example"));
        assert!(!is_valid_email("user example@x.com"));
        assert!(!is_valid_email("USER@EXAMPLE.COM"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_normalize_label() {
        assert_eq!(normalize_label("  Site   Editors\t Team "), "site editors team");
    }

    #[test]
    fn test_lengths() {
        assert!(required("").unwrap_err().is(ErrorCode::Required));
        assert!(min_len("abc", 4).unwrap_err().is(ErrorCode::TooShort));
        assert!(max_len("abcde", 4).unwrap_err().is(ErrorCode::TooLong));
        assert!(min_len("abcd", 4).is_ok());
        assert!(max_len("abcd", 4).is_ok());
    }

    #[test]
    fn test_lengths_count_characters() {
        assert!(required(" ").is_ok());
        assert!(min_len("żółw", 4).is_ok());
        assert!(max_len("żółw", 4).is_ok());
        assert!(max_len("żółwie", 4).unwrap_err().is(ErrorCode::TooLong));
    }
}
