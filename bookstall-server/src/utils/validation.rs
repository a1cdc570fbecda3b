//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SQLite TEXT has no built-in length enforcement, so the caps live here.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Names: listing titles, buyer/recipient names
pub const MAX_NAME_LEN: usize = 200;

/// Notes, return reasons
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: tracking numbers, phone, pincode
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Address lines
pub const MAX_ADDRESS_LEN: usize = 500;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_rejects_empty_and_whitespace() {
        assert!(validate_required_text("", "reason", MAX_NOTE_LEN).is_err());
        assert!(validate_required_text("   ", "reason", MAX_NOTE_LEN).is_err());
        assert!(validate_required_text("damaged cover", "reason", MAX_NOTE_LEN).is_ok());
    }

    #[test]
    fn required_text_rejects_over_limit() {
        let long = "x".repeat(MAX_NOTE_LEN + 1);
        assert!(validate_required_text(&long, "reason", MAX_NOTE_LEN).is_err());
    }

    #[test]
    fn optional_text_allows_none() {
        assert!(validate_optional_text(&None, "notes", MAX_NOTE_LEN).is_ok());
        assert!(validate_optional_text(&Some("ok".into()), "notes", MAX_NOTE_LEN).is_ok());
        let long = Some("x".repeat(MAX_NOTE_LEN + 1));
        assert!(validate_optional_text(&long, "notes", MAX_NOTE_LEN).is_err());
    }
}
