//! Input validation helpers
//!
//! Centralized limits and validation functions used by the CRUD handlers.

use crate::utils::AppError;

// ── Limits ──────────────────────────────────────────────────────────

/// Organization and branch names
pub const MAX_NAME_LEN: usize = 200;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Rating scores (inclusive)
pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 5;

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

/// Structural email check: one `@`, non-empty local part, dotted domain.
pub fn validate_email(value: &str) -> Result<(), AppError> {
    validate_required_text(value, "email", MAX_EMAIL_LEN)?;

    let mut parts = value.split('@');
    let valid = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        _ => false,
    };

    if valid {
        Ok(())
    } else {
        Err(AppError::validation(format!(
            "Invalid email address: {value}"
        )))
    }
}

/// Validate a rating score (1-5).
pub fn validate_score(score: u8, category: &str) -> Result<(), AppError> {
    if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
        return Err(AppError::validation(format!(
            "Score for {category} must be between {MIN_SCORE} and {MAX_SCORE}, got {score}"
        )));
    }
    Ok(())
}

/// Validate a week number (1-based).
pub fn validate_week(week: u32) -> Result<(), AppError> {
    if week == 0 {
        return Err(AppError::validation("week must be >= 1".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_email() {
        assert!(validate_email("ana@example.com").is_ok());
    }

    #[test]
    fn rejects_malformed_emails() {
        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("two@@example.com").is_err());
        assert!(validate_email("dotless@example").is_err());
        assert!(validate_email("trailing@example.").is_err());
    }

    #[test]
    fn score_bounds_are_inclusive() {
        assert!(validate_score(1, "time").is_ok());
        assert!(validate_score(5, "time").is_ok());
        assert!(validate_score(0, "time").is_err());
        assert!(validate_score(6, "time").is_err());
    }

    #[test]
    fn week_zero_is_rejected() {
        assert!(validate_week(0).is_err());
        assert!(validate_week(1).is_ok());
    }
}
