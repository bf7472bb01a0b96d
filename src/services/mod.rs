//! Services for the notes API.
//!
//! Each service is a thin data-access object over the pool: it validates
//! input, issues the storage queries and assembles transport models.

mod categories;
mod notes;
mod users;

pub use categories::CategoryService;
pub use notes::{NoteInput, NoteService};
pub use users::{NewUser, UserService};

use crate::{Error, Result};

/// Validate a required text field.
///
/// Absent and blank values are rejected with `missing`; values longer
/// than `max_chars` characters are rejected as well.
pub(crate) fn required_text(
    value: Option<String>,
    field: &str,
    missing: &str,
    max_chars: usize,
) -> Result<String> {
    let value = value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| Error::Validation(missing.to_string()))?;

    check_length(&value, field, max_chars)?;

    Ok(value)
}

/// Reject values longer than `max_chars` characters.
pub(crate) fn check_length(value: &str, field: &str, max_chars: usize) -> Result<()> {
    if value.chars().count() > max_chars {
        return Err(Error::Validation(format!(
            "{} must be at most {} characters!",
            field, max_chars
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text_rejects_missing_and_blank() {
        for value in [None, Some(String::new()), Some("   ".to_string())] {
            let err = required_text(value, "Body", "Body is required!", 200).unwrap_err();
            assert_eq!(err.to_string(), "Body is required!");
        }
    }

    #[test]
    fn test_required_text_counts_characters_not_bytes() {
        let accented = "é".repeat(200);
        assert!(required_text(Some(accented), "Body", "Body is required!", 200).is_ok());

        let err = required_text(Some("x".repeat(201)), "Body", "Body is required!", 200)
            .unwrap_err();
        assert_eq!(err.to_string(), "Body must be at most 200 characters!");
    }
}
