//! Input validation failures shared by every write path.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Required input is missing, blank or malformed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Word list title is missing or blank.
    TitleRequired,
    /// Card list id, front or back is missing or blank.
    MissingCardFields,
    /// Registration/login field is missing or blank.
    MissingField(&'static str),
    /// Email does not look like `local@domain.tld`.
    InvalidEmail,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TitleRequired => write!(f, "Title is required"),
            Self::MissingCardFields => write!(f, "Missing required fields"),
            Self::MissingField(field) => write!(f, "{field} is required"),
            Self::InvalidEmail => write!(f, "Invalid email address"),
        }
    }
}

impl Error for ValidationError {}

/// Trims optional free text and maps blank values to `None`.
pub fn normalize_optional_text(value: Option<String>) -> Option<String> {
    value.and_then(|text| {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::{normalize_optional_text, ValidationError};

    #[test]
    fn blank_optional_text_becomes_none() {
        assert_eq!(normalize_optional_text(None), None);
        assert_eq!(normalize_optional_text(Some("   ".to_string())), None);
        assert_eq!(
            normalize_optional_text(Some("por favor".to_string())).as_deref(),
            Some("por favor")
        );
    }

    #[test]
    fn optional_text_is_trimmed() {
        assert_eq!(
            normalize_optional_text(Some("  ¿Qué tal?\n".to_string())).as_deref(),
            Some("¿Qué tal?")
        );
    }

    #[test]
    fn messages_match_api_contract() {
        assert_eq!(ValidationError::TitleRequired.to_string(), "Title is required");
        assert_eq!(
            ValidationError::MissingCardFields.to_string(),
            "Missing required fields"
        );
    }
}
