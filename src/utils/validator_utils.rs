use std::borrow::Cow;

use serde::{Deserialize, Deserializer};
use validator::ValidationError;

/// First path segments served by fixed routes; a profile at `/{username}/` must not shadow them.
pub const RESERVED_USERNAMES: [&str; 9] = [
    "accounts",
    "category",
    "comment",
    "commentsent",
    "health",
    "post",
    "profile",
    "reply",
    "reply-sent",
];

pub fn validate_required(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("is_required");
        error.message = Some(Cow::from("This field is required"));
        Err(error)
    } else {
        Ok(())
    }
}

/// Letters, digits and `_ . @ + -` only, and not a reserved path segment.
pub fn validate_username(value: &str) -> Result<(), ValidationError> {
    let allowed = |c: char| c.is_alphanumeric() || matches!(c, '_' | '.' | '@' | '+' | '-');
    if !value.chars().all(allowed) {
        let mut error = ValidationError::new("invalid_username");
        error.message = Some(Cow::from(
            "Enter a valid username. It may contain only letters, numbers, and @/./+/-/_ characters",
        ));
        return Err(error);
    }

    if RESERVED_USERNAMES.iter().any(|r| r.eq_ignore_ascii_case(value)) {
        let mut error = ValidationError::new("reserved_username");
        error.message = Some(Cow::from("This username is not available"));
        return Err(error);
    }

    Ok(())
}

/// Deserializes a string with surrounding whitespace removed, so length rules see the stored value.
pub fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    Ok(value.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_are_rejected() {
        assert!(validate_required("").is_err());
        assert!(validate_required("   \n").is_err());
        assert_eq!(validate_required("").unwrap_err().code, "is_required");
    }

    #[test]
    fn text_is_accepted() {
        assert!(validate_required(" nice shot ").is_ok());
    }

    #[test]
    fn usernames_allow_word_characters_and_a_few_symbols() {
        assert!(validate_username("ansel.adams").is_ok());
        assert!(validate_username("jürgen_99+photo@home-lab").is_ok());
        assert_eq!(validate_username("two words").unwrap_err().code, "invalid_username");
        assert_eq!(validate_username("a/b").unwrap_err().code, "invalid_username");
        assert_eq!(validate_username("x?y").unwrap_err().code, "invalid_username");
    }

    #[test]
    fn route_segments_cannot_be_usernames() {
        assert_eq!(validate_username("profile").unwrap_err().code, "reserved_username");
        assert_eq!(validate_username("Profile").unwrap_err().code, "reserved_username");
        assert_eq!(validate_username("reply-sent").unwrap_err().code, "reserved_username");
        assert!(validate_username("profiles").is_ok());
    }

    #[derive(Deserialize)]
    struct Form {
        #[serde(default, deserialize_with = "trimmed")]
        name: String,
    }

    #[test]
    fn trimmed_strips_before_anything_else_sees_it() {
        let form: Form = serde_json::from_str(r#"{"name": "  ab  "}"#).unwrap();
        assert_eq!(form.name, "ab");

        let form: Form = serde_json::from_str("{}").unwrap();
        assert_eq!(form.name, "");
    }
}
