use serde::{Deserialize, Serialize};

use super::{bounded, present, required};
use crate::error::DomainError;

/// Profile image used when a user does not supply one.
pub const DEFAULT_IMAGE_URL: &str = "/static/default_profile.jpg";

/// User entity - a blog author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub image_url: String,
}

impl User {
    /// First and last name joined for display.
    pub fn full_name(&self) -> String {
        if self.last_name.is_empty() {
            self.first_name.clone()
        } else {
            format!("{} {}", self.first_name, self.last_name)
        }
    }
}

/// Validated field values for creating or editing a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInput {
    pub first_name: String,
    pub last_name: String,
    pub image_url: String,
}

impl UserInput {
    /// Validate raw form values.
    ///
    /// The first name is required. A missing last name becomes empty and a
    /// missing image URL falls back to [`DEFAULT_IMAGE_URL`].
    pub fn new(
        first_name: Option<&str>,
        last_name: Option<&str>,
        image_url: Option<&str>,
    ) -> Result<Self, DomainError> {
        let first_name = bounded("first name", required("first name", first_name)?)?;
        let last_name = bounded(
            "last name",
            present(last_name).unwrap_or_default().to_owned(),
        )?;
        let image_url = present(image_url).unwrap_or(DEFAULT_IMAGE_URL).to_owned();

        Ok(Self {
            first_name,
            last_name,
            image_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_name_is_required() {
        let err = UserInput::new(None, Some("Example"), None).unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg == "The first name is required"));

        assert!(UserInput::new(Some("   "), None, None).is_err());
    }

    #[test]
    fn test_defaults_are_applied() {
        let input = UserInput::new(Some(" Our "), Some(""), Some("")).unwrap();
        assert_eq!(input.first_name, "Our");
        assert_eq!(input.last_name, "");
        assert_eq!(input.image_url, DEFAULT_IMAGE_URL);
    }

    #[test]
    fn test_names_are_length_bounded() {
        let long = "x".repeat(51);
        assert!(UserInput::new(Some(&long), None, None).is_err());
        assert!(UserInput::new(Some("Ok"), Some(&long), None).is_err());
        assert!(UserInput::new(Some(&"x".repeat(50)), None, None).is_ok());
    }

    #[test]
    fn test_full_name() {
        let mut user = User {
            id: 1,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            image_url: DEFAULT_IMAGE_URL.to_string(),
        };
        assert_eq!(user.full_name(), "Ada Lovelace");
        user.last_name.clear();
        assert_eq!(user.full_name(), "Ada");
    }
}
