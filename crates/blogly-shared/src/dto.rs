//! Data Transfer Objects - URL-encoded form submissions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Submitted by the new-user and edit-user forms.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserForm {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub image_url: Option<String>,
}

/// Submitted by the new-tag and edit-tag forms.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagForm {
    pub name: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("Invalid tag selection: {0}")]
    InvalidTagId(String),
}

/// Submitted by the new-post and edit-post forms.
///
/// Tag checkboxes repeat the `tag_ids` key once per checked box, so this
/// form is built from raw key/value pairs rather than deserialized directly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostForm {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tag_ids: Vec<String>,
}

impl PostForm {
    pub const TAG_FIELD: &'static str = "tag_ids";

    /// Collect a form from decoded pairs. Unknown keys are ignored and the
    /// last value wins for single-valued fields.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut form = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "title" => form.title = Some(value),
                "content" => form.content = Some(value),
                Self::TAG_FIELD => form.tag_ids.push(value),
                _ => {}
            }
        }
        form
    }

    /// Parse the checked tag ids.
    pub fn parsed_tag_ids(&self) -> Result<Vec<i32>, FormError> {
        self.tag_ids
            .iter()
            .map(|raw| {
                raw.trim()
                    .parse()
                    .map_err(|_| FormError::InvalidTagId(raw.clone()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_post_form_collects_repeated_tag_ids() {
        let form = PostForm::from_pairs(pairs(&[
            ("title", "Hello"),
            ("content", "World"),
            ("tag_ids", "3"),
            ("tag_ids", "1"),
            ("csrf", "ignored"),
        ]));

        assert_eq!(form.title.as_deref(), Some("Hello"));
        assert_eq!(form.content.as_deref(), Some("World"));
        assert_eq!(form.parsed_tag_ids(), Ok(vec![3, 1]));
    }

    #[test]
    fn test_post_form_rejects_garbage_tag_id() {
        let form = PostForm::from_pairs(pairs(&[("tag_ids", "abc")]));
        assert_eq!(
            form.parsed_tag_ids(),
            Err(FormError::InvalidTagId("abc".to_string()))
        );
    }

    #[test]
    fn test_missing_fields_stay_none() {
        let form: UserForm = serde_json::from_str(r#"{"first_name":"Our"}"#).unwrap();
        assert_eq!(form.first_name.as_deref(), Some("Our"));
        assert!(form.last_name.is_none());
        assert!(PostForm::from_pairs(Vec::new()).title.is_none());
    }
}
