use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{bounded, present};
use crate::error::DomainError;

/// Post entity - a blog entry owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Validated field values for creating or editing a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostInput {
    pub title: String,
    pub content: String,
    /// Tags to associate, sorted and without repeats.
    pub tag_ids: Vec<i32>,
}

impl PostInput {
    pub fn new(
        title: Option<&str>,
        content: Option<&str>,
        mut tag_ids: Vec<i32>,
    ) -> Result<Self, DomainError> {
        let (Some(title), Some(content)) = (present(title), present(content)) else {
            return Err(DomainError::Validation(
                "Both title and content are required".to_string(),
            ));
        };
        let title = bounded("title", title.to_owned())?;

        tag_ids.sort_unstable();
        tag_ids.dedup();

        Ok(Self {
            title,
            content: content.to_owned(),
            tag_ids,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_and_content_are_required() {
        assert!(PostInput::new(None, Some("body"), vec![]).is_err());
        assert!(PostInput::new(Some("title"), Some("  "), vec![]).is_err());
        assert!(PostInput::new(Some("title"), Some("body"), vec![]).is_ok());
    }

    #[test]
    fn test_title_is_length_bounded() {
        let err = PostInput::new(Some(&"t".repeat(51)), Some("body"), vec![]).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn test_tag_ids_are_normalized() {
        let input = PostInput::new(Some("t"), Some("c"), vec![3, 1, 3, 2]).unwrap();
        assert_eq!(input.tag_ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_content_is_unbounded() {
        let content = "lorem ipsum ".repeat(1000);
        let input = PostInput::new(Some("t"), Some(&content), vec![]).unwrap();
        assert_eq!(input.content, content.trim());
    }
}
