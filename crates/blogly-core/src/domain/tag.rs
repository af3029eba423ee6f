use serde::{Deserialize, Serialize};

use super::{bounded, required};
use crate::error::DomainError;

/// Tag entity - a label attachable to many posts.
///
/// Names are unique, compared exactly after trimming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i32,
    pub name: String,
}

/// Validated field values for creating or renaming a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagInput {
    pub name: String,
}

impl TagInput {
    pub fn new(name: Option<&str>) -> Result<Self, DomainError> {
        Ok(Self {
            name: bounded("tag name", required("tag name", name)?)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_is_trimmed_and_required() {
        assert_eq!(TagInput::new(Some("  rust ")).unwrap().name, "rust");
        assert!(TagInput::new(Some("")).is_err());
        assert!(TagInput::new(None).is_err());
    }

    #[test]
    fn test_tag_serializes_for_templates() {
        let tag = Tag {
            id: 7,
            name: "fun".to_string(),
        };
        let json = serde_json::to_value(&tag).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["name"], "fun");
    }
}
