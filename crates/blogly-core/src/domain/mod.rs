//! Domain entities - the core business objects.

mod post;
mod tag;
mod user;

pub use post::{Post, PostInput};
pub use tag::{Tag, TagInput};
pub use user::{DEFAULT_IMAGE_URL, User, UserInput};

use crate::error::DomainError;

/// Upper bound, in characters, for names, titles and tag labels.
pub const MAX_LABEL_LEN: usize = 50;

/// Trim a submitted value, treating blank input as absent.
fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn required(label: &str, value: Option<&str>) -> Result<String, DomainError> {
    present(value)
        .map(str::to_owned)
        .ok_or_else(|| DomainError::Validation(format!("The {label} is required")))
}

fn bounded(label: &str, value: String) -> Result<String, DomainError> {
    if value.chars().count() > MAX_LABEL_LEN {
        return Err(DomainError::Validation(format!(
            "The {label} must be at most {MAX_LABEL_LEN} characters"
        )));
    }
    Ok(value)
}
