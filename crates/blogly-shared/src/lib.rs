//! # Blogly Shared
//!
//! Wire types shared by the server and its tests: the URL-encoded form
//! payloads and the problem document behind error pages.

pub mod dto;
pub mod response;

pub use dto::{FormError, PostForm, TagForm, UserForm};
pub use response::ErrorResponse;
