//! # Blogly Core
//!
//! The domain layer of Blogly: users, posts and tags, the rules for
//! validating what a form may write into them, and the repository ports
//! that infrastructure must implement.
//! This crate has zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;

pub use error::{DomainError, RepoError};
