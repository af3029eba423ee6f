//! # Blogly Infrastructure
//!
//! Concrete implementations of the repository ports defined in `blogly-core`.
//!
//! ## Feature Flags
//!
//! - `postgres` (default) - PostgreSQL repositories via SeaORM
//! - without default features - In-memory store only

pub mod database;
pub mod memory;

pub use database::{DatabaseConfig, DatabaseConnections};
pub use memory::InMemoryStore;

#[cfg(feature = "postgres")]
pub use database::{PostgresPostRepository, PostgresTagRepository, PostgresUserRepository};
