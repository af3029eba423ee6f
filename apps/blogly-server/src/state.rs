//! Application state - shared across all handlers.

use std::sync::Arc;

use blogly_core::ports::{PostRepository, TagRepository, UserRepository};
use blogly_infra::InMemoryStore;
use blogly_infra::database::DatabaseConnections;
use tera::Tera;

use crate::config::AppConfig;

#[cfg(feature = "postgres")]
use blogly_infra::database::{
    DatabaseConfig, PostgresPostRepository, PostgresTagRepository, PostgresUserRepository,
};
#[cfg(feature = "postgres")]
use migration::{DbErr, Migrator, MigratorTrait};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub tags: Arc<dyn TagRepository>,
    pub templates: Arc<Tera>,
    pub db: Option<Arc<DatabaseConnections>>,
}

impl AppState {
    /// Build the application state, falling back to the in-memory store when
    /// no database is configured or it cannot be reached.
    pub async fn new(config: &AppConfig, templates: Tera) -> Self {
        #[cfg(feature = "postgres")]
        {
            if let Some(db_config) = config.database.as_ref() {
                match open_database(db_config, config.auto_migrate).await {
                    Ok(connections) => {
                        let conn = Arc::new(connections);
                        tracing::info!("Application state initialized (postgres)");
                        return Self {
                            users: Arc::new(PostgresUserRepository::new(conn.main.clone())),
                            posts: Arc::new(PostgresPostRepository::new(conn.main.clone())),
                            tags: Arc::new(PostgresTagRepository::new(conn.main.clone())),
                            templates: Arc::new(templates),
                            db: Some(conn),
                        };
                    }
                    Err(e) => {
                        tracing::error!(
                            "Failed to open database: {}. Using in-memory store.",
                            e
                        );
                    }
                }
            } else {
                tracing::warn!("DATABASE_URL not set. Running on the in-memory store.");
            }
        }

        #[cfg(not(feature = "postgres"))]
        {
            if config.database.is_some() {
                tracing::warn!("Built without postgres feature - ignoring DATABASE_URL");
            }
        }

        tracing::info!("Application state initialized (in-memory)");
        Self::in_memory(InMemoryStore::new(), templates)
    }

    /// State backed by an in-memory store.
    pub fn in_memory(store: InMemoryStore, templates: Tera) -> Self {
        Self {
            users: Arc::new(store.users()),
            posts: Arc::new(store.posts()),
            tags: Arc::new(store.tags()),
            templates: Arc::new(templates),
            db: None,
        }
    }
}

/// Connect, then bring the schema up to date unless told not to.
#[cfg(feature = "postgres")]
async fn open_database(
    config: &DatabaseConfig,
    auto_migrate: bool,
) -> Result<DatabaseConnections, DbErr> {
    let connections = DatabaseConnections::init(config).await?;

    if auto_migrate {
        Migrator::up(&connections.main, None).await?;
        tracing::info!("Database schema is up to date");
    } else {
        tracing::info!("DB_AUTO_MIGRATE is off; skipping migrations");
    }

    Ok(connections)
}
