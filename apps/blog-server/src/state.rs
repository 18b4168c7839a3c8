//! Application state - shared across all handlers.

use std::sync::Arc;

use blog_core::ports::PostRepository;
use blog_infra::InMemoryPostRepository;

use crate::config::AppConfig;

#[cfg(feature = "postgres")]
use blog_infra::{DatabasePool, PostgresPostRepository};
#[cfg(feature = "postgres")]
use migration::{Migrator, MigratorTrait};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostRepository>,
}

impl AppState {
    /// Build the application state with the configured post store.
    pub async fn new(config: &AppConfig) -> Self {
        #[cfg(feature = "postgres")]
        let posts: Arc<dyn PostRepository> = match &config.database {
            Some(db_config) => match connect(db_config, config.auto_migrate).await {
                Ok(repo) => Arc::new(repo),
                Err(e) => {
                    tracing::error!(
                        "Failed to prepare database: {}. Using in-memory fallback.",
                        e
                    );
                    Arc::new(InMemoryPostRepository::new())
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                Arc::new(InMemoryPostRepository::new())
            }
        };

        #[cfg(not(feature = "postgres"))]
        let posts: Arc<dyn PostRepository> = {
            if config.database.is_some() {
                tracing::warn!("DATABASE_URL ignored: built without postgres feature");
            }
            tracing::info!("Running without postgres feature - using in-memory repository");
            Arc::new(InMemoryPostRepository::new())
        };

        tracing::info!(backend = posts.backend(), "Application state initialized");

        Self::with_posts(posts)
    }

    pub fn with_posts(posts: Arc<dyn PostRepository>) -> Self {
        Self { posts }
    }

    /// State backed by a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::with_posts(Arc::new(InMemoryPostRepository::new()))
    }
}

#[cfg(feature = "postgres")]
async fn connect(
    config: &blog_infra::DatabaseConfig,
    auto_migrate: bool,
) -> Result<PostgresPostRepository, migration::DbErr> {
    let pool = DatabasePool::init(config).await?;

    if auto_migrate {
        tracing::info!("Applying pending migrations");
        Migrator::up(&pool.conn, None).await?;
    }

    Ok(PostgresPostRepository::new(pool.conn))
}
