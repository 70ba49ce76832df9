//! Application state - shared across all handlers.

use std::sync::Arc;

use gazette_core::ports::{
    CategoryRepository, CommentRepository, LocationRepository, PostRepository, UserRepository,
};
use gazette_infra::{
    MemoryStore, PostgresCategoryRepository, PostgresCommentRepository,
    PostgresLocationRepository, PostgresPostRepository, PostgresUserRepository, connect,
};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub locations: Arc<dyn LocationRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub page_size: u64,
}

impl AppState {
    /// Build the application state with the appropriate store backend.
    ///
    /// Falls back to the in-memory store when no database is configured or
    /// the connection fails, so the server always comes up.
    pub async fn new(config: &AppConfig) -> Self {
        if let Some(db_config) = &config.database {
            match connect(db_config).await {
                Ok(conn) => {
                    return Self {
                        users: Arc::new(PostgresUserRepository::new(conn.clone())),
                        categories: Arc::new(PostgresCategoryRepository::new(conn.clone())),
                        locations: Arc::new(PostgresLocationRepository::new(conn.clone())),
                        posts: Arc::new(PostgresPostRepository::new(conn.clone())),
                        comments: Arc::new(PostgresCommentRepository::new(conn)),
                        page_size: config.page_size,
                    };
                }
                Err(e) => {
                    tracing::error!(
                        "failed to connect to database: {e}; using the in-memory store"
                    );
                }
            }
        } else {
            tracing::warn!("DATABASE_URL not set; running with the in-memory store");
        }

        Self::in_memory(config.page_size)
    }

    /// State backed entirely by one in-memory store.
    pub fn in_memory(page_size: u64) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            users: store.clone(),
            categories: store.clone(),
            locations: store.clone(),
            posts: store.clone(),
            comments: store,
            page_size,
        }
    }
}
