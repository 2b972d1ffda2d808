use std::sync::Arc;

use watchtrack_db::store::PgVideoStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: the pool is reference counted and config sits behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: watchtrack_db::DbPool,
    /// Video store over the same pool.
    pub store: PgVideoStore,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(pool: watchtrack_db::DbPool, config: ServerConfig) -> Self {
        Self {
            store: PgVideoStore::new(pool.clone()),
            pool,
            config: Arc::new(config),
        }
    }
}
