use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// Cheaply cloneable: the pool is already reference-counted, the config
/// sits behind an `Arc`. No component holds mutable cross-request state;
/// everything mutable lives in the database.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: learnhub_db::DbPool,
    /// Server configuration (consulted by auth extractors and middleware).
    pub config: Arc<ServerConfig>,
}
