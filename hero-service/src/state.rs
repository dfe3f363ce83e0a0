//! Application state shared across handlers

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::Config;
use crate::handlers::HeroHandler;
use crate::repository::SqliteHeroRepository;

/// Configuration and connection pool, cloned into every request
#[derive(Debug, Clone)]
pub struct AppState {
    config: Arc<Config>,
    pool: SqlitePool,
}

impl AppState {
    pub fn new(config: Config, pool: SqlitePool) -> Self {
        Self {
            config: Arc::new(config),
            pool,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Hero operations over this state's pool
    pub fn heroes(&self) -> HeroHandler<SqliteHeroRepository> {
        HeroHandler::new(SqliteHeroRepository::new(self.pool.clone()))
    }
}
