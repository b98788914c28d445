// Application state module
// Immutable per-process bundle handed to every request

use crate::error::ApiError;
use crate::store::{self, DbPool};

use super::types::Config;

/// Application state
///
/// Built once in `main`, never mutated afterward, shared via `Arc`.
/// `pool` is `None` when no store URL was configured; requests that need
/// the store surface that as `ApiError::ConfigMissing`.
pub struct AppState {
    pub config: Config,
    pool: Option<DbPool>,
}

impl AppState {
    /// Create `AppState` from loaded configuration.
    ///
    /// The pool is constructed lazily (no connection I/O here); only a
    /// syntactically invalid store URL fails construction.
    pub fn new(config: Config) -> Result<Self, sqlx::Error> {
        let pool = match config.database.url.as_deref() {
            Some(url) => Some(store::connect_lazy(url, &config.database)?),
            None => None,
        };

        Ok(Self { config, pool })
    }

    /// State without a store, for requests that must answer the
    /// configuration error.
    #[cfg(test)]
    pub const fn without_store(config: Config) -> Self {
        Self { config, pool: None }
    }

    /// The store pool, or the configuration error when none was configured
    pub fn pool(&self) -> Result<&DbPool, ApiError> {
        self.pool.as_ref().ok_or(ApiError::ConfigMissing)
    }
}
