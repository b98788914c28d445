// Store module entry point
// PostgreSQL access via sqlx: pool construction and the fields/events queries

mod fields;

use std::str::FromStr;
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{Pool, Postgres};

use crate::config::DatabaseConfig;

pub use fields::{insert_field, list_fields, upcoming_events, CreatedFieldRow, EventRow, FieldRow, NewField};

pub type DbPool = Pool<Postgres>;

/// Build a pool without connecting.
///
/// `connect_lazy_with` performs no I/O; the first request that acquires a
/// connection pays for the handshake, and connect failures surface there
/// as store errors. Only URL parsing can fail here.
pub fn connect_lazy(database_url: &str, cfg: &DatabaseConfig) -> Result<DbPool, sqlx::Error> {
    let opts = PgConnectOptions::from_str(database_url)?;

    Ok(PgPoolOptions::new()
        .max_connections(cfg.max_connections)
        .acquire_timeout(Duration::from_secs(cfg.acquire_timeout))
        .idle_timeout(Duration::from_secs(cfg.idle_timeout))
        .connect_lazy_with(opts))
}
