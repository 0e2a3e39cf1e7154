//! Database layer for the Gavel online judge.
//!
//! Provides the fluent parameterized statement builders, repository
//! traits and their MySQL implementations. See `schema.sql` for the
//! tables the repositories expect.

pub mod error;
pub mod query;
pub mod repo;

mod row;
mod stmt;

pub use error::{DbError, DbResult};
pub use query::{Database, Delete, Insert, Row, Select, Update};
pub use repo::*;

use sqlx::mysql::{MySqlPool, MySqlPoolOptions};

/// Create the shared connection pool builders borrow from.
pub async fn connect(url: &str, max_connections: u32) -> DbResult<MySqlPool> {
    MySqlPoolOptions::new()
        .max_connections(max_connections)
        .connect(url)
        .await
        .map_err(|e| DbError::NotConnected(e.to_string()))
}
