//! Database error types.
//!
//! Every driver-level failure is normalized into one of these kinds.
//! Statement failures keep the driver's numeric code, SQLSTATE and message;
//! nothing is retried here, that is the caller's call.

use sqlx::error::DatabaseError as _;
use sqlx::mysql::MySqlDatabaseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    /// A session could not be established (or borrowed from the pool)
    /// before any SQL was issued.
    #[error("not connected: {0}")]
    NotConnected(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// The builder was asked to render a statement with no content,
    /// e.g. an INSERT without a single `set`.
    #[error("invalid statement: {0}")]
    InvalidStatement(String),

    /// A statement the server rejected.
    #[error("SQL error {code} (state {state}): {message}")]
    Sql {
        code: u16,
        state: String,
        message: String,
    },

    /// A row came back without the shape the caller expected.
    #[error("malformed row: {0}")]
    Malformed(String),

    #[error("driver error: {0}")]
    Driver(#[source] sqlx::Error),
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db) => {
                let code = db
                    .try_downcast_ref::<MySqlDatabaseError>()
                    .map(|e| e.number())
                    .unwrap_or_default();
                let state = db.code().map(|c| c.into_owned()).unwrap_or_default();
                DbError::Sql {
                    code,
                    state,
                    message: db.message().to_string(),
                }
            }
            err @ (sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)) => DbError::NotConnected(err.to_string()),
            err => DbError::Driver(err),
        }
    }
}

pub type DbResult<T> = std::result::Result<T, DbError>;
