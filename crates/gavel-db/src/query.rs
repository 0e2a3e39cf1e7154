//! Fluent parameterized statement builders.
//!
//! All persistence in the workspace funnels through these. A builder
//! borrows one connection from the shared pool for the scoped duration of
//! its terminal call; values are always bound as strings through `?`
//! placeholders, and callers passing integers go through `ToString`.

use std::collections::BTreeMap;

use sqlx::mysql::{MySqlConnection, MySqlPool};
use sqlx::pool::PoolConnection;
use sqlx::{MySql, Row as _};

use crate::error::{DbError, DbResult};
use crate::row::value_as_text;
use crate::stmt::{
    DeleteStatement, InsertStatement, SelectStatement, UpdateStatement, quote_ident,
};

/// One result row: column name to text value, NULL rendered as "".
pub type Row = BTreeMap<String, String>;

/// Handle to the relational store; vends statement builders.
#[derive(Clone)]
pub struct Database {
    pool: MySqlPool,
}

impl Database {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub fn select(&self, table: &str) -> Select<'_> {
        Select {
            db: self,
            stmt: SelectStatement::new(table),
        }
    }

    pub fn insert(&self, table: &str) -> Insert<'_> {
        Insert {
            db: self,
            stmt: InsertStatement::new(table),
        }
    }

    pub fn update(&self, table: &str) -> Update<'_> {
        Update {
            db: self,
            stmt: UpdateStatement::new(table),
        }
    }

    pub fn delete(&self, table: &str) -> Delete<'_> {
        Delete {
            db: self,
            stmt: DeleteStatement::new(table),
        }
    }

    /// Row count of the whole table. No filtering.
    pub async fn size(&self, table: &str) -> DbResult<u64> {
        let mut conn = self.acquire().await?;
        let sql = format!("SELECT COUNT(*) FROM {}", quote_ident(table));
        let row = sqlx::query(&sql)
            .fetch_one(&mut *conn)
            .await
            .map_err(DbError::from)?;
        let count: i64 = row.try_get(0)?;
        Ok(count as u64)
    }

    /// Remove all rows and reset identity generation. Irreversible, and
    /// deliberately unconfirmed.
    pub async fn truncate(&self, table: &str) -> DbResult<()> {
        let mut conn = self.acquire().await?;
        let sql = format!("TRUNCATE TABLE {}", quote_ident(table));
        sqlx::query(&sql)
            .execute(&mut *conn)
            .await
            .map_err(DbError::from)?;
        Ok(())
    }

    async fn acquire(&self) -> DbResult<PoolConnection<MySql>> {
        self.pool
            .acquire()
            .await
            .map_err(|e| DbError::NotConnected(e.to_string()))
    }
}

/// SELECT builder.
pub struct Select<'a> {
    db: &'a Database,
    stmt: SelectStatement,
}

impl Select<'_> {
    /// Request one column. If no column is requested at all, the table's
    /// declared columns are used, in schema order.
    pub fn column(mut self, name: &str) -> Self {
        self.stmt.columns.push(name.to_string());
        self
    }

    /// Add an equality predicate; predicates are AND-conjoined. This is
    /// the only supported predicate shape.
    pub fn where_eq(mut self, column: &str, value: impl ToString) -> Self {
        self.stmt
            .filters
            .push((column.to_string(), value.to_string()));
        self
    }

    /// Add a sort key; repeat for a stable multi-key order, first call is
    /// the primary key.
    pub fn order_by(mut self, column: &str, ascending: bool) -> Self {
        self.stmt.orders.push((column.to_string(), ascending));
        self
    }

    /// `limit(0)` asks for zero rows; leaving the limit unset emits no
    /// LIMIT clause.
    pub fn limit(mut self, n: u64) -> Self {
        self.stmt.limit = Some(n);
        self
    }

    pub fn offset(mut self, n: u64) -> Self {
        self.stmt.offset = Some(n);
        self
    }

    pub async fn fetch(mut self) -> DbResult<Vec<Row>> {
        let mut conn = self.db.acquire().await?;
        if self.stmt.columns.is_empty() {
            let declared = describe_columns(&mut *conn, &self.stmt.table).await?;
            self.stmt.default_columns(declared);
        }
        let sql = self.stmt.sql();
        let mut query = sqlx::query(&sql);
        for value in self.stmt.params() {
            query = query.bind(value);
        }
        let rows = query
            .fetch_all(&mut *conn)
            .await
            .map_err(DbError::from)?;
        rows.iter()
            .map(|row| text_row(row, &self.stmt.columns))
            .collect()
    }
}

fn text_row(row: &sqlx::mysql::MySqlRow, columns: &[String]) -> DbResult<Row> {
    let mut out = Row::new();
    for (ordinal, column) in columns.iter().enumerate() {
        out.insert(column.clone(), value_as_text(row, ordinal)?);
    }
    Ok(out)
}

/// INSERT builder.
pub struct Insert<'a> {
    db: &'a Database,
    stmt: InsertStatement,
}

impl Insert<'_> {
    pub fn set(mut self, column: &str, value: impl ToString) -> Self {
        self.stmt
            .assignments
            .push((column.to_string(), value.to_string()));
        self
    }

    /// Execute the insert and return the identity the store generated for
    /// it. The identity is read from the statement's own connection, so a
    /// concurrent insert on another connection cannot be observed instead.
    pub async fn execute(self) -> DbResult<u64> {
        if self.stmt.assignments.is_empty() {
            return Err(DbError::InvalidStatement(
                "INSERT requires at least one set()".to_string(),
            ));
        }
        let mut conn = self.db.acquire().await?;
        let sql = self.stmt.sql();
        let mut query = sqlx::query(&sql);
        for value in self.stmt.params() {
            query = query.bind(value);
        }
        let result = query
            .execute(&mut *conn)
            .await
            .map_err(DbError::from)?;
        Ok(result.last_insert_id())
    }
}

/// UPDATE builder.
pub struct Update<'a> {
    db: &'a Database,
    stmt: UpdateStatement,
}

impl Update<'_> {
    pub fn set(mut self, column: &str, value: impl ToString) -> Self {
        self.stmt
            .assignments
            .push((column.to_string(), value.to_string()));
        self
    }

    /// Add an equality predicate. Omitting `where_eq` entirely updates
    /// every row in the table; that is the caller's responsibility, not
    /// guarded here.
    pub fn where_eq(mut self, column: &str, value: impl ToString) -> Self {
        self.stmt
            .filters
            .push((column.to_string(), value.to_string()));
        self
    }

    /// Execute the update, returning the number of rows affected.
    pub async fn execute(self) -> DbResult<u64> {
        if self.stmt.assignments.is_empty() {
            return Err(DbError::InvalidStatement(
                "UPDATE requires at least one set()".to_string(),
            ));
        }
        let mut conn = self.db.acquire().await?;
        let sql = self.stmt.sql();
        let mut query = sqlx::query(&sql);
        for value in self.stmt.params() {
            query = query.bind(value);
        }
        let result = query
            .execute(&mut *conn)
            .await
            .map_err(DbError::from)?;
        Ok(result.rows_affected())
    }
}

/// DELETE builder.
pub struct Delete<'a> {
    db: &'a Database,
    stmt: DeleteStatement,
}

impl Delete<'_> {
    /// Add an equality predicate. Omitting `where_eq` deletes every row;
    /// same contract as [`Update::where_eq`].
    pub fn where_eq(mut self, column: &str, value: impl ToString) -> Self {
        self.stmt
            .filters
            .push((column.to_string(), value.to_string()));
        self
    }

    /// Execute the delete, returning the number of rows affected.
    pub async fn execute(self) -> DbResult<u64> {
        let mut conn = self.db.acquire().await?;
        let sql = self.stmt.sql();
        let mut query = sqlx::query(&sql);
        for value in self.stmt.params() {
            query = query.bind(value);
        }
        let result = query
            .execute(&mut *conn)
            .await
            .map_err(DbError::from)?;
        Ok(result.rows_affected())
    }
}

/// The table's declared columns, in schema order.
async fn describe_columns(conn: &mut MySqlConnection, table: &str) -> DbResult<Vec<String>> {
    let sql = format!("DESCRIBE {}", quote_ident(table));
    let rows = sqlx::query(&sql)
        .fetch_all(&mut *conn)
        .await
        .map_err(DbError::from)?;
    // First column of DESCRIBE output is the field name.
    rows.iter().map(|row| value_as_text(row, 0)).collect()
}
