//! Table maintenance commands.

use anyhow::Result;
use gavel_db::Database;

pub async fn size(db: &Database, table: &str) -> Result<()> {
    println!("{}", db.size(table).await?);
    Ok(())
}

pub async fn truncate(db: &Database, table: &str) -> Result<()> {
    db.truncate(table).await?;
    println!("table {table} truncated");
    Ok(())
}
