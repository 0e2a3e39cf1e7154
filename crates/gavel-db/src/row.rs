//! Rendering result cells as text.
//!
//! Results round-trip as strings regardless of the column's SQL type;
//! NULL renders as the empty string.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::{Column as _, Row as _, TypeInfo as _};

use crate::error::{DbError, DbResult};

pub(crate) fn value_as_text(row: &MySqlRow, ordinal: usize) -> DbResult<String> {
    let column = row
        .columns()
        .get(ordinal)
        .ok_or_else(|| DbError::Malformed(format!("no column at ordinal {ordinal}")))?;

    let text = match column.type_info().name() {
        "NULL" => None,
        "BOOLEAN" => row
            .try_get::<Option<bool>, _>(ordinal)?
            .map(|v| if v { "1".to_string() } else { "0".to_string() }),
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => row
            .try_get::<Option<i64>, _>(ordinal)?
            .map(|v| v.to_string()),
        "TINYINT UNSIGNED" | "SMALLINT UNSIGNED" | "MEDIUMINT UNSIGNED" | "INT UNSIGNED"
        | "BIGINT UNSIGNED" | "YEAR" => row
            .try_get::<Option<u64>, _>(ordinal)?
            .map(|v| v.to_string()),
        "FLOAT" => row
            .try_get::<Option<f32>, _>(ordinal)?
            .map(|v| v.to_string()),
        "DOUBLE" => row
            .try_get::<Option<f64>, _>(ordinal)?
            .map(|v| v.to_string()),
        "DATE" => row
            .try_get::<Option<NaiveDate>, _>(ordinal)?
            .map(|v| v.format("%Y-%m-%d").to_string()),
        "TIME" => row
            .try_get::<Option<NaiveTime>, _>(ordinal)?
            .map(|v| v.format("%H:%M:%S").to_string()),
        "DATETIME" => row
            .try_get::<Option<NaiveDateTime>, _>(ordinal)?
            .map(|v| v.format("%Y-%m-%d %H:%M:%S").to_string()),
        "TIMESTAMP" => row
            .try_get::<Option<DateTime<Utc>>, _>(ordinal)?
            .map(|v| v.format("%Y-%m-%d %H:%M:%S").to_string()),
        // CHAR/VARCHAR/TEXT/ENUM and anything else textual.
        _ => row.try_get::<Option<String>, _>(ordinal)?,
    };

    Ok(text.unwrap_or_default())
}
