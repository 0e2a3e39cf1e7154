//! Submission repository.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use gavel_core::{JudgeState, NewSubmission, Stage, Submission, SubmissionId};

use crate::query::{Database, Row};
use crate::{DbError, DbResult};

pub const SUBMISSIONS_TABLE: &str = "submissions";

#[async_trait]
pub trait SubmissionRepo: Send + Sync {
    /// Persist an intake payload. The record starts in WAITING and the
    /// returned id is the store-generated identity.
    async fn create(&self, new: &NewSubmission) -> DbResult<SubmissionId>;
    async fn get(&self, id: SubmissionId) -> DbResult<Submission>;
    /// All submissions ordered by id.
    async fn list(&self, limit: Option<u64>, offset: Option<u64>) -> DbResult<Vec<Submission>>;
    /// Record a state transition; stamps `judged_at` when the new state
    /// is terminal.
    async fn update_state(&self, id: SubmissionId, state: JudgeState) -> DbResult<()>;
    /// Administrative re-judge: the one sanctioned way out of a terminal
    /// state. Resets the record to WAITING.
    async fn rejudge(&self, id: SubmissionId) -> DbResult<()>;
    /// Administrative deletion; the judging core itself never calls this.
    async fn delete(&self, id: SubmissionId) -> DbResult<()>;
    async fn count(&self) -> DbResult<u64>;
}

/// MySQL implementation; every statement goes through the query builder.
pub struct MySqlSubmissionRepo {
    db: Database,
}

impl MySqlSubmissionRepo {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SubmissionRepo for MySqlSubmissionRepo {
    async fn create(&self, new: &NewSubmission) -> DbResult<SubmissionId> {
        let id = self
            .db
            .insert(SUBMISSIONS_TABLE)
            .set("problem_id", new.problem_id)
            .set("source", &new.source)
            .set("language", &new.language)
            .set("state", JudgeState::Stage(Stage::Waiting))
            .set("created_at", timestamp(Utc::now()))
            .set("judged_at", "")
            .execute()
            .await?;
        Ok(SubmissionId::new(id as i64))
    }

    async fn get(&self, id: SubmissionId) -> DbResult<Submission> {
        let rows = self
            .db
            .select(SUBMISSIONS_TABLE)
            .where_eq("id", id)
            .fetch()
            .await?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::NotFound(format!("submission {id}")))?;
        submission_from_row(&row)
    }

    async fn list(&self, limit: Option<u64>, offset: Option<u64>) -> DbResult<Vec<Submission>> {
        let mut select = self.db.select(SUBMISSIONS_TABLE).order_by("id", true);
        if let Some(n) = limit {
            select = select.limit(n);
        }
        if let Some(n) = offset {
            select = select.offset(n);
        }
        let rows = select.fetch().await?;
        rows.iter().map(submission_from_row).collect()
    }

    async fn update_state(&self, id: SubmissionId, state: JudgeState) -> DbResult<()> {
        let mut update = self.db.update(SUBMISSIONS_TABLE).set("state", state);
        if state.is_terminal() {
            update = update.set("judged_at", timestamp(Utc::now()));
        }
        update.where_eq("id", id).execute().await?;
        Ok(())
    }

    async fn rejudge(&self, id: SubmissionId) -> DbResult<()> {
        // An UPDATE that changes nothing also reports zero affected rows,
        // so the affected count cannot tell a missing record from one
        // already sitting in WAITING. Existence comes from a SELECT.
        let rows = self
            .db
            .select(SUBMISSIONS_TABLE)
            .column("id")
            .where_eq("id", id)
            .fetch()
            .await?;
        ensure_present(&rows, id)?;
        self.db
            .update(SUBMISSIONS_TABLE)
            .set("state", JudgeState::Stage(Stage::Waiting))
            .set("judged_at", "")
            .where_eq("id", id)
            .execute()
            .await?;
        Ok(())
    }

    async fn delete(&self, id: SubmissionId) -> DbResult<()> {
        let affected = self
            .db
            .delete(SUBMISSIONS_TABLE)
            .where_eq("id", id)
            .execute()
            .await?;
        ensure_affected(affected, id)
    }

    async fn count(&self) -> DbResult<u64> {
        self.db.size(SUBMISSIONS_TABLE).await
    }
}

fn ensure_present(rows: &[Row], id: SubmissionId) -> DbResult<()> {
    if rows.is_empty() {
        return Err(DbError::NotFound(format!("submission {id}")));
    }
    Ok(())
}

/// Only valid for DELETE: there the affected count is a reliable
/// existence signal, while for UPDATE a no-change write also affects
/// zero rows.
fn ensure_affected(affected: u64, id: SubmissionId) -> DbResult<()> {
    if affected == 0 {
        return Err(DbError::NotFound(format!("submission {id}")));
    }
    Ok(())
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn parse_timestamp(text: &str) -> DbResult<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| DbError::Malformed(format!("timestamp '{text}': {e}")))
}

fn field<'a>(row: &'a Row, name: &str) -> DbResult<&'a str> {
    row.get(name)
        .map(String::as_str)
        .ok_or_else(|| DbError::Malformed(format!("missing column {name}")))
}

fn submission_from_row(row: &Row) -> DbResult<Submission> {
    let state: JudgeState = field(row, "state")?
        .parse()
        .map_err(|e| DbError::Malformed(format!("state: {e}")))?;
    let judged_at = match field(row, "judged_at")? {
        "" => None,
        text => Some(parse_timestamp(text)?),
    };
    Ok(Submission {
        id: field(row, "id")?
            .parse()
            .map_err(|e| DbError::Malformed(format!("id: {e}")))?,
        problem_id: field(row, "problem_id")?
            .parse()
            .map_err(|e| DbError::Malformed(format!("problem_id: {e}")))?,
        source: field(row, "source")?.to_string(),
        language: field(row, "language")?.to_string(),
        state,
        created_at: parse_timestamp(field(row, "created_at")?)?,
        judged_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gavel_core::Verdict;

    fn sample_row() -> Row {
        let mut row = Row::new();
        row.insert("id".to_string(), "42".to_string());
        row.insert("problem_id".to_string(), "1".to_string());
        row.insert("source".to_string(), "int main() {}".to_string());
        row.insert("language".to_string(), "cpp".to_string());
        row.insert("state".to_string(), "ACCEPTED".to_string());
        row.insert("created_at".to_string(), "2026-08-29 10:00:00".to_string());
        row.insert("judged_at".to_string(), "2026-08-29 10:00:05".to_string());
        row
    }

    #[test]
    fn parses_a_judged_row() {
        let submission = submission_from_row(&sample_row()).unwrap();
        assert_eq!(submission.id, SubmissionId::new(42));
        assert_eq!(submission.state, JudgeState::Verdict(Verdict::Accepted));
        assert!(submission.judged_at.is_some());
    }

    #[test]
    fn empty_judged_at_means_not_judged() {
        let mut row = sample_row();
        row.insert("judged_at".to_string(), String::new());
        row.insert("state".to_string(), "WAITING".to_string());
        let submission = submission_from_row(&row).unwrap();
        assert_eq!(submission.state, JudgeState::Stage(Stage::Waiting));
        assert!(submission.judged_at.is_none());
    }

    #[test]
    fn unknown_state_string_is_rejected() {
        let mut row = sample_row();
        row.insert("state".to_string(), "HALF_RIGHT".to_string());
        assert!(matches!(
            submission_from_row(&row),
            Err(DbError::Malformed(_))
        ));
    }

    #[test]
    fn an_already_waiting_row_still_counts_as_present() {
        // A rejudge target that already holds WAITING and an empty
        // judged_at must not be reported as missing.
        let mut row = Row::new();
        row.insert("id".to_string(), "42".to_string());
        assert!(ensure_present(&[row], SubmissionId::new(42)).is_ok());
        assert!(matches!(
            ensure_present(&[], SubmissionId::new(42)),
            Err(DbError::NotFound(msg)) if msg == "submission 42"
        ));
    }

    #[test]
    fn deleting_an_absent_submission_is_a_miss() {
        assert!(matches!(
            ensure_affected(0, SubmissionId::new(999)),
            Err(DbError::NotFound(msg)) if msg == "submission 999"
        ));
        assert!(ensure_affected(1, SubmissionId::new(7)).is_ok());
    }

    #[test]
    fn missing_column_is_rejected() {
        let mut row = sample_row();
        row.remove("language");
        assert!(matches!(
            submission_from_row(&row),
            Err(DbError::Malformed(msg)) if msg.contains("language")
        ));
    }
}
