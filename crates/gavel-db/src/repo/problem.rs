//! Problem repository.

use async_trait::async_trait;
use gavel_core::{Problem, ProblemId};

use crate::query::{Database, Row};
use crate::{DbError, DbResult};

pub const PROBLEMS_TABLE: &str = "problems";

#[async_trait]
pub trait ProblemRepo: Send + Sync {
    async fn get(&self, id: ProblemId) -> DbResult<Problem>;
    /// All problems, sorted by id.
    async fn list(&self) -> DbResult<Vec<Problem>>;
}

pub struct MySqlProblemRepo {
    db: Database,
}

impl MySqlProblemRepo {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProblemRepo for MySqlProblemRepo {
    async fn get(&self, id: ProblemId) -> DbResult<Problem> {
        let rows = self
            .db
            .select(PROBLEMS_TABLE)
            .where_eq("id", id)
            .fetch()
            .await?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::NotFound(format!("problem {id}")))?;
        problem_from_row(&row)
    }

    async fn list(&self) -> DbResult<Vec<Problem>> {
        let rows = self
            .db
            .select(PROBLEMS_TABLE)
            .order_by("id", true)
            .fetch()
            .await?;
        rows.iter().map(problem_from_row).collect()
    }
}

fn problem_from_row(row: &Row) -> DbResult<Problem> {
    let id = row
        .get("id")
        .ok_or_else(|| DbError::Malformed("missing column id".to_string()))?
        .parse()
        .map_err(|e| DbError::Malformed(format!("id: {e}")))?;
    let title = row
        .get("title")
        .ok_or_else(|| DbError::Malformed("missing column title".to_string()))?
        .clone();
    Ok(Problem { id, title })
}
