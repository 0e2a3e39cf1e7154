//! Problem commands.

use anyhow::Result;
use gavel_db::{Database, MySqlProblemRepo, ProblemRepo};

pub async fn list(db: &Database, json: bool) -> Result<()> {
    let repo = MySqlProblemRepo::new(db.clone());
    let problems = repo.list().await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&problems)?);
        return Ok(());
    }
    for problem in &problems {
        println!("{:>6}  {}", problem.id, problem.title);
    }
    Ok(())
}
