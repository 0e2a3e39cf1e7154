//! Submission commands.

use anyhow::Result;
use gavel_core::SubmissionId;
use gavel_db::{Database, MySqlSubmissionRepo, SubmissionRepo};

pub async fn list(
    db: &Database,
    limit: Option<u64>,
    offset: Option<u64>,
    json: bool,
) -> Result<()> {
    let repo = MySqlSubmissionRepo::new(db.clone());
    let submissions = repo.list(limit, offset).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&submissions)?);
        return Ok(());
    }
    for submission in &submissions {
        println!(
            "{:>8}  problem {:>6}  {:<10}  {}",
            submission.id, submission.problem_id, submission.language, submission.state
        );
    }
    Ok(())
}

pub async fn show(db: &Database, id: i64, json: bool) -> Result<()> {
    let repo = MySqlSubmissionRepo::new(db.clone());
    let submission = repo.get(SubmissionId::new(id)).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&submission)?);
        return Ok(());
    }
    println!("submission {}", submission.id);
    println!("  problem:    {}", submission.problem_id);
    println!("  language:   {}", submission.language);
    println!("  state:      {}", submission.state);
    println!("  created at: {}", submission.created_at);
    match submission.judged_at {
        Some(at) => println!("  judged at:  {at}"),
        None => println!("  judged at:  -"),
    }
    println!("--- source ---");
    println!("{}", submission.source);
    Ok(())
}

pub async fn count(db: &Database) -> Result<()> {
    let repo = MySqlSubmissionRepo::new(db.clone());
    println!("{}", repo.count().await?);
    Ok(())
}

pub async fn rejudge(db: &Database, id: i64) -> Result<()> {
    let repo = MySqlSubmissionRepo::new(db.clone());
    repo.rejudge(SubmissionId::new(id)).await?;
    println!("submission {id} reset to WAITING");
    Ok(())
}

pub async fn delete(db: &Database, id: i64) -> Result<()> {
    let repo = MySqlSubmissionRepo::new(db.clone());
    repo.delete(SubmissionId::new(id)).await?;
    println!("submission {id} deleted");
    Ok(())
}
