//! Judging pipeline trait.

use async_trait::async_trait;

use crate::{Problem, Result, Submission};

/// A judging backend: compiles, runs and compares one submission.
///
/// Implementations receive the fully loaded records and are expected to
/// drive the submission through the stage chain (and finally a verdict)
/// by writing state updates back to the store. The dispatch worker calls
/// `judge` synchronously and starts the next job only after it returns.
#[async_trait]
pub trait JudgePipeline: Send + Sync {
    /// Human-readable backend name, used in logs.
    fn name(&self) -> &'static str;

    async fn judge(&self, submission: &Submission, problem: &Problem) -> Result<()>;
}
