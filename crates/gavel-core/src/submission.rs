//! Submission records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{JudgeState, ProblemId, SubmissionId};

/// One candidate solution submitted for judging against a problem.
///
/// The authoritative copy lives in the store; this is the loaded form the
/// dispatcher hands to the judging pipeline. The pipeline is the only
/// writer of `state` once the record exists, and a terminal state is never
/// advanced again without an explicit re-judge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    /// Unique identifier, assigned by the store at insert time.
    pub id: SubmissionId,
    /// Problem this submission answers.
    pub problem_id: ProblemId,
    /// Submitted source code.
    pub source: String,
    /// Language the source is written in (e.g., "cpp").
    pub language: String,
    /// Current judge-result state.
    pub state: JudgeState,
    /// When the submission was received.
    pub created_at: DateTime<Utc>,
    /// When a terminal verdict was recorded, if one has been.
    pub judged_at: Option<DateTime<Utc>>,
}

/// Intake payload for a submission that has not been persisted yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSubmission {
    pub problem_id: ProblemId,
    pub source: String,
    pub language: String,
}
