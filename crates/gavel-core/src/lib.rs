//! Core domain types and traits for the Gavel online judge.
//!
//! This crate contains:
//! - Submission and problem identifiers
//! - The judge-result state model (pipeline stages and verdicts)
//! - Submission and problem record types
//! - The `JudgePipeline` trait implemented by judging backends

pub mod error;
pub mod id;
pub mod judge;
pub mod pipeline;
pub mod problem;
pub mod submission;

pub use error::{Error, Result};
pub use id::{ProblemId, SubmissionId};
pub use judge::{JudgeState, Stage, Verdict};
pub use pipeline::JudgePipeline;
pub use problem::Problem;
pub use submission::{NewSubmission, Submission};
