//! Repository traits and MySQL implementations.

pub mod problem;
pub mod submission;

pub use problem::{MySqlProblemRepo, PROBLEMS_TABLE, ProblemRepo};
pub use submission::{MySqlSubmissionRepo, SUBMISSIONS_TABLE, SubmissionRepo};
