//! Record identifiers.

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Identifier of a submission record.
/// Assigned by the database's auto-increment mechanism at insert time.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
)]
#[display("{_0}")]
pub struct SubmissionId(i64);

impl SubmissionId {
    pub fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl From<i64> for SubmissionId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

impl std::str::FromStr for SubmissionId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// Identifier of a problem record.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
)]
#[display("{_0}")]
pub struct ProblemId(i64);

impl ProblemId {
    pub fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl From<i64> for ProblemId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

impl std::str::FromStr for ProblemId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}
