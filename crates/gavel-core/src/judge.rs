//! Judge-result state model.
//!
//! A submission's state is either a transient pipeline [`Stage`] or a
//! terminal [`Verdict`]. The judging backend is the sole writer of
//! transitions; this module only models the values, their persisted
//! string/integer forms, and the legal transition relation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Transient state describing where in the judging pipeline a job is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    Waiting,
    Fetched,
    Compiling,
    Compiled,
    Judging,
    Comparing,
    Judged,
}

impl Stage {
    /// All stages, in the order a successful run passes through them.
    pub const ALL: [Stage; 7] = [
        Stage::Waiting,
        Stage::Fetched,
        Stage::Compiling,
        Stage::Compiled,
        Stage::Judging,
        Stage::Comparing,
        Stage::Judged,
    ];

    /// The next stage in a successful run, or `None` for the last one.
    pub fn next(&self) -> Option<Stage> {
        let idx = Stage::ALL.iter().position(|s| s == self)?;
        Stage::ALL.get(idx + 1).copied()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Waiting => "WAITING",
            Stage::Fetched => "FETCHED",
            Stage::Compiling => "COMPILING",
            Stage::Compiled => "COMPILED",
            Stage::Judging => "JUDGING",
            Stage::Comparing => "COMPARING",
            Stage::Judged => "JUDGED",
        }
    }
}

/// Terminal judging outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Accepted,
    PresentationError,
    WrongAnswer,
    TimeLimitExceeded,
    MemoryLimitExceeded,
    OutputLimitExceeded,
    RuntimeError,
    RestrictedFunction,
    CompilationError,
    SystemError,
    Skipped,
    Rejected,
    /// Default for records whose outcome was never recorded.
    UnknownError,
}

impl Verdict {
    pub const ALL: [Verdict; 13] = [
        Verdict::Accepted,
        Verdict::PresentationError,
        Verdict::WrongAnswer,
        Verdict::TimeLimitExceeded,
        Verdict::MemoryLimitExceeded,
        Verdict::OutputLimitExceeded,
        Verdict::RuntimeError,
        Verdict::RestrictedFunction,
        Verdict::CompilationError,
        Verdict::SystemError,
        Verdict::Skipped,
        Verdict::Rejected,
        Verdict::UnknownError,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Accepted => "ACCEPTED",
            Verdict::PresentationError => "PRESENTATION_ERROR",
            Verdict::WrongAnswer => "WRONG_ANSWER",
            Verdict::TimeLimitExceeded => "TIME_LIMIT_EXCEEDED",
            Verdict::MemoryLimitExceeded => "MEMORY_LIMIT_EXCEEDED",
            Verdict::OutputLimitExceeded => "OUTPUT_LIMIT_EXCEEDED",
            Verdict::RuntimeError => "RUNTIME_ERROR",
            Verdict::RestrictedFunction => "RESTRICTED_FUNCTION",
            Verdict::CompilationError => "COMPILATION_ERROR",
            Verdict::SystemError => "SYSTEM_ERROR",
            Verdict::Skipped => "SKIPPED",
            Verdict::Rejected => "REJECTED",
            Verdict::UnknownError => "UNKNOWN_ERROR",
        }
    }
}

/// Current state of a submission: in flight, or done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JudgeState {
    Stage(Stage),
    Verdict(Verdict),
}

impl JudgeState {
    /// Verdicts are absorbing: nothing advances a record past one except
    /// an explicit administrative re-judge.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JudgeState::Verdict(_))
    }

    /// Whether the judging pipeline may move a record from `self` to
    /// `next`. A stage advances to its successor or short-circuits to any
    /// verdict; verdicts never advance.
    pub fn can_advance_to(&self, next: JudgeState) -> bool {
        match (self, next) {
            (JudgeState::Verdict(_), _) => false,
            (JudgeState::Stage(_), JudgeState::Verdict(_)) => true,
            (JudgeState::Stage(cur), JudgeState::Stage(nxt)) => cur.next() == Some(nxt),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JudgeState::Stage(stage) => stage.as_str(),
            JudgeState::Verdict(verdict) => verdict.as_str(),
        }
    }

    /// The integer form older deployments persisted instead of the string
    /// form. The numbering interleaves verdicts and stages and puts JUDGED
    /// before COMPARING; it is kept only for storage compatibility.
    pub fn code(&self) -> u8 {
        match self {
            JudgeState::Verdict(Verdict::UnknownError) => 0,
            JudgeState::Verdict(Verdict::Accepted) => 1,
            JudgeState::Verdict(Verdict::PresentationError) => 2,
            JudgeState::Verdict(Verdict::WrongAnswer) => 3,
            JudgeState::Verdict(Verdict::TimeLimitExceeded) => 4,
            JudgeState::Verdict(Verdict::MemoryLimitExceeded) => 5,
            JudgeState::Verdict(Verdict::OutputLimitExceeded) => 6,
            JudgeState::Verdict(Verdict::RuntimeError) => 7,
            JudgeState::Verdict(Verdict::RestrictedFunction) => 8,
            JudgeState::Verdict(Verdict::CompilationError) => 9,
            JudgeState::Verdict(Verdict::SystemError) => 10,
            JudgeState::Stage(Stage::Waiting) => 11,
            JudgeState::Stage(Stage::Fetched) => 12,
            JudgeState::Stage(Stage::Compiling) => 13,
            JudgeState::Stage(Stage::Compiled) => 14,
            JudgeState::Stage(Stage::Judging) => 15,
            JudgeState::Stage(Stage::Judged) => 16,
            JudgeState::Stage(Stage::Comparing) => 17,
            JudgeState::Verdict(Verdict::Skipped) => 18,
            JudgeState::Verdict(Verdict::Rejected) => 19,
        }
    }

    pub fn from_code(code: u8) -> Result<Self> {
        Stage::ALL
            .iter()
            .map(|s| JudgeState::Stage(*s))
            .chain(Verdict::ALL.iter().map(|v| JudgeState::Verdict(*v)))
            .find(|state| state.code() == code)
            .ok_or_else(|| Error::InvalidInput(format!("unknown judge state code {code}")))
    }
}

impl Default for JudgeState {
    fn default() -> Self {
        JudgeState::Verdict(Verdict::UnknownError)
    }
}

impl From<Stage> for JudgeState {
    fn from(stage: Stage) -> Self {
        JudgeState::Stage(stage)
    }
}

impl From<Verdict> for JudgeState {
    fn from(verdict: Verdict) -> Self {
        JudgeState::Verdict(verdict)
    }
}

impl fmt::Display for JudgeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JudgeState {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Stage::ALL
            .iter()
            .map(|stage| JudgeState::Stage(*stage))
            .chain(Verdict::ALL.iter().map(|verdict| JudgeState::Verdict(*verdict)))
            .find(|state| state.as_str() == s)
            .ok_or_else(|| Error::InvalidInput(format!("unknown judge state '{s}'")))
    }
}

impl Serialize for JudgeState {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for JudgeState {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
