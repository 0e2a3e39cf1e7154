//! Problem records.
//!
//! Problems are owned by an external management surface; the core only
//! loads them to hand alongside a submission to the judging pipeline.

use serde::{Deserialize, Serialize};

use crate::ProblemId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub id: ProblemId,
    pub title: String,
}

// Listings sort by problem id only.
impl PartialOrd for Problem {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Problem {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.id.cmp(&other.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn problems_order_by_id_not_title() {
        let a = Problem {
            id: ProblemId::new(2),
            title: "A".to_string(),
        };
        let b = Problem {
            id: ProblemId::new(1),
            title: "Z".to_string(),
        };
        assert!(b < a);
    }
}
