//! Worker that drains the dispatch queue.

use std::sync::Arc;

use gavel_core::{JudgePipeline, SubmissionId};
use gavel_db::{ProblemRepo, SubmissionRepo};
use tokio::sync::mpsc;
use tracing::{info, warn};

pub(crate) struct Worker {
    submissions: Arc<dyn SubmissionRepo>,
    problems: Arc<dyn ProblemRepo>,
    pipeline: Arc<dyn JudgePipeline>,
}

impl Worker {
    pub(crate) fn new(
        submissions: Arc<dyn SubmissionRepo>,
        problems: Arc<dyn ProblemRepo>,
        pipeline: Arc<dyn JudgePipeline>,
    ) -> Self {
        Self {
            submissions,
            problems,
            pipeline,
        }
    }

    /// Run until the queue closes. `recv` suspends while the queue is
    /// empty, so pickup is immediate when work arrives.
    pub(crate) async fn run(self, mut rx: mpsc::UnboundedReceiver<SubmissionId>) {
        info!(pipeline = %self.pipeline.name(), "dispatch worker started");
        while let Some(id) = rx.recv().await {
            self.judge_one(id).await;
        }
        info!("dispatch queue closed, worker exiting");
    }

    /// One job must not take the dispatcher down with it: every failure
    /// here is logged and the worker moves on to the next id.
    async fn judge_one(&self, id: SubmissionId) {
        let submission = match self.submissions.get(id).await {
            Ok(submission) => submission,
            Err(e) => {
                warn!(submission = %id, error = %e, "failed to load submission, skipping");
                return;
            }
        };
        let problem = match self.problems.get(submission.problem_id).await {
            Ok(problem) => problem,
            Err(e) => {
                warn!(
                    submission = %id,
                    problem = %submission.problem_id,
                    error = %e,
                    "failed to load problem, skipping"
                );
                return;
            }
        };

        info!(
            submission = %id,
            problem = %problem.id,
            language = %submission.language,
            "judging submission"
        );
        if let Err(e) = self.pipeline.judge(&submission, &problem).await {
            warn!(submission = %id, error = %e, "judge pipeline failed");
        }
    }
}
