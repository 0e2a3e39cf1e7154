//! The dispatcher object owning the queue and its worker.

use std::sync::Arc;

use gavel_core::{JudgePipeline, SubmissionId};
use gavel_db::{ProblemRepo, SubmissionRepo};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::worker::Worker;

/// Producer side of the dispatch queue. Cheap to clone; every intake path
/// gets one.
#[derive(Clone)]
pub struct DispatchHandle {
    tx: mpsc::UnboundedSender<SubmissionId>,
}

impl DispatchHandle {
    /// Append a submission id to the tail of the queue. There is no
    /// acknowledgment; jobs are judged strictly in the order they were
    /// added, across all handles.
    pub fn add(&self, id: SubmissionId) {
        if self.tx.send(id).is_err() {
            warn!(submission = %id, "dispatch worker is gone, dropping job");
        }
    }
}

/// Owns the queue and the single background worker that drains it.
///
/// Constructed once at process startup and handed to intake paths by
/// handle. Enqueued jobs cannot be withdrawn, and there is no priority or
/// preemption: strict FIFO.
pub struct Dispatcher {
    handle: DispatchHandle,
    worker: JoinHandle<()>,
}

impl Dispatcher {
    /// Spawn the worker and return the dispatcher owning it.
    pub fn start(
        submissions: Arc<dyn SubmissionRepo>,
        problems: Arc<dyn ProblemRepo>,
        pipeline: Arc<dyn JudgePipeline>,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(Worker::new(submissions, problems, pipeline).run(rx));
        Self {
            handle: DispatchHandle { tx },
            worker,
        }
    }

    pub fn handle(&self) -> DispatchHandle {
        self.handle.clone()
    }

    /// Convenience for callers holding the dispatcher itself.
    pub fn add(&self, id: SubmissionId) {
        self.handle.add(id);
    }

    /// Drop the owned handle and wait for the worker to drain what is
    /// already queued. The worker exits once every [`DispatchHandle`]
    /// clone is gone.
    pub async fn shutdown(self) {
        let Dispatcher { handle, worker } = self;
        drop(handle);
        if let Err(e) = worker.await {
            warn!(error = %e, "dispatch worker aborted");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use gavel_core::{
        Error, JudgePipeline, JudgeState, NewSubmission, Problem, ProblemId, Result, Stage,
        Submission, Verdict,
    };
    use gavel_db::{DbError, DbResult};
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct FakeStore {
        submissions: Mutex<HashMap<i64, Submission>>,
    }

    impl FakeStore {
        fn with_ids(ids: &[i64]) -> Arc<Self> {
            let submissions = ids
                .iter()
                .map(|&raw| {
                    (
                        raw,
                        Submission {
                            id: SubmissionId::new(raw),
                            problem_id: ProblemId::new(1),
                            source: "int main() {}".to_string(),
                            language: "cpp".to_string(),
                            state: JudgeState::Stage(Stage::Waiting),
                            created_at: Utc::now(),
                            judged_at: None,
                        },
                    )
                })
                .collect();
            Arc::new(Self {
                submissions: Mutex::new(submissions),
            })
        }

        fn state_of(&self, id: SubmissionId) -> JudgeState {
            self.submissions.lock().unwrap()[&id.as_i64()].state
        }
    }

    #[async_trait]
    impl SubmissionRepo for FakeStore {
        async fn create(&self, _new: &NewSubmission) -> DbResult<SubmissionId> {
            unimplemented!()
        }

        async fn get(&self, id: SubmissionId) -> DbResult<Submission> {
            self.submissions
                .lock()
                .unwrap()
                .get(&id.as_i64())
                .cloned()
                .ok_or_else(|| DbError::NotFound(format!("submission {id}")))
        }

        async fn list(
            &self,
            _limit: Option<u64>,
            _offset: Option<u64>,
        ) -> DbResult<Vec<Submission>> {
            unimplemented!()
        }

        async fn update_state(&self, id: SubmissionId, state: JudgeState) -> DbResult<()> {
            let mut submissions = self.submissions.lock().unwrap();
            let submission = submissions
                .get_mut(&id.as_i64())
                .ok_or_else(|| DbError::NotFound(format!("submission {id}")))?;
            submission.state = state;
            if state.is_terminal() {
                submission.judged_at = Some(Utc::now());
            }
            Ok(())
        }

        async fn rejudge(&self, _id: SubmissionId) -> DbResult<()> {
            unimplemented!()
        }

        async fn delete(&self, _id: SubmissionId) -> DbResult<()> {
            unimplemented!()
        }

        async fn count(&self) -> DbResult<u64> {
            Ok(self.submissions.lock().unwrap().len() as u64)
        }
    }

    #[async_trait]
    impl ProblemRepo for FakeStore {
        async fn get(&self, id: ProblemId) -> DbResult<Problem> {
            Ok(Problem {
                id,
                title: "A + B".to_string(),
            })
        }

        async fn list(&self) -> DbResult<Vec<Problem>> {
            unimplemented!()
        }
    }

    /// Records every submission it is asked to judge; fails the ids it
    /// was told to fail without recording a verdict.
    struct RecordingPipeline {
        attempted: Mutex<Vec<SubmissionId>>,
        fail_on: Vec<SubmissionId>,
    }

    impl RecordingPipeline {
        fn new() -> Arc<Self> {
            Self::failing_on(vec![])
        }

        fn failing_on(fail_on: Vec<SubmissionId>) -> Arc<Self> {
            Arc::new(Self {
                attempted: Mutex::new(Vec::new()),
                fail_on,
            })
        }

        fn attempted(&self) -> Vec<SubmissionId> {
            self.attempted.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl JudgePipeline for RecordingPipeline {
        fn name(&self) -> &'static str {
            "recording"
        }

        async fn judge(&self, submission: &Submission, _problem: &Problem) -> Result<()> {
            self.attempted.lock().unwrap().push(submission.id);
            if self.fail_on.contains(&submission.id) {
                return Err(Error::JudgeFailed(format!(
                    "injected failure for {}",
                    submission.id
                )));
            }
            Ok(())
        }
    }

    /// Drives a submission through the whole stage chain to ACCEPTED,
    /// checking each transition is legal before writing it.
    struct ChainPipeline {
        store: Arc<FakeStore>,
    }

    #[async_trait]
    impl JudgePipeline for ChainPipeline {
        fn name(&self) -> &'static str {
            "chain"
        }

        async fn judge(&self, submission: &Submission, _problem: &Problem) -> Result<()> {
            let mut state = submission.state;
            let chain = Stage::ALL
                .iter()
                .skip(1)
                .map(|s| JudgeState::Stage(*s))
                .chain([JudgeState::Verdict(Verdict::Accepted)]);
            for next in chain {
                assert!(state.can_advance_to(next), "{state} -> {next}");
                self.store
                    .update_state(submission.id, next)
                    .await
                    .map_err(|e| Error::Internal(e.to_string()))?;
                state = next;
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn jobs_are_judged_in_add_order() {
        let store = FakeStore::with_ids(&[5, 7, 3]);
        let pipeline = RecordingPipeline::new();
        let dispatcher = Dispatcher::start(store.clone(), store, pipeline.clone());

        for raw in [5, 7, 3] {
            dispatcher.add(SubmissionId::new(raw));
        }
        dispatcher.shutdown().await;

        let expected: Vec<SubmissionId> = [5, 7, 3].map(SubmissionId::new).to_vec();
        assert_eq!(pipeline.attempted(), expected);
    }

    #[tokio::test]
    async fn concurrent_producers_lose_and_duplicate_nothing() {
        const PRODUCERS: i64 = 4;
        const PER_PRODUCER: i64 = 25;

        let all_ids: Vec<i64> = (0..PRODUCERS)
            .flat_map(|p| (0..PER_PRODUCER).map(move |i| p * 100 + i))
            .collect();
        let store = FakeStore::with_ids(&all_ids);
        let pipeline = RecordingPipeline::new();
        let dispatcher = Dispatcher::start(store.clone(), store, pipeline.clone());

        let mut producers = Vec::new();
        for p in 0..PRODUCERS {
            let handle = dispatcher.handle();
            producers.push(tokio::spawn(async move {
                for i in 0..PER_PRODUCER {
                    handle.add(SubmissionId::new(p * 100 + i));
                    tokio::task::yield_now().await;
                }
            }));
        }
        for producer in producers {
            producer.await.unwrap();
        }
        dispatcher.shutdown().await;

        let attempted = pipeline.attempted();
        assert_eq!(attempted.len() as i64, PRODUCERS * PER_PRODUCER);
        let mut unique: Vec<_> = attempted.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), attempted.len());

        // Each producer's ids appear in the order that producer added them.
        for p in 0..PRODUCERS {
            let seen: Vec<i64> = attempted
                .iter()
                .map(|id| id.as_i64())
                .filter(|raw| raw / 100 == p)
                .collect();
            let expected: Vec<i64> = (0..PER_PRODUCER).map(|i| p * 100 + i).collect();
            assert_eq!(seen, expected);
        }
    }

    #[tokio::test]
    async fn one_bad_job_does_not_stop_the_dispatcher() {
        let store = FakeStore::with_ids(&[1, 2]);
        let pipeline = RecordingPipeline::failing_on(vec![SubmissionId::new(1)]);
        let dispatcher = Dispatcher::start(store.clone(), store, pipeline.clone());

        // 99 never existed, 1 makes the pipeline fail, 2 must still run.
        dispatcher.add(SubmissionId::new(99));
        dispatcher.add(SubmissionId::new(1));
        dispatcher.add(SubmissionId::new(2));
        dispatcher.shutdown().await;

        let expected: Vec<SubmissionId> = [1, 2].map(SubmissionId::new).to_vec();
        assert_eq!(pipeline.attempted(), expected);
    }

    #[tokio::test]
    async fn a_full_run_ends_accepted() {
        let store = FakeStore::with_ids(&[42]);
        let pipeline = Arc::new(ChainPipeline {
            store: store.clone(),
        });
        let dispatcher = Dispatcher::start(store.clone(), store.clone(), pipeline);

        dispatcher.add(SubmissionId::new(42));
        dispatcher.shutdown().await;

        let final_state = store.state_of(SubmissionId::new(42));
        assert_eq!(final_state, JudgeState::Verdict(Verdict::Accepted));
        assert!(final_state.is_terminal());
    }
}
