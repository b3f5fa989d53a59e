//! Fire-and-forget score submission.
//!
//! The request runs on its own thread and reports back through a channel
//! the results screen polls, so the frame loop never waits on the network.

use bevy::prelude::Resource;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use crate::client::api::{ClientError, ScoreApi};
use crate::server::types::ScoreResponse;

/// All the race needs to know about a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Accepted { current_score: u64, best_score: u64 },
    /// Any backend or network failure; results show without a best score.
    Failed,
}

impl From<Result<ScoreResponse, ClientError>> for SubmissionOutcome {
    fn from(result: Result<ScoreResponse, ClientError>) -> Self {
        match result {
            Ok(response) => SubmissionOutcome::Accepted {
                current_score: response.current_score,
                best_score: response.best_score,
            },
            Err(_) => SubmissionOutcome::Failed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_backoff: Duration::from_millis(250),
        }
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            initial_backoff: Duration::ZERO,
        }
    }

    /// Doubling delay before retry number `retry` (zero-based).
    pub fn backoff(&self, retry: u32) -> Duration {
        self.initial_backoff.saturating_mul(1u32 << retry.min(16))
    }
}

/// Submit once, retrying only transient failures up to the policy's limit.
pub fn submit_with_retry(
    api: &dyn ScoreApi,
    score: u32,
    policy: RetryPolicy,
    sleep: impl Fn(Duration),
) -> Result<ScoreResponse, ClientError> {
    let mut retry = 0;
    loop {
        match api.submit_score(score) {
            Err(err) if err.is_transient() && retry < policy.max_retries => {
                tracing::warn!(%err, retry, "score submission failed, retrying");
                sleep(policy.backoff(retry));
                retry += 1;
            }
            result => return result,
        }
    }
}

/// A submission in flight. Poll with [`PendingSubmission::try_outcome`].
#[derive(Resource)]
pub struct PendingSubmission {
    receiver: Mutex<Receiver<SubmissionOutcome>>,
    outcome: Option<SubmissionOutcome>,
}

impl PendingSubmission {
    pub fn spawn(api: Arc<dyn ScoreApi>, score: u32, policy: RetryPolicy) -> Self {
        let (sender, receiver) = mpsc::channel();
        thread::spawn(move || {
            let result = submit_with_retry(api.as_ref(), score, policy, thread::sleep);
            match &result {
                Ok(response) => tracing::info!(
                    score = response.current_score,
                    best = response.best_score,
                    "score submitted"
                ),
                Err(err) => tracing::warn!(%err, score, "score submission failed"),
            }
            // the receiver is gone if the player already left the results screen
            let _ = sender.send(SubmissionOutcome::from(result));
        });
        Self {
            receiver: Mutex::new(receiver),
            outcome: None,
        }
    }

    /// Already settled as failed, e.g. when no credentials are configured.
    pub fn failed() -> Self {
        let (_, receiver) = mpsc::channel();
        Self {
            receiver: Mutex::new(receiver),
            outcome: Some(SubmissionOutcome::Failed),
        }
    }

    /// Non-blocking; returns the outcome once it has arrived.
    pub fn try_outcome(&mut self) -> Option<SubmissionOutcome> {
        if self.outcome.is_none() {
            let received = match self.receiver.lock() {
                Ok(receiver) => receiver.try_recv(),
                Err(_) => Err(TryRecvError::Disconnected),
            };
            self.outcome = match received {
                Ok(outcome) => Some(outcome),
                Err(TryRecvError::Empty) => None,
                Err(TryRecvError::Disconnected) => Some(SubmissionOutcome::Failed),
            };
        }
        self.outcome
    }

    /// Block up to `timeout` for the outcome.
    pub fn wait(&mut self, timeout: Duration) -> Option<SubmissionOutcome> {
        if self.outcome.is_none() {
            let received = match self.receiver.lock() {
                Ok(receiver) => receiver.recv_timeout(timeout),
                Err(_) => Err(RecvTimeoutError::Disconnected),
            };
            self.outcome = match received {
                Ok(outcome) => Some(outcome),
                Err(RecvTimeoutError::Timeout) => None,
                Err(RecvTimeoutError::Disconnected) => Some(SubmissionOutcome::Failed),
            };
        }
        self.outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fails with `error` for the first `failures` calls, then accepts.
    struct FlakyApi {
        failures: u32,
        error: ClientError,
        calls: AtomicU32,
    }

    impl FlakyApi {
        fn new(failures: u32, error: ClientError) -> Self {
            Self {
                failures,
                error,
                calls: AtomicU32::new(0),
            }
        }
    }

    impl ScoreApi for FlakyApi {
        fn submit_score(&self, score: u32) -> Result<ScoreResponse, ClientError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                Err(self.error.clone())
            } else {
                Ok(ScoreResponse {
                    current_score: score as u64,
                    best_score: (score as u64).max(100),
                })
            }
        }
    }

    fn transient() -> ClientError {
        ClientError::TransientNetwork("connection refused".into())
    }

    #[test]
    fn test_retries_transient_failures() {
        let api = FlakyApi::new(2, transient());
        let result = submit_with_retry(&api, 150, RetryPolicy::default(), |_| {});
        assert_eq!(result.unwrap().best_score, 150);
        assert_eq!(api.calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_gives_up_after_limit() {
        let api = FlakyApi::new(10, transient());
        let result = submit_with_retry(&api, 150, RetryPolicy::default(), |_| {});
        assert!(result.is_err());
        assert_eq!(api.calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_does_not_retry_auth_failures() {
        let api = FlakyApi::new(1, ClientError::Unauthorized);
        let result = submit_with_retry(&api, 150, RetryPolicy::default(), |_| {});
        assert_eq!(result, Err(ClientError::Unauthorized));
        assert_eq!(api.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_backoff_doubles() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(0), Duration::from_millis(250));
        assert_eq!(policy.backoff(1), Duration::from_millis(500));
        assert_eq!(policy.backoff(2), Duration::from_millis(1000));
    }

    #[test]
    fn test_background_submission_reports_accepted() {
        let api = Arc::new(FlakyApi::new(0, transient()));
        let mut pending = PendingSubmission::spawn(api, 50, RetryPolicy::none());
        let outcome = pending.wait(Duration::from_secs(5));
        assert_eq!(
            outcome,
            Some(SubmissionOutcome::Accepted {
                current_score: 50,
                best_score: 100
            })
        );
        // cached after the first read
        assert_eq!(pending.try_outcome(), outcome);
    }

    #[test]
    fn test_background_submission_collapses_failures() {
        let api = Arc::new(FlakyApi::new(1, ClientError::NotFound));
        let mut pending = PendingSubmission::spawn(api, 50, RetryPolicy::none());
        assert_eq!(pending.wait(Duration::from_secs(5)), Some(SubmissionOutcome::Failed));
    }

    #[test]
    fn test_failed_is_settled_immediately() {
        let mut pending = PendingSubmission::failed();
        assert_eq!(pending.try_outcome(), Some(SubmissionOutcome::Failed));
    }
}
