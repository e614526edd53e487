use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use routechat_llm::{AssistantClient, Backoff, ListOrder, MessageRole, Run, RunStatus};

use crate::error::PollError;

/// Upper bound on the cancel request sent for an abandoned run
const CANCEL_RUN_TIMEOUT: Duration = Duration::from_secs(5);

/// Timing of run status checks.
#[derive(Debug, Clone, PartialEq)]
pub struct PollConfig {
    /// Wait after the first non-terminal check
    pub initial_interval: Duration,
    pub max_interval: Duration,
    pub multiplier: f64,
    /// Fraction of each interval randomized, 0.0..=1.0
    pub jitter: f64,
    /// Give up once this much time has passed since polling started
    pub max_wait: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_secs(1),
            max_interval: Duration::from_secs(5),
            multiplier: 1.5,
            jitter: 0.1,
            max_wait: Duration::from_secs(120),
        }
    }
}

impl PollConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_interval(mut self, initial: Duration, max: Duration) -> Self {
        self.initial_interval = initial;
        self.max_interval = max.max(initial);
        self
    }

    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    pub fn with_jitter(mut self, jitter: f64) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = max_wait;
        self
    }

    fn backoff(&self) -> Backoff {
        Backoff::new(self.initial_interval, self.max_interval)
            .with_multiplier(self.multiplier)
            .with_jitter(self.jitter)
    }
}

/// Waits for a run to finish and extracts the assistant's reply.
pub struct RunPoller {
    client: Arc<dyn AssistantClient>,
    config: PollConfig,
}

impl RunPoller {
    pub fn new(client: Arc<dyn AssistantClient>, config: PollConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    /// Wait for `run` to complete, then return the reply text.
    pub async fn wait_for_reply(
        &self,
        run: &Run,
        cancel: &CancellationToken,
    ) -> Result<String, PollError> {
        let completed = self.wait_for_completion(run, cancel).await?;
        self.fetch_reply(&completed.thread_id).await
    }

    /// Check the run's status until it is terminal.
    ///
    /// The first check is immediate; each later check follows a backoff
    /// delay, and every check is exactly one `get_run` call. `max_wait`
    /// bounds the whole wait, including a check that is still in flight.
    /// A run given up on through timeout or cancellation is cancelled
    /// remotely so the thread accepts new messages.
    pub async fn wait_for_completion(
        &self,
        run: &Run,
        cancel: &CancellationToken,
    ) -> Result<Run, PollError> {
        let result = self.poll_until_terminal(run, cancel).await;

        if let Err(PollError::Timeout { .. } | PollError::Cancelled { .. }) = &result {
            self.abandon(run).await;
        }

        result
    }

    async fn poll_until_terminal(
        &self,
        run: &Run,
        cancel: &CancellationToken,
    ) -> Result<Run, PollError> {
        let started = Instant::now();
        let deadline = started + self.config.max_wait;
        let backoff = self.config.backoff();
        let cancelled = || PollError::Cancelled {
            run_id: run.id.clone(),
        };
        let timed_out = |status: RunStatus| {
            let elapsed = started.elapsed();
            tracing::warn!(run_id = %run.id, %status, ?elapsed, "Gave up waiting for run");
            PollError::Timeout {
                run_id: run.id.clone(),
                elapsed,
            }
        };

        let mut attempt = 0u32;
        let mut last_status = run.status;

        loop {
            let current = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(cancelled()),
                result = self.client.get_run(&run.thread_id, &run.id) => result?,
                _ = tokio::time::sleep_until(deadline) => return Err(timed_out(last_status)),
            };

            if current.status != last_status {
                tracing::debug!(
                    run_id = %run.id,
                    thread_id = %run.thread_id,
                    from = %last_status,
                    to = %current.status,
                    "Run status changed"
                );
                last_status = current.status;
            }

            match current.status {
                RunStatus::Completed => {
                    tracing::info!(
                        run_id = %run.id,
                        checks = attempt + 1,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "Run completed"
                    );
                    return Ok(current);
                }
                RunStatus::RequiresAction => {
                    return Err(PollError::RequiresAction {
                        run_id: run.id.clone(),
                    });
                }
                status if status.is_terminal() => {
                    let message = current
                        .last_error
                        .map(|e| format!("{}: {}", e.code, e.message))
                        .unwrap_or_else(|| "no error details".to_string());
                    tracing::warn!(run_id = %run.id, %status, %message, "Run did not complete");
                    return Err(PollError::RunFailed {
                        run_id: run.id.clone(),
                        status,
                        message,
                    });
                }
                _ => {}
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(timed_out(last_status));
            }

            let delay = backoff.delay(attempt).min(remaining);
            attempt += 1;

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(cancelled()),
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }

    /// Best-effort remote cancellation of a run nobody is waiting for.
    async fn abandon(&self, run: &Run) {
        let request = self.client.cancel_run(&run.thread_id, &run.id);

        match tokio::time::timeout(CANCEL_RUN_TIMEOUT, request).await {
            Ok(Ok(cancelled)) => {
                tracing::info!(run_id = %run.id, status = %cancelled.status, "Cancelled abandoned run");
            }
            Ok(Err(e)) => {
                tracing::warn!(run_id = %run.id, thread_id = %run.thread_id, error = %e, "Failed to cancel abandoned run");
            }
            Err(_) => {
                tracing::warn!(run_id = %run.id, thread_id = %run.thread_id, "Cancelling abandoned run timed out");
            }
        }
    }

    /// Text of the newest assistant message in the thread.
    ///
    /// Messages are requested newest-first and user messages are skipped, so
    /// the reply does not depend on the service's default ordering.
    pub async fn fetch_reply(&self, thread_id: &str) -> Result<String, PollError> {
        let messages = self.client.list_messages(thread_id, ListOrder::Desc).await?;

        messages
            .into_iter()
            .find(|m| m.role == MessageRole::Assistant)
            .map(|m| m.text())
            .ok_or_else(|| PollError::NoReply {
                thread_id: thread_id.to_string(),
            })
    }
}
