//! Supervised establishment of the document-store connection.
//!
//! A [`ConnectionSupervisor`] drives one sequence of connection attempts:
//!
//! ```text
//! Idle -> Attempting -> Connected                      (terminal)
//!                    -> Retrying -> Attempting ...
//!                    -> Exhausted                      (terminal)
//! ```
//!
//! Attempts run one at a time. After a failure the supervisor sleeps for the
//! configured delay (constant, no multiplier, no jitter) before the next
//! attempt. Failures before the last attempt are logged and swallowed; when
//! attempt `max_attempts` fails the sequence ends with
//! [`ContactError::ExhaustedRetries`] and the caller decides whether to exit.
//!
//! The current state is published on a `tokio::sync::watch` channel so that
//! other components can observe readiness without holding the supervisor.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::error::{ContactError, Result};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(2000);

/// Retry policy for one supervised connection sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupervisorConfig {
    /// Total attempts, including the first. Never below 1.
    pub max_attempts: u32,
    /// Fixed pause between a failed attempt and the next one.
    pub retry_delay: Duration,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }
}

impl SupervisorConfig {
    pub fn new(max_attempts: u32, retry_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            retry_delay,
        }
    }

    /// Load the retry policy from `CONTACTDESK_CONNECT_MAX_ATTEMPTS` and
    /// `CONTACTDESK_CONNECT_RETRY_DELAY_MS`, falling back to 5 attempts and
    /// 2000 ms. Unparseable values fall back to the defaults.
    pub fn from_env() -> Self {
        let max_attempts = std::env::var("CONTACTDESK_CONNECT_MAX_ATTEMPTS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_ATTEMPTS);
        let retry_delay = std::env::var("CONTACTDESK_CONNECT_RETRY_DELAY_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_RETRY_DELAY);
        Self::new(max_attempts, retry_delay)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptOutcome {
    Success,
    Failure,
}

/// One discrete try to reach the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionAttempt {
    pub attempt_number: u32,
    pub outcome: AttemptOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ConnectionAttempt {
    fn succeeded(attempt_number: u32) -> Self {
        Self {
            attempt_number,
            outcome: AttemptOutcome::Success,
            error: None,
        }
    }

    fn failed(attempt_number: u32, error: String) -> Self {
        Self {
            attempt_number,
            outcome: AttemptOutcome::Failure,
            error: Some(error),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SupervisorState {
    Idle,
    Attempting { attempt: u32 },
    Retrying { attempt: u32 },
    Connected { attempts: u32 },
    Exhausted { attempts: u32 },
    /// Only reachable when a shutdown signal was attached.
    Cancelled { attempts: u32 },
}

impl SupervisorState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SupervisorState::Connected { .. }
                | SupervisorState::Exhausted { .. }
                | SupervisorState::Cancelled { .. }
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            SupervisorState::Idle => "idle",
            SupervisorState::Attempting { .. } => "attempting",
            SupervisorState::Retrying { .. } => "retrying",
            SupervisorState::Connected { .. } => "connected",
            SupervisorState::Exhausted { .. } => "exhausted",
            SupervisorState::Cancelled { .. } => "cancelled",
        }
    }
}

/// The single operation the supervisor retries.
///
/// Implementations should apply their own per-attempt timeout; the
/// supervisor only controls the pause between attempts.
#[async_trait]
pub trait Connector: Send + Sync {
    type Handle: Send;

    /// Human-readable target for log lines. Must not contain credentials.
    fn target(&self) -> String;

    async fn connect(&self) -> Result<Self::Handle>;
}

/// Successful outcome of a supervised sequence.
#[derive(Debug)]
pub struct Supervised<H> {
    pub handle: H,
    /// Every attempt made, numbered `1..=k`; the last one succeeded.
    pub attempts: Vec<ConnectionAttempt>,
}

pub struct ConnectionSupervisor {
    config: SupervisorConfig,
    state: watch::Sender<SupervisorState>,
    shutdown: Option<watch::Receiver<bool>>,
}

impl ConnectionSupervisor {
    pub fn new(config: SupervisorConfig) -> Self {
        let (state, _) = watch::channel(SupervisorState::Idle);
        Self {
            config,
            state,
            shutdown: None,
        }
    }

    /// Attach a shutdown signal. Setting it to `true` ends the sequence
    /// during the next inter-attempt wait with [`ContactError::Cancelled`].
    pub fn with_shutdown(mut self, shutdown: watch::Receiver<bool>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    pub fn config(&self) -> SupervisorConfig {
        self.config
    }

    pub fn state(&self) -> SupervisorState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<SupervisorState> {
        self.state.subscribe()
    }

    /// Run one connection sequence to a terminal state.
    ///
    /// # Errors
    ///
    /// [`ContactError::ExhaustedRetries`] once every attempt has failed, or
    /// [`ContactError::Cancelled`] if the attached shutdown signal fired.
    pub async fn supervise<C: Connector>(&self, connector: &C) -> Result<Supervised<C::Handle>> {
        let max_attempts = self.config.max_attempts.max(1);
        let target = connector.target();
        let started = Instant::now();
        let mut attempts = Vec::new();
        let mut attempt = 1;

        loop {
            self.transition(SupervisorState::Attempting { attempt });
            tracing::debug!(attempt, max_attempts, target = %target, "Connecting to store");

            match connector.connect().await {
                Ok(handle) => {
                    attempts.push(ConnectionAttempt::succeeded(attempt));
                    self.transition(SupervisorState::Connected { attempts: attempt });
                    tracing::info!(
                        attempt,
                        max_attempts,
                        target = %target,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "Store connected"
                    );
                    return Ok(Supervised { handle, attempts });
                }
                Err(e) => {
                    let error = e.to_string();
                    tracing::warn!(
                        attempt,
                        max_attempts,
                        target = %target,
                        error = %error,
                        "Store connection attempt failed"
                    );
                    attempts.push(ConnectionAttempt::failed(attempt, error.clone()));

                    if attempt >= max_attempts {
                        self.transition(SupervisorState::Exhausted { attempts: attempt });
                        tracing::error!(
                            attempts = attempt,
                            target = %target,
                            elapsed_ms = started.elapsed().as_millis() as u64,
                            last_error = %error,
                            "Store connection attempts exhausted"
                        );
                        return Err(ContactError::ExhaustedRetries {
                            attempts: attempt,
                            last_error: error,
                        });
                    }

                    self.transition(SupervisorState::Retrying { attempt });
                    if let Err(e) = self.wait_before_retry(attempt).await {
                        self.transition(SupervisorState::Cancelled { attempts: attempt });
                        tracing::warn!(attempts = attempt, target = %target, "Store connection cancelled");
                        return Err(e);
                    }
                    attempt += 1;
                }
            }
        }
    }

    /// Run [`supervise`](Self::supervise) on its own task so the wait never
    /// stalls the caller. Join the handle to receive the terminal outcome.
    pub fn spawn<C>(self: Arc<Self>, connector: C) -> JoinHandle<Result<Supervised<C::Handle>>>
    where
        C: Connector + 'static,
        C::Handle: 'static,
    {
        tokio::spawn(async move { self.supervise(&connector).await })
    }

    async fn wait_before_retry(&self, attempt: u32) -> Result<()> {
        let delay = self.config.retry_delay;
        let Some(mut shutdown) = self.shutdown.clone() else {
            tokio::time::sleep(delay).await;
            return Ok(());
        };

        if *shutdown.borrow() {
            return Err(ContactError::Cancelled { attempts: attempt });
        }

        let sleep = tokio::time::sleep(delay);
        tokio::pin!(sleep);
        tokio::select! {
            _ = &mut sleep => return Ok(()),
            cancelled = async { shutdown.wait_for(|stop| *stop).await.is_ok() } => {
                if cancelled {
                    return Err(ContactError::Cancelled { attempts: attempt });
                }
            }
        }

        // Shutdown sender dropped: nobody can cancel any more.
        sleep.await;
        Ok(())
    }

    fn transition(&self, next: SupervisorState) {
        let previous = self.state.send_replace(next);
        tracing::trace!(from = previous.label(), to = next.label(), "Supervisor transition");
    }
}
