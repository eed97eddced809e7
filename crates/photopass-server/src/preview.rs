//! Latest-wins scheduling for preview renders.
//!
//! Every settings change from a client schedules a new job for its session.
//! Scheduling bumps the session's generation and cancels the job before it,
//! so only the most recent request ever produces a result. Preview renders
//! also wait out a debounce period, during which a newer request supersedes
//! them without doing any work.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use dashmap::DashMap;
use tokio_util::sync::CancellationToken;

/// Sessions kept before idle schedulers are pruned.
const MAX_SESSIONS: usize = 1024;

/// Result of a scheduled job
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewOutcome<T> {
    Ready(T),
    /// A newer job was scheduled before this one finished.
    Superseded,
}

impl<T> PreviewOutcome<T> {
    pub fn is_superseded(&self) -> bool {
        matches!(self, PreviewOutcome::Superseded)
    }
}

/// Per-session scheduler
#[derive(Debug)]
pub struct PreviewScheduler {
    generation: AtomicU64,
    current: Mutex<CancellationToken>,
    debounce: Duration,
}

impl PreviewScheduler {
    pub fn new(debounce: Duration) -> Self {
        Self {
            generation: AtomicU64::new(0),
            current: Mutex::new(CancellationToken::new()),
            debounce,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Run `job` after the debounce period unless a newer job arrives first.
    pub async fn schedule<F, Fut, T>(&self, job: F) -> PreviewOutcome<T>
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = T>,
    {
        self.run(self.debounce, job).await
    }

    /// Run `job` immediately, cancelling any job still in flight.
    pub async fn run_latest<F, Fut, T>(&self, job: F) -> PreviewOutcome<T>
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = T>,
    {
        self.run(Duration::ZERO, job).await
    }

    async fn run<F, Fut, T>(&self, delay: Duration, job: F) -> PreviewOutcome<T>
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = T>,
    {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let token = CancellationToken::new();
        let previous = {
            let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
            std::mem::replace(&mut *current, token.clone())
        };
        previous.cancel();

        if !delay.is_zero() {
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    tracing::debug!(generation, "Preview superseded during debounce");
                    return PreviewOutcome::Superseded;
                }
                _ = tokio::time::sleep(delay) => {}
            }
        }

        let result = tokio::select! {
            biased;
            _ = token.cancelled() => {
                tracing::debug!(generation, "Preview superseded while running");
                return PreviewOutcome::Superseded;
            }
            result = job(token.clone()) => result,
        };

        if self.generation() == generation {
            PreviewOutcome::Ready(result)
        } else {
            PreviewOutcome::Superseded
        }
    }
}

/// Schedulers by client session id
#[derive(Debug)]
pub struct PreviewSessions {
    schedulers: DashMap<String, Arc<PreviewScheduler>>,
    debounce: Duration,
}

impl PreviewSessions {
    pub fn new(debounce: Duration) -> Self {
        Self {
            schedulers: DashMap::new(),
            debounce,
        }
    }

    /// Scheduler for `session`, created on first use.
    pub fn get(&self, session: &str) -> Arc<PreviewScheduler> {
        if self.schedulers.len() >= MAX_SESSIONS && !self.schedulers.contains_key(session) {
            self.prune();
        }
        self.schedulers
            .entry(session.to_string())
            .or_insert_with(|| Arc::new(PreviewScheduler::new(self.debounce)))
            .clone()
    }

    /// Drop schedulers with no job in flight.
    pub fn prune(&self) {
        let before = self.schedulers.len();
        self.schedulers
            .retain(|_, scheduler| Arc::strong_count(scheduler) > 1);
        tracing::debug!(
            removed = before - self.schedulers.len(),
            "Pruned idle preview sessions"
        );
    }

    pub fn len(&self) -> usize {
        self.schedulers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schedulers.is_empty()
    }
}
