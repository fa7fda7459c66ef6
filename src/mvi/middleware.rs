use super::{Action, Middleware, State};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{Level, event};

/// Logs every dispatched action at DEBUG
#[derive(Default)]
pub struct TracingMiddleware {
    seen: AtomicU64,
}

impl TracingMiddleware {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of actions observed so far
    pub fn seen(&self) -> u64 {
        self.seen.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl<S: State, A: Action> Middleware<S, A> for TracingMiddleware {
    async fn process(&self, action: &A, _current: &S::View) {
        let sequence = self.seen.fetch_add(1, Ordering::Relaxed) + 1;
        event!(Level::DEBUG, sequence, action = ?action, "dispatch");
    }
}
