// ============================================================================
// Model / Intent Dispatch
// ============================================================================
//
// A single task owns the state. Actions are queued on a bounded mailbox and
// applied one at a time: middlewares observe, the reducer mutates, then the
// resulting view is published to subscribers. This is the only place where
// concurrent callers meet the single-writer store.
//
// ============================================================================

pub mod middleware;
pub mod store;

use async_trait::async_trait;

pub use middleware::TracingMiddleware;
pub use store::Store;

/// State owned by a `Store`
pub trait State: Send + 'static {
    /// Read-only snapshot published after every action
    type View: Clone + Send + Sync + 'static;

    fn view(&self) -> Self::View;
}

pub trait Action: std::fmt::Debug + Send + Sync + 'static {}

/// Applies an action to the state in place
pub trait Reducer<S: State, A: Action>: Send + Sync + 'static {
    fn reduce(&self, state: &mut S, action: A);
}

/// Observes each action before it is reduced
#[async_trait]
pub trait Middleware<S: State, A: Action>: Send + Sync + 'static {
    async fn process(&self, action: &A, current: &S::View);
}
