// ============================================================================
// Session: presentation core shared by every front end
// ============================================================================

pub mod config;
pub mod reducer;
pub mod state;

use crate::command::Command;
use crate::core::Result;
use crate::mvi::{Middleware, Store, TracingMiddleware};
use std::sync::Arc;

pub use config::SessionConfig;
pub use reducer::SessionReducer;
pub use state::{DialogState, SessionAction, SessionState, SessionView};

/// Dispatch handle over a session's store
pub struct Session {
    store: Store<SessionState, SessionAction>,
}

impl Session {
    /// Start a session worker. Must be called from within a tokio runtime.
    pub fn start(config: SessionConfig) -> Self {
        let capacity = config.mailbox_capacity;
        let tracing_middleware: Arc<dyn Middleware<SessionState, SessionAction>> =
            Arc::new(TracingMiddleware::new());
        let middlewares = vec![tracing_middleware];
        let store = Store::with_middlewares(
            SessionState::new(config),
            SessionReducer,
            middlewares,
            capacity,
        );
        Self { store }
    }

    /// Apply a command and return the resulting view
    pub async fn apply(&self, command: Command) -> Result<SessionView> {
        self.store
            .dispatch_and_wait(SessionAction::Apply(command))
            .await
    }

    /// Parse a line of input and apply it
    pub async fn apply_line(&self, line: &str) -> Result<SessionView> {
        self.apply(Command::from_input(line)).await
    }

    pub fn view(&self) -> SessionView {
        self.store.view()
    }

    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<SessionView> {
        self.store.subscribe()
    }

    pub async fn shutdown(self) -> Result<()> {
        self.store.shutdown().await
    }
}
