use super::{Action, Middleware, Reducer, State};
use crate::core::{KvError, Result};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::debug;

struct Envelope<A, V> {
    action: A,
    ack: Option<oneshot::Sender<V>>,
}

/// Single-owner actor serializing all actions into one state
pub struct Store<S: State, A: Action> {
    mailbox: mpsc::Sender<Envelope<A, S::View>>,
    view: watch::Receiver<S::View>,
    worker: Option<JoinHandle<()>>,
}

impl<S: State, A: Action> Store<S, A> {
    /// Spawn the worker task. Must be called from within a tokio runtime.
    pub fn new<R>(initial_state: S, reducer: R, capacity: usize) -> Self
    where
        R: Reducer<S, A>,
    {
        Self::with_middlewares(initial_state, reducer, Vec::new(), capacity)
    }

    pub fn with_middlewares<R>(
        initial_state: S,
        reducer: R,
        middlewares: Vec<Arc<dyn Middleware<S, A>>>,
        capacity: usize,
    ) -> Self
    where
        R: Reducer<S, A>,
    {
        let (mailbox, mut inbox) = mpsc::channel::<Envelope<A, S::View>>(capacity.max(1));
        let (view_tx, view) = watch::channel(initial_state.view());

        let worker = tokio::spawn(async move {
            let mut state = initial_state;
            debug!("store worker started");

            while let Some(Envelope { action, ack }) = inbox.recv().await {
                let current = view_tx.borrow().clone();
                for middleware in &middlewares {
                    middleware.process(&action, &current).await;
                }

                reducer.reduce(&mut state, action);

                let next = state.view();
                view_tx.send_replace(next.clone());
                if let Some(ack) = ack {
                    // the caller may have stopped waiting
                    let _ = ack.send(next);
                }
            }

            debug!("store worker stopped");
        });

        Self {
            mailbox,
            view,
            worker: Some(worker),
        }
    }

    /// Queue an action without waiting for it to be applied
    pub async fn dispatch(&self, action: A) -> Result<()> {
        self.mailbox.send(Envelope { action, ack: None }).await?;
        Ok(())
    }

    /// Queue an action and return the view it produced
    pub async fn dispatch_and_wait(&self, action: A) -> Result<S::View> {
        let (ack, done) = oneshot::channel();
        self.mailbox
            .send(Envelope {
                action,
                ack: Some(ack),
            })
            .await?;
        Ok(done.await?)
    }

    /// Latest published view
    pub fn view(&self) -> S::View {
        self.view.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<S::View> {
        self.view.clone()
    }

    /// Close the mailbox and wait for queued actions to drain
    pub async fn shutdown(mut self) -> Result<()> {
        let worker = self.worker.take();
        drop(self);
        if let Some(worker) = worker {
            worker
                .await
                .map_err(|err| KvError::SessionClosed(format!("store worker join: {}", err)))?;
        }
        Ok(())
    }
}
