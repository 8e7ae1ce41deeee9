//! Engine queue - serializes key events from any number of producers
//!
//! One tokio task owns the [`KeyMapper`] and the sink and drains an unbounded
//! channel in order. Producers only hold cloneable senders, so the engine
//! itself never needs a lock.

use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, trace};

use crate::input::KeyEvent;
use crate::mapper::{EventOutcome, KeyMapper, MapperError};
use crate::pad::ControllerSink;
use crate::state::ActiveKeyState;

/// Queue failures
#[derive(Debug, Error)]
pub enum QueueError {
    /// The engine stopped on an invariant violation
    #[error(transparent)]
    Engine(#[from] MapperError),

    /// The engine task is gone
    #[error("engine queue is closed")]
    Closed,

    /// The engine task panicked or was cancelled
    #[error("engine task failed: {0}")]
    Join(String),
}

/// Handle to the engine task
pub struct EngineQueue<S> {
    tx: mpsc::UnboundedSender<KeyEvent>,
    held_rx: watch::Receiver<ActiveKeyState>,
    handle: JoinHandle<Result<S, MapperError>>,
}

impl<S: ControllerSink + 'static> EngineQueue<S> {
    /// Move the mapper and sink into a new engine task
    pub fn spawn(mapper: KeyMapper, sink: S) -> Self {
        let (tx, rx) = mpsc::unbounded_channel::<KeyEvent>();
        let (held_tx, held_rx) = watch::channel(*mapper.state());

        let handle = tokio::spawn(Self::run(mapper, sink, rx, held_tx));

        Self {
            tx,
            held_rx,
            handle,
        }
    }

    async fn run(
        mut mapper: KeyMapper,
        mut sink: S,
        mut rx: mpsc::UnboundedReceiver<KeyEvent>,
        held_tx: watch::Sender<ActiveKeyState>,
    ) -> Result<S, MapperError> {
        debug!("Engine task started (sink: {})", sink.name());

        while let Some(event) = rx.recv().await {
            match mapper.handle_event(&event, &mut sink) {
                Ok(EventOutcome::Applied { .. }) => {
                    held_tx.send_replace(*mapper.state());
                }
                Ok(EventOutcome::Ignored(reason)) => {
                    trace!("{} ignored: {}", event, reason);
                }
                Err(e) => {
                    error!("Engine stopped: {}", e);
                    return Err(e);
                }
            }
        }

        debug!("Engine task stopped");
        Ok(sink)
    }

    /// A new producer handle
    pub fn sender(&self) -> mpsc::UnboundedSender<KeyEvent> {
        self.tx.clone()
    }

    /// Enqueue an event
    pub fn send(&self, event: KeyEvent) -> Result<(), QueueError> {
        self.tx.send(event).map_err(|_| QueueError::Closed)
    }

    /// Active key state after the most recent applied event
    pub fn held(&self) -> ActiveKeyState {
        *self.held_rx.borrow()
    }

    /// Watch the active key state
    pub fn subscribe_held(&self) -> watch::Receiver<ActiveKeyState> {
        self.held_rx.clone()
    }

    /// Stop accepting events from this handle and wait for the engine to
    /// drain. Returns the sink once every sender is dropped, or the error that
    /// stopped the engine.
    pub async fn shutdown(self) -> Result<S, QueueError> {
        let Self { tx, handle, .. } = self;
        drop(tx);

        match handle.await {
            Ok(result) => Ok(result?),
            Err(e) => Err(QueueError::Join(e.to_string())),
        }
    }
}
