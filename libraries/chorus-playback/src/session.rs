//! Session worker
//!
//! Each session runs one tokio task that owns its [`PlaybackController`] and
//! drains a single ordered inbox. User commands and sink signals share that
//! inbox, so they are applied strictly one at a time in arrival order.
//!
//! Leaving is handled out of band through a [`CancellationToken`]: it aborts
//! whatever the worker is awaiting (for example a slow sink start), tears the
//! controller down and answers anything still queued with `SessionStopped`.

use crate::{
    controller::{PlaybackController, SignalRoute},
    events::PlaybackEvent,
    queue::QueueSnapshot,
    types::{Ack, PlaybackConfig, SessionCommand, SessionStatus},
};
use chorus_core::{AudioSink, PlaybackError, Result, SessionKey, SinkSignal, TrackResolver};
use std::sync::Arc;
use tokio::{
    sync::{broadcast, mpsc, oneshot, Mutex, RwLock},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

/// Message in a session inbox
enum Inbox {
    Command {
        command: SessionCommand,
        reply: oneshot::Sender<Result<Ack>>,
    },
    Signal(SinkSignal),
}

/// Handle to a running session
///
/// Cheap to share behind an `Arc`. Dropping the last handle cancels the
/// worker.
pub struct Session {
    key: SessionKey,
    inbox: mpsc::UnboundedSender<Inbox>,
    status: Arc<RwLock<SessionStatus>>,
    events: broadcast::Sender<PlaybackEvent>,
    cancel: CancellationToken,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Session {
    /// Start a fresh idle session with an empty queue
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(
        key: SessionKey,
        config: &PlaybackConfig,
        resolver: Arc<dyn TrackResolver>,
        sink: Arc<dyn AudioSink>,
    ) -> Arc<Self> {
        let (inbox, receiver) = mpsc::unbounded_channel();
        let (events, _) = broadcast::channel(config.event_capacity.max(1));

        // Weak so in-flight notifiers do not keep a finished worker's inbox alive
        let weak_inbox = inbox.downgrade();
        let signals: SignalRoute = Arc::new(move |signal| {
            if let Some(inbox) = weak_inbox.upgrade() {
                inbox.send(Inbox::Signal(signal)).ok();
            }
        });

        let controller = PlaybackController::new(
            key.clone(),
            config,
            resolver,
            sink,
            signals,
            events.clone(),
        );
        let status = Arc::new(RwLock::new(controller.status()));
        let cancel = CancellationToken::new();

        let worker = tokio::spawn(run_worker(
            controller,
            receiver,
            cancel.clone(),
            Arc::clone(&status),
        ));

        Arc::new(Self {
            key,
            inbox,
            status,
            events,
            cancel,
            worker: Mutex::new(Some(worker)),
        })
    }

    /// Session key
    pub fn key(&self) -> &SessionKey {
        &self.key
    }

    /// Queue a command and wait for its result
    pub async fn send(&self, command: SessionCommand) -> Result<Ack> {
        let (reply, response) = oneshot::channel();
        self.inbox
            .send(Inbox::Command { command, reply })
            .map_err(|_| self.stopped())?;

        response.await.map_err(|_| self.stopped())?
    }

    /// Latest published status
    pub async fn status(&self) -> SessionStatus {
        self.status.read().await.clone()
    }

    /// Current and pending tracks, read without going through the inbox
    pub async fn snapshot(&self) -> QueueSnapshot {
        self.status.read().await.queue.clone()
    }

    /// Subscribe to playback events
    pub fn subscribe(&self) -> broadcast::Receiver<PlaybackEvent> {
        self.events.subscribe()
    }

    /// Whether the session has been torn down (or is being torn down)
    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled() || self.inbox.is_closed()
    }

    /// Tear the session down and wait for the worker to finish
    ///
    /// Accepted at any time, even while a sink call is in flight.
    pub async fn close(&self) {
        self.cancel.cancel();

        let worker = self.worker.lock().await.take();
        if let Some(worker) = worker {
            if let Err(err) = worker.await {
                error!(session = %self.key, error = %err, "Session worker panicked");
            }
        }
    }

    fn stopped(&self) -> PlaybackError {
        PlaybackError::SessionStopped(self.key.clone())
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("key", &self.key)
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

/// Worker loop: one message at a time until cancelled
async fn run_worker(
    mut controller: PlaybackController,
    mut inbox: mpsc::UnboundedReceiver<Inbox>,
    cancel: CancellationToken,
    status: Arc<RwLock<SessionStatus>>,
) {
    let key = controller.key().clone();
    debug!(session = %key, "Session worker started");

    loop {
        let message = tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            message = inbox.recv() => match message {
                Some(message) => message,
                None => break,
            },
        };

        match message {
            Inbox::Command { command, reply } => {
                let result = tokio::select! {
                    biased;
                    () = cancel.cancelled() => Err(PlaybackError::SessionStopped(key.clone())),
                    result = controller.handle(command) => result,
                };
                // Readers must see the effect once the originator does
                *status.write().await = controller.status();
                // The originator may have given up waiting
                reply.send(result).ok();
            }
            Inbox::Signal(signal) => {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => {}
                    () = controller.on_sink_signal(signal) => {}
                }
                *status.write().await = controller.status();
            }
        }
    }

    controller.shutdown().await;
    *status.write().await = controller.status();

    inbox.close();
    while let Ok(message) = inbox.try_recv() {
        if let Inbox::Command { reply, .. } = message {
            reply
                .send(Err(PlaybackError::SessionStopped(key.clone())))
                .ok();
        }
    }

    debug!(session = %key, "Session worker exited");
}
