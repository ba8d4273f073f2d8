//! Session manager - routes commands to per-session workers
//!
//! Owns the session map. Creation and removal are serialized by one lock
//! around the map, so concurrent joins for the same key always end up with
//! the same session. Everything else happens on the session's own worker.

use crate::{
    session::Session,
    types::{Ack, Command, Outcome, PlaybackConfig, SessionCommand},
};
use chorus_core::{AudioSink, PlaybackError, Result, SessionKey, TrackResolver};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Registry of live sessions plus the collaborators they share
pub struct SessionManager {
    sessions: Mutex<HashMap<SessionKey, Arc<Session>>>,
    config: PlaybackConfig,
    resolver: Arc<dyn TrackResolver>,
    sink: Arc<dyn AudioSink>,
}

impl SessionManager {
    /// Create an empty manager
    pub fn new(
        config: PlaybackConfig,
        resolver: Arc<dyn TrackResolver>,
        sink: Arc<dyn AudioSink>,
    ) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            config,
            resolver,
            sink,
        }
    }

    /// Existing session for `key`, or a fresh idle one
    ///
    /// A session that has already been closed is replaced.
    pub async fn get_or_create(&self, key: &SessionKey) -> Arc<Session> {
        let mut sessions = self.sessions.lock().await;

        if let Some(session) = sessions.get(key) {
            if !session.is_closed() {
                return Arc::clone(session);
            }
        }

        info!(session = %key, "Creating session");
        let session = Session::spawn(
            key.clone(),
            &self.config,
            Arc::clone(&self.resolver),
            Arc::clone(&self.sink),
        );
        sessions.insert(key.clone(), Arc::clone(&session));
        session
    }

    /// Existing session for `key`
    pub async fn get(&self, key: &SessionKey) -> Result<Arc<Session>> {
        self.sessions
            .lock()
            .await
            .get(key)
            .filter(|session| !session.is_closed())
            .cloned()
            .ok_or_else(|| PlaybackError::SessionNotFound(key.clone()))
    }

    /// Tear a session down and forget it
    ///
    /// The map lock is released before waiting for the worker, so other
    /// sessions are not held up by a slow teardown.
    pub async fn remove(&self, key: &SessionKey) -> Result<()> {
        let session = self
            .sessions
            .lock()
            .await
            .remove(key)
            .ok_or_else(|| PlaybackError::SessionNotFound(key.clone()))?;

        info!(session = %key, "Removing session");
        session.close().await;
        Ok(())
    }

    /// Keys of all live sessions, sorted
    pub async fn sessions(&self) -> Vec<SessionKey> {
        let mut keys: Vec<SessionKey> = self
            .sessions
            .lock()
            .await
            .iter()
            .filter(|(_, session)| !session.is_closed())
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort();
        keys
    }

    /// Apply a user command to a session
    pub async fn submit(&self, key: &SessionKey, command: Command) -> Result<Ack> {
        debug!(session = %key, command = command.name(), "Submitting command");

        match command {
            Command::Join => {
                self.get_or_create(key).await;
                Ok(Ack::new(Outcome::Joined))
            }
            Command::Leave => {
                self.remove(key).await?;
                Ok(Ack::new(Outcome::Left))
            }
            Command::Play(query) => {
                let session = self.get(key).await?;
                // Only the caller waits on the resolver, not the session
                let track = self.resolver.resolve(&query).await?;
                session.send(SessionCommand::Enqueue(track)).await
            }
            Command::ListQueue => {
                let session = self.get(key).await?;
                Ok(Ack::new(Outcome::Queue(session.snapshot().await)))
            }
            Command::Pause => self.send(key, SessionCommand::Pause).await,
            Command::Resume => self.send(key, SessionCommand::Resume).await,
            Command::Skip => self.send(key, SessionCommand::Skip).await,
            Command::Previous => self.send(key, SessionCommand::Previous).await,
        }
    }

    /// Leave every session
    pub async fn shutdown(&self) {
        let sessions: Vec<Arc<Session>> = self
            .sessions
            .lock()
            .await
            .drain()
            .map(|(_, session)| session)
            .collect();

        info!(count = sessions.len(), "Shutting down sessions");
        for session in sessions {
            session.close().await;
        }
    }

    async fn send(&self, key: &SessionKey, command: SessionCommand) -> Result<Ack> {
        self.get(key).await?.send(command).await
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
