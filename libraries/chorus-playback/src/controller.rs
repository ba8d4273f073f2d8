//! Playback controller - per-session state machine
//!
//! Owns the queue, the playback state and the sink handle of one session.
//! It is driven by exactly one worker (see [`crate::session`]), so every
//! method takes `&mut self` and commands never interleave.
//!
//! ```text
//!            enqueue (started)            pause
//!   Idle ───────────────────────► Playing ─────► Paused
//!    ▲  ◄──── skip/completion ────   │  ◄─────── resume
//!    │        (queue empty)          │
//!    └──────────── leave ────────────┴──► Stopped (terminal)
//! ```
//!
//! Every sink start gets a new epoch. Sink signals carry the epoch they were
//! started under; a signal whose epoch is not the current one is stale and is
//! dropped, so a manual skip and a natural completion can never both advance
//! the queue for the same track.

use crate::{
    events::PlaybackEvent,
    queue::Queue,
    types::{Ack, Outcome, PlaybackConfig, SessionCommand, SessionStatus},
};
use chorus_core::{
    AudioSink, PlaybackError, PlaybackState, Result, SessionKey, SinkHandle, SinkNotifier,
    SinkOutcome, SinkSignal, Track, TrackResolver,
};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

/// Where sink signals are delivered (normally the session inbox)
pub type SignalRoute = Arc<dyn Fn(SinkSignal) + Send + Sync>;

/// Per-session playback state machine
pub struct PlaybackController {
    key: SessionKey,
    state: PlaybackState,
    queue: Queue,

    // Sink bookkeeping. `None` while Paused means the stream already ended.
    epoch: u64,
    handle: Option<SinkHandle>,

    /// Extra tracks tried after a start failure
    retry_limit: usize,

    resolver: Arc<dyn TrackResolver>,
    sink: Arc<dyn AudioSink>,
    signals: SignalRoute,
    events: broadcast::Sender<PlaybackEvent>,
}

impl PlaybackController {
    /// Create an idle controller with an empty queue
    pub fn new(
        key: SessionKey,
        config: &PlaybackConfig,
        resolver: Arc<dyn TrackResolver>,
        sink: Arc<dyn AudioSink>,
        signals: SignalRoute,
        events: broadcast::Sender<PlaybackEvent>,
    ) -> Self {
        Self {
            key,
            state: PlaybackState::Idle,
            queue: Queue::new(),
            epoch: 0,
            handle: None,
            retry_limit: config.resolve_retry_limit,
            resolver,
            sink,
            signals,
            events,
        }
    }

    // ===== Accessors =====

    /// Session this controller belongs to
    pub fn key(&self) -> &SessionKey {
        &self.key
    }

    /// Current playback state
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Epoch of the most recent sink start (or stop)
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Read access to the queue
    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    /// Status published to readers outside the worker
    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            state: self.state,
            queue: self.queue.snapshot(),
            history_len: self.queue.history_len(),
            epoch: self.epoch,
        }
    }

    // ===== Commands =====

    /// Apply one command
    pub async fn handle(&mut self, command: SessionCommand) -> Result<Ack> {
        match command {
            SessionCommand::Enqueue(track) => self.enqueue(track).await,
            SessionCommand::Pause => self.pause().await,
            SessionCommand::Resume => self.resume().await,
            SessionCommand::Skip => self.skip().await,
            SessionCommand::Previous => self.previous().await,
        }
    }

    /// Queue a track, starting playback if the session is idle
    pub async fn enqueue(&mut self, track: Track) -> Result<Ack> {
        self.ensure_running()?;

        info!(session = %self.key, track = %track.title, "Queued track");
        self.queue.enqueue(track.clone());

        if self.state != PlaybackState::Idle {
            self.emit_queue_changed();
            return Ok(Ack::new(Outcome::Queued {
                track,
                started: false,
            }));
        }

        let mut warnings = Vec::new();
        self.queue.advance_forward();
        self.emit_queue_changed();
        let started = self.start_from_current(&mut warnings).await?.is_some();

        Ok(Ack::new(Outcome::Queued { track, started }).with_warnings(warnings))
    }

    /// Pause the playing track
    pub async fn pause(&mut self) -> Result<Ack> {
        self.ensure_running()?;
        if self.state != PlaybackState::Playing {
            return Err(PlaybackError::invalid_transition("pause", self.state));
        }

        let handle = self.live_handle("pause")?;
        self.sink.pause(handle).await?;
        self.set_state(PlaybackState::Paused);

        Ok(Ack::new(Outcome::Paused))
    }

    /// Resume the paused track
    ///
    /// If the track finished while paused, playback moves on to the next
    /// pending track instead.
    pub async fn resume(&mut self) -> Result<Ack> {
        self.ensure_running()?;
        if self.state != PlaybackState::Paused {
            return Err(PlaybackError::invalid_transition("resume", self.state));
        }

        let Some(handle) = self.handle else {
            debug!(session = %self.key, "Track ended while paused, advancing");
            let mut warnings = Vec::new();
            self.advance_after_stream_end(&mut warnings).await?;
            return Ok(Ack::new(Outcome::Resumed).with_warnings(warnings));
        };

        self.sink.resume(handle).await?;
        self.set_state(PlaybackState::Playing);

        Ok(Ack::new(Outcome::Resumed))
    }

    /// Stop the current track and start the next pending one
    pub async fn skip(&mut self) -> Result<Ack> {
        self.ensure_running()?;
        if !self.state.is_active() {
            return Err(PlaybackError::invalid_transition("skip", self.state));
        }

        let mut warnings = self.stop_sink().await;
        self.retire_current();
        self.queue.advance_forward();
        self.emit_queue_changed();

        let now_playing = self.start_from_current(&mut warnings).await?;
        Ok(Ack::new(Outcome::Skipped { now_playing }).with_warnings(warnings))
    }

    /// Go back to the most recently played track
    ///
    /// The interrupted track (if any) goes back to the front of the pending
    /// list. With empty history this is a no-op.
    pub async fn previous(&mut self) -> Result<Ack> {
        self.ensure_running()?;
        if !self.queue.has_previous() {
            debug!(session = %self.key, "No previous track");
            return Ok(Ack::new(Outcome::NoPrevious));
        }

        let mut warnings = self.stop_sink().await;
        self.queue.advance_backward();
        self.emit_queue_changed();

        let now_playing = self.start_from_current(&mut warnings).await?;
        Ok(Ack::new(Outcome::Previous { now_playing }).with_warnings(warnings))
    }

    /// Handle the terminal signal of a sink stream
    ///
    /// Completion while playing and failure while playing or paused advance
    /// the queue. Completion while paused only records that the stream is
    /// gone; the queue advances on resume. Signals from an older epoch, or
    /// arriving while idle, are dropped.
    pub async fn on_sink_signal(&mut self, signal: SinkSignal) {
        if signal.epoch != self.epoch {
            debug!(
                session = %self.key,
                signal_epoch = signal.epoch,
                epoch = self.epoch,
                "Dropping stale sink signal"
            );
            return;
        }

        if !self.state.is_active() {
            debug!(session = %self.key, state = %self.state, "Ignoring sink signal");
            return;
        }

        match signal.outcome {
            SinkOutcome::Completed if self.state == PlaybackState::Paused => {
                debug!(session = %self.key, "Stream completed while paused");
                self.handle = None;
                return;
            }
            SinkOutcome::Completed => {}
            SinkOutcome::Failed(err) => {
                warn!(session = %self.key, error = %err, "Stream failed, advancing");
                self.emit(PlaybackEvent::Warning { error: err.into() });
            }
        }

        let mut warnings = Vec::new();
        if let Err(err) = self.advance_after_stream_end(&mut warnings).await {
            self.emit(PlaybackEvent::Error { error: err });
        }
    }

    /// Tear the session down: stop the sink, clear the queue, enter `Stopped`
    pub async fn shutdown(&mut self) {
        if self.state == PlaybackState::Stopped {
            return;
        }

        self.stop_sink().await;
        self.queue.clear();
        self.set_state(PlaybackState::Stopped);
        self.emit(PlaybackEvent::SessionClosed);
        info!(session = %self.key, "Session stopped");
    }

    // ===== Internal =====

    fn ensure_running(&self) -> Result<()> {
        if self.state == PlaybackState::Stopped {
            return Err(PlaybackError::SessionStopped(self.key.clone()));
        }
        Ok(())
    }

    fn live_handle(&self, command: &'static str) -> Result<SinkHandle> {
        self.handle
            .ok_or(PlaybackError::invalid_transition(command, self.state))
    }

    /// Start `current`, falling through to the next pending tracks on failure
    ///
    /// Tracks that fail to start are discarded (they never played). Gives up
    /// after `retry_limit` extra attempts, or when nothing is left to try,
    /// returning the last failure with the session idle.
    async fn start_from_current(
        &mut self,
        warnings: &mut Vec<PlaybackError>,
    ) -> Result<Option<Track>> {
        let mut failures = 0;

        loop {
            let Some(track) = self.queue.current().cloned() else {
                self.set_state(PlaybackState::Idle);
                return Ok(None);
            };

            match self.start_track(&track).await {
                Ok(epoch) => {
                    info!(session = %self.key, track = %track.title, epoch, "Started track");
                    self.set_state(PlaybackState::Playing);
                    self.emit(PlaybackEvent::TrackStarted {
                        track: track.clone(),
                        epoch,
                    });
                    return Ok(Some(track));
                }
                Err(err) => {
                    self.queue.discard_current();
                    failures += 1;

                    if failures > self.retry_limit || self.queue.peek_next().is_none() {
                        error!(
                            session = %self.key,
                            track = %track.title,
                            failures,
                            error = %err,
                            "Could not start playback"
                        );
                        self.set_state(PlaybackState::Idle);
                        self.emit_queue_changed();
                        return Err(err);
                    }

                    warn!(
                        session = %self.key,
                        track = %track.title,
                        error = %err,
                        "Track failed to start, trying next"
                    );
                    self.emit(PlaybackEvent::Warning { error: err.clone() });
                    warnings.push(err);
                    self.queue.advance_forward();
                    self.emit_queue_changed();
                }
            }
        }
    }

    /// Retire the track whose stream ended and start the next one
    async fn advance_after_stream_end(
        &mut self,
        warnings: &mut Vec<PlaybackError>,
    ) -> Result<Option<Track>> {
        self.handle = None;
        self.retire_current();
        self.queue.advance_forward();
        self.emit_queue_changed();
        self.start_from_current(warnings).await
    }

    /// Resolve and start one track under a fresh epoch
    async fn start_track(&mut self, track: &Track) -> Result<u64> {
        let stream = self.resolver.resolve_stream(track).await?;

        self.epoch += 1;
        let epoch = self.epoch;
        let route = Arc::clone(&self.signals);
        let notifier = SinkNotifier::new(epoch, move |signal| route(signal));

        match self.sink.start(&self.key, &stream, notifier).await {
            Ok(handle) => {
                self.handle = Some(handle);
                Ok(epoch)
            }
            Err(err) => {
                // The notifier was dropped inside `start`; outdate its signal
                self.epoch += 1;
                Err(err.into())
            }
        }
    }

    /// Stop the live stream (if any) and outdate its pending signal
    async fn stop_sink(&mut self) -> Vec<PlaybackError> {
        self.epoch += 1;

        let mut warnings = Vec::new();
        if let Some(handle) = self.handle.take() {
            if let Err(err) = self.sink.stop(handle).await {
                warn!(session = %self.key, %handle, error = %err, "Failed to stop stream");
                let err = PlaybackError::from(err);
                self.emit(PlaybackEvent::Warning { error: err.clone() });
                warnings.push(err);
            }
        }
        warnings
    }

    fn retire_current(&self) {
        if let Some(track) = self.queue.current() {
            self.emit(PlaybackEvent::TrackFinished {
                track_id: track.id.clone(),
            });
        }
    }

    fn set_state(&mut self, state: PlaybackState) {
        if self.state != state {
            debug!(session = %self.key, from = %self.state, to = %state, "State changed");
            self.state = state;
            self.emit(PlaybackEvent::StateChanged { state });
        }
    }

    fn emit_queue_changed(&self) {
        self.emit(PlaybackEvent::QueueChanged {
            pending: self.queue.pending_len(),
        });
    }

    fn emit(&self, event: PlaybackEvent) {
        // No subscribers is fine
        self.events.send(event).ok();
    }
}
