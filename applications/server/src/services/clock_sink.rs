/// Clock sink - headless audio output that plays tracks by waiting them out
///
/// Each started track gets a timer task running for the track's duration
/// estimate (or the configured fallback). Pausing freezes the remaining time.
/// The task reports completion when the time runs out or when it is stopped.
use async_trait::async_trait;
use chorus_core::{AudioSink, SessionKey, SinkError, SinkHandle, SinkNotifier, Track};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    Pause,
    Resume,
    Stop,
}

type Streams = Arc<Mutex<HashMap<u64, mpsc::UnboundedSender<Control>>>>;

#[derive(Debug, Clone)]
pub struct ClockSink {
    fallback: Duration,
    streams: Streams,
    next_id: Arc<AtomicU64>,
}

impl ClockSink {
    pub fn new(fallback: Duration) -> Self {
        Self {
            fallback,
            streams: Arc::new(Mutex::new(HashMap::new())),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Number of streams still running
    pub async fn active_streams(&self) -> usize {
        self.streams.lock().await.len()
    }

    async fn control(&self, handle: SinkHandle, control: Control) -> Result<(), SinkError> {
        let streams = self.streams.lock().await;
        let sender = streams
            .get(&handle.id())
            .ok_or(SinkError::UnknownHandle(handle.id()))?;
        sender
            .send(control)
            .map_err(|_| SinkError::UnknownHandle(handle.id()))
    }
}

#[async_trait]
impl AudioSink for ClockSink {
    async fn start(
        &self,
        session: &SessionKey,
        track: &Track,
        notifier: SinkNotifier,
    ) -> Result<SinkHandle, SinkError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let length = track.duration_estimate.unwrap_or(self.fallback);
        let (control, receiver) = mpsc::unbounded_channel();

        self.streams.lock().await.insert(id, control);
        tracing::debug!(
            "Clock stream {} started for {} ({:?}, session {})",
            id,
            track.title,
            length,
            session
        );

        tokio::spawn(run_clock(
            id,
            length,
            receiver,
            notifier,
            Arc::clone(&self.streams),
        ));

        Ok(SinkHandle::new(id))
    }

    async fn pause(&self, handle: SinkHandle) -> Result<(), SinkError> {
        self.control(handle, Control::Pause).await
    }

    async fn resume(&self, handle: SinkHandle) -> Result<(), SinkError> {
        self.control(handle, Control::Resume).await
    }

    async fn stop(&self, handle: SinkHandle) -> Result<(), SinkError> {
        // Stopping a stream that already ended is fine
        if let Some(sender) = self.streams.lock().await.remove(&handle.id()) {
            sender.send(Control::Stop).ok();
        }
        Ok(())
    }
}

async fn run_clock(
    id: u64,
    length: Duration,
    mut control: mpsc::UnboundedReceiver<Control>,
    notifier: SinkNotifier,
    streams: Streams,
) {
    let mut remaining = length;
    let mut paused = false;

    loop {
        if paused {
            match control.recv().await {
                Some(Control::Resume) => paused = false,
                Some(Control::Pause) => {}
                Some(Control::Stop) | None => break,
            }
            continue;
        }

        let started = Instant::now();
        tokio::select! {
            () = tokio::time::sleep(remaining) => break,
            message = control.recv() => {
                remaining = remaining.saturating_sub(started.elapsed());
                match message {
                    Some(Control::Pause) => paused = true,
                    Some(Control::Resume) => {}
                    Some(Control::Stop) | None => break,
                }
            }
        }
    }

    streams.lock().await.remove(&id);
    tracing::debug!("Clock stream {} finished", id);
    notifier.completed();
}
