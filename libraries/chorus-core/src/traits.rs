/// Collaborator traits for Chorus
///
/// The playback core never talks to a media backend directly. Resolution and
/// audio output are provided by implementations of these traits.
use crate::error::{ResolveError, SinkError};
use crate::types::{SessionKey, Track};
use async_trait::async_trait;
use std::fmt;

/// Turns user queries into playable tracks
#[async_trait]
pub trait TrackResolver: Send + Sync {
    /// Resolve a query (URL or free-text search) to a track
    ///
    /// # Errors
    /// Returns an error if nothing matched or the backend failed
    async fn resolve(&self, query: &str) -> Result<Track, ResolveError>;

    /// Resolve a queued track to a playable stream right before it starts
    ///
    /// Stream locators often expire, so this runs at start time rather than
    /// at enqueue time. The returned track is what the sink receives; the
    /// queue keeps the original.
    ///
    /// # Errors
    /// Returns an error if the stream can no longer be located
    async fn resolve_stream(&self, track: &Track) -> Result<Track, ResolveError> {
        self.resolve(&track.source_locator).await
    }
}

/// Opaque identifier of one started stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SinkHandle(u64);

impl SinkHandle {
    /// Create a handle from a sink-chosen id
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw id
    pub fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SinkHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sink#{}", self.0)
    }
}

/// How a stream ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkOutcome {
    /// Reached the end (or was stopped)
    Completed,

    /// Broke while playing
    Failed(SinkError),
}

/// Terminal signal of one `start` call, tagged with its playback epoch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkSignal {
    /// Epoch the stream was started under
    pub epoch: u64,

    /// How the stream ended
    pub outcome: SinkOutcome,
}

type Deliver = Box<dyn FnOnce(SinkSignal) + Send>;

/// One-shot completion callback handed to [`AudioSink::start`]
///
/// Consuming `completed`/`failed` guarantees at most one signal per start.
/// A notifier dropped without signalling reports a failure, so the owning
/// session always hears back exactly once.
pub struct SinkNotifier {
    epoch: u64,
    deliver: Option<Deliver>,
}

impl SinkNotifier {
    /// Create a notifier for a stream started under `epoch`
    pub fn new(epoch: u64, deliver: impl FnOnce(SinkSignal) + Send + 'static) -> Self {
        Self {
            epoch,
            deliver: Some(Box::new(deliver)),
        }
    }

    /// Epoch this notifier reports for
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Report that the stream finished
    pub fn completed(mut self) {
        self.send(SinkOutcome::Completed);
    }

    /// Report that the stream failed
    pub fn failed(mut self, error: SinkError) {
        self.send(SinkOutcome::Failed(error));
    }

    fn send(&mut self, outcome: SinkOutcome) {
        if let Some(deliver) = self.deliver.take() {
            deliver(SinkSignal {
                epoch: self.epoch,
                outcome,
            });
        }
    }
}

impl Drop for SinkNotifier {
    fn drop(&mut self) {
        self.send(SinkOutcome::Failed(SinkError::stream(
            "stream dropped without a completion signal",
        )));
    }
}

impl fmt::Debug for SinkNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SinkNotifier")
            .field("epoch", &self.epoch)
            .field("pending", &self.deliver.is_some())
            .finish()
    }
}

/// Voice audio output
///
/// Implementations must be cancel safe: a `start` future dropped before it
/// resolves must not leave a stream running.
#[async_trait]
pub trait AudioSink: Send + Sync {
    /// Start streaming `track` into the session's voice connection
    ///
    /// The sink must eventually call `notifier.completed()` or
    /// `notifier.failed(..)` exactly once for a successful start, including
    /// after `stop`.
    ///
    /// # Errors
    /// Returns an error if the stream could not be opened
    async fn start(
        &self,
        session: &SessionKey,
        track: &Track,
        notifier: SinkNotifier,
    ) -> Result<SinkHandle, SinkError>;

    /// Pause a running stream
    async fn pause(&self, handle: SinkHandle) -> Result<(), SinkError>;

    /// Resume a paused stream
    async fn resume(&self, handle: SinkHandle) -> Result<(), SinkError>;

    /// Stop a stream for good
    async fn stop(&self, handle: SinkHandle) -> Result<(), SinkError>;
}
