//! Shared fakes for playback tests

#![allow(dead_code)]

use async_trait::async_trait;
use chorus_core::{
    AudioSink, ResolveError, SessionKey, SinkError, SinkHandle, SinkNotifier, Track,
    TrackResolver,
};
use chorus_playback::{Session, SessionStatus};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::Notify;

pub fn track(id: &str) -> Track {
    Track::new(id, format!("fake://{}", id)).with_id(id)
}

// ===== Resolver =====

/// Resolves every query to a track titled after it
#[derive(Default)]
pub struct FakeResolver {
    failing_queries: Mutex<HashSet<String>>,
    failing_streams: Mutex<HashSet<String>>,
}

impl FakeResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `resolve(query)` fail
    pub fn fail_query(&self, query: &str) {
        self.failing_queries.lock().unwrap().insert(query.to_string());
    }

    /// Make `resolve_stream` fail for the track titled `title`
    pub fn fail_stream(&self, title: &str) {
        self.failing_streams.lock().unwrap().insert(title.to_string());
    }
}

#[async_trait]
impl TrackResolver for FakeResolver {
    async fn resolve(&self, query: &str) -> Result<Track, ResolveError> {
        if self.failing_queries.lock().unwrap().contains(query) {
            return Err(ResolveError::NoMatch(query.to_string()));
        }
        Ok(track(query))
    }

    async fn resolve_stream(&self, track: &Track) -> Result<Track, ResolveError> {
        if self.failing_streams.lock().unwrap().contains(&track.title) {
            return Err(ResolveError::backend(format!("{} expired", track.title)));
        }
        Ok(track.clone())
    }
}

// ===== Sink =====

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkCall {
    Start(String),
    Pause(SinkHandle),
    Resume(SinkHandle),
    Stop(SinkHandle),
}

/// Sink that records every call and holds notifiers until the test fires them
#[derive(Default)]
pub struct RecordingSink {
    calls: Mutex<Vec<SinkCall>>,
    live: Mutex<Vec<(SinkHandle, SinkNotifier)>>,
    failing: Mutex<HashSet<String>>,
    next_id: AtomicU64,
    block_starts: AtomicBool,
    start_entered: Notify,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<SinkCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Titles passed to `start`, in order
    pub fn starts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SinkCall::Start(title) => Some(title),
                _ => None,
            })
            .collect()
    }

    pub fn pause_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, SinkCall::Pause(_)))
            .count()
    }

    pub fn stop_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, SinkCall::Stop(_)))
            .count()
    }

    /// Make `start` fail for the track titled `title`
    pub fn fail_start(&self, title: &str) {
        self.failing.lock().unwrap().insert(title.to_string());
    }

    /// Make every following `start` hang forever
    pub fn block_starts(&self) {
        self.block_starts.store(true, Ordering::SeqCst);
    }

    /// Wait until a blocked `start` has been entered
    pub async fn start_entered(&self) {
        self.start_entered.notified().await;
    }

    /// Number of streams that have not signalled yet
    pub fn live_streams(&self) -> usize {
        self.live.lock().unwrap().len()
    }

    /// Finish the most recent live stream; returns false if none was live
    pub fn complete(&self) -> bool {
        let popped = self.live.lock().unwrap().pop();
        match popped {
            Some((_, notifier)) => {
                notifier.completed();
                true
            }
            None => false,
        }
    }

    /// Break the most recent live stream; returns false if none was live
    pub fn break_stream(&self) -> bool {
        let popped = self.live.lock().unwrap().pop();
        match popped {
            Some((_, notifier)) => {
                notifier.failed(SinkError::stream("connection reset"));
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl AudioSink for RecordingSink {
    async fn start(
        &self,
        _session: &SessionKey,
        track: &Track,
        notifier: SinkNotifier,
    ) -> Result<SinkHandle, SinkError> {
        self.calls
            .lock()
            .unwrap()
            .push(SinkCall::Start(track.title.clone()));

        if self.block_starts.load(Ordering::SeqCst) {
            self.start_entered.notify_one();
            std::future::pending::<()>().await;
        }

        if self.failing.lock().unwrap().contains(&track.title) {
            return Err(SinkError::stream("device busy"));
        }

        let handle = SinkHandle::new(self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        self.live.lock().unwrap().push((handle, notifier));
        Ok(handle)
    }

    async fn pause(&self, handle: SinkHandle) -> Result<(), SinkError> {
        self.calls.lock().unwrap().push(SinkCall::Pause(handle));
        Ok(())
    }

    async fn resume(&self, handle: SinkHandle) -> Result<(), SinkError> {
        self.calls.lock().unwrap().push(SinkCall::Resume(handle));
        Ok(())
    }

    async fn stop(&self, handle: SinkHandle) -> Result<(), SinkError> {
        self.calls.lock().unwrap().push(SinkCall::Stop(handle));

        // A stopped stream reports completion, like a real one would
        let notifier = {
            let mut live = self.live.lock().unwrap();
            let index = live.iter().position(|(h, _)| *h == handle);
            index.map(|index| live.remove(index).1)
        };
        if let Some(notifier) = notifier {
            notifier.completed();
        }
        Ok(())
    }
}

// ===== Waiting =====

/// Poll a session's published status until `check` holds
pub async fn wait_for_status(
    session: &Session,
    check: impl Fn(&SessionStatus) -> bool,
) -> SessionStatus {
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            let status = session.status().await;
            if check(&status) {
                return status;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("session never reached the expected status")
}

pub fn pending_titles(status: &SessionStatus) -> Vec<String> {
    status
        .queue
        .pending
        .iter()
        .map(|track| track.title.clone())
        .collect()
}

pub fn current_title(status: &SessionStatus) -> Option<String> {
    status.queue.current.as_ref().map(|track| track.title.clone())
}
