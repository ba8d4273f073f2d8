/// Common test utilities and fixtures
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request},
    Router,
};
use chorus_core::{ResolveError, Track, TrackResolver};
use chorus_playback::{PlaybackConfig, SessionManager};
use chorus_server::{api, services::ClockSink, state::AppState};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tower::util::ServiceExt;

/// Resolves any query instantly; queries containing "missing" match nothing
pub struct StaticResolver;

#[async_trait]
impl TrackResolver for StaticResolver {
    async fn resolve(&self, query: &str) -> Result<Track, ResolveError> {
        if query.contains("missing") {
            return Err(ResolveError::NoMatch(query.to_string()));
        }
        Ok(Track::new(query, format!("https://example.com/{}", query))
            .with_duration(Duration::from_secs(300)))
    }

    async fn resolve_stream(&self, track: &Track) -> Result<Track, ResolveError> {
        Ok(track.clone())
    }
}

/// Router backed by a static resolver and a clock sink
pub fn create_test_app() -> (Router, Arc<SessionManager>) {
    let sessions = Arc::new(SessionManager::new(
        PlaybackConfig::default(),
        Arc::new(StaticResolver),
        Arc::new(ClockSink::new(Duration::from_secs(300))),
    ));
    let app = api::router(AppState::new(Arc::clone(&sessions)));
    (app, sessions)
}

/// Send a request and decode the JSON body
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (u16, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status().as_u16();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    // Extractor rejections are plain text
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}
