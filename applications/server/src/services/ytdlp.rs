/// yt-dlp resolver - turns URLs and search queries into tracks
use async_trait::async_trait;
use chorus_core::{ResolveError, Track, TrackResolver};
use serde::Deserialize;
use serde_json::Value;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Subset of yt-dlp's info JSON we care about
#[derive(Debug, Clone, Default, Deserialize)]
pub struct YtDlpInfo {
    pub title: Option<String>,
    /// Page the media lives on (stable, used as the queue locator)
    pub webpage_url: Option<String>,
    /// Direct media URL (short-lived)
    pub url: Option<String>,
    /// Length in seconds
    pub duration: Option<f64>,
}

impl YtDlpInfo {
    fn duration(&self) -> Option<Duration> {
        self.duration
            .filter(|secs| *secs > 0.0)
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
    }
}

#[derive(Debug, Clone)]
pub struct YtDlpResolver {
    yt_dlp_path: PathBuf,
    search_prefix: String,
}

impl YtDlpResolver {
    pub fn new(yt_dlp_path: PathBuf, search_prefix: impl Into<String>) -> Self {
        Self {
            yt_dlp_path,
            search_prefix: search_prefix.into(),
        }
    }

    /// What to hand yt-dlp for a user query: URLs as-is, anything else as a search
    pub fn target(&self, query: &str) -> String {
        if query.starts_with("http://") || query.starts_with("https://") {
            query.to_string()
        } else {
            format!("{}{}", self.search_prefix, query)
        }
    }

    /// Run yt-dlp and parse the (first) result
    pub async fn extract(&self, query: &str) -> Result<YtDlpInfo, ResolveError> {
        let target = self.target(query);
        tracing::debug!("Running yt-dlp for {}", target);

        let output = Command::new(&self.yt_dlp_path)
            .arg("--dump-single-json")
            .arg("--format")
            .arg("bestaudio/best")
            .arg("--quiet")
            .arg("--no-warnings")
            .arg("--no-playlist")
            .arg("--source-address")
            .arg("0.0.0.0") // bind to IPv4
            .arg("--")
            .arg(&target)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| ResolveError::backend(format!("failed to run yt-dlp: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ResolveError::backend(format!(
                "yt-dlp failed: {}",
                stderr.trim()
            )));
        }

        let info: Value = serde_json::from_slice(&output.stdout)
            .map_err(|e| ResolveError::backend(format!("Failed to parse yt-dlp output: {}", e)))?;

        parse_info(query, info)
    }
}

/// Pick the first entry of a search result, or the info itself
pub fn parse_info(query: &str, info: Value) -> Result<YtDlpInfo, ResolveError> {
    let info = match info.get("entries") {
        Some(entries) => entries
            .as_array()
            .and_then(|entries| entries.first())
            .cloned()
            .ok_or_else(|| ResolveError::NoMatch(query.to_string()))?,
        None => info,
    };

    serde_json::from_value(info)
        .map_err(|e| ResolveError::backend(format!("Unexpected yt-dlp output: {}", e)))
}

#[async_trait]
impl TrackResolver for YtDlpResolver {
    async fn resolve(&self, query: &str) -> Result<Track, ResolveError> {
        let info = self.extract(query).await?;

        let locator = info
            .webpage_url
            .clone()
            .or_else(|| info.url.clone())
            .ok_or_else(|| ResolveError::NoMatch(query.to_string()))?;
        let title = info.title.clone().unwrap_or_else(|| query.to_string());

        let mut track = Track::new(title, locator);
        if let Some(duration) = info.duration() {
            track = track.with_duration(duration);
        }
        Ok(track)
    }

    async fn resolve_stream(&self, track: &Track) -> Result<Track, ResolveError> {
        let info = self.extract(&track.source_locator).await?;
        let url = info.url.clone().ok_or_else(|| {
            ResolveError::backend(format!("no stream url for {}", track.source_locator))
        })?;

        let mut stream = track.clone();
        stream.source_locator = url;
        if stream.duration_estimate.is_none() {
            stream.duration_estimate = info.duration();
        }
        Ok(stream)
    }
}
