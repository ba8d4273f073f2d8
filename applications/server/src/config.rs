/// Server configuration
use crate::error::{Result, ServerError};
use chorus_playback::PlaybackConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_server")]
    pub server: ServerSettings,

    #[serde(default)]
    pub playback: PlaybackConfig,

    #[serde(default = "default_resolver")]
    pub resolver: ResolverSettings,

    #[serde(default = "default_sink")]
    pub sink: SinkSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverSettings {
    #[serde(default = "default_yt_dlp_path")]
    pub yt_dlp_path: PathBuf,

    /// Prepended to queries that are not URLs
    #[serde(default = "default_search_prefix")]
    pub search_prefix: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SinkSettings {
    /// Playback length for tracks without a duration estimate
    #[serde(default = "default_fallback_track_secs")]
    pub fallback_track_secs: u64,
}

impl ServerConfig {
    /// Load configuration from an explicit file (or `config.toml`) and environment
    ///
    /// An explicit path must exist; the default `config.toml` is optional.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let config_path = PathBuf::from("config.toml");
                if config_path.exists() {
                    settings = settings.add_source(config::File::from(config_path));
                }
            }
        }

        // Override with environment variables (CHORUS_SERVER__PORT=9000)
        settings = settings.add_source(
            config::Environment::with_prefix("CHORUS")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.host.parse::<std::net::IpAddr>().is_err() {
            return Err(ServerError::Config(format!(
                "Invalid host address: {}",
                self.server.host
            )));
        }

        if self.playback.event_capacity == 0 {
            return Err(ServerError::Config(
                "playback.event_capacity must be at least 1".to_string(),
            ));
        }

        if self.resolver.yt_dlp_path.as_os_str().is_empty() {
            return Err(ServerError::Config(
                "yt-dlp path is required (set CHORUS_RESOLVER__YT_DLP_PATH)".to_string(),
            ));
        }

        if self.sink.fallback_track_secs == 0 {
            return Err(ServerError::Config(
                "sink.fallback_track_secs must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

// Default values
fn default_server() -> ServerSettings {
    ServerSettings {
        host: default_host(),
        port: default_port(),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_resolver() -> ResolverSettings {
    ResolverSettings {
        yt_dlp_path: default_yt_dlp_path(),
        search_prefix: default_search_prefix(),
    }
}

fn default_yt_dlp_path() -> PathBuf {
    PathBuf::from("yt-dlp")
}

fn default_search_prefix() -> String {
    "ytsearch:".to_string()
}

fn default_sink() -> SinkSettings {
    SinkSettings {
        fallback_track_secs: default_fallback_track_secs(),
    }
}

fn default_fallback_track_secs() -> u64 {
    180
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            playback: PlaybackConfig::default(),
            resolver: default_resolver(),
            sink: default_sink(),
        }
    }
}
