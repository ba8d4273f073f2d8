/// Chorus Server - voice playback controller
use anyhow::Context;
use chorus_core::TrackResolver;
use chorus_playback::SessionManager;
use chorus_server::{
    api,
    config::ServerConfig,
    services::{ClockSink, YtDlpResolver},
    state::AppState,
};
use clap::{Parser, Subcommand};
use std::{net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};
use tokio::signal;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "chorus-server")]
#[command(about = "Chorus voice playback controller", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Configuration file path
        #[arg(short, long, env = "CHORUS_CONFIG")]
        config: Option<PathBuf>,
    },
    /// Resolve a URL or search query and print the track as JSON
    Resolve {
        /// URL or search terms
        query: String,
        /// Configuration file path
        #[arg(short, long, env = "CHORUS_CONFIG")]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "chorus_server=info,chorus_playback=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config } => {
            serve(config).await?;
        }
        Commands::Resolve { query, config } => {
            resolve(&query, config).await?;
        }
    }

    Ok(())
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<ServerConfig> {
    let config = ServerConfig::load_from(path.as_deref())?;
    config.validate()?;
    Ok(config)
}

fn resolver(config: &ServerConfig) -> YtDlpResolver {
    YtDlpResolver::new(
        config.resolver.yt_dlp_path.clone(),
        config.resolver.search_prefix.clone(),
    )
}

async fn serve(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    tracing::info!("Starting Chorus Server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);

    let resolver = Arc::new(resolver(&config));
    let sink = Arc::new(ClockSink::new(Duration::from_secs(
        config.sink.fallback_track_secs,
    )));
    tracing::info!(
        "Using yt-dlp at {:?} with clock sink (fallback {}s)",
        config.resolver.yt_dlp_path,
        config.sink.fallback_track_secs
    );

    let sessions = Arc::new(SessionManager::new(
        config.playback.clone(),
        resolver,
        sink,
    ));

    // Build application state and router
    let app_state = AppState::new(Arc::clone(&sessions));
    let app = api::router(app_state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
        .layer(CorsLayer::permissive());

    // Create server address
    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    sessions.shutdown().await;
    tracing::info!("Server shutdown complete");

    Ok(())
}

async fn resolve(query: &str, config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let track = resolver(&config)
        .resolve(query)
        .await
        .with_context(|| format!("Could not resolve {:?}", query))?;

    println!("{}", serde_json::to_string_pretty(&track)?);
    Ok(())
}

/// Resolves on Ctrl-C (or SIGTERM on unix)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl-C, shutting down");
        },
        () = terminate => {
            tracing::info!("Received terminate signal, shutting down");
        },
    }
}
