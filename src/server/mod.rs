use anyhow::{Context, Result};
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::generator::{LearningPackageGenerator, OpenAiClient};
use crate::transcript::{TranscriptService, YoutubeTranscriptSource};

pub mod error;
pub mod routes;

pub use error::{ApiError, ErrorBody};

/// Shared, read-only state handed to every handler
pub struct AppState {
    pub config: Config,
    pub transcripts: TranscriptService,
    pub generator: LearningPackageGenerator,
}

impl AppState {
    /// Wire the production transcript and text-completion clients
    pub fn from_config(config: Config) -> Result<Self> {
        let source = YoutubeTranscriptSource::new()?;
        let transcripts = TranscriptService::new(Box::new(source), config.transcript.language.clone());

        let client = OpenAiClient::new(
            config.openai.api_url.clone(),
            config.openai.api_key.clone(),
            config.openai.model.clone(),
        );
        let generator = LearningPackageGenerator::new(Box::new(client), config.generator_settings());

        Ok(Self {
            config,
            transcripts,
            generator,
        })
    }
}

/// Build the application router with CORS and request tracing
pub fn router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.cors_origins());

    Router::new()
        .route("/", get(routes::root))
        .route("/health", get(routes::health))
        .route("/api/transcript/extract", post(routes::extract_transcript))
        .route("/api/transcript/health", get(routes::transcript_health))
        .route("/api/video/process", post(routes::process_video))
        .route("/api/video/health", get(routes::video_health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// Bind the listener and serve until Ctrl-C or SIGTERM
pub async fn run(config: Config) -> Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!(
        "Starting {} v{} ({}) on {}",
        config.app.name,
        config.app.version,
        config.app.environment,
        addr
    );
    tracing::info!("CORS origins: {}", config.cors_origins().join(", "));

    let state = Arc::new(AppState::from_config(config)?);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
