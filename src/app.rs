//! Application wiring and lifecycle.

use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::dispatch::AnswerDispatcher;
use crate::providers::openai::{OpenAiCompletion, OpenAiTranscription, ProviderConfig};
use crate::query::QueryApi;
use crate::state::AppState;
use crate::web::create_router;

/// Main application struct containing all necessary components
pub struct App {
    config: Config,
    app_state: AppState,
}

impl App {
    /// Create a new App instance with all necessary components initialized.
    ///
    /// The config is extracted once in `main` (before logging setup) and
    /// injected here, so a bad environment fails through one path.
    pub fn new(config: Config) -> Result<Self, anyhow::Error> {
        let query_api = Arc::new(
            QueryApi::new(config.query_base_url.clone(), config.query_api_key.clone())
                .context("Failed to create query service client")?,
        );

        let completion = OpenAiCompletion::new(ProviderConfig {
            base_url: config.completion_base_url.clone(),
            api_key: config.completion_api_key.clone(),
            model: config.completion_model.clone(),
        })
        .context("Failed to create completion provider")?;

        let transcriber = OpenAiTranscription::new(ProviderConfig {
            base_url: config.transcription_base_url.clone(),
            api_key: config.transcription_key().to_owned(),
            model: config.transcription_model.clone(),
        })
        .context("Failed to create transcription provider")?;

        let dispatcher = Arc::new(AnswerDispatcher::new(Arc::new(completion)));
        let app_state = AppState::new(query_api, dispatcher, Arc::new(transcriber));

        info!(
            query_base_url = %config.query_base_url,
            completion_model = %config.completion_model,
            transcription_model = %config.transcription_model,
            "components initialized"
        );

        Ok(App { config, app_state })
    }

    /// Bind the listener and serve until a shutdown signal arrives.
    pub async fn run(self) -> ExitCode {
        let router = create_router(self.app_state);
        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.port));

        let listener = match tokio::net::TcpListener::bind(addr).await {
            Ok(listener) => listener,
            Err(e) => {
                error!(error = %e, addr = %addr, "failed to bind listener");
                return ExitCode::FAILURE;
            }
        };
        info!(addr = %addr, "web server listening");

        let shutdown_timeout = Duration::from_secs(self.config.shutdown_timeout);

        // Fan the OS signal out through a watch channel: the server's
        // graceful shutdown and the hard-deadline branch both need to see it.
        let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
        tokio::spawn(async move {
            shutdown_signal().await;
            let _ = shutdown_tx.send(true);
        });

        let mut graceful_rx = shutdown_rx.clone();
        let serve = axum::serve(listener, router).with_graceful_shutdown(async move {
            let _ = graceful_rx.changed().await;
        });

        let mut deadline_rx = shutdown_rx;
        let hard_deadline = async move {
            let _ = deadline_rx.changed().await;
            tokio::time::sleep(shutdown_timeout).await;
        };

        tokio::select! {
            result = serve => match result {
                Ok(()) => {
                    info!("server stopped cleanly");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    error!(error = %e, "server error");
                    ExitCode::FAILURE
                }
            },
            _ = hard_deadline => {
                warn!(timeout = ?shutdown_timeout, "in-flight requests did not drain in time; exiting");
                ExitCode::FAILURE
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_builds_from_an_injected_config() {
        let config: Config = serde_json::from_value(serde_json::json!({
            "query_base_url": "http://localhost:9000",
            "completion_api_key": "test-key",
        }))
        .expect("minimal config deserializes with defaults");

        assert!(App::new(config).is_ok());
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}
