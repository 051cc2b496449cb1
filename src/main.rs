use clap::Parser;
use rota::app::App;
use rota::cli::Args;
use rota::logging::setup_logging;
use std::process::ExitCode;
use tracing::info;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let args = Args::parse();

    // Load config once, before logging setup, so startup logs are never
    // silently dropped and App::new sees the same extraction.
    let config = {
        use figment::providers::Env;
        match figment::Figment::new()
            .merge(Env::raw())
            .extract::<rota::config::Config>()
        {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config: {e}");
                return ExitCode::FAILURE;
            }
        }
    };
    setup_logging(&config, args.tracing);

    // Create and initialize the application
    let app = match App::new(config) {
        Ok(app) => app,
        Err(e) => {
            tracing::error!(error = ?e, "Failed to initialize application");
            return ExitCode::FAILURE;
        }
    };

    // Log application startup context
    info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = if cfg!(debug_assertions) {
            "development"
        } else {
            "production"
        },
        "starting rota"
    );

    app.run().await
}
