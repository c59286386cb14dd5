//! photo-bridge - Immich machine-learning API on top of MT Photos AI services.

use std::env;
use std::process::ExitCode;
use std::sync::Arc;

use photo_bridge_gateway::healthcheck::{self, HealthcheckConfig};
use photo_bridge_gateway::{app, AppState, Config};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_version() {
    println!("photo-bridge {}", VERSION);
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    // Handle --version / -V and the healthcheck subcommand
    let args: Vec<String> = env::args().collect();
    if args.iter().any(|a| a == "--version" || a == "-V") {
        print_version();
        return Ok(ExitCode::SUCCESS);
    }
    if args.get(1).map(String::as_str) == Some("healthcheck") {
        return Ok(run_healthcheck().await);
    }

    // Load configuration
    let config = Config::load().map_err(|e| format!("Failed to load configuration: {}", e))?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting photo-bridge {}", VERSION);
    tracing::info!("MT Photos AI at {}", config.mt_photos_api);
    tracing::info!("Immich ML passthrough at {}", config.immich_api);

    let addr = config.listen_addr();
    let state = Arc::new(AppState::new(config));

    // Start server
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(ExitCode::SUCCESS)
}

async fn run_healthcheck() -> ExitCode {
    let outcome = match HealthcheckConfig::from_env() {
        Ok(config) => healthcheck::run(&config).await,
        Err(e) => Err(e),
    };

    match outcome {
        Ok(()) => {
            println!("health check passed");
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("health check failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
