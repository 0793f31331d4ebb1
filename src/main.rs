//! supacheck: a Supabase connection checker.
//!
//! This is the application entry point. It initializes tracing, loads configuration
//! from a TOML file, builds the health prober, sets up the Axum router and
//! starts the HTTP server.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use supacheck::config::{AppConfig, DEFAULT_CONFIG_PATH, DEFAULT_LOG_FILTER};
use supacheck::http::start_server;
use supacheck::routes::create_router;
use supacheck::state::AppState;

/// supacheck: Check that a Supabase project is reachable
#[derive(Parser, Debug)]
#[command(name = "supacheck", version, about)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Log level filter (e.g., "supacheck=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Load configuration first so the log format is known
    let config = AppConfig::load(&args.config)?;

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    let registry =
        tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::new(&log_filter));
    if config.logging.is_json() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!(path = %args.config, "Loaded configuration");

    let state = AppState::from_config(config.clone())?;
    let defaults = state.prober.defaults();
    tracing::info!(
        default_url = defaults.url.as_deref().unwrap_or("<unset>"),
        has_default_key = defaults.api_key.is_some(),
        timeout_seconds = ?config.supabase.timeout_seconds,
        templates_dir = %config.ui.templates_dir,
        "Health prober and templates ready"
    );

    let app = create_router(state);

    start_server(app, &config).await?;

    Ok(())
}
