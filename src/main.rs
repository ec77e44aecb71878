//! lantern-platform main entry point
//!
//! This binary runs the platform plugin standalone: it restores any seed
//! accessories from configuration, signals launch completion, and serves
//! the local HTTP control listener until interrupted.

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use lantern_platform::{
    accessory::{Accessory, CapabilityKind, CapabilityValue},
    bridge::LoggingBridge,
    config::Config,
    control,
    platform::Platform,
    APP_NAME, VERSION,
};
use std::sync::Arc;
use tokio::signal;
use tokio::sync::Mutex;

/// Sample smart-home bridge platform plugin
#[derive(Parser, Debug)]
#[command(name = APP_NAME, version = VERSION, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path (built-in defaults when omitted)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the platform plugin
    Start,

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    info!("Starting {} v{}", APP_NAME, VERSION);

    if let Err(e) = run(cli).await {
        error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize structured logging with tracing
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Run the CLI command
async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Start => {
            let config = match &cli.config {
                Some(path) => {
                    info!("Loading config from {}", path);
                    Config::from_file(path)?
                }
                None => Config::default(),
            };

            let addr = config.listen_addr()?;
            let seeds = config.seed_accessories.clone();

            let mut platform = Platform::new(config, Arc::new(LoggingBridge::new()));

            // Restoration hook: hand back previously-known accessories
            // before the launch-complete signal, the way the host would.
            for seed in seeds {
                let mut accessory = Accessory::new(&seed.name);
                if seed.power {
                    accessory = accessory
                        .with_capability(CapabilityKind::Power, CapabilityValue::Bool(false));
                }
                if let Some(context) = seed.context {
                    accessory = accessory.with_context(context);
                }
                platform.configure_accessory(accessory)?;
            }

            platform.finished_launching();

            let app = control::router(Arc::new(Mutex::new(platform)));

            info!("Starting control listener on {}", addr);
            let listener = tokio::net::TcpListener::bind(addr).await?;
            info!("Control listener ready on {}", addr);

            // Run server with graceful shutdown
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            info!("Shutting down platform plugin");
            Ok(())
        }
        Commands::Version => {
            println!("{} v{}", APP_NAME, VERSION);
            Ok(())
        }
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}
