mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_appender::{non_blocking::WorkerGuard, rolling};

#[derive(Parser)]
#[command(name = "lazarus")]
#[command(about = "Terminal dashboard for resurrecting spot instances")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the dashboard
    Start {
        /// Path to a profile catalog HCL file (builtin catalog if omitted)
        catalog: Option<PathBuf>,
        /// Control plane endpoint, e.g. http://127.0.0.1:8080
        /// (falls back to LAZARUS_ENDPOINT, then to simulation)
        #[arg(short, long)]
        endpoint: Option<String>,
        /// Preselect this profile id on the selection screen
        #[arg(short, long)]
        profile: Option<String>,
    },
    /// List the profiles in a catalog
    List {
        /// Path to a profile catalog HCL file (builtin catalog if omitted)
        catalog: Option<PathBuf>,
    },
    /// Print the spot price arbitrage scan and exit
    Zones {
        /// Control plane endpoint (falls back to LAZARUS_ENDPOINT)
        #[arg(short, long)]
        endpoint: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _log_guard = init_logging();

    let cli = Cli::parse();

    match cli.command {
        Commands::Start {
            catalog,
            endpoint,
            profile,
        } => {
            commands::start(catalog.as_deref(), resolve_endpoint(endpoint), profile).await?;
        }
        Commands::List { catalog } => {
            commands::list(catalog.as_deref())?;
        }
        Commands::Zones { endpoint } => {
            commands::zones(resolve_endpoint(endpoint)).await?;
        }
    }

    Ok(())
}

fn resolve_endpoint(flag: Option<String>) -> Option<String> {
    flag.or_else(|| std::env::var("LAZARUS_ENDPOINT").ok())
        .filter(|s| !s.trim().is_empty())
}

fn lazarus_log_dir() -> anyhow::Result<std::path::PathBuf> {
    let state_dir = dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .ok_or_else(|| anyhow::anyhow!("state directory not found"))?;
    Ok(state_dir.join("lazarus").join("logs"))
}

fn init_logging() -> Option<WorkerGuard> {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    if let Ok(log_dir) = lazarus_log_dir()
        && std::fs::create_dir_all(&log_dir).is_ok()
    {
        let log_path = log_dir.join("lazarus.log");
        if std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .is_ok()
        {
            let file_appender = rolling::never(&log_dir, "lazarus.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_ansi(false)
                .with_writer(non_blocking)
                .init();
            return Some(guard);
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();
    None
}
