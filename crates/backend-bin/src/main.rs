use std::path::PathBuf;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context};
use clap::Parser;
use login_gate::{
    auth::InMemoryCredentialStore,
    config::{Settings, DEFAULT_CONFIG_FILE},
    routes, AppState,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

const SESSION_CLEANUP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Login gate server
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// TOML config file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Override the configured bind address
    #[arg(short, long)]
    bind: Option<SocketAddr>,

    /// Seed an account as `email:password`; may be repeated
    #[arg(short, long = "user", value_name = "EMAIL:PASSWORD")]
    users: Vec<String>,
}

fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_level));

    if settings.json_logs {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn seed_users(store: &InMemoryCredentialStore, users: Vec<String>) -> anyhow::Result<()> {
    for entry in users {
        let (email, password) = entry
            .split_once(':')
            .ok_or_else(|| anyhow!("--user expects EMAIL:PASSWORD"))?;
        login_gate::validation::validate_email(email)
            .with_context(|| format!("--user {email}"))?;
        store.register(email, password.to_string())?;
        tracing::info!(email, "seeded account");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load_from(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    if let Some(bind) = args.bind {
        settings.bind_addr = bind;
    }

    init_tracing(&settings);

    let credentials = InMemoryCredentialStore::new();
    seed_users(&credentials, args.users)?;
    if credentials.is_empty() {
        tracing::warn!("no accounts seeded; every login will be rejected");
    }

    let state = AppState::new(settings, Arc::new(credentials))?;
    tokio::spawn(state.sessions.clone().cleanup_task(SESSION_CLEANUP_INTERVAL));

    let addr = state.settings.bind_addr;
    let app = routes::create_router(Arc::new(state));

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app).await?;

    Ok(())
}
