use std::{path::PathBuf, sync::Arc};

use {
    clap::Parser,
    sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

use {
    warren_gateway::{
        account_store::SqliteAccounts,
        heartbeat::HttpPinger,
        host::{Host, HostServices},
        outbound::LoggingOutbound,
        record_store::SqliteRecordStore,
    },
    warren_media::HttpUploader,
};

#[derive(Parser)]
#[command(name = "warren", about = "Warren — multi-account bot gateway host")]
struct Cli {
    /// Config file path (overrides discovery).
    #[arg(long, env = "WARREN_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, default_value_t = false)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    let config = match &cli.config {
        Some(path) => warren_config::load_config(path)?,
        None => warren_config::discover_and_load(),
    };

    let options = SqliteConnectOptions::new()
        .filename(&config.database_path)
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new().connect_with(options).await?;
    SqliteAccounts::init(&pool).await?;
    SqliteRecordStore::init(&pool).await?;

    let services = HostServices {
        accounts: Arc::new(SqliteAccounts::new(pool.clone())),
        records: Arc::new(SqliteRecordStore::new(pool)),
        outbound: Arc::new(LoggingOutbound),
        pinger: Arc::new(HttpPinger::new(config.heartbeat.url.clone())),
        uploader: Arc::new(HttpUploader::new(config.resource.base_url.clone())),
        trace_renderer: None,
    };

    let host = Host::bootstrap(config, services).await?;
    let supervisor = host.start_jobs()?;
    info!("warren gateway running");

    tokio::signal::ctrl_c().await?;
    info!("shutdown requested");
    supervisor.shutdown();
    Ok(())
}

fn init_tracing(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .init();
    }
}
