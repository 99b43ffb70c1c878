//! Monitor persistence server entry point

use clap::Parser;
use monitor_persistence::cli::{Cli, Commands};
use monitor_persistence::config::{self, RetentionConfig, ServerConfig};
use monitor_persistence::db::migrations::initialize_database;
use monitor_persistence::db::records::RecordStore;
use monitor_persistence::shutdown::ShutdownController;
use monitor_persistence::{bootstrap, logging, retention, server, AppState};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init().expect("failed to initialize logging");

    match cli.command {
        Some(Commands::Cleanup(args)) => {
            if let Err(e) = monitor_persistence::cli::cleanup::execute(&args).await {
                eprintln!("Error: {:#}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Serve(args)) => {
            run_server(ServerConfig::from(args)).await;
        }
        None => {
            // No subcommand - default to serve
            run_server(ServerConfig::from_env()).await;
        }
    }
}

async fn run_server(config: ServerConfig) {
    info!("Monitor persistence v{}", env!("CARGO_PKG_VERSION"));

    let retention_config = match RetentionConfig::from_env() {
        Ok(retention_config) => retention_config,
        Err(e) => {
            error!("Invalid retention configuration: {}", e);
            std::process::exit(1);
        }
    };

    // スキーマを作成できない場合はストアを使えないため起動を中止する
    let database_url = config::database_url();
    let pool = match initialize_database(&database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("Failed to initialize database {}: {}", database_url, e);
            std::process::exit(1);
        }
    };
    info!("Database initialized at {}", database_url);

    let store = RecordStore::new(pool.clone());
    if config.seed_sample_data {
        if let Err(e) = bootstrap::seed_sample_data_if_empty(&store).await {
            error!("Failed to insert sample data: {}", e);
        }
    }

    let shutdown = ShutdownController::default();
    let state = AppState::new(store, retention_config, shutdown.clone());

    let cleanup_task = retention::start_cleanup_task(
        state.retention.clone(),
        retention_config,
        shutdown.clone(),
    );

    let result = server::run(state, &config.bind_addr()).await;
    shutdown.request_shutdown();

    if let Some(handle) = cleanup_task {
        if let Err(e) = handle.await {
            error!("Data cleanup task ended abnormally: {}", e);
        }
    }
    pool.close().await;

    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}
