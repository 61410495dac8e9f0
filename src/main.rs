use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::{LevelFilter, info};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

mod cli;
mod config;

use chirpy::ipc::{IpcServer, IpcServerConfig};
use chirpy::moderation::ProfanityFilter;
use chirpy::server::ServerContext;
use chirpy::{ChirpPolicy, ChirpService, ChirpStore};
use cli::Cli;
use cli::commands::Commands;
use config::Config;

fn setup_logging() -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("chirpy")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("chirpy.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    // Without RUST_LOG everything passes env_logger; the config's level is
    // applied through log::set_max_level once the config is loaded.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("trace"))
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn apply_log_level(config: &Config) {
    if std::env::var_os("RUST_LOG").is_some() {
        return;
    }
    let level = config
        .log_level
        .as_deref()
        .and_then(|l| l.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Info);
    log::set_max_level(level);
}

fn build_policy(config: &Config) -> ChirpPolicy {
    let filter = config
        .chirps
        .censor
        .then(|| ProfanityFilter::new(&config.chirps.banned_words));
    ChirpPolicy::new()
        .with_max_length(config.chirps.max_length)
        .with_filter(filter)
}

fn build_service(store: Arc<ChirpStore>, config: &Config) -> ChirpService<ChirpStore> {
    ChirpService::new(store).with_policy(build_policy(config))
}

fn open_service(db_path: &Path, config: &Config) -> Result<ChirpService<ChirpStore>> {
    let store = ChirpStore::open(db_path).context(format!("Failed to open {}", db_path.display()))?;
    Ok(build_service(Arc::new(store), config))
}

fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    let db_path = cli.db.clone().unwrap_or_else(|| config.storage.db_path.clone());

    match &cli.command {
        Commands::Post { body } => handle_post_command(body, &db_path, config),
        Commands::List => handle_list_command(&db_path, config),
        Commands::Get { id } => handle_get_command(*id, &db_path, config),
        Commands::Validate { body } => handle_validate_command(body, config),
        Commands::User { email } => handle_user_command(email, &db_path, config),
        Commands::Serve { socket } => handle_serve_command(socket.as_ref(), &db_path, config),
    }
}

fn handle_post_command(body: &str, db_path: &Path, config: &Config) -> Result<()> {
    let service = open_service(db_path, config)?;
    let chirp = service.create(body).context("Failed to post chirp")?;
    info!("Posted chirp {}", chirp.id);
    println!("{} #{} {}", "Posted:".green(), chirp.id, chirp.body);
    Ok(())
}

fn handle_list_command(db_path: &Path, config: &Config) -> Result<()> {
    let service = open_service(db_path, config)?;
    let chirps = service.list().context("Failed to list chirps")?;
    if chirps.is_empty() {
        println!("{}", "No chirps yet".yellow());
    }
    for chirp in chirps {
        println!("{} {}", format!("#{:<4}", chirp.id).cyan(), chirp.body);
    }
    Ok(())
}

fn handle_get_command(id: u64, db_path: &Path, config: &Config) -> Result<()> {
    let service = open_service(db_path, config)?;
    let chirp = service.get(id).context(format!("Failed to get chirp {}", id))?;
    println!("{} {}", format!("#{}", chirp.id).cyan(), chirp.body);
    Ok(())
}

/// Validation needs only the policy; the database is never opened.
fn handle_validate_command(body: &str, config: &Config) -> Result<()> {
    match build_policy(config).validate(body) {
        Ok(cleaned) => {
            println!("{} {}", "Valid:".green(), cleaned);
            Ok(())
        }
        Err(e) => {
            println!("{} {}", "Invalid:".red(), e);
            Err(e.into())
        }
    }
}

fn handle_user_command(email: &str, db_path: &Path, config: &Config) -> Result<()> {
    let service = open_service(db_path, config)?;
    let user = service.create_user(email).context("Failed to create user")?;
    info!("Created user {}", user.id);
    println!("{} #{} {}", "Created user:".green(), user.id, user.email);
    Ok(())
}

fn handle_serve_command(socket: Option<&PathBuf>, db_path: &Path, config: &Config) -> Result<()> {
    let service = open_service(db_path, config)?;
    let ctx = Arc::new(ServerContext::new(service));

    let server_config = IpcServerConfig::default()
        .with_socket_path(socket.unwrap_or(&config.server.socket_path))
        .with_max_clients(config.server.max_clients);

    let server = Arc::new(IpcServer::with_config(server_config));
    println!(
        "{} {} (database: {})",
        "Serving on".green(),
        server.socket_path().display(),
        db_path.display()
    );

    let runtime = tokio::runtime::Runtime::new().context("Failed to start runtime")?;
    runtime.block_on(async move {

        let watcher = {
            let server = Arc::clone(&server);
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    info!("Received Ctrl-C, shutting down");
                    server.shutdown();
                }
            })
        };

        let result = server.run(ctx).await;
        watcher.abort();
        result.context("Server failed")
    })
}

fn main() -> Result<()> {
    // Setup logging first
    setup_logging().context("Failed to setup logging")?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    apply_log_level(&config);

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config).context("Application failed")?;

    Ok(())
}
