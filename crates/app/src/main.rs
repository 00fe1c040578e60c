mod cli;
mod db;
mod focus;

use anyhow::Context;
use clap::Parser;
use services::{AdminBootstrap, AppServices, Clock, ServiceSettings};
use tracing_subscriber::{EnvFilter, fmt};
use tracker_config::TrackerConfig;
use web::AppState;

use crate::cli::{Cli, Commands, SourceArgs};

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("tracker error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing()?;

    match cli.command {
        Commands::Serve { source, port } => {
            let mut config = load_config(&source)?;
            if let Some(port) = port {
                config.server.port = port;
                config.validate()?;
            }
            serve(config).await
        }
        Commands::InitDb { source } => {
            let config = load_config(&source)?;
            open_services(&config).await?;
            tracing::info!(url = %config.database.url, "database ready");
            Ok(())
        }
        Commands::Focus {
            source,
            user,
            subject,
            cycles,
        } => {
            let config = load_config(&source)?;
            let services = open_services(&config).await?;
            let account = services
                .auth()
                .member_by_username(&user)
                .await
                .with_context(|| format!("cannot start focus for {user}"))?;
            let outcome = focus::run(&services.pomodoro(), &account, subject, cycles).await?;
            println!(
                "\nCompleted {} of {cycles} intervals, {} sessions today.",
                outcome.completed, outcome.sessions_today
            );
            Ok(())
        }
    }
}

fn init_tracing() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;
    fmt().with_env_filter(filter).init();
    Ok(())
}

fn load_config(source: &SourceArgs) -> anyhow::Result<TrackerConfig> {
    let mut config =
        TrackerConfig::load(source.config.as_deref()).context("failed to load configuration")?;
    if let Some(db) = &source.db {
        config.database.url = db.clone();
    }
    config.database.url = db::normalize_sqlite_url(&config.database.url);
    Ok(config)
}

fn service_settings(config: &TrackerConfig) -> anyhow::Result<ServiceSettings> {
    Ok(ServiceSettings {
        revision_reminder_days: config.general.revision_reminder_days,
        users_per_page: config.general.users_per_page,
        pomodoro: config.pomodoro.settings()?,
    })
}

/// Open and migrate the database, then make sure the admin account exists.
async fn open_services(config: &TrackerConfig) -> anyhow::Result<AppServices> {
    db::prepare_sqlite_file(&config.database.url)?;
    let services = AppServices::new_sqlite(
        &config.database.url,
        Clock::default_clock(),
        service_settings(config)?,
    )
    .await
    .with_context(|| format!("failed to open {}", config.database.url))?;

    let admin = &config.admin;
    services
        .auth()
        .ensure_admin(&AdminBootstrap {
            username: admin.username.clone(),
            email: admin.email.clone(),
            password: admin.password.clone(),
        })
        .await?;
    if admin.uses_default_password() {
        tracing::warn!(
            username = %admin.username,
            "admin account uses the default password; set ADMIN_PASSWORD"
        );
    }
    Ok(services)
}

async fn serve(config: TrackerConfig) -> anyhow::Result<()> {
    let services = open_services(&config).await?;
    let app = web::router(AppState::new(services, Clock::default_clock()));

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("listening on http://{addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("shutting down");
}
