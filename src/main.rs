use actix_web::{web, App, HttpServer};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{
    filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt, Layer,
};

mod api;
mod config;
mod jobs;
mod pappers;
mod shutdown;
mod webhook;

use crate::api::company::{handlers::company_config, CompanyService};
use crate::api::health::health_config;
use crate::jobs::JobRegistry;
use crate::pappers::{PappersClient, RegistryClient};
use crate::shutdown::ShutdownCoordinator;
use crate::webhook::WebhookDispatcher;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load configuration from environment
    let config = config::Config::from_env().expect("Failed to load configuration");

    // Create logs directory if it doesn't exist
    std::fs::create_dir_all(&config.log_dir).expect("Failed to create logs directory");

    // Initialize file-based logging with daily rotation and level separation
    // Log files will be created as: logs/info.2024-12-22.log, logs/error.2024-12-22.log, etc.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());

    // Create daily rotating file appenders for each log level
    let info_file = tracing_appender::rolling::daily(&config.log_dir, "info.log");
    let warn_file = tracing_appender::rolling::daily(&config.log_dir, "warn.log");
    let error_file = tracing_appender::rolling::daily(&config.log_dir, "error.log");

    let info_layer = tracing_subscriber::fmt::layer()
        .with_writer(info_file)
        .with_ansi(false)
        .with_filter(LevelFilter::INFO);

    let warn_layer = tracing_subscriber::fmt::layer()
        .with_writer(warn_file)
        .with_ansi(false)
        .with_filter(LevelFilter::WARN);

    let error_layer = tracing_subscriber::fmt::layer()
        .with_writer(error_file)
        .with_ansi(false)
        .with_filter(LevelFilter::ERROR);

    // Create console/stdout layer for terminal output
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(info_layer)
        .with(warn_layer)
        .with(error_layer)
        .init();

    info!("Starting company-relay application");
    info!("Configuration loaded successfully:");
    info!("  - Registry base URL: {}", config.pappers_base_url);
    info!("  - Webhook URL: {}", config.webhook_url);
    info!("  - Lookup concurrency: {}", config.lookup_concurrency);
    info!("  - Dispatch queue capacity: {}", config.dispatch_queue_capacity);
    info!("  - Job TTL: {}s", config.job_ttl_secs);

    // Shared HTTP client for registry reads and webhook writes
    let http_client = reqwest::Client::new();

    // In-memory job registry, shared by handlers and health checks
    let registry = Arc::new(JobRegistry::new(Duration::from_secs(config.job_ttl_secs)));

    // Registry client behind the trait seam
    let pappers: Arc<dyn RegistryClient> = Arc::new(PappersClient::new(
        http_client.clone(),
        config.pappers_base_url.clone(),
        config.pappers_api_token.clone(),
    ));

    // Create shutdown channel for graceful shutdown
    // watch channel allows multiple receivers to get the same value
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);

    // Spawn the webhook dispatcher task; handlers only hold the queue handle
    let (dispatcher, dispatch_handle) = WebhookDispatcher::new(
        http_client,
        config.webhook_url.clone(),
        config.dispatch_queue_capacity,
    );
    let dispatcher_task = tokio::spawn(dispatcher.run(shutdown_rx));
    info!("Spawned webhook dispatcher");

    let server_registry = registry.clone();
    let lookup_concurrency = config.lookup_concurrency;

    let server = HttpServer::new(move || {
        let company_service = web::Data::new(CompanyService::new(
            pappers.clone(),
            server_registry.clone(),
            dispatch_handle.clone(),
            lookup_concurrency,
        ));

        App::new()
            .app_data(web::Data::from(server_registry.clone())) // Share job registry across workers
            .app_data(company_service) // Inject CompanyService
            .configure(health_config) // Health check endpoints
            .configure(company_config) // /fetchCompany and /jobsInProgress
    });

    info!("Server starting on http://127.0.0.1:{}", config.port);

    // Bind and start the server
    let server = server.bind(("127.0.0.1", config.port))?.run();

    // Get server handle for graceful shutdown
    let server_handle = server.handle();

    // Spawn server in background
    let server_task = tokio::spawn(server);

    // Create shutdown coordinator and wait for shutdown signal
    let coordinator =
        ShutdownCoordinator::new(server_handle, server_task, dispatcher_task, shutdown_tx);

    coordinator.wait_for_shutdown().await
}
