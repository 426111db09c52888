//! DietCue Server — plan reminder scheduling and delivery
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tokio::sync::watch;
use tracing;
use tracing_subscriber::{EnvFilter, fmt};

use dietcue_core::config::AppConfig;
use dietcue_core::error::AppError;

#[tokio::main]
async fn main() {
    let env = std::env::var("DIETCUE_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting DietCue v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection + migrations ─────────────────
    let pool = dietcue_database::connection::create_pool(&config.database).await?;
    dietcue_database::migration::run_migrations(&pool).await?;

    // ── Step 2: Repositories ─────────────────────────────────────
    let reminder_repo = Arc::new(dietcue_database::repositories::ReminderRepository::new(
        pool.clone(),
    ));
    let device_repo = Arc::new(dietcue_database::repositories::DeviceRepository::new(
        pool.clone(),
    ));
    let plan_repo = Arc::new(dietcue_database::repositories::PlanRepository::new(
        pool.clone(),
    ));
    let countdown_repo = Arc::new(dietcue_database::repositories::CountdownRepository::new(
        pool.clone(),
    ));

    // ── Step 3: External collaborators ───────────────────────────
    let transport = Arc::new(dietcue_service::transport::HttpPushTransport::new(
        config.transport.clone(),
    )?);
    let extractor = Arc::new(dietcue_service::extraction::HttpPlanExtractor::new(
        config.extraction.clone(),
    )?);

    // ── Step 4: Services ─────────────────────────────────────────
    let scheduler = Arc::new(dietcue_service::ReminderScheduler::new(Arc::clone(
        &reminder_repo,
    )));
    let router = Arc::new(dietcue_service::DeliveryRouter::new(
        Arc::clone(&device_repo),
        transport,
    ));
    let plan_service = Arc::new(dietcue_service::PlanService::new(
        Arc::clone(&plan_repo),
        extractor,
        Arc::clone(&scheduler),
        Arc::clone(&router),
    ));
    let monitor = Arc::new(dietcue_service::CountdownMonitor::new(
        Arc::clone(&plan_repo),
        Arc::clone(&countdown_repo),
        Arc::clone(&router),
    ));

    // ── Step 5: Background loops ─────────────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let mut runner_handle = None;
    if config.scheduler.enabled {
        let runner = dietcue_worker::FiringRunner::new(
            Arc::clone(&scheduler),
            Arc::clone(&router),
            config.scheduler.clone(),
        );
        let cancel = shutdown_rx.clone();
        runner_handle = Some(tokio::spawn(async move { runner.run(cancel).await }));
    }

    let mut cron = dietcue_worker::CronScheduler::new().await?;
    if config.countdown.enabled {
        cron.register_countdown_sweep(Arc::clone(&monitor), &config.countdown)
            .await?;
    }
    cron.start().await?;

    // ── Step 6: HTTP server ──────────────────────────────────────
    let state = dietcue_api::AppState {
        plan_service,
        scheduler,
        devices: device_repo,
        pool,
    };
    let app = dietcue_api::build_router(state);

    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;
    tracing::info!("Listening on {}", addr);

    let mut shutdown_signal_rx = shutdown_rx.clone();
    let serve = axum::serve(listener, app).with_graceful_shutdown(async move {
        let _ = shutdown_signal_rx.changed().await;
    });

    tokio::select! {
        result = serve => {
            result.map_err(|e| AppError::internal(format!("Server error: {e}")))?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received Ctrl-C, shutting down");
        }
    }

    // ── Step 7: Graceful shutdown ────────────────────────────────
    let _ = shutdown_tx.send(true);
    cron.shutdown().await?;
    if let Some(handle) = runner_handle {
        let _ = handle.await;
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
