use std::sync::Arc;

use actix_web::{web, App, HttpResponse, HttpServer};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use partner_ledger::config::Config;
use partner_ledger::core::StaticAccessPolicy;
use partner_ledger::modules::bookings::BookingDirectory;
use partner_ledger::modules::ledger::controllers::payment_event_controller;
use partner_ledger::modules::ledger::repositories::TransactionRepository;
use partner_ledger::modules::ledger::services::LedgerService;
use partner_ledger::modules::notifications::LogDispatcher;
use partner_ledger::modules::partners::controllers::partner_controller;
use partner_ledger::modules::partners::repositories::{FeeScheduleRepository, PartnerRepository};
use partner_ledger::modules::partners::services::PartnerService;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "partner_ledger=debug,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().expect("Failed to load configuration");
    config.validate().expect("Configuration validation failed");

    tracing::info!("Starting Partner Revenue Ledger");
    tracing::info!("Environment: {}", config.app.env);

    // Create database connection pool
    let db_pool = config
        .database
        .create_pool()
        .await
        .expect("Failed to create database pool");

    tracing::info!(
        "Database pool initialized ({} connections)",
        config.database.pool_size
    );

    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .expect("Failed to run database migrations");

    // Wire services
    let access_policy = Arc::new(StaticAccessPolicy::from_env());
    let dispatcher = Arc::new(LogDispatcher);

    // Booking verticals register their lookups here; none ship with the
    // ledger itself, so notifications fall back to generic labels.
    let booking_directory = Arc::new(BookingDirectory::new());

    let partner_service = Arc::new(PartnerService::new(
        PartnerRepository::new(db_pool.clone()),
        FeeScheduleRepository::new(db_pool.clone()),
        access_policy,
    ));

    let ledger_service = Arc::new(LedgerService::new(
        TransactionRepository::new(db_pool.clone()),
        PartnerRepository::new(db_pool.clone()),
        booking_directory,
        dispatcher,
    ));

    // Start HTTP server
    let bind_address = config.server.bind_address();
    let workers = config.server.workers;
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(partner_service.clone()))
            .app_data(web::Data::new(ledger_service.clone()))
            .configure(payment_event_controller::configure)
            .configure(partner_controller::configure)
            .route("/health", web::get().to(health_check))
    })
    .workers(workers)
    .bind(&bind_address)?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "partner-ledger"
    }))
}
