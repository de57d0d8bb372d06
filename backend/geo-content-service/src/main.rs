use actix_web::{App, HttpServer};
use anyhow::Context;
use geo_content_service::config::{LogFormat, SERVICE_NAME};
use geo_content_service::db::{ContentStore, PgContentStore};
use geo_content_service::{handlers, Config};
use std::sync::Arc;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing(format: LogFormat) {
    let registry = tracing_subscriber::registry().with(
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "info,actix_web=info,sqlx=warn".into()),
    );

    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

/// Geo Content Service
///
/// Location-tagged posts, threads, events and comments.
///
/// # Routes
///
/// - `/api/v1/around/{kind}` - content near a coordinate
/// - `/api/v1/create|edit|delete/{kind}/...` - content lifecycle
/// - `/api/v1/update/{kind}/{from}` - incremental sync
/// - `/api/v1/{kind}/{id}/like` - like toggle
/// - `/api/v1/thread/{id}/replies|comments` - thread replies and comments
/// - `/metrics` - Prometheus
#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional; real deployments inject the environment
    let _ = dotenvy::dotenv();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("ERROR: Failed to load configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    init_tracing(config.logging.format);

    tracing::info!("Starting {} v{}", SERVICE_NAME, env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    config.database.log_config();
    let pool = db_pool::create_pool(config.database.clone())
        .await
        .context("failed to create database pool")?;

    let store: Arc<dyn ContentStore> =
        Arc::new(PgContentStore::new(pool, config.storage.query_timeout()));

    let bind_address = config.bind_address();
    tracing::info!("Starting HTTP server at {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .configure(handlers::configure(store.clone()))
    })
    .bind(&bind_address)
    .with_context(|| format!("failed to bind {}", bind_address))?
    .run()
    .await
    .context("HTTP server terminated with an error")?;

    tracing::info!("{} stopped", SERVICE_NAME);
    Ok(())
}
