use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod config;
mod events;
mod models;
mod routes;
mod schema;
mod services;

use config::AppConfig;
use veil_shared::clients::db::{create_pool, DbPool};
use veil_shared::clients::rabbitmq::RabbitMQClient;

pub struct AppState {
    pub db: DbPool,
    pub config: AppConfig,
    pub rabbitmq: RabbitMQClient,
    pub metrics_handle: metrics_exporter_prometheus::PrometheusHandle,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    veil_shared::middleware::init_tracing("veil-notification");

    let config = AppConfig::load()?;
    let port = config.port;

    // The auth extractor reads the secret from the environment.
    std::env::set_var("JWT_SECRET", &config.jwt_secret);

    let db = create_pool(&config.database_url)?;
    let rabbitmq = RabbitMQClient::connect(&config.rabbitmq_url).await?;
    let metrics_handle = veil_shared::middleware::init_metrics()?;

    let state = Arc::new(AppState { db, config, rabbitmq, metrics_handle });

    // One consumer per upstream concern
    let match_state = state.clone();
    tokio::spawn(async move {
        if let Err(e) = events::subscriber::listen_match_events(match_state).await {
            tracing::error!(error = %e, "match subscriber failed");
        }
    });
    let confession_state = state.clone();
    tokio::spawn(async move {
        if let Err(e) = events::subscriber::listen_confession_events(confession_state).await {
            tracing::error!(error = %e, "confession subscriber failed");
        }
    });
    let photo_state = state.clone();
    tokio::spawn(async move {
        if let Err(e) = events::subscriber::listen_photo_events(photo_state).await {
            tracing::error!(error = %e, "photo subscriber failed");
        }
    });

    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/metrics", get(routes::health::metrics))
        .route("/notifications", get(routes::notifications::list_notifications))
        .route("/notifications/unread-count", get(routes::notifications::unread_count))
        .route("/notifications/mark-all-read", post(routes::notifications::mark_all_read))
        .route("/notifications/:id/read", post(routes::notifications::mark_read))
        .layer(axum::middleware::from_fn(veil_shared::middleware::metrics_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{port}");
    tracing::info!(addr = %addr, "veil-notification starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
