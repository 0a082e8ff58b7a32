pub mod config;
pub mod error;
pub mod models;
pub mod controllers;
pub mod services;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use services::estimator::ConfirmationEstimator;
use services::registry::SeatRegistry;

// Shared state for the whole application
pub struct AppState {
    pub config: config::Config,
    pub registry: SeatRegistry,
    pub estimator: Option<ConfirmationEstimator>,
}

impl AppState {
    /// Builds the registry for the configured route and trains the estimator.
    /// Training is CPU-bound; async callers should run this on a blocking
    /// thread.
    pub fn new(config: config::Config) -> anyhow::Result<Arc<Self>> {
        let registry = SeatRegistry::from_config(&config.route)?;
        info!(
            "Seat registry ready: {} seats, route {} -> {}",
            registry.seat_count(),
            registry.route().origin().name,
            registry.route().terminus().name
        );

        if config.features.seed_demo_bookings {
            registry.seed_demo_bookings()?;
        }

        let estimator = if config.features.enable_estimator {
            let estimator = ConfirmationEstimator::train(&config.estimator)?;
            info!("Confirmation estimator ready ({} training rows)", estimator.training_rows());
            Some(estimator)
        } else {
            info!("Confirmation estimator disabled");
            None
        };

        Ok(Arc::new(Self {
            config,
            registry,
            estimator,
        }))
    }
}

/// Full router: banner, health check and the API under `/api`.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { "Sleeper Bus Booking API v0.1" }))
        .route("/health", get(|| async { "OK" }))
        .nest("/api", controllers::routes())
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
