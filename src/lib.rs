pub mod config;
pub mod controllers;
pub mod database;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
pub mod store;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::{
    services::{BookingPolicy, SeatAllocator},
    store::SeatStore,
};

// Shared state для всего приложения
#[derive(Clone)]
pub struct AppState {
    pub allocator: SeatAllocator,
    pub config: config::Config,
}

impl AppState {
    pub async fn new(config: config::Config) -> Result<Arc<Self>, error::StoreError> {
        let store = store::build_store(&config).await?;
        Ok(Self::with_store(config, store))
    }

    pub fn with_store(config: config::Config, store: Arc<dyn SeatStore>) -> Arc<Self> {
        let policy = BookingPolicy::new(config.booking.max_seats_per_booking);
        Arc::new(Self {
            allocator: SeatAllocator::new(store, policy),
            config,
        })
    }
}

/// Полный роутер приложения вместе со слоями CORS и трассировки.
pub fn app(state: Arc<AppState>) -> Router {
    let cors = middleware::cors_layer(&state.config.app);

    Router::new()
        .route("/", get(|| async { "Seat Booking API v1.0" }))
        .route("/health", get(|| async { "OK" }))
        .nest("/api", controllers::routes())
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
