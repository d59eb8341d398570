//! # Booking Calendar Backend
//!
//! Availability calendar engine for a booking widget, plus the storage and
//! HTTP plumbing that serves availability to it.
//!
//! ## Architecture
//!
//! ```text
//! IO Layer (REST API)
//!     ↓
//! Domain Layer (calendar grid, selection, classification, loading)
//!     ↓
//! Storage Layer (availability sources, CSV booking store)
//! ```
//!
//! Hosts embedding the widget use [`domain::BookingCalendar`] directly with
//! any [`storage::AvailabilitySource`]; the server binary exposes the CSV
//! store over HTTP.

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    http::{HeaderValue, Method},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::config::AppConfig;
use crate::storage::{AvailabilitySource, CsvBookingRepository, CsvConnection};

/// Shared state of the HTTP server
#[derive(Clone)]
pub struct AppState {
    pub availability_source: Arc<dyn AvailabilitySource>,
}

/// Initialize the backend with the CSV booking store from the config
pub fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Setting up booking store in {}", config.server.data_directory.display());
    let connection = CsvConnection::new(&config.server.data_directory)?;
    let repository = CsvBookingRepository::new(connection);

    Ok(AppState {
        availability_source: Arc::new(repository),
    })
}

/// Create the Axum router with all routes configured
pub fn build_router(app_state: AppState, allowed_origin: &str) -> Result<Router> {
    let origin = allowed_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("invalid allowed origin {:?}", allowed_origin))?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET])
        .allow_headers(Any);

    Ok(Router::new()
        .nest("/api/properties", io::rest::availability_apis::router())
        .layer(cors)
        .with_state(app_state))
}
