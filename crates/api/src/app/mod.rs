//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: the approval workflow and other shared state
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request DTOs and response shaping
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;

use crate::config::ApiConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: &ApiConfig) -> Router {
    build_app_with(Arc::new(AppServices::in_memory(config)))
}

/// Build the router around already-constructed services.
pub fn build_app_with(services: Arc<AppServices>) -> Router {
    routes::router().layer(
        ServiceBuilder::new()
            .layer(axum::middleware::from_fn(middleware::request_logging))
            .layer(Extension(services)),
    )
}
