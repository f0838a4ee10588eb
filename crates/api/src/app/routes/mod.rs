use axum::{routing::get, Router};

pub mod items;
pub mod system;

/// Router for every endpoint the service exposes.
pub fn router() -> Router {
    Router::new()
        .route("/", get(system::readme))
        .route("/health", get(system::health))
        .nest("/items", items::router())
}
