//! HTTP API for nearest-customer lookup
//!
//! Serves the search form, the lookup endpoint (HTML or JSON) and a health
//! check, all backed by one shared [`CustomerFinder`].

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod handlers;
pub mod pages;
pub mod service;

pub use service::CustomerFinder;

pub fn router(finder: Arc<CustomerFinder>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/find_customer", post(handlers::find_customer))
        .with_state(finder)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
