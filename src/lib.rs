//! Cheeper: a small micro-posting site.
//!
//! Server-rendered HTML over a post store and an identity provider, both
//! behind traits so hosted services can replace the in-process defaults.

pub mod config;
pub mod dto;
pub mod errors;
pub mod extract;
pub mod identity;
pub mod models;
pub mod render;
pub mod routes;
pub mod states;
pub mod store;

pub use config::Config;
pub use states::AppState;

use axum::{BoxError, Router, error_handling::HandleErrorLayer};
use errors::ApiError;
use tower::{ServiceBuilder, limit::GlobalConcurrencyLimitLayer};

/// The routes plus the request timeout and concurrency limit.
pub fn app(state: AppState) -> Router {
    let request_timeout = state.config.request_timeout;
    let max_concurrent = state.config.max_concurrent_requests;

    routes::router(state).layer(
        ServiceBuilder::new()
            .layer(HandleErrorLayer::new(handle_middleware_error))
            .timeout(request_timeout)
            .layer(GlobalConcurrencyLimitLayer::new(max_concurrent)),
    )
}

async fn handle_middleware_error(err: BoxError) -> ApiError {
    if err.is::<tower::timeout::error::Elapsed>() {
        ApiError::Timeout
    } else {
        ApiError::InternalError(format!("Unhandled middleware error: {}", err))
    }
}
