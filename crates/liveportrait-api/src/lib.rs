//! Axum HTTP proxy for the hosted LivePortrait model.
//!
//! This crate provides:
//! - The generate endpoint (multipart in, data URI out)
//! - Health and readiness probes
//! - Request id, logging and security header middleware
//! - Prometheus metrics
//! - Static serving of the bundled example assets

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
