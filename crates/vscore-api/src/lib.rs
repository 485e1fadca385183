//! Axum HTTP API server.
//!
//! This crate provides:
//! - Video upload with synchronous analysis
//! - Progress stats over the recent analysis history
//! - Static serving of stored uploads
//! - Health, readiness and Prometheus metrics endpoints

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use services::UploadStore;
pub use state::AppState;
