// restoration-server/src/lib.rs

//! HTTP surface of the restoration order service.

pub mod config;
pub mod errors;
pub mod services;
pub mod state;
pub mod telemetry;
pub mod web;

pub use config::AppConfig;
pub use errors::AppError;
pub use state::AppState;
