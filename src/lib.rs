pub mod cache;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod query;
pub mod render;
pub mod types;

// Application layer (use cases and ports) and infrastructure adapters
pub mod app;
pub mod infra;
