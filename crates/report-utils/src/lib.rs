//! Shared utilities for stock-report
//!
//! Logging setup and the process-level configuration used by the
//! `stock-report` CLI and the report backend server.

pub mod config;
pub mod logging;

pub use config::Config;
pub use logging::{init_json_tracing, init_tracing, init_tracing_with};
