//! Process-level configuration

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Application name, shown in startup logs
    pub app_name: String,
    /// Environment (development, production, ...)
    pub environment: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: "stock-report".to_string(),
            environment: "development".to_string(),
        }
    }
}

impl Config {
    /// Create a config for the named binary
    pub fn for_app(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            ..Self::default()
        }
    }

    /// Read the environment name from `STOCK_REPORT_ENV`
    pub fn with_env(mut self) -> Self {
        if let Ok(environment) = std::env::var("STOCK_REPORT_ENV") {
            if !environment.trim().is_empty() {
                self.environment = environment.trim().to_string();
            }
        }
        self
    }

    /// Whether this is a production deployment
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}
