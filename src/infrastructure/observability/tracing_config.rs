use crate::config::{Environment, LoggingSettings};

/// Configuration for tracing initialization.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub environment: String,
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: String,
    pub json_format: bool,
}

impl TracingConfig {
    pub fn from_settings(settings: &LoggingSettings, environment: Environment) -> Self {
        Self {
            environment: environment.to_string(),
            level: settings.level.clone(),
            json_format: settings.json,
        }
    }

    pub fn filter_directive(&self) -> String {
        format!("{},folio=debug", self.level)
    }
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            environment: std::env::var(Environment::VAR)
                .unwrap_or_else(|_| Environment::default().to_string()),
            level: "info".to_string(),
            json_format: std::env::var("FOLIO_LOG_FORMAT")
                .map(|v| v.to_lowercase() == "json")
                .unwrap_or(false),
        }
    }
}
