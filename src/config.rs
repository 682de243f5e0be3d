use crate::domain::payment::Cardholder;
use config::{Config as ConfigLib, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub gateway: GatewaySettings,
    pub polling: PollingSettings,
    pub notification: NotificationSettings,
    pub cardholder: Cardholder,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GatewaySettings {
    pub base_url: String,
    pub request_timeout_ms: u64,
}

impl GatewaySettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PollingSettings {
    pub interval_ms: u64,
    pub reset_delay_ms: u64,
    /// Zero disables the ceiling.
    pub max_attempts: u32,
}

impl PollingSettings {
    /// Never shorter than 1 ms; tokio intervals reject a zero period.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms.max(1))
    }

    pub fn reset_delay(&self) -> Duration {
        Duration::from_millis(self.reset_delay_ms)
    }

    pub fn attempt_limit(&self) -> Option<u32> {
        (self.max_attempts > 0).then_some(self.max_attempts)
    }
}

impl Default for PollingSettings {
    fn default() -> Self {
        Self {
            interval_ms: 2000,
            reset_delay_ms: 2000,
            max_attempts: 150,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationSettings {
    pub display_ms: u64,
}

impl NotificationSettings {
    pub fn display_duration(&self) -> Duration {
        Duration::from_millis(self.display_ms)
    }
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self { display_ms: 5000 }
    }
}

impl Settings {
    /// Loads settings, reading `file` instead of the default `config/pos-terminal`.
    pub fn load_from(
        file: Option<&Path>,
        env_vars: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = ConfigLib::builder()
            .set_default("gateway.base_url", "http://localhost:8080")?
            .set_default("gateway.request_timeout_ms", 10_000)?
            .set_default("polling.interval_ms", 2000)?
            .set_default("polling.reset_delay_ms", 2000)?
            .set_default("polling.max_attempts", 150)?
            .set_default("notification.display_ms", 5000)?
            .set_default("cardholder.name", "JUAN PEREZ")?
            .set_default("cardholder.address", "Av. Principal 123")?;

        builder = match file {
            Some(path) => builder.add_source(File::from(path)),
            None => builder.add_source(File::with_name("config/pos-terminal").required(false)),
        };

        // Explicit overrides keep tests independent of the process environment
        if let Some(vars) = env_vars {
            for (key, value) in vars {
                builder = builder.set_override(&key, value)?;
            }
        } else {
            // e.g. POS_GATEWAY__BASE_URL
            builder = builder.add_source(
                Environment::with_prefix("POS")
                    .prefix_separator("_")
                    .separator("__"),
            );
        }

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.polling.interval_ms == 0 {
            return Err(ConfigError::Message(
                "polling.interval_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn load_with_sources(env_vars: Option<HashMap<String, String>>) -> Result<Self, ConfigError> {
        Self::load_from(None, env_vars)
    }
}
