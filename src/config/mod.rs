mod settings;

use crate::config::settings::PartialSettings;
use config::{Config, ConfigError, Environment, File};

pub use settings::{ClientSettings, LoggingSettings, Settings};

/// Loads the configuration from `config/default.{toml,...}` and `NUNGGU__*`
/// environment variables (e.g. `NUNGGU__CLIENT__TOPIC_ID`), the latter taking
/// precedence. Missing values fall back to [`Settings::default`].
pub fn load_config() -> Result<Settings, ConfigError> {
    let builder = Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(Environment::with_prefix("NUNGGU").separator("__"));

    let config = builder.build()?;

    // Try to deserialize what is available
    let partial: PartialSettings = config.try_deserialize()?;

    // Merge with defaults
    let default = Settings::default();
    let client = partial.client;
    let logging = partial.logging;

    Ok(Settings {
        client: ClientSettings {
            base_url: client
                .as_ref()
                .and_then(|c| c.base_url.clone())
                .unwrap_or(default.client.base_url),
            token: client
                .as_ref()
                .and_then(|c| c.token.clone())
                .unwrap_or(default.client.token),
            topic_id: client
                .as_ref()
                .and_then(|c| c.topic_id.clone())
                .unwrap_or(default.client.topic_id),
            acknowledge_timeout_in_seconds: client
                .as_ref()
                .and_then(|c| c.acknowledge_timeout_in_seconds)
                .unwrap_or(default.client.acknowledge_timeout_in_seconds),
            max_job: client
                .as_ref()
                .and_then(|c| c.max_job)
                .unwrap_or(default.client.max_job),
            max_pending: client
                .as_ref()
                .and_then(|c| c.max_pending)
                .unwrap_or(default.client.max_pending),
            connect_delay_ms: client
                .as_ref()
                .and_then(|c| c.connect_delay_ms)
                .unwrap_or(default.client.connect_delay_ms),
            reconnect_delay_ms: client
                .as_ref()
                .and_then(|c| c.reconnect_delay_ms)
                .unwrap_or(default.client.reconnect_delay_ms),
        },
        logging: LoggingSettings {
            level: logging
                .and_then(|l| l.level)
                .unwrap_or(default.logging.level),
        },
    })
}

#[cfg(test)]
mod tests;
