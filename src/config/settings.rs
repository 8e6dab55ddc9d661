use serde::Deserialize;

/// Top-level configuration settings for the application.
///
/// Includes the job client connection settings and logging.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub client: ClientSettings,
    pub logging: LoggingSettings,
}

/// Connection settings for one topic identifier on the job broker.
#[derive(Debug, Deserialize, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub token: String,
    pub topic_id: String,
    pub acknowledge_timeout_in_seconds: u32,
    pub max_job: u32,
    pub max_pending: usize,
    pub connect_delay_ms: u64,
    pub reconnect_delay_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    pub level: String,
}

/// Partial configuration settings loaded from files or environment.
///
/// Allows partial specification of settings. Missing values can be filled using defaults.
#[derive(Debug, Deserialize)]
pub struct PartialSettings {
    pub client: Option<PartialClientSettings>,
    pub logging: Option<PartialLoggingSettings>,
}

#[derive(Debug, Deserialize)]
pub struct PartialClientSettings {
    pub base_url: Option<String>,
    pub token: Option<String>,
    pub topic_id: Option<String>,
    pub acknowledge_timeout_in_seconds: Option<u32>,
    pub max_job: Option<u32>,
    pub max_pending: Option<usize>,
    pub connect_delay_ms: Option<u64>,
    pub reconnect_delay_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct PartialLoggingSettings {
    pub level: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            client: ClientSettings {
                base_url: "ws://127.0.0.1:8080/ws".to_string(),
                token: String::new(),
                topic_id: "default".to_string(),
                acknowledge_timeout_in_seconds: 0,
                max_job: 0,
                max_pending: 10_000,
                connect_delay_ms: 5000,
                reconnect_delay_ms: 1000,
            },
            logging: LoggingSettings {
                level: "info".to_string(),
            },
        }
    }
}
