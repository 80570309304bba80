use config::{Config, ConfigError, Environment};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub google_client_id: String,
    pub google_client_secret: String,
    /// Maximum session cookie age in seconds.
    #[serde(default = "default_session_max_age")]
    pub session_max_age: u64,
}

fn default_session_max_age() -> u64 {
    60 * 60 * 24 * 30
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(Environment::default())
            .build()?
            .try_deserialize()
    }
}
