//! Configuration types for csv-ingest

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Error, Result};

/// HTTP source retrieval settings
///
/// Used as a nested sub-config within [`Config`]. Timeouts are off by default,
/// so a server that never answers keeps the run waiting.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header sent with every request (default: "csv-ingest/<version>")
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum time to establish a connection (None = no limit)
    #[serde(default, with = "optional_duration_serde")]
    pub connect_timeout: Option<Duration>,

    /// Maximum time for a whole request including the body (None = no limit)
    #[serde(default, with = "optional_duration_serde")]
    pub request_timeout: Option<Duration>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            connect_timeout: None,
            request_timeout: None,
        }
    }
}

/// Main configuration for [`CsvProcessor`](crate::CsvProcessor)
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP retrieval settings
    #[serde(default)]
    pub http: HttpConfig,
}

impl Config {
    /// Check settings that serde cannot validate on its own
    pub fn validate(&self) -> Result<()> {
        if self.http.user_agent.trim().is_empty() {
            return Err(Error::Config {
                message: "user agent must not be empty".to_string(),
                key: Some("http.user_agent".to_string()),
            });
        }
        if self.http.connect_timeout.is_some_and(|t| t < MIN_TIMEOUT) {
            return Err(Error::Config {
                message: "connect timeout must be at least one second".to_string(),
                key: Some("http.connect_timeout".to_string()),
            });
        }
        if self.http.request_timeout.is_some_and(|t| t < MIN_TIMEOUT) {
            return Err(Error::Config {
                message: "request timeout must be at least one second".to_string(),
                key: Some("http.request_timeout".to_string()),
            });
        }
        Ok(())
    }
}

// Timeouts are stored as whole seconds
const MIN_TIMEOUT: Duration = Duration::from_secs(1);

fn default_user_agent() -> String {
    format!("csv-ingest/{}", env!("CARGO_PKG_VERSION"))
}

// Optional Duration serialization helper (whole seconds)
mod optional_duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => serializer.serialize_some(&d.as_secs()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = Option::<u64>::deserialize(deserializer)?;
        Ok(secs.map(Duration::from_secs))
    }
}
