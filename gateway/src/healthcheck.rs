//! Container health probe, run as `photo-bridge healthcheck`.

use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthcheckConfig {
    pub host: String,
    pub port: u16,
    pub timeout: Duration,
}

#[derive(Debug, thiserror::Error)]
pub enum HealthcheckError {
    #[error("invalid {0}: {1}")]
    InvalidSetting(&'static str, String),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("unexpected response body: {0}")]
    UnexpectedBody(String),
}

#[derive(Debug, Deserialize)]
struct PingResponse {
    message: String,
}

impl HealthcheckConfig {
    /// Read `HEALTH_CHECK_HOST`, `PORT` and `HEALTH_CHECK_TIMEOUT` (seconds).
    pub fn from_env() -> Result<Self, HealthcheckError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, HealthcheckError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HEALTH_CHECK_HOST").unwrap_or_else(|| "localhost".to_string());
        let port = match lookup("PORT") {
            Some(port) => port
                .parse()
                .map_err(|_| HealthcheckError::InvalidSetting("PORT", port))?,
            None => 8080,
        };
        let timeout_secs = match lookup("HEALTH_CHECK_TIMEOUT") {
            Some(secs) => secs
                .parse()
                .map_err(|_| HealthcheckError::InvalidSetting("HEALTH_CHECK_TIMEOUT", secs))?,
            None => 5,
        };

        Ok(Self {
            host,
            port,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    fn url(&self) -> String {
        format!("http://{}:{}/ping", self.host, self.port)
    }
}

/// Probe `/ping`. Healthy means status 200 and `{"message":"pong"}`.
pub async fn run(config: &HealthcheckConfig) -> Result<(), HealthcheckError> {
    let client = reqwest::Client::builder().timeout(config.timeout).build()?;
    let response = client.get(config.url()).send().await?;

    if response.status() != reqwest::StatusCode::OK {
        return Err(HealthcheckError::Status(response.status().as_u16()));
    }

    let body = response.text().await?;
    match serde_json::from_str::<PingResponse>(&body) {
        Ok(ping) if ping.message == "pong" => Ok(()),
        _ => Err(HealthcheckError::UnexpectedBody(body)),
    }
}
