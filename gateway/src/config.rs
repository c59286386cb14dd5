//! Configuration for the gateway.

use config::{Config as ConfigLoader, ConfigError, Environment, File, Map};
use serde::Deserialize;

/// Gateway configuration. Read once at startup and never mutated.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Listen address (default: 0.0.0.0)
    #[serde(default = "default_host")]
    pub host: String,
    /// Listen port (default: 8080)
    #[serde(default = "default_port")]
    pub port: u16,
    /// Immich machine-learning service that receives passthrough requests
    #[serde(default = "default_immich_api")]
    pub immich_api: String,
    /// MT Photos AI service providing `/ocr/rec` and `/clip/*`
    #[serde(default = "default_mt_photos_api")]
    pub mt_photos_api: String,
    /// Shared credential. Inbound callers present it as `x-auth-token`,
    /// outbound MT Photos calls carry it as `api-key`.
    #[serde(default = "default_api_key")]
    pub mt_photos_api_key: String,
    /// Largest `/predict` body buffered in memory.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
    /// Tracing filter used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            immich_api: default_immich_api(),
            mt_photos_api: default_mt_photos_api(),
            mt_photos_api_key: default_api_key(),
            max_body_bytes: default_max_body_bytes(),
            log_level: default_log_level(),
        }
    }
}

// Default values
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_immich_api() -> String {
    "http://localhost:3003".to_string()
}
fn default_mt_photos_api() -> String {
    "http://localhost:8060".to_string()
}
fn default_api_key() -> String {
    "mt_photos_ai_extra".to_string()
}
fn default_max_body_bytes() -> usize {
    64 * 1024 * 1024
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Configuration sources (in order of precedence):
    /// 1. Environment variables (`IMMICH_API`, `MT_PHOTOS_API`, `PORT`, ...)
    /// 2. config.toml file (if present)
    /// 3. Built-in defaults
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(None)
    }

    /// Same as [`Config::load`]. When `environment` is set it replaces the
    /// process environment as the variable source.
    pub fn load_with(environment: Option<Map<String, String>>) -> Result<Self, ConfigError> {
        let builder = ConfigLoader::builder()
            .set_default("host", default_host())?
            .set_default("port", default_port() as i64)?
            .set_default("immich_api", default_immich_api())?
            .set_default("mt_photos_api", default_mt_photos_api())?
            .set_default("mt_photos_api_key", default_api_key())?
            .set_default("max_body_bytes", default_max_body_bytes() as i64)?
            .set_default("log_level", default_log_level())?
            .add_source(File::with_name("config").required(false))
            // Flat names: MT_PHOTOS_API_KEY maps to `mt_photos_api_key`.
            .add_source(Environment::default().source(environment));

        let mut config: Config = builder.build()?.try_deserialize()?;
        config.immich_api = trim_base_url(&config.immich_api);
        config.mt_photos_api = trim_base_url(&config.mt_photos_api);

        Ok(config)
    }

    /// Address the server binds to.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn trim_base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}
