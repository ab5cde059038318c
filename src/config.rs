use anyhow::Result;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, time::Duration};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub climate: ClimateConfig,
    pub advisory: AdvisoryConfig,
    pub simulator: SimulatorConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
            request_timeout_secs: 30,
            enable_cors: false,
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClimateConfig {
    pub geocoding_url: String,
    pub archive_url: String,
    pub forecast_url: String,
    /// Per HTTP request
    pub http_timeout_seconds: u64,
    /// Whole lookup, geocoding included
    pub lookup_timeout_seconds: u64,
    pub cache_ttl_seconds: u64,
    pub cache_capacity: usize,
    /// Appended to place names before geocoding; empty disables it
    pub default_country: String,
    pub user_agent: String,
}

impl Default for ClimateConfig {
    fn default() -> Self {
        Self {
            geocoding_url: "https://nominatim.openstreetmap.org".into(),
            archive_url: "https://archive-api.open-meteo.com/v1".into(),
            forecast_url: "https://api.open-meteo.com/v1".into(),
            http_timeout_seconds: 5,
            lookup_timeout_seconds: 10,
            cache_ttl_seconds: 3600,
            cache_capacity: 256,
            default_country: "Argentina".into(),
            user_agent: "ecosmart-advisor/0.3".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdvisoryConfig {
    /// Enables the chat-completion parameter advisor
    pub enabled: bool,
    /// Attach rule-based advice text to diagnoses
    pub text_advice: bool,
    pub api_url: String,
    #[serde(skip_serializing)]
    pub api_key: String,
    pub model: String,
    pub http_timeout_seconds: u64,
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            text_advice: true,
            api_url: "https://api.deepseek.com/v1/chat/completions".into(),
            api_key: String::new(),
            model: "deepseek-chat".into(),
            http_timeout_seconds: 10,
        }
    }
}


#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Used when a request location is missing or malformed
    pub default_location: String,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            default_location: "-34.6037,-58.3816".into(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::from_figment(
            Figment::new()
                .merge(Toml::file("config/default.toml"))
                .merge(Env::prefixed("ECOSMART__").split("__")),
        )
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        Ok(figment.extract()?)
    }
}
