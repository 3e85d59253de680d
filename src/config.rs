use crate::error::{CanvasError, Result};
use std::env;
use std::time::Duration;

pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_MODEL_ID: &str = "amazon.nova-canvas-v1:0";
pub const DEFAULT_COST_PER_IMAGE: f64 = 0.01;
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8501;
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone)]
pub struct BedrockConfig {
    pub region: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub session_token: Option<String>,
    pub model_id: Option<String>,
}

impl Default for BedrockConfig {
    fn default() -> Self {
        BedrockConfig {
            region: None,
            access_key: None,
            secret_key: None,
            session_token: None,
            model_id: None,
        }
    }
}

impl BedrockConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `AWS_REGION`, `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`,
    /// `AWS_SESSION_TOKEN` and `BEDROCK_MODEL_ID`. Blank values count as unset.
    pub fn from_env() -> Self {
        BedrockConfig {
            region: non_empty_var("AWS_REGION"),
            access_key: non_empty_var("AWS_ACCESS_KEY_ID"),
            secret_key: non_empty_var("AWS_SECRET_ACCESS_KEY"),
            session_token: non_empty_var("AWS_SESSION_TOKEN"),
            model_id: non_empty_var("BEDROCK_MODEL_ID"),
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_credentials(
        mut self,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        self.access_key = Some(access_key.into());
        self.secret_key = Some(secret_key.into());
        self
    }

    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = Some(model_id.into());
        self
    }

    pub fn region_or_default(&self) -> &str {
        self.region.as_deref().unwrap_or(DEFAULT_REGION)
    }

    pub fn model_or_default(&self) -> &str {
        self.model_id.as_deref().unwrap_or(DEFAULT_MODEL_ID)
    }

    pub fn has_static_credentials(&self) -> bool {
        self.access_key.is_some() && self.secret_key.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub cost_per_image: f64,
    pub session_ttl: Duration,
    pub log_level: Option<String>,
    pub log_json: bool,
    pub log_file: Option<String>,
    pub bedrock: BedrockConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            cost_per_image: DEFAULT_COST_PER_IMAGE,
            session_ttl: DEFAULT_SESSION_TTL,
            log_level: None,
            log_json: false,
            log_file: None,
            bedrock: BedrockConfig::default(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Result<Self> {
        let host = non_empty_var("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match non_empty_var("PORT") {
            Some(raw) => parse_port(&raw)?,
            None => DEFAULT_PORT,
        };
        let cost_per_image = match non_empty_var("COST_PER_IMAGE") {
            Some(raw) => parse_cost(&raw)?,
            None => DEFAULT_COST_PER_IMAGE,
        };
        let session_ttl = match non_empty_var("SESSION_TTL_SECS") {
            Some(raw) => parse_ttl(&raw)?,
            None => DEFAULT_SESSION_TTL,
        };
        let log_json = env::var("LOG_JSON").map_or(false, |val| val == "true");

        Ok(Config {
            host,
            port,
            cost_per_image,
            session_ttl,
            log_level: non_empty_var("LOG_LEVEL"),
            log_json,
            log_file: non_empty_var("LOG_FILE"),
            bedrock: BedrockConfig::from_env(),
        })
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_cost_per_image(mut self, cost: f64) -> Self {
        self.cost_per_image = cost;
        self
    }

    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|val| !val.trim().is_empty())
}

pub fn parse_port(raw: &str) -> Result<u16> {
    raw.trim()
        .parse()
        .map_err(|_| CanvasError::ConfigError(format!("PORT must be a port number, got '{}'", raw)))
}

/// Idle time, in whole seconds, after which a UI session is discarded.
pub fn parse_ttl(raw: &str) -> Result<Duration> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(CanvasError::ConfigError(format!(
            "SESSION_TTL_SECS must be a positive number of seconds, got '{}'",
            raw
        ))),
    }
}

pub fn parse_cost(raw: &str) -> Result<f64> {
    let cost: f64 = raw.trim().parse().map_err(|_| {
        CanvasError::ConfigError(format!("COST_PER_IMAGE must be a number, got '{}'", raw))
    })?;
    if !cost.is_finite() || cost < 0.0 {
        return Err(CanvasError::ConfigError(format!(
            "COST_PER_IMAGE must be a non-negative amount, got '{}'",
            raw
        )));
    }
    Ok(cost)
}
