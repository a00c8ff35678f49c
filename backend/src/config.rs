use std::env;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::error::ConfigError;
use crate::vision::ModelConfig;

pub const DEFAULT_EXPLANATION_ENDPOINT: &str = "http://127.0.0.1:3000/api/gemini-pro";
pub const DEFAULT_PERSISTENCE_ENDPOINT: &str = "http://127.0.0.1:3000/api/save-image-prediction";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub model_path: PathBuf,
    pub model_config: ModelConfig,
    pub explanation_endpoint: Url,
    pub persistence_endpoint: Url,
    pub request_timeout: Option<Duration>,
    pub frontend_dir: PathBuf,
    pub base_url: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from any variable source; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let model_path = lookup("MODEL_PATH")
            .map(PathBuf::from)
            .ok_or(ConfigError::MissingVar("MODEL_PATH"))?;

        let model_config = match lookup("MODEL_CONFIG") {
            Some(path) => ModelConfig::load(&PathBuf::from(path))?,
            None => ModelConfig::default(),
        };

        let explanation_endpoint = parse_url(
            "EXPLANATION_ENDPOINT",
            lookup("EXPLANATION_ENDPOINT").as_deref(),
            DEFAULT_EXPLANATION_ENDPOINT,
        )?;
        let persistence_endpoint = parse_url(
            "PERSISTENCE_ENDPOINT",
            lookup("PERSISTENCE_ENDPOINT").as_deref(),
            DEFAULT_PERSISTENCE_ENDPOINT,
        )?;

        let request_timeout = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                    name: "REQUEST_TIMEOUT_SECS",
                    reason: format!("'{}' is not a whole number of seconds", raw),
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                name: "PORT",
                reason: format!("'{}' is not a valid port", raw),
            })?,
            None => 8081,
        };

        let frontend_dir = lookup("FRONTEND_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_frontend_dir);

        let base_url = lookup("BASE_URL").unwrap_or_else(|| format!("http://localhost:{}", port));

        Ok(Self {
            model_path,
            model_config,
            explanation_endpoint,
            persistence_endpoint,
            request_timeout,
            frontend_dir,
            base_url,
            port,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }

    pub fn http_client(&self) -> reqwest::Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.request_timeout {
            builder = builder.timeout(timeout);
        }
        builder.build()
    }
}

fn parse_url(name: &'static str, raw: Option<&str>, default: &str) -> Result<Url, ConfigError> {
    let raw = raw.unwrap_or(default);
    Url::parse(raw).map_err(|e| ConfigError::InvalidValue {
        name,
        reason: format!("'{}': {}", raw, e),
    })
}

fn default_frontend_dir() -> PathBuf {
    if let Ok(manifest_dir) = env::var("CARGO_MANIFEST_DIR") {
        PathBuf::from(format!("{}/../frontend/dist", manifest_dir))
    } else {
        PathBuf::from("/usr/src/app/frontend/dist")
    }
}
