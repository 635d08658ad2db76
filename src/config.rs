use crate::{errors, errors::ToResult};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    pub token: String,
    #[serde(default = "default_langs")]
    pub langs: String,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub stream: StreamConfig,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_url")]
    pub url: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct StreamConfig {
    /// Seconds to wait for the next frame; 0 waits forever
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout: u64,
}

fn default_langs() -> String {
    "en".to_string()
}

fn default_api_url() -> String {
    "https://api.sort-me.org".to_string()
}

fn default_idle_timeout() -> u64 {
    300
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            url: default_api_url(),
        }
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        StreamConfig {
            idle_timeout: default_idle_timeout(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Config, errors::Error> {
        let config = std::fs::read_to_string(path)
            .with_context_config(|| format!("Failed to read config from {path:?}"))?;
        Config::parse(&config)
            .map_err(|e| errors::ConfigurationFailure(format!("Config {path:?} is invalid: {e}")))
    }

    pub fn parse(text: &str) -> Result<Config, errors::Error> {
        let config: Config =
            toml::from_str(text).with_context_config(|| "Config is not valid TOML")?;
        if config.token.is_empty() {
            return Err(errors::ConfigurationFailure(
                "Field token of the configuration file is empty".to_string(),
            ));
        }
        if !config.api.url.starts_with("https://") && !config.api.url.starts_with("http://") {
            return Err(errors::ConfigurationFailure(format!(
                "Field api.url must start with http:// or https://, got {:?}",
                config.api.url
            )));
        }
        Ok(config)
    }

    pub fn default_path() -> Result<PathBuf, errors::Error> {
        let dirs = xdg::BaseDirectories::with_prefix("sort-me")
            .with_context_config(|| "Failed to locate the configuration directory")?;
        Ok(dirs.get_config_home().join("config.toml"))
    }

    pub fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.api.url.trim_end_matches('/'), path.trim_start_matches('/'))
    }

    /// The push channel lives on the same host, under the websocket scheme
    pub fn stream_url(&self, path: &str) -> String {
        let url = self.api_url(path);
        if let Some(rest) = url.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = url.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            url
        }
    }

    pub fn idle_timeout(&self) -> Option<Duration> {
        match self.stream.idle_timeout {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}
