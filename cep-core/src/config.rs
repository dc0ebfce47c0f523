use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

/// Environment variable that overrides the stored WeatherAPI key.
pub const WEATHER_API_KEY_ENV: &str = "WEATHER_API_KEY";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Settings for the front-facing gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub listen_addr: String,
    /// Base URL of the resolver service.
    pub resolver_url: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            resolver_url: "http://127.0.0.1:8081".to_string(),
        }
    }
}

/// Settings for the resolver and the two public APIs it queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub listen_addr: String,
    pub directory_url: String,
    pub weather_url: String,
    pub weather_api_key: Option<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8081".to_string(),
            directory_url: "http://viacep.com.br".to_string(),
            weather_url: "http://api.weatherapi.com".to_string(),
            weather_api_key: None,
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// log_level = "debug"
///
/// [gateway]
/// resolver_url = "http://resolver:8081"
///
/// [resolver]
/// weather_api_key = "..."
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: String,
    pub log_format: LogFormat,
    /// Per-request timeout for outbound calls. Unset means wait indefinitely.
    pub request_timeout_secs: Option<u64>,
    pub gateway: GatewayConfig,
    pub resolver: ResolverConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::default(),
            request_timeout_secs: None,
            gateway: GatewayConfig::default(),
            resolver: ResolverConfig::default(),
        }
    }
}

impl Config {
    /// Load config from `path`, or from the platform config dir when `path` is `None`.
    ///
    /// A missing file yields defaults. `WEATHER_API_KEY` is applied on top.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_file_path()?,
        };

        let mut cfg = Self::load_from(&path)?;
        cfg.apply_env(std::env::var(WEATHER_API_KEY_ENV).ok());

        Ok(cfg)
    }

    /// Apply the `WEATHER_API_KEY` value, if the variable was set.
    ///
    /// A set-but-blank value clears the stored key.
    pub fn apply_env(&mut self, weather_api_key: Option<String>) {
        if let Some(key) = weather_api_key {
            self.set_weather_api_key(key);
        }
    }

    /// Read a config file without consulting the environment.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the default config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "cep-weather", "cep-weather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Blank keys are treated as unset.
    pub fn set_weather_api_key(&mut self, key: String) {
        let key = key.trim();
        self.resolver.weather_api_key = (!key.is_empty()).then(|| key.to_string());
    }

    pub fn weather_api_key(&self) -> Result<&str> {
        self.resolver.weather_api_key.as_deref().ok_or_else(|| {
            anyhow!(
                "No WeatherAPI key configured.\n\
                 Hint: run `cep-weather configure <api-key>` or set {WEATHER_API_KEY_ENV}."
            )
        })
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
