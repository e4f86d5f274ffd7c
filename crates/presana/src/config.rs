use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::backend::{DEFAULT_TIMEOUT_SECS, DEFAULT_URL};
use crate::metadata::ModelKind;
use crate::session::Pacing;

const FILENAME: &str = "config.yaml";
const APP_DIR: &str = "presana";
pub const URL_ENV_VAR: &str = "PRESANA_BACKEND_URL";

const VALID_KEYS: &str = "backend.url, backend.timeout_secs, defaults.model, defaults.theme, \
                          pacing.enabled, pacing.settle_ms, pacing.stride_ms, pacing.trailing_ms";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend: Option<BackendConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pacing: Option<PacingConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<ModelKind>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
}

/// Narration stagger. Unset fields fall back to the observed 800/150/500 ms.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PacingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settle_ms: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stride_ms: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trailing_ms: Option<u64>,
}

impl PacingConfig {
    pub fn resolve(&self) -> Pacing {
        if self.enabled == Some(false) {
            return Pacing::immediate();
        }
        let observed = Pacing::observed();
        Pacing {
            settle: self
                .settle_ms
                .map(Duration::from_millis)
                .unwrap_or(observed.settle),
            stride: self
                .stride_ms
                .map(Duration::from_millis)
                .unwrap_or(observed.stride),
            trailing: self
                .trailing_ms
                .map(Duration::from_millis)
                .unwrap_or(observed.trailing),
        }
    }
}

/// Effective settings after applying flags, environment and file.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub url: String,
    pub timeout: Duration,
    pub model: ModelKind,
    pub theme: String,
    pub pacing: Pacing,
}

impl Config {
    pub fn path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|d| d.join(APP_DIR).join(FILENAME))
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                anyhow::anyhow!("No config found. Run `presana config show` to see defaults.")
            } else {
                anyhow::anyhow!("Failed to read config: {e}")
            }
        })?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        let contents = format!("# PreSaNa client configuration\n{yaml}");
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Backend URL: flag, then environment, then file, then the default.
    pub fn resolve_url(&self, flag: Option<&str>) -> String {
        if let Some(url) = flag.filter(|u| !u.is_empty()) {
            return url.to_string();
        }
        if let Ok(url) = std::env::var(URL_ENV_VAR) {
            if !url.is_empty() {
                return url;
            }
        }
        self.backend
            .as_ref()
            .and_then(|b| b.url.clone())
            .unwrap_or_else(|| DEFAULT_URL.to_string())
    }

    pub fn settings(&self, url_flag: Option<&str>) -> Settings {
        let defaults = self.defaults.clone().unwrap_or_default();
        Settings {
            url: self.resolve_url(url_flag),
            timeout: Duration::from_secs(
                self.backend
                    .as_ref()
                    .and_then(|b| b.timeout_secs)
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
            model: defaults.model.unwrap_or_default(),
            theme: defaults.theme.unwrap_or_else(|| "dark".to_string()),
            pacing: self.pacing.clone().unwrap_or_default().resolve(),
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "backend.url" => {
                if !value.starts_with("http://") && !value.starts_with("https://") {
                    anyhow::bail!("Invalid url: {value}. Must start with http:// or https://.");
                }
                self.backend
                    .get_or_insert_with(BackendConfig::default)
                    .url = Some(value.trim_end_matches('/').to_string());
            }
            "backend.timeout_secs" => {
                let secs = parse_number(key, value)?;
                if secs == 0 {
                    anyhow::bail!("Invalid timeout_secs: {value}. Must be at least 1.");
                }
                self.backend
                    .get_or_insert_with(BackendConfig::default)
                    .timeout_secs = Some(secs);
            }
            "defaults.model" => {
                let model = ModelKind::from_id(value).ok_or_else(|| {
                    anyhow::anyhow!("Invalid model: {value}. Must be 'linear' or 'rf'.")
                })?;
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .model = Some(model);
            }
            "defaults.theme" => {
                match value {
                    "light" | "dark" => {}
                    _ => anyhow::bail!("Invalid theme: {value}. Must be 'light' or 'dark'."),
                }
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .theme = Some(value.to_string());
            }
            "pacing.enabled" => {
                let enabled = match value {
                    "true" => true,
                    "false" => false,
                    _ => anyhow::bail!("Invalid pacing.enabled: {value}. Must be 'true' or 'false'."),
                };
                self.pacing
                    .get_or_insert_with(PacingConfig::default)
                    .enabled = Some(enabled);
            }
            "pacing.settle_ms" => {
                self.pacing
                    .get_or_insert_with(PacingConfig::default)
                    .settle_ms = Some(parse_number(key, value)?);
            }
            "pacing.stride_ms" => {
                self.pacing
                    .get_or_insert_with(PacingConfig::default)
                    .stride_ms = Some(parse_number(key, value)?);
            }
            "pacing.trailing_ms" => {
                self.pacing
                    .get_or_insert_with(PacingConfig::default)
                    .trailing_ms = Some(parse_number(key, value)?);
            }
            _ => anyhow::bail!("Unknown config key: {key}. Valid keys: {VALID_KEYS}"),
        }
        Ok(())
    }
}

fn parse_number(key: &str, value: &str) -> Result<u64> {
    value
        .parse::<u64>()
        .map_err(|_| anyhow::anyhow!("Invalid {key}: {value}. Must be a non-negative integer."))
}
