use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use navsync_engine::{AiConfig, BrowserVariant, RemoteSettings};
use navsync_logging::{nav_info, nav_warn};
use serde::{Deserialize, Serialize};

pub(crate) const DEFAULT_CONFIG_FILE: &str = "navsync.ron";
pub(crate) const SECRET_ENV: &str = "NAVSYNC_SECRET";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct AppConfig {
    pub api_base: String,
    pub secret: Option<String>,
    pub cache_dir: PathBuf,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub ai: AiConfig,
    pub extension: ExtensionConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct ExtensionConfig {
    pub title: String,
    pub browser: BrowserVariant,
    pub icon: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let remote = RemoteSettings::default();
        Self {
            api_base: remote.api_base,
            secret: None,
            cache_dir: PathBuf::from(".navsync"),
            connect_timeout_secs: remote.connect_timeout.as_secs(),
            request_timeout_secs: remote.request_timeout.as_secs(),
            ai: AiConfig::default(),
            extension: ExtensionConfig::default(),
        }
    }
}

impl AppConfig {
    pub(crate) fn remote_settings(&self) -> RemoteSettings {
        RemoteSettings {
            api_base: self.api_base.clone(),
            secret: self.secret.clone(),
            connect_timeout: std::time::Duration::from_secs(self.connect_timeout_secs),
            request_timeout: std::time::Duration::from_secs(self.request_timeout_secs),
        }
    }

    /// Replaces the secret when `value` is set and not blank.
    pub(crate) fn apply_secret_override(&mut self, value: Option<String>) {
        if let Some(secret) = value.filter(|s| !s.trim().is_empty()) {
            self.secret = Some(secret);
        }
    }
}

/// Reads `path`. A missing file yields the defaults; a malformed one is an
/// error so a typo never silently drops the secret.
pub(crate) fn load_config(path: &Path) -> Result<AppConfig> {
    let mut config = match fs::read_to_string(path) {
        Ok(text) => {
            let config = ron::from_str(&text)
                .with_context(|| format!("failed to parse config {}", path.display()))?;
            nav_info!("Loaded config from {:?}", path);
            config
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            nav_warn!("No config at {:?}, using defaults", path);
            AppConfig::default()
        }
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read config {}", path.display()))
        }
    };
    config.apply_secret_override(std::env::var(SECRET_ENV).ok());
    Ok(config)
}
