//! Configuration loaded from `~/.config/twitchbrowser/config.toml`.
//!
//! ```toml
//! client_id = "abcdefghijklmnopqrstuvwxyz0123"
//! client_secret = "..."
//! favorites = ["cosmowright", "zfg1", "simply"]
//!
//! # optional
//! page_size = 100
//! disk_cache = true
//! cache_dir = "/tmp/twitchbrowser"
//! srl_url = "http://api.speedrunslive.com/test/team"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::cache::default_cache_dir;
use crate::paginate::MAX_PAGE_SIZE;
use crate::source::srl::SRL_TEAM_URL;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    /// Channels collected by `--fav`.
    #[serde(default)]
    pub favorites: Vec<String>,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_true")]
    pub disk_cache: bool,
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
    #[serde(default = "default_srl_url")]
    pub srl_url: String,
}

fn default_page_size() -> usize {
    MAX_PAGE_SIZE
}

fn default_true() -> bool {
    true
}

fn default_srl_url() -> String {
    SRL_TEAM_URL.to_string()
}

impl AppConfig {
    /// Load from `path`, or from the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid TOML, or
    /// holds out-of-range values.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map_or_else(config_path, Path::to_path_buf);
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("invalid config in {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        if config.page_size == 0 || config.page_size > MAX_PAGE_SIZE {
            bail!("page_size must be between 1 and {MAX_PAGE_SIZE}, got {}", config.page_size);
        }
        Ok(config)
    }

    /// Client ID and secret, which every Helix call needs.
    pub fn credentials(&self) -> Result<(&str, &str)> {
        let id = self.client_id.trim();
        if id.is_empty() {
            bail!("no client_id provided; register an application at https://dev.twitch.tv/console");
        }
        let secret = self.client_secret.trim();
        if secret.is_empty() {
            bail!("no client_secret provided for client_id {id}");
        }
        Ok((id, secret))
    }

    /// Directory for the game name cache, if enabled.
    pub fn cache_dir(&self) -> Option<PathBuf> {
        if !self.disk_cache {
            return None;
        }
        self.cache_dir.clone().or_else(default_cache_dir)
    }
}

/// Return the path to the default config file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("twitchbrowser")
        .join("config.toml")
}
