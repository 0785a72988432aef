//! # Client Configuration
//!
//! Configuration for the backend boundary.
//!
//! ## Sources, highest priority first
//! ```text
//! 1. Environment variables   RXPOS_API_URL
//! 2. TOML config file        <platform config dir>/rxpos/client.toml
//! 3. Default values
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # client.toml
//! base_url = "http://127.0.0.1:8000/api"
//! request_timeout_secs = 15
//! search_debounce_ms = 300
//! search_min_chars = 2
//! tax_percent = 18.0
//! ```

use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use rxpos_core::Percent;

use crate::error::{ClientError, ClientResult};

/// Configuration for [`crate::http::HttpApi`] and the search layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend API base URL.
    pub base_url: String,

    /// Per-request timeout.
    pub request_timeout_secs: u64,

    /// Keystroke debounce before a search request is issued.
    pub search_debounce_ms: u64,

    /// Queries shorter than this (after trimming) issue no request.
    pub search_min_chars: usize,

    /// Sales tax policy applied to every cart, as a percentage.
    pub tax_percent: f64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            base_url: "http://127.0.0.1:8000/api".to_string(),
            request_timeout_secs: 15,
            search_debounce_ms: 300,
            search_min_chars: 2,
            // Standard GST rate; override per deployment.
            tax_percent: 18.0,
        }
    }
}

impl ClientConfig {
    /// Parses a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> ClientResult<Self> {
        toml::from_str(text).map_err(|e| ClientError::ConfigLoadFailed(e.to_string()))
    }

    /// Loads configuration: file if present, defaults otherwise, then
    /// environment overrides on top.
    pub fn load() -> ClientResult<Self> {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => {
                info!(path = %path.display(), "loading client config");
                let text = std::fs::read_to_string(&path)
                    .map_err(|e| ClientError::ConfigLoadFailed(e.to_string()))?;
                Self::from_toml_str(&text)?
            }
            _ => {
                debug!("no config file, using defaults");
                ClientConfig::default()
            }
        };

        config.apply_env();
        Ok(config)
    }

    /// Platform config file location
    /// (e.g. `~/.config/rxpos/client.toml` on Linux).
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "rxpos", "rxpos")
            .map(|dirs| dirs.config_dir().join("client.toml"))
    }

    /// Applies environment overrides.
    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("RXPOS_API_URL") {
            if !url.trim().is_empty() {
                self.base_url = url;
            }
        }
    }

    /// The tax policy as a rate.
    pub fn tax_rate(&self) -> Percent {
        Percent::from_percent(self.tax_percent)
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs)
    }

    pub fn search_debounce(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.search_debounce_ms)
    }
}
