// src/config.rs
//! Client settings.
//!
//! Resolution order, later wins: built-in defaults, the optional TOML file,
//! the `FACEMARK_URL` environment variable, command-line flags.

use anyhow::{Context, Result};
use log::info;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::attempt::encoder::DEFAULT_FILE_NAME;

pub const URL_ENV: &str = "FACEMARK_URL";
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the attendance backend
    pub server_url: String,
    /// Path of the recognition endpoint, relative to `server_url`
    pub recognize_path: String,
    /// File name declared in the multipart upload
    pub file_name: String,
    /// Whole-request timeout (seconds)
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    /// JPEG quality used when re-encoding camera frames
    pub jpeg_quality: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            recognize_path: "/recognize/".to_string(),
            file_name: DEFAULT_FILE_NAME.to_string(),
            timeout_secs: 30,
            connect_timeout_secs: 10,
            jpeg_quality: crate::capture::snapshot::JPEG_QUALITY,
        }
    }
}

impl Settings {
    /// Parse settings from a TOML file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let settings: Settings = toml::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(settings)
    }

    /// Defaults, then `path` if given, then the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = match path {
            Some(p) => {
                info!("Loading settings from {}", p.display());
                Self::from_file(p)?
            }
            None => Self::default(),
        };
        settings.apply_env(std::env::var(URL_ENV).ok());
        Ok(settings)
    }

    fn apply_env(&mut self, url: Option<String>) {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            info!("{} overrides server URL: {}", URL_ENV, url);
            self.server_url = url;
        }
    }

    /// Apply command-line overrides.
    pub fn with_overrides(mut self, server: Option<String>, timeout_secs: Option<u64>) -> Self {
        if let Some(server) = server {
            self.server_url = server;
        }
        if let Some(timeout) = timeout_secs {
            self.timeout_secs = timeout;
        }
        self
    }
}
