// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Application configuration.
//!
//! Settings live in `<config dir>/framecap/config.yaml`. A missing or
//! unreadable file falls back to defaults; the environment variables
//! `FRAMECAP_SERVER_URL` and `FRAMECAP_DOWNLOAD_DIR` override the file.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const SERVER_URL_VAR: &str = "FRAMECAP_SERVER_URL";
pub const DOWNLOAD_DIR_VAR: &str = "FRAMECAP_DOWNLOAD_DIR";

/// Top-level application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the caption service.
    pub server_url: String,
    /// Where downloaded videos are written.
    pub download_dir: PathBuf,
    /// Seconds the finished upload progress stays on screen.
    pub progress_hide_secs: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8000".into(),
            download_dir: PathBuf::from("."),
            progress_hide_secs: 2.0,
        }
    }
}

impl Config {
    /// Directory: ~/.config/framecap/
    fn dir() -> PathBuf {
        let mut p = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        p.push("framecap");
        p
    }

    pub fn path() -> PathBuf {
        Self::dir().join("config.yaml")
    }

    /// Load from the default location and apply environment overrides.
    pub fn load() -> Self {
        let mut config = Self::load_from(&Self::path());
        config.apply_overrides(|name| std::env::var(name).ok());
        config
    }

    /// Load from `path`, returning defaults if the file doesn't exist or is invalid.
    pub fn load_from(path: &Path) -> Self {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(_) => {
                log::debug!("No config at {}, using defaults", path.display());
                return Self::default();
            }
        };
        match Self::from_yaml_str(&raw) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Ignoring invalid config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Apply overrides looked up by variable name.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(SERVER_URL_VAR).filter(|v| !v.is_empty()) {
            self.server_url = url;
        }
        if let Some(dir) = lookup(DOWNLOAD_DIR_VAR).filter(|v| !v.is_empty()) {
            self.download_dir = PathBuf::from(dir);
        }
    }

    pub fn progress_hide_delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.progress_hide_secs).unwrap_or(Duration::from_secs(2))
    }
}
