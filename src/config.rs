// src/config.rs

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::info;
use url::Url;

use crate::sync::DEFAULT_SOURCE_TAG;

/// Published CSV export of the orders sheet.
pub const DEFAULT_SHEET_CSV_URL: &str = "https://docs.google.com/spreadsheets/d/18yJ7cySvgyR4sC70haKvwh-EuLpD-ygvTGcgAuK3zfI/export?format=csv&gid=15146022";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sheet_csv_url: String,
    pub poll_interval_secs: u64,
    pub request_timeout_secs: u64,
    pub session_path: PathBuf,
    pub sync_source: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sheet_csv_url: DEFAULT_SHEET_CSV_URL.to_string(),
            poll_interval_secs: 15,
            request_timeout_secs: 30,
            session_path: PathBuf::from("session.json"),
            sync_source: DEFAULT_SOURCE_TAG.to_string(),
        }
    }
}

impl Config {
    /// Defaults, overlaid by the YAML file at `path` if it exists, overlaid by
    /// `SHEET_CSV_URL`, `POLL_INTERVAL_SECS` and `SESSION_PATH`.
    pub fn load(path: &Path) -> Result<Self> {
        let mut cfg = if path.exists() {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            let cfg: Config = serde_yaml::from_str(&raw)
                .with_context(|| format!("parsing config {}", path.display()))?;
            info!(path = %path.display(), "loaded config");
            cfg
        } else {
            Config::default()
        };

        cfg.apply_overrides(|key| env::var(key).ok())?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(url) = lookup("SHEET_CSV_URL") {
            self.sheet_csv_url = url;
        }
        if let Some(secs) = lookup("POLL_INTERVAL_SECS") {
            self.poll_interval_secs = secs
                .trim()
                .parse()
                .with_context(|| format!("POLL_INTERVAL_SECS={:?} is not a number", secs))?;
        }
        if let Some(p) = lookup("SESSION_PATH") {
            self.session_path = PathBuf::from(p);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.sheet_url()?;
        if self.poll_interval_secs == 0 {
            bail!("poll_interval_secs must be at least 1");
        }
        if self.request_timeout_secs == 0 {
            bail!("request_timeout_secs must be at least 1");
        }
        Ok(())
    }

    pub fn sheet_url(&self) -> Result<Url> {
        Url::parse(&self.sheet_csv_url)
            .with_context(|| format!("parsing sheet_csv_url {}", self.sheet_csv_url))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
