// src/session/mod.rs

use anyhow::{Context, Result};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

/// Keys kept in the session file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionKey {
    LoggedIn,
    WebhookUrl,
}

impl SessionKey {
    pub fn as_str(&self) -> &str {
        match self {
            SessionKey::LoggedIn => "zishann_logged_in",
            SessionKey::WebhookUrl => "crm_webhook_url",
        }
    }
}

/// Flat string → string store persisted as a JSON object.
///
/// No versioning, no expiry: values stay until removed. Every change is
/// written through to disk.
pub struct SessionStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl SessionStore {
    /// Open the store at `path`; a missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = if path.exists() {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("reading session file {}", path.display()))?;
            if raw.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&raw)
                    .with_context(|| format!("parsing session file {}", path.display()))?
            }
        } else {
            BTreeMap::new()
        };
        debug!(path = %path.display(), keys = values.len(), "opened session");
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: SessionKey) -> Option<&str> {
        self.values.get(key.as_str()).map(String::as_str)
    }

    pub fn set(&mut self, key: SessionKey, value: &str) -> Result<()> {
        self.values
            .insert(key.as_str().to_string(), value.to_string());
        self.persist()
    }

    pub fn remove(&mut self, key: SessionKey) -> Result<()> {
        if self.values.remove(key.as_str()).is_some() {
            self.persist()?;
        }
        Ok(())
    }

    pub fn is_logged_in(&self) -> bool {
        self.get(SessionKey::LoggedIn) == Some("true")
    }

    pub fn log_in(&mut self) -> Result<()> {
        self.set(SessionKey::LoggedIn, "true")
    }

    pub fn log_out(&mut self) -> Result<()> {
        self.remove(SessionKey::LoggedIn)
    }

    pub fn webhook_url(&self) -> Option<&str> {
        self.get(SessionKey::WebhookUrl).filter(|u| !u.is_empty())
    }

    /// Write to `<file>.tmp` then rename over the real file.
    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(&self.values)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, json).with_context(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, &self.path).with_context(|| {
            format!(
                "failed to rename `{}` to `{}`",
                tmp.display(),
                self.path.display()
            )
        })?;
        Ok(())
    }
}
