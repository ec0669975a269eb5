// src/sync/mod.rs

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use reqwest::Client;
use serde::Serialize;
use tracing::{info, warn};
use url::Url;

use crate::{
    present::Snapshot,
    process::RecordSet,
    session::{SessionKey, SessionStore},
};

pub const DEFAULT_SOURCE_TAG: &str = "Zishann Dashboard";

/// Body posted to the CRM webhook.
#[derive(Debug, Serialize)]
pub struct SyncPayload<'a> {
    pub source: &'a str,
    /// UTC, millisecond precision, `Z` suffix.
    pub timestamp: String,
    pub leads: &'a RecordSet,
    pub orders: &'a RecordSet,
}

impl<'a> SyncPayload<'a> {
    pub fn new(source: &'a str, snapshot: &'a Snapshot) -> Self {
        Self {
            source,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            leads: snapshot.leads(),
            orders: snapshot.orders(),
        }
    }
}

/// Outcome shown to the user after a sync attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    MissingUrl,
    Synced,
    Failed,
}

impl SyncStatus {
    pub fn message(&self) -> &'static str {
        match self {
            SyncStatus::MissingUrl => "Please enter a CRM Webhook URL",
            SyncStatus::Synced => "Data synced successfully to CRM!",
            SyncStatus::Failed => "Error syncing to CRM. Check URL and connection.",
        }
    }
}

/// POST `payload` as JSON to `url`. One attempt; a non-2xx reply is an error.
pub async fn push_payload(client: &Client, url: &Url, payload: &SyncPayload<'_>) -> Result<()> {
    client
        .post(url.clone())
        .json(payload)
        .send()
        .await
        .with_context(|| format!("POST {}", url))?
        .error_for_status()
        .with_context(|| format!("webhook {} rejected sync", url))?;
    Ok(())
}

/// Pushes snapshots to the webhook saved in the session.
pub struct Syncer {
    client: Client,
    store: SessionStore,
    source_tag: String,
}

impl Syncer {
    pub fn new(client: Client, store: SessionStore, source_tag: impl Into<String>) -> Self {
        Self {
            client,
            store,
            source_tag: source_tag.into(),
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Sync `snapshot` to `url_input`, or to the saved URL when none is given.
    ///
    /// A non-blank URL is saved before the request goes out. Transport and
    /// HTTP failures come back as [`SyncStatus::Failed`]; only a failure to
    /// save the URL is an `Err`.
    pub async fn sync(&mut self, url_input: Option<&str>, snapshot: &Snapshot) -> Result<SyncStatus> {
        let raw = url_input
            .or_else(|| self.store.webhook_url())
            .unwrap_or("")
            .trim()
            .to_string();
        if raw.is_empty() {
            return Ok(SyncStatus::MissingUrl);
        }

        self.store.set(SessionKey::WebhookUrl, &raw)?;

        let url = match Url::parse(&raw) {
            Ok(u) => u,
            Err(e) => {
                warn!(url = %raw, "invalid webhook url: {}", e);
                return Ok(SyncStatus::Failed);
            }
        };

        let payload = SyncPayload::new(&self.source_tag, snapshot);
        match push_payload(&self.client, &url, &payload).await {
            Ok(()) => {
                info!(
                    url = %url,
                    leads = payload.leads.len(),
                    orders = payload.orders.len(),
                    "synced to webhook"
                );
                Ok(SyncStatus::Synced)
            }
            Err(e) => {
                warn!("sync failed: {:#}", e);
                Ok(SyncStatus::Failed)
            }
        }
    }
}
