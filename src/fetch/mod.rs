// src/fetch/mod.rs

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use url::Url;

/// Anything that can hand back the current CSV body of the sheet.
#[async_trait]
pub trait CsvSource: Send + Sync {
    async fn fetch_text(&self) -> Result<String>;

    /// Where the text comes from, for logs.
    fn describe(&self) -> String;
}

/// The published spreadsheet export, fetched with a plain GET.
#[derive(Clone)]
pub struct HttpCsvSource {
    client: Client,
    url: Url,
}

impl HttpCsvSource {
    pub fn new(client: Client, url: Url) -> Self {
        Self { client, url }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl CsvSource for HttpCsvSource {
    async fn fetch_text(&self) -> Result<String> {
        self.client
            .get(self.url.clone())
            .send()
            .await
            .with_context(|| format!("GET {}", self.url))?
            .error_for_status()
            .with_context(|| format!("bad status from {}", self.url))?
            .text()
            .await
            .with_context(|| format!("reading body from {}", self.url))
    }

    fn describe(&self) -> String {
        self.url.to_string()
    }
}
