// src/services/fetcher.rs

//! Page fetching abstraction.
//!
//! The pipeline only needs "give me the markup and status for this URL";
//! [`HttpFetcher`] is the reqwest-backed implementation used by the CLI.

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::SourceConfig;
use crate::utils::http::create_async_client;

/// A fetched page: final status and raw markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub url: String,
    pub status: u16,
    pub body: String,
}

impl Page {
    pub fn new(url: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status,
            body: body.into(),
        }
    }

    /// Fail with [`AppError::HttpStatus`] unless the status is 2xx.
    pub fn ensure_success(self) -> Result<Self> {
        if (200..300).contains(&self.status) {
            Ok(self)
        } else {
            Err(AppError::HttpStatus {
                url: self.url,
                status: self.status,
            })
        }
    }
}

/// Trait for anything that can fetch a page by URL.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch `url`. Transport problems are errors; any HTTP status is a page.
    async fn fetch(&self, url: &str) -> Result<Page>;
}

/// Page fetcher over a shared reqwest client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a fetcher whose client carries the configured timeout and user agent.
    pub fn new(config: &SourceConfig) -> Result<Self> {
        Ok(Self {
            client: create_async_client(config)?,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Page> {
        log::debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::transport(url, e))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::transport(url, e))?;
        Ok(Page::new(url, status, body))
    }
}
