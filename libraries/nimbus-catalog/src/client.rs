//! HTTP implementation of the `Catalog` trait.

use crate::types::{ApiEnvelope, CatalogConfig, PageData};
use async_trait::async_trait;
use bytes::Bytes;
use nimbus_core::{Catalog, CatalogError, Result, Track, TrackPage, TrackQuery};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

/// HTTP client for a Nimbus catalog server.
///
/// All methods come from the [`Catalog`] trait; construct one with
/// [`HttpCatalog::new`] and hand it to the playback session as
/// `Arc<dyn Catalog>`.
#[derive(Debug)]
pub struct HttpCatalog {
    http: Client,
    base_url: String,
    bearer_token: Option<String>,
}

impl HttpCatalog {
    /// Create a new catalog client with the given configuration.
    pub fn new(config: CatalogConfig) -> Result<Self> {
        if config.url.is_empty() {
            return Err(CatalogError::InvalidUrl("URL cannot be empty".into()));
        }

        // Normalize: strip trailing slashes, require an http(s) scheme
        let base_url = config.url.trim_end_matches('/').to_string();
        let parsed = url::Url::parse(&base_url)
            .map_err(|e| CatalogError::InvalidUrl(e.to_string()))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(CatalogError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("NimbusPlayer/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            bearer_token: config.bearer_token,
        })
    }

    /// Base URL this client talks to.
    pub fn url(&self) -> &str {
        &self.base_url
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        let mut request = self.http.get(url);
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }
        request
    }

    fn delete(&self, url: &str) -> reqwest::RequestBuilder {
        let mut request = self.http.delete(url);
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }
        request
    }
}

fn request_error(e: reqwest::Error) -> CatalogError {
    CatalogError::Network(e.to_string())
}

async fn status_error(response: reqwest::Response) -> CatalogError {
    let status = response.status().as_u16();
    let message = response.text().await.unwrap_or_default();
    CatalogError::Http { status, message }
}

#[async_trait]
impl Catalog for HttpCatalog {
    async fn fetch_page(&self, query: &TrackQuery) -> Result<TrackPage> {
        let url = format!("{}/music/getPageList", self.base_url);
        debug!(url = %url, page = query.page, page_size = query.page_size, "Fetching catalog page");

        let mut params: Vec<(&str, String)> = vec![
            ("nCurrent", query.page.to_string()),
            ("nSize", query.page_size.to_string()),
        ];
        if let Some(title) = &query.title {
            params.push(("title", title.clone()));
        }

        let response = self
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(request_error)?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let envelope: ApiEnvelope<PageData> = response
            .json()
            .await
            .map_err(|e| CatalogError::parse(format!("Failed to parse page response: {}", e)))?;

        if !envelope.success {
            return Err(CatalogError::Rejected(envelope.message));
        }

        let data = envelope
            .data
            .ok_or_else(|| CatalogError::parse("Page response missing data payload"))?;

        debug!(
            records = data.records.len(),
            total = data.total,
            "Fetched catalog page"
        );

        Ok(TrackPage {
            tracks: data.records.into_iter().map(Track::from).collect(),
            page: data.current,
            page_size: data.size,
            total: data.total,
        })
    }

    async fn fetch_audio(&self, track_id: &str) -> Result<Bytes> {
        let url = format!("{}/music/play", self.base_url);
        debug!(url = %url, track_id = %track_id, "Fetching track audio");

        let response = self
            .get(&url)
            .query(&[("id", track_id)])
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();

        if status.is_success() {
            let bytes = response.bytes().await.map_err(request_error)?;
            debug!(track_id = %track_id, bytes = bytes.len(), "Fetched track audio");
            Ok(bytes)
        } else if status.as_u16() == 404 {
            Err(CatalogError::TrackNotFound(track_id.to_string()))
        } else {
            Err(status_error(response).await)
        }
    }

    async fn delete_track(&self, track_id: &str) -> Result<()> {
        let url = format!("{}/music/delete", self.base_url);
        debug!(url = %url, track_id = %track_id, "Deleting track");

        let response = self
            .delete(&url)
            .query(&[("id", track_id)])
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();

        if status.is_success() {
            let envelope: ApiEnvelope<serde_json::Value> =
                response.json().await.map_err(|e| {
                    CatalogError::parse(format!("Failed to parse delete response: {}", e))
                })?;

            if envelope.success {
                debug!(track_id = %track_id, "Track deleted");
                Ok(())
            } else {
                warn!(track_id = %track_id, message = %envelope.message, "Catalog refused deletion");
                Err(CatalogError::Rejected(envelope.message))
            }
        } else if status.as_u16() == 404 {
            // Already deleted, that's fine
            debug!(track_id = %track_id, "Track already absent");
            Ok(())
        } else {
            Err(status_error(response).await)
        }
    }
}
