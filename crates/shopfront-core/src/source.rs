//! Remote catalog sources
//!
//! A [`CatalogSource`] performs the single outbound request of an
//! activation. Transport problems are errors; a body that is not a usable
//! product list is still `Ok` and classified by [`RemotePayload`].

use crate::config::ShopfrontConfig;
use crate::error::{FetchError, ShopfrontError};
use async_trait::async_trait;
use reqwest::{Client, Url};
use shopfront_reconcile::RemotePayload;

/// Source of remote catalog snapshots
#[async_trait]
pub trait CatalogSource: Send + Sync + std::fmt::Debug {
    /// Fetch one snapshot
    ///
    /// # Errors
    /// Returns `FetchError` when the endpoint could not be reached or
    /// answered with a non-2xx status.
    async fn fetch(&self) -> Result<RemotePayload, FetchError>;

    /// Short description for logs
    fn describe(&self) -> String;
}

/// `GET {base}/api/products` over HTTP
#[derive(Debug, Clone)]
pub struct HttpCatalogSource {
    client: Client,
    url: Url,
}

impl HttpCatalogSource {
    /// Build from configuration
    ///
    /// # Errors
    /// - `ShopfrontError::Config` if the endpoint URL is invalid
    /// - `ShopfrontError::Client` if the HTTP client cannot be built
    pub fn new(config: &ShopfrontConfig) -> Result<Self, ShopfrontError> {
        config.validate()?;
        let url = config.products_url()?;

        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ShopfrontError::Client(e.to_string()))?;

        Ok(Self { client, url })
    }

    /// Endpoint URL
    #[inline]
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn fetch(&self) -> Result<RemotePayload, FetchError> {
        tracing::debug!(url = %self.url, "fetching remote catalog");

        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(FetchError::transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.bytes().await.map_err(FetchError::transport)?;
        Ok(RemotePayload::from_slice(&body))
    }

    fn describe(&self) -> String {
        self.url.to_string()
    }
}

/// Source used when remote fetching is switched off
///
/// Every fetch fails with [`FetchError::Disabled`], so the store settles on
/// the static catalog with an `offline` signal.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledSource;

#[async_trait]
impl CatalogSource for DisabledSource {
    async fn fetch(&self) -> Result<RemotePayload, FetchError> {
        Err(FetchError::Disabled)
    }

    fn describe(&self) -> String {
        "disabled".to_string()
    }
}
