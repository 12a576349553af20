//! Listing sources
//!
//! The remote listing endpoint is an external collaborator; the controller
//! only sees it through [`ListingSource`].

use crate::config::ViewerConfig;
use crate::error::Result;
use crate::http::HttpClient;
use crate::pagination::PageRequest;
use crate::types::{ListingResponse, ResultSet};
use async_trait::async_trait;
use tracing::debug;

/// Anything that can produce one page for a request
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Fetch a single page
    async fn fetch_page(&self, request: &PageRequest) -> Result<ResultSet>;
}

/// Listing endpoint reached over HTTP
#[derive(Debug)]
pub struct HttpListingSource {
    client: HttpClient,
    endpoint: String,
}

impl HttpListingSource {
    /// Create a source for an endpoint URL
    pub fn new(client: HttpClient, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// Create a source from a viewer config
    pub fn from_config(config: &ViewerConfig) -> Result<Self> {
        let client = HttpClient::with_config(config.http_config())?;
        Ok(Self::new(client, config.endpoint.clone()))
    }

    /// Endpoint URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ListingSource for HttpListingSource {
    async fn fetch_page(&self, request: &PageRequest) -> Result<ResultSet> {
        let query = request.query_params();
        debug!(endpoint = %self.endpoint, ?query, "fetching page");

        let response: ListingResponse = self.client.get_json(&self.endpoint, &query).await?;

        ResultSet::try_from(response)
    }
}
