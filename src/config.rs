//! Viewer configuration
//!
//! Settings for the listing endpoint and the pagination controls. Loaded
//! from YAML or JSON; every field has a default so an empty file is valid.

use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::pagination::BoundaryMode;
use crate::types::{PageSize, Strategy};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Endpoint used when nothing else is configured
pub const DEFAULT_ENDPOINT: &str = "http://localhost:3001/api/pagination";

/// Page sizes offered by default
pub const DEFAULT_PAGE_SIZES: [PageSize; 4] = [5, 10, 25, 50];

// ============================================================================
// Viewer Config
// ============================================================================

/// Complete viewer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Listing endpoint URL
    pub endpoint: String,

    /// Upper bound for one fetch, in milliseconds
    pub timeout_ms: u64,

    /// Page sizes the user may pick from
    pub page_sizes: Vec<PageSize>,

    /// Page size on mount
    pub default_page_size: PageSize,

    /// Strategy on mount
    pub default_strategy: Strategy,

    /// Keyset boundary computation
    pub boundary_mode: BoundaryMode,

    /// Optional client-side rate limit
    pub rate_limit: Option<RateLimiterConfig>,

    /// Override for the user agent header
    pub user_agent: Option<String>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_ms: 10_000,
            page_sizes: DEFAULT_PAGE_SIZES.to_vec(),
            default_page_size: 10,
            default_strategy: Strategy::Offset,
            boundary_mode: BoundaryMode::Derived,
            rate_limit: None,
            user_agent: None,
        }
    }
}

impl ViewerConfig {
    /// Load a config file, choosing the parser from the extension
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let contents = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        let config = if is_json {
            Self::from_json_str(&contents)?
        } else {
            Self::from_yaml_str(&contents)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse YAML
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parse JSON
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check the config for values the controller cannot work with
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.endpoint)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::invalid_value(
                "endpoint",
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }

        if self.timeout_ms == 0 {
            return Err(Error::invalid_value("timeout_ms", "must be positive"));
        }

        if self.page_sizes.is_empty() {
            return Err(Error::invalid_value("page_sizes", "must not be empty"));
        }

        if self.page_sizes.contains(&0) {
            return Err(Error::invalid_value("page_sizes", "sizes must be positive"));
        }

        if !self.allows_page_size(self.default_page_size) {
            return Err(Error::invalid_value(
                "default_page_size",
                format!(
                    "{} is not one of {:?}",
                    self.default_page_size, self.page_sizes
                ),
            ));
        }

        Ok(())
    }

    /// Fetch timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Check if a page size may be selected
    pub fn allows_page_size(&self, size: PageSize) -> bool {
        self.page_sizes.contains(&size)
    }

    /// HTTP client settings derived from this config
    pub fn http_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder().timeout(self.timeout());
        if let Some(rate_limit) = &self.rate_limit {
            builder = builder.rate_limit(rate_limit.clone());
        }
        if let Some(agent) = &self.user_agent {
            builder = builder.user_agent(agent.clone());
        }
        builder.build()
    }
}
