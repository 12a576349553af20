//! Common types used throughout paged-view
//!
//! This module contains the strategy enumeration, the row and result set
//! shapes returned by the listing endpoint, and a few type aliases.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// Row identifier used as the keyset ordering key
pub type RowId = i64;

/// Number of rows per page
pub type PageSize = u32;

// ============================================================================
// Strategy
// ============================================================================

/// Pagination algorithm the listing endpoint should use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Strategy {
    /// `LIMIT/OFFSET` paging by page number
    #[default]
    #[serde(rename = "offset")]
    Offset,
    /// Seek paging by last seen id, no total
    #[serde(rename = "keyset")]
    Keyset,
    /// Seek paging by last seen id, server also counts pages
    #[serde(rename = "keysetPages")]
    KeysetWithTotal,
    /// Offset paging over a joined listing (adds contact columns)
    #[serde(rename = "join")]
    Join,
    /// Offset paging computed with a row-number window
    #[serde(rename = "rowNum")]
    RowNumber,
    /// Offset paging over a materialized view (adds address columns)
    #[serde(rename = "materialized")]
    MaterializedView,
}

/// How a strategy expresses its position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyFamily {
    /// Random access by page number
    Offset,
    /// Forward-only boundary cursor plus a back-stack
    Keyset,
}

impl Strategy {
    /// Every strategy, in the order they are offered to the user
    pub const ALL: [Strategy; 6] = [
        Strategy::Offset,
        Strategy::Keyset,
        Strategy::KeysetWithTotal,
        Strategy::Join,
        Strategy::RowNumber,
        Strategy::MaterializedView,
    ];

    /// Value sent as the `method` query parameter
    pub fn wire_name(self) -> &'static str {
        match self {
            Strategy::Offset => "offset",
            Strategy::Keyset => "keyset",
            Strategy::KeysetWithTotal => "keysetPages",
            Strategy::Join => "join",
            Strategy::RowNumber => "rowNum",
            Strategy::MaterializedView => "materialized",
        }
    }

    /// Name accepted on the command line
    pub fn cli_name(self) -> &'static str {
        match self {
            Strategy::Offset => "offset",
            Strategy::Keyset => "keyset",
            Strategy::KeysetWithTotal => "keyset-with-total",
            Strategy::Join => "join",
            Strategy::RowNumber => "row-number",
            Strategy::MaterializedView => "materialized-view",
        }
    }

    /// Human-readable title
    pub fn title(self) -> &'static str {
        match self {
            Strategy::Offset => "Offset",
            Strategy::Keyset => "Keyset",
            Strategy::KeysetWithTotal => "Keyset (with total)",
            Strategy::Join => "Join",
            Strategy::RowNumber => "Rownum",
            Strategy::MaterializedView => "Materialized view",
        }
    }

    /// Position representation used by this strategy
    pub fn family(self) -> StrategyFamily {
        match self {
            Strategy::Keyset | Strategy::KeysetWithTotal => StrategyFamily::Keyset,
            Strategy::Offset
            | Strategy::Join
            | Strategy::RowNumber
            | Strategy::MaterializedView => StrategyFamily::Offset,
        }
    }

    /// Check if the strategy uses keyset positions
    pub fn is_keyset(self) -> bool {
        self.family() == StrategyFamily::Keyset
    }

    /// Whether `totalPages` in a response can be trusted for this strategy
    pub fn reports_total(self) -> bool {
        !matches!(self, Strategy::Keyset)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.cli_name())
    }
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim();
        Strategy::ALL
            .into_iter()
            .find(|strategy| {
                strategy.cli_name().eq_ignore_ascii_case(needle)
                    || strategy.wire_name().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| Error::UnknownStrategy {
                name: s.to_string(),
            })
    }
}

// ============================================================================
// Rows and Result Sets
// ============================================================================

/// A single listed record.
///
/// Only `id` is interpreted; every other field is carried for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// Unique, ascending identifier
    pub id: RowId,
    /// Display fields (`username`, `createdAt`, joined columns, ...)
    #[serde(flatten)]
    pub fields: JsonObject,
}

impl Row {
    /// Create a row with no display fields
    pub fn new(id: RowId) -> Self {
        Self {
            id,
            fields: JsonObject::new(),
        }
    }

    /// Add a display field
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Get a display field
    pub fn field(&self, key: &str) -> Option<&JsonValue> {
        self.fields.get(key)
    }
}

/// Raw response body of the listing endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ListingResponse {
    /// Rows of the page; absent means the response is malformed
    #[serde(default)]
    pub data: Option<Vec<Row>>,
    /// Server-side query time
    #[serde(default, rename = "durationMs")]
    pub duration_ms: f64,
    /// Page count, when the strategy computes one
    #[serde(default, rename = "totalPages")]
    pub total_pages: Option<u32>,
}

/// One page of results
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultSet {
    /// Rows in display order
    pub rows: Vec<Row>,
    /// Server-side query time in milliseconds
    #[serde(rename = "durationMs")]
    pub duration_ms: f64,
    /// Page count reported by the server
    #[serde(rename = "totalPages", skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u32>,
}

impl ResultSet {
    /// Create a result set from rows
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            rows,
            ..Default::default()
        }
    }

    /// Set the reported duration
    #[must_use]
    pub fn with_duration(mut self, duration_ms: f64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Set the reported page count
    #[must_use]
    pub fn with_total_pages(mut self, total_pages: u32) -> Self {
        self.total_pages = Some(total_pages);
        self
    }

    /// Id of the first row
    pub fn first_id(&self) -> Option<RowId> {
        self.rows.first().map(|r| r.id)
    }

    /// Id of the last row
    pub fn last_id(&self) -> Option<RowId> {
        self.rows.last().map(|r| r.id)
    }

    /// Check if the page has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl TryFrom<ListingResponse> for ResultSet {
    type Error = Error;

    fn try_from(response: ListingResponse) -> Result<Self> {
        let rows = response
            .data
            .ok_or_else(|| Error::malformed("response has no 'data' field"))?;

        Ok(Self {
            rows,
            duration_ms: response.duration_ms,
            // A zero count carries no information
            total_pages: response.total_pages.filter(|t| *t > 0),
        })
    }
}
