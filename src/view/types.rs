//! View types
//!
//! Presentation-only values derived from the controller state.

use crate::types::{Row, Strategy};
use serde::Serialize;
use std::fmt;

/// A displayed column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Column {
    /// Row field the column reads
    pub key: &'static str,
    /// Header text
    pub title: &'static str,
}

impl Column {
    /// Create a column
    pub const fn new(key: &'static str, title: &'static str) -> Self {
        Self { key, title }
    }
}

/// "Page X of Y"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageLabel {
    /// One-based page ordinal
    pub current: u32,
    /// Page count, `None` when unknown
    pub total: Option<u32>,
}

impl fmt::Display for PageLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.total {
            Some(total) => write!(f, "Page {} of {}", self.current, total),
            None => write!(f, "Page {} of unknown", self.current),
        }
    }
}

/// Enablement of the navigation controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Controls {
    pub prev_enabled: bool,
    /// Always on; the end of data is signalled separately
    pub next_enabled: bool,
    /// Go-to-page is only offered with random access
    pub go_to_enabled: bool,
    /// Last response was short or empty, or the last known page is shown
    pub end_of_data: bool,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Serialize)]
pub struct ViewModel<'a> {
    pub title: String,
    pub strategy: Strategy,
    pub page_size: u32,
    pub page: PageLabel,
    pub controls: Controls,
    pub columns: Vec<Column>,
    pub rows: &'a [Row],
    #[serde(rename = "durationMs")]
    pub duration_ms: f64,
    pub loading: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'a str>,
}
