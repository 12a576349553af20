//! Pagination types
//!
//! Defines the position representations, navigation outcomes and the
//! request parameters derived from them.

use crate::types::{PageSize, RowId, Strategy, StrategyFamily};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Where the view currently is, in the representation of the active strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Position {
    /// Page number, starting at 1
    Offset {
        /// Current page
        page: u32,
    },
    /// Exclusive lower bound plus the bounds of every page already left behind
    Keyset {
        /// Last row id of the previous page; `None` on the first page
        cursor: Option<RowId>,
        /// Boundaries of earlier pages, most recent last
        back_stack: Vec<RowId>,
    },
}

impl Position {
    /// Initial position for a strategy family
    pub fn initial(family: StrategyFamily) -> Self {
        match family {
            StrategyFamily::Offset => Self::Offset { page: 1 },
            StrategyFamily::Keyset => Self::Keyset {
                cursor: None,
                back_stack: Vec::new(),
            },
        }
    }

    /// Page number when offset-based
    pub fn page(&self) -> Option<u32> {
        match self {
            Self::Offset { page } => Some(*page),
            Self::Keyset { .. } => None,
        }
    }

    /// Cursor when keyset-based
    pub fn cursor(&self) -> Option<RowId> {
        match self {
            Self::Keyset { cursor, .. } => *cursor,
            Self::Offset { .. } => None,
        }
    }

    /// Back-stack when keyset-based (empty otherwise)
    pub fn back_stack(&self) -> &[RowId] {
        match self {
            Self::Keyset { back_stack, .. } => back_stack,
            Self::Offset { .. } => &[],
        }
    }

    /// One-based page ordinal for display
    pub fn ordinal(&self) -> u32 {
        match self {
            Self::Offset { page } => *page,
            Self::Keyset { back_stack, .. } => back_stack.len() as u32 + 1,
        }
    }

    /// Whether a previous page can be reached
    pub fn can_go_prev(&self) -> bool {
        match self {
            Self::Offset { page } => *page > 1,
            Self::Keyset { cursor, back_stack } => cursor.is_some() && !back_stack.is_empty(),
        }
    }
}

/// How the boundary of the page being left is computed on keyset Next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryMode {
    /// `first id - 1`; assumes ids are integers and ascending
    #[default]
    Derived,
    /// The cursor that actually produced the displayed page
    Recorded,
}

/// Outcome of a navigation primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Position changed; one fetch must follow
    Moved,
    /// Nothing changed; no fetch
    Unchanged,
}

impl Navigation {
    /// Check if a fetch should follow
    pub fn needs_fetch(&self) -> bool {
        matches!(self, Self::Moved)
    }
}

/// Parameters for one request to the listing endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Strategy the server should use
    pub strategy: Strategy,
    /// Page number (offset family only)
    pub page: Option<u32>,
    /// Exclusive lower bound (keyset family only; `None` = first page)
    pub cursor_id: Option<RowId>,
    /// Rows per page
    pub page_size: PageSize,
}

impl PageRequest {
    /// Derive a request from a strategy and position
    pub fn new(strategy: Strategy, position: &Position, page_size: PageSize) -> Self {
        Self {
            strategy,
            page: position.page(),
            cursor_id: position.cursor(),
            page_size,
        }
    }

    /// Query parameters for the request.
    ///
    /// `page` is only sent for offset strategies and `cursorId` only for
    /// keyset strategies once a cursor exists.
    pub fn query_params(&self) -> HashMap<String, String> {
        let mut params = HashMap::new();
        params.insert("method".to_string(), self.strategy.wire_name().to_string());
        params.insert("pageSize".to_string(), self.page_size.to_string());

        match self.strategy.family() {
            StrategyFamily::Offset => {
                params.insert("page".to_string(), self.page.unwrap_or(1).to_string());
            }
            StrategyFamily::Keyset => {
                if let Some(cursor) = self.cursor_id {
                    params.insert("cursorId".to_string(), cursor.to_string());
                }
            }
        }

        params
    }
}
