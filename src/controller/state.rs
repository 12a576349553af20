//! View state and the synchronous half of fetch orchestration
//!
//! `ViewState` owns the strategy, the live position, the page size and the
//! last applied result. Every mutation is synchronous; the only async step
//! (the network call) happens between [`ViewState::begin_fetch`] and
//! [`ViewState::complete_fetch`], which are tied together by a sequence
//! token so that only the most recent trigger can land.

use crate::config::ViewerConfig;
use crate::error::{Error, Result, FETCH_FAILED_MESSAGE};
use crate::pagination::{BoundaryMode, Navigation, PageRequest, Position, PositionTracker};
use crate::types::{PageSize, ResultSet, Row, Strategy};
use tracing::{debug, warn};

/// A fetch that has been issued but not yet applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    /// Monotonically increasing trigger number
    pub seq: u64,
    /// Parameters sent to the endpoint
    pub request: PageRequest,
}

/// What happened to a fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Result applied to the view
    Applied,
    /// Fetch failed; error indicator set, rows and position untouched
    Failed,
    /// A newer trigger superseded this one; result discarded
    Stale,
    /// Navigation did not change anything, no fetch was issued
    Skipped,
}

/// All state of one paginated view
#[derive(Debug, Clone)]
pub struct ViewState {
    tracker: PositionTracker,
    page_size: PageSize,
    page_sizes: Vec<PageSize>,
    rows: Vec<Row>,
    duration_ms: f64,
    total_pages: Option<u32>,
    error: Option<String>,
    error_detail: Option<String>,
    loaded: bool,
    latest_seq: u64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::from_config(&ViewerConfig::default())
    }
}

impl ViewState {
    /// Create the mount-time state from a config
    pub fn from_config(config: &ViewerConfig) -> Self {
        Self::new(
            config.default_strategy,
            config.default_page_size,
            config.page_sizes.clone(),
            config.boundary_mode,
        )
    }

    /// Create a state on the first page
    pub fn new(
        strategy: Strategy,
        page_size: PageSize,
        page_sizes: Vec<PageSize>,
        boundary_mode: BoundaryMode,
    ) -> Self {
        Self {
            tracker: PositionTracker::new(strategy, boundary_mode),
            page_size,
            page_sizes,
            rows: Vec::new(),
            duration_ms: 0.0,
            total_pages: None,
            error: None,
            error_detail: None,
            loaded: false,
            latest_seq: 0,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Active strategy
    pub fn strategy(&self) -> Strategy {
        self.tracker.strategy()
    }

    /// Live position
    pub fn position(&self) -> &Position {
        self.tracker.position()
    }

    /// Rows per page
    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    /// Page sizes the user may pick from
    pub fn page_sizes(&self) -> &[PageSize] {
        &self.page_sizes
    }

    /// Rows of the displayed page
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Server-reported query time of the displayed page
    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    /// User-facing error message of the last failed fetch
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Underlying cause of the last failed fetch
    pub fn error_detail(&self) -> Option<&str> {
        self.error_detail.as_deref()
    }

    /// Whether a result has been applied since the last reset
    pub fn has_loaded(&self) -> bool {
        self.loaded
    }

    /// Sequence number of the most recent trigger
    pub fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    /// Whether Prev is enabled
    pub fn can_go_prev(&self) -> bool {
        self.tracker.can_go_prev()
    }

    /// Page count, only when the active strategy reports a meaningful one
    pub fn trusted_total(&self) -> Option<u32> {
        if self.strategy().reports_total() {
            self.total_pages
        } else {
            None
        }
    }

    /// Request for the live (strategy, position, page size)
    pub fn request(&self) -> PageRequest {
        self.tracker.request(self.page_size)
    }

    // ========================================================================
    // Strategy selector
    // ========================================================================

    /// Switch strategy.
    ///
    /// Position, displayed rows and the page count are all cleared so that
    /// nothing from the old strategy is shown before the new fetch lands.
    pub fn set_strategy(&mut self, strategy: Strategy) -> Navigation {
        if strategy == self.strategy() {
            return Navigation::Unchanged;
        }

        debug!(from = %self.strategy(), to = %strategy, "switching strategy");
        self.tracker.set_strategy(strategy);
        self.clear_results();
        Navigation::Moved
    }

    /// Change the page size; resets the position of either family
    pub fn set_page_size(&mut self, page_size: PageSize) -> Result<Navigation> {
        if !self.page_sizes.contains(&page_size) {
            return Err(Error::InvalidPageSize {
                size: page_size,
                allowed: self.page_sizes.clone(),
            });
        }
        if page_size == self.page_size {
            return Ok(Navigation::Unchanged);
        }

        debug!(from = self.page_size, to = page_size, "changing page size");
        self.page_size = page_size;
        self.tracker.reset();
        self.clear_results();
        Ok(Navigation::Moved)
    }

    fn clear_results(&mut self) {
        self.rows.clear();
        self.total_pages = None;
        self.duration_ms = 0.0;
        self.loaded = false;
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Advance one page
    pub fn go_next(&mut self) -> Result<Navigation> {
        let total = self.trusted_total();
        self.tracker.go_next(&self.rows, total)
    }

    /// Go back one page
    pub fn go_prev(&mut self) -> Result<Navigation> {
        self.tracker.go_prev()
    }

    /// Jump to a page, bounded by the trusted total
    pub fn go_to_page(&mut self, page: u32) -> Result<Navigation> {
        let total = self.trusted_total();
        self.tracker.go_to_page(page, total)
    }

    // ========================================================================
    // Fetch cycle
    // ========================================================================

    /// Issue a new trigger for the live request
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.latest_seq += 1;
        self.error = None;
        FetchTicket {
            seq: self.latest_seq,
            request: self.request(),
        }
    }

    /// Apply the outcome of a fetch if its ticket is still current.
    ///
    /// A ticket is current when no newer trigger has been issued and the
    /// live request still matches the one it was issued for.
    pub fn complete_fetch(
        &mut self,
        ticket: &FetchTicket,
        outcome: Result<ResultSet>,
    ) -> FetchOutcome {
        if ticket.seq != self.latest_seq || ticket.request != self.request() {
            debug!(
                seq = ticket.seq,
                latest = self.latest_seq,
                "discarding stale result"
            );
            return FetchOutcome::Stale;
        }

        match outcome {
            Ok(result) => {
                self.apply(ticket, result);
                FetchOutcome::Applied
            }
            Err(e) => {
                warn!(seq = ticket.seq, error = %e, "fetch failed");
                self.error = Some(FETCH_FAILED_MESSAGE.to_string());
                self.error_detail = Some(e.to_string());
                // Repeating the navigation retries it
                self.tracker.restore_displayed();
                FetchOutcome::Failed
            }
        }
    }

    fn apply(&mut self, ticket: &FetchTicket, result: ResultSet) {
        if result.is_empty() && ticket.request.cursor_id.is_some() {
            debug!(
                cursor = ?ticket.request.cursor_id,
                "keyset page is empty, no further rows"
            );
        }

        self.rows = result.rows;
        self.duration_ms = result.duration_ms;
        if self.strategy().reports_total() {
            // An absent count keeps the last known one
            if let Some(total) = result.total_pages {
                self.total_pages = Some(total);
            }
        } else {
            self.total_pages = None;
        }
        self.error = None;
        self.error_detail = None;
        self.loaded = true;
        self.tracker.mark_displayed();

        debug!(
            seq = ticket.seq,
            rows = self.rows.len(),
            total = ?self.total_pages,
            "applied result"
        );
    }
}
