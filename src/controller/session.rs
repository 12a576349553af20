//! Fetch orchestration
//!
//! A [`Session`] couples a [`ViewState`] with a [`ListingSource`]. Each user
//! action mutates the state under the lock, takes a ticket, releases the
//! lock, awaits the source and then hands the outcome back to the state,
//! which drops it if a newer trigger has been issued in the meantime.

use super::source::{HttpListingSource, ListingSource};
use super::state::{FetchOutcome, FetchTicket, ViewState};
use crate::config::ViewerConfig;
use crate::error::{Error, Result};
use crate::pagination::Navigation;
use crate::types::{PageSize, Strategy};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;

/// Scoped hold on the in-flight counter; released on drop
struct InFlight {
    counter: Arc<AtomicUsize>,
}

impl InFlight {
    fn acquire(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self {
            counter: Arc::clone(counter),
        }
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Shared handle to one paginated view
#[derive(Clone)]
pub struct Session {
    state: Arc<Mutex<ViewState>>,
    source: Arc<dyn ListingSource>,
    in_flight: Arc<AtomicUsize>,
    timeout: Duration,
}

impl Session {
    /// Create a session over an existing state and source
    pub fn new(state: ViewState, source: Arc<dyn ListingSource>, timeout: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
            source,
            in_flight: Arc::new(AtomicUsize::new(0)),
            timeout,
        }
    }

    /// Create a session talking HTTP to the configured endpoint
    pub fn from_config(config: &ViewerConfig) -> Result<Self> {
        let source = HttpListingSource::from_config(config)?;
        Ok(Self::new(
            ViewState::from_config(config),
            Arc::new(source),
            config.timeout(),
        ))
    }

    /// Whether any fetch is outstanding
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Run a closure against the current state
    pub async fn with_state<R>(&self, f: impl FnOnce(&ViewState) -> R) -> R {
        let state = self.state.lock().await;
        f(&state)
    }

    /// Copy of the current state
    pub async fn snapshot(&self) -> ViewState {
        self.state.lock().await.clone()
    }

    // ========================================================================
    // Triggers
    // ========================================================================

    /// Initial fetch
    pub async fn mount(&self) -> FetchOutcome {
        self.refresh().await
    }

    /// Re-fetch the live position
    pub async fn refresh(&self) -> FetchOutcome {
        let ticket = self.state.lock().await.begin_fetch();
        self.execute(ticket).await
    }

    /// Switch strategy and fetch its first page
    pub async fn set_strategy(&self, strategy: Strategy) -> FetchOutcome {
        // Switching never fails
        self.navigate(|state| Ok(state.set_strategy(strategy)))
            .await
            .unwrap_or(FetchOutcome::Skipped)
    }

    /// Change the page size and fetch the first page
    pub async fn set_page_size(&self, page_size: PageSize) -> Result<FetchOutcome> {
        self.navigate(|state| state.set_page_size(page_size)).await
    }

    /// Next page
    pub async fn go_next(&self) -> Result<FetchOutcome> {
        self.navigate(ViewState::go_next).await
    }

    /// Previous page
    pub async fn go_prev(&self) -> Result<FetchOutcome> {
        self.navigate(ViewState::go_prev).await
    }

    /// Jump to a page of an offset strategy
    pub async fn go_to_page(&self, page: u32) -> Result<FetchOutcome> {
        self.navigate(|state| state.go_to_page(page)).await
    }

    /// Apply a navigation and fetch if it moved the position
    async fn navigate<F>(&self, f: F) -> Result<FetchOutcome>
    where
        F: FnOnce(&mut ViewState) -> Result<Navigation>,
    {
        let ticket = {
            let mut state = self.state.lock().await;
            match f(&mut *state)? {
                Navigation::Moved => state.begin_fetch(),
                Navigation::Unchanged => return Ok(FetchOutcome::Skipped),
            }
        };
        Ok(self.execute(ticket).await)
    }

    async fn execute(&self, ticket: FetchTicket) -> FetchOutcome {
        let _in_flight = InFlight::acquire(&self.in_flight);
        debug!(seq = ticket.seq, request = ?ticket.request, "fetch started");

        let outcome =
            match tokio::time::timeout(self.timeout, self.source.fetch_page(&ticket.request)).await
            {
                Ok(result) => result,
                Err(_) => Err(Error::Timeout {
                    timeout_ms: self.timeout.as_millis() as u64,
                }),
            };

        self.state.lock().await.complete_fetch(&ticket, outcome)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("in_flight", &self.in_flight.load(Ordering::SeqCst))
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
