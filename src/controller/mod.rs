//! Controller module
//!
//! Strategy selection, page-size changes and fetch orchestration.
//!
//! # Overview
//!
//! The controller module provides:
//! - `ViewState` - The single owned state of a paginated view
//! - `Session` - Async orchestrator enforcing last-trigger-wins
//! - `ListingSource` - Seam to the remote listing endpoint
//!
//! A fetch cycle goes `Idle -> Loading -> {Success, Failed} -> Idle`.
//! Triggers are numbered; a result is only applied when its number is still
//! the latest, so a slow response for an abandoned strategy or page can
//! never overwrite newer state.

mod session;
mod source;
mod state;

pub use session::Session;
pub use source::{HttpListingSource, ListingSource};
pub use state::{FetchOutcome, FetchTicket, ViewState};

#[cfg(test)]
mod tests;
