// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # paged-view
//!
//! A client-side controller for browsing a paginated listing endpoint with
//! interchangeable pagination strategies.
//!
//! ## Features
//!
//! - **Six Strategies**: Offset, Keyset, Keyset with total, Join, Rownum, Materialized view
//! - **Keyset Back-Navigation**: Prev works without random access via a boundary stack
//! - **Last-Trigger-Wins Fetching**: Slow responses for abandoned positions are discarded
//! - **Unknown Totals**: Page indicator degrades to "of unknown" for pure keyset
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use paged_view::{config::ViewerConfig, controller::Session, types::Strategy};
//!
//! #[tokio::main]
//! async fn main() -> paged_view::Result<()> {
//!     let session = Session::from_config(&ViewerConfig::default())?;
//!     session.mount().await;
//!
//!     session.set_strategy(Strategy::Keyset).await;
//!     session.go_next().await?;
//!     session.go_prev().await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          Session                             │
//! │  set_strategy  set_page_size  go_next  go_prev  go_to_page   │
//! └──────────────────────────────┬───────────────────────────────┘
//!                                │
//! ┌──────────────┬───────────────┴──┬──────────────┬─────────────┐
//! │  ViewState   │ PositionTracker  │ ListingSource│    View     │
//! ├──────────────┼──────────────────┼──────────────┼─────────────┤
//! │ Strategy     │ Page number      │ HTTP (GET)   │ Page label  │
//! │ Page size    │ Cursor           │ Timeout      │ Controls    │
//! │ Rows         │ Back-stack       │ Rate limit   │ Columns     │
//! │ Seq token    │                  │              │             │
//! └──────────────┴──────────────────┴──────────────┴─────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Viewer configuration
pub mod config;

/// HTTP client with timeout and rate limiting
pub mod http;

/// Position tracking for every strategy
pub mod pagination;

/// View state and fetch orchestration
pub mod controller;

/// Presentation derived from the view state
pub mod view;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use config::ViewerConfig;
pub use controller::{FetchOutcome, ListingSource, Session, ViewState};
pub use pagination::{BoundaryMode, Navigation, PageRequest, Position, PositionTracker};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
