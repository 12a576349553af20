//! View projection module
//!
//! Pure functions from controller state to what the user sees: the page
//! indicator, which navigation controls are enabled and the column set of
//! the active strategy. Nothing here holds state of its own.

mod projector;
mod types;

pub use projector::{
    columns, controls, format_cell, page_label, project, render_rows, render_table,
};
pub use types::{Column, Controls, PageLabel, ViewModel};
