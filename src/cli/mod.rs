//! CLI module
//!
//! Command-line interface for browsing a listing endpoint.
//!
//! # Commands
//!
//! - `fetch` - Fetch one page and print it
//! - `browse` - Navigate with next / prev / go / strategy / size commands
//! - `strategies` - List the pagination strategies and their columns

mod commands;
mod runner;

pub use commands::{BrowseCommand, Cli, Commands, OutputFormat};
pub use runner::Runner;
