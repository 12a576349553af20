//! CLI commands and argument parsing

use crate::error::{Error, Result};
use crate::types::{PageSize, RowId, Strategy};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;

/// Browse a paginated listing endpoint
#[derive(Parser, Debug)]
#[command(name = "paged-view")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Viewer configuration file (YAML or JSON)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Listing endpoint URL (overrides the config file)
    #[arg(short, long, global = true)]
    pub endpoint: Option<String>,

    /// Pagination strategy to start with
    #[arg(short, long, global = true)]
    pub strategy: Option<Strategy>,

    /// Rows per page
    #[arg(short, long, global = true)]
    pub page_size: Option<PageSize>,

    /// Output format
    #[arg(short, long, global = true, default_value = "pretty")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch a single page
    Fetch {
        /// Page number (offset strategies)
        #[arg(long, conflicts_with = "cursor")]
        page: Option<u32>,

        /// Exclusive lower bound row id (keyset strategies)
        #[arg(long)]
        cursor: Option<RowId>,
    },

    /// Navigate interactively, one command per line on stdin
    Browse,

    /// List the available strategies
    Strategies,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one view per line)
    Json,
    /// Human-readable table
    Pretty,
}

/// A line typed in `browse` mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    Next,
    Prev,
    Go(u32),
    Strategy(Strategy),
    Size(PageSize),
    Refresh,
    Help,
    Quit,
}

impl FromStr for BrowseCommand {
    type Err = Error;

    fn from_str(line: &str) -> Result<Self> {
        let mut parts = line.split_whitespace();
        let verb = parts.next().unwrap_or_default().to_ascii_lowercase();
        let arg = parts.next();

        let number = |what: &str| -> Result<u32> {
            arg.ok_or_else(|| Error::Other(format!("'{verb}' needs a {what}")))?
                .parse()
                .map_err(|_| Error::Other(format!("'{verb}' needs a numeric {what}")))
        };

        match verb.as_str() {
            "n" | "next" => Ok(Self::Next),
            "p" | "prev" => Ok(Self::Prev),
            "g" | "go" => Ok(Self::Go(number("page")?)),
            "s" | "strategy" => {
                let name =
                    arg.ok_or_else(|| Error::Other("'strategy' needs a name".to_string()))?;
                Ok(Self::Strategy(name.parse()?))
            }
            "size" => Ok(Self::Size(number("size")?)),
            "r" | "refresh" => Ok(Self::Refresh),
            "h" | "help" | "?" => Ok(Self::Help),
            "q" | "quit" | "exit" => Ok(Self::Quit),
            "" => Err(Error::Other("empty command".to_string())),
            other => Err(Error::Other(format!("unknown command '{other}'"))),
        }
    }
}

/// Help text for browse mode
pub const BROWSE_HELP: &str = "\
commands:
  next | n            next page
  prev | p            previous page
  go N | g N          jump to page N (offset strategies)
  strategy NAME       switch strategy
  size N              change page size
  refresh | r         re-fetch the current page
  quit | q            leave";
