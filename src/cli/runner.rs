//! CLI runner - executes commands

use crate::cli::commands::{BrowseCommand, Cli, Commands, OutputFormat, BROWSE_HELP};
use crate::config::ViewerConfig;
use crate::controller::{HttpListingSource, ListingSource, Session, ViewState};
use crate::error::{Error, Result};
use crate::pagination::PageRequest;
use crate::types::{ResultSet, RowId, Strategy, StrategyFamily};
use crate::view::{columns, project, render_rows, render_table};
use serde_json::json;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Fetch { page, cursor } => self.fetch(*page, *cursor).await,
            Commands::Browse => self.browse().await,
            Commands::Strategies => self.strategies(),
        }
    }

    /// Load the config file (if any) and apply command-line overrides
    pub fn config(&self) -> Result<ViewerConfig> {
        let mut config = match &self.cli.config {
            Some(path) => ViewerConfig::from_file(path)?,
            None => ViewerConfig::default(),
        };

        if let Some(endpoint) = &self.cli.endpoint {
            config.endpoint.clone_from(endpoint);
        }
        if let Some(strategy) = self.cli.strategy {
            config.default_strategy = strategy;
        }
        if let Some(page_size) = self.cli.page_size {
            config.default_page_size = page_size;
        }

        config.validate()?;
        Ok(config)
    }

    // ========================================================================
    // fetch
    // ========================================================================

    async fn fetch(&self, page: Option<u32>, cursor: Option<RowId>) -> Result<()> {
        let config = self.config()?;
        let strategy = config.default_strategy;

        let request = match strategy.family() {
            StrategyFamily::Offset => {
                if cursor.is_some() {
                    return Err(Error::navigation(format!(
                        "'{strategy}' pagination takes --page, not --cursor"
                    )));
                }
                let page = page.unwrap_or(1);
                if page < 1 {
                    return Err(Error::navigation("pages start at 1"));
                }
                PageRequest {
                    strategy,
                    page: Some(page),
                    cursor_id: None,
                    page_size: config.default_page_size,
                }
            }
            StrategyFamily::Keyset => {
                if page.is_some() {
                    return Err(Error::navigation(format!(
                        "'{strategy}' pagination has no random access, use --cursor"
                    )));
                }
                PageRequest {
                    strategy,
                    page: None,
                    cursor_id: cursor,
                    page_size: config.default_page_size,
                }
            }
        };

        let source = HttpListingSource::from_config(&config)?;
        info!(endpoint = %source.endpoint(), method = strategy.wire_name(), "fetching page");
        let result = source.fetch_page(&request).await?;

        println!("{}", self.render_result(strategy, &result)?);
        Ok(())
    }

    fn render_result(&self, strategy: Strategy, result: &ResultSet) -> Result<String> {
        match self.cli.format {
            OutputFormat::Json => Ok(serde_json::to_string(result)?),
            OutputFormat::Pretty => {
                let total = result
                    .total_pages
                    .filter(|_| strategy.reports_total())
                    .map_or_else(|| "unknown".to_string(), |t| t.to_string());
                Ok(format!(
                    "{} rows, {} pages, {} ms\n{}",
                    result.rows.len(),
                    total,
                    result.duration_ms,
                    render_rows(&columns(strategy), &result.rows)
                ))
            }
        }
    }

    // ========================================================================
    // browse
    // ========================================================================

    async fn browse(&self) -> Result<()> {
        let config = self.config()?;
        let session = Session::from_config(&config)?;
        info!(endpoint = %config.endpoint, strategy = %config.default_strategy, "browsing");

        session.mount().await;
        self.print_view(&session).await?;

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }

            let command = match line.parse::<BrowseCommand>() {
                Ok(command) => command,
                Err(e) => {
                    eprintln!("{e} (type 'help' for commands)");
                    continue;
                }
            };
            debug!(?command, "browse command");

            let outcome = match command {
                BrowseCommand::Quit => break,
                BrowseCommand::Help => {
                    println!("{BROWSE_HELP}");
                    continue;
                }
                BrowseCommand::Next => session.go_next().await,
                BrowseCommand::Prev => session.go_prev().await,
                BrowseCommand::Go(page) => session.go_to_page(page).await,
                BrowseCommand::Strategy(strategy) => Ok(session.set_strategy(strategy).await),
                BrowseCommand::Size(size) => session.set_page_size(size).await,
                BrowseCommand::Refresh => Ok(session.refresh().await),
            };

            match outcome {
                Ok(outcome) => debug!(?outcome, "navigation finished"),
                Err(e) if e.is_navigation() => {
                    eprintln!("{e}");
                    continue;
                }
                Err(e) => return Err(e),
            }

            self.print_view(&session).await?;
        }

        Ok(())
    }

    async fn print_view(&self, session: &Session) -> Result<()> {
        let loading = session.is_loading();
        let format = self.cli.format;
        let rendered = session
            .with_state(|state: &ViewState| {
                let model = project(state, loading);
                match format {
                    OutputFormat::Json => serde_json::to_string(&model).map_err(Error::from),
                    OutputFormat::Pretty => Ok(render_table(&model)),
                }
            })
            .await?;

        println!("{rendered}");
        Ok(())
    }

    // ========================================================================
    // strategies
    // ========================================================================

    fn strategies(&self) -> Result<()> {
        match self.cli.format {
            OutputFormat::Json => {
                let list: Vec<_> = Strategy::ALL
                    .iter()
                    .map(|s| {
                        json!({
                            "name": s.cli_name(),
                            "method": s.wire_name(),
                            "keyset": s.is_keyset(),
                            "totalPages": s.reports_total(),
                            "columns": columns(*s).iter().map(|c| c.key).collect::<Vec<_>>(),
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&list)?);
            }
            OutputFormat::Pretty => {
                for s in Strategy::ALL {
                    let family = if s.is_keyset() { "keyset" } else { "offset" };
                    let total = if s.reports_total() { "yes" } else { "no" };
                    let cols: Vec<_> = columns(s).iter().map(|c| c.title).collect();
                    println!(
                        "{:<18} method={:<13} family={:<7} total={:<4} columns={}",
                        s.cli_name(),
                        s.wire_name(),
                        family,
                        total,
                        cols.join(", ")
                    );
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_config_overrides() {
        let cli = Cli::parse_from([
            "paged-view",
            "--endpoint",
            "https://example.com/list",
            "--strategy",
            "materialized-view",
            "--page-size",
            "50",
            "strategies",
        ]);
        let config = Runner::new(cli).config().unwrap();

        assert_eq!(config.endpoint, "https://example.com/list");
        assert_eq!(config.default_strategy, Strategy::MaterializedView);
        assert_eq!(config.default_page_size, 50);
    }

    #[test]
    fn test_config_rejects_unknown_page_size() {
        let cli = Cli::parse_from(["paged-view", "--page-size", "7", "browse"]);
        assert!(Runner::new(cli).config().is_err());
    }
}
