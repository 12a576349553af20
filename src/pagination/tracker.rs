//! Position tracker
//!
//! Pure state transitions for Prev / Next / Go-to-page. Nothing here
//! performs I/O; callers decide whether to fetch from the returned
//! [`Navigation`].

use super::types::{BoundaryMode, Navigation, PageRequest, Position};
use crate::error::{Error, Result};
use crate::types::{PageSize, Row, Strategy};

/// Tracks the live position for the active strategy
#[derive(Debug, Clone)]
pub struct PositionTracker {
    strategy: Strategy,
    position: Position,
    boundary_mode: BoundaryMode,
    /// Position the displayed rows were fetched for
    displayed: Option<Position>,
}

impl Default for PositionTracker {
    fn default() -> Self {
        Self::new(Strategy::default(), BoundaryMode::default())
    }
}

impl PositionTracker {
    /// Create a tracker on the first page of a strategy
    pub fn new(strategy: Strategy, boundary_mode: BoundaryMode) -> Self {
        Self {
            strategy,
            position: Position::initial(strategy.family()),
            boundary_mode,
            displayed: None,
        }
    }

    /// Active strategy
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Live position
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Boundary computation mode
    pub fn boundary_mode(&self) -> BoundaryMode {
        self.boundary_mode
    }

    /// Whether Prev is enabled
    pub fn can_go_prev(&self) -> bool {
        self.position.can_go_prev()
    }

    /// Back to the first page of the active strategy
    pub fn reset(&mut self) {
        self.position = Position::initial(self.strategy.family());
        self.displayed = None;
    }

    /// Switch strategy; the previous representation is discarded entirely
    pub fn set_strategy(&mut self, strategy: Strategy) {
        self.strategy = strategy;
        self.reset();
    }

    /// Mark the live position as the one the displayed rows belong to
    pub fn mark_displayed(&mut self) {
        self.displayed = Some(self.position.clone());
    }

    /// Move back to the position of the displayed rows.
    ///
    /// Used when a fetch fails so that the live position never runs ahead
    /// of the page on screen.
    pub fn restore_displayed(&mut self) {
        self.position = match &self.displayed {
            Some(position) => position.clone(),
            None => Position::initial(self.strategy.family()),
        };
    }

    /// Request parameters for the live position
    pub fn request(&self, page_size: PageSize) -> PageRequest {
        PageRequest::new(self.strategy, &self.position, page_size)
    }

    /// Advance one page.
    ///
    /// `rows` is the page currently displayed and `total_pages` the trusted
    /// page count, if any.
    pub fn go_next(&mut self, rows: &[Row], total_pages: Option<u32>) -> Result<Navigation> {
        let boundary_mode = self.boundary_mode;
        let displayed = self.displayed.as_ref();

        match &mut self.position {
            Position::Offset { page } => {
                let next = match total_pages {
                    Some(total) => page.saturating_add(1).min(total),
                    None => page.saturating_add(1),
                };
                // A shrunken total can pull the page below 1 otherwise
                let next = next.max(1);
                if next == *page {
                    return Ok(Navigation::Unchanged);
                }
                *page = next;
                Ok(Navigation::Moved)
            }
            Position::Keyset { cursor, back_stack } => {
                // Rows of another position are on screen while a fetch is pending
                if let Some(Position::Keyset {
                    cursor: shown_cursor,
                    back_stack: shown_stack,
                }) = displayed
                {
                    if *shown_cursor != *cursor || *shown_stack != *back_stack {
                        return Ok(Navigation::Unchanged);
                    }
                }

                let (Some(first), Some(last)) = (rows.first(), rows.last()) else {
                    // End of data
                    return Ok(Navigation::Unchanged);
                };

                let shown_from = displayed.and_then(Position::cursor);
                let boundary = match boundary_mode {
                    BoundaryMode::Derived => first.id - 1,
                    BoundaryMode::Recorded => shown_from.unwrap_or(first.id - 1),
                };

                let mut moved = false;
                if back_stack.last() != Some(&boundary) {
                    back_stack.push(boundary);
                    moved = true;
                }
                if *cursor != Some(last.id) {
                    *cursor = Some(last.id);
                    moved = true;
                }

                Ok(if moved {
                    Navigation::Moved
                } else {
                    Navigation::Unchanged
                })
            }
        }
    }

    /// Go back one page
    pub fn go_prev(&mut self) -> Result<Navigation> {
        if !self.position.can_go_prev() {
            return Err(Error::navigation("already on the first page"));
        }

        match &mut self.position {
            Position::Offset { page } => {
                *page -= 1;
            }
            Position::Keyset { cursor, back_stack } => {
                // can_go_prev guarantees a non-empty stack
                let Some(boundary) = back_stack.pop() else {
                    return Err(Error::navigation("back-stack is empty"));
                };
                *cursor = Some(boundary);
            }
        }

        Ok(Navigation::Moved)
    }

    /// Jump to a page (offset strategies only).
    ///
    /// With an unknown total any page from 1 upwards is accepted.
    pub fn go_to_page(&mut self, target: u32, total_pages: Option<u32>) -> Result<Navigation> {
        let Position::Offset { page } = &mut self.position else {
            return Err(Error::navigation(format!(
                "'{}' pagination has no random access",
                self.strategy
            )));
        };

        let upper = total_pages.unwrap_or(u32::MAX);
        if target < 1 || target > upper {
            return Err(Error::navigation(format!(
                "page {target} is outside 1..={upper}"
            )));
        }

        if *page == target {
            return Ok(Navigation::Unchanged);
        }
        *page = target;
        Ok(Navigation::Moved)
    }
}
