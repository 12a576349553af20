//! View projection and text rendering

use super::types::{Column, Controls, PageLabel, ViewModel};
use crate::controller::ViewState;
use crate::pagination::Position;
use crate::types::{JsonValue, Row, Strategy};
use chrono::{DateTime, Local};

const BASE_COLUMNS: [Column; 3] = [
    Column::new("id", "ID"),
    Column::new("username", "Username"),
    Column::new("createdAt", "Created At"),
];

const JOIN_COLUMNS: [Column; 2] = [Column::new("phone", "Phone"), Column::new("city", "City")];

const ADDRESS_COLUMNS: [Column; 4] = [
    Column::new("street", "Street"),
    Column::new("city", "City"),
    Column::new("state", "State"),
    Column::new("zip", "Zip"),
];

/// Columns shown for a strategy
pub fn columns(strategy: Strategy) -> Vec<Column> {
    let extra: &[Column] = match strategy {
        Strategy::Join => &JOIN_COLUMNS,
        Strategy::MaterializedView => &ADDRESS_COLUMNS,
        _ => &[],
    };
    BASE_COLUMNS.iter().chain(extra).copied().collect()
}

/// Page indicator for the current state
pub fn page_label(state: &ViewState) -> PageLabel {
    PageLabel {
        current: state.position().ordinal(),
        total: state.trusted_total(),
    }
}

/// Control enablement for the current state
pub fn controls(state: &ViewState) -> Controls {
    let short_page = state.rows().len() < state.page_size() as usize;
    let at_last_known = match (state.position(), state.trusted_total()) {
        (Position::Offset { page }, Some(total)) => *page >= total,
        _ => false,
    };

    Controls {
        prev_enabled: state.can_go_prev(),
        next_enabled: true,
        go_to_enabled: !state.strategy().is_keyset(),
        end_of_data: state.has_loaded() && (short_page || at_last_known),
    }
}

/// Build the full view model
pub fn project(state: &ViewState, loading: bool) -> ViewModel<'_> {
    ViewModel {
        title: format!("Paginated Users ({})", state.strategy().wire_name()),
        strategy: state.strategy(),
        page_size: state.page_size(),
        page: page_label(state),
        controls: controls(state),
        columns: columns(state.strategy()),
        rows: state.rows(),
        duration_ms: state.duration_ms(),
        loading,
        error: state.error(),
    }
}

/// Format one cell for display
pub fn format_cell(row: &Row, column: &Column) -> String {
    if column.key == "id" {
        return row.id.to_string();
    }

    match row.field(column.key) {
        None | Some(JsonValue::Null) => String::new(),
        Some(JsonValue::String(s)) if column.key == "createdAt" => format_timestamp(s),
        Some(JsonValue::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Render RFC 3339 timestamps in local time; anything else is shown as-is
fn format_timestamp(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw).map_or_else(
        |_| raw.to_string(),
        |ts| {
            ts.with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        },
    )
}

/// Render rows as a plain-text table
pub fn render_rows(columns: &[Column], rows: &[Row]) -> String {
    let header: Vec<String> = columns.iter().map(|c| c.title.to_string()).collect();
    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|row| columns.iter().map(|c| format_cell(row, c)).collect())
        .collect();

    let widths: Vec<usize> = (0..header.len())
        .map(|i| {
            body.iter()
                .map(|cells| cells[i].chars().count())
                .chain(std::iter::once(header[i].chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let format_line = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut out = format_line(&header);
    out.push('\n');
    out.push_str(
        &widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    out.push('\n');
    for cells in &body {
        out.push_str(&format_line(cells));
        out.push('\n');
    }
    out
}

/// Render the whole view: title, page indicator, status, table and controls
pub fn render_table(model: &ViewModel<'_>) -> String {
    let mut out = String::new();
    out.push_str(&model.title);
    out.push('\n');
    out.push_str(&format!(
        "{}    Request duration: {} ms\n",
        model.page, model.duration_ms
    ));
    if model.loading {
        out.push_str("Loading...\n");
    }
    if let Some(error) = model.error {
        out.push_str(error);
        out.push('\n');
    }

    out.push_str(&render_rows(&model.columns, model.rows));

    if model.rows.is_empty() && model.controls.end_of_data {
        out.push_str("(no further rows)\n");
    }

    let mut hints = Vec::new();
    if model.controls.prev_enabled {
        hints.push("prev");
    }
    if model.controls.next_enabled {
        hints.push("next");
    }
    if model.controls.go_to_enabled {
        hints.push("go N");
    }
    out.push_str(&format!("[{}]\n", hints.join(", ")));
    out
}
