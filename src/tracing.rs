//! Debug tracing infrastructure for development diagnostics
//!
//! Provides structured logging with scoped filtering for debugging drag,
//! dock and list state transitions.
//!
//! # Usage
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=drag=debug,layout=debug` - scoped filtering
//! - `RUST_LOG=miniwin::dock=debug` - module-level filtering
//!
//! # Log Files
//!
//! Logs are written to `~/.config/miniwin/logs/miniwin.log` with daily rotation.
//! File logging uses debug level by default for more verbose troubleshooting.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::dom::{classes, Document};

/// Initialize tracing subscriber with console and file logging
///
/// Console output respects RUST_LOG env var for filtering (default `warn`).
/// File logging writes to `~/.config/miniwin/logs/miniwin.log` with daily rotation.
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // Console layer - respects RUST_LOG
    let console_layer = fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    // File layer - always debug level for troubleshooting
    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender = tracing_appender::rolling::daily(logs_dir, "miniwin.log");
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}

/// Lightweight snapshot of column membership for diffing
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutSnapshot {
    /// Window element ids per column, in display order
    pub columns: Vec<ColumnInfo>,
    /// Element ids of floating windows
    pub floating: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnInfo {
    pub name: String,
    pub windows: Vec<String>,
}

fn label(doc: &Document, id: crate::dom::NodeId) -> String {
    doc.element_id(id)
        .map(str::to_string)
        .unwrap_or_else(|| id.to_string())
}

impl LayoutSnapshot {
    pub fn capture(doc: &Document) -> Self {
        let columns = doc
            .query_class(classes::COLUMN)
            .into_iter()
            .map(|column| ColumnInfo {
                name: label(doc, column),
                windows: doc
                    .children(column)
                    .iter()
                    .filter(|c| doc.has_class(**c, classes::WINDOW))
                    .map(|c| label(doc, *c))
                    .collect(),
            })
            .collect();
        let floating = doc
            .query_class(classes::MODAL_WRAP)
            .into_iter()
            .flat_map(|wrap| doc.children(wrap).to_vec())
            .filter(|c| doc.has_class(*c, classes::WINDOW))
            .map(|c| label(doc, c))
            .collect();
        Self { columns, floating }
    }

    /// Generate a diff description between two snapshots
    pub fn diff(&self, other: &LayoutSnapshot) -> Option<String> {
        let mut changes = Vec::new();

        for after in &other.columns {
            let before = self.columns.iter().find(|c| c.name == after.name);
            let before_windows = before.map(|c| c.windows.as_slice()).unwrap_or(&[]);
            if before_windows != after.windows.as_slice() {
                changes.push(format!(
                    "{}: [{}] → [{}]",
                    after.name,
                    before_windows.join(", "),
                    after.windows.join(", ")
                ));
            }
        }

        if self.floating != other.floating {
            changes.push(format!(
                "floating: [{}] → [{}]",
                self.floating.join(", "),
                other.floating.join(", ")
            ));
        }

        if changes.is_empty() {
            None
        } else {
            Some(changes.join("; "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diff_reports_moved_window() {
        let mut doc = Document::new();
        let left = doc.element("div", &[classes::COLUMN]);
        let right = doc.element("div", &[classes::COLUMN]);
        doc.set_element_id(left, "col-left");
        doc.set_element_id(right, "col-right");
        let win = doc.element("div", &[classes::WINDOW]);
        doc.set_element_id(win, "mw-1");
        doc.append_child(doc.body(), left).unwrap();
        doc.append_child(doc.body(), right).unwrap();
        doc.append_child(left, win).unwrap();

        let before = LayoutSnapshot::capture(&doc);
        assert_eq!(before.diff(&before), None);

        doc.append_child(right, win).unwrap();
        let after = LayoutSnapshot::capture(&doc);
        let diff = before.diff(&after).unwrap();
        assert!(diff.contains("col-left: [mw-1] → []"));
        assert!(diff.contains("col-right: [] → [mw-1]"));
    }
}
