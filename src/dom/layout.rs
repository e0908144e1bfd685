//! Flow layout pass
//!
//! Assigns every connected node a rectangle. The rules are a small,
//! deterministic subset of block layout:
//!
//! - The `columns` container splits the viewport width evenly between its
//!   `col` children.
//! - Columns stack their children top to bottom; a window is as tall as its
//!   inline height (or the default), a collapsed window only as tall as its
//!   title bar, and the drop marker has a fixed height.
//! - `position: fixed` nodes leave the flow and sit at `left`/`top`, with
//!   `width` (or the pinned drag width) overriding the flow width.
//! - Modal wrappers and backdrops cover the viewport; floating windows
//!   without explicit offsets are centered.
//! - Everything else is a plain vertical block of `row_height` leaves.

use serde::{Deserialize, Serialize};

use super::classes;
use super::{Document, NodeId, Positioning};
use crate::geometry::Rect;

/// Sizes driving the layout pass
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutMetrics {
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Horizontal gap between columns
    pub column_gap: f32,
    /// Inner padding of each column
    pub column_padding: f32,
    /// Vertical gap between stacked windows
    pub window_gap: f32,
    pub titlebar_height: f32,
    pub button_width: f32,
    pub resizer_height: f32,
    /// Height of a window without an explicit inline height
    pub default_window_height: f32,
    pub drop_marker_height: f32,
    pub row_height: f32,
    /// Width of a floating window without an explicit width
    pub modal_width: f32,
    pub dialog_width: f32,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            viewport_width: 1280.0,
            viewport_height: 800.0,
            column_gap: 12.0,
            column_padding: 12.0,
            window_gap: 12.0,
            titlebar_height: 32.0,
            button_width: 28.0,
            resizer_height: 6.0,
            default_window_height: 320.0,
            drop_marker_height: 8.0,
            row_height: 24.0,
            modal_width: 480.0,
            dialog_width: 360.0,
        }
    }
}

impl LayoutMetrics {
    pub fn viewport(&self) -> Rect {
        Rect::new(0.0, 0.0, self.viewport_width, self.viewport_height)
    }
}

/// Lay out the whole document against the viewport
pub fn layout(doc: &mut Document, metrics: &LayoutMetrics) {
    let body = doc.body();
    let viewport = metrics.viewport();
    doc.set_rect(body, viewport);
    layout_flow(doc, body, viewport, metrics);
}

/// Whether a node fills its parent instead of taking part in the flow
fn fills_parent(doc: &Document, id: NodeId) -> bool {
    [
        classes::COLUMNS,
        classes::MODAL_WRAP,
        classes::MODAL_BACKDROP,
        classes::DIALOG_OVERLAY,
    ]
    .iter()
    .any(|class| doc.has_class(id, class))
}

fn is_fixed(doc: &Document, id: NodeId) -> bool {
    doc.style(id)
        .is_some_and(|s| s.position == Some(Positioning::Fixed))
}

/// Height a node takes in flow
fn intrinsic_height(doc: &Document, id: NodeId, m: &LayoutMetrics) -> f32 {
    if doc.has_class(id, classes::WINDOW) {
        if doc.has_class(id, classes::COLLAPSED) {
            return m.titlebar_height;
        }
        return doc
            .style(id)
            .and_then(|s| s.height)
            .unwrap_or(m.default_window_height);
    }
    if doc.has_class(id, classes::DROP_MARKER) {
        return m.drop_marker_height;
    }
    if let Some(height) = doc.style(id).and_then(|s| s.height) {
        return height;
    }
    let children = doc.children(id);
    if children.is_empty() {
        return m.row_height;
    }
    children
        .iter()
        .filter(|c| !is_fixed(doc, **c) && !fills_parent(doc, **c))
        .map(|c| intrinsic_height(doc, *c, m))
        .sum()
}

/// Rect of an out-of-flow node, falling back to its would-be flow slot
fn positioned_rect(doc: &Document, id: NodeId, fallback: Rect, m: &LayoutMetrics) -> Rect {
    let style = doc.style(id).cloned().unwrap_or_default();
    Rect::new(
        style.left.unwrap_or(fallback.x),
        style.top.unwrap_or(fallback.y),
        style.width.or(style.drag_width).unwrap_or(fallback.width),
        intrinsic_height(doc, id, m),
    )
}

/// Assign `rect` to a node and lay out its children according to its kind
fn place(doc: &mut Document, id: NodeId, rect: Rect, m: &LayoutMetrics) {
    doc.set_rect(id, rect);
    if doc.has_class(id, classes::COLUMNS) {
        layout_columns(doc, id, rect, m);
    } else if doc.has_class(id, classes::COLUMN) {
        layout_column(doc, id, rect, m);
    } else if doc.has_class(id, classes::WINDOW) {
        layout_window(doc, id, rect, m);
    } else if doc.has_class(id, classes::MODAL_WRAP) {
        layout_modal_wrap(doc, id, rect, m);
    } else if doc.has_class(id, classes::DIALOG_OVERLAY) {
        layout_dialog_overlay(doc, id, rect, m);
    } else if doc.has_class(id, classes::TITLEBAR) {
        layout_titlebar(doc, id, rect, m);
    } else {
        layout_flow(doc, id, rect, m);
    }
}

fn layout_flow(doc: &mut Document, parent: NodeId, rect: Rect, m: &LayoutMetrics) {
    let mut y = rect.y;
    for child in doc.children(parent).to_vec() {
        if fills_parent(doc, child) {
            place(doc, child, rect, m);
        } else if is_fixed(doc, child) {
            let fallback = Rect::new(rect.x, y, rect.width, 0.0);
            let child_rect = positioned_rect(doc, child, fallback, m);
            place(doc, child, child_rect, m);
        } else {
            let height = intrinsic_height(doc, child, m);
            place(doc, child, Rect::new(rect.x, y, rect.width, height), m);
            y += height;
        }
    }
}

fn layout_columns(doc: &mut Document, container: NodeId, rect: Rect, m: &LayoutMetrics) {
    let columns: Vec<NodeId> = doc
        .children(container)
        .iter()
        .copied()
        .filter(|c| doc.has_class(*c, classes::COLUMN))
        .collect();
    if columns.is_empty() {
        return;
    }
    let count = columns.len() as f32;
    let width = ((rect.width - m.column_gap * (count - 1.0)) / count).max(0.0);
    for (index, column) in columns.into_iter().enumerate() {
        let x = rect.x + index as f32 * (width + m.column_gap);
        place(doc, column, Rect::new(x, rect.y, width, rect.height), m);
    }
}

fn layout_column(doc: &mut Document, column: NodeId, rect: Rect, m: &LayoutMetrics) {
    let x = rect.x + m.column_padding;
    let width = (rect.width - 2.0 * m.column_padding).max(0.0);
    let mut y = rect.y + m.column_padding;
    for child in doc.children(column).to_vec() {
        if is_fixed(doc, child) {
            let fallback = Rect::new(x, y, width, 0.0);
            let child_rect = positioned_rect(doc, child, fallback, m);
            place(doc, child, child_rect, m);
            continue;
        }
        let height = intrinsic_height(doc, child, m);
        place(doc, child, Rect::new(x, y, width, height), m);
        y += height + m.window_gap;
    }
}

fn layout_window(doc: &mut Document, window: NodeId, rect: Rect, m: &LayoutMetrics) {
    let collapsed = doc.has_class(window, classes::COLLAPSED);
    let title_height = m.titlebar_height.min(rect.height);
    for child in doc.children(window).to_vec() {
        if doc.has_class(child, classes::TITLEBAR) {
            place(
                doc,
                child,
                Rect::new(rect.x, rect.y, rect.width, title_height),
                m,
            );
        } else if doc.has_class(child, classes::CONTENT) {
            let height = if collapsed {
                0.0
            } else {
                (rect.height - title_height).max(0.0)
            };
            place(
                doc,
                child,
                Rect::new(rect.x, rect.y + title_height, rect.width, height),
                m,
            );
        } else if doc.has_class(child, classes::RESIZER) {
            let height = m.resizer_height.min(rect.height);
            place(
                doc,
                child,
                Rect::new(rect.x, rect.bottom() - height, rect.width, height),
                m,
            );
        } else {
            place(doc, child, rect, m);
        }
    }
}

fn layout_titlebar(doc: &mut Document, bar: NodeId, rect: Rect, m: &LayoutMetrics) {
    let actions = doc
        .children(bar)
        .iter()
        .copied()
        .find(|c| doc.has_class(*c, classes::ACTIONS));
    let actions_width = actions
        .map(|a| doc.children(a).len() as f32 * m.button_width)
        .unwrap_or(0.0)
        .min(rect.width);

    for child in doc.children(bar).to_vec() {
        if Some(child) == actions {
            let area = Rect::new(rect.right() - actions_width, rect.y, actions_width, rect.height);
            doc.set_rect(child, area);
            for (index, button) in doc.children(child).to_vec().into_iter().enumerate() {
                let x = area.x + index as f32 * m.button_width;
                place(doc, button, Rect::new(x, rect.y, m.button_width, rect.height), m);
            }
        } else {
            let width = (rect.width - actions_width).max(0.0);
            place(doc, child, Rect::new(rect.x, rect.y, width, rect.height), m);
        }
    }
}

fn layout_modal_wrap(doc: &mut Document, wrap: NodeId, rect: Rect, m: &LayoutMetrics) {
    for child in doc.children(wrap).to_vec() {
        if doc.has_class(child, classes::WINDOW) {
            let style = doc.style(child).cloned().unwrap_or_default();
            let width = style
                .width
                .or(style.drag_width)
                .unwrap_or(m.modal_width)
                .min(rect.width);
            let centered = rect.centered(width, intrinsic_height(doc, child, m));
            let window_rect = if style.left.is_some() || style.top.is_some() {
                positioned_rect(doc, child, centered, m)
            } else {
                centered
            };
            place(doc, child, window_rect, m);
        } else {
            place(doc, child, rect, m);
        }
    }
}

fn layout_dialog_overlay(doc: &mut Document, overlay: NodeId, rect: Rect, m: &LayoutMetrics) {
    for child in doc.children(overlay).to_vec() {
        if doc.has_class(child, classes::DIALOG) {
            let width = m.dialog_width.min(rect.width);
            let dialog_rect = rect.centered(width, intrinsic_height(doc, child, m));
            place(doc, child, dialog_rect, m);
        } else {
            place(doc, child, rect, m);
        }
    }
}
