//! Docked ↔ floating transitions
//!
//! Docking picks a column by horizontal center distance and a slot by the
//! same midpoint scan the drag preview uses, so a window docked by button
//! lands where a drag from its current position would have put it.

use crate::dom::{classes, Document, InlineStyle, NodeId, Positioning};
use crate::error::DomError;
use crate::geometry::{insertion_index, nearest_by_center_x, Rect};

pub const MODAL_ATTR: &str = "data-modal";
pub const FADE_ATTR: &str = "data-modal-fade";

/// Whether the window is currently floating
pub fn is_floating(doc: &Document, window: NodeId) -> bool {
    doc.has_class(window, classes::MODAL)
}

/// Fade preference recorded at spawn (absent means fade)
pub fn fade_preference(doc: &Document, window: NodeId) -> bool {
    doc.attr(window, FADE_ATTR) != Some("false")
}

/// Floating wrapper directly around `window`
pub fn modal_wrap(doc: &Document, window: NodeId) -> Option<NodeId> {
    doc.parent(window)
        .filter(|parent| doc.has_class(*parent, classes::MODAL_WRAP))
}

/// Wrap `window` in a floating overlay (with backdrop when `fade`) under the body
pub fn mount_modal(doc: &mut Document, window: NodeId, fade: bool) -> Result<NodeId, DomError> {
    let wrap = doc.element("div", &[classes::MODAL_WRAP]);
    if fade {
        let backdrop = doc.element("div", &[classes::MODAL_BACKDROP]);
        doc.append_child(wrap, backdrop)?;
    }
    doc.append_child(wrap, window)?;
    doc.append_child(doc.body(), wrap)?;
    Ok(wrap)
}

/// Move a window into a column; returns the column it landed in
///
/// Without `target` the column whose center is horizontally closest to the
/// window's center wins. Returns `None` (and changes nothing) when there
/// are no columns.
pub fn dock(
    doc: &mut Document,
    columns: &[NodeId],
    window: NodeId,
    target: Option<NodeId>,
) -> Option<NodeId> {
    let live: Vec<NodeId> = columns
        .iter()
        .copied()
        .filter(|c| doc.is_connected(*c))
        .collect();
    if live.is_empty() {
        tracing::warn!(target: "dock", %window, "no columns mounted, cannot dock");
        return None;
    }

    let rect = doc.rect(window);
    let column = target
        .filter(|c| doc.is_connected(*c))
        .or_else(|| {
            nearest_by_center_x(live.iter().map(|c| doc.rect(*c)), rect.mid_x()).map(|i| live[i])
        })?;

    // Detach before the wrapper goes so the window survives its removal
    let wrap = modal_wrap(doc, window);
    doc.detach(window);
    if let Some(wrap) = wrap {
        doc.remove(wrap);
    }
    doc.remove_class(window, classes::MODAL);
    doc.remove_attr(window, MODAL_ATTR);
    doc.update_style(window, InlineStyle::clear_positioning);

    let siblings: Vec<NodeId> = doc
        .children(column)
        .iter()
        .copied()
        .filter(|c| *c != window && doc.has_class(*c, classes::WINDOW))
        .collect();
    let placed = match insertion_index(siblings.iter().map(|s| doc.rect(*s)), rect.mid_y()) {
        Some(index) => doc.insert_before(column, window, siblings[index]),
        None => doc.append_child(column, window),
    };
    if let Err(e) = placed {
        tracing::warn!(target: "dock", %window, "insert failed ({}), appending", e);
        if doc.append_child(column, window).is_err() {
            return None;
        }
    }

    doc.focus(window);
    tracing::debug!(target: "dock", %window, %column, "docked");
    Some(column)
}

/// Float a docked window at `rect` (default: its current rect)
///
/// Returns the new wrapper, or `None` when the window already floats.
pub fn undock(doc: &mut Document, window: NodeId, rect: Option<Rect>) -> Option<NodeId> {
    if is_floating(doc, window) {
        return None;
    }
    let rect = rect.unwrap_or_else(|| doc.rect(window));
    let fade = fade_preference(doc, window);

    let wrap = match mount_modal(doc, window, fade) {
        Ok(wrap) => wrap,
        Err(e) => {
            tracing::warn!(target: "dock", %window, "undock failed: {}", e);
            return None;
        }
    };
    doc.add_class(window, classes::MODAL);
    doc.set_attr(window, MODAL_ATTR, "true");
    doc.update_style(window, |s| {
        s.position = Some(Positioning::Fixed);
        s.left = Some(rect.x);
        s.top = Some(rect.y);
        s.width = Some(rect.width);
    });
    tracing::debug!(target: "dock", %window, fade, "undocked");
    Some(wrap)
}
