//! Vertical resize and minimize
//!
//! Dragging a window's bottom handle changes its inline height, clamped to
//! the configured bounds. The height is persisted once, when the resize
//! ends, never while it is in progress.

use crate::config::ToolkitConfig;
use crate::dom::{classes, Document, NodeId};
use crate::geometry::Point;
use crate::store::{height_key, KeyValueStore};

const RESIZING: &str = "resizing";
const PREV_HEIGHT_ATTR: &str = "data-prev-height";

#[derive(Debug, Clone, PartialEq)]
pub struct ResizeSession {
    pub window: NodeId,
    pub start_height: f32,
    pub start_y: f32,
}

/// At most one resize in progress
#[derive(Debug, Default)]
pub struct ResizeTracker {
    session: Option<ResizeSession>,
}

impl ResizeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> Option<&ResizeSession> {
        self.session.as_ref()
    }

    pub fn is_resizing(&self) -> bool {
        self.session.is_some()
    }

    /// Start when `target` is a resize handle of an expanded window
    pub fn pointer_down(&mut self, doc: &mut Document, target: NodeId, point: Point) -> bool {
        if self.session.is_some() {
            return false;
        }
        let Some(window) = doc
            .closest_class(target, classes::RESIZER)
            .and_then(|handle| doc.closest_class(handle, classes::WINDOW))
        else {
            return false;
        };
        if doc.has_class(window, classes::COLLAPSED) {
            return false;
        }

        doc.add_class(window, RESIZING);
        self.session = Some(ResizeSession {
            window,
            start_height: doc.rect(window).height,
            start_y: point.y,
        });
        true
    }

    /// Apply the clamped height for the current pointer position
    pub fn pointer_move(&mut self, doc: &mut Document, point: Point, config: &ToolkitConfig) -> bool {
        let Some(session) = &self.session else {
            return false;
        };
        let height = config.clamp_height(session.start_height + (point.y - session.start_y));
        doc.update_style(session.window, |s| s.height = Some(height));
        true
    }

    /// End the resize and persist the final height under the window's id
    pub fn pointer_up(&mut self, doc: &mut Document, store: &mut dyn KeyValueStore) -> Option<f32> {
        let session = self.session.take()?;
        doc.remove_class(session.window, RESIZING);
        let height = doc
            .style(session.window)
            .and_then(|s| s.height)
            .unwrap_or(session.start_height);

        if let Some(id) = doc.element_id(session.window) {
            if let Err(e) = store.set(&height_key(id), height.round().to_string()) {
                tracing::warn!(target: "resize", "failed to persist height for {}: {}", id, e);
            } else {
                tracing::debug!(target: "resize", window = id, height, "persisted height");
            }
        }
        Some(height)
    }

    /// Forget a session targeting `window` without persisting
    pub fn forget_window(&mut self, window: NodeId) {
        if self.session.as_ref().is_some_and(|s| s.window == window) {
            self.session = None;
        }
    }
}

/// Height previously persisted for `window_id`, if parseable
pub fn restore_height(store: &dyn KeyValueStore, window_id: &str, config: &ToolkitConfig) -> Option<f32> {
    let raw = store.get(&height_key(window_id))?;
    match raw.trim().parse::<f32>() {
        Ok(height) if height.is_finite() && height > 0.0 => Some(config.clamp_height(height)),
        _ => {
            tracing::warn!(target: "resize", window = window_id, raw, "ignoring invalid persisted height");
            None
        }
    }
}

/// Collapse or expand a window; returns the new collapsed state
///
/// Collapsing remembers the explicit height so expanding restores it.
pub fn toggle_minimize(doc: &mut Document, window: NodeId, button: Option<NodeId>) -> bool {
    let collapse = !doc.has_class(window, classes::COLLAPSED);
    if collapse {
        if let Some(height) = doc.style(window).and_then(|s| s.height) {
            doc.set_attr(window, PREV_HEIGHT_ATTR, height.to_string());
        }
        doc.update_style(window, |s| s.height = None);
        doc.add_class(window, classes::COLLAPSED);
    } else {
        let previous = doc
            .attr(window, PREV_HEIGHT_ATTR)
            .and_then(|h| h.parse::<f32>().ok());
        doc.remove_attr(window, PREV_HEIGHT_ATTR);
        doc.update_style(window, |s| s.height = previous);
        doc.remove_class(window, classes::COLLAPSED);
    }
    if let Some(button) = button {
        doc.set_attr(button, "aria-pressed", collapse.to_string());
    }
    collapse
}
