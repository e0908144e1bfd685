//! Windows: identity, per-window state and the controller handle
//!
//! A window is a subtree in the document (`div.miniwin` with titlebar,
//! content and optional resizer) plus a [`WindowState`] record owned by the
//! workspace. Applications reach a live window through
//! [`WindowController`], which borrows the workspace for as long as it is
//! held.

pub mod config;
pub mod controller;
pub mod dialog;
pub mod registry;
pub mod resize;
mod spawn;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dom::NodeId;
use crate::geometry::Rect;
use crate::pubsub::{Event, EventBus};

pub use config::WindowConfig;
pub use controller::WindowController;
pub use dialog::{DialogController, DialogEvent, DialogEventKind, DialogId, DialogOptions};
pub use registry::{RenderContext, WindowRenderer, WindowTypeRegistry};
pub use resize::{ResizeSession, ResizeTracker};

/// Element id of a window, unique among connected nodes
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(String);

impl WindowId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WindowId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Docking column a window is mounted into
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnSide {
    #[default]
    Left,
    Right,
}

impl ColumnSide {
    /// Element id of the column container
    pub fn element_id(self) -> &'static str {
        match self {
            ColumnSide::Left => "col-left",
            ColumnSide::Right => "col-right",
        }
    }

    pub fn index(self) -> usize {
        match self {
            ColumnSide::Left => 0,
            ColumnSide::Right => 1,
        }
    }
}

impl fmt::Display for ColumnSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnSide::Left => f.write_str("left"),
            ColumnSide::Right => f.write_str("right"),
        }
    }
}

/// Lifecycle notifications of one window
#[derive(Debug, Clone, PartialEq)]
pub enum WindowEvent {
    /// Spawn finished (after the mount hook)
    Open,
    /// The window is being torn down
    Close,
    /// The layout pass gave the window a new rect
    Resize(Rect),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowEventKind {
    Open,
    Close,
    Resize,
}

impl Event for WindowEvent {
    type Kind = WindowEventKind;

    fn kind(&self) -> WindowEventKind {
        match self {
            WindowEvent::Open => WindowEventKind::Open,
            WindowEvent::Close => WindowEventKind::Close,
            WindowEvent::Resize(_) => WindowEventKind::Resize,
        }
    }
}

/// Workspace-side record of a live window
#[derive(Debug)]
pub struct WindowState {
    pub id: WindowId,
    pub window_type: String,
    pub node: NodeId,
    pub title_node: NodeId,
    /// Mount point for caller content (`.content-inner`)
    pub content: NodeId,
    /// Node returned by the window-type renderer
    pub body: NodeId,
    pub minimize_button: NodeId,
    pub dock_button: Option<NodeId>,
    pub resizer: Option<NodeId>,
    pub events: EventBus<WindowEvent>,
    /// Geometry watcher: `Some(last seen rect)` while connected
    pub resize_watch: Option<Option<Rect>>,
    pub dialogs: Vec<dialog::DialogState>,
    pub dockable: bool,
    pub resizable: bool,
}
