//! Message types for the Elm-style architecture
//!
//! All input reaches the workspace as one of these. Messages are plain data
//! so a host can forward them from any event source, and a script of them
//! can be replayed from JSON.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;
use crate::window::{ColumnSide, WindowId};

/// Pointer input in page coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PointerMsg {
    Down { x: f32, y: f32 },
    Move { x: f32, y: f32 },
    Up { x: f32, y: f32 },
    /// Press and release without movement
    Click { x: f32, y: f32 },
    /// Second click of a double click; the host sends both clicks first
    DoubleClick { x: f32, y: f32 },
    /// The host lost pointer capture mid-gesture
    CaptureLost,
}

impl PointerMsg {
    pub fn point(&self) -> Option<Point> {
        match *self {
            PointerMsg::Down { x, y }
            | PointerMsg::Move { x, y }
            | PointerMsg::Up { x, y }
            | PointerMsg::Click { x, y }
            | PointerMsg::DoubleClick { x, y } => Some(Point::new(x, y)),
            PointerMsg::CaptureLost => None,
        }
    }
}

/// Keyboard input, delivered to the focused node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum KeyMsg {
    /// Key name as the host reports it, e.g. `Enter` or `" "`
    Press { key: String },
}

/// Window operations addressed by id (titlebar buttons, scripts)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WindowMsg {
    ToggleMinimize { id: WindowId },
    ToggleDock { id: WindowId },
    Close { id: WindowId },
    /// Dock into `column`, or the nearest column when omitted
    Dock {
        id: WindowId,
        #[serde(default)]
        column: Option<ColumnSide>,
    },
    Undock { id: WindowId },
}

/// Application-level messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AppMsg {
    /// Viewport resized
    Resize { width: f32, height: f32 },
}

/// Top-level message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Msg {
    Pointer(PointerMsg),
    Key(KeyMsg),
    Window(WindowMsg),
    App(AppMsg),
}
