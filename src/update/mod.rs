//! Update functions for the Elm-style architecture
//!
//! All input-driven state transformations flow through these functions.
//! Every update ends with a workspace layout pass so rects, hit-testing and
//! resize notifications reflect the new tree before the host repaints.

mod app;
mod key;
mod pointer;
mod window;

use crate::commands::Cmd;
use crate::messages::Msg;
use crate::workspace::Workspace;

#[cfg(debug_assertions)]
use tracing::{debug, span, Level};

pub use app::update_app;
pub use key::update_key;
pub use pointer::update_pointer;
pub use window::update_window;

/// Main update function - dispatches to sub-handlers
///
/// In debug builds, this wraps with tracing instrumentation.
/// In release builds, it's a direct dispatch.
#[inline]
pub fn update(ws: &mut Workspace, msg: Msg) -> Option<Cmd> {
    #[cfg(debug_assertions)]
    {
        update_traced(ws, msg)
    }
    #[cfg(not(debug_assertions))]
    {
        update_inner(ws, msg)
    }
}

/// Inner update logic (no tracing)
fn update_inner(ws: &mut Workspace, msg: Msg) -> Option<Cmd> {
    let result = match msg {
        Msg::Pointer(m) => pointer::update_pointer(ws, m),
        Msg::Key(m) => key::update_key(ws, m),
        Msg::Window(m) => window::update_window(ws, m),
        Msg::App(m) => app::update_app(ws, m),
    };

    ws.layout();
    result
}

/// Traced update wrapper (debug builds only)
///
/// Captures column membership before and after and logs the diff.
/// Pointer moves are too frequent to log individually.
#[cfg(debug_assertions)]
fn update_traced(ws: &mut Workspace, msg: Msg) -> Option<Cmd> {
    use crate::messages::PointerMsg;

    let is_noisy = matches!(&msg, Msg::Pointer(PointerMsg::Move { .. }));
    let msg_name = msg_type_name(&msg);
    let _span = if is_noisy {
        None
    } else {
        Some(span!(Level::DEBUG, "update", msg = %msg_name).entered())
    };

    let before = ws.snapshot();
    if !is_noisy {
        debug!(target: "message", msg = %msg_name, "processing");
    }

    let result = update_inner(ws, msg);

    if let Some(diff) = before.diff(&ws.snapshot()) {
        debug!(target: "layout", msg = %msg_name, "{}", diff);
    }
    result
}

/// Display name for a message, e.g. `Window::Close { id: "notes" }`
#[cfg(debug_assertions)]
fn msg_type_name(msg: &Msg) -> String {
    match msg {
        Msg::Pointer(m) => format!("Pointer::{:?}", m),
        Msg::Key(m) => format!("Key::{:?}", m),
        Msg::Window(m) => format!("Window::{:?}", m),
        Msg::App(m) => format!("App::{:?}", m),
    }
}
