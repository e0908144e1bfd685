//! Window update handlers (titlebar buttons and scripted window operations)

use crate::commands::Cmd;
use crate::messages::WindowMsg;
use crate::workspace::Workspace;

pub fn update_window(ws: &mut Workspace, msg: WindowMsg) -> Option<Cmd> {
    let changed = match msg {
        WindowMsg::ToggleMinimize { id } => ws.toggle_minimize(&id).is_some(),
        WindowMsg::ToggleDock { id } => ws.toggle_dock(&id),
        WindowMsg::Close { id } => ws.close_window(&id),
        WindowMsg::Dock { id, column } => ws.dock_window(&id, column).is_some(),
        WindowMsg::Undock { id } => ws.undock_window(&id, None),
    };
    changed.then_some(Cmd::Redraw)
}
