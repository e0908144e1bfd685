//! Application-level update handlers

use crate::commands::Cmd;
use crate::messages::AppMsg;
use crate::workspace::Workspace;

pub fn update_app(ws: &mut Workspace, msg: AppMsg) -> Option<Cmd> {
    match msg {
        AppMsg::Resize { width, height } => {
            if width <= 0.0 || height <= 0.0 {
                tracing::warn!(width, height, "ignoring degenerate viewport size");
                return None;
            }
            ws.set_viewport(width, height);
            Some(Cmd::Redraw)
        }
    }
}
