//! Keyboard update handlers
//!
//! Keys go to whatever holds focus. Only list rows react today: Enter and
//! Space activate the focused row like a click.

use crate::commands::Cmd;
use crate::messages::KeyMsg;
use crate::workspace::Workspace;

pub fn update_key(ws: &mut Workspace, msg: KeyMsg) -> Option<Cmd> {
    match msg {
        KeyMsg::Press { key } => {
            let target = ws.doc.focused()?;
            ws.components
                .route_key(&mut ws.doc, target, &key)
                .then_some(Cmd::Redraw)
        }
    }
}
