//! Pointer update handlers
//!
//! A press goes to the resize handle first, then to window dragging. While
//! either gesture runs, moves and the release belong to it. Clicks are
//! routed by the class of what was hit: titlebar buttons, dialog close
//! buttons, then list rows and their actions. Double clicks only reach
//! list rows.

use crate::commands::Cmd;
use crate::dom::{classes, element_from_point, NodeId};
use crate::geometry::Point;
use crate::messages::PointerMsg;
use crate::workspace::Workspace;

pub fn update_pointer(ws: &mut Workspace, msg: PointerMsg) -> Option<Cmd> {
    match msg {
        PointerMsg::Down { x, y } => pointer_down(ws, Point::new(x, y)),
        PointerMsg::Move { x, y } => pointer_move(ws, Point::new(x, y)),
        PointerMsg::Up { x, y } => pointer_up(ws, Point::new(x, y)),
        PointerMsg::Click { x, y } => click(ws, Point::new(x, y)),
        PointerMsg::DoubleClick { x, y } => double_click(ws, Point::new(x, y)),
        PointerMsg::CaptureLost => {
            let resized = ws.resize.pointer_up(&mut ws.doc, ws.store.as_mut()).is_some();
            let aborted = ws.drag.capture_lost(&mut ws.doc);
            (resized || aborted).then_some(Cmd::Redraw)
        }
    }
}

fn pointer_down(ws: &mut Workspace, point: Point) -> Option<Cmd> {
    let target = element_from_point(&ws.doc, point)?;
    if ws.resize.pointer_down(&mut ws.doc, target, point) {
        return Some(Cmd::Redraw);
    }
    ws.drag
        .pointer_down(&mut ws.doc, target, point)
        .then_some(Cmd::Redraw)
}

fn pointer_move(ws: &mut Workspace, point: Point) -> Option<Cmd> {
    if ws.resize.pointer_move(&mut ws.doc, point, &ws.config) {
        return Some(Cmd::Redraw);
    }
    ws.drag.pointer_move(&mut ws.doc, point).then_some(Cmd::Redraw)
}

fn pointer_up(ws: &mut Workspace, point: Point) -> Option<Cmd> {
    if ws.resize.is_resizing() {
        ws.resize.pointer_up(&mut ws.doc, ws.store.as_mut());
        return Some(Cmd::Redraw);
    }
    ws.drag.pointer_up(&mut ws.doc, point).map(|_| Cmd::Redraw)
}

fn click(ws: &mut Workspace, point: Point) -> Option<Cmd> {
    let target = element_from_point(&ws.doc, point)?;

    if let Some(button) = ws.doc.closest_class(target, classes::ICON_BUTTON) {
        if ws.doc.is_disabled(button) {
            return None;
        }
        if let Some(cmd) = titlebar_button(ws, button) {
            return Some(cmd);
        }
    }

    if ws.components.route_click(&mut ws.doc, target) {
        return Some(Cmd::Redraw);
    }
    None
}

fn double_click(ws: &mut Workspace, point: Point) -> Option<Cmd> {
    let target = element_from_point(&ws.doc, point)?;
    ws.components
        .route_double_click(&ws.doc, target)
        .then_some(Cmd::Redraw)
}

fn titlebar_button(ws: &mut Workspace, button: NodeId) -> Option<Cmd> {
    if ws.doc.has_class(button, classes::DIALOG_CLOSE) {
        let (window, dialog) = ws.dialog_at_node(button)?;
        return ws.close_dialog(&window, dialog).then_some(Cmd::Redraw);
    }

    let window = ws.window_at_node(button)?;
    let has = |class| ws.doc.has_class(button, class);
    let (minimize, dock, close) = (
        has(classes::MINIMIZE_BUTTON),
        has(classes::DOCK_TOGGLE_BUTTON),
        has(classes::CLOSE_BUTTON),
    );
    let changed = if minimize {
        ws.toggle_minimize(&window).is_some()
    } else if dock {
        ws.toggle_dock(&window)
    } else if close {
        ws.close_window(&window)
    } else {
        false
    };
    changed.then_some(Cmd::Redraw)
}
