//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use miniwin::config::ToolkitConfig;
use miniwin::dom::{classes, LayoutMetrics, NodeId};
use miniwin::geometry::Point;
use miniwin::messages::{Msg, PointerMsg};
use miniwin::store::MemoryStore;
use miniwin::update::update;
use miniwin::window::{ColumnSide, WindowConfig, WindowId};
use miniwin::Workspace;

/// Layout without gaps or padding: two 400px columns on an 800x600
/// viewport, windows 200px tall by default
pub fn test_config() -> ToolkitConfig {
    ToolkitConfig {
        layout: LayoutMetrics {
            viewport_width: 800.0,
            viewport_height: 600.0,
            column_gap: 0.0,
            column_padding: 0.0,
            window_gap: 0.0,
            default_window_height: 200.0,
            ..LayoutMetrics::default()
        },
        min_window_height: 100.0,
        ..ToolkitConfig::default()
    }
}

pub fn test_workspace() -> Workspace {
    let mut ws = Workspace::new(test_config(), Box::new(MemoryStore::new()));
    ws.layout();
    ws
}

/// Spawn a plain window with a fixed id into `side`
pub fn spawn_in(ws: &mut Workspace, id: &str, side: ColumnSide) -> WindowId {
    let id = ws
        .spawn(WindowConfig::default().id(id).column(side).dockable(true))
        .expect("spawn")
        .id()
        .clone();
    ws.layout();
    id
}

pub fn node_of(ws: &Workspace, id: &WindowId) -> NodeId {
    ws.window_state(id).expect("live window").node
}

/// Point on the window's title text, clear of the buttons
pub fn title_point(ws: &Workspace, id: &WindowId) -> Point {
    let rect = ws.doc().rect(node_of(ws, id));
    Point::new(rect.x + 10.0, rect.y + 10.0)
}

/// Center of the first node with `class` inside the window
pub fn center_of(ws: &Workspace, id: &WindowId, class: &str) -> Point {
    let node = ws.doc().descendants_with_class(node_of(ws, id), class)[0];
    let rect = ws.doc().rect(node);
    Point::new(rect.mid_x(), rect.mid_y())
}

pub fn pointer(ws: &mut Workspace, msg: PointerMsg) {
    update(ws, Msg::Pointer(msg));
}

pub fn click(ws: &mut Workspace, at: Point) {
    pointer(ws, PointerMsg::Click { x: at.x, y: at.y });
}

/// Press, move through `path`, release at the last point
pub fn drag(ws: &mut Workspace, from: Point, path: &[Point]) {
    pointer(ws, PointerMsg::Down { x: from.x, y: from.y });
    for p in path {
        pointer(ws, PointerMsg::Move { x: p.x, y: p.y });
    }
    let end = path.last().copied().unwrap_or(from);
    pointer(ws, PointerMsg::Up { x: end.x, y: end.y });
}

/// Window ids in `side`, top to bottom
pub fn column_order(ws: &Workspace, side: ColumnSide) -> Vec<String> {
    let column = ws.column(side).expect("column");
    ws.doc()
        .children(column)
        .iter()
        .filter(|c| ws.doc().has_class(**c, classes::WINDOW))
        .filter_map(|c| ws.doc().element_id(*c).map(str::to_string))
        .collect()
}
