//! Plain-text outline of a document subtree
//!
//! Used by the CLI and handy in failing test output:
//!
//! ```text
//! body [0,0 1280x800]
//!   div#columns.columns [0,0 1280x800]
//!     div#col-left.col [0,0 634x800]
//!       div#mw-1.miniwin (focused) [12,12 610x320] "Inbox"
//! ```

use std::fmt::Write;

use super::{Document, NodeId, PointerEvents, Positioning};

/// Render `root` and its descendants as an indented outline
pub fn dump(doc: &Document, root: NodeId) -> String {
    let mut out = String::new();
    dump_node(doc, root, 0, &mut out);
    out
}

fn dump_node(doc: &Document, id: NodeId, depth: usize, out: &mut String) {
    let Some(node) = doc.node(id) else {
        return;
    };

    let _ = write!(out, "{}{}", "  ".repeat(depth), node.tag);
    if let Some(element_id) = node.element_id() {
        let _ = write!(out, "#{element_id}");
    }
    for class in &node.classes {
        let _ = write!(out, ".{class}");
    }
    if doc.focused() == Some(id) {
        out.push_str(" (focused)");
    }
    if node.disabled {
        out.push_str(" (disabled)");
    }
    if node.style.position == Some(Positioning::Fixed) {
        out.push_str(" (fixed)");
    }
    if node.style.pointer_events == Some(PointerEvents::None) {
        out.push_str(" (no-pointer)");
    }
    let r = node.rect;
    let _ = write!(out, " [{},{} {}x{}]", r.x, r.y, r.width, r.height);
    if let Some(text) = &node.text {
        let _ = write!(out, " {text:?}");
    }
    out.push('\n');

    for child in node.children() {
        dump_node(doc, *child, depth + 1, out);
    }
}
