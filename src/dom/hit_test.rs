//! Topmost-element-at-point queries
//!
//! Paint order is document order, except that out-of-flow content (fixed
//! positioned nodes and everything inside a modal wrapper) paints above the
//! flow. `pointer-events: none` is inherited by descendants unless a
//! descendant sets `auto` again, and such nodes never match.

use super::classes;
use super::{Document, NodeId, PointerEvents, Positioning};
use crate::geometry::Point;

/// All nodes under `point`, topmost first (like `elementsFromPoint`)
pub fn elements_from_point(doc: &Document, point: Point) -> Vec<NodeId> {
    let mut hits: Vec<(u8, usize, NodeId)> = Vec::new();
    let mut order = 0usize;
    // (node, inherited pointer-events, inherited layer)
    let mut stack = vec![(doc.body(), PointerEvents::Auto, 0u8)];

    while let Some((id, inherited_events, inherited_layer)) = stack.pop() {
        let Some(node) = doc.node(id) else {
            continue;
        };
        let events = node.style.pointer_events.unwrap_or(inherited_events);
        let layer = if node.style.position == Some(Positioning::Fixed)
            || node.classes.contains(classes::MODAL_WRAP)
        {
            1
        } else {
            inherited_layer
        };

        if events == PointerEvents::Auto && node.rect.contains(point.x, point.y) {
            hits.push((layer, order, id));
        }
        order += 1;

        for child in node.children().iter().rev() {
            stack.push((*child, events, layer));
        }
    }

    hits.sort_by(|a, b| (b.0, b.1).cmp(&(a.0, a.1)));
    hits.into_iter().map(|(_, _, id)| id).collect()
}

/// The topmost node under `point`
pub fn element_from_point(doc: &Document, point: Point) -> Option<NodeId> {
    elements_from_point(doc, point).into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;

    #[test]
    fn test_deepest_node_is_topmost() {
        let mut doc = Document::new();
        let outer = doc.create_element("div");
        let inner = doc.create_element("div");
        doc.append_child(doc.body(), outer).unwrap();
        doc.append_child(outer, inner).unwrap();
        doc.set_rect(doc.body(), Rect::new(0.0, 0.0, 100.0, 100.0));
        doc.set_rect(outer, Rect::new(0.0, 0.0, 100.0, 100.0));
        doc.set_rect(inner, Rect::new(10.0, 10.0, 20.0, 20.0));

        let hits = elements_from_point(&doc, Point::new(15.0, 15.0));
        assert_eq!(hits, vec![inner, outer, doc.body()]);
        assert_eq!(
            element_from_point(&doc, Point::new(50.0, 50.0)),
            Some(outer)
        );
    }

    #[test]
    fn test_pointer_events_none_is_inherited() {
        let mut doc = Document::new();
        let column = doc.create_element("div");
        let floating = doc.create_element("div");
        let floating_child = doc.create_element("div");
        doc.append_child(doc.body(), column).unwrap();
        doc.append_child(doc.body(), floating).unwrap();
        doc.append_child(floating, floating_child).unwrap();
        for id in [doc.body(), column, floating, floating_child] {
            doc.set_rect(id, Rect::new(0.0, 0.0, 100.0, 100.0));
        }
        doc.update_style(floating, |s| {
            s.position = Some(Positioning::Fixed);
            s.pointer_events = Some(PointerEvents::None);
        });

        assert_eq!(
            element_from_point(&doc, Point::new(5.0, 5.0)),
            Some(column)
        );
    }

    #[test]
    fn test_fixed_content_paints_above_later_flow() {
        let mut doc = Document::new();
        let fixed = doc.create_element("div");
        let flow = doc.create_element("div");
        doc.append_child(doc.body(), fixed).unwrap();
        doc.append_child(doc.body(), flow).unwrap();
        for id in [doc.body(), fixed, flow] {
            doc.set_rect(id, Rect::new(0.0, 0.0, 100.0, 100.0));
        }
        doc.update_style(fixed, |s| s.position = Some(Positioning::Fixed));

        assert_eq!(element_from_point(&doc, Point::new(5.0, 5.0)), Some(fixed));
    }
}
