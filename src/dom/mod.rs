//! Headless document model
//!
//! A retained node tree standing in for the browser DOM: elements with a
//! tag, class list, attributes, typed inline style, text, a disabled flag,
//! and a layout rectangle assigned by [`layout`]. Windows, columns, list
//! rows and dialogs are all plain nodes; their state (floating vs docked,
//! selected, collapsed) is expressed through classes and attributes exactly
//! as a stylesheet-driven UI would.
//!
//! ## Node identity
//!
//! Nodes live in a generational arena. A [`NodeId`] that outlives its node
//! never aliases a newer node that reused the slot: every lookup checks the
//! generation, so stale ids simply resolve to nothing.

pub mod classes;
pub mod dump;
pub mod hit_test;
pub mod layout;

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use crate::error::DomError;
use crate::geometry::Rect;

pub use dump::dump;
pub use hit_test::{element_from_point, elements_from_point};
pub use layout::{layout, LayoutMetrics};

/// Stable handle to a node in a [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

/// CSS-like positioning override
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Positioning {
    /// Taken out of flow and placed at `left`/`top` in viewport coordinates
    Fixed,
}

/// Hit-testing participation, inherited by descendants unless overridden
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvents {
    Auto,
    None,
}

/// Inline style properties the toolkit manipulates
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InlineStyle {
    pub position: Option<Positioning>,
    pub left: Option<f32>,
    pub top: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub pointer_events: Option<PointerEvents>,
    /// Width pinned for the duration of a drag (`--drag-w`)
    pub drag_width: Option<f32>,
}

impl InlineStyle {
    /// True when none of the drag-only properties are set
    pub fn is_free_of_drag_styling(&self) -> bool {
        self.position.is_none()
            && self.left.is_none()
            && self.top.is_none()
            && self.width.is_none()
            && self.pointer_events.is_none()
            && self.drag_width.is_none()
    }

    /// Clear position, offsets, width, pointer-events and the pinned width
    pub fn clear_positioning(&mut self) {
        self.position = None;
        self.left = None;
        self.top = None;
        self.width = None;
        self.pointer_events = None;
        self.drag_width = None;
    }
}

/// A single element
#[derive(Debug, Clone)]
pub struct Node {
    pub tag: String,
    pub classes: BTreeSet<String>,
    pub attrs: BTreeMap<String, String>,
    pub style: InlineStyle,
    pub text: Option<String>,
    pub disabled: bool,
    pub rect: Rect,
    element_id: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            classes: BTreeSet::new(),
            attrs: BTreeMap::new(),
            style: InlineStyle::default(),
            text: None,
            disabled: false,
            rect: Rect::default(),
            element_id: None,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn element_id(&self) -> Option<&str> {
        self.element_id.as_deref()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// The node tree plus its live id index and focus
#[derive(Debug)]
pub struct Document {
    slots: Vec<Slot>,
    free: Vec<u32>,
    ids: HashMap<String, NodeId>,
    body: NodeId,
    focused: Option<NodeId>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document with a `body` root
    pub fn new() -> Self {
        let mut doc = Self {
            slots: Vec::new(),
            free: Vec::new(),
            ids: HashMap::new(),
            body: NodeId {
                index: 0,
                generation: 0,
            },
            focused: None,
        };
        doc.body = doc.create_element("body");
        doc
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    // ========================================================================
    // Creation and lookup
    // ========================================================================

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let node = Node::new(tag);
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            NodeId {
                index,
                generation: slot.generation,
            }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            NodeId {
                index,
                generation: 0,
            }
        }
    }

    /// Create a detached element carrying the given classes
    pub fn element(&mut self, tag: &str, classes: &[&str]) -> NodeId {
        let id = self.create_element(tag);
        for class in classes {
            self.add_class(id, class);
        }
        id
    }

    /// Create a detached element with classes and text content
    pub fn text_element(&mut self, tag: &str, classes: &[&str], text: impl Into<String>) -> NodeId {
        let id = self.element(tag, classes);
        self.set_text(id, text);
        id
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    pub fn exists(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.node(id).map(|n| n.tag.as_str())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Number of live nodes (attached or not)
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.node.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ========================================================================
    // Tree mutation
    // ========================================================================

    /// Append `child` as the last child of `parent`, moving it if attached
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.check_insert(parent, child)?;
        self.detach(child);
        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.node_mut(parent) {
            node.children.push(child);
        }
        Ok(())
    }

    /// Insert `child` before `reference`, which must be a child of `parent`
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: NodeId,
    ) -> Result<(), DomError> {
        self.check_insert(parent, child)?;
        if child == reference {
            return Ok(());
        }
        if self.parent(reference) != Some(parent) {
            return Err(DomError::NotAChild { parent, reference });
        }
        self.detach(child);
        let position = self
            .children(parent)
            .iter()
            .position(|c| *c == reference)
            .ok_or(DomError::NotAChild { parent, reference })?;
        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.node_mut(parent) {
            node.children.insert(position, child);
        }
        Ok(())
    }

    fn check_insert(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        if !self.exists(parent) {
            return Err(DomError::Missing(parent));
        }
        if !self.exists(child) {
            return Err(DomError::Missing(child));
        }
        if self.contains(child, parent) {
            return Err(DomError::Cycle(child));
        }
        Ok(())
    }

    /// Detach a node from its parent, keeping it (and its subtree) alive
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        if let Some(node) = self.node_mut(parent) {
            node.children.retain(|c| *c != id);
        }
        if let Some(node) = self.node_mut(id) {
            node.parent = None;
        }
    }

    /// Detach and destroy a node and its whole subtree
    pub fn remove(&mut self, id: NodeId) {
        if !self.exists(id) {
            return;
        }
        self.detach(id);
        let mut doomed = vec![id];
        doomed.extend(self.descendants(id));
        for node_id in doomed {
            self.free_slot(node_id);
        }
    }

    /// Destroy all children of a node
    pub fn clear_children(&mut self, id: NodeId) {
        for child in self.children(id).to_vec() {
            self.remove(child);
        }
    }

    fn free_slot(&mut self, id: NodeId) {
        let Some(slot) = self.slots.get_mut(id.index as usize) else {
            return;
        };
        if slot.generation != id.generation {
            return;
        }
        if let Some(node) = slot.node.take() {
            if let Some(element_id) = node.element_id {
                if self.ids.get(&element_id) == Some(&id) {
                    self.ids.remove(&element_id);
                }
            }
        }
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        if self.focused == Some(id) {
            self.focused = None;
        }
    }

    // ========================================================================
    // Traversal
    // ========================================================================

    /// Whether `id` is reachable from the body
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.contains(self.body, id)
    }

    /// Whether `id` is `ancestor` or one of its descendants
    pub fn contains(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node_id) = current {
            if !self.exists(node_id) {
                return false;
            }
            if node_id == ancestor {
                return true;
            }
            current = self.parent(node_id);
        }
        false
    }

    /// Nearest ancestor-or-self matching `predicate`
    pub fn closest(&self, id: NodeId, predicate: impl Fn(&Node) -> bool) -> Option<NodeId> {
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.node(node_id)?;
            if predicate(node) {
                return Some(node_id);
            }
            current = node.parent;
        }
        None
    }

    /// Nearest ancestor-or-self carrying `class`
    pub fn closest_class(&self, id: NodeId, class: &str) -> Option<NodeId> {
        self.closest(id, |node| node.classes.contains(class))
    }

    /// All descendants of `root` in document (pre-)order, excluding `root`
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(root).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    /// Descendants of `root` carrying `class`, in document order
    pub fn descendants_with_class(&self, root: NodeId, class: &str) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|id| self.has_class(*id, class))
            .collect()
    }

    /// Connected nodes carrying `class`, in document order
    pub fn query_class(&self, class: &str) -> Vec<NodeId> {
        self.descendants_with_class(self.body, class)
    }

    // ========================================================================
    // Classes, attributes, text
    // ========================================================================

    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if let Some(node) = self.node_mut(id) {
            node.classes.insert(class.to_string());
        }
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        if let Some(node) = self.node_mut(id) {
            node.classes.remove(class);
        }
    }

    pub fn toggle_class(&mut self, id: NodeId, class: &str, on: bool) {
        if on {
            self.add_class(id, class);
        } else {
            self.remove_class(id, class);
        }
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.node(id).is_some_and(|n| n.classes.contains(class))
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        if let Some(node) = self.node_mut(id) {
            node.attrs.insert(name.to_string(), value.into());
        }
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.node(id)
            .and_then(|n| n.attrs.get(name))
            .map(String::as_str)
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        if let Some(node) = self.node_mut(id) {
            node.attrs.remove(name);
        }
    }

    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) {
        if let Some(node) = self.node_mut(id) {
            node.text = Some(text.into());
        }
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.node(id).and_then(|n| n.text.as_deref())
    }

    pub fn set_disabled(&mut self, id: NodeId, disabled: bool) {
        if let Some(node) = self.node_mut(id) {
            node.disabled = disabled;
        }
    }

    pub fn is_disabled(&self, id: NodeId) -> bool {
        self.node(id).is_some_and(|n| n.disabled)
    }

    // ========================================================================
    // Element ids (live namespace)
    // ========================================================================

    /// Assign an element id, replacing any previous one on this node
    ///
    /// A connected node already indexed under `element_id` keeps the index
    /// entry; lookups fall back to a tree scan when it goes away.
    pub fn set_element_id(&mut self, id: NodeId, element_id: &str) {
        let Some(node) = self.node_mut(id) else {
            return;
        };
        let previous = node.element_id.replace(element_id.to_string());
        if let Some(previous) = previous {
            if self.ids.get(&previous) == Some(&id) {
                self.ids.remove(&previous);
            }
        }
        let shadowed = self
            .ids
            .get(element_id)
            .is_some_and(|holder| *holder != id && self.is_connected(*holder));
        if !shadowed {
            self.ids.insert(element_id.to_string(), id);
        }
    }

    pub fn element_id(&self, id: NodeId) -> Option<&str> {
        self.node(id).and_then(|n| n.element_id.as_deref())
    }

    /// Look up a connected node by element id
    ///
    /// Detached nodes are not part of the live namespace. When the indexed
    /// node is gone or detached, the first connected node in document order
    /// carrying the id answers instead.
    pub fn get_element_by_id(&self, element_id: &str) -> Option<NodeId> {
        let indexed = self
            .ids
            .get(element_id)
            .copied()
            .filter(|id| self.is_connected(*id));
        indexed.or_else(|| {
            self.descendants(self.body)
                .into_iter()
                .find(|id| self.element_id(*id) == Some(element_id))
        })
    }

    // ========================================================================
    // Style, geometry, focus
    // ========================================================================

    pub fn style(&self, id: NodeId) -> Option<&InlineStyle> {
        self.node(id).map(|n| &n.style)
    }

    /// Mutate a node's inline style; a no-op for missing nodes
    pub fn update_style(&mut self, id: NodeId, f: impl FnOnce(&mut InlineStyle)) {
        if let Some(node) = self.node_mut(id) {
            f(&mut node.style);
        }
    }

    /// Layout rectangle from the most recent layout pass
    pub fn rect(&self, id: NodeId) -> Rect {
        self.node(id).map(|n| n.rect).unwrap_or_default()
    }

    pub fn set_rect(&mut self, id: NodeId, rect: Rect) {
        if let Some(node) = self.node_mut(id) {
            node.rect = rect;
        }
    }

    pub fn focus(&mut self, id: NodeId) {
        if self.exists(id) {
            self.focused = Some(id);
        }
    }

    pub fn blur(&mut self) {
        self.focused = None;
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.focused.filter(|id| self.is_connected(*id))
    }
}
