//! Mounted component registry
//!
//! Every stateful component living inside a window is registered under
//! `(window id, element id)`. Closing a window deregisters all of its
//! entries, so nothing outlives the window it was mounted in.

use std::collections::BTreeMap;

use crate::chat::ChatState;
use crate::dom::{Document, NodeId};
use crate::form::FormState;
use crate::list::{ListHit, ListRenderState};
use crate::window::WindowId;

/// A stateful component mounted in a window body
#[derive(Debug)]
pub enum Component {
    List(ListRenderState),
    Form(FormState),
    Chat(ChatState),
}

impl Component {
    pub fn root(&self) -> NodeId {
        match self {
            Component::List(list) => list.root(),
            Component::Form(form) => form.root(),
            Component::Chat(chat) => chat.root(),
        }
    }

    /// Reflect component state that can change outside a render call
    pub fn sync(&mut self, doc: &mut Document) {
        match self {
            Component::List(_) => {}
            Component::Form(form) => form.sync(doc),
            Component::Chat(chat) => chat.sync(doc),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Component::List(_) => "list",
            Component::Form(_) => "form",
            Component::Chat(_) => "chat",
        }
    }
}

pub type ComponentKey = (WindowId, String);

#[derive(Debug, Default)]
pub struct ComponentRegistry {
    entries: BTreeMap<ComponentKey, Component>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `component`, replacing (and returning) any previous entry
    pub fn register(
        &mut self,
        window: &WindowId,
        element_id: impl Into<String>,
        component: Component,
    ) -> Option<Component> {
        let element_id = element_id.into();
        tracing::debug!(target: "components", %window, %element_id, kind = component.kind(), "register");
        self.entries.insert((window.clone(), element_id), component)
    }

    pub fn get(&self, window: &WindowId, element_id: &str) -> Option<&Component> {
        self.entries.get(&(window.clone(), element_id.to_string()))
    }

    pub fn get_mut(&mut self, window: &WindowId, element_id: &str) -> Option<&mut Component> {
        self.entries.get_mut(&(window.clone(), element_id.to_string()))
    }

    pub fn list(&self, window: &WindowId, element_id: &str) -> Option<&ListRenderState> {
        match self.get(window, element_id) {
            Some(Component::List(list)) => Some(list),
            _ => None,
        }
    }

    pub fn list_mut(&mut self, window: &WindowId, element_id: &str) -> Option<&mut ListRenderState> {
        match self.get_mut(window, element_id) {
            Some(Component::List(list)) => Some(list),
            _ => None,
        }
    }

    pub fn form_mut(&mut self, window: &WindowId, element_id: &str) -> Option<&mut FormState> {
        match self.get_mut(window, element_id) {
            Some(Component::Form(form)) => Some(form),
            _ => None,
        }
    }

    pub fn chat_mut(&mut self, window: &WindowId, element_id: &str) -> Option<&mut ChatState> {
        match self.get_mut(window, element_id) {
            Some(Component::Chat(chat)) => Some(chat),
            _ => None,
        }
    }

    /// Element ids registered for `window`
    pub fn element_ids(&self, window: &WindowId) -> Vec<&str> {
        self.entries
            .keys()
            .filter(|(w, _)| w == window)
            .map(|(_, element_id)| element_id.as_str())
            .collect()
    }

    /// Drop every component of `window`; returns how many were removed
    pub fn deregister_window(&mut self, window: &WindowId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|(w, _), _| w != window);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn sync_all(&mut self, doc: &mut Document) {
        for component in self.entries.values_mut() {
            component.sync(doc);
        }
    }

    /// List whose tree contains `target`
    fn list_containing(&mut self, doc: &Document, target: NodeId) -> Option<&mut ListRenderState> {
        self.entries.values_mut().find_map(|component| match component {
            Component::List(list) if doc.contains(list.root(), target) => Some(list),
            _ => None,
        })
    }

    /// Route a click on `target` to the list whose tree contains it
    pub fn route_click(&mut self, doc: &mut Document, target: NodeId) -> bool {
        let Some(list) = self.list_containing(doc, target) else {
            return false;
        };
        match list.hit(doc, target) {
            Some(hit) => list.handle_hit(doc, hit),
            None => false,
        }
    }

    /// Route a double click; only rows react to it
    pub fn route_double_click(&mut self, doc: &Document, target: NodeId) -> bool {
        let Some(list) = self.list_containing(doc, target) else {
            return false;
        };
        match list.hit(doc, target) {
            Some(ListHit::Row(key)) => list.double_click_row(&key),
            _ => false,
        }
    }

    /// Route a key press on the focused node `target`
    pub fn route_key(&mut self, doc: &mut Document, target: NodeId, key: &str) -> bool {
        match self.list_containing(doc, target) {
            Some(list) => list.key_press(doc, target, key),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::ListConfig;
    use serde_json::json;

    #[test]
    fn test_deregister_window_drops_only_its_components() {
        let mut doc = Document::new();
        let mut registry = ComponentRegistry::new();
        let a = WindowId::new("a");
        let b = WindowId::new("b");
        for (window, id) in [(&a, "people"), (&a, "teams"), (&b, "people")] {
            let list = ListRenderState::new(&mut doc, ListConfig::default());
            registry.register(window, id, Component::List(list));
        }

        assert_eq!(registry.deregister_window(&a), 2);
        assert_eq!(registry.len(), 1);
        assert!(registry.list(&b, "people").is_some());
        assert!(registry.list(&a, "people").is_none());
    }

    #[test]
    fn test_route_click_selects_row() {
        let mut doc = Document::new();
        let mut registry = ComponentRegistry::new();
        let window = WindowId::new("w");
        let mut list = ListRenderState::new(&mut doc, ListConfig::default());
        list.set_items(&mut doc, vec![json!({"id": 1}), json!({"id": 2})]);
        let row = list.row_node(&"2".into()).unwrap();
        registry.register(&window, "items", Component::List(list));

        assert!(registry.route_click(&mut doc, row));
        let list = registry.list(&window, "items").unwrap();
        assert_eq!(list.get_selection().items(), [&json!({"id": 2})]);
    }

    #[test]
    fn test_route_key_activates_focused_row_only_for_enter_and_space() {
        let mut doc = Document::new();
        let mut registry = ComponentRegistry::new();
        let window = WindowId::new("w");
        let mut list = ListRenderState::new(&mut doc, ListConfig::default());
        list.set_items(&mut doc, vec![json!({"id": 1}), json!({"id": 2})]);
        let row = list.row_node(&"1".into()).unwrap();
        registry.register(&window, "items", Component::List(list));

        assert!(!registry.route_key(&mut doc, row, "Escape"));
        assert!(registry.list(&window, "items").unwrap().get_selection().is_empty());

        assert!(registry.route_key(&mut doc, row, " "));
        let list = registry.list(&window, "items").unwrap();
        assert_eq!(list.get_selection().items(), [&json!({"id": 1})]);
    }
}
