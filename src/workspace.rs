//! The application context
//!
//! One [`Workspace`] owns everything that would otherwise be ambient state:
//! the document, the column set, the window table, the single drag and
//! resize sessions, the type registries, mounted components and the height
//! store. Create one at startup; dropping it tears everything down.

use std::collections::HashMap;
use std::fmt;

use crate::chat::ChatState;
use crate::components::{Component, ComponentRegistry};
use crate::config::{PersistenceBackend, ToolkitConfig};
use crate::config_paths;
use crate::dock::{self, DockDragEngine};
use crate::dom::{self, classes, Document, NodeId};
use crate::error::DomError;
use crate::fields::FieldRegistry;
use crate::form::FormState;
use crate::geometry::Rect;
use crate::list::ListRenderState;
use crate::store::{JsonFileStore, KeyValueStore, MemoryStore};
use crate::tracing::LayoutSnapshot;
use crate::window::dialog::DialogState;
use crate::window::{
    resize, ColumnSide, DialogController, DialogId, DialogOptions, ResizeTracker, WindowController,
    WindowEvent, WindowId, WindowState, WindowTypeRegistry,
};

pub struct Workspace {
    pub(crate) doc: Document,
    pub(crate) config: ToolkitConfig,
    pub(crate) columns_el: Option<NodeId>,
    pub(crate) columns: Vec<NodeId>,
    pub(crate) windows: HashMap<WindowId, WindowState>,
    pub(crate) drag: DockDragEngine,
    pub(crate) resize: ResizeTracker,
    pub(crate) registry: WindowTypeRegistry,
    pub(crate) fields: FieldRegistry,
    pub(crate) components: ComponentRegistry,
    pub(crate) store: Box<dyn KeyValueStore>,
    next_dialog: u64,
}

impl fmt::Debug for Workspace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut windows: Vec<&WindowId> = self.windows.keys().collect();
        windows.sort();
        f.debug_struct("Workspace")
            .field("nodes", &self.doc.len())
            .field("columns", &self.columns.len())
            .field("windows", &windows)
            .field("components", &self.components.len())
            .field("dragging", &self.drag.is_dragging())
            .finish()
    }
}

impl Workspace {
    /// Workspace with the standard two-column page (`#col-left`, `#col-right`)
    pub fn new(config: ToolkitConfig, store: Box<dyn KeyValueStore>) -> Self {
        let mut doc = Document::new();
        let container = doc.element("div", &[classes::COLUMNS]);
        doc.set_element_id(container, "columns");
        let mut ok = doc.append_child(doc.body(), container).is_ok();
        for side in [ColumnSide::Left, ColumnSide::Right] {
            let column = doc.element("div", &[classes::COLUMN]);
            doc.set_element_id(column, side.element_id());
            ok &= doc.append_child(container, column).is_ok();
        }
        if !ok {
            tracing::warn!("failed to build the column page");
        }
        Self::from_document(doc, config, store)
    }

    /// Wrap an existing page; columns are the nodes carrying the column class
    pub fn from_document(
        mut doc: Document,
        config: ToolkitConfig,
        store: Box<dyn KeyValueStore>,
    ) -> Self {
        let columns = doc.query_class(classes::COLUMN);
        let columns_el = doc.query_class(classes::COLUMNS).into_iter().next();
        let drag = DockDragEngine::new(&mut doc, columns_el, columns.clone());
        tracing::debug!(columns = columns.len(), "workspace ready");
        Self {
            doc,
            config,
            columns_el,
            columns,
            windows: HashMap::new(),
            drag,
            resize: ResizeTracker::new(),
            registry: WindowTypeRegistry::with_builtins(),
            fields: FieldRegistry::with_builtins(),
            components: ComponentRegistry::new(),
            store,
            next_dialog: 0,
        }
    }

    /// Workspace whose height store follows `config.persistence`
    ///
    /// Falls back to an in-memory store when the state file can't be used.
    pub fn open(config: ToolkitConfig) -> Self {
        let store: Box<dyn KeyValueStore> = match config.persistence {
            PersistenceBackend::Memory => Box::new(MemoryStore::new()),
            PersistenceBackend::File => match open_file_store() {
                Some(store) => Box::new(store),
                None => Box::new(MemoryStore::new()),
            },
        };
        Self::new(config, store)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn doc(&self) -> &Document {
        &self.doc
    }

    pub fn doc_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    pub fn config(&self) -> &ToolkitConfig {
        &self.config
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.config.layout.viewport_width = width;
        self.config.layout.viewport_height = height;
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    pub fn columns(&self) -> &[NodeId] {
        &self.columns
    }

    /// Element holding the columns (flagged while a column drag runs)
    pub fn columns_container(&self) -> Option<NodeId> {
        self.columns_el
    }

    /// Column node for `side`: by element id, else by position
    pub fn column(&self, side: ColumnSide) -> Option<NodeId> {
        self.columns
            .iter()
            .copied()
            .find(|c| self.doc.element_id(*c) == Some(side.element_id()))
            .or_else(|| self.columns.get(side.index()).copied())
    }

    /// Inverse of [`Workspace::column`]
    pub fn column_side(&self, column: NodeId) -> Option<ColumnSide> {
        [ColumnSide::Left, ColumnSide::Right]
            .into_iter()
            .find(|side| self.column(*side) == Some(column))
    }

    pub fn window_types(&self) -> &WindowTypeRegistry {
        &self.registry
    }

    pub fn window_types_mut(&mut self) -> &mut WindowTypeRegistry {
        &mut self.registry
    }

    pub fn field_types_mut(&mut self) -> &mut FieldRegistry {
        &mut self.fields
    }

    pub fn components(&self) -> &ComponentRegistry {
        &self.components
    }

    pub fn components_mut(&mut self) -> &mut ComponentRegistry {
        &mut self.components
    }

    /// Run `f` on a mounted component together with the document
    pub fn with_component<R>(
        &mut self,
        window: &WindowId,
        element_id: &str,
        f: impl FnOnce(&mut Component, &mut Document) -> R,
    ) -> Option<R> {
        let component = self.components.get_mut(window, element_id)?;
        Some(f(component, &mut self.doc))
    }

    pub fn with_list<R>(
        &mut self,
        window: &WindowId,
        element_id: &str,
        f: impl FnOnce(&mut ListRenderState, &mut Document) -> R,
    ) -> Option<R> {
        let list = self.components.list_mut(window, element_id)?;
        Some(f(list, &mut self.doc))
    }

    pub fn with_form<R>(
        &mut self,
        window: &WindowId,
        element_id: &str,
        f: impl FnOnce(&mut FormState, &mut Document) -> R,
    ) -> Option<R> {
        let form = self.components.form_mut(window, element_id)?;
        Some(f(form, &mut self.doc))
    }

    pub fn with_chat<R>(
        &mut self,
        window: &WindowId,
        element_id: &str,
        f: impl FnOnce(&mut ChatState, &mut Document) -> R,
    ) -> Option<R> {
        let chat = self.components.chat_mut(window, element_id)?;
        Some(f(chat, &mut self.doc))
    }

    pub fn drag(&self) -> &DockDragEngine {
        &self.drag
    }

    pub fn resize_tracker(&self) -> &ResizeTracker {
        &self.resize
    }

    /// Handle to a live window
    pub fn window(&mut self, id: &WindowId) -> Option<WindowController<'_>> {
        let state = self.windows.get(id)?;
        let (node, events) = (state.node, state.events.clone());
        Some(WindowController::new(self, id.clone(), node, events))
    }

    pub fn window_state(&self, id: &WindowId) -> Option<&WindowState> {
        self.windows.get(id)
    }

    /// Ids of all live windows, sorted
    pub fn window_ids(&self) -> Vec<WindowId> {
        let mut ids: Vec<WindowId> = self.windows.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    /// Window whose subtree contains `node`
    pub fn window_at_node(&self, node: NodeId) -> Option<WindowId> {
        let window = self.doc.closest_class(node, classes::WINDOW)?;
        let id = WindowId::new(self.doc.element_id(window)?);
        self.windows.contains_key(&id).then_some(id)
    }

    pub fn snapshot(&self) -> LayoutSnapshot {
        LayoutSnapshot::capture(&self.doc)
    }

    // ========================================================================
    // Render pass
    // ========================================================================

    /// Sync components, lay out the document and notify watched windows
    /// whose rect changed
    pub fn layout(&mut self) {
        self.components.sync_all(&mut self.doc);
        dom::layout(&mut self.doc, &self.config.layout);

        for state in self.windows.values_mut() {
            let Some(last) = state.resize_watch.as_mut() else {
                continue;
            };
            let rect = self.doc.rect(state.node);
            if *last != Some(rect) {
                *last = Some(rect);
                state.events.emit(&WindowEvent::Resize(rect));
            }
        }
    }

    // ========================================================================
    // Window operations (also reachable through WindowController)
    // ========================================================================

    /// Tear a window down completely; false if it doesn't exist
    pub fn close_window(&mut self, id: &WindowId) -> bool {
        let Some(mut state) = self.windows.remove(id) else {
            return false;
        };

        state.events.emit(&WindowEvent::Close);
        state.events.clear();
        for dialog in state.dialogs.drain(..) {
            dialog.teardown(&mut self.doc);
        }
        let components = self.components.deregister_window(id);
        self.drag.forget_window(&mut self.doc, state.node);
        self.resize.forget_window(state.node);

        let wrap = dock::modal_wrap(&self.doc, state.node);
        self.doc.remove(state.node);
        if let Some(wrap) = wrap {
            self.doc.remove(wrap);
        }
        tracing::info!(window = %id, components, "closed window");
        true
    }

    pub fn toggle_minimize(&mut self, id: &WindowId) -> Option<bool> {
        let state = self.windows.get(id)?;
        Some(resize::toggle_minimize(
            &mut self.doc,
            state.node,
            Some(state.minimize_button),
        ))
    }

    /// Dock into `side`, or the nearest column by center when `None`
    pub fn dock_window(&mut self, id: &WindowId, side: Option<ColumnSide>) -> Option<ColumnSide> {
        let state = self.windows.get(id)?;
        let (node, button) = (state.node, state.dock_button);
        let target = side.and_then(|s| self.column(s));

        let before = self.snapshot();
        let column = dock::dock(&mut self.doc, &self.columns, node, target)?;
        if let Some(button) = button {
            set_dock_button(&mut self.doc, button, false);
        }
        self.log_layout_change("dock", &before);
        self.column_side(column)
    }

    /// Float a docked window at `rect` (default: where it is now)
    pub fn undock_window(&mut self, id: &WindowId, rect: Option<Rect>) -> bool {
        let Some(state) = self.windows.get(id) else {
            return false;
        };
        let (node, button) = (state.node, state.dock_button);

        let before = self.snapshot();
        if dock::undock(&mut self.doc, node, rect).is_none() {
            return false;
        }
        if let Some(button) = button {
            set_dock_button(&mut self.doc, button, true);
        }
        self.log_layout_change("undock", &before);
        true
    }

    /// Dock if floating, undock otherwise
    pub fn toggle_dock(&mut self, id: &WindowId) -> bool {
        let Some(state) = self.windows.get(id) else {
            return false;
        };
        if dock::is_floating(&self.doc, state.node) {
            self.dock_window(id, None).is_some()
        } else {
            self.undock_window(id, None)
        }
    }

    pub(crate) fn open_dialog(
        &mut self,
        window: &WindowId,
        node: NodeId,
        options: &DialogOptions,
    ) -> Result<DialogId, DomError> {
        let Some(state) = self.windows.get_mut(window) else {
            return Err(DomError::Missing(node));
        };
        self.next_dialog += 1;
        let id = DialogId(self.next_dialog);
        let dialog = DialogState::mount(&mut self.doc, state.node, id, options)?;
        state.dialogs.push(dialog);
        tracing::debug!(%window, dialog = id.0, "opened dialog");
        Ok(id)
    }

    pub fn dialog(&mut self, window: &WindowId, id: DialogId) -> Option<DialogController<'_>> {
        let state = self.windows.get(window)?;
        if !state.dialogs.iter().any(|d| d.id == id) {
            return None;
        }
        Some(DialogController::new(self, window.clone(), id))
    }

    pub fn close_dialog(&mut self, window: &WindowId, id: DialogId) -> bool {
        let Some(state) = self.windows.get_mut(window) else {
            return false;
        };
        let Some(index) = state.dialogs.iter().position(|d| d.id == id) else {
            return false;
        };
        let dialog = state.dialogs.remove(index);
        dialog.teardown(&mut self.doc);
        true
    }

    /// Dialog (window, id) whose overlay contains `node`
    pub(crate) fn dialog_at_node(&self, node: NodeId) -> Option<(WindowId, DialogId)> {
        let window = self.window_at_node(node)?;
        let state = self.windows.get(&window)?;
        let dialog = state
            .dialogs
            .iter()
            .find(|d| self.doc.contains(d.overlay, node))?;
        Some((window, dialog.id))
    }

    pub(crate) fn log_layout_change(&self, action: &str, before: &LayoutSnapshot) {
        if let Some(diff) = before.diff(&self.snapshot()) {
            tracing::debug!(target: "layout", action, "{}", diff);
        }
    }
}

/// Glyph and label of the dock toggle for the window's new state
pub(crate) fn set_dock_button(doc: &mut Document, button: NodeId, floating: bool) {
    let (icon, label) = if floating { ("⇲", "Dock") } else { ("⇱", "Undock") };
    doc.set_text(button, icon);
    doc.set_attr(button, "title", label);
    doc.set_attr(button, "aria-label", label);
}

fn open_file_store() -> Option<JsonFileStore> {
    if let Err(e) = config_paths::ensure_config_dir() {
        tracing::warn!("window state falls back to memory: {}", e);
        return None;
    }
    let path = config_paths::window_state_file()?;
    match JsonFileStore::open(&path) {
        Ok(store) => Some(store),
        Err(e) => {
            tracing::warn!(
                "failed to open window state at {}, using memory: {}",
                path.display(),
                e
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_page_has_two_named_columns() {
        let ws = Workspace::new(ToolkitConfig::default(), Box::new(MemoryStore::new()));
        let left = ws.column(ColumnSide::Left).unwrap();
        let right = ws.column(ColumnSide::Right).unwrap();

        assert_ne!(left, right);
        assert_eq!(ws.doc().element_id(left), Some("col-left"));
        assert_eq!(ws.column_side(right), Some(ColumnSide::Right));
        assert_eq!(ws.columns(), &[left, right]);
    }

    #[test]
    fn test_columns_found_by_marker_class_only() {
        let mut doc = Document::new();
        let only = doc.element("div", &[classes::COLUMN]);
        let decoy = doc.element("div", &["sidebar"]);
        doc.append_child(doc.body(), only).unwrap();
        doc.append_child(doc.body(), decoy).unwrap();

        let ws = Workspace::from_document(doc, ToolkitConfig::default(), Box::new(MemoryStore::new()));
        assert_eq!(ws.columns(), &[only]);
        assert_eq!(ws.column(ColumnSide::Left), Some(only));
        assert_eq!(ws.column(ColumnSide::Right), None);
    }
}
