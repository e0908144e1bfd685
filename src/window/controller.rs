//! Per-window handle
//!
//! A [`WindowController`] mutably borrows the workspace, so at most one is
//! alive at a time. `close` consumes it: a closed window can't be touched
//! through a stale handle.

use super::{
    ColumnSide, DialogController, DialogOptions, WindowEvent, WindowEventKind, WindowId,
};
use crate::chat::ChatState;
use crate::dock;
use crate::dom::{classes, Document, NodeId};
use crate::error::DomError;
use crate::form::FormState;
use crate::geometry::Rect;
use crate::list::ListRenderState;
use crate::pubsub::{EventBus, Subscription};
use crate::workspace::Workspace;

#[derive(Debug)]
pub struct WindowController<'a> {
    ws: &'a mut Workspace,
    id: WindowId,
    node: NodeId,
    events: EventBus<WindowEvent>,
}

impl<'a> WindowController<'a> {
    pub(crate) fn new(
        ws: &'a mut Workspace,
        id: WindowId,
        node: NodeId,
        events: EventBus<WindowEvent>,
    ) -> Self {
        Self {
            ws,
            id,
            node,
            events,
        }
    }

    pub fn id(&self) -> &WindowId {
        &self.id
    }

    /// The window's root node
    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn workspace(&mut self) -> &mut Workspace {
        self.ws
    }

    fn title_node(&self) -> Option<NodeId> {
        self.ws.windows.get(&self.id).map(|w| w.title_node)
    }

    pub fn set_title(&mut self, title: &str) {
        if let Some(node) = self.title_node() {
            self.ws.doc.set_text(node, title);
        }
    }

    pub fn title(&self) -> Option<&str> {
        let node = self.title_node()?;
        self.ws.doc.text(node)
    }

    /// Subscribe to `open`, `close` or `resize`
    pub fn on(&self, kind: WindowEventKind, callback: impl Fn(&WindowEvent) + 'static) -> Subscription {
        self.events.on(kind, callback)
    }

    pub fn emit(&self, event: &WindowEvent) {
        self.events.emit(event);
    }

    /// Mount point for caller-supplied content
    pub fn content_el(&self) -> Option<NodeId> {
        self.ws.windows.get(&self.id).map(|w| w.content)
    }

    /// Node the window-type renderer produced
    pub fn body_el(&self) -> Option<NodeId> {
        self.ws.windows.get(&self.id).map(|w| w.body)
    }

    /// Open a dialog nested inside this window
    pub fn open_modal(&mut self, options: DialogOptions) -> Result<DialogController<'_>, DomError> {
        let dialog = self.ws.open_dialog(&self.id, self.node, &options)?;
        Ok(DialogController::new(self.ws, self.id.clone(), dialog))
    }

    pub fn toggle_minimize(&mut self) -> bool {
        self.ws.toggle_minimize(&self.id).unwrap_or(false)
    }

    pub fn is_collapsed(&self) -> bool {
        self.ws.doc.has_class(self.node, classes::COLLAPSED)
    }

    pub fn is_floating(&self) -> bool {
        dock::is_floating(&self.ws.doc, self.node)
    }

    /// Column the window is docked in, `None` while floating
    pub fn column(&self) -> Option<ColumnSide> {
        let parent = self.ws.doc.parent(self.node)?;
        self.ws.column_side(parent)
    }

    pub fn dock(&mut self, side: Option<ColumnSide>) -> Option<ColumnSide> {
        self.ws.dock_window(&self.id, side)
    }

    pub fn undock(&mut self, rect: Option<Rect>) -> bool {
        self.ws.undock_window(&self.id, rect)
    }

    /// Run `f` on the list registered as `element_id` in this window
    pub fn with_list<R>(
        &mut self,
        element_id: &str,
        f: impl FnOnce(&mut ListRenderState, &mut Document) -> R,
    ) -> Option<R> {
        self.ws.with_list(&self.id, element_id, f)
    }

    pub fn with_form<R>(
        &mut self,
        element_id: &str,
        f: impl FnOnce(&mut FormState, &mut Document) -> R,
    ) -> Option<R> {
        self.ws.with_form(&self.id, element_id, f)
    }

    pub fn with_chat<R>(
        &mut self,
        element_id: &str,
        f: impl FnOnce(&mut ChatState, &mut Document) -> R,
    ) -> Option<R> {
        self.ws.with_chat(&self.id, element_id, f)
    }

    /// Tear the window down: notify `close` subscribers, drop them, stop
    /// watching geometry, close dialogs, deregister components, cancel a
    /// drag on it and remove its nodes
    pub fn close(self) {
        self.ws.close_window(&self.id);
    }
}
