//! Dialogs scoped to a window
//!
//! A dialog overlay is mounted inside the window node, so it moves, docks
//! and closes together with its window.

use serde::{Deserialize, Serialize};

use super::WindowId;
use crate::dom::{classes, Document, NodeId};
use crate::error::DomError;
use crate::pubsub::{Event, EventBus, Subscription};
use crate::workspace::Workspace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DialogId(pub u64);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogOptions {
    pub title: String,
    pub text: Option<String>,
    /// Show a close button in the header
    pub dismissible: bool,
}

impl Default for DialogOptions {
    fn default() -> Self {
        Self {
            title: String::new(),
            text: None,
            dismissible: true,
        }
    }
}

impl DialogOptions {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogEvent {
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialogEventKind {
    Close,
}

impl Event for DialogEvent {
    type Kind = DialogEventKind;

    fn kind(&self) -> DialogEventKind {
        match self {
            DialogEvent::Close => DialogEventKind::Close,
        }
    }
}

#[derive(Debug)]
pub struct DialogState {
    pub id: DialogId,
    pub overlay: NodeId,
    pub title_node: NodeId,
    pub body: NodeId,
    pub close_button: Option<NodeId>,
    pub events: EventBus<DialogEvent>,
}

impl DialogState {
    /// Build the overlay and mount it as the last child of `window`
    pub(crate) fn mount(
        doc: &mut Document,
        window: NodeId,
        id: DialogId,
        options: &DialogOptions,
    ) -> Result<Self, DomError> {
        let overlay = doc.element("div", &[classes::DIALOG_OVERLAY]);
        let dialog = doc.element("div", &[classes::DIALOG]);
        doc.set_attr(dialog, "role", "dialog");
        let header = doc.element("div", &[classes::DIALOG_HEADER]);
        let title_node = doc.text_element("div", &[classes::DIALOG_TITLE], options.title.as_str());
        let body = doc.element("div", &[classes::DIALOG_BODY]);
        if let Some(text) = &options.text {
            doc.set_text(body, text.as_str());
        }

        doc.append_child(overlay, dialog)?;
        doc.append_child(dialog, header)?;
        doc.append_child(header, title_node)?;
        let close_button = if options.dismissible {
            let button = doc.text_element("button", &[classes::ICON_BUTTON, classes::DIALOG_CLOSE], "✕");
            doc.set_attr(button, "aria-label", "Close");
            doc.append_child(header, button)?;
            Some(button)
        } else {
            None
        };
        doc.append_child(dialog, body)?;
        doc.append_child(window, overlay)?;

        Ok(Self {
            id,
            overlay,
            title_node,
            body,
            close_button,
            events: EventBus::new(),
        })
    }

    /// Notify, drop subscribers and remove the overlay
    pub(crate) fn teardown(self, doc: &mut Document) {
        self.events.emit(&DialogEvent::Close);
        self.events.clear();
        doc.remove(self.overlay);
    }
}

/// Handle to an open dialog; same shape as the window controller
pub struct DialogController<'a> {
    ws: &'a mut Workspace,
    window: WindowId,
    id: DialogId,
}

impl<'a> DialogController<'a> {
    pub(crate) fn new(ws: &'a mut Workspace, window: WindowId, id: DialogId) -> Self {
        Self { ws, window, id }
    }

    pub fn id(&self) -> DialogId {
        self.id
    }

    pub fn window_id(&self) -> &WindowId {
        &self.window
    }

    fn state(&self) -> Option<&DialogState> {
        self.ws
            .windows
            .get(&self.window)?
            .dialogs
            .iter()
            .find(|d| d.id == self.id)
    }

    /// Mount point for caller-supplied dialog content
    pub fn body_el(&self) -> Option<NodeId> {
        self.state().map(|d| d.body)
    }

    pub fn overlay(&self) -> Option<NodeId> {
        self.state().map(|d| d.overlay)
    }

    pub fn set_title(&mut self, title: &str) {
        if let Some(node) = self.state().map(|d| d.title_node) {
            self.ws.doc.set_text(node, title);
        }
    }

    pub fn title(&self) -> Option<&str> {
        let node = self.state()?.title_node;
        self.ws.doc.text(node)
    }

    pub fn on(
        &self,
        kind: DialogEventKind,
        callback: impl Fn(&DialogEvent) + 'static,
    ) -> Option<Subscription> {
        self.state().map(|d| d.events.on(kind, callback))
    }

    pub fn emit(&self, event: &DialogEvent) {
        if let Some(dialog) = self.state() {
            dialog.events.emit(event);
        }
    }

    pub fn close(self) -> bool {
        self.ws.close_dialog(&self.window, self.id)
    }
}
