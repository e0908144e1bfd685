//! Building and mounting new windows

use uuid::Uuid;

use super::registry::{content_class, RenderContext};
use super::resize::restore_height;
use super::{WindowConfig, WindowController, WindowEvent, WindowId, WindowState};
use crate::components::Component;
use crate::dock::{self, transition::{FADE_ATTR, MODAL_ATTR}};
use crate::dom::{classes, Document, NodeId};
use crate::error::{DomError, SpawnError};
use crate::pubsub::EventBus;
use crate::workspace::{set_dock_button, Workspace};

/// Nodes of the window chrome that the workspace keeps handles to
struct Chrome {
    node: NodeId,
    title_node: NodeId,
    content: NodeId,
    minimize_button: NodeId,
    dock_button: Option<NodeId>,
    resizer: Option<NodeId>,
}

impl Workspace {
    /// Build a window from `config` and mount it
    pub fn spawn(&mut self, config: WindowConfig) -> Result<WindowController<'_>, SpawnError> {
        self.spawn_with(config, |_| {})
    }

    /// Like [`Workspace::spawn`], running `mount` before `Open` is emitted
    ///
    /// The hook sees a fully mounted window: use it to fill
    /// `content_el()` or subscribe to events that must not miss `Open`.
    pub fn spawn_with(
        &mut self,
        config: WindowConfig,
        mount: impl FnOnce(&mut WindowController<'_>),
    ) -> Result<WindowController<'_>, SpawnError> {
        let renderer = self.registry.get(&config.window_type)?;
        let column = if config.modal {
            None
        } else {
            Some(
                self.column(config.column)
                    .ok_or(SpawnError::MissingColumn(config.column))?,
            )
        };

        let id = self.resolve_id(config.id.as_deref());

        let mut ctx = RenderContext::new(&mut self.doc, &self.fields);
        let rendered = renderer(&config, &id, &mut ctx);
        let components = std::mem::take(&mut ctx.components);
        let body = match rendered {
            Ok(body) => body,
            Err(e) => {
                discard_components(&mut self.doc, &components);
                tracing::warn!(target: "window", window_type = %config.window_type, "spawn failed: {}", e);
                return Err(e);
            }
        };

        let chrome = match build_chrome(&mut self.doc, &id, &config, body) {
            Ok(chrome) => chrome,
            Err(e) => {
                discard_components(&mut self.doc, &components);
                self.doc.remove(body);
                return Err(e.into());
            }
        };
        let node = chrome.node;

        let placed = match column {
            None => {
                self.doc.add_class(node, classes::MODAL);
                self.doc.set_attr(node, MODAL_ATTR, "true");
                dock::mount_modal(&mut self.doc, node, config.modal_fade).map(|_| ())
            }
            Some(column) => self.doc.append_child(column, node),
        };
        if let Err(e) = placed {
            discard_components(&mut self.doc, &components);
            let wrap = dock::modal_wrap(&self.doc, node);
            self.doc.remove(node);
            if let Some(wrap) = wrap {
                self.doc.remove(wrap);
            }
            return Err(e.into());
        }

        if chrome.resizer.is_some() {
            if let Some(height) = restore_height(self.store.as_ref(), id.as_str(), &self.config) {
                self.doc.update_style(node, |s| s.height = Some(height));
            }
        }

        let events = EventBus::new();
        self.windows.insert(
            id.clone(),
            WindowState {
                id: id.clone(),
                window_type: config.window_type.clone(),
                node,
                title_node: chrome.title_node,
                content: chrome.content,
                body,
                minimize_button: chrome.minimize_button,
                dock_button: chrome.dock_button,
                resizer: chrome.resizer,
                events: events.clone(),
                resize_watch: Some(None),
                dialogs: Vec::new(),
                dockable: config.dockable,
                resizable: config.resizable,
            },
        );
        for (element_id, component) in components {
            self.components.register(&id, element_id, component);
        }

        tracing::info!(
            target: "window",
            window = %id,
            window_type = %config.window_type,
            modal = config.modal,
            "spawned window"
        );

        let mut controller = WindowController::new(self, id, node, events.clone());
        mount(&mut controller);
        events.emit(&WindowEvent::Open);
        Ok(controller)
    }

    /// Requested id, verbatim, when free; else a fresh `<prefix><uuid>`
    fn resolve_id(&self, requested: Option<&str>) -> WindowId {
        if let Some(requested) = requested.filter(|r| !r.is_empty()) {
            let id = WindowId::new(requested);
            if !self.id_taken(&id) {
                return id;
            }
            tracing::debug!(target: "window", requested, "window id in use, generating one");
        }
        loop {
            let id = WindowId::new(format!("{}{}", self.config.id_prefix, Uuid::new_v4()));
            if !self.id_taken(&id) {
                return id;
            }
        }
    }

    fn id_taken(&self, id: &WindowId) -> bool {
        self.windows.contains_key(id) || self.doc.get_element_by_id(id.as_str()).is_some()
    }
}

fn discard_components(doc: &mut Document, components: &[(String, Component)]) {
    for (_, component) in components {
        doc.remove(component.root());
    }
}

fn icon_button(doc: &mut Document, class: &str, glyph: &str, label: &str) -> NodeId {
    let button = doc.text_element("button", &[classes::ICON_BUTTON, class], glyph);
    doc.set_attr(button, "title", label);
    doc.set_attr(button, "aria-label", label);
    button
}

/// `div.miniwin` > titlebar, content (> content-inner > body), resizer
fn build_chrome(
    doc: &mut Document,
    id: &WindowId,
    config: &WindowConfig,
    body: NodeId,
) -> Result<Chrome, DomError> {
    let node = doc.element("div", &[classes::WINDOW]);
    doc.set_element_id(node, id.as_str());
    doc.set_attr(node, "tabindex", "-1");
    doc.set_attr(node, "data-id", id.as_str());
    if !config.modal_fade {
        doc.set_attr(node, FADE_ATTR, "false");
    }

    let built = fill_chrome(doc, node, config, body);
    if built.is_err() {
        doc.remove(node);
    }
    built
}

fn fill_chrome(
    doc: &mut Document,
    node: NodeId,
    config: &WindowConfig,
    body: NodeId,
) -> Result<Chrome, DomError> {
    let titlebar = doc.element("div", &[classes::TITLEBAR]);
    let title_node = doc.text_element("div", &[classes::TITLE], config.title.as_str());
    let actions = doc.element("div", &[classes::ACTIONS]);
    doc.append_child(node, titlebar)?;
    doc.append_child(titlebar, title_node)?;
    doc.append_child(titlebar, actions)?;

    let minimize_button = icon_button(doc, classes::MINIMIZE_BUTTON, "—", "Minimize");
    doc.set_attr(minimize_button, "aria-pressed", "false");
    doc.append_child(actions, minimize_button)?;

    let dock_button = if config.dockable {
        let button = doc.element("button", &[classes::ICON_BUTTON, classes::DOCK_TOGGLE_BUTTON]);
        set_dock_button(doc, button, config.modal);
        doc.append_child(actions, button)?;
        Some(button)
    } else {
        None
    };

    let close_button = icon_button(doc, classes::CLOSE_BUTTON, "✕", "Close");
    doc.append_child(actions, close_button)?;

    let content = doc.element("div", &[classes::CONTENT]);
    let inner = doc.element("div", &[classes::CONTENT_INNER]);
    if let Some(class) = content_class(&config.window_type) {
        doc.add_class(inner, class);
    }
    doc.append_child(node, content)?;
    doc.append_child(content, inner)?;
    doc.append_child(inner, body)?;

    let resizer = if config.resizable {
        let handle = doc.element("div", &[classes::RESIZER]);
        doc.set_attr(handle, "aria-hidden", "true");
        doc.append_child(node, handle)?;
        Some(handle)
    } else {
        None
    };

    Ok(Chrome {
        node,
        title_node,
        content: inner,
        minimize_button,
        dock_button,
        resizer,
    })
}
