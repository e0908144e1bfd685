//! Window-type renderers
//!
//! A renderer builds the body of a window from its config. It runs before
//! the window chrome exists and returns one detached node; stateful parts
//! it creates (forms, lists, chats) are handed back through the
//! [`RenderContext`] for registration under the window id.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use serde_json::{Map, Value};

use super::{WindowConfig, WindowId};
use crate::chat::{ChatConfig, ChatState};
use crate::components::Component;
use crate::dom::{classes, Document, NodeId};
use crate::error::{FieldError, RegistryError, SpawnError};
use crate::fields::{FieldConfig, FieldRegistry};
use crate::form::FormState;

/// What a renderer may touch while building a body
pub struct RenderContext<'a> {
    pub doc: &'a mut Document,
    pub fields: &'a FieldRegistry,
    /// Components to register as `(element id, component)`
    pub components: Vec<(String, Component)>,
}

impl<'a> RenderContext<'a> {
    pub fn new(doc: &'a mut Document, fields: &'a FieldRegistry) -> Self {
        Self {
            doc,
            fields,
            components: Vec::new(),
        }
    }
}

pub type WindowRenderer =
    Rc<dyn Fn(&WindowConfig, &WindowId, &mut RenderContext<'_>) -> Result<NodeId, SpawnError>>;

type BuiltinRenderer =
    fn(&WindowConfig, &WindowId, &mut RenderContext<'_>) -> Result<NodeId, SpawnError>;

/// Window type name → body renderer
#[derive(Clone)]
pub struct WindowTypeRegistry {
    renderers: HashMap<String, WindowRenderer>,
}

impl fmt::Debug for WindowTypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.renderers.keys().collect();
        names.sort();
        f.debug_struct("WindowTypeRegistry")
            .field("types", &names)
            .finish()
    }
}

impl Default for WindowTypeRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl WindowTypeRegistry {
    pub fn empty() -> Self {
        Self {
            renderers: HashMap::new(),
        }
    }

    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        let builtins: [(&str, BuiltinRenderer); 4] = [
            ("window_generic", render_generic),
            ("window_text_editor", render_text_editor),
            ("window_chat", render_chat),
            ("window_theme_editor", render_theme_editor),
        ];
        for (name, renderer) in builtins {
            registry.renderers.insert(name.to_string(), Rc::new(renderer));
        }
        registry
    }

    /// Register (or replace) the renderer for `name`
    pub fn register(
        &mut self,
        name: &str,
        renderer: impl Fn(&WindowConfig, &WindowId, &mut RenderContext<'_>) -> Result<NodeId, SpawnError>
            + 'static,
    ) -> Result<(), RegistryError> {
        if name.trim().is_empty() {
            return Err(RegistryError::EmptyName);
        }
        tracing::debug!(target: "window", name, "registered window type");
        self.renderers.insert(name.to_string(), Rc::new(renderer));
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.renderers.contains_key(name)
    }

    /// Renderer for `name`, or `UnknownWindowType`
    pub fn get(&self, name: &str) -> Result<WindowRenderer, SpawnError> {
        self.renderers
            .get(name)
            .cloned()
            .ok_or_else(|| SpawnError::UnknownWindowType(name.to_string()))
    }
}

// ============================================================================
// Built-in window types
// ============================================================================

fn field_list(config: &WindowConfig, keys: &[&str]) -> Result<Vec<FieldConfig>, SpawnError> {
    let Some(value) = config.extra_any(keys) else {
        return Ok(Vec::new());
    };
    serde_json::from_value(value.clone()).map_err(|source| {
        SpawnError::Field(FieldError::InvalidConfig {
            field: keys[0].to_string(),
            source,
        })
    })
}

fn mount_form(
    ctx: &mut RenderContext<'_>,
    fields: &[FieldConfig],
    submit_label: &str,
) -> Result<NodeId, SpawnError> {
    let (form, nested) = FormState::build(ctx.doc, ctx.fields, fields, submit_label)?;
    let root = form.root();
    ctx.components.extend(nested);
    ctx.components.push(("form".to_string(), Component::Form(form)));
    Ok(root)
}

/// Form built from `elements`
fn render_generic(
    config: &WindowConfig,
    _id: &WindowId,
    ctx: &mut RenderContext<'_>,
) -> Result<NodeId, SpawnError> {
    let fields = field_list(config, &["elements", "Elements"])?;
    let submit_label = config
        .extra_any(&["submit_label", "submitLabel"])
        .and_then(Value::as_str)
        .unwrap_or("Save");
    mount_form(ctx, &fields, submit_label)
}

/// Single textarea holding `content`
fn render_text_editor(
    config: &WindowConfig,
    id: &WindowId,
    ctx: &mut RenderContext<'_>,
) -> Result<NodeId, SpawnError> {
    let doc = &mut *ctx.doc;
    let wrap = doc.element("div", &["text-editor"]);
    let textarea = doc.element("textarea", &["textarea"]);
    if config.extra.get("monospace").and_then(Value::as_bool) == Some(true) {
        doc.add_class(textarea, "monospace");
    }
    if config.extra.get("readonly").and_then(Value::as_bool) == Some(true) {
        doc.set_attr(textarea, "readonly", "readonly");
    }
    doc.set_attr(
        textarea,
        "placeholder",
        config.extra_str("placeholder").unwrap_or_default(),
    );
    doc.set_attr(textarea, "value", config.extra_str("content").unwrap_or_default());
    doc.set_attr(textarea, "data-window", id.as_str());
    doc.append_child(wrap, textarea)?;
    Ok(wrap)
}

/// Message log with composer
fn render_chat(
    config: &WindowConfig,
    _id: &WindowId,
    ctx: &mut RenderContext<'_>,
) -> Result<NodeId, SpawnError> {
    let chat_config: ChatConfig = serde_json::from_value(Value::Object(config.extra.clone()))
        .map_err(|source| {
            SpawnError::Field(FieldError::InvalidConfig {
                field: "chat".to_string(),
                source,
            })
        })?;
    let chat = ChatState::new(ctx.doc, chat_config)?;
    let root = chat.root();
    ctx.components.push(("chat".to_string(), Component::Chat(chat)));
    Ok(root)
}

/// Form with one field per entry of `variables`
///
/// Values that look like hex colors get a color input, everything else a
/// text input.
fn render_theme_editor(
    config: &WindowConfig,
    _id: &WindowId,
    ctx: &mut RenderContext<'_>,
) -> Result<NodeId, SpawnError> {
    let empty = Map::new();
    let variables = config
        .extra
        .get("variables")
        .and_then(Value::as_object)
        .unwrap_or(&empty);

    let fields: Vec<FieldConfig> = variables
        .iter()
        .map(|(name, value)| {
            let is_color = value.as_str().is_some_and(|v| v.starts_with('#'));
            let mut field = FieldConfig::new(if is_color { "color" } else { "text" }, name);
            field.label = Some(name.trim_start_matches("--").replace('-', " "));
            field.default = Some(value.clone());
            field
        })
        .collect();
    let root = mount_form(ctx, &fields, "Apply")?;
    ctx.doc.add_class(root, "theme-editor");
    Ok(root)
}

/// Class added to the content mount of chat windows
pub(crate) fn content_class(window_type: &str) -> Option<&'static str> {
    (window_type == "window_chat").then_some(classes::CHAT_WINDOW)
}
