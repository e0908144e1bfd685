//! Form field renderers
//!
//! Renderers are registered by type name and build one input node from a
//! [`FieldConfig`]. Most are one-shot node construction; `item_list` also
//! hands back a mounted [`ListRenderState`].

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::components::Component;
use crate::dom::{Document, NodeId};
use crate::error::{FieldError, RegistryError};
use crate::list::{ListConfig, ListRenderState};

/// Option of a `select` field: a bare value or a value/label pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SelectOption {
    Plain(String),
    Labeled { value: String, label: String },
}

impl SelectOption {
    pub fn value(&self) -> &str {
        match self {
            SelectOption::Plain(value) | SelectOption::Labeled { value, .. } => value,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            SelectOption::Plain(value) => value,
            SelectOption::Labeled { label, .. } => label,
        }
    }
}

/// One entry of a form's field list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    #[serde(rename = "type", default = "default_field_type")]
    pub field_type: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub options: Vec<SelectOption>,
    #[serde(default)]
    pub default: Option<Value>,
    /// Type-specific settings (`accept`, list options, items, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_field_type() -> String {
    "text".to_string()
}

impl FieldConfig {
    pub fn new(field_type: &str, id: &str) -> Self {
        Self {
            field_type: field_type.to_string(),
            id: Some(id.to_string()),
            name: None,
            label: None,
            required: false,
            placeholder: None,
            options: Vec::new(),
            default: None,
            extra: Map::new(),
        }
    }

    /// Value key: the id, else the name as `snake_case`, else `field_<n>`
    pub fn key(&self, index: usize) -> String {
        if let Some(id) = &self.id {
            return id.clone();
        }
        if let Some(name) = &self.name {
            return name
                .to_lowercase()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join("_");
        }
        format!("field_{}", index + 1)
    }

    pub fn display_label(&self, key: &str) -> String {
        self.label
            .clone()
            .or_else(|| self.name.clone())
            .unwrap_or_else(|| key.to_string())
    }
}

/// Output of a field renderer
#[derive(Debug)]
pub struct RenderedField {
    pub input: NodeId,
    pub component: Option<Component>,
}

impl RenderedField {
    fn input(input: NodeId) -> Self {
        Self {
            input,
            component: None,
        }
    }
}

pub type FieldRenderer =
    Rc<dyn Fn(&mut Document, &FieldConfig, &str) -> Result<RenderedField, FieldError>>;

type BuiltinRenderer = fn(&mut Document, &FieldConfig, &str) -> Result<RenderedField, FieldError>;

/// Field type name → renderer
#[derive(Clone)]
pub struct FieldRegistry {
    renderers: HashMap<String, FieldRenderer>,
}

impl fmt::Debug for FieldRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.renderers.keys().collect();
        names.sort();
        f.debug_struct("FieldRegistry").field("types", &names).finish()
    }
}

impl Default for FieldRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl FieldRegistry {
    pub fn empty() -> Self {
        Self {
            renderers: HashMap::new(),
        }
    }

    /// Registry with `text`, `number`, `textarea`, `select`, `toggle`,
    /// `json`, `color`, `file` and `item_list`
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        let builtins: [(&str, BuiltinRenderer); 9] = [
            ("text", render_text),
            ("number", render_number),
            ("textarea", render_textarea),
            ("select", render_select),
            ("toggle", render_toggle),
            ("json", render_json),
            ("color", render_color),
            ("file", render_file),
            ("item_list", render_item_list),
        ];
        for (name, renderer) in builtins {
            registry.renderers.insert(name.to_string(), Rc::new(renderer));
        }
        registry
    }

    pub fn register(
        &mut self,
        name: &str,
        renderer: impl Fn(&mut Document, &FieldConfig, &str) -> Result<RenderedField, FieldError>
            + 'static,
    ) -> Result<(), RegistryError> {
        if name.trim().is_empty() {
            return Err(RegistryError::EmptyName);
        }
        self.renderers.insert(name.to_string(), Rc::new(renderer));
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.renderers.contains_key(name)
    }

    /// Build the input for `config`, keyed as `key`
    pub fn create(
        &self,
        doc: &mut Document,
        config: &FieldConfig,
        key: &str,
    ) -> Result<RenderedField, FieldError> {
        let renderer = self
            .renderers
            .get(&config.field_type)
            .ok_or_else(|| FieldError::UnknownFieldType(config.field_type.clone()))?;
        let rendered = renderer(doc, config, key)?;
        doc.set_attr(rendered.input, "data-field", key);
        Ok(rendered)
    }
}

// ============================================================================
// Built-in renderers
// ============================================================================

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn input(doc: &mut Document, input_type: &str, config: &FieldConfig) -> NodeId {
    let node = doc.element("input", &["input"]);
    doc.set_attr(node, "type", input_type);
    if let Some(placeholder) = &config.placeholder {
        doc.set_attr(node, "placeholder", placeholder.as_str());
    }
    if let Some(default) = &config.default {
        doc.set_attr(node, "value", value_text(default));
    }
    node
}

fn render_text(
    doc: &mut Document,
    config: &FieldConfig,
    _key: &str,
) -> Result<RenderedField, FieldError> {
    Ok(RenderedField::input(input(doc, "text", config)))
}

fn render_number(
    doc: &mut Document,
    config: &FieldConfig,
    _key: &str,
) -> Result<RenderedField, FieldError> {
    Ok(RenderedField::input(input(doc, "number", config)))
}

fn render_color(
    doc: &mut Document,
    config: &FieldConfig,
    _key: &str,
) -> Result<RenderedField, FieldError> {
    let node = input(doc, "color", config);
    if config.default.is_none() {
        doc.set_attr(node, "value", "#000000");
    }
    Ok(RenderedField::input(node))
}

fn render_file(
    doc: &mut Document,
    config: &FieldConfig,
    _key: &str,
) -> Result<RenderedField, FieldError> {
    let node = input(doc, "file", config);
    if let Some(accept) = config.extra.get("accept").and_then(Value::as_str) {
        doc.set_attr(node, "accept", accept);
    }
    if config.extra.get("multiple").and_then(Value::as_bool) == Some(true) {
        doc.set_attr(node, "multiple", "true");
    }
    Ok(RenderedField::input(node))
}

fn render_textarea(
    doc: &mut Document,
    config: &FieldConfig,
    _key: &str,
) -> Result<RenderedField, FieldError> {
    let node = doc.element("textarea", &["input"]);
    if let Some(placeholder) = &config.placeholder {
        doc.set_attr(node, "placeholder", placeholder.as_str());
    }
    if let Some(default) = &config.default {
        doc.set_attr(node, "value", value_text(default));
    }
    Ok(RenderedField::input(node))
}

fn render_json(
    doc: &mut Document,
    config: &FieldConfig,
    _key: &str,
) -> Result<RenderedField, FieldError> {
    let node = doc.element("textarea", &["input", "json"]);
    let initial = config
        .default
        .clone()
        .unwrap_or_else(|| Value::Object(Map::new()));
    let text = serde_json::to_string_pretty(&initial).map_err(|source| FieldError::InvalidConfig {
        field: config.id.clone().unwrap_or_default(),
        source,
    })?;
    doc.set_attr(node, "value", text);
    Ok(RenderedField::input(node))
}

fn render_select(
    doc: &mut Document,
    config: &FieldConfig,
    _key: &str,
) -> Result<RenderedField, FieldError> {
    let node = doc.element("select", &["input"]);
    for option in &config.options {
        let child = doc.text_element("option", &[], option.label());
        doc.set_attr(child, "value", option.value());
        let _ = doc.append_child(node, child);
    }
    let selected = config
        .default
        .as_ref()
        .map(value_text)
        .or_else(|| config.options.first().map(|o| o.value().to_string()));
    if let Some(selected) = selected {
        doc.set_attr(node, "value", selected);
    }
    Ok(RenderedField::input(node))
}

fn render_toggle(
    doc: &mut Document,
    config: &FieldConfig,
    _key: &str,
) -> Result<RenderedField, FieldError> {
    let node = doc.element("input", &["toggle"]);
    doc.set_attr(node, "type", "checkbox");
    let checked = config.default.as_ref().and_then(Value::as_bool).unwrap_or(false);
    doc.set_attr(node, "value", checked.to_string());
    Ok(RenderedField::input(node))
}

fn render_item_list(
    doc: &mut Document,
    config: &FieldConfig,
    key: &str,
) -> Result<RenderedField, FieldError> {
    let mut settings = config.extra.clone();
    let items = match settings.remove("items") {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    };
    let list_config: ListConfig = serde_json::from_value(Value::Object(settings)).map_err(|source| {
        FieldError::InvalidConfig {
            field: key.to_string(),
            source,
        }
    })?;

    let mut list = ListRenderState::new(doc, list_config);
    list.set_items(doc, items);
    Ok(RenderedField {
        input: list.root(),
        component: Some(Component::List(list)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn field(value: Value) -> FieldConfig {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_unknown_field_type_names_the_type() {
        let mut doc = Document::new();
        let registry = FieldRegistry::with_builtins();
        let err = registry
            .create(&mut doc, &field(json!({"type": "slider", "id": "x"})), "x")
            .unwrap_err();
        assert!(matches!(err, FieldError::UnknownFieldType(ref t) if t == "slider"));
        assert_eq!(err.to_string(), "unknown field type: slider");
    }

    #[test]
    fn test_key_derivation() {
        assert_eq!(field(json!({"id": "email"})).key(0), "email");
        assert_eq!(field(json!({"name": "Full Name"})).key(0), "full_name");
        assert_eq!(field(json!({})).key(2), "field_3");
    }

    #[test]
    fn test_select_options_and_default() {
        let mut doc = Document::new();
        let registry = FieldRegistry::with_builtins();
        let config = field(json!({
            "type": "select",
            "id": "size",
            "options": ["s", {"value": "m", "label": "Medium"}]
        }));
        let rendered = registry.create(&mut doc, &config, "size").unwrap();

        let options = doc.children(rendered.input).to_vec();
        assert_eq!(doc.text(options[1]), Some("Medium"));
        assert_eq!(doc.attr(options[1], "value"), Some("m"));
        assert_eq!(doc.attr(rendered.input, "value"), Some("s"));
        assert_eq!(doc.attr(rendered.input, "data-field"), Some("size"));
    }

    #[test]
    fn test_item_list_field_mounts_list() {
        let mut doc = Document::new();
        let registry = FieldRegistry::with_builtins();
        let config = field(json!({
            "type": "item_list",
            "id": "people",
            "label_field": "name",
            "items": [{"id": 1, "name": "Ada"}]
        }));
        let rendered = registry.create(&mut doc, &config, "people").unwrap();

        let Some(Component::List(list)) = rendered.component else {
            panic!("expected a list component");
        };
        assert_eq!(list.root(), rendered.input);
        assert_eq!(list.view().len(), 1);
    }

    #[test]
    fn test_item_list_rejects_bad_options() {
        let mut doc = Document::new();
        let registry = FieldRegistry::with_builtins();
        let config = field(json!({"type": "item_list", "id": "l", "page_size": "ten"}));
        let err = registry.create(&mut doc, &config, "l").unwrap_err();
        assert!(matches!(err, FieldError::InvalidConfig { ref field, .. } if field == "l"));
    }

    #[test]
    fn test_register_rejects_empty_name() {
        let mut registry = FieldRegistry::empty();
        assert_eq!(
            registry.register(" ", |doc, _, _| Ok(RenderedField {
                input: doc.create_element("input"),
                component: None,
            })),
            Err(RegistryError::EmptyName)
        );
    }
}
