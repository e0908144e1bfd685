//! Window spawn options

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::ColumnSide;

fn default_title() -> String {
    "Untitled".to_string()
}

fn default_window_type() -> String {
    "window_generic".to_string()
}

fn default_true() -> bool {
    true
}

/// Everything `spawn` needs to build and mount one window
///
/// Keys not listed here are kept in `extra` and passed to the window-type
/// renderer untouched (`elements`, `content`, `messages`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Requested element id; replaced when omitted or already in use
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default = "default_title")]
    pub title: String,
    /// Mount floating instead of into a column
    #[serde(default)]
    pub modal: bool,
    /// Dim the page behind the window while it floats
    #[serde(default = "default_true", alias = "modalFade")]
    pub modal_fade: bool,
    #[serde(default)]
    pub dockable: bool,
    #[serde(default)]
    pub resizable: bool,
    #[serde(default)]
    pub column: ColumnSide,
    #[serde(default = "default_window_type", alias = "windowType")]
    pub window_type: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            id: None,
            title: default_title(),
            modal: false,
            modal_fade: true,
            dockable: false,
            resizable: false,
            column: ColumnSide::default(),
            window_type: default_window_type(),
            extra: Map::new(),
        }
    }
}

impl WindowConfig {
    pub fn new(window_type: impl Into<String>) -> Self {
        Self {
            window_type: window_type.into(),
            ..Self::default()
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn modal(mut self, modal: bool) -> Self {
        self.modal = modal;
        self
    }

    pub fn modal_fade(mut self, fade: bool) -> Self {
        self.modal_fade = fade;
        self
    }

    pub fn dockable(mut self, dockable: bool) -> Self {
        self.dockable = dockable;
        self
    }

    pub fn resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    pub fn column(mut self, column: ColumnSide) -> Self {
        self.column = column;
        self
    }

    /// Set a type-specific option
    pub fn with(mut self, key: &str, value: Value) -> Self {
        self.extra.insert(key.to_string(), value);
        self
    }

    /// First present of several spellings of a type-specific option
    pub fn extra_any(&self, keys: &[&str]) -> Option<&Value> {
        keys.iter().find_map(|key| self.extra.get(*key))
    }

    pub fn extra_str(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_from_empty_object() {
        let config: WindowConfig = serde_json::from_value(json!({})).unwrap();
        assert_eq!(config, WindowConfig::default());
        assert_eq!(config.title, "Untitled");
        assert!(config.modal_fade);
        assert_eq!(config.column, ColumnSide::Left);
    }

    #[test]
    fn test_unknown_keys_kept_for_renderer() {
        let config: WindowConfig = serde_json::from_value(json!({
            "window_type": "window_text_editor",
            "column": "right",
            "modalFade": false,
            "content": "hello"
        }))
        .unwrap();

        assert_eq!(config.window_type, "window_text_editor");
        assert_eq!(config.column, ColumnSide::Right);
        assert!(!config.modal_fade);
        assert_eq!(config.extra_str("content"), Some("hello"));
    }
}
