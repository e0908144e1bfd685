//! Row and toolbar actions
//!
//! Row actions come either as an ordered list or as name → handler pairs;
//! both normalize to the ordered form, with the name doubling as id and
//! label.

use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use super::selection::Selection;

pub type ItemHandler = Rc<dyn Fn(&Value)>;
pub type SelectionHandler = Rc<dyn Fn(&Selection)>;

/// Button rendered on every row
#[derive(Clone)]
pub struct ListAction {
    pub id: String,
    pub label: String,
    pub on_click: Option<ItemHandler>,
}

impl ListAction {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            on_click: None,
        }
    }

    pub fn on_click(mut self, handler: impl Fn(&Value) + 'static) -> Self {
        self.on_click = Some(Rc::new(handler));
        self
    }

    /// Button text: the label, or the id when the label is empty
    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            &self.id
        } else {
            &self.label
        }
    }
}

impl fmt::Debug for ListAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListAction")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("on_click", &self.on_click.is_some())
            .finish()
    }
}

/// Row actions as supplied by the caller
pub enum ListActions {
    Ordered(Vec<ListAction>),
    Named(Vec<(String, ItemHandler)>),
}

impl ListActions {
    /// Build the name → handler form
    pub fn named<I, S, F>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, F)>,
        S: Into<String>,
        F: Fn(&Value) + 'static,
    {
        ListActions::Named(
            pairs
                .into_iter()
                .map(|(name, handler)| (name.into(), Rc::new(handler) as ItemHandler))
                .collect(),
        )
    }

    pub fn normalize(self) -> Vec<ListAction> {
        match self {
            ListActions::Ordered(actions) => actions,
            ListActions::Named(pairs) => pairs
                .into_iter()
                .map(|(name, handler)| ListAction {
                    id: name.clone(),
                    label: name,
                    on_click: Some(handler),
                })
                .collect(),
        }
    }
}

impl From<Vec<ListAction>> for ListActions {
    fn from(actions: Vec<ListAction>) -> Self {
        ListActions::Ordered(actions)
    }
}

impl fmt::Debug for ListActions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListActions::Ordered(actions) => f.debug_tuple("Ordered").field(actions).finish(),
            ListActions::Named(pairs) => f
                .debug_tuple("Named")
                .field(&pairs.iter().map(|(name, _)| name).collect::<Vec<_>>())
                .finish(),
        }
    }
}

/// Button in the list toolbar, invoked with the current selection
#[derive(Clone)]
pub struct ToolbarAction {
    pub id: String,
    pub label: String,
    pub on_click: Option<SelectionHandler>,
}

impl ToolbarAction {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            on_click: None,
        }
    }

    pub fn on_click(mut self, handler: impl Fn(&Selection) + 'static) -> Self {
        self.on_click = Some(Rc::new(handler));
        self
    }

    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            &self.id
        } else {
            &self.label
        }
    }
}

impl fmt::Debug for ToolbarAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolbarAction")
            .field("id", &self.id)
            .field("label", &self.label)
            .finish()
    }
}
