//! List render state
//!
//! Every mutation re-derives the view (`items → filter → sort → page`) and
//! rebuilds the rows synchronously. Filter and sort closures are reapplied
//! on every pass, never cached.
//!
//! Render precedence: an error replaces everything below the toolbar, then
//! loading, then the empty-state row, then the rows themselves.

use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::actions::{ListAction, ListActions, ToolbarAction};
use super::key::{derive_key, field_key, RowKey, ViewRow};
use super::selection::{KeyedSelection, Selection, SelectionMode};
use crate::async_control::AsyncStateSink;
use crate::dom::{classes, Document, NodeId};
use crate::error::DomError;
use crate::pubsub::{Event, EventBus, Subscription};

pub type Filter = Rc<dyn Fn(&Value) -> bool>;
pub type Sort = Rc<dyn Fn(&Value, &Value) -> Ordering>;

/// Table column shown for each row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListColumn {
    pub key: String,
    #[serde(default)]
    pub label: String,
}

/// Item fields shown in the slots of a card row
///
/// Missing or null fields leave their slot out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardTemplate {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub badges: Vec<String>,
    pub meta: Option<String>,
}

/// Recognized list options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListConfig {
    /// Item field holding the row key
    pub key_field: String,
    /// Whether row clicks change the selection
    pub selectable: bool,
    pub multi: bool,
    /// 1-based page number; pages past the end show the last page
    pub page: usize,
    /// Rows per page; `None` shows everything
    pub page_size: Option<usize>,
    pub empty_text: String,
    /// Field rendered as the row text when no columns are configured
    pub label_field: Option<String>,
    pub columns: Vec<ListColumn>,
    /// Render rows as cards instead of text or columns
    pub card: Option<CardTemplate>,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            key_field: "id".to_string(),
            selectable: true,
            multi: false,
            page: 1,
            page_size: None,
            empty_text: "No items".to_string(),
            label_field: None,
            columns: Vec::new(),
            card: None,
        }
    }
}

/// Partial update applied by [`ListRenderState::update`] with one render
#[derive(Default)]
pub struct ListPatch {
    items: Option<Vec<Value>>,
    filter: Option<Option<Filter>>,
    sort: Option<Option<Sort>>,
    loading: Option<bool>,
    error: Option<Option<String>>,
    page: Option<usize>,
    page_size: Option<Option<usize>>,
    multi: Option<bool>,
    empty_text: Option<String>,
    actions: Option<ListActions>,
    toolbar: Option<Vec<ToolbarAction>>,
    selected: Option<Filter>,
}

impl ListPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(mut self, items: Vec<Value>) -> Self {
        self.items = Some(items);
        self
    }

    pub fn filter(mut self, filter: impl Fn(&Value) -> bool + 'static) -> Self {
        self.filter = Some(Some(Rc::new(filter)));
        self
    }

    pub fn clear_filter(mut self) -> Self {
        self.filter = Some(None);
        self
    }

    pub fn sort(mut self, sort: impl Fn(&Value, &Value) -> Ordering + 'static) -> Self {
        self.sort = Some(Some(Rc::new(sort)));
        self
    }

    pub fn clear_sort(mut self) -> Self {
        self.sort = Some(None);
        self
    }

    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = Some(loading);
        self
    }

    pub fn error(mut self, error: Option<String>) -> Self {
        self.error = Some(error);
        self
    }

    pub fn page(mut self, page: usize) -> Self {
        self.page = Some(page);
        self
    }

    pub fn page_size(mut self, page_size: Option<usize>) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn multi(mut self, multi: bool) -> Self {
        self.multi = Some(multi);
        self
    }

    pub fn empty_text(mut self, text: impl Into<String>) -> Self {
        self.empty_text = Some(text.into());
        self
    }

    pub fn actions(mut self, actions: impl Into<ListActions>) -> Self {
        self.actions = Some(actions.into());
        self
    }

    pub fn toolbar(mut self, toolbar: Vec<ToolbarAction>) -> Self {
        self.toolbar = Some(toolbar);
        self
    }

    /// Predicate marking items selected when they are loaded
    pub fn selected(mut self, predicate: impl Fn(&Value) -> bool + 'static) -> Self {
        self.selected = Some(Rc::new(predicate));
        self
    }
}

impl fmt::Debug for ListPatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListPatch")
            .field("items", &self.items.as_ref().map(Vec::len))
            .field("filter", &self.filter.as_ref().map(Option::is_some))
            .field("sort", &self.sort.as_ref().map(Option::is_some))
            .field("loading", &self.loading)
            .field("error", &self.error)
            .field("page", &self.page)
            .field("page_size", &self.page_size)
            .finish_non_exhaustive()
    }
}

/// What a list reports to its subscribers
#[derive(Debug, Clone, PartialEq)]
pub enum ListEvent {
    SelectionChanged(Selection),
    RowClick { key: RowKey, item: Value },
    RowDoubleClick { key: RowKey, item: Value },
    RowAction { action: String, key: RowKey, item: Value },
    ToolbarAction { action: String, selection: Selection },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListEventKind {
    SelectionChanged,
    RowClick,
    RowDoubleClick,
    RowAction,
    ToolbarAction,
}

impl Event for ListEvent {
    type Kind = ListEventKind;

    fn kind(&self) -> ListEventKind {
        match self {
            ListEvent::SelectionChanged(_) => ListEventKind::SelectionChanged,
            ListEvent::RowClick { .. } => ListEventKind::RowClick,
            ListEvent::RowDoubleClick { .. } => ListEventKind::RowDoubleClick,
            ListEvent::RowAction { .. } => ListEventKind::RowAction,
            ListEvent::ToolbarAction { .. } => ListEventKind::ToolbarAction,
        }
    }
}

/// Part of a rendered list under a clicked node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListHit {
    Row(RowKey),
    Action { action: String, key: RowKey },
    Toolbar(String),
}

/// Items, view pipeline, flags and selection of one list instance
pub struct ListRenderState {
    root: NodeId,
    config: ListConfig,
    items: Vec<Value>,
    filter: Option<Filter>,
    sort: Option<Sort>,
    loading: bool,
    error: Option<String>,
    selection: KeyedSelection,
    actions: Vec<ListAction>,
    toolbar: Vec<ToolbarAction>,
    selected: Option<Filter>,
    view: Vec<ViewRow>,
    rows: Vec<(RowKey, NodeId)>,
    events: EventBus<ListEvent>,
    render_count: usize,
    render_error: Option<DomError>,
}

impl fmt::Debug for ListRenderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListRenderState")
            .field("root", &self.root)
            .field("config", &self.config)
            .field("items", &self.items.len())
            .field("view", &self.view.len())
            .field("loading", &self.loading)
            .field("error", &self.error)
            .field("selection", &self.selection)
            .field("render_count", &self.render_count)
            .field("render_error", &self.render_error)
            .finish_non_exhaustive()
    }
}

fn mode_for(multi: bool) -> SelectionMode {
    if multi {
        SelectionMode::Multi
    } else {
        SelectionMode::Single
    }
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

impl ListRenderState {
    /// Create the list root (detached) and render it once
    pub fn new(doc: &mut Document, config: ListConfig) -> Self {
        let root = doc.element("div", &[classes::ITEM_LIST]);
        let mut list = Self {
            root,
            selection: KeyedSelection::new(mode_for(config.multi)),
            config,
            items: Vec::new(),
            filter: None,
            sort: None,
            loading: false,
            error: None,
            actions: Vec::new(),
            toolbar: Vec::new(),
            selected: None,
            view: Vec::new(),
            rows: Vec::new(),
            events: EventBus::new(),
            render_count: 0,
            render_error: None,
        };
        list.rerender(doc);
        list
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn config(&self) -> &ListConfig {
        &self.config
    }

    pub fn items(&self) -> &[Value] {
        &self.items
    }

    /// Rows of the most recent render pass
    pub fn view(&self) -> &[ViewRow] {
        &self.view
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn render_count(&self) -> usize {
        self.render_count
    }

    /// Tree error hit by the most recent render pass, if it failed
    pub fn render_error(&self) -> Option<&DomError> {
        self.render_error.as_ref()
    }

    pub fn selected_keys(&self) -> impl Iterator<Item = &RowKey> {
        self.selection.keys()
    }

    pub fn events(&self) -> &EventBus<ListEvent> {
        &self.events
    }

    pub fn on(&self, kind: ListEventKind, callback: impl Fn(&ListEvent) + 'static) -> Subscription {
        self.events.on(kind, callback)
    }

    /// Row node rendered for `key`, if currently shown
    pub fn row_node(&self, key: &RowKey) -> Option<NodeId> {
        self.rows
            .iter()
            .find(|(row_key, _)| row_key == key)
            .map(|(_, node)| *node)
    }

    // ========================================================================
    // Mutations (each renders once)
    // ========================================================================

    /// Replace the items; this also ends any loading state
    pub fn set_items(&mut self, doc: &mut Document, items: Vec<Value>) {
        self.items = items;
        self.loading = false;
        self.apply_selected_predicate();
        self.rerender(doc);
    }

    /// Predicate marking items selected whenever items are loaded
    ///
    /// Takes effect on the next `set_items`; matching rows are added to the
    /// selection without a change notification.
    pub fn set_selected_predicate(&mut self, predicate: impl Fn(&Value) -> bool + 'static) {
        self.selected = Some(Rc::new(predicate));
    }

    pub fn set_filter(&mut self, doc: &mut Document, filter: impl Fn(&Value) -> bool + 'static) {
        self.filter = Some(Rc::new(filter));
        self.rerender(doc);
    }

    pub fn clear_filter(&mut self, doc: &mut Document) {
        self.filter = None;
        self.rerender(doc);
    }

    pub fn set_sort(
        &mut self,
        doc: &mut Document,
        sort: impl Fn(&Value, &Value) -> Ordering + 'static,
    ) {
        self.sort = Some(Rc::new(sort));
        self.rerender(doc);
    }

    pub fn clear_sort(&mut self, doc: &mut Document) {
        self.sort = None;
        self.rerender(doc);
    }

    pub fn set_loading(&mut self, doc: &mut Document, loading: bool) {
        self.loading = loading;
        self.rerender(doc);
    }

    pub fn set_error(&mut self, doc: &mut Document, error: Option<String>) {
        self.error = error;
        self.rerender(doc);
    }

    pub fn set_page(&mut self, doc: &mut Document, page: usize) {
        self.config.page = page.max(1);
        self.rerender(doc);
    }

    pub fn set_actions(&mut self, doc: &mut Document, actions: impl Into<ListActions>) {
        self.actions = actions.into().normalize();
        self.rerender(doc);
    }

    pub fn set_toolbar(&mut self, doc: &mut Document, toolbar: Vec<ToolbarAction>) {
        self.toolbar = toolbar;
        self.rerender(doc);
    }

    /// Merge `patch` and render once
    ///
    /// New items end the loading state unless the patch sets it too.
    pub fn update(&mut self, doc: &mut Document, patch: ListPatch) {
        if let Some(selected) = patch.selected {
            self.selected = Some(selected);
        }
        let items_loaded = patch.items.is_some();
        if let Some(items) = patch.items {
            self.items = items;
            self.loading = false;
        }
        if let Some(filter) = patch.filter {
            self.filter = filter;
        }
        if let Some(sort) = patch.sort {
            self.sort = sort;
        }
        if let Some(loading) = patch.loading {
            self.loading = loading;
        }
        if let Some(error) = patch.error {
            self.error = error;
        }
        if let Some(page) = patch.page {
            self.config.page = page.max(1);
        }
        if let Some(page_size) = patch.page_size {
            self.config.page_size = page_size;
        }
        if let Some(multi) = patch.multi {
            self.config.multi = multi;
            let view = self.derive_view();
            self.selection.set_mode(mode_for(multi), &view);
        }
        if let Some(empty_text) = patch.empty_text {
            self.config.empty_text = empty_text;
        }
        if let Some(actions) = patch.actions {
            self.actions = actions.normalize();
        }
        if let Some(toolbar) = patch.toolbar {
            self.toolbar = toolbar;
        }
        if items_loaded {
            self.apply_selected_predicate();
        }
        self.rerender(doc);
    }

    /// Re-run the render pass, returning its tree error
    pub fn refresh(&mut self, doc: &mut Document) -> Result<(), DomError> {
        self.rerender(doc);
        match &self.render_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    // ========================================================================
    // Selection
    // ========================================================================

    /// Replace the selection wholesale and notify once
    ///
    /// Items are resolved to keys through the key field, or through their
    /// position in the current view when they carry none. Items that
    /// resolve to nothing are ignored.
    pub fn set_selection<I, T>(&mut self, doc: &mut Document, targets: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<SelectionTarget>,
    {
        let keys: Vec<RowKey> = targets
            .into_iter()
            .filter_map(|target| self.resolve_target(target.into()))
            .collect();
        self.selection.replace(keys, &self.view);
        self.sync_selection_dom(doc);
        self.emit_selection();
    }

    /// Selected items of the current view
    pub fn get_selection(&self) -> Selection {
        self.selection.selection(&self.view)
    }

    /// Drop selected keys that match no row of the current view
    pub fn prune_stale_selection(&mut self) -> usize {
        let removed = self.selection.prune_stale(&self.view);
        if removed > 0 {
            tracing::debug!(target: "list", removed, "pruned stale selection keys");
        }
        removed
    }

    fn resolve_target(&self, target: SelectionTarget) -> Option<RowKey> {
        match target {
            SelectionTarget::Key(key) => Some(key),
            SelectionTarget::Item(item) => field_key(&item, &self.config.key_field).or_else(|| {
                self.view
                    .iter()
                    .position(|row| row.item == item)
                    .map(RowKey::positional)
            }),
        }
    }

    /// Select the rows of the would-be view that the predicate matches
    fn apply_selected_predicate(&mut self) {
        if !self.config.selectable {
            return;
        }
        let Some(predicate) = self.selected.clone() else {
            return;
        };
        let matched: Vec<RowKey> = self
            .derive_view()
            .into_iter()
            .filter(|row| predicate(&row.item))
            .map(|row| row.key)
            .collect();
        let matched = match self.selection.mode() {
            SelectionMode::Single => &matched[..matched.len().min(1)],
            SelectionMode::Multi => &matched[..],
        };
        for key in matched {
            self.selection.insert(key.clone());
        }
        if !matched.is_empty() {
            tracing::debug!(target: "list", selected = matched.len(), "initial selection");
        }
    }

    fn sync_selection_dom(&self, doc: &mut Document) {
        for (key, node) in &self.rows {
            doc.toggle_class(*node, classes::SELECTED, self.selection.contains(key));
        }
    }

    fn emit_selection(&self) {
        self.events
            .emit(&ListEvent::SelectionChanged(self.get_selection()));
    }

    // ========================================================================
    // Interaction
    // ========================================================================

    /// Classify a clicked node inside this list
    pub fn hit(&self, doc: &Document, target: NodeId) -> Option<ListHit> {
        if !doc.contains(self.root, target) {
            return None;
        }
        let action = doc
            .closest(target, |n| n.attrs.contains_key("data-action"))
            .and_then(|node| doc.attr(node, "data-action").map(str::to_string));
        let row_key = doc
            .closest_class(target, classes::LIST_ROW)
            .and_then(|row| doc.attr(row, "data-key"))
            .map(RowKey::new);

        match (action, row_key) {
            (Some(action), Some(key)) => Some(ListHit::Action { action, key }),
            (Some(action), None) => Some(ListHit::Toolbar(action)),
            (None, Some(key)) => Some(ListHit::Row(key)),
            (None, None) => None,
        }
    }

    /// Keyboard activation of the row holding `target`
    ///
    /// Enter and Space act as a click on the row; other keys are ignored.
    pub fn key_press(&mut self, doc: &mut Document, target: NodeId, key: &str) -> bool {
        if !matches!(key, "Enter" | " ") {
            return false;
        }
        match self.hit(doc, target) {
            Some(ListHit::Row(row)) => self.click_row(doc, &row),
            _ => false,
        }
    }

    /// Dispatch a click classified by [`ListRenderState::hit`]
    pub fn handle_hit(&mut self, doc: &mut Document, hit: ListHit) -> bool {
        match hit {
            ListHit::Row(key) => self.click_row(doc, &key),
            ListHit::Action { action, key } => self.click_action(&action, &key),
            ListHit::Toolbar(action) => self.click_toolbar(&action),
        }
    }

    /// Row click: focus the row, update selection (single replaces, multi
    /// toggles), sync classes, then notify
    pub fn click_row(&mut self, doc: &mut Document, key: &RowKey) -> bool {
        let Some(row) = self.view.iter().find(|row| &row.key == key) else {
            return false;
        };
        let item = row.item.clone();
        if let Some(node) = self.row_node(key) {
            doc.focus(node);
        }
        if self.config.selectable {
            self.selection.select(key.clone());
            self.sync_selection_dom(doc);
            self.emit_selection();
        }
        self.events.emit(&ListEvent::RowClick {
            key: key.clone(),
            item,
        });
        true
    }

    /// Row double click: notify only, selection is left to the clicks
    pub fn double_click_row(&mut self, key: &RowKey) -> bool {
        let Some(item) = self
            .view
            .iter()
            .find(|row| &row.key == key)
            .map(|row| row.item.clone())
        else {
            return false;
        };
        self.events.emit(&ListEvent::RowDoubleClick {
            key: key.clone(),
            item,
        });
        true
    }

    /// Run a row action's handler and notify
    pub fn click_action(&mut self, action_id: &str, key: &RowKey) -> bool {
        let Some(item) = self
            .view
            .iter()
            .find(|row| &row.key == key)
            .map(|row| row.item.clone())
        else {
            return false;
        };
        let Some(handler) = self
            .actions
            .iter()
            .find(|a| a.id == action_id)
            .map(|a| a.on_click.clone())
        else {
            return false;
        };
        if let Some(handler) = handler {
            handler(&item);
        }
        self.events.emit(&ListEvent::RowAction {
            action: action_id.to_string(),
            key: key.clone(),
            item,
        });
        true
    }

    /// Run a toolbar button's handler with the current selection
    pub fn click_toolbar(&mut self, action_id: &str) -> bool {
        let Some(handler) = self
            .toolbar
            .iter()
            .find(|a| a.id == action_id)
            .map(|a| a.on_click.clone())
        else {
            return false;
        };
        let selection = self.get_selection();
        if let Some(handler) = handler {
            handler(&selection);
        }
        self.events.emit(&ListEvent::ToolbarAction {
            action: action_id.to_string(),
            selection,
        });
        true
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Number of pages for the filtered items (at least 1)
    pub fn page_count(&self) -> usize {
        let matching = self.filtered().len();
        match self.config.page_size {
            Some(size) if size > 0 => matching.div_ceil(size).max(1),
            _ => 1,
        }
    }

    fn filtered(&self) -> Vec<&Value> {
        self.items
            .iter()
            .filter(|item| self.filter.as_ref().map_or(true, |f| f(*item)))
            .collect()
    }

    fn derive_view(&self) -> Vec<ViewRow> {
        let mut visible = self.filtered();
        if let Some(sort) = &self.sort {
            visible.sort_by(|a, b| sort(*a, *b));
        }

        let paged: Vec<&Value> = match self.config.page_size {
            Some(size) if size > 0 => {
                let pages = visible.len().div_ceil(size).max(1);
                let page = self.config.page.clamp(1, pages);
                visible.into_iter().skip((page - 1) * size).take(size).collect()
            }
            _ => visible,
        };

        paged
            .into_iter()
            .enumerate()
            .map(|(index, item)| ViewRow {
                key: derive_key(item, &self.config.key_field, index),
                item: item.clone(),
            })
            .collect()
    }

    fn rerender(&mut self, doc: &mut Document) {
        self.render_error = self.render(doc).err();
        if let Some(err) = &self.render_error {
            tracing::warn!(target: "list", pass = self.render_count, %err, "render failed");
        }
    }

    fn render(&mut self, doc: &mut Document) -> Result<(), DomError> {
        doc.clear_children(self.root);
        self.rows.clear();
        self.view = self.derive_view();
        self.render_count += 1;

        if !self.toolbar.is_empty() {
            let bar = doc.element("div", &[classes::LIST_TOOLBAR]);
            for action in &self.toolbar {
                let button = doc.text_element("button", &[classes::BUTTON], action.display_label());
                doc.set_attr(button, "data-action", action.id.as_str());
                doc.append_child(bar, button)?;
            }
            doc.append_child(self.root, bar)?;
        }

        if let Some(error) = &self.error {
            let node = doc.text_element("div", &[classes::LIST_ERROR], error.as_str());
            doc.append_child(self.root, node)?;
            tracing::debug!(target: "list", pass = self.render_count, "rendered error state");
            return Ok(());
        }
        if self.loading {
            let node = doc.text_element("div", &[classes::LIST_LOADING], "Loading...");
            doc.append_child(self.root, node)?;
            tracing::debug!(target: "list", pass = self.render_count, "rendered loading state");
            return Ok(());
        }
        if self.view.is_empty() {
            let node = doc.text_element("div", &[classes::LIST_EMPTY], self.config.empty_text.as_str());
            doc.append_child(self.root, node)?;
            tracing::debug!(target: "list", pass = self.render_count, "rendered empty state");
            return Ok(());
        }

        if self.config.card.is_none() && !self.config.columns.is_empty() {
            let header = doc.element("div", &[classes::LIST_HEADER]);
            for column in &self.config.columns {
                let label = if column.label.is_empty() {
                    &column.key
                } else {
                    &column.label
                };
                let cell = doc.text_element("span", &[classes::LIST_CELL], label.as_str());
                doc.append_child(header, cell)?;
            }
            doc.append_child(self.root, header)?;
        }

        for row in &self.view {
            let node = self.render_row(doc, row)?;
            doc.append_child(self.root, node)?;
            self.rows.push((row.key.clone(), node));
        }
        tracing::debug!(
            target: "list",
            pass = self.render_count,
            rows = self.view.len(),
            "rendered rows"
        );
        Ok(())
    }

    fn render_row(&self, doc: &mut Document, row: &ViewRow) -> Result<NodeId, DomError> {
        let node = doc.element("div", &[classes::LIST_ROW]);
        doc.set_attr(node, "data-key", row.key.as_str());
        doc.set_attr(node, "tabindex", "0");
        if self.selection.contains(&row.key) {
            doc.add_class(node, classes::SELECTED);
        }

        if let Some(card) = &self.config.card {
            render_card(doc, node, card, &row.item)?;
        } else if self.config.columns.is_empty() {
            let text = match &self.config.label_field {
                Some(field) => cell_text(row.item.get(field.as_str())),
                None => cell_text(Some(&row.item)),
            };
            doc.set_text(node, text);
        } else {
            for column in &self.config.columns {
                let cell = doc.text_element(
                    "span",
                    &[classes::LIST_CELL],
                    cell_text(row.item.get(column.key.as_str())),
                );
                doc.append_child(node, cell)?;
            }
        }

        if !self.actions.is_empty() {
            let bar = doc.element("div", &[classes::LIST_ACTIONS]);
            for action in &self.actions {
                let button = doc.text_element("button", &[classes::BUTTON], action.display_label());
                doc.set_attr(button, "data-action", action.id.as_str());
                doc.append_child(bar, button)?;
            }
            doc.append_child(node, bar)?;
        }
        Ok(node)
    }
}

fn slot_text(item: &Value, field: &str) -> Option<String> {
    match item.get(field)? {
        Value::Null => None,
        value => Some(cell_text(Some(value))).filter(|text| !text.is_empty()),
    }
}

/// Title, subtitle and badges stacked in the main block, meta beside it
fn render_card(
    doc: &mut Document,
    row: NodeId,
    card: &CardTemplate,
    item: &Value,
) -> Result<(), DomError> {
    let main = doc.element("div", &[classes::LIST_MAIN]);
    let slots = [
        (card.title.as_deref(), classes::LIST_TITLE),
        (card.subtitle.as_deref(), classes::LIST_SUBTITLE),
    ];
    for (field, class) in slots {
        if let Some(text) = field.and_then(|f| slot_text(item, f)) {
            let node = doc.text_element("div", &[class], text);
            doc.append_child(main, node)?;
        }
    }

    let badges: Vec<String> = card.badges.iter().filter_map(|f| slot_text(item, f)).collect();
    if !badges.is_empty() {
        let wrap = doc.element("div", &[classes::LIST_BADGES]);
        for badge in badges {
            let node = doc.text_element("span", &[classes::LIST_BADGE], badge);
            doc.append_child(wrap, node)?;
        }
        doc.append_child(main, wrap)?;
    }
    doc.append_child(row, main)?;

    if let Some(text) = card.meta.as_deref().and_then(|f| slot_text(item, f)) {
        let node = doc.text_element("div", &[classes::LIST_META], text);
        doc.append_child(row, node)?;
    }
    Ok(())
}

/// Something `set_selection` can resolve to a key
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionTarget {
    Item(Value),
    Key(RowKey),
}

impl From<Value> for SelectionTarget {
    fn from(item: Value) -> Self {
        SelectionTarget::Item(item)
    }
}

impl From<RowKey> for SelectionTarget {
    fn from(key: RowKey) -> Self {
        SelectionTarget::Key(key)
    }
}

impl From<&str> for SelectionTarget {
    fn from(key: &str) -> Self {
        SelectionTarget::Key(RowKey::new(key))
    }
}

/// A list paired with its document, for [`crate::async_control::with_async_state`]
pub struct ListLoad<'a> {
    pub list: &'a mut ListRenderState,
    pub doc: &'a mut Document,
}

impl<E: fmt::Display> AsyncStateSink<Vec<Value>, E> for ListLoad<'_> {
    fn set_loading(&mut self, loading: bool) {
        self.list.set_loading(self.doc, loading);
    }

    fn set_data(&mut self, data: &Vec<Value>) {
        self.list
            .update(self.doc, ListPatch::new().items(data.clone()).error(None));
    }

    fn set_error(&mut self, error: &E) {
        self.list.set_error(self.doc, Some(error.to_string()));
    }
}
