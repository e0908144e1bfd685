//! Selection tracked as a set of row keys
//!
//! Keys, not indices or item identity, so a selection survives re-render,
//! filtering, sorting, paging and item replacement as long as keys hold.
//! Keys of rows that have left the view stay in the set; they simply stop
//! resolving. [`KeyedSelection::prune_stale`] drops them on request.

use std::collections::BTreeSet;

use serde_json::Value;

use super::key::{RowKey, ViewRow};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SelectionMode {
    #[default]
    Single,
    Multi,
}

/// Observable selection, resolved against the current view
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Single(Option<Value>),
    Multi(Vec<Value>),
}

impl Selection {
    pub fn items(&self) -> Vec<&Value> {
        match self {
            Selection::Single(item) => item.iter().collect(),
            Selection::Multi(items) => items.iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Selection::Single(item) => usize::from(item.is_some()),
            Selection::Multi(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Default)]
pub struct KeyedSelection {
    keys: BTreeSet<RowKey>,
    mode: SelectionMode,
}

impl KeyedSelection {
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            keys: BTreeSet::new(),
            mode,
        }
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Switch mode; entering single mode keeps only the first selected
    /// row of `view`, or the lowest key when none of them is shown
    pub fn set_mode(&mut self, mode: SelectionMode, view: &[ViewRow]) {
        self.mode = mode;
        if mode == SelectionMode::Single && self.keys.len() > 1 {
            let first = self
                .resolve(view)
                .first()
                .map(|row| row.key.clone())
                .or_else(|| self.keys.iter().next().cloned());
            self.keys = first.into_iter().collect();
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &RowKey> {
        self.keys.iter()
    }

    pub fn contains(&self, key: &RowKey) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    /// Apply a row click: single mode selects only `key`, multi mode
    /// toggles it
    pub fn select(&mut self, key: RowKey) {
        match self.mode {
            SelectionMode::Single => {
                self.keys.clear();
                self.keys.insert(key);
            }
            SelectionMode::Multi => {
                if !self.keys.remove(&key) {
                    self.keys.insert(key);
                }
            }
        }
    }

    /// Add `key` without toggling; single mode replaces the selection
    pub fn insert(&mut self, key: RowKey) {
        if self.mode == SelectionMode::Single {
            self.keys.clear();
        }
        self.keys.insert(key);
    }

    /// Replace the whole set
    ///
    /// In single mode only one key is kept: the first requested key shown
    /// in `view`, else the first requested key.
    pub fn replace(&mut self, keys: impl IntoIterator<Item = RowKey>, view: &[ViewRow]) {
        let keys: Vec<RowKey> = keys.into_iter().collect();
        self.keys = match self.mode {
            SelectionMode::Single => keys
                .iter()
                .find(|key| view.iter().any(|row| &row.key == *key))
                .or_else(|| keys.first())
                .cloned()
                .into_iter()
                .collect(),
            SelectionMode::Multi => keys.into_iter().collect(),
        };
    }

    /// Rows of `view` whose key is selected, in view order
    pub fn resolve<'a>(&self, view: &'a [ViewRow]) -> Vec<&'a ViewRow> {
        view.iter().filter(|row| self.keys.contains(&row.key)).collect()
    }

    /// Observable selection for `view`
    pub fn selection(&self, view: &[ViewRow]) -> Selection {
        let rows = self.resolve(view);
        match self.mode {
            SelectionMode::Single => Selection::Single(rows.first().map(|r| r.item.clone())),
            SelectionMode::Multi => Selection::Multi(rows.into_iter().map(|r| r.item.clone()).collect()),
        }
    }

    /// Drop keys that no longer match any row of `view`, returning how
    /// many were removed
    pub fn prune_stale(&mut self, view: &[ViewRow]) -> usize {
        let before = self.keys.len();
        self.keys
            .retain(|key| view.iter().any(|row| &row.key == key));
        before - self.keys.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(key: &str, name: &str) -> ViewRow {
        ViewRow {
            key: RowKey::new(key),
            item: json!({"id": key, "name": name}),
        }
    }

    #[test]
    fn test_single_mode_select_is_exclusive() {
        let mut sel = KeyedSelection::new(SelectionMode::Single);
        sel.select("a".into());
        sel.select("b".into());
        assert_eq!(sel.keys().cloned().collect::<Vec<_>>(), vec![RowKey::new("b")]);

        // Reselecting keeps it selected
        sel.select("b".into());
        assert!(sel.contains(&"b".into()));
    }

    #[test]
    fn test_multi_mode_toggles() {
        let mut sel = KeyedSelection::new(SelectionMode::Multi);
        sel.select("a".into());
        sel.select("b".into());
        sel.select("a".into());
        assert_eq!(sel.keys().cloned().collect::<Vec<_>>(), vec![RowKey::new("b")]);
    }

    #[test]
    fn test_resolve_skips_stale_keys_without_purging() {
        let mut sel = KeyedSelection::new(SelectionMode::Multi);
        sel.replace(["a".into(), "gone".into()], &[]);
        let view = vec![row("a", "A"), row("b", "B")];

        assert_eq!(
            sel.selection(&view),
            Selection::Multi(vec![json!({"id": "a", "name": "A"})])
        );
        assert_eq!(sel.len(), 2);

        assert_eq!(sel.prune_stale(&view), 1);
        assert_eq!(sel.len(), 1);
    }

    #[test]
    fn test_single_mode_replace_keeps_first() {
        let mut sel = KeyedSelection::new(SelectionMode::Single);
        sel.replace(["x".into(), "y".into()], &[]);
        assert_eq!(sel.len(), 1);
        assert!(sel.contains(&"x".into()));
    }

    #[test]
    fn test_single_mode_replace_skips_keys_not_in_view() {
        let mut sel = KeyedSelection::new(SelectionMode::Single);
        let view = vec![row("b", "B"), row("c", "C")];
        sel.replace(["gone".into(), "c".into(), "b".into()], &view);
        assert_eq!(sel.keys().cloned().collect::<Vec<_>>(), vec![RowKey::new("c")]);
    }

    #[test]
    fn test_leaving_multi_keeps_first_row_in_view_order() {
        let mut sel = KeyedSelection::new(SelectionMode::Multi);
        // View order differs from key order
        let view = vec![row("z", "Zed"), row("m", "Mia"), row("a", "Ann")];
        sel.replace(["a".into(), "gone".into(), "m".into()], &view);

        sel.set_mode(SelectionMode::Single, &view);
        assert_eq!(sel.keys().cloned().collect::<Vec<_>>(), vec![RowKey::new("m")]);
    }

    #[test]
    fn test_leaving_multi_with_nothing_shown_keeps_lowest_key() {
        let mut sel = KeyedSelection::new(SelectionMode::Multi);
        sel.replace(["y".into(), "x".into()], &[]);
        sel.set_mode(SelectionMode::Single, &[]);
        assert_eq!(sel.keys().cloned().collect::<Vec<_>>(), vec![RowKey::new("x")]);
    }

    #[test]
    fn test_insert_does_not_toggle() {
        let mut sel = KeyedSelection::new(SelectionMode::Multi);
        sel.insert("a".into());
        sel.insert("a".into());
        sel.insert("b".into());
        assert_eq!(sel.len(), 2);

        sel.set_mode(SelectionMode::Single, &[]);
        sel.insert("c".into());
        assert_eq!(sel.keys().cloned().collect::<Vec<_>>(), vec![RowKey::new("c")]);
    }

    #[test]
    fn test_single_selection_empty_view() {
        let mut sel = KeyedSelection::new(SelectionMode::Single);
        sel.select("a".into());
        assert_eq!(sel.selection(&[]), Selection::Single(None));
    }
}
