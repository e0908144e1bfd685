//! Declarative list component
//!
//! [`ListRenderState`] owns items and flags and re-derives its view on
//! every render; [`KeyedSelection`] tracks selection by [`RowKey`] so it
//! survives re-render, filtering, sorting and paging.

pub mod actions;
pub mod key;
pub mod selection;
pub mod state;

pub use actions::{ItemHandler, ListAction, ListActions, SelectionHandler, ToolbarAction};
pub use key::{derive_key, RowKey, ViewRow};
pub use selection::{KeyedSelection, Selection, SelectionMode};
pub use state::{
    CardTemplate, ListColumn, ListConfig, ListEvent, ListEventKind, ListHit, ListLoad, ListPatch,
    ListRenderState, SelectionTarget,
};
