//! miniwin - composable mini-window toolkit
//!
//! Windows docked into columns, dragged between them, floated as modals and
//! resized with persisted heights, plus a declarative list component with
//! filter, sort, paging and key-stable selection. Everything runs against a
//! headless [`dom::Document`]; input arrives as [`Msg`] values dispatched
//! through [`update::update`], Elm-style.

pub mod async_control;
pub mod chat;
pub mod cli;
pub mod commands;
pub mod components;
pub mod config;
pub mod config_paths;
pub mod dock;
pub mod dom;
pub mod error;
pub mod fields;
pub mod form;
pub mod geometry;
pub mod list;
pub mod messages;
pub mod pubsub;
pub mod store;
pub mod tracing;
pub mod update;
pub mod window;
pub mod workspace;

// Re-export commonly used types
pub use commands::Cmd;
pub use config::ToolkitConfig;
pub use messages::Msg;
pub use window::{WindowConfig, WindowController, WindowId};
pub use workspace::Workspace;
