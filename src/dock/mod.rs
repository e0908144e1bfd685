//! Moving windows between columns and the floating layer
//!
//! - [`drag`]: pointer-driven reflow between columns
//! - [`transition`]: explicit dock / undock

pub mod drag;
pub mod transition;

pub use drag::{DockDragEngine, DragKind, DragSession, DropOutcome};
pub use transition::{dock, fade_preference, is_floating, modal_wrap, mount_modal, undock};
