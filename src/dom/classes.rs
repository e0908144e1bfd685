//! Class names with layout or behavioral meaning
//!
//! These play the role a stylesheet plays in a browser: layout and
//! hit-testing key off them, and the drag engine recognizes columns and
//! window chrome by them.

pub const COLUMNS: &str = "columns";
/// Drop-target marker class for docking columns
pub const COLUMN: &str = "col";
pub const WINDOW: &str = "miniwin";
pub const TITLEBAR: &str = "titlebar";
pub const TITLE: &str = "title";
pub const ACTIONS: &str = "actions";
pub const ICON_BUTTON: &str = "icon-btn";
pub const CONTENT: &str = "content";
pub const CONTENT_INNER: &str = "content-inner";
pub const RESIZER: &str = "win-resizer-y";

pub const MINIMIZE_BUTTON: &str = "js-min";
pub const DOCK_TOGGLE_BUTTON: &str = "js-dock-toggle";
pub const CLOSE_BUTTON: &str = "js-close";

pub const MODAL: &str = "modal";
pub const MODAL_WRAP: &str = "modal-wrap";
pub const MODAL_BACKDROP: &str = "modal-backdrop";
pub const COLLAPSED: &str = "collapsed";

pub const DRAGGING: &str = "dragging";
pub const DROP_MARKER: &str = "drop-marker";
pub const DROP_CANDIDATE: &str = "drop-candidate";

pub const DIALOG_OVERLAY: &str = "modal-overlay";
pub const DIALOG: &str = "dialog";
pub const DIALOG_HEADER: &str = "dialog-header";
pub const DIALOG_TITLE: &str = "dialog-title";
pub const DIALOG_CLOSE: &str = "dialog-close";
pub const DIALOG_BODY: &str = "dialog-body";

pub const ITEM_LIST: &str = "item-list";
pub const LIST_HEADER: &str = "lv-head";
pub const LIST_ROW: &str = "lv-row";
pub const LIST_CELL: &str = "lv-cell";
pub const LIST_EMPTY: &str = "lv-empty";
pub const LIST_ERROR: &str = "list-error";
pub const LIST_LOADING: &str = "list-loading";
pub const LIST_ACTIONS: &str = "lv-actions";
pub const LIST_TOOLBAR: &str = "list-toolbar";
pub const LIST_MAIN: &str = "lv-main";
pub const LIST_TITLE: &str = "lv-title";
pub const LIST_SUBTITLE: &str = "lv-subtitle";
pub const LIST_BADGES: &str = "lv-badges";
pub const LIST_BADGE: &str = "lv-badge";
pub const LIST_META: &str = "lv-meta";
pub const SELECTED: &str = "is-selected";

pub const FORM: &str = "form";
pub const FIELD_ROW: &str = "field-row";
pub const FIELD_LABEL: &str = "field-label";
pub const FIELD_ERROR: &str = "field-error";
pub const FORM_STATUS: &str = "form-status";
pub const BUTTON: &str = "btn";

pub const CHAT_WINDOW: &str = "is-chat";
pub const CHAT_LOG: &str = "chat-log";
pub const CHAT_MESSAGE: &str = "chat-msg";
pub const CHAT_META: &str = "chat-meta";
pub const CHAT_INPUT: &str = "chat-input";
pub const CHAT_EMPTY: &str = "chat-empty";
