//! Drag session state machine
//!
//! `Idle` is `session == None`; `Dragging(kind)` is `Some(DragSession)`.
//! A new drag only starts from `Idle`. Every exit path (drop, capture loss,
//! closing the dragged window) goes through one reset so no pinned width,
//! explicit offset or suspended pointer-events outlives the session.

use crate::dom::{
    classes, elements_from_point, Document, InlineStyle, NodeId, PointerEvents, Positioning,
};
use crate::geometry::{drag_position, insertion_index, Point};

/// How a drag treats its window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKind {
    /// Docked window: follows the pointer and is re-inserted on drop
    ColumnReflow,
    /// Floating window: repositioned only, never docked by a drop
    ModalFloat,
}

/// The one in-progress window move
#[derive(Debug, Clone)]
pub struct DragSession {
    pub window: NodeId,
    pub kind: DragKind,
    pub pointer_start: Point,
    pub window_start: Point,
    /// Column currently highlighted as drop candidate
    pub preview_column: Option<NodeId>,
    /// Floating wrapper whose pointer-events are suspended
    pub modal_wrap: Option<NodeId>,
    original_style: InlineStyle,
    original_wrap_events: Option<PointerEvents>,
}

/// How a finished drag ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// Moved into `column` at child position `index`
    Docked { column: NodeId, index: usize },
    /// No drop column resolved; the window kept its place
    Stayed,
    /// Floating window repositioned
    Floated,
}

/// Pointer-driven window dragging between columns
#[derive(Debug)]
pub struct DockDragEngine {
    session: Option<DragSession>,
    marker: NodeId,
    columns_el: Option<NodeId>,
    columns: Vec<NodeId>,
}

impl DockDragEngine {
    /// Create the engine for the given columns (discovered by marker class)
    pub fn new(doc: &mut Document, columns_el: Option<NodeId>, columns: Vec<NodeId>) -> Self {
        let marker = doc.element("div", &[classes::DROP_MARKER]);
        Self {
            session: None,
            marker,
            columns_el,
            columns,
        }
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// The insertion preview node (detached while not previewing)
    pub fn marker(&self) -> NodeId {
        self.marker
    }

    pub fn columns(&self) -> &[NodeId] {
        &self.columns
    }

    /// Window whose title bar is under `target`, excluding its buttons
    pub fn find_draggable_window(doc: &Document, target: NodeId) -> Option<NodeId> {
        let titlebar = doc.closest_class(target, classes::TITLEBAR)?;
        if doc.closest_class(target, classes::ACTIONS).is_some()
            || doc.closest_class(target, classes::ICON_BUTTON).is_some()
        {
            return None;
        }
        doc.closest_class(titlebar, classes::WINDOW)
    }

    /// Topmost drop column under `point`
    pub fn column_at(&self, doc: &Document, point: Point) -> Option<NodeId> {
        elements_from_point(doc, point)
            .into_iter()
            .find(|id| doc.has_class(*id, classes::COLUMN))
    }

    /// Idle → Dragging when `target` is draggable window chrome
    pub fn pointer_down(&mut self, doc: &mut Document, target: NodeId, point: Point) -> bool {
        if self.session.is_some() {
            return false;
        }
        let Some(window) = Self::find_draggable_window(doc, target) else {
            return false;
        };

        if !doc.exists(self.marker) {
            // Removing the column that held the preview destroyed it
            self.marker = doc.element("div", &[classes::DROP_MARKER]);
        }

        let kind = if doc.has_class(window, classes::MODAL) {
            DragKind::ModalFloat
        } else {
            DragKind::ColumnReflow
        };
        let rect = doc.rect(window);
        let original_style = doc.style(window).cloned().unwrap_or_default();

        doc.add_class(window, classes::DRAGGING);
        doc.update_style(window, |s| s.drag_width = Some(rect.width));

        let mut modal_wrap = None;
        let mut original_wrap_events = None;
        match kind {
            DragKind::ModalFloat => {
                if let Some(wrap) = doc.closest_class(window, classes::MODAL_WRAP) {
                    original_wrap_events = doc.style(wrap).and_then(|s| s.pointer_events);
                    doc.update_style(wrap, |s| s.pointer_events = Some(PointerEvents::None));
                    modal_wrap = Some(wrap);
                }
            }
            DragKind::ColumnReflow => {
                if let Some(columns_el) = self.columns_el {
                    doc.add_class(columns_el, classes::DRAGGING);
                }
                doc.update_style(window, |s| {
                    s.position = Some(Positioning::Fixed);
                    s.left = Some(rect.x);
                    s.top = Some(rect.y);
                    s.pointer_events = Some(PointerEvents::None);
                });
            }
        }

        tracing::debug!(target: "drag", %window, ?kind, x = point.x, y = point.y, "drag start");
        self.session = Some(DragSession {
            window,
            kind,
            pointer_start: point,
            window_start: rect.origin(),
            preview_column: None,
            modal_wrap,
            original_style,
            original_wrap_events,
        });
        true
    }

    /// Follow the pointer; column drags also refresh the drop preview
    pub fn pointer_move(&mut self, doc: &mut Document, point: Point) -> bool {
        let Some(session) = &self.session else {
            return false;
        };
        let (window, kind) = (session.window, session.kind);
        let position = drag_position(session.window_start, session.pointer_start, point);
        doc.update_style(window, |s| {
            s.left = Some(position.x);
            s.top = Some(position.y);
        });

        if kind == DragKind::ColumnReflow {
            self.update_preview(doc, point);
        }
        true
    }

    fn update_preview(&mut self, doc: &mut Document, point: Point) {
        let Some(window) = self.session.as_ref().map(|s| s.window) else {
            return;
        };
        for column in &self.columns {
            doc.remove_class(*column, classes::DROP_CANDIDATE);
        }

        let over = self.column_at(doc, point);
        match over {
            Some(column) => {
                doc.add_class(column, classes::DROP_CANDIDATE);
                let siblings: Vec<NodeId> = doc
                    .descendants_with_class(column, classes::WINDOW)
                    .into_iter()
                    .filter(|w| *w != window && doc.parent(*w) == Some(column))
                    .collect();
                let rects = siblings.iter().map(|w| doc.rect(*w));
                let placed = match insertion_index(rects, point.y) {
                    Some(index) => doc.insert_before(column, self.marker, siblings[index]),
                    None => doc.append_child(column, self.marker),
                };
                if let Err(e) = placed {
                    tracing::warn!(target: "drag", "could not place drop marker: {}", e);
                }
            }
            None => doc.detach(self.marker),
        }

        if let Some(session) = &mut self.session {
            session.preview_column = over;
        }
    }

    /// Dragging → Idle, committing a column drop
    ///
    /// The preview is refreshed at the release point first, so a drop
    /// lands where the last preview showed it.
    pub fn pointer_up(&mut self, doc: &mut Document, point: Point) -> Option<DropOutcome> {
        let kind = self.session.as_ref()?.kind;
        if kind == DragKind::ColumnReflow {
            self.update_preview(doc, point);
        }
        let session = self.session.take()?;
        let window = session.window;

        let outcome = match kind {
            DragKind::ColumnReflow => {
                let marker_parent = doc.parent(self.marker);
                let target = marker_parent
                    .or_else(|| self.column_at(doc, point))
                    .filter(|column| doc.is_connected(*column) && doc.exists(window));

                self.clear_drag_decorations(doc, window);
                doc.update_style(window, InlineStyle::clear_positioning);

                match target {
                    Some(column) => {
                        let placed = if marker_parent == Some(column) {
                            doc.insert_before(column, window, self.marker)
                        } else {
                            doc.append_child(column, window)
                        };
                        doc.detach(self.marker);
                        match placed {
                            Ok(()) => {
                                doc.focus(window);
                                let index = doc
                                    .children(column)
                                    .iter()
                                    .position(|c| *c == window)
                                    .unwrap_or_default();
                                DropOutcome::Docked { column, index }
                            }
                            Err(e) => {
                                tracing::warn!(target: "drag", "drop failed, window stays: {}", e);
                                DropOutcome::Stayed
                            }
                        }
                    }
                    None => {
                        doc.detach(self.marker);
                        DropOutcome::Stayed
                    }
                }
            }
            DragKind::ModalFloat => {
                doc.remove_class(window, classes::DRAGGING);
                doc.update_style(window, |s| s.drag_width = None);
                DropOutcome::Floated
            }
        };

        self.restore_wrap(doc, &session);
        tracing::debug!(target: "drag", %window, ?outcome, "drag end");
        Some(outcome)
    }

    /// Abort the session: restore the window's pre-drag style, move nothing
    pub fn capture_lost(&mut self, doc: &mut Document) -> bool {
        let Some(session) = self.session.take() else {
            return false;
        };
        self.clear_drag_decorations(doc, session.window);
        let original = session.original_style.clone();
        doc.update_style(session.window, |s| *s = original);
        doc.detach(self.marker);
        self.restore_wrap(doc, &session);
        tracing::debug!(target: "drag", window = %session.window, "drag aborted");
        true
    }

    /// Abort a session targeting `window` (called before it is removed)
    pub fn forget_window(&mut self, doc: &mut Document, window: NodeId) {
        if self.session.as_ref().is_some_and(|s| s.window == window) {
            self.capture_lost(doc);
        }
    }

    fn clear_drag_decorations(&self, doc: &mut Document, window: NodeId) {
        for column in &self.columns {
            doc.remove_class(*column, classes::DROP_CANDIDATE);
        }
        if let Some(columns_el) = self.columns_el {
            doc.remove_class(columns_el, classes::DRAGGING);
        }
        doc.remove_class(window, classes::DRAGGING);
    }

    fn restore_wrap(&self, doc: &mut Document, session: &DragSession) {
        if let Some(wrap) = session.modal_wrap {
            if doc.is_connected(wrap) {
                let events = session.original_wrap_events;
                doc.update_style(wrap, |s| s.pointer_events = events);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{layout, LayoutMetrics};
    use crate::geometry::Rect;

    struct Fixture {
        doc: Document,
        engine: DockDragEngine,
        left: NodeId,
        right: NodeId,
        metrics: LayoutMetrics,
    }

    fn window(doc: &mut Document, column: NodeId) -> (NodeId, NodeId) {
        let win = doc.element("div", &[classes::WINDOW]);
        let bar = doc.element("div", &[classes::TITLEBAR]);
        let actions = doc.element("div", &[classes::ACTIONS]);
        let close = doc.element("button", &[classes::ICON_BUTTON]);
        doc.append_child(column, win).unwrap();
        doc.append_child(win, bar).unwrap();
        doc.append_child(bar, actions).unwrap();
        doc.append_child(actions, close).unwrap();
        (win, bar)
    }

    fn fixture() -> Fixture {
        let mut doc = Document::new();
        let columns_el = doc.element("div", &[classes::COLUMNS]);
        let left = doc.element("div", &[classes::COLUMN]);
        let right = doc.element("div", &[classes::COLUMN]);
        doc.append_child(doc.body(), columns_el).unwrap();
        doc.append_child(columns_el, left).unwrap();
        doc.append_child(columns_el, right).unwrap();
        let engine = DockDragEngine::new(&mut doc, Some(columns_el), vec![left, right]);
        let metrics = LayoutMetrics {
            viewport_width: 800.0,
            viewport_height: 600.0,
            column_gap: 0.0,
            column_padding: 0.0,
            window_gap: 0.0,
            default_window_height: 200.0,
            ..LayoutMetrics::default()
        };
        Fixture {
            doc,
            engine,
            left,
            right,
            metrics,
        }
    }

    #[test]
    fn test_buttons_do_not_start_drag() {
        let mut f = fixture();
        let (win, bar) = window(&mut f.doc, f.left);
        let close = f.doc.descendants_with_class(win, classes::ICON_BUTTON)[0];
        layout(&mut f.doc, &f.metrics);

        assert!(!f.engine.pointer_down(&mut f.doc, close, Point::new(390.0, 10.0)));
        assert!(!f.engine.is_dragging());
        assert!(f.engine.pointer_down(&mut f.doc, bar, Point::new(10.0, 10.0)));
        assert_eq!(f.engine.session().map(|s| s.kind), Some(DragKind::ColumnReflow));
    }

    #[test]
    fn test_second_pointer_down_is_ignored_while_dragging() {
        let mut f = fixture();
        let (_, bar_a) = window(&mut f.doc, f.left);
        let (_, bar_b) = window(&mut f.doc, f.left);
        layout(&mut f.doc, &f.metrics);

        assert!(f.engine.pointer_down(&mut f.doc, bar_a, Point::new(10.0, 10.0)));
        assert!(!f.engine.pointer_down(&mut f.doc, bar_b, Point::new(10.0, 210.0)));
    }

    #[test]
    fn test_drop_moves_window_and_strips_drag_styles() {
        let mut f = fixture();
        let (win, bar) = window(&mut f.doc, f.left);
        let (existing, _) = window(&mut f.doc, f.right);
        layout(&mut f.doc, &f.metrics);

        f.engine.pointer_down(&mut f.doc, bar, Point::new(10.0, 10.0));
        let style = f.doc.style(win).unwrap();
        assert_eq!(style.position, Some(Positioning::Fixed));
        assert_eq!(style.drag_width, Some(400.0));

        f.engine.pointer_move(&mut f.doc, Point::new(500.0, 50.0));
        assert_eq!(f.doc.style(win).unwrap().left, Some(490.0));
        assert!(f.doc.has_class(f.right, classes::DROP_CANDIDATE));
        // Pointer above the existing window's midpoint: marker goes first
        assert_eq!(f.doc.children(f.right)[0], f.engine.marker());

        let outcome = f.engine.pointer_up(&mut f.doc, Point::new(500.0, 50.0));
        assert_eq!(
            outcome,
            Some(DropOutcome::Docked {
                column: f.right,
                index: 0
            })
        );
        assert_eq!(f.doc.children(f.right), &[win, existing]);
        assert!(f.doc.style(win).unwrap().is_free_of_drag_styling());
        assert!(!f.doc.has_class(win, classes::DRAGGING));
        assert!(!f.doc.has_class(f.right, classes::DROP_CANDIDATE));
        assert_eq!(f.doc.parent(f.engine.marker()), None);
        assert_eq!(f.doc.focused(), Some(win));
        assert!(!f.engine.is_dragging());
    }

    #[test]
    fn test_drop_outside_columns_keeps_place() {
        let mut f = fixture();
        // Shrink the right column so there is space outside any column
        let (win, bar) = window(&mut f.doc, f.left);
        layout(&mut f.doc, &f.metrics);
        f.doc.set_rect(f.left, Rect::new(0.0, 0.0, 400.0, 300.0));
        f.doc.set_rect(f.right, Rect::new(400.0, 0.0, 400.0, 300.0));

        f.engine.pointer_down(&mut f.doc, bar, Point::new(10.0, 10.0));
        f.engine.pointer_move(&mut f.doc, Point::new(300.0, 500.0));
        assert_eq!(f.doc.parent(f.engine.marker()), None);

        let outcome = f.engine.pointer_up(&mut f.doc, Point::new(300.0, 500.0));
        assert_eq!(outcome, Some(DropOutcome::Stayed));
        assert_eq!(f.doc.parent(win), Some(f.left));
        assert!(f.doc.style(win).unwrap().is_free_of_drag_styling());
    }

    #[test]
    fn test_capture_lost_restores_pre_drag_state() {
        let mut f = fixture();
        let (win, bar) = window(&mut f.doc, f.left);
        f.doc.update_style(win, |s| s.height = Some(300.0));
        layout(&mut f.doc, &f.metrics);
        let before = f.doc.style(win).cloned().unwrap();

        f.engine.pointer_down(&mut f.doc, bar, Point::new(10.0, 10.0));
        f.engine.pointer_move(&mut f.doc, Point::new(500.0, 20.0));
        assert!(f.engine.capture_lost(&mut f.doc));

        assert_eq!(f.doc.style(win).cloned().unwrap(), before);
        assert_eq!(f.doc.parent(win), Some(f.left));
        assert_eq!(f.doc.parent(f.engine.marker()), None);
        assert!(!f.doc.has_class(f.right, classes::DROP_CANDIDATE));
        assert!(!f.engine.is_dragging());
    }

    #[test]
    fn test_modal_drag_never_docks() {
        let mut f = fixture();
        let wrap = f.doc.element("div", &[classes::MODAL_WRAP]);
        f.doc.append_child(f.doc.body(), wrap).unwrap();
        let (win, bar) = window(&mut f.doc, wrap);
        f.doc.add_class(win, classes::MODAL);
        layout(&mut f.doc, &f.metrics);
        let start = f.doc.rect(win);

        let grab = Point::new(start.x + 5.0, start.y + 5.0);
        assert!(f.engine.pointer_down(&mut f.doc, bar, grab));
        assert_eq!(
            f.doc.style(wrap).unwrap().pointer_events,
            Some(PointerEvents::None)
        );

        f.engine.pointer_move(&mut f.doc, Point::new(100.0, 100.0));
        let outcome = f.engine.pointer_up(&mut f.doc, Point::new(100.0, 100.0));

        assert_eq!(outcome, Some(DropOutcome::Floated));
        assert_eq!(f.doc.parent(win), Some(wrap));
        assert_eq!(f.doc.style(wrap).unwrap().pointer_events, None);
        assert_eq!(f.doc.style(win).unwrap().drag_width, None);
        assert_eq!(f.doc.style(win).unwrap().left, Some(95.0));
        assert!(f.doc.children(f.left).is_empty());
    }
}
