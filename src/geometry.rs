//! Geometry primitives shared by layout, hit-testing, dragging and docking
//!
//! All functions here are pure (no document access) so drop placement can
//! be tested independently of the node tree.

use serde::{Deserialize, Serialize};

/// A point in viewport coordinates (logical pixels)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Offset of `self` relative to `origin`
    pub fn delta_from(&self, origin: Point) -> Point {
        Point::new(self.x - origin.x, self.y - origin.y)
    }

    pub fn translate(&self, delta: Point) -> Point {
        Point::new(self.x + delta.x, self.y + delta.y)
    }
}

/// Axis-aligned rectangle in viewport coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px < self.x + self.width && py >= self.y && py < self.y + self.height
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Horizontal midpoint
    pub fn mid_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Vertical midpoint
    pub fn mid_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// Center a `width` x `height` box inside this rect
    pub fn centered(&self, width: f32, height: f32) -> Rect {
        Rect::new(
            self.x + (self.width - width) / 2.0,
            self.y + (self.height - height) / 2.0,
            width,
            height,
        )
    }
}

/// Window placement during a drag: `window_start + (pointer - pointer_start)`
///
/// This is a plain delta translation; the grab offset inside the window is
/// preserved implicitly.
pub fn drag_position(window_start: Point, pointer_start: Point, pointer: Point) -> Point {
    window_start.translate(pointer.delta_from(pointer_start))
}

/// Scan siblings top-to-bottom and return the index of the first one whose
/// vertical midpoint lies below `y`.
///
/// `None` means "append after the last sibling".
pub fn insertion_index<I>(sibling_rects: I, y: f32) -> Option<usize>
where
    I: IntoIterator<Item = Rect>,
{
    sibling_rects
        .into_iter()
        .position(|rect| y < rect.mid_y())
}

/// Index of the rect whose horizontal midpoint is nearest to `x`
///
/// Ties go to the earliest rect.
pub fn nearest_by_center_x<I>(rects: I, x: f32) -> Option<usize>
where
    I: IntoIterator<Item = Rect>,
{
    let mut best: Option<(usize, f32)> = None;
    for (index, rect) in rects.into_iter().enumerate() {
        let distance = (x - rect.mid_x()).abs();
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((index, distance)),
        }
    }
    best.map(|(index, _)| index)
}
