//! Axis-aligned rectangles on the integer arena grid

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle (top-left corner + size)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: IVec2,
    pub size: IVec2,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        debug_assert!(w > 0 && h > 0, "figure sizes must be positive");
        Self {
            pos: IVec2::new(x, y),
            size: IVec2::new(w, h),
        }
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.pos.y + self.size.y
    }

    /// Center point (rounded toward the top-left)
    #[inline]
    pub fn center(&self) -> IVec2 {
        self.pos + self.size / 2
    }

    /// AABB overlap, inclusive of touching edges
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        overlaps(self, other)
    }

    /// Point strictly inside the rectangle (edges excluded)
    #[inline]
    pub fn contains_point_strict(&self, p: IVec2) -> bool {
        p.x > self.pos.x && p.x < self.right() && p.y > self.pos.y && p.y < self.bottom()
    }
}

/// True iff the projections of `a` and `b` overlap on both axes
///
/// Touching edges count as overlapping. Symmetric in its arguments.
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.right() >= b.pos.x && b.right() >= a.pos.x && a.bottom() >= b.pos.y && b.bottom() >= a.pos.y
}
