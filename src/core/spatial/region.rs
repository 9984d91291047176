//=========================================================================
// Movable Region
//=========================================================================
//
// The set of positions an entity inside a window may legally occupy:
// the window's own bounds unioned with every other visible window that
// overlaps it or abuts it within the adjacency tolerance.
//
// Architecture:
//   base window ─┐
//                ├─ intersects / is_adjacent ─→ Vec<Rect> (union, unmerged)
//   others ──────┘
//
// The union is kept as a list of rectangles; membership is "inside any".
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::geometry::{Rect, Vec2};

//=== MovableRegion =======================================================

/// Union of rectangles an entity may move within.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MovableRegion {
    rects: Vec<Rect>,
}

impl MovableRegion {
    /// Region consisting of a single rectangle.
    pub fn single(rect: Rect) -> Self {
        Self { rects: vec![rect] }
    }

    /// Builds the region of `base` from a snapshot of the other visible windows.
    ///
    /// Only direct neighbours of `base` join the region; walking further
    /// across a chain of windows happens by migrating parents as the entity
    /// crosses each boundary.
    pub fn compute(base: Rect, others: &[Rect], tolerance: f32) -> Self {
        let mut rects = Vec::with_capacity(others.len() + 1);
        rects.push(base);

        for other in others {
            if base.intersects(other) || base.is_adjacent(other, tolerance) {
                rects.push(*other);
            }
        }

        Self { rects }
    }

    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    pub fn contains_point(&self, p: Vec2) -> bool {
        self.rects.iter().any(|r| r.contains_point(p))
    }

    /// Returns `true` if every corner and every edge midpoint of `rect`
    /// lies inside the region.
    pub fn contains(&self, rect: &Rect) -> bool {
        rect.probe_points().iter().all(|&p| self.contains_point(p))
    }

    /// Smallest rectangle enclosing the whole region.
    pub fn bounding_box(&self) -> Option<Rect> {
        let first = self.rects.first()?;
        let (mut l, mut t, mut r, mut b) = (first.left(), first.top(), first.right(), first.bottom());
        for rect in &self.rects[1..] {
            l = l.min(rect.left());
            t = t.min(rect.top());
            r = r.max(rect.right());
            b = b.max(rect.bottom());
        }
        Some(Rect::new(l, t, r - l, b - t))
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
