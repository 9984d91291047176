//=========================================================================
// Geometry
//=========================================================================
//
// Axis-aligned primitives shared by every spatial system.
//
// Coordinate space: pixels, top-left origin, +X right, +Y down.
// A `Rect` is `[x, x + w] × [y, y + h]`. Point containment is inclusive
// on all edges so a rectangle resting flush against a window edge still
// counts as inside it.
//
//=========================================================================

//=== Vec2 ================================================================

/// Two-component vector used for displacements, sizes and scale factors.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };
    pub const ONE: Self = Self { x: 1.0, y: 1.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns `true` if both components are exactly zero.
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

//=== Rect ================================================================

/// Axis-aligned rectangle (position + size).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    //--- Edges ------------------------------------------------------------

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.w, self.h)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    //--- Derived Rectangles -----------------------------------------------

    /// Returns a copy moved by `(dx, dy)`.
    pub fn translate(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.w, self.h)
    }

    /// Returns a copy with the same origin and a new size.
    pub fn with_size(&self, size: Vec2) -> Self {
        Self::new(self.x, self.y, size.x, size.y)
    }

    /// Returns a copy with the same size and a new origin.
    pub fn with_position(&self, position: Vec2) -> Self {
        Self::new(position.x, position.y, self.w, self.h)
    }

    /// Overlapping area of two rectangles, if any.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.left().max(other.left());
        let top = self.top().max(other.top());
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if right > left && bottom > top {
            Some(Rect::new(left, top, right - left, bottom - top))
        } else {
            None
        }
    }

    //--- Predicates -------------------------------------------------------

    /// Strict overlap test: rectangles that only share an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// Returns `true` if `other` lies entirely within `self` (edges inclusive).
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.left() >= self.left()
            && other.right() <= self.right()
            && other.top() >= self.top()
            && other.bottom() <= self.bottom()
    }

    /// Inclusive point containment.
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.top() && p.y <= self.bottom()
    }

    /// Returns `true` if the horizontal spans overlap by a positive amount.
    pub fn overlaps_x(&self, other: &Rect) -> bool {
        self.left() < other.right() && other.left() < self.right()
    }

    /// Returns `true` if the vertical spans overlap by a positive amount.
    pub fn overlaps_y(&self, other: &Rect) -> bool {
        self.top() < other.bottom() && other.top() < self.bottom()
    }

    /// Edge adjacency: facing edges within `tolerance` and the rectangles
    /// overlap on the perpendicular axis.
    pub fn is_adjacent(&self, other: &Rect, tolerance: f32) -> bool {
        let side_by_side = ((self.right() - other.left()).abs() <= tolerance
            || (other.right() - self.left()).abs() <= tolerance)
            && self.overlaps_y(other);

        let stacked = ((self.bottom() - other.top()).abs() <= tolerance
            || (other.bottom() - self.top()).abs() <= tolerance)
            && self.overlaps_x(other);

        side_by_side || stacked
    }

    //--- Sample Points ----------------------------------------------------

    /// Four corners followed by the center.
    pub fn sample_points(&self) -> [Vec2; 5] {
        [
            Vec2::new(self.left(), self.top()),
            Vec2::new(self.right(), self.top()),
            Vec2::new(self.left(), self.bottom()),
            Vec2::new(self.right(), self.bottom()),
            self.center(),
        ]
    }

    /// Four corners followed by the four edge midpoints.
    pub fn probe_points(&self) -> [Vec2; 8] {
        let c = self.center();
        [
            Vec2::new(self.left(), self.top()),
            Vec2::new(self.right(), self.top()),
            Vec2::new(self.left(), self.bottom()),
            Vec2::new(self.right(), self.bottom()),
            Vec2::new(c.x, self.top()),
            Vec2::new(c.x, self.bottom()),
            Vec2::new(self.left(), c.y),
            Vec2::new(self.right(), c.y),
        ]
    }
}

//=== Stepping ============================================================

/// Moves `v` one pixel toward zero, landing on zero from within a pixel.
pub fn step_toward_zero(v: f32) -> f32 {
    if v.abs() <= 1.0 {
        0.0
    } else {
        v - v.signum()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stepping_reaches_zero_from_either_side() {
        assert_eq!(step_toward_zero(3.0), 2.0);
        assert_eq!(step_toward_zero(-2.5), -1.5);
        assert_eq!(step_toward_zero(0.4), 0.0);
        assert_eq!(step_toward_zero(-1.0), 0.0);
    }

    #[test]
    fn edge_sharing_rects_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 300.0, 200.0);
        let b = Rect::new(300.0, 0.0, 300.0, 200.0);
        assert!(!a.intersects(&b));
        assert!(a.intersection(&b).is_none());
    }

    #[test]
    fn containment_is_edge_inclusive() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(outer.contains_rect(&Rect::new(60.0, 60.0, 40.0, 40.0)));
        assert!(!outer.contains_rect(&Rect::new(61.0, 60.0, 40.0, 40.0)));
        assert!(outer.contains_point(Vec2::new(100.0, 100.0)));
    }

    #[test]
    fn adjacency_requires_perpendicular_overlap() {
        let a = Rect::new(0.0, 0.0, 300.0, 200.0);
        let beside = Rect::new(303.0, 50.0, 100.0, 100.0);
        let diagonal = Rect::new(303.0, 210.0, 100.0, 100.0);

        assert!(a.is_adjacent(&beside, 5.0));
        assert!(!a.is_adjacent(&beside, 2.0));
        assert!(!a.is_adjacent(&diagonal, 5.0));
    }

    #[test]
    fn intersection_area() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(50.0, 25.0, 100.0, 50.0);
        assert_eq!(a.intersection(&b), Some(Rect::new(50.0, 25.0, 50.0, 50.0)));
    }
}
