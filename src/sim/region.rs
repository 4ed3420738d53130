//! Axis-aligned rectangles in screen space (y grows downward)

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundedRegion {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundedRegion {
    /// Create a region; negative extents collapse to zero
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Region of the given size centered on `center`
    pub fn from_center(center: Vec2, width: f32, height: f32) -> Self {
        Self::new(center.x - width / 2.0, center.y - height / 2.0, width, height)
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    #[inline]
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Half-open containment: `[x, x+width) × [y, y+height)`.
    ///
    /// Sibling quadrants tile their parent under this rule, so a point on a
    /// shared edge belongs to exactly one of them.
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }

    /// Inclusive AABB overlap. Edge contact counts as intersecting.
    #[inline]
    pub fn intersects(&self, other: &BoundedRegion) -> bool {
        self.x <= other.right()
            && other.x <= self.right()
            && self.y <= other.bottom()
            && other.y <= self.bottom()
    }

    /// Grow by `margin` on every side (same center)
    pub fn inflate(&self, margin: f32) -> Self {
        Self::new(
            self.x - margin,
            self.y - margin,
            self.width + 2.0 * margin,
            self.height + 2.0 * margin,
        )
    }

    /// Smallest region covering both
    pub fn union(&self, other: &BoundedRegion) -> Self {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Self::new(
            x,
            y,
            self.right().max(other.right()) - x,
            self.bottom().max(other.bottom()) - y,
        )
    }

    /// Overlapping part of both regions, if it has any area
    pub fn intersection(&self, other: &BoundedRegion) -> Option<Self> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        (right > x && bottom > y).then(|| Self::new(x, y, right - x, bottom - y))
    }

    /// Split into four equal quadrants, ordered NE, NW, SE, SW.
    ///
    /// North is the top half (smaller y). The east/south halves start at the
    /// midpoint and end at the parent's own right/bottom edge.
    pub fn quadrants(&self) -> [BoundedRegion; 4] {
        let half_w = self.width / 2.0;
        let half_h = self.height / 2.0;
        let mid_x = self.x + half_w;
        let mid_y = self.y + half_h;
        let east_w = self.right() - mid_x;
        let south_h = self.bottom() - mid_y;

        [
            Self::new(mid_x, self.y, east_w, half_h),
            Self::new(self.x, self.y, half_w, half_h),
            Self::new(mid_x, mid_y, east_w, south_h),
            Self::new(self.x, mid_y, half_w, south_h),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_half_open() {
        let r = BoundedRegion::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains(Vec2::new(0.0, 0.0)));
        assert!(r.contains(Vec2::new(9.999, 9.999)));
        assert!(!r.contains(Vec2::new(10.0, 5.0)));
        assert!(!r.contains(Vec2::new(5.0, 10.0)));
        assert!(!r.contains(Vec2::new(-0.001, 5.0)));
    }

    #[test]
    fn test_intersects_inclusive_edges() {
        let a = BoundedRegion::new(0.0, 0.0, 10.0, 10.0);
        let touching = BoundedRegion::new(10.0, 0.0, 5.0, 5.0);
        let apart = BoundedRegion::new(10.5, 0.0, 5.0, 5.0);
        let inside = BoundedRegion::new(2.0, 2.0, 1.0, 1.0);

        assert!(a.intersects(&touching));
        assert!(touching.intersects(&a));
        assert!(!a.intersects(&apart));
        assert!(a.intersects(&inside));
        assert!(inside.intersects(&a));
    }

    #[test]
    fn test_negative_extent_collapses() {
        let r = BoundedRegion::new(5.0, 5.0, -3.0, 2.0);
        assert_eq!(r.width, 0.0);
        assert_eq!(r.height, 2.0);
        // Zero width contains nothing
        assert!(!r.contains(Vec2::new(5.0, 6.0)));
    }

    #[test]
    fn test_quadrants_tile_parent() {
        let r = BoundedRegion::new(0.0, 0.0, 800.0, 600.0);
        let [ne, nw, se, sw] = r.quadrants();

        assert_eq!(ne, BoundedRegion::new(400.0, 0.0, 400.0, 300.0));
        assert_eq!(nw, BoundedRegion::new(0.0, 0.0, 400.0, 300.0));
        assert_eq!(se, BoundedRegion::new(400.0, 300.0, 400.0, 300.0));
        assert_eq!(sw, BoundedRegion::new(0.0, 300.0, 400.0, 300.0));

        let total: f32 = [ne, nw, se, sw].iter().map(|q| q.area()).sum();
        assert!((total - r.area()).abs() < 1e-3);
    }

    #[test]
    fn test_center_point_owned_by_one_quadrant() {
        let r = BoundedRegion::new(0.0, 0.0, 800.0, 600.0);
        let center = r.center();
        let owners = r.quadrants().iter().filter(|q| q.contains(center)).count();
        assert_eq!(owners, 1);
        // South-east owns the midpoint
        assert!(r.quadrants()[2].contains(center));
    }

    #[test]
    fn test_inflate_and_union() {
        let r = BoundedRegion::from_center(Vec2::new(400.0, 300.0), 50.0, 50.0);
        let hit = r.inflate(50.0);
        assert_eq!(hit, BoundedRegion::new(325.0, 225.0, 150.0, 150.0));
        assert_eq!(hit.center(), r.center());

        let a = BoundedRegion::new(0.0, 0.0, 10.0, 10.0);
        let b = BoundedRegion::new(20.0, 5.0, 10.0, 10.0);
        assert_eq!(a.union(&b), BoundedRegion::new(0.0, 0.0, 30.0, 15.0));
    }

    #[test]
    fn test_intersection() {
        let field = BoundedRegion::new(0.0, 0.0, 800.0, 600.0);
        let partly_out = BoundedRegion::new(-10.0, 590.0, 30.0, 30.0);
        assert_eq!(
            field.intersection(&partly_out),
            Some(BoundedRegion::new(0.0, 590.0, 20.0, 10.0))
        );
        // Edge contact has no area
        let touching = BoundedRegion::new(800.0, 0.0, 10.0, 10.0);
        assert_eq!(field.intersection(&touching), None);
    }
}
