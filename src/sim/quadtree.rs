//! Quadtree broad phase
//!
//! Recursively partitions a bounded region into four quadrants once a node
//! overflows its capacity. Stores point snapshots of entity centers and
//! answers "which tracked points lie in region R" queries.
//!
//! The tree is rebuilt from scratch every tick (`update`) rather than patched
//! incrementally. That costs O(n log n) per tick, which is fine at the tens of
//! entities this game runs with.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::region::BoundedRegion;

/// Nodes at this depth never subdivide. Coincident points would otherwise
/// keep splitting the same quadrant forever.
pub const MAX_DEPTH: u32 = 16;

/// Errors raised when building an index
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndexError {
    #[error("node capacity must be at least 1")]
    ZeroCapacity,
    #[error("index boundary must have positive finite area (got {width}x{height})")]
    DegenerateBoundary { width: f32, height: f32 },
}

/// Snapshot of an entity center for one tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackedPoint {
    /// Entity ID the point was taken from
    pub id: u32,
    pub pos: Vec2,
}

impl TrackedPoint {
    pub fn new(id: u32, pos: Vec2) -> Self {
        Self { id, pos }
    }
}

/// A quadtree node. The root owns the whole tree.
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    boundary: BoundedRegion,
    capacity: usize,
    depth: u32,
    points: Vec<TrackedPoint>,
    /// NE, NW, SE, SW once subdivided
    children: Option<Box<[SpatialIndex; 4]>>,
}

impl SpatialIndex {
    /// Create an empty root index.
    ///
    /// Refuses a zero capacity or a boundary without positive area.
    pub fn new(boundary: BoundedRegion, capacity: usize) -> Result<Self, IndexError> {
        if capacity == 0 {
            return Err(IndexError::ZeroCapacity);
        }
        let positive = |v: f32| v.is_finite() && v > 0.0;
        let anchored = boundary.x.is_finite() && boundary.y.is_finite();
        if !anchored || !positive(boundary.width) || !positive(boundary.height) {
            return Err(IndexError::DegenerateBoundary {
                width: boundary.width,
                height: boundary.height,
            });
        }
        Ok(Self::node(boundary, capacity, 0))
    }

    fn node(boundary: BoundedRegion, capacity: usize, depth: u32) -> Self {
        Self {
            boundary,
            capacity,
            depth,
            points: Vec::with_capacity(capacity),
            children: None,
        }
    }

    pub fn is_subdivided(&self) -> bool {
        self.children.is_some()
    }

    /// Insert a point. Returns false (and changes nothing) if the point lies
    /// outside this node's boundary.
    pub fn insert(&mut self, point: TrackedPoint) -> bool {
        if !self.boundary.contains(point.pos) {
            return false;
        }

        let has_room = self.points.len() < self.capacity || self.depth >= MAX_DEPTH;
        if self.children.is_none() && has_room {
            self.points.push(point);
            return true;
        }

        self.subdivide();
        match self.children.as_deref_mut() {
            // First child in NE, NW, SE, SW order that accepts wins
            Some(children) => children.iter_mut().any(|child| child.insert(point)),
            None => false,
        }
    }

    /// Split this node into four equal quadrants. Points already held stay
    /// here; only later inserts descend. Does nothing on an already
    /// subdivided node.
    pub fn subdivide(&mut self) {
        if self.children.is_some() {
            return;
        }
        let depth = self.depth + 1;
        let capacity = self.capacity;
        let [ne, nw, se, sw] = self.boundary.quadrants();
        self.children = Some(Box::new([
            Self::node(ne, capacity, depth),
            Self::node(nw, capacity, depth),
            Self::node(se, capacity, depth),
            Self::node(sw, capacity, depth),
        ]));
    }

    /// All tracked points inside `region`, in traversal order (own points,
    /// then NE, NW, SE, SW subtrees).
    pub fn query(&self, region: &BoundedRegion) -> Vec<TrackedPoint> {
        let mut found = Vec::new();
        self.query_into(region, &mut found);
        found
    }

    /// Like `query`, appending into a caller-owned buffer
    pub fn query_into(&self, region: &BoundedRegion, found: &mut Vec<TrackedPoint>) {
        if !self.boundary.intersects(region) {
            return;
        }

        found.extend(self.points.iter().filter(|p| region.contains(p.pos)));

        if let Some(children) = self.children.as_deref() {
            for child in children {
                child.query_into(region, found);
            }
        }
    }

    /// Rebuild from scratch: clear, then insert every point in order.
    /// Returns how many points were accepted.
    pub fn update(&mut self, points: &[TrackedPoint]) -> usize {
        self.clear();
        points.iter().filter(|&&p| self.insert(p)).count()
    }

    /// Drop all points and children, back to an empty leaf
    pub fn clear(&mut self) {
        self.points.clear();
        self.children = None;
    }

    /// Number of points stored in the whole subtree
    pub fn len(&self) -> usize {
        self.points.len()
            + self
                .children
                .as_deref()
                .map_or(0, |children| children.iter().map(SpatialIndex::len).sum::<usize>())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of nodes in the subtree, this one included
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .as_deref()
            .map_or(0, |children| children.iter().map(SpatialIndex::node_count).sum::<usize>())
    }

    /// Levels below this node (0 for a leaf)
    pub fn height(&self) -> u32 {
        self.children.as_deref().map_or(0, |children| {
            1 + children.iter().map(SpatialIndex::height).max().unwrap_or(0)
        })
    }
}
