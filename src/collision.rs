//! Overlap tests shared by the simulation tick
//!
//! Everything here is inclusive on the edges: touching counts as a hit, the
//! same way the formation bounce treats touching an edge as a bounce.

use glam::Vec2;

/// Axis-aligned box in playfield pixels (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    pub fn from_position_size(position: Vec2, size: Vec2) -> Self {
        Self {
            min: position,
            max: position + size,
        }
    }

    pub fn left(&self) -> f32 {
        self.min.x
    }

    pub fn right(&self) -> f32 {
        self.max.x
    }

    pub fn top(&self) -> f32 {
        self.min.y
    }

    pub fn bottom(&self) -> f32 {
        self.max.y
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Smallest box containing both
    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn overlaps(&self, other: &Bounds) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }
}

/// Circle vs box test used for player shots.
///
/// The circle is treated as its bounding square: the shot must have reached the
/// box's bottom edge, not yet passed its top edge, and overlap it horizontally.
pub fn circle_hits_box(center: Vec2, radius: f32, target: &Bounds) -> bool {
    center.y - radius <= target.bottom()
        && center.x + radius >= target.left()
        && center.x - radius <= target.right()
        && center.y + radius >= target.top()
}
