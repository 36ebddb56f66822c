//! Track geometry
//!
//! A track is built and checked by whatever loads it; the simulation only
//! reads it. Boundaries are loose segment lists (no polygon closure is
//! assumed) and checkpoints are gates the car must cross in order.

use serde::{Deserialize, Serialize};

use super::collision::{
    LineSegment, closest_point_on_segment, rect_corners, rect_segment_intersects,
};
use super::state::CarState;
use super::vector::Vec2;

/// An ordered gate on the track; index 0 is the start/finish line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub segment: LineSegment,
    pub index: usize,
}

impl Checkpoint {
    pub fn new(index: usize, start: Vec2, end: Vec2) -> Self {
        Self {
            segment: LineSegment::new(start, end),
            index,
        }
    }

    pub fn is_start_finish(&self) -> bool {
        self.index == 0
    }
}

/// Where and which way the car sits on the grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StartPose {
    pub position: Vec2,
    /// Heading in radians
    pub rotation: f64,
}

impl StartPose {
    pub fn new(position: Vec2, rotation: f64) -> Self {
        Self { position, rotation }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub name: String,
    pub outer_boundary: Vec<LineSegment>,
    pub inner_boundary: Vec<LineSegment>,
    /// Checkpoints in driving order
    pub checkpoints: Vec<Checkpoint>,
    pub start: StartPose,
}

impl Track {
    pub fn new(
        name: impl Into<String>,
        outer_boundary: Vec<LineSegment>,
        inner_boundary: Vec<LineSegment>,
        checkpoints: Vec<Checkpoint>,
        start: StartPose,
    ) -> Self {
        Self {
            name: name.into(),
            outer_boundary,
            inner_boundary,
            checkpoints,
            start,
        }
    }

    /// Car parked on the start pose
    pub fn start_car(&self) -> CarState {
        CarState::at_rest(self.start.position, self.start.rotation)
    }

    pub fn checkpoint(&self, index: usize) -> Option<&Checkpoint> {
        self.checkpoints.iter().find(|c| c.index == index)
    }

    pub fn checkpoint_count(&self) -> usize {
        self.checkpoints.len()
    }

    /// All wall segments, outer first
    pub fn boundaries(&self) -> impl Iterator<Item = &LineSegment> {
        self.outer_boundary.iter().chain(self.inner_boundary.iter())
    }

    /// Whether the car's bounding box touches any wall segment
    pub fn wall_contact(&self, car: &CarState, half_extents: Vec2) -> bool {
        let corners = rect_corners(car.position, half_extents, car.rotation);
        self.boundaries()
            .any(|wall| rect_segment_intersects(&corners, wall))
    }

    /// Closest point on any wall to `point`
    pub fn nearest_boundary_point(&self, point: Vec2) -> Option<Vec2> {
        self.boundaries()
            .map(|wall| closest_point_on_segment(point, wall))
            .min_by(|a, b| a.distance_squared(point).total_cmp(&b.distance_squared(point)))
    }
}
