//! Deterministic race simulation
//!
//! All race logic lives here. This module must stay pure and deterministic:
//! - Fixed timestep only
//! - Time is passed in, never read from a clock
//! - Checkpoints processed in track order
//! - No rendering or platform dependencies

pub mod collision;
pub mod lap;
pub mod physics;
pub mod state;
pub mod tick;
pub mod track;
pub mod vector;

pub use collision::{
    LineSegment, closest_point_on_segment, point_in_convex_polygon, rect_corners,
    rect_segment_intersects, segment_intersection,
};
pub use lap::{
    LapUpdate, best_lap_ms, current_lap_elapsed_ms, format_time, race_elapsed_ms, total_race_ms,
};
pub use physics::{CarPhysics, PhysicsEngine};
pub use state::{
    CarState, CheckpointSet, GameState, InputCommand, LapProgress, LapRecord, RaceEvent,
    RaceStatus, TimingState,
};
pub use tick::tick;
pub use track::{Checkpoint, StartPose, Track};
pub use vector::Vec2;
