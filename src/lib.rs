//! Top-down racer - deterministic simulation core for a 2D car race
//!
//! Core modules:
//! - `sim`: Deterministic simulation (vector math, geometry, physics, laps)
//! - `game_loop`: Fixed timestep scheduler and race lifecycle
//! - `platform`: Clock, input and renderer abstractions
//! - `tuning`: Data-driven handling and race rules

pub mod game_loop;
pub mod platform;
pub mod sim;
pub mod tuning;

pub use game_loop::GameLoop;
pub use tuning::{PhysicsConfig, RaceConfig, Tuning, TuningError};

/// Simulation constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f64 = 1.0 / 60.0;
    /// Longest frame the scheduler catches up on (prevents spiral of death)
    pub const MAX_FRAME_TIME: f64 = 0.25;
    /// Direction cross products below this count as parallel segments
    pub const PARALLEL_EPSILON: f64 = 1e-10;
}
