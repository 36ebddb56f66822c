//! Fixed timestep simulation tick
//!
//! One tick runs physics, then the lap tracker over the car's motion, and
//! assembles the next `GameState`. It needs no clock, renderer or input
//! device, so scripted runs and an authoritative server can call it directly.

use super::lap;
use super::physics::PhysicsEngine;
use super::state::{GameState, InputCommand, RaceEvent, RaceStatus};

/// Advance the race by one fixed step
///
/// Outside `Racing` the state comes back unchanged with no events.
pub fn tick<P: PhysicsEngine + ?Sized>(
    state: &GameState,
    physics: &P,
    input: &InputCommand,
    dt: f64,
    now_ms: f64,
) -> (GameState, Vec<RaceEvent>) {
    if state.status != RaceStatus::Racing {
        return (state.clone(), Vec::new());
    }

    let car = physics.update(&state.car, input, dt);

    let laps = lap::update(
        &state.track,
        &state.lap_progress,
        &state.timing,
        state.car.position,
        car.position,
        now_ms,
        state.total_laps,
    );

    let next = GameState {
        status: if laps.finished {
            RaceStatus::Finished
        } else {
            RaceStatus::Racing
        },
        car,
        track: state.track.clone(),
        lap_progress: laps.progress,
        timing: laps.timing,
        total_laps: state.total_laps,
        tick: state.tick + 1,
    };

    (next, laps.events)
}
