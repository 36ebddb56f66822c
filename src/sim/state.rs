//! Race state and core simulation types
//!
//! Everything here is plain data. A tick never edits a `GameState` in place;
//! it builds the next one from the previous value.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::track::Track;
use super::vector::{Vec2, heading};

/// Current phase of the race
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RaceStatus {
    /// Waiting for the start signal
    #[default]
    Countdown,
    /// Active racing, ticks advance the simulation
    Racing,
    /// Final lap validated, state is frozen
    Finished,
}

/// Driver commands for a single tick
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct InputCommand {
    /// Accelerator pedal, 0..=1
    pub throttle: f64,
    /// Brake pedal, 0..=1 (reverses from standstill)
    pub brake: f64,
    /// Steering, -1 (right) ..= 1 (left)
    pub steering: f64,
}

impl InputCommand {
    /// Build a command with each axis clamped into its valid range
    pub fn new(throttle: f64, brake: f64, steering: f64) -> Self {
        Self {
            throttle: throttle.clamp(0.0, 1.0),
            brake: brake.clamp(0.0, 1.0),
            steering: steering.clamp(-1.0, 1.0),
        }
    }

    /// No pedals, wheel centered
    pub const IDLE: Self = Self {
        throttle: 0.0,
        brake: 0.0,
        steering: 0.0,
    };
}

/// Kinematic state of the car
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CarState {
    pub position: Vec2,
    /// Heading in radians (0 = +X)
    pub rotation: f64,
    pub velocity: Vec2,
    /// Radians per second applied during the last tick
    pub angular_velocity: f64,
}

impl CarState {
    /// A car at rest
    pub fn at_rest(position: Vec2, rotation: f64) -> Self {
        Self {
            position,
            rotation,
            velocity: Vec2::ZERO,
            angular_velocity: 0.0,
        }
    }

    /// Unit vector the car is facing
    #[inline]
    pub fn forward(&self) -> Vec2 {
        heading(self.rotation)
    }

    /// Speed along the heading; negative while reversing
    pub fn signed_speed(&self) -> f64 {
        let speed = self.velocity.length();
        if self.velocity.dot(self.forward()) < 0.0 {
            -speed
        } else {
            speed
        }
    }
}

const WORD_BITS: usize = u64::BITS as usize;

/// Set of checkpoint indices packed into a bitmask
///
/// Grows a word at a time to fit the highest index inserted, so any number
/// of checkpoints fits. Words are only appended to hold a set bit.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CheckpointSet {
    words: Vec<u64>,
}

impl CheckpointSet {
    /// Set holding only the start/finish checkpoint
    pub fn start_only() -> Self {
        Self { words: vec![1] }
    }

    pub fn contains(&self, index: usize) -> bool {
        self.words
            .get(index / WORD_BITS)
            .is_some_and(|word| word & (1u64 << (index % WORD_BITS)) != 0)
    }

    pub fn insert(&mut self, index: usize) {
        let word = index / WORD_BITS;
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        self.words[word] |= 1u64 << (index % WORD_BITS);
    }

    /// Return the set with `index` added
    #[must_use]
    pub fn with(mut self, index: usize) -> Self {
        self.insert(index);
        self
    }

    /// Whether every index in `range` is present
    pub fn contains_all(&self, mut range: std::ops::Range<usize>) -> bool {
        range.all(|i| self.contains(i))
    }
}

/// Checkpoint progress within the current lap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LapProgress {
    pub last_checkpoint_index: usize,
    pub passed: CheckpointSet,
}

impl LapProgress {
    /// Progress at the start of a lap: on the line, nothing else passed
    pub fn new() -> Self {
        Self {
            last_checkpoint_index: 0,
            passed: CheckpointSet::start_only(),
        }
    }
}

impl Default for LapProgress {
    fn default() -> Self {
        Self::new()
    }
}

/// A completed lap
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LapRecord {
    /// 1-indexed lap number
    pub lap_number: u32,
    pub time_ms: f64,
}

/// Race and lap clocks plus completed lap history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingState {
    pub race_start_ms: f64,
    pub lap_start_ms: f64,
    /// Completed laps in order
    pub laps: Vec<LapRecord>,
    /// 1-indexed lap being driven
    pub current_lap: u32,
}

impl TimingState {
    pub fn new(now_ms: f64) -> Self {
        Self {
            race_start_ms: now_ms,
            lap_start_ms: now_ms,
            laps: Vec::new(),
            current_lap: 1,
        }
    }
}

/// Notable things that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RaceEvent {
    CheckpointPassed { index: usize },
    LapCompleted(LapRecord),
    RaceFinished { total_ms: f64 },
}

/// Complete race state (pure data, replaced wholesale each tick)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub status: RaceStatus,
    pub car: CarState,
    /// Shared, read-only track
    pub track: Arc<Track>,
    pub lap_progress: LapProgress,
    pub timing: TimingState,
    pub total_laps: u32,
    /// Simulation tick counter
    pub tick: u64,
}

impl GameState {
    /// Fresh race on `track`, car on the start pose, waiting to start
    pub fn new(track: Arc<Track>, total_laps: u32, now_ms: f64) -> Self {
        Self {
            status: RaceStatus::Countdown,
            car: track.start_car(),
            track,
            lap_progress: LapProgress::new(),
            timing: TimingState::new(now_ms),
            total_laps,
            tick: 0,
        }
    }

    /// Same race reset to the start line and already racing
    pub fn restarted(&self, now_ms: f64) -> Self {
        Self {
            status: RaceStatus::Racing,
            ..Self::new(Arc::clone(&self.track), self.total_laps, now_ms)
        }
    }

    /// Copy of this state moved into `Racing` with clocks starting at `now_ms`
    pub fn started(&self, now_ms: f64) -> Self {
        Self {
            status: RaceStatus::Racing,
            timing: TimingState::new(now_ms),
            ..self.clone()
        }
    }

    pub fn is_racing(&self) -> bool {
        self.status == RaceStatus::Racing
    }

    pub fn is_finished(&self) -> bool {
        self.status == RaceStatus::Finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::track::{StartPose, Track};

    fn track() -> Arc<Track> {
        Arc::new(Track::new(
            "empty",
            Vec::new(),
            Vec::new(),
            Vec::new(),
            StartPose::new(Vec2::new(5.0, 6.0), 1.0),
        ))
    }

    #[test]
    fn test_input_command_clamps() {
        let input = InputCommand::new(2.0, -1.0, -3.0);
        assert_eq!(input, InputCommand::new(1.0, 0.0, -1.0));
        assert_eq!(InputCommand::default(), InputCommand::IDLE);
    }

    #[test]
    fn test_signed_speed_sign() {
        let mut car = CarState::at_rest(Vec2::ZERO, 0.0);
        assert_eq!(car.signed_speed(), 0.0);
        car.velocity = Vec2::new(10.0, 0.0);
        assert_eq!(car.signed_speed(), 10.0);
        car.velocity = Vec2::new(-4.0, 0.0);
        assert_eq!(car.signed_speed(), -4.0);
    }

    #[test]
    fn test_checkpoint_set() {
        let set = CheckpointSet::start_only().with(3).with(3);
        assert!(set.contains(0));
        assert!(set.contains(3));
        assert!(!set.contains(1));
        assert!(!set.contains_all(0..4));
        assert!(set.clone().with(1).with(2).contains_all(0..4));
        assert!(set.contains_all(1..1));
        assert!(!set.contains(1_000));
    }

    #[test]
    fn test_checkpoint_set_grows_past_one_word() {
        let mut set = CheckpointSet::start_only();
        for i in 1..150 {
            set.insert(i);
        }
        assert!(set.contains_all(0..150));
        assert!(!set.contains(150));

        // Same members, same value, whatever the insertion order
        let reversed = (0..150).rev().fold(CheckpointSet::default(), CheckpointSet::with);
        assert_eq!(reversed, set);
    }

    #[test]
    fn test_lap_progress_starts_on_line() {
        let progress = LapProgress::new();
        assert_eq!(progress.last_checkpoint_index, 0);
        assert!(progress.passed.contains(0));
        assert!(!progress.passed.contains(1));
    }

    #[test]
    fn test_new_game_state() {
        let state = GameState::new(track(), 3, 1000.0);
        assert_eq!(state.status, RaceStatus::Countdown);
        assert_eq!(state.car.position, Vec2::new(5.0, 6.0));
        assert_eq!(state.car.rotation, 1.0);
        assert_eq!(state.timing.current_lap, 1);
        assert_eq!(state.timing.lap_start_ms, 1000.0);
        assert_eq!(state.tick, 0);
    }

    #[test]
    fn test_restarted_resets_everything() {
        let mut state = GameState::new(track(), 3, 0.0).started(0.0);
        state.tick = 500;
        state.car.position = Vec2::new(99.0, 99.0);
        state.lap_progress.passed.insert(2);
        state.timing.laps.push(LapRecord {
            lap_number: 1,
            time_ms: 1234.0,
        });
        state.timing.current_lap = 2;
        state.status = RaceStatus::Finished;

        let fresh = state.restarted(9000.0);
        assert_eq!(fresh.status, RaceStatus::Racing);
        assert_eq!(fresh.tick, 0);
        assert_eq!(fresh.car, state.track.start_car());
        assert_eq!(fresh.lap_progress, LapProgress::new());
        assert_eq!(fresh.timing, TimingState::new(9000.0));
        assert!(Arc::ptr_eq(&fresh.track, &state.track));
    }

    #[test]
    fn test_state_serializes() {
        let state = GameState::new(track(), 2, 0.0);
        let json = serde_json::to_string(&state).expect("serialize");
        let back: GameState = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, state);
    }
}
