//! Data-driven tuning for car handling and race rules
//!
//! Loaded from JSON so handling can be adjusted without a rebuild. Values are
//! validated once at load time; the simulation assumes a valid `Tuning`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{MAX_FRAME_TIME, SIM_DT};
use crate::sim::vector::Vec2;

/// Errors from loading or validating tuning data
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("invalid tuning JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("`{field}` must be positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },
    #[error("a race needs at least one lap")]
    NoLaps,
    #[error("max_frame_time ({max_frame_time}s) must be at least one step ({dt}s)")]
    FrameClampTooSmall { max_frame_time: f64, dt: f64 },
}

/// Car handling parameters (units are world units and seconds)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Top forward speed
    pub max_speed: f64,
    /// Top reverse speed (positive magnitude)
    pub max_reverse_speed: f64,
    /// Throttle acceleration at full pedal
    pub acceleration: f64,
    /// Brake deceleration at full pedal
    pub brake_deceleration: f64,
    /// Rolling deceleration with no pedals pressed
    pub friction: f64,
    /// Turn rate at full lock and full steering authority (rad/s)
    pub max_steering_rate: f64,
    /// Below this speed steering does nothing and brake reverses
    pub min_steering_speed: f64,
    /// Half length and half width of the car body
    pub half_extents: Vec2,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            max_speed: 300.0,
            max_reverse_speed: 100.0,
            acceleration: 200.0,
            brake_deceleration: 400.0,
            friction: 80.0,
            max_steering_rate: 3.0,
            min_steering_speed: 5.0,
            half_extents: Vec2::new(20.0, 10.0),
        }
    }
}

/// Race rules and loop timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceConfig {
    pub total_laps: u32,
    /// Fixed simulation step in seconds
    pub dt: f64,
    /// Longest frame the scheduler will catch up on, in seconds
    pub max_frame_time: f64,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            total_laps: 3,
            dt: SIM_DT,
            max_frame_time: MAX_FRAME_TIME,
        }
    }
}

/// All tunable values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub physics: PhysicsConfig,
    pub race: RaceConfig,
}

impl Tuning {
    /// Parse and validate tuning JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        log::info!(
            "Loaded tuning: {} laps, dt {:.5}s, max speed {}",
            tuning.race.total_laps,
            tuning.race.dt,
            tuning.physics.max_speed
        );
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        let p = &self.physics;
        let positive = [
            ("physics.max_speed", p.max_speed),
            ("physics.max_reverse_speed", p.max_reverse_speed),
            ("physics.acceleration", p.acceleration),
            ("physics.brake_deceleration", p.brake_deceleration),
            ("physics.friction", p.friction),
            ("physics.max_steering_rate", p.max_steering_rate),
            ("physics.min_steering_speed", p.min_steering_speed),
            ("physics.half_extents.x", p.half_extents.x),
            ("physics.half_extents.y", p.half_extents.y),
            ("race.dt", self.race.dt),
            ("race.max_frame_time", self.race.max_frame_time),
        ];
        // `!(v > 0.0)` also rejects NaN
        if let Some(&(field, value)) = positive.iter().find(|(_, v)| !(*v > 0.0)) {
            return Err(TuningError::NonPositive { field, value });
        }

        if self.race.total_laps == 0 {
            return Err(TuningError::NoLaps);
        }

        if self.race.max_frame_time < self.race.dt {
            return Err(TuningError::FrameClampTooSmall {
                max_frame_time: self.race.max_frame_time,
                dt: self.race.dt,
            });
        }

        Ok(())
    }
}
