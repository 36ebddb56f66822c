//! Car dynamics
//!
//! No-slip model: the car always travels along its heading, so each tick
//! only integrates a signed scalar speed and a rotation, then rebuilds the
//! velocity vector from them.

use super::state::{CarState, InputCommand};
use super::vector::heading;
use crate::tuning::PhysicsConfig;

/// Advances one car by one fixed step
///
/// Implementations must be pure: the same car, input and `dt` always give
/// the same result.
pub trait PhysicsEngine {
    fn update(&self, car: &CarState, input: &InputCommand, dt: f64) -> CarState;
}

/// Arcade handling without tire slip
#[derive(Debug, Clone, Default)]
pub struct CarPhysics {
    pub config: PhysicsConfig,
}

impl CarPhysics {
    pub fn new(config: PhysicsConfig) -> Self {
        Self { config }
    }

    /// Rotation change for this tick
    ///
    /// Steering authority ramps up with speed and saturates at half of top
    /// speed. Reversing flips the steering sense.
    fn turn_amount(&self, speed: f64, steering: f64, dt: f64) -> f64 {
        let c = &self.config;
        if speed.abs() < c.min_steering_speed {
            return 0.0;
        }

        let speed_factor = (speed.abs() / (c.max_speed * 0.5)).min(1.0);
        let turn = steering * c.max_steering_rate * speed_factor * dt;
        if speed < 0.0 { -turn } else { turn }
    }

    /// New signed speed after pedals, friction and clamping
    fn next_speed(&self, mut speed: f64, input: &InputCommand, dt: f64) -> f64 {
        let c = &self.config;

        if input.throttle > 0.0 {
            speed += c.acceleration * input.throttle * dt;
        }

        if input.brake > 0.0 {
            let braking = c.brake_deceleration * input.brake * dt;
            if speed > c.min_steering_speed {
                speed = (speed - braking).max(0.0);
            } else if speed < -c.min_steering_speed {
                speed = (speed + braking).min(0.0);
            } else {
                // Near standstill the brake drives the car backwards
                speed -= braking * 0.5;
            }
        }

        if input.throttle == 0.0 && input.brake == 0.0 {
            let step = c.friction * dt;
            speed = if speed.abs() < step {
                0.0
            } else {
                speed - step * speed.signum()
            };
        }

        speed.clamp(-c.max_reverse_speed, c.max_speed)
    }
}

impl PhysicsEngine for CarPhysics {
    fn update(&self, car: &CarState, input: &InputCommand, dt: f64) -> CarState {
        let speed = car.signed_speed();

        let turn = self.turn_amount(speed, input.steering, dt);
        let rotation = car.rotation + turn;

        let speed = self.next_speed(speed, input, dt);
        let velocity = heading(rotation) * speed;

        CarState {
            position: car.position + velocity * dt,
            rotation,
            velocity,
            angular_velocity: if dt > 0.0 { turn / dt } else { 0.0 },
        }
    }
}
