//! Flight model: turns input into rotation, velocity and position.
//!
//! Each tick the controller:
//! 1. advances the boost state machine (which may drain fuel),
//! 2. composes yaw/pitch onto the ship rotation (unless boosting),
//! 3. applies thrust or braking along the rotated forward axis,
//! 4. clamps speed to the currently effective cap,
//! 5. integrates position.

mod boost;
mod hazard;
mod lasers;

#[cfg(test)]
mod proptest_flight;

pub use boost::{BoostBlock, BoostController, BoostState, BoostUpdate};
pub use hazard::{apply_star_hazards, heat_damage_rate, HazardReport};
pub use lasers::{LaserBank, LaserBolt};

use crate::config::FlightConfig;
use crate::input::FlightInput;
use crate::math::{compose_local, quat_from_axis_angle, quat_multiply, RIGHT, UP};
use crate::ship::Ship;

/// Top speed without boost: size × engine × tuning constant.
pub fn base_max_speed(ship: &Ship, config: &FlightConfig) -> f64 {
    ship.size_au * ship.engine_rating * config.speed_per_size_engine
}

/// Acceleration without boost: size × engine × tuning constant.
pub fn base_acceleration(ship: &Ship, config: &FlightConfig) -> f64 {
    ship.size_au * ship.engine_rating * config.accel_per_size_engine
}

/// Outcome of one flight tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FlightReport {
    pub boost: BoostUpdate,
    /// Effective speed cap after this tick.
    pub speed_cap: f64,
}

/// Per-session flight state that outlives a single tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FlightController {
    pub boost: BoostController,
}

impl FlightController {
    /// Effective speed cap for the ship in the current boost state.
    pub fn speed_cap(&self, ship: &Ship, config: &FlightConfig) -> f64 {
        self.boost.speed_cap(base_max_speed(ship, config), config)
    }

    /// Advance the ship by `dt` seconds.
    pub fn step(
        &mut self,
        ship: &mut Ship,
        input: &FlightInput,
        dt: f64,
        config: &FlightConfig,
    ) -> FlightReport {
        let base_max = base_max_speed(ship, config);
        let boost = self.boost.update(input.boost, ship, base_max, dt, config);

        if self.boost.allows_turning() {
            let yaw = input.yaw.clamp(-1.0, 1.0) * config.turn_rate * dt;
            let pitch = input.pitch.clamp(-1.0, 1.0) * config.turn_rate * dt;
            if yaw != 0.0 || pitch != 0.0 {
                // Positive rotation about +X pitches the nose down, hence the sign.
                let delta = quat_multiply(
                    quat_from_axis_angle(UP, yaw),
                    quat_from_axis_angle(RIGHT, -pitch),
                );
                ship.rotation = compose_local(ship.rotation, delta);
            }
        }

        let forward = ship.forward();
        let accel = base_acceleration(ship, config) * self.boost.accel_multiplier(config);

        if input.thrust {
            ship.velocity += forward * accel * dt;
        }
        if input.brake {
            let forward_speed = ship.velocity.dot(forward);
            if forward_speed > 0.0 {
                let decel = base_acceleration(ship, config) * config.brake_factor * dt;
                ship.velocity -= forward * decel.min(forward_speed);
            }
        }
        if !input.thrust && config.coast_drag > 0.0 {
            ship.velocity *= (1.0 - config.coast_drag * dt).max(0.0);
        }

        let speed_cap = self.boost.speed_cap(base_max, config);
        let speed = ship.velocity.length();
        if speed > speed_cap && speed > 0.0 {
            ship.velocity *= speed_cap / speed;
        }

        ship.position += ship.velocity * dt;

        FlightReport { boost, speed_cap }
    }
}
