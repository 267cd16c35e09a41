//! Ship lasers: charge bookkeeping and bolts in flight.

use bevy::math::DVec3;

use crate::config::FlightConfig;
use crate::ship::Ship;

/// A bolt travelling through the system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LaserBolt {
    pub position: DVec3,
    pub velocity: DVec3,
    /// Seconds since the bolt was fired.
    pub age: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LaserBank {
    bolts: Vec<LaserBolt>,
}

impl LaserBank {
    pub fn bolts(&self) -> &[LaserBolt] {
        &self.bolts
    }

    /// Fire one bolt along the ship's nose if a full charge is available.
    pub fn fire(&mut self, ship: &mut Ship, config: &FlightConfig) -> bool {
        if ship.lasers < 1.0 {
            return false;
        }
        ship.lasers -= 1.0;
        let forward = ship.forward();
        self.bolts.push(LaserBolt {
            position: ship.position + forward * ship.size_au,
            velocity: ship.velocity + forward * config.laser_speed,
            age: 0.0,
        });
        true
    }

    /// Move bolts, drop expired ones and recharge the bank.
    pub fn update(&mut self, ship: &mut Ship, dt: f64, config: &FlightConfig) {
        for bolt in &mut self.bolts {
            bolt.position += bolt.velocity * dt;
            bolt.age += dt;
        }
        self.bolts.retain(|b| b.age < config.laser_lifetime_secs);
        ship.lasers = (ship.lasers + config.laser_recharge_per_sec * dt).min(ship.max_lasers);
    }

    pub fn clear(&mut self) {
        self.bolts.clear();
    }
}
