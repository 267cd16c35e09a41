//! The player ship record.
//!
//! The world collaborator hands the engine a [`Ship`] on entry and gets the
//! mutated record back at every hand-off. The engine is its only writer while
//! flight is active.

use bevy::math::{DQuat, DVec3};

use crate::math::{quat_length, rotate_vec, FORWARD, RIGHT, UP};
use crate::system::SystemId;

/// Ship state: kinematics, ratings and consumables.
#[derive(Clone, Debug, PartialEq)]
pub struct Ship {
    pub name: String,
    /// System the ship is flying in.
    pub system: SystemId,
    /// Position in AU.
    pub position: DVec3,
    /// Velocity in AU/s.
    pub velocity: DVec3,
    pub rotation: DQuat,
    /// Hull length in AU.
    pub size_au: f64,
    pub engine_rating: f64,
    pub fuel: f64,
    pub max_fuel: f64,
    pub hull: f64,
    pub max_hull: f64,
    pub shields: f64,
    pub max_shields: f64,
    /// Laser charges; fractional while recharging.
    pub lasers: f64,
    pub max_lasers: f64,
}

impl Ship {
    /// A fully supplied ship at rest at `position`, facing +Z.
    pub fn new(name: impl Into<String>, system: SystemId, position: DVec3) -> Self {
        Self {
            name: name.into(),
            system,
            position,
            velocity: DVec3::ZERO,
            rotation: DQuat::IDENTITY,
            size_au: 0.0002,
            engine_rating: 2.0,
            fuel: 100.0,
            max_fuel: 100.0,
            hull: 100.0,
            max_hull: 100.0,
            shields: 50.0,
            max_shields: 50.0,
            lasers: 4.0,
            max_lasers: 4.0,
        }
    }

    pub fn speed(&self) -> f64 {
        self.velocity.length()
    }

    pub fn forward(&self) -> DVec3 {
        rotate_vec(FORWARD, self.rotation)
    }

    pub fn up(&self) -> DVec3 {
        rotate_vec(UP, self.rotation)
    }

    pub fn right(&self) -> DVec3 {
        rotate_vec(RIGHT, self.rotation)
    }

    pub fn is_destroyed(&self) -> bool {
        self.hull <= 0.0
    }

    /// Apply damage to shields first, spilling the remainder onto the hull.
    pub fn apply_damage(&mut self, amount: f64) {
        if !(amount > 0.0) {
            return;
        }
        let absorbed = amount.min(self.shields);
        self.shields -= absorbed;
        self.hull = (self.hull - (amount - absorbed)).max(0.0);
    }

    /// Whether every numeric field is usable by the flight model.
    pub fn is_well_formed(&self) -> bool {
        self.position.is_finite()
            && self.velocity.is_finite()
            && self.rotation.is_finite()
            && (quat_length(self.rotation) - 1.0).abs() < 1e-3
            && self.size_au > 0.0
            && self.engine_rating > 0.0
            && [
                self.fuel,
                self.max_fuel,
                self.hull,
                self.max_hull,
                self.shields,
                self.max_shields,
                self.lasers,
                self.max_lasers,
            ]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ship() -> Ship {
        Ship::new("Kestrel", SystemId(0), DVec3::ZERO)
    }

    #[test]
    fn test_damage_hits_shields_first() {
        let mut ship = ship();
        ship.apply_damage(30.0);
        assert_eq!(ship.shields, 20.0);
        assert_eq!(ship.hull, 100.0);
    }

    #[test]
    fn test_damage_spills_onto_hull() {
        let mut ship = ship();
        ship.apply_damage(80.0);
        assert_eq!(ship.shields, 0.0);
        assert_eq!(ship.hull, 70.0);
        ship.apply_damage(500.0);
        assert_eq!(ship.hull, 0.0);
        assert!(ship.is_destroyed());
    }

    #[test]
    fn test_negative_damage_is_ignored() {
        let mut ship = ship();
        ship.apply_damage(-5.0);
        ship.apply_damage(f64::NAN);
        assert_eq!(ship.shields, 50.0);
    }

    #[test]
    fn test_well_formed() {
        let mut ship = ship();
        assert!(ship.is_well_formed());
        ship.velocity.x = f64::INFINITY;
        assert!(!ship.is_well_formed());
    }

    #[test]
    fn test_default_axes() {
        let ship = ship();
        assert_eq!(ship.forward(), FORWARD);
        assert_eq!(ship.up(), UP);
        assert_eq!(ship.right(), RIGHT);
    }
}
