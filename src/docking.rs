//! Docking and collision detection against planets and stations.
//!
//! Monitors the ship's distance to every planet and station. On contact:
//! - a planet inside its trigger radius starts a docking hand-off,
//! - a station starts a hand-off only for an aligned, slow approach through
//!   its docking port (which turns with the station),
//! - any other station contact is an impact: damage, a bounce off the hull,
//!   and a debounce window so the same body can't hit again next frame.

use bevy::log::{info, warn};
use bevy::math::{DQuat, DVec3};
use std::collections::HashMap;

use crate::config::FlightConfig;
use crate::flight::base_max_speed;
use crate::math::{look_rotation, normalize, rotate_vec, UP};
use crate::ship::Ship;
use crate::system::{Body, BodyId, BodyRef, Station, StarSystem, SystemId};
use crate::time::SimClock;

/// Restitution applied to the inward velocity on a hull impact.
const IMPACT_RESTITUTION: f64 = 0.5;

/// Minimum damage fraction of an impact, so grazing hits still register.
const MIN_IMPACT_FRACTION: f64 = 0.25;

/// Contact the detector reports for one tick.
#[derive(Clone, Debug, PartialEq)]
pub enum ContactEvent {
    /// Begin docking with this body.
    Dock(BodyRef),
    /// Ship struck the body off-axis.
    Impact {
        body: BodyRef,
        damage: f64,
        /// Ship speed at impact in AU/s.
        speed: f64,
    },
}

/// Ship placement relative to a station.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub position: DVec3,
    pub rotation: DQuat,
}

/// Tracks debounce windows between checks.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DockingDetector {
    /// Body → flight time until which it may not collide again.
    debounce_until: HashMap<BodyId, f64>,
}

impl DockingDetector {
    /// Forget all debounce windows (e.g. after a system change).
    pub fn clear(&mut self) {
        self.debounce_until.clear();
    }

    /// Whether `body` is still inside its debounce window.
    pub fn is_debounced(&self, body: BodyId, now_secs: f64) -> bool {
        self.debounce_until
            .get(&body)
            .is_some_and(|&until| now_secs < until)
    }

    /// Check the ship against every planet and station in the system.
    /// Returns the first contact found; impacts mutate the ship.
    pub fn check(
        &mut self,
        ship: &mut Ship,
        system_id: SystemId,
        system: &StarSystem,
        clock: &SimClock,
        config: &FlightConfig,
    ) -> Option<ContactEvent> {
        let now = clock.flight_secs;
        self.debounce_until.retain(|_, until| *until > now);

        for body in &system.bodies {
            let body_ref = BodyRef {
                system: system_id,
                body: body.id(),
            };
            match body {
                Body::Star(_) => {}
                Body::Planet(planet) => {
                    let center = planet.placement.position_at(clock.date_days);
                    if ship.position.distance(center) <= planet.radius_au * config.planet_dock_factor {
                        info!("Docking approach to {}", planet.name);
                        return Some(ContactEvent::Dock(body_ref));
                    }
                }
                Body::Station(station) => {
                    let center = station.placement.position_at(clock.date_days);
                    let contact_radius = station.radius_au * config.station_dock_factor;
                    if ship.position.distance(center) > contact_radius
                        || self.is_debounced(station.id, now)
                    {
                        continue;
                    }

                    if is_aligned_approach(ship, station, clock.date_days, config) {
                        info!("Docking approach to {}", station.name);
                        return Some(ContactEvent::Dock(body_ref));
                    }

                    let speed = ship.speed();
                    let damage = impact_damage(ship, config);
                    ship.apply_damage(damage);
                    bounce_off(ship, center, contact_radius);
                    self.debounce_until
                        .insert(station.id, now + config.collision_debounce_secs);
                    warn!(
                        "{} struck {} at {:.5} AU/s ({:.1} damage)",
                        ship.name, station.name, speed, damage
                    );
                    return Some(ContactEvent::Impact {
                        body: body_ref,
                        damage,
                        speed,
                    });
                }
            }
        }
        None
    }
}

/// Whether the ship is coming in through the station's docking port, slowly
/// enough to dock.
pub fn is_aligned_approach(
    ship: &Ship,
    station: &Station,
    date_days: f64,
    config: &FlightConfig,
) -> bool {
    let center = station.placement.position_at(date_days);
    let offset = normalize(ship.position - center);
    if offset == DVec3::ZERO {
        return false;
    }
    let port = station.port_axis_at(date_days);
    let cos_limit = config.dock_alignment_deg.to_radians().cos();
    let aligned = offset.dot(port) >= cos_limit;
    let slow = ship.speed() <= base_max_speed(ship, config) * config.max_dock_speed_fraction;
    aligned && slow
}

fn impact_damage(ship: &Ship, config: &FlightConfig) -> f64 {
    let base = base_max_speed(ship, config);
    let ratio = if base > 0.0 { ship.speed() / base } else { 1.0 };
    config.impact_damage * ratio.max(MIN_IMPACT_FRACTION)
}

/// Put the ship back on the contact sphere and reflect its inward velocity.
fn bounce_off(ship: &mut Ship, center: DVec3, contact_radius: f64) {
    let mut normal = normalize(ship.position - center);
    if normal == DVec3::ZERO {
        normal = -ship.forward();
    }
    ship.position = center + normal * contact_radius;
    let inward = ship.velocity.dot(normal);
    if inward < 0.0 {
        ship.velocity -= normal * inward * (1.0 + IMPACT_RESTITUTION);
    }
}

/// Where a docking ship is placed when the docking sequence starts: outside
/// the port, facing the station. Computed from the station's current spin.
pub fn dock_entry_pose(station: &Station, date_days: f64, config: &FlightConfig) -> Pose {
    let center = station.placement.position_at(date_days);
    let port = station.port_axis_at(date_days);
    let up = rotate_vec(UP, station.rotation_at(date_days));
    Pose {
        position: center + port * station.radius_au * config.undock_distance_factor,
        rotation: look_rotation(-port, up),
    }
}

/// Where the ship reappears after undocking: outside the port, facing away.
pub fn undock_pose(station: &Station, date_days: f64, config: &FlightConfig) -> Pose {
    let entry = dock_entry_pose(station, date_days, config);
    let port = station.port_axis_at(date_days);
    let up = rotate_vec(UP, station.rotation_at(date_days));
    Pose {
        position: entry.position,
        rotation: look_rotation(port, up),
    }
}
