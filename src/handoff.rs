//! Scripted stand-ins for the systems flight hands off to.
//!
//! The full game would open a docking menu, a combat screen or a galaxy map
//! here. The binary instead resolves every hand-off immediately: the ship is
//! repositioned and patched up, and flight resumes on the same frame.

use bevy::math::DVec3;
use bevy::prelude::*;

use crate::config::FlightConfig;
use crate::docking::undock_pose;
use crate::math::{look_rotation, normalize, UP};
use crate::plugin::{
    resume_flight, tick_flight, DockRequested, EncounterRequested, HandoffComplete, ShipDestroyed,
    WarpRequested,
};
use crate::session::FlightSession;
use crate::ship::Ship;
use crate::system::{Body, BodyRef, Galaxy, SystemId};

/// Where a ship appears relative to the primary star after warping in or
/// being rebuilt.
pub const ARRIVAL_OFFSET: DVec3 = DVec3::new(0.0, 0.1, -0.8);

/// Damage taken in a scripted fight.
pub const ENCOUNTER_DAMAGE: f64 = 20.0;

/// Leave a docked body: outside a station's port facing away, or above a
/// planet's surface facing out. Stations refuel and repair.
pub fn complete_dock(
    ship: &Ship,
    body: BodyRef,
    galaxy: &Galaxy,
    date_days: f64,
    config: &FlightConfig,
) -> Ship {
    let mut next = ship.clone();
    next.velocity = DVec3::ZERO;
    let Some(found) = galaxy.get(body.system).and_then(|s| s.body(body.body)) else {
        warn!("Docked with unknown body {:?}", body);
        return next;
    };

    match found {
        Body::Station(station) => {
            let pose = undock_pose(station, date_days, config);
            next.position = pose.position;
            next.rotation = pose.rotation;
            next.fuel = next.max_fuel;
            next.hull = next.max_hull;
            next.shields = next.max_shields;
            next.lasers = next.max_lasers;
        }
        Body::Planet(planet) => {
            let center = planet.placement.position_at(date_days);
            let mut outward = normalize(ship.position - center);
            if outward == DVec3::ZERO {
                outward = UP;
            }
            let clearance =
                planet.radius_au * config.planet_dock_factor * config.undock_distance_factor;
            next.position = center + outward * clearance;
            next.rotation = look_rotation(outward, UP);
            next.fuel = next.max_fuel;
        }
        Body::Star(_) => {}
    }
    info!("{} undocked from {}", next.name, found.name());
    next
}

/// Place the ship at the arrival point of the target system, facing its star.
pub fn complete_warp(ship: &Ship, target: SystemId, galaxy: &Galaxy, date_days: f64) -> Ship {
    let mut next = ship.clone();
    let Some(system) = galaxy.get(target) else {
        warn!("Warp to unknown system {:?}", target);
        return next;
    };
    let star = system.primary_star_position(date_days);
    next.system = target;
    next.position = star + ARRIVAL_OFFSET;
    next.velocity = DVec3::ZERO;
    next.rotation = look_rotation(star - next.position, UP);
    info!("{} arrived in {}", next.name, system.name);
    next
}

/// A fight the ship always survives with some damage, ending clear of the
/// contact.
pub fn complete_encounter(
    ship: &Ship,
    contact: u32,
    galaxy: &Galaxy,
    config: &FlightConfig,
) -> Ship {
    let mut next = ship.clone();
    next.apply_damage(ENCOUNTER_DAMAGE);
    next.hull = next.hull.max(1.0);
    next.velocity = DVec3::ZERO;

    let position = galaxy
        .get(ship.system)
        .and_then(|s| s.contacts.iter().find(|c| c.id == contact))
        .map(|c| c.position);
    if let Some(position) = position {
        let mut away = normalize(ship.position - position);
        if away == DVec3::ZERO {
            away = -ship.forward();
        }
        next.position = position + away * config.encounter_radius * 3.0;
    }
    next
}

/// Rebuild a destroyed ship at the arrival point of its current system.
pub fn complete_destroyed(ship: &Ship, galaxy: &Galaxy, date_days: f64) -> Ship {
    let star = galaxy
        .get(ship.system)
        .map_or(DVec3::ZERO, |s| s.primary_star_position(date_days));
    let mut next = Ship::new(ship.name.clone(), ship.system, star + ARRIVAL_OFFSET);
    next.rotation = look_rotation(star - next.position, UP);
    info!("{} rebuilt", next.name);
    next
}

/// Answer every hand-off raised this frame.
pub fn run_scripted_handoffs(
    session: Res<FlightSession>,
    mut docks: MessageReader<DockRequested>,
    mut warps: MessageReader<WarpRequested>,
    mut encounters: MessageReader<EncounterRequested>,
    mut destroyed: MessageReader<ShipDestroyed>,
    mut completed: MessageWriter<HandoffComplete>,
) {
    let galaxy = session.galaxy();
    let date = session.clock().date_days;
    let config = session.config();

    for msg in docks.read() {
        if let Some(entry) = msg.entry {
            debug!("Entering {:?} from {:?}", msg.body, entry.position);
        }
        completed.write(HandoffComplete {
            ship: complete_dock(&msg.ship, msg.body, galaxy, date, config),
        });
    }
    for msg in warps.read() {
        completed.write(HandoffComplete {
            ship: complete_warp(&msg.ship, msg.target, galaxy, date),
        });
    }
    for msg in encounters.read() {
        completed.write(HandoffComplete {
            ship: complete_encounter(&msg.ship, msg.contact, galaxy, config),
        });
    }
    for msg in destroyed.read() {
        completed.write(HandoffComplete {
            ship: complete_destroyed(&msg.ship, galaxy, date),
        });
    }
}

/// Resolves hand-offs in place so the binary can fly indefinitely.
pub struct ScriptedHandoffPlugin;

impl Plugin for ScriptedHandoffPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            run_scripted_handoffs
                .after(tick_flight)
                .before(resume_flight)
                .run_if(resource_exists::<FlightSession>),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::BodyId;
    use crate::test_utils::fixtures;

    #[test]
    fn test_station_dock_refuels_and_leaves_port() {
        let galaxy = fixtures::two_system_galaxy();
        let config = FlightConfig::default();
        let mut ship = fixtures::ship_in(SystemId(0));
        ship.fuel = 3.0;
        let station = BodyRef {
            system: SystemId(0),
            body: BodyId(2),
        };
        let next = complete_dock(&ship, station, &galaxy, 0.0, &config);
        assert_eq!(next.fuel, next.max_fuel);
        let center = DVec3::new(0.5, 0.0, 0.0);
        assert!(next.position.distance(center) > 0.0005 * config.station_dock_factor);
        // Facing away from the station.
        assert!(next.forward().dot(next.position - center) > 0.0);
    }

    #[test]
    fn test_planet_dock_leaves_outside_trigger() {
        let galaxy = fixtures::two_system_galaxy();
        let config = FlightConfig::default();
        let mut ship = fixtures::ship_in(SystemId(0));
        ship.position = DVec3::new(0.0, 0.0, 0.994);
        let planet = BodyRef {
            system: SystemId(0),
            body: BodyId(1),
        };
        let next = complete_dock(&ship, planet, &galaxy, 0.0, &config);
        let distance = next.position.distance(DVec3::new(0.0, 0.0, 1.0));
        assert!(distance > 0.005 * config.planet_dock_factor);
    }

    #[test]
    fn test_warp_moves_ship_to_target() {
        let galaxy = fixtures::two_system_galaxy();
        let ship = fixtures::ship_in(SystemId(0));
        let next = complete_warp(&ship, SystemId(1), &galaxy, 0.0);
        assert_eq!(next.system, SystemId(1));
        assert_eq!(next.position, ARRIVAL_OFFSET);
        assert!(next.forward().dot(-ARRIVAL_OFFSET.normalize()) > 0.999);
    }

    #[test]
    fn test_encounter_damages_but_never_destroys() {
        let galaxy = fixtures::two_system_galaxy();
        let config = FlightConfig::default();
        let mut ship = fixtures::ship_in(SystemId(0));
        ship.shields = 0.0;
        ship.hull = 5.0;
        let next = complete_encounter(&ship, 7, &galaxy, &config);
        assert!(!next.is_destroyed());
        assert!(next.hull < 5.0);
    }

    #[test]
    fn test_destroyed_ship_is_rebuilt() {
        let galaxy = fixtures::two_system_galaxy();
        let mut ship = fixtures::ship_in(SystemId(0));
        ship.hull = 0.0;
        let next = complete_destroyed(&ship, &galaxy, 0.0);
        assert_eq!(next.hull, next.max_hull);
        assert!(next.is_well_formed());
    }
}
