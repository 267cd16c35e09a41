//! Star proximity damage.

use bevy::log::warn;

use crate::config::FlightConfig;
use crate::ship::Ship;
use crate::system::StarSystem;

/// Result of applying star hazards for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HazardReport {
    /// Heat damage applied this tick.
    pub damage: f64,
    /// The ship flew into a star.
    pub incinerated: bool,
    /// Ship is inside some star's heat range.
    pub in_heat: bool,
}

/// Heat damage per second at `distance` from the centre of a star of
/// `radius`. Full strength at the surface, falling linearly to zero at
/// `radius × heat_range_factor`. Zero outside that band and inside the star
/// (the star itself is handled as instant destruction).
pub fn heat_damage_rate(distance: f64, radius: f64, config: &FlightConfig) -> f64 {
    let outer = radius * config.heat_range_factor;
    if distance < radius || distance >= outer || outer <= radius {
        return 0.0;
    }
    let t = (distance - radius) / (outer - radius);
    config.heat_damage_per_sec * (1.0 - t)
}

/// Apply every star's hazard to the ship.
pub fn apply_star_hazards(
    ship: &mut Ship,
    system: &StarSystem,
    date_days: f64,
    dt: f64,
    config: &FlightConfig,
) -> HazardReport {
    let mut report = HazardReport::default();

    for star in system.stars() {
        let distance = ship.position.distance(star.placement.position_at(date_days));
        if distance < star.radius_au {
            ship.shields = 0.0;
            ship.hull = 0.0;
            report.incinerated = true;
            warn!("{} flew into {}", ship.name, star.name);
            return report;
        }
        let rate = heat_damage_rate(distance, star.radius_au, config);
        if rate > 0.0 {
            report.in_heat = true;
            report.damage += rate * dt;
        }
    }

    ship.apply_damage(report.damage);
    report
}
