//! Preset starting points for flight.
//!
//! Every scenario flies in the same demo galaxy ([`demo_galaxy`]) and differs
//! only in where the ship starts, what it faces, and the starting date.

pub mod presets;

use bevy::math::DVec3;
use bevy::prelude::*;

use crate::config::FlightConfig;
use crate::math::{look_rotation, UP};
use crate::session::{FlightSession, SessionError};
use crate::ship::Ship;
use crate::system::{
    Body, BodyId, Contact, Galaxy, OrbitDescriptor, Placement, Planet, PlanetKind, Star, StarClass,
    StarSystem, Station, SystemId,
};
use crate::time::SimClock;

pub use presets::SCENARIOS;

/// A predefined starting configuration.
#[derive(Clone, Copy, Debug)]
pub struct Scenario {
    /// Unique identifier for the scenario.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Brief description of the scenario.
    pub description: &'static str,
    /// Index of the starting system in [`demo_galaxy`].
    pub system: usize,
    /// Ship position relative to the system origin (AU).
    pub ship_position: DVec3,
    /// Body the ship starts facing. None = face +Z.
    pub look_at: Option<u32>,
    /// In-game date the flight starts at.
    pub start_date_days: f64,
    /// Whether to start paused.
    pub start_paused: bool,
}

impl Default for Scenario {
    fn default() -> Self {
        presets::OPEN_SPACE
    }
}

impl Scenario {
    /// Build the ship and clock this scenario starts with.
    pub fn start_state(&self, galaxy: &Galaxy) -> (Ship, SimClock) {
        let system_id = SystemId(self.system);
        let mut ship = Ship::new("Kite", system_id, self.ship_position);

        let target = self
            .look_at
            .and_then(|id| galaxy.get(system_id)?.body(BodyId(id)))
            .map(|body| body.position_at(self.start_date_days));
        if let Some(target) = target {
            ship.rotation = look_rotation(target - ship.position, UP);
        }

        let mut clock = SimClock::at_date(self.start_date_days);
        clock.paused = self.start_paused;
        (ship, clock)
    }

    /// Start a flight session for this scenario in the demo galaxy.
    pub fn session(&self, config: FlightConfig) -> Result<FlightSession, SessionError> {
        let galaxy = demo_galaxy();
        let (ship, clock) = self.start_state(&galaxy);
        info!("Loading scenario: {} ({})", self.name, self.id);
        FlightSession::new(galaxy, ship, clock, config)
    }
}

/// Get a scenario by ID.
pub fn get_scenario(id: &str) -> Option<&'static Scenario> {
    SCENARIOS.iter().find(|s| s.id == id)
}

fn planet(id: u32, name: &str, kind: PlanetKind, radius_au: f64, orbit: OrbitDescriptor) -> Body {
    Body::Planet(Planet {
        id: BodyId(id),
        name: name.into(),
        kind,
        radius_au,
        placement: Placement::Orbit(orbit),
    })
}

fn star(id: u32, name: &str, class: StarClass, radius_au: f64) -> Body {
    Body::Star(Star {
        id: BodyId(id),
        name: name.into(),
        class,
        radius_au,
        placement: Placement::Static(DVec3::ZERO),
    })
}

/// The three-system galaxy used by every preset.
///
/// Kestrel (system 0) is the busiest: a yellow star, three planets including
/// a banded gas giant, a spinning station sharing an orbit with Aurel, and a
/// hostile contact parked between Tessa and Vorn.
pub fn demo_galaxy() -> Galaxy {
    let kestrel = StarSystem::new("Kestrel", DVec3::ZERO)
        .with_body(star(0, "Kestrel", StarClass::Yellow, 0.02))
        .with_body(planet(
            1,
            "Aurel",
            PlanetKind::Terrestrial,
            0.004,
            OrbitDescriptor::new(0.4, 80.0, 0.0),
        ))
        .with_body(planet(
            2,
            "Tessa",
            PlanetKind::Ocean,
            0.005,
            OrbitDescriptor::new(0.7, 190.0, 0.3),
        ))
        .with_body(planet(
            3,
            "Vorn",
            PlanetKind::GasGiant,
            0.015,
            OrbitDescriptor::new(1.4, 520.0, 0.6),
        ))
        .with_body(Body::Station(Station {
            id: BodyId(4),
            name: "Kestrel Dock".into(),
            radius_au: 0.0008,
            placement: Placement::Orbit(OrbitDescriptor::new(0.43, 80.0, 0.0)),
            spin_period_days: 0.5,
        }))
        .with_contact(Contact {
            id: 1,
            name: "Corsair".into(),
            position: DVec3::new(-0.5, 0.02, 0.6),
            hostile: true,
        })
        .with_contact(Contact {
            id: 2,
            name: "Hauler".into(),
            position: DVec3::new(0.45, -0.01, 0.05),
            hostile: false,
        });

    let brannock = StarSystem::new("Brannock", DVec3::new(4.0, 1.0, -2.0))
        .with_body(star(0, "Brannock", StarClass::Red, 0.012))
        .with_body(planet(
            1,
            "Cinder",
            PlanetKind::Lava,
            0.003,
            OrbitDescriptor::new(0.15, 20.0, 0.1),
        ))
        .with_body(planet(
            2,
            "Hollow",
            PlanetKind::Ice,
            0.006,
            OrbitDescriptor {
                inclination: 0.2,
                ..OrbitDescriptor::new(0.9, 300.0, 0.75)
            },
        ))
        .with_body(Body::Station(Station {
            id: BodyId(3),
            name: "Brannock Relay".into(),
            radius_au: 0.0006,
            placement: Placement::Static(DVec3::new(0.3, 0.0, 0.3)),
            spin_period_days: 1.0,
        }));

    let iyo = StarSystem::new("Iyo", DVec3::new(-6.0, 3.0, 5.0))
        .with_body(star(0, "Iyo", StarClass::Blue, 0.03))
        .with_body(planet(
            1,
            "Sable",
            PlanetKind::Desert,
            0.005,
            OrbitDescriptor::new(1.1, 400.0, 0.5),
        ));

    Galaxy::new(vec![kestrel, brannock, iyo])
}

/// Resource tracking the scenario the current flight was started from.
#[derive(Resource, Default)]
pub struct CurrentScenario {
    pub id: &'static str,
}
