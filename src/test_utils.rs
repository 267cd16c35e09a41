//! Test utilities for flight engine tests.
//!
//! Provides a small fixed galaxy and ship for session-level tests, and
//! assertions for inspecting rendered grids.

use bevy::math::DVec3;

use crate::config::FlightConfig;
use crate::session::FlightSession;
use crate::ship::Ship;
use crate::system::{
    Body, BodyId, Contact, Galaxy, Placement, Planet, PlanetKind, Star, StarClass, StarSystem,
    Station, SystemId,
};
use crate::time::SimClock;

/// Fixtures for creating test worlds.
pub mod fixtures {
    use super::*;

    /// Two systems a few light-years apart. System 0 has a star at the
    /// origin, a planet at +Z, a station at +X and a hostile contact; system
    /// 1 has only a star.
    pub fn two_system_galaxy() -> Galaxy {
        let home = StarSystem::new("Hestia", DVec3::ZERO)
            .with_body(Body::Star(Star {
                id: BodyId(0),
                name: "Hestia".into(),
                class: StarClass::Yellow,
                radius_au: 0.01,
                placement: Placement::Static(DVec3::ZERO),
            }))
            .with_body(Body::Planet(Planet {
                id: BodyId(1),
                name: "Rhea".into(),
                kind: PlanetKind::Terrestrial,
                radius_au: 0.005,
                placement: Placement::Static(DVec3::new(0.0, 0.0, 1.0)),
            }))
            .with_body(Body::Station(Station {
                id: BodyId(2),
                name: "Anchor".into(),
                radius_au: 0.0005,
                placement: Placement::Static(DVec3::new(0.5, 0.0, 0.0)),
                spin_period_days: 0.5,
            }))
            .with_contact(Contact {
                id: 7,
                name: "Raider".into(),
                position: DVec3::new(-0.5, 0.0, 0.5),
                hostile: true,
            });
        let far = StarSystem::new("Tyche", DVec3::new(3.0, 0.0, 4.0)).with_body(Body::Star(Star {
            id: BodyId(0),
            name: "Tyche".into(),
            class: StarClass::Red,
            radius_au: 0.008,
            placement: Placement::Static(DVec3::ZERO),
        }));
        Galaxy::new(vec![home, far])
    }

    /// A fresh ship in open space, clear of every body and contact, facing +Z.
    pub fn ship_in(system: SystemId) -> Ship {
        Ship::new("Test", system, DVec3::new(0.0, 0.3, -0.5))
    }

    /// A running session in system 0 of [`two_system_galaxy`].
    pub fn session() -> FlightSession {
        FlightSession::new(
            two_system_galaxy(),
            ship_in(SystemId(0)),
            SimClock::default(),
            FlightConfig::default(),
        )
        .expect("fixture session is valid")
    }
}

/// Assertions on rendered output.
pub mod assertions {
    use crate::render::GlyphGrid;

    /// Whether any row of the grid contains `needle`.
    pub fn grid_contains(grid: &GlyphGrid, needle: &str) -> bool {
        (0..grid.height()).any(|row| grid.row_string(row).contains(needle))
    }
}

/// Utilities for creating headless Bevy apps for testing.
pub mod bevy_test {
    use bevy::prelude::*;

    /// Create a minimal Bevy app for testing without rendering.
    ///
    /// Keyboard and mouse input resources are inserted by hand since
    /// MinimalPlugins does not include the input plugin.
    pub fn headless_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.init_resource::<ButtonInput<KeyCode>>();
        app.init_resource::<ButtonInput<MouseButton>>();
        app
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_ship_is_clear_of_bodies() {
        let galaxy = fixtures::two_system_galaxy();
        let ship = fixtures::ship_in(SystemId(0));
        let system = galaxy.get(SystemId(0)).unwrap();
        for body in &system.bodies {
            let distance = body.position_at(0.0).distance(ship.position);
            assert!(distance > body.radius_au() * 10.0, "{} too close", body.name());
        }
    }

    #[test]
    fn test_fixture_session_targets_second_system() {
        let session = fixtures::session();
        assert_eq!(session.warp_target(), Some(SystemId(1)));
    }

    #[test]
    fn test_grid_contains() {
        let mut grid = crate::render::GlyphGrid::new(10, 2);
        grid.put_str(2, 1, "HI", bevy::color::Srgba::WHITE);
        assert!(assertions::grid_contains(&grid, "HI"));
        assert!(!assertions::grid_contains(&grid, "HO"));
    }
}
