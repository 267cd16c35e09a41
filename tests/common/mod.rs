//! Common test utilities for integration tests.

#![allow(dead_code)]

use bevy::math::DVec3;
use bevy::prelude::*;
use starglyph::camera::Viewport;
use starglyph::config::FlightConfig;
use starglyph::session::FlightSession;
use starglyph::ship::Ship;
use starglyph::system::{
    Body, BodyId, Contact, Galaxy, Placement, Planet, PlanetKind, Star, StarClass, StarSystem,
    SystemId,
};
use starglyph::time::SimClock;

pub const NEAR: BodyId = BodyId(1);
pub const FAR: BodyId = BodyId(2);
pub const HOSTILE: u32 = 9;

/// Grid used by every session test.
pub fn viewport() -> Viewport {
    Viewport::new(80, 30, 2.0)
}

/// A system with two planets straight ahead of the origin along +Z: a small
/// one at 0.5 AU and a larger one at 0.7 AU whose disc surrounds it on
/// screen. The star sits behind the origin, lighting the planets' near
/// faces. A hostile contact waits off to the side at +X.
pub fn occlusion_galaxy() -> Galaxy {
    let planet = |id: BodyId, name: &str, radius_au: f64, z: f64| {
        Body::Planet(Planet {
            id,
            name: name.into(),
            kind: PlanetKind::Desert,
            radius_au,
            placement: Placement::Static(DVec3::new(0.0, 0.0, z)),
        })
    };
    let home = StarSystem::new("Pair", DVec3::ZERO)
        .with_body(Body::Star(Star {
            id: BodyId(0),
            name: "Lamp".into(),
            class: StarClass::White,
            radius_au: 0.01,
            placement: Placement::Static(DVec3::new(0.0, 0.0, -5.0)),
        }))
        .with_body(planet(NEAR, "Near", 0.02, 0.5))
        .with_body(planet(FAR, "Far", 0.08, 0.7))
        .with_contact(Contact {
            id: HOSTILE,
            name: "Pirate".into(),
            position: DVec3::new(1.0, 0.0, 0.0),
            hostile: true,
        });
    let other = StarSystem::new("Other", DVec3::new(2.0, 0.0, 0.0)).with_body(Body::Star(Star {
        id: BodyId(0),
        name: "Other".into(),
        class: StarClass::Red,
        radius_au: 0.01,
        placement: Placement::Static(DVec3::ZERO),
    }));
    Galaxy::new(vec![home, other])
}

/// Default tuning without dust, so nothing drifts across the cells a test
/// inspects.
pub fn quiet_config() -> FlightConfig {
    FlightConfig {
        dust_count: 0,
        ..FlightConfig::default()
    }
}

/// A session in [`occlusion_galaxy`] with the ship at `position`, facing +Z.
pub fn session_at(position: DVec3, config: FlightConfig) -> FlightSession {
    let ship = Ship::new("Wren", SystemId(0), position);
    FlightSession::new(occlusion_galaxy(), ship, SimClock::default(), config)
        .expect("test session is valid")
}

/// Create a minimal Bevy app for testing without rendering.
pub fn headless_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.init_resource::<ButtonInput<KeyCode>>();
    app.init_resource::<ButtonInput<MouseButton>>();
    app
}
