//! Session-level flight scenarios: portals, boost, dust and hand-offs.

mod common;

use bevy::math::DVec3;
use common::{quiet_config, session_at, viewport, HOSTILE, NEAR};
use starglyph::config::FlightConfig;
use starglyph::handoff::{complete_dock, complete_warp};
use starglyph::input::FlightInput;
use starglyph::particles::dust_range;
use starglyph::session::FrameOutcome;
use starglyph::system::{BodyRef, SystemId};

const DT: f64 = 0.016;

fn open_portal() -> FlightInput {
    FlightInput {
        open_portal: true,
        ..Default::default()
    }
}

#[test]
fn test_portal_rejected_near_planet_leaves_state_unchanged() {
    let mut session = session_at(DVec3::new(0.0, 0.0, 0.45), quiet_config());
    let fuel = session.ship().fuel;

    let result = session.tick(&open_portal(), DT, viewport()).unwrap();
    assert_eq!(result.outcome, FrameOutcome::Continue);
    assert!(session.portals().last_portal().is_none());
    assert_eq!(session.ship().fuel, fuel);
    assert_eq!(
        session.hud().latest(),
        Some("TOO CLOSE TO NEAR - CANNOT OPEN PORTAL")
    );
}

#[test]
fn test_portal_warp_and_resume_in_target_system() {
    let mut session = session_at(DVec3::new(0.5, 0.5, -1.0), quiet_config());
    session.tick(&open_portal(), DT, viewport()).unwrap();
    assert_eq!(session.hud().latest(), Some("PORTAL OPENING"));
    let portal_position = session.portals().portal().unwrap().position;

    session.tick(&FlightInput::default(), 0.05, viewport()).unwrap();
    session.ship_mut().position = portal_position;
    let result = session.tick(&FlightInput::default(), DT, viewport()).unwrap();
    assert_eq!(result.outcome, FrameOutcome::Warp(SystemId(1)));
    assert!(result.frame.is_none());
    // 2 ly at the default tuning: 5 + 2 × 2.
    assert!((session.ship().fuel - 91.0).abs() < 1e-9);

    let arrived = complete_warp(
        session.ship(),
        SystemId(1),
        session.galaxy(),
        session.clock().date_days,
    );
    session.resume(arrived).unwrap();
    assert!(session.portals().portal().is_none());
    let result = session.tick(&FlightInput::default(), DT, viewport()).unwrap();
    assert_eq!(result.outcome, FrameOutcome::Continue);
    assert_eq!(session.current_system().unwrap().name, "Other");
}

#[test]
fn test_boost_without_fuel_posts_block_message() {
    let mut session = session_at(DVec3::new(0.5, 0.5, -1.0), quiet_config());
    session.ship_mut().fuel = 0.0;
    let input = FlightInput {
        thrust: true,
        boost: true,
        ..Default::default()
    };
    session.tick(&input, DT, viewport()).unwrap();
    assert_eq!(session.hud().latest(), Some("NO FUEL - BOOST UNAVAILABLE"));
    assert!(!session.controller().boost.is_boosting());
}

#[test]
fn test_dust_beyond_range_is_removed_next_update() {
    let mut session = session_at(DVec3::new(0.5, 0.5, -1.0), FlightConfig::default());
    session.tick(&FlightInput::default(), DT, viewport()).unwrap();
    let count = session.config().dust_count;
    assert_eq!(session.dust().len(), count);

    let stray = session.ship().position + DVec3::X;
    session.dust_mut().push(stray);
    session.tick(&FlightInput::default(), DT, viewport()).unwrap();

    let range = dust_range(session.ship(), session.config());
    let ship = session.ship().position;
    assert!(session.dust().particles().iter().all(|p| p.position.distance(ship) <= range));
    assert_eq!(session.dust().len(), count);
}

#[test]
fn test_planet_dock_and_resume() {
    let mut session = session_at(DVec3::new(0.0, 0.0, 0.475), quiet_config());
    let result = session.tick(&FlightInput::default(), DT, viewport()).unwrap();
    let near = BodyRef {
        system: SystemId(0),
        body: NEAR,
    };
    assert_eq!(
        result.outcome,
        FrameOutcome::Dock {
            body: near,
            entry: None
        }
    );
    assert!(session.is_suspended());

    let undocked = complete_dock(
        session.ship(),
        near,
        session.galaxy(),
        session.clock().date_days,
        session.config(),
    );
    session.resume(undocked).unwrap();
    let result = session.tick(&FlightInput::default(), DT, viewport()).unwrap();
    assert_eq!(result.outcome, FrameOutcome::Continue);
}

#[test]
fn test_hostile_contact_engages_once_per_visit() {
    let mut session = session_at(DVec3::new(1.0, 0.0, -0.001), quiet_config());
    let result = session.tick(&FlightInput::default(), DT, viewport()).unwrap();
    assert_eq!(result.outcome, FrameOutcome::Encounter(HOSTILE));

    let ship = session.ship().clone();
    session.resume(ship).unwrap();
    let result = session.tick(&FlightInput::default(), DT, viewport()).unwrap();
    assert_eq!(result.outcome, FrameOutcome::Continue);
}

#[test]
fn test_star_heat_destroys_fragile_ship() {
    let mut session = session_at(DVec3::new(0.0, 0.0, -4.98), quiet_config());
    session.ship_mut().shields = 0.0;
    session.ship_mut().hull = 0.01;
    let result = session.tick(&FlightInput::default(), 0.05, viewport()).unwrap();
    assert_eq!(result.outcome, FrameOutcome::Destroyed);
}
