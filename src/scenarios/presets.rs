//! Preset scenario definitions.
//!
//! Positions are chosen against the demo galaxy at each preset's start date,
//! so a preset that faces a body sees it on the first frame.

use bevy::math::DVec3;

use super::Scenario;

/// All available preset scenarios.
pub static SCENARIOS: &[Scenario] = &[
    OPEN_SPACE,
    PLANET_TOUR,
    STATION_APPROACH,
    SUNDIVER,
    AMBUSH,
    FRONTIER,
];

/// Scenario 1: Open Space (default)
///
/// Well clear of every body in Kestrel. Good for trying the controls and
/// opening a portal without tripping the clearance check.
pub static OPEN_SPACE: Scenario = Scenario {
    id: "open_space",
    name: "Open Space",
    description: "Drifting between orbits with nothing close by",
    system: 0,
    ship_position: DVec3::new(1.0, 0.2, 1.0),
    look_at: None,
    start_date_days: 0.0,
    start_paused: false,
};

/// Scenario 2: Planet Tour
///
/// Inner Kestrel, facing Aurel with the station just beyond it.
pub static PLANET_TOUR: Scenario = Scenario {
    id: "planet_tour",
    name: "Planet Tour",
    description: "Inner system with Aurel dead ahead",
    system: 0,
    ship_position: DVec3::new(0.3, 0.01, -0.05),
    look_at: Some(1),
    start_date_days: 0.0,
    start_paused: false,
};

/// Scenario 3: Station Approach
///
/// Lined up on Kestrel Dock's port. The station spins, so the approach window
/// comes round every half day.
pub static STATION_APPROACH: Scenario = Scenario {
    id: "station_approach",
    name: "Station Approach",
    description: "Lined up with Kestrel Dock's docking port",
    system: 0,
    ship_position: DVec3::new(0.43, 0.0, 0.006),
    look_at: Some(4),
    start_date_days: 0.0,
    start_paused: false,
};

/// Scenario 4: Sundiver
///
/// Already inside Kestrel's heat zone. Starts paused so there is time to read
/// the HUD before the hull starts cooking.
pub static SUNDIVER: Scenario = Scenario {
    id: "sundiver",
    name: "Sundiver",
    description: "Too close to the star; get out before the hull fails",
    system: 0,
    ship_position: DVec3::new(0.07, 0.0, 0.02),
    look_at: Some(0),
    start_date_days: 0.0,
    start_paused: true,
};

/// Scenario 5: Ambush
///
/// The Corsair is a short hop ahead along +Z.
pub static AMBUSH: Scenario = Scenario {
    id: "ambush",
    name: "Ambush",
    description: "A hostile contact waits just ahead",
    system: 0,
    ship_position: DVec3::new(-0.5, 0.02, 0.58),
    look_at: None,
    start_date_days: 0.0,
    start_paused: false,
};

/// Scenario 6: Frontier
///
/// Brannock, a red dwarf one portal hop from Kestrel, facing the tilted orbit
/// of Hollow.
pub static FRONTIER: Scenario = Scenario {
    id: "frontier",
    name: "Frontier",
    description: "Red dwarf system with an inclined ice world",
    system: 1,
    ship_position: DVec3::new(0.5, 0.05, 0.5),
    look_at: Some(2),
    start_date_days: 120.0,
    start_paused: false,
};
