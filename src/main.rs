//! Starglyph - in-system flight rendered as a character grid.
//!
//! Pass a scenario id as the first argument to pick a starting point;
//! defaults to open space. F5 restarts the current scenario.

use bevy::prelude::*;
use bevy_egui::EguiPlugin;

use starglyph::config::FlightConfig;
use starglyph::handoff::ScriptedHandoffPlugin;
use starglyph::plugin::{enter_flight, leave_flight, FlightPlugin};
use starglyph::scenarios::{get_scenario, CurrentScenario, Scenario};

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Starglyph".into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(EguiPlugin::default())
        .insert_resource(ClearColor(Color::BLACK))
        .init_resource::<CurrentScenario>()
        .add_plugins((FlightPlugin, ScriptedHandoffPlugin))
        .add_systems(Startup, start_flight)
        .add_systems(Update, restart_flight)
        .run();
}

fn start_flight(
    mut commands: Commands,
    config: Res<FlightConfig>,
    mut current: ResMut<CurrentScenario>,
) {
    commands.spawn(Camera2d);

    let requested = std::env::args().nth(1);
    let scenario = match requested.as_deref().map(|id| (id, get_scenario(id))) {
        Some((_, Some(found))) => *found,
        Some((id, None)) => {
            warn!("Unknown scenario ID: {id}; using the default");
            Scenario::default()
        }
        None => Scenario::default(),
    };
    current.id = scenario.id;

    match scenario.session(config.clone()) {
        Ok(session) => enter_flight(&mut commands, session),
        Err(err) => error!("Could not start flight: {err}"),
    }
}

fn restart_flight(
    mut commands: Commands,
    keys: Res<ButtonInput<KeyCode>>,
    config: Res<FlightConfig>,
    current: Res<CurrentScenario>,
) {
    if !keys.just_pressed(KeyCode::F5) {
        return;
    }
    let scenario = get_scenario(current.id).copied().unwrap_or_default();
    leave_flight(&mut commands);
    match scenario.session(config.clone()) {
        Ok(session) => enter_flight(&mut commands, session),
        Err(err) => error!("Could not restart flight: {err}"),
    }
}
