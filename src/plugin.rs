//! Bevy wiring for in-system flight.
//!
//! Flight runs while a [`FlightSession`] resource exists. Every system here
//! is registered once in [`FlightPlugin::build`] and gated on that resource,
//! so entering and leaving flight is just inserting and removing it.
//!
//! Hand-offs leave through messages ([`DockRequested`], [`WarpRequested`],
//! [`EncounterRequested`], [`ShipDestroyed`]). Whoever handles one answers
//! with [`HandoffComplete`] carrying the ship to resume with.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::{egui, EguiContexts, EguiPrimaryContextPass};

use crate::config::FlightConfig;
use crate::docking::Pose;
use crate::input::{sample_cursor, sample_keyboard, FlightInput, GridLayout};
use crate::render::RenderedFrame;
use crate::session::{FlightSession, FrameOutcome, SessionError};
use crate::ship::Ship;
use crate::system::{BodyRef, SystemId};

/// The ship reached a docking target.
#[derive(Message, Clone, Debug)]
pub struct DockRequested {
    pub body: BodyRef,
    /// Station entry placement at the docking date; `None` for planets.
    pub entry: Option<Pose>,
    pub ship: Ship,
}

/// The ship entered a portal.
#[derive(Message, Clone, Debug)]
pub struct WarpRequested {
    pub target: SystemId,
    pub ship: Ship,
}

/// The ship came within range of a hostile contact.
#[derive(Message, Clone, Debug)]
pub struct EncounterRequested {
    pub contact: u32,
    pub ship: Ship,
}

/// Hull reached zero.
#[derive(Message, Clone, Debug)]
pub struct ShipDestroyed {
    pub ship: Ship,
}

/// A hand-off finished; flight resumes with this ship.
#[derive(Message, Clone, Debug)]
pub struct HandoffComplete {
    pub ship: Ship,
}

/// Most recent rendered frame, drawn by the UI pass.
#[derive(Resource, Default)]
pub struct LatestFrame {
    pub frame: Option<RenderedFrame>,
}

/// Writers for every hand-off message.
#[derive(SystemParam)]
pub struct HandoffWriters<'w> {
    dock: MessageWriter<'w, DockRequested>,
    warp: MessageWriter<'w, WarpRequested>,
    encounter: MessageWriter<'w, EncounterRequested>,
    destroyed: MessageWriter<'w, ShipDestroyed>,
}

/// Plugin providing in-system flight.
pub struct FlightPlugin;

impl Plugin for FlightPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FlightConfig>()
            .init_resource::<FlightInput>()
            .init_resource::<GridLayout>()
            .init_resource::<LatestFrame>()
            .add_message::<DockRequested>()
            .add_message::<WarpRequested>()
            .add_message::<EncounterRequested>()
            .add_message::<ShipDestroyed>()
            .add_message::<HandoffComplete>()
            .add_systems(
                Update,
                (
                    fit_grid_to_window,
                    sample_keyboard,
                    sample_cursor,
                    tick_flight,
                    resume_flight,
                )
                    .chain()
                    .run_if(resource_exists::<FlightSession>),
            )
            .add_systems(
                EguiPrimaryContextPass,
                draw_flight_grid.run_if(resource_exists::<FlightSession>),
            );
    }
}

/// Start flight with a prepared session.
pub fn enter_flight(commands: &mut Commands, session: FlightSession) {
    commands.insert_resource(session);
    commands.insert_resource(FlightInput::default());
    commands.insert_resource(LatestFrame::default());
}

/// Stop flight. All flight systems stop running once the session is gone.
pub fn leave_flight(commands: &mut Commands) {
    commands.remove_resource::<FlightSession>();
    commands.insert_resource(LatestFrame::default());
}

/// Resize the grid to fill the primary window.
pub fn fit_grid_to_window(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut layout: ResMut<GridLayout>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let usable = Vec2::new(window.width(), window.height()) - layout.origin * 2.0;
    let columns = (usable.x / layout.cell_width).floor().max(1.0) as usize;
    let rows = (usable.y / layout.cell_height).floor().max(1.0) as usize;
    if columns != layout.columns || rows != layout.rows {
        layout.columns = columns;
        layout.rows = rows;
    }
}

/// Advance the session one frame and publish its result.
pub fn tick_flight(
    time: Res<Time>,
    layout: Res<GridLayout>,
    mut session: ResMut<FlightSession>,
    mut input: ResMut<FlightInput>,
    mut latest: ResMut<LatestFrame>,
    mut handoffs: HandoffWriters,
) {
    if session.is_suspended() {
        return;
    }
    let result = session.tick(&input, time.delta_secs_f64(), layout.viewport());
    input.clear_edges();

    let result = match result {
        Ok(result) => result,
        Err(SessionError::Suspended) => return,
        Err(err) => {
            warn!("Flight tick failed: {err}");
            return;
        }
    };

    let ship = session.ship().clone();
    match result.outcome {
        FrameOutcome::Continue => latest.frame = result.frame,
        FrameOutcome::Dock { body, entry } => {
            info!("Hand-off: docking with {:?}", body);
            handoffs.dock.write(DockRequested { body, entry, ship });
        }
        FrameOutcome::Warp(target) => {
            info!("Hand-off: warp to {:?}", target);
            handoffs.warp.write(WarpRequested { target, ship });
        }
        FrameOutcome::Encounter(contact) => {
            info!("Hand-off: encounter with contact {}", contact);
            handoffs.encounter.write(EncounterRequested { contact, ship });
        }
        FrameOutcome::Destroyed => {
            info!("Hand-off: ship destroyed");
            handoffs.destroyed.write(ShipDestroyed { ship });
        }
    }
}

/// Hand the ship back to a suspended session.
pub fn resume_flight(
    mut completed: MessageReader<HandoffComplete>,
    mut session: ResMut<FlightSession>,
) {
    for HandoffComplete { ship } in completed.read() {
        if !session.is_suspended() {
            warn!("Hand-off completed while flight was running; ignored");
            continue;
        }
        match session.resume(ship.clone()) {
            Ok(()) => info!("Flight resumed"),
            Err(err) => warn!("Could not resume flight: {err}"),
        }
    }
}

fn color32(color: Srgba) -> egui::Color32 {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    egui::Color32::from_rgb(channel(color.red), channel(color.green), channel(color.blue))
}

/// Paint the latest frame as monospace glyphs, one per cell.
pub fn draw_flight_grid(
    mut contexts: EguiContexts,
    layout: Res<GridLayout>,
    latest: Res<LatestFrame>,
) {
    let Some(frame) = &latest.frame else {
        return;
    };
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    let painter = ctx.layer_painter(egui::LayerId::background());
    let size = layout.cell_origin(frame.grid.width(), frame.grid.height()) - layout.origin;
    painter.rect_filled(
        egui::Rect::from_min_size(
            egui::pos2(layout.origin.x, layout.origin.y),
            egui::vec2(size.x, size.y),
        ),
        0.0,
        egui::Color32::BLACK,
    );

    let font = egui::FontId::monospace(layout.cell_height * 0.8);
    for row in 0..frame.grid.height() {
        for (start, text, color) in frame.grid.row_runs(row) {
            let color = color32(color);
            for (i, glyph) in text.chars().enumerate() {
                if glyph == ' ' {
                    continue;
                }
                let pos = layout.cell_origin(start + i, row);
                painter.text(
                    egui::pos2(pos.x, pos.y),
                    egui::Align2::LEFT_TOP,
                    glyph,
                    font.clone(),
                    color,
                );
            }
        }
    }
}
