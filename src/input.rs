//! Input snapshot for one flight frame, and the Bevy systems that fill it.
//!
//! The engine never touches Bevy's input resources directly: each frame the
//! sampling systems translate held keys, edge presses and the mouse position
//! into a plain [`FlightInput`] value.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::camera::Viewport;

/// Everything the flight engine reads from the player in one frame.
#[derive(Resource, Clone, Debug, Default, PartialEq)]
pub struct FlightInput {
    /// Forward thrust held.
    pub thrust: bool,
    /// Brake held.
    pub brake: bool,
    /// Boost held.
    pub boost: bool,
    /// Yaw command in [-1, 1]; positive turns right.
    pub yaw: f64,
    /// Pitch command in [-1, 1]; positive raises the nose.
    pub pitch: f64,
    /// Fire pressed this frame.
    pub fire: bool,
    /// Open-portal pressed this frame.
    pub open_portal: bool,
    /// Pause toggle pressed this frame.
    pub toggle_pause: bool,
    /// Grid cell under the mouse, if the cursor is over the grid.
    pub cursor: Option<(i64, i64)>,
}

impl FlightInput {
    /// Clear edge-triggered fields after they have been consumed.
    pub fn clear_edges(&mut self) {
        self.fire = false;
        self.open_portal = false;
        self.toggle_pause = false;
    }
}

/// Placement of the glyph grid inside the window, in logical pixels.
#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct GridLayout {
    pub columns: usize,
    pub rows: usize,
    /// Top-left corner of the grid.
    pub origin: Vec2,
    /// Width of one character cell.
    pub cell_width: f32,
    /// Height of one character cell.
    pub cell_height: f32,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            columns: 120,
            rows: 40,
            origin: Vec2::new(8.0, 8.0),
            cell_width: 9.0,
            cell_height: 18.0,
        }
    }
}

impl GridLayout {
    /// Cell height divided by cell width.
    pub fn cell_aspect(&self) -> f64 {
        (self.cell_height / self.cell_width) as f64
    }

    /// Projection viewport matching the grid and its cell geometry.
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.columns, self.rows, self.cell_aspect())
    }

    /// Map a window position to a grid cell, if it lies on the grid.
    pub fn cell_at(&self, pos: Vec2) -> Option<(i64, i64)> {
        let local = pos - self.origin;
        if local.x < 0.0 || local.y < 0.0 {
            return None;
        }
        let col = (local.x / self.cell_width).floor() as i64;
        let row = (local.y / self.cell_height).floor() as i64;
        (col < self.columns as i64 && row < self.rows as i64).then_some((col, row))
    }

    /// Top-left window position of a cell.
    pub fn cell_origin(&self, col: usize, row: usize) -> Vec2 {
        self.origin + Vec2::new(col as f32 * self.cell_width, row as f32 * self.cell_height)
    }
}

/// Translate keyboard and mouse buttons into the flight input snapshot.
///
/// W/↑ thrust, S/↓ brake, A/D or ←/→ yaw, R/F pitch, Shift boost,
/// Space or left click fire, P portal, Esc pause.
pub fn sample_keyboard(
    keys: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    mut input: ResMut<FlightInput>,
) {
    let axis = |neg: bool, pos: bool| match (neg, pos) {
        (true, false) => -1.0,
        (false, true) => 1.0,
        _ => 0.0,
    };

    input.thrust = keys.any_pressed([KeyCode::KeyW, KeyCode::ArrowUp]);
    input.brake = keys.any_pressed([KeyCode::KeyS, KeyCode::ArrowDown]);
    input.boost = keys.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]);
    input.yaw = axis(
        keys.any_pressed([KeyCode::KeyA, KeyCode::ArrowLeft]),
        keys.any_pressed([KeyCode::KeyD, KeyCode::ArrowRight]),
    );
    input.pitch = axis(keys.pressed(KeyCode::KeyF), keys.pressed(KeyCode::KeyR));
    input.fire = keys.just_pressed(KeyCode::Space) || mouse.just_pressed(MouseButton::Left);
    input.open_portal = keys.just_pressed(KeyCode::KeyP);
    input.toggle_pause = keys.just_pressed(KeyCode::Escape);
}

/// Track which grid cell the mouse is over.
pub fn sample_cursor(
    windows: Query<&Window, With<PrimaryWindow>>,
    layout: Res<GridLayout>,
    mut input: ResMut<FlightInput>,
) {
    input.cursor = windows
        .single()
        .ok()
        .and_then(|window| window.cursor_position())
        .and_then(|pos| layout.cell_at(pos));
}
