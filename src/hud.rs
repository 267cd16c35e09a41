//! Status lines and transient messages overlaid on the flight view.

use bevy::color::Srgba;
use std::collections::VecDeque;

use crate::config::FlightConfig;
use crate::flight::FlightController;
use crate::portal::Portal;
use crate::render::raster::GlyphGrid;
use crate::ship::Ship;
use crate::time::{date_string, SimClock};

const STATUS_COLOR: Srgba = Srgba::rgb(0.6, 0.9, 0.6);
const MESSAGE_COLOR: Srgba = Srgba::rgb(1.0, 0.85, 0.3);
const WARNING_COLOR: Srgba = Srgba::rgb(1.0, 0.35, 0.3);

/// Messages kept at once; older ones are dropped.
const MAX_MESSAGES: usize = 4;

#[derive(Clone, Debug, PartialEq)]
pub struct HudMessage {
    pub text: String,
    /// Real seconds at which the message was posted.
    pub posted_at: f64,
}

/// Transient HUD messages, timed in real (not simulated) seconds so they
/// still clear while paused.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Hud {
    messages: VecDeque<HudMessage>,
    real_secs: f64,
}

impl Hud {
    pub fn post(&mut self, text: impl Into<String>) {
        let text = text.into();
        // Repeats refresh the timer instead of stacking.
        self.messages.retain(|m| m.text != text);
        self.messages.push_back(HudMessage {
            text,
            posted_at: self.real_secs,
        });
        while self.messages.len() > MAX_MESSAGES {
            self.messages.pop_front();
        }
    }

    /// Advance real time and drop expired messages.
    pub fn advance(&mut self, real_dt: f64, config: &FlightConfig) {
        if real_dt > 0.0 {
            self.real_secs += real_dt;
        }
        let now = self.real_secs;
        self.messages
            .retain(|m| now - m.posted_at < config.message_secs);
    }

    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().map(|m| m.text.as_str())
    }

    pub fn latest(&self) -> Option<&str> {
        self.messages.back().map(|m| m.text.as_str())
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

/// What the HUD says about the hovered body.
#[derive(Clone, Debug, PartialEq)]
pub struct TargetReadout {
    pub name: String,
    pub kind: &'static str,
    pub distance_au: f64,
}

/// Everything the status lines display for one frame.
pub struct HudContext<'a> {
    pub ship: &'a Ship,
    pub controller: &'a FlightController,
    pub clock: &'a SimClock,
    pub system_name: &'a str,
    pub target: Option<TargetReadout>,
    pub portal: Option<&'a Portal>,
    pub warp_target: Option<&'a str>,
}

/// Build the status lines shown at the top of the view.
pub fn status_lines(ctx: &HudContext<'_>, config: &FlightConfig) -> Vec<String> {
    let ship = ctx.ship;
    let mut lines = vec![
        format!(
            "FUEL {:5.1}/{:.0}  SHLD {:4.0}/{:.0}  HULL {:4.0}/{:.0}  LSR {}/{:.0}",
            ship.fuel,
            ship.max_fuel,
            ship.shields,
            ship.max_shields,
            ship.hull,
            ship.max_hull,
            ship.lasers.floor() as i64,
            ship.max_lasers
        ),
        format!(
            "SPD {:.5}/{:.5} AU/s  {}",
            ship.speed(),
            ctx.controller.speed_cap(ship, config),
            ctx.controller.boost.label()
        )
        .trim_end()
        .to_string(),
    ];

    let mut place = format!("{}  {}", ctx.system_name, date_string(ctx.clock.date_days));
    if let Some(dest) = ctx.warp_target {
        place.push_str(&format!("  WARP>{dest}"));
    }
    if ctx.clock.paused {
        place.push_str("  [PAUSED]");
    }
    lines.push(place);

    if let Some(portal) = ctx.portal {
        lines.push(format!(
            "PORTAL {:?} {:.0}s",
            portal.phase,
            (config.portal_expand_secs + config.portal_lifetime_secs - portal.age(ctx.clock.flight_secs))
                .max(0.0)
        ).to_uppercase());
    }

    if let Some(target) = &ctx.target {
        lines.push(format!(
            "TARGET {} ({}) {:.4} AU",
            target.name, target.kind, target.distance_au
        ));
    }
    lines
}

/// Overlay status lines (top-left) and messages (bottom, centred).
pub fn draw_hud(grid: &mut GlyphGrid, lines: &[String], hud: &Hud, ship: &Ship) {
    let critical = ship.hull < ship.max_hull * 0.25;
    for (row, line) in lines.iter().enumerate() {
        let color = if row == 0 && critical { WARNING_COLOR } else { STATUS_COLOR };
        grid.put_str(1, row as i64, line, color);
    }

    let bottom = grid.height() as i64 - 1;
    for (i, text) in hud.messages().collect::<Vec<_>>().iter().rev().enumerate() {
        let width = text.chars().count() as i64;
        let x = (grid.width() as i64 - width) / 2;
        grid.put_str(x, bottom - i as i64, text, MESSAGE_COLOR);
    }
}
