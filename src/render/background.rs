//! Backdrop starfield and foreground dust.

use bevy::color::{Mix, Srgba};
use bevy::math::DVec3;

use crate::camera::{project, ViewCamera, Viewport};
use crate::config::FlightConfig;
use crate::flight::base_max_speed;
use crate::math::normalize;
use crate::particles::{streak_glyph, DustField, Starfield};
use crate::render::raster::DepthBuffer;
use crate::ship::Ship;

const DUST_COLOR: Srgba = Srgba::rgb(0.55, 0.55, 0.6);

/// Fraction of a particle's distance used to sample its apparent motion.
const STREAK_TAIL: f64 = 0.05;

/// Plot every backdrop star visible from the ship.
pub fn render_starfield(
    buffer: &mut DepthBuffer,
    starfield: &Starfield,
    ship: &Ship,
    camera: &ViewCamera,
    viewport: &Viewport,
    config: &FlightConfig,
) {
    let positions = starfield.positions_around(ship.position, config.starfield_radius);
    for (star, world) in starfield.stars().iter().zip(positions) {
        let Some(p) = project(world, camera, viewport, config.near_plane) else {
            continue;
        };
        let (x, y) = p.cell();
        let glyph = if star.brightness > 0.6 {
            '*'
        } else if star.brightness > 0.25 {
            '+'
        } else {
            '.'
        };
        let color = Srgba::rgb(0.25, 0.25, 0.3).mix(&Srgba::WHITE, star.brightness);
        buffer.plot(x, y, p.depth, glyph, color);
    }
}

/// Plot dust particles, as streaks once the ship is moving fast enough.
pub fn render_dust(
    buffer: &mut DepthBuffer,
    dust: &DustField,
    ship: &Ship,
    camera: &ViewCamera,
    viewport: &Viewport,
    config: &FlightConfig,
) {
    let streaking = ship.speed() > base_max_speed(ship, config) * config.dust_streak_speed_fraction;
    let heading = normalize(ship.velocity);

    for particle in dust.particles() {
        let Some(p) = project(particle.position, camera, viewport, config.near_plane) else {
            continue;
        };
        let glyph = if streaking && heading != DVec3::ZERO {
            // Relative to the ship, dust drifts against the velocity.
            let tail_len = particle.position.distance(ship.position) * STREAK_TAIL;
            let tail = particle.position - heading * tail_len;
            match project(tail, camera, viewport, config.near_plane) {
                Some(q) => streak_glyph(q.x - p.x, q.y - p.y, viewport.cell_aspect),
                None => '.',
            }
        } else {
            '.'
        };
        let (x, y) = p.cell();
        buffer.plot(x, y, p.depth, glyph, DUST_COLOR);
    }
}
