//! Transient scene elements: the warp portal, laser bolts and contacts.
//!
//! Everything here writes through the depth buffer like the bodies do, so a
//! portal behind a planet is hidden by it.

use bevy::color::Srgba;

use crate::camera::{pixels_per_unit, project, ViewCamera, Viewport};
use crate::config::FlightConfig;
use crate::flight::LaserBolt;
use crate::particles::streak_glyph;
use crate::portal::Portal;
use crate::render::bodies::ellipse_cells;
use crate::render::raster::DepthBuffer;
use crate::render::shading::cell_hash;
use crate::system::Contact;

const PORTAL_RIM: [Srgba; 2] = [Srgba::rgb(0.45, 0.85, 1.0), Srgba::rgb(0.8, 0.5, 1.0)];
const LASER_COLOR: Srgba = Srgba::rgb(1.0, 0.25, 0.2);
const HOSTILE_COLOR: Srgba = Srgba::rgb(1.0, 0.3, 0.3);
const NEUTRAL_COLOR: Srgba = Srgba::rgb(0.4, 0.95, 0.5);

/// Inner edge of the drawn portal rim, as a squared unit-disc radius.
const RIM_INNER_SQ: f64 = 0.55;

/// Shimmer steps per second of portal age.
const SHIMMER_RATE: f64 = 6.0;

/// Draw the portal as a shimmering ring. The interior is left untouched so
/// the scene behind stays visible.
pub fn render_portal(
    buffer: &mut DepthBuffer,
    portal: &Portal,
    now_secs: f64,
    camera: &ViewCamera,
    viewport: &Viewport,
    config: &FlightConfig,
) {
    let Some(p) = project(portal.position, camera, viewport, config.near_plane) else {
        return;
    };
    let radius_au = portal.radius_at(now_secs, config);
    let rx = radius_au * pixels_per_unit(camera.fov_deg, viewport, p.depth) * config.screen_scale;
    let step = (portal.age(now_secs) * SHIMMER_RATE).floor() as i64;

    if rx.round() < 1.0 {
        if radius_au > 0.0 && viewport.contains(p.x, p.y) {
            let (x, y) = p.cell();
            buffer.plot(x, y, p.depth, 'o', PORTAL_RIM[0]);
        }
        return;
    }

    for (x, y, point) in ellipse_cells((p.x, p.y), rx, viewport) {
        if point.radius_sq() < RIM_INNER_SQ {
            continue;
        }
        let h = cell_hash(x, y, step);
        let glyph = if h % 3 == 0 { '*' } else { 'O' };
        buffer.plot(x, y, p.depth, glyph, PORTAL_RIM[(h % 2) as usize]);
    }
}

/// Draw each bolt as a short line along its direction of travel.
pub fn render_lasers(
    buffer: &mut DepthBuffer,
    bolts: &[LaserBolt],
    camera: &ViewCamera,
    viewport: &Viewport,
    config: &FlightConfig,
) {
    for bolt in bolts {
        let Some(p) = project(bolt.position, camera, viewport, config.near_plane) else {
            continue;
        };
        let ahead = bolt.position + bolt.velocity * 0.01;
        let glyph = match project(ahead, camera, viewport, config.near_plane) {
            Some(q) => streak_glyph(q.x - p.x, q.y - p.y, viewport.cell_aspect),
            None => '.',
        };
        let (x, y) = p.cell();
        buffer.plot(x, y, p.depth, glyph, LASER_COLOR);
    }
}

/// Draw other ships as single markers.
pub fn render_contacts(
    buffer: &mut DepthBuffer,
    contacts: &[Contact],
    camera: &ViewCamera,
    viewport: &Viewport,
    config: &FlightConfig,
) {
    for contact in contacts {
        let Some(p) = project(contact.position, camera, viewport, config.near_plane) else {
            continue;
        };
        let (glyph, color) = if contact.hostile {
            ('X', HOSTILE_COLOR)
        } else {
            ('^', NEUTRAL_COLOR)
        };
        let (x, y) = p.cell();
        buffer.plot(x, y, p.depth, glyph, color);
    }
}
