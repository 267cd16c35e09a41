//! Rasterises stars, planets and stations into the depth buffer.
//!
//! Each body becomes either a single type glyph (when it projects smaller
//! than a cell) or a filled ellipse. Every cell of a body carries the same
//! depth, the camera distance to its centre, so the picker can compare a
//! sampled cell against a body's depth with a small tolerance.

use bevy::color::Srgba;

use crate::camera::{pixels_per_unit, project, ViewCamera, Viewport};
use crate::config::FlightConfig;
use crate::math::normalize;
use crate::render::raster::DepthBuffer;
use crate::render::shading::{
    flicker_bucket, point_glyph, shade_star, shade_station, DiscPoint, PlanetShading, PointKind,
    SurfacePatches,
};
use crate::system::{Body, BodyRef, StarSystem, SystemId};
use crate::time::SimClock;

/// Where a body landed on screen this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyScreenInfo {
    pub body: BodyRef,
    /// Fractional screen centre.
    pub center: (f64, f64),
    /// Horizontal radius in cells (0 for point glyphs).
    pub radius_cells: f64,
    /// Depth written for every cell of this body.
    pub depth: f64,
}

impl BodyScreenInfo {
    /// Cells this body may have written, clipped to the grid.
    pub fn footprint(&self, viewport: &Viewport) -> Vec<(i64, i64)> {
        if self.radius_cells.round() < 1.0 {
            let (x, y) = (self.center.0.floor() as i64, self.center.1.floor() as i64);
            return if viewport.contains(self.center.0, self.center.1) {
                vec![(x, y)]
            } else {
                Vec::new()
            };
        }
        ellipse_cells(self.center, self.radius_cells, viewport)
            .into_iter()
            .map(|(x, y, _)| (x, y))
            .collect()
    }
}

/// Cells whose centres fall inside the ellipse `(dx/rx)² + (dy/ry)² ≤ 1`
/// with `ry = rx / aspect`, scanning only the grid-clamped bounding box.
pub fn ellipse_cells(center: (f64, f64), rx: f64, viewport: &Viewport) -> Vec<(i64, i64, DiscPoint)> {
    let ry = rx / viewport.cell_aspect;
    if !(rx > 0.0 && ry > 0.0) || viewport.width == 0 || viewport.height == 0 {
        return Vec::new();
    }
    let (cx, cy) = center;
    let max_x = viewport.width as f64 - 1.0;
    let max_y = viewport.height as f64 - 1.0;
    let x0 = (cx - rx).floor().max(0.0);
    let x1 = (cx + rx).ceil().min(max_x);
    let y0 = (cy - ry).floor().max(0.0);
    let y1 = (cy + ry).ceil().min(max_y);
    if x0 > x1 || y0 > y1 {
        return Vec::new();
    }

    let mut cells = Vec::new();
    for y in y0 as i64..=y1 as i64 {
        for x in x0 as i64..=x1 as i64 {
            let point = DiscPoint {
                u: (x as f64 + 0.5 - cx) / rx,
                v: (y as f64 + 0.5 - cy) / ry,
            };
            if point.radius_sq() <= 1.0 {
                cells.push((x, y, point));
            }
        }
    }
    cells
}

/// Draw every body of `system` and report where each one landed.
pub fn render_bodies(
    buffer: &mut DepthBuffer,
    system_id: SystemId,
    system: &StarSystem,
    camera: &ViewCamera,
    viewport: &Viewport,
    clock: &SimClock,
    config: &FlightConfig,
) -> Vec<BodyScreenInfo> {
    let date = clock.date_days;
    let bucket = flicker_bucket(clock.flight_secs, config.flicker_bucket_secs);
    let star_position = system.primary_star_position(date);
    let mut infos = Vec::with_capacity(system.bodies.len());

    for body in &system.bodies {
        let world = body.position_at(date);
        let Some(projected) = project(world, camera, viewport, config.near_plane) else {
            continue;
        };
        let depth = projected.depth;
        let radius_cells =
            body.radius_au() * pixels_per_unit(camera.fov_deg, viewport, depth) * config.screen_scale;
        let info = BodyScreenInfo {
            body: BodyRef {
                system: system_id,
                body: body.id(),
            },
            center: (projected.x, projected.y),
            radius_cells,
            depth,
        };

        if radius_cells.round() < 1.0 {
            if !viewport.contains(projected.x, projected.y) {
                continue;
            }
            let (x, y) = projected.cell();
            let (kind, color) = match body {
                Body::Star(s) => (PointKind::Star, s.class.palette()[0]),
                Body::Planet(p) => (PointKind::Planet, p.kind.base_color()),
                Body::Station(_) => (PointKind::Station, Srgba::rgb(0.7, 0.72, 0.78)),
            };
            buffer.plot(x, y, depth, point_glyph(kind), color);
            infos.push(info);
            continue;
        }

        let cells = ellipse_cells(info.center, radius_cells, viewport);
        if cells.is_empty() {
            continue;
        }

        match body {
            Body::Star(star) => {
                for (x, y, point) in cells {
                    let (glyph, color) = shade_star(star.class, point, x, y, bucket);
                    buffer.plot(x, y, depth, glyph, color);
                }
            }
            Body::Planet(planet) => {
                let shading = PlanetShading {
                    kind: planet.kind,
                    patches: SurfacePatches::for_body(planet.id),
                    light_dir: normalize(star_position - world),
                    camera_rotation: camera.rotation,
                    date_days: date,
                    ambient: config.ambient_light,
                };
                for (x, y, point) in cells {
                    let (glyph, color) = shading.shade(point);
                    buffer.plot(x, y, depth, glyph, color);
                }
            }
            Body::Station(station) => {
                let port = station.port_axis_at(date);
                for (x, y, point) in cells {
                    let (glyph, color) = shade_station(point, camera.rotation, port);
                    buffer.plot(x, y, depth, glyph, color);
                }
            }
        }
        infos.push(info);
    }

    infos
}
