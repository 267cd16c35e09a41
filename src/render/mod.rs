//! Character-grid renderer for in-system flight.
//!
//! A frame is built in two passes:
//! 1. [`rasterize_scene`] clears the depth buffer and writes bodies, the
//!    starfield, dust, contacts, laser bolts and the portal into it. Draw
//!    order is irrelevant because every write goes through the depth test.
//! 2. [`compose_frame`] flushes the buffer into a [`GlyphGrid`] and overlays
//!    labels and HUD text on top.
//!
//! Picking runs between the two, against the composited depths.

pub mod background;
pub mod bodies;
pub mod effects;
pub mod highlight;
pub mod labels;
pub mod raster;
pub mod shading;

#[cfg(test)]
mod proptest_raster;

use crate::camera::{ViewCamera, Viewport};
use crate::config::FlightConfig;
use crate::flight::LaserBolt;
use crate::hud::{draw_hud, Hud};
use crate::particles::{DustField, Starfield};
use crate::portal::Portal;
use crate::ship::Ship;
use crate::system::{BodyRef, StarSystem, SystemId};
use crate::time::SimClock;

pub use self::bodies::BodyScreenInfo;
pub use self::highlight::{resolve_hover, HoveredBody};
pub use self::labels::LabelDescriptor;
pub use self::raster::{Cell, DepthBuffer, GlyphGrid, TextLayer};

/// How much paused frames are darkened.
const PAUSE_DIM: f32 = 0.55;

/// One finished frame, handed to the UI layer.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedFrame {
    /// Composited glyphs with labels and HUD already overlaid.
    pub grid: GlyphGrid,
    pub labels: Vec<LabelDescriptor>,
    pub hud: Vec<String>,
    pub hovered: Option<BodyRef>,
    pub bodies: Vec<BodyScreenInfo>,
}

/// Everything the rasteriser reads for one frame.
pub struct Scene<'a> {
    pub ship: &'a Ship,
    pub system_id: SystemId,
    pub system: &'a StarSystem,
    pub clock: &'a SimClock,
    pub starfield: &'a Starfield,
    pub dust: &'a DustField,
    pub lasers: &'a [LaserBolt],
    pub portal: Option<&'a Portal>,
}

impl Scene<'_> {
    /// The camera rides on the ship.
    pub fn camera(&self, config: &FlightConfig) -> ViewCamera {
        ViewCamera::new(self.ship.position, self.ship.rotation, config.fov_deg)
    }
}

/// Clear the buffer and draw the world into it.
pub fn rasterize_scene(
    buffer: &mut DepthBuffer,
    scene: &Scene<'_>,
    viewport: &Viewport,
    config: &FlightConfig,
) -> Vec<BodyScreenInfo> {
    buffer.clear();
    let camera = scene.camera(config);

    let infos = bodies::render_bodies(
        buffer,
        scene.system_id,
        scene.system,
        &camera,
        viewport,
        scene.clock,
        config,
    );
    background::render_starfield(buffer, scene.starfield, scene.ship, &camera, viewport, config);
    background::render_dust(buffer, scene.dust, scene.ship, &camera, viewport, config);
    effects::render_contacts(buffer, &scene.system.contacts, &camera, viewport, config);
    effects::render_lasers(buffer, scene.lasers, &camera, viewport, config);
    if let Some(portal) = scene.portal {
        effects::render_portal(buffer, portal, scene.clock.flight_secs, &camera, viewport, config);
    }
    infos
}

/// Inputs to the compositing pass.
pub struct Overlay<'a> {
    pub system: &'a StarSystem,
    pub infos: Vec<BodyScreenInfo>,
    pub hovered: Option<BodyRef>,
    pub paused: bool,
    pub hud_lines: Vec<String>,
    pub hud: &'a Hud,
    pub ship: &'a Ship,
}

/// Flush the buffer to a grid and draw labels and the HUD on top.
pub fn compose_frame(buffer: &mut DepthBuffer, overlay: Overlay<'_>, viewport: &Viewport) -> RenderedFrame {
    if overlay.paused {
        buffer.dim(PAUSE_DIM);
    }
    let mut grid = GlyphGrid::new(buffer.width(), buffer.height());
    buffer.flush(&mut grid);

    let labels = labels::build_labels(&overlay.infos, overlay.system, buffer, viewport, overlay.hovered);
    labels::draw_labels(&mut grid, &labels);
    draw_hud(&mut grid, &overlay.hud_lines, overlay.hud, overlay.ship);

    RenderedFrame {
        grid,
        labels,
        hud: overlay.hud_lines,
        hovered: overlay.hovered,
        bodies: overlay.infos,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::{Body, BodyId, Placement, Planet, PlanetKind};
    use bevy::color::Srgba;
    use bevy::math::DVec3;

    #[test]
    fn test_paused_frame_is_dimmed() {
        let viewport = Viewport::new(10, 4, 2.0);
        let system = StarSystem::new("T", DVec3::ZERO);
        let ship = Ship::new("S", SystemId(0), DVec3::ZERO);
        let hud = Hud::default();

        let frame = |paused: bool| {
            let mut buffer = DepthBuffer::new(10, 4);
            buffer.plot(5, 2, 1.0, '@', Srgba::WHITE);
            compose_frame(
                &mut buffer,
                Overlay {
                    system: &system,
                    infos: Vec::new(),
                    hovered: None,
                    paused,
                    hud_lines: Vec::new(),
                    hud: &hud,
                    ship: &ship,
                },
                &viewport,
            )
        };
        let live = frame(false).grid.get(5, 2).unwrap();
        let dimmed = frame(true).grid.get(5, 2).unwrap();
        assert_eq!(live.glyph, dimmed.glyph);
        assert!(dimmed.color.red < live.color.red);
    }

    #[test]
    fn test_scene_draws_planet_ahead() {
        let config = FlightConfig::default();
        let viewport = Viewport::new(60, 20, 2.0);
        let system = StarSystem::new("T", DVec3::ZERO).with_body(Body::Planet(Planet {
            id: BodyId(4),
            name: "Ahead".into(),
            kind: PlanetKind::Lava,
            radius_au: 0.05,
            placement: Placement::Static(DVec3::new(0.0, 0.0, 1.0)),
        }));
        let ship = Ship::new("S", SystemId(0), DVec3::ZERO);
        let clock = SimClock::default();
        let starfield = Starfield::default();
        let dust = DustField::new(0);
        let scene = Scene {
            ship: &ship,
            system_id: SystemId(0),
            system: &system,
            clock: &clock,
            starfield: &starfield,
            dust: &dust,
            lasers: &[],
            portal: None,
        };
        let mut buffer = DepthBuffer::new(60, 20);
        let infos = rasterize_scene(&mut buffer, &scene, &viewport, &config);
        assert_eq!(infos.len(), 1);
        assert_eq!(buffer.depth_at(30, 10), 1.0);
    }
}
