//! Body name labels placed next to their discs.
//!
//! Labels are only produced for bodies with at least one cell still showing
//! after compositing, so a moon fully behind its planet stays unlabelled.
//! Nearer bodies claim space first; a label that can't find a free slot is
//! dropped rather than drawn over another.

use bevy::color::Srgba;

use crate::camera::Viewport;
use crate::render::bodies::BodyScreenInfo;
use crate::render::raster::{DepthBuffer, GlyphGrid};
use crate::system::{BodyRef, StarSystem};

const LABEL_COLOR: Srgba = Srgba::rgb(0.85, 0.85, 0.85);
const HOVER_COLOR: Srgba = Srgba::rgb(0.3, 1.0, 1.0);

/// Gap in cells between a disc edge and its label.
const LABEL_GAP: f64 = 1.0;

/// A label ready to overlay on the grid.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelDescriptor {
    pub body: BodyRef,
    pub text: String,
    /// Leftmost cell of the label.
    pub x: i64,
    pub y: i64,
    pub hovered: bool,
}

impl LabelDescriptor {
    pub fn color(&self) -> Srgba {
        if self.hovered { HOVER_COLOR } else { LABEL_COLOR }
    }

    fn span(&self) -> (i64, i64) {
        (self.x, self.x + self.text.chars().count() as i64)
    }
}

/// Whether any cell of the body survived the depth test.
pub fn is_visible(info: &BodyScreenInfo, buffer: &DepthBuffer, viewport: &Viewport) -> bool {
    info.footprint(viewport)
        .into_iter()
        .any(|(x, y)| buffer.depth_at(x, y) == info.depth)
}

/// Lay out labels for every visible body.
pub fn build_labels(
    infos: &[BodyScreenInfo],
    system: &StarSystem,
    buffer: &DepthBuffer,
    viewport: &Viewport,
    hovered: Option<BodyRef>,
) -> Vec<LabelDescriptor> {
    let mut ordered: Vec<&BodyScreenInfo> = infos.iter().collect();
    ordered.sort_by(|a, b| a.depth.total_cmp(&b.depth));

    let mut placed: Vec<LabelDescriptor> = Vec::new();
    for info in ordered {
        if !is_visible(info, buffer, viewport) {
            continue;
        }
        let Some(body) = system.body(info.body.body) else {
            continue;
        };
        let text = body.name().to_string();
        let len = text.chars().count() as i64;
        let right = (info.center.0 + info.radius_cells + LABEL_GAP).ceil() as i64;
        let left = (info.center.0 - info.radius_cells - LABEL_GAP).floor() as i64 - len;
        let row = info.center.1.floor() as i64;

        let candidates = [(right, row), (left, row), (right, row - 1), (right, row + 1)];
        let slot = candidates.into_iter().find(|&(x, y)| {
            x >= 0
                && x + len <= viewport.width as i64
                && y >= 0
                && y < viewport.height as i64
                && !overlaps(&placed, x, x + len, y)
        });
        if let Some((x, y)) = slot {
            placed.push(LabelDescriptor {
                body: info.body,
                text,
                x,
                y,
                hovered: hovered == Some(info.body),
            });
        }
    }
    placed
}

fn overlaps(placed: &[LabelDescriptor], start: i64, end: i64, y: i64) -> bool {
    placed.iter().any(|l| {
        let (s, e) = l.span();
        l.y == y && start < e + 1 && s < end + 1
    })
}

/// Overlay labels onto the grid.
pub fn draw_labels(grid: &mut GlyphGrid, labels: &[LabelDescriptor]) {
    for label in labels {
        grid.put_str(label.x, label.y, &label.text, label.color());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::{Body, BodyId, Placement, Planet, PlanetKind, SystemId};
    use bevy::math::DVec3;

    fn system() -> StarSystem {
        let planet = |id: u32, name: &str| {
            Body::Planet(Planet {
                id: BodyId(id),
                name: name.into(),
                kind: PlanetKind::Ice,
                radius_au: 0.01,
                placement: Placement::Static(DVec3::ZERO),
            })
        };
        StarSystem::new("T", DVec3::ZERO)
            .with_body(planet(1, "Near"))
            .with_body(planet(2, "Far"))
    }

    fn info(id: u32, center: (f64, f64), radius: f64, depth: f64) -> BodyScreenInfo {
        BodyScreenInfo {
            body: BodyRef {
                system: SystemId(0),
                body: BodyId(id),
            },
            center,
            radius_cells: radius,
            depth,
        }
    }

    fn fill(buffer: &mut DepthBuffer, info: &BodyScreenInfo, viewport: &Viewport) {
        for (x, y) in info.footprint(viewport) {
            buffer.plot(x, y, info.depth, '#', Srgba::WHITE);
        }
    }

    #[test]
    fn test_fully_hidden_body_gets_no_label() {
        let viewport = Viewport::new(60, 20, 2.0);
        let mut buffer = DepthBuffer::new(60, 20);
        let near = info(1, (30.0, 10.0), 8.0, 0.5);
        let far = info(2, (30.0, 10.0), 3.0, 0.7);
        fill(&mut buffer, &far, &viewport);
        fill(&mut buffer, &near, &viewport);

        let labels = build_labels(&[near, far], &system(), &buffer, &viewport, None);
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].text, "Near");
    }

    #[test]
    fn test_partially_visible_body_is_labelled() {
        let viewport = Viewport::new(60, 20, 2.0);
        let mut buffer = DepthBuffer::new(60, 20);
        let near = info(1, (20.0, 10.0), 4.0, 0.5);
        let far = info(2, (25.0, 10.0), 4.0, 0.7);
        fill(&mut buffer, &far, &viewport);
        fill(&mut buffer, &near, &viewport);

        let labels = build_labels(&[near, far], &system(), &buffer, &viewport, Some(far.body));
        assert_eq!(labels.len(), 2);
        let far_label = labels.iter().find(|l| l.text == "Far").unwrap();
        assert!(far_label.hovered);
    }

    #[test]
    fn test_labels_do_not_overlap() {
        let viewport = Viewport::new(60, 20, 2.0);
        let mut buffer = DepthBuffer::new(60, 20);
        let a = info(1, (20.0, 10.0), 0.2, 0.5);
        let b = info(2, (21.0, 10.0), 0.2, 0.7);
        fill(&mut buffer, &a, &viewport);
        fill(&mut buffer, &b, &viewport);

        let labels = build_labels(&[a, b], &system(), &buffer, &viewport, None);
        for (i, l) in labels.iter().enumerate() {
            for m in &labels[i + 1..] {
                let (s1, e1) = l.span();
                let (s2, e2) = m.span();
                assert!(l.y != m.y || e1 <= s2 || e2 <= s1, "{l:?} overlaps {m:?}");
            }
        }
    }

    #[test]
    fn test_draw_labels_writes_text() {
        let mut grid = GlyphGrid::new(20, 3);
        let label = LabelDescriptor {
            body: BodyRef {
                system: SystemId(0),
                body: BodyId(1),
            },
            text: "Rhea".into(),
            x: 2,
            y: 1,
            hovered: false,
        };
        draw_labels(&mut grid, &[label]);
        assert_eq!(grid.row_string(1).trim(), "Rhea");
    }
}
