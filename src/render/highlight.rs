//! Mouse-over picking for celestial bodies.
//!
//! The cursor cell's composited depth says which surface is actually
//! visible there. A body is a candidate only if the cursor lies within its
//! screen radius *and* its depth matches that sample, so a planet hidden
//! behind another is never picked even when their discs overlap.

use crate::render::bodies::BodyScreenInfo;
use crate::render::raster::DepthBuffer;
use crate::system::BodyRef;

/// Minimum pick radius in cells, so point-glyph bodies can be hovered.
const MIN_PICK_RADIUS: f64 = 0.5;

/// Currently hovered body, if any.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HoveredBody {
    pub body: Option<BodyRef>,
}

/// Resolve which body is under the cursor.
pub fn resolve_hover(
    cursor: Option<(i64, i64)>,
    buffer: &DepthBuffer,
    infos: &[BodyScreenInfo],
    epsilon: f64,
) -> Option<BodyRef> {
    let (cx, cy) = cursor?;
    let sampled = buffer.depth_at(cx, cy);
    if !sampled.is_finite() {
        return None;
    }
    let (px, py) = (cx as f64 + 0.5, cy as f64 + 0.5);

    infos
        .iter()
        .filter(|info| {
            let dx = px - info.center.0;
            let dy = py - info.center.1;
            let reach = info.radius_cells.max(MIN_PICK_RADIUS);
            // Centres are fractional; allow the cursor cell to contain the centre.
            let on_disc = (dx * dx + dy * dy).sqrt() <= reach
                || (cx == info.center.0.floor() as i64 && cy == info.center.1.floor() as i64);
            on_disc && (info.depth - sampled).abs() <= epsilon
        })
        .min_by(|a, b| a.depth.total_cmp(&b.depth))
        .map(|info| info.body)
}

impl HoveredBody {
    /// Re-resolve against this frame; clears when nothing matches.
    pub fn update(
        &mut self,
        cursor: Option<(i64, i64)>,
        buffer: &DepthBuffer,
        infos: &[BodyScreenInfo],
        epsilon: f64,
    ) -> Option<BodyRef> {
        self.body = resolve_hover(cursor, buffer, infos, epsilon);
        self.body
    }
}
