//! Property-based tests for depth-buffered compositing.

use bevy::color::Srgba;
use proptest::prelude::*;

use super::raster::DepthBuffer;

const W: i64 = 12;
const H: i64 = 6;

fn write_strategy() -> impl Strategy<Value = Vec<(i64, i64, f64, char)>> {
    // Depths are drawn from a distinct set so ties can't make the result
    // depend on order.
    prop::collection::hash_set(1u32..10_000, 1..60).prop_flat_map(|depths| {
        let depths: Vec<u32> = depths.into_iter().collect();
        let n = depths.len();
        (
            prop::collection::vec((-2i64..W + 2, -2i64..H + 2, prop::char::range('a', 'z')), n),
            Just(depths),
        )
            .prop_map(|(cells, depths)| {
                cells
                    .into_iter()
                    .zip(depths)
                    .map(|((x, y, g), d)| (x, y, f64::from(d) * 0.001, g))
                    .collect()
            })
    })
}

fn render(writes: &[(i64, i64, f64, char)]) -> DepthBuffer {
    let mut buffer = DepthBuffer::new(W as usize, H as usize);
    for &(x, y, depth, glyph) in writes {
        buffer.plot(x, y, depth, glyph, Srgba::WHITE);
    }
    buffer
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// The composited result is the same whatever order cells are written in.
    #[test]
    fn prop_occlusion_is_order_independent(
        (writes, shuffled) in write_strategy()
            .prop_flat_map(|writes| (Just(writes.clone()), Just(writes).prop_shuffle())),
    ) {
        let forward = render(&writes);
        let reordered = render(&shuffled);

        for y in 0..H {
            for x in 0..W {
                prop_assert_eq!(forward.cell(x, y), reordered.cell(x, y));
                prop_assert_eq!(forward.depth_at(x, y), reordered.depth_at(x, y));
            }
        }
    }

    /// Every visible cell holds the nearest write to it.
    #[test]
    fn prop_nearest_write_wins(writes in write_strategy()) {
        let buffer = render(&writes);
        for y in 0..H {
            for x in 0..W {
                let nearest = writes
                    .iter()
                    .filter(|w| w.0 == x && w.1 == y)
                    .min_by(|a, b| a.2.total_cmp(&b.2));
                match nearest {
                    Some(w) => {
                        prop_assert_eq!(buffer.depth_at(x, y), w.2);
                        prop_assert_eq!(buffer.cell(x, y).map(|c| c.glyph), Some(w.3));
                    }
                    None => prop_assert!(buffer.cell(x, y).is_none()),
                }
            }
        }
    }
}
