//! # Merge Engine Properties
//!
//! Randomised checks that merging parallel blocks never changes what happens
//! at a position: at every scale and every timestep, the merged stack holds
//! exactly the layer each input block would have executed alone, whatever
//! the order in which the blocks were collected.

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use proptest::prelude::*;
    use sc_01_plaquettes::{Plaquettes, Template};
    use sc_02_layers::{merge_parallel_block_layers, Block, Layer, LayoutPosition, PlaquetteLayer};
    use shared_types::{LinearFunction, Position2D};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    /// Atomic layer distinguishable by `tag`.
    fn atomic(tag: usize) -> Layer<PlaquetteLayer> {
        let plaquettes = Plaquettes::from_iter([(
            tag,
            "-z1- -z2- -z3- -z4-".parse().unwrap(),
        )]);
        Layer::Atomic(PlaquetteLayer::new(Template::Qubit, plaquettes))
    }

    fn cube(index: usize) -> LayoutPosition {
        LayoutPosition::cube(Position2D::new(index as i64, 0))
    }

    fn lcm(values: &[i64]) -> i64 {
        fn gcd(a: i64, b: i64) -> i64 {
            if b == 0 {
                a
            } else {
                gcd(b, a % b)
            }
        }
        values.iter().fold(1, |acc, v| acc / gcd(acc, *v) * v)
    }

    /// Repeated body of `period` timesteps, repeated so that every position
    /// spans `(slope k + offset) * lcm` timesteps.
    fn repeated_block(
        index: usize,
        period: i64,
        common: i64,
        slope: i64,
        offset: i64,
    ) -> Block<PlaquetteLayer> {
        let body = if period == 1 {
            atomic(100 * index)
        } else {
            Layer::sequenced((0..period as usize).map(|i| atomic(100 * index + i)).collect())
                .unwrap()
        };
        let factor = common / period;
        let repetitions = LinearFunction::new(slope * factor, offset * factor);
        let init = atomic(100 * index + 50);
        Block::new(vec![
            init.clone(),
            Layer::repeat(body, repetitions).unwrap(),
            init,
        ])
        .unwrap()
    }

    // =============================================================================
    // PROPERTY TESTS
    // =============================================================================

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_merge_preserves_each_position(
            periods in prop::collection::vec(1i64..=4, 1..4),
            slope in 0i64..3,
            offset in 1i64..3,
        ) {
            let common = lcm(&periods);
            let blocks: BTreeMap<LayoutPosition, Block<PlaquetteLayer>> = periods
                .iter()
                .enumerate()
                .map(|(i, period)| (cube(i), repeated_block(i, *period, common, slope, offset)))
                .collect();

            let merged = merge_parallel_block_layers(&blocks).unwrap();
            prop_assert_eq!(merged.len(), 3);
            let merged = Layer::sequenced(merged).unwrap();

            for k in 0..3u32 {
                let unrolled = merged.all_layers(k).unwrap();
                for (position, block) in &blocks {
                    let alone = Layer::sequenced(block.layers().to_vec())
                        .unwrap()
                        .all_layers(k)
                        .unwrap();
                    prop_assert_eq!(unrolled.len(), alone.len());
                    for (layer, expected) in unrolled.iter().zip(&alone) {
                        prop_assert_eq!(&layer.layers()[position], expected);
                    }
                }
            }
        }

        #[test]
        fn prop_merge_ignores_insertion_order(
            order in Just((0..4usize).collect::<Vec<_>>()).prop_shuffle(),
            slope in 0i64..3,
            offset in 1i64..3,
        ) {
            let periods = [1i64, 2, 3, 1];
            let common = lcm(&periods);
            let build = |indices: &[usize]| -> BTreeMap<LayoutPosition, Block<PlaquetteLayer>> {
                indices
                    .iter()
                    .map(|&i| (cube(i), repeated_block(i, periods[i], common, slope, offset)))
                    .collect()
            };

            let forward = merge_parallel_block_layers(&build(&[0, 1, 2, 3])).unwrap();
            let shuffled = merge_parallel_block_layers(&build(&order)).unwrap();
            prop_assert_eq!(forward, shuffled);
        }

        #[test]
        fn prop_identical_blocks_keep_their_schedule(
            width in 1usize..5,
            slope in 0i64..4,
            offset in 0i64..4,
        ) {
            let block = Block::new(vec![
                atomic(1),
                Layer::repeat(atomic(2), LinearFunction::new(slope, offset)).unwrap(),
                atomic(3),
            ])
            .unwrap();
            let blocks: BTreeMap<_, _> = (0..width).map(|i| (cube(i), block.clone())).collect();

            let merged = merge_parallel_block_layers(&blocks).unwrap();
            let schedule: Vec<LinearFunction> =
                merged.iter().map(Layer::scalable_timesteps).collect();
            prop_assert_eq!(schedule, block.slot_schedule());
        }

        #[test]
        fn prop_mismatched_totals_are_rejected(
            slope in 0i64..3,
            offset in 1i64..4,
            extra in 1i64..3,
        ) {
            let block = |repetitions: LinearFunction| {
                Block::new(vec![Layer::repeat(atomic(1), repetitions).unwrap()]).unwrap()
            };
            let blocks = BTreeMap::from([
                (cube(0), block(LinearFunction::new(slope, offset))),
                (cube(1), block(LinearFunction::new(slope, offset + extra))),
            ]);
            prop_assert!(merge_parallel_block_layers(&blocks).is_err());
        }
    }
}
