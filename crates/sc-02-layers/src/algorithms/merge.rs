//! Merge engine
//!
//! Fuses the blocks of every layout position into one stack of layers where
//! each timestep is a single [`LayoutLayer`] spanning all positions. The
//! merge stays symbolic in `k`: repetitions are aligned through their
//! periods and are never unrolled for a concrete scale.
//!
//! One slot-merge procedure serves every nesting level:
//!
//! ```text
//! merge_slots ──► merge_slot ──► atomic ──► LayoutLayer
//!      ▲               │
//!      │               └──► composed ──► Sequenced ──┐
//!      │                              └─► Repeated ──┼─► merge_repeated
//!      └─────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;
use std::fmt;

use shared_types::LinearFunction;
use tracing::debug;

use crate::domain::atomic::AtomicLayer;
use crate::domain::block::Block;
use crate::domain::composed::{ComposedLayer, Layer, RepeatedLayer};
use crate::domain::errors::LayerError;
use crate::domain::invariants::{
    invariant_same_slot_schedule, invariant_same_total_timesteps, least_common_multiple,
};
use crate::domain::layout::{LayoutLayer, LayoutPosition};

type Merged<A> = Layer<LayoutLayer<A>>;

/// Merge blocks executed in parallel into a single stack.
///
/// Every block must have the same total timestep count and the same timestep
/// count slot by slot. The output has one layer per slot, and is empty when
/// there are no blocks.
pub fn merge_parallel_block_layers<A: AtomicLayer>(
    blocks: &BTreeMap<LayoutPosition, Block<A>>,
) -> Result<Vec<Merged<A>>, LayerError> {
    if blocks.is_empty() {
        return Ok(Vec::new());
    }
    debug!(positions = blocks.len(), "Merging parallel blocks");
    let stacks: BTreeMap<LayoutPosition, &[Layer<A>]> = blocks
        .iter()
        .map(|(position, block)| (*position, block.layers()))
        .collect();
    merge_slots(&stacks)
}

/// Merge stacks slot by slot after checking their schedules.
fn merge_slots<A: AtomicLayer>(
    stacks: &BTreeMap<LayoutPosition, &[Layer<A>]>,
) -> Result<Vec<Merged<A>>, LayerError> {
    check_schedules(stacks)?;
    let slot_count = stacks.values().next().map_or(0, |layers| layers.len());

    (0..slot_count)
        .map(|i| {
            let slot: BTreeMap<LayoutPosition, &Layer<A>> = stacks
                .iter()
                .map(|(position, layers)| (*position, &layers[i]))
                .collect();
            merge_slot(&slot)
        })
        .collect()
}

fn check_schedules<A: AtomicLayer>(
    stacks: &BTreeMap<LayoutPosition, &[Layer<A>]>,
) -> Result<(), LayerError> {
    let schedules: Vec<Vec<LinearFunction>> = stacks
        .values()
        .map(|layers| layers.iter().map(Layer::scalable_timesteps).collect())
        .collect();
    let totals: Vec<LinearFunction> = schedules
        .iter()
        .map(|schedule| schedule.iter().sum())
        .collect();

    if !invariant_same_total_timesteps(&totals) {
        return Err(LayerError::IncompatibleSchedule(format!(
            "blocks span different numbers of timesteps: {}",
            describe(stacks.keys(), totals.iter())
        )));
    }
    if !invariant_same_slot_schedule(&schedules) {
        let lengths: Vec<String> = schedules
            .iter()
            .map(|schedule| {
                let slots: Vec<String> = schedule.iter().map(ToString::to_string).collect();
                format!("[{}]", slots.join(", "))
            })
            .collect();
        return Err(LayerError::IncompatibleSchedule(format!(
            "blocks have different per-layer schedules: {}",
            describe(stacks.keys(), lengths.iter())
        )));
    }
    Ok(())
}

fn describe<'a, P, V>(positions: P, values: V) -> String
where
    P: Iterator<Item = &'a LayoutPosition>,
    V: Iterator,
    V::Item: fmt::Display,
{
    positions
        .zip(values)
        .map(|(position, value)| format!("{position}: {value}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Merge the layers found at the same slot of every position.
fn merge_slot<A: AtomicLayer>(
    slot: &BTreeMap<LayoutPosition, &Layer<A>>,
) -> Result<Merged<A>, LayerError> {
    let mut atomics = BTreeMap::new();
    let mut composed = BTreeMap::new();
    for (position, layer) in slot {
        match layer {
            Layer::Atomic(atomic) => {
                atomics.insert(*position, atomic.clone());
            }
            Layer::Composed(layer) => {
                composed.insert(*position, layer);
            }
        }
    }

    match (atomics.is_empty(), composed.is_empty()) {
        (false, true) => Ok(Layer::Atomic(LayoutLayer::new(atomics)?)),
        (true, false) => merge_composed(&composed),
        _ => Err(LayerError::Internal(format!(
            "slot mixes {} atomic and {} composed layers after schedule checks",
            atomics.len(),
            composed.len()
        ))),
    }
}

fn merge_composed<A: AtomicLayer>(
    slot: &BTreeMap<LayoutPosition, &ComposedLayer<A>>,
) -> Result<Merged<A>, LayerError> {
    let mut repeated = BTreeMap::new();
    let mut sequenced = BTreeMap::new();
    for (position, layer) in slot {
        match layer {
            ComposedLayer::Repeated(layer) => {
                repeated.insert(*position, layer);
            }
            ComposedLayer::Sequenced(layer) => {
                sequenced.insert(*position, layer.children());
            }
        }
    }

    if sequenced.is_empty() {
        return merge_repeated(&repeated);
    }
    if repeated.is_empty() {
        debug!(positions = sequenced.len(), "Merging sequenced layers");
        return Layer::sequenced(merge_slots(&sequenced)?);
    }
    Err(LayerError::UnsupportedMerge(format!(
        "cannot merge {} repeated layers with {} sequenced layers at the same slot",
        repeated.len(),
        sequenced.len()
    )))
}

fn merge_repeated<A: AtomicLayer>(
    slot: &BTreeMap<LayoutPosition, &RepeatedLayer<A>>,
) -> Result<Merged<A>, LayerError> {
    let mut periods = BTreeMap::new();
    for (position, layer) in slot {
        let period = layer.body().scalable_timesteps();
        if !period.is_constant() {
            return Err(LayerError::UnsupportedMerge(
                "scaling body of a repeated layer to be merged is not supported".to_string(),
            ));
        }
        if period.offset <= 0 {
            return Err(LayerError::Configuration(format!(
                "repeated layer at {position} has a body of {} timesteps",
                period.offset
            )));
        }
        periods.insert(*position, period.offset);
    }
    let Some(first) = slot.values().next() else {
        return Err(LayerError::Internal(
            "no repeated layer to merge".to_string(),
        ));
    };

    if periods.values().all(|period| *period == 1) {
        return merge_unit_period_bodies(slot, first.repetitions());
    }

    let period = least_common_multiple(periods.values().copied());
    debug!(
        positions = slot.len(),
        period, "Aligning repeated bodies with different periods"
    );
    let mut tiles: BTreeMap<LayoutPosition, Vec<A>> = BTreeMap::new();
    for (position, layer) in slot {
        let body = layer.body().all_layers(0)?;
        if body.is_empty() {
            return Err(LayerError::Internal(format!(
                "repeated body at {position} has no layer"
            )));
        }
        let tiled = (0..period as usize)
            .map(|i| body[i % body.len()].clone())
            .collect();
        tiles.insert(*position, tiled);
    }

    let mut merged = Vec::with_capacity(period as usize);
    for i in 0..period as usize {
        let layers = tiles
            .iter()
            .map(|(position, tiled)| (*position, tiled[i].clone()))
            .collect();
        merged.push(Layer::Atomic(LayoutLayer::new(layers)?));
    }

    let total = first.scalable_timesteps();
    let repetitions = total.divide_by(period).map_err(|err| {
        LayerError::Internal(format!(
            "repetition count of the merged layer cannot be computed: {err}"
        ))
    })?;
    Layer::repeat(Layer::sequenced(merged)?, repetitions)
}

/// All bodies span a single timestep and share the repetition count.
fn merge_unit_period_bodies<A: AtomicLayer>(
    slot: &BTreeMap<LayoutPosition, &RepeatedLayer<A>>,
    repetitions: LinearFunction,
) -> Result<Merged<A>, LayerError> {
    let kind = |layer: &Layer<A>| match layer {
        Layer::Atomic(_) => 0,
        Layer::Composed(ComposedLayer::Sequenced(_)) => 1,
        Layer::Composed(ComposedLayer::Repeated(_)) => 2,
    };
    let same_kind = {
        let mut kinds = slot.values().map(|layer| kind(layer.body()));
        let first = kinds.next();
        kinds.all(|other| Some(other) == first)
    };

    let body = if same_kind {
        let bodies = slot
            .iter()
            .map(|(position, layer)| (*position, layer.body()))
            .collect();
        merge_slot(&bodies)?
    } else {
        let mut bodies = BTreeMap::new();
        for (position, layer) in slot {
            let flattened = layer.body().all_layers(0)?;
            let [single] = <[A; 1]>::try_from(flattened).map_err(|layers| {
                LayerError::Internal(format!(
                    "unit-period body at {position} unrolls to {} layers",
                    layers.len()
                ))
            })?;
            bodies.insert(*position, single);
        }
        Layer::Atomic(LayoutLayer::new(bodies)?)
    };
    Layer::repeat(body, repetitions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::atomic::PlaquetteLayer;
    use sc_01_plaquettes::{Plaquettes, Template};
    use shared_types::Position2D;

    // =========================================================================
    // Helpers
    // =========================================================================

    fn atomic(tag: usize) -> Layer<PlaquetteLayer> {
        let plaquettes = Plaquettes::from_iter([(
            tag,
            "-z1- -z2- -z3- -z4-".parse().unwrap(),
        )]);
        Layer::Atomic(PlaquetteLayer::new(Template::Qubit, plaquettes))
    }

    fn lf(slope: i64, offset: i64) -> LinearFunction {
        LinearFunction::new(slope, offset)
    }

    fn cube(x: i64, y: i64) -> LayoutPosition {
        LayoutPosition::cube(Position2D::new(x, y))
    }

    fn block(layers: Vec<Layer<PlaquetteLayer>>) -> Block<PlaquetteLayer> {
        Block::new(layers).unwrap()
    }

    fn standard_block(tag: usize) -> Block<PlaquetteLayer> {
        block(vec![
            atomic(tag),
            Layer::repeat(atomic(tag), lf(2, -1)).unwrap(),
            atomic(tag),
        ])
    }

    // =========================================================================
    // Simple merges
    // =========================================================================

    #[test]
    fn test_single_position_is_unchanged() {
        let blocks = BTreeMap::from([(cube(0, 0), standard_block(1))]);
        let merged = merge_parallel_block_layers(&blocks).unwrap();
        assert_eq!(merged.len(), 3);

        let Layer::Atomic(first) = &merged[0] else {
            panic!("expected an atomic layer");
        };
        assert_eq!(first.len(), 1);
        assert_eq!(Layer::Atomic(first.layers()[&cube(0, 0)].clone()), atomic(1));

        let Layer::Composed(ComposedLayer::Repeated(repeated)) = &merged[1] else {
            panic!("expected a repeated layer");
        };
        assert_eq!(repeated.repetitions(), lf(2, -1));
    }

    #[test]
    fn test_grid_of_single_layer_cubes() {
        let grid = [cube(0, 0), cube(1, 0), cube(0, 1), cube(1, 1)];
        for length in 1..=5usize {
            let blocks: BTreeMap<_, _> = grid
                .into_iter()
                .map(|position| (position, block((0..length).map(atomic).collect())))
                .collect();
            let merged = merge_parallel_block_layers(&blocks).unwrap();
            assert_eq!(merged.len(), length, "length {length}");
            for (i, slot) in merged.iter().enumerate() {
                let Layer::Atomic(layer) = slot else {
                    panic!("expected an atomic layer");
                };
                assert_eq!(layer.len(), 4);
                for position in &grid {
                    assert_eq!(Layer::Atomic(layer.layers()[position].clone()), atomic(i));
                }
            }
        }
    }

    #[test]
    fn test_grid_of_repeated_cubes() {
        let grid = [cube(0, 0), cube(1, 0), cube(0, 1), cube(1, 1)];
        for length in 1..=5i64 {
            let repeated = Layer::repeat(atomic(1), lf(0, length)).unwrap();
            let blocks: BTreeMap<_, _> = grid
                .into_iter()
                .map(|position| (position, block(vec![repeated.clone()])))
                .collect();
            let merged = merge_parallel_block_layers(&blocks).unwrap();
            assert_eq!(merged.len(), 1);
            let Layer::Composed(ComposedLayer::Repeated(merged)) = &merged[0] else {
                panic!("expected a repeated layer");
            };
            assert_eq!(merged.repetitions(), lf(0, length));
            let Layer::Atomic(body) = merged.body() else {
                panic!("expected an atomic body");
            };
            assert_eq!(body.len(), 4);
        }
    }

    #[test]
    fn test_empty_input_merges_to_nothing() {
        let blocks: BTreeMap<LayoutPosition, Block<PlaquetteLayer>> = BTreeMap::new();
        assert!(merge_parallel_block_layers(&blocks).unwrap().is_empty());
    }

    // =========================================================================
    // Schedule checks
    // =========================================================================

    #[test]
    fn test_different_totals_rejected() {
        let blocks = BTreeMap::from([
            (cube(0, 0), block(vec![atomic(1), atomic(1), atomic(1)])),
            (
                cube(1, 0),
                block(vec![atomic(1), atomic(1), atomic(1), atomic(1)]),
            ),
        ]);
        assert!(matches!(
            merge_parallel_block_layers(&blocks),
            Err(LayerError::IncompatibleSchedule(_))
        ));
    }

    #[test]
    fn test_different_slot_schedules_rejected() {
        let blocks = BTreeMap::from([
            (
                cube(0, 0),
                block(vec![Layer::repeat(atomic(1), lf(0, 2)).unwrap(), atomic(1)]),
            ),
            (
                cube(1, 0),
                block(vec![atomic(1), Layer::repeat(atomic(1), lf(0, 2)).unwrap()]),
            ),
        ]);
        assert!(matches!(
            merge_parallel_block_layers(&blocks),
            Err(LayerError::IncompatibleSchedule(_))
        ));
    }

    #[test]
    fn test_mixed_repeated_and_sequenced_unsupported() {
        let blocks = BTreeMap::from([
            (
                cube(0, 0),
                block(vec![Layer::repeat(atomic(1), lf(0, 2)).unwrap()]),
            ),
            (
                cube(1, 0),
                block(vec![Layer::sequenced(vec![atomic(1), atomic(1)]).unwrap()]),
            ),
        ]);
        assert!(matches!(
            merge_parallel_block_layers(&blocks),
            Err(LayerError::UnsupportedMerge(_))
        ));
    }

    #[test]
    fn test_mixed_atomic_and_composed_is_internal() {
        let slot_a = atomic(1);
        let slot_b = Layer::sequenced(vec![atomic(2)]).unwrap();
        let slot = BTreeMap::from([(cube(0, 0), &slot_a), (cube(1, 0), &slot_b)]);
        assert!(matches!(merge_slot(&slot), Err(LayerError::Internal(_))));
    }

    // =========================================================================
    // Repeated merges
    // =========================================================================

    #[test]
    fn test_scaling_repeated_body_unsupported() {
        let scaling = Layer::repeat(atomic(1), lf(2, 1)).unwrap();
        let blocks = BTreeMap::from([
            (
                cube(0, 0),
                block(vec![Layer::repeat(scaling.clone(), lf(0, 2)).unwrap()]),
            ),
            (
                cube(1, 0),
                block(vec![Layer::repeat(scaling, lf(0, 2)).unwrap()]),
            ),
        ]);
        match merge_parallel_block_layers(&blocks) {
            Err(LayerError::UnsupportedMerge(msg)) => {
                assert!(msg.contains("scaling body of a repeated layer"))
            }
            other => panic!("expected an unsupported merge, got {other:?}"),
        }
    }

    #[test]
    fn test_unit_period_bodies_of_different_kinds() {
        let blocks = BTreeMap::from([
            (
                cube(0, 0),
                block(vec![Layer::repeat(atomic(1), lf(2, 1)).unwrap()]),
            ),
            (
                cube(1, 0),
                block(vec![Layer::repeat(
                    Layer::sequenced(vec![atomic(2)]).unwrap(),
                    lf(2, 1),
                )
                .unwrap()]),
            ),
        ]);
        let merged = merge_parallel_block_layers(&blocks).unwrap();
        let Layer::Composed(ComposedLayer::Repeated(repeated)) = &merged[0] else {
            panic!("expected a repeated layer");
        };
        assert_eq!(repeated.repetitions(), lf(2, 1));
        assert!(repeated.body().is_atomic());
    }

    #[test]
    fn test_repeated_merge_aligns_periods() {
        let period_one = Layer::repeat(atomic(1), lf(6, 3)).unwrap();
        let period_three = Layer::repeat(
            Layer::sequenced(vec![atomic(2), atomic(3), atomic(4)]).unwrap(),
            lf(2, 1),
        )
        .unwrap();
        let blocks = BTreeMap::from([
            (cube(0, 0), block(vec![period_one.clone()])),
            (cube(1, 0), block(vec![period_three.clone()])),
        ]);

        let merged = merge_parallel_block_layers(&blocks).unwrap();
        assert_eq!(merged.len(), 1);
        let Layer::Composed(ComposedLayer::Repeated(repeated)) = &merged[0] else {
            panic!("expected a repeated layer");
        };
        assert_eq!(repeated.repetitions(), lf(2, 1));
        let Layer::Composed(ComposedLayer::Sequenced(body)) = repeated.body() else {
            panic!("expected a sequenced body");
        };
        assert_eq!(body.children().len(), 3);

        for k in [0, 1, 2, 5] {
            assert_eq!(merged[0].timesteps(k), period_one.timesteps(k));
            assert_eq!(merged[0].timesteps(k), period_three.timesteps(k));
        }

        // Timestep i of the merge holds timestep i of every input.
        let unrolled = merged[0].all_layers(1).unwrap();
        let a = period_one.all_layers(1).unwrap();
        let b = period_three.all_layers(1).unwrap();
        for (i, layer) in unrolled.iter().enumerate() {
            assert_eq!(layer.layers()[&cube(0, 0)], a[i]);
            assert_eq!(layer.layers()[&cube(1, 0)], b[i]);
        }
    }

    #[test]
    fn test_repeated_merge_with_coprime_periods() {
        let two = Layer::repeat(
            Layer::sequenced(vec![atomic(1), atomic(2)]).unwrap(),
            lf(3, 3),
        )
        .unwrap();
        let three = Layer::repeat(
            Layer::sequenced(vec![atomic(3), atomic(4), atomic(5)]).unwrap(),
            lf(2, 2),
        )
        .unwrap();
        let blocks = BTreeMap::from([
            (cube(0, 0), block(vec![two])),
            (cube(0, 1), block(vec![three])),
        ]);
        let merged = merge_parallel_block_layers(&blocks).unwrap();
        let Layer::Composed(ComposedLayer::Repeated(repeated)) = &merged[0] else {
            panic!("expected a repeated layer");
        };
        assert_eq!(repeated.body().scalable_timesteps(), lf(0, 6));
        assert_eq!(repeated.repetitions(), lf(1, 1));
    }

    #[test]
    fn test_nested_sequences_merge_recursively() {
        let inner = |tag| Layer::sequenced(vec![atomic(tag), atomic(tag)]).unwrap();
        let blocks = BTreeMap::from([
            (cube(0, 0), block(vec![Layer::sequenced(vec![inner(1), atomic(1)]).unwrap()])),
            (cube(1, 0), block(vec![Layer::sequenced(vec![inner(2), atomic(2)]).unwrap()])),
        ]);
        let merged = merge_parallel_block_layers(&blocks).unwrap();
        assert_eq!(merged[0].scalable_timesteps(), lf(0, 3));
        assert_eq!(merged[0].all_layers(0).unwrap().len(), 3);
    }

    #[test]
    fn test_inner_sequenced_schedule_mismatch_rejected() {
        let twice = || Layer::repeat(atomic(2), lf(0, 2)).unwrap();
        let blocks = BTreeMap::from([
            (cube(0, 0), block(vec![Layer::sequenced(vec![atomic(1), twice()]).unwrap()])),
            (cube(1, 0), block(vec![Layer::sequenced(vec![twice(), atomic(1)]).unwrap()])),
        ]);
        match merge_parallel_block_layers(&blocks) {
            Err(LayerError::IncompatibleSchedule(msg)) => {
                assert!(msg.contains("per-layer schedules"));
            }
            other => panic!("expected an incompatible schedule, got {other:?}"),
        }
    }
}
