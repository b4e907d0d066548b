//! Structural invariants of layers and merge inputs

use shared_types::LinearFunction;

/// INVARIANT-1: Linear Repetitions
/// A repeated body and its repetition count may not both scale with `k`,
/// otherwise the total timestep count would be quadratic in `k`.
pub fn invariant_linear_repetitions(
    body_timesteps: &LinearFunction,
    repetitions: &LinearFunction,
) -> bool {
    body_timesteps.is_constant() || repetitions.is_constant()
}

/// INVARIANT-2: Common Temporal Footprint
/// Stacks merged in parallel all span the same number of timesteps.
pub fn invariant_same_total_timesteps<'a, I>(totals: I) -> bool
where
    I: IntoIterator<Item = &'a LinearFunction>,
{
    let mut totals = totals.into_iter();
    let Some(first) = totals.next() else {
        return true;
    };
    totals.all(|total| total == first)
}

/// INVARIANT-3: Common Slot Schedule
/// Stacks merged in parallel have the same number of top-level layers and the
/// same timestep count slot by slot.
pub fn invariant_same_slot_schedule(schedules: &[Vec<LinearFunction>]) -> bool {
    let Some((first, rest)) = schedules.split_first() else {
        return true;
    };
    rest.iter().all(|schedule| schedule == first)
}

/// Least common multiple of strictly positive integers, `1` for an empty input.
pub fn least_common_multiple<I: IntoIterator<Item = i64>>(values: I) -> i64 {
    fn gcd(a: i64, b: i64) -> i64 {
        if b == 0 {
            a
        } else {
            gcd(b, a % b)
        }
    }
    values
        .into_iter()
        .fold(1, |lcm, value| lcm / gcd(lcm, value) * value)
}
