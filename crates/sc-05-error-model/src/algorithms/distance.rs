//! Shortest undetectable logical error
//!
//! Graphlike mechanisms are edges between their detectors, or between their
//! detector and a shared boundary node. An undetectable logical error is a
//! cycle of this graph whose observable masks do not cancel, found by a
//! breadth-first search over `(node, accumulated mask)` states.

use std::collections::{HashMap, VecDeque};

use tracing::debug;

use crate::domain::error_model::{DetectorErrorModel, ErrorMechanism};

struct Edge {
    to: usize,
    observables: u64,
    error: usize,
}

type State = (usize, u64);

pub fn shortest_graphlike_error(model: &DetectorErrorModel) -> Option<Vec<ErrorMechanism>> {
    let errors = model.errors();
    if let Some(silent) = errors
        .iter()
        .find(|error| error.detectors.is_empty() && error.observables != 0)
    {
        return Some(vec![silent.clone()]);
    }

    let boundary = model.num_detectors();
    let mut adjacency: Vec<Vec<Edge>> = (0..=boundary).map(|_| Vec::new()).collect();
    for (index, error) in errors.iter().enumerate() {
        if error.detectors.iter().any(|detector| *detector >= boundary) {
            continue;
        }
        let (a, b) = match error.detectors.as_slice() {
            [a] => (*a, boundary),
            [a, b] => (*a, *b),
            _ => continue,
        };
        for (from, to) in [(a, b), (b, a)] {
            adjacency[from].push(Edge {
                to,
                observables: error.observables,
                error: index,
            });
        }
    }

    let mut best: Option<Vec<usize>> = None;
    for (start, edges) in adjacency.iter().enumerate() {
        if edges.is_empty() {
            continue;
        }
        let limit = best.as_ref().map_or(usize::MAX, Vec::len);
        if let Some(cycle) = shortest_cycle_from(&adjacency, start, limit) {
            best = Some(cycle);
        }
    }

    let cycle = best?;
    debug!(weight = cycle.len(), "Found shortest graphlike logical error");
    Some(cycle.into_iter().map(|index| errors[index].clone()).collect())
}

/// Error indices along the shortest closed walk from `start` that flips an
/// observable, if shorter than `limit`.
fn shortest_cycle_from(adjacency: &[Vec<Edge>], start: usize, limit: usize) -> Option<Vec<usize>> {
    let mut parents: HashMap<State, (State, usize)> = HashMap::new();
    let mut depth: HashMap<State, usize> = HashMap::from([((start, 0), 0)]);
    let mut queue = VecDeque::from([(start, 0u64)]);

    while let Some(state) = queue.pop_front() {
        let steps = depth.get(&state).copied().unwrap_or(0);
        if steps + 1 >= limit {
            return None;
        }
        let (node, mask) = state;
        for edge in &adjacency[node] {
            let next = (edge.to, mask ^ edge.observables);
            if depth.contains_key(&next) {
                continue;
            }
            depth.insert(next, steps + 1);
            parents.insert(next, (state, edge.error));
            if next.0 == start && next.1 != 0 {
                return Some(walk_back(&parents, next, (start, 0)));
            }
            queue.push_back(next);
        }
    }
    None
}

fn walk_back(parents: &HashMap<State, (State, usize)>, end: State, origin: State) -> Vec<usize> {
    let mut errors = Vec::new();
    let mut state = end;
    while state != origin {
        let Some(&(previous, error)) = parents.get(&state) else {
            break;
        };
        errors.push(error);
        state = previous;
    }
    errors.reverse();
    errors
}
