//! Layers and their temporal compositions
//!
//! A [`Layer`] is either atomic (exactly one timestep) or composed. Composed
//! layers form a closed set: [`SequencedLayers`] runs its children one after
//! the other, [`RepeatedLayer`] runs its body a scalable number of times.
//! Every timestep count is a [`LinearFunction`] of `k`.

use std::fmt;

use sc_01_plaquettes::TemplateBorder;
use serde::{Deserialize, Serialize};
use shared_types::LinearFunction;

use super::atomic::AtomicLayer;
use super::errors::LayerError;
use super::invariants::invariant_linear_repetitions;

/// One end of a temporal stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TemporalBorder {
    /// First timestep.
    Bottom,
    /// Last timestep.
    Top,
}

impl fmt::Display for TemporalBorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemporalBorder::Bottom => f.write_str("bottom"),
            TemporalBorder::Top => f.write_str("top"),
        }
    }
}

/// An atomic layer or a composition of layers.
#[derive(Clone, Debug, PartialEq)]
pub enum Layer<A> {
    Atomic(A),
    Composed(ComposedLayer<A>),
}

/// Closed set of temporal compositions.
#[derive(Clone, Debug, PartialEq)]
pub enum ComposedLayer<A> {
    Sequenced(SequencedLayers<A>),
    Repeated(RepeatedLayer<A>),
}

/// Non-empty list of layers executed in order.
#[derive(Clone, Debug, PartialEq)]
pub struct SequencedLayers<A> {
    children: Vec<Layer<A>>,
}

/// A body executed `repetitions` times.
#[derive(Clone, Debug, PartialEq)]
pub struct RepeatedLayer<A> {
    body: Box<Layer<A>>,
    repetitions: LinearFunction,
}

impl<A: AtomicLayer> SequencedLayers<A> {
    pub fn new(children: Vec<Layer<A>>) -> Result<Self, LayerError> {
        if children.is_empty() {
            return Err(LayerError::Configuration(
                "a sequenced layer needs at least one child".to_string(),
            ));
        }
        Ok(Self { children })
    }

    pub fn children(&self) -> &[Layer<A>] {
        &self.children
    }

    pub fn scalable_timesteps(&self) -> LinearFunction {
        self.children.iter().map(Layer::scalable_timesteps).sum()
    }
}

impl<A: AtomicLayer> RepeatedLayer<A> {
    /// Fails if both the body's timestep count and `repetitions` depend on `k`.
    pub fn new(body: Layer<A>, repetitions: LinearFunction) -> Result<Self, LayerError> {
        let body_timesteps = body.scalable_timesteps();
        if !invariant_linear_repetitions(&body_timesteps, &repetitions) {
            return Err(LayerError::Configuration(format!(
                "body timesteps ({body_timesteps}) and repetitions ({repetitions}) both scale with k, \
                 the total number of timesteps would not be linear in k"
            )));
        }
        Ok(Self {
            body: Box::new(body),
            repetitions,
        })
    }

    pub fn body(&self) -> &Layer<A> {
        &self.body
    }

    pub fn repetitions(&self) -> LinearFunction {
        self.repetitions
    }

    pub fn scalable_timesteps(&self) -> LinearFunction {
        let body = self.body.scalable_timesteps();
        if self.repetitions.is_constant() {
            body * self.repetitions.offset
        } else {
            self.repetitions * body.offset
        }
    }

    fn with_repetitions(&self, repetitions: LinearFunction) -> Result<Self, LayerError> {
        Self::new((*self.body).clone(), repetitions)
    }

    fn with_temporal_borders_trimmed(
        &self,
        borders: &[TemporalBorder],
    ) -> Result<Option<Layer<A>>, LayerError> {
        let trimmed_count = borders.len() as i64;
        if self.repetitions.is_constant() && self.repetitions.offset < trimmed_count {
            // Fewer iterations than trimmed borders: a single iteration is
            // trimmed on every side, none at all leaves nothing.
            if self.repetitions.offset <= 0 {
                return Ok(None);
            }
            return self.body.with_temporal_borders_trimmed(borders);
        }
        if matches!(*self.body, Layer::Atomic(_)) {
            let repetitions = self.repetitions - trimmed_count;
            if repetitions == LinearFunction::constant(0) {
                return Ok(None);
            }
            return Ok(Some(Layer::repeated(self.with_repetitions(repetitions)?)));
        }

        // Composed body: unroll one iteration on each trimmed side.
        let mut children = Vec::new();
        if borders.contains(&TemporalBorder::Bottom) {
            children.extend(self.body.with_temporal_borders_trimmed(&[TemporalBorder::Bottom])?);
        }
        let remaining = self.repetitions - trimmed_count;
        if remaining != LinearFunction::constant(0) {
            children.push(Layer::repeated(self.with_repetitions(remaining)?));
        }
        if borders.contains(&TemporalBorder::Top) {
            children.extend(self.body.with_temporal_borders_trimmed(&[TemporalBorder::Top])?);
        }
        Layer::sequence_or_none(children)
    }
}

impl<A: AtomicLayer> ComposedLayer<A> {
    pub fn scalable_timesteps(&self) -> LinearFunction {
        match self {
            ComposedLayer::Sequenced(sequenced) => sequenced.scalable_timesteps(),
            ComposedLayer::Repeated(repeated) => repeated.scalable_timesteps(),
        }
    }
}

impl<A: AtomicLayer> Layer<A> {
    pub fn sequenced(children: Vec<Layer<A>>) -> Result<Self, LayerError> {
        Ok(Layer::Composed(ComposedLayer::Sequenced(
            SequencedLayers::new(children)?,
        )))
    }

    pub fn repeated(repeated: RepeatedLayer<A>) -> Self {
        Layer::Composed(ComposedLayer::Repeated(repeated))
    }

    pub fn repeat(body: Layer<A>, repetitions: LinearFunction) -> Result<Self, LayerError> {
        Ok(Self::repeated(RepeatedLayer::new(body, repetitions)?))
    }

    fn sequence_or_none(mut children: Vec<Layer<A>>) -> Result<Option<Self>, LayerError> {
        match children.len() {
            0 => Ok(None),
            1 => Ok(children.pop()),
            _ => Self::sequenced(children).map(Some),
        }
    }

    pub fn is_atomic(&self) -> bool {
        matches!(self, Layer::Atomic(_))
    }

    /// Number of timesteps as a function of `k`. Atomic layers span one.
    pub fn scalable_timesteps(&self) -> LinearFunction {
        match self {
            Layer::Atomic(_) => LinearFunction::constant(1),
            Layer::Composed(composed) => composed.scalable_timesteps(),
        }
    }

    pub fn timesteps(&self, k: u32) -> i64 {
        self.scalable_timesteps().eval(k)
    }

    /// Every atomic layer in execution order, repetitions unrolled for `k`.
    pub fn all_layers(&self, k: u32) -> Result<Vec<A>, LayerError> {
        match self {
            Layer::Atomic(layer) => Ok(vec![layer.clone()]),
            Layer::Composed(ComposedLayer::Sequenced(sequenced)) => {
                let mut layers = Vec::new();
                for child in sequenced.children() {
                    layers.extend(child.all_layers(k)?);
                }
                Ok(layers)
            }
            Layer::Composed(ComposedLayer::Repeated(repeated)) => {
                let count = repeated.repetitions().eval(k);
                if count < 0 {
                    return Err(LayerError::Configuration(format!(
                        "repetition count {} is negative for k = {k}",
                        repeated.repetitions()
                    )));
                }
                let body = repeated.body().all_layers(k)?;
                let mut layers = Vec::with_capacity(body.len() * count as usize);
                for _ in 0..count {
                    layers.extend(body.iter().cloned());
                }
                Ok(layers)
            }
        }
    }

    pub fn with_spatial_borders_trimmed(
        &self,
        borders: &[TemplateBorder],
    ) -> Result<Self, LayerError> {
        match self {
            Layer::Atomic(layer) => Ok(Layer::Atomic(layer.with_spatial_borders_trimmed(borders)?)),
            Layer::Composed(ComposedLayer::Sequenced(sequenced)) => Self::sequenced(
                sequenced
                    .children()
                    .iter()
                    .map(|child| child.with_spatial_borders_trimmed(borders))
                    .collect::<Result<_, _>>()?,
            ),
            Layer::Composed(ComposedLayer::Repeated(repeated)) => Self::repeat(
                repeated.body().with_spatial_borders_trimmed(borders)?,
                repeated.repetitions(),
            ),
        }
    }

    /// Copy without the timesteps on the given temporal borders, `None` if
    /// nothing is left.
    pub fn with_temporal_borders_trimmed(
        &self,
        borders: &[TemporalBorder],
    ) -> Result<Option<Self>, LayerError> {
        if borders.is_empty() {
            return Ok(Some(self.clone()));
        }
        match self {
            Layer::Atomic(_) => Ok(None),
            Layer::Composed(ComposedLayer::Repeated(repeated)) => {
                repeated.with_temporal_borders_trimmed(borders)
            }
            Layer::Composed(ComposedLayer::Sequenced(sequenced)) => {
                Self::sequence_or_none(trim_stack(sequenced.children(), borders)?)
            }
        }
    }

    /// Rebuild this layer with each atomic layer combined with the atomic
    /// layer at the same place in `other`. Both layers must share the same
    /// structure.
    pub fn zip_atomic<B, F>(&self, other: &Layer<B>, combine: &F) -> Result<Self, LayerError>
    where
        B: AtomicLayer,
        F: Fn(&A, &B) -> Result<A, LayerError>,
    {
        match (self, other) {
            (Layer::Atomic(a), Layer::Atomic(b)) => Ok(Layer::Atomic(combine(a, b)?)),
            (
                Layer::Composed(ComposedLayer::Sequenced(a)),
                Layer::Composed(ComposedLayer::Sequenced(b)),
            ) if a.children().len() == b.children().len() => Self::sequenced(
                a.children()
                    .iter()
                    .zip(b.children())
                    .map(|(x, y)| x.zip_atomic(y, combine))
                    .collect::<Result<_, _>>()?,
            ),
            (
                Layer::Composed(ComposedLayer::Repeated(a)),
                Layer::Composed(ComposedLayer::Repeated(b)),
            ) if a.repetitions() == b.repetitions() => {
                Self::repeat(a.body().zip_atomic(b.body(), combine)?, a.repetitions())
            }
            _ => Err(LayerError::IncompatibleSchedule(format!(
                "cannot combine a layer of {} timesteps with a layer of {} timesteps \
                 that has a different structure",
                self.scalable_timesteps(),
                other.scalable_timesteps()
            ))),
        }
    }
}

/// Trim the first layer of `layers` on the bottom and the last one on the top,
/// dropping layers that vanish.
pub(crate) fn trim_stack<A: AtomicLayer>(
    layers: &[Layer<A>],
    borders: &[TemporalBorder],
) -> Result<Vec<Layer<A>>, LayerError> {
    let Some((last, rest)) = layers.split_last() else {
        return Ok(Vec::new());
    };
    if rest.is_empty() {
        return Ok(last.with_temporal_borders_trimmed(borders)?.into_iter().collect());
    }

    let mut trimmed = Vec::with_capacity(layers.len());
    let (first, middle) = (&rest[0], &rest[1..]);
    if borders.contains(&TemporalBorder::Bottom) {
        trimmed.extend(first.with_temporal_borders_trimmed(&[TemporalBorder::Bottom])?);
    } else {
        trimmed.push(first.clone());
    }
    trimmed.extend(middle.iter().cloned());
    if borders.contains(&TemporalBorder::Top) {
        trimmed.extend(last.with_temporal_borders_trimmed(&[TemporalBorder::Top])?);
    } else {
        trimmed.push(last.clone());
    }
    Ok(trimmed)
}
