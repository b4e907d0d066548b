//! Blocks: the temporal stack owned by one layout position

use sc_01_plaquettes::TemplateBorder;
use shared_types::LinearFunction;

use super::atomic::AtomicLayer;
use super::composed::{trim_stack, Layer, TemporalBorder};
use super::errors::LayerError;

/// Ordered list of layers owned by a single layout position.
#[derive(Clone, Debug, PartialEq)]
pub struct Block<A> {
    layers: Vec<Layer<A>>,
}

impl<A: AtomicLayer> Block<A> {
    pub fn new(layers: Vec<Layer<A>>) -> Result<Self, LayerError> {
        if layers.is_empty() {
            return Err(LayerError::Configuration(
                "a block needs at least one layer".to_string(),
            ));
        }
        Ok(Self { layers })
    }

    pub fn layers(&self) -> &[Layer<A>] {
        &self.layers
    }

    pub fn scalable_timesteps(&self) -> LinearFunction {
        self.layers.iter().map(Layer::scalable_timesteps).sum()
    }

    /// Timestep count of each top-level layer.
    pub fn slot_schedule(&self) -> Vec<LinearFunction> {
        self.layers.iter().map(Layer::scalable_timesteps).collect()
    }

    pub fn with_spatial_borders_trimmed(
        &self,
        borders: &[TemplateBorder],
    ) -> Result<Self, LayerError> {
        Self::new(
            self.layers
                .iter()
                .map(|layer| layer.with_spatial_borders_trimmed(borders))
                .collect::<Result<_, _>>()?,
        )
    }

    pub fn with_temporal_borders_trimmed(
        &self,
        borders: &[TemporalBorder],
    ) -> Result<Self, LayerError> {
        Self::new(trim_stack(&self.layers, borders)?)
    }

    /// Copy with `layer` appended on top of the stack.
    pub fn with_layer_on_top(&self, layer: Layer<A>) -> Self {
        let mut layers = self.layers.clone();
        layers.push(layer);
        Self { layers }
    }

    /// Copy with `layer` inserted below the stack.
    pub fn with_layer_below(&self, layer: Layer<A>) -> Self {
        let mut layers = Vec::with_capacity(self.layers.len() + 1);
        layers.push(layer);
        layers.extend(self.layers.iter().cloned());
        Self { layers }
    }

    /// Combine every atomic layer with the one at the same place in `other`.
    pub fn zip_atomic<B, F>(&self, other: &Block<B>, combine: &F) -> Result<Self, LayerError>
    where
        B: AtomicLayer,
        F: Fn(&A, &B) -> Result<A, LayerError>,
    {
        if self.layers.len() != other.layers().len() {
            return Err(LayerError::IncompatibleSchedule(format!(
                "cannot combine a block of {} layers with a block of {} layers",
                self.layers.len(),
                other.layers().len()
            )));
        }
        Self::new(
            self.layers
                .iter()
                .zip(other.layers())
                .map(|(a, b)| a.zip_atomic(b, combine))
                .collect::<Result<_, _>>()?,
        )
    }
}
