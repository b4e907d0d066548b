//! Atomic layers
//!
//! An atomic layer is one timestep of operations over a 2D tiling. The merge
//! engine is generic over the concrete atomic type; [`PlaquetteLayer`] is the
//! one built by cube and pipe builders.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use sc_01_plaquettes::{Plaquettes, RpngDescription, Template, TemplateBorder};
use serde::{Deserialize, Serialize};
use shared_types::Scalable2D;

use super::errors::LayerError;

/// Behaviour shared by every layer that spans exactly one timestep.
pub trait AtomicLayer: Clone + fmt::Debug + PartialEq {
    /// Physical footprint in qubit coordinates.
    fn scalable_shape(&self) -> Scalable2D;

    /// Copy without the operations found on the given spatial borders.
    fn with_spatial_borders_trimmed(&self, borders: &[TemplateBorder])
        -> Result<Self, LayerError>;
}

/// One round of plaquettes laid out on a template.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlaquetteLayer {
    template: Template,
    plaquettes: Plaquettes,
}

impl PlaquetteLayer {
    pub fn new(template: Template, plaquettes: Plaquettes) -> Self {
        Self {
            template,
            plaquettes,
        }
    }

    pub fn template(&self) -> Template {
        self.template
    }

    pub fn plaquettes(&self) -> &Plaquettes {
        &self.plaquettes
    }

    /// Copy with the given plaquettes inserted, replacing existing entries.
    pub fn with_updated_plaquettes(&self, updates: &BTreeMap<usize, RpngDescription>) -> Self {
        Self {
            template: self.template,
            plaquettes: self.plaquettes.with_updated_plaquettes(updates),
        }
    }
}

impl AtomicLayer for PlaquetteLayer {
    /// Two qubits per plaquette plus the closing row and column.
    fn scalable_shape(&self) -> Scalable2D {
        self.template.scalable_shape() * 2 + 1
    }

    fn with_spatial_borders_trimmed(
        &self,
        borders: &[TemplateBorder],
    ) -> Result<Self, LayerError> {
        let mut indices = BTreeSet::new();
        for border in borders {
            indices.extend(self.template.border_indices(*border)?.indices());
        }
        Ok(Self {
            template: self.template,
            plaquettes: self.plaquettes.without_plaquettes(&indices),
        })
    }
}
