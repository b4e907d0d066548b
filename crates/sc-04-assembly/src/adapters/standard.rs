//! # Standard Builders
//!
//! CSS memory builders. Every cube and spatial pipe is `d = 2k + 1` rounds
//! tall: one round initialising data qubits in the temporal basis, `2k - 1`
//! memory rounds and one round measuring the data qubits. A temporal pipe
//! replaces the measurement round below it and the initialisation round
//! above it by memory rounds.

use sc_01_plaquettes::library::{memory_qubit_plaquettes, x_pipe_plaquettes, y_pipe_plaquettes};
use sc_01_plaquettes::{Plaquettes, Template};
use sc_02_layers::{Block, Layer, PlaquetteLayer};
use shared_types::{Basis, Direction3D, LinearFunction};

use crate::config::StandardBuilderConfig;
use crate::domain::errors::AssemblyError;
use crate::domain::graph::CubeKind;
use crate::domain::specs::{CubeSpec, PipeSpec};
use crate::ports::builders::{CubeBuilder, PipeBuilder};

/// Boundary bases of a memory cube, rejecting kinds the builders do not implement.
fn memory_bases(kind: &CubeKind) -> Result<(Basis, Basis, Basis), AssemblyError> {
    match kind {
        CubeKind::Zx { x, y, .. } if x == y => Err(AssemblyError::Unsupported(format!(
            "spatial junction cube {kind}"
        ))),
        CubeKind::Zx { x, y, z } => Ok((*x, *y, *z)),
        CubeKind::YHalfCube => Err(AssemblyError::Unsupported(
            "Y basis cubes".to_string(),
        )),
        CubeKind::Port { .. } => Err(AssemblyError::Unsupported(format!(
            "building a block for the open port {kind}"
        ))),
    }
}

type PlaquetteFactory = fn(Basis, Basis, Option<Basis>, Option<Basis>) -> Plaquettes;

/// Rounds of one template with fixed boundary bases.
struct Rounds {
    template: Template,
    factory: PlaquetteFactory,
    x: Basis,
    y: Basis,
}

impl Rounds {
    fn round(&self, reset: Option<Basis>, measurement: Option<Basis>) -> Layer<PlaquetteLayer> {
        Layer::Atomic(PlaquetteLayer::new(
            self.template,
            (self.factory)(self.x, self.y, reset, measurement),
        ))
    }

    fn memory(&self) -> Layer<PlaquetteLayer> {
        self.round(None, None)
    }

    fn block(
        &self,
        repetitions: LinearFunction,
        reset: Option<Basis>,
        measurement: Option<Basis>,
    ) -> Result<Block<PlaquetteLayer>, AssemblyError> {
        Ok(Block::new(vec![
            self.round(reset, None),
            Layer::repeat(self.memory(), repetitions)?,
            self.round(None, measurement),
        ])?)
    }
}

/// `[init, Repeated(memory, 2k - 1), measure]` on the `Qubit` template.
#[derive(Clone, Debug, Default)]
pub struct StandardCubeBuilder {
    config: StandardBuilderConfig,
}

impl StandardCubeBuilder {
    pub fn new(config: StandardBuilderConfig) -> Self {
        Self { config }
    }
}

impl CubeBuilder for StandardCubeBuilder {
    fn build_cube(&self, spec: &CubeSpec) -> Result<Block<PlaquetteLayer>, AssemblyError> {
        let (x, y, z) = memory_bases(&spec.kind)?;
        let rounds = Rounds {
            template: Template::Qubit,
            factory: memory_qubit_plaquettes,
            x,
            y,
        };
        rounds.block(self.config.memory_repetitions, Some(z), Some(z))
    }
}

/// Memory rounds on pipe templates, scheduled like the cubes they join.
#[derive(Clone, Debug, Default)]
pub struct StandardPipeBuilder {
    config: StandardBuilderConfig,
}

impl StandardPipeBuilder {
    pub fn new(config: StandardBuilderConfig) -> Self {
        Self { config }
    }

    fn temporal(&self, spec: &PipeSpec) -> Result<Block<PlaquetteLayer>, AssemblyError> {
        let (ux, uy, _) = memory_bases(&spec.u.kind)?;
        let (vx, vy, _) = memory_bases(&spec.v.kind)?;
        let rounds = |x, y| Rounds {
            template: Template::Qubit,
            factory: memory_qubit_plaquettes,
            x,
            y,
        };
        Ok(Block::new(vec![
            rounds(ux, uy).memory(),
            rounds(vx, vy).memory(),
        ])?)
    }

    fn spatial(&self, spec: &PipeSpec) -> Result<Block<PlaquetteLayer>, AssemblyError> {
        let (x, y, z) = memory_bases(&spec.u.kind)?;
        memory_bases(&spec.v.kind)?;
        if spec.u.pipe_below != spec.v.pipe_below || spec.u.pipe_above != spec.v.pipe_above {
            return Err(AssemblyError::Unsupported(format!(
                "spatial pipe along {} between cubes that disagree on temporal pipes",
                spec.direction
            )));
        }
        let (template, factory): (Template, PlaquetteFactory) = match spec.direction {
            Direction3D::X => (Template::VerticalBorders, x_pipe_plaquettes),
            Direction3D::Y => (Template::HorizontalBorders, y_pipe_plaquettes),
            Direction3D::Z => {
                return Err(AssemblyError::Unsupported(
                    "temporal pipe built as a spatial pipe".to_string(),
                ))
            }
        };
        let rounds = Rounds {
            template,
            factory,
            x,
            y,
        };
        let reset = (!spec.u.pipe_below).then_some(z);
        let measurement = (!spec.u.pipe_above).then_some(z);
        rounds.block(self.config.memory_repetitions, reset, measurement)
    }
}

impl PipeBuilder for StandardPipeBuilder {
    fn build_pipe(&self, spec: &PipeSpec) -> Result<Block<PlaquetteLayer>, AssemblyError> {
        if spec.direction.is_spatial() {
            self.spatial(spec)
        } else {
            self.temporal(spec)
        }
    }
}
