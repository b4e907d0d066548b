//! Topological assembly
//!
//! Folds every pipe into the blocks of the cubes it joins. Temporal pipes
//! are processed before spatial pipes: a temporal pipe replaces the first or
//! last round of a cube, and a spatial pipe must then splice its plaquettes
//! into those replaced rounds, not the original ones.

use std::collections::BTreeMap;

use sc_01_plaquettes::{RpngDescription, TemplateBorder};
use sc_02_layers::{AtomicLayer, Block, LayerError, PlaquetteLayer, TemporalBorder};
use shared_types::{Direction3D, Position3D};
use tracing::debug;

use crate::domain::errors::AssemblyError;
use crate::domain::graph::{BlockGraph, Pipe};
use crate::domain::specs::{CubeSpec, PipeSpec};
use crate::ports::builders::{CubeBuilder, PipeBuilder};

/// Borders of `u`, of the pipe on the `u` side, of the pipe on the `v` side
/// and of `v` touched by a spatial pipe.
fn touched_borders(
    direction: Direction3D,
) -> Option<(TemplateBorder, TemplateBorder, TemplateBorder, TemplateBorder)> {
    match direction {
        Direction3D::X => Some((
            TemplateBorder::Right,
            TemplateBorder::Left,
            TemplateBorder::Right,
            TemplateBorder::Left,
        )),
        Direction3D::Y => Some((
            TemplateBorder::Bottom,
            TemplateBorder::Top,
            TemplateBorder::Bottom,
            TemplateBorder::Top,
        )),
        Direction3D::Z => None,
    }
}

/// Replace the plaquettes of `cube` on `cube_border` by those of `pipe` on
/// `pipe_border`, matched by position along the border.
fn splice(
    cube: &PlaquetteLayer,
    cube_border: TemplateBorder,
    pipe: &PlaquetteLayer,
    pipe_border: TemplateBorder,
) -> Result<PlaquetteLayer, LayerError> {
    let mapping = pipe
        .template()
        .border_indices(pipe_border)?
        .to(&cube.template().border_indices(cube_border)?);
    let updates: BTreeMap<usize, RpngDescription> = mapping
        .iter()
        .filter_map(|(pipe_index, cube_index)| {
            pipe.plaquettes()
                .get(*pipe_index)
                .map(|description| (*cube_index, *description))
        })
        .collect();
    Ok(cube
        .with_spatial_borders_trimmed(&[cube_border])?
        .with_updated_plaquettes(&updates))
}

fn block_mut<'a>(
    blocks: &'a mut BTreeMap<Position3D, Block<PlaquetteLayer>>,
    position: &Position3D,
) -> Result<&'a mut Block<PlaquetteLayer>, AssemblyError> {
    blocks.get_mut(position).ok_or_else(|| AssemblyError::MissingCube {
        position: position.to_string(),
    })
}

fn fold_temporal_pipe(
    blocks: &mut BTreeMap<Position3D, Block<PlaquetteLayer>>,
    pipe: &Pipe,
    pipe_block: &Block<PlaquetteLayer>,
) -> Result<(), AssemblyError> {
    let [below, above] = pipe_block.layers() else {
        return Err(AssemblyError::Layer(LayerError::IncompatibleSchedule(format!(
            "a temporal pipe block needs exactly 2 layers, found {}",
            pipe_block.layers().len()
        ))));
    };
    let u = block_mut(blocks, &pipe.u)?;
    *u = u
        .with_temporal_borders_trimmed(&[TemporalBorder::Top])?
        .with_layer_on_top(below.clone());
    let v = block_mut(blocks, &pipe.v)?;
    *v = v
        .with_temporal_borders_trimmed(&[TemporalBorder::Bottom])?
        .with_layer_below(above.clone());
    Ok(())
}

fn fold_spatial_pipe(
    blocks: &mut BTreeMap<Position3D, Block<PlaquetteLayer>>,
    pipe: &Pipe,
    pipe_block: &Block<PlaquetteLayer>,
) -> Result<(), AssemblyError> {
    let Some((u_border, pipe_u_border, pipe_v_border, v_border)) =
        touched_borders(pipe.direction)
    else {
        return Err(AssemblyError::Unsupported(
            "folding a temporal pipe as a spatial pipe".to_string(),
        ));
    };
    let u = block_mut(blocks, &pipe.u)?;
    *u = u.zip_atomic(pipe_block, &|cube: &PlaquetteLayer, pipe: &PlaquetteLayer| {
        splice(cube, u_border, pipe, pipe_u_border)
    })?;
    let v = block_mut(blocks, &pipe.v)?;
    *v = v.zip_atomic(pipe_block, &|cube: &PlaquetteLayer, pipe: &PlaquetteLayer| {
        splice(cube, v_border, pipe, pipe_v_border)
    })?;
    Ok(())
}

/// Blocks of every cube of `graph`, with all pipes folded in.
pub fn assemble_blocks<C, P>(
    graph: &BlockGraph,
    cube_builder: &C,
    pipe_builder: &P,
) -> Result<BTreeMap<Position3D, Block<PlaquetteLayer>>, AssemblyError>
where
    C: CubeBuilder + ?Sized,
    P: PipeBuilder + ?Sized,
{
    let mut blocks = BTreeMap::new();
    for position in graph.cubes().keys() {
        let spec = CubeSpec::from_graph(graph, position)?;
        blocks.insert(*position, cube_builder.build_cube(&spec)?);
    }

    let (temporal, spatial): (Vec<&Pipe>, Vec<&Pipe>) =
        graph.pipes().partition(|pipe| pipe.is_temporal());
    for pipe in &temporal {
        let block = pipe_builder.build_pipe(&PipeSpec::from_graph(graph, pipe)?)?;
        fold_temporal_pipe(&mut blocks, pipe, &block)?;
    }
    for pipe in &spatial {
        let block = pipe_builder.build_pipe(&PipeSpec::from_graph(graph, pipe)?)?;
        fold_spatial_pipe(&mut blocks, pipe, &block)?;
    }
    debug!(
        cubes = blocks.len(),
        temporal_pipes = temporal.len(),
        spatial_pipes = spatial.len(),
        "Assembled blocks"
    );
    Ok(blocks)
}
