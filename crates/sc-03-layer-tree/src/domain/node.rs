//! Layer tree nodes
//!
//! The merged stack is converted once into a tree of nodes. Leaves are the
//! merged atomic layers and receive stable pre-order identifiers, which key
//! every per-leaf annotation.

use sc_02_layers::{ComposedLayer, Layer, LayoutLayer, PlaquetteLayer};
use shared_types::LinearFunction;

use super::errors::TreeError;
use crate::ports::walker::NodeWalker;

/// A merged atomic layer spanning every layout position at one timestep.
pub type PlacedLayer = LayoutLayer<PlaquetteLayer>;

/// Output of the merge engine, as consumed by the tree.
pub type MergedLayer = Layer<PlacedLayer>;

/// Pre-order identifier of a leaf.
pub type LeafId = usize;

/// One node of the layer tree.
#[derive(Clone, Debug, PartialEq)]
pub enum LayerNode {
    Leaf {
        id: LeafId,
        layer: PlacedLayer,
    },
    Sequence {
        children: Vec<LayerNode>,
    },
    Repetition {
        body: Box<LayerNode>,
        repetitions: LinearFunction,
    },
}

impl LayerNode {
    /// Build the tree of `layer`, numbering leaves in pre-order from 0.
    pub fn from_layer(layer: &MergedLayer) -> Self {
        let mut next_id = 0;
        Self::build(layer, &mut next_id)
    }

    fn build(layer: &MergedLayer, next_id: &mut LeafId) -> Self {
        match layer {
            Layer::Atomic(atomic) => {
                let id = *next_id;
                *next_id += 1;
                LayerNode::Leaf {
                    id,
                    layer: atomic.clone(),
                }
            }
            Layer::Composed(ComposedLayer::Sequenced(sequenced)) => LayerNode::Sequence {
                children: sequenced
                    .children()
                    .iter()
                    .map(|child| Self::build(child, next_id))
                    .collect(),
            },
            Layer::Composed(ComposedLayer::Repeated(repeated)) => LayerNode::Repetition {
                body: Box::new(Self::build(repeated.body(), next_id)),
                repetitions: repeated.repetitions(),
            },
        }
    }

    /// Visit the subtree rooted at this node in execution order.
    ///
    /// Children are skipped when [`NodeWalker::enter_node`] returns `false`;
    /// [`NodeWalker::exit_node`] is then not called either.
    pub fn walk<W: NodeWalker>(&self, walker: &mut W) -> Result<(), TreeError> {
        if !walker.enter_node(self)? {
            return Ok(());
        }
        match self {
            LayerNode::Leaf { id, layer } => walker.visit_leaf(*id, layer)?,
            LayerNode::Sequence { children } => {
                for child in children {
                    child.walk(walker)?;
                }
            }
            LayerNode::Repetition { body, .. } => body.walk(walker)?,
        }
        walker.exit_node(self)
    }

    /// Repetition count at `k`, failing if negative. `1` for other nodes.
    pub fn repetitions_at(&self, k: u32) -> Result<u64, TreeError> {
        let LayerNode::Repetition { repetitions, .. } = self else {
            return Ok(1);
        };
        let count = repetitions.eval(k);
        u64::try_from(count).map_err(|_| TreeError::NegativeRepetitions {
            repetitions: repetitions.to_string(),
            k,
        })
    }

    /// Last leaf executed by this subtree at `k`, `None` if nothing executes.
    pub fn last_leaf(&self, k: u32) -> Result<Option<LeafId>, TreeError> {
        match self {
            LayerNode::Leaf { id, .. } => Ok(Some(*id)),
            LayerNode::Sequence { children } => {
                for child in children.iter().rev() {
                    if let Some(id) = child.last_leaf(k)? {
                        return Ok(Some(id));
                    }
                }
                Ok(None)
            }
            LayerNode::Repetition { body, .. } => {
                if self.repetitions_at(k)? == 0 {
                    return Ok(None);
                }
                body.last_leaf(k)
            }
        }
    }

    /// Number of leaves in the subtree, repetitions counted once.
    pub fn leaf_count(&self) -> usize {
        match self {
            LayerNode::Leaf { .. } => 1,
            LayerNode::Sequence { children } => children.iter().map(LayerNode::leaf_count).sum(),
            LayerNode::Repetition { body, .. } => body.leaf_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sc_01_plaquettes::{Plaquettes, Template};
    use sc_02_layers::{merge_parallel_block_layers, Block, LayoutPosition};
    use shared_types::Position2D;
    use std::collections::BTreeMap;

    fn merged(layers: Vec<Layer<PlaquetteLayer>>) -> MergedLayer {
        let blocks = BTreeMap::from([(
            LayoutPosition::cube(Position2D::new(0, 0)),
            Block::new(layers).unwrap(),
        )]);
        Layer::sequenced(merge_parallel_block_layers(&blocks).unwrap()).unwrap()
    }

    fn atomic() -> Layer<PlaquetteLayer> {
        Layer::Atomic(PlaquetteLayer::new(Template::Qubit, Plaquettes::default()))
    }

    #[test]
    fn test_preorder_leaf_ids() {
        let root = LayerNode::from_layer(&merged(vec![
            atomic(),
            Layer::repeat(atomic(), LinearFunction::new(2, -1)).unwrap(),
            atomic(),
        ]));
        assert_eq!(root.leaf_count(), 3);
        assert_eq!(root.last_leaf(1).unwrap(), Some(2));

        let LayerNode::Sequence { children } = &root else {
            panic!("expected a sequence");
        };
        assert!(matches!(children[0], LayerNode::Leaf { id: 0, .. }));
        assert!(matches!(children[2], LayerNode::Leaf { id: 2, .. }));
    }

    #[test]
    fn test_last_leaf_skips_empty_repetitions() {
        let root = LayerNode::from_layer(&merged(vec![
            atomic(),
            Layer::repeat(atomic(), LinearFunction::new(1, 0)).unwrap(),
        ]));
        assert_eq!(root.last_leaf(0).unwrap(), Some(0));
        assert_eq!(root.last_leaf(3).unwrap(), Some(1));
    }

    #[test]
    fn test_negative_repetitions() {
        let root = LayerNode::from_layer(&merged(vec![
            Layer::repeat(atomic(), LinearFunction::new(2, -1)).unwrap(),
        ]));
        let LayerNode::Sequence { children } = &root else {
            panic!("expected a sequence");
        };
        assert!(matches!(
            children[0].repetitions_at(0),
            Err(TreeError::NegativeRepetitions { k: 0, .. })
        ));
        assert_eq!(children[0].repetitions_at(2).unwrap(), 3);
    }
}
