//! Tree traversal port
//!
//! Every annotation of the tree is computed by a walker driven by
//! [`LayerNode::walk`](crate::domain::node::LayerNode::walk).

use crate::domain::errors::TreeError;
use crate::domain::node::{LayerNode, LeafId, PlacedLayer};

/// Visitor over a layer tree, called in execution order.
pub trait NodeWalker {
    /// Called before the children of `node`. Returning `false` skips the
    /// subtree.
    fn enter_node(&mut self, _node: &LayerNode) -> Result<bool, TreeError> {
        Ok(true)
    }

    /// Called once per visit of a leaf.
    fn visit_leaf(&mut self, id: LeafId, layer: &PlacedLayer) -> Result<(), TreeError>;

    /// Called after the children of `node`.
    fn exit_node(&mut self, _node: &LayerNode) -> Result<(), TreeError> {
        Ok(())
    }
}
