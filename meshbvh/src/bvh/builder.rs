use std::ops::Range;

use super::{Bvh, BvhNode, BvhNodeId, BvhNodes, BvhPrimitives};
use crate::BoundingBox;

/// Node waiting to be filled in, along with its triangles (as a range of
/// `tri_order`).
type WorkItem = (BvhNodeId, Range<usize>);

/// Strategy for turning preprocessed triangles into a tree.
pub trait BvhBuilder {
    fn build(&self, primitives: &BvhPrimitives, leaf_capacity: usize) -> Bvh;
}

/// State shared by all builders: the triangle permutation and the node arena.
///
/// Nodes are processed through an explicit work stack, so the tree's depth
/// (which can get large for unlucky SAH splits) doesn't translate into
/// native stack depth.
pub(crate) struct BuildContext<'a> {
    primitives: &'a BvhPrimitives,
    leaf_capacity: usize,
    nodes: BvhNodes,
    tri_order: Vec<u32>,
}

impl<'a> BuildContext<'a> {
    pub fn new(
        primitives: &'a BvhPrimitives,
        leaf_capacity: usize,
        tri_order: Vec<u32>,
    ) -> Self {
        assert!(leaf_capacity >= 1);
        assert!(!primitives.is_empty());
        assert_eq!(primitives.len(), tri_order.len());

        Self {
            primitives,
            leaf_capacity,
            nodes: BvhNodes::with_capacity(2 * primitives.len() - 1),
            tri_order,
        }
    }

    /// Builds the tree.
    ///
    /// `find_pivot` gets triangles of a node that has to be split, together
    /// with their bounds; it may reorder them and returns how many of them
    /// (counting from the front) should go to the left child. `None` - or a
    /// pivot that would leave one side empty - splits the node in half by
    /// index instead.
    pub fn run<F>(mut self, mut find_pivot: F) -> Bvh
    where
        F: FnMut(&BvhPrimitives, BoundingBox, &mut [u32]) -> Option<usize>,
    {
        let root_id = self.nodes.alloc();
        let mut stack = vec![(root_id, 0..self.tri_order.len())];

        while let Some((node_id, range)) = stack.pop() {
            let children = self.process(node_id, range, &mut find_pivot);

            if let Some((left, right)) = children {
                stack.push(right);
                stack.push(left);
            }
        }

        log::trace!(
            "Built {} nodes for {} triangles",
            self.nodes.len(),
            self.tri_order.len()
        );

        Bvh::new(self.nodes, self.tri_order)
    }

    fn process<F>(
        &mut self,
        node_id: BvhNodeId,
        range: Range<usize>,
        find_pivot: &mut F,
    ) -> Option<(WorkItem, WorkItem)>
    where
        F: FnMut(&BvhPrimitives, BoundingBox, &mut [u32]) -> Option<usize>,
    {
        let ids = &mut self.tri_order[range.clone()];
        let bounds = self.primitives.bounds_of(ids);
        let count = ids.len();

        if count <= self.leaf_capacity {
            self.nodes[node_id] = BvhNode::Leaf {
                bounds,
                start: range.start as u32,
                count: count as u32,
            };

            return None;
        }

        let pivot = match find_pivot(self.primitives, bounds, ids) {
            Some(pivot) if pivot > 0 && pivot < count => pivot,

            _ => {
                log::trace!(
                    "Falling back to median split for {count} triangles at \
                     {range:?}"
                );

                count / 2
            }
        };

        let left_id = self.nodes.alloc();
        let right_id = self.nodes.alloc();
        let mid = range.start + pivot;

        self.nodes[node_id] = BvhNode::Internal {
            bounds,
            left_id,
            right_id,
        };

        Some(((left_id, range.start..mid), (right_id, mid..range.end)))
    }
}
