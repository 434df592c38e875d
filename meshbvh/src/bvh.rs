mod builder;
mod builders;
mod node;
mod nodes;
mod primitive;
mod serializer;

pub use self::builder::*;
pub use self::builders::*;
pub use self::node::*;
pub use self::nodes::*;
pub use self::primitive::*;
pub use self::serializer::*;

/// Built tree, together with the triangle permutation its leaves point into.
#[derive(Clone, Debug)]
pub struct Bvh {
    nodes: BvhNodes,
    tri_order: Vec<u32>,
}

impl Bvh {
    pub(crate) fn new(nodes: BvhNodes, tri_order: Vec<u32>) -> Self {
        assert!(!nodes.is_empty());

        Self { nodes, tri_order }
    }

    pub fn nodes(&self) -> &BvhNodes {
        &self.nodes
    }

    pub fn root(&self) -> &BvhNode {
        &self.nodes[BvhNodeId::root()]
    }

    /// Returns triangle ids in the order leaves refer to them; leaf
    /// `{ start, count }` covers `tri_order[start..start + count]`.
    pub fn tri_order(&self) -> &[u32] {
        &self.tri_order
    }

    /// Returns the length of the longest path from the root to a leaf.
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(BvhNodeId::root(), 0)];

        while let Some((id, depth)) = stack.pop() {
            match self.nodes[id] {
                BvhNode::Internal {
                    left_id, right_id, ..
                } => {
                    stack.push((left_id, depth + 1));
                    stack.push((right_id, depth + 1));
                }

                BvhNode::Leaf { .. } => {
                    max_depth = max_depth.max(depth);
                }
            }
        }

        max_depth
    }
}
