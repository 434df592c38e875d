use crate::BoundingBox;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BvhNode {
    Internal {
        bounds: BoundingBox,
        left_id: BvhNodeId,
        right_id: BvhNodeId,
    },

    Leaf {
        bounds: BoundingBox,

        /// Index of the first triangle in `Bvh::tri_order()`.
        start: u32,
        count: u32,
    },
}

impl BvhNode {
    pub fn bounds(&self) -> BoundingBox {
        match self {
            BvhNode::Internal { bounds, .. } => *bounds,
            BvhNode::Leaf { bounds, .. } => *bounds,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, BvhNode::Leaf { .. })
    }
}

impl Default for BvhNode {
    fn default() -> Self {
        BvhNode::Leaf {
            bounds: Default::default(),
            start: 0,
            count: 0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BvhNodeId(u32);

impl BvhNodeId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn root() -> Self {
        Self::new(0)
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}
