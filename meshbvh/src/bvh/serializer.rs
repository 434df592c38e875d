use glam::Vec4;

use super::{Bvh, BvhNode};
use crate::{gpu, Mesh};

/// Linear, upload-ready representation of a built tree.
///
/// `tri_positions` and `tri_normals` contain three records per triangle (one
/// per corner), in build order - i.e. record `i` belongs to corner `i % 3` of
/// triangle `tri_order[i / 3]`, so leaves can address them directly.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FlatBvh {
    pub tri_positions: Vec<Vec4>,
    pub tri_normals: Vec<Vec4>,
    pub nodes: Vec<gpu::BvhNode>,
}

impl FlatBvh {
    pub fn triangle_count(&self) -> usize {
        self.tri_positions.len() / 3
    }

    pub fn tri_positions_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.tri_positions)
    }

    pub fn tri_normals_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.tri_normals)
    }

    pub fn nodes_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.nodes)
    }
}

pub fn serialize(mesh: &Mesh, bvh: &Bvh) -> FlatBvh {
    let corners = 3 * bvh.tri_order().len();

    let mut out = FlatBvh {
        tri_positions: Vec::with_capacity(corners),
        tri_normals: Vec::with_capacity(corners),
        nodes: Vec::with_capacity(bvh.nodes().len()),
    };

    for &triangle_id in bvh.tri_order() {
        let triangle = mesh.triangle(triangle_id);

        out.tri_positions
            .extend(triangle.positions.map(|position| position.extend(0.0)));

        out.tri_normals
            .extend(triangle.normals.map(|normal| normal.extend(0.0)));
    }

    // Node ids are indices into the arena, so they can be written out as-is
    for (_, node) in bvh.nodes().iter() {
        out.nodes.push(serialize_node(node));
    }

    out
}

fn serialize_node(node: &BvhNode) -> gpu::BvhNode {
    match *node {
        BvhNode::Internal {
            bounds,
            left_id,
            right_id,
        } => gpu::BvhNode::internal(
            bounds.min(),
            bounds.max(),
            left_id.get(),
            right_id.get(),
        ),

        BvhNode::Leaf {
            bounds,
            start,
            count,
        } => gpu::BvhNode::leaf(bounds.min(), bounds.max(), start, count),
    }
}
