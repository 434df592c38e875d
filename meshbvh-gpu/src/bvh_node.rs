use core::ops::Range;

use bytemuck::{Pod, Zeroable};
use glam::{Vec3, Vec4, Vec4Swizzles};

/// BVH node, as laid out in the GPU buffer.
///
/// Both halves are directly usable as `vec4`s:
///
/// - `d0 = (min.x, min.y, min.z, left)`,
/// - `d1 = (max.x, max.y, max.z, right)`.
///
/// `left` and `right` are `i32`s stored bit-for-bit in the `w` lanes. For
/// internal nodes they point at the child nodes; for leaves `left` is the
/// first triangle and `right` is the negated triangle count.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct BvhNode {
    pub d0: Vec4,
    pub d1: Vec4,
}

impl BvhNode {
    pub fn internal(min: Vec3, max: Vec3, left_id: u32, right_id: u32) -> Self {
        Self::new(min, max, left_id as i32, right_id as i32)
    }

    pub fn leaf(min: Vec3, max: Vec3, start: u32, count: u32) -> Self {
        assert!(count > 0, "Leaf must contain at least one triangle");

        Self::new(min, max, start as i32, -(count as i32))
    }

    fn new(min: Vec3, max: Vec3, left: i32, right: i32) -> Self {
        Self {
            d0: min.extend(f32::from_bits(left as u32)),
            d1: max.extend(f32::from_bits(right as u32)),
        }
    }

    pub fn min(&self) -> Vec3 {
        self.d0.xyz()
    }

    pub fn max(&self) -> Vec3 {
        self.d1.xyz()
    }

    pub fn left(&self) -> i32 {
        self.d0.w.to_bits() as i32
    }

    pub fn right(&self) -> i32 {
        self.d1.w.to_bits() as i32
    }

    pub fn is_leaf(&self) -> bool {
        self.right() < 0
    }

    /// Returns triangles contained within this leaf, or `None` if this is an
    /// internal node.
    pub fn triangles(&self) -> Option<Range<u32>> {
        if self.is_leaf() {
            let start = self.left() as u32;
            let count = (-self.right()) as u32;

            Some(start..(start + count))
        } else {
            None
        }
    }

    /// Returns ids of the child nodes, or `None` if this is a leaf.
    pub fn children(&self) -> Option<(u32, u32)> {
        if self.is_leaf() {
            None
        } else {
            Some((self.left() as u32, self.right() as u32))
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::vec3;

    use super::*;

    #[test]
    fn leaf() {
        let node =
            BvhNode::leaf(vec3(0.0, 1.0, 2.0), vec3(3.0, 4.0, 5.0), 12, 3);

        assert!(node.is_leaf());
        assert_eq!(12, node.left());
        assert_eq!(-3, node.right());
        assert_eq!(Some(12..15), node.triangles());
        assert_eq!(None, node.children());
        assert_eq!(vec3(0.0, 1.0, 2.0), node.min());
        assert_eq!(vec3(3.0, 4.0, 5.0), node.max());
    }

    #[test]
    fn internal() {
        let node = BvhNode::internal(Vec3::ZERO, Vec3::ONE, 1, 2);

        assert!(!node.is_leaf());
        assert_eq!(Some((1, 2)), node.children());
        assert_eq!(None, node.triangles());
    }

    #[test]
    fn layout() {
        assert_eq!(32, core::mem::size_of::<BvhNode>());

        let node = BvhNode::leaf(Vec3::ZERO, Vec3::ONE, 7, 1);
        let lanes: &[f32] = bytemuck::cast_slice(core::slice::from_ref(&node));

        assert_eq!(8, lanes.len());
        assert_eq!(7, lanes[3].to_bits() as i32);
        assert_eq!(-1, lanes[7].to_bits() as i32);
    }
}
