mod morton_code;

pub use self::morton_code::*;
use super::super::{BuildContext, Bvh, BvhBuilder, BvhPrimitives};
use crate::BoundingBox;

/// How the Morton-ordered triangles get bisected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MortonSplit {
    /// Split each range at its index midpoint; yields a balanced tree.
    #[default]
    Midpoint,

    /// Split each range where the highest differing bit of its codes flips,
    /// as in Karras' radix-tree construction.
    CommonPrefix,
}

/// Builds LBVH: triangles get sorted along the Z-order curve and then the
/// sorted array is recursively bisected.
///
/// See: https://devblogs.nvidia.com/wp-content/uploads/2012/11/karras2012hpg_paper.pdf
#[derive(Clone, Copy, Debug, Default)]
pub struct LbvhBuilder {
    split: MortonSplit,
}

impl LbvhBuilder {
    pub fn new(split: MortonSplit) -> Self {
        Self { split }
    }
}

impl BvhBuilder for LbvhBuilder {
    fn build(&self, primitives: &BvhPrimitives, leaf_capacity: usize) -> Bvh {
        let codes = morton_codes(primitives);
        let mut tri_order: Vec<u32> = (0..primitives.len() as u32).collect();

        tri_order.sort_by_key(|&id| codes[id as usize]);

        BuildContext::new(primitives, leaf_capacity, tri_order).run(
            |_, _, ids| match self.split {
                MortonSplit::Midpoint => Some(ids.len() / 2),
                MortonSplit::CommonPrefix => find_split(&codes, ids),
            },
        )
    }
}

/// Returns Morton codes of triangles' centroids, quantized relative to the
/// box spanned by all centroids.
pub fn morton_codes(primitives: &BvhPrimitives) -> Vec<MortonCode> {
    let scene_bb: BoundingBox =
        primitives.iter().map(|primitive| primitive.center).collect();

    primitives
        .iter()
        .map(|primitive| {
            MortonCode::from_point(scene_bb.map(primitive.center))
        })
        .collect()
}

/// Returns the number of leading triangles sharing the longer code prefix or
/// `None` if all codes in range are identical.
fn find_split(codes: &[MortonCode], ids: &[u32]) -> Option<usize> {
    let code = |idx: usize| codes[ids[idx] as usize];

    let first = 0;
    let last = ids.len() - 1;

    let first_code = code(first);
    let last_code = code(last);

    if first_code == last_code {
        return None;
    }

    let common_prefix = (first_code ^ last_code).leading_zeros();

    // Binary search for the last triangle that shares more than
    // `common_prefix` bits with the first one
    let mut split = first;
    let mut step = last - first;

    loop {
        step = (step + 1) >> 1;

        let middle = split + step;

        if middle < last {
            let middle_prefix = (first_code ^ code(middle)).leading_zeros();

            if middle_prefix > common_prefix {
                split = middle;
            }
        }

        if step <= 1 {
            break;
        }
    }

    Some(split + 1)
}

#[cfg(test)]
mod tests {
    use glam::vec3;

    use super::*;
    use crate::bvh::tests::assert_valid;
    use crate::mesh::tests::{random_mesh, two_triangles};
    use crate::{gpu, BvhNode, Mesh};

    const SPLITS: [MortonSplit; 2] =
        [MortonSplit::Midpoint, MortonSplit::CommonPrefix];

    fn assert_morton_ordered(bvh: &Bvh, primitives: &BvhPrimitives) {
        let codes = morton_codes(primitives);

        for pair in bvh.tri_order().windows(2) {
            assert!(codes[pair[0] as usize] <= codes[pair[1] as usize]);
        }
    }

    #[test]
    fn two_disjoint_triangles() {
        let primitives = BvhPrimitives::from_mesh(&two_triangles());

        for split in SPLITS {
            let bvh = LbvhBuilder::new(split).build(&primitives, 1);

            assert_valid(&bvh, &primitives, 1);
            assert_eq!(3, bvh.nodes().len());
            assert_eq!([0, 1], bvh.tri_order());

            assert_eq!(
                BoundingBox::new(vec3(0.0, 0.0, 0.0), vec3(6.0, 6.0, 0.0)),
                bvh.root().bounds()
            );

            for (_, node) in bvh.nodes().iter().skip(1) {
                assert!(matches!(node, BvhNode::Leaf { count: 1, .. }));
            }
        }
    }

    #[test]
    fn random_soup() {
        for split in SPLITS {
            for (seed, count, leaf_capacity) in
                [(0, 2, 1), (1, 3, 1), (2, 100, 1), (3, 500, 1), (4, 500, 4)]
            {
                let mesh = random_mesh(seed, count);
                let primitives = BvhPrimitives::from_mesh(&mesh);
                let bvh = LbvhBuilder::new(split)
                    .build(&primitives, leaf_capacity);

                assert_valid(&bvh, &primitives, leaf_capacity);
                assert_morton_ordered(&bvh, &primitives);

                if leaf_capacity == 1 {
                    assert_eq!(2 * count - 1, bvh.nodes().len());
                }
            }
        }
    }

    #[test]
    fn midpoint_split_is_balanced() {
        let mesh = random_mesh(5, 1000);
        let primitives = BvhPrimitives::from_mesh(&mesh);
        let bvh =
            LbvhBuilder::new(MortonSplit::Midpoint).build(&primitives, 1);

        // ceil(log2(1000))
        assert_eq!(10, bvh.depth());
    }

    #[test]
    fn coincident_centroids() {
        let triangle = gpu::Triangle {
            positions: [
                vec3(0.0, 0.0, 0.0),
                vec3(1.0, 0.0, 0.0),
                vec3(0.0, 1.0, 0.0),
            ],
            normals: [vec3(0.0, 0.0, 1.0); 3],
        };

        let mesh = Mesh::from_triangles([triangle; 16]).unwrap();
        let primitives = BvhPrimitives::from_mesh(&mesh);

        assert!(morton_codes(&primitives).iter().all(|code| code.get() == 0));

        for split in SPLITS {
            let bvh = LbvhBuilder::new(split).build(&primitives, 1);

            assert_valid(&bvh, &primitives, 1);
            assert_eq!(4, bvh.depth());
        }
    }

    #[test]
    fn find_split() {
        let codes = [0b000, 0b001, 0b010, 0b011, 0b100, 0b101]
            .map(|code| MortonCode::from_point(cell(code)));

        let ids = [0, 1, 2, 3, 4, 5];

        // First four codes share the `0` prefix, remaining two share `1`
        assert_eq!(Some(4), super::find_split(&codes, &ids));
        assert_eq!(Some(2), super::find_split(&codes, &ids[..4]));
        assert_eq!(Some(1), super::find_split(&codes, &ids[..2]));
        assert_eq!(None, super::find_split(&codes, &[3, 3, 3]));
    }

    /// Returns a point whose Morton code is `code` (for codes < 8).
    fn cell(code: u32) -> glam::Vec3 {
        let bit = |n: u32| ((code >> n) & 1) as f32 / 1024.0 + 0.1 / 1024.0;

        vec3(bit(2), bit(1), bit(0))
    }
}
