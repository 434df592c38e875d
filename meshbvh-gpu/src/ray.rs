use core::mem;

use glam::Vec3;

use crate::{BvhView, Hit, TrianglesView, BVH_STACK_SIZE};

#[derive(Clone, Copy, Debug, Default)]
pub struct Ray {
    origin: Vec3,
    direction: Vec3,
    inv_direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction,
            inv_direction: 1.0 / direction,
        }
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }

    /// Traces this ray and returns its nearest hit, together with the number
    /// of visited nodes.
    pub fn trace_nearest(
        self,
        bvh: BvhView,
        triangles: TrianglesView,
    ) -> (Hit, u32) {
        let mut hit = Hit::none();
        let mut traversed_nodes = 0;

        // Index into the `bvh` array; points at the currently processed node
        let mut node_id = 0;

        let mut stack = [0; BVH_STACK_SIZE];
        let mut stack_ptr = 0;

        loop {
            traversed_nodes += 1;

            let node = bvh.get(node_id);

            if let Some((left_id, right_id)) = node.children() {
                let left = bvh.get(left_id);
                let right = bvh.get(right_id);

                let mut near_id = left_id;
                let mut far_id = right_id;

                let mut near_distance =
                    self.distance_to_node(left.min(), left.max());

                let mut far_distance =
                    self.distance_to_node(right.min(), right.max());

                if far_distance < near_distance {
                    mem::swap(&mut near_id, &mut far_id);
                    mem::swap(&mut near_distance, &mut far_distance);
                }

                // Closer child is more likely to contain the nearest hit, so
                // it goes first; the other one waits on the stack.
                if far_distance < hit.distance {
                    debug_assert!(
                        stack_ptr < BVH_STACK_SIZE,
                        "traversal stack overflow",
                    );

                    stack[stack_ptr] = far_id;
                    stack_ptr += 1;
                }

                if near_distance < hit.distance {
                    node_id = near_id;
                    continue;
                }
            } else if let Some(triangle_ids) = node.triangles() {
                for triangle_id in triangle_ids {
                    if triangles.get(triangle_id).hit(self, &mut hit) {
                        hit.triangle_id = triangle_id;
                    }
                }
            }

            if stack_ptr > 0 {
                stack_ptr -= 1;
                node_id = stack[stack_ptr];
            } else {
                break;
            }
        }

        (hit, traversed_nodes)
    }

    /// Returns the distance to the entry point of given box or `f32::MAX` if
    /// the ray misses it.
    pub fn distance_to_node(self, aabb_min: Vec3, aabb_max: Vec3) -> f32 {
        let hit_min = (aabb_min - self.origin) * self.inv_direction;
        let hit_max = (aabb_max - self.origin) * self.inv_direction;

        let tmin = hit_min.min(hit_max).max_element();
        let tmax = hit_min.max(hit_max).min_element();

        if tmax >= tmin && tmax >= 0.0 {
            tmin
        } else {
            f32::MAX
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::{vec3, vec4, Vec4};

    use super::*;
    use crate::{BvhNode, ChunkedView, Triangle};

    fn corners(triangle: Triangle) -> (Vec<Vec4>, Vec<Vec4>) {
        (
            triangle.positions.map(|p| p.extend(0.0)).to_vec(),
            triangle.normals.map(|n| n.extend(0.0)).to_vec(),
        )
    }

    #[test]
    fn distance_to_node() {
        let ray = Ray::new(vec3(0.5, 0.5, -5.0), vec3(0.0, 0.0, 1.0));

        assert_relative_eq!(
            5.0,
            ray.distance_to_node(Vec3::ZERO, Vec3::ONE)
        );

        assert_eq!(
            f32::MAX,
            ray.distance_to_node(vec3(2.0, 2.0, 0.0), vec3(3.0, 3.0, 1.0))
        );
    }

    #[test]
    fn trace_nearest() {
        let near = Triangle {
            positions: [
                vec3(-1.0, -1.0, 2.0),
                vec3(1.0, -1.0, 2.0),
                vec3(0.0, 1.0, 2.0),
            ],
            normals: [vec3(0.0, 0.0, -1.0); 3],
        };

        let far = Triangle {
            positions: near.positions.map(|p| p + vec3(0.0, 0.0, 3.0)),
            normals: near.normals,
        };

        let (mut positions, mut normals) = corners(far);
        let (near_positions, near_normals) = corners(near);

        positions.extend(near_positions);
        normals.extend(near_normals);

        let nodes = [
            BvhNode::internal(
                vec3(-1.0, -1.0, 2.0),
                vec3(1.0, 1.0, 5.0),
                1,
                2,
            ),
            BvhNode::leaf(vec3(-1.0, -1.0, 5.0), vec3(1.0, 1.0, 5.0), 0, 1),
            BvhNode::leaf(vec3(-1.0, -1.0, 2.0), vec3(1.0, 1.0, 2.0), 1, 1),
        ];

        let bvh = BvhView::new(&nodes);

        let triangles = TrianglesView::new(
            ChunkedView::new(&positions[..3], &positions[3..], 3),
            ChunkedView::single(&normals),
        );

        let ray = Ray::new(vec3(0.0, 0.0, 0.0), vec3(0.0, 0.0, 1.0));
        let (hit, _) = ray.trace_nearest(bvh, triangles);

        assert!(hit.is_some());
        assert_eq!(1, hit.triangle_id);
        assert_relative_eq!(2.0, hit.distance);
        assert_relative_eq!(-1.0, hit.normal.z);

        let ray = Ray::new(vec3(5.0, 5.0, 0.0), vec3(0.0, 0.0, 1.0));
        let (hit, _) = ray.trace_nearest(bvh, triangles);

        assert!(hit.is_none());

        // Unused lane, but still part of the layout
        assert_eq!(vec4(-1.0, -1.0, 5.0, 0.0), positions[0]);
    }

    /// Builds a chain where every level keeps its sibling leaf on the stack,
    /// so the traversal must run out of stack space.
    #[test]
    #[should_panic]
    fn trace_nearest_overflows_on_too_deep_trees() {
        let levels = BVH_STACK_SIZE as u32 + 1;
        let mut nodes = Vec::new();

        // Node `2 * level` is internal, `2 * level + 1` is its sibling leaf
        for level in 0..levels {
            let id = 2 * level;

            nodes.push(BvhNode::internal(
                Vec3::ZERO,
                Vec3::ONE,
                id + 2,
                id + 1,
            ));
            nodes.push(BvhNode::leaf(Vec3::ZERO, Vec3::ONE, 0, 1));
        }

        nodes.push(BvhNode::leaf(Vec3::ZERO, Vec3::ONE, 0, 1));

        let (positions, normals) = corners(Triangle {
            positions: [vec3(10.0, 10.0, 0.0); 3],
            normals: [Vec3::Z; 3],
        });

        let ray = Ray::new(vec3(0.5, 0.5, -5.0), Vec3::Z);

        ray.trace_nearest(
            BvhView::new(&nodes),
            TrianglesView::new(
                ChunkedView::single(&positions),
                ChunkedView::single(&normals),
            ),
        );
    }
}
