use glam::Vec3;

use crate::{Hit, Ray};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Triangle {
    pub positions: [Vec3; 3],
    pub normals: [Vec3; 3],
}

impl Triangle {
    /// Checks whether `ray` hits this triangle closer than `hit` does and, if
    /// so, updates `hit` (except for `hit.triangle_id`, which is up to the
    /// caller).
    ///
    /// Möller-Trumbore.
    pub fn hit(&self, ray: Ray, hit: &mut Hit) -> bool {
        let [p0, p1, p2] = self.positions;
        let v0v1 = p1 - p0;
        let v0v2 = p2 - p0;

        // ---

        let pvec = ray.direction().cross(v0v2);
        let det = v0v1.dot(pvec);

        if det.abs() < f32::EPSILON {
            return false;
        }

        // ---

        let inv_det = 1.0 / det;
        let tvec = ray.origin() - p0;
        let u = tvec.dot(pvec) * inv_det;
        let qvec = tvec.cross(v0v1);
        let v = ray.direction().dot(qvec) * inv_det;
        let distance = v0v2.dot(qvec) * inv_det;

        if (u < 0.0)
            | (u > 1.0)
            | (v < 0.0)
            | (u + v > 1.0)
            | (distance <= 0.0)
            | (distance >= hit.distance)
        {
            return false;
        }

        let [n0, n1, n2] = self.normals;
        let normal = u * n1 + v * n2 + (1.0 - u - v) * n0;

        hit.distance = distance;
        hit.point = ray.at(distance);
        hit.normal = normal.normalize_or_zero();

        true
    }
}
