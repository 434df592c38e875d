use std::ops;

use glam::Vec3;

use crate::{BoundingBox, Mesh};

/// Per-triangle data the builders work on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BvhPrimitive {
    pub bounds: BoundingBox,

    /// Mean of the triangle's vertices; used only to pick splits.
    pub center: Vec3,
}

impl BvhPrimitive {
    pub fn from_positions(positions: [Vec3; 3]) -> Self {
        Self {
            bounds: positions.into_iter().collect(),
            center: positions.into_iter().sum::<Vec3>() / 3.0,
        }
    }
}

/// Preprocessed triangles, indexed by triangle id.
#[derive(Clone, Debug, Default)]
pub struct BvhPrimitives {
    items: Vec<BvhPrimitive>,
}

impl BvhPrimitives {
    /// Computes bounds and centroids of all triangles.
    ///
    /// Degenerate triangles are taken as-is - they simply yield flat (or
    /// point-like) bounds.
    pub fn from_mesh(mesh: &Mesh) -> Self {
        (0..mesh.triangle_count() as u32)
            .map(|id| BvhPrimitive::from_positions(mesh.triangle_positions(id)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BvhPrimitive> + '_ {
        self.items.iter()
    }

    /// Returns the union of bounds of given triangles.
    pub fn bounds_of(&self, ids: &[u32]) -> BoundingBox {
        ids.iter().map(|&id| self[id].bounds).collect()
    }

    /// Returns the box spanned by centroids of given triangles.
    pub fn centers_of(&self, ids: &[u32]) -> BoundingBox {
        ids.iter().map(|&id| self[id].center).collect()
    }
}

impl FromIterator<BvhPrimitive> for BvhPrimitives {
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = BvhPrimitive>,
    {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl ops::Index<u32> for BvhPrimitives {
    type Output = BvhPrimitive;

    fn index(&self, index: u32) -> &Self::Output {
        &self.items[index as usize]
    }
}

#[cfg(test)]
mod tests {
    use glam::vec3;

    use super::*;
    use crate::mesh::tests::two_triangles;

    #[test]
    fn from_mesh() {
        let target = BvhPrimitives::from_mesh(&two_triangles());

        assert_eq!(2, target.len());

        assert_eq!(
            BoundingBox::new(vec3(0.0, 0.0, 0.0), vec3(1.0, 1.0, 0.0)),
            target[0].bounds
        );

        assert_eq!(
            BoundingBox::new(vec3(5.0, 5.0, 0.0), vec3(6.0, 6.0, 0.0)),
            target[1].bounds
        );

        assert_eq!(vec3(17.0 / 3.0, 16.0 / 3.0, 0.0), target[1].center);

        assert_eq!(
            BoundingBox::new(vec3(0.0, 0.0, 0.0), vec3(6.0, 6.0, 0.0)),
            target.bounds_of(&[0, 1])
        );
    }

    #[test]
    fn degenerate_triangle() {
        let point = vec3(1.0, 2.0, 3.0);
        let target = BvhPrimitive::from_positions([point; 3]);

        assert_eq!(BoundingBox::new(point, point), target.bounds);
        assert_eq!(point, target.center);
        assert_eq!(0.0, target.bounds.half_area());
    }
}
