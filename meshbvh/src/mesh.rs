use glam::{vec3, Vec3};

use crate::{gpu, Error, Result};

/// Triangle soup, as produced by a mesh loader.
///
/// Positions and normals are flat `[x, y, z, x, y, z, ...]` arrays; each
/// triangle is described by three vertex indices and three normal indices
/// (all 0-based).
///
/// The constructor checks that everything is in bounds, so the rest of the
/// pipeline can index freely.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    positions: Vec<f32>,
    normals: Vec<f32>,
    vert_idx: Vec<u32>,
    norm_idx: Vec<u32>,
}

impl Mesh {
    pub fn new(
        positions: Vec<f32>,
        normals: Vec<f32>,
        vert_idx: Vec<u32>,
        norm_idx: Vec<u32>,
    ) -> Result<Self> {
        check_multiple_of_3("positions", &positions)?;
        check_multiple_of_3("normals", &normals)?;
        check_multiple_of_3("vertex indices", &vert_idx)?;
        check_multiple_of_3("normal indices", &norm_idx)?;

        if vert_idx.len() != norm_idx.len() {
            return Err(Error::MalformedIndices {
                vertices: vert_idx.len() / 3,
                normals: norm_idx.len() / 3,
            });
        }

        if vert_idx.is_empty() {
            return Err(Error::EmptyMesh);
        }

        check_bounds("vertex indices", &vert_idx, positions.len() / 3)?;
        check_bounds("normal indices", &norm_idx, normals.len() / 3)?;

        Ok(Self {
            positions,
            normals,
            vert_idx,
            norm_idx,
        })
    }

    /// Builds a mesh where each triangle has its own, unshared vertices.
    pub fn from_triangles(
        triangles: impl IntoIterator<Item = gpu::Triangle>,
    ) -> Result<Self> {
        let mut positions = Vec::new();
        let mut normals = Vec::new();

        for triangle in triangles {
            positions
                .extend(triangle.positions.iter().flat_map(|p| p.to_array()));

            normals.extend(triangle.normals.iter().flat_map(|n| n.to_array()));
        }

        let indices: Vec<u32> = (0..(positions.len() / 3) as u32).collect();

        Self::new(positions, normals, indices.clone(), indices)
    }

    pub fn triangle_count(&self) -> usize {
        self.vert_idx.len() / 3
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn normals(&self) -> &[f32] {
        &self.normals
    }

    pub fn triangle_positions(&self, triangle_id: u32) -> [Vec3; 3] {
        let base = 3 * triangle_id as usize;

        [0, 1, 2].map(|corner| {
            read_vec3(&self.positions, self.vert_idx[base + corner])
        })
    }

    pub fn triangle_normals(&self, triangle_id: u32) -> [Vec3; 3] {
        let base = 3 * triangle_id as usize;

        [0, 1, 2].map(|corner| {
            read_vec3(&self.normals, self.norm_idx[base + corner])
        })
    }

    pub fn triangle(&self, triangle_id: u32) -> gpu::Triangle {
        gpu::Triangle {
            positions: self.triangle_positions(triangle_id),
            normals: self.triangle_normals(triangle_id),
        }
    }

    pub fn triangles(&self) -> impl Iterator<Item = gpu::Triangle> + '_ {
        (0..self.triangle_count() as u32).map(|id| self.triangle(id))
    }
}

fn read_vec3(values: &[f32], idx: u32) -> Vec3 {
    let idx = 3 * idx as usize;

    vec3(values[idx], values[idx + 1], values[idx + 2])
}

fn check_multiple_of_3<T>(name: &'static str, values: &[T]) -> Result<()> {
    if values.len() % 3 == 0 {
        Ok(())
    } else {
        Err(Error::MalformedAttribute {
            name,
            len: values.len(),
        })
    }
}

fn check_bounds(
    name: &'static str,
    indices: &[u32],
    count: usize,
) -> Result<()> {
    let oob = indices
        .iter()
        .enumerate()
        .find(|(_, index)| **index as usize >= count);

    if let Some((at, index)) = oob {
        Err(Error::IndexOutOfBounds {
            name,
            at,
            index: *index,
            count,
        })
    } else {
        Ok(())
    }
}
