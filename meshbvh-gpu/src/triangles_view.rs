use glam::{Vec4, Vec4Swizzles};

use crate::Triangle;

/// View into an array of `vec4` records that has been uploaded as two
/// separate buffers.
///
/// `split` is the number of records in the first buffer; reads at or past it
/// get redirected into the second one.
#[derive(Clone, Copy)]
pub struct ChunkedView<'a> {
    first: &'a [Vec4],
    second: &'a [Vec4],
    split: u32,
}

impl<'a> ChunkedView<'a> {
    pub fn new(first: &'a [Vec4], second: &'a [Vec4], split: u32) -> Self {
        Self {
            first,
            second,
            split,
        }
    }

    /// Creates a view for an array that fits in a single buffer.
    pub fn single(buffer: &'a [Vec4]) -> Self {
        Self::new(buffer, &[], buffer.len() as u32)
    }

    pub fn get(&self, idx: u32) -> Vec4 {
        if idx < self.split {
            self.first[idx as usize]
        } else {
            self.second[(idx - self.split) as usize]
        }
    }

    pub fn len(&self) -> usize {
        self.first.len() + self.second.len()
    }
}

/// View into the reordered triangle arrays - three records per triangle, one
/// per corner.
#[derive(Clone, Copy)]
pub struct TrianglesView<'a> {
    positions: ChunkedView<'a>,
    normals: ChunkedView<'a>,
}

impl<'a> TrianglesView<'a> {
    pub fn new(positions: ChunkedView<'a>, normals: ChunkedView<'a>) -> Self {
        Self { positions, normals }
    }

    pub fn get(&self, triangle_id: u32) -> Triangle {
        let base = 3 * triangle_id;

        Triangle {
            positions: [0, 1, 2]
                .map(|corner| self.positions.get(base + corner).xyz()),
            normals: [0, 1, 2]
                .map(|corner| self.normals.get(base + corner).xyz()),
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len() / 3
    }
}
