use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("mesh contains no triangles")]
    EmptyMesh,

    #[error("{name} contain {len} values, which is not a multiple of 3")]
    MalformedAttribute { name: &'static str, len: usize },

    #[error(
        "vertex indices describe {vertices} triangles, but normal indices \
         describe {normals}"
    )]
    MalformedIndices { vertices: usize, normals: usize },

    #[error("{name}[{at}] = {index} is out of bounds (count: {count})")]
    IndexOutOfBounds {
        name: &'static str,
        at: usize,
        index: u32,
        count: usize,
    },

    #[error("leaf capacity must be at least 1")]
    InvalidLeafCapacity,

    #[error(
        "buffer `{label}` takes {size} bytes, which exceeds the limit of \
         {limit} bytes"
    )]
    BufferTooLarge {
        label: &'static str,
        size: u64,
        limit: u64,
    },
}
