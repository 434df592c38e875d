//! Structs and algorithms shared between the BVH builder and its consumers.
//!
//! Everything here mirrors what a ray-tracing kernel sees once the buffers
//! are uploaded; the CPU-side traversal doubles as the reference
//! implementation of that contract.

#![allow(clippy::len_without_is_empty)]

mod bvh_node;
mod bvh_view;
mod hit;
mod ray;
mod triangle;
mod triangles_view;

pub use self::bvh_node::*;
pub use self::bvh_view::*;
pub use self::hit::*;
pub use self::ray::*;
pub use self::triangle::*;
pub use self::triangles_view::*;

/// Maximum depth of the traversal stack.
///
/// Traversal pushes at most one node per level, so trees up to this depth
/// are always traversable. Binned SAH over real meshes stays well below it.
pub const BVH_STACK_SIZE: usize = 64;
