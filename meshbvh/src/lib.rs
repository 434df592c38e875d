//! Bounding volume hierarchy over triangle meshes, flattened into buffers a
//! GPU ray tracer can traverse.
//!
//! The pipeline runs once, before rendering:
//!
//! ```text
//! Mesh -> BvhPrimitives -> (SahBuilder | LbvhBuilder) -> Bvh -> FlatBvh
//!                                                              -> pack()
//! ```

mod bvh;
mod config;
mod error;
mod mesh;
mod packer;
mod upload;
mod utils;

pub use meshbvh_gpu as gpu;

pub use self::bvh::*;
pub use self::config::*;
pub use self::error::*;
pub use self::mesh::*;
pub use self::packer::{pack, pack_with_limit, BufferChunks};
pub use self::upload::*;
pub use self::utils::*;

/// Builds a tree over all triangles of `mesh`.
pub fn build(mesh: &Mesh, config: &BvhConfig) -> Result<Bvh> {
    if config.leaf_capacity() == 0 {
        return Err(Error::InvalidLeafCapacity);
    }

    log::debug!(
        "Building BVH; triangles={}, builder={:?}, leaf_capacity={}",
        mesh.triangle_count(),
        config.builder(),
        config.leaf_capacity(),
    );

    let primitives =
        utils::measure("bvh.preprocess", || BvhPrimitives::from_mesh(mesh));

    let bvh = utils::measure("bvh.build", || match config.builder() {
        BuilderKind::Sah => {
            SahBuilder.build(&primitives, config.leaf_capacity())
        }

        BuilderKind::Lbvh => LbvhBuilder::new(config.morton_split())
            .build(&primitives, config.leaf_capacity()),
    });

    let depth = bvh.depth();

    log::debug!("BVH built; nodes={}, depth={}", bvh.nodes().len(), depth);

    if depth >= gpu::BVH_STACK_SIZE {
        log::warn!(
            "BVH is deeper than the traversal stack; depth={}, stack={}",
            depth,
            gpu::BVH_STACK_SIZE,
        );
    }

    Ok(bvh)
}

/// Flattens `bvh` (built for `mesh`) into upload-ready arrays.
pub fn flatten(mesh: &Mesh, bvh: &Bvh) -> FlatBvh {
    utils::measure("bvh.flatten", || bvh::serialize(mesh, bvh))
}
