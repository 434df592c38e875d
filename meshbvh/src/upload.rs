use glam::Vec4;

use crate::packer::{self, BufferChunks};
use crate::{FlatBvh, Result};

/// Something that can turn bytes into read-only GPU buffers.
pub trait BufferSink {
    type Buffer;

    fn create_read_only_buffer(
        &self,
        label: &str,
        contents: &[u8],
    ) -> Self::Buffer;

    /// Maximum size of a single buffer, in bytes.
    fn max_buffer_size(&self) -> u64;
}

/// Buffers created for a flattened tree.
///
/// Triangle arrays always come in two chunks; corner records at or past
/// `split` live in the second one.
#[derive(Debug)]
pub struct UploadedBvh<B> {
    pub nodes: B,
    pub tri_positions: [B; 2],
    pub tri_normals: [B; 2],
    pub split: u32,
}

pub fn upload<S>(sink: &S, bvh: &FlatBvh) -> Result<UploadedBvh<S::Buffer>>
where
    S: BufferSink,
{
    let limit = sink.max_buffer_size();
    let tri_positions = packer::pack(&bvh.tri_positions);
    let tri_normals = packer::pack(&bvh.tri_normals);

    tri_positions.check_limit("tri_positions", limit)?;
    tri_normals.check_limit("tri_normals", limit)?;
    packer::check_single_buffer("nodes", &bvh.nodes, limit)?;

    log::debug!(
        "Uploading BVH; nodes={}, triangles={}, split={}",
        bvh.nodes.len(),
        bvh.triangle_count(),
        tri_positions.split(),
    );

    let split = tri_positions.split();
    let nodes = sink.create_read_only_buffer("bvh_nodes", bvh.nodes_bytes());

    Ok(UploadedBvh {
        nodes,
        tri_positions: upload_chunks(sink, "bvh_tri_positions", tri_positions),
        tri_normals: upload_chunks(sink, "bvh_tri_normals", tri_normals),
        split,
    })
}

fn upload_chunks<S>(
    sink: &S,
    label: &str,
    chunks: BufferChunks<'_, Vec4>,
) -> [S::Buffer; 2]
where
    S: BufferSink,
{
    [
        sink.create_read_only_buffer(
            &format!("{label}_a"),
            bytemuck::cast_slice(chunks.first()),
        ),
        sink.create_read_only_buffer(
            &format!("{label}_b"),
            bytemuck::cast_slice(chunks.second()),
        ),
    ]
}

#[cfg(feature = "wgpu")]
impl BufferSink for wgpu::Device {
    type Buffer = wgpu::Buffer;

    fn create_read_only_buffer(
        &self,
        label: &str,
        contents: &[u8],
    ) -> Self::Buffer {
        use wgpu::util::DeviceExt;

        self.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents,
            usage: wgpu::BufferUsages::STORAGE,
        })
    }

    fn max_buffer_size(&self) -> u64 {
        self.limits().max_storage_buffer_binding_size as u64
    }
}
