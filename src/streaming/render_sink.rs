// src/streaming/render_sink.rs
use crate::streaming::chunk::ChunkPosition;
use crate::terrain::mesh::MeshData;
use crate::terrain::regions::ColorMap;

/// The narrow contract toward the host engine's rendering side.
///
/// The streaming controller hands over finished buffers and visibility
/// flips; material assignment, uploads and scene management stay with the
/// implementor. Calls always arrive on the thread that drives
/// `ChunkManager::update`.
pub trait TerrainRenderer {
    /// A chunk's color field arrived; upload it as the chunk texture.
    fn submit_texture(&mut self, position: ChunkPosition, color_map: &ColorMap);

    /// A chunk's render mesh for the given LOD tier is ready.
    fn submit_mesh(&mut self, position: ChunkPosition, lod: u32, mesh: &MeshData);

    /// The collider-tier mesh is ready for physics use.
    fn submit_collider(&mut self, position: ChunkPosition, mesh: &MeshData);

    /// Show or hide a chunk. Cheap to call; underlying data stays alive.
    fn set_chunk_visible(&mut self, position: ChunkPosition, visible: bool);
}
