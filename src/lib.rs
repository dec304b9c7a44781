//! Procedural height-field terrain: seeded fractal noise synthesis,
//! LOD mesh tessellation with seam-free chunk borders, and asynchronous
//! chunk streaming around a moving viewer.
//!
//! The crate is engine-agnostic. Finished meshes and textures leave
//! through the [`streaming::TerrainRenderer`] trait, and the only input is
//! the viewer's world position handed to [`streaming::ChunkManager::update`]
//! once per tick.

pub mod config;
pub mod streaming;
pub mod terrain;
pub mod threading;

// Re-export the main surface for convenience
pub use config::{LodBand, SettingsError, TerrainSettings};
pub use streaming::{ChunkManager, ChunkPosition, StreamingStats, TerrainRenderer};
pub use terrain::{
    generate_falloff_map, generate_noise_map, generate_terrain_mesh, HeightCurve, HeightMap,
    MapData, MapGenerator, MeshData, MeshSettings, NoiseParams, Normalization, RegionBand,
};
