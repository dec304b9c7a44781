// Export all components from the terrain module
pub mod height_curve;
pub mod height_map;
pub mod map_generator;
pub mod mesh;
pub mod noise;
pub mod regions;

// Re-export main types for easier access
pub use height_curve::HeightCurve;
pub use height_map::HeightMap;
pub use map_generator::{MapData, MapGenerator};
pub use mesh::{generate_terrain_mesh, MeshData, MeshSettings};
pub use noise::{generate_falloff_map, generate_noise_map, NoiseParams, Normalization};
pub use regions::{classify, ColorMap, RegionBand};
