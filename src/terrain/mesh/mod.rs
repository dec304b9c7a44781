pub mod mesh_data;
pub mod tessellator;

pub use mesh_data::{MeshData, VertexId};
pub use tessellator::{generate_terrain_mesh, simplification_increment, MeshSettings};
