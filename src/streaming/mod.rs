// Export all components from the streaming module
pub mod chunk;
pub mod chunk_manager;
pub mod render_sink;

// Re-export main types for easier access
pub use chunk::{ChunkPosition, TerrainChunk};
pub use chunk_manager::{ChunkManager, ChunkResult, StreamingStats};
pub use render_sink::TerrainRenderer;
