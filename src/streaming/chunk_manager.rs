// src/streaming/chunk_manager.rs
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::{SettingsError, TerrainSettings};
use crate::streaming::chunk::{ChunkPosition, EvalOutcome, TerrainChunk};
use crate::streaming::render_sink::TerrainRenderer;
use crate::terrain::map_generator::{MapData, MapGenerator};
use crate::terrain::mesh::{generate_terrain_mesh, MeshData};
use crate::threading::GenerationQueue;

/// Result messages flowing back from pool workers to the update thread.
pub enum ChunkResult {
    MapReady(ChunkPosition, MapData),
    MeshReady {
        position: ChunkPosition,
        lod_index: usize,
        mesh: MeshData,
    },
}

/// Request counters, exposed for monitoring and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct StreamingStats {
    pub map_requests: u64,
    pub mesh_requests: u64,
    pub colliders_submitted: u64,
    pub results_applied: u64,
}

/// Owns the grid-coordinate to chunk mapping and drives the request and
/// consume cycle around a moving viewer.
///
/// All state mutation happens on the thread calling `update`; workers only
/// ever run pure generation functions on copies of their inputs and report
/// back through the queue.
pub struct ChunkManager {
    settings: TerrainSettings,
    map_generator: Arc<MapGenerator>,
    queue: GenerationQueue<ChunkResult>,

    chunks: HashMap<ChunkPosition, TerrainChunk>,
    visible_chunks: Vec<ChunkPosition>,

    viewer_position: [f32; 2],
    last_recompute_position: Option<[f32; 2]>,

    chunk_extent: f32,
    max_view_distance: f32,
    window_radius: i32,
    collider_lod_index: usize,

    stats: StreamingStats,
}

impl ChunkManager {
    /// Validate the settings and build the controller. This is the only
    /// validation point; everything downstream assumes repaired input.
    pub fn new(mut settings: TerrainSettings) -> Result<Self, SettingsError> {
        settings.validate()?;

        let chunk_extent = settings.chunk_extent();
        let max_view_distance = settings.max_view_distance();
        let window_radius = (max_view_distance / chunk_extent).round() as i32;

        let map_generator = Arc::new(MapGenerator::new(
            settings.noise.clone(),
            settings.regions.clone(),
            settings.bordered_map_size(),
            settings.streaming.use_falloff,
        ));

        let queue = GenerationQueue::new(settings.threading.worker_threads);

        tracing::info!(
            "ChunkManager ready: chunk extent {}, view distance {}, window radius {}, {} workers",
            chunk_extent,
            max_view_distance,
            window_radius,
            queue.num_threads(),
        );

        Ok(ChunkManager {
            collider_lod_index: settings.collider_lod_index(),
            settings,
            map_generator,
            queue,
            chunks: HashMap::new(),
            visible_chunks: Vec::new(),
            viewer_position: [0.0, 0.0],
            last_recompute_position: None,
            chunk_extent,
            max_view_distance,
            window_radius,
            stats: StreamingStats::default(),
        })
    }

    /// One tick of the streaming loop: reconcile finished generation work,
    /// then re-evaluate the visible window if the viewer moved far enough.
    pub fn update(&mut self, viewer: [f32; 2], sink: &mut dyn TerrainRenderer) {
        self.viewer_position = viewer;

        self.apply_results(sink);

        let moved_enough = match self.last_recompute_position {
            Some(last) => {
                let dx = viewer[0] - last[0];
                let dz = viewer[1] - last[1];
                let threshold = self.settings.streaming.move_threshold;
                dx * dx + dz * dz > threshold * threshold
            }
            None => true,
        };

        if moved_enough || self.settings.streaming.update_every_tick {
            self.last_recompute_position = Some(viewer);
            self.update_visible_chunks(sink);
        }
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn visible_chunk_count(&self) -> usize {
        self.chunks.values().filter(|chunk| chunk.is_visible()).count()
    }

    pub fn is_chunk_visible(&self, position: ChunkPosition) -> Option<bool> {
        self.chunks.get(&position).map(|chunk| chunk.is_visible())
    }

    pub fn stats(&self) -> StreamingStats {
        self.stats
    }

    // Drain the queue and fold every finished result into chunk state.
    // Results for chunks that left the window are applied all the same;
    // their effects are chunk-local caches.
    fn apply_results(&mut self, sink: &mut dyn TerrainRenderer) {
        for result in self.queue.drain() {
            self.stats.results_applied += 1;
            match result {
                ChunkResult::MapReady(position, map) => {
                    tracing::debug!("map data ready for chunk ({}, {})", position.x, position.z);
                    if let Some(chunk) = self.chunks.get_mut(&position) {
                        sink.submit_texture(position, &map.color_map);
                        chunk.apply_map_data(map);
                        self.evaluate_chunk(position, sink);
                    }
                }
                ChunkResult::MeshReady {
                    position,
                    lod_index,
                    mesh,
                } => {
                    tracing::debug!(
                        "mesh ready for chunk ({}, {}) lod index {}",
                        position.x,
                        position.z,
                        lod_index
                    );
                    if let Some(chunk) = self.chunks.get_mut(&position) {
                        chunk.apply_mesh(lod_index, mesh);
                        self.evaluate_chunk(position, sink);
                    }
                }
            }
        }
    }

    // Hide the previous visible set, then walk the grid window around the
    // viewer's chunk coordinate. Chunks outside the window are retained
    // but never re-evaluated, which bounds per-tick work to the window.
    fn update_visible_chunks(&mut self, sink: &mut dyn TerrainRenderer) {
        for position in std::mem::take(&mut self.visible_chunks) {
            if let Some(chunk) = self.chunks.get_mut(&position) {
                if chunk.hide() {
                    sink.set_chunk_visible(position, false);
                }
            }
        }

        let viewer_chunk_x = (self.viewer_position[0] / self.chunk_extent).round() as i32;
        let viewer_chunk_z = (self.viewer_position[1] / self.chunk_extent).round() as i32;

        for z_offset in -self.window_radius..=self.window_radius {
            for x_offset in -self.window_radius..=self.window_radius {
                let position =
                    ChunkPosition::new(viewer_chunk_x + x_offset, viewer_chunk_z + z_offset);

                if !self.chunks.contains_key(&position) {
                    self.create_chunk(position);
                }
                self.evaluate_chunk(position, sink);
            }
        }
    }

    // New chunks immediately request their map data; that request happens
    // once per chunk, ever.
    fn create_chunk(&mut self, position: ChunkPosition) {
        let chunk = TerrainChunk::new(
            position,
            self.chunk_extent,
            self.settings.lods.len(),
            self.collider_lod_index,
        );

        let generator = Arc::clone(&self.map_generator);
        let offset = chunk.world_offset();
        self.queue
            .submit(move || ChunkResult::MapReady(position, generator.generate(offset)));

        self.stats.map_requests += 1;
        tracing::debug!("created chunk ({}, {})", position.x, position.z);
        self.chunks.insert(position, chunk);
    }

    fn evaluate_chunk(&mut self, position: ChunkPosition, sink: &mut dyn TerrainRenderer) {
        let Some(chunk) = self.chunks.get_mut(&position) else {
            return;
        };

        let outcome = chunk.evaluate(
            self.viewer_position,
            &self.settings.lods,
            self.max_view_distance,
        );

        self.act_on_outcome(position, outcome, sink);
    }

    fn act_on_outcome(
        &mut self,
        position: ChunkPosition,
        outcome: EvalOutcome,
        sink: &mut dyn TerrainRenderer,
    ) {
        for lod_index in outcome.mesh_requests {
            self.request_mesh(position, lod_index);
        }

        let Some(chunk) = self.chunks.get_mut(&position) else {
            return;
        };

        if let Some(lod_index) = outcome.activated_lod {
            if let Some(mesh) = chunk.mesh(lod_index) {
                sink.submit_mesh(position, self.settings.lods[lod_index].lod, mesh);
            }
        }

        if outcome.collider_ready {
            if let Some(mesh) = chunk.collider_mesh() {
                sink.submit_collider(position, mesh);
            }
            chunk.mark_collider_submitted();
            self.stats.colliders_submitted += 1;
        }

        if let Some(visible) = outcome.visibility_changed {
            sink.set_chunk_visible(position, visible);
            if visible {
                self.visible_chunks.push(position);
            }
        }
    }

    // Mesh jobs carry their own copies of the height field and the mesh
    // settings (curve included), keeping workers free of shared state.
    fn request_mesh(&mut self, position: ChunkPosition, lod_index: usize) {
        let Some(chunk) = self.chunks.get(&position) else {
            return;
        };
        let Some(map_data) = chunk.map_data() else {
            return;
        };

        let height_map = map_data.height_map.clone();
        let mesh_settings = self.settings.mesh.clone();
        let lod = self.settings.lods[lod_index].lod;

        self.queue.submit(move || ChunkResult::MeshReady {
            position,
            lod_index,
            mesh: generate_terrain_mesh(&height_map, &mesh_settings, lod),
        });

        self.stats.mesh_requests += 1;
        tracing::debug!(
            "requested mesh for chunk ({}, {}) lod index {}",
            position.x,
            position.z,
            lod_index
        );
    }
}
