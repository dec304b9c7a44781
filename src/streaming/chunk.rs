// src/streaming/chunk.rs
use serde::{Deserialize, Serialize};

use crate::config::LodBand;
use crate::terrain::map_generator::MapData;
use crate::terrain::mesh::MeshData;

/// Unique identifier for a chunk based on its grid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkPosition {
    pub x: i32,
    pub z: i32,
}

impl ChunkPosition {
    pub fn new(x: i32, z: i32) -> Self {
        ChunkPosition { x, z }
    }
}

// One cached mesh tier. `requested` stays set from submission until the
// result lands, which is what keeps a (chunk, LOD) pair from ever having
// two requests in flight.
#[derive(Debug, Default)]
struct LodSlot {
    requested: bool,
    mesh: Option<MeshData>,
}

/// What a single evaluation pass decided for a chunk. The controller turns
/// these into render-sink calls and queue submissions.
#[derive(Debug, Default)]
pub(crate) struct EvalOutcome {
    pub visibility_changed: Option<bool>,
    /// LOD table index whose cached mesh just became current.
    pub activated_lod: Option<usize>,
    /// LOD table indices that need a mesh build submitted.
    pub mesh_requests: Vec<usize>,
    /// The collider tier's cached mesh should be handed to physics.
    pub collider_ready: bool,
}

/// Per-chunk state: world bounds, received map data, the per-LOD mesh
/// cache and visibility. Chunks are created on first sight and never
/// destroyed; going out of range only hides them.
pub struct TerrainChunk {
    position: ChunkPosition,
    center: [f32; 2],
    half_extent: f32,

    map_data: Option<MapData>,
    lod_slots: Vec<LodSlot>,
    collider_index: usize,
    collider_submitted: bool,

    current_lod: Option<usize>,
    visible: bool,
}

impl TerrainChunk {
    pub(crate) fn new(position: ChunkPosition, chunk_extent: f32, lod_count: usize, collider_index: usize) -> Self {
        let center = [
            position.x as f32 * chunk_extent,
            position.z as f32 * chunk_extent,
        ];
        TerrainChunk {
            position,
            center,
            half_extent: chunk_extent / 2.0,
            map_data: None,
            lod_slots: (0..lod_count).map(|_| LodSlot::default()).collect(),
            collider_index,
            collider_submitted: false,
            current_lod: None,
            visible: false,
        }
    }

    pub fn position(&self) -> ChunkPosition {
        self.position
    }

    /// World-cell offset of this chunk's field inside the infinite plane.
    pub fn world_offset(&self) -> [f32; 2] {
        self.center
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn has_map_data(&self) -> bool {
        self.map_data.is_some()
    }

    pub fn current_lod(&self) -> Option<usize> {
        self.current_lod
    }

    pub(crate) fn map_data(&self) -> Option<&MapData> {
        self.map_data.as_ref()
    }

    pub(crate) fn mesh(&self, lod_index: usize) -> Option<&MeshData> {
        self.lod_slots[lod_index].mesh.as_ref()
    }

    pub(crate) fn collider_mesh(&self) -> Option<&MeshData> {
        self.lod_slots[self.collider_index].mesh.as_ref()
    }

    // Map data arrives exactly once per chunk; later results for already
    // satisfied chunks would be a controller bug, not a race.
    pub(crate) fn apply_map_data(&mut self, map: MapData) {
        debug_assert!(self.map_data.is_none());
        self.map_data = Some(map);
    }

    pub(crate) fn apply_mesh(&mut self, lod_index: usize, mesh: MeshData) {
        let slot = &mut self.lod_slots[lod_index];
        slot.requested = false;
        slot.mesh = Some(mesh);
    }

    pub(crate) fn mark_collider_submitted(&mut self) {
        self.collider_submitted = true;
    }

    /// Squared distance from a point to this chunk's bounds; zero inside.
    pub fn sqr_distance_to(&self, point: [f32; 2]) -> f32 {
        let dx = ((point[0] - self.center[0]).abs() - self.half_extent).max(0.0);
        let dz = ((point[1] - self.center[1]).abs() - self.half_extent).max(0.0);
        dx * dx + dz * dz
    }

    /// Force-hide the chunk (used when the visible window moves away).
    /// Returns true if the flag actually flipped.
    pub(crate) fn hide(&mut self) -> bool {
        let was_visible = self.visible;
        self.visible = false;
        was_visible
    }

    /// Re-evaluate visibility and LOD against the viewer position.
    ///
    /// Does nothing until map data has been received. Issues at most one
    /// mesh request per LOD slot over the chunk's lifetime per tier, and
    /// records everything the controller must act on.
    pub(crate) fn evaluate(
        &mut self,
        viewer: [f32; 2],
        lods: &[LodBand],
        max_view_distance: f32,
    ) -> EvalOutcome {
        let mut outcome = EvalOutcome::default();
        if self.map_data.is_none() {
            return outcome;
        }

        let distance = self.sqr_distance_to(viewer).sqrt();
        let visible = distance <= max_view_distance;

        if visible {
            // Nearer chunks take finer tiers: walk the table and keep
            // stepping while the distance exceeds each threshold.
            let mut lod_index = 0;
            for (index, band) in lods[..lods.len() - 1].iter().enumerate() {
                if distance > band.visible_distance {
                    lod_index = index + 1;
                } else {
                    break;
                }
            }

            if self.current_lod != Some(lod_index) {
                let slot = &mut self.lod_slots[lod_index];
                if slot.mesh.is_some() {
                    self.current_lod = Some(lod_index);
                    outcome.activated_lod = Some(lod_index);
                } else if !slot.requested {
                    slot.requested = true;
                    outcome.mesh_requests.push(lod_index);
                }
            }

            // The nearest tier also keeps the physics mesh current.
            if lod_index == 0 && !self.collider_submitted {
                let slot = &mut self.lod_slots[self.collider_index];
                if slot.mesh.is_some() {
                    outcome.collider_ready = true;
                } else if !slot.requested {
                    slot.requested = true;
                    outcome.mesh_requests.push(self.collider_index);
                }
            }
        }

        if visible != self.visible {
            self.visible = visible;
            outcome.visibility_changed = Some(visible);
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::map_generator::MapGenerator;
    use crate::terrain::noise::{NoiseParams, Normalization};
    use crate::terrain::regions::RegionBand;

    fn test_lods() -> Vec<LodBand> {
        vec![
            LodBand {
                lod: 0,
                visible_distance: 20.0,
                use_for_collider: true,
            },
            LodBand {
                lod: 1,
                visible_distance: 40.0,
                use_for_collider: false,
            },
            LodBand {
                lod: 2,
                visible_distance: 60.0,
                use_for_collider: false,
            },
        ]
    }

    fn chunk_with_map() -> TerrainChunk {
        let mut chunk = TerrainChunk::new(ChunkPosition::new(0, 0), 10.0, 3, 0);
        let generator = MapGenerator::new(
            NoiseParams {
                normalization: Normalization::Local,
                ..Default::default()
            },
            vec![RegionBand::new("land", 1.0, [0, 255, 0])],
            13,
            false,
        );
        chunk.apply_map_data(generator.generate([0.0, 0.0]));
        chunk
    }

    // Point-to-bounds distance is zero inside and grows outside
    #[test]
    fn test_sqr_distance_to_bounds() {
        let chunk = TerrainChunk::new(ChunkPosition::new(0, 0), 10.0, 1, 0);
        assert_eq!(chunk.sqr_distance_to([0.0, 0.0]), 0.0);
        assert_eq!(chunk.sqr_distance_to([4.9, 0.0]), 0.0);
        assert!((chunk.sqr_distance_to([15.0, 0.0]) - 100.0).abs() < 1e-4);
        assert!((chunk.sqr_distance_to([11.0, 13.0]) - 100.0).abs() < 1e-3);
    }

    // Without map data, evaluation is a no-op
    #[test]
    fn test_no_evaluation_before_map_data() {
        let mut chunk = TerrainChunk::new(ChunkPosition::new(0, 0), 10.0, 3, 0);
        let outcome = chunk.evaluate([0.0, 0.0], &test_lods(), 60.0);
        assert!(outcome.visibility_changed.is_none());
        assert!(outcome.mesh_requests.is_empty());
        assert!(!chunk.is_visible());
    }

    // Distance walks the table toward coarser tiers
    #[test]
    fn test_lod_selection_by_distance() {
        let lods = test_lods();

        let mut chunk = chunk_with_map();
        let near = chunk.evaluate([0.0, 0.0], &lods, 60.0);
        assert_eq!(near.mesh_requests, vec![0]);

        let mut chunk = chunk_with_map();
        let mid = chunk.evaluate([35.0, 0.0], &lods, 60.0);
        assert_eq!(mid.mesh_requests, vec![1]);

        let mut chunk = chunk_with_map();
        let far = chunk.evaluate([60.0, 0.0], &lods, 60.0);
        assert_eq!(far.mesh_requests, vec![2]);

        let mut chunk = chunk_with_map();
        let outcome = chunk.evaluate([100.0, 0.0], &lods, 60.0);
        assert!(outcome.mesh_requests.is_empty());
        assert!(!chunk.is_visible());
    }

    // Two evaluations before the result lands issue exactly one request
    #[test]
    fn test_no_duplicate_inflight_requests() {
        let mut chunk = chunk_with_map();
        let lods = test_lods();

        let first = chunk.evaluate([30.0, 0.0], &lods, 60.0);
        assert_eq!(first.mesh_requests, vec![1]);

        let second = chunk.evaluate([30.0, 0.0], &lods, 60.0);
        assert!(second.mesh_requests.is_empty());

        // A different tier is a different request.
        let third = chunk.evaluate([55.0, 0.0], &lods, 60.0);
        assert_eq!(third.mesh_requests, vec![2]);
    }

    // A cached mesh is reused instead of re-requested
    #[test]
    fn test_cached_mesh_reused() {
        let mut chunk = chunk_with_map();
        let lods = test_lods();

        let first = chunk.evaluate([30.0, 0.0], &lods, 60.0);
        assert_eq!(first.mesh_requests, vec![1]);

        chunk.apply_mesh(1, MeshData::new(false));
        let after_apply = chunk.evaluate([30.0, 0.0], &lods, 60.0);
        assert_eq!(after_apply.activated_lod, Some(1));
        assert_eq!(chunk.current_lod(), Some(1));

        // Step away far enough to switch tiers, then back; the cache
        // answers immediately instead of issuing a new request.
        chunk.apply_mesh(2, MeshData::new(false));
        let away = chunk.evaluate([55.0, 0.0], &lods, 60.0);
        assert_eq!(away.activated_lod, Some(2));

        let back = chunk.evaluate([30.0, 0.0], &lods, 60.0);
        assert_eq!(back.activated_lod, Some(1));
        assert!(back.mesh_requests.is_empty());
    }

    // The nearest tier requests the collider exactly once
    #[test]
    fn test_collider_request_at_nearest_lod() {
        let mut chunk = chunk_with_map();
        let lods = test_lods();

        let near = chunk.evaluate([0.0, 0.0], &lods, 60.0);
        // Tier 0 doubles as the collider tier, so a single request covers
        // both consumers.
        assert_eq!(near.mesh_requests, vec![0]);
        assert!(!near.collider_ready);

        chunk.apply_mesh(0, MeshData::new(false));
        let ready = chunk.evaluate([0.0, 0.0], &lods, 60.0);
        assert!(ready.collider_ready);

        chunk.mark_collider_submitted();
        let settled = chunk.evaluate([0.0, 0.0], &lods, 60.0);
        assert!(!settled.collider_ready);
    }
}
