// src/config/terrain_settings.rs

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::terrain::mesh::{simplification_increment, MeshSettings};
use crate::terrain::noise::NoiseParams;
use crate::terrain::regions::RegionBand;

/// Errors raised while loading or validating the parameter surface.
///
/// Numeric parameters out of range are repaired by clamping instead of
/// erroring; only structural problems (malformed tables) are fatal.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("region table must be sorted ascending by threshold")]
    UnsortedRegions,
    #[error("region table must contain at least one band")]
    EmptyRegions,
    #[error("LOD table must be sorted ascending by visible distance")]
    UnsortedLods,
    #[error("LOD table must contain at least one entry")]
    EmptyLods,
    #[error("LOD {lod} does not divide the chunk into whole steps")]
    UnsupportedLod { lod: u32 },
}

/// One entry of the LOD distance table. Entries are ordered by ascending
/// visible distance; the last entry defines the maximum view distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LodBand {
    /// Simplification tier passed to the tessellator.
    pub lod: u32,
    pub visible_distance: f32,
    /// Marks the tier whose mesh also drives the physics collider.
    #[serde(default)]
    pub use_for_collider: bool,
}

/// Streaming behavior around the viewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamingSettings {
    /// Vertices per line of a full-resolution chunk mesh. The chunk's
    /// world extent and the bordered field size derive from it.
    pub chunk_vertex_count: u32,
    /// Carve each chunk's field into an island shape.
    pub use_falloff: bool,
    /// Recompute the visible set every tick instead of waiting for the
    /// viewer to move past `move_threshold`.
    pub update_every_tick: bool,
    /// World distance the viewer must travel before the visible set is
    /// recomputed.
    pub move_threshold: f32,
}

impl Default for StreamingSettings {
    fn default() -> Self {
        StreamingSettings {
            chunk_vertex_count: 239,
            use_falloff: false,
            update_every_tick: false,
            move_threshold: 25.0,
        }
    }
}

/// Worker pool sizing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadingSettings {
    /// 0 selects an automatic count (CPUs minus one).
    pub worker_threads: usize,
}

impl Default for ThreadingSettings {
    fn default() -> Self {
        ThreadingSettings { worker_threads: 0 }
    }
}

/// The full parameter surface, usually deserialized from a TOML file.
///
/// Validation happens once, at the streaming controller's constructor;
/// the generation functions themselves assume already-valid input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerrainSettings {
    #[serde(default)]
    pub noise: NoiseParams,
    #[serde(default)]
    pub mesh: MeshSettings,
    #[serde(default = "default_regions")]
    pub regions: Vec<RegionBand>,
    #[serde(default = "default_lods")]
    pub lods: Vec<LodBand>,
    #[serde(default)]
    pub streaming: StreamingSettings,
    #[serde(default)]
    pub threading: ThreadingSettings,
}

impl Default for TerrainSettings {
    fn default() -> Self {
        TerrainSettings {
            noise: NoiseParams::default(),
            mesh: MeshSettings::default(),
            regions: default_regions(),
            lods: default_lods(),
            streaming: StreamingSettings::default(),
            threading: ThreadingSettings::default(),
        }
    }
}

fn default_regions() -> Vec<RegionBand> {
    vec![
        RegionBand::new("deep water", 0.3, [26, 61, 148]),
        RegionBand::new("water", 0.4, [46, 94, 189]),
        RegionBand::new("sand", 0.45, [210, 200, 140]),
        RegionBand::new("grass", 0.55, [86, 152, 23]),
        RegionBand::new("forest", 0.7, [62, 107, 18]),
        RegionBand::new("rock", 0.9, [90, 70, 60]),
        RegionBand::new("snow", 1.0, [236, 236, 236]),
    ]
}

fn default_lods() -> Vec<LodBand> {
    vec![
        LodBand {
            lod: 0,
            visible_distance: 300.0,
            use_for_collider: true,
        },
        LodBand {
            lod: 2,
            visible_distance: 600.0,
            use_for_collider: false,
        },
        LodBand {
            lod: 4,
            visible_distance: 900.0,
            use_for_collider: false,
        },
    ]
}

impl TerrainSettings {
    /// Parse settings from a TOML string. Validation is separate; it runs
    /// when the settings are handed to the streaming controller.
    pub fn from_toml_str(input: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(input)?)
    }

    /// Read and parse a TOML settings file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Repair numeric parameters and reject malformed tables.
    ///
    /// Clamps are silent corrections, logged at warn level. Table order is
    /// a hard error: the classifier and LOD selection both walk their
    /// tables front to back and rely on ascending order.
    pub fn validate(&mut self) -> Result<(), SettingsError> {
        self.clamp_numeric_params();

        if self.regions.is_empty() {
            return Err(SettingsError::EmptyRegions);
        }
        if !is_sorted_by(&self.regions, |band| band.threshold) {
            return Err(SettingsError::UnsortedRegions);
        }

        if self.lods.is_empty() {
            return Err(SettingsError::EmptyLods);
        }
        if !is_sorted_by(&self.lods, |band| band.visible_distance) {
            return Err(SettingsError::UnsortedLods);
        }

        // Every increment must step evenly across the bordered field so
        // the decimated grid still reaches the far edge.
        let cells = self.streaming.chunk_vertex_count as usize + 1;
        for band in &self.lods {
            if cells % simplification_increment(band.lod) != 0 {
                return Err(SettingsError::UnsupportedLod { lod: band.lod });
            }
        }

        Ok(())
    }

    fn clamp_numeric_params(&mut self) {
        if self.noise.octaves < 1 {
            tracing::warn!("octaves clamped from {} to 1", self.noise.octaves);
            self.noise.octaves = 1;
        }
        if self.noise.lacunarity < 1.0 {
            tracing::warn!("lacunarity clamped from {} to 1.0", self.noise.lacunarity);
            self.noise.lacunarity = 1.0;
        }
        if !(0.0..=1.0).contains(&self.noise.persistence) {
            let clamped = self.noise.persistence.clamp(0.0, 1.0);
            tracing::warn!(
                "persistence clamped from {} to {}",
                self.noise.persistence,
                clamped
            );
            self.noise.persistence = clamped;
        }
        if self.streaming.chunk_vertex_count < 2 {
            tracing::warn!(
                "chunk_vertex_count clamped from {} to 2",
                self.streaming.chunk_vertex_count
            );
            self.streaming.chunk_vertex_count = 2;
        }
    }

    /// World-space edge length of one chunk, in cells.
    pub fn chunk_extent(&self) -> f32 {
        (self.streaming.chunk_vertex_count - 1) as f32
    }

    /// Side length of the bordered height field handed to the tessellator.
    pub fn bordered_map_size(&self) -> usize {
        self.streaming.chunk_vertex_count as usize + 2
    }

    /// Maximum view distance, defined by the last LOD table entry.
    pub fn max_view_distance(&self) -> f32 {
        self.lods.last().map(|band| band.visible_distance).unwrap_or(0.0)
    }

    /// Index into the LOD table of the collider tier. Falls back to the
    /// finest tier when none is flagged.
    pub fn collider_lod_index(&self) -> usize {
        self.lods
            .iter()
            .position(|band| band.use_for_collider)
            .unwrap_or(0)
    }
}

fn is_sorted_by<T>(items: &[T], key: impl Fn(&T) -> f32) -> bool {
    items.windows(2).all(|pair| key(&pair[0]) <= key(&pair[1]))
}
