// src/terrain/map_generator.rs
use crate::terrain::height_map::HeightMap;
use crate::terrain::noise::{generate_falloff_map, generate_noise_map, NoiseParams};
use crate::terrain::regions::{classify, ColorMap, RegionBand};

/// Height and color fields for one chunk.
#[derive(Debug, Clone)]
pub struct MapData {
    pub height_map: HeightMap,
    pub color_map: ColorMap,
}

/// Assembles per-chunk map data: fractal noise, optional falloff carving,
/// then region classification.
///
/// The generator owns no mutable state; workers invoke `generate` through a
/// shared reference while the falloff mask is computed once up front.
#[derive(Debug, Clone)]
pub struct MapGenerator {
    noise: NoiseParams,
    regions: Vec<RegionBand>,
    map_size: usize,
    falloff: Option<HeightMap>,
}

impl MapGenerator {
    pub fn new(
        noise: NoiseParams,
        regions: Vec<RegionBand>,
        map_size: usize,
        use_falloff: bool,
    ) -> Self {
        let falloff = use_falloff.then(|| generate_falloff_map(map_size));
        MapGenerator {
            noise,
            regions,
            map_size,
            falloff,
        }
    }

    pub fn map_size(&self) -> usize {
        self.map_size
    }

    /// Generate the field for a chunk at the given world offset (in cells,
    /// added on top of the configured base offset).
    pub fn generate(&self, world_offset: [f32; 2]) -> MapData {
        let params = NoiseParams {
            offset: [
                self.noise.offset[0] + world_offset[0],
                self.noise.offset[1] + world_offset[1],
            ],
            ..self.noise.clone()
        };

        let mut height_map = generate_noise_map(self.map_size, self.map_size, &params);

        if let Some(falloff) = &self.falloff {
            for y in 0..self.map_size {
                for x in 0..self.map_size {
                    let carved = (height_map.get(x, y) - falloff.get(x, y)).clamp(0.0, 1.0);
                    height_map.set(x, y, carved);
                }
            }
        }

        let color_map = classify(&height_map, &self.regions);

        MapData {
            height_map,
            color_map,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::noise::Normalization;

    fn test_generator(use_falloff: bool) -> MapGenerator {
        let noise = NoiseParams {
            seed: 7,
            scale: 20.0,
            normalization: Normalization::Local,
            ..Default::default()
        };
        let regions = vec![
            RegionBand::new("water", 0.4, [0, 0, 255]),
            RegionBand::new("land", 1.0, [0, 255, 0]),
        ];
        MapGenerator::new(noise, regions, 24, use_falloff)
    }

    // Height and color fields stay parallel
    #[test]
    fn test_fields_share_dimensions() {
        let data = test_generator(false).generate([0.0, 0.0]);
        assert_eq!(data.height_map.width(), 24);
        assert_eq!(data.color_map.width(), 24);
        assert_eq!(data.color_map.pixels().len(), 24 * 24);
    }

    // Repeated generation at the same offset is identical
    #[test]
    fn test_generation_deterministic() {
        let generator = test_generator(true);
        let a = generator.generate([48.0, -24.0]);
        let b = generator.generate([48.0, -24.0]);
        assert_eq!(a.height_map, b.height_map);
        assert_eq!(a.color_map, b.color_map);
    }

    // Falloff carving pulls the border down to water level
    #[test]
    fn test_falloff_carves_borders() {
        let carved = test_generator(true).generate([0.0, 0.0]);
        let size = carved.height_map.width();

        for x in 0..size {
            assert!(carved.height_map.get(x, 0) < 0.05);
            assert!(carved.height_map.get(x, size - 1) < 0.05);
        }
    }
}
