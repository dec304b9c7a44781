// src/terrain/regions.rs
use serde::{Deserialize, Serialize};

use crate::terrain::height_map::HeightMap;

/// One color band of the region table. A sample belongs to the first band
/// whose threshold its height does not exceed, so the table must be sorted
/// ascending by threshold (enforced at the configuration boundary).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionBand {
    pub name: String,
    pub threshold: f32,
    pub color: [u8; 3],
}

impl RegionBand {
    pub fn new(name: &str, threshold: f32, color: [u8; 3]) -> Self {
        RegionBand {
            name: name.to_string(),
            threshold,
            color,
        }
    }
}

/// Per-cell region colors for a height field, handed to the render
/// consumer as a texture.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorMap {
    width: usize,
    height: usize,
    pixels: Vec<[u8; 3]>,
}

impl ColorMap {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[[u8; 3]] {
        &self.pixels
    }

    pub fn get(&self, x: usize, y: usize) -> [u8; 3] {
        self.pixels[y * self.width + x]
    }
}

/// Classify every height sample into its region color.
///
/// Heights are clamped to [0, 1] before lookup; globally normalized fields
/// carry no hard upper bound. Samples above the last threshold take the
/// last band's color.
pub fn classify(height_map: &HeightMap, bands: &[RegionBand]) -> ColorMap {
    let width = height_map.width();
    let height = height_map.height();
    let mut pixels = Vec::with_capacity(width * height);

    for y in 0..height {
        for x in 0..width {
            let sample = height_map.get(x, y).clamp(0.0, 1.0);
            pixels.push(band_color(sample, bands));
        }
    }

    ColorMap {
        width,
        height,
        pixels,
    }
}

fn band_color(sample: f32, bands: &[RegionBand]) -> [u8; 3] {
    for band in bands {
        if sample <= band.threshold {
            return band.color;
        }
    }
    bands.last().map(|band| band.color).unwrap_or([0, 0, 0])
}
