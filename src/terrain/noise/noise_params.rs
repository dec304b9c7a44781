// src/terrain/noise/noise_params.rs
use serde::{Deserialize, Serialize};

/// How a generated field is rescaled into renderable range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Normalization {
    /// Rescale against the min/max observed in this field. Adjacent fields
    /// normalize differently, so this suits single, non-tiled maps only.
    Local,
    /// Divide against the theoretical maximum amplitude sum. Fields sampled
    /// at different world offsets stay height-consistent with each other,
    /// which endless terrain requires.
    Global,
}

/// Parameters for fractal noise synthesis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoiseParams {
    pub seed: u64,
    pub scale: f32,
    pub octaves: u32,
    /// Frequency growth per octave.
    pub lacunarity: f32,
    /// Amplitude decay per octave, in [0, 1].
    pub persistence: f32,
    pub offset: [f32; 2],
    pub normalization: Normalization,
}

impl Default for NoiseParams {
    fn default() -> Self {
        NoiseParams {
            seed: 0,
            scale: 50.0,
            octaves: 4,
            lacunarity: 2.0,
            persistence: 0.5,
            offset: [0.0, 0.0],
            normalization: Normalization::Global,
        }
    }
}

impl NoiseParams {
    /// Theoretical maximum of the accumulated octave amplitudes,
    /// `sum(persistence^i)` for i in [0, octaves).
    pub fn max_amplitude(&self) -> f32 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        for _ in 0..self.octaves {
            total += amplitude;
            amplitude *= self.persistence;
        }
        total
    }
}
