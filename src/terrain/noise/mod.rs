pub mod falloff;
pub mod noise_map;
pub mod noise_params;

pub use falloff::generate_falloff_map;
pub use noise_map::generate_noise_map;
pub use noise_params::{NoiseParams, Normalization};
