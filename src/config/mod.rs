pub mod terrain_settings;

pub use terrain_settings::{
    LodBand, SettingsError, StreamingSettings, TerrainSettings, ThreadingSettings,
};
