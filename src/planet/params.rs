//! Planet Parameters
//!
//! The runtime-tunable parameter set. Owned by the `Planet` controller and
//! passed by reference to whoever needs it; there are no globals. Presets
//! can be loaded from JSON files with the same field names.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Parameter clamp ranges, shared with the UI sliders.
pub const FREQUENCY_RANGE: (f32, f32) = (0.1, 8.0);
pub const OCTAVE_RANGE: (u32, u32) = (0, 10);
pub const MAX_LOD_RANGE: (u32, u32) = (0, 8);
pub const CHUNK_DEPTH_RANGE: (u32, u32) = (0, 5);
pub const AMPLITUDE_RANGE: (f32, f32) = (0.0, 0.2);
pub const SCALE_RANGE: (f32, f32) = (0.1, 3.0);

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanetParams {
    /// Noise feature-scale multiplier.
    pub frequency: f32,
    /// Fractal octave count; 0 gives a perfect sphere.
    pub octaves: u32,
    /// Noise seed.
    pub seed: u32,
    /// First-octave displacement amplitude in planet radii.
    pub amplitude: f32,
    /// Maximum tree refinement level.
    pub max_lod: u32,
    /// Fixed subdivision depth inside each leaf chunk.
    pub chunk_depth: u32,

    /// World-space placement.
    pub position: [f32; 3],
    /// Y-axis spin in degrees per second.
    pub rotation_speed: f32,
    /// Uniform scale.
    pub scale: f32,

    pub wireframe: bool,
    pub vsync: bool,
}

impl Default for PlanetParams {
    fn default() -> Self {
        Self {
            frequency: 1.0,
            octaves: 5,
            seed: 7,
            amplitude: 0.03,
            max_lod: 5,
            chunk_depth: 3,
            position: [0.0, 0.0, 0.0],
            rotation_speed: 2.0,
            scale: 1.0,
            wireframe: false,
            vsync: true,
        }
    }
}

impl PlanetParams {
    /// Load a preset from a JSON file. Missing fields fall back to defaults;
    /// out-of-range values are clamped.
    pub fn load_preset(path: &str) -> Result<Self, PresetError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| PresetError::Io(path.to_string(), e))?;
        let mut params: Self =
            serde_json::from_str(&text).map_err(|e| PresetError::Parse(path.to_string(), e))?;
        params.clamp();
        Ok(params)
    }

    pub fn clamp(&mut self) {
        self.frequency = self.frequency.clamp(FREQUENCY_RANGE.0, FREQUENCY_RANGE.1);
        self.octaves = self.octaves.clamp(OCTAVE_RANGE.0, OCTAVE_RANGE.1);
        self.amplitude = self.amplitude.clamp(AMPLITUDE_RANGE.0, AMPLITUDE_RANGE.1);
        self.max_lod = self.max_lod.clamp(MAX_LOD_RANGE.0, MAX_LOD_RANGE.1);
        self.chunk_depth = self
            .chunk_depth
            .clamp(CHUNK_DEPTH_RANGE.0, CHUNK_DEPTH_RANGE.1);
        self.scale = self.scale.clamp(SCALE_RANGE.0, SCALE_RANGE.1);
    }

    /// True if `other` differs in a way that requires regenerating chunks.
    pub fn geometry_differs(&self, other: &Self) -> bool {
        self.frequency != other.frequency
            || self.octaves != other.octaves
            || self.seed != other.seed
            || self.amplitude != other.amplitude
            || self.chunk_depth != other.chunk_depth
    }

    pub fn position_vec(&self) -> Vec3 {
        Vec3::from(self.position)
    }
}

#[derive(Debug)]
pub enum PresetError {
    Io(String, std::io::Error),
    Parse(String, serde_json::Error),
}

impl std::fmt::Display for PresetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(path, e) => write!(f, "failed to read preset '{}': {}", path, e),
            Self::Parse(path, e) => write!(f, "failed to parse preset '{}': {}", path, e),
        }
    }
}

impl std::error::Error for PresetError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_in_range() {
        let mut params = PlanetParams::default();
        let before = serde_json::to_string(&params).unwrap();
        params.clamp();
        assert_eq!(serde_json::to_string(&params).unwrap(), before);
    }

    #[test]
    fn test_clamp_limits_extremes() {
        let mut params = PlanetParams {
            frequency: 1000.0,
            octaves: 99,
            max_lod: 99,
            chunk_depth: 99,
            ..Default::default()
        };
        params.clamp();
        assert_eq!(params.frequency, FREQUENCY_RANGE.1);
        assert_eq!(params.octaves, OCTAVE_RANGE.1);
        assert_eq!(params.max_lod, MAX_LOD_RANGE.1);
        assert_eq!(params.chunk_depth, CHUNK_DEPTH_RANGE.1);
    }

    #[test]
    fn test_partial_preset_uses_defaults() {
        let params: PlanetParams = serde_json::from_str(r#"{"octaves": 3}"#).unwrap();
        assert_eq!(params.octaves, 3);
        assert_eq!(params.frequency, PlanetParams::default().frequency);
    }

    #[test]
    fn test_geometry_differs_ignores_display_settings() {
        let a = PlanetParams::default();
        let mut b = a.clone();
        b.wireframe = !b.wireframe;
        b.rotation_speed += 1.0;
        b.max_lod += 1;
        assert!(!a.geometry_differs(&b));

        b.octaves += 1;
        assert!(a.geometry_differs(&b));
    }
}
