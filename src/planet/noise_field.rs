//! Fractal Noise Displacement
//!
//! Multi-octave coherent noise applied as a radial displacement: each vertex
//! is pushed outward or inward along its existing radial direction, which
//! adds terrain-like relief while preserving the sphere topology.

use glam::Vec3;
use noise::{NoiseFn, Perlin};

/// Input positions are scaled by this constant before sampling, which sets
/// the terrain feature size relative to the unit-sphere geometry.
pub const SHAPE_SCALE: f64 = 200.0;

/// Octaves double in frequency each step...
const LACUNARITY: f64 = 2.0;
/// ...and halve in amplitude.
const GAIN: f64 = 0.5;

/// Fractal-sum noise field over Perlin noise.
pub struct NoiseField {
    perlin: Perlin,
    /// Number of octaves summed; 0 disables displacement entirely.
    pub octaves: u32,
    /// Feature-scale multiplier applied on top of `SHAPE_SCALE`.
    pub frequency: f32,
    /// Peak elevation of the first octave, in planet radii.
    pub amplitude: f32,
}

impl NoiseField {
    pub fn new(seed: u32, octaves: u32, frequency: f32, amplitude: f32) -> Self {
        Self {
            perlin: Perlin::new(seed),
            octaves,
            frequency,
            amplitude,
        }
    }

    /// Fractal-sum elevation at a point. Exactly 0.0 when `octaves == 0`.
    pub fn elevation(&self, pos: Vec3) -> f32 {
        let base = pos.as_dvec3() * SHAPE_SCALE * self.frequency as f64;

        let mut sum = 0.0_f64;
        let mut frequency = 1.0_f64;
        let mut amplitude = self.amplitude as f64;
        for _ in 0..self.octaves {
            let p = base * frequency;
            sum += amplitude * self.perlin.get([p.x, p.y, p.z]);
            frequency *= LACUNARITY;
            amplitude *= GAIN;
        }
        sum as f32
    }

    /// Push a position radially by its elevation:
    /// `new_pos = pos * (1 + elevation / |pos|)`.
    ///
    /// A zero-length position has no radial direction and is returned
    /// unchanged rather than producing NaN.
    pub fn displace(&self, pos: Vec3) -> Vec3 {
        let radius = pos.length();
        if radius <= f32::EPSILON {
            return pos;
        }
        let elevation = self.elevation(pos);
        pos * (1.0 + elevation / radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_octaves_zero_elevation() {
        let field = NoiseField::new(1, 0, 1.0, 0.05);
        let pos = Vec3::new(0.3, -0.7, 0.64).normalize();
        assert_eq!(field.elevation(pos), 0.0);
        assert_eq!(field.displace(pos), pos);
    }

    #[test]
    fn test_displacement_is_radial() {
        let field = NoiseField::new(7, 4, 1.0, 0.05);
        let pos = Vec3::new(0.1, 0.9, -0.4).normalize();
        let displaced = field.displace(pos);
        // Same direction, possibly different length
        let dot = displaced.normalize().dot(pos);
        assert!((dot - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_elevation_deterministic_per_position() {
        let field = NoiseField::new(42, 5, 1.3, 0.02);
        let pos = Vec3::new(-0.5, 0.5, 0.7).normalize();
        assert_eq!(field.elevation(pos), field.elevation(pos));
    }

    #[test]
    fn test_zero_position_unchanged() {
        let field = NoiseField::new(1, 4, 1.0, 0.05);
        assert_eq!(field.displace(Vec3::ZERO), Vec3::ZERO);
    }

    #[test]
    fn test_elevation_bounded_by_geometric_series() {
        // |sum| <= amplitude * (1 + 1/2 + 1/4 + ...) < 2 * amplitude
        let amplitude = 0.05;
        let field = NoiseField::new(3, 8, 1.0, amplitude);
        for i in 0..32 {
            let t = i as f32 / 32.0 * std::f32::consts::TAU;
            let pos = Vec3::new(t.cos(), 0.2, t.sin()).normalize();
            assert!(field.elevation(pos).abs() < 2.0 * amplitude);
        }
    }
}
