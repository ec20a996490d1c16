//! Icosahedron Base Mesh
//!
//! The canonical 12-vertex / 20-face golden-ratio icosahedron, normalized to
//! the unit sphere. Every planet starts from these 20 triangles as the roots
//! of the subdivision tree.

use glam::Vec3;

use super::types::{PlanetVertex, Triangle};

/// Base color before elevation tinting (mid grey).
const SEED_COLOR: [f32; 4] = [0.5, 0.5, 0.5, 1.0];

/// The 12 unit-sphere vertices of the icosahedron.
pub fn vertices() -> Vec<PlanetVertex> {
    let phi = (1.0 + 5.0_f32.sqrt()) / 2.0;

    [
        Vec3::new(-1.0, phi, 0.0),
        Vec3::new(1.0, phi, 0.0),
        Vec3::new(-1.0, -phi, 0.0),
        Vec3::new(1.0, -phi, 0.0),
        Vec3::new(0.0, -1.0, phi),
        Vec3::new(0.0, 1.0, phi),
        Vec3::new(0.0, -1.0, -phi),
        Vec3::new(0.0, 1.0, -phi),
        Vec3::new(phi, 0.0, -1.0),
        Vec3::new(phi, 0.0, 1.0),
        Vec3::new(-phi, 0.0, -1.0),
        Vec3::new(-phi, 0.0, 1.0),
    ]
    .iter()
    .map(|v| PlanetVertex::at(v.normalize(), SEED_COLOR))
    .collect()
}

/// The 20 faces, counter-clockwise from outside.
pub fn faces() -> Vec<Triangle> {
    vec![
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ]
}
