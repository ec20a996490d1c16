//! Triangle Chunks
//!
//! A chunk is the leaf-level mesh patch of the LOD tree: one seed triangle
//! subdivided to a fixed depth, noise-displaced, colored, and normal-computed
//! into an independent vertex/index pair. Each chunk owns its own midpoint
//! cache scoped to its own construction, so chunk generation never touches
//! the planet-level vertex array.
//!
//! Boundary-continuity policy: the 3 seed corner vertices (local indices
//! 0..3) are exempt from noise displacement. Neighboring chunks receive
//! bit-identical seed positions from the shared planet-level vertex array,
//! so exempted corners match exactly across chunk boundaries; interior edge
//! vertices agree because displacement is a pure function of position.

use glam::Vec3;

use super::noise_field::NoiseField;
use super::subdivide::{compute_normals, subdivide_pass};
use super::types::{MeshData, MidpointCache, PlanetVertex, Triangle};

/// Number of leading seed vertices exempt from displacement.
const SEED_VERTEX_COUNT: usize = 3;

/// An independently generated mesh patch for one leaf triangle.
pub struct TriangleChunk {
    pub mesh: MeshData,
}

impl TriangleChunk {
    /// Generate the patch: subdivide `depth` times, displace non-seed
    /// vertices, color by elevation/latitude, compute smooth normals.
    pub fn generate(seed: [PlanetVertex; 3], depth: u32, noise: &NoiseField) -> Self {
        let mut vertices: Vec<PlanetVertex> = seed.to_vec();
        let mut triangles: Vec<Triangle> = vec![[0, 1, 2]];
        let mut cache = MidpointCache::new();

        for _ in 0..depth {
            // One dedup epoch per pass
            cache.clear();
            triangles = subdivide_pass(&triangles, &mut vertices, &mut cache);
        }

        // Radial displacement, seed corners exempt
        for vertex in vertices.iter_mut().skip(SEED_VERTEX_COUNT) {
            vertex.position = noise.displace(vertex.pos()).into();
        }

        // Elevation/latitude tint
        for vertex in vertices.iter_mut() {
            let pos = vertex.pos();
            let elevation = pos.length() - 1.0;
            vertex.color = terrain_color(pos, elevation / noise.amplitude.max(1e-6));
        }

        compute_normals(&mut vertices, &triangles);

        let mut mesh = MeshData::new();
        mesh.vertices = vertices;
        mesh.indices = triangles.iter().flatten().copied().collect();

        Self { mesh }
    }

    pub fn vertex_count(&self) -> usize {
        self.mesh.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.mesh.triangle_count()
    }
}

/// Map a sphere position and relative elevation (elevation / amplitude,
/// roughly -2..2) to a terrain tint.
fn terrain_color(pos: Vec3, relative_elevation: f32) -> [f32; 4] {
    let latitude = (pos.y / pos.length().max(1e-6)).abs();

    if relative_elevation < -0.3 {
        // Ocean basins - deep blue
        [0.15, 0.3, 0.6, 1.0]
    } else if relative_elevation < 0.05 {
        // Coast - sandy tan
        [0.78, 0.72, 0.5, 1.0]
    } else if latitude > 0.8 || relative_elevation > 1.2 {
        // Polar caps and peaks - snow
        [0.92, 0.94, 0.96, 1.0]
    } else if relative_elevation > 0.7 {
        // High ground - rock grey
        [0.55, 0.52, 0.5, 1.0]
    } else if latitude < 0.3 {
        // Tropics - bright green
        [0.22, 0.55, 0.25, 1.0]
    } else {
        // Temperate - muted green
        [0.32, 0.48, 0.28, 1.0]
    }
}
