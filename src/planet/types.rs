//! Planet Geometry Types
//!
//! Base data types for mesh construction: the GPU vertex, triangle indices,
//! the canonical edge key, and the midpoint-dedup cache that keeps
//! subdivision watertight.

use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

// ============================================================================
// GPU VERTEX
// ============================================================================

/// Vertex for the planet mesh.
///
/// Mutable in place during subdivision, displacement, and normal passes;
/// treated as immutable once uploaded. UV and tangent ride along for the
/// shader interface but are untouched by the planet path.
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct PlanetVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    pub tangent: [f32; 3],
}

// 15 floats = 60 bytes; must match the vertex buffer layout in pipeline.rs
static_assertions::assert_eq_size!(PlanetVertex, [u8; 60]);

impl PlanetVertex {
    /// Vertex at a position with a flat color; normal points radially
    /// outward (correct for an undisplaced sphere, recomputed after noise).
    pub fn at(position: Vec3, color: [f32; 4]) -> Self {
        Self {
            position: position.into(),
            color,
            normal: position.normalize_or_zero().into(),
            uv: [0.0, 0.0],
            tangent: [0.0, 0.0, 0.0],
        }
    }

    pub fn pos(&self) -> Vec3 {
        Vec3::from(self.position)
    }
}

// ============================================================================
// TOPOLOGY
// ============================================================================

/// Exactly 3 indices into a vertex array. Value type, no ownership.
pub type Triangle = [u32; 3];

/// Canonical unordered edge: always `(min, max)`.
///
/// A pure function rather than in-place swapping, so both triangles sharing
/// an edge produce the identical key regardless of their winding.
pub fn edge_key(a: u32, b: u32) -> (u32, u32) {
    if a < b { (a, b) } else { (b, a) }
}

/// Midpoint-dedup cache for one subdivision epoch.
///
/// Maps a canonical edge to the single midpoint vertex created for it, so
/// two triangles subdividing a shared edge reuse one vertex and the mesh
/// stays free of duplicates and T-junctions. The cache is only valid against
/// one vertex-array generation: stale indices corrupt later lookups, so it
/// must be cleared (or freshly allocated) before indices are reused.
#[derive(Default)]
pub struct MidpointCache {
    map: HashMap<(u32, u32), u32>,
}

impl MidpointCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, a: u32, b: u32) -> Option<u32> {
        self.map.get(&edge_key(a, b)).copied()
    }

    pub fn insert(&mut self, a: u32, b: u32, midpoint: u32) {
        self.map.insert(edge_key(a, b), midpoint);
    }

    /// Number of deduplicated edges seen this epoch. For a closed manifold
    /// subdivided in one pass this equals `3 * triangle_count / 2`.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Invalidate the cache for a new vertex-array generation.
    pub fn clear(&mut self) {
        self.map.clear();
    }
}

// ============================================================================
// MESH DATA
// ============================================================================

/// CPU-side mesh: interleaved vertices plus 32-bit indices.
#[derive(Default)]
pub struct MeshData {
    pub vertices: Vec<PlanetVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append another mesh, rebasing its indices.
    pub fn merge(&mut self, other: &MeshData) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Largest `(vertex_count, index_count)` prefix that fits the given
    /// buffer capacities. Keeps whole triangles only, and drops trailing
    /// triangles whose indices reference vertices past the vertex cut, so
    /// the clamped range never draws from uninitialized buffer space.
    /// Merged meshes append chunks with ascending index ranges, which is why
    /// scanning back from the tail finds every out-of-range triangle.
    pub fn clamped_counts(&self, max_vertices: usize, max_indices: usize) -> (usize, usize) {
        let vertex_count = self.vertices.len().min(max_vertices);
        let mut index_count = self.indices.len().min(max_indices);
        index_count -= index_count % 3;
        while index_count > 0
            && self.indices[index_count - 3..index_count]
                .iter()
                .any(|&i| i as usize >= vertex_count)
        {
            index_count -= 3;
        }
        (vertex_count, index_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_key_canonical() {
        assert_eq!(edge_key(7, 3), (3, 7));
        assert_eq!(edge_key(3, 7), (3, 7));
    }

    #[test]
    fn test_midpoint_cache_symmetric_lookup() {
        let mut cache = MidpointCache::new();
        cache.insert(1, 5, 42);
        assert_eq!(cache.get(5, 1), Some(42));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_mesh_merge_rebases_indices() {
        let mut a = MeshData::new();
        a.vertices.push(PlanetVertex::at(glam::Vec3::X, [1.0; 4]));
        a.indices.push(0);

        let mut b = MeshData::new();
        b.vertices.push(PlanetVertex::at(glam::Vec3::Y, [1.0; 4]));
        b.indices.push(0);

        a.merge(&b);
        assert_eq!(a.indices, vec![0, 1]);
        assert_eq!(a.vertices.len(), 2);
    }

    fn mesh_with(vertex_count: usize, indices: &[u32]) -> MeshData {
        let mut mesh = MeshData::new();
        for _ in 0..vertex_count {
            mesh.vertices.push(PlanetVertex::at(glam::Vec3::X, [1.0; 4]));
        }
        mesh.indices.extend_from_slice(indices);
        mesh
    }

    #[test]
    fn test_clamped_counts_untouched_when_mesh_fits() {
        let mesh = mesh_with(3, &[0, 1, 2]);
        assert_eq!(mesh.clamped_counts(100, 100), (3, 3));
    }

    #[test]
    fn test_clamped_counts_keeps_whole_triangles() {
        let mesh = mesh_with(6, &[0, 1, 2, 3, 4, 5]);
        // An index cap mid-triangle rounds down to the previous triangle
        assert_eq!(mesh.clamped_counts(100, 5), (6, 3));
    }

    #[test]
    fn test_clamped_counts_drops_triangles_past_vertex_cut() {
        // Two chunks of 3 vertices each; the vertex cap cuts the second
        // chunk, so its triangle must go even though the index cap fits it.
        let mesh = mesh_with(6, &[0, 1, 2, 3, 4, 5]);
        assert_eq!(mesh.clamped_counts(4, 100), (4, 3));
    }

    #[test]
    fn test_clamped_counts_can_drop_everything() {
        let mesh = mesh_with(3, &[0, 1, 2]);
        assert_eq!(mesh.clamped_counts(2, 100), (2, 0));
    }
}
