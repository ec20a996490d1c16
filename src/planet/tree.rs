//! LOD Triangle Tree
//!
//! One quadtree per icosahedron face, flattened into a shared node arena.
//! Internal nodes hold 4 child ids; leaves hold the generated chunk for
//! their triangle. The two are mutually exclusive: a node has children or a
//! chunk, never both, never neither.
//!
//! Refinement is distance driven with hysteresis. A leaf splits when its
//! projected size (longest edge over distance to the eye) exceeds the split
//! ratio; a parent whose children are all leaves merges only when it drops
//! below the smaller merge ratio, so a camera hovering on the boundary does
//! not split and merge every frame.

use glam::Vec3;

use super::chunk::TriangleChunk;
use super::noise_field::NoiseField;
use super::subdivide::subdivide_triangle;
use super::types::{MeshData, MidpointCache, PlanetVertex, Triangle};

/// Index into the tree's node arena.
pub type NodeId = usize;

/// A leaf splits when edge_length / eye_distance exceeds this.
const SPLIT_RATIO: f32 = 0.5;

/// A parent merges when its ratio drops below this. Strictly smaller than
/// `SPLIT_RATIO`; the gap is the hysteresis band.
const MERGE_RATIO: f32 = 0.25;

pub struct Node {
    pub triangle: Triangle,
    pub level: u32,
    pub children: Option<[NodeId; 4]>,
    pub chunk: Option<TriangleChunk>,
}

impl Node {
    fn leaf(triangle: Triangle, level: u32, chunk: TriangleChunk) -> Self {
        Self {
            triangle,
            level,
            children: None,
            chunk: Some(chunk),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }
}

/// Adaptive subdivision tree over the 20 icosahedron root faces.
pub struct TriangleTree {
    nodes: Vec<Option<Node>>,
    free: Vec<NodeId>,
    roots: Vec<NodeId>,
}

impl TriangleTree {
    /// Build the initial tree: one leaf per root face, each with a chunk.
    pub fn new(
        roots: &[Triangle],
        vertices: &[PlanetVertex],
        chunk_depth: u32,
        noise: &NoiseField,
    ) -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            free: Vec::new(),
            roots: Vec::new(),
        };
        for &tri in roots {
            let chunk = TriangleChunk::generate(seed_vertices(tri, vertices), chunk_depth, noise);
            let id = tree.alloc(Node::leaf(tri, 0, chunk));
            tree.roots.push(id);
        }
        tree
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        if let Some(id) = self.free.pop() {
            self.nodes[id] = Some(node);
            id
        } else {
            self.nodes.push(Some(node));
            self.nodes.len() - 1
        }
    }

    fn release(&mut self, id: NodeId) {
        self.nodes[id] = None;
        self.free.push(id);
    }

    fn node(&self, id: NodeId) -> &Node {
        self.nodes[id].as_ref().unwrap()
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes[id].as_mut().unwrap()
    }

    /// One refinement step toward the eye position (planet-local space).
    /// Splits oversized leaves, merges undersized parents, regenerates the
    /// affected chunks. Returns true if any topology changed.
    pub fn update(
        &mut self,
        eye: Vec3,
        vertices: &mut Vec<PlanetVertex>,
        cache: &mut MidpointCache,
        max_level: u32,
        chunk_depth: u32,
        noise: &NoiseField,
    ) -> bool {
        // Mark phase: walk the current topology without mutating it.
        let mut to_split = Vec::new();
        let mut to_merge = Vec::new();
        for &root in &self.roots {
            self.mark(root, eye, vertices, max_level, &mut to_split, &mut to_merge);
        }

        // Apply phase. Splits subdivide within one cache epoch so leaves
        // sharing an edge reuse the same midpoint vertex.
        cache.clear();
        for id in &to_split {
            self.split(*id, vertices, cache, chunk_depth, noise);
        }
        for id in &to_merge {
            self.merge(*id, vertices, chunk_depth, noise);
        }

        !to_split.is_empty() || !to_merge.is_empty()
    }

    fn mark(
        &self,
        id: NodeId,
        eye: Vec3,
        vertices: &[PlanetVertex],
        max_level: u32,
        to_split: &mut Vec<NodeId>,
        to_merge: &mut Vec<NodeId>,
    ) {
        let node = self.node(id);
        let ratio = self.screen_ratio(node.triangle, eye, vertices);

        match node.children {
            None => {
                if node.level < max_level && ratio > SPLIT_RATIO {
                    to_split.push(id);
                }
            }
            Some(children) => {
                let all_leaves = children.iter().all(|&c| self.node(c).is_leaf());
                // Also collapse anything refined past the current cap.
                if all_leaves && (ratio < MERGE_RATIO || node.level >= max_level) {
                    to_merge.push(id);
                } else {
                    for &child in &children {
                        self.mark(child, eye, vertices, max_level, to_split, to_merge);
                    }
                }
            }
        }
    }

    fn screen_ratio(&self, tri: Triangle, eye: Vec3, vertices: &[PlanetVertex]) -> f32 {
        let p0 = vertices[tri[0] as usize].pos();
        let p1 = vertices[tri[1] as usize].pos();
        let p2 = vertices[tri[2] as usize].pos();

        let edge = (p1 - p0)
            .length()
            .max((p2 - p1).length())
            .max((p0 - p2).length());
        let centroid = (p0 + p1 + p2) / 3.0;
        let distance = (centroid - eye).length().max(1e-4);

        edge / distance
    }

    fn split(
        &mut self,
        id: NodeId,
        vertices: &mut Vec<PlanetVertex>,
        cache: &mut MidpointCache,
        chunk_depth: u32,
        noise: &NoiseField,
    ) {
        let (triangle, level) = {
            let node = self.node(id);
            (node.triangle, node.level)
        };

        let child_tris = subdivide_triangle(triangle, vertices, cache);
        let mut children = [0; 4];
        for (slot, tri) in children.iter_mut().zip(child_tris) {
            let chunk = TriangleChunk::generate(seed_vertices(tri, vertices), chunk_depth, noise);
            *slot = self.alloc(Node::leaf(tri, level + 1, chunk));
        }

        let node = self.node_mut(id);
        node.children = Some(children);
        node.chunk = None;
    }

    fn merge(
        &mut self,
        id: NodeId,
        vertices: &[PlanetVertex],
        chunk_depth: u32,
        noise: &NoiseField,
    ) {
        let Some(children) = self.node(id).children else {
            return;
        };
        for child in children {
            self.release(child);
        }

        let triangle = self.node(id).triangle;
        let chunk = TriangleChunk::generate(seed_vertices(triangle, vertices), chunk_depth, noise);
        let node = self.node_mut(id);
        node.children = None;
        node.chunk = Some(chunk);
    }

    /// Append every leaf chunk into one draw mesh, depth-first so output
    /// order is stable for a given topology.
    pub fn collect_mesh(&self, out: &mut MeshData) {
        out.clear();
        for &root in &self.roots {
            self.collect_node(root, out);
        }
    }

    fn collect_node(&self, id: NodeId, out: &mut MeshData) {
        let node = self.node(id);
        match node.children {
            None => {
                // Leaf-exclusive chunk
                out.merge(&node.chunk.as_ref().unwrap().mesh);
            }
            Some(children) => {
                for &child in &children {
                    self.collect_node(child, out);
                }
            }
        }
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .flatten()
            .filter(|n| n.is_leaf())
            .count()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.iter().flatten().count()
    }

    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    pub fn max_leaf_level(&self) -> u32 {
        self.nodes
            .iter()
            .flatten()
            .filter(|n| n.is_leaf())
            .map(|n| n.level)
            .max()
            .unwrap_or(0)
    }

    #[cfg(test)]
    fn assert_invariants(&self) {
        for node in self.nodes.iter().flatten() {
            assert_eq!(
                node.children.is_none(),
                node.chunk.is_some(),
                "node must hold exactly one of children/chunk"
            );
        }
    }
}

fn seed_vertices(tri: Triangle, vertices: &[PlanetVertex]) -> [PlanetVertex; 3] {
    [
        vertices[tri[0] as usize],
        vertices[tri[1] as usize],
        vertices[tri[2] as usize],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planet::icosahedron;

    fn build(noise_octaves: u32) -> (TriangleTree, Vec<PlanetVertex>, MidpointCache, NoiseField) {
        let vertices = icosahedron::vertices();
        let faces = icosahedron::faces();
        let noise = NoiseField::new(1, noise_octaves, 1.0, 0.02);
        let tree = TriangleTree::new(&faces, &vertices, 2, &noise);
        (tree, vertices, MidpointCache::new(), noise)
    }

    #[test]
    fn test_initial_tree_is_twenty_leaves() {
        let (tree, ..) = build(0);
        assert_eq!(tree.leaf_count(), 20);
        assert_eq!(tree.node_count(), 20);
        tree.assert_invariants();
    }

    #[test]
    fn test_close_eye_splits_far_eye_merges() {
        let (mut tree, mut vertices, mut cache, noise) = build(0);

        // Eye just above the surface: nearby faces must split.
        let near = Vec3::new(0.0, 1.05, 0.0);
        let changed = tree.update(near, &mut vertices, &mut cache, 3, 2, &noise);
        assert!(changed);
        assert!(tree.node_count() > 20);
        tree.assert_invariants();

        // Eye far away: everything merges back to the roots.
        let far = Vec3::new(0.0, 50.0, 0.0);
        for _ in 0..8 {
            tree.update(far, &mut vertices, &mut cache, 3, 2, &noise);
        }
        assert_eq!(tree.leaf_count(), 20);
        tree.assert_invariants();
    }

    #[test]
    fn test_depth_cap_holds() {
        let (mut tree, mut vertices, mut cache, noise) = build(0);
        let eye = Vec3::new(0.0, 1.001, 0.0);
        for _ in 0..10 {
            tree.update(eye, &mut vertices, &mut cache, 2, 2, &noise);
        }
        assert!(tree.max_leaf_level() <= 2);
        tree.assert_invariants();
    }

    #[test]
    fn test_lowering_cap_collapses_deep_nodes() {
        let (mut tree, mut vertices, mut cache, noise) = build(0);
        let eye = Vec3::new(0.0, 1.01, 0.0);
        for _ in 0..6 {
            tree.update(eye, &mut vertices, &mut cache, 4, 2, &noise);
        }
        assert!(tree.max_leaf_level() > 1);

        for _ in 0..8 {
            tree.update(eye, &mut vertices, &mut cache, 1, 2, &noise);
        }
        assert!(tree.max_leaf_level() <= 1);
        tree.assert_invariants();
    }

    #[test]
    fn test_arena_recycles_freed_nodes() {
        let (mut tree, mut vertices, mut cache, noise) = build(0);
        let near = Vec3::new(0.0, 1.05, 0.0);
        let far = Vec3::new(0.0, 50.0, 0.0);

        for _ in 0..4 {
            tree.update(near, &mut vertices, &mut cache, 3, 2, &noise);
        }
        let grown = tree.nodes.len();
        for _ in 0..8 {
            tree.update(far, &mut vertices, &mut cache, 3, 2, &noise);
        }
        assert!(tree.free_count() > 0);

        // Splitting again reuses freed slots instead of growing the arena.
        for _ in 0..4 {
            tree.update(near, &mut vertices, &mut cache, 3, 2, &noise);
        }
        assert!(tree.nodes.len() <= grown);
    }

    #[test]
    fn test_collect_mesh_covers_all_leaves() {
        let (mut tree, mut vertices, mut cache, noise) = build(0);
        tree.update(Vec3::new(0.0, 1.05, 0.0), &mut vertices, &mut cache, 3, 2, &noise);

        let mut mesh = MeshData::new();
        tree.collect_mesh(&mut mesh);
        // Each leaf contributes 4^chunk_depth triangles.
        assert_eq!(mesh.triangle_count(), tree.leaf_count() * 16);
    }
}
