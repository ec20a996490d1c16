//! Procedural Icosphere Planet
//!
//! An adaptively subdivided icosphere with fractal noise relief. The
//! `Planet` controller owns the base icosahedron, the LOD tree, the noise
//! field, and the tunable parameters, and exposes one combined draw mesh
//! plus a generation counter so the renderer can tell when to re-upload.

pub mod chunk;
pub mod icosahedron;
pub mod noise_field;
pub mod params;
pub mod subdivide;
pub mod tree;
pub mod types;

use glam::{Mat4, Quat, Vec3};

use noise_field::NoiseField;
use tree::TriangleTree;
use types::{MeshData, MidpointCache, PlanetVertex};

pub use params::PlanetParams;

pub struct Planet {
    params: PlanetParams,
    noise: NoiseField,
    /// Undisplaced unit-sphere vertices shared by the whole tree. Chunks
    /// displace local copies; this array stays on the sphere.
    vertices: Vec<PlanetVertex>,
    cache: MidpointCache,
    tree: TriangleTree,
    mesh: MeshData,
    /// Bumped whenever `mesh` changes; frame slots compare against it.
    generation: u64,
    /// Accumulated Y spin in radians.
    rotation: f32,
}

impl Planet {
    pub fn new(mut params: PlanetParams) -> Self {
        params.clamp();
        let noise = noise_from(&params);
        let vertices = icosahedron::vertices();
        let faces = icosahedron::faces();
        let tree = TriangleTree::new(&faces, &vertices, params.chunk_depth, &noise);

        let mut planet = Self {
            params,
            noise,
            vertices,
            cache: MidpointCache::new(),
            tree,
            mesh: MeshData::new(),
            generation: 0,
            rotation: 0.0,
        };
        planet.rebuild_mesh();
        planet
    }

    /// Replace the parameter set. Geometry-affecting changes rebuild the
    /// whole generation from the icosahedron; display-only changes are free.
    pub fn apply_params(&mut self, mut params: PlanetParams) {
        params.clamp();
        let regenerate = self.params.geometry_differs(&params);
        self.params = params;

        if regenerate {
            log::info!(
                "[planet] rebuilding generation: freq={} octaves={} amp={} depth={}",
                self.params.frequency,
                self.params.octaves,
                self.params.amplitude,
                self.params.chunk_depth
            );
            // A new generation starts from the icosahedron: fresh vertex
            // array, fresh cache, fresh tree. Midpoint indices from the old
            // generation must never leak into the new one.
            self.noise = noise_from(&self.params);
            self.vertices = icosahedron::vertices();
            self.cache.clear();
            self.tree = TriangleTree::new(
                &icosahedron::faces(),
                &self.vertices,
                self.params.chunk_depth,
                &self.noise,
            );
            self.rebuild_mesh();
        }
    }

    pub fn params(&self) -> &PlanetParams {
        &self.params
    }

    /// Advance one frame: spin the planet and refine the LOD tree toward
    /// the camera. Returns true if the draw mesh changed.
    pub fn update(&mut self, eye_world: Vec3, dt: f32) -> bool {
        self.rotation += self.params.rotation_speed.to_radians() * dt;

        // Refinement happens in planet-local space.
        let eye_local = self
            .model_matrix()
            .inverse()
            .transform_point3(eye_world);

        let changed = self.tree.update(
            eye_local,
            &mut self.vertices,
            &mut self.cache,
            self.params.max_lod,
            self.params.chunk_depth,
            &self.noise,
        );
        if changed {
            self.rebuild_mesh();
        }
        changed
    }

    fn rebuild_mesh(&mut self) {
        self.tree.collect_mesh(&mut self.mesh);
        self.generation += 1;
        log::debug!(
            "[planet] mesh generation {}: {} leaves, {} triangles",
            self.generation,
            self.tree.leaf_count(),
            self.mesh.triangle_count()
        );
    }

    pub fn mesh(&self) -> &MeshData {
        &self.mesh
    }

    /// Monotonic mesh version; changes exactly when `mesh()` changes.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.params.scale),
            Quat::from_rotation_y(self.rotation),
            self.params.position_vec(),
        )
    }

    pub fn leaf_count(&self) -> usize {
        self.tree.leaf_count()
    }
}

fn noise_from(params: &PlanetParams) -> NoiseField {
    NoiseField::new(
        params.seed,
        params.octaves,
        params.frequency,
        params.amplitude,
    )
}
