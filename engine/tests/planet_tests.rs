//! Planet Tests - Subdivision Counts, Watertightness, and LOD Behavior
//!
//! Tests for the planet geometry system: icosphere subdivision math, chunk
//! boundary continuity under noise displacement, and the planet controller's
//! generation counter.

use glam::Vec3;
use icoplanet_engine::planet::chunk::TriangleChunk;
use icoplanet_engine::planet::icosahedron;
use icoplanet_engine::planet::noise_field::NoiseField;
use icoplanet_engine::planet::params::PlanetParams;
use icoplanet_engine::planet::subdivide::subdivide_pass;
use icoplanet_engine::planet::types::{MidpointCache, PlanetVertex};
use icoplanet_engine::planet::Planet;

// ============================================================================
// Icosphere Subdivision Math
// ============================================================================

#[test]
fn test_one_pass_gives_42_vertices_80_triangles() {
    let mut vertices = icosahedron::vertices();
    let mut cache = MidpointCache::new();
    let triangles = subdivide_pass(&icosahedron::faces(), &mut vertices, &mut cache);

    assert_eq!(vertices.len(), 42);
    assert_eq!(triangles.len(), 80);
}

#[test]
fn test_subdivision_counts_follow_closed_form() {
    // V(k) = 12 + 30 * (4^k - 1) / 3, T(k) = 20 * 4^k
    let mut vertices = icosahedron::vertices();
    let mut triangles = icosahedron::faces();

    for k in 1..=3u32 {
        let mut cache = MidpointCache::new();
        triangles = subdivide_pass(&triangles, &mut vertices, &mut cache);

        let expected_vertices = 12 + 30 * (4_usize.pow(k) - 1) / 3;
        let expected_triangles = 20 * 4_usize.pow(k);
        assert_eq!(vertices.len(), expected_vertices, "vertices at depth {}", k);
        assert_eq!(triangles.len(), expected_triangles, "triangles at depth {}", k);
    }
}

#[test]
fn test_closed_manifold_edge_count() {
    // Each pass over a closed manifold dedups 3T/2 edges
    let mut vertices = icosahedron::vertices();
    let mut cache = MidpointCache::new();
    subdivide_pass(&icosahedron::faces(), &mut vertices, &mut cache);

    assert_eq!(cache.len(), 30); // 3 * 20 / 2
}

#[test]
fn test_subdivided_sphere_stays_unit() {
    let mut vertices = icosahedron::vertices();
    let mut triangles = icosahedron::faces();
    for _ in 0..3 {
        let mut cache = MidpointCache::new();
        triangles = subdivide_pass(&triangles, &mut vertices, &mut cache);
    }

    for v in &vertices {
        assert!((v.pos().length() - 1.0).abs() < 1e-5);
    }
}

#[test]
fn test_all_indices_in_range() {
    let mut vertices = icosahedron::vertices();
    let mut cache = MidpointCache::new();
    let triangles = subdivide_pass(&icosahedron::faces(), &mut vertices, &mut cache);

    for tri in &triangles {
        for &i in tri {
            assert!((i as usize) < vertices.len());
        }
    }
}

// ============================================================================
// Chunk Boundary Continuity
// ============================================================================

/// Recursively midpoint-subdivide one edge the same way chunk subdivision
/// does, giving the expected boundary vertex positions.
fn edge_points(a: Vec3, b: Vec3, depth: u32) -> Vec<Vec3> {
    let mut points = vec![a, b];
    for _ in 0..depth {
        let mut next = Vec::with_capacity(points.len() * 2 - 1);
        for pair in points.windows(2) {
            next.push(pair[0]);
            next.push(((pair[0] + pair[1]) * 0.5).normalize());
        }
        next.push(*points.last().unwrap());
        points = next;
    }
    points
}

#[test]
fn test_adjacent_chunks_share_boundary_vertices() {
    let noise = NoiseField::new(11, 5, 1.2, 0.04);
    let depth = 2;

    // Two triangles sharing the edge (b, c)
    let a = Vec3::new(1.0, 0.2, 0.1).normalize();
    let b = Vec3::new(0.1, 1.0, 0.2).normalize();
    let c = Vec3::new(0.2, 0.1, 1.0).normalize();
    let d = Vec3::new(-0.5, 0.8, 0.6).normalize();

    let grey = [0.5, 0.5, 0.5, 1.0];
    let chunk_one = TriangleChunk::generate(
        [
            PlanetVertex::at(a, grey),
            PlanetVertex::at(b, grey),
            PlanetVertex::at(c, grey),
        ],
        depth,
        &noise,
    );
    let chunk_two = TriangleChunk::generate(
        [
            PlanetVertex::at(d, grey),
            PlanetVertex::at(c, grey),
            PlanetVertex::at(b, grey),
        ],
        depth,
        &noise,
    );

    // Boundary positions depend only on the shared edge endpoints, so both
    // chunks must contain every expected point bit-for-bit close.
    let mut expected = edge_points(b, c, depth);
    // Interior edge points are displaced; the seed endpoints are exempt
    for point in expected.iter_mut() {
        if *point != b && *point != c {
            *point = noise.displace(*point);
        }
    }

    for point in &expected {
        for chunk in [&chunk_one, &chunk_two] {
            let found = chunk
                .mesh
                .vertices
                .iter()
                .any(|v| (v.pos() - *point).length() < 1e-5);
            assert!(found, "boundary point {:?} missing from a chunk", point);
        }
    }
}

#[test]
fn test_chunk_generation_is_deterministic() {
    let noise = NoiseField::new(3, 4, 1.0, 0.05);
    let grey = [0.5, 0.5, 0.5, 1.0];
    let seed = [
        PlanetVertex::at(Vec3::X, grey),
        PlanetVertex::at(Vec3::Y, grey),
        PlanetVertex::at(Vec3::Z, grey),
    ];

    let first = TriangleChunk::generate(seed, 3, &noise);
    let second = TriangleChunk::generate(seed, 3, &noise);

    assert_eq!(first.mesh.indices, second.mesh.indices);
    for (u, v) in first.mesh.vertices.iter().zip(&second.mesh.vertices) {
        assert_eq!(u.position, v.position);
    }
}

// ============================================================================
// Planet Controller
// ============================================================================

#[test]
fn test_zero_octaves_gives_perfect_sphere() {
    let planet = Planet::new(PlanetParams {
        octaves: 0,
        chunk_depth: 2,
        ..Default::default()
    });

    for vertex in &planet.mesh().vertices {
        assert!((vertex.pos().length() - 1.0).abs() < 1e-5);
    }
}

#[test]
fn test_generation_stable_without_camera_motion() {
    let mut planet = Planet::new(PlanetParams {
        chunk_depth: 1,
        max_lod: 3,
        rotation_speed: 0.0,
        ..Default::default()
    });
    let eye = Vec3::new(0.0, 0.0, 3.0);

    // Let refinement settle
    for _ in 0..10 {
        planet.update(eye, 0.016);
    }
    let generation = planet.generation();

    for _ in 0..5 {
        assert!(!planet.update(eye, 0.016));
    }
    assert_eq!(planet.generation(), generation);
}

#[test]
fn test_approach_refines_and_retreat_coarsens() {
    let mut planet = Planet::new(PlanetParams {
        chunk_depth: 1,
        max_lod: 4,
        rotation_speed: 0.0,
        ..Default::default()
    });

    let far = Vec3::new(0.0, 0.0, 60.0);
    for _ in 0..10 {
        planet.update(far, 0.016);
    }
    let coarse_leaves = planet.leaf_count();

    let near = Vec3::new(0.0, 0.0, 1.1);
    for _ in 0..10 {
        planet.update(near, 0.016);
    }
    assert!(planet.leaf_count() > coarse_leaves);

    for _ in 0..20 {
        planet.update(far, 0.016);
    }
    assert_eq!(planet.leaf_count(), coarse_leaves);
}

#[test]
fn test_preset_roundtrip_through_json() {
    let params = PlanetParams {
        octaves: 7,
        frequency: 2.5,
        ..Default::default()
    };
    let json = serde_json::to_string(&params).unwrap();
    let restored: PlanetParams = serde_json::from_str(&json).unwrap();
    assert_eq!(restored.octaves, 7);
    assert_eq!(restored.frequency, 2.5);
}
