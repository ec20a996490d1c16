//! Triangle Subdivision
//!
//! The core refinement primitive shared by the triangle tree and the chunk
//! generator: split one triangle into 4 by inserting deduplicated edge
//! midpoints. One implementation for every caller, parameterized by the
//! vertex array and cache it operates on.

use glam::Vec3;

use super::types::{MidpointCache, PlanetVertex, Triangle};

/// Split `tri` into 4 children: three corner triangles (original vertex plus
/// its two adjacent midpoints) and one center triangle (the three midpoints).
///
/// Midpoints are looked up in `cache` under the canonical edge key; a hit
/// reuses the existing index, a miss creates the vertex and records it. Both
/// triangles of a shared edge must be subdivided within the same cache epoch
/// for the mesh to stay watertight.
pub fn subdivide_triangle(
    tri: Triangle,
    vertices: &mut Vec<PlanetVertex>,
    cache: &mut MidpointCache,
) -> [Triangle; 4] {
    let [v0, v1, v2] = tri;
    let m01 = midpoint(vertices, cache, v0, v1);
    let m12 = midpoint(vertices, cache, v1, v2);
    let m20 = midpoint(vertices, cache, v2, v0);

    [
        [v0, m01, m20],
        [v1, m12, m01],
        [v2, m20, m12],
        [m01, m12, m20],
    ]
}

/// Midpoint vertex for edge (a, b): reuse the cached index or create one.
///
/// Position is the endpoint average re-projected onto the unit sphere using
/// the actual vector length; color is the 0.5 lerp of the endpoint colors.
fn midpoint(
    vertices: &mut Vec<PlanetVertex>,
    cache: &mut MidpointCache,
    a: u32,
    b: u32,
) -> u32 {
    if let Some(idx) = cache.get(a, b) {
        return idx;
    }

    let va = vertices[a as usize];
    let vb = vertices[b as usize];
    let mid = (va.pos() + vb.pos()) * 0.5;

    // Exact-length normalization keeps midpoints on the unit sphere. A
    // zero-length edge average is degenerate input; keep the raw average
    // rather than emitting NaN.
    let length = mid.length();
    let position = if length > f32::EPSILON {
        mid / length
    } else {
        log::warn!("[subdivide] degenerate edge ({}, {}), midpoint not normalized", a, b);
        mid
    };

    let color = [
        (va.color[0] + vb.color[0]) * 0.5,
        (va.color[1] + vb.color[1]) * 0.5,
        (va.color[2] + vb.color[2]) * 0.5,
        (va.color[3] + vb.color[3]) * 0.5,
    ];

    let idx = vertices.len() as u32;
    vertices.push(PlanetVertex::at(position, color));
    cache.insert(a, b, idx);
    idx
}

/// Subdivide every triangle in `triangles` once, within a single cache
/// epoch. Returns 4x the triangle count; shared edges produce one midpoint.
pub fn subdivide_pass(
    triangles: &[Triangle],
    vertices: &mut Vec<PlanetVertex>,
    cache: &mut MidpointCache,
) -> Vec<Triangle> {
    let mut out = Vec::with_capacity(triangles.len() * 4);
    for &tri in triangles {
        out.extend_from_slice(&subdivide_triangle(tri, vertices, cache));
    }
    out
}

/// Smooth normals: accumulate area-weighted face normals per vertex, then
/// normalize. Degenerate faces contribute nothing.
pub fn compute_normals(vertices: &mut [PlanetVertex], triangles: &[Triangle]) {
    let mut accum = vec![Vec3::ZERO; vertices.len()];

    for tri in triangles {
        let p0 = vertices[tri[0] as usize].pos();
        let p1 = vertices[tri[1] as usize].pos();
        let p2 = vertices[tri[2] as usize].pos();
        // Cross product magnitude is twice the face area, which gives the
        // area weighting for free.
        let face = (p1 - p0).cross(p2 - p0);
        for &i in tri {
            accum[i as usize] += face;
        }
    }

    for (vertex, normal) in vertices.iter_mut().zip(accum) {
        vertex.normal = normal.normalize_or_zero().into();
    }
}
