//! Measurement math over tessellated meshes.
//!
//! The tessellator emits flat-shaded triangles, so coincident corners are
//! duplicated per face. Edge accounting welds them back together by exact
//! coordinate value before counting.

use std::collections::HashMap;

use planar_kernel::RenderMesh;

/// Axis-aligned bounding box of a mesh. Returns (min, max).
pub fn mesh_bounding_box(mesh: &RenderMesh) -> ([f32; 3], [f32; 3]) {
    assert!(
        mesh.vertices.len() >= 3,
        "mesh must have at least one vertex"
    );
    let mut min = [f32::MAX; 3];
    let mut max = [f32::MIN; 3];
    for chunk in mesh.vertices.chunks(3) {
        for i in 0..3 {
            min[i] = min[i].min(chunk[i]);
            max[i] = max[i].max(chunk[i]);
        }
    }
    (min, max)
}

/// Enclosed volume of a closed mesh via the divergence theorem. Open or
/// inconsistently wound meshes give meaningless results.
pub fn mesh_volume(mesh: &RenderMesh) -> f64 {
    let verts = &mesh.vertices;
    let mut volume = 0.0f64;
    for tri in mesh.indices.chunks(3) {
        if tri.len() < 3 {
            continue;
        }
        let p = |i: u32| {
            let at = i as usize * 3;
            (
                verts[at] as f64,
                verts[at + 1] as f64,
                verts[at + 2] as f64,
            )
        };
        let (x0, y0, z0) = p(tri[0]);
        let (x1, y1, z1) = p(tri[1]);
        let (x2, y2, z2) = p(tri[2]);
        // Signed volume of the tetrahedron against the origin.
        volume += x0 * (y1 * z2 - y2 * z1) + x1 * (y2 * z0 - y0 * z2) + x2 * (y0 * z1 - y1 * z0);
    }
    (volume / 6.0).abs()
}

/// Total surface area of a mesh.
pub fn mesh_surface_area(mesh: &RenderMesh) -> f64 {
    let verts = &mesh.vertices;
    let mut area = 0.0f64;
    for tri in mesh.indices.chunks(3) {
        if tri.len() < 3 {
            continue;
        }
        let (i0, i1, i2) = (
            tri[0] as usize * 3,
            tri[1] as usize * 3,
            tri[2] as usize * 3,
        );
        let ax = (verts[i1] - verts[i0]) as f64;
        let ay = (verts[i1 + 1] - verts[i0 + 1]) as f64;
        let az = (verts[i1 + 2] - verts[i0 + 2]) as f64;
        let bx = (verts[i2] - verts[i0]) as f64;
        let by = (verts[i2 + 1] - verts[i0 + 1]) as f64;
        let bz = (verts[i2 + 2] - verts[i0 + 2]) as f64;
        let cx = ay * bz - az * by;
        let cy = az * bx - ax * bz;
        let cz = ax * by - ay * bx;
        area += (cx * cx + cy * cy + cz * cz).sqrt() / 2.0;
    }
    area
}

/// Count unique mesh edges after welding duplicated corners. Returns
/// (total_edges, boundary_edges); a watertight mesh has zero boundary
/// edges, each edge being shared by exactly two triangles.
pub fn count_mesh_edges(mesh: &RenderMesh) -> (usize, usize) {
    // Zero signs are normalized so -0.0 and 0.0 weld together.
    let bits = |v: f32| if v == 0.0 { 0.0f32.to_bits() } else { v.to_bits() };
    let mut canon: HashMap<[u32; 3], u32> = HashMap::new();
    let mut remap = Vec::with_capacity(mesh.vertices.len() / 3);
    for chunk in mesh.vertices.chunks(3) {
        let key = [bits(chunk[0]), bits(chunk[1]), bits(chunk[2])];
        let next = canon.len() as u32;
        remap.push(*canon.entry(key).or_insert(next));
    }

    let mut edge_counts: HashMap<(u32, u32), usize> = HashMap::new();
    for tri in mesh.indices.chunks(3) {
        if tri.len() < 3 {
            continue;
        }
        let t = [
            remap[tri[0] as usize],
            remap[tri[1] as usize],
            remap[tri[2] as usize],
        ];
        for &(a, b) in &[(t[0], t[1]), (t[1], t[2]), (t[2], t[0])] {
            *edge_counts.entry((a.min(b), a.max(b))).or_insert(0) += 1;
        }
    }

    let total = edge_counts.len();
    let boundary = edge_counts.values().filter(|&&c| c == 1).count();
    (total, boundary)
}
