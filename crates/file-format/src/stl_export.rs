use planar_kernel::RenderMesh;

use crate::errors::ExportError;

/// Output filetypes the exporter can produce.
pub const SUPPORTED_FILETYPES: &[&str] = &[".stl"];

/// Check an `output_filetype` value (with its leading dot) against the
/// supported set.
pub fn check_filetype(filetype: &str) -> Result<(), ExportError> {
    if SUPPORTED_FILETYPES.contains(&filetype) {
        return Ok(());
    }
    Err(ExportError::UnsupportedFiletype {
        requested: filetype.to_string(),
    })
}

/// Encode a mesh as a binary STL file.
///
/// 80-byte header, little-endian u32 facet count, then 50 bytes per facet.
/// Facet normals are recomputed from the triangle winding rather than taken
/// from the mesh, since STL consumers expect them consistent with vertex
/// order.
pub fn stl_bytes(mesh: &RenderMesh) -> Result<Vec<u8>, ExportError> {
    let count = mesh.triangle_count();
    if count == 0 {
        return Err(ExportError::EmptyMesh);
    }
    let vertex_count = (mesh.vertices.len() / 3) as u32;
    if let Some(&index) = mesh.indices.iter().find(|&&i| i >= vertex_count) {
        return Err(ExportError::BadIndex {
            index,
            count: vertex_count,
        });
    }

    let mut out = Vec::with_capacity(84 + count * 50);
    let mut header = [0u8; 80];
    let tag = b"binary stl; millimeters";
    header[..tag.len()].copy_from_slice(tag);
    out.extend_from_slice(&header);
    out.extend_from_slice(&(count as u32).to_le_bytes());

    for tri in mesh.indices.chunks_exact(3) {
        let a = vertex(mesh, tri[0]);
        let b = vertex(mesh, tri[1]);
        let c = vertex(mesh, tri[2]);
        for value in facet_normal(a, b, c)
            .into_iter()
            .chain(a)
            .chain(b)
            .chain(c)
        {
            out.extend_from_slice(&value.to_le_bytes());
        }
        // Attribute byte count, unused.
        out.extend_from_slice(&0u16.to_le_bytes());
    }
    Ok(out)
}

fn vertex(mesh: &RenderMesh, index: u32) -> [f32; 3] {
    let base = index as usize * 3;
    [
        mesh.vertices[base],
        mesh.vertices[base + 1],
        mesh.vertices[base + 2],
    ]
}

fn facet_normal(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> [f32; 3] {
    let u = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
    let v = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
    let n = [
        u[1] * v[2] - u[2] * v[1],
        u[2] * v[0] - u[0] * v[2],
        u[0] * v[1] - u[1] * v[0],
    ];
    let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
    if len <= f32::EPSILON {
        // Degenerate sliver; a zero normal tells the consumer to derive it.
        return [0.0, 0.0, 0.0];
    }
    [n[0] / len, n[1] / len, n[2] / len]
}
