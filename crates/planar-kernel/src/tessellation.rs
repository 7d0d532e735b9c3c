//! Flat-shaded meshing of prism parts.
//!
//! Caps are ear-clipped with `earcutr`; side walls loft the base ring to the
//! taper-offset top ring, which stays index-matched by construction.
//! Subtracted parts mesh as reverse-wound shells nested inside the material,
//! the winding-rule form slicers resolve into voids. No triangle clipping
//! happens, which is exact for the nested-difference solids this kernel
//! accepts.

use nalgebra::Matrix4;

use crate::planar::Part;
use crate::types::{KernelError, Point2, Point3, RenderMesh};
use crate::xform::linear_determinant;

pub(crate) fn mesh_solid(parts: &[Part]) -> Result<RenderMesh, KernelError> {
    let mut builder = MeshBuilder::default();
    for part in parts {
        mesh_part(part, &mut builder)?;
    }
    Ok(builder.finish())
}

fn mesh_part(part: &Part, builder: &mut MeshBuilder) -> Result<(), KernelError> {
    let prism = &part.prism;
    let (bottom_outer, bottom_holes) = prism.section_rings(0.0);
    let (top_outer, top_holes) = prism.section_rings(prism.height);
    let z0 = prism.start_z;
    let z1 = prism.start_z + prism.height;
    // Orientation-flipping transforms reverse every winding once, and
    // subtracted parts reverse once more so their normals face the void.
    let flip = (linear_determinant(&part.transform) < 0.0) != (part.sign < 0);

    emit_cap(builder, &part.transform, &bottom_outer, &bottom_holes, z0, !flip)?;
    emit_cap(builder, &part.transform, &top_outer, &top_holes, z1, flip)?;

    emit_wall(builder, &part.transform, &bottom_outer, &top_outer, z0, z1, flip);
    for (bottom, top) in bottom_holes.iter().zip(&top_holes) {
        emit_wall(builder, &part.transform, bottom, top, z0, z1, flip);
    }
    Ok(())
}

/// Triangulate one cap. Natural winding faces +Z; `reverse` flips it, which
/// the bottom cap needs.
fn emit_cap(
    builder: &mut MeshBuilder,
    transform: &Matrix4<f64>,
    outer: &[Point2],
    holes: &[Vec<Point2>],
    z: f64,
    reverse: bool,
) -> Result<(), KernelError> {
    let mut coords = Vec::with_capacity(2 * (outer.len() + holes.iter().map(Vec::len).sum::<usize>()));
    let mut points: Vec<Point2> = Vec::with_capacity(coords.capacity() / 2);
    for p in outer {
        coords.push(p.x);
        coords.push(p.y);
        points.push(*p);
    }
    let mut hole_starts = Vec::with_capacity(holes.len());
    for hole in holes {
        if hole.len() < 3 {
            continue;
        }
        hole_starts.push(points.len());
        for p in hole {
            coords.push(p.x);
            coords.push(p.y);
            points.push(*p);
        }
    }

    let triangles = earcutr::earcut(&coords, &hole_starts, 2).map_err(|e| {
        KernelError::DegenerateProfile {
            reason: format!("cap triangulation failed: {e:?}"),
        }
    })?;
    for tri in triangles.chunks_exact(3) {
        let [a, b, c] = [tri[0], tri[1], tri[2]]
            .map(|i| Point3::new(points[i].x, points[i].y, z));
        push(builder, transform, reverse, a, b, c);
    }
    Ok(())
}

/// Two triangles per edge between index-matched rings. Outward orientation
/// follows from ring winding: outer rings run counter-clockwise, holes
/// clockwise, so the same quad order faces away from the material for both.
fn emit_wall(
    builder: &mut MeshBuilder,
    transform: &Matrix4<f64>,
    bottom: &[Point2],
    top: &[Point2],
    z0: f64,
    z1: f64,
    flip: bool,
) {
    let n = bottom.len().min(top.len());
    for i in 0..n {
        let j = (i + 1) % n;
        let b0 = Point3::new(bottom[i].x, bottom[i].y, z0);
        let b1 = Point3::new(bottom[j].x, bottom[j].y, z0);
        let t1 = Point3::new(top[j].x, top[j].y, z1);
        let t0 = Point3::new(top[i].x, top[i].y, z1);
        push(builder, transform, flip, b0, b1, t1);
        push(builder, transform, flip, b0, t1, t0);
    }
}

fn push(
    builder: &mut MeshBuilder,
    transform: &Matrix4<f64>,
    flip: bool,
    a: Point3,
    b: Point3,
    c: Point3,
) {
    let a = transform.transform_point(&a);
    let b = transform.transform_point(&b);
    let c = transform.transform_point(&c);
    if flip {
        builder.push_triangle(a, c, b);
    } else {
        builder.push_triangle(a, b, c);
    }
}

#[derive(Default)]
struct MeshBuilder {
    vertices: Vec<f32>,
    normals: Vec<f32>,
    indices: Vec<u32>,
}

impl MeshBuilder {
    fn push_triangle(&mut self, a: Point3, b: Point3, c: Point3) {
        let normal = (b - a).cross(&(c - a));
        let len = normal.norm();
        // Slivers from clamped miters carry no area; drop them.
        if len < 1e-12 {
            return;
        }
        let normal = normal / len;
        for p in [a, b, c] {
            let index = (self.vertices.len() / 3) as u32;
            self.vertices
                .extend([p.x as f32, p.y as f32, p.z as f32]);
            self.normals
                .extend([normal.x as f32, normal.y as f32, normal.z as f32]);
            self.indices.push(index);
        }
    }

    fn finish(self) -> RenderMesh {
        RenderMesh {
            vertices: self.vertices,
            normals: self.normals,
            indices: self.indices,
        }
    }
}
