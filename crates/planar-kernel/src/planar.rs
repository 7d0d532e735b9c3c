//! The bundled prismatic evaluator.
//!
//! A solid is a flat, signed list of parts. Each part is one (optionally
//! tapered) prism under an affine transform; unions concatenate part lists
//! and subtractions concatenate with flipped signs. A point is material
//! where the signed count of parts containing it is at least one, which is
//! exact for the compositions the generator performs (nested differences
//! and disjoint unions). Queries that the output guarantees depend on
//! (sections, boxes, volumes, connectivity) are computed analytically from
//! the part lists rather than from meshes.

use std::collections::BTreeMap;

use nalgebra::Matrix4;

use crate::offset::{offset_ring, offset_ring_corresponding, signed_ring_area};
use crate::tessellation;
use crate::traits::{Kernel, KernelIntrospect};
use crate::types::{
    Aabb, FaceHandle, KernelError, Point2, Point3, Profile, RenderMesh, SolidHandle,
};
use crate::xform::linear_determinant;

#[derive(Debug, Clone)]
pub(crate) struct Prism {
    pub(crate) profile: Profile,
    pub(crate) start_z: f64,
    pub(crate) height: f64,
    pub(crate) taper_deg: f64,
}

impl Prism {
    /// Boundary offset of the section `dz` above the base.
    fn taper_offset(&self, dz: f64) -> f64 {
        dz * self.taper_deg.to_radians().tan()
    }

    /// Section rings `dz` above the base, index-matched to the base rings.
    /// Hole rings wind clockwise, so the same signed offset shrinks them
    /// while it grows the outer ring.
    pub(crate) fn section_rings(&self, dz: f64) -> (Vec<Point2>, Vec<Vec<Point2>>) {
        let delta = self.taper_offset(dz);
        let outer = offset_ring_corresponding(self.profile.outer(), delta);
        let holes = self
            .profile
            .holes()
            .iter()
            .map(|h| offset_ring_corresponding(h, delta))
            .collect();
        (outer, holes)
    }

    fn section_area(&self, dz: f64) -> f64 {
        let (outer, holes) = self.section_rings(dz);
        // A hole that over-shrinks inverts its winding and stops counting.
        let hole_area: f64 = holes
            .iter()
            .map(|h| (-signed_ring_area(h)).max(0.0))
            .sum();
        (signed_ring_area(&outer) - hole_area).max(0.0)
    }

    /// Simpson's rule over the section area, which is quadratic in depth
    /// for a miter offset, so this is exact away from collapses.
    fn volume(&self) -> f64 {
        let h = self.height;
        let a0 = self.section_area(0.0);
        let am = self.section_area(h / 2.0);
        let a1 = self.section_area(h);
        h / 6.0 * (a0 + 4.0 * am + a1)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Part {
    pub(crate) prism: Prism,
    pub(crate) transform: Matrix4<f64>,
    pub(crate) sign: i8,
}

impl Part {
    /// Box over the transformed base and top outer rings. Hole rings lie
    /// inside the outer hull and cannot extend the box.
    fn bounding_box(&self) -> Aabb {
        let mut aabb = Aabb {
            min: [f64::INFINITY; 3],
            max: [f64::NEG_INFINITY; 3],
        };
        let top = offset_ring_corresponding(
            self.prism.profile.outer(),
            self.prism.taper_offset(self.prism.height),
        );
        for (ring, z) in [
            (self.prism.profile.outer(), self.prism.start_z),
            (&top[..], self.prism.start_z + self.prism.height),
        ] {
            for p in ring {
                let world = self.transform.transform_point(&Point3::new(p.x, p.y, z));
                aabb.absorb(&world);
            }
        }
        aabb
    }
}

/// Deterministic kernel over prismatic solids. Stores are persistent:
/// handles stay valid for the lifetime of the kernel.
#[derive(Debug, Default)]
pub struct PlanarKernel {
    faces: BTreeMap<u64, Profile>,
    solids: BTreeMap<u64, Vec<Part>>,
    next_face: u64,
    next_solid: u64,
}

impl PlanarKernel {
    pub fn new() -> PlanarKernel {
        PlanarKernel::default()
    }

    fn face(&self, handle: FaceHandle) -> Result<&Profile, KernelError> {
        self.faces
            .get(&handle.0)
            .ok_or(KernelError::UnknownFace { id: handle.0 })
    }

    fn solid(&self, handle: SolidHandle) -> Result<&[Part], KernelError> {
        self.solids
            .get(&handle.0)
            .map(Vec::as_slice)
            .ok_or(KernelError::UnknownSolid { id: handle.0 })
    }

    fn insert_face(&mut self, profile: Profile) -> FaceHandle {
        let id = self.next_face;
        self.next_face += 1;
        self.faces.insert(id, profile);
        FaceHandle(id)
    }

    fn insert_solid(&mut self, parts: Vec<Part>) -> SolidHandle {
        let id = self.next_solid;
        self.next_solid += 1;
        self.solids.insert(id, parts);
        SolidHandle(id)
    }
}

impl Kernel for PlanarKernel {
    fn face_from_profile(&mut self, profile: Profile) -> Result<FaceHandle, KernelError> {
        Ok(self.insert_face(profile))
    }

    fn offset_face(&mut self, face: FaceHandle, distance: f64) -> Result<FaceHandle, KernelError> {
        if !distance.is_finite() {
            return Err(KernelError::InvalidArgument {
                reason: format!("offset distance {distance} is not finite"),
            });
        }
        let profile = self.face(face)?.clone();
        let mut out = Profile::new(offset_ring(profile.outer(), distance)?)?;
        for hole in profile.holes() {
            let mut ccw = hole.clone();
            ccw.reverse();
            match offset_ring(&ccw, -distance) {
                Ok(ring) => out.add_hole(ring)?,
                // Material growing over a hole fills it in.
                Err(KernelError::OffsetCollapse { .. }) if distance > 0.0 => {
                    tracing::debug!(distance, "hole collapsed under outward offset, filled in");
                    continue;
                }
                Err(e) => return Err(e),
            }
        }
        Ok(self.insert_face(out))
    }

    fn extrude(
        &mut self,
        face: FaceHandle,
        start_z: f64,
        height: f64,
    ) -> Result<SolidHandle, KernelError> {
        self.extrude_tapered(face, start_z, height, 0.0)
    }

    fn extrude_tapered(
        &mut self,
        face: FaceHandle,
        start_z: f64,
        height: f64,
        taper_deg: f64,
    ) -> Result<SolidHandle, KernelError> {
        if !start_z.is_finite() || !height.is_finite() || height <= 0.0 {
            return Err(KernelError::InvalidArgument {
                reason: format!("extrusion needs a finite start and positive height, got start_z={start_z} height={height}"),
            });
        }
        if !taper_deg.is_finite() || taper_deg.abs() >= 90.0 {
            return Err(KernelError::InvalidArgument {
                reason: format!("taper angle {taper_deg} is outside (-90, 90) degrees"),
            });
        }
        let profile = self.face(face)?.clone();
        let part = Part {
            prism: Prism {
                profile,
                start_z,
                height,
                taper_deg,
            },
            transform: Matrix4::identity(),
            sign: 1,
        };
        Ok(self.insert_solid(vec![part]))
    }

    fn boolean_union(
        &mut self,
        a: SolidHandle,
        b: SolidHandle,
    ) -> Result<SolidHandle, KernelError> {
        let mut parts = self.solid(a)?.to_vec();
        parts.extend(self.solid(b)?.iter().cloned());
        Ok(self.insert_solid(parts))
    }

    fn boolean_subtract(
        &mut self,
        base: SolidHandle,
        tool: SolidHandle,
    ) -> Result<SolidHandle, KernelError> {
        let mut parts = self.solid(base)?.to_vec();
        parts.extend(self.solid(tool)?.iter().cloned().map(|mut part| {
            part.sign = -part.sign;
            part
        }));
        Ok(self.insert_solid(parts))
    }

    fn boolean_intersect(
        &mut self,
        _a: SolidHandle,
        _b: SolidHandle,
    ) -> Result<SolidHandle, KernelError> {
        Err(KernelError::NotSupported {
            reason: "the planar evaluator does not intersect solids".to_string(),
        })
    }

    fn transform(
        &mut self,
        solid: SolidHandle,
        matrix: &Matrix4<f64>,
    ) -> Result<SolidHandle, KernelError> {
        let det = linear_determinant(matrix);
        if !det.is_finite() || det.abs() < 1e-12 {
            return Err(KernelError::InvalidArgument {
                reason: format!("transform is degenerate (linear determinant {det})"),
            });
        }
        let parts = self
            .solid(solid)?
            .iter()
            .cloned()
            .map(|mut part| {
                part.transform = matrix * part.transform;
                part
            })
            .collect();
        Ok(self.insert_solid(parts))
    }
}

impl KernelIntrospect for PlanarKernel {
    fn face_profile(&self, face: FaceHandle) -> Result<Profile, KernelError> {
        Ok(self.face(face)?.clone())
    }

    fn bounding_box(&self, solid: SolidHandle) -> Result<Aabb, KernelError> {
        let parts = self.solid(solid)?;
        let mut boxes = parts.iter().filter(|p| p.sign > 0).map(Part::bounding_box);
        let first = boxes.next().ok_or(KernelError::EmptySolid { id: solid.0 })?;
        Ok(boxes.fold(first, |acc, b| acc.union(&b)))
    }

    fn volume_estimate(&self, solid: SolidHandle) -> Result<f64, KernelError> {
        Ok(self
            .solid(solid)?
            .iter()
            .map(|part| {
                let scale = linear_determinant(&part.transform).abs();
                f64::from(part.sign) * part.prism.volume() * scale
            })
            .sum())
    }

    fn component_count(&self, solid: SolidHandle) -> Result<usize, KernelError> {
        let boxes: Vec<Aabb> = self
            .solid(solid)?
            .iter()
            .filter(|p| p.sign > 0)
            .map(Part::bounding_box)
            .collect();
        if boxes.is_empty() {
            return Err(KernelError::EmptySolid { id: solid.0 });
        }

        // Union-find over box overlaps. Subtractions cannot join clumps, so
        // they are ignored; overlapping boxes are treated as connected,
        // which matches how the generator composes touching parts.
        let mut parent: Vec<usize> = (0..boxes.len()).collect();
        fn find(parent: &mut [usize], mut i: usize) -> usize {
            while parent[i] != i {
                parent[i] = parent[parent[i]];
                i = parent[i];
            }
            i
        }
        for i in 0..boxes.len() {
            for j in (i + 1)..boxes.len() {
                if boxes[i].intersects(&boxes[j]) {
                    let (ri, rj) = (find(&mut parent, i), find(&mut parent, j));
                    parent[ri] = rj;
                }
            }
        }
        let count = (0..boxes.len())
            .filter(|&i| find(&mut parent, i) == i)
            .count();
        Ok(count)
    }

    fn section_profile(&self, solid: SolidHandle, z: f64) -> Result<Profile, KernelError> {
        let parts = self.solid(solid)?;
        let [part] = parts else {
            return Err(KernelError::NotSupported {
                reason: format!(
                    "section needs a single-prism solid, this one has {} parts",
                    parts.len()
                ),
            });
        };
        if part.sign < 0 {
            return Err(KernelError::EmptySolid { id: solid.0 });
        }
        let drift = (part.transform - Matrix4::identity()).abs().max();
        if drift > 1e-12 {
            return Err(KernelError::NotSupported {
                reason: "section is only defined for untransformed prisms".to_string(),
            });
        }
        let prism = &part.prism;
        let dz = z - prism.start_z;
        if dz < -1e-9 || dz > prism.height + 1e-9 {
            return Err(KernelError::InvalidArgument {
                reason: format!(
                    "z {z} is outside the prism span [{}, {}]",
                    prism.start_z,
                    prism.start_z + prism.height
                ),
            });
        }
        let (outer, holes) = prism.section_rings(dz.clamp(0.0, prism.height));
        let mut profile = Profile::new(outer)?;
        for hole in holes {
            profile.add_hole(hole)?;
        }
        Ok(profile)
    }

    fn tessellate(&self, solid: SolidHandle) -> Result<RenderMesh, KernelError> {
        let parts = self.solid(solid)?;
        if !parts.iter().any(|p| p.sign > 0) {
            return Err(KernelError::EmptySolid { id: solid.0 });
        }
        tessellation::mesh_solid(parts)
    }
}
