//! The two traits every modeling backend implements.

use nalgebra::Matrix4;

use crate::types::{Aabb, FaceHandle, KernelError, Profile, RenderMesh, SolidHandle};

/// Construction operations. Handles are never consumed: every operation
/// leaves its inputs valid and returns a new handle, so faces and solids can
/// be reused across build steps.
pub trait Kernel {
    /// Register a planar profile as a face.
    fn face_from_profile(&mut self, profile: Profile) -> Result<FaceHandle, KernelError>;

    /// New face with every boundary moved `distance` outward from the
    /// material (holes shrink when positive). A hole that vanishes under a
    /// positive offset is dropped; a collapsing outer ring is an error.
    fn offset_face(&mut self, face: FaceHandle, distance: f64) -> Result<FaceHandle, KernelError>;

    /// Straight prism from `start_z` rising `height` along +Z.
    fn extrude(
        &mut self,
        face: FaceHandle,
        start_z: f64,
        height: f64,
    ) -> Result<SolidHandle, KernelError>;

    /// Prism whose side walls lean outward `taper_deg` degrees from
    /// vertical, so the section at height h above the base is the base
    /// offset by `h * tan(taper_deg)`. Negative angles lean inward.
    fn extrude_tapered(
        &mut self,
        face: FaceHandle,
        start_z: f64,
        height: f64,
        taper_deg: f64,
    ) -> Result<SolidHandle, KernelError>;

    fn boolean_union(&mut self, a: SolidHandle, b: SolidHandle)
        -> Result<SolidHandle, KernelError>;

    /// Material of `base` minus material of `tool`.
    fn boolean_subtract(
        &mut self,
        base: SolidHandle,
        tool: SolidHandle,
    ) -> Result<SolidHandle, KernelError>;

    fn boolean_intersect(
        &mut self,
        a: SolidHandle,
        b: SolidHandle,
    ) -> Result<SolidHandle, KernelError>;

    /// Apply an affine transform. Reflections are allowed; degenerate
    /// (non-invertible) matrices are rejected.
    fn transform(
        &mut self,
        solid: SolidHandle,
        matrix: &Matrix4<f64>,
    ) -> Result<SolidHandle, KernelError>;
}

/// Read-only queries against built geometry.
pub trait KernelIntrospect {
    fn face_profile(&self, face: FaceHandle) -> Result<Profile, KernelError>;

    /// Conservative box: subtracted regions are not trimmed away.
    fn bounding_box(&self, solid: SolidHandle) -> Result<Aabb, KernelError>;

    /// Signed material volume. Overlapping subtractions may be counted
    /// twice, so treat this as an estimate for sanity checks.
    fn volume_estimate(&self, solid: SolidHandle) -> Result<f64, KernelError>;

    /// Number of disconnected material clumps.
    fn component_count(&self, solid: SolidHandle) -> Result<usize, KernelError>;

    /// Planar cross-section at height `z`. Only supported for untransformed
    /// single-prism solids, which is where the generator needs it.
    fn section_profile(&self, solid: SolidHandle, z: f64) -> Result<Profile, KernelError>;

    /// Flat-shaded triangle mesh. Material shells wind outward; subtracted
    /// pockets appear as reverse-wound shells nested inside them, which
    /// slicers resolve into voids.
    fn tessellate(&self, solid: SolidHandle) -> Result<RenderMesh, KernelError>;
}
