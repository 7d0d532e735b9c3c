//! Friction-fit cavity: the tapered pocket the PCB drops into.
//!
//! The pocket is one tapered extrusion whose lateral clearance runs linearly
//! from the bottom tolerance at the PCB seat plane to the top tolerance at
//! the wall rim. With the usual negative bottom tolerance the walls squeeze
//! the board at the seat while the flared top guides insertion.

use molt_types::Config;
use planar_kernel::FaceHandle;

use crate::kernel_ext::KernelBundle;
use crate::types::{Diagnostics, OpError};

/// The cavity solid plus the taper line it was built from.
///
/// The taper data stays queryable so mating features (magnet pockets, lip
/// recess) can reproduce the exact clearance at any height.
#[derive(Debug, Clone)]
pub struct FrictionFit {
    pub solid: planar_kernel::SolidHandle,
    /// Wall draft angle from vertical, positive when the cavity widens upward.
    pub taper_deg: f64,
    /// Lateral clearance from the outline at `start_z`.
    pub start_offset: f64,
    /// Cavity floor, the top of the base slab.
    pub start_z: f64,
    /// Height where the PCB underside rests.
    pub pcb_z: f64,
    /// Wall rim height.
    pub top_z: f64,
    pub diagnostics: Diagnostics,
}

impl FrictionFit {
    /// Lateral clearance from the outline at height `z`, on the taper line.
    pub fn tolerance_at(&self, z: f64) -> f64 {
        self.start_offset + (z - self.start_z) * self.taper_deg.to_radians().tan()
    }
}

/// Build the cavity solid over `outline_face`, spanning from the base slab
/// top to the wall rim.
pub fn execute_friction_cavity(
    kb: &mut dyn KernelBundle,
    outline_face: FaceHandle,
    cfg: &Config,
) -> Result<FrictionFit, OpError> {
    if cfg.wall_z_height <= 0.0 {
        return Err(OpError::InvalidParameter {
            reason: format!("wall_z_height must be positive, got {}", cfg.wall_z_height),
        });
    }

    let mut diagnostics = Diagnostics::default();
    let rise = cfg.wall_xy_top_tolerance - cfg.wall_xy_bottom_tolerance;
    let taper_rad = (rise / cfg.wall_z_height).atan();
    let taper_deg = taper_rad.to_degrees();
    if rise < 0.0 {
        diagnostics.warn(format!(
            "cavity narrows toward the opening (top tolerance {} below bottom tolerance {})",
            cfg.wall_xy_top_tolerance, cfg.wall_xy_bottom_tolerance
        ));
    }

    let start_z = cfg.base_z_thickness;
    let pcb_z = cfg.base_z_thickness + cfg.z_space_under_pcb;
    let top_z = cfg.wall_height();
    // The taper line passes through bottom_tolerance at the PCB seat; project
    // it down to the cavity floor.
    let start_offset = cfg.wall_xy_bottom_tolerance - cfg.z_space_under_pcb * taper_rad.tan();

    let floor_face = kb
        .offset_face(outline_face, start_offset)
        .map_err(|source| OpError::CavityRejected { source })?;
    let solid = kb
        .extrude_tapered(floor_face, start_z, top_z - start_z, taper_deg)
        .map_err(|source| OpError::CavityRejected { source })?;

    Ok(FrictionFit {
        solid,
        taper_deg,
        start_offset,
        start_z,
        pcb_z,
        top_z,
        diagnostics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use molt_types::Outline;
    use planar_kernel::{Kernel, KernelIntrospect, PlanarKernel, Profile};

    fn square_face(kb: &mut PlanarKernel, size: f64) -> FaceHandle {
        let h = size / 2.0;
        let outline = Outline::new(vec![[-h, -h], [h, -h], [h, h], [-h, h]]).unwrap();
        kb.face_from_profile(Profile::from_outline(&outline)).unwrap()
    }

    #[test]
    fn taper_matches_the_tolerance_rise() {
        let mut kb = PlanarKernel::new();
        let face = square_face(&mut kb, 50.0);
        let mut cfg = Config::default();
        cfg.wall_xy_bottom_tolerance = -0.2;
        cfg.wall_xy_top_tolerance = 0.4;
        cfg.wall_z_height = 4.0;
        let fit = execute_friction_cavity(&mut kb, face, &cfg).unwrap();
        assert_relative_eq!(fit.taper_deg, (0.6f64 / 4.0).atan().to_degrees(), epsilon = 1e-9);
        assert_relative_eq!(fit.tolerance_at(fit.pcb_z), -0.2, epsilon = 1e-9);
        assert_relative_eq!(fit.tolerance_at(fit.top_z), 0.4, epsilon = 1e-9);
    }

    #[test]
    fn straight_cavity_bbox_tracks_the_tolerance() {
        let mut kb = PlanarKernel::new();
        let face = square_face(&mut kb, 50.0);
        let mut cfg = Config::default();
        cfg.wall_xy_bottom_tolerance = 0.2;
        cfg.wall_xy_top_tolerance = 0.2;
        let fit = execute_friction_cavity(&mut kb, face, &cfg).unwrap();
        assert_relative_eq!(fit.taper_deg, 0.0, epsilon = 1e-12);

        let bb = kb.bounding_box(fit.solid).unwrap();
        let size = bb.size();
        assert_relative_eq!(size[0], 50.4, epsilon = 1e-9);
        assert_relative_eq!(size[1], 50.4, epsilon = 1e-9);
        assert_relative_eq!(
            size[2],
            cfg.z_space_under_pcb + cfg.wall_z_height,
            epsilon = 1e-9
        );
        assert_relative_eq!(bb.min[2], cfg.base_z_thickness, epsilon = 1e-9);
    }

    #[test]
    fn inverted_tolerances_warn_but_still_build() {
        let mut kb = PlanarKernel::new();
        let face = square_face(&mut kb, 50.0);
        let mut cfg = Config::default();
        cfg.wall_xy_bottom_tolerance = 0.3;
        cfg.wall_xy_top_tolerance = -0.1;
        let fit = execute_friction_cavity(&mut kb, face, &cfg).unwrap();
        assert!(fit.taper_deg < 0.0);
        assert_eq!(fit.diagnostics.warnings.len(), 1);
    }

    #[test]
    fn zero_wall_height_is_rejected() {
        let mut kb = PlanarKernel::new();
        let face = square_face(&mut kb, 50.0);
        let mut cfg = Config::default();
        cfg.wall_z_height = 0.0;
        assert!(matches!(
            execute_friction_cavity(&mut kb, face, &cfg),
            Err(OpError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn collapsed_floor_points_at_the_tolerances() {
        let mut kb = PlanarKernel::new();
        // A 2mm board cannot absorb a -5mm clearance.
        let face = square_face(&mut kb, 2.0);
        let mut cfg = Config::default();
        cfg.wall_xy_bottom_tolerance = -5.0;
        let err = execute_friction_cavity(&mut kb, face, &cfg).unwrap_err();
        assert!(matches!(err, OpError::CavityRejected { .. }));
        assert!(err.to_string().contains("tolerances"));
    }
}
