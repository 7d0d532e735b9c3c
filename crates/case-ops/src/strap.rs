//! Strap loop: a full-height lug on the +X side of the case with a slot for
//! a wrist strap or carry cord.
//!
//! The lug is one extruded ring profile. Its inner bar overlaps the case
//! wall so the union fuses into a single printable body, and with the
//! default zero end offset the wall itself forms the slot's inner edge.
//! Where the side faces meet the wall the ring carries 45 degree chamfer
//! webs, so the lug has no sharp reentrant corner against the case.

use molt_types::{Config, Outline};
use planar_kernel::{Point2, Profile, SolidHandle};

use crate::kernel_ext::KernelBundle;
use crate::types::{Diagnostics, OpError};

/// Overlap of the lug into the wall band so the union never leaves a seam.
const WALL_BITE: f64 = 1.0;
/// Corner rounding of the outer lug boundary.
const CORNER_RADIUS: f64 = 1.0;

#[derive(Debug, Clone)]
pub struct StrapLoop {
    pub solid: SolidHandle,
    /// Slot opening along y.
    pub slot_height: f64,
    pub diagnostics: Diagnostics,
}

/// Union the strap lug onto `case`, anchored at the outline's +X extreme.
/// `height` is the case wall height the lug spans.
pub fn execute_strap_loop(
    kb: &mut dyn KernelBundle,
    case: SolidHandle,
    outline: &Outline,
    cfg: &Config,
    height: f64,
) -> Result<StrapLoop, OpError> {
    for (name, value) in [
        ("strap_loop_thickness", cfg.strap_loop_thickness),
        ("strap_loop_gap", cfg.strap_loop_gap),
    ] {
        if value <= 0.0 {
            return Err(OpError::InvalidParameter {
                reason: format!("{name} must be positive, got {value}"),
            });
        }
    }

    let mut diagnostics = Diagnostics::default();
    if cfg.strap_loop_end_offset < 0.0 {
        diagnostics.warn(format!(
            "strap_loop_end_offset {} tucks the slot into the wall, part of it will be blocked",
            cfg.strap_loop_end_offset
        ));
    }

    let (min, max) = outline.bounds();
    let wall_x = max[0] + cfg.wall_xy_thickness;
    let mid_y = (min[1] + max[1]) / 2.0;
    let slot_height = (max[1] - min[1]) / 2.0;

    // Slot rectangle, then the lug ring around it.
    let slot_from = wall_x + cfg.strap_loop_end_offset;
    let slot_to = slot_from + cfg.strap_loop_gap;
    let hole = vec![
        Point2::new(slot_from, mid_y - slot_height / 2.0),
        Point2::new(slot_to, mid_y - slot_height / 2.0),
        Point2::new(slot_to, mid_y + slot_height / 2.0),
        Point2::new(slot_from, mid_y + slot_height / 2.0),
    ];

    let t = cfg.strap_loop_thickness;
    let lug_from = wall_x - WALL_BITE;
    let lug_to = slot_to + t;
    let half_h = slot_height / 2.0 + t;
    // Junction chamfer, half the lug thickness.
    let c = t / 2.0;

    let mut outer = vec![
        Point2::new(lug_from, mid_y - half_h - c),
        Point2::new(wall_x, mid_y - half_h - c),
        Point2::new(wall_x + c, mid_y - half_h),
    ];
    // Rounded free corners on the +X side.
    for (cy, start) in [(mid_y - half_h + CORNER_RADIUS, -90.0), (mid_y + half_h - CORNER_RADIUS, 0.0)] {
        for i in 0..=8 {
            let a = (start + 90.0 * i as f64 / 8.0).to_radians();
            outer.push(Point2::new(
                lug_to - CORNER_RADIUS + CORNER_RADIUS * a.cos(),
                cy + CORNER_RADIUS * a.sin(),
            ));
        }
    }
    outer.push(Point2::new(wall_x + c, mid_y + half_h));
    outer.push(Point2::new(wall_x, mid_y + half_h + c));
    outer.push(Point2::new(lug_from, mid_y + half_h + c));

    let face = kb.face_from_profile(Profile::new(outer)?.with_hole(hole)?)?;
    let lug = kb.extrude(face, 0.0, height)?;
    let solid = kb.boolean_union(case, lug)?;

    Ok(StrapLoop {
        solid,
        slot_height,
        diagnostics,
    })
}
