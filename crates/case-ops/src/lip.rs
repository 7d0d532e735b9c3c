//! Retention lip: an arc-shaped bump inside the carrycase opening and the
//! matching recess around the case, so the inserted case clicks home instead
//! of sliding free.
//!
//! Both sides are built from the same boundary strip, sampled along the
//! outline between the two lip bearings, so bump and recess stay congruent
//! on arbitrary outline shapes.

use molt_types::{Config, Outline};
use planar_kernel::{xform, Point2, SolidHandle};

use crate::kernel_ext::KernelBundle;
use crate::polar::{point_at_fraction, PolarMap};
use crate::types::{Diagnostics, OpError};

/// Extra reach of the strip into the wall it anchors in.
const EMBED: f64 = 1.0;
/// Vertical slack of the recess over the lip height.
const RECESS_SLACK: f64 = 0.3;

#[derive(Debug, Clone)]
pub struct LipResult {
    pub solid: SolidHandle,
    /// Perimeter fraction the lip arc spans, counter-clockwise.
    pub arc_fraction: f64,
    pub diagnostics: Diagnostics,
}

/// Add the lip bump inside the carrycase opening. The sleeve is in its build
/// frame with the opening plane at z = 0.
///
/// Flush lips taper to nothing at the opening plane: a 45 degree wedge whose
/// thin end sits on the print bed, so insertion rides a ramp instead of
/// hitting a square ledge. Non-flush lips are a straight bump extended below
/// the plane as well, a deeper catch at the cost of a flat sleeve bottom.
pub fn execute_carrycase_lip(
    kb: &mut dyn KernelBundle,
    sleeve: SolidHandle,
    outline: &Outline,
    map: &PolarMap,
    cfg: &Config,
) -> Result<LipResult, OpError> {
    check_lip_len(cfg)?;
    let mut diagnostics = Diagnostics::default();
    // The taper eats up to lip_len off every strip edge, so the flush wedge
    // anchors deeper to keep its thin end inside the wall.
    let embed = if cfg.flush_carrycase_lip {
        cfg.lip_len + 0.5
    } else {
        EMBED
    };
    if embed > cfg.carrycase_wall_xy_thickness {
        diagnostics.warn(format!(
            "lip anchor reaches {embed}mm into a {}mm carrycase wall and may surface outside",
            cfg.carrycase_wall_xy_thickness
        ));
    }

    let bore = cfg.wall_xy_thickness + cfg.carrycase_tolerance_xy;
    let (ring, arc_fraction) = strip_ring(outline, map, cfg, bore + embed, bore - cfg.lip_len);
    let face = kb.face_from_profile(planar_kernel::Profile::new(ring)?)?;
    let bump = if cfg.flush_carrycase_lip {
        let wedge = kb.extrude_tapered(face, 0.0, cfg.lip_len, -45.0)?;
        kb.transform(wedge, &xform::mirror_z_at(cfg.lip_len / 2.0))?
    } else {
        kb.extrude(face, -cfg.lip_len, 2.0 * cfg.lip_len)?
    };
    let solid = kb.boolean_union(sleeve, bump)?;

    Ok(LipResult {
        solid,
        arc_fraction,
        diagnostics,
    })
}

/// Cut the mating recess around the case bottom. The case is in its build
/// frame with its underside at z = 0.
pub fn execute_case_lip_recess(
    kb: &mut dyn KernelBundle,
    case: SolidHandle,
    outline: &Outline,
    map: &PolarMap,
    cfg: &Config,
) -> Result<LipResult, OpError> {
    check_lip_len(cfg)?;
    let mut diagnostics = Diagnostics::default();
    if cfg.lip_len >= cfg.wall_xy_thickness {
        diagnostics.warn(format!(
            "lip_len {} consumes the whole {}mm case wall, recess will pierce it",
            cfg.lip_len, cfg.wall_xy_thickness
        ));
    }

    let outer = cfg.wall_xy_thickness + cfg.carrycase_tolerance_xy + EMBED;
    let inner = cfg.wall_xy_thickness - cfg.lip_len;
    let (ring, arc_fraction) = strip_ring(outline, map, cfg, outer, inner);
    let face = kb.face_from_profile(planar_kernel::Profile::new(ring)?)?;
    let cutter = kb.extrude(face, 0.0, cfg.lip_len + RECESS_SLACK)?;
    let solid = kb.boolean_subtract(case, cutter)?;

    Ok(LipResult {
        solid,
        arc_fraction,
        diagnostics,
    })
}

fn check_lip_len(cfg: &Config) -> Result<(), OpError> {
    if cfg.lip_len <= 0.0 {
        return Err(OpError::InvalidParameter {
            reason: format!("lip_len must be positive, got {}", cfg.lip_len),
        });
    }
    Ok(())
}

/// Closed strip polygon between two lateral offsets of the boundary arc from
/// the first lip bearing counter-clockwise to the second.
fn strip_ring(
    outline: &Outline,
    map: &PolarMap,
    cfg: &Config,
    outer_offset: f64,
    inner_offset: f64,
) -> (Vec<Point2>, f64) {
    let f_start = map.query(cfg.lip_position_angles[0]).fraction;
    let f_end = map.query(cfg.lip_position_angles[1]).fraction;
    let span = (f_end - f_start).rem_euclid(1.0);

    // One sample per perimeter degree keeps the strip congruent with the
    // bump no matter how curved the boundary is.
    let steps = ((span * 360.0).ceil() as usize).max(1);
    let mut outer = Vec::with_capacity(steps + 1);
    let mut inner = Vec::with_capacity(steps + 1);
    for i in 0..=steps {
        let f = f_start + span * (i as f64 / steps as f64);
        let (p, n) = point_at_fraction(outline, f);
        outer.push(p + n * outer_offset);
        inner.push(p + n * inner_offset);
    }
    inner.reverse();
    outer.extend(inner);
    (outer, span)
}
