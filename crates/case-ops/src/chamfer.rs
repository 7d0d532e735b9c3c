//! 45-degree chamfer along a rim of the case.
//!
//! The chamfer is built as a subtractive ring wedge: a thin slab over the
//! rim band minus the frustum of material that survives the bevel. Chamfer
//! failure is cosmetic, so any kernel rejection downgrades to "not applied"
//! with a warning instead of failing the build.

use planar_kernel::{FaceHandle, KernelError, SolidHandle};

use crate::kernel_ext::KernelBundle;
use crate::types::{Diagnostics, OpError};

/// Which horizontal rim of the solid gets the bevel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChamferEdge {
    /// Outer edge at the solid's highest z.
    Top,
    /// Outer edge at the solid's lowest z.
    Bottom,
}

#[derive(Debug, Clone)]
pub struct ChamferOutcome {
    pub solid: SolidHandle,
    /// False when the chamfer was skipped and `solid` is the input unchanged.
    pub applied: bool,
    pub diagnostics: Diagnostics,
}

/// Bevel the outer rim edge of `solid`. `rim_face` must trace the solid's
/// outer boundary at that rim; `size` is the chamfer leg length.
pub fn execute_rim_chamfer(
    kb: &mut dyn KernelBundle,
    solid: SolidHandle,
    rim_face: FaceHandle,
    edge: ChamferEdge,
    size: f64,
) -> Result<ChamferOutcome, OpError> {
    if size < 0.0 {
        return Err(OpError::InvalidParameter {
            reason: format!("chamfer length must not be negative, got {size}"),
        });
    }

    let mut diagnostics = Diagnostics::default();
    if size == 0.0 {
        return Ok(ChamferOutcome {
            solid,
            applied: false,
            diagnostics,
        });
    }

    let bb = kb.bounding_box(solid)?;
    let span = bb.max[2] - bb.min[2];
    if size >= span {
        diagnostics.warn(format!(
            "chamfer length {size} exceeds the solid's height {span:.2}, skipping"
        ));
        return Ok(ChamferOutcome {
            solid,
            applied: false,
            diagnostics,
        });
    }

    match cut_rim(kb, solid, rim_face, edge, size, bb.min[2], bb.max[2]) {
        Ok(chamfered) => Ok(ChamferOutcome {
            solid: chamfered,
            applied: true,
            diagnostics,
        }),
        Err(err) => {
            tracing::warn!(error = %err, ?edge, "rim chamfer failed, keeping the square edge");
            diagnostics.warn(format!("{edge:?} rim chamfer failed ({err}), edge left square"));
            Ok(ChamferOutcome {
                solid,
                applied: false,
                diagnostics,
            })
        }
    }
}

fn cut_rim(
    kb: &mut dyn KernelBundle,
    solid: SolidHandle,
    rim_face: FaceHandle,
    edge: ChamferEdge,
    size: f64,
    z_min: f64,
    z_max: f64,
) -> Result<SolidHandle, KernelError> {
    let cutter = match edge {
        ChamferEdge::Top => {
            // Band slab minus the frustum that narrows into the bevel.
            let slab = kb.extrude(rim_face, z_max - size, size)?;
            let keep = kb.extrude_tapered(rim_face, z_max - size, size, -45.0)?;
            kb.boolean_subtract(slab, keep)?
        }
        ChamferEdge::Bottom => {
            let slab = kb.extrude(rim_face, z_min, size)?;
            let inset = kb.offset_face(rim_face, -size)?;
            let keep = kb.extrude_tapered(inset, z_min, size, 45.0)?;
            kb.boolean_subtract(slab, keep)?
        }
    };
    kb.boolean_subtract(solid, cutter)
}
