//! Finger cutout: a rounded notch through a wall so the board (or the case
//! in its sleeve) can be gripped and pulled.
//!
//! The notch profile is a rounded rectangle swept horizontally through the
//! wall band at a user-chosen bearing. It over-travels both wall surfaces so
//! the subtraction never leaves a skin from tolerance stacking.

use planar_kernel::{xform, SolidHandle};

use crate::kernel_ext::KernelBundle;
use crate::polar::PolarMap;
use crate::types::{Diagnostics, OpError};

/// Sweep margin past both wall surfaces, and past the rim in the open
/// direction.
pub const OVER_TRAVEL: f64 = 1.0;

/// Which rim the notch opens at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotchFrom {
    /// Open at the top rim, reaching `depth` down. The case grip.
    Top,
    /// Open at the bottom rim, reaching `depth` up. The carrycase grip.
    Bottom,
}

/// Placement and sizing of one notch.
#[derive(Debug, Clone, Copy)]
pub struct NotchSpec {
    /// Bearing around the outline where the notch sits.
    pub bearing_deg: f64,
    /// Width along the boundary.
    pub width: f64,
    /// Reach from the rim into the wall.
    pub depth: f64,
    /// Height of the rim the notch opens at.
    pub rim_z: f64,
    pub from: NotchFrom,
    /// Where the wall band starts, measured outward from the outline.
    pub inner_offset: f64,
    /// Thickness of the wall band to pierce.
    pub wall_thickness: f64,
}

#[derive(Debug, Clone)]
pub struct FingerCutout {
    pub solid: SolidHandle,
    /// Boundary point the notch was centered on.
    pub point: planar_kernel::Point2,
    /// Outward travel direction of the sweep.
    pub normal: planar_kernel::Vector2,
    pub diagnostics: Diagnostics,
}

/// Subtract one finger notch from `solid`.
pub fn execute_finger_cutout(
    kb: &mut dyn KernelBundle,
    solid: SolidHandle,
    map: &PolarMap,
    spec: NotchSpec,
) -> Result<FingerCutout, OpError> {
    for (name, value) in [
        ("cutout width", spec.width),
        ("cutout depth", spec.depth),
        ("wall thickness", spec.wall_thickness),
    ] {
        if value <= 0.0 {
            return Err(OpError::InvalidParameter {
                reason: format!("{name} must be positive, got {value}"),
            });
        }
    }

    let slot = map.query(spec.bearing_deg);
    let point = slot.point;
    let normal = slot.normal;

    // Notch profile in its local frame: x along the boundary, y vertical.
    // The open side over-travels the rim so the notch breaks through cleanly.
    let height = spec.depth + OVER_TRAVEL;
    let radius = 0.4 * spec.width.min(height);
    let profile =
        planar_kernel::primitives::rounded_rectangle_ring(spec.width, height, radius, 8);
    let face = kb.face_from_profile(planar_kernel::Profile::new(profile)?)?;
    let sweep = spec.wall_thickness + 2.0 * OVER_TRAVEL;
    let cutter = kb.extrude(face, 0.0, sweep)?;

    // Rx(90) stands the profile up (local y becomes world z, the sweep axis
    // becomes the horizontal normal direction), Rz aligns it to the bearing.
    let bearing = crate::polar::signed_bearing(normal);
    let center_z = match spec.from {
        NotchFrom::Top => spec.rim_z + (OVER_TRAVEL - spec.depth) / 2.0,
        NotchFrom::Bottom => spec.rim_z + (spec.depth - OVER_TRAVEL) / 2.0,
    };
    let start = point + normal * (spec.inner_offset - OVER_TRAVEL);
    let placement = xform::translation(start.x, start.y, center_z)
        * xform::rotation_z_deg(bearing + 90.0)
        * xform::rotation_x_deg(90.0);
    let cutter = kb.transform(cutter, &placement)?;

    let solid = kb.boolean_subtract(solid, cutter)?;
    Ok(FingerCutout {
        solid,
        point,
        normal,
        diagnostics: Diagnostics::default(),
    })
}
