//! Honeycomb relief: hexagonal lightening holes punched into the base slab
//! footprint.
//!
//! This is a pure profile operation. Cells become holes of the slab profile
//! before extrusion, so the slab mesh comes out watertight without any 3D
//! boolean work. Cells are laid on a triangular lattice and kept only where
//! they fit wholly inside the outline with margin, leaving the edge zone
//! solid for the wall joint.

use planar_kernel::offset::{distance_to_ring, point_in_ring};
use planar_kernel::{primitives, Point2, Profile, Vector2};

use crate::types::{Diagnostics, OpError};

#[derive(Debug, Clone)]
pub struct HoneycombPattern {
    /// The footprint with one hole per surviving cell.
    pub profile: Profile,
    pub cell_count: usize,
    pub diagnostics: Diagnostics,
}

/// Punch a honeycomb of `radius` across-flats cells separated by `wall` of
/// material into `footprint`.
pub fn honeycomb_profile(
    footprint: Profile,
    radius: f64,
    wall: f64,
) -> Result<HoneycombPattern, OpError> {
    for (name, value) in [("honeycomb_radius", radius), ("honeycomb_thickness", wall)] {
        if value <= 0.0 {
            return Err(OpError::InvalidParameter {
                reason: format!("{name} must be positive, got {value}"),
            });
        }
    }

    let pitch = radius + wall;
    let v0 = Vector2::new(pitch, 0.0);
    let v1 = Vector2::new(-pitch / 2.0, pitch * 3.0f64.sqrt() / 2.0);
    // Cells survive only when even their points stay clear of the boundary;
    // the pointy-top circumradius is radius/sqrt(3), 0.6 covers it.
    let margin = radius * 0.6;

    let outer = footprint.outer().to_vec();
    let (min, max) = footprint.bounds();
    let j_lo = ((min.y - pitch) / v1.y).floor() as i64;
    let j_hi = ((max.y + pitch) / v1.y).ceil() as i64;

    let mut profile = footprint;
    let mut cell_count = 0;
    for j in j_lo..=j_hi {
        let row = v1 * j as f64;
        let i_lo = ((min.x - pitch - row.x) / v0.x).floor() as i64;
        let i_hi = ((max.x + pitch - row.x) / v0.x).ceil() as i64;
        for i in i_lo..=i_hi {
            let center = Point2::new(row.x + v0.x * i as f64, row.y);
            if !point_in_ring(&outer, &center) || distance_to_ring(&outer, &center) < margin {
                continue;
            }
            let cell = primitives::hexagon_ring(radius)
                .into_iter()
                .map(|p| Point2::new(p.x + center.x, p.y + center.y))
                .collect();
            profile = profile.with_hole(cell)?;
            cell_count += 1;
        }
    }

    let mut diagnostics = Diagnostics::default();
    if cell_count == 0 {
        diagnostics.warn(format!(
            "honeycomb produced no cells: no {radius}mm hex fits the footprint with margin"
        ));
    }

    Ok(HoneycombPattern {
        profile,
        cell_count,
        diagnostics,
    })
}
