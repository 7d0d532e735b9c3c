//! Magnet pocket arrays for the case-to-carrycase closure.
//!
//! Pockets for 6x2 disc magnets sink into a wall band from its inner
//! surface, leaving `magnet_separation_distance` of material toward the
//! outer surface so the field still grips through the skin. An array is
//! laid out by arclength: consecutive pockets sit exactly `magnet_spacing`
//! apart along the boundary, centered on the `magnet_position` bearing, so
//! the case and carrycase rings line up pocket-for-pocket. Sites that land
//! in a blocked arc (a finger cutout span) are skipped; both rings must be
//! given the same blocks or their pockets stop pairing.

use molt_types::{Config, Outline, MAGNET_DIAMETER, MAGNET_HEIGHT};
use planar_kernel::{xform, Point2, SolidHandle, Vector2};

use crate::kernel_ext::KernelBundle;
use crate::polar::{point_at_fraction, signed_bearing, PolarMap};
use crate::types::{Diagnostics, OpError};

/// Lateral slack so a hand-pressed magnet seats without splitting the wall.
const POCKET_SEMI_LATERAL: f64 = MAGNET_DIAMETER / 2.0 + 0.3;
const POCKET_SEMI_VERTICAL: f64 = MAGNET_DIAMETER / 2.0;

/// The wall band one magnet ring sinks into.
#[derive(Debug, Clone, Copy)]
pub struct MagnetWall {
    /// Nominal wall thickness, the basis for pocket depth.
    pub wall_thickness: f64,
    /// Offset of the band's inner surface from the outline. Pockets open
    /// flush at this surface.
    pub inner_offset: f64,
    /// Height of the pocket centers.
    pub center_z: f64,
}

/// Boundary arc no pocket may enter, as a perimeter fraction center and a
/// half width in millimeters of arclength.
#[derive(Debug, Clone, Copy)]
pub struct ArcBlock {
    pub center_fraction: f64,
    pub half_width: f64,
}

/// One placed pocket.
#[derive(Debug, Clone)]
pub struct MagnetSite {
    pub fraction: f64,
    pub point: Point2,
    pub normal: Vector2,
    pub bearing_deg: f64,
}

#[derive(Debug, Clone)]
pub struct MagnetRing {
    pub solid: SolidHandle,
    pub sites: Vec<MagnetSite>,
    /// Pocket depth along the wall normal.
    pub depth: f64,
    pub diagnostics: Diagnostics,
}

/// Sink `cfg.magnet_count` pockets into the wall band of `solid`, skipping
/// sites that fall inside a blocked arc.
pub fn execute_magnet_pockets(
    kb: &mut dyn KernelBundle,
    solid: SolidHandle,
    outline: &Outline,
    map: &PolarMap,
    cfg: &Config,
    wall: MagnetWall,
    blocked: &[ArcBlock],
) -> Result<MagnetRing, OpError> {
    let depth = wall.wall_thickness - cfg.magnet_separation_distance;
    if cfg.magnet_count == 0 {
        return Ok(MagnetRing {
            solid,
            sites: Vec::new(),
            depth,
            diagnostics: Diagnostics::default(),
        });
    }
    if depth < MAGNET_HEIGHT {
        return Err(OpError::InvalidParameter {
            reason: format!(
                "magnet pocket depth {depth:.2} is below the {MAGNET_HEIGHT}mm magnet height"
            ),
        });
    }
    if cfg.magnet_spacing <= 0.0 {
        return Err(OpError::InvalidParameter {
            reason: format!("magnet_spacing must be positive, got {}", cfg.magnet_spacing),
        });
    }

    let mut diagnostics = Diagnostics::default();
    let perimeter = map.perimeter();
    let run = cfg.magnet_spacing * f64::from(cfg.magnet_count - 1);
    if run > perimeter {
        diagnostics.warn(format!(
            "magnet run of {run:.1}mm wraps the {perimeter:.1}mm outline, pockets will overlap"
        ));
    }

    let center_fraction = map.query(cfg.magnet_position).fraction;
    let count = cfg.magnet_count;
    let mut sites = Vec::with_capacity(count as usize);
    let mut body = solid;
    let mut skipped = 0u32;
    for k in 0..count {
        // Arclength offsets symmetric about the center bearing.
        let shift = (f64::from(k) - f64::from(count - 1) / 2.0) * cfg.magnet_spacing;
        let fraction = (center_fraction + shift / perimeter).rem_euclid(1.0);
        if blocked.iter().any(|b| {
            let d = (fraction - b.center_fraction).rem_euclid(1.0);
            let d = if d > 0.5 { d - 1.0 } else { d };
            (d * perimeter).abs() < b.half_width + POCKET_SEMI_LATERAL
        }) {
            skipped += 1;
            continue;
        }
        let (point, normal) = point_at_fraction(outline, fraction);
        let bearing_deg = signed_bearing(point - map.centroid());

        let ring =
            planar_kernel::primitives::ellipse_ring(POCKET_SEMI_LATERAL, POCKET_SEMI_VERTICAL, 32);
        let face = kb.face_from_profile(planar_kernel::Profile::new(ring)?)?;
        let pocket = kb.extrude(face, 0.0, depth)?;
        let start = point + normal * wall.inner_offset;
        let placement = xform::translation(start.x, start.y, wall.center_z)
            * xform::rotation_z_deg(signed_bearing(normal) + 90.0)
            * xform::rotation_x_deg(90.0);
        let pocket = kb.transform(pocket, &placement)?;
        body = kb.boolean_subtract(body, pocket)?;

        sites.push(MagnetSite {
            fraction,
            point,
            normal,
            bearing_deg,
        });
    }
    if skipped > 0 {
        diagnostics.warn(format!(
            "skipped {skipped} magnet sites that fall inside finger cutouts"
        ));
    }

    Ok(MagnetRing {
        solid: body,
        sites,
        depth,
        diagnostics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use planar_kernel::{Kernel, KernelIntrospect, PlanarKernel, Profile};

    fn circle_outline(radius: f64, n: usize) -> Outline {
        Outline::new(
            (0..n)
                .map(|i| {
                    let t = i as f64 / n as f64 * std::f64::consts::TAU;
                    [radius * t.cos(), radius * t.sin()]
                })
                .collect(),
        )
        .unwrap()
    }

    // Body material must extend past the outline, where the pockets travel.
    fn disc(kb: &mut PlanarKernel, outline: &Outline, height: f64) -> SolidHandle {
        let face = kb.face_from_profile(Profile::from_outline(outline)).unwrap();
        let padded = kb.offset_face(face, 5.0).unwrap();
        kb.extrude(padded, 0.0, height).unwrap()
    }

    #[test]
    fn ring_spacing_is_exact_and_symmetric() {
        let outline = circle_outline(40.0, 720);
        let map = PolarMap::new(&outline);
        let mut kb = PlanarKernel::new();
        let body = disc(&mut kb, &outline, 8.0);

        let mut cfg = Config::default();
        cfg.magnet_count = 4;
        cfg.magnet_spacing = 10.0;
        cfg.magnet_position = 0.0;
        cfg.wall_xy_thickness = 3.0;
        cfg.magnet_separation_distance = 0.8;

        let ring = execute_magnet_pockets(
            &mut kb,
            body,
            &outline,
            &map,
            &cfg,
            MagnetWall {
                wall_thickness: cfg.wall_xy_thickness,
                inner_offset: 0.0,
                center_z: 4.0,
            },
            &[],
        )
        .unwrap();

        assert_eq!(ring.sites.len(), 4);
        let perimeter = outline.perimeter();
        // Signed arclength from a to b, shorter way around.
        let arc = |a: f64, b: f64| {
            let d = (b - a).rem_euclid(1.0);
            let d = if d > 0.5 { d - 1.0 } else { d };
            d * perimeter
        };
        for pair in ring.sites.windows(2) {
            assert_relative_eq!(arc(pair[0].fraction, pair[1].fraction), 10.0, epsilon = 1e-9);
        }
        // Centered on the 0-degree point: arclengths -15, -5, +5, +15.
        let center = map.query(0.0).fraction;
        assert_relative_eq!(arc(center, ring.sites[0].fraction), -15.0, epsilon = 1e-9);
        assert_relative_eq!(arc(center, ring.sites[3].fraction), 15.0, epsilon = 1e-9);
        // Outermost bearings sit around +-21.5 degrees on a 40mm circle.
        let expect = (15.0f64 / 40.0).to_degrees();
        assert!((ring.sites[0].bearing_deg + expect).abs() < 1.5);
        assert!((ring.sites[3].bearing_deg - expect).abs() < 1.5);
    }

    #[test]
    fn pockets_remove_material_but_keep_one_body() {
        let outline = circle_outline(30.0, 360);
        let map = PolarMap::new(&outline);
        let mut kb = PlanarKernel::new();
        let body = disc(&mut kb, &outline, 8.0);
        let before = kb.volume_estimate(body).unwrap();

        let cfg = Config::default();
        let ring = execute_magnet_pockets(
            &mut kb,
            body,
            &outline,
            &map,
            &cfg,
            MagnetWall {
                wall_thickness: 2.81,
                inner_offset: 0.0,
                center_z: 4.0,
            },
            &[],
        )
        .unwrap();

        assert_eq!(ring.sites.len(), 10);
        assert!(kb.volume_estimate(ring.solid).unwrap() < before);
        assert_eq!(kb.component_count(ring.solid).unwrap(), 1);
    }

    #[test]
    fn shallow_wall_is_rejected() {
        let outline = circle_outline(30.0, 360);
        let map = PolarMap::new(&outline);
        let mut kb = PlanarKernel::new();
        let body = disc(&mut kb, &outline, 8.0);

        let cfg = Config::default();
        let err = execute_magnet_pockets(
            &mut kb,
            body,
            &outline,
            &map,
            &cfg,
            MagnetWall {
                wall_thickness: 2.5,
                inner_offset: 0.0,
                center_z: 4.0,
            },
            &[],
        )
        .unwrap_err();
        assert!(matches!(err, OpError::InvalidParameter { .. }));
    }

    #[test]
    fn zero_count_is_a_noop() {
        let outline = circle_outline(30.0, 360);
        let map = PolarMap::new(&outline);
        let mut kb = PlanarKernel::new();
        let body = disc(&mut kb, &outline, 8.0);

        let mut cfg = Config::default();
        cfg.magnet_count = 0;
        let ring = execute_magnet_pockets(
            &mut kb,
            body,
            &outline,
            &map,
            &cfg,
            MagnetWall {
                wall_thickness: 2.81,
                inner_offset: 0.0,
                center_z: 4.0,
            },
            &[],
        )
        .unwrap();
        assert_eq!(ring.solid, body);
        assert!(ring.sites.is_empty());
    }

    #[test]
    fn blocked_arc_drops_the_covered_sites() {
        let outline = circle_outline(40.0, 720);
        let map = PolarMap::new(&outline);
        let mut kb = PlanarKernel::new();
        let body = disc(&mut kb, &outline, 8.0);

        let mut cfg = Config::default();
        cfg.magnet_count = 4;
        cfg.magnet_spacing = 10.0;
        cfg.magnet_position = 0.0;
        cfg.wall_xy_thickness = 3.0;
        cfg.magnet_separation_distance = 0.8;

        // A 10mm cutout centered on the ring: the two inner sites at
        // arclength -5 and +5 clash, the outer pair at -15 and +15 clears.
        let block = ArcBlock {
            center_fraction: map.query(0.0).fraction,
            half_width: 5.0,
        };
        let ring = execute_magnet_pockets(
            &mut kb,
            body,
            &outline,
            &map,
            &cfg,
            MagnetWall {
                wall_thickness: cfg.wall_xy_thickness,
                inner_offset: 0.0,
                center_z: 4.0,
            },
            &[block],
        )
        .unwrap();

        assert_eq!(ring.sites.len(), 2);
        assert!(ring
            .diagnostics
            .warnings
            .iter()
            .any(|w| w.contains("2 magnet sites")));
    }
}
