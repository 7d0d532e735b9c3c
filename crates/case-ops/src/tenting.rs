//! Tenting stand: a bolt hinge on the +X wall and a stack of fold-out leg
//! flaps that prop the board at an angle.
//!
//! The fixed spine is a stop wedge running the whole axis with wall-welded
//! knuckle plates at the two ends; the middle span stays open for the flap
//! knuckles riding the same bolt. Each flap carries a cam lobe that sweeps
//! with the flap and lands on the wedge's radial face after its open angle
//! of travel; the angle passes vertical, so pressing the board seats the
//! leg harder instead of folding it. Flaps are generated as separate
//! already-printable solids lying flat, and the case base receives through
//! slots the folded plates nest into.

use molt_types::Config;
use planar_kernel::offset::offset_ring;
use planar_kernel::{primitives, xform, Point2, Profile, SolidHandle};

use crate::kernel_ext::KernelBundle;
use crate::types::{Diagnostics, OpError};

/// Axial play between neighboring knuckles.
const AXIAL_CLEARANCE: f64 = 0.2;
/// Radial gap between a swinging knuckle and the fixed spine.
const RADIAL_CLEARANCE: f64 = 0.2;
/// How far the stop faces reach past the knuckle radius.
const STOP_REACH: f64 = 1.0;
/// Bearing of the spine wedge's stop face. Above 90 so every flap lobe
/// starts well clear of the bed when the flap lies flat.
const WEDGE_BEARING_DEG: f64 = 120.0;
/// Travel past the plumb leg angle, so load pushes a deployed flap into
/// the stop rather than back toward folded.
const STABILITY_MARGIN_DEG: f64 = 20.0;
/// Side of the square hook-and-loop recess on the innermost flap.
const VELCRO_SIDE: f64 = 15.0;

/// One fold-out leg.
#[derive(Debug, Clone, Copy)]
pub struct FlapSpec {
    pub width: f64,
    /// Reach from the hinge axis to the far edge.
    pub length: f64,
    /// Skew of the far edge, for uneven left/right tenting.
    pub tilt_deg: f64,
    /// Span between the outer ends of this flap's knuckle pair.
    pub near_length: f64,
    /// Axial inset of the knuckle pair from the hinge ends.
    pub axial_offset: f64,
    /// Travel from folded to the stop.
    pub open_angle_deg: f64,
    /// Cam lobe bearing when folded flat; lobe and wedge faces meet after
    /// exactly `open_angle_deg` of travel.
    pub blocker_angle_deg: f64,
}

/// Placement and sizing shared by every tenting operation.
#[derive(Debug, Clone)]
pub struct TentPlan {
    /// Hinge axis x, one knuckle radius outside the wall.
    pub hinge_x: f64,
    /// Hinge axis y, centered on the outline.
    pub hinge_y: f64,
    /// Knuckle radius, half the wall height.
    pub radius: f64,
    /// Hinge length along the axis, the bolt length.
    pub length: f64,
    pub flaps: Vec<FlapSpec>,
    /// Base through-slots the folded plates nest into, in board coordinates.
    pub slot_footprints: Vec<Profile>,
}

#[derive(Debug, Clone)]
pub struct TentHinge {
    pub solid: SolidHandle,
    pub diagnostics: Diagnostics,
}

#[derive(Debug, Clone)]
pub struct TentFlap {
    pub solid: SolidHandle,
    pub index: usize,
    pub diagnostics: Diagnostics,
}

/// Work out hinge placement, knuckle layout and slot footprints. Legs are
/// laid out longest first, so each flap nests inside the previous one.
///
/// `wall_max_x` is the outer wall surface at the +X extreme and `center_y`
/// the outline's bounding-box center.
pub fn plan_tenting(cfg: &Config, wall_max_x: f64, center_y: f64) -> Result<TentPlan, OpError> {
    if cfg.tent_legs.is_empty() {
        return Err(OpError::InvalidParameter {
            reason: "tenting needs at least one leg in tent_legs".to_string(),
        });
    }
    for leg in &cfg.tent_legs {
        if leg[0] <= 0.0 || leg[1] <= 0.0 {
            return Err(OpError::InvalidParameter {
                reason: format!("tent leg {}x{} must have positive width and length", leg[0], leg[1]),
            });
        }
    }
    let hw = cfg.tent_hinge_width;
    let legs = cfg.tent_legs.len();
    let needed = 2.0 * ((hw + AXIAL_CLEARANCE) * legs as f64 + hw);
    if needed > cfg.tent_hinge_bolt_l {
        return Err(OpError::InvalidParameter {
            reason: format!(
                "{legs} leg(s) need {needed:.1}mm of hinge, tent_hinge_bolt_l is {}",
                cfg.tent_hinge_bolt_l
            ),
        });
    }

    let radius = cfg.wall_height() / 2.0;
    let length = cfg.tent_hinge_bolt_l;
    let hinge_x = wall_max_x + radius;
    let setback = axle_setback(cfg);
    if cfg.base_z_thickness + AXIAL_CLEARANCE >= radius {
        return Err(OpError::InvalidParameter {
            reason: format!(
                "base {}mm thick cannot fold under a {radius:.1}mm hinge",
                cfg.base_z_thickness
            ),
        });
    }

    let mut sorted = cfg.tent_legs.clone();
    sorted.sort_by(|a, b| b[1].total_cmp(&a[1]));

    let mut flaps = Vec::with_capacity(legs);
    let mut slot_footprints = Vec::with_capacity(legs);
    for (i, leg) in sorted.iter().enumerate() {
        let axial_offset = (hw + AXIAL_CLEARANCE) * (i + 1) as f64;
        let near_length = length - 2.0 * axial_offset;
        // The leg holds once it swings past plumb; plumb from the plate is
        // acos(radius / length), and the margin carries it over center.
        let open_angle_deg =
            (radius / leg[1]).min(1.0).acos().to_degrees() + STABILITY_MARGIN_DEG;
        let spec = FlapSpec {
            width: leg[0],
            length: leg[1],
            tilt_deg: leg[2],
            near_length,
            axial_offset,
            open_angle_deg,
            blocker_angle_deg: WEDGE_BEARING_DEG - open_angle_deg,
        };

        // Slot = the folded plate footprint grown by the swing clearance.
        let plate = Profile::new(plate_ring(&spec, setback, hinge_x, center_y))?;
        let grown = offset_ring(plate.outer(), RADIAL_CLEARANCE)?;
        slot_footprints.push(Profile::new(grown)?);
        flaps.push(spec);
    }

    Ok(TentPlan {
        hinge_x,
        hinge_y: center_y,
        radius,
        length,
        flaps,
        slot_footprints,
    })
}

/// Weld the fixed hinge spine onto the case wall.
pub fn execute_tent_hinge(
    kb: &mut dyn KernelBundle,
    case: SolidHandle,
    plan: &TentPlan,
    cfg: &Config,
) -> Result<TentHinge, OpError> {
    let r = plan.radius;
    let l = plan.length;
    let hw = cfg.tent_hinge_width;
    let pocket = (cfg.tent_hinge_bolt_head_d / 2.0).max(cfg.tent_hinge_nut_d / 3.0f64.sqrt());
    if pocket + 0.3 >= r {
        return Err(OpError::InvalidParameter {
            reason: format!(
                "hinge radius {r:.1} cannot swallow a {}mm bolt head",
                cfg.tent_hinge_bolt_head_d
            ),
        });
    }

    // Cross-sections live in the axis frame: x toward +X of the board,
    // y up, the axis along z. The stop wedge spans the middle; full
    // wall-welded knuckle plates sit only at the ends, leaving the rest of
    // the axis to the flap knuckles and the fold-under path beneath it.
    let wedge_face = kb.face_from_profile(Profile::new(stop_wedge_ring(r))?)?;
    let mut spine = kb.extrude(wedge_face, -l / 2.0 + hw, l - 2.0 * hw)?;
    for z0 in [-l / 2.0, l / 2.0 - hw] {
        let face = kb.face_from_profile(Profile::new(end_plate_ring(r))?)?;
        let plate = kb.extrude(face, z0, hw)?;
        spine = kb.boolean_union(spine, plate)?;
    }

    // Bolt bore, slightly tall for printed hole shrink.
    let bore_face = kb.face_from_profile(Profile::new(primitives::ellipse_ring(
        cfg.tent_hinge_bolt_d / 2.0,
        cfg.tent_hinge_bolt_d / 2.0 * 1.1,
        24,
    ))?)?;
    let bore = kb.extrude(bore_face, -l / 2.0 - 1.0, l + 2.0)?;
    spine = kb.boolean_subtract(spine, bore)?;

    // Countersink cone at the +z end, nut pocket at the -z end.
    let cs_depth = (cfg.tent_hinge_bolt_head_d - cfg.tent_hinge_bolt_d) / 2.0;
    if cs_depth > 0.0 {
        let cs_face = kb.face_from_profile(Profile::new(primitives::circle_ring(
            cfg.tent_hinge_bolt_d / 2.0,
            24,
        ))?)?;
        let sink = kb.extrude_tapered(cs_face, l / 2.0 - cs_depth, cs_depth, 45.0)?;
        spine = kb.boolean_subtract(spine, sink)?;
    }
    let nut_face =
        kb.face_from_profile(Profile::new(primitives::hexagon_ring(cfg.tent_hinge_nut_d))?)?;
    let nut = kb.extrude(nut_face, -l / 2.0, cfg.tent_hinge_nut_l)?;
    spine = kb.boolean_subtract(spine, nut)?;

    let placement = xform::translation(plan.hinge_x, plan.hinge_y, r) * xform::rotation_x_deg(90.0);
    let spine = kb.transform(spine, &placement)?;
    let solid = kb.boolean_union(case, spine)?;

    Ok(TentHinge {
        solid,
        diagnostics: Diagnostics::default(),
    })
}

/// Cut the base through-slots the folded flaps nest into.
pub fn execute_storage_slots(
    kb: &mut dyn KernelBundle,
    case: SolidHandle,
    plan: &TentPlan,
    cfg: &Config,
) -> Result<SolidHandle, OpError> {
    let mut body = case;
    for footprint in &plan.slot_footprints {
        let face = kb.face_from_profile(footprint.clone())?;
        let cutter = kb.extrude(face, -0.5, cfg.base_z_thickness + 1.0)?;
        body = kb.boolean_subtract(body, cutter)?;
    }
    Ok(body)
}

/// Build one leg flap, lying flat and print-ready: plate on the bed, knuckle
/// pair touching it, bolt bore horizontal.
pub fn execute_tent_flap(
    kb: &mut dyn KernelBundle,
    plan: &TentPlan,
    cfg: &Config,
    index: usize,
) -> Result<TentFlap, OpError> {
    let Some(spec) = plan.flaps.get(index) else {
        return Err(OpError::InvalidParameter {
            reason: format!("flap index {index} out of range, plan has {}", plan.flaps.len()),
        });
    };
    let mut diagnostics = Diagnostics::default();

    let r = plan.radius;
    let t = cfg.base_z_thickness;
    let setback = axle_setback(cfg);
    // The plate is set back from the axis to clear the bolt; it must still
    // overlap the knuckle discs to weld into one body.
    let weld_halfwidth = (2.0 * r * t - t * t).max(0.0).sqrt();
    if weld_halfwidth <= setback + 0.2 {
        return Err(OpError::InvalidParameter {
            reason: format!(
                "plate thickness {t} cannot reach the {r:.1}mm knuckle past the bolt clearance"
            ),
        });
    }

    let mut body = flap_blank(kb, spec, r, t, setback, cfg)?;
    // Inner flaps fold into the same plane, so carve their silhouettes out.
    for inner in &plan.flaps[index + 1..] {
        if inner.width >= spec.width {
            diagnostics.warn(format!(
                "nested {:.0}mm-wide leg may cut the {:.0}mm flap around it apart",
                inner.width, spec.width
            ));
        }
        let pocket = flap_blank(kb, inner, r, t, setback, cfg)?;
        body = kb.boolean_subtract(body, pocket)?;
    }

    // Bolt bore through both knuckles.
    let bore_face = kb.face_from_profile(Profile::new(primitives::ellipse_ring(
        cfg.tent_hinge_bolt_d / 2.0,
        cfg.tent_hinge_bolt_d / 2.0 * 1.1,
        24,
    ))?)?;
    let half = spec.near_length / 2.0 + 1.0;
    let bore = kb.extrude(bore_face, -half, 2.0 * half)?;
    let bore = kb.transform(bore, &knuckle_placement(r))?;
    body = kb.boolean_subtract(body, bore)?;

    if index + 1 == plan.flaps.len() {
        body = velcro_divot(kb, body, spec, t, setback, &mut diagnostics)?;
    }
    if index > 0 {
        body = grip_ridge(kb, body, spec, t, setback, &mut diagnostics)?;
    }

    Ok(TentFlap {
        solid: body,
        index,
        diagnostics,
    })
}

/// Build every flap in stack order.
pub fn execute_tent_flaps(
    kb: &mut dyn KernelBundle,
    plan: &TentPlan,
    cfg: &Config,
) -> Result<Vec<TentFlap>, OpError> {
    (0..plan.flaps.len())
        .map(|i| execute_tent_flap(kb, plan, cfg, i))
        .collect()
}

/// Plate plus knuckle pair, no bores or surface details. Also the silhouette
/// an outer flap subtracts for nesting.
fn flap_blank(
    kb: &mut dyn KernelBundle,
    spec: &FlapSpec,
    r: f64,
    t: f64,
    setback: f64,
    cfg: &Config,
) -> Result<SolidHandle, OpError> {
    let plate_face = kb.face_from_profile(Profile::new(plate_ring(spec, setback, 0.0, 0.0))?)?;
    let mut body = kb.extrude(plate_face, 0.0, t)?;

    let ring = knuckle_ring(r, spec.blocker_angle_deg);
    let near = spec.near_length / 2.0;
    let hw = cfg.tent_hinge_width;
    for span_start in [near - hw, -near] {
        let face = kb.face_from_profile(Profile::new(ring.clone())?)?;
        let barrel = kb.extrude(face, span_start, hw)?;
        let barrel = kb.transform(barrel, &knuckle_placement(r))?;
        body = kb.boolean_union(body, barrel)?;
    }
    Ok(body)
}

/// Stand a cross-section up: profile plane becomes XZ, extrusion runs along
/// the y axis, the axis line ends up at height `r`.
fn knuckle_placement(r: f64) -> nalgebra::Matrix4<f64> {
    xform::translation(0.0, 0.0, r) * xform::rotation_x_deg(90.0)
}

fn velcro_divot(
    kb: &mut dyn KernelBundle,
    body: SolidHandle,
    spec: &FlapSpec,
    t: f64,
    setback: f64,
    diagnostics: &mut Diagnostics,
) -> Result<SolidHandle, OpError> {
    let fits =
        spec.width >= VELCRO_SIDE + 2.0 && spec.length - VELCRO_SIDE > setback + 1.0;
    if !fits {
        diagnostics.warn(format!(
            "flap {}x{} too small for a {VELCRO_SIDE}mm hook-and-loop recess, skipping",
            spec.width, spec.length
        ));
        return Ok(body);
    }
    // Flush with the far edge, the patch grabs the board when folded away.
    let center = -(spec.length - VELCRO_SIDE / 2.0);
    let ring = primitives::rectangle_ring(VELCRO_SIDE, VELCRO_SIDE)
        .into_iter()
        .map(|p| Point2::new(p.x + center, p.y))
        .collect();
    let face = kb.face_from_profile(Profile::new(ring)?)?;
    let cutter = kb.extrude(face, t / 2.0, t)?;
    Ok(kb.boolean_subtract(body, cutter)?)
}

/// Semi-elliptical detent riding one side edge near the far end. Folding the
/// stack shut clicks it past the enclosing flap's cut edge.
fn grip_ridge(
    kb: &mut dyn KernelBundle,
    body: SolidHandle,
    spec: &FlapSpec,
    t: f64,
    setback: f64,
    diagnostics: &mut Diagnostics,
) -> Result<SolidHandle, OpError> {
    let semi_along = spec.length / 6.0;
    let semi_across = 2.0;
    let station = spec.length - semi_along - 2.0;
    if station - semi_along <= setback + 1.0 {
        diagnostics.warn(format!(
            "flap length {} leaves no room for a grip ridge, skipping",
            spec.length
        ));
        return Ok(body);
    }
    // Hug the +y side edge, interpolated between the plate corners.
    let far = spec.length - spec.width / 2.0 * spec.tilt_deg.to_radians().tan();
    let frac = (station - setback) / (far - setback);
    let edge_y = spec.near_length / 2.0 + (spec.width / 2.0 - spec.near_length / 2.0) * frac;
    let ring: Vec<Point2> = primitives::ellipse_ring(semi_along, semi_across, 24)
        .into_iter()
        .map(|p| Point2::new(p.x - station, p.y + edge_y - semi_across))
        .collect();
    let face = kb.face_from_profile(Profile::new(ring)?)?;
    // Shrinking sides keep the bump self-supporting when printed flat.
    let bump = kb.extrude_tapered(face, t, t / 2.0, -45.0)?;
    Ok(kb.boolean_union(body, bump)?)
}

/// Trapezoidal plate footprint. Tilt skews the far edge so the board tents
/// higher on one side. `dx`/`dy` shift the ring into board coordinates.
fn plate_ring(spec: &FlapSpec, setback: f64, dx: f64, dy: f64) -> Vec<Point2> {
    let skew = spec.width / 2.0 * spec.tilt_deg.to_radians().tan();
    vec![
        Point2::new(dx - setback, dy - spec.near_length / 2.0),
        Point2::new(dx - (spec.length + skew), dy - spec.width / 2.0),
        Point2::new(dx - (spec.length - skew), dy + spec.width / 2.0),
        Point2::new(dx - setback, dy + spec.near_length / 2.0),
    ]
}

/// Knuckle cross-section: a circle with a cam lobe. The lobe's outer face is
/// a circular arc bowed out a sixth of its chord, running from the circle
/// bottom to STOP_REACH past the radius at the lobe bearing, where a radial
/// stop face closes it.
fn knuckle_ring(r: f64, lobe_deg: f64) -> Vec<Point2> {
    let (tip_sin, tip_cos) = lobe_deg.to_radians().sin_cos();
    let tip = Point2::new((r + STOP_REACH) * tip_cos, (r + STOP_REACH) * tip_sin);
    let foot = Point2::new(0.0, -r);

    let mut ring = Vec::new();
    // Circle from the lobe bearing counter-clockwise around to the bottom.
    let steps = 56;
    for i in 0..=steps {
        let a = (lobe_deg + (270.0 - lobe_deg) * i as f64 / steps as f64).to_radians();
        ring.push(Point2::new(r * a.cos(), r * a.sin()));
    }

    // Bowed arc through foot and tip; where it dips inside the circle the
    // barrel surface wins.
    let (dx, dy) = (tip.x - foot.x, tip.y - foot.y);
    let chord = dx.hypot(dy);
    let sag = chord / 6.0;
    let arc_r = chord * chord / (8.0 * sag) + sag / 2.0;
    let (mx, my) = ((tip.x + foot.x) / 2.0, (tip.y + foot.y) / 2.0);
    let (mut nx, mut ny) = (-dy / chord, dx / chord);
    if nx * mx + ny * my < 0.0 {
        (nx, ny) = (-nx, -ny);
    }
    let (cx, cy) = (mx - nx * (arc_r - sag), my - ny * (arc_r - sag));

    let ramp_steps = 24;
    for i in 1..ramp_steps {
        let a = (270.0 + (90.0 + lobe_deg) * i as f64 / ramp_steps as f64).to_radians();
        let along = a.cos() * cx + a.sin() * cy;
        let rho = along + (along * along - cx * cx - cy * cy + arc_r * arc_r).sqrt();
        let rho = rho.max(r);
        ring.push(Point2::new(rho * a.cos(), rho * a.sin()));
    }
    ring.push(tip);
    ring
}

/// How far the plate near edge stands off the axis to clear the bolt bore.
fn axle_setback(cfg: &Config) -> f64 {
    cfg.tent_hinge_bolt_d / 2.0 * 1.1 + 0.5
}

/// Fixed stop wedge cross-section in the axis frame: a bar hugging the
/// upper-left of the knuckle circle at RADIAL_CLEARANCE, ending in the
/// radial stop face at WEDGE_BEARING_DEG. Bottom corners are beveled about
/// 45 degrees so the overhang prints without support.
fn stop_wedge_ring(r: f64) -> Vec<Point2> {
    let rc = r + RADIAL_CLEARANCE;
    let tip = r + STOP_REACH;
    let (wsin, wcos) = WEDGE_BEARING_DEG.to_radians().sin_cos();
    let back = -1.5 * r;
    let bevel = 0.4 * (0.5 * r - RADIAL_CLEARANCE);

    let mut ring = vec![
        Point2::new(back, bevel),
        Point2::new(back + bevel, 0.0),
        Point2::new(-rc - bevel, 0.0),
    ];
    let start = 180.0 - (bevel / rc).asin().to_degrees();
    let steps = 12;
    for i in 0..=steps {
        let a = (start + (WEDGE_BEARING_DEG - start) * i as f64 / steps as f64).to_radians();
        ring.push(Point2::new(rc * a.cos(), rc * a.sin()));
    }
    ring.push(Point2::new(tip * wcos, tip * wsin));
    ring.push(Point2::new(back, tip * wsin));
    ring
}

/// Wall-welded end plate cross-section: the knuckle disc merged with a web
/// reaching half a radius into the wall. The underside is flattened into a
/// 45 degree ramp landing on a flat strip, so the disc prints on the bed
/// without support.
fn end_plate_ring(r: f64) -> Vec<Point2> {
    let back = -1.5 * r;
    let mut ring = vec![
        Point2::new(back, -r),
        Point2::new(r * (std::f64::consts::SQRT_2 - 1.0), -r),
    ];
    // Disc arc from the top of the ramp around to the wall side.
    let steps = 27;
    for i in 0..=steps {
        let a = (-45.0 + 135.0 * i as f64 / steps as f64).to_radians();
        ring.push(Point2::new(r * a.cos(), r * a.sin()));
    }
    ring.push(Point2::new(back, r));
    ring
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use molt_types::Outline;
    use planar_kernel::offset::signed_ring_area;
    use planar_kernel::{Kernel, KernelIntrospect, PlanarKernel};

    fn two_leg_config() -> Config {
        let mut cfg = Config::default();
        cfg.tenting_stand = true;
        cfg.tent_legs = vec![[30.0, 50.0, 0.0], [26.0, 40.0, 0.0]];
        cfg
    }

    #[test]
    fn plan_lays_out_knuckles_inside_the_bolt() {
        let cfg = two_leg_config();
        let plan = plan_tenting(&cfg, 27.81, 0.0).unwrap();
        assert_eq!(plan.flaps.len(), 2);
        assert_relative_eq!(plan.radius, 4.0, epsilon = 1e-12);
        assert_relative_eq!(plan.hinge_x, 31.81, epsilon = 1e-12);

        let f0 = &plan.flaps[0];
        assert_relative_eq!(f0.axial_offset, 5.2, epsilon = 1e-12);
        assert_relative_eq!(f0.near_length, 50.0 - 10.4, epsilon = 1e-12);
        let open = (4.0f64 / 50.0).acos().to_degrees() + 20.0;
        assert_relative_eq!(f0.open_angle_deg, open, epsilon = 1e-9);
        assert_relative_eq!(f0.blocker_angle_deg, 120.0 - open, epsilon = 1e-9);
        // A lobe never folds below the bed plane.
        assert!(f0.blocker_angle_deg > 0.0);
        // Knuckle pairs of different flaps never share an axial span.
        let f1 = &plan.flaps[1];
        assert!(f1.near_length < f0.near_length - cfg.tent_hinge_width);
        assert_eq!(plan.slot_footprints.len(), 2);
    }

    #[test]
    fn legs_are_sorted_longest_first() {
        let mut cfg = Config::default();
        cfg.tenting_stand = true;
        cfg.tent_legs = vec![[26.0, 40.0, 0.0], [30.0, 50.0, 0.0]];
        let plan = plan_tenting(&cfg, 27.81, 0.0).unwrap();
        assert_relative_eq!(plan.flaps[0].length, 50.0, epsilon = 1e-12);
        assert_relative_eq!(plan.flaps[1].length, 40.0, epsilon = 1e-12);
        // The longer leg also opens wider before its stop.
        assert!(plan.flaps[0].open_angle_deg > plan.flaps[1].open_angle_deg);
    }

    #[test]
    fn overstuffed_bolt_is_rejected() {
        let mut cfg = Config::default();
        cfg.tent_legs = vec![[30.0, 90.0, 0.0]; 4];
        cfg.tent_hinge_bolt_l = 30.0;
        assert!(matches!(
            plan_tenting(&cfg, 27.81, 0.0),
            Err(OpError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn hinge_welds_to_the_case_wall() {
        let cfg = two_leg_config();
        let outline =
            Outline::new(vec![[-25.0, -25.0], [25.0, -25.0], [25.0, 25.0], [-25.0, 25.0]]).unwrap();
        let mut kb = PlanarKernel::new();
        let face = kb
            .face_from_profile(Profile::from_outline(&outline))
            .unwrap();
        let rim = kb.offset_face(face, cfg.wall_xy_thickness).unwrap();
        let case = kb.extrude(rim, 0.0, cfg.wall_height()).unwrap();
        let before = kb.volume_estimate(case).unwrap();

        let plan = plan_tenting(&cfg, 27.81, 0.0).unwrap();
        let hinge = execute_tent_hinge(&mut kb, case, &plan, &cfg).unwrap();
        assert!(kb.volume_estimate(hinge.solid).unwrap() > before);
        assert_eq!(kb.component_count(hinge.solid).unwrap(), 1);

        let bb = kb.bounding_box(hinge.solid).unwrap();
        // End knuckles reach one diameter past the wall surface.
        assert_relative_eq!(bb.max[0], 27.81 + 2.0 * plan.radius, epsilon = 1e-6);
        // The stop wedge crests just past the wall top.
        let crest =
            plan.radius + (plan.radius + STOP_REACH) * WEDGE_BEARING_DEG.to_radians().sin();
        assert_relative_eq!(bb.max[2], crest, epsilon = 1e-6);
        assert!(bb.min[2] > -1e-9);
    }

    #[test]
    fn flaps_print_flat_and_nest() {
        let cfg = two_leg_config();
        let plan = plan_tenting(&cfg, 27.81, 0.0).unwrap();
        let mut kb = PlanarKernel::new();

        let flaps = execute_tent_flaps(&mut kb, &plan, &cfg).unwrap();
        assert_eq!(flaps.len(), 2);
        for flap in &flaps {
            let bb = kb.bounding_box(flap.solid).unwrap();
            assert!(bb.min[2] > -1e-9, "flap must rest on the bed");
            // Lobes stay folded low, so the barrel top is the high point.
            assert!((bb.max[2] - 2.0 * plan.radius).abs() < 1e-2);
            assert_eq!(kb.component_count(flap.solid).unwrap(), 1);
        }

        // The outer flap is carved where the inner one folds through it.
        let mut solo = cfg.clone();
        solo.tent_legs = vec![[30.0, 50.0, 0.0]];
        let solo_plan = plan_tenting(&solo, 27.81, 0.0).unwrap();
        let mut kb2 = PlanarKernel::new();
        let alone = execute_tent_flap(&mut kb2, &solo_plan, &solo, 0).unwrap();
        assert!(
            kb.volume_estimate(flaps[0].solid).unwrap()
                < kb2.volume_estimate(alone.solid).unwrap()
        );
    }

    #[test]
    fn innermost_flap_carries_the_velcro_recess() {
        let cfg = two_leg_config();
        let plan = plan_tenting(&cfg, 27.81, 0.0).unwrap();
        let mut kb = PlanarKernel::new();

        let flap = execute_tent_flap(&mut kb, &plan, &cfg, 1).unwrap();
        assert!(flap.diagnostics.warnings.is_empty());

        // Divot and bore outweigh the grip ridge the same flap gains.
        let blank = flap_blank(
            &mut kb,
            &plan.flaps[1],
            plan.radius,
            cfg.base_z_thickness,
            axle_setback(&cfg),
            &cfg,
        )
        .unwrap();
        assert!(
            kb.volume_estimate(flap.solid).unwrap() < kb.volume_estimate(blank).unwrap()
        );
    }

    #[test]
    fn storage_slots_pierce_the_base() {
        let cfg = two_leg_config();
        let plan = plan_tenting(&cfg, 27.81, 0.0).unwrap();
        let mut kb = PlanarKernel::new();
        let outline =
            Outline::new(vec![[-25.0, -25.0], [25.0, -25.0], [25.0, 25.0], [-25.0, 25.0]]).unwrap();
        let face = kb
            .face_from_profile(Profile::from_outline(&outline))
            .unwrap();
        let slab = kb.extrude(face, 0.0, cfg.base_z_thickness).unwrap();
        let before = kb.volume_estimate(slab).unwrap();

        let carved = execute_storage_slots(&mut kb, slab, &plan, &cfg).unwrap();
        let after = kb.volume_estimate(carved).unwrap();
        assert!(after < before);
    }

    #[test]
    fn knuckle_ring_is_a_valid_cam() {
        let ring = knuckle_ring(4.0, 15.0);
        assert!(signed_ring_area(&ring) > 0.0);
        let reaches: Vec<f64> = ring.iter().map(|p| p.coords.norm()).collect();
        let max_reach = reaches.iter().cloned().fold(0.0, f64::max);
        let min_reach = reaches.iter().cloned().fold(f64::INFINITY, f64::min);
        assert_relative_eq!(max_reach, 5.0, epsilon = 1e-9);
        // The ramp never cuts below the bearing surface.
        assert!(min_reach > 4.0 - 1e-9);
        // The stop tip sits at the lobe bearing.
        let tip = ring.last().unwrap();
        assert_relative_eq!(tip.y.atan2(tip.x).to_degrees(), 15.0, epsilon = 1e-9);
    }

    #[test]
    fn stop_faces_meet_after_the_open_travel() {
        let cfg = two_leg_config();
        let plan = plan_tenting(&cfg, 27.81, 0.0).unwrap();
        for flap in &plan.flaps {
            assert_relative_eq!(
                flap.blocker_angle_deg + flap.open_angle_deg,
                WEDGE_BEARING_DEG,
                epsilon = 1e-9
            );
        }
        // The wedge's stop face reaches as far out as the lobe tips.
        let wedge = stop_wedge_ring(plan.radius);
        let (wsin, wcos) = WEDGE_BEARING_DEG.to_radians().sin_cos();
        let reach = plan.radius + STOP_REACH;
        let tip = Point2::new(reach * wcos, reach * wsin);
        assert!(wedge.iter().any(|p| (p - tip).norm() < 1e-9));
    }
}
