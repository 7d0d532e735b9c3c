//! Assembly of the case half: floor, friction wall and every enabled
//! attachment feature, in an order that keeps later cuts from colliding
//! with earlier additions.

use case_ops::{
    execute_case_lip_recess, execute_finger_cutout, execute_friction_cavity,
    execute_magnet_pockets, execute_rim_chamfer, execute_storage_slots, execute_strap_loop,
    execute_tent_hinge, honeycomb_profile, ArcBlock, ChamferEdge, Diagnostics, KernelBundle,
    MagnetSite, MagnetWall, NotchFrom, NotchSpec, PolarMap, TentPlan,
};
use molt_types::{Config, Outline};
use planar_kernel::{Profile, SolidHandle};

use crate::types::EngineError;

#[derive(Debug, Clone)]
pub struct CaseBuild {
    pub solid: SolidHandle,
    pub diagnostics: Diagnostics,
}

/// Build one case half sitting on z=0, board cavity opening upward.
pub fn build_case(
    kb: &mut dyn KernelBundle,
    outline: &Outline,
    map: &PolarMap,
    cfg: &Config,
    tent: Option<&TentPlan>,
) -> Result<CaseBuild, EngineError> {
    let mut diagnostics = Diagnostics::default();
    if cfg.strap_loop && cfg.tenting_stand {
        diagnostics.warn("strap loop and tenting stand both claim the +X wall");
    }
    let h = cfg.wall_height();

    let outline_face = kb.face_from_profile(Profile::from_outline(outline))?;
    let rim_face = kb.offset_face(outline_face, cfg.wall_xy_thickness)?;

    // Wall block over the full footprint, hollowed by the friction cavity
    // and opened below the board so the floor slab is free to differ.
    let mut body = kb.extrude(rim_face, 0.0, h)?;
    let friction = execute_friction_cavity(kb, outline_face, cfg)?;
    diagnostics.merge(friction.diagnostics.clone());
    body = kb.boolean_subtract(body, friction.solid)?;
    let floor_void = kb.extrude(outline_face, 0.0, cfg.base_z_thickness)?;
    body = kb.boolean_subtract(body, floor_void)?;

    let top = execute_rim_chamfer(kb, body, rim_face, ChamferEdge::Top, cfg.chamfer_len)?;
    diagnostics.merge(top.diagnostics);
    body = top.solid;

    let footprint = Profile::from_outline(outline);
    let floor_profile = if cfg.honeycomb_base {
        let pattern =
            honeycomb_profile(footprint, cfg.honeycomb_radius, cfg.honeycomb_thickness)?;
        diagnostics.merge(pattern.diagnostics);
        pattern.profile
    } else {
        footprint
    };
    let floor_face = kb.face_from_profile(floor_profile)?;
    let floor = kb.extrude(floor_face, 0.0, cfg.base_z_thickness)?;
    body = kb.boolean_union(body, floor)?;

    let bottom = execute_rim_chamfer(kb, body, rim_face, ChamferEdge::Bottom, cfg.chamfer_len)?;
    diagnostics.merge(bottom.diagnostics);
    body = bottom.solid;

    for [position, width] in cutouts(cfg) {
        warn_cutout_conflicts(cfg, position, &mut diagnostics);
        let spec = NotchSpec {
            bearing_deg: position,
            width,
            depth: h / 2.0,
            rim_z: h,
            from: NotchFrom::Top,
            inner_offset: 0.0,
            wall_thickness: cfg.wall_xy_thickness,
        };
        let cut = execute_finger_cutout(kb, body, map, spec)?;
        diagnostics.merge(cut.diagnostics);
        body = cut.solid;
    }

    if cfg.carrycase {
        let recess = execute_case_lip_recess(kb, body, outline, map, cfg)?;
        diagnostics.merge(recess.diagnostics);
        body = recess.solid;

        if cfg.magnet_count > 0 {
            let center_z = h / 2.0;
            let wall = MagnetWall {
                wall_thickness: cfg.wall_xy_thickness,
                inner_offset: friction.tolerance_at(center_z),
                center_z,
            };
            let blocks = magnet_blocks(map, cfg);
            let ring = execute_magnet_pockets(kb, body, outline, map, cfg, wall, &blocks)?;
            diagnostics.merge(ring.diagnostics.clone());
            warn_blocked_sites(cfg, &ring.sites, &mut diagnostics);
            body = ring.solid;
        }
    }

    if cfg.strap_loop {
        let strap = execute_strap_loop(kb, body, outline, cfg, h)?;
        diagnostics.merge(strap.diagnostics);
        body = strap.solid;
    }

    if let Some(plan) = tent {
        let hinge = execute_tent_hinge(kb, body, plan, cfg)?;
        diagnostics.merge(hinge.diagnostics);
        body = execute_storage_slots(kb, hinge.solid, plan, cfg)?;
    }

    Ok(CaseBuild {
        solid: body,
        diagnostics,
    })
}

/// The primary cutout followed by any extra ones.
fn cutouts(cfg: &Config) -> Vec<[f64; 2]> {
    let mut all = vec![[cfg.cutout_position, cfg.cutout_width]];
    all.extend(cfg.additional_cutouts.iter().copied());
    all
}

/// Boundary spans no magnet may sit behind. Case and carrycase use the
/// identical list so their rings stay paired site for site.
pub(crate) fn magnet_blocks(map: &PolarMap, cfg: &Config) -> Vec<ArcBlock> {
    let mut blocks: Vec<ArcBlock> = cutouts(cfg)
        .into_iter()
        .map(|[position, width]| ArcBlock {
            center_fraction: map.query(position).fraction,
            half_width: width / 2.0,
        })
        .collect();
    if cfg.carrycase {
        blocks.push(ArcBlock {
            center_fraction: map.query(cfg.carrycase_cutout_position).fraction,
            half_width: cfg.carrycase_cutout_xy_width / 2.0,
        });
    }
    blocks
}

fn wrap_deg(bearing: f64) -> f64 {
    (bearing + 180.0).rem_euclid(360.0) - 180.0
}

/// The +X wall can host a strap lug or a hinge; a cutout aimed there would
/// be filled back in by them.
fn warn_cutout_conflicts(cfg: &Config, bearing: f64, diagnostics: &mut Diagnostics) {
    let b = wrap_deg(bearing).abs();
    if cfg.strap_loop && b < 45.0 {
        diagnostics.warn(format!(
            "finger cutout at {bearing}\u{b0} runs into the strap loop wall"
        ));
    }
    if cfg.tenting_stand && b < 30.0 {
        diagnostics.warn(format!(
            "finger cutout at {bearing}\u{b0} runs into the tenting hinge"
        ));
    }
}

fn warn_blocked_sites(cfg: &Config, sites: &[MagnetSite], diagnostics: &mut Diagnostics) {
    if !cfg.strap_loop && !cfg.tenting_stand {
        return;
    }
    for site in sites {
        if wrap_deg(site.bearing_deg).abs() < 45.0 {
            diagnostics.warn(format!(
                "magnet pocket at {:.0}\u{b0} sits behind the +X attachment and may stay blocked",
                site.bearing_deg
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use case_ops::plan_tenting;
    use planar_kernel::{KernelIntrospect, PlanarKernel};

    fn square_outline() -> Outline {
        Outline::new(vec![[-25.0, -25.0], [25.0, -25.0], [25.0, 25.0], [-25.0, 25.0]]).unwrap()
    }

    fn plain_config() -> Config {
        let mut cfg = Config::default();
        cfg.carrycase = false;
        cfg.honeycomb_base = false;
        cfg.strap_loop = false;
        cfg.tenting_stand = false;
        cfg.chamfer_len = 0.0;
        cfg.z_space_under_pcb = 0.0;
        cfg.wall_xy_thickness = 2.0;
        cfg.wall_xy_bottom_tolerance = 0.0;
        cfg.wall_xy_top_tolerance = 0.0;
        cfg
    }

    #[test]
    fn plain_case_has_the_expected_envelope() {
        let outline = square_outline();
        let cfg = plain_config();
        let mut kb = PlanarKernel::new();
        let map = PolarMap::new(&outline);

        let case = build_case(&mut kb, &outline, &map, &cfg, None).unwrap();
        assert_eq!(kb.component_count(case.solid).unwrap(), 1);

        let bb = kb.bounding_box(case.solid).unwrap();
        assert_relative_eq!(bb.max[0] - bb.min[0], 54.0, epsilon = 1e-6);
        assert_relative_eq!(bb.max[1] - bb.min[1], 54.0, epsilon = 1e-6);
        assert_relative_eq!(bb.max[2] - bb.min[2], 7.0, epsilon = 1e-6);
    }

    #[test]
    fn plain_case_volume_is_floor_plus_wall_ring() {
        let outline = square_outline();
        let cfg = plain_config();
        let mut kb = PlanarKernel::new();
        let map = PolarMap::new(&outline);

        let case = build_case(&mut kb, &outline, &map, &cfg, None).unwrap();
        // Floor 50x50x3 plus a straight 2mm wall ring up to z=7, minus one
        // finger notch (15 wide, half the 7mm height plus over-travel, swept
        // 4mm).
        let floor = 50.0 * 50.0 * 3.0;
        let ring = (54.0 * 54.0 - 50.0 * 50.0) * 7.0;
        let vol = kb.volume_estimate(case.solid).unwrap();
        assert!(vol < floor + ring - 250.0);
        assert!(vol > floor + ring - 320.0);
    }

    #[test]
    fn honeycomb_floor_removes_material() {
        let outline = square_outline();
        let mut cfg = plain_config();
        let mut kb = PlanarKernel::new();
        let map = PolarMap::new(&outline);
        let solid = build_case(&mut kb, &outline, &map, &cfg, None)
            .unwrap()
            .solid;

        cfg.honeycomb_base = true;
        let mut kb2 = PlanarKernel::new();
        let vented = build_case(&mut kb2, &outline, &map, &cfg, None)
            .unwrap()
            .solid;
        assert!(kb2.volume_estimate(vented).unwrap() < kb.volume_estimate(solid).unwrap());
        assert_eq!(kb2.component_count(vented).unwrap(), 1);
    }

    #[test]
    fn full_feature_case_stays_one_body() {
        let outline = square_outline();
        let mut cfg = Config::default();
        cfg.tenting_stand = true;
        let mut kb = PlanarKernel::new();
        let map = PolarMap::new(&outline);

        let wall_max_x = outline.bounds().1[0] + cfg.wall_xy_thickness;
        let plan = plan_tenting(&cfg, wall_max_x, 0.0).unwrap();
        let case = build_case(&mut kb, &outline, &map, &cfg, Some(&plan)).unwrap();
        assert_eq!(kb.component_count(case.solid).unwrap(), 1);
        // Hinge knuckles are the farthest +X feature.
        let bb = kb.bounding_box(case.solid).unwrap();
        assert_relative_eq!(
            bb.max[0],
            wall_max_x + 2.0 * plan.radius,
            epsilon = 1e-6
        );
    }

    #[test]
    fn conflicting_features_leave_a_warning() {
        let outline = square_outline();
        let mut cfg = plain_config();
        cfg.strap_loop = true;
        cfg.cutout_position = 10.0;
        let mut kb = PlanarKernel::new();
        let map = PolarMap::new(&outline);

        let case = build_case(&mut kb, &outline, &map, &cfg, None).unwrap();
        assert!(case
            .diagnostics
            .warnings
            .iter()
            .any(|w| w.contains("strap loop")));
    }
}
