//! The sliding sleeve that stores both case halves face to face.
//!
//! One half-sleeve is built with its opening at z=0: a bore shell sized for
//! the case plus sliding tolerance, a mid-sleeve blocker the inserted case
//! bottoms out against, then grip notch, retention lip and magnet pockets.
//! The finished half is mirrored about the sleeve mid-plane to serve the
//! second case half.
//!
//! The blocker is a hub ring with a straight channel through its middle, so
//! keycaps standing proud of the seated case pass through and a finger can
//! push the case back out. Its underside is a 45 degree cone from the bore
//! wall up to the channel rim; the case's chamfered top rim mates the cone,
//! and the cone prints without bridging.

use case_ops::{
    execute_carrycase_lip, execute_finger_cutout, execute_magnet_pockets, execute_rim_chamfer,
    ChamferEdge, Diagnostics, KernelBundle, MagnetWall, NotchFrom, NotchSpec, PolarMap,
};
use molt_types::{Config, Outline};
use planar_kernel::{xform, Profile, SolidHandle};

use crate::types::EngineError;

#[derive(Debug, Clone)]
pub struct CarrycaseBuild {
    pub solid: SolidHandle,
    pub diagnostics: Diagnostics,
}

/// Build the double-ended carrycase sleeve.
pub fn build_carrycase(
    kb: &mut dyn KernelBundle,
    outline: &Outline,
    map: &PolarMap,
    cfg: &Config,
) -> Result<CarrycaseBuild, EngineError> {
    let mut diagnostics = Diagnostics::default();

    let h = cfg.wall_height();
    let bore_offset = cfg.wall_xy_thickness + cfg.carrycase_tolerance_xy;
    let outer_offset = bore_offset + cfg.carrycase_wall_xy_thickness;
    // One case half sits between the opening and the seat plane.
    let seat_z = h + cfg.carrycase_tolerance_z;
    let half_height = seat_z + cfg.carrycase_z_gap_between_cases / 2.0;

    let outline_face = kb.face_from_profile(Profile::from_outline(outline))?;
    let bore_face = kb.offset_face(outline_face, bore_offset)?;
    let outer_face = kb.offset_face(outline_face, outer_offset)?;

    let mut shell = kb.extrude(outer_face, 0.0, half_height)?;
    let bore = kb.extrude(bore_face, 0.0, half_height)?;
    shell = kb.boolean_subtract(shell, bore)?;

    // Blocker cone apex: where the case's rim chamfer comes to rest when the
    // case top reaches the seat plane. Both surfaces run at 45 degrees, so
    // the contact line sits wall_xy above the seat less the chamfer.
    let apex_z = seat_z + cfg.wall_xy_thickness - cfg.chamfer_len;
    let cone_base_z = apex_z - bore_offset;
    if cone_base_z <= 0.0 || apex_z >= half_height {
        diagnostics.warn("sleeve too short for the seat blocker, the case will slide through");
    } else {
        let slab = kb.extrude(bore_face, cone_base_z, bore_offset)?;
        let cone_cut = kb.extrude_tapered(bore_face, cone_base_z, bore_offset, -45.0)?;
        let wedge = kb.boolean_subtract(slab, cone_cut)?;
        shell = kb.boolean_union(shell, wedge)?;

        let hub = kb.extrude(bore_face, apex_z, half_height - apex_z)?;
        let channel = kb.extrude(outline_face, apex_z, half_height - apex_z)?;
        let ring = kb.boolean_subtract(hub, channel)?;
        shell = kb.boolean_union(shell, ring)?;
    }

    let chamfered = execute_rim_chamfer(
        kb,
        shell,
        outer_face,
        ChamferEdge::Bottom,
        cfg.chamfer_len,
    )?;
    diagnostics.merge(chamfered.diagnostics);
    shell = chamfered.solid;

    // Grip notch at the opening so the seated case can be pushed out.
    let notch = NotchSpec {
        bearing_deg: cfg.carrycase_cutout_position,
        width: cfg.carrycase_cutout_xy_width,
        depth: h / 2.0,
        rim_z: 0.0,
        from: NotchFrom::Bottom,
        inner_offset: bore_offset,
        wall_thickness: cfg.carrycase_wall_xy_thickness,
    };
    let cut = execute_finger_cutout(kb, shell, map, notch)?;
    diagnostics.merge(cut.diagnostics);
    shell = cut.solid;

    warn_lip_crosses_notch(map, cfg, &mut diagnostics);
    let lip = execute_carrycase_lip(kb, shell, outline, map, cfg)?;
    diagnostics.merge(lip.diagnostics);
    shell = lip.solid;

    if cfg.magnet_count > 0 {
        let wall = MagnetWall {
            wall_thickness: cfg.carrycase_wall_xy_thickness,
            inner_offset: bore_offset,
            center_z: h / 2.0 + cfg.carrycase_tolerance_z,
        };
        let blocks = crate::case_body::magnet_blocks(map, cfg);
        let ring = execute_magnet_pockets(kb, shell, outline, map, cfg, wall, &blocks)?;
        diagnostics.merge(ring.diagnostics);
        shell = ring.solid;
    }

    // Second bay is the first reflected through the seat mid-plane.
    let twin = kb.transform(shell, &xform::mirror_z_at(half_height))?;
    let solid = kb.boolean_union(shell, twin)?;

    Ok(CarrycaseBuild {
        solid,
        diagnostics,
    })
}

/// The lip survives the notch cut by being added after it, so an overlap
/// leaves the notch partly filled.
fn warn_lip_crosses_notch(map: &PolarMap, cfg: &Config, diagnostics: &mut Diagnostics) {
    let f_a = map.query(cfg.lip_position_angles[0]).fraction;
    let f_b = map.query(cfg.lip_position_angles[1]).fraction;
    let f_notch = map.query(cfg.carrycase_cutout_position).fraction;
    let span = (f_b - f_a).rem_euclid(1.0);
    let t = (f_notch - f_a).rem_euclid(1.0);
    if t < span {
        diagnostics.warn(format!(
            "carrycase cutout at {}\u{b0} crosses the retention lip span",
            cfg.carrycase_cutout_position
        ));
    }
}
