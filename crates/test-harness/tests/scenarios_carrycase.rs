//! Full-run scenarios with the carrycase enabled.

use case_engine::{generate, ArtifactKind, EngineError};
use molt_types::Config;
use planar_kernel::{KernelIntrospect, PlanarKernel};
use test_harness::assertions::{assert_bounds, assert_single_component, assert_watertight};
use test_harness::{mesh, square_outline};

// ── Scenario 1: Default run produces the full artifact set ──────────────

#[test]
fn default_run_builds_case_mirror_and_sleeve() {
    let outline = square_outline(50.0);
    let cfg = Config::default();
    let mut kb = PlanarKernel::new();
    let report = generate(&mut kb, &outline, &cfg).unwrap();

    assert!(report.failures.is_empty(), "failures: {:?}", report.failures);
    for kind in [
        ArtifactKind::Case,
        ArtifactKind::MirroredCase,
        ArtifactKind::Carrycase,
    ] {
        assert!(report.artifact(kind).is_some(), "missing {kind}");
    }

    // Case: 50mm board + 2.81mm wall; 3 base + 1 clearance + 4 wall tall.
    let case = report.artifact(ArtifactKind::Case).unwrap();
    assert_bounds(
        &kb,
        case.solid,
        [-27.81, -27.81, 0.0],
        [27.81, 27.81, 8.0],
        1e-6,
        "case",
    )
    .unwrap();

    // Sleeve: bore 3.21 past the board, 3mm sleeve wall, two 13.5mm bays.
    let sleeve = report.artifact(ArtifactKind::Carrycase).unwrap();
    assert_bounds(
        &kb,
        sleeve.solid,
        [-31.21, -31.21, 0.0],
        [31.21, 31.21, 27.0],
        1e-6,
        "sleeve",
    )
    .unwrap();
    assert_single_component(&kb, sleeve.solid, "sleeve").unwrap();
}

// ── Scenario 2: Meshes are printable ────────────────────────────────────

#[test]
fn every_artifact_meshes_watertight() {
    let outline = square_outline(50.0);
    let mut kb = PlanarKernel::new();
    let report = generate(&mut kb, &outline, &Config::default()).unwrap();

    for artifact in &report.artifacts {
        let mesh = kb.tessellate(artifact.solid).unwrap();
        assert!(mesh.triangle_count() > 0);
        assert_watertight(&mesh, &artifact.kind.to_string()).unwrap();
    }
}

// ── Scenario 3: Mesh volume agrees with the kernel estimate ─────────────

#[test]
fn mesh_volume_tracks_the_kernel_estimate() {
    let outline = square_outline(50.0);
    let mut kb = PlanarKernel::new();
    let report = generate(&mut kb, &outline, &Config::default()).unwrap();

    let case = report.artifact(ArtifactKind::Case).unwrap();
    let estimate = kb.volume_estimate(case.solid).unwrap();
    let meshed = mesh::mesh_volume(&kb.tessellate(case.solid).unwrap());
    let drift = (meshed - estimate).abs() / estimate;
    assert!(
        drift < 1e-3,
        "mesh volume {meshed:.1} vs estimate {estimate:.1} ({drift:.5} relative)"
    );
}

// ── Scenario 4: Hanging lip drops below the sleeve opening ──────────────

#[test]
fn hanging_lip_extends_the_sleeve_downward() {
    let outline = square_outline(50.0);
    let mut kb = PlanarKernel::new();

    let mut cfg = Config::default();
    cfg.flush_carrycase_lip = false;
    let report = generate(&mut kb, &outline, &cfg).unwrap();

    let sleeve = report.artifact(ArtifactKind::Carrycase).unwrap();
    let bb = kb.bounding_box(sleeve.solid).unwrap();
    assert!(
        (bb.min[2] - -cfg.lip_len).abs() < 1e-6,
        "hanging lip should reach z={}, box starts at {}",
        -cfg.lip_len,
        bb.min[2]
    );
}

// ── Scenario 5: Impossible magnet fit aborts before geometry ────────────

#[test]
fn shallow_magnet_wall_rejects_the_whole_run() {
    let outline = square_outline(50.0);
    let mut kb = PlanarKernel::new();

    let mut cfg = Config::default();
    // 2.5 - 0.81 leaves 1.69mm of pocket for a 2mm magnet.
    cfg.wall_xy_thickness = 2.5;
    let err = generate(&mut kb, &outline, &cfg).unwrap_err();
    assert!(matches!(err, EngineError::Config(_)), "got {err}");
}
