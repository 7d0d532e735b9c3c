//! Cross-crate pipeline checks: bearing placement accuracy, config
//! layering, and STL bytes straight out of a generated artifact.

use case_engine::{generate, ArtifactKind};
use case_ops::{signed_bearing, PolarMap};
use file_format::{apply_config_layer, stl_bytes};
use molt_types::Config;
use planar_kernel::KernelIntrospect;
use planar_kernel::PlanarKernel;
use test_harness::{circle_outline, plain_config, square_outline};

// ── Scenario 1: Bearing queries land within the sampling resolution ─────

#[test]
fn polar_queries_stay_within_one_degree() {
    for (name, outline) in [
        ("circle", circle_outline(40.0, 720)),
        ("square", square_outline(50.0)),
    ] {
        let map = PolarMap::new(&outline);
        let centroid = map.centroid();
        let mut worst = 0.0f64;
        let mut worst_at = 0.0f64;
        for step in -180..180 {
            let target = f64::from(step);
            let slot = map.query(target);
            let bearing = signed_bearing(slot.point - centroid);
            let mut diff = (bearing - target).rem_euclid(360.0);
            if diff > 180.0 {
                diff -= 360.0;
            }
            if diff.abs() > worst {
                worst = diff.abs();
                worst_at = target;
            }
        }
        assert!(
            worst <= 1.0,
            "{name}: query at {worst_at} degrees landed {worst:.3} degrees off"
        );
    }
}

// ── Scenario 2: Config layers stack, later layers win ───────────────────

#[test]
fn config_layers_stack_in_order() {
    let mut cfg = Config::default();

    let unknown =
        apply_config_layer(&mut cfg, r#"{"wall_z_height": 6.0, "wall_hz_height": 1}"#).unwrap();
    assert_eq!(unknown, vec!["wall_hz_height".to_string()]);
    assert_eq!(cfg.wall_z_height, 6.0);

    // A later command-line style layer overrides the file.
    let mut layer = serde_json::Map::new();
    layer.insert("wall_z_height".to_string(), serde_json::json!(5.0));
    layer.insert("split".to_string(), serde_json::json!(false));
    let unknown = cfg.merge_layer(&layer).unwrap();
    assert!(unknown.is_empty());
    assert_eq!(cfg.wall_z_height, 5.0);
    assert!(!cfg.split);

    cfg.validate().unwrap();
}

// ── Scenario 3: Generated artifact exports as valid binary STL ──────────

#[test]
fn generated_case_exports_as_binary_stl() {
    let outline = square_outline(50.0);
    let mut kb = PlanarKernel::new();
    let report = generate(&mut kb, &outline, &plain_config()).unwrap();

    let case = report.artifact(ArtifactKind::Case).unwrap();
    let mesh = kb.tessellate(case.solid).unwrap();
    let bytes = stl_bytes(&mesh).unwrap();

    assert!(!bytes.starts_with(b"solid"));
    let count = u32::from_le_bytes(bytes[80..84].try_into().unwrap());
    assert_eq!(count as usize, mesh.triangle_count());
    assert_eq!(bytes.len(), 84 + 50 * count as usize);
}
