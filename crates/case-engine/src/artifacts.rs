//! One entry point from outline and config to the full artifact set.
//!
//! Artifacts are built independently: a failed carrycase or tent flap is
//! recorded in the report and the rest still come out, so a bad parameter
//! combination costs one print file rather than the whole run.

use case_ops::{execute_tent_flap, plan_tenting, KernelBundle, PolarMap, TentPlan};
use molt_types::{Config, Outline};
use planar_kernel::xform;
use tracing::{info, warn};

use crate::carrycase::build_carrycase;
use crate::case_body::build_case;
use crate::types::{Artifact, ArtifactKind, BuildFailure, BuildReport, EngineError};

/// Build every solid the config asks for.
///
/// Config validation failures abort; geometry failures inside one artifact
/// are collected in [`BuildReport::failures`].
pub fn generate(
    kb: &mut dyn KernelBundle,
    outline: &Outline,
    cfg: &Config,
) -> Result<BuildReport, EngineError> {
    cfg.validate()?;
    let mut report = BuildReport::default();
    let map = PolarMap::new(outline);

    // The hinge layout feeds both the case (hinge, storage slots) and the
    // flap artifacts, so it is planned once up front. A plan that does not
    // close degrades the run to a plain case.
    let tent = if cfg.tenting_stand {
        let (min, max) = outline.bounds();
        let wall_max_x = max[0] + cfg.wall_xy_thickness;
        let center_y = (min[1] + max[1]) / 2.0;
        match plan_tenting(cfg, wall_max_x, center_y) {
            Ok(plan) => Some(plan),
            Err(err) => {
                warn!(error = %err, "tenting stand dropped from this run");
                report
                    .warnings
                    .push(format!("tenting stand dropped: {err}"));
                None
            }
        }
    } else {
        None
    };

    build_cases(kb, outline, &map, cfg, tent.as_ref(), &mut report);
    if cfg.carrycase {
        match build_carrycase(kb, outline, &map, cfg) {
            Ok(cc) => {
                report.warnings.extend(cc.diagnostics.warnings);
                push_built(&mut report, ArtifactKind::Carrycase, cc.solid);
            }
            Err(err) => push_failed(&mut report, ArtifactKind::Carrycase, err.to_string()),
        }
    }
    if let Some(plan) = &tent {
        build_flaps(kb, plan, cfg, &mut report);
    }
    Ok(report)
}

fn build_cases(
    kb: &mut dyn KernelBundle,
    outline: &Outline,
    map: &PolarMap,
    cfg: &Config,
    tent: Option<&TentPlan>,
    report: &mut BuildReport,
) {
    let case = match build_case(kb, outline, map, cfg, tent) {
        Ok(case) => case,
        Err(err) => {
            push_failed(report, ArtifactKind::Case, err.to_string());
            if cfg.split {
                push_failed(report, ArtifactKind::MirroredCase, "case build failed".into());
            }
            return;
        }
    };
    report.warnings.extend(case.diagnostics.warnings);
    push_built(report, ArtifactKind::Case, case.solid);

    // Split keyboards print the second half mirrored left to right.
    if cfg.split {
        match kb.transform(case.solid, &xform::mirror_x()) {
            Ok(mirrored) => push_built(report, ArtifactKind::MirroredCase, mirrored),
            Err(err) => push_failed(report, ArtifactKind::MirroredCase, err.to_string()),
        }
    }
}

fn build_flaps(kb: &mut dyn KernelBundle, plan: &TentPlan, cfg: &Config, report: &mut BuildReport) {
    for index in 0..plan.flaps.len() {
        match execute_tent_flap(kb, plan, cfg, index) {
            Ok(flap) => {
                report.warnings.extend(flap.diagnostics.warnings);
                push_built(report, ArtifactKind::TentFlap(index), flap.solid);
            }
            Err(err) => push_failed(report, ArtifactKind::TentFlap(index), err.to_string()),
        }
    }
}

fn push_built(report: &mut BuildReport, kind: ArtifactKind, solid: planar_kernel::SolidHandle) {
    info!(artifact = %kind, "artifact built");
    report.artifacts.push(Artifact { kind, solid });
}

fn push_failed(report: &mut BuildReport, kind: ArtifactKind, error: String) {
    warn!(artifact = %kind, error = %error, "artifact failed");
    report.failures.push(BuildFailure { kind, error });
}
