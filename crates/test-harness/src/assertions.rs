//! Assertion helpers with diagnostic detail.
//!
//! Every failure names its scenario context and reports expected versus
//! actual values, so a red scenario reads without a debugger.

use planar_kernel::{KernelError, KernelIntrospect, RenderMesh, SolidHandle};

use crate::mesh;

/// Unified error type for the harness.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("assertion failed: {detail}")]
    AssertionFailed { detail: String },

    #[error(transparent)]
    Kernel(#[from] KernelError),
}

/// Assert the solid's bounding box matches expected values within `tol`.
pub fn assert_bounds(
    kb: &dyn KernelIntrospect,
    solid: SolidHandle,
    expected_min: [f64; 3],
    expected_max: [f64; 3],
    tol: f64,
    ctx: &str,
) -> Result<(), HarnessError> {
    let bb = kb.bounding_box(solid)?;
    for axis in 0..3 {
        if (bb.min[axis] - expected_min[axis]).abs() > tol {
            return Err(HarnessError::AssertionFailed {
                detail: format!(
                    "[{ctx}] bounding box min[{axis}]: expected {:.3}, got {:.3} (tol={tol})",
                    expected_min[axis], bb.min[axis],
                ),
            });
        }
        if (bb.max[axis] - expected_max[axis]).abs() > tol {
            return Err(HarnessError::AssertionFailed {
                detail: format!(
                    "[{ctx}] bounding box max[{axis}]: expected {:.3}, got {:.3} (tol={tol})",
                    expected_max[axis], bb.max[axis],
                ),
            });
        }
    }
    Ok(())
}

/// Assert the solid is one connected clump of material.
pub fn assert_single_component(
    kb: &dyn KernelIntrospect,
    solid: SolidHandle,
    ctx: &str,
) -> Result<(), HarnessError> {
    let count = kb.component_count(solid)?;
    if count != 1 {
        return Err(HarnessError::AssertionFailed {
            detail: format!("[{ctx}] expected a single component, got {count}"),
        });
    }
    Ok(())
}

/// Assert two solids have identical volume and bounding box, the
/// geometry-level determinism check.
pub fn assert_same_shape(
    kb: &dyn KernelIntrospect,
    a: SolidHandle,
    b: SolidHandle,
    ctx: &str,
) -> Result<(), HarnessError> {
    let (va, vb) = (kb.volume_estimate(a)?, kb.volume_estimate(b)?);
    if (va - vb).abs() > 1e-9 {
        return Err(HarnessError::AssertionFailed {
            detail: format!("[{ctx}] volumes differ: {va:.9} vs {vb:.9}"),
        });
    }
    let (ba, bb) = (kb.bounding_box(a)?, kb.bounding_box(b)?);
    for axis in 0..3 {
        if (ba.min[axis] - bb.min[axis]).abs() > 1e-9 || (ba.max[axis] - bb.max[axis]).abs() > 1e-9
        {
            return Err(HarnessError::AssertionFailed {
                detail: format!(
                    "[{ctx}] bounding boxes differ on axis {axis}: {:?}..{:?} vs {:?}..{:?}",
                    ba.min[axis], ba.max[axis], bb.min[axis], bb.max[axis],
                ),
            });
        }
    }
    Ok(())
}

/// Assert every mesh edge is shared by exactly two triangles.
pub fn assert_watertight(mesh: &RenderMesh, ctx: &str) -> Result<(), HarnessError> {
    let (total, boundary) = mesh::count_mesh_edges(mesh);
    if boundary != 0 {
        return Err(HarnessError::AssertionFailed {
            detail: format!("[{ctx}] {boundary} of {total} edges are open"),
        });
    }
    Ok(())
}
