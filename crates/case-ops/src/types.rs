//! Shared result and error types for feature operations.

use planar_kernel::KernelError;
use thiserror::Error;

/// Errors surfaced by feature operations.
#[derive(Debug, Clone, Error)]
pub enum OpError {
    /// The kernel rejected a modeling or query call.
    #[error("kernel error: {0}")]
    Kernel(#[from] KernelError),
    /// A parameter was out of range for this operation.
    #[error("invalid parameter: {reason}")]
    InvalidParameter { reason: String },
    /// The friction cavity could not be built over this outline.
    #[error(
        "friction cavity rejected: {source}; likely the wall tolerances are \
         too tight for this outline, or the outline needs simplification"
    )]
    CavityRejected { source: KernelError },
}

/// Non-fatal findings collected while an operation runs.
///
/// Operations prefer degrading (skip a feature, fall back to a simpler
/// construction) over failing the whole build; every degradation leaves a
/// human-readable note here.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    pub warnings: Vec<String>,
}

impl Diagnostics {
    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn merge(&mut self, other: Diagnostics) {
        self.warnings.extend(other.warnings);
    }
}
