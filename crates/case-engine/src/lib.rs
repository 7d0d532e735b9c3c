//! Orchestration layer: turns an outline plus a config into the set of
//! printable solids (case halves, carrycase sleeve, tent flaps), with
//! per-artifact failure isolation and collected warnings.

pub mod artifacts;
pub mod carrycase;
pub mod case_body;
pub mod types;

pub use artifacts::generate;
pub use carrycase::{build_carrycase, CarrycaseBuild};
pub use case_body::{build_case, CaseBuild};
pub use types::{Artifact, ArtifactKind, BuildFailure, BuildReport, EngineError};
