use case_ops::OpError;
use molt_types::ConfigError;
use planar_kernel::{KernelError, SolidHandle};

/// Which printable part a build produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Case,
    MirroredCase,
    Carrycase,
    TentFlap(usize),
}

impl ArtifactKind {
    /// Output file name without directory or extension.
    pub fn file_stem(&self) -> String {
        match self {
            ArtifactKind::Case => "case".to_string(),
            ArtifactKind::MirroredCase => "case_mirrored".to_string(),
            ArtifactKind::Carrycase => "carrycase".to_string(),
            ArtifactKind::TentFlap(i) => format!("tent_flap_{i}"),
        }
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.file_stem())
    }
}

/// One finished solid ready for export.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub solid: SolidHandle,
}

/// A part that could not be built. The rest of the run continues.
#[derive(Debug, Clone)]
pub struct BuildFailure {
    pub kind: ArtifactKind,
    pub error: String,
}

/// Everything a generation run produced.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    pub artifacts: Vec<Artifact>,
    pub failures: Vec<BuildFailure>,
    pub warnings: Vec<String>,
}

impl BuildReport {
    pub fn artifact(&self, kind: ArtifactKind) -> Option<&Artifact> {
        self.artifacts.iter().find(|a| a.kind == kind)
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum EngineError {
    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),

    #[error("operation error: {0}")]
    Op(#[from] OpError),

    #[error("kernel error: {0}")]
    Kernel(#[from] KernelError),
}
