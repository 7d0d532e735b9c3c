use molt_types::{ConfigError, OutlineError};

/// Errors during outline or config document loading.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LoadError {
    #[error("failed to parse file: {0}")]
    ParseError(String),

    #[error(transparent)]
    BadOutline(#[from] OutlineError),

    #[error(transparent)]
    BadConfig(#[from] ConfigError),
}

/// Errors during mesh export.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ExportError {
    #[error("unsupported output filetype {requested:?}, supported: .stl")]
    UnsupportedFiletype { requested: String },

    #[error("mesh has no triangles to export")]
    EmptyMesh,

    #[error("mesh references vertex {index}, only {count} exist")]
    BadIndex { index: u32, count: u32 },
}
