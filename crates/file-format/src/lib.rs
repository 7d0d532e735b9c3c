pub mod config_doc;
pub mod errors;
pub mod outline_doc;
pub mod stl_export;

pub use config_doc::{apply_config_layer, parse_layer};
pub use errors::{ExportError, LoadError};
pub use outline_doc::load_outline;
pub use stl_export::{check_filetype, stl_bytes, SUPPORTED_FILETYPES};
