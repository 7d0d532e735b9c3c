//! Test harness for the case generator.
//!
//! Provides canned geometry, mesh measurement, and rich assertions for
//! scenario tests that drive the full pipeline.
//!
//! # Key Components
//!
//! - [`fixtures`] — outline builders and baseline configurations
//! - [`mesh`] — bounding box, volume, and watertightness math over meshes
//! - [`assertions`] — assertion helpers with diagnostic detail

pub mod assertions;
pub mod fixtures;
pub mod mesh;

pub use assertions::HarnessError;
pub use fixtures::{circle_outline, l_outline, plain_config, rectangle_outline, square_outline};
