//! Geometry kernel boundary for the case generator.
//!
//! Everything downstream of outline loading talks to solid modeling through
//! the [`Kernel`] and [`KernelIntrospect`] traits, so the construction
//! pipeline never names a concrete engine. The bundled [`PlanarKernel`] is a
//! deterministic prismatic evaluator: faces are planar profiles, solids are
//! signed collections of (optionally tapered) extrusions under affine
//! transforms. That covers every operation the generator performs, keeps
//! evaluation exact where the output guarantees need it (offsets, sections,
//! bounding boxes, volumes), and stays swappable for a full B-rep engine.
//!
//! Coordinate conventions, used everywhere without exception:
//! outline plane is XY, extrusion direction is +Z, outer rings wind
//! counter-clockwise, hole rings clockwise, and a positive offset moves a
//! boundary outward from the material.

pub mod offset;
pub mod planar;
pub mod primitives;
pub mod traits;
pub mod types;
pub mod xform;

mod tessellation;

pub use planar::PlanarKernel;
pub use traits::{Kernel, KernelIntrospect};
pub use types::{Aabb, FaceHandle, KernelError, Point2, Profile, RenderMesh, SolidHandle, Vector2};
