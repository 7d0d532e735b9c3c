//! Feature operations for the case generator.
//!
//! Each module implements one geometric feature (friction-fit cavity, rim
//! chamfer, finger cutout, magnet pockets, retention lip, honeycomb relief,
//! strap loop, tenting hinge) as a free function over a [`KernelBundle`].
//! Operations take validated parameters, mutate nothing on failure beyond
//! kernel scratch handles, and report recoverable degradations through
//! [`Diagnostics`] instead of erroring out.

pub mod chamfer;
pub mod finger;
pub mod friction;
pub mod honeycomb;
pub mod kernel_ext;
pub mod lip;
pub mod magnets;
pub mod polar;
pub mod strap;
pub mod tenting;
pub mod types;

pub use chamfer::{execute_rim_chamfer, ChamferEdge, ChamferOutcome};
pub use finger::{execute_finger_cutout, FingerCutout, NotchFrom, NotchSpec, OVER_TRAVEL};
pub use friction::{execute_friction_cavity, FrictionFit};
pub use honeycomb::{honeycomb_profile, HoneycombPattern};
pub use kernel_ext::KernelBundle;
pub use lip::{execute_carrycase_lip, execute_case_lip_recess, LipResult};
pub use magnets::{execute_magnet_pockets, ArcBlock, MagnetRing, MagnetSite, MagnetWall};
pub use polar::{point_at_fraction, signed_bearing, PolarMap, PolarSlot};
pub use strap::{execute_strap_loop, StrapLoop};
pub use tenting::{
    execute_storage_slots, execute_tent_flap, execute_tent_flaps, execute_tent_hinge, plan_tenting,
    FlapSpec, TentFlap, TentHinge, TentPlan,
};
pub use types::{Diagnostics, OpError};
