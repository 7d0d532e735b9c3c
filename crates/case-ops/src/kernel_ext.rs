//! Convenience bundle over the kernel trait pair.

use planar_kernel::{Kernel, KernelIntrospect};

/// Unified view over a kernel that can both model and introspect.
///
/// Feature operations take `&mut dyn KernelBundle` so they can interleave
/// modeling calls with bounding-box and profile queries without juggling two
/// borrows of the same kernel.
pub trait KernelBundle: Kernel + KernelIntrospect {}

impl<T: Kernel + KernelIntrospect> KernelBundle for T {}
