//! Shared geometric types crossing the kernel boundary.

use serde::{Deserialize, Serialize};

use crate::offset;

pub type Point2 = nalgebra::Point2<f64>;
pub type Vector2 = nalgebra::Vector2<f64>;
pub type Point3 = nalgebra::Point3<f64>;

/// Opaque reference to a planar face held by a kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FaceHandle(pub(crate) u64);

impl FaceHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Opaque reference to a solid held by a kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SolidHandle(pub(crate) u64);

impl SolidHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum KernelError {
    #[error("unknown face handle {id}")]
    UnknownFace { id: u64 },

    #[error("unknown solid handle {id}")]
    UnknownSolid { id: u64 },

    #[error("solid {id} has no material")]
    EmptySolid { id: u64 },

    #[error("degenerate profile: {reason}")]
    DegenerateProfile { reason: String },

    #[error("offset collapsed the profile: {reason}")]
    OffsetCollapse { reason: String },

    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    #[error("operation not supported: {reason}")]
    NotSupported { reason: String },
}

/// A planar region bounded by one outer ring and any number of hole rings.
///
/// Construction normalizes winding (outer counter-clockwise, holes
/// clockwise), welds coincident neighbors, drops collinear vertices and
/// rejects rings that enclose no area. Rings are stored open, without a
/// closing duplicate point.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    outer: Vec<Point2>,
    holes: Vec<Vec<Point2>>,
}

impl Profile {
    pub fn new(outer: Vec<Point2>) -> Result<Profile, KernelError> {
        let outer = clean_ring(outer, "outer ring")?;
        Ok(Profile {
            outer,
            holes: Vec::new(),
        })
    }

    /// Lift a validated board outline into kernel space. The outline type
    /// already guarantees a welded counter-clockwise ring, so only collinear
    /// vertices are left to drop.
    pub fn from_outline(outline: &molt_types::Outline) -> Profile {
        let outer = outline
            .points()
            .iter()
            .map(|p| Point2::new(p[0], p[1]))
            .collect();
        Profile {
            outer: offset::simplify_collinear(outer),
            holes: Vec::new(),
        }
    }

    pub fn add_hole(&mut self, ring: Vec<Point2>) -> Result<(), KernelError> {
        let mut ring = clean_ring(ring, "hole ring")?;
        ring.reverse();
        self.holes.push(ring);
        Ok(())
    }

    pub fn with_hole(mut self, ring: Vec<Point2>) -> Result<Profile, KernelError> {
        self.add_hole(ring)?;
        Ok(self)
    }

    pub fn outer(&self) -> &[Point2] {
        &self.outer
    }

    pub fn holes(&self) -> &[Vec<Point2>] {
        &self.holes
    }

    /// Enclosed material area, holes excluded.
    pub fn area(&self) -> f64 {
        let outer = offset::signed_ring_area(&self.outer);
        let holes: f64 = self
            .holes
            .iter()
            .map(|h| offset::signed_ring_area(h).abs())
            .sum();
        outer - holes
    }

    /// Length of the outer boundary.
    pub fn perimeter(&self) -> f64 {
        offset::ring_perimeter(&self.outer)
    }

    pub fn bounds(&self) -> (Point2, Point2) {
        let mut min = self.outer[0];
        let mut max = self.outer[0];
        for p in &self.outer {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        (min, max)
    }
}

/// Validate one ring and normalize it to counter-clockwise.
fn clean_ring(points: Vec<Point2>, what: &str) -> Result<Vec<Point2>, KernelError> {
    let mut ring = offset::simplify_collinear(offset::weld_ring(points));
    if ring.len() < 3 {
        return Err(KernelError::DegenerateProfile {
            reason: format!("{what} has fewer than 3 distinct points"),
        });
    }
    let area = offset::signed_ring_area(&ring);
    if area.abs() < offset::MIN_RING_AREA {
        return Err(KernelError::DegenerateProfile {
            reason: format!("{what} encloses no area"),
        });
    }
    if area < 0.0 {
        ring.reverse();
    }
    Ok(ring)
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl Aabb {
    pub fn from_points(points: impl IntoIterator<Item = Point3>) -> Option<Aabb> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut aabb = Aabb {
            min: [first.x, first.y, first.z],
            max: [first.x, first.y, first.z],
        };
        for p in iter {
            aabb.absorb(&p);
        }
        Some(aabb)
    }

    pub fn absorb(&mut self, p: &Point3) {
        let coords = [p.x, p.y, p.z];
        for axis in 0..3 {
            self.min[axis] = self.min[axis].min(coords[axis]);
            self.max[axis] = self.max[axis].max(coords[axis]);
        }
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        let mut out = *self;
        for axis in 0..3 {
            out.min[axis] = out.min[axis].min(other.min[axis]);
            out.max[axis] = out.max[axis].max(other.max[axis]);
        }
        out
    }

    /// Closed-interval overlap test. Boxes that merely touch count.
    pub fn intersects(&self, other: &Aabb) -> bool {
        (0..3).all(|axis| self.min[axis] <= other.max[axis] && other.min[axis] <= self.max[axis])
    }

    pub fn size(&self) -> [f64; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }

    pub fn center(&self) -> [f64; 3] {
        [
            (self.min[0] + self.max[0]) / 2.0,
            (self.min[1] + self.max[1]) / 2.0,
            (self.min[2] + self.max[2]) / 2.0,
        ]
    }
}

/// Flat-shaded triangle soup produced by tessellation. Vertices and normals
/// are packed xyz triples; indices reference vertices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderMesh {
    pub vertices: Vec<f32>,
    pub normals: Vec<f32>,
    pub indices: Vec<u32>,
}

impl RenderMesh {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(side: f64) -> Vec<Point2> {
        let h = side / 2.0;
        vec![
            Point2::new(-h, -h),
            Point2::new(h, -h),
            Point2::new(h, h),
            Point2::new(-h, h),
        ]
    }

    #[test]
    fn profile_normalizes_winding() {
        let mut cw = square(10.0);
        cw.reverse();
        let profile = Profile::new(cw).unwrap();
        assert!(offset::signed_ring_area(profile.outer()) > 0.0);

        let profile = profile.with_hole(square(4.0)).unwrap();
        assert!(offset::signed_ring_area(&profile.holes()[0]) < 0.0);
        assert!((profile.area() - (100.0 - 16.0)).abs() < 1e-12);
    }

    #[test]
    fn collinear_edge_points_are_dropped() {
        let ring = vec![
            Point2::new(-5.0, -5.0),
            Point2::new(0.0, -5.0),
            Point2::new(5.0, -5.0),
            Point2::new(5.0, 0.0),
            Point2::new(5.0, 5.0),
            Point2::new(-5.0, 5.0),
            Point2::new(-5.0, 0.0),
        ];
        let profile = Profile::new(ring).unwrap();
        assert_eq!(profile.outer().len(), 4);
        assert!((profile.area() - 100.0).abs() < 1e-12);
    }

    #[test]
    fn degenerate_rings_rejected() {
        let line = vec![
            Point2::new(0.0, 0.0),
            Point2::new(5.0, 0.0),
            Point2::new(10.0, 0.0),
        ];
        assert!(matches!(
            Profile::new(line),
            Err(KernelError::DegenerateProfile { .. })
        ));
    }

    #[test]
    fn aabb_union_and_overlap() {
        let a = Aabb {
            min: [0.0, 0.0, 0.0],
            max: [1.0, 1.0, 1.0],
        };
        let b = Aabb {
            min: [1.0, 0.0, 0.0],
            max: [2.0, 1.0, 1.0],
        };
        let c = Aabb {
            min: [3.0, 3.0, 3.0],
            max: [4.0, 4.0, 4.0],
        };
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
        assert_eq!(a.union(&b).size(), [2.0, 1.0, 1.0]);
    }
}
