//! Bearing-addressed lookup of boundary positions.
//!
//! Users place features ("cutout at 10 degrees", "lip from 32 to 158") by
//! compass bearing around the outline, measured at the area centroid with
//! 0 degrees toward +X, counter-clockwise positive, range (-180, 180]. The
//! [`PolarMap`] pre-samples the boundary by arclength and buckets samples
//! into whole-degree slots so bearing queries resolve in one map walk,
//! independent of outline concavity.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use molt_types::Outline;
use planar_kernel::{Point2, Vector2};

/// Whole-degree sampling matches the placement resolution users work at.
const DEFAULT_SAMPLES: usize = 360;

/// Bearing of a direction vector in degrees, range (-180, 180].
///
/// Zero vector maps to 0 so callers never see NaN from a degenerate query.
pub fn signed_bearing(v: Vector2) -> f64 {
    let len = v.norm();
    if len == 0.0 {
        return 0.0;
    }
    let deg = (v.x / len).clamp(-1.0, 1.0).acos().to_degrees();
    if v.y < 0.0 {
        -deg
    } else {
        deg
    }
}

/// Boundary point and outward normal at a perimeter fraction.
///
/// The fraction is arclength from the first outline point, wrapped into
/// [0, 1). Normals point away from the enclosed area (outline winding is
/// counter-clockwise, so outward is to the right of travel).
pub fn point_at_fraction(outline: &Outline, fraction: f64) -> (Point2, Vector2) {
    let pts = outline.points();
    let n = pts.len();
    let mut remaining = fraction.rem_euclid(1.0) * outline.perimeter();
    for i in 0..n {
        let a = Point2::new(pts[i][0], pts[i][1]);
        let b = {
            let q = pts[(i + 1) % n];
            Point2::new(q[0], q[1])
        };
        let seg = b - a;
        let len = seg.norm();
        if remaining <= len || i == n - 1 {
            let t = (remaining / len).clamp(0.0, 1.0);
            let tangent = seg / len;
            let normal = Vector2::new(tangent.y, -tangent.x);
            return (a + seg * t, normal);
        }
        remaining -= len;
    }
    unreachable!("outline has at least three points");
}

/// One pre-sampled boundary position.
#[derive(Debug, Clone)]
pub struct PolarSlot {
    /// Perimeter fraction of the sample, in [0, 1).
    pub fraction: f64,
    /// Boundary point.
    pub point: Point2,
    /// Unit outward normal at the point.
    pub normal: Vector2,
}

/// Arclength-sampled bearing index over one outline.
#[derive(Debug, Clone)]
pub struct PolarMap {
    slots: BTreeMap<i32, PolarSlot>,
    centroid: Point2,
    perimeter: f64,
}

impl PolarMap {
    pub fn new(outline: &Outline) -> PolarMap {
        PolarMap::with_samples(outline, DEFAULT_SAMPLES)
    }

    /// Sample the boundary at `samples` evenly spaced arclength fractions and
    /// bucket each sample under its rounded bearing. On concave outlines
    /// several samples can share a bearing; the last one by arclength wins,
    /// which keeps placement deterministic.
    pub fn with_samples(outline: &Outline, samples: usize) -> PolarMap {
        let samples = samples.max(1);
        let c = outline.centroid();
        let centroid = Point2::new(c[0], c[1]);
        let mut slots = BTreeMap::new();
        for k in 0..samples {
            let fraction = k as f64 / samples as f64;
            let (point, normal) = point_at_fraction(outline, fraction);
            let bearing = signed_bearing(point - centroid);
            slots.insert(
                bearing.round() as i32,
                PolarSlot {
                    fraction,
                    point,
                    normal,
                },
            );
        }
        PolarMap {
            slots,
            centroid,
            perimeter: outline.perimeter(),
        }
    }

    /// Boundary slot nearest the requested bearing, by circular distance.
    pub fn query(&self, bearing_deg: f64) -> &PolarSlot {
        let target = wrap_bearing(bearing_deg);
        self.slots
            .iter()
            .min_by(|(a, _), (b, _)| {
                let da = circular_distance(f64::from(**a), target);
                let db = circular_distance(f64::from(**b), target);
                da.partial_cmp(&db).unwrap_or(Ordering::Equal)
            })
            .map(|(_, slot)| slot)
            .expect("polar map holds at least one sample")
    }

    pub fn centroid(&self) -> Point2 {
        self.centroid
    }

    pub fn perimeter(&self) -> f64 {
        self.perimeter
    }
}

/// Wrap an angle into (-180, 180].
fn wrap_bearing(deg: f64) -> f64 {
    let a = deg.rem_euclid(360.0);
    if a > 180.0 {
        a - 360.0
    } else {
        a
    }
}

/// Shorter arc between two bearings, in degrees.
fn circular_distance(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(360.0);
    d.min(360.0 - d)
}

#[cfg(test)]
mod tests {
    use super::*;
    use molt_types::Outline;

    fn circle(radius: f64, n: usize) -> Outline {
        let pts = (0..n)
            .map(|i| {
                let t = i as f64 / n as f64 * std::f64::consts::TAU;
                [radius * t.cos(), radius * t.sin()]
            })
            .collect();
        Outline::new(pts).unwrap()
    }

    fn square(size: f64) -> Outline {
        let h = size / 2.0;
        Outline::new(vec![[-h, -h], [h, -h], [h, h], [-h, h]]).unwrap()
    }

    #[test]
    fn bearing_covers_all_quadrants() {
        assert_eq!(signed_bearing(Vector2::new(1.0, 0.0)), 0.0);
        assert!((signed_bearing(Vector2::new(0.0, 1.0)) - 90.0).abs() < 1e-9);
        assert!((signed_bearing(Vector2::new(-1.0, 0.0)) - 180.0).abs() < 1e-9);
        assert!((signed_bearing(Vector2::new(0.0, -1.0)) + 90.0).abs() < 1e-9);
        assert!((signed_bearing(Vector2::new(1.0, -1.0)) + 45.0).abs() < 1e-9);
        assert_eq!(signed_bearing(Vector2::new(0.0, 0.0)), 0.0);
    }

    #[test]
    fn circle_queries_land_within_one_degree() {
        let outline = circle(40.0, 720);
        let map = PolarMap::new(&outline);
        for target in [-179.0, -90.0, -33.5, 0.0, 14.2, 90.0, 179.0] {
            let slot = map.query(target);
            let got = signed_bearing(slot.point - map.centroid());
            assert!(
                circular_distance(got, target) <= 1.0,
                "query {target} landed at {got}"
            );
        }
    }

    #[test]
    fn square_corner_and_edge_midpoints_resolve() {
        let map = PolarMap::new(&square(10.0));
        let corner = map.query(45.0);
        assert!((corner.point.x - 5.0).abs() < 0.3);
        assert!((corner.point.y - 5.0).abs() < 0.3);

        let right = map.query(0.0);
        assert!((right.point.x - 5.0).abs() < 1e-9);
        assert!(right.point.y.abs() < 0.3);
        assert!((right.normal.x - 1.0).abs() < 1e-9);
    }

    #[test]
    fn fraction_walk_wraps_and_points_outward() {
        let outline = square(10.0);
        let (p, n) = point_at_fraction(&outline, 0.0);
        assert_eq!((p.x, p.y), (-5.0, -5.0));
        assert!((n.y + 1.0).abs() < 1e-9, "bottom edge faces -Y");

        let (p_wrapped, _) = point_at_fraction(&outline, 1.25);
        let (p_quarter, _) = point_at_fraction(&outline, 0.25);
        assert!((p_wrapped - p_quarter).norm() < 1e-9);
    }

    #[test]
    fn concave_outline_still_answers_every_bearing() {
        // L-shape: the notch hides some bearings behind two boundary crossings.
        let outline = Outline::new(vec![
            [0.0, 0.0],
            [20.0, 0.0],
            [20.0, 10.0],
            [10.0, 10.0],
            [10.0, 20.0],
            [0.0, 20.0],
        ])
        .unwrap()
        .recentered();
        let map = PolarMap::new(&outline);
        for deg in (-180..=180).step_by(15) {
            let slot = map.query(f64::from(deg));
            assert!(slot.normal.norm() > 0.9);
        }
    }
}
