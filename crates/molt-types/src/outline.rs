//! The board outline: one closed planar loop in the XY plane, millimeters.

use serde::{Deserialize, Serialize};

/// Distance under which two consecutive outline points are the same point.
const WELD_TOL: f64 = 1e-6;

/// Errors from outline construction.
#[derive(Debug, Clone, thiserror::Error)]
pub enum OutlineError {
    #[error("outline needs at least 3 distinct points, got {count}")]
    TooFewPoints { count: usize },

    #[error("outline encloses no area (collinear or self-cancelling loop)")]
    ZeroArea,
}

/// A closed, simple boundary polyline. Stored open (the closing edge back to
/// the first point is implied) and normalized to counter-clockwise winding.
/// Never assumed convex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    points: Vec<[f64; 2]>,
}

impl Outline {
    /// Build an outline from a point loop. Consecutive duplicates are welded,
    /// a repeated closing point is dropped, and clockwise input is reversed.
    pub fn new(raw: Vec<[f64; 2]>) -> Result<Outline, OutlineError> {
        let mut points: Vec<[f64; 2]> = Vec::with_capacity(raw.len());
        for p in raw {
            if let Some(last) = points.last() {
                if dist(*last, p) < WELD_TOL {
                    continue;
                }
            }
            points.push(p);
        }
        if points.len() > 1 && dist(points[0], *points.last().unwrap()) < WELD_TOL {
            points.pop();
        }
        if points.len() < 3 {
            return Err(OutlineError::TooFewPoints {
                count: points.len(),
            });
        }
        let area = shoelace(&points);
        if area.abs() < WELD_TOL {
            return Err(OutlineError::ZeroArea);
        }
        if area < 0.0 {
            points.reverse();
        }
        Ok(Outline { points })
    }

    pub fn points(&self) -> &[[f64; 2]] {
        &self.points
    }

    /// Enclosed area, always positive after winding normalization.
    pub fn area(&self) -> f64 {
        shoelace(&self.points)
    }

    /// Area centroid (shoelace moments), the anchor for polar placement.
    pub fn centroid(&self) -> [f64; 2] {
        let mut cx = 0.0;
        let mut cy = 0.0;
        let mut a = 0.0;
        let n = self.points.len();
        for i in 0..n {
            let p = self.points[i];
            let q = self.points[(i + 1) % n];
            let cross = p[0] * q[1] - q[0] * p[1];
            a += cross;
            cx += (p[0] + q[0]) * cross;
            cy += (p[1] + q[1]) * cross;
        }
        let a = a / 2.0;
        [cx / (6.0 * a), cy / (6.0 * a)]
    }

    pub fn perimeter(&self) -> f64 {
        let n = self.points.len();
        (0..n)
            .map(|i| dist(self.points[i], self.points[(i + 1) % n]))
            .sum()
    }

    /// Axis-aligned bounds as (min, max).
    pub fn bounds(&self) -> ([f64; 2], [f64; 2]) {
        let mut min = [f64::MAX, f64::MAX];
        let mut max = [f64::MIN, f64::MIN];
        for p in &self.points {
            min[0] = min[0].min(p[0]);
            min[1] = min[1].min(p[1]);
            max[0] = max[0].max(p[0]);
            max[1] = max[1].max(p[1]);
        }
        (min, max)
    }

    /// The same outline translated so its bounding-box center sits at the
    /// origin. Imported board outlines carry arbitrary CAD-export offsets;
    /// bearing-based placement wants them centered.
    pub fn recentered(&self) -> Outline {
        let (min, max) = self.bounds();
        let cx = (min[0] + max[0]) / 2.0;
        let cy = (min[1] + max[1]) / 2.0;
        Outline {
            points: self
                .points
                .iter()
                .map(|p| [p[0] - cx, p[1] - cy])
                .collect(),
        }
    }
}

fn shoelace(points: &[[f64; 2]]) -> f64 {
    let n = points.len();
    let mut acc = 0.0;
    for i in 0..n {
        let p = points[i];
        let q = points[(i + 1) % n];
        acc += p[0] * q[1] - q[0] * p[1];
    }
    acc / 2.0
}

fn dist(a: [f64; 2], b: [f64; 2]) -> f64 {
    ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(size: f64) -> Vec<[f64; 2]> {
        let h = size / 2.0;
        vec![[-h, -h], [h, -h], [h, h], [-h, h]]
    }

    #[test]
    fn square_metrics() {
        let o = Outline::new(square(50.0)).unwrap();
        assert!((o.area() - 2500.0).abs() < 1e-9);
        assert!((o.perimeter() - 200.0).abs() < 1e-9);
        let c = o.centroid();
        assert!(c[0].abs() < 1e-9 && c[1].abs() < 1e-9);
    }

    #[test]
    fn clockwise_input_is_reversed() {
        let mut pts = square(10.0);
        pts.reverse();
        let o = Outline::new(pts).unwrap();
        assert!(o.area() > 0.0);
    }

    #[test]
    fn closing_point_and_duplicates_are_welded() {
        let o = Outline::new(vec![
            [0.0, 0.0],
            [0.0, 0.0],
            [10.0, 0.0],
            [10.0, 10.0],
            [10.0, 10.0],
            [0.0, 10.0],
            [0.0, 0.0],
        ])
        .unwrap();
        assert_eq!(o.points().len(), 4);
    }

    #[test]
    fn degenerate_outlines_are_rejected() {
        assert!(matches!(
            Outline::new(vec![[0.0, 0.0], [1.0, 1.0]]),
            Err(OutlineError::TooFewPoints { count: 2 })
        ));
        assert!(matches!(
            Outline::new(vec![[0.0, 0.0], [1.0, 1.0], [2.0, 2.0]]),
            Err(OutlineError::ZeroArea)
        ));
    }

    #[test]
    fn recentering_moves_bbox_center_to_origin() {
        let o = Outline::new(vec![[10.0, 20.0], [30.0, 20.0], [30.0, 50.0], [10.0, 50.0]])
            .unwrap()
            .recentered();
        let (min, max) = o.bounds();
        assert!((min[0] + max[0]).abs() < 1e-9);
        assert!((min[1] + max[1]).abs() < 1e-9);
    }
}
