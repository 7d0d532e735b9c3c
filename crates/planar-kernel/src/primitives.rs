//! Stock profile rings. All rings wind counter-clockwise and are suitable
//! for [`Profile::new`] or as hole rings.
//!
//! [`Profile::new`]: crate::types::Profile::new

use std::f64::consts::TAU;

use crate::types::Point2;

pub fn circle_ring(radius: f64, segments: usize) -> Vec<Point2> {
    ellipse_ring(radius, radius, segments)
}

pub fn ellipse_ring(semi_x: f64, semi_y: f64, segments: usize) -> Vec<Point2> {
    (0..segments)
        .map(|i| {
            let a = TAU * i as f64 / segments as f64;
            Point2::new(semi_x * a.cos(), semi_y * a.sin())
        })
        .collect()
}

/// Axis-aligned rectangle centered on the origin.
pub fn rectangle_ring(width: f64, height: f64) -> Vec<Point2> {
    let (w, h) = (width / 2.0, height / 2.0);
    vec![
        Point2::new(-w, -h),
        Point2::new(w, -h),
        Point2::new(w, h),
        Point2::new(-w, h),
    ]
}

/// Rectangle with circular corner arcs. The radius is clamped to half the
/// short side; `corner_segments` is the arc step count per corner.
pub fn rounded_rectangle_ring(
    width: f64,
    height: f64,
    corner_radius: f64,
    corner_segments: usize,
) -> Vec<Point2> {
    let r = corner_radius.min(width / 2.0).min(height / 2.0);
    if r <= 0.0 {
        return rectangle_ring(width, height);
    }
    let (cx, cy) = (width / 2.0 - r, height / 2.0 - r);
    // Corner centers in counter-clockwise order with each arc's start angle.
    let corners = [
        (Point2::new(cx, -cy), -90.0_f64),
        (Point2::new(cx, cy), 0.0),
        (Point2::new(-cx, cy), 90.0),
        (Point2::new(-cx, -cy), 180.0),
    ];
    let mut ring = Vec::with_capacity(4 * (corner_segments + 1));
    for (center, start_deg) in corners {
        for i in 0..=corner_segments {
            let a = (start_deg + 90.0 * i as f64 / corner_segments as f64).to_radians();
            ring.push(Point2::new(
                center.x + r * a.cos(),
                center.y + r * a.sin(),
            ));
        }
    }
    ring
}

/// Pointy-top regular hexagon sized by its across-flats width, so the flats
/// face left and right.
pub fn hexagon_ring(across_flats: f64) -> Vec<Point2> {
    let circumradius = across_flats / 3.0_f64.sqrt();
    (0..6)
        .map(|i| {
            let a = (90.0 + 60.0 * i as f64).to_radians();
            Point2::new(circumradius * a.cos(), circumradius * a.sin())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::offset::signed_ring_area;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn circle_area_converges() {
        let ring = circle_ring(40.0, 360);
        let exact = PI * 40.0 * 40.0;
        assert!((signed_ring_area(&ring) - exact).abs() / exact < 1e-3);
    }

    #[test]
    fn hexagon_across_flats_is_the_x_extent() {
        let ring = hexagon_ring(6.0);
        let min_x = ring.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
        let max_x = ring.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
        assert_relative_eq!(max_x - min_x, 6.0, epsilon = 1e-9);
        assert!(signed_ring_area(&ring) > 0.0);
    }

    #[test]
    fn rounded_rectangle_stays_inside_its_rectangle() {
        let ring = rounded_rectangle_ring(15.0, 8.0, 2.0, 8);
        assert!(signed_ring_area(&ring) > 0.0);
        assert!(signed_ring_area(&ring) < 15.0 * 8.0);
        for p in &ring {
            assert!(p.x.abs() <= 7.5 + 1e-12 && p.y.abs() <= 4.0 + 1e-12);
        }
    }

    #[test]
    fn oversize_radius_clamps_to_a_stadium() {
        let ring = rounded_rectangle_ring(20.0, 6.0, 10.0, 16);
        let max_y = ring.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
        assert_relative_eq!(max_y, 3.0, epsilon = 1e-9);
    }
}
