//! Canned outlines and baseline configurations.
//!
//! All outlines are centered on their bounding box so bearing-addressed
//! placement behaves the same way it does for imported board outlines.

use molt_types::{Config, Outline};

/// Axis-aligned square of the given side, centered at the origin.
pub fn square_outline(side: f64) -> Outline {
    rectangle_outline(side, side)
}

/// Axis-aligned rectangle centered at the origin.
pub fn rectangle_outline(width: f64, height: f64) -> Outline {
    let w = width / 2.0;
    let h = height / 2.0;
    Outline::new(vec![[-w, -h], [w, -h], [w, h], [-w, h]]).unwrap()
}

/// Regular polygon approximating a circle, centered at the origin.
pub fn circle_outline(radius: f64, segments: usize) -> Outline {
    Outline::new(
        (0..segments)
            .map(|i| {
                let t = i as f64 / segments as f64 * std::f64::consts::TAU;
                [radius * t.cos(), radius * t.sin()]
            })
            .collect(),
    )
    .unwrap()
}

/// Concave L shape: two arms of length `arm` and width `thickness`.
pub fn l_outline(arm: f64, thickness: f64) -> Outline {
    Outline::new(vec![
        [0.0, 0.0],
        [arm, 0.0],
        [arm, thickness],
        [thickness, thickness],
        [thickness, arm],
        [0.0, arm],
    ])
    .unwrap()
    .recentered()
}

/// Defaults with every optional artifact switched off: one unsplit case,
/// solid floor, no carrycase, strap, or tenting.
pub fn plain_config() -> Config {
    Config {
        split: false,
        carrycase: false,
        honeycomb_base: false,
        strap_loop: false,
        tenting_stand: false,
        ..Config::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_is_closed_and_centered() {
        let sq = square_outline(50.0);
        assert_eq!(sq.points().len(), 4);
        assert!((sq.area() - 2500.0).abs() < 1e-9);
        assert!((sq.perimeter() - 200.0).abs() < 1e-9);
        let c = sq.centroid();
        assert!(c[0].abs() < 1e-9 && c[1].abs() < 1e-9);
    }

    #[test]
    fn circle_perimeter_approaches_the_true_value() {
        let circ = circle_outline(40.0, 720);
        let true_perimeter = std::f64::consts::TAU * 40.0;
        assert!((circ.perimeter() - true_perimeter).abs() / true_perimeter < 1e-3);
    }

    #[test]
    fn l_shape_is_concave_with_the_right_area() {
        let l = l_outline(60.0, 20.0);
        // Two arms minus the shared corner counted once.
        assert!((l.area() - 20.0 * (2.0 * 60.0 - 20.0)).abs() < 1e-9);
        // Bounding box is centered; the mass centroid hugs the corner arms.
        let (min, max) = l.bounds();
        assert!((min[0] + max[0]).abs() < 1e-9 && (min[1] + max[1]).abs() < 1e-9);
        let c = l.centroid();
        assert!((c[0] + 8.0).abs() < 1e-9 && (c[1] + 8.0).abs() < 1e-9);
    }

    #[test]
    fn plain_config_passes_validation() {
        plain_config().validate().unwrap();
    }
}
