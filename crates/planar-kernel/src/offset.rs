//! Ring arithmetic: signed areas, perimeters, planar offsets and point
//! queries over closed polygonal rings.
//!
//! Offsets here are miter offsets with a bevel fallback, tuned for the small
//! distances this generator uses (tolerances and wall thicknesses, well under
//! local feature size). Gross failures such as a wall swallowing the whole
//! profile are caught by an area check rather than full self-intersection
//! repair.

use crate::types::{KernelError, Point2, Vector2};

/// Rings enclosing less area than this are degenerate.
pub(crate) const MIN_RING_AREA: f64 = 1e-9;

/// Neighboring points closer than this are welded into one.
pub(crate) const WELD_EPS: f64 = 1e-9;

/// Turn cross-products under this count as straight-through and the middle
/// vertex is dropped.
pub(crate) const COLLINEAR_EPS: f64 = 1e-9;

/// Miter joins longer than this multiple of the offset distance are beveled
/// (growing side) or clamped (correspondence-preserving offsets).
pub(crate) const MITER_LIMIT: f64 = 4.0;

/// Shoelace area; positive for counter-clockwise rings.
pub fn signed_ring_area(ring: &[Point2]) -> f64 {
    let n = ring.len();
    let mut twice = 0.0;
    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        twice += a.x * b.y - b.x * a.y;
    }
    twice / 2.0
}

pub fn ring_perimeter(ring: &[Point2]) -> f64 {
    let n = ring.len();
    (0..n)
        .map(|i| (ring[(i + 1) % n] - ring[i]).norm())
        .sum()
}

/// Drop coincident neighbors and a closing duplicate of the first point.
pub(crate) fn weld_ring(points: Vec<Point2>) -> Vec<Point2> {
    let mut out: Vec<Point2> = Vec::with_capacity(points.len());
    for p in points {
        if out
            .last()
            .is_some_and(|last| (p - last).norm() <= WELD_EPS)
        {
            continue;
        }
        out.push(p);
    }
    while out.len() > 1 && (out[0] - out[out.len() - 1]).norm() <= WELD_EPS {
        out.pop();
    }
    out
}

/// Drop vertices that lie on the straight line through their neighbors.
/// Cap triangulation skips exactly-collinear vertices while wall lofting
/// keeps every segment, so rings must shed them before both see the ring or
/// the mesh comes out open along straight runs.
pub(crate) fn simplify_collinear(ring: Vec<Point2>) -> Vec<Point2> {
    if ring.len() < 4 {
        return ring;
    }
    let mut out: Vec<Point2> = Vec::with_capacity(ring.len());
    for p in ring {
        while out.len() >= 2 {
            let a = out[out.len() - 2];
            let b = out[out.len() - 1];
            if cross2(b - a, p - b).abs() <= COLLINEAR_EPS {
                out.pop();
            } else {
                break;
            }
        }
        out.push(p);
    }
    // The pass above never questions the seam vertices.
    loop {
        let n = out.len();
        if n < 4 {
            break;
        }
        if cross2(out[n - 1] - out[n - 2], out[0] - out[n - 1]).abs() <= COLLINEAR_EPS {
            out.pop();
            continue;
        }
        if cross2(out[0] - out[n - 1], out[1] - out[0]).abs() <= COLLINEAR_EPS {
            out.remove(0);
            continue;
        }
        break;
    }
    out
}

/// Offset a counter-clockwise ring by `distance`; positive grows the
/// enclosed area. Corners the offset grows around are beveled once the miter
/// join exceeds [`MITER_LIMIT`], so the vertex count may change. Returns an
/// error when the offset inverts or annihilates the ring.
pub fn offset_ring(ring: &[Point2], distance: f64) -> Result<Vec<Point2>, KernelError> {
    if ring.len() < 3 {
        return Err(KernelError::DegenerateProfile {
            reason: "offset input has fewer than 3 points".to_string(),
        });
    }
    if distance == 0.0 {
        return Ok(ring.to_vec());
    }

    let n = ring.len();
    let mut out = Vec::with_capacity(n + 4);
    for i in 0..n {
        let prev = ring[(i + n - 1) % n];
        let cur = ring[i];
        let next = ring[(i + 1) % n];
        match corner_offset(prev, cur, next, distance) {
            CornerOffset::Miter(p) => out.push(p),
            CornerOffset::Bevel(a, b) => {
                out.push(a);
                out.push(b);
            }
        }
    }

    let out = weld_ring(out);
    let before = signed_ring_area(ring);
    let after = if out.len() < 3 {
        0.0
    } else {
        signed_ring_area(&out)
    };
    let collapsed = after < MIN_RING_AREA
        || (distance > 0.0 && after <= before)
        || (distance < 0.0 && after >= before);
    if collapsed {
        return Err(KernelError::OffsetCollapse {
            reason: format!(
                "offset by {distance} took ring area from {before:.3} to {after:.3}"
            ),
        });
    }
    Ok(out)
}

/// Offset a counter-clockwise ring keeping vertex count and order, so
/// `ring[i]` pairs with `result[i]` when lofting prism side walls. Runaway
/// miters at spikes are clamped instead of beveled.
pub fn offset_ring_corresponding(ring: &[Point2], distance: f64) -> Vec<Point2> {
    if distance == 0.0 {
        return ring.to_vec();
    }
    let n = ring.len();
    let limit = MITER_LIMIT * distance.abs();
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let prev = ring[(i + n - 1) % n];
        let cur = ring[i];
        let next = ring[(i + 1) % n];
        let p = match miter_point(prev, cur, next, distance) {
            Some((p, miter)) if miter.abs() <= limit => p,
            Some((_, miter)) => {
                let clamped = miter.clamp(-limit, limit);
                let bis = bisector(prev, cur, next);
                cur + bis * clamped
            }
            // Edges fold back on themselves; fall back to one edge normal.
            None => cur + edge_normal(prev, cur) * distance,
        };
        out.push(p);
    }
    out
}

/// Even-odd ray cast. Points on the boundary are not classified reliably.
pub fn point_in_ring(ring: &[Point2], p: &Point2) -> bool {
    let n = ring.len();
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let a = ring[i];
        let b = ring[j];
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Shortest distance from `p` to the closed boundary of the ring.
pub fn distance_to_ring(ring: &[Point2], p: &Point2) -> f64 {
    let n = ring.len();
    (0..n)
        .map(|i| segment_distance(ring[i], ring[(i + 1) % n], *p))
        .fold(f64::INFINITY, f64::min)
}

fn segment_distance(a: Point2, b: Point2, p: Point2) -> f64 {
    let ab = b - a;
    let len2 = ab.norm_squared();
    if len2 <= WELD_EPS * WELD_EPS {
        return (p - a).norm();
    }
    let t = ((p - a).dot(&ab) / len2).clamp(0.0, 1.0);
    (p - (a + ab * t)).norm()
}

enum CornerOffset {
    Miter(Point2),
    Bevel(Point2, Point2),
}

fn corner_offset(prev: Point2, cur: Point2, next: Point2, distance: f64) -> CornerOffset {
    let n_prev = edge_normal(prev, cur);
    let n_next = edge_normal(cur, next);
    match miter_point(prev, cur, next, distance) {
        Some((p, miter)) => {
            // Only corners the offset grows around get beveled; on the
            // shrinking side the long miter is the exact intersection.
            let turn = cross2(cur - prev, next - cur);
            let growing = (turn > 0.0) == (distance > 0.0);
            if growing && miter.abs() > MITER_LIMIT * distance.abs() {
                CornerOffset::Bevel(cur + n_prev * distance, cur + n_next * distance)
            } else {
                CornerOffset::Miter(p)
            }
        }
        None => CornerOffset::Bevel(cur + n_prev * distance, cur + n_next * distance),
    }
}

/// Intersection of the two offset edge lines through a corner, with the
/// signed miter length along the corner bisector. `None` when the edges are
/// anti-parallel and no bisector exists.
fn miter_point(
    prev: Point2,
    cur: Point2,
    next: Point2,
    distance: f64,
) -> Option<(Point2, f64)> {
    let n_prev = edge_normal(prev, cur);
    let n_next = edge_normal(cur, next);
    let sum = n_prev + n_next;
    if sum.norm_squared() < 1e-12 {
        return None;
    }
    let bis = sum.normalize();
    let cos_half = bis.dot(&n_prev);
    if cos_half <= 1e-9 {
        return None;
    }
    let miter = distance / cos_half;
    Some((cur + bis * miter, miter))
}

fn bisector(prev: Point2, cur: Point2, next: Point2) -> Vector2 {
    (edge_normal(prev, cur) + edge_normal(cur, next)).normalize()
}

/// Unit normal pointing to the right of travel, which is outward for a
/// counter-clockwise ring.
fn edge_normal(from: Point2, to: Point2) -> Vector2 {
    let t = (to - from).normalize();
    Vector2::new(t.y, -t.x)
}

fn cross2(a: Vector2, b: Vector2) -> f64 {
    a.x * b.y - a.y * b.x
}
