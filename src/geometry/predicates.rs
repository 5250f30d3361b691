//! Exact geometric predicates on integer points.
//!
//! Every predicate is evaluated in `i128` on `i64` inputs, so the sign it
//! reports is the true sign. Hull correctness depends on exact decisions at
//! ties; no floating point is involved anywhere in this module.
//!
//! Faces are stored counter-clockwise as seen from outside the solid. With
//! that convention [`volume6`] is negative exactly when the fourth point lies
//! strictly outside the face's plane.
//!
//! # Examples
//!
//! ```rust
//! use voronoi_hull::geometry::point::Point3;
//! use voronoi_hull::geometry::predicates::{is_visible, volume6};
//!
//! let face = [Point3::new(0, 0, 0), Point3::new(1, 0, 0), Point3::new(0, 1, 0)];
//! let above = Point3::new(0, 0, 1);
//! assert_eq!(volume6(&face[0], &face[1], &face[2], &above), -1);
//! assert!(is_visible(&face, &above));
//! ```

use crate::geometry::point::{Point3, Site};

/// Sign of a predicate evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// The determinant is negative.
    NEGATIVE,
    /// The determinant is exactly zero.
    DEGENERATE,
    /// The determinant is positive.
    POSITIVE,
}

impl Orientation {
    /// Classify the sign of an exact determinant.
    #[inline]
    #[must_use]
    pub const fn from_determinant(det: i128) -> Self {
        match det.signum() {
            -1 => Self::NEGATIVE,
            0 => Self::DEGENERATE,
            _ => Self::POSITIVE,
        }
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NEGATIVE => write!(f, "NEGATIVE"),
            Self::DEGENERATE => write!(f, "DEGENERATE"),
            Self::POSITIVE => write!(f, "POSITIVE"),
        }
    }
}

#[inline]
const fn area2_raw(px: i128, py: i128, qx: i128, qy: i128, rx: i128, ry: i128) -> i128 {
    (qx - px) * (ry - py) - (rx - px) * (qy - py)
}

/// Twice the signed area of the planar triangle `pqr`.
///
/// Positive when `p, q, r` turn counter-clockwise, negative when clockwise,
/// zero when collinear.
#[inline]
#[must_use]
pub fn area2(p: &Site, q: &Site, r: &Site) -> i128 {
    area2_raw(
        i128::from(p.x),
        i128::from(p.y),
        i128::from(q.x),
        i128::from(q.y),
        i128::from(r.x),
        i128::from(r.y),
    )
}

/// [`area2`] of the projections of three points onto the xy-plane.
#[inline]
#[must_use]
pub fn area2_xy(p: &Point3, q: &Point3, r: &Point3) -> i128 {
    area2(&p.xy(), &q.xy(), &r.xy())
}

/// Six times the signed volume of the tetrahedron `abcd`.
///
/// Evaluates `det[a - d, b - d, c - d]`. For a triangle `abc` ordered
/// counter-clockwise when seen from outside, the result is negative iff `d`
/// is strictly outside, zero iff the four points are coplanar.
#[must_use]
pub fn volume6(a: &Point3, b: &Point3, c: &Point3, d: &Point3) -> i128 {
    let [dx, dy, dz] = d.wide();
    let [ax, ay, az] = a.wide();
    let [bx, by, bz] = b.wide();
    let [cx, cy, cz] = c.wide();
    let (ax, ay, az) = (ax - dx, ay - dy, az - dz);
    let (bx, by, bz) = (bx - dx, by - dy, bz - dz);
    let (cx, cy, cz) = (cx - dx, cy - dy, cz - dz);

    ax * (by * cz - bz * cy) - ay * (bx * cz - bz * cx) + az * (bx * cy - by * cx)
}

/// Whether `p` lies strictly outside the outward-facing plane of `face`.
#[inline]
#[must_use]
pub fn is_visible(face: &[Point3; 3], p: &Point3) -> bool {
    volume6(&face[0], &face[1], &face[2], p) < 0
}

/// Whether three points in space lie on one line.
///
/// Three points are collinear iff their projections onto all three axis
/// planes are collinear.
#[must_use]
pub fn are_collinear(a: &Point3, b: &Point3, c: &Point3) -> bool {
    let [ax, ay, az] = a.wide();
    let [bx, by, bz] = b.wide();
    let [cx, cy, cz] = c.wide();
    area2_raw(ax, ay, bx, by, cx, cy) == 0
        && area2_raw(ay, az, by, bz, cy, cz) == 0
        && area2_raw(ax, az, bx, bz, cx, cz) == 0
}

/// Whether four points lie on one plane.
#[inline]
#[must_use]
pub fn are_coplanar(a: &Point3, b: &Point3, c: &Point3, d: &Point3) -> bool {
    volume6(a, b, c, d) == 0
}

/// Orientation of the planar triangle `pqr`.
#[inline]
#[must_use]
pub fn orientation_2d(p: &Site, q: &Site, r: &Site) -> Orientation {
    Orientation::from_determinant(area2(p, q, r))
}

/// Orientation of the tetrahedron `abcd` by the sign of [`volume6`].
#[inline]
#[must_use]
pub fn orientation_3d(a: &Point3, b: &Point3, c: &Point3, d: &Point3) -> Orientation {
    Orientation::from_determinant(volume6(a, b, c, d))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::point::MAX_COORDINATE;

    fn p(x: i64, y: i64, z: i64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn test_area2_signs() {
        let o = Site::new(0, 0);
        let a = Site::new(4, 0);
        let b = Site::new(0, 3);
        assert_eq!(area2(&o, &a, &b), 12);
        assert_eq!(area2(&o, &b, &a), -12);
        assert_eq!(area2(&o, &a, &Site::new(8, 0)), 0);
        assert_eq!(orientation_2d(&o, &a, &b), Orientation::POSITIVE);
        assert_eq!(orientation_2d(&o, &b, &a), Orientation::NEGATIVE);
    }

    #[test]
    fn test_volume6_outside_is_negative() {
        let face = [p(0, 0, 0), p(1, 0, 0), p(0, 1, 0)];
        assert_eq!(volume6(&face[0], &face[1], &face[2], &p(0, 0, 1)), -1);
        assert_eq!(volume6(&face[0], &face[1], &face[2], &p(0, 0, -1)), 1);
        assert!(is_visible(&face, &p(5, 5, 2)));
        assert!(!is_visible(&face, &p(5, 5, 0)));
        assert!(!is_visible(&face, &p(5, 5, -2)));
    }

    #[test]
    fn test_volume6_is_invariant_under_rotation_of_face() {
        let (a, b, c, d) = (p(3, -1, 7), p(-2, 5, 1), p(4, 4, -3), p(9, 0, 2));
        let v = volume6(&a, &b, &c, &d);
        assert_ne!(v, 0);
        assert_eq!(volume6(&b, &c, &a, &d), v);
        assert_eq!(volume6(&c, &a, &b, &d), v);
        assert_eq!(volume6(&b, &a, &c, &d), -v);
    }

    #[test]
    fn test_volume6_extreme_coordinates_do_not_overflow() {
        let m = MAX_COORDINATE;
        let a = p(-m, -m, -m);
        let b = p(m, -m, -m);
        let c = p(-m, m, -m);
        let d = p(-m, -m, m);
        let side = i128::from(2 * m);
        assert_eq!(volume6(&a, &b, &c, &d).abs(), side * side * side);
    }

    #[test]
    fn test_collinear_and_coplanar() {
        assert!(are_collinear(&p(0, 0, 0), &p(1, 2, 3), &p(2, 4, 6)));
        assert!(!are_collinear(&p(0, 0, 0), &p(1, 2, 3), &p(2, 4, 7)));
        // Collinear in the xy projection only.
        assert!(!are_collinear(&p(0, 0, 0), &p(1, 1, 0), &p(2, 2, 5)));
        assert!(are_coplanar(&p(0, 0, 0), &p(1, 0, 0), &p(0, 1, 0), &p(7, 7, 0)));
        assert_eq!(
            orientation_3d(&p(0, 0, 0), &p(1, 0, 0), &p(0, 1, 0), &p(7, 7, 0)),
            Orientation::DEGENERATE
        );
    }

    #[test]
    fn test_orientation_display() {
        assert_eq!(Orientation::NEGATIVE.to_string(), "NEGATIVE");
        assert_eq!(Orientation::DEGENERATE.to_string(), "DEGENERATE");
        assert_eq!(Orientation::POSITIVE.to_string(), "POSITIVE");
    }
}
