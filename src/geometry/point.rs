//! Integer points in space and planar sites.
//!
//! All coordinates are `i64` and every predicate evaluates them exactly in
//! `i128`. The bounds below keep the sextupled tetrahedron volume inside
//! `i128` for any four points that pass validation.
//!
//! # Examples
//!
//! ```rust
//! use voronoi_hull::geometry::point::{Point3, Site};
//!
//! let site = Site::new(3, 4);
//! let lifted = site.lift();
//! assert_eq!(lifted, Point3::new(3, 4, 25));
//! assert_eq!(lifted.xy(), site);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::mesh::HullError;

/// Largest absolute value allowed for any coordinate of a [`Point3`].
pub const MAX_COORDINATE: i64 = 1 << 40;

/// Largest absolute value allowed for a [`Site`] coordinate, so that its
/// paraboloid lift stays within [`MAX_COORDINATE`].
pub const MAX_SITE_COORDINATE: i64 = 1 << 19;

// =============================================================================
// POINT3
// =============================================================================

/// A point in space with integer coordinates.
///
/// Ordering is lexicographic on `(x, y, z)`, which is the order the
/// divide-and-conquer builder splits on.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Point3 {
    /// Abscissa.
    pub x: i64,
    /// Ordinate.
    pub y: i64,
    /// Height; `x² + y²` for lifted sites.
    pub z: i64,
}

impl Point3 {
    /// Create a point from its coordinates.
    #[inline]
    #[must_use]
    pub const fn new(x: i64, y: i64, z: i64) -> Self {
        Self { x, y, z }
    }

    /// Orthogonal projection onto the xy-plane.
    #[inline]
    #[must_use]
    pub const fn xy(&self) -> Site {
        Site::new(self.x, self.y)
    }

    /// Coordinates widened to `i128` for exact predicate evaluation.
    #[inline]
    #[must_use]
    pub const fn wide(&self) -> [i128; 3] {
        [self.x as i128, self.y as i128, self.z as i128]
    }

    /// Whether every coordinate is within `±MAX_COORDINATE`.
    #[inline]
    #[must_use]
    pub const fn is_in_range(&self) -> bool {
        let max = MAX_COORDINATE.unsigned_abs();
        self.x.unsigned_abs() <= max && self.y.unsigned_abs() <= max && self.z.unsigned_abs() <= max
    }

    /// Check the coordinate bound.
    ///
    /// # Errors
    ///
    /// Returns [`HullError::CoordinateOutOfRange`] when a coordinate exceeds
    /// [`MAX_COORDINATE`] in absolute value.
    pub fn validate(&self) -> Result<(), HullError> {
        if self.is_in_range() {
            Ok(())
        } else {
            Err(HullError::CoordinateOutOfRange {
                message: format!("{self} exceeds ±{MAX_COORDINATE}"),
            })
        }
    }
}

impl From<[i64; 3]> for Point3 {
    fn from([x, y, z]: [i64; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl From<(i64, i64, i64)> for Point3 {
    fn from((x, y, z): (i64, i64, i64)) -> Self {
        Self::new(x, y, z)
    }
}

impl fmt::Display for Point3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

// =============================================================================
// SITE
// =============================================================================

/// A planar site with integer coordinates.
///
/// Ordering is lexicographic on `(x, y)`.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Site {
    /// Abscissa.
    pub x: i64,
    /// Ordinate.
    pub y: i64,
}

impl Site {
    /// Create a site from its coordinates.
    #[inline]
    #[must_use]
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Paraboloid lift `(x, y) -> (x, y, x² + y²)`.
    ///
    /// Only meaningful for sites within [`MAX_SITE_COORDINATE`]; call
    /// [`Site::validate`] first for untrusted input.
    #[inline]
    #[must_use]
    pub const fn lift(&self) -> Point3 {
        Point3::new(self.x, self.y, self.x * self.x + self.y * self.y)
    }

    /// Whether both coordinates are within `±MAX_SITE_COORDINATE`.
    #[inline]
    #[must_use]
    pub const fn is_in_range(&self) -> bool {
        let max = MAX_SITE_COORDINATE.unsigned_abs();
        self.x.unsigned_abs() <= max && self.y.unsigned_abs() <= max
    }

    /// Check the site bound.
    ///
    /// # Errors
    ///
    /// Returns [`HullError::CoordinateOutOfRange`] when a coordinate exceeds
    /// [`MAX_SITE_COORDINATE`] in absolute value.
    pub fn validate(&self) -> Result<(), HullError> {
        if self.is_in_range() {
            Ok(())
        } else {
            Err(HullError::CoordinateOutOfRange {
                message: format!("site {self} exceeds ±{MAX_SITE_COORDINATE}"),
            })
        }
    }
}

impl From<[i64; 2]> for Site {
    fn from([x, y]: [i64; 2]) -> Self {
        Self::new(x, y)
    }
}

impl From<(i64, i64)> for Site {
    fn from((x, y): (i64, i64)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lift_is_paraboloid() {
        assert_eq!(Site::new(0, 0).lift(), Point3::new(0, 0, 0));
        assert_eq!(Site::new(-3, 4).lift(), Point3::new(-3, 4, 25));
        let max = Site::new(MAX_SITE_COORDINATE, -MAX_SITE_COORDINATE).lift();
        assert!(max.is_in_range());
    }

    #[test]
    fn test_ordering_is_lexicographic() {
        let mut points = vec![
            Point3::new(1, 0, 0),
            Point3::new(0, 5, 0),
            Point3::new(0, 1, 9),
            Point3::new(0, 1, 2),
        ];
        points.sort();
        assert_eq!(
            points,
            vec![
                Point3::new(0, 1, 2),
                Point3::new(0, 1, 9),
                Point3::new(0, 5, 0),
                Point3::new(1, 0, 0),
            ]
        );
        assert!(Site::new(0, 10) < Site::new(1, -10));
    }

    #[test]
    fn test_range_validation() {
        assert!(Point3::new(MAX_COORDINATE, 0, -MAX_COORDINATE).validate().is_ok());
        assert!(matches!(
            Point3::new(MAX_COORDINATE + 1, 0, 0).validate(),
            Err(HullError::CoordinateOutOfRange { .. })
        ));
        assert!(matches!(
            Site::new(0, MAX_SITE_COORDINATE + 1).validate(),
            Err(HullError::CoordinateOutOfRange { .. })
        ));
        assert!(!Point3::new(i64::MIN, 0, 0).is_in_range());
        assert!(!Site::new(0, i64::MIN).is_in_range());
    }

    #[test]
    fn test_conversions_and_display() {
        assert_eq!(Point3::from([1, 2, 3]), Point3::new(1, 2, 3));
        assert_eq!(Point3::from((1, 2, 3)).to_string(), "(1, 2, 3)");
        assert_eq!(Site::from((4, 5)).to_string(), "(4, 5)");
        assert_eq!(Site::from([4, 5]), Site::new(4, 5));
    }
}
