//! Divide-and-conquer hull construction.
//!
//! Points sorted strictly by `(x, y)` are split at the median; halves below
//! the base-case threshold are built incrementally and the rest recursively,
//! then the two hulls are joined by [`merge_hulls`]. Total cost is
//! O(n log n) for inputs in general position.

use crate::core::algorithms::incremental::IncrementalHull;
use crate::core::algorithms::merge::merge_hulls;
use crate::core::mesh::{HullError, MIN_HULL_POINTS, Mesh};
use crate::geometry::point::Point3;

/// Smallest allowed base-case threshold: each half of a split must still
/// hold a tetrahedron.
pub const MIN_BASE_CASE_THRESHOLD: usize = 2 * MIN_HULL_POINTS;

/// Default base-case threshold.
pub const DEFAULT_BASE_CASE_THRESHOLD: usize = 30;

/// Divide-and-conquer hull builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DivideAndConquerHull {
    threshold: usize,
    parallel: bool,
}

impl Default for DivideAndConquerHull {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_BASE_CASE_THRESHOLD,
            parallel: false,
        }
    }
}

impl DivideAndConquerHull {
    /// Builder with the given base-case threshold, raised to
    /// [`MIN_BASE_CASE_THRESHOLD`] if smaller.
    #[must_use]
    pub fn new(threshold: usize) -> Self {
        Self {
            threshold: threshold.max(MIN_BASE_CASE_THRESHOLD),
            parallel: false,
        }
    }

    /// Build the two halves of every split on rayon's pool.
    #[must_use]
    pub const fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Base-case threshold in use.
    #[must_use]
    pub const fn threshold(&self) -> usize {
        self.threshold
    }

    /// Build the hull of `points`, which must be strictly increasing in
    /// `(x, y)`.
    ///
    /// # Errors
    ///
    /// - [`HullError::InsufficientPoints`] for fewer than four points
    /// - [`HullError::CoordinateOutOfRange`] for a coordinate past
    ///   [`MAX_COORDINATE`](crate::geometry::point::MAX_COORDINATE)
    /// - [`HullError::InputOrder`] for an out-of-order or repeated `(x, y)`
    ///   pair, before any construction starts
    /// - recoverable merge errors ([`HullError::is_recoverable`]), including
    ///   [`HullError::DegenerateInput`] from a coplanar half
    ///
    /// # Examples
    ///
    /// ```rust
    /// use voronoi_hull::core::algorithms::divide_and_conquer::DivideAndConquerHull;
    /// use voronoi_hull::geometry::point::Point3;
    ///
    /// let unsorted = [
    ///     Point3::new(5, 0, 0),
    ///     Point3::new(0, 0, 0),
    ///     Point3::new(0, 5, 0),
    ///     Point3::new(0, 0, 5),
    /// ];
    /// assert!(DivideAndConquerHull::default().build(&unsorted).is_err());
    /// ```
    pub fn build(&self, points: &[Point3]) -> Result<Mesh, HullError> {
        if points.len() < MIN_HULL_POINTS {
            return Err(HullError::InsufficientPoints {
                found: points.len(),
                required: MIN_HULL_POINTS,
            });
        }
        for p in points {
            p.validate()?;
        }
        check_order(points)?;
        let mesh = self.build_sorted(points)?;
        tracing::debug!(
            "divide-and-conquer hull: {} points, threshold {}, {} vertices, {} faces",
            points.len(),
            self.threshold,
            mesh.number_of_vertices(),
            mesh.number_of_faces()
        );
        Ok(mesh)
    }

    fn build_sorted(&self, points: &[Point3]) -> Result<Mesh, HullError> {
        if points.len() < self.threshold {
            return IncrementalHull::build(points);
        }
        let (left, right) = points.split_at(points.len() / 2);
        let (left, right) = if self.parallel {
            rayon::join(|| self.build_sorted(left), || self.build_sorted(right))
        } else {
            (self.build_sorted(left), self.build_sorted(right))
        };
        merge_hulls(left?, right?)
    }
}

/// Check that `points` is strictly increasing in `(x, y)`.
///
/// # Errors
///
/// Returns [`HullError::InputOrder`] naming the first offending pair.
pub fn check_order(points: &[Point3]) -> Result<(), HullError> {
    match points.windows(2).position(|w| w[0].xy() >= w[1].xy()) {
        Some(i) => Err(HullError::InputOrder {
            message: format!(
                "point {} at index {} does not follow {} in (x, y) order",
                points[i + 1],
                i + 1,
                points[i]
            ),
        }),
        None => Ok(()),
    }
}

// =============================================================================
// TESTS
// =============================================================================
