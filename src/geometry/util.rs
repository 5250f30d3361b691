//! Exact circumcenters and seeded site generation.
//!
//! Circumcenters of lifted triangles are kept as exact rationals and only
//! rounded when a caller asks for integer output. The site generators produce
//! reproducible inputs for tests, benchmarks and demos.

use num_traits::ToPrimitive;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::core::collections::FastHashSet;
use crate::geometry::point::{MAX_SITE_COORDINATE, Point3, Site};
use crate::geometry::predicates::{are_coplanar, area2};

// =============================================================================
// RATIONAL POINTS
// =============================================================================

/// A planar point with rational coordinates `(x_num / den, y_num / den)`.
///
/// The denominator is always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RationalPoint {
    /// Numerator of the abscissa.
    pub x_num: i128,
    /// Numerator of the ordinate.
    pub y_num: i128,
    /// Common positive denominator.
    pub den: i128,
}

impl RationalPoint {
    /// Approximate the point in floating point.
    #[must_use]
    pub fn to_f64(&self) -> (f64, f64) {
        let den = self.den.to_f64().unwrap_or(f64::NAN);
        (
            self.x_num.to_f64().unwrap_or(f64::NAN) / den,
            self.y_num.to_f64().unwrap_or(f64::NAN) / den,
        )
    }

    /// Round both coordinates to the nearest integer, ties toward +∞.
    ///
    /// Values beyond the `i64` range saturate.
    #[must_use]
    pub fn round(&self) -> Site {
        Site::new(
            saturate(round_div(self.x_num, self.den)),
            saturate(round_div(self.y_num, self.den)),
        )
    }
}

fn round_div(num: i128, den: i128) -> i128 {
    let q = num.div_euclid(den);
    let r = num.rem_euclid(den);
    if 2 * r >= den { q + 1 } else { q }
}

fn saturate(value: i128) -> i64 {
    i64::try_from(value).unwrap_or(if value < 0 { i64::MIN } else { i64::MAX })
}

/// Exact circumcenter of the projection of a lifted triangle.
///
/// Each point's `z` is taken as its squared distance from the origin, which
/// holds for paraboloid-lifted sites. Returns `None` when the projected
/// triangle is degenerate.
///
/// # Examples
///
/// ```rust
/// use voronoi_hull::geometry::point::Site;
/// use voronoi_hull::geometry::util::lifted_circumcenter;
///
/// let a = Site::new(0, 0).lift();
/// let b = Site::new(4, 0).lift();
/// let c = Site::new(0, 2).lift();
/// let center = lifted_circumcenter(&a, &b, &c).unwrap();
/// assert_eq!(center.round(), Site::new(2, 1));
/// ```
#[must_use]
pub fn lifted_circumcenter(a: &Point3, b: &Point3, c: &Point3) -> Option<RationalPoint> {
    let det = 2 * area2(&a.xy(), &b.xy(), &c.xy());
    if det == 0 {
        return None;
    }
    let [ax, ay, az] = a.wide();
    let [bx, by, bz] = b.wide();
    let [cx, cy, cz] = c.wide();
    let x_num = az * (by - cy) + bz * (cy - ay) + cz * (ay - by);
    let y_num = az * (cx - bx) + bz * (ax - cx) + cz * (bx - ax);
    Some(if det < 0 {
        RationalPoint {
            x_num: -x_num,
            y_num: -y_num,
            den: -det,
        }
    } else {
        RationalPoint {
            x_num,
            y_num,
            den: det,
        }
    })
}

// =============================================================================
// SITE GENERATION
// =============================================================================

/// Errors from the seeded site generators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SiteGenerationError {
    /// A bound is empty or outside the liftable range.
    #[error("Invalid site range [{min}, {max}]")]
    InvalidRange {
        /// Lower bound.
        min: i64,
        /// Upper bound.
        max: i64,
    },
    /// The generator could not find enough acceptable sites.
    #[error("Could only place {placed} of {requested} sites after {attempts} attempts")]
    Exhausted {
        /// Number of sites requested.
        requested: usize,
        /// Number of sites placed before giving up.
        placed: usize,
        /// Number of candidates drawn.
        attempts: usize,
    },
}

fn check_range(range: (i64, i64)) -> Result<(), SiteGenerationError> {
    let (min, max) = range;
    if min > max || min < -MAX_SITE_COORDINATE || max > MAX_SITE_COORDINATE {
        return Err(SiteGenerationError::InvalidRange { min, max });
    }
    Ok(())
}

fn generate_with<F>(
    n_sites: usize,
    x_range: (i64, i64),
    y_range: (i64, i64),
    seed: u64,
    mut accept: F,
) -> Result<Vec<Site>, SiteGenerationError>
where
    F: FnMut(&[Site], Site) -> bool,
{
    check_range(x_range)?;
    check_range(y_range)?;
    let mut rng = StdRng::seed_from_u64(seed);
    let mut seen = FastHashSet::default();
    let mut sites = Vec::with_capacity(n_sites);
    let max_attempts = n_sites.saturating_mul(1_000).max(1_000);
    let mut attempts = 0;
    while sites.len() < n_sites {
        if attempts == max_attempts {
            return Err(SiteGenerationError::Exhausted {
                requested: n_sites,
                placed: sites.len(),
                attempts,
            });
        }
        attempts += 1;
        let candidate = Site::new(
            rng.random_range(x_range.0..=x_range.1),
            rng.random_range(y_range.0..=y_range.1),
        );
        if seen.contains(&candidate) || !accept(&sites, candidate) {
            continue;
        }
        seen.insert(candidate);
        sites.push(candidate);
    }
    Ok(sites)
}

/// Generate `n_sites` distinct uniformly random sites.
///
/// # Errors
///
/// Returns [`SiteGenerationError::InvalidRange`] for empty or oversized
/// ranges, and [`SiteGenerationError::Exhausted`] when the box cannot hold
/// that many distinct sites.
///
/// # Examples
///
/// ```rust
/// use voronoi_hull::geometry::util::generate_random_sites;
///
/// let a = generate_random_sites(50, (0, 620), (0, 480), 7).unwrap();
/// let b = generate_random_sites(50, (0, 620), (0, 480), 7).unwrap();
/// assert_eq!(a, b);
/// ```
pub fn generate_random_sites(
    n_sites: usize,
    x_range: (i64, i64),
    y_range: (i64, i64),
    seed: u64,
) -> Result<Vec<Site>, SiteGenerationError> {
    generate_with(n_sites, x_range, y_range, seed, |_, _| true)
}

/// Generate distinct random sites whose lifts are in general position.
///
/// A candidate is rejected when its lift is coplanar with the lifts of any
/// three accepted sites, which rules out four cocircular or four collinear
/// sites. Cost grows with the cube of the accepted count, so this is meant
/// for test-sized inputs.
///
/// # Errors
///
/// Same as [`generate_random_sites`].
pub fn generate_sites_in_general_position(
    n_sites: usize,
    x_range: (i64, i64),
    y_range: (i64, i64),
    seed: u64,
) -> Result<Vec<Site>, SiteGenerationError> {
    generate_with(n_sites, x_range, y_range, seed, |accepted, candidate| {
        let lifted: Vec<Point3> = accepted.iter().map(Site::lift).collect();
        let d = candidate.lift();
        for i in 0..lifted.len() {
            for j in (i + 1)..lifted.len() {
                for k in (j + 1)..lifted.len() {
                    if are_coplanar(&lifted[i], &lifted[j], &lifted[k], &d) {
                        return false;
                    }
                }
            }
        }
        true
    })
}

// =============================================================================
// TESTS
// =============================================================================
