//! Hull facade.
//!
//! [`Polyhedron`] validates and sorts its input, picks a construction method
//! from a [`HullConfig`] and falls back to the incremental builder whenever
//! the divide-and-conquer merge reports a recoverable failure. The finished
//! mesh is read-only.
//!
//! # Examples
//!
//! ```rust
//! use voronoi_hull::core::polyhedron::{HullConfig, Method, Polyhedron};
//! use voronoi_hull::geometry::point::Point3;
//!
//! let points = [
//!     Point3::new(0, 0, 0),
//!     Point3::new(10, 0, 0),
//!     Point3::new(10, 10, 0),
//!     Point3::new(0, 10, 0),
//!     Point3::new(3, 4, 10),
//! ];
//! let hull = Polyhedron::new(&points, &HullConfig::default()).unwrap();
//! assert_eq!(hull.method(), Method::Incremental);
//! assert_eq!(
//!     (hull.number_of_vertices(), hull.number_of_edges(), hull.number_of_faces()),
//!     (5, 9, 6)
//! );
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};

use crate::core::algorithms::divide_and_conquer::{
    DEFAULT_BASE_CASE_THRESHOLD, DivideAndConquerHull, MIN_BASE_CASE_THRESHOLD,
};
use crate::core::algorithms::incremental::IncrementalHull;
use crate::core::edge::Edge;
use crate::core::face::Face;
use crate::core::mesh::{EdgeKey, FaceKey, HullError, MIN_HULL_POINTS, Mesh, VertexKey};
use crate::core::vertex::Vertex;
use crate::geometry::point::{Point3, Site};
use crate::topology::characteristics::validation::{
    MeshValidationError, TopologyCheckResult, check_topology,
};

/// Environment variable read by [`HullConfig::from_env`].
pub const BASE_CASE_ENV_VAR: &str = "VORONOI_HULL_BASE_CASE";

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Construction settings for a [`Polyhedron`].
///
/// # Examples
///
/// ```rust
/// use voronoi_hull::core::polyhedron::HullConfigBuilder;
///
/// let config = HullConfigBuilder::default()
///     .base_case_threshold(12)
///     .parallel(true)
///     .build()
///     .unwrap();
/// assert_eq!(config.base_case_threshold, 12);
/// assert!(config.validate);
///
/// assert!(HullConfigBuilder::default().base_case_threshold(5).build().is_err());
/// ```
#[derive(Builder, Clone, Copy, Debug, PartialEq, Eq)]
#[builder(build_fn(validate = "Self::check_threshold"))]
pub struct HullConfig {
    /// Subproblems smaller than this are built incrementally. At least
    /// [`MIN_BASE_CASE_THRESHOLD`].
    #[builder(default = "DEFAULT_BASE_CASE_THRESHOLD")]
    pub base_case_threshold: usize,
    /// Skip divide-and-conquer entirely.
    #[builder(default)]
    pub force_incremental: bool,
    /// Build the halves of each split on rayon's pool.
    #[builder(default)]
    pub parallel: bool,
    /// Check the finished mesh before returning it: references, rings,
    /// Euler counts and convexity at every edge, all in linear time.
    #[builder(default = "true")]
    pub validate: bool,
}

impl HullConfigBuilder {
    fn check_threshold(&self) -> Result<(), String> {
        match self.base_case_threshold {
            Some(threshold) if threshold < MIN_BASE_CASE_THRESHOLD => Err(format!(
                "base_case_threshold {threshold} is below the minimum {MIN_BASE_CASE_THRESHOLD}"
            )),
            _ => Ok(()),
        }
    }
}

impl Default for HullConfig {
    fn default() -> Self {
        Self {
            base_case_threshold: DEFAULT_BASE_CASE_THRESHOLD,
            force_incremental: false,
            parallel: false,
            validate: true,
        }
    }
}

impl HullConfig {
    /// Default configuration with the threshold taken from
    /// `VORONOI_HULL_BASE_CASE` when it holds a valid value.
    #[must_use]
    pub fn from_env() -> Self {
        let raw = std::env::var(BASE_CASE_ENV_VAR).ok();
        let mut config = Self::default();
        if let Some(threshold) = parse_threshold(raw.as_deref()) {
            config.base_case_threshold = threshold;
        }
        config
    }
}

fn parse_threshold(raw: Option<&str>) -> Option<usize> {
    let raw = raw?;
    match raw.trim().parse::<usize>() {
        Ok(threshold) if threshold >= MIN_BASE_CASE_THRESHOLD => Some(threshold),
        Ok(threshold) => {
            tracing::warn!(
                "ignoring {}={}: below the minimum {}",
                BASE_CASE_ENV_VAR,
                threshold,
                MIN_BASE_CASE_THRESHOLD
            );
            None
        }
        Err(err) => {
            tracing::warn!("ignoring {}={:?}: {}", BASE_CASE_ENV_VAR, raw, err);
            None
        }
    }
}

// =============================================================================
// METHOD
// =============================================================================

/// Algorithm that produced a [`Polyhedron`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Method {
    /// Incremental insertion, chosen directly or as a fallback.
    Incremental,
    /// Preparata–Hong divide and conquer.
    DivideAndConquer,
}

impl Method {
    /// Human-readable name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Incremental => "Incremental",
            Self::DivideAndConquer => "Divide and conquer",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// POLYHEDRON
// =============================================================================

/// A finished convex hull together with how it was built.
#[derive(Clone, Debug)]
pub struct Polyhedron {
    mesh: Mesh,
    method: Method,
    recovered: Option<HullError>,
    elapsed: Duration,
}

impl Polyhedron {
    /// Build the hull of `points`.
    ///
    /// The points are sorted lexicographically first, so their order does not
    /// matter. Inputs with two points sharing `(x, y)` are built
    /// incrementally, since divide and conquer splits on that order.
    ///
    /// # Errors
    ///
    /// - [`HullError::InsufficientPoints`] for fewer than four points
    /// - [`HullError::CoordinateOutOfRange`] for a coordinate past
    ///   [`MAX_COORDINATE`](crate::geometry::point::MAX_COORDINATE)
    /// - [`HullError::DuplicatePoint`] for repeated coordinates
    /// - [`HullError::DegenerateInput`] when every point is coplanar
    /// - [`HullError::Validation`] if `config.validate` is set and the mesh
    ///   fails a check
    pub fn new(points: &[Point3], config: &HullConfig) -> Result<Self, HullError> {
        if points.len() < MIN_HULL_POINTS {
            return Err(HullError::InsufficientPoints {
                found: points.len(),
                required: MIN_HULL_POINTS,
            });
        }
        for p in points {
            p.validate()?;
        }
        let mut sorted = points.to_vec();
        sorted.sort_unstable();
        if let Some(w) = sorted.windows(2).find(|w| w[0] == w[1]) {
            return Err(HullError::DuplicatePoint {
                message: format!("{} appears more than once", w[0]),
            });
        }

        let started = Instant::now();
        let xy_tie = sorted.windows(2).any(|w| w[0].xy() == w[1].xy());
        let (mesh, method, recovered) = if config.force_incremental
            || xy_tie
            || sorted.len() < config.base_case_threshold
        {
            tracing::debug!(
                "building {} points incrementally (forced: {}, xy tie: {})",
                sorted.len(),
                config.force_incremental,
                xy_tie
            );
            (IncrementalHull::build(&sorted)?, Method::Incremental, None)
        } else {
            let builder = DivideAndConquerHull::new(config.base_case_threshold)
                .with_parallel(config.parallel);
            match builder.build(&sorted) {
                Ok(mesh) => (mesh, Method::DivideAndConquer, None),
                Err(err) if err.is_recoverable() => {
                    tracing::warn!(
                        "divide and conquer failed ({}); rebuilding {} points incrementally",
                        err,
                        sorted.len()
                    );
                    (IncrementalHull::build(&sorted)?, Method::Incremental, Some(err))
                }
                Err(err) => return Err(err),
            }
        };
        let elapsed = started.elapsed();

        if config.validate {
            mesh.is_valid()?;
            mesh.validate_local_convexity()?;
        }
        tracing::debug!(
            "{} hull: {} vertices, {} edges, {} faces in {:?}",
            method,
            mesh.number_of_vertices(),
            mesh.number_of_edges(),
            mesh.number_of_faces(),
            elapsed
        );
        Ok(Self {
            mesh,
            method,
            recovered,
            elapsed,
        })
    }

    /// Lift `sites` onto the paraboloid `z = x² + y²` and build their hull.
    ///
    /// # Errors
    ///
    /// Same as [`Polyhedron::new`]; [`HullError::CoordinateOutOfRange`] is
    /// raised for sites past
    /// [`MAX_SITE_COORDINATE`](crate::geometry::point::MAX_SITE_COORDINATE).
    pub fn from_sites(sites: &[Site], config: &HullConfig) -> Result<Self, HullError> {
        for site in sites {
            site.validate()?;
        }
        let lifted: Vec<Point3> = sites.iter().map(Site::lift).collect();
        Self::new(&lifted, config)
    }

    /// Method that produced the mesh.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Name of the method that produced the mesh.
    #[must_use]
    pub const fn method_str(&self) -> &'static str {
        self.method.as_str()
    }

    /// The divide-and-conquer error that triggered the incremental fallback.
    #[must_use]
    pub const fn recovered_error(&self) -> Option<&HullError> {
        self.recovered.as_ref()
    }

    /// Wall-clock construction time, excluding input checks and validation.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// The underlying mesh.
    #[must_use]
    pub const fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Take the mesh out of the facade.
    #[must_use]
    pub fn into_mesh(self) -> Mesh {
        self.mesh
    }

    /// Number of hull vertices.
    #[must_use]
    pub fn number_of_vertices(&self) -> usize {
        self.mesh.number_of_vertices()
    }

    /// Number of hull edges.
    #[must_use]
    pub fn number_of_edges(&self) -> usize {
        self.mesh.number_of_edges()
    }

    /// Number of hull faces.
    #[must_use]
    pub fn number_of_faces(&self) -> usize {
        self.mesh.number_of_faces()
    }

    /// Iterate over the hull vertices.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexKey, &Vertex)> {
        self.mesh.vertices()
    }

    /// Iterate over the hull edges.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeKey, &Edge)> {
        self.mesh.edges()
    }

    /// Iterate over the hull faces.
    pub fn faces(&self) -> impl Iterator<Item = (FaceKey, &Face)> {
        self.mesh.faces()
    }

    /// Referential, ring and Euler checks.
    ///
    /// # Errors
    ///
    /// Returns the first failed check.
    pub fn is_valid(&self) -> Result<(), MeshValidationError> {
        self.mesh.is_valid()
    }

    /// Check that no vertex sees any face.
    ///
    /// # Errors
    ///
    /// Returns [`MeshValidationError::NotConvex`] naming a visible pair.
    pub fn validate_convexity(&self) -> Result<(), MeshValidationError> {
        self.mesh.validate_convexity()
    }

    /// Run every topology check and collect the results.
    #[must_use]
    pub fn check_topology(&self) -> TopologyCheckResult {
        check_topology(&self.mesh)
    }
}

impl fmt::Display for Polyhedron {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} hull with {} vertices, {} edges, {} faces, built in {} ms",
            self.method,
            self.number_of_vertices(),
            self.number_of_edges(),
            self.number_of_faces(),
            self.elapsed.as_millis()
        )
    }
}

// =============================================================================
// TESTS
// =============================================================================
