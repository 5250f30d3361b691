//! Voronoi diagrams and Delaunay triangulations from lifted hulls.
//!
//! The lower faces of the hull of paraboloid-lifted sites are the Delaunay
//! triangles of the sites. Their circumcenters are the Voronoi vertices:
//! - an edge between two lower faces becomes a bounded Voronoi edge joining
//!   their circumcenters
//! - an edge with exactly one lower face lies on the planar hull of the
//!   sites and becomes a ray from that face's circumcenter, perpendicular to
//!   the edge and pointing away from the face's third vertex
//!
//! Circumcenters stay exact until [`VoronoiDiagram::segments`] rounds them.
//!
//! # Examples
//!
//! ```rust
//! use voronoi_hull::core::polyhedron::{HullConfig, Polyhedron};
//! use voronoi_hull::geometry::algorithms::voronoi::VoronoiDiagram;
//! use voronoi_hull::geometry::point::Site;
//!
//! let sites = [
//!     Site::new(0, 0),
//!     Site::new(4, 0),
//!     Site::new(0, 4),
//!     Site::new(5, 5),
//! ];
//! let hull = Polyhedron::from_sites(&sites, &HullConfig::default()).unwrap();
//! let diagram = VoronoiDiagram::from_polyhedron(&hull).unwrap();
//!
//! assert_eq!(diagram.delaunay_triangles().len(), 2);
//! assert_eq!(diagram.edges().len(), 5);
//! assert_eq!(diagram.segments(100.0, |s| s), diagram.segments(100.0, |s| s));
//! ```

use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::collections::{FastHashMap, fast_hash_map_with_capacity};
use crate::core::mesh::{FaceKey, HullError, Mesh, VertexKey};
use crate::core::polyhedron::Polyhedron;
use crate::geometry::algorithms::planar_hull::convex_hull;
use crate::geometry::point::{Point3, Site};
use crate::geometry::util::{RationalPoint, lifted_circumcenter};

// =============================================================================
// LINE SEGMENTS
// =============================================================================

/// An integer line segment with normalized endpoints, `start <= end`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct LineSegment {
    /// Lexicographically smaller endpoint.
    pub start: Site,
    /// Lexicographically larger endpoint.
    pub end: Site,
}

impl LineSegment {
    /// Segment between `p` and `q`, in either order.
    #[must_use]
    pub fn new(p: Site, q: Site) -> Self {
        if p <= q {
            Self { start: p, end: q }
        } else {
            Self { start: q, end: p }
        }
    }
}

impl fmt::Display for LineSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} {}]", self.start, self.end)
    }
}

// =============================================================================
// VORONOI EDGES
// =============================================================================

/// One edge of a Voronoi diagram, dual to the Delaunay edge between `sites`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoronoiEdge {
    /// Edge between the circumcenters of two Delaunay triangles.
    Bounded {
        /// The two sites the edge separates, in ascending order.
        sites: [Site; 2],
        /// Circumcenter of one adjacent triangle.
        from: RationalPoint,
        /// Circumcenter of the other adjacent triangle.
        to: RationalPoint,
    },
    /// Unbounded edge dual to a hull edge of the sites.
    Ray {
        /// The two sites the edge separates, in ascending order.
        sites: [Site; 2],
        /// Circumcenter of the only adjacent triangle.
        origin: RationalPoint,
        /// Direction away from the triangle, perpendicular to the hull edge.
        direction: (i64, i64),
    },
}

impl VoronoiEdge {
    /// The two sites the edge separates.
    #[must_use]
    pub const fn sites(&self) -> [Site; 2] {
        match self {
            Self::Bounded { sites, .. } | Self::Ray { sites, .. } => *sites,
        }
    }

    /// Whether the edge is unbounded.
    #[must_use]
    pub const fn is_ray(&self) -> bool {
        matches!(self, Self::Ray { .. })
    }

    /// Rounded world-space segment; rays are cut at `ray_length` from their
    /// origin.
    #[must_use]
    pub fn to_segment(&self, ray_length: f64) -> (Site, Site) {
        match self {
            Self::Bounded { from, to, .. } => (from.round(), to.round()),
            Self::Ray {
                origin, direction, ..
            } => {
                let (ox, oy) = origin.to_f64();
                let (dx, dy) = (to_f64(direction.0), to_f64(direction.1));
                let scale = ray_length / dx.hypot(dy);
                (
                    origin.round(),
                    Site::new(round_to_i64(dx.mul_add(scale, ox)), round_to_i64(dy.mul_add(scale, oy))),
                )
            }
        }
    }
}

fn to_f64(value: i64) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

fn round_to_i64(value: f64) -> i64 {
    value
        .round()
        .to_i64()
        .unwrap_or(if value < 0.0 { i64::MIN } else { i64::MAX })
}

fn ordered_pair(p: Site, q: Site) -> [Site; 2] {
    if p <= q { [p, q] } else { [q, p] }
}

/// Rotate `tri` so that its smallest site comes first.
fn canonical_triangle(tri: [Site; 3]) -> [Site; 3] {
    let first = (0..3).min_by_key(|&i| tri[i]).unwrap_or(0);
    [tri[first], tri[(first + 1) % 3], tri[(first + 2) % 3]]
}

// =============================================================================
// VORONOI DIAGRAM
// =============================================================================

/// Voronoi diagram and Delaunay triangulation of a set of sites.
///
/// Edges and triangles are stored in a canonical order, so two diagrams of
/// the same sites compare equal whichever method built their hull.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoronoiDiagram {
    edges: Vec<VoronoiEdge>,
    triangles: Vec<[Site; 3]>,
    site_hull: Vec<Site>,
}

impl VoronoiDiagram {
    /// Derive the diagram from the hull of lifted sites.
    ///
    /// # Errors
    ///
    /// Returns [`HullError::TopologyIntegrity`] if the mesh references a dead
    /// entity or a lower face has no circumcenter.
    pub fn from_mesh(mesh: &Mesh) -> Result<Self, HullError> {
        let mut centers: FastHashMap<FaceKey, RationalPoint> =
            fast_hash_map_with_capacity(mesh.number_of_faces());
        let mut triangles = Vec::new();
        for f in mesh.face_keys() {
            if !mesh.is_lower_face(f)? {
                continue;
            }
            let [a, b, c] = mesh.face_points(f)?;
            let center = lifted_circumcenter(&a, &b, &c).ok_or_else(|| {
                HullError::topology(format!("lower face {a} {b} {c} has no circumcenter"))
            })?;
            centers.insert(f, center);
            // Lower faces project clockwise.
            triangles.push(canonical_triangle([a.xy(), c.xy(), b.xy()]));
        }
        triangles.sort_unstable();

        let mut edges = Vec::new();
        for (_, edge) in mesh.edges() {
            let (u, v) = edge.endpoints();
            let (pu, pv) = (mesh.point(u)?, mesh.point(v)?);
            let sites = ordered_pair(pu.xy(), pv.xy());
            match (centers.get(&edge.left()), centers.get(&edge.right())) {
                (Some(&from), Some(&to)) => edges.push(VoronoiEdge::Bounded { sites, from, to }),
                (Some(&origin), None) => {
                    let w = third_point(mesh, edge.left(), u, v)?;
                    edges.push(ray(sites, origin, &pu, &pv, &w));
                }
                (None, Some(&origin)) => {
                    let w = third_point(mesh, edge.right(), u, v)?;
                    edges.push(ray(sites, origin, &pu, &pv, &w));
                }
                (None, None) => {}
            }
        }
        edges.sort_unstable_by_key(VoronoiEdge::sites);

        let sites: Vec<Site> = mesh.vertices().map(|(_, v)| v.point().xy()).collect();
        let site_hull = convex_hull(&sites);

        tracing::debug!(
            "voronoi diagram: {} sites, {} triangles, {} edges",
            sites.len(),
            triangles.len(),
            edges.len()
        );
        Ok(Self {
            edges,
            triangles,
            site_hull,
        })
    }

    /// Derive the diagram from a finished hull.
    ///
    /// # Errors
    ///
    /// Same as [`VoronoiDiagram::from_mesh`].
    pub fn from_polyhedron(hull: &Polyhedron) -> Result<Self, HullError> {
        Self::from_mesh(hull.mesh())
    }

    /// Voronoi edges, ordered by the sites they separate.
    #[must_use]
    pub fn edges(&self) -> &[VoronoiEdge] {
        &self.edges
    }

    /// Delaunay triangles, counter-clockwise from their smallest site, in
    /// ascending order.
    #[must_use]
    pub fn delaunay_triangles(&self) -> &[[Site; 3]] {
        &self.triangles
    }

    /// Delaunay edges as ascending site pairs, in ascending order.
    #[must_use]
    pub fn delaunay_edges(&self) -> Vec<[Site; 2]> {
        self.edges.iter().map(VoronoiEdge::sites).collect()
    }

    /// Planar convex hull of the sites, counter-clockwise from the smallest.
    #[must_use]
    pub fn site_hull(&self) -> &[Site] {
        &self.site_hull
    }

    /// Voronoi edges as integer segments in device space.
    ///
    /// Each rounded world endpoint goes through `transform`. Rays are cut
    /// `ray_length` world units from their origin and left unclipped. The
    /// result is sorted, so repeated calls return identical lists.
    #[must_use]
    pub fn segments<F>(&self, ray_length: f64, mut transform: F) -> Vec<LineSegment>
    where
        F: FnMut(Site) -> Site,
    {
        let mut out: Vec<LineSegment> = self
            .edges
            .iter()
            .map(|edge| {
                let (p, q) = edge.to_segment(ray_length);
                LineSegment::new(transform(p), transform(q))
            })
            .collect();
        out.sort_unstable();
        out
    }

    /// Delaunay edges as integer segments in device space, sorted.
    #[must_use]
    pub fn delaunay_segments<F>(&self, mut transform: F) -> Vec<LineSegment>
    where
        F: FnMut(Site) -> Site,
    {
        let mut out: Vec<LineSegment> = self
            .edges
            .iter()
            .map(|edge| {
                let [p, q] = edge.sites();
                LineSegment::new(transform(p), transform(q))
            })
            .collect();
        out.sort_unstable();
        out
    }
}

fn third_point(mesh: &Mesh, f: FaceKey, u: VertexKey, v: VertexKey) -> Result<Point3, HullError> {
    let w = mesh
        .try_face(f)?
        .third_vertex(u, v)
        .ok_or_else(|| HullError::topology(format!("face {f:?} does not hold edge {u:?} {v:?}")))?;
    mesh.point(w)
}

/// Ray from `origin` perpendicular to `pu → pv`, on the side away from `w`.
fn ray(sites: [Site; 2], origin: RationalPoint, pu: &Point3, pv: &Point3, w: &Point3) -> VoronoiEdge {
    let (dx, dy) = (pv.x - pu.x, pv.y - pu.y);
    let (wx, wy) = (w.x - pu.x, w.y - pu.y);
    let toward_w = i128::from(-dy) * i128::from(wx) + i128::from(dx) * i128::from(wy) > 0;
    let direction = if toward_w { (dy, -dx) } else { (-dy, dx) };
    VoronoiEdge::Ray {
        sites,
        origin,
        direction,
    }
}

// =============================================================================
// TESTS
// =============================================================================
