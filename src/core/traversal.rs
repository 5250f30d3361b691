//! Topological navigation over a [`Mesh`].
//!
//! Rotation around a vertex follows the successor pointers counter-clockwise
//! and the face structure clockwise. Every walk is bounded by the edge count
//! of the mesh, so a corrupted ring is reported as
//! [`HullError::TopologyIntegrity`] instead of looping forever.
//!
//! # Examples
//!
//! ```rust
//! use voronoi_hull::core::algorithms::incremental::IncrementalHull;
//! use voronoi_hull::core::traversal::Rotation;
//! use voronoi_hull::geometry::point::Point3;
//!
//! let points = [
//!     Point3::new(0, 0, 0),
//!     Point3::new(4, 0, 0),
//!     Point3::new(0, 4, 0),
//!     Point3::new(0, 0, 4),
//! ];
//! let mesh = IncrementalHull::build(&points).unwrap();
//! let (v, _) = mesh.vertices().next().unwrap();
//! let fan = mesh.edges_around_vertex(v, Rotation::Ccw).unwrap();
//! assert_eq!(fan.len(), 3);
//! ```

use crate::core::collections::{SmallBuffer, TYPICAL_VERTEX_DEGREE, VertexSecondaryMap};
use crate::core::mesh::{EdgeKey, FaceKey, HullError, Mesh, VertexKey};
use crate::geometry::point::Point3;
use crate::geometry::predicates::area2_xy;

/// Edges incident to one vertex, in rotation order.
pub type EdgeFan = SmallBuffer<EdgeKey, TYPICAL_VERTEX_DEGREE>;

/// Direction of rotation around a vertex, seen from outside the solid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    /// Counter-clockwise.
    Ccw,
    /// Clockwise.
    Cw,
}

impl Mesh {
    /// The edge after `e` counter-clockwise around its endpoint `v`.
    ///
    /// # Errors
    ///
    /// Returns [`HullError::TopologyIntegrity`] if `e` is not live or not
    /// incident to `v`.
    pub fn next_ccw_around(&self, e: EdgeKey, v: VertexKey) -> Result<EdgeKey, HullError> {
        self.try_edge(e)?.next_around(v).ok_or_else(|| {
            HullError::topology(format!("edge {e:?} is not incident to vertex {v:?}"))
        })
    }

    /// The edge after `e` clockwise around its endpoint `v`.
    ///
    /// This is the other edge at `v` of the face on the clockwise side of `e`.
    ///
    /// # Errors
    ///
    /// Returns [`HullError::TopologyIntegrity`] if `e` is not live, not
    /// incident to `v`, or its clockwise face is inconsistent.
    pub fn next_cw_around(&self, e: EdgeKey, v: VertexKey) -> Result<EdgeKey, HullError> {
        let face = self.try_edge(e)?.cw_face_at(v).ok_or_else(|| {
            HullError::topology(format!("edge {e:?} is not incident to vertex {v:?}"))
        })?;
        self.other_edge_at(face, e, v)
    }

    /// All edges incident to `v`, starting from its traversal seed.
    ///
    /// # Errors
    ///
    /// Returns [`HullError::TopologyIntegrity`] if the vertex is not live or
    /// its ring does not close within the number of edges in the mesh.
    pub fn edges_around_vertex(
        &self,
        v: VertexKey,
        rotation: Rotation,
    ) -> Result<EdgeFan, HullError> {
        let start = self.try_vertex(v)?.edge();
        self.try_edge(start)?;
        let limit = self.number_of_edges();
        let mut fan = EdgeFan::new();
        let mut current = start;
        loop {
            fan.push(current);
            current = match rotation {
                Rotation::Ccw => self.next_ccw_around(current, v)?,
                Rotation::Cw => self.next_cw_around(current, v)?,
            };
            if current == start {
                return Ok(fan);
            }
            if fan.len() > limit {
                return Err(HullError::topology(format!(
                    "edge ring around vertex {v:?} does not close after {limit} steps"
                )));
            }
        }
    }

    /// Neighbors of `v` in rotation order.
    ///
    /// # Errors
    ///
    /// Same as [`Mesh::edges_around_vertex`].
    pub fn neighbors(
        &self,
        v: VertexKey,
        rotation: Rotation,
    ) -> Result<SmallBuffer<VertexKey, TYPICAL_VERTEX_DEGREE>, HullError> {
        self.edges_around_vertex(v, rotation)?
            .into_iter()
            .map(|e| {
                self.try_edge(e)?.other(v).ok_or_else(|| {
                    HullError::topology(format!("edge {e:?} left the ring of {v:?}"))
                })
            })
            .collect()
    }

    /// Faces around `v`, counter-clockwise.
    ///
    /// # Errors
    ///
    /// Same as [`Mesh::edges_around_vertex`].
    pub fn faces_around_vertex(
        &self,
        v: VertexKey,
    ) -> Result<SmallBuffer<FaceKey, TYPICAL_VERTEX_DEGREE>, HullError> {
        self.edges_around_vertex(v, Rotation::Ccw)?
            .into_iter()
            .map(|e| {
                self.try_edge(e)?.ccw_face_at(v).ok_or_else(|| {
                    HullError::topology(format!("edge {e:?} left the ring of {v:?}"))
                })
            })
            .collect()
    }

    /// The three boundary edges of `f`, in the order of its vertices:
    /// `v0-v1`, `v1-v2`, `v2-v0`.
    ///
    /// # Errors
    ///
    /// Returns [`HullError::TopologyIntegrity`] if the face is not live or a
    /// boundary edge is missing.
    pub fn face_edges(&self, f: FaceKey) -> Result<[EdgeKey; 3], HullError> {
        let [a, b, c] = self.try_face(f)?.vertices();
        Ok([
            self.require_edge(a, b)?,
            self.require_edge(b, c)?,
            self.require_edge(c, a)?,
        ])
    }

    /// The faces across each boundary edge of `f`, in [`Mesh::face_edges`] order.
    ///
    /// # Errors
    ///
    /// Returns [`HullError::TopologyIntegrity`] if the face is not live or an
    /// edge does not list `f` on either side.
    pub fn face_neighbors(&self, f: FaceKey) -> Result<[FaceKey; 3], HullError> {
        let edges = self.face_edges(f)?;
        let mut out = [FaceKey::default(); 3];
        for (slot, e) in out.iter_mut().zip(edges) {
            let edge = self.try_edge(e)?;
            *slot = if edge.left() == f {
                edge.right()
            } else if edge.right() == f {
                edge.left()
            } else {
                return Err(HullError::topology(format!(
                    "edge {e:?} does not border face {f:?}"
                )));
            };
        }
        Ok(out)
    }

    /// Whether `f` belongs to the lower hull: its outward normal points down,
    /// which shows as a clockwise projection onto the xy-plane.
    ///
    /// # Errors
    ///
    /// Returns [`HullError::TopologyIntegrity`] if the face is not live.
    pub fn is_lower_face(&self, f: FaceKey) -> Result<bool, HullError> {
        let [a, b, c] = self.face_points(f)?;
        Ok(area2_xy(&a, &b, &c) < 0)
    }

    /// Edges on the boundary of the mesh's shadow on the xy-plane: exactly
    /// one of their two faces is a lower face.
    ///
    /// # Errors
    ///
    /// Returns [`HullError::TopologyIntegrity`] if an edge names a dead face.
    pub fn silhouette_edges(&self) -> Result<Vec<EdgeKey>, HullError> {
        let mut out = Vec::new();
        for (key, edge) in self.edges() {
            if self.is_lower_face(edge.left())? != self.is_lower_face(edge.right())? {
                out.push(key);
            }
        }
        Ok(out)
    }

    /// The xy-shadow of the mesh as a counter-clockwise polygon, starting at
    /// the vertex with the lexicographically smallest projection.
    ///
    /// Chains the [`silhouette_edges`](Self::silhouette_edges): each one is
    /// traversed against the direction its lower face lists it, since lower
    /// faces project clockwise. Collinear boundary vertices are kept.
    ///
    /// # Errors
    ///
    /// Returns [`HullError::TopologyIntegrity`] if the silhouette is empty or
    /// does not form a single closed loop.
    pub fn shadow(&self) -> Result<Vec<VertexKey>, HullError> {
        let mut successor: VertexSecondaryMap<VertexKey> = VertexSecondaryMap::new();
        let mut silhouette_len = 0usize;
        for e in self.silhouette_edges()? {
            let edge = self.try_edge(e)?;
            let (from, to) = if self.is_lower_face(edge.left())? {
                (edge.destination(), edge.origin())
            } else {
                (edge.origin(), edge.destination())
            };
            if successor.insert(from, to).is_some() {
                return Err(HullError::topology(format!(
                    "vertex {from:?} leaves the shadow boundary twice"
                )));
            }
            silhouette_len += 1;
        }

        let mut start: Option<(VertexKey, Point3)> = None;
        for (v, _) in &successor {
            let p = self.point(v)?;
            if start.is_none_or(|(_, q)| p.xy() < q.xy()) {
                start = Some((v, p));
            }
        }
        let Some((start, _)) = start else {
            return Err(HullError::topology("mesh has no shadow boundary"));
        };

        let mut polygon = Vec::with_capacity(silhouette_len);
        let mut v = start;
        loop {
            polygon.push(v);
            v = successor.get(v).copied().ok_or_else(|| {
                HullError::topology(format!("shadow boundary breaks off at {v:?}"))
            })?;
            if v == start {
                break;
            }
            if polygon.len() >= silhouette_len {
                return Err(HullError::topology(
                    "shadow boundary does not close into one loop",
                ));
            }
        }
        if polygon.len() != silhouette_len {
            return Err(HullError::topology(format!(
                "shadow loop has {} of {silhouette_len} silhouette edges",
                polygon.len()
            )));
        }
        Ok(polygon)
    }
}

// =============================================================================
// TESTS
// =============================================================================
