//! The doubly-connected edge list that both hull builders operate on.
//!
//! A [`Mesh`] owns three arenas (vertices, edges and faces) addressed by
//! `slotmap` keys, plus an undirected endpoint-pair index for constant-time
//! edge lookup. Entities reference each other only through keys, so removing
//! an entity never invalidates memory; a stale key simply fails to resolve,
//! and the validation routines report it.
//!
//! # Topological Invariants
//!
//! A finished hull satisfies:
//!
//! - **Referential integrity**: every key stored on a vertex, edge or face
//!   resolves to a live entity of the right kind.
//! - **Two faces per edge**: `left` contains `origin → destination` in its
//!   counter-clockwise order, `right` contains `destination → origin`.
//! - **Derived successors**: `next_origin` is the other edge of `left` at
//!   `origin`; `next_destination` is the other edge of `right` at
//!   `destination`. Following them from any edge cycles around the vertex.
//! - **Euler**: `|F| = 2|V| − 4` and `|E| = 3|V| − 6`.
//!
//! Face wiring happens in one place, [`Mesh::attach_face`], which finds or
//! creates the three boundary edges and assigns the new face to the correct
//! side of each. Builders attach all new faces first and then call
//! [`Mesh::link_edge`] on every edge whose faces changed.
//!
//! # Examples
//!
//! ```rust
//! use voronoi_hull::core::mesh::Mesh;
//! use voronoi_hull::geometry::point::Point3;
//!
//! let mut mesh = Mesh::new();
//! let a = mesh.insert_vertex(Point3::new(0, 0, 0));
//! let b = mesh.insert_vertex(Point3::new(1, 0, 0));
//! let c = mesh.insert_vertex(Point3::new(0, 1, 0));
//! let d = mesh.insert_vertex(Point3::new(0, 0, 1));
//!
//! for tri in [[a, c, b], [a, b, d], [b, c, d], [a, d, c]] {
//!     mesh.attach_face(tri).unwrap();
//! }
//! mesh.relink_all().unwrap();
//!
//! assert_eq!(mesh.number_of_edges(), 6);
//! assert!(mesh.is_valid().is_ok());
//! ```

use std::fmt;

use slotmap::{Key, new_key_type};
use thiserror::Error;

use crate::core::collections::{EdgeIndex, KeyRemap, StorageMap, fast_hash_map_with_capacity};
use crate::core::edge::{Edge, undirected};
use crate::core::face::Face;
use crate::core::vertex::Vertex;
use crate::geometry::point::Point3;
use crate::topology::characteristics::validation::MeshValidationError;

/// Minimum number of input points for a closed hull.
pub const MIN_HULL_POINTS: usize = 4;

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors raised while building or checking a hull.
///
/// [`HullError::is_recoverable`] separates the bounded-search failures of the
/// divide-and-conquer merge, which the facade answers by rebuilding
/// incrementally, from everything else.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum HullError {
    /// Fewer than [`MIN_HULL_POINTS`] inputs.
    #[error("Insufficient points: found {found}, need at least {required}")]
    InsufficientPoints {
        /// Number of points supplied.
        found: usize,
        /// Number of points required.
        required: usize,
    },

    /// The same coordinates appear more than once.
    #[error("Duplicate point: {message}")]
    DuplicatePoint {
        /// Description of the repeated coordinates.
        message: String,
    },

    /// A coordinate exceeds the exact-arithmetic bound.
    #[error("Coordinate out of range: {message}")]
    CoordinateOutOfRange {
        /// Description of the offending coordinate.
        message: String,
    },

    /// Divide-and-conquer input was not strictly increasing in `(x, y)`.
    #[error("Input order violated: {message}")]
    InputOrder {
        /// Description of the first out-of-order pair.
        message: String,
    },

    /// No four points span a tetrahedron.
    #[error("Degenerate input: {message}")]
    DegenerateInput {
        /// Description of the degeneracy.
        message: String,
    },

    /// The merge walk failed to close around both hulls.
    #[error("Bridge walk did not close: {message}")]
    BridgeLoop {
        /// Description of where the walk stopped.
        message: String,
    },

    /// The candidate scan around a bridge endpoint found no unique winner.
    #[error("No winning candidate: {message}")]
    NoWinningCandidate {
        /// Description of the failed scan.
        message: String,
    },

    /// An internal mesh invariant was violated.
    #[error("Topology integrity violated: {message}")]
    TopologyIntegrity {
        /// Description of the violated invariant.
        message: String,
    },

    /// A validation pass over a finished mesh failed.
    #[error("Mesh validation failed: {0}")]
    Validation(#[from] MeshValidationError),
}

impl HullError {
    /// Whether the facade may answer this error by rebuilding incrementally.
    ///
    /// `DegenerateInput` is listed because a divide-and-conquer subproblem can
    /// be coplanar even when the whole input is not.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::BridgeLoop { .. } | Self::NoWinningCandidate { .. } | Self::DegenerateInput { .. }
        )
    }

    pub(crate) fn topology(message: impl Into<String>) -> Self {
        Self::TopologyIntegrity {
            message: message.into(),
        }
    }
}

// =============================================================================
// KEYS
// =============================================================================

new_key_type! {
    /// Key of a vertex in a [`Mesh`].
    pub struct VertexKey;
}

new_key_type! {
    /// Key of a directed edge in a [`Mesh`].
    pub struct EdgeKey;
}

new_key_type! {
    /// Key of a triangular face in a [`Mesh`].
    pub struct FaceKey;
}

// =============================================================================
// MESH
// =============================================================================

/// A closed triangulated polyhedron stored as a doubly-connected edge list.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    vertices: StorageMap<VertexKey, Vertex>,
    edges: StorageMap<EdgeKey, Edge>,
    faces: StorageMap<FaceKey, Face>,
    edge_index: EdgeIndex,
}

impl Mesh {
    /// Create an empty mesh.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty mesh sized for a hull over `n_points` points.
    #[must_use]
    pub fn with_capacity(n_points: usize) -> Self {
        let edges = 3 * n_points;
        Self {
            vertices: StorageMap::with_capacity_and_key(n_points),
            edges: StorageMap::with_capacity_and_key(edges),
            faces: StorageMap::with_capacity_and_key(2 * n_points),
            edge_index: fast_hash_map_with_capacity(edges),
        }
    }

    // -------------------------------------------------------------------------
    // Counts and access
    // -------------------------------------------------------------------------

    /// Number of vertices.
    #[must_use]
    pub fn number_of_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Number of edges.
    #[must_use]
    pub fn number_of_edges(&self) -> usize {
        self.edges.len()
    }

    /// Number of faces.
    #[must_use]
    pub fn number_of_faces(&self) -> usize {
        self.faces.len()
    }

    /// Whether the mesh has no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Iterate over vertices with their keys.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexKey, &Vertex)> {
        self.vertices.iter()
    }

    /// Iterate over edges with their keys.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeKey, &Edge)> {
        self.edges.iter()
    }

    /// Iterate over faces with their keys.
    pub fn faces(&self) -> impl Iterator<Item = (FaceKey, &Face)> {
        self.faces.iter()
    }

    /// Vertex keys in arena order.
    pub fn vertex_keys(&self) -> impl Iterator<Item = VertexKey> + '_ {
        self.vertices.keys()
    }

    /// Edge keys in arena order.
    pub fn edge_keys(&self) -> impl Iterator<Item = EdgeKey> + '_ {
        self.edges.keys()
    }

    /// Face keys in arena order.
    pub fn face_keys(&self) -> impl Iterator<Item = FaceKey> + '_ {
        self.faces.keys()
    }

    /// Look up a vertex.
    #[must_use]
    pub fn vertex(&self, key: VertexKey) -> Option<&Vertex> {
        self.vertices.get(key)
    }

    /// Look up an edge.
    #[must_use]
    pub fn edge(&self, key: EdgeKey) -> Option<&Edge> {
        self.edges.get(key)
    }

    /// Look up a face.
    #[must_use]
    pub fn face(&self, key: FaceKey) -> Option<&Face> {
        self.faces.get(key)
    }

    /// Whether `key` names a live vertex.
    #[must_use]
    pub fn contains_vertex(&self, key: VertexKey) -> bool {
        self.vertices.contains_key(key)
    }

    /// Whether `key` names a live edge.
    #[must_use]
    pub fn contains_edge(&self, key: EdgeKey) -> bool {
        self.edges.contains_key(key)
    }

    /// Whether `key` names a live face.
    #[must_use]
    pub fn contains_face(&self, key: FaceKey) -> bool {
        self.faces.contains_key(key)
    }

    /// Look up a vertex, reporting a dangling key as a topology error.
    ///
    /// # Errors
    ///
    /// Returns [`HullError::TopologyIntegrity`] if `key` is not live.
    pub fn try_vertex(&self, key: VertexKey) -> Result<&Vertex, HullError> {
        self.vertices
            .get(key)
            .ok_or_else(|| HullError::topology(format!("dangling vertex key {key:?}")))
    }

    /// Look up an edge, reporting a dangling key as a topology error.
    ///
    /// # Errors
    ///
    /// Returns [`HullError::TopologyIntegrity`] if `key` is not live.
    pub fn try_edge(&self, key: EdgeKey) -> Result<&Edge, HullError> {
        self.edges
            .get(key)
            .ok_or_else(|| HullError::topology(format!("dangling edge key {key:?}")))
    }

    /// Look up a face, reporting a dangling key as a topology error.
    ///
    /// # Errors
    ///
    /// Returns [`HullError::TopologyIntegrity`] if `key` is not live.
    pub fn try_face(&self, key: FaceKey) -> Result<&Face, HullError> {
        self.faces
            .get(key)
            .ok_or_else(|| HullError::topology(format!("dangling face key {key:?}")))
    }

    /// Position of a vertex.
    ///
    /// # Errors
    ///
    /// Returns [`HullError::TopologyIntegrity`] if `key` is not live.
    pub fn point(&self, key: VertexKey) -> Result<Point3, HullError> {
        self.try_vertex(key).map(Vertex::point)
    }

    /// Corner positions of a face in counter-clockwise order.
    ///
    /// # Errors
    ///
    /// Returns [`HullError::TopologyIntegrity`] if the face or one of its
    /// vertices is not live.
    pub fn face_points(&self, key: FaceKey) -> Result<[Point3; 3], HullError> {
        let [a, b, c] = self.try_face(key)?.vertices;
        Ok([self.point(a)?, self.point(b)?, self.point(c)?])
    }

    /// The edge joining `u` and `v` in either direction.
    #[must_use]
    pub fn find_edge(&self, u: VertexKey, v: VertexKey) -> Option<EdgeKey> {
        self.edge_index.get(&undirected(u, v)).copied()
    }

    /// The edge joining `u` and `v`, which must exist.
    ///
    /// # Errors
    ///
    /// Returns [`HullError::TopologyIntegrity`] if no such edge is indexed.
    pub fn require_edge(&self, u: VertexKey, v: VertexKey) -> Result<EdgeKey, HullError> {
        self.find_edge(u, v)
            .ok_or_else(|| HullError::topology(format!("no edge between {u:?} and {v:?}")))
    }

    pub(crate) fn edge_index_len(&self) -> usize {
        self.edge_index.len()
    }

    // -------------------------------------------------------------------------
    // Insertion and removal
    // -------------------------------------------------------------------------

    /// Add an isolated vertex.
    pub fn insert_vertex(&mut self, point: Point3) -> VertexKey {
        self.vertices.insert(Vertex::new(point))
    }

    /// Add an unlinked edge `u → v` and index it.
    ///
    /// # Errors
    ///
    /// Returns [`HullError::TopologyIntegrity`] if the endpoints coincide, are
    /// not live, or are already joined.
    pub fn insert_edge(&mut self, u: VertexKey, v: VertexKey) -> Result<EdgeKey, HullError> {
        if u == v {
            return Err(HullError::topology(format!("edge from {u:?} to itself")));
        }
        self.try_vertex(u)?;
        self.try_vertex(v)?;
        if self.find_edge(u, v).is_some() {
            return Err(HullError::topology(format!(
                "edge between {u:?} and {v:?} already exists"
            )));
        }
        let e = self.edges.insert(Edge::new(u, v));
        self.edge_index.insert(undirected(u, v), e);
        Ok(e)
    }

    /// Remove a vertex. Edges and faces referencing it are left untouched.
    pub fn remove_vertex(&mut self, key: VertexKey) -> Option<Vertex> {
        self.vertices.remove(key)
    }

    /// Remove an edge and drop it from the endpoint index.
    pub fn remove_edge(&mut self, key: EdgeKey) -> Option<Edge> {
        let edge = self.edges.remove(key)?;
        let pair = edge.undirected_key();
        if self.edge_index.get(&pair) == Some(&key) {
            self.edge_index.remove(&pair);
        }
        Some(edge)
    }

    /// Remove a face. Edges referencing it are left untouched.
    pub fn remove_face(&mut self, key: FaceKey) -> Option<Face> {
        self.faces.remove(key)
    }

    /// Set the traversal seed of a vertex.
    ///
    /// # Errors
    ///
    /// Returns [`HullError::TopologyIntegrity`] if either key is not live or
    /// the edge is not incident to the vertex.
    pub fn set_vertex_edge(&mut self, v: VertexKey, e: EdgeKey) -> Result<(), HullError> {
        if !self.try_edge(e)?.has_endpoint(v) {
            return Err(HullError::topology(format!(
                "edge {e:?} is not incident to vertex {v:?}"
            )));
        }
        self.vertices
            .get_mut(v)
            .ok_or_else(|| HullError::topology(format!("dangling vertex key {v:?}")))?
            .edge = e;
        Ok(())
    }

    /// Add the face `tri` and wire it to its three boundary edges.
    ///
    /// `tri` must be counter-clockwise as seen from outside. Each boundary edge
    /// is found through the index or created. The face is stored as the edge's
    /// `left` when the edge runs in the same direction as the face boundary and
    /// as its `right` otherwise. A vertex whose traversal seed is unset or
    /// points at a removed edge is reseeded with one of the face's edges.
    ///
    /// Successor pointers are not touched; call [`Mesh::link_edge`] once all
    /// faces around the affected edges are in place.
    ///
    /// # Errors
    ///
    /// Returns [`HullError::TopologyIntegrity`] if a corner is repeated or not
    /// live, or if the side of an edge this face needs is still occupied by a
    /// live face.
    pub fn attach_face(&mut self, tri: [VertexKey; 3]) -> Result<FaceKey, HullError> {
        let [a, b, c] = tri;
        if a == b || b == c || c == a {
            return Err(HullError::topology(format!("degenerate face {tri:?}")));
        }
        for v in tri {
            self.try_vertex(v)?;
        }

        let f = self.faces.insert(Face::new(tri));
        let mut boundary = [EdgeKey::null(); 3];
        for (i, (u, v)) in [(a, b), (b, c), (c, a)].into_iter().enumerate() {
            let e = match self.find_edge(u, v) {
                Some(e) => e,
                None => self.insert_edge(u, v)?,
            };
            let edge = self.try_edge(e)?;
            let forward = edge.origin == u;
            let occupant = if forward { edge.left } else { edge.right };
            if self.faces.contains_key(occupant) && occupant != f {
                return Err(HullError::topology(format!(
                    "edge {u:?}-{v:?} already has live face {occupant:?} on that side"
                )));
            }
            let edge = self
                .edges
                .get_mut(e)
                .ok_or_else(|| HullError::topology(format!("dangling edge key {e:?}")))?;
            if forward {
                edge.left = f;
            } else {
                edge.right = f;
            }
            boundary[i] = e;
        }

        if let Some(face) = self.faces.get_mut(f) {
            face.edge = boundary[0];
        }
        for (v, e) in [(a, boundary[0]), (b, boundary[1]), (c, boundary[2])] {
            let seed = self.try_vertex(v)?.edge;
            if !self.edges.contains_key(seed)
                && let Some(vertex) = self.vertices.get_mut(v)
            {
                vertex.edge = e;
            }
        }
        Ok(f)
    }

    /// The edge of face `f` at corner `v` other than `e`.
    ///
    /// # Errors
    ///
    /// Returns [`HullError::TopologyIntegrity`] if `v` is not a corner of `f`,
    /// `e` is not a boundary edge of `f` at `v`, or the other edge is missing.
    pub fn other_edge_at(&self, f: FaceKey, e: EdgeKey, v: VertexKey) -> Result<EdgeKey, HullError> {
        let face = self.try_face(f)?;
        let w = self.try_edge(e)?.other(v).ok_or_else(|| {
            HullError::topology(format!("edge {e:?} is not incident to vertex {v:?}"))
        })?;
        let t = face.third_vertex(v, w).ok_or_else(|| {
            HullError::topology(format!("face {f:?} does not contain edge {v:?}-{w:?}"))
        })?;
        self.require_edge(v, t)
    }

    /// Recompute both successor pointers of `e` from its faces.
    ///
    /// # Errors
    ///
    /// Returns [`HullError::TopologyIntegrity`] if a face of `e` is not live
    /// or does not contain `e`.
    pub fn link_edge(&mut self, e: EdgeKey) -> Result<(), HullError> {
        let edge = *self.try_edge(e)?;
        let next_origin = self.other_edge_at(edge.left, e, edge.origin)?;
        let next_destination = self.other_edge_at(edge.right, e, edge.destination)?;
        if let Some(edge) = self.edges.get_mut(e) {
            edge.next_origin = next_origin;
            edge.next_destination = next_destination;
        }
        Ok(())
    }

    /// [`Mesh::link_edge`] for every key in `edges`.
    ///
    /// # Errors
    ///
    /// Propagates the first linking failure.
    pub fn relink<I>(&mut self, edges: I) -> Result<(), HullError>
    where
        I: IntoIterator<Item = EdgeKey>,
    {
        edges.into_iter().try_for_each(|e| self.link_edge(e))
    }

    /// [`Mesh::link_edge`] for every edge in the mesh.
    ///
    /// # Errors
    ///
    /// Propagates the first linking failure.
    pub fn relink_all(&mut self) -> Result<(), HullError> {
        let keys: Vec<EdgeKey> = self.edges.keys().collect();
        self.relink(keys)
    }

    /// Move every entity of `other` into `self`.
    ///
    /// Keys are reissued by `self`'s arenas and every reference is translated.
    /// References from `other` that no longer resolve inside `other` become
    /// null keys, to be rewired by the caller. Returns the vertex translation
    /// table.
    ///
    /// # Errors
    ///
    /// Returns [`HullError::TopologyIntegrity`] if an edge of `other` names a
    /// vertex `other` does not contain.
    pub fn absorb(&mut self, other: Self) -> Result<KeyRemap<VertexKey>, HullError> {
        let Self {
            vertices,
            edges,
            faces,
            ..
        } = other;

        let mut vmap: KeyRemap<VertexKey> = fast_hash_map_with_capacity(vertices.len());
        let mut seeds = Vec::with_capacity(vertices.len());
        for (old, vertex) in vertices {
            let new = self.vertices.insert(Vertex::new(vertex.point()));
            vmap.insert(old, new);
            seeds.push((new, vertex.edge));
        }

        let map_vertex = |vmap: &KeyRemap<VertexKey>, v: VertexKey| {
            vmap.get(&v).copied().ok_or_else(|| {
                HullError::topology(format!("absorbed mesh references missing vertex {v:?}"))
            })
        };

        let mut fmap: KeyRemap<FaceKey> = fast_hash_map_with_capacity(faces.len());
        let mut face_seeds = Vec::with_capacity(faces.len());
        for (old, face) in faces {
            let [a, b, c] = face.vertices;
            let new = self.faces.insert(Face::new([
                map_vertex(&vmap, a)?,
                map_vertex(&vmap, b)?,
                map_vertex(&vmap, c)?,
            ]));
            fmap.insert(old, new);
            face_seeds.push((new, face.edge));
        }

        let mut emap: KeyRemap<EdgeKey> = fast_hash_map_with_capacity(edges.len());
        let mut pending = Vec::with_capacity(edges.len());
        for (old, edge) in edges {
            let origin = map_vertex(&vmap, edge.origin)?;
            let destination = map_vertex(&vmap, edge.destination)?;
            let mut copy = Edge::new(origin, destination);
            copy.left = fmap.get(&edge.left).copied().unwrap_or_default();
            copy.right = fmap.get(&edge.right).copied().unwrap_or_default();
            let new = self.edges.insert(copy);
            self.edge_index.insert(undirected(origin, destination), new);
            emap.insert(old, new);
            pending.push((new, edge.next_origin, edge.next_destination));
        }

        let map_edge = |e: EdgeKey| emap.get(&e).copied().unwrap_or_default();
        for (new, next_origin, next_destination) in pending {
            if let Some(edge) = self.edges.get_mut(new) {
                edge.next_origin = map_edge(next_origin);
                edge.next_destination = map_edge(next_destination);
            }
        }
        for (new, seed) in face_seeds {
            if let Some(face) = self.faces.get_mut(new) {
                face.edge = map_edge(seed);
            }
        }
        for (new, seed) in seeds {
            if let Some(vertex) = self.vertices.get_mut(new) {
                vertex.edge = map_edge(seed);
            }
        }
        Ok(vmap)
    }

    /// Human-readable listing of every entity and its references.
    ///
    /// Intended for offline debugging; the format is not stable.
    #[must_use]
    pub const fn dump(&self) -> MeshDump<'_> {
        MeshDump { mesh: self }
    }
}

// =============================================================================
// DIAGNOSTIC DUMP
// =============================================================================

/// Display adapter returned by [`Mesh::dump`].
#[derive(Debug, Clone, Copy)]
pub struct MeshDump<'a> {
    mesh: &'a Mesh,
}

impl fmt::Display for MeshDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mesh = self.mesh;
        writeln!(
            f,
            "mesh: {} vertices, {} edges, {} faces",
            mesh.number_of_vertices(),
            mesh.number_of_edges(),
            mesh.number_of_faces()
        )?;
        for (k, v) in mesh.vertices() {
            writeln!(f, "  vertex {k:?} at {} seed {:?}", v.point(), v.edge())?;
        }
        for (k, e) in mesh.edges() {
            writeln!(
                f,
                "  edge {k:?}: {:?} -> {:?} left {:?} right {:?} next@origin {:?} next@dest {:?}",
                e.origin, e.destination, e.left, e.right, e.next_origin, e.next_destination
            )?;
        }
        for (k, face) in mesh.faces() {
            writeln!(f, "  face {k:?}: {:?} seed {:?}", face.vertices, face.edge)?;
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
