//! Directed mesh edges.
//!
//! Each undirected hull edge is stored once, as a directed [`Edge`] from
//! `origin` to `destination`. Seen from outside the solid, `left` is the face
//! on the left of that direction and `right` the face on the right, so
//! `left` lists `origin → destination` among its counter-clockwise vertices
//! and `right` lists `destination → origin`.
//!
//! The two successor pointers give the next edge counter-clockwise around
//! each endpoint. They are derived from the faces by
//! [`Mesh::link_edge`](crate::core::mesh::Mesh::link_edge):
//!
//! - around `origin`: the other edge of `left` incident to `origin`
//! - around `destination`: the other edge of `right` incident to `destination`

use crate::core::mesh::{EdgeKey, FaceKey, VertexKey};

/// A directed edge of the hull.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Edge {
    pub(crate) origin: VertexKey,
    pub(crate) destination: VertexKey,
    pub(crate) left: FaceKey,
    pub(crate) right: FaceKey,
    pub(crate) next_origin: EdgeKey,
    pub(crate) next_destination: EdgeKey,
}

impl Edge {
    /// Create an unlinked edge between two vertices.
    #[must_use]
    pub fn new(origin: VertexKey, destination: VertexKey) -> Self {
        Self {
            origin,
            destination,
            left: FaceKey::default(),
            right: FaceKey::default(),
            next_origin: EdgeKey::default(),
            next_destination: EdgeKey::default(),
        }
    }

    /// Start vertex.
    #[inline]
    #[must_use]
    pub const fn origin(&self) -> VertexKey {
        self.origin
    }

    /// End vertex.
    #[inline]
    #[must_use]
    pub const fn destination(&self) -> VertexKey {
        self.destination
    }

    /// Face on the left of `origin → destination`.
    #[inline]
    #[must_use]
    pub const fn left(&self) -> FaceKey {
        self.left
    }

    /// Face on the right of `origin → destination`.
    #[inline]
    #[must_use]
    pub const fn right(&self) -> FaceKey {
        self.right
    }

    /// Next edge counter-clockwise around `origin`.
    #[inline]
    #[must_use]
    pub const fn next_origin(&self) -> EdgeKey {
        self.next_origin
    }

    /// Next edge counter-clockwise around `destination`.
    #[inline]
    #[must_use]
    pub const fn next_destination(&self) -> EdgeKey {
        self.next_destination
    }

    /// Both endpoints, origin first.
    #[inline]
    #[must_use]
    pub const fn endpoints(&self) -> (VertexKey, VertexKey) {
        (self.origin, self.destination)
    }

    /// Whether `v` is one of the endpoints.
    #[inline]
    #[must_use]
    pub fn has_endpoint(&self, v: VertexKey) -> bool {
        self.origin == v || self.destination == v
    }

    /// The endpoint opposite `v`, or `None` when `v` is not an endpoint.
    #[must_use]
    pub fn other(&self, v: VertexKey) -> Option<VertexKey> {
        if self.origin == v {
            Some(self.destination)
        } else if self.destination == v {
            Some(self.origin)
        } else {
            None
        }
    }

    /// The face on the counter-clockwise side when rotating around `v`.
    #[must_use]
    pub fn ccw_face_at(&self, v: VertexKey) -> Option<FaceKey> {
        if self.origin == v {
            Some(self.left)
        } else if self.destination == v {
            Some(self.right)
        } else {
            None
        }
    }

    /// The face on the clockwise side when rotating around `v`.
    #[must_use]
    pub fn cw_face_at(&self, v: VertexKey) -> Option<FaceKey> {
        if self.origin == v {
            Some(self.right)
        } else if self.destination == v {
            Some(self.left)
        } else {
            None
        }
    }

    /// Next edge counter-clockwise around endpoint `v`.
    #[must_use]
    pub fn next_around(&self, v: VertexKey) -> Option<EdgeKey> {
        if self.origin == v {
            Some(self.next_origin)
        } else if self.destination == v {
            Some(self.next_destination)
        } else {
            None
        }
    }

    /// Undirected comparison: same endpoints in either direction.
    #[must_use]
    pub fn same_endpoints(&self, other: &Self) -> bool {
        (self.origin == other.origin && self.destination == other.destination)
            || (self.origin == other.destination && self.destination == other.origin)
    }

    /// Endpoint pair normalized for use as an undirected lookup key.
    #[must_use]
    pub fn undirected_key(&self) -> (VertexKey, VertexKey) {
        undirected(self.origin, self.destination)
    }
}

/// Normalize a vertex pair so that `(u, v)` and `(v, u)` map to one key.
#[inline]
#[must_use]
pub fn undirected(u: VertexKey, v: VertexKey) -> (VertexKey, VertexKey) {
    if u <= v { (u, v) } else { (v, u) }
}

// =============================================================================
// TESTS
// =============================================================================
