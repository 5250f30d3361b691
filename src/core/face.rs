//! Triangular faces.
//!
//! A [`Face`] lists its three vertices counter-clockwise as seen from outside
//! the solid; the outward normal follows from that order by the right-hand
//! rule. It also keeps one of its edges as a traversal seed.

use crate::core::mesh::{EdgeKey, VertexKey};

/// A triangular face of the hull.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Face {
    pub(crate) vertices: [VertexKey; 3],
    pub(crate) edge: EdgeKey,
}

impl Face {
    /// Create a face with no edge reference yet.
    #[must_use]
    pub fn new(vertices: [VertexKey; 3]) -> Self {
        Self {
            vertices,
            edge: EdgeKey::default(),
        }
    }

    /// Vertices in counter-clockwise order seen from outside.
    #[inline]
    #[must_use]
    pub const fn vertices(&self) -> [VertexKey; 3] {
        self.vertices
    }

    /// One boundary edge.
    #[inline]
    #[must_use]
    pub const fn edge(&self) -> EdgeKey {
        self.edge
    }

    /// Position of `v` in the vertex list.
    #[must_use]
    pub fn position(&self, v: VertexKey) -> Option<usize> {
        self.vertices.iter().position(|&w| w == v)
    }

    /// Whether `v` is a corner of this face.
    #[inline]
    #[must_use]
    pub fn contains(&self, v: VertexKey) -> bool {
        self.vertices.contains(&v)
    }

    /// Counter-clockwise successor of `v`.
    #[must_use]
    pub fn next_vertex(&self, v: VertexKey) -> Option<VertexKey> {
        self.position(v).map(|i| self.vertices[(i + 1) % 3])
    }

    /// Counter-clockwise predecessor of `v`.
    #[must_use]
    pub fn prev_vertex(&self, v: VertexKey) -> Option<VertexKey> {
        self.position(v).map(|i| self.vertices[(i + 2) % 3])
    }

    /// Whether `u → v` appears among the counter-clockwise boundary steps.
    #[must_use]
    pub fn has_directed_edge(&self, u: VertexKey, v: VertexKey) -> bool {
        self.next_vertex(u) == Some(v)
    }

    /// The corner that is neither `u` nor `v`.
    #[must_use]
    pub fn third_vertex(&self, u: VertexKey, v: VertexKey) -> Option<VertexKey> {
        if !self.contains(u) || !self.contains(v) || u == v {
            return None;
        }
        self.vertices.iter().copied().find(|&w| w != u && w != v)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::{Key, SlotMap};

    #[test]
    fn test_cyclic_queries() {
        let mut sm: SlotMap<VertexKey, ()> = SlotMap::with_key();
        let (a, b, c, d) = (sm.insert(()), sm.insert(()), sm.insert(()), sm.insert(()));
        let f = Face::new([a, b, c]);

        assert_eq!(f.next_vertex(c), Some(a));
        assert_eq!(f.prev_vertex(a), Some(c));
        assert!(f.has_directed_edge(b, c));
        assert!(!f.has_directed_edge(c, b));
        assert_eq!(f.third_vertex(c, a), Some(b));
        assert_eq!(f.third_vertex(a, d), None);
        assert_eq!(f.position(d), None);
        assert!(f.edge().is_null());
    }
}
