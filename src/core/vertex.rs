//! Mesh vertices.
//!
//! A [`Vertex`] wraps a [`Point3`] and keeps one incident edge as the seed for
//! walking its edge fan. Builders keep any per-pass flags in side tables
//! keyed by [`VertexKey`](crate::core::mesh::VertexKey), never on the vertex.

use serde::{Deserialize, Serialize};

use crate::core::mesh::EdgeKey;
use crate::geometry::point::Point3;

// =============================================================================
// VERTEX STRUCT DEFINITION
// =============================================================================

/// A hull vertex.
///
/// # Properties
///
/// - **`point`**: the vertex position
/// - **`edge`**: one incident edge; after construction it always names a live
///   edge that has this vertex as an endpoint
///
/// # Examples
///
/// ```rust
/// use voronoi_hull::core::vertex::Vertex;
/// use voronoi_hull::geometry::point::Point3;
///
/// let v = Vertex::new(Point3::new(1, 2, 5));
/// assert_eq!(v.point(), Point3::new(1, 2, 5));
/// assert!(v.edge_is_unset());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vertex {
    point: Point3,
    /// Not serialized: edge keys are only meaningful inside the arena that
    /// issued them.
    #[serde(skip)]
    pub(crate) edge: EdgeKey,
}

impl Vertex {
    /// Create a vertex with no incident edge yet.
    #[inline]
    #[must_use]
    pub fn new(point: Point3) -> Self {
        Self {
            point,
            edge: EdgeKey::default(),
        }
    }

    /// Position of the vertex.
    #[inline]
    #[must_use]
    pub const fn point(&self) -> Point3 {
        self.point
    }

    /// The incident edge used as traversal seed.
    #[inline]
    #[must_use]
    pub const fn edge(&self) -> EdgeKey {
        self.edge
    }

    /// Whether the incident edge reference has never been assigned.
    #[inline]
    #[must_use]
    pub fn edge_is_unset(&self) -> bool {
        slotmap::Key::is_null(&self.edge)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_vertex_has_unset_edge() {
        let v = Vertex::new(Point3::default());
        assert!(v.edge_is_unset());
        assert_eq!(v.edge(), EdgeKey::default());
    }
}
