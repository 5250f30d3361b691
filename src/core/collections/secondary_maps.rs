use crate::core::mesh::{EdgeKey, FaceKey, VertexKey};
use slotmap::SparseSecondaryMap;

// =============================================================================
// SLOTMAP SECONDARY MAPS FOR AUXILIARY DATA
// =============================================================================

/// Sparse secondary map associating per-pass scratch data with vertices.
///
/// Builders keep their transient flags (cone-base registrations, merge colors)
/// here instead of on the entities, so the state dies with the pass.
///
/// # Examples
///
/// ```rust
/// use voronoi_hull::core::collections::VertexSecondaryMap;
/// use voronoi_hull::core::mesh::Mesh;
/// use voronoi_hull::geometry::point::Point3;
///
/// let mut mesh = Mesh::new();
/// let v = mesh.insert_vertex(Point3::new(1, 2, 3));
/// let mut order: VertexSecondaryMap<usize> = VertexSecondaryMap::new();
/// order.insert(v, 0);
/// assert_eq!(order.get(v), Some(&0));
/// ```
pub type VertexSecondaryMap<V> = SparseSecondaryMap<VertexKey, V>;

/// Sparse secondary map associating per-pass scratch data with edges.
pub type EdgeSecondaryMap<V> = SparseSecondaryMap<EdgeKey, V>;

/// Sparse secondary map associating per-pass scratch data with faces.
pub type FaceSecondaryMap<V> = SparseSecondaryMap<FaceKey, V>;
