//! Euler characteristic of a hull surface.
//!
//! A closed convex polyhedron is a triangulated 2-sphere, so its simplex counts
//! satisfy χ = V − E + F = 2. For a triangulation every face has three edges
//! and every edge two faces, which pins the counts down further:
//! `F = 2V − 4` and `E = 3V − 6`.
//!
//! # Examples
//!
//! ```rust
//! use voronoi_hull::core::algorithms::incremental::IncrementalHull;
//! use voronoi_hull::geometry::point::Point3;
//! use voronoi_hull::topology::characteristics::euler;
//!
//! let points = [
//!     Point3::new(0, 0, 0),
//!     Point3::new(1, 0, 0),
//!     Point3::new(0, 1, 0),
//!     Point3::new(0, 0, 1),
//! ];
//! let mesh = IncrementalHull::build(&points).unwrap();
//!
//! let counts = euler::count_simplices(&mesh);
//! assert_eq!(euler::euler_characteristic(&counts), 2);
//! ```

use crate::core::mesh::Mesh;
use crate::topology::characteristics::validation::MeshValidationError;

/// Counts of k-simplices of a surface, `f₀` (vertices) to `f₂` (faces).
///
/// In the topology literature this is commonly called the **f-vector**.
///
/// # Examples
///
/// ```rust
/// use voronoi_hull::topology::characteristics::euler::FVector;
///
/// let counts = FVector {
///     by_dim: vec![4, 6, 4],
/// };
/// assert_eq!(counts.count(1), 6);
/// assert_eq!(counts.count(3), 0);
/// assert_eq!(counts.dimension(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FVector {
    /// `by_dim[k]` = `f_k` = number of `k`-simplices
    pub by_dim: Vec<usize>,
}

impl FVector {
    /// Number of `k`-simplices; 0 if `k` is out of range.
    #[must_use]
    #[inline]
    pub fn count(&self, k: usize) -> usize {
        self.by_dim.get(k).copied().unwrap_or(0)
    }

    /// Highest simplex dimension recorded.
    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.by_dim.len().saturating_sub(1)
    }
}

/// Topological classification of a mesh surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopologyClassification {
    /// No faces.
    Empty,
    /// Closed 2-sphere, the shape of every finished hull.
    ClosedSphere,
    /// Anything else (disconnected shells, open surfaces).
    Unknown,
}

/// Count vertices, edges and faces.
#[must_use]
pub fn count_simplices(mesh: &Mesh) -> FVector {
    FVector {
        by_dim: vec![
            mesh.number_of_vertices(),
            mesh.number_of_edges(),
            mesh.number_of_faces(),
        ],
    }
}

/// Alternating sum χ = Σ(−1)^k · `f_k`.
///
/// # Examples
///
/// ```rust
/// use voronoi_hull::topology::characteristics::euler::{FVector, euler_characteristic};
///
/// // Octahedron: V=6, E=12, F=8
/// let counts = FVector {
///     by_dim: vec![6, 12, 8],
/// };
/// assert_eq!(euler_characteristic(&counts), 2);
/// ```
#[must_use]
#[allow(clippy::cast_possible_wrap)] // Simplex counts won't exceed isize::MAX in practice
pub fn euler_characteristic(counts: &FVector) -> isize {
    counts
        .by_dim
        .iter()
        .enumerate()
        .map(|(k, &f_k)| {
            let sign = if k % 2 == 0 { 1 } else { -1 };
            sign * (f_k as isize)
        })
        .sum()
}

/// Classify a mesh from its counts.
///
/// The counts alone cannot prove a sphere; a mesh is classified as one when
/// it satisfies the closed-triangulation identities `2E = 3F` and χ = 2.
#[must_use]
pub fn classify(counts: &FVector) -> TopologyClassification {
    let (edges, faces) = (counts.count(1), counts.count(2));
    if faces == 0 {
        TopologyClassification::Empty
    } else if 2 * edges == 3 * faces && euler_characteristic(counts) == 2 {
        TopologyClassification::ClosedSphere
    } else {
        TopologyClassification::Unknown
    }
}

/// Expected χ for a classification, if known.
#[must_use]
pub const fn expected_chi_for(classification: &TopologyClassification) -> Option<isize> {
    match classification {
        TopologyClassification::Empty => Some(0),
        TopologyClassification::ClosedSphere => Some(2),
        TopologyClassification::Unknown => None,
    }
}

/// Check `|F| = 2|V| − 4` and `|E| = 3|V| − 6`.
///
/// An empty mesh passes.
///
/// # Errors
///
/// Returns [`MeshValidationError::EulerMismatch`] with the actual counts.
pub fn validate_euler(mesh: &Mesh) -> Result<(), MeshValidationError> {
    let (v, e, f) = (
        mesh.number_of_vertices(),
        mesh.number_of_edges(),
        mesh.number_of_faces(),
    );
    if v == 0 && e == 0 && f == 0 {
        return Ok(());
    }
    if v < 4 || f != 2 * v - 4 || e != 3 * v - 6 {
        return Err(MeshValidationError::EulerMismatch {
            vertices: v,
            edges: e,
            faces: f,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::point::Point3;

    #[test]
    fn test_classification() {
        let tetra = FVector {
            by_dim: vec![4, 6, 4],
        };
        assert_eq!(classify(&tetra), TopologyClassification::ClosedSphere);
        assert_eq!(expected_chi_for(&classify(&tetra)), Some(2));

        let two_shells = FVector {
            by_dim: vec![8, 12, 8],
        };
        assert_eq!(euler_characteristic(&two_shells), 4);
        assert_eq!(classify(&two_shells), TopologyClassification::Unknown);

        let empty = FVector {
            by_dim: vec![0, 0, 0],
        };
        assert_eq!(classify(&empty), TopologyClassification::Empty);
    }

    #[test]
    fn test_validate_euler() {
        let mut mesh = Mesh::new();
        assert!(validate_euler(&mesh).is_ok());

        mesh.insert_vertex(Point3::new(0, 0, 0));
        assert_eq!(
            validate_euler(&mesh),
            Err(MeshValidationError::EulerMismatch {
                vertices: 1,
                edges: 0,
                faces: 0,
            })
        );
    }
}
