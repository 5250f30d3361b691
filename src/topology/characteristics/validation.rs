//! Structural validation of finished meshes.
//!
//! The checks run in increasing cost and each assumes the previous ones
//! passed:
//!
//! 1. [`validate_references`]: every stored key resolves and the faces on each
//!    side of an edge really contain it in the stated direction
//! 2. [`validate_rings`]: the successor pointers close around every vertex and
//!    visit each incident edge once
//! 3. [`validate_euler`]: the counts of a closed triangulated sphere
//! 4. [`validate_local_convexity`]: no edge is reflex
//! 5. [`validate_convexity`]: no vertex lies strictly outside any face
//!
//! [`Mesh::is_valid`] runs the first three. On a closed, consistently
//! oriented sphere the linear edge check (4) already implies global
//! convexity; the quadratic check (5) tests it directly.

use thiserror::Error;

use crate::core::collections::{FastHashMap, fast_hash_map_with_capacity};
use crate::core::mesh::{FaceKey, Mesh, VertexKey};
use crate::core::traversal::Rotation;
use crate::geometry::point::Point3;
use crate::geometry::predicates::is_visible;
use crate::topology::characteristics::euler::{
    FVector, TopologyClassification, classify, count_simplices, euler_characteristic,
    expected_chi_for,
};

pub use crate::topology::characteristics::euler::validate_euler;

/// Failures reported by the validation passes.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum MeshValidationError {
    /// A stored key does not resolve to a live entity.
    #[error("Dangling reference: {message}")]
    DanglingReference {
        /// Which entity holds the stale key.
        message: String,
    },

    /// An edge is inconsistent with its endpoints or faces.
    #[error("Invalid edge: {message}")]
    InvalidEdge {
        /// Description of the inconsistency.
        message: String,
    },

    /// The successor ring around a vertex does not close cleanly.
    #[error("Broken ring: {message}")]
    BrokenRing {
        /// Description of the broken ring.
        message: String,
    },

    /// The counts are not those of a closed triangulated sphere.
    #[error("Euler mismatch: V={vertices}, E={edges}, F={faces}")]
    EulerMismatch {
        /// Number of vertices.
        vertices: usize,
        /// Number of edges.
        edges: usize,
        /// Number of faces.
        faces: usize,
    },

    /// A vertex lies strictly outside a face.
    #[error("Not convex: {message}")]
    NotConvex {
        /// The face and the vertex that sees it.
        message: String,
    },
}

/// Result of an Euler characteristic check, with diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopologyCheckResult {
    /// Computed Euler characteristic.
    pub chi: isize,

    /// Expected χ based on classification (None if unknown).
    pub expected: Option<isize>,

    /// Topological classification.
    pub classification: TopologyClassification,

    /// Full simplex counts (f-vector).
    pub counts: FVector,

    /// Diagnostic notes or warnings.
    pub notes: Vec<String>,
}

impl TopologyCheckResult {
    /// Returns `true` if χ matches expectation, or the expectation is unknown.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.expected.is_none_or(|exp| self.chi == exp)
    }
}

/// Count, classify and compare χ against its expected value.
#[must_use]
pub fn check_topology(mesh: &Mesh) -> TopologyCheckResult {
    let counts = count_simplices(mesh);
    let chi = euler_characteristic(&counts);
    let classification = classify(&counts);
    let expected = expected_chi_for(&classification);

    let mut notes = Vec::new();
    if let Some(exp) = expected.filter(|&exp| chi != exp) {
        notes.push(format!(
            "Euler characteristic mismatch: computed {chi}, expected {exp}"
        ));
    }
    if classification == TopologyClassification::Unknown {
        notes.push(format!(
            "counts {:?} are not those of a closed triangulated sphere",
            counts.by_dim
        ));
    }

    TopologyCheckResult {
        chi,
        expected,
        classification,
        counts,
        notes,
    }
}

fn dangling(message: String) -> MeshValidationError {
    MeshValidationError::DanglingReference { message }
}

fn invalid_edge(message: String) -> MeshValidationError {
    MeshValidationError::InvalidEdge { message }
}

/// Check that every stored key resolves and every edge agrees with its faces.
///
/// # Errors
///
/// - [`MeshValidationError::DanglingReference`] for an unresolved key
/// - [`MeshValidationError::InvalidEdge`] for an edge whose endpoints, faces,
///   successors or index entry disagree
pub fn validate_references(mesh: &Mesh) -> Result<(), MeshValidationError> {
    for (v, vertex) in mesh.vertices() {
        let edge = mesh.edge(vertex.edge()).ok_or_else(|| {
            dangling(format!("vertex {v:?} seeds dead edge {:?}", vertex.edge()))
        })?;
        if !edge.has_endpoint(v) {
            return Err(invalid_edge(format!(
                "vertex {v:?} seeds edge {:?} which does not touch it",
                vertex.edge()
            )));
        }
    }

    for (e, edge) in mesh.edges() {
        let (origin, destination) = edge.endpoints();
        if origin == destination {
            return Err(invalid_edge(format!("edge {e:?} is a loop at {origin:?}")));
        }
        for v in [origin, destination] {
            if !mesh.contains_vertex(v) {
                return Err(dangling(format!("edge {e:?} names dead vertex {v:?}")));
            }
        }
        if mesh.find_edge(origin, destination) != Some(e) {
            return Err(invalid_edge(format!("edge {e:?} is missing from the index")));
        }

        let left = mesh
            .face(edge.left())
            .ok_or_else(|| dangling(format!("edge {e:?} has dead left face")))?;
        let right = mesh
            .face(edge.right())
            .ok_or_else(|| dangling(format!("edge {e:?} has dead right face")))?;
        if !left.has_directed_edge(origin, destination) {
            return Err(invalid_edge(format!(
                "left face {:?} of edge {e:?} does not run {origin:?} -> {destination:?}",
                edge.left()
            )));
        }
        if !right.has_directed_edge(destination, origin) {
            return Err(invalid_edge(format!(
                "right face {:?} of edge {e:?} does not run {destination:?} -> {origin:?}",
                edge.right()
            )));
        }

        for (next, v, side) in [
            (edge.next_origin(), origin, "origin"),
            (edge.next_destination(), destination, "destination"),
        ] {
            let successor = mesh
                .edge(next)
                .ok_or_else(|| dangling(format!("edge {e:?} has dead successor at {side}")))?;
            if next == e || !successor.has_endpoint(v) {
                return Err(invalid_edge(format!(
                    "successor {next:?} of edge {e:?} at {side} does not turn around {v:?}"
                )));
            }
        }
    }

    for (f, face) in mesh.faces() {
        for v in face.vertices() {
            if !mesh.contains_vertex(v) {
                return Err(dangling(format!("face {f:?} names dead vertex {v:?}")));
            }
        }
        let edge = mesh
            .edge(face.edge())
            .ok_or_else(|| dangling(format!("face {f:?} seeds dead edge {:?}", face.edge())))?;
        if edge.left() != f && edge.right() != f {
            return Err(invalid_edge(format!(
                "face {f:?} seeds edge {:?} which does not border it",
                face.edge()
            )));
        }
    }
    Ok(())
}

/// Check that walking successors around each vertex visits every incident
/// edge exactly once, in both rotation directions.
///
/// # Errors
///
/// Returns [`MeshValidationError::BrokenRing`] for the first vertex whose ring
/// fails to close or skips an edge.
pub fn validate_rings(mesh: &Mesh) -> Result<(), MeshValidationError> {
    let mut degree: FastHashMap<VertexKey, usize> =
        fast_hash_map_with_capacity(mesh.number_of_vertices());
    for (_, edge) in mesh.edges() {
        *degree.entry(edge.origin()).or_default() += 1;
        *degree.entry(edge.destination()).or_default() += 1;
    }

    for v in mesh.vertex_keys() {
        let expected = degree.get(&v).copied().unwrap_or(0);
        for rotation in [Rotation::Ccw, Rotation::Cw] {
            let fan = mesh.edges_around_vertex(v, rotation).map_err(|err| {
                MeshValidationError::BrokenRing {
                    message: format!("{rotation:?} ring around {v:?}: {err}"),
                }
            })?;
            if fan.len() != expected {
                return Err(MeshValidationError::BrokenRing {
                    message: format!(
                        "{rotation:?} ring around {v:?} visits {} of {expected} edges",
                        fan.len()
                    ),
                });
            }
        }
    }
    Ok(())
}

/// Check that every edge is convex: the far corner of each face does not
/// see the face across the edge.
///
/// Each edge is tested once, so the cost is linear in the size of the mesh.
/// Coplanar neighbors pass.
///
/// # Errors
///
/// Returns [`MeshValidationError::NotConvex`] for the first reflex edge,
/// [`MeshValidationError::DanglingReference`] if an edge names a dead face,
/// or [`MeshValidationError::InvalidEdge`] if a face does not contain its edge.
pub fn validate_local_convexity(mesh: &Mesh) -> Result<(), MeshValidationError> {
    for (e, edge) in mesh.edges() {
        let corners = mesh
            .face_points(edge.left())
            .map_err(|err| dangling(format!("edge {e:?}: {err}")))?;
        let (origin, destination) = edge.endpoints();
        let far = mesh
            .face(edge.right())
            .and_then(|face| face.third_vertex(origin, destination))
            .ok_or_else(|| {
                invalid_edge(format!("right face of edge {e:?} has no far corner"))
            })?;
        let p = mesh
            .point(far)
            .map_err(|err| dangling(format!("edge {e:?}: {err}")))?;
        if is_visible(&corners, &p) {
            return Err(MeshValidationError::NotConvex {
                message: format!("edge {e:?} is reflex: {p} sees face {:?}", edge.left()),
            });
        }
    }
    Ok(())
}

/// Check that no vertex is strictly outside any face.
///
/// # Errors
///
/// Returns [`MeshValidationError::NotConvex`] for the first offending pair,
/// or [`MeshValidationError::DanglingReference`] if a face names a dead vertex.
pub fn validate_convexity(mesh: &Mesh) -> Result<(), MeshValidationError> {
    let points: Vec<Point3> = mesh.vertices().map(|(_, v)| v.point()).collect();
    for (f, _) in mesh.faces() {
        let corners = mesh
            .face_points(f)
            .map_err(|err| dangling(format!("face {f:?}: {err}")))?;
        if let Some(p) = points.iter().find(|p| is_visible(&corners, p)) {
            return Err(MeshValidationError::NotConvex {
                message: format!("vertex {p} sees face {f:?}"),
            });
        }
    }
    Ok(())
}

/// Face of `mesh` as its corner points, rotated so the smallest comes first.
fn canonical_face(mesh: &Mesh, f: FaceKey) -> Option<[Point3; 3]> {
    let [a, b, c] = mesh.face_points(f).ok()?;
    Some(if a <= b && a <= c {
        [a, b, c]
    } else if b <= a && b <= c {
        [b, c, a]
    } else {
        [c, a, b]
    })
}

/// Whether two meshes have the same faces, compared by corner coordinates
/// up to cyclic rotation.
///
/// Keys, edge directions and arena order are ignored. Orientation is not: a
/// face and its reverse differ.
#[must_use]
pub fn meshes_equal(a: &Mesh, b: &Mesh) -> bool {
    if a.number_of_vertices() != b.number_of_vertices()
        || a.number_of_edges() != b.number_of_edges()
        || a.number_of_faces() != b.number_of_faces()
    {
        return false;
    }
    let faces = |mesh: &Mesh| -> Option<Vec<[Point3; 3]>> {
        let mut out: Vec<_> = mesh
            .face_keys()
            .map(|f| canonical_face(mesh, f))
            .collect::<Option<_>>()?;
        out.sort_unstable();
        Some(out)
    };
    match (faces(a), faces(b)) {
        (Some(fa), Some(fb)) => fa == fb,
        _ => false,
    }
}

impl Mesh {
    /// Run the reference, ring and Euler checks.
    ///
    /// # Errors
    ///
    /// Returns the first failure.
    pub fn is_valid(&self) -> Result<(), MeshValidationError> {
        validate_references(self)?;
        validate_rings(self)?;
        validate_euler(self)
    }

    /// See [`validate_local_convexity`].
    ///
    /// # Errors
    ///
    /// Returns the first reflex edge.
    pub fn validate_local_convexity(&self) -> Result<(), MeshValidationError> {
        validate_local_convexity(self)
    }

    /// See [`validate_convexity`].
    ///
    /// # Errors
    ///
    /// Returns the first vertex that sees a face.
    pub fn validate_convexity(&self) -> Result<(), MeshValidationError> {
        validate_convexity(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::algorithms::incremental::IncrementalHull;

    fn pyramid() -> Mesh {
        IncrementalHull::build(&[
            Point3::new(0, 0, 0),
            Point3::new(10, 0, 0),
            Point3::new(10, 10, 0),
            Point3::new(0, 10, 0),
            Point3::new(3, 4, 8),
        ])
        .unwrap()
    }

    #[test]
    fn test_topology_check_result_is_valid() {
        let result = check_topology(&pyramid());
        assert_eq!(result.chi, 2);
        assert_eq!(result.classification, TopologyClassification::ClosedSphere);
        assert!(result.is_valid());
        assert!(result.notes.is_empty());

        let unknown = TopologyCheckResult {
            chi: 42,
            expected: None,
            classification: TopologyClassification::Unknown,
            counts: FVector { by_dim: vec![1] },
            notes: vec![],
        };
        assert!(unknown.is_valid());
    }

    #[test]
    fn test_finished_hull_passes_every_check() {
        let mesh = pyramid();
        assert_eq!(validate_references(&mesh), Ok(()));
        assert_eq!(validate_rings(&mesh), Ok(()));
        assert_eq!(validate_euler(&mesh), Ok(()));
        assert_eq!(validate_local_convexity(&mesh), Ok(()));
        assert_eq!(validate_convexity(&mesh), Ok(()));
    }

    #[test]
    fn test_reflex_edge_is_reported() {
        // Square base with its apex pushed below the base: a closed,
        // consistently oriented sphere that is not convex.
        let mut mesh = Mesh::new();
        let a = mesh.insert_vertex(Point3::new(0, 0, 0));
        let b = mesh.insert_vertex(Point3::new(10, 0, 0));
        let c = mesh.insert_vertex(Point3::new(10, 10, 0));
        let d = mesh.insert_vertex(Point3::new(0, 10, 0));
        let top = mesh.insert_vertex(Point3::new(5, 5, 10));
        let dent = mesh.insert_vertex(Point3::new(5, 5, 2));
        for tri in [
            [a, b, top],
            [b, c, top],
            [c, d, top],
            [d, a, top],
            [a, dent, b],
            [b, dent, c],
            [c, dent, d],
            [d, dent, a],
        ] {
            mesh.attach_face(tri).unwrap();
        }
        mesh.relink_all().unwrap();

        assert_eq!(mesh.is_valid(), Ok(()));
        assert!(matches!(
            validate_local_convexity(&mesh),
            Err(MeshValidationError::NotConvex { .. })
        ));
        assert!(matches!(
            validate_convexity(&mesh),
            Err(MeshValidationError::NotConvex { .. })
        ));
    }

    #[test]
    fn test_removed_face_is_a_dangling_reference() {
        let mut mesh = pyramid();
        let f = mesh.face_keys().next().unwrap();
        mesh.remove_face(f);
        assert!(matches!(
            validate_references(&mesh),
            Err(MeshValidationError::DanglingReference { .. })
        ));
    }

    #[test]
    fn test_pinched_vertex_breaks_ring() {
        // Two tetrahedra sharing only the vertex d.
        let mut mesh = Mesh::new();
        let a = mesh.insert_vertex(Point3::new(0, 0, 0));
        let b = mesh.insert_vertex(Point3::new(1, 0, 0));
        let c = mesh.insert_vertex(Point3::new(0, 1, 0));
        let d = mesh.insert_vertex(Point3::new(0, 0, 1));
        let e = mesh.insert_vertex(Point3::new(1, 0, 1));
        let f = mesh.insert_vertex(Point3::new(0, 1, 1));
        let g = mesh.insert_vertex(Point3::new(0, 0, 2));
        for tri in [
            [a, b, d],
            [a, c, b],
            [b, c, d],
            [a, d, c],
            [d, e, g],
            [d, f, e],
            [e, f, g],
            [d, g, f],
        ] {
            mesh.attach_face(tri).unwrap();
        }
        mesh.relink_all().unwrap();

        assert_eq!(validate_references(&mesh), Ok(()));
        assert!(matches!(
            validate_rings(&mesh),
            Err(MeshValidationError::BrokenRing { .. })
        ));
    }

    #[test]
    fn test_convexity_violation_is_reported() {
        let mut mesh = pyramid();
        // A lone vertex far outside: references break (no seed), convexity too.
        mesh.insert_vertex(Point3::new(5, 5, 100));
        assert!(matches!(
            validate_convexity(&mesh),
            Err(MeshValidationError::NotConvex { .. })
        ));
        assert!(matches!(
            validate_references(&mesh),
            Err(MeshValidationError::DanglingReference { .. })
        ));
    }

    #[test]
    fn test_meshes_equal_compares_faces() {
        let points = [
            Point3::new(0, 0, 0),
            Point3::new(10, 0, 0),
            Point3::new(0, 10, 0),
            Point3::new(0, 0, 10),
            Point3::new(7, 7, 7),
        ];
        let mut reversed = points;
        reversed.reverse();
        let a = IncrementalHull::build(&points).unwrap();
        let b = IncrementalHull::build(&reversed).unwrap();
        assert!(meshes_equal(&a, &b));

        let tetra = IncrementalHull::build(&points[..4]).unwrap();
        assert!(!meshes_equal(&a, &tetra));
    }
}
