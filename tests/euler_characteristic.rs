//! Deterministic integration tests for the Euler characteristic of hulls.
//!
//! ## Test Coverage
//!
//! - Empty meshes (χ = 0)
//! - Platonic-style solids with known counts
//! - Hulls with interior and swallowed points
//! - Lifted site clouds built by both methods
//!
//! For property-based tests with random inputs, see `proptest_hull.rs`.

use voronoi_hull::prelude::*;
use voronoi_hull::topology::characteristics::{euler, validation};

fn counts_of(points: &[Point3]) -> (usize, usize, usize) {
    let hull = Polyhedron::new(points, &HullConfig::default()).unwrap();
    (
        hull.number_of_vertices(),
        hull.number_of_edges(),
        hull.number_of_faces(),
    )
}

// =============================================================================
// DETERMINISTIC TESTS - KNOWN CONFIGURATIONS
// =============================================================================

#[test]
fn test_empty_mesh_euler() {
    let mesh = Mesh::new();
    let counts = euler::count_simplices(&mesh);
    assert_eq!(counts.count(0), 0);
    assert_eq!(euler::euler_characteristic(&counts), 0);

    let classification = euler::classify(&counts);
    assert_eq!(classification, euler::TopologyClassification::Empty);
    assert_eq!(euler::expected_chi_for(&classification), Some(0));
    assert!(validation::validate_euler(&mesh).is_ok());
}

#[test]
fn test_tetrahedron() {
    let points = [
        Point3::new(0, 0, 0),
        Point3::new(6, 0, 0),
        Point3::new(0, 6, 0),
        Point3::new(0, 0, 6),
    ];
    assert_eq!(counts_of(&points), (4, 6, 4));
}

#[test]
fn test_octahedron() {
    // Every face is a triangle already, so there is no choice of diagonal.
    let points = [
        Point3::new(5, 0, 0),
        Point3::new(-5, 0, 0),
        Point3::new(0, 5, 0),
        Point3::new(0, -5, 0),
        Point3::new(0, 0, 5),
        Point3::new(0, 0, -5),
    ];
    let hull = Polyhedron::new(&points, &HullConfig::default()).unwrap();
    let counts = euler::count_simplices(hull.mesh());
    assert_eq!(counts.by_dim, vec![6, 12, 8]);
    assert_eq!(euler::euler_characteristic(&counts), 2);
    assert_eq!(
        euler::classify(&counts),
        euler::TopologyClassification::ClosedSphere
    );
}

#[test]
fn test_cube_triangulates_every_side() {
    let mut points = Vec::new();
    for x in [-3, 3] {
        for y in [-3, 3] {
            for z in [-3, 3] {
                points.push(Point3::new(x, y, z));
            }
        }
    }
    assert_eq!(counts_of(&points), (8, 18, 12));
}

#[test]
fn test_interior_points_do_not_count() {
    let mut points = vec![
        Point3::new(0, 0, 0),
        Point3::new(20, 0, 0),
        Point3::new(0, 20, 0),
        Point3::new(0, 0, 20),
    ];
    points.extend([Point3::new(1, 1, 1), Point3::new(2, 3, 4), Point3::new(5, 5, 5)]);
    assert_eq!(counts_of(&points), (4, 6, 4));
}

#[test]
fn test_lifted_sites_are_all_extreme() {
    let sites = generate_sites_in_general_position(60, (-100, 100), (-100, 100), 8).unwrap();
    for force_incremental in [false, true] {
        let config = HullConfigBuilder::default()
            .base_case_threshold(10)
            .force_incremental(force_incremental)
            .build()
            .unwrap();
        let hull = Polyhedron::from_sites(&sites, &config).unwrap();
        let counts = euler::count_simplices(hull.mesh());
        assert_eq!(counts.by_dim, vec![60, 174, 116]);
        assert!(validation::validate_euler(hull.mesh()).is_ok());
    }
}

#[test]
fn test_euler_mismatch_is_reported() {
    let hull = Polyhedron::new(
        &[
            Point3::new(0, 0, 0),
            Point3::new(1, 0, 0),
            Point3::new(0, 1, 0),
            Point3::new(0, 0, 1),
        ],
        &HullConfig::default(),
    )
    .unwrap();
    let mut mesh = hull.into_mesh();
    mesh.insert_vertex(Point3::new(9, 9, 9));
    assert_eq!(
        validation::validate_euler(&mesh),
        Err(MeshValidationError::EulerMismatch {
            vertices: 5,
            edges: 6,
            faces: 4,
        })
    );
}
