//! Property-based tests for hull construction.
//!
//! This module uses proptest to verify the invariants every finished hull
//! must satisfy, for both construction methods:
//! - Euler counts `|F| = 2|V| − 4` and `|E| = 3|V| − 6`
//! - referential integrity and closed vertex rings
//! - convexity: no vertex sees any face, and the per-edge check agrees
//! - every lifted site is a hull vertex
//!
//! Tests are generated for several base-case thresholds using macros to
//! reduce duplication.

use proptest::prelude::*;
use voronoi_hull::prelude::*;

// =============================================================================
// TEST CONFIGURATION
// =============================================================================

/// Strategy for distinct sites in a small box, so that collinear and
/// cocircular subsets come up often.
fn site_cloud(min: usize, max: usize) -> impl Strategy<Value = Vec<Site>> {
    prop::collection::btree_set((0i64..40, 0i64..40), min..=max)
        .prop_map(|set| set.into_iter().map(Site::from).collect())
}

/// Strategy for distinct points in a small cube.
fn point_cloud(min: usize, max: usize) -> impl Strategy<Value = Vec<Point3>> {
    prop::collection::btree_set((-20i64..20, -20i64..20, -20i64..20), min..=max)
        .prop_map(|set| set.into_iter().map(Point3::from).collect())
}

fn config(threshold: usize, force_incremental: bool) -> HullConfig {
    HullConfigBuilder::default()
        .base_case_threshold(threshold)
        .force_incremental(force_incremental)
        .build()
        .unwrap()
}

// =============================================================================
// THRESHOLD TEST GENERATION MACROS
// =============================================================================

/// Macro to generate hull property tests for a given base-case threshold
macro_rules! test_hull_properties {
    ($threshold:literal, $max_sites:literal) => {
        pastey::paste! {
            proptest! {
                #![proptest_config(ProptestConfig::with_cases(48))]

                /// Property: lifted sites build a valid hull containing every site
                #[test]
                fn [<prop_lifted_sites_threshold_ $threshold>](
                    sites in site_cloud(4, $max_sites)
                ) {
                    match Polyhedron::from_sites(&sites, &config($threshold, false)) {
                        Ok(hull) => {
                            let v = hull.number_of_vertices();
                            prop_assert_eq!(v, sites.len());
                            prop_assert_eq!(hull.number_of_faces(), 2 * v - 4);
                            prop_assert_eq!(hull.number_of_edges(), 3 * v - 6);
                            prop_assert!(hull.is_valid().is_ok());
                            prop_assert!(hull.mesh().validate_local_convexity().is_ok());
                            prop_assert!(hull.validate_convexity().is_ok());
                        }
                        // Every site on one line lifts onto a vertical plane.
                        Err(err) => prop_assert!(
                            matches!(err, HullError::DegenerateInput { .. }),
                            "unexpected error {}",
                            err
                        ),
                    }
                }

                /// Property: both methods agree on the vertex set
                #[test]
                fn [<prop_methods_share_vertices_threshold_ $threshold>](
                    sites in site_cloud(4, $max_sites)
                ) {
                    let dc = Polyhedron::from_sites(&sites, &config($threshold, false));
                    let inc = Polyhedron::from_sites(&sites, &config($threshold, true));
                    prop_assert_eq!(dc.is_ok(), inc.is_ok());
                    if let (Ok(dc), Ok(inc)) = (dc, inc) {
                        let mut a: Vec<Point3> = dc.vertices().map(|(_, v)| v.point()).collect();
                        let mut b: Vec<Point3> = inc.vertices().map(|(_, v)| v.point()).collect();
                        a.sort_unstable();
                        b.sort_unstable();
                        prop_assert_eq!(a, b);
                    }
                }
            }
        }
    };
}

test_hull_properties!(8, 40);
test_hull_properties!(16, 60);
test_hull_properties!(30, 80);

// =============================================================================
// GENERAL POINT CLOUDS
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: hulls of arbitrary points are closed, convex spheres
    #[test]
    fn prop_point_cloud_hull_is_valid(points in point_cloud(4, 30)) {
        match Polyhedron::new(&points, &config(8, false)) {
            Ok(hull) => {
                let v = hull.number_of_vertices();
                prop_assert!(v >= 4 && v <= points.len());
                prop_assert_eq!(hull.number_of_faces(), 2 * v - 4);
                prop_assert!(hull.is_valid().is_ok());
                prop_assert!(hull.mesh().validate_local_convexity().is_ok());
                prop_assert!(hull.validate_convexity().is_ok());
                // No input point lies outside the hull.
                for (_, face) in hull.faces() {
                    let tri = face.vertices().map(|k| hull.mesh().point(k).unwrap());
                    for p in &points {
                        prop_assert!(!is_visible(&tri, p));
                    }
                }
            }
            Err(err) => prop_assert!(
                matches!(err, HullError::DegenerateInput { .. }),
                "unexpected error {}",
                err
            ),
        }
    }

    /// Property: an interior point never changes the hull
    #[test]
    fn prop_interior_insert_is_a_no_op(points in point_cloud(4, 20)) {
        if let Ok(mut mesh) = IncrementalHull::build(&points) {
            let before = mesh.dump().to_string();
            let first = points[0];
            prop_assert!(!IncrementalHull::insert_point(&mut mesh, first).unwrap());
            prop_assert_eq!(before, mesh.dump().to_string());
        }
    }
}
