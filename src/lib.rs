//! # voronoi_hull
//!
//! Exact-arithmetic 3D convex hulls stored as a doubly-connected edge list
//! (DCEL), and the planar Voronoi diagrams and Delaunay triangulations they
//! yield through the paraboloid lift `z = x² + y²`.
//!
//! # Features
//!
//! - O(n log n) Preparata–Hong divide-and-conquer hull construction
//! - O(n²) incremental hull construction, used for small subproblems and as
//!   a fallback when a merge hits a degenerate configuration
//! - Exact integer predicates evaluated in `i128`; no floating point
//!   anywhere in construction
//! - Optional fork-join parallelism of independent subproblems with
//!   [rayon](https://docs.rs/rayon)
//! - Serialization of points, sites and output segments with
//!   [serde](https://serde.rs)
//!
//! # Basic Usage
//!
//! ```rust
//! use voronoi_hull::prelude::*;
//!
//! let points = [
//!     Point3::new(0, 0, 0),
//!     Point3::new(10, 0, 0),
//!     Point3::new(10, 10, 0),
//!     Point3::new(0, 10, 0),
//!     Point3::new(3, 4, 10),
//! ];
//! let hull = Polyhedron::new(&points, &HullConfig::default()).unwrap();
//!
//! assert_eq!(hull.number_of_vertices(), 5);
//! assert_eq!(hull.number_of_edges(), 9);
//! assert_eq!(hull.number_of_faces(), 6);
//! assert!(hull.is_valid().is_ok());
//! ```
//!
//! # Voronoi Diagrams
//!
//! Sites are lifted onto the paraboloid; the lower faces of their hull are
//! the Delaunay triangles and the circumcenters of those faces are the
//! Voronoi vertices:
//!
//! ```rust
//! use voronoi_hull::prelude::*;
//!
//! let sites = generate_sites_in_general_position(50, (0, 620), (0, 480), 42).unwrap();
//! let config = HullConfigBuilder::default()
//!     .base_case_threshold(16)
//!     .build()
//!     .unwrap();
//! let hull = Polyhedron::from_sites(&sites, &config).unwrap();
//! let diagram = VoronoiDiagram::from_polyhedron(&hull).unwrap();
//!
//! // Device space with the y axis pointing down.
//! let segments = diagram.segments(1000.0, |p| Site::new(p.x, 480 - p.y));
//! assert_eq!(segments.len(), diagram.delaunay_edges().len());
//! ```
//!
//! # Hull Invariants
//!
//! Every finished mesh satisfies:
//!
//! - **Euler** – `|F| = 2|V| − 4` and `|E| = 3|V| − 6`
//! - **Convexity** – no vertex lies strictly outside any face
//! - **Referential integrity** – every key stored in a vertex, edge or face
//!   resolves to a live entity, and each edge is bordered by two faces that
//!   traverse it in opposite directions
//! - **Rings** – walking counter-clockwise around a vertex visits each of
//!   its edges exactly once
//!
//! These are checked by
//! [`Mesh::is_valid`](core::mesh::Mesh::is_valid) and
//! [`Mesh::validate_convexity`](core::mesh::Mesh::validate_convexity); the
//! facade runs both unless [`HullConfig::validate`](core::polyhedron::HullConfig::validate)
//! is cleared.

// Forbid unsafe code throughout the entire crate
#![forbid(unsafe_code)]

#[macro_use]
extern crate derive_builder;

/// The `core` module holds the DCEL mesh, its entities and the hull
/// construction algorithms.
pub mod core {
    /// Hull construction algorithms.
    pub mod algorithms {
        /// Preparata–Hong divide and conquer
        pub mod divide_and_conquer;
        /// Incremental insertion with visibility cones
        pub mod incremental;
        /// Bridge walk and splice of two separated hulls
        pub mod merge;
    }
    /// Collection aliases used throughout the mesh
    pub mod collections;
    pub mod edge;
    pub mod face;
    pub mod mesh;
    pub mod polyhedron;
    pub mod traversal;
    pub mod vertex;

    pub use edge::*;
    pub use face::*;
    pub use mesh::*;
    pub use polyhedron::*;
    pub use vertex::*;
}

/// Points, exact predicates and planar algorithms.
pub mod geometry {
    /// Planar algorithms over sites and lifted hulls.
    pub mod algorithms {
        /// Planar convex hulls and common tangents
        pub mod planar_hull;
        /// Voronoi / Delaunay derivation
        pub mod voronoi;
        pub use planar_hull::*;
        pub use voronoi::*;
    }
    pub mod point;
    pub mod predicates;
    pub mod util;

    pub use point::*;
    pub use predicates::*;
}

/// Topological characteristics and structural validation of meshes.
pub mod topology {
    /// Euler characteristic and mesh validation.
    pub mod characteristics {
        pub mod euler;
        pub mod validation;
        pub use euler::*;
        pub use validation::*;
    }
}

/// Commonly used types and functions.
pub mod prelude {
    pub use crate::core::algorithms::{
        divide_and_conquer::*, incremental::IncrementalHull, merge::merge_hulls,
    };
    pub use crate::core::collections::{
        FastHashMap, FastHashSet, SmallBuffer, fast_hash_map_with_capacity,
    };
    pub use crate::core::{
        edge::Edge,
        face::Face,
        mesh::{EdgeKey, FaceKey, HullError, MIN_HULL_POINTS, Mesh, VertexKey},
        polyhedron::*,
        traversal::Rotation,
        vertex::Vertex,
    };
    pub use crate::geometry::{
        algorithms::{planar_hull::convex_hull, voronoi::*},
        point::*,
        predicates::*,
        util::*,
    };
    pub use crate::topology::characteristics::validation::{
        MeshValidationError, meshes_equal,
    };
}

/// The function `is_normal` checks that structs implement `auto` traits.
/// Traits are checked at compile time, so this function is only used for
/// testing.
#[must_use]
pub const fn is_normal<T: Sized + Send + Sync + Unpin>() -> bool {
    true
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::{
        core::{mesh::Mesh, polyhedron::Polyhedron},
        geometry::{
            algorithms::voronoi::{LineSegment, VoronoiDiagram},
            point::{Point3, Site},
        },
        is_normal,
    };

    #[test]
    fn normal_types() {
        assert!(is_normal::<Point3>());
        assert!(is_normal::<Site>());
        assert!(is_normal::<Mesh>());
        assert!(is_normal::<Polyhedron>());
        assert!(is_normal::<VoronoiDiagram>());
        assert!(is_normal::<LineSegment>());
    }

    #[test]
    fn test_prelude_exports() {
        use crate::prelude::*;

        let mut map: FastHashMap<u64, usize> = fast_hash_map_with_capacity(8);
        map.insert(1, 2);
        assert_eq!(map.get(&1), Some(&2));

        let mut buffer: SmallBuffer<i32, 4> = SmallBuffer::new();
        buffer.push(7);
        assert_eq!(buffer.len(), 1);

        assert_eq!(Method::Incremental.as_str(), "Incremental");
        assert_eq!(MIN_HULL_POINTS, 4);
        assert_eq!(
            area2(&Site::new(0, 0), &Site::new(1, 0), &Site::new(0, 1)),
            1
        );
    }
}
