//! Storage backend compatibility tests.
//!
//! Hull construction must behave the same over `DenseSlotMap` (the default
//! `dense-slotmap` feature) and `SlotMap`.
//!
//! ```bash
//! cargo test --test storage_backend
//! cargo test --test storage_backend --no-default-features
//! ```

use voronoi_hull::prelude::*;

fn backend() -> &'static str {
    if cfg!(feature = "dense-slotmap") {
        "DenseSlotMap"
    } else {
        "SlotMap"
    }
}

#[test]
fn test_construction_and_removal_over_backend() {
    let sites = generate_sites_in_general_position(80, (0, 620), (0, 480), 64).unwrap();
    let config = HullConfigBuilder::default()
        .base_case_threshold(8)
        .build()
        .unwrap();
    let hull = Polyhedron::from_sites(&sites, &config).unwrap();
    assert_eq!(hull.number_of_vertices(), 80, "{}", backend());

    // Iteration visits every live entity exactly once.
    assert_eq!(hull.vertices().count(), 80);
    assert_eq!(hull.edges().count(), 3 * 80 - 6);
    assert_eq!(hull.faces().count(), 2 * 80 - 4);

    // Keys issued before removals stay valid for the survivors.
    let mut mesh = hull.into_mesh();
    let keys: Vec<FaceKey> = mesh.face_keys().collect();
    let removed = mesh.remove_face(keys[0]).unwrap();
    assert!(!mesh.contains_face(keys[0]));
    for &k in &keys[1..] {
        assert!(mesh.contains_face(k), "{} lost face {k:?}", backend());
    }
    assert_eq!(removed.vertices().len(), 3);
}
