//! Incremental convex hull construction.
//!
//! The builder follows the classic O(n²) scheme:
//! 1. Organize: move four non-coplanar points to the front
//! 2. Build the outward-oriented tetrahedron on them
//! 3. Insert every remaining point in input order:
//!    - collect the faces visible from the point; if there are none the
//!      point is inside the hull and is skipped
//!    - classify the edges of visible faces as removable (both faces
//!      visible) or border (one face visible)
//!    - walk the border loop (the cone base) and cap each border edge with a
//!      new face to the point
//!    - delete the visible region and relink the edges whose faces changed
//!
//! All classification state lives in an [`IncrementalPass`] that is dropped
//! after each insertion.

use crate::core::collections::{
    EdgeSecondaryMap, FaceKeySet, FastHashMap, SmallBuffer, VertexKeySet,
};
use crate::core::mesh::{EdgeKey, FaceKey, HullError, MIN_HULL_POINTS, Mesh, VertexKey};
use crate::geometry::point::Point3;
use crate::geometry::predicates::{are_collinear, are_coplanar, is_visible, volume6};

/// Classification of an edge during one insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeMark {
    /// Neither face is visible.
    Keep,
    /// Both faces are visible; the edge disappears.
    Removable,
    /// Exactly one face is visible; the edge is on the cone base.
    Border,
}

/// Scratch state of a single point insertion.
#[derive(Debug, Default)]
pub struct IncrementalPass {
    visible: FaceKeySet,
    marks: EdgeSecondaryMap<EdgeMark>,
    cone: FastHashMap<VertexKey, SmallBuffer<EdgeKey, 2>>,
}

impl IncrementalPass {
    /// Faces visible from the point being inserted.
    #[must_use]
    pub const fn visible_faces(&self) -> &FaceKeySet {
        &self.visible
    }

    /// The mark assigned to `e`, if `e` bordered a visible face.
    #[must_use]
    pub fn mark(&self, e: EdgeKey) -> Option<EdgeMark> {
        self.marks.get(e).copied()
    }

    /// Classify every face and every edge of the visible region seen from `p`.
    ///
    /// # Errors
    ///
    /// Returns [`HullError::TopologyIntegrity`] if the mesh is inconsistent
    /// or a vertex collects more than two border edges.
    pub fn classify(mesh: &Mesh, p: &Point3) -> Result<Self, HullError> {
        let mut pass = Self::default();
        for f in mesh.face_keys() {
            if is_visible(&mesh.face_points(f)?, p) {
                pass.visible.insert(f);
            }
        }

        let visible: Vec<FaceKey> = pass.visible.iter().copied().collect();
        for f in visible {
            for e in mesh.face_edges(f)? {
                if pass.marks.contains_key(e) {
                    continue;
                }
                let edge = mesh.try_edge(e)?;
                let mark = match (
                    pass.visible.contains(&edge.left()),
                    pass.visible.contains(&edge.right()),
                ) {
                    (true, true) => EdgeMark::Removable,
                    (false, false) => EdgeMark::Keep,
                    _ => EdgeMark::Border,
                };
                pass.marks.insert(e, mark);
                if mark == EdgeMark::Border {
                    for v in [edge.origin(), edge.destination()] {
                        let registered = pass.cone.entry(v).or_default();
                        registered.push(e);
                        if registered.len() > 2 {
                            return Err(HullError::topology(format!(
                                "cone-base vertex {v:?} has more than two border edges"
                            )));
                        }
                    }
                }
            }
        }
        Ok(pass)
    }

    /// Border edge `e` directed as it runs in its visible face.
    fn oriented(&self, mesh: &Mesh, e: EdgeKey) -> Result<(VertexKey, VertexKey), HullError> {
        let edge = mesh.try_edge(e)?;
        if self.visible.contains(&edge.left()) {
            Ok((edge.origin(), edge.destination()))
        } else {
            Ok((edge.destination(), edge.origin()))
        }
    }

    /// Walk the cone base once around, returning each border edge with its
    /// endpoints in walk order.
    ///
    /// # Errors
    ///
    /// Returns [`HullError::TopologyIntegrity`] if the border edges do not form
    /// one closed loop.
    pub fn cone_base(&self, mesh: &Mesh) -> Result<Vec<(EdgeKey, VertexKey, VertexKey)>, HullError> {
        let border: Vec<EdgeKey> = self
            .marks
            .iter()
            .filter(|(_, mark)| **mark == EdgeMark::Border)
            .map(|(e, _)| e)
            .collect();
        let Some(&start) = border.iter().min() else {
            return Err(HullError::topology("visible region has no border"));
        };

        let (first, mut current) = self.oriented(mesh, start)?;
        let mut steps = vec![(start, first, current)];
        let mut previous = start;
        while current != first {
            let registered = self.cone.get(&current).map_or(&[][..], |r| r.as_slice());
            let [a, b] = registered else {
                return Err(HullError::topology(format!(
                    "cone-base vertex {current:?} has {} border edges",
                    registered.len()
                )));
            };
            let next = if *a == previous { *b } else { *a };
            let (u, v) = self.oriented(mesh, next)?;
            if u != current {
                return Err(HullError::topology(format!(
                    "cone base breaks at {current:?}: border edge {next:?} starts at {u:?}"
                )));
            }
            steps.push((next, u, v));
            if steps.len() > border.len() {
                return Err(HullError::topology("cone-base walk does not close"));
            }
            previous = next;
            current = v;
        }
        if steps.len() != border.len() {
            return Err(HullError::topology(format!(
                "cone base covers {} of {} border edges",
                steps.len(),
                border.len()
            )));
        }
        Ok(steps)
    }
}

/// Incremental hull builder.
#[derive(Debug, Clone, Copy, Default)]
pub struct IncrementalHull;

impl IncrementalHull {
    /// Build the hull of `points`.
    ///
    /// Points inside the current hull at the time of their insertion,
    /// repeated points included, leave no trace in the result.
    ///
    /// # Errors
    ///
    /// - [`HullError::InsufficientPoints`] for fewer than four points
    /// - [`HullError::CoordinateOutOfRange`] for a coordinate past
    ///   [`MAX_COORDINATE`](crate::geometry::point::MAX_COORDINATE)
    /// - [`HullError::DegenerateInput`] if all points are coplanar
    /// - [`HullError::TopologyIntegrity`] if an insertion breaks the mesh
    ///
    /// # Examples
    ///
    /// ```rust
    /// use voronoi_hull::core::algorithms::incremental::IncrementalHull;
    /// use voronoi_hull::geometry::point::Point3;
    ///
    /// let points = [
    ///     Point3::new(0, 0, 0),
    ///     Point3::new(10, 0, 0),
    ///     Point3::new(10, 10, 0),
    ///     Point3::new(0, 10, 0),
    ///     Point3::new(3, 4, 8),
    /// ];
    /// let mesh = IncrementalHull::build(&points).unwrap();
    /// assert_eq!(
    ///     (mesh.number_of_vertices(), mesh.number_of_edges(), mesh.number_of_faces()),
    ///     (5, 9, 6)
    /// );
    /// ```
    pub fn build(points: &[Point3]) -> Result<Mesh, HullError> {
        if points.len() < MIN_HULL_POINTS {
            return Err(HullError::InsufficientPoints {
                found: points.len(),
                required: MIN_HULL_POINTS,
            });
        }
        let mut ordered = points.to_vec();
        Self::organize(&mut ordered)?;
        let mut mesh = Self::tetrahedron([ordered[0], ordered[1], ordered[2], ordered[3]])?;

        let mut skipped = 0usize;
        for p in &ordered[MIN_HULL_POINTS..] {
            if !Self::insert_point(&mut mesh, *p)? {
                skipped += 1;
            }
        }
        tracing::debug!(
            "incremental hull: {} points, {} vertices, {} faces, {} interior points skipped",
            points.len(),
            mesh.number_of_vertices(),
            mesh.number_of_faces(),
            skipped
        );
        Ok(mesh)
    }

    /// Move four non-coplanar points to the front of `points`.
    ///
    /// The search is greedy in input order: the first point, then the first
    /// point distinct from it, then the first point off their line, then the
    /// first point off their plane. It succeeds whenever any non-coplanar
    /// quadruple exists.
    ///
    /// # Errors
    ///
    /// - [`HullError::InsufficientPoints`] for fewer than four points
    /// - [`HullError::CoordinateOutOfRange`] for a coordinate past
    ///   [`MAX_COORDINATE`](crate::geometry::point::MAX_COORDINATE)
    /// - [`HullError::DegenerateInput`] when every point lies on one plane
    pub fn organize(points: &mut [Point3]) -> Result<(), HullError> {
        if points.len() < MIN_HULL_POINTS {
            return Err(HullError::InsufficientPoints {
                found: points.len(),
                required: MIN_HULL_POINTS,
            });
        }
        for p in points.iter() {
            p.validate()?;
        }
        let p0 = points[0];
        let i1 = (1..points.len())
            .find(|&i| points[i] != p0)
            .ok_or_else(|| HullError::DegenerateInput {
                message: format!("all {} points coincide at {p0}", points.len()),
            })?;
        points.swap(1, i1);
        let p1 = points[1];

        let i2 = (2..points.len())
            .find(|&i| !are_collinear(&p0, &p1, &points[i]))
            .ok_or_else(|| HullError::DegenerateInput {
                message: format!("all {} points are collinear", points.len()),
            })?;
        points.swap(2, i2);
        let p2 = points[2];

        let i3 = (3..points.len())
            .find(|&i| !are_coplanar(&p0, &p1, &p2, &points[i]))
            .ok_or_else(|| HullError::DegenerateInput {
                message: format!("all {} points are coplanar", points.len()),
            })?;
        points.swap(3, i3);
        Ok(())
    }

    /// Build the outward-oriented tetrahedron on four non-coplanar points.
    ///
    /// # Errors
    ///
    /// Returns [`HullError::CoordinateOutOfRange`] for a coordinate past
    /// [`MAX_COORDINATE`](crate::geometry::point::MAX_COORDINATE) and
    /// [`HullError::DegenerateInput`] if the points are coplanar.
    pub fn tetrahedron(points: [Point3; 4]) -> Result<Mesh, HullError> {
        for p in &points {
            p.validate()?;
        }
        let [p0, mut p1, mut p2, p3] = points;
        let volume = volume6(&p0, &p1, &p2, &p3);
        if volume == 0 {
            return Err(HullError::DegenerateInput {
                message: format!("tetrahedron {p0} {p1} {p2} {p3} is flat"),
            });
        }
        if volume < 0 {
            std::mem::swap(&mut p1, &mut p2);
        }

        let mut mesh = Mesh::with_capacity(MIN_HULL_POINTS);
        let v0 = mesh.insert_vertex(p0);
        let v1 = mesh.insert_vertex(p1);
        let v2 = mesh.insert_vertex(p2);
        let v3 = mesh.insert_vertex(p3);
        for tri in [[v0, v1, v2], [v0, v3, v1], [v1, v3, v2], [v0, v2, v3]] {
            mesh.attach_face(tri)?;
        }
        mesh.relink_all()?;
        Ok(mesh)
    }

    /// Insert `p` into a closed hull.
    ///
    /// Returns `false` without touching the mesh when `p` sees no face.
    ///
    /// # Errors
    ///
    /// - [`HullError::CoordinateOutOfRange`] for a coordinate past
    ///   [`MAX_COORDINATE`](crate::geometry::point::MAX_COORDINATE)
    /// - [`HullError::TopologyIntegrity`] if the visible region is not a disk
    ///   bounded by a single cone-base loop or the mesh is inconsistent
    pub fn insert_point(mesh: &mut Mesh, p: Point3) -> Result<bool, HullError> {
        p.validate()?;
        let pass = IncrementalPass::classify(mesh, &p)?;
        if pass.visible.is_empty() {
            tracing::trace!("point {} is inside the hull; skipped", p);
            return Ok(false);
        }
        let steps = pass.cone_base(mesh)?;

        let mut orphans = VertexKeySet::default();
        for (e, mark) in &pass.marks {
            if *mark == EdgeMark::Removable
                && let Some(edge) = mesh.remove_edge(e)
            {
                orphans.insert(edge.origin());
                orphans.insert(edge.destination());
            }
        }
        for &f in &pass.visible {
            mesh.remove_face(f);
        }
        for v in orphans {
            if !pass.cone.contains_key(&v) {
                mesh.remove_vertex(v);
            }
        }

        let apex = mesh.insert_vertex(p);
        for &(_, u, v) in &steps {
            mesh.attach_face([u, v, apex])?;
        }

        let mut changed: Vec<EdgeKey> = Vec::with_capacity(2 * steps.len());
        for &(border, u, _) in &steps {
            let spoke = mesh.require_edge(u, apex)?;
            mesh.set_vertex_edge(u, spoke)?;
            changed.push(border);
            changed.push(spoke);
        }
        mesh.relink(changed)?;

        tracing::trace!(
            "inserted {}: {} visible faces replaced by {} cone faces",
            p,
            pass.visible.len(),
            steps.len()
        );
        Ok(true)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::characteristics::validation::validate_convexity;

    fn p(x: i64, y: i64, z: i64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn counts(mesh: &Mesh) -> (usize, usize, usize) {
        (
            mesh.number_of_vertices(),
            mesh.number_of_edges(),
            mesh.number_of_faces(),
        )
    }

    fn assert_closed_convex(mesh: &Mesh) {
        mesh.is_valid().unwrap();
        validate_convexity(mesh).unwrap();
    }

    #[test]
    fn test_tetrahedron_is_outward_for_either_orientation() {
        for points in [
            [p(0, 0, 0), p(1, 0, 0), p(0, 1, 0), p(0, 0, 1)],
            [p(0, 0, 0), p(0, 1, 0), p(1, 0, 0), p(0, 0, 1)],
        ] {
            let mesh = IncrementalHull::tetrahedron(points).unwrap();
            assert_eq!(counts(&mesh), (4, 6, 4));
            assert_closed_convex(&mesh);
        }
    }

    #[test]
    fn test_flat_tetrahedron_is_rejected() {
        let err = IncrementalHull::tetrahedron([p(0, 0, 0), p(1, 0, 0), p(0, 1, 0), p(5, 5, 0)])
            .unwrap_err();
        assert!(matches!(err, HullError::DegenerateInput { .. }));
    }

    #[test]
    fn test_organize_skips_duplicates_and_collinear_points() {
        let mut points = vec![
            p(0, 0, 0),
            p(0, 0, 0),
            p(1, 1, 1),
            p(2, 2, 2),
            p(1, 0, 0),
            p(2, 0, 0),
            p(0, 0, 5),
        ];
        IncrementalHull::organize(&mut points).unwrap();
        assert_eq!(points[0], p(0, 0, 0));
        assert_eq!(points[1], p(1, 1, 1));
        assert_eq!(points[2], p(1, 0, 0));
        assert_eq!(points[3], p(0, 0, 5));
        assert_ne!(volume6(&points[0], &points[1], &points[2], &points[3]), 0);
    }

    #[test]
    fn test_degenerate_inputs() {
        let coplanar = [p(0, 0, 0), p(4, 0, 0), p(0, 4, 0), p(3, 3, 0), p(9, 1, 0)];
        assert!(matches!(
            IncrementalHull::build(&coplanar),
            Err(HullError::DegenerateInput { .. })
        ));
        let collinear = [p(0, 0, 0), p(1, 1, 1), p(2, 2, 2), p(3, 3, 3)];
        assert!(matches!(
            IncrementalHull::build(&collinear),
            Err(HullError::DegenerateInput { .. })
        ));
        assert!(matches!(
            IncrementalHull::build(&collinear[..3]),
            Err(HullError::InsufficientPoints { found: 3, .. })
        ));
    }

    #[test]
    fn test_extreme_coordinates_are_rejected() {
        let far = [
            p(i64::MIN, 0, 0),
            p(i64::MAX, 0, 0),
            p(0, i64::MAX, 0),
            p(0, 0, i64::MAX),
        ];
        assert!(matches!(
            IncrementalHull::build(&far),
            Err(HullError::CoordinateOutOfRange { .. })
        ));
        assert!(matches!(
            IncrementalHull::tetrahedron(far),
            Err(HullError::CoordinateOutOfRange { .. })
        ));

        let mut mesh = IncrementalHull::build(&[
            p(0, 0, 0),
            p(10, 0, 0),
            p(0, 10, 0),
            p(0, 0, 10),
        ])
        .unwrap();
        let before = mesh.dump().to_string();
        assert!(matches!(
            IncrementalHull::insert_point(&mut mesh, p(i64::MAX, i64::MAX, i64::MAX)),
            Err(HullError::CoordinateOutOfRange { .. })
        ));
        assert_eq!(before, mesh.dump().to_string());
    }

    #[test]
    fn test_square_pyramid() {
        let points = [
            p(0, 0, 0),
            p(10, 0, 0),
            p(10, 10, 0),
            p(0, 10, 0),
            p(3, 4, 8),
        ];
        let mesh = IncrementalHull::build(&points).unwrap();
        assert_eq!(counts(&mesh), (5, 9, 6));
        assert_closed_convex(&mesh);
    }

    #[test]
    fn test_interior_point_is_skipped_without_mutation() {
        let mut mesh =
            IncrementalHull::tetrahedron([p(0, 0, 0), p(12, 0, 0), p(0, 12, 0), p(0, 0, 12)])
                .unwrap();
        let before = mesh.dump().to_string();
        assert!(!IncrementalHull::insert_point(&mut mesh, p(1, 1, 1)).unwrap());
        assert!(!IncrementalHull::insert_point(&mut mesh, p(0, 0, 0)).unwrap());
        assert_eq!(mesh.dump().to_string(), before);
    }

    #[test]
    fn test_insertion_swallows_vertex() {
        let mut mesh =
            IncrementalHull::tetrahedron([p(0, 0, 0), p(4, 0, 0), p(0, 4, 0), p(0, 0, 4)])
                .unwrap();
        // Sees all three faces around the apex (0, 0, 4), which becomes interior.
        assert!(IncrementalHull::insert_point(&mut mesh, p(-1, -1, 40)).unwrap());
        assert_eq!(counts(&mesh), (4, 6, 4));
        assert!(mesh.vertices().all(|(_, v)| v.point() != p(0, 0, 4)));
        assert_closed_convex(&mesh);
    }

    #[test]
    fn test_cube_with_coplanar_faces() {
        let mut points = Vec::new();
        for x in [0, 6] {
            for y in [0, 6] {
                for z in [0, 6] {
                    points.push(p(x, y, z));
                }
            }
        }
        points.push(p(3, 3, 3));
        let mesh = IncrementalHull::build(&points).unwrap();
        assert_eq!(counts(&mesh), (8, 18, 12));
        assert_closed_convex(&mesh);
    }

    #[test]
    fn test_repeated_points_are_skipped() {
        let points = [
            p(0, 0, 0),
            p(9, 0, 0),
            p(0, 9, 0),
            p(0, 0, 9),
            p(9, 9, 9),
            p(9, 9, 9),
            p(0, 0, 0),
        ];
        let mesh = IncrementalHull::build(&points).unwrap();
        assert_eq!(mesh.number_of_vertices(), 5);
        assert_closed_convex(&mesh);
    }

    #[test]
    fn test_cone_base_is_a_single_loop() {
        let mesh = IncrementalHull::build(&[
            p(0, 0, 0),
            p(10, 0, 0),
            p(0, 10, 0),
            p(0, 0, 10),
            p(10, 10, 10),
        ])
        .unwrap();
        let apex = p(-5, -5, -5);
        let pass = IncrementalPass::classify(&mesh, &apex).unwrap();
        assert!(!pass.visible_faces().is_empty());
        let steps = pass.cone_base(&mesh).unwrap();
        for window in steps.windows(2) {
            assert_eq!(window[0].2, window[1].1);
        }
        assert_eq!(steps.last().unwrap().2, steps[0].1);
        for &(e, _, _) in &steps {
            assert_eq!(pass.mark(e), Some(EdgeMark::Border));
        }
    }
}
