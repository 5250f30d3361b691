//! Preparata–Hong merge of two separated hulls.
//!
//! Given hulls `left` and `right` whose vertices are strictly ordered in
//! `(x, y)` (every left vertex below every right vertex), the merge:
//!
//! 1. seeds a bridge `a → b` from the lower common tangent of their
//!    xy-shadows,
//! 2. wraps a plane around the two hulls by walking the bridge: at each step
//!    the next vertex comes from the neighbors of `a` in `left` or of `b` in
//!    `right`, whichever makes the face `(a, b, d)` supporting,
//! 3. paints red every face the band of new faces hides, bounded by the seam
//!    edges the walk advanced along,
//! 4. splices: discards the red region, moves `right` into `left` and attaches
//!    the band.
//!
//! Steps 1 and 2 only read the inputs, so a merge that fails with a
//! recoverable error has not touched anything.

use crate::core::collections::{
    EdgeKeySet, EdgeSecondaryMap, FaceSecondaryMap, SmallBuffer, TYPICAL_VERTEX_DEGREE,
    VertexKeySet,
};
use crate::core::mesh::{EdgeKey, FaceKey, HullError, Mesh, VertexKey};
use crate::core::traversal::Rotation;
use crate::geometry::algorithms::planar_hull::lower_tangent;
use crate::geometry::point::Point3;
use crate::geometry::predicates::{are_collinear, volume6};

/// The hull a bridge step advanced on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The lexicographically smaller hull.
    Left,
    /// The lexicographically greater hull.
    Right,
}

/// One face of the band: bridge `a → b` and the winning vertex `apex`.
///
/// `a` is a key of the left hull, `b` of the right hull, and `apex` of the
/// hull named by `side`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BridgeStep {
    /// Bridge endpoint on the left hull.
    pub a: VertexKey,
    /// Bridge endpoint on the right hull.
    pub b: VertexKey,
    /// Third corner of the band face.
    pub apex: VertexKey,
    /// Hull that owns `apex` and advances to it.
    pub side: Side,
}

/// Merge coloring of faces and edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    /// Survives the merge.
    Blue,
    /// Hidden by the band; discarded.
    Red,
    /// Seam edge between the band and a surviving face.
    Purple,
}

/// Coloring of one input hull.
#[derive(Debug, Default)]
struct Paint {
    faces: FaceSecondaryMap<Color>,
    edges: EdgeSecondaryMap<Color>,
}

impl Paint {
    fn face(&self, f: FaceKey) -> Color {
        self.faces.get(f).copied().unwrap_or(Color::Blue)
    }

    fn edge(&self, e: EdgeKey) -> Color {
        self.edges.get(e).copied().unwrap_or(Color::Blue)
    }
}

/// Scratch state of one merge: the band and both colorings.
#[derive(Debug, Default)]
pub struct MergePass {
    steps: Vec<BridgeStep>,
    left: Paint,
    right: Paint,
}

/// Seed bridge: the lower common tangent of the two hulls' xy-shadows.
///
/// Each shadow is read off the hull's silhouette edges with
/// [`Mesh::shadow`], in time linear in the size of the hull.
///
/// # Errors
///
/// - [`HullError::BridgeLoop`] if the tangent search does not settle
/// - [`HullError::TopologyIntegrity`] if a silhouette is not a single loop
pub fn seed_bridge(left: &Mesh, right: &Mesh) -> Result<(VertexKey, VertexKey), HullError> {
    let shadow = |mesh: &Mesh| -> Result<Vec<(VertexKey, Point3)>, HullError> {
        mesh.shadow()?
            .into_iter()
            .map(|v| Ok((v, mesh.point(v)?)))
            .collect()
    };
    let (shadow_left, shadow_right) = (shadow(left)?, shadow(right)?);
    let (i, j) = lower_tangent(&shadow_left, &shadow_right, |(_, p)| p.xy())?;
    Ok((shadow_left[i].0, shadow_right[j].0))
}

/// The neighbor of `pivot` that makes `(a, b, d)` a supporting face.
///
/// `a → b` is the current bridge; `pivot` is whichever endpoint lives in
/// `mesh`. Candidates are scanned counter-clockwise around `pivot`; a
/// candidate replaces the current best when it lies outside the plane of
/// `(a, b, best)`. Candidates collinear with the bridge are skipped.
///
/// # Errors
///
/// Returns [`HullError::NoWinningCandidate`] if no candidate remains or a
/// second candidate is coplanar with the winning face, and
/// [`HullError::TopologyIntegrity`] if the ring around `pivot` is broken.
pub fn winning_candidate(
    mesh: &Mesh,
    pivot: VertexKey,
    a: &Point3,
    b: &Point3,
) -> Result<(VertexKey, Point3), HullError> {
    let mut candidates: SmallBuffer<(VertexKey, Point3), TYPICAL_VERTEX_DEGREE> =
        SmallBuffer::new();
    for q in mesh.neighbors(pivot, Rotation::Ccw)? {
        let p = mesh.point(q)?;
        if !are_collinear(a, b, &p) {
            candidates.push((q, p));
        }
    }
    let Some(&first) = candidates.first() else {
        return Err(HullError::NoWinningCandidate {
            message: format!("every neighbor of {pivot:?} is collinear with bridge {a} {b}"),
        });
    };

    let best = candidates[1..].iter().fold(first, |best, &candidate| {
        if volume6(a, b, &best.1, &candidate.1) < 0 {
            candidate
        } else {
            best
        }
    });
    for &(q, p) in &candidates {
        if q != best.0 && volume6(a, b, &best.1, &p) <= 0 {
            return Err(HullError::NoWinningCandidate {
                message: format!(
                    "candidates {} and {p} tie around bridge {a} {b}",
                    best.1
                ),
            });
        }
    }
    Ok(best)
}

impl MergePass {
    /// Walk the bridge once around both hulls and record the band.
    ///
    /// # Errors
    ///
    /// - [`HullError::BridgeLoop`] if the winner test ties or the walk does
    ///   not return to its seed within `3 (|V(left)| + |V(right)|)` steps
    /// - [`HullError::NoWinningCandidate`] from a candidate scan
    pub fn walk(left: &Mesh, right: &Mesh) -> Result<Self, HullError> {
        let (a0, b0) = seed_bridge(left, right)?;
        let limit = 3 * (left.number_of_vertices() + right.number_of_vertices());
        let mut steps = Vec::new();
        let (mut a, mut b) = (a0, b0);
        loop {
            let (pa, pb) = (left.point(a)?, right.point(b)?);
            let (da, pda) = winning_candidate(left, a, &pa, &pb)?;
            let (db, pdb) = winning_candidate(right, b, &pa, &pb)?;
            let step = match volume6(&pa, &pb, &pda, &pdb).signum() {
                1 => BridgeStep {
                    a,
                    b,
                    apex: da,
                    side: Side::Left,
                },
                -1 => BridgeStep {
                    a,
                    b,
                    apex: db,
                    side: Side::Right,
                },
                _ => {
                    return Err(HullError::BridgeLoop {
                        message: format!(
                            "candidates {pda} and {pdb} are coplanar with bridge {pa} {pb}"
                        ),
                    });
                }
            };
            steps.push(step);
            match step.side {
                Side::Left => a = step.apex,
                Side::Right => b = step.apex,
            }
            if (a, b) == (a0, b0) {
                break;
            }
            if steps.len() >= limit {
                return Err(HullError::BridgeLoop {
                    message: format!("bridge walk did not close after {limit} steps"),
                });
            }
        }

        tracing::debug!(
            "bridge walk closed after {} steps ({} left, {} right advances)",
            steps.len(),
            steps.iter().filter(|s| s.side == Side::Left).count(),
            steps.iter().filter(|s| s.side == Side::Right).count()
        );
        Ok(Self {
            steps,
            ..Self::default()
        })
    }

    /// The band, in walk order.
    #[must_use]
    pub fn steps(&self) -> &[BridgeStep] {
        &self.steps
    }

    /// Color the faces of `mesh` hidden by the band on `side`.
    ///
    /// Each advance on `side` along the seam edge `pivot → apex` marks that
    /// edge purple and seeds red with the face holding `apex → pivot` (left)
    /// or `pivot → apex` (right), the side the band face takes over. Red
    /// then floods across every non-purple edge. A side that never advanced
    /// is hidden entirely.
    fn paint(&mut self, mesh: &Mesh, side: Side) -> Result<(), HullError> {
        let mut paint = Paint::default();
        let mut stack: Vec<FaceKey> = Vec::new();
        for step in self.steps.iter().filter(|s| s.side == side) {
            let (pivot, apex) = match side {
                Side::Left => (step.a, step.apex),
                Side::Right => (step.b, step.apex),
            };
            let e = mesh.require_edge(pivot, apex)?;
            paint.edges.insert(e, Color::Purple);
            let edge = mesh.try_edge(e)?;
            let hidden_origin = match side {
                Side::Left => apex,
                Side::Right => pivot,
            };
            stack.push(if edge.origin() == hidden_origin {
                edge.left()
            } else {
                edge.right()
            });
        }
        if stack.is_empty() {
            stack.extend(mesh.face_keys());
        }

        while let Some(f) = stack.pop() {
            if paint.face(f) == Color::Red {
                continue;
            }
            paint.faces.insert(f, Color::Red);
            for (e, g) in mesh.face_edges(f)?.into_iter().zip(mesh.face_neighbors(f)?) {
                if paint.edge(e) != Color::Purple && paint.face(g) != Color::Red {
                    stack.push(g);
                }
            }
        }

        for (e, edge) in mesh.edges() {
            if paint.edge(e) != Color::Purple
                && paint.face(edge.left()) == Color::Red
                && paint.face(edge.right()) == Color::Red
            {
                paint.edges.insert(e, Color::Red);
            }
        }
        match side {
            Side::Left => self.left = paint,
            Side::Right => self.right = paint,
        }
        Ok(())
    }

    fn paint_for(&self, side: Side) -> &Paint {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    /// Number of faces on `side` colored red.
    #[must_use]
    pub fn red_faces(&self, side: Side) -> usize {
        self.paint_for(side)
            .faces
            .values()
            .filter(|c| **c == Color::Red)
            .count()
    }

    /// Remove the red region of `mesh`, plus every vertex left without an
    /// edge.
    fn discard(&self, mesh: &mut Mesh, side: Side) {
        let paint = self.paint_for(side);
        let band: VertexKeySet = self
            .steps
            .iter()
            .flat_map(|s| {
                let own = match side {
                    Side::Left => s.a,
                    Side::Right => s.b,
                };
                let apex = (s.side == side).then_some(s.apex);
                std::iter::once(own).chain(apex)
            })
            .collect();

        let red_edges: EdgeKeySet = paint
            .edges
            .iter()
            .filter(|(_, c)| **c == Color::Red)
            .map(|(e, _)| e)
            .collect();
        let mut orphans = VertexKeySet::default();
        for e in red_edges {
            if let Some(edge) = mesh.remove_edge(e) {
                orphans.extend([edge.origin(), edge.destination()]);
            }
        }
        for (f, color) in &paint.faces {
            if *color == Color::Red {
                mesh.remove_face(f);
            }
        }
        for v in orphans {
            if !band.contains(&v) {
                mesh.remove_vertex(v);
            }
        }
    }
}

/// Check that every vertex of `left` precedes every vertex of `right` in
/// `(x, y)`.
fn check_separated(left: &Mesh, right: &Mesh) -> Result<(), HullError> {
    let last = left.vertices().map(|(_, v)| v.point()).max_by_key(Point3::xy);
    let first = right.vertices().map(|(_, v)| v.point()).min_by_key(Point3::xy);
    match (last, first) {
        (Some(last), Some(first)) if last.xy() < first.xy() => Ok(()),
        (Some(last), Some(first)) => Err(HullError::InputOrder {
            message: format!("left hull reaches {last}, right hull starts at {first}"),
        }),
        _ => Err(HullError::InputOrder {
            message: format!(
                "cannot merge hulls of {} and {} vertices",
                left.number_of_vertices(),
                right.number_of_vertices()
            ),
        }),
    }
}

/// Merge two hulls, `left` lexicographically below `right` in `(x, y)`.
///
/// Both inputs are consumed. The result reuses `left`'s arenas, so its keys
/// stay valid for surviving left vertices; right vertices are rekeyed.
///
/// # Errors
///
/// - [`HullError::InputOrder`] if some vertex of `left` does not precede
///   every vertex of `right` in `(x, y)`
/// - [`HullError::BridgeLoop`] or [`HullError::NoWinningCandidate`] from the
///   bridge walk; both are recoverable and leave nothing half-built
/// - [`HullError::TopologyIntegrity`] if the splice finds the inputs
///   inconsistent
pub fn merge_hulls(left: Mesh, right: Mesh) -> Result<Mesh, HullError> {
    check_separated(&left, &right)?;
    let mut pass = MergePass::walk(&left, &right)?;
    pass.paint(&left, Side::Left)?;
    pass.paint(&right, Side::Right)?;
    tracing::debug!(
        "merging hulls of {} and {} vertices: {} band faces, {} + {} hidden faces",
        left.number_of_vertices(),
        right.number_of_vertices(),
        pass.steps.len(),
        pass.red_faces(Side::Left),
        pass.red_faces(Side::Right)
    );

    let (mut merged, mut right) = (left, right);
    pass.discard(&mut merged, Side::Left);
    pass.discard(&mut right, Side::Right);
    let vmap = merged.absorb(right)?;
    let rekey = |v: VertexKey| {
        vmap.get(&v).copied().ok_or_else(|| {
            HullError::topology(format!("band vertex {v:?} was discarded from the right hull"))
        })
    };

    let mut band: Vec<(VertexKey, VertexKey, VertexKey)> = Vec::with_capacity(pass.steps.len());
    for step in &pass.steps {
        let b = rekey(step.b)?;
        let apex = match step.side {
            Side::Left => step.apex,
            Side::Right => rekey(step.apex)?,
        };
        merged.attach_face([step.a, b, apex])?;
        band.push((step.a, b, apex));
    }

    let mut changed: Vec<EdgeKey> = Vec::with_capacity(2 * band.len());
    for (step, &(a, b, apex)) in pass.steps.iter().zip(&band) {
        let bridge = merged.require_edge(a, b)?;
        let seam = match step.side {
            Side::Left => merged.require_edge(a, apex)?,
            Side::Right => merged.require_edge(b, apex)?,
        };
        merged.set_vertex_edge(a, bridge)?;
        merged.set_vertex_edge(b, bridge)?;
        changed.push(bridge);
        changed.push(seam);
    }
    merged.relink(changed)?;
    Ok(merged)
}

// =============================================================================
// TESTS
// =============================================================================
