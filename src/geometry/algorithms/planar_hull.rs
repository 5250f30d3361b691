//! Planar convex hulls and the lower common tangent of two separated hulls.
//!
//! The divide-and-conquer merge seeds its bridge walk with the lower common
//! tangent of the xy-shadows of its two halves, which it reads off each
//! half's silhouette edges. Both operations here work on any item that can
//! be projected to a [`Site`].
//!
//! Hulls are returned counter-clockwise, starting at the lexicographically
//! smallest site, with collinear boundary points dropped. The tangent search
//! also accepts polygons that keep them.
//!
//! # Examples
//!
//! ```rust
//! use voronoi_hull::geometry::algorithms::planar_hull::convex_hull;
//! use voronoi_hull::geometry::point::Site;
//!
//! let sites = [
//!     Site::new(0, 0),
//!     Site::new(4, 0),
//!     Site::new(2, 0),
//!     Site::new(4, 4),
//!     Site::new(1, 1),
//!     Site::new(0, 4),
//! ];
//! let hull = convex_hull(&sites);
//! assert_eq!(
//!     hull,
//!     vec![Site::new(0, 0), Site::new(4, 0), Site::new(4, 4), Site::new(0, 4)]
//! );
//! ```

use crate::core::mesh::HullError;
use crate::geometry::point::Site;
use crate::geometry::predicates::{Orientation, area2, orientation_2d};

/// Planar convex hull of `items` projected through `site`.
///
/// Andrew's monotone chain. Items projecting to the same site are collapsed
/// to the first one in sorted order.
#[must_use]
pub fn convex_hull_by<T, F>(items: &[T], site: F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T) -> Site,
{
    let mut sorted: Vec<T> = items.to_vec();
    sorted.sort_by_key(&site);
    sorted.dedup_by(|a, b| site(&*a) == site(&*b));
    if sorted.len() < 3 {
        return sorted;
    }

    let turns_left = |hull: &[T], item: &T| {
        let n = hull.len();
        orientation_2d(&site(&hull[n - 2]), &site(&hull[n - 1]), &site(item))
            == Orientation::POSITIVE
    };
    let mut hull: Vec<T> = Vec::with_capacity(sorted.len() + 1);
    for item in &sorted {
        while hull.len() >= 2 && !turns_left(&hull, item) {
            hull.pop();
        }
        hull.push(item.clone());
    }
    let lower = hull.len() + 1;
    for item in sorted.iter().rev().skip(1) {
        while hull.len() >= lower && !turns_left(&hull, item) {
            hull.pop();
        }
        hull.push(item.clone());
    }
    // The upper chain ends at the first site again.
    hull.pop();
    hull
}

/// Planar convex hull of `sites`.
///
/// # Panics
///
/// The orientation determinant is exact for coordinates within
/// [`MAX_COORDINATE`](crate::geometry::point::MAX_COORDINATE). Sites further
/// apart than about 2⁶² can overflow it, which panics in debug builds; check
/// them with [`Site::validate`] first.
#[must_use]
pub fn convex_hull(sites: &[Site]) -> Vec<Site> {
    convex_hull_by(sites, |s| *s)
}

/// Index of the lexicographically largest item.
fn rightmost<T, F: Fn(&T) -> Site>(hull: &[T], site: &F) -> usize {
    (0..hull.len()).max_by_key(|&i| site(&hull[i])).unwrap_or(0)
}

/// Index of the lexicographically smallest item.
fn leftmost<T, F: Fn(&T) -> Site>(hull: &[T], site: &F) -> usize {
    (0..hull.len()).min_by_key(|&i| site(&hull[i])).unwrap_or(0)
}

/// Whether `q` lies strictly inside the segment `pr`, given that the three
/// points are collinear.
fn strictly_between(p: &Site, q: &Site, r: &Site) -> bool {
    let (lo, hi) = if p <= r { (p, r) } else { (r, p) };
    lo < q && q < hi
}

/// Lower common tangent of two counter-clockwise hulls, `left` entirely
/// lexicographically below `right`.
///
/// Returns indices `(a, b)` into `left` and `right` such that every site of
/// both hulls lies on or to the left of the directed line `a → b`. When hull
/// sites are collinear with the tangent, the endpoints nearest each other are
/// chosen.
///
/// # Errors
///
/// Returns [`HullError::BridgeLoop`] if either hull is empty or the search
/// does not settle within `|left| + |right|` moves.
pub fn lower_tangent<T, F>(left: &[T], right: &[T], site: F) -> Result<(usize, usize), HullError>
where
    F: Fn(&T) -> Site,
{
    if left.is_empty() || right.is_empty() {
        return Err(HullError::BridgeLoop {
            message: format!(
                "tangent of hulls with {} and {} sites",
                left.len(),
                right.len()
            ),
        });
    }
    let (na, nb) = (left.len(), right.len());
    let mut a = rightmost(left, &site);
    let mut b = leftmost(right, &site);

    // Whether `q` keeps the tangent from being supporting at the current end.
    let blocks = |pa: &Site, pb: &Site, q: &Site| {
        let turn = area2(pa, pb, q);
        turn < 0 || (turn == 0 && strictly_between(pa, q, pb))
    };

    let mut moves = 0usize;
    loop {
        let mut moved = false;
        while na > 1 {
            let cw = (a + na - 1) % na;
            if !blocks(&site(&left[a]), &site(&right[b]), &site(&left[cw])) {
                break;
            }
            a = cw;
            moved = true;
            moves += 1;
            if moves > na + nb {
                break;
            }
        }
        while nb > 1 {
            let ccw = (b + 1) % nb;
            if !blocks(&site(&left[a]), &site(&right[b]), &site(&right[ccw])) {
                break;
            }
            b = ccw;
            moved = true;
            moves += 1;
            if moves > na + nb {
                break;
            }
        }
        if !moved {
            return Ok((a, b));
        }
        if moves > na + nb {
            return Err(HullError::BridgeLoop {
                message: format!("lower tangent did not settle within {} moves", na + nb),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(x: i64, y: i64) -> Site {
        Site::new(x, y)
    }

    #[test]
    fn test_hull_of_small_inputs() {
        assert!(convex_hull(&[]).is_empty());
        assert_eq!(convex_hull(&[s(1, 1), s(1, 1)]), vec![s(1, 1)]);
        assert_eq!(
            convex_hull(&[s(2, 2), s(0, 0), s(1, 1)]),
            vec![s(0, 0), s(2, 2)]
        );
    }

    #[test]
    fn test_hull_is_ccw_from_min() {
        let hull = convex_hull(&[s(5, 5), s(0, 10), s(10, 0), s(0, 0), s(10, 10), s(3, 7)]);
        assert_eq!(hull, vec![s(0, 0), s(10, 0), s(10, 10), s(0, 10)]);
        for i in 0..hull.len() {
            let (p, q, r) = (hull[i], hull[(i + 1) % 4], hull[(i + 2) % 4]);
            assert!(area2(&p, &q, &r) > 0);
        }
    }

    #[test]
    fn test_hull_by_keeps_payload() {
        let items = [(s(0, 0), 'a'), (s(4, 0), 'b'), (s(2, 3), 'c'), (s(2, 1), 'd')];
        let hull = convex_hull_by(&items, |(site, _)| *site);
        let tags: Vec<char> = hull.iter().map(|(_, t)| *t).collect();
        assert_eq!(tags, vec!['a', 'b', 'c']);
    }

    #[test]
    fn test_lower_tangent_of_two_squares() {
        let left = convex_hull(&[s(0, 0), s(2, 0), s(2, 2), s(0, 2)]);
        let right = convex_hull(&[s(5, -3), s(7, -3), s(7, -1), s(5, -1)]);
        let (a, b) = lower_tangent(&left, &right, |p| *p).unwrap();
        assert_eq!(left[a], s(0, 0));
        assert_eq!(right[b], s(5, -3));
        for p in left.iter().chain(&right) {
            assert!(area2(&left[a], &right[b], p) >= 0);
        }
    }

    #[test]
    fn test_lower_tangent_picks_nearest_collinear_endpoints() {
        let left = convex_hull(&[s(0, 0), s(2, 0), s(1, 3)]);
        let right = convex_hull(&[s(5, 0), s(8, 0), s(6, 4)]);
        let (a, b) = lower_tangent(&left, &right, |p| *p).unwrap();
        assert_eq!((left[a], right[b]), (s(2, 0), s(5, 0)));
    }

    #[test]
    fn test_lower_tangent_rejects_empty_hull() {
        let left = convex_hull(&[s(0, 0), s(1, 0), s(0, 1)]);
        assert!(matches!(
            lower_tangent(&left, &[], |p: &Site| *p),
            Err(HullError::BridgeLoop { .. })
        ));
    }
}
