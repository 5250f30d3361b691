use rustc_hash::{FxBuildHasher, FxHashMap, FxHashSet};
use smallvec::SmallVec;

#[cfg(not(feature = "dense-slotmap"))]
use slotmap::SlotMap;

#[cfg(feature = "dense-slotmap")]
use slotmap::DenseSlotMap;

use crate::core::mesh::{EdgeKey, FaceKey, VertexKey};

// =============================================================================
// STORAGE BACKEND
// =============================================================================

/// Arena backend for the mesh entity collections.
///
/// `DenseSlotMap` is used by default (enabled via the `dense-slotmap` feature);
/// building with `--no-default-features` switches to `SlotMap`. Public APIs
/// never expose the concrete backend: the mesh hands out iterators and keys.
///
/// # Examples
///
/// ```rust,ignore
/// let vertices: StorageMap<VertexKey, Vertex> = StorageMap::with_key();
/// ```
#[cfg(not(feature = "dense-slotmap"))]
pub type StorageMap<K, V> = SlotMap<K, V>;

#[cfg(feature = "dense-slotmap")]
pub type StorageMap<K, V> = DenseSlotMap<K, V>;

// =============================================================================
// CORE OPTIMIZED TYPES
// =============================================================================

/// `HashMap` keyed with `rustc_hash::FxHasher`.
///
/// Keys in this crate are arena keys and integer coordinates, never
/// attacker-controlled data, so a non-cryptographic hasher is appropriate.
///
/// # Examples
///
/// ```rust
/// use voronoi_hull::core::collections::FastHashMap;
///
/// let mut map: FastHashMap<u64, usize> = FastHashMap::default();
/// map.insert(123, 456);
/// assert_eq!(map.get(&123), Some(&456));
/// ```
pub type FastHashMap<K, V> = FxHashMap<K, V>;

/// `HashSet` keyed with `rustc_hash::FxHasher`.
///
/// # Examples
///
/// ```rust
/// use voronoi_hull::core::collections::FastHashSet;
///
/// let mut set: FastHashSet<(i64, i64)> = FastHashSet::default();
/// assert!(set.insert((1, 2)));
/// assert!(!set.insert((1, 2)));
/// ```
pub type FastHashSet<T> = FxHashSet<T>;

/// Build hasher shared by [`FastHashMap`] and [`FastHashSet`].
pub type FastBuildHasher = FxBuildHasher;

/// Small-optimized Vec that stays on the stack for up to `N` elements.
///
/// # Size Guidelines
///
/// - **N=2**: cone-base registrations per vertex
/// - **N=3**: vertices or edges of one triangle
/// - **N=8**: typical vertex degree on a hull
///
/// # Examples
///
/// ```rust
/// use voronoi_hull::core::collections::SmallBuffer;
///
/// let mut buffer: SmallBuffer<i32, 8> = SmallBuffer::new();
/// for i in 0..5 {
///     buffer.push(i);
/// }
/// assert!(!buffer.spilled());
/// ```
pub type SmallBuffer<T, const N: usize> = SmallVec<[T; N]>;

// =============================================================================
// SEMANTIC SIZE CONSTANTS AND TYPE ALIASES
// =============================================================================

/// Inline capacity used for per-vertex edge fans.
///
/// Average degree on a closed triangulated sphere is just under six, so eight
/// covers the common case without spilling.
pub const TYPICAL_VERTEX_DEGREE: usize = 8;

/// Undirected edge lookup: normalized endpoint pair to the edge stored for it.
pub type EdgeIndex = FastHashMap<(VertexKey, VertexKey), EdgeKey>;

/// Key translation table used when one mesh is absorbed into another.
pub type KeyRemap<K> = FastHashMap<K, K>;

/// Set of vertex keys.
pub type VertexKeySet = FastHashSet<VertexKey>;

/// Set of edge keys.
pub type EdgeKeySet = FastHashSet<EdgeKey>;

/// Set of face keys.
pub type FaceKeySet = FastHashSet<FaceKey>;

/// Create a [`FastHashMap`] with pre-allocated capacity.
///
/// # Examples
///
/// ```rust
/// use voronoi_hull::core::collections::{FastHashMap, fast_hash_map_with_capacity};
///
/// let map: FastHashMap<u32, u32> = fast_hash_map_with_capacity(64);
/// assert!(map.capacity() >= 64);
/// ```
#[must_use]
pub fn fast_hash_map_with_capacity<K, V>(capacity: usize) -> FastHashMap<K, V> {
    FastHashMap::with_capacity_and_hasher(capacity, FastBuildHasher::default())
}
