//! Map aliases used by the coordinator.
//!
//! Unordered bookkeeping goes through `hashbrown`, ordered keyed storage through
//! `indexmap` hashed with `ahash`. The `std-hash` feature swaps both hashers for
//! the standard library ones.

use indexmap::{IndexMap, IndexSet};

#[cfg(feature = "std-hash")]
pub mod map {
    pub use std::collections::{HashMap, HashSet};

    pub type KeyHasher = std::collections::hash_map::RandomState;
}

#[cfg(not(feature = "std-hash"))]
pub mod map {
    pub use hashbrown::{HashMap, HashSet};

    pub type KeyHasher = ahash::RandomState;
}

/// Insertion-ordered map keyed by child key.
pub type OrderedMap<K, V> = IndexMap<K, V, map::KeyHasher>;

/// Insertion-ordered set of child keys.
pub type OrderedSet<K> = IndexSet<K, map::KeyHasher>;
