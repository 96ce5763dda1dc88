//! Capacity limiting for tracked children.

use std::hash::Hash;
use std::num::NonZeroUsize;

use crate::collections::OrderedMap;

/// Result of [`limit_children`].
#[derive(Debug)]
pub struct Limited<K, T> {
    /// Children that remain tracked, in their original order.
    pub kept: OrderedMap<K, T>,
    /// Evicted children, oldest first.
    pub dropped: Vec<(K, T)>,
}

/// Keeps at most `capacity` children, evicting the earliest entries.
///
/// Eviction is unconditional: the caller is expected to forget any running
/// transition of a dropped child without notifying it.
pub fn limit_children<K, T>(mut merged: OrderedMap<K, T>, capacity: NonZeroUsize) -> Limited<K, T>
where
    K: Eq + Hash,
{
    let excess = merged.len().saturating_sub(capacity.get());
    let dropped = if excess == 0 {
        Vec::new()
    } else {
        merged.drain(..excess).collect()
    };
    Limited {
        kept: merged,
        dropped,
    }
}

#[cfg(test)]
#[path = "tests/limit_tests.rs"]
mod tests;
