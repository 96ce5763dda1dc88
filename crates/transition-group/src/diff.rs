//! Merging and classification of child collections.
//!
//! [`merge_children`] produces the union of the tracked and desired children and
//! [`classify`] splits the keys of one update cycle into the entering, staying
//! and leaving queues. Both are pure; the driver decides when hooks run.

use std::hash::Hash;

use crate::collections::{OrderedMap, OrderedSet};
use crate::hooks::TransitionKind;

/// Keys of one update cycle, split by the transition they receive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification<K> {
    /// New or revived keys, in desired order.
    pub entering: Vec<K>,
    /// Keys that remain desired and are not transitioning, in desired order.
    pub staying: Vec<K>,
    /// Keys no longer desired, in tracked order.
    pub leaving: Vec<K>,
}

impl<K> Default for Classification<K> {
    fn default() -> Self {
        Self {
            entering: Vec::new(),
            staying: Vec::new(),
            leaving: Vec::new(),
        }
    }
}

impl<K> Classification<K> {
    pub fn is_empty(&self) -> bool {
        self.entering.is_empty() && self.staying.is_empty() && self.leaving.is_empty()
    }
}

/// Unites `tracked` and `desired` children.
///
/// Tracked children keep their relative order; desired children that are not
/// tracked yet are appended in desired order. When a key is present in both,
/// the desired value replaces the tracked one without moving it.
pub fn merge_children<K, T>(
    tracked: impl IntoIterator<Item = (K, T)>,
    desired: impl IntoIterator<Item = (K, T)>,
) -> OrderedMap<K, T>
where
    K: Eq + Hash,
{
    let mut merged: OrderedMap<K, T> = tracked.into_iter().collect();
    for (key, value) in desired {
        merged.insert(key, value);
    }
    merged
}

/// Splits the keys of an update cycle into transition queues.
///
/// * `previous`: keys tracked before the update.
/// * `desired`: keys of the new desired collection.
/// * `kept`: tracked children after capacity limiting; anything missing here
///   was force-dropped and is left out of every queue.
/// * `flight_of`: the transition currently running for a key, if any.
///
/// Keys that are appearing or entering are not queued: they finish their running
/// transition and the completion handler decides whether they stay or leave.
pub fn classify<K, V, F>(
    previous: &OrderedSet<K>,
    desired: &OrderedSet<K>,
    kept: &OrderedMap<K, V>,
    flight_of: F,
) -> Classification<K>
where
    K: Eq + Hash + Clone,
    F: Fn(&K) -> Option<TransitionKind>,
{
    let mut classification = Classification::default();

    for key in desired {
        if !kept.contains_key(key) {
            continue;
        }
        if !previous.contains(key) {
            classification.entering.push(key.clone());
            continue;
        }
        match flight_of(key) {
            None => classification.staying.push(key.clone()),
            Some(TransitionKind::Leave) => classification.entering.push(key.clone()),
            Some(_) => {}
        }
    }

    for key in previous {
        if desired.contains(key) || !kept.contains_key(key) {
            continue;
        }
        if flight_of(key).is_none() {
            classification.leaving.push(key.clone());
        }
    }

    classification
}
