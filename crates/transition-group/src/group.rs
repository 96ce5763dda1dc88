//! The transition coordinator.
//!
//! [`TransitionGroup`] tracks an ordered, capacity-bounded set of keyed children
//! and drives each of them through appear/enter/stay/leave transitions as the
//! host supplies new desired collections.
//!
//! An update cycle runs in three steps:
//!
//! 1. merge the tracked and desired children, force-drop the oldest excess
//!    entries and classify the remaining keys;
//! 2. commit the tracked state, record the new flights and notify the
//!    invalidation callback so the host re-renders;
//! 3. invoke the `will_*` hooks: every enter first, then every stay, then every
//!    leave.
//!
//! Completions arrive through [`Done`] handles. Each queued hook and each
//! completion is checked against the current flight and stay tables before it
//! takes effect, which keeps nested updates issued from inside hooks consistent.

use std::cell::RefCell;
use std::fmt;
use std::hash::Hash;
use std::mem;
use std::num::NonZeroUsize;
use std::rc::{Rc, Weak};

use crate::collections::map::HashMap;
use crate::collections::{OrderedMap, OrderedSet};
use crate::config::TransitionGroupConfig;
use crate::diff::{classify, merge_children};
use crate::error::GroupError;
use crate::hooks::{CompletionSink, Done, TransitionChild, TransitionEvent, TransitionKind};
use crate::limit::{limit_children, Limited};
use crate::project::{project_children, Container, Rendered};

/// Requirements on child keys.
pub trait ChildKey: Clone + Eq + Hash + fmt::Debug + 'static {}

impl<T: Clone + Eq + Hash + fmt::Debug + 'static> ChildKey for T {}

/// Lifecycle phase of a tracked child.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    Appearing,
    Entering,
    Staying,
    Leaving,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Flight {
    kind: TransitionKind,
    token: u64,
}

/// A hook invocation queued during an update cycle.
#[derive(Clone, Debug)]
struct Pending<K> {
    key: K,
    kind: TransitionKind,
    token: u64,
}

struct GroupState<K, C> {
    children: OrderedMap<K, Rc<C>>,
    desired: OrderedSet<K>,
    flights: HashMap<K, Flight>,
    /// Token of the latest stay issued to a key that is not in flight.
    stays: HashMap<K, u64>,
    mounted: bool,
    disposed: bool,
    next_token: u64,
    revision: u64,
}

impl<K: ChildKey, C> GroupState<K, C> {
    fn new() -> Self {
        Self {
            children: OrderedMap::default(),
            desired: OrderedSet::default(),
            flights: HashMap::new(),
            stays: HashMap::new(),
            mounted: false,
            disposed: false,
            next_token: 0,
            revision: 0,
        }
    }

    /// Queues a transition for `key`, recording its flight right away.
    fn issue(&mut self, key: &K, kind: TransitionKind) -> Pending<K> {
        self.next_token += 1;
        let token = self.next_token;
        if kind.occupies_flight() {
            self.stays.remove(key);
            self.flights.insert(key.clone(), Flight { kind, token });
        } else {
            self.stays.insert(key.clone(), token);
        }
        Pending {
            key: key.clone(),
            kind,
            token,
        }
    }

    /// Whether a queued invocation still matches the current state.
    fn is_current(&self, pending: &Pending<K>) -> bool {
        if !self.children.contains_key(&pending.key) {
            return false;
        }
        let flight = self.flights.get(&pending.key);
        if pending.kind.occupies_flight() {
            flight
                == Some(&Flight {
                    kind: pending.kind,
                    token: pending.token,
                })
        } else {
            flight.is_none() && self.stays.get(&pending.key) == Some(&pending.token)
        }
    }

    /// Forgets every transition bookkeeping entry of `key`.
    fn forget(&mut self, key: &K) -> bool {
        self.stays.remove(key);
        self.flights.remove(key).is_some()
    }

    fn flight_kind(&self, key: &K) -> Option<TransitionKind> {
        self.flights.get(key).map(|flight| flight.kind)
    }

    fn phase(&self, key: &K) -> Option<Phase> {
        if !self.children.contains_key(key) {
            return None;
        }
        Some(match self.flight_kind(key) {
            Some(TransitionKind::Appear) => Phase::Appearing,
            Some(TransitionKind::Enter) => Phase::Entering,
            Some(TransitionKind::Leave) => Phase::Leaving,
            Some(TransitionKind::Stay) | None => Phase::Staying,
        })
    }
}

struct GroupInner<K, C, R> {
    capacity: NonZeroUsize,
    adapt: Rc<dyn Fn(&C) -> R>,
    container: Container,
    listener: Option<Rc<dyn Fn(&TransitionEvent<K>)>>,
    state: RefCell<GroupState<K, C>>,
    invalidation: RefCell<Option<Rc<dyn Fn()>>>,
    this: Weak<Self>,
}

impl<K, C, R> GroupInner<K, C, R>
where
    K: ChildKey,
    C: TransitionChild<K> + 'static,
    R: 'static,
{
    fn sink(&self) -> Weak<dyn CompletionSink<K>> {
        let this: Weak<Self> = self.this.clone();
        this
    }

    fn update(&self, children: Vec<(K, Rc<C>)>) -> Result<(), GroupError> {
        // Payloads replaced or evicted below are released only after the state
        // borrow ends, so a child's Drop may safely call back into the group.
        let mut released: Vec<Rc<C>> = children.iter().map(|(_, child)| Rc::clone(child)).collect();

        let queue = {
            let mut state = self.state.borrow_mut();
            if state.disposed {
                return Err(GroupError::Disposed);
            }
            let initial = !state.mounted;
            state.mounted = true;

            let mut desired = OrderedSet::default();
            for (key, _) in &children {
                if !desired.insert(key.clone()) {
                    log::warn!("transition group: duplicate key {key:?} in desired children");
                }
            }

            let previous: OrderedSet<K> = state.children.keys().cloned().collect();
            released.extend(state.children.values().cloned());
            let tracked = mem::take(&mut state.children);
            let Limited { kept, dropped } =
                limit_children(merge_children(tracked, children), self.capacity);

            for (key, child) in dropped {
                if state.forget(&key) {
                    log::debug!("transition group: force-dropped {key:?} while in flight");
                } else {
                    log::debug!("transition group: force-dropped {key:?}");
                }
                released.push(child);
            }

            let mut queue = Vec::with_capacity(kept.len() + previous.len());
            if initial {
                for key in kept.keys() {
                    queue.push(state.issue(key, TransitionKind::Appear));
                }
            } else {
                let classification =
                    classify(&previous, &desired, &kept, |key| state.flight_kind(key));
                for key in &classification.entering {
                    queue.push(state.issue(key, TransitionKind::Enter));
                }
                for key in &classification.staying {
                    queue.push(state.issue(key, TransitionKind::Stay));
                }
                for key in &classification.leaving {
                    queue.push(state.issue(key, TransitionKind::Leave));
                }
            }

            state.children = kept;
            state.desired = desired;
            state.revision += 1;
            log::debug!(
                "transition group: revision {} tracks {} children, {} transitions queued",
                state.revision,
                state.children.len(),
                queue.len()
            );
            queue
        };
        drop(released);

        self.notify_invalidated();
        for pending in queue {
            self.begin(pending);
        }
        Ok(())
    }

    fn begin(&self, pending: Pending<K>) {
        let child = {
            let state = self.state.borrow();
            if !state.is_current(&pending) {
                log::trace!(
                    "transition group: skipping superseded {:?} for {:?}",
                    pending.kind,
                    pending.key
                );
                return;
            }
            state.children.get(&pending.key).cloned()
        };
        let Some(child) = child else {
            return;
        };

        log::trace!("transition group: will {:?} {:?}", pending.kind, pending.key);
        let done = Done::new(self.sink(), pending.key, pending.kind, pending.token);
        match pending.kind {
            TransitionKind::Appear => child.will_appear(done),
            TransitionKind::Enter => child.will_enter(done),
            TransitionKind::Stay => child.will_stay(done),
            TransitionKind::Leave => child.will_leave(done),
        }
    }

    fn finish_arrival(&self, key: &K, kind: TransitionKind, child: Rc<C>) {
        if kind == TransitionKind::Appear {
            child.did_appear();
        } else {
            child.did_enter();
        }
        self.emit(key, kind);

        let pending = {
            let mut state = self.state.borrow_mut();
            let settled = state.children.contains_key(key) && !state.flights.contains_key(key);
            if settled && !state.desired.contains(key) {
                log::debug!("transition group: {key:?} no longer desired after {kind:?}");
                Some(state.issue(key, TransitionKind::Leave))
            } else {
                None
            }
        };
        if let Some(pending) = pending {
            self.begin(pending);
        }
    }

    fn finish_leave(&self, key: &K, token: u64, child: Rc<C>) {
        child.did_leave();
        self.emit(key, TransitionKind::Leave);

        let removed = {
            let mut state = self.state.borrow_mut();
            let flight = Flight {
                kind: TransitionKind::Leave,
                token,
            };
            if state.flights.get(key) != Some(&flight) {
                // Revived or dropped while `did_leave` ran.
                None
            } else {
                state.forget(key);
                let removed = state.children.shift_remove(key);
                state.revision += 1;
                removed
            }
        };
        if removed.is_some() {
            log::trace!("transition group: removed {key:?}");
            drop(removed);
            self.notify_invalidated();
        }
    }

    fn emit(&self, key: &K, kind: TransitionKind) {
        if let Some(listener) = &self.listener {
            listener(&TransitionEvent {
                key: key.clone(),
                kind,
            });
        }
    }

    fn notify_invalidated(&self) {
        let callback = self.invalidation.borrow().clone();
        if let Some(callback) = callback {
            callback();
        }
    }

    fn dispose(&self) {
        let children = {
            let mut state = self.state.borrow_mut();
            if state.disposed {
                return;
            }
            state.disposed = true;
            state.flights.clear();
            state.stays.clear();
            state.desired.clear();
            state.revision += 1;
            mem::take(&mut state.children)
        };
        log::debug!("transition group: disposed with {} children", children.len());
        drop(children);
        self.notify_invalidated();
    }
}

impl<K, C, R> CompletionSink<K> for GroupInner<K, C, R>
where
    K: ChildKey,
    C: TransitionChild<K> + 'static,
    R: 'static,
{
    fn complete(&self, key: &K, kind: TransitionKind, token: u64) {
        let child = {
            let mut state = self.state.borrow_mut();
            let Some(child) = state.children.get(key).cloned() else {
                log::trace!("transition group: ignoring {kind:?} completion for untracked {key:?}");
                return;
            };
            if kind.occupies_flight() {
                let flight = Flight { kind, token };
                if state.flights.get(key) != Some(&flight) {
                    log::trace!("transition group: ignoring stale {kind:?} completion for {key:?}");
                    return;
                }
                if kind != TransitionKind::Leave {
                    state.flights.remove(key);
                }
            } else {
                let current = !state.flights.contains_key(key) && state.stays.get(key) == Some(&token);
                if !current {
                    log::trace!("transition group: ignoring stale stay completion for {key:?}");
                    return;
                }
                state.stays.remove(key);
            }
            child
        };

        log::trace!("transition group: did {kind:?} {key:?}");
        match kind {
            TransitionKind::Appear | TransitionKind::Enter => self.finish_arrival(key, kind, child),
            TransitionKind::Stay => {
                child.did_stay();
                self.emit(key, kind);
            }
            TransitionKind::Leave => self.finish_leave(key, token, child),
        }
    }
}

/// Coordinates keyed children through their enter/stay/leave transitions.
///
/// The handle is cheap to clone; clones share one coordinator, which lets hooks
/// keep a handle and push new desired collections from inside a callback.
pub struct TransitionGroup<K, C, R = C> {
    inner: Rc<GroupInner<K, C, R>>,
}

impl<K, C, R> TransitionGroup<K, C, R>
where
    K: ChildKey,
    C: TransitionChild<K> + 'static,
    R: 'static,
{
    /// Creates an unmounted group. The first desired collection appears, later
    /// ones enter.
    pub fn new(config: TransitionGroupConfig<K, C, R>) -> Result<Self, GroupError> {
        let capacity = config.capacity()?;
        let inner = Rc::new_cyclic(|this| GroupInner {
            capacity,
            adapt: config.adapt(),
            container: config.container().clone(),
            listener: config.listener(),
            state: RefCell::new(GroupState::new()),
            invalidation: RefCell::new(None),
            this: this.clone(),
        });
        Ok(Self { inner })
    }

    /// Supplies the collection of children the host currently wants rendered.
    pub fn update_desired_children<I>(&self, children: I) -> Result<(), GroupError>
    where
        I: IntoIterator<Item = (K, C)>,
    {
        let children = children
            .into_iter()
            .map(|(key, child)| (key, Rc::new(child)))
            .collect();
        self.inner.update(children)
    }

    /// Projects the tracked children through the adapt function.
    pub fn render(&self) -> Rendered<K, R> {
        let snapshot: Vec<(K, Rc<C>)> = self
            .inner
            .state
            .borrow()
            .children
            .iter()
            .map(|(key, child)| (key.clone(), Rc::clone(child)))
            .collect();
        let adapt = &self.inner.adapt;
        Rendered {
            container: self.inner.container.clone(),
            children: project_children(
                snapshot.iter().map(|(key, child)| (key, &**child)),
                |child| adapt(child),
            ),
        }
    }

    /// Registers the callback invoked whenever the tracked children change.
    pub fn set_invalidation_callback(&self, callback: impl Fn() + 'static) {
        *self.inner.invalidation.borrow_mut() = Some(Rc::new(callback));
    }

    /// Drops every child without running hooks. Later updates fail with
    /// [`GroupError::Disposed`] and outstanding completions are ignored.
    pub fn dispose(&self) {
        self.inner.dispose();
    }

    /// Tracked keys in render order.
    pub fn tracked_keys(&self) -> Vec<K> {
        self.inner.state.borrow().children.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.state.borrow().children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.state.borrow().children.is_empty()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.inner.state.borrow().children.contains_key(key)
    }

    /// Current phase of `key`, or `None` if it is not tracked.
    pub fn phase(&self, key: &K) -> Option<Phase> {
        self.inner.state.borrow().phase(key)
    }

    pub fn is_in_flight(&self, key: &K) -> bool {
        self.inner.state.borrow().flights.contains_key(key)
    }

    /// Keys awaiting a completion, in render order.
    pub fn in_flight_keys(&self) -> Vec<K> {
        let state = self.inner.state.borrow();
        state
            .children
            .keys()
            .filter(|key| state.flights.contains_key(*key))
            .cloned()
            .collect()
    }

    pub fn capacity(&self) -> usize {
        self.inner.capacity.get()
    }

    pub fn container(&self) -> &Container {
        &self.inner.container
    }

    /// Counter bumped on every change of the tracked children.
    pub fn revision(&self) -> u64 {
        self.inner.state.borrow().revision
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.state.borrow().mounted
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.state.borrow().disposed
    }
}

impl<K, C, R> Clone for TransitionGroup<K, C, R> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<K: fmt::Debug, C, R> fmt::Debug for TransitionGroup<K, C, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("TransitionGroup")
            .field("capacity", &self.inner.capacity)
            .field("children", &state.children.keys().collect::<Vec<_>>())
            .field("flights", &state.flights.len())
            .field("revision", &state.revision)
            .field("disposed", &state.disposed)
            .finish()
    }
}
