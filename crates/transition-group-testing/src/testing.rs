//! Recording children and a scripted harness for exercising a
//! [`TransitionGroup`] from tests.
//!
//! [`RecordingChild`] writes every hook call into a shared [`Journal`]. Whether
//! a `will_*` hook completes on the spot or parks its [`Done`] in
//! [`PendingDones`] is decided per transition kind by a [`DeferPolicy`] that the
//! test can change between updates.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use transition_group::{
    ChildKey, Done, GroupError, Phase, Rendered, TransitionChild, TransitionEvent,
    TransitionGroup, TransitionGroupConfig, TransitionKind,
};

/// A single lifecycle hook.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Hook {
    WillAppear,
    DidAppear,
    WillEnter,
    DidEnter,
    WillStay,
    DidStay,
    WillLeave,
    DidLeave,
}

impl Hook {
    pub fn will(kind: TransitionKind) -> Self {
        match kind {
            TransitionKind::Appear => Hook::WillAppear,
            TransitionKind::Enter => Hook::WillEnter,
            TransitionKind::Stay => Hook::WillStay,
            TransitionKind::Leave => Hook::WillLeave,
        }
    }

    pub fn did(kind: TransitionKind) -> Self {
        match kind {
            TransitionKind::Appear => Hook::DidAppear,
            TransitionKind::Enter => Hook::DidEnter,
            TransitionKind::Stay => Hook::DidStay,
            TransitionKind::Leave => Hook::DidLeave,
        }
    }
}

/// A hook invoked on the child identified by `key`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HookCall<K> {
    pub key: K,
    pub hook: Hook,
}

impl<K> HookCall<K> {
    pub fn new(key: K, hook: Hook) -> Self {
        Self { key, hook }
    }
}

/// Shared, ordered log of hook calls.
pub struct Journal<K> {
    calls: Rc<RefCell<Vec<HookCall<K>>>>,
}

impl<K: Clone + PartialEq> Journal<K> {
    pub fn new() -> Self {
        Self {
            calls: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn record(&self, key: K, hook: Hook) {
        self.calls.borrow_mut().push(HookCall::new(key, hook));
    }

    pub fn calls(&self) -> Vec<HookCall<K>> {
        self.calls.borrow().clone()
    }

    /// Returns the recorded calls and clears the journal.
    pub fn take(&self) -> Vec<HookCall<K>> {
        std::mem::take(&mut *self.calls.borrow_mut())
    }

    /// Hooks received by `key`, in call order.
    pub fn hooks_for(&self, key: &K) -> Vec<Hook> {
        self.calls
            .borrow()
            .iter()
            .filter(|call| &call.key == key)
            .map(|call| call.hook)
            .collect()
    }

    pub fn count(&self, hook: Hook) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| call.hook == hook)
            .count()
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }
}

impl<K: Clone + PartialEq> Default for Journal<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Clone for Journal<K> {
    fn clone(&self) -> Self {
        Self {
            calls: Rc::clone(&self.calls),
        }
    }
}

impl<K: fmt::Debug> fmt::Debug for Journal<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.calls.borrow().iter()).finish()
    }
}

/// Completion handles parked by deferring children.
pub struct PendingDones<K> {
    dones: Rc<RefCell<Vec<Done<K>>>>,
}

impl<K: Clone + PartialEq> PendingDones<K> {
    pub fn new() -> Self {
        Self {
            dones: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn push(&self, done: Done<K>) {
        self.dones.borrow_mut().push(done);
    }

    /// Removes and returns the oldest parked handle for `key` and `kind`.
    pub fn take(&self, key: &K, kind: TransitionKind) -> Option<Done<K>> {
        let mut dones = self.dones.borrow_mut();
        let index = dones
            .iter()
            .position(|done| done.key() == key && done.kind() == kind)?;
        Some(dones.remove(index))
    }

    /// Completes the oldest parked handle for `key` and `kind`. Returns whether
    /// one was found.
    pub fn complete(&self, key: &K, kind: TransitionKind) -> bool {
        match self.take(key, kind) {
            Some(done) => {
                done.complete();
                true
            }
            None => false,
        }
    }

    /// Completes every handle of `kind` parked so far. Handles parked while
    /// completing are left for a later call.
    pub fn complete_all(&self, kind: TransitionKind) -> usize {
        let matching: Vec<Done<K>> = {
            let mut dones = self.dones.borrow_mut();
            let (matching, rest): (Vec<Done<K>>, Vec<Done<K>>) =
                dones.drain(..).partition(|done| done.kind() == kind);
            *dones = rest;
            matching
        };
        for done in &matching {
            done.complete();
        }
        matching.len()
    }

    /// Keys with a parked handle of `kind`, oldest first.
    pub fn keys(&self, kind: TransitionKind) -> Vec<K> {
        self.dones
            .borrow()
            .iter()
            .filter(|done| done.kind() == kind)
            .map(|done| done.key().clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.dones.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.dones.borrow().is_empty()
    }
}

impl<K: Clone + PartialEq> Default for PendingDones<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Clone for PendingDones<K> {
    fn clone(&self) -> Self {
        Self {
            dones: Rc::clone(&self.dones),
        }
    }
}

impl<K: fmt::Debug> fmt::Debug for PendingDones<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.dones.borrow().iter()).finish()
    }
}

/// Which transition kinds park their completion instead of finishing at once.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DeferPolicy {
    pub appear: bool,
    pub enter: bool,
    pub stay: bool,
    pub leave: bool,
}

impl DeferPolicy {
    pub fn immediate() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        Self {
            appear: true,
            enter: true,
            stay: true,
            leave: true,
        }
    }

    pub fn defers(&self, kind: TransitionKind) -> bool {
        match kind {
            TransitionKind::Appear => self.appear,
            TransitionKind::Enter => self.enter,
            TransitionKind::Stay => self.stay,
            TransitionKind::Leave => self.leave,
        }
    }

    pub fn with(mut self, kind: TransitionKind, defer: bool) -> Self {
        match kind {
            TransitionKind::Appear => self.appear = defer,
            TransitionKind::Enter => self.enter = defer,
            TransitionKind::Stay => self.stay = defer,
            TransitionKind::Leave => self.leave = defer,
        }
        self
    }
}

/// A child that journals its hooks and completes according to a shared policy.
pub struct RecordingChild<K> {
    key: K,
    journal: Journal<K>,
    pending: PendingDones<K>,
    policy: Rc<Cell<DeferPolicy>>,
}

impl<K: Clone + PartialEq> RecordingChild<K> {
    pub fn new(
        key: K,
        journal: Journal<K>,
        pending: PendingDones<K>,
        policy: Rc<Cell<DeferPolicy>>,
    ) -> Self {
        Self {
            key,
            journal,
            pending,
            policy,
        }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    fn will(&self, kind: TransitionKind, done: Done<K>) {
        self.journal.record(self.key.clone(), Hook::will(kind));
        if self.policy.get().defers(kind) {
            self.pending.push(done);
        } else {
            done.complete();
        }
    }

    fn did(&self, kind: TransitionKind) {
        self.journal.record(self.key.clone(), Hook::did(kind));
    }
}

impl<K: Clone> Clone for RecordingChild<K> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            journal: self.journal.clone(),
            pending: self.pending.clone(),
            policy: Rc::clone(&self.policy),
        }
    }
}

impl<K: fmt::Debug> fmt::Debug for RecordingChild<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordingChild")
            .field("key", &self.key)
            .field("policy", &self.policy.get())
            .finish()
    }
}

impl<K: Clone + PartialEq> TransitionChild<K> for RecordingChild<K> {
    fn will_appear(&self, done: Done<K>) {
        self.will(TransitionKind::Appear, done);
    }

    fn did_appear(&self) {
        self.did(TransitionKind::Appear);
    }

    fn will_enter(&self, done: Done<K>) {
        self.will(TransitionKind::Enter, done);
    }

    fn did_enter(&self) {
        self.did(TransitionKind::Enter);
    }

    fn will_stay(&self, done: Done<K>) {
        self.will(TransitionKind::Stay, done);
    }

    fn did_stay(&self) {
        self.did(TransitionKind::Stay);
    }

    fn will_leave(&self, done: Done<K>) {
        self.will(TransitionKind::Leave, done);
    }

    fn did_leave(&self) {
        self.did(TransitionKind::Leave);
    }
}

/// A [`TransitionGroup`] of [`RecordingChild`]ren rendered as their keys.
pub struct GroupHarness<K: ChildKey> {
    group: TransitionGroup<K, RecordingChild<K>, K>,
    journal: Journal<K>,
    pending: PendingDones<K>,
    policy: Rc<Cell<DeferPolicy>>,
    events: Rc<RefCell<Vec<TransitionEvent<K>>>>,
    invalidations: Rc<Cell<usize>>,
}

impl<K: ChildKey> GroupHarness<K> {
    /// Builds a harness tracking at most `size` children.
    pub fn new(size: usize) -> Self {
        Self::try_new(size).expect("valid transition group size")
    }

    pub fn try_new(size: usize) -> Result<Self, GroupError> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let config = TransitionGroupConfig::new(|child: &RecordingChild<K>| child.key().clone())
            .with_size(size)
            .with_transition_listener({
                let events = Rc::clone(&events);
                move |event: &TransitionEvent<K>| events.borrow_mut().push(event.clone())
            });
        let group = TransitionGroup::new(config)?;
        let invalidations = Rc::new(Cell::new(0));
        group.set_invalidation_callback({
            let invalidations = Rc::clone(&invalidations);
            move || invalidations.set(invalidations.get() + 1)
        });
        Ok(Self {
            group,
            journal: Journal::new(),
            pending: PendingDones::new(),
            policy: Rc::new(Cell::new(DeferPolicy::immediate())),
            events,
            invalidations,
        })
    }

    /// Builds a child sharing this harness' journal, pending store and policy.
    pub fn child(&self, key: K) -> RecordingChild<K> {
        RecordingChild::new(
            key,
            self.journal.clone(),
            self.pending.clone(),
            Rc::clone(&self.policy),
        )
    }

    pub fn set_policy(&self, policy: DeferPolicy) {
        self.policy.set(policy);
    }

    pub fn defer(&self, kind: TransitionKind) {
        self.policy.set(self.policy.get().with(kind, true));
    }

    pub fn complete_immediately(&self, kind: TransitionKind) {
        self.policy.set(self.policy.get().with(kind, false));
    }

    /// Supplies a desired collection made of fresh children for `keys`.
    pub fn update(&self, keys: &[K]) -> Result<(), GroupError> {
        let children: Vec<(K, RecordingChild<K>)> = keys
            .iter()
            .map(|key| (key.clone(), self.child(key.clone())))
            .collect();
        self.group.update_desired_children(children)
    }

    pub fn complete(&self, key: &K, kind: TransitionKind) -> bool {
        self.pending.complete(key, kind)
    }

    pub fn complete_all(&self, kind: TransitionKind) -> usize {
        self.pending.complete_all(kind)
    }

    pub fn calls(&self) -> Vec<HookCall<K>> {
        self.journal.calls()
    }

    pub fn take_calls(&self) -> Vec<HookCall<K>> {
        self.journal.take()
    }

    pub fn hooks_for(&self, key: &K) -> Vec<Hook> {
        self.journal.hooks_for(key)
    }

    pub fn tracked(&self) -> Vec<K> {
        self.group.tracked_keys()
    }

    pub fn phase(&self, key: &K) -> Option<Phase> {
        self.group.phase(key)
    }

    pub fn render(&self) -> Rendered<K, K> {
        self.group.render()
    }

    /// Keys produced by the render projection, in render order.
    pub fn rendered_keys(&self) -> Vec<K> {
        self.group
            .render()
            .children
            .into_iter()
            .map(|child| child.value)
            .collect()
    }

    pub fn events(&self) -> Vec<TransitionEvent<K>> {
        self.events.borrow().clone()
    }

    pub fn invalidations(&self) -> usize {
        self.invalidations.get()
    }

    pub fn journal(&self) -> &Journal<K> {
        &self.journal
    }

    pub fn pending(&self) -> &PendingDones<K> {
        &self.pending
    }

    pub fn group(&self) -> &TransitionGroup<K, RecordingChild<K>, K> {
        &self.group
    }
}

impl<K: ChildKey> fmt::Debug for GroupHarness<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupHarness")
            .field("group", &self.group)
            .field("pending", &self.pending)
            .field("policy", &self.policy.get())
            .finish()
    }
}

/// Shorthand for building an expected [`HookCall`] sequence.
pub fn call<K>(key: K, hook: Hook) -> HookCall<K> {
    HookCall::new(key, hook)
}
