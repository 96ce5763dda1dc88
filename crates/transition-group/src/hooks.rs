//! Hook surface exposed by transitioning children.

use std::cell::Cell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Kind of lifecycle transition a child goes through.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TransitionKind {
    /// First appearance of a child present in the initial collection.
    Appear,
    /// A child added by a later update, or revived while leaving.
    Enter,
    /// A child that remains desired across an update.
    Stay,
    /// A child no longer desired.
    Leave,
}

impl TransitionKind {
    /// Whether the child is considered in flight while this transition runs.
    pub fn occupies_flight(self) -> bool {
        !matches!(self, TransitionKind::Stay)
    }
}

/// Notification delivered to the group's transition listener once a child
/// finished a transition and its `did_*` hook has run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransitionEvent<K> {
    pub key: K,
    pub kind: TransitionKind,
}

/// Lifecycle hooks of a child managed by a [`TransitionGroup`](crate::TransitionGroup).
///
/// Every hook is optional. The default `will_*` implementations complete the
/// transition immediately, so a child that overrides nothing moves through its
/// lifecycle synchronously.
///
/// A `will_*` hook must eventually call [`Done::complete`] exactly once, even
/// when the child is torn down early. A transition that never completes keeps
/// its key in flight.
pub trait TransitionChild<K> {
    fn will_appear(&self, done: Done<K>) {
        done.complete();
    }

    fn did_appear(&self) {}

    fn will_enter(&self, done: Done<K>) {
        done.complete();
    }

    fn did_enter(&self) {}

    fn will_stay(&self, done: Done<K>) {
        done.complete();
    }

    fn did_stay(&self) {}

    fn will_leave(&self, done: Done<K>) {
        done.complete();
    }

    fn did_leave(&self) {}
}

impl<K, T: TransitionChild<K> + ?Sized> TransitionChild<K> for Rc<T> {
    fn will_appear(&self, done: Done<K>) {
        (**self).will_appear(done);
    }

    fn did_appear(&self) {
        (**self).did_appear();
    }

    fn will_enter(&self, done: Done<K>) {
        (**self).will_enter(done);
    }

    fn did_enter(&self) {
        (**self).did_enter();
    }

    fn will_stay(&self, done: Done<K>) {
        (**self).will_stay(done);
    }

    fn did_stay(&self) {
        (**self).did_stay();
    }

    fn will_leave(&self, done: Done<K>) {
        (**self).will_leave(done);
    }

    fn did_leave(&self) {
        (**self).did_leave();
    }
}

/// Receiver of completion signals; implemented by the group internals.
pub(crate) trait CompletionSink<K> {
    fn complete(&self, key: &K, kind: TransitionKind, token: u64);
}

struct DoneInner<K> {
    sink: Weak<dyn CompletionSink<K>>,
    key: K,
    kind: TransitionKind,
    token: u64,
    fired: Cell<bool>,
}

/// Single-shot completion handle passed to `will_*` hooks.
///
/// Clones share one completion: only the first [`complete`](Done::complete)
/// across all clones reaches the group. A handle whose transition was superseded
/// (revived, force-dropped, disposed) completes into nothing.
pub struct Done<K> {
    inner: Rc<DoneInner<K>>,
}

impl<K> Done<K> {
    pub(crate) fn new(
        sink: Weak<dyn CompletionSink<K>>,
        key: K,
        kind: TransitionKind,
        token: u64,
    ) -> Self {
        Self {
            inner: Rc::new(DoneInner {
                sink,
                key,
                kind,
                token,
                fired: Cell::new(false),
            }),
        }
    }

    /// Signals that the transition finished.
    pub fn complete(&self) {
        if self.inner.fired.replace(true) {
            return;
        }
        if let Some(sink) = self.inner.sink.upgrade() {
            sink.complete(&self.inner.key, self.inner.kind, self.inner.token);
        }
    }

    pub fn is_completed(&self) -> bool {
        self.inner.fired.get()
    }

    pub fn key(&self) -> &K {
        &self.inner.key
    }

    pub fn kind(&self) -> TransitionKind {
        self.inner.kind
    }
}

impl<K> Clone for Done<K> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<K: fmt::Debug> fmt::Debug for Done<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Done")
            .field("key", &self.inner.key)
            .field("kind", &self.inner.kind)
            .field("token", &self.inner.token)
            .field("completed", &self.inner.fired.get())
            .finish()
    }
}
