use std::fmt;
use std::num::NonZeroUsize;
use std::rc::Rc;

use crate::error::GroupError;
use crate::hooks::TransitionEvent;
use crate::project::Container;

/// Default number of simultaneously tracked children: one entering, one leaving.
pub const DEFAULT_SIZE: usize = 2;

/// Configuration of a [`TransitionGroup`](crate::TransitionGroup).
///
/// `K` is the child key, `C` the child payload and `R` what the adapt function
/// turns a payload into for rendering.
pub struct TransitionGroupConfig<K, C, R> {
    size: usize,
    adapt: Rc<dyn Fn(&C) -> R>,
    container: Container,
    listener: Option<Rc<dyn Fn(&TransitionEvent<K>)>>,
}

impl<K, C, R> TransitionGroupConfig<K, C, R> {
    /// Creates a configuration rendering children through `adapt`.
    pub fn new(adapt: impl Fn(&C) -> R + 'static) -> Self {
        Self {
            size: DEFAULT_SIZE,
            adapt: Rc::new(adapt),
            container: Container::default(),
            listener: None,
        }
    }

    /// Maximum number of tracked children. Must be at least 1.
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    /// Replaces the adapt function, changing the renderable type.
    pub fn with_adapt<R2>(self, adapt: impl Fn(&C) -> R2 + 'static) -> TransitionGroupConfig<K, C, R2> {
        TransitionGroupConfig {
            size: self.size,
            adapt: Rc::new(adapt),
            container: self.container,
            listener: self.listener,
        }
    }

    pub fn with_container(mut self, container: Container) -> Self {
        self.container = container;
        self
    }

    /// Registers a listener notified after each completed transition.
    pub fn with_transition_listener(
        mut self,
        listener: impl Fn(&TransitionEvent<K>) + 'static,
    ) -> Self {
        self.listener = Some(Rc::new(listener));
        self
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    pub(crate) fn capacity(&self) -> Result<NonZeroUsize, GroupError> {
        NonZeroUsize::new(self.size).ok_or(GroupError::InvalidSize { size: self.size })
    }

    pub(crate) fn adapt(&self) -> Rc<dyn Fn(&C) -> R> {
        Rc::clone(&self.adapt)
    }

    pub(crate) fn listener(&self) -> Option<Rc<dyn Fn(&TransitionEvent<K>)>> {
        self.listener.clone()
    }
}

impl<K, C: Clone + 'static> Default for TransitionGroupConfig<K, C, C> {
    fn default() -> Self {
        Self::new(C::clone)
    }
}

impl<K, C, R> Clone for TransitionGroupConfig<K, C, R> {
    fn clone(&self) -> Self {
        Self {
            size: self.size,
            adapt: Rc::clone(&self.adapt),
            container: self.container.clone(),
            listener: self.listener.clone(),
        }
    }
}

impl<K, C, R> fmt::Debug for TransitionGroupConfig<K, C, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionGroupConfig")
            .field("size", &self.size)
            .field("container", &self.container)
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}
