use std::fmt;

use crate::error::GroupError;
use crate::group::{ChildKey, TransitionGroup};
use crate::hooks::TransitionChild;

/// Shows one view out of a list at a time, transitioning between them through
/// a [`TransitionGroup`].
///
/// Selecting a view hands the group a single-child desired collection, so the
/// previous view leaves while the new one enters.
pub struct ViewSwitcher<K, C, R = C> {
    group: TransitionGroup<K, C, R>,
    views: Vec<(K, C)>,
    selected: Option<usize>,
}

impl<K, C, R> ViewSwitcher<K, C, R>
where
    K: ChildKey,
    C: TransitionChild<K> + Clone + 'static,
    R: 'static,
{
    pub fn new(group: TransitionGroup<K, C, R>, views: impl IntoIterator<Item = (K, C)>) -> Self {
        Self {
            group,
            views: views.into_iter().collect(),
            selected: None,
        }
    }

    /// Transitions to the view at `index`.
    pub fn select(&mut self, index: usize) -> Result<(), GroupError> {
        let view = self
            .views
            .get(index)
            .cloned()
            .ok_or(GroupError::IndexOutOfRange {
                index,
                len: self.views.len(),
            })?;
        self.group.update_desired_children([view])?;
        self.selected = Some(index);
        Ok(())
    }

    /// Transitions every view out.
    pub fn clear(&mut self) -> Result<(), GroupError> {
        self.group.update_desired_children(std::iter::empty())?;
        self.selected = None;
        Ok(())
    }

    /// Replaces the view list.
    ///
    /// The current selection is kept, with its refreshed payload, when its index
    /// is still valid; otherwise every view transitions out.
    pub fn set_views(&mut self, views: impl IntoIterator<Item = (K, C)>) -> Result<(), GroupError> {
        self.views = views.into_iter().collect();
        match self.selected {
            Some(index) if index < self.views.len() => self.select(index),
            Some(_) => self.clear(),
            None => Ok(()),
        }
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_key(&self) -> Option<&K> {
        self.selected
            .and_then(|index| self.views.get(index))
            .map(|(key, _)| key)
    }

    pub fn views(&self) -> &[(K, C)] {
        &self.views
    }

    pub fn group(&self) -> &TransitionGroup<K, C, R> {
        &self.group
    }
}

impl<K: fmt::Debug, C, R> fmt::Debug for ViewSwitcher<K, C, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewSwitcher")
            .field("views", &self.views.iter().map(|(key, _)| key).collect::<Vec<_>>())
            .field("selected", &self.selected)
            .field("group", &self.group)
            .finish()
    }
}
