//! Projection of tracked children into renderables.

use std::borrow::Cow;

/// A value tagged with the key of the child it was produced for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyed<K, T> {
    pub key: K,
    pub value: T,
}

impl<K, T> Keyed<K, T> {
    pub fn new(key: K, value: T) -> Self {
        Self { key, value }
    }
}

/// Wrapper the projected children are rendered inside.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Container {
    /// Generic block container.
    #[default]
    Block,
    /// Host specific container, identified by name.
    Named(Cow<'static, str>),
}

impl Container {
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Container::Named(name.into())
    }

    pub fn name(&self) -> &str {
        match self {
            Container::Block => "block",
            Container::Named(name) => name.as_ref(),
        }
    }
}

/// Output of [`TransitionGroup::render`](crate::TransitionGroup::render).
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered<K, R> {
    pub container: Container,
    pub children: Vec<Keyed<K, R>>,
}

impl<K, R> Rendered<K, R> {
    /// Keys of the rendered children, in render order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.children.iter().map(|child| &child.key)
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// Applies `adapt` to every tracked child, preserving order and tagging each
/// result with its key.
pub fn project_children<'a, K, C, R, I, F>(tracked: I, adapt: F) -> Vec<Keyed<K, R>>
where
    K: Clone + 'a,
    C: ?Sized + 'a,
    I: IntoIterator<Item = (&'a K, &'a C)>,
    F: Fn(&C) -> R,
{
    tracked
        .into_iter()
        .map(|(key, child)| Keyed::new(key.clone(), adapt(child)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_keeps_order_and_keys() {
        let tracked = [("a", 1), ("b", 2), ("c", 3)];
        let projected = project_children(tracked.iter().map(|(k, v)| (k, v)), |v: &i32| v * 10);
        assert_eq!(
            projected,
            vec![Keyed::new("a", 10), Keyed::new("b", 20), Keyed::new("c", 30)]
        );
    }

    #[test]
    fn empty_projection_is_empty() {
        let tracked: Vec<(&str, i32)> = Vec::new();
        let projected = project_children(tracked.iter().map(|(k, v)| (k, v)), |v: &i32| *v);
        assert!(projected.is_empty());
    }

    #[test]
    fn default_container_is_block() {
        assert_eq!(Container::default(), Container::Block);
        assert_eq!(Container::default().name(), "block");
        assert_eq!(Container::named("panels").name(), "panels");
    }
}
