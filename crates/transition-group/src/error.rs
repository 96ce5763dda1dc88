use std::fmt;

/// Errors reported by [`TransitionGroup`](crate::TransitionGroup) and
/// [`ViewSwitcher`](crate::ViewSwitcher).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupError {
    /// The configured capacity was zero.
    InvalidSize { size: usize },
    /// The group was disposed and no longer accepts updates.
    Disposed,
    /// A view index outside the switcher's view list was selected.
    IndexOutOfRange { index: usize, len: usize },
}

impl fmt::Display for GroupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupError::InvalidSize { size } => {
                write!(f, "transition group size must be at least 1, got {size}")
            }
            GroupError::Disposed => write!(f, "transition group was disposed"),
            GroupError::IndexOutOfRange { index, len } => {
                write!(f, "view index {index} out of range for {len} views")
            }
        }
    }
}

impl std::error::Error for GroupError {}
