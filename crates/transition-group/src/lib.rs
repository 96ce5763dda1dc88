//! Keyed child transitions for TV-oriented UI components.
//!
//! A [`TransitionGroup`] receives the children a parent currently wants shown,
//! keeps a bounded ordered list of tracked children and runs each of them
//! through appear, enter, stay and leave transitions. Children take part by
//! implementing [`TransitionChild`]; every hook is optional and a missing hook
//! counts as an instantly completed transition.
//!
//! ```
//! use transition_group::{TransitionChild, TransitionGroup, TransitionGroupConfig};
//!
//! #[derive(Clone)]
//! struct Panel(&'static str);
//!
//! impl TransitionChild<u32> for Panel {}
//!
//! let group: TransitionGroup<u32, Panel> =
//!     TransitionGroup::new(TransitionGroupConfig::default()).unwrap();
//! group.update_desired_children([(1, Panel("home"))]).unwrap();
//! group.update_desired_children([(2, Panel("settings"))]).unwrap();
//!
//! assert_eq!(group.tracked_keys(), vec![2]);
//! let rendered = group.render();
//! assert_eq!(rendered.children[0].value.0, "settings");
//! ```

pub mod collections;
pub mod config;
pub mod diff;
pub mod error;
pub mod group;
pub mod hooks;
pub mod limit;
pub mod project;
pub mod switcher;

pub use config::{TransitionGroupConfig, DEFAULT_SIZE};
pub use diff::{classify, merge_children, Classification};
pub use error::GroupError;
pub use group::{ChildKey, Phase, TransitionGroup};
pub use hooks::{Done, TransitionChild, TransitionEvent, TransitionKind};
pub use limit::{limit_children, Limited};
pub use project::{project_children, Container, Keyed, Rendered};
pub use switcher::ViewSwitcher;

pub mod prelude {
    pub use crate::config::TransitionGroupConfig;
    pub use crate::group::{Phase, TransitionGroup};
    pub use crate::hooks::{Done, TransitionChild, TransitionKind};
    pub use crate::switcher::ViewSwitcher;
}
