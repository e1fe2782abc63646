#![warn(missing_docs)]

//! Framework-independent breadcrumb navigation state.
//!
//! Keeps a breadcrumb trail, decides which items are collapsed, tracks
//! expand and undo/redo state, and notifies subscribers about clicks and
//! dropdown selections. Rendering is left to the UI layer.

pub use crumbtrail_breadcrumbs as breadcrumbs;
pub use crumbtrail_core as core;

/// A "prelude" for users of crumbtrail.
///
/// Importing this module brings into scope the most common types
/// needed to drive a breadcrumb trail.
///
/// ```rust
/// use crumbtrail::prelude::*;
///
/// let manager = BreadcrumbManager::new(vec![BreadcrumbItem::new("Home")], BreadcrumbConfig::default()).unwrap();
/// assert_eq!(manager.count(), 1);
/// ```
pub mod prelude {
    pub use crate::breadcrumbs::{
        BreadcrumbConfig, BreadcrumbConfigPatch, BreadcrumbError, BreadcrumbEvent, BreadcrumbEventKind,
        BreadcrumbItem, BreadcrumbItemPatch, BreadcrumbManager, BreadcrumbResult, BreadcrumbState, DropdownItem,
        Link, LinkTarget, NativeEvent, Separator, Size, Snapshot, VisibleItems,
    };
    pub use crate::core::{EmitterOptions, HandlerResult, Subscription};
}
