#![warn(missing_docs)]

//! Breadcrumb trail state for crumbtrail => See the `crumbtrail` crate for more.
//!
//! The breadcrumb trail provides users with an easy way to navigate within
//! folder structures, web pages, or documentation, and trace their way back
//! to parent levels. This crate holds the framework-independent part: the
//! item model, collapsing, history and event dispatch. Drawing is left to the
//! UI layer, which reads [`BreadcrumbManager::visible_items`] and forwards
//! user input to the `handle_*` methods.

/// Contains the [BreadcrumbConfig](config::BreadcrumbConfig) struct.
pub mod config;

/// Contains the [BreadcrumbError](error::BreadcrumbError) type.
pub mod error;

/// Contains the events emitted by the manager.
pub mod event;

/// Contains snapshots and the undo/redo stack.
pub mod history;

/// Contains the breadcrumb and dropdown item model.
pub mod item;

/// Contains the [BreadcrumbManager](manager::BreadcrumbManager).
pub mod manager;

/// Contains key assignment for new items.
pub mod normalize;

/// Contains the collapse calculation.
pub mod visibility;

pub use config::{BreadcrumbConfig, BreadcrumbConfigPatch, ConfigChanges, Separator, Size, HOME_KEY};
pub use error::{BreadcrumbError, BreadcrumbResult};
pub use event::{
    BreadcrumbEvent, BreadcrumbEventKind, ClickEvent, DropdownSelectEvent, ExpandChangeEvent, NativeEvent,
};
pub use history::{History, Snapshot};
pub use item::{BreadcrumbItem, BreadcrumbItemPatch, DropdownItem, Link, LinkTarget, RouteParams};
pub use manager::{Batch, BreadcrumbManager, BreadcrumbState};
pub use normalize::normalize_items;
pub use visibility::{calculate_visible_items, CollapseWindow, VisibleItems};
