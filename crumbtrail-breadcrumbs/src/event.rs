// SPDX-License-Identifier: LGPL-3.0-only
//! Events emitted by the breadcrumb manager.

use crate::item::{BreadcrumbItem, DropdownItem};
use crumbtrail_core::Event;
use std::any::Any;
use std::fmt;
use std::rc::Rc;

/// The platform's pointer/keyboard event, forwarded untouched.
///
/// The manager never looks inside; the UI layer can recover its own type with
/// [`NativeEvent::downcast_ref`].
#[derive(Clone)]
pub struct NativeEvent(Rc<dyn Any>);

impl NativeEvent {
    /// Wrap a platform event.
    pub fn new<T: Any>(event: T) -> Self {
        Self(Rc::new(event))
    }

    /// Borrow the wrapped event as `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }
}

impl fmt::Debug for NativeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NativeEvent(..)")
    }
}

/// An item was clicked.
#[derive(Clone, Debug)]
pub struct ClickEvent {
    /// The clicked item.
    pub item: BreadcrumbItem,
    /// Its position in the trail.
    pub index: usize,
    /// The originating platform event.
    pub event: Option<NativeEvent>,
}

/// An entry was chosen from an item's dropdown.
#[derive(Clone, Debug)]
pub struct DropdownSelectEvent {
    /// The item owning the dropdown.
    pub parent_item: BreadcrumbItem,
    /// The chosen entry.
    pub selected_item: DropdownItem,
    /// The originating platform event.
    pub event: Option<NativeEvent>,
}

/// The trail was expanded or collapsed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExpandChangeEvent {
    /// The new expand flag.
    pub expanded: bool,
}

/// Everything the manager notifies subscribers about.
#[derive(Clone, Debug)]
pub enum BreadcrumbEvent {
    /// See [`ClickEvent`].
    Click(ClickEvent),
    /// See [`DropdownSelectEvent`].
    DropdownSelect(DropdownSelectEvent),
    /// See [`ExpandChangeEvent`].
    ExpandChange(ExpandChangeEvent),
}

/// Discriminant of [`BreadcrumbEvent`], used to subscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BreadcrumbEventKind {
    /// `click`
    Click,
    /// `dropdownSelect`
    DropdownSelect,
    /// `expandChange`
    ExpandChange,
}

impl fmt::Display for BreadcrumbEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Click => "click",
            Self::DropdownSelect => "dropdownSelect",
            Self::ExpandChange => "expandChange",
        })
    }
}

impl Event for BreadcrumbEvent {
    type Kind = BreadcrumbEventKind;

    fn kind(&self) -> BreadcrumbEventKind {
        match self {
            Self::Click(_) => BreadcrumbEventKind::Click,
            Self::DropdownSelect(_) => BreadcrumbEventKind::DropdownSelect,
            Self::ExpandChange(_) => BreadcrumbEventKind::ExpandChange,
        }
    }
}
