// SPDX-License-Identifier: LGPL-3.0-only
//! Breadcrumb and dropdown item model.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Route parameters or query values, in insertion order.
pub type RouteParams = IndexMap<String, String>;

/// Where a link should be opened.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkTarget {
    /// The current browsing context.
    #[default]
    #[serde(rename = "self")]
    SelfTarget,
    /// A new browsing context.
    Blank,
    /// The parent browsing context.
    Parent,
    /// The topmost browsing context.
    Top,
}

/// Resolved navigation target of an item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Link<'a> {
    /// External link.
    Href(&'a str),
    /// Internal route path.
    Path(&'a str),
}

/// Represents a single breadcrumb item in the navigation path
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BreadcrumbItem {
    /// Unique identifier within the owning trail. Empty until normalized.
    pub key: String,
    /// The display text for this breadcrumb
    pub label: String,
    /// Optional icon name
    pub icon: Option<String>,
    /// External link
    pub href: Option<String>,
    /// Internal route path
    pub path: Option<String>,
    /// Route parameters
    pub params: Option<RouteParams>,
    /// Route query
    pub query: Option<RouteParams>,
    /// How the link is opened
    pub target: LinkTarget,
    /// Forces the item to be non-clickable
    pub disabled: bool,
    /// Explicit clickability override. If unset, clickability is derived.
    pub clickable: Option<bool>,
    /// Dropdown entries shown next to this item
    pub children: Vec<DropdownItem>,
    /// Opaque caller data
    pub meta: Option<serde_json::Value>,
    /// Tooltip text
    pub tooltip: Option<String>,
    /// Extra presentation class
    pub class_name: Option<String>,
    /// Inline presentation style
    pub style: Option<String>,
}

impl BreadcrumbItem {
    /// Create a new breadcrumb item
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }

    /// Set the key for this breadcrumb
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Set the icon
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Set the external link
    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }

    /// Set the internal route path
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add a route parameter
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.get_or_insert_with(IndexMap::new).insert(name.into(), value.into());
        self
    }

    /// Add a query value
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.get_or_insert_with(IndexMap::new).insert(name.into(), value.into());
        self
    }

    /// Set the link target
    pub fn with_target(mut self, target: LinkTarget) -> Self {
        self.target = target;
        self
    }

    /// Set whether this breadcrumb is disabled
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Set whether this breadcrumb is clickable
    pub fn with_clickable(mut self, clickable: bool) -> Self {
        self.clickable = Some(clickable);
        self
    }

    /// Add a dropdown entry
    pub fn with_child(mut self, child: DropdownItem) -> Self {
        self.children.push(child);
        self
    }

    /// Set the dropdown entries
    pub fn with_children(mut self, children: Vec<DropdownItem>) -> Self {
        self.children = children;
        self
    }

    /// Attach caller data
    pub fn with_meta(mut self, meta: serde_json::Value) -> Self {
        self.meta = Some(meta);
        self
    }

    /// Set the tooltip
    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    /// Whether the item shows a dropdown affordance.
    pub fn has_dropdown(&self) -> bool {
        !self.children.is_empty()
    }

    /// The navigation target, preferring `href` over `path`.
    pub fn link(&self) -> Option<Link<'_>> {
        resolve_link(self.href.as_deref(), self.path.as_deref())
    }

    /// Apply a patch. The key is never touched.
    pub fn apply(&mut self, patch: BreadcrumbItemPatch) {
        let BreadcrumbItemPatch {
            label,
            icon,
            href,
            path,
            params,
            query,
            target,
            disabled,
            clickable,
            children,
            meta,
            tooltip,
            class_name,
            style,
        } = patch;

        if let Some(label) = label {
            self.label = label;
        }
        if let Some(icon) = icon {
            self.icon = icon;
        }
        if let Some(href) = href {
            self.href = href;
        }
        if let Some(path) = path {
            self.path = path;
        }
        if let Some(params) = params {
            self.params = params;
        }
        if let Some(query) = query {
            self.query = query;
        }
        if let Some(target) = target {
            self.target = target;
        }
        if let Some(disabled) = disabled {
            self.disabled = disabled;
        }
        if let Some(clickable) = clickable {
            self.clickable = clickable;
        }
        if let Some(children) = children {
            self.children = children;
        }
        if let Some(meta) = meta {
            self.meta = meta;
        }
        if let Some(tooltip) = tooltip {
            self.tooltip = tooltip;
        }
        if let Some(class_name) = class_name {
            self.class_name = class_name;
        }
        if let Some(style) = style {
            self.style = style;
        }
    }
}

/// A child navigation target shown in an item's dropdown.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DropdownItem {
    /// Identifier of the entry
    pub key: String,
    /// The display text
    pub label: String,
    /// Optional icon name
    pub icon: Option<String>,
    /// External link
    pub href: Option<String>,
    /// Internal route path
    pub path: Option<String>,
    /// Route parameters
    pub params: Option<RouteParams>,
    /// Route query
    pub query: Option<RouteParams>,
    /// How the link is opened
    pub target: LinkTarget,
    /// Whether the entry can be selected
    pub disabled: bool,
    /// Render a divider before this entry
    pub divider: bool,
    /// Group label used for menu layout
    pub group: Option<String>,
    /// Opaque caller data
    pub meta: Option<serde_json::Value>,
}

impl DropdownItem {
    /// Create a new dropdown entry
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }

    /// Set the key
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Set the internal route path
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Set the external link
    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }

    /// Set whether the entry is disabled
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Render a divider before this entry
    pub fn with_divider(mut self, divider: bool) -> Self {
        self.divider = divider;
        self
    }

    /// Set the group label
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// The navigation target, preferring `href` over `path`.
    pub fn link(&self) -> Option<Link<'_>> {
        resolve_link(self.href.as_deref(), self.path.as_deref())
    }
}

fn resolve_link<'a>(href: Option<&'a str>, path: Option<&'a str>) -> Option<Link<'a>> {
    match (href, path) {
        (Some(href), _) => Some(Link::Href(href)),
        (None, Some(path)) => Some(Link::Path(path)),
        (None, None) => None,
    }
}

/// Partial update for a [`BreadcrumbItem`].
///
/// `None` leaves a field unchanged. Optional fields take `Some(None)` to clear.
/// There is no `key` field: keys are immutable once assigned.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BreadcrumbItemPatch {
    /// New display text.
    pub label: Option<String>,
    /// New icon name, or `Some(None)` to clear.
    pub icon: Option<Option<String>>,
    /// New external link.
    pub href: Option<Option<String>>,
    /// New route path.
    pub path: Option<Option<String>>,
    /// New route parameters.
    pub params: Option<Option<RouteParams>>,
    /// New query parameters.
    pub query: Option<Option<RouteParams>>,
    /// New link target.
    pub target: Option<LinkTarget>,
    /// New disabled flag.
    pub disabled: Option<bool>,
    /// New clickability override; `Some(None)` restores the derived default.
    pub clickable: Option<Option<bool>>,
    /// Replacement dropdown entries.
    pub children: Option<Vec<DropdownItem>>,
    /// New caller data.
    pub meta: Option<Option<serde_json::Value>>,
    /// New tooltip.
    pub tooltip: Option<Option<String>>,
    /// New style class hook.
    pub class_name: Option<Option<String>>,
    /// New inline style hook.
    pub style: Option<Option<String>>,
}

impl BreadcrumbItemPatch {
    /// Create an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the label.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Replace or clear the icon.
    pub fn icon(mut self, icon: Option<String>) -> Self {
        self.icon = Some(icon);
        self
    }

    /// Replace or clear the route path.
    pub fn path(mut self, path: Option<String>) -> Self {
        self.path = Some(path);
        self
    }

    /// Replace or clear the external link.
    pub fn href(mut self, href: Option<String>) -> Self {
        self.href = Some(href);
        self
    }

    /// Set the disabled flag.
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = Some(disabled);
        self
    }

    /// Set or clear the clickability override.
    pub fn clickable(mut self, clickable: Option<bool>) -> Self {
        self.clickable = Some(clickable);
        self
    }

    /// Replace the dropdown entries.
    pub fn children(mut self, children: Vec<DropdownItem>) -> Self {
        self.children = Some(children);
        self
    }

    /// Replace or clear the caller data.
    pub fn meta(mut self, meta: Option<serde_json::Value>) -> Self {
        self.meta = Some(meta);
        self
    }

    /// Replace or clear the tooltip.
    pub fn tooltip(mut self, tooltip: Option<String>) -> Self {
        self.tooltip = Some(tooltip);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_prefers_href() {
        let item = BreadcrumbItem::new("Docs").with_path("/docs").with_href("https://example.org/docs");
        assert_eq!(item.link(), Some(Link::Href("https://example.org/docs")));
        assert_eq!(BreadcrumbItem::new("Docs").with_path("/docs").link(), Some(Link::Path("/docs")));
        assert_eq!(BreadcrumbItem::new("Docs").link(), None);
    }

    #[test]
    fn test_patch_keeps_untouched_fields() {
        let mut item = BreadcrumbItem::new("Projects")
            .with_key("projects")
            .with_icon("folder")
            .with_path("/projects");

        item.apply(BreadcrumbItemPatch::new().label("All projects").icon(None));

        assert_eq!(item.key, "projects");
        assert_eq!(item.label, "All projects");
        assert_eq!(item.icon, None);
        assert_eq!(item.path.as_deref(), Some("/projects"));
    }

    #[test]
    fn test_item_from_json() {
        let item: BreadcrumbItem = serde_json::from_str(
            r#"{"key":"a","label":"A","target":"blank","className":"crumb","children":[{"label":"x","divider":true}]}"#,
        )
        .unwrap();
        assert_eq!(item.target, LinkTarget::Blank);
        assert_eq!(item.class_name.as_deref(), Some("crumb"));
        assert!(item.has_dropdown());
        assert!(item.children[0].divider);
    }
}
