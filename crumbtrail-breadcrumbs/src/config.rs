// SPDX-License-Identifier: LGPL-3.0-only
//! Breadcrumb trail configuration.
//!
//! [`BreadcrumbConfig`] holds the full configuration, [`BreadcrumbConfigPatch`]
//! a partial update. Both can be loaded from TOML:
//!
//! ```toml
//! separator = "chevron"
//! max_items = 4
//! items_before_collapse = 1
//! items_after_collapse = 2
//! show_home = true
//!
//! [home_item]
//! key = "home"
//! label = "Start"
//! path = "/"
//! ```

use crate::error::BreadcrumbResult;
use crate::item::BreadcrumbItem;
use crate::visibility::CollapseWindow;
use serde::{Deserialize, Serialize};

/// Key reserved for the injected home item.
pub const HOME_KEY: &str = "home";

/// Separator drawn between items.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Separator {
    /// `/`
    #[default]
    Slash,
    /// `>`
    Arrow,
    /// `›`
    Chevron,
    /// `•`
    Dot,
    /// Caller supplied text.
    Custom(String),
}

impl Separator {
    /// The text rendered for this separator.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Slash => "/",
            Self::Arrow => ">",
            Self::Chevron => "›",
            Self::Dot => "•",
            Self::Custom(text) => text,
        }
    }
}

/// Size hint for the rendering layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Size {
    /// Compact.
    Small,
    /// Regular.
    #[default]
    Default,
    /// Spacious.
    Large,
}

/// Breadcrumb trail configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreadcrumbConfig {
    /// Separator between items.
    pub separator: Separator,
    /// Size hint.
    pub size: Size,
    /// Collapse when the trail is longer than this. `0` never collapses.
    pub max_items: usize,
    /// Items kept visible before the collapsed range.
    pub items_before_collapse: usize,
    /// Items kept visible after the collapsed range.
    pub items_after_collapse: usize,
    /// Inject [`BreadcrumbConfig::home_item`] at the front of the trail.
    pub show_home: bool,
    /// The item injected when `show_home` is set.
    pub home_item: BreadcrumbItem,
    /// Whether the last item (the current location) is clickable.
    pub last_item_clickable: bool,
    /// Record undo/redo history.
    pub enable_history: bool,
    /// Maximum number of history entries.
    pub max_history_length: usize,
    /// Listener count per event that triggers a warning. `0` disables the check.
    pub max_listeners: usize,
}

impl Default for BreadcrumbConfig {
    fn default() -> Self {
        Self {
            separator: Separator::default(),
            size: Size::default(),
            max_items: 0,
            items_before_collapse: 1,
            items_after_collapse: 1,
            show_home: false,
            home_item: default_home_item(),
            last_item_clickable: false,
            enable_history: false,
            max_history_length: 50,
            max_listeners: 10,
        }
    }
}

fn default_home_item() -> BreadcrumbItem {
    BreadcrumbItem::new("Home")
        .with_key(HOME_KEY)
        .with_path("/")
        .with_icon("go-home")
}

/// What a [`BreadcrumbConfig::merge`] changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConfigChanges {
    /// `max_items`, `items_before_collapse` or `items_after_collapse` changed.
    pub collapse: bool,
    /// `show_home` or `home_item` changed.
    pub home: bool,
}

impl BreadcrumbConfig {
    /// Parse a configuration from TOML. Missing fields take their defaults.
    pub fn from_toml(content: &str) -> BreadcrumbResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// The collapse window derived from this configuration.
    pub fn collapse_window(&self) -> CollapseWindow {
        CollapseWindow {
            max_items: self.max_items,
            items_before_collapse: self.items_before_collapse,
            items_after_collapse: self.items_after_collapse,
        }
    }

    /// Merge a patch into this configuration.
    pub fn merge(&mut self, patch: BreadcrumbConfigPatch) -> ConfigChanges {
        let before_window = self.collapse_window();
        let before_home = (self.show_home, self.home_item.clone());

        if let Some(separator) = patch.separator {
            self.separator = separator;
        }
        if let Some(size) = patch.size {
            self.size = size;
        }
        if let Some(max_items) = patch.max_items {
            self.max_items = max_items;
        }
        if let Some(before) = patch.items_before_collapse {
            self.items_before_collapse = before;
        }
        if let Some(after) = patch.items_after_collapse {
            self.items_after_collapse = after;
        }
        if let Some(show_home) = patch.show_home {
            self.show_home = show_home;
        }
        if let Some(home_item) = patch.home_item {
            self.home_item = home_item;
        }
        if let Some(last_item_clickable) = patch.last_item_clickable {
            self.last_item_clickable = last_item_clickable;
        }
        if let Some(enable_history) = patch.enable_history {
            self.enable_history = enable_history;
        }
        if let Some(max_history_length) = patch.max_history_length {
            self.max_history_length = max_history_length;
        }
        if let Some(max_listeners) = patch.max_listeners {
            self.max_listeners = max_listeners;
        }

        ConfigChanges {
            collapse: before_window != self.collapse_window(),
            home: before_home.0 != self.show_home || before_home.1 != self.home_item,
        }
    }
}

/// Partial configuration update. `None` leaves a field unchanged.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreadcrumbConfigPatch {
    /// See [`BreadcrumbConfig::separator`].
    pub separator: Option<Separator>,
    /// See [`BreadcrumbConfig::size`].
    pub size: Option<Size>,
    /// See [`BreadcrumbConfig::max_items`].
    pub max_items: Option<usize>,
    /// See [`BreadcrumbConfig::items_before_collapse`].
    pub items_before_collapse: Option<usize>,
    /// See [`BreadcrumbConfig::items_after_collapse`].
    pub items_after_collapse: Option<usize>,
    /// See [`BreadcrumbConfig::show_home`].
    pub show_home: Option<bool>,
    /// See [`BreadcrumbConfig::home_item`].
    pub home_item: Option<BreadcrumbItem>,
    /// See [`BreadcrumbConfig::last_item_clickable`].
    pub last_item_clickable: Option<bool>,
    /// See [`BreadcrumbConfig::enable_history`].
    pub enable_history: Option<bool>,
    /// See [`BreadcrumbConfig::max_history_length`].
    pub max_history_length: Option<usize>,
    /// See [`BreadcrumbConfig::max_listeners`].
    pub max_listeners: Option<usize>,
}

impl BreadcrumbConfigPatch {
    /// Parse a patch from TOML.
    pub fn from_toml(content: &str) -> BreadcrumbResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Set the maximum number of visible items.
    pub fn max_items(mut self, max_items: usize) -> Self {
        self.max_items = Some(max_items);
        self
    }

    /// Set how many items stay visible before the collapsed range.
    pub fn items_before_collapse(mut self, count: usize) -> Self {
        self.items_before_collapse = Some(count);
        self
    }

    /// Set how many items stay visible after the collapsed range.
    pub fn items_after_collapse(mut self, count: usize) -> Self {
        self.items_after_collapse = Some(count);
        self
    }

    /// Toggle home item injection.
    pub fn show_home(mut self, show_home: bool) -> Self {
        self.show_home = Some(show_home);
        self
    }

    /// Replace the home item.
    pub fn home_item(mut self, home_item: BreadcrumbItem) -> Self {
        self.home_item = Some(home_item);
        self
    }

    /// Set the separator.
    pub fn separator(mut self, separator: Separator) -> Self {
        self.separator = Some(separator);
        self
    }

    /// Set whether the last item is clickable.
    pub fn last_item_clickable(mut self, clickable: bool) -> Self {
        self.last_item_clickable = Some(clickable);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_toml_fills_defaults() {
        let config = BreadcrumbConfig::from_toml(
            r#"
            separator = "chevron"
            max_items = 4
            items_after_collapse = 2
            show_home = true

            [home_item]
            key = "home"
            label = "Start"
            path = "/start"
            "#,
        )
        .unwrap();

        assert_eq!(config.separator, Separator::Chevron);
        assert_eq!(config.max_items, 4);
        assert_eq!(config.items_before_collapse, 1);
        assert_eq!(config.items_after_collapse, 2);
        assert_eq!(config.home_item.label, "Start");
        assert_eq!(config.max_history_length, 50);
    }

    #[test]
    fn test_from_toml_rejects_bad_types() {
        assert!(BreadcrumbConfig::from_toml("max_items = \"many\"").is_err());
    }

    #[test]
    fn test_merge_reports_changes() {
        let mut config = BreadcrumbConfig::default();

        let changes = config.merge(BreadcrumbConfigPatch::default().separator(Separator::Arrow));
        assert_eq!(changes, ConfigChanges::default());

        let changes = config.merge(BreadcrumbConfigPatch::default().max_items(3));
        assert!(changes.collapse);
        assert!(!changes.home);

        let changes = config.merge(BreadcrumbConfigPatch::default().show_home(true).max_items(3));
        assert!(!changes.collapse);
        assert!(changes.home);
    }

    #[test]
    fn test_patch_from_toml() {
        let patch = BreadcrumbConfigPatch::from_toml("max_items = 5\nshow_home = false").unwrap();
        assert_eq!(patch.max_items, Some(5));
        assert_eq!(patch.show_home, Some(false));
        assert_eq!(patch.size, None);
    }
}
