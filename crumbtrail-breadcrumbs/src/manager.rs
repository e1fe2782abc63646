// SPDX-License-Identifier: LGPL-3.0-only
//! # Breadcrumb Manager
//!
//! [`BreadcrumbManager`] is the single source of truth for a breadcrumb trail.
//! It owns the item list, the expand flag, the visible partition and a version
//! counter, and optionally keeps an undo/redo history of snapshots.
//!
//! Every committed change bumps [`BreadcrumbManager::version`], so renderers
//! can detect changes without comparing items. All query methods hand out
//! owned copies; mutating them never affects the manager.
//!
//! ### Usage Examples
//!
//! ```rust
//! use crumbtrail_breadcrumbs::{BreadcrumbConfig, BreadcrumbItem, BreadcrumbManager};
//!
//! let config = BreadcrumbConfig {
//!     max_items: 3,
//!     enable_history: true,
//!     ..Default::default()
//! };
//! let mut manager = BreadcrumbManager::new(
//!     vec![
//!         BreadcrumbItem::new("Home").with_key("home").with_path("/"),
//!         BreadcrumbItem::new("Documents").with_path("/docs"),
//!     ],
//!     config,
//! )
//! .unwrap();
//!
//! manager.on_click(|event| {
//!     println!("Navigate to: {:?}", event.item.link());
//!     Ok(())
//! });
//!
//! manager.add_item(BreadcrumbItem::new("Projects").with_path("/docs/projects"), None).unwrap();
//! assert_eq!(manager.count(), 3);
//! manager.undo().unwrap();
//! assert_eq!(manager.count(), 2);
//! ```
//!
//! ### Reentrancy
//!
//! Handlers run while the manager is borrowed by the emitting call. A handler
//! that needs to mutate the trail in response to an event has to defer that
//! work (for example by queueing it) instead of calling back into the manager.

use crate::config::{BreadcrumbConfig, BreadcrumbConfigPatch, HOME_KEY};
use crate::error::{BreadcrumbError, BreadcrumbResult};
use crate::event::{
    BreadcrumbEvent, BreadcrumbEventKind, ClickEvent, DropdownSelectEvent, ExpandChangeEvent, NativeEvent,
};
use crate::history::{History, Snapshot};
use crate::item::{BreadcrumbItem, BreadcrumbItemPatch, DropdownItem};
use crate::normalize::normalize_items;
use crate::visibility::{calculate_visible_items, CollapseWindow, VisibleItems};
use crumbtrail_core::{EmitterOptions, EventEmitter, HandlerResult, ListenerId, Subscription};
use std::collections::HashSet;
use std::future::Future;
use std::time::SystemTime;

/// Copy of the manager state.
#[derive(Clone, Debug, PartialEq)]
pub struct BreadcrumbState {
    /// The trail items, keys unique.
    pub items: Vec<BreadcrumbItem>,
    /// When set, collapsing is suppressed.
    pub expanded: bool,
    /// The visible partition of `items`.
    pub visible_items: VisibleItems<BreadcrumbItem>,
    /// Incremented once per committed change.
    pub version: u64,
}

#[derive(Clone, Debug)]
enum BatchOp {
    Add {
        item: BreadcrumbItem,
        index: Option<usize>,
    },
    Remove {
        key: String,
    },
    Update {
        key: String,
        patch: BreadcrumbItemPatch,
    },
}

/// Operations queued inside [`BreadcrumbManager::batch`].
///
/// Nothing is applied until the batch closure returns successfully; the queued
/// operations are then replayed in call order and committed once.
#[derive(Debug, Default)]
pub struct Batch {
    ops: Vec<BatchOp>,
}

impl Batch {
    /// Queue an insertion. `None` appends.
    pub fn add_item(&mut self, item: BreadcrumbItem, index: Option<usize>) -> &mut Self {
        self.ops.push(BatchOp::Add { item, index });
        self
    }

    /// Queue a removal. Missing keys are ignored on replay.
    pub fn remove_item(&mut self, key: impl Into<String>) -> &mut Self {
        self.ops.push(BatchOp::Remove { key: key.into() });
        self
    }

    /// Queue a patch. Missing keys are ignored on replay.
    pub fn update_item(&mut self, key: impl Into<String>, patch: BreadcrumbItemPatch) -> &mut Self {
        self.ops.push(BatchOp::Update {
            key: key.into(),
            patch,
        });
        self
    }

    /// Number of queued operations.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Stateful breadcrumb trail.
pub struct BreadcrumbManager {
    config: BreadcrumbConfig,
    items: Vec<BreadcrumbItem>,
    expanded: bool,
    visible: VisibleItems<BreadcrumbItem>,
    version: u64,
    history: Option<History>,
    emitter: EventEmitter<BreadcrumbEvent>,
    destroyed: bool,
}

impl std::fmt::Debug for BreadcrumbManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BreadcrumbManager")
            .field("items", &self.items)
            .field("expanded", &self.expanded)
            .field("version", &self.version)
            .field("history", &self.history.as_ref().map(History::len))
            .field("destroyed", &self.destroyed)
            .finish()
    }
}

impl BreadcrumbManager {
    /// Create a manager. Listener overflow warnings use `config.max_listeners`.
    pub fn new(items: Vec<BreadcrumbItem>, config: BreadcrumbConfig) -> BreadcrumbResult<Self> {
        let options = EmitterOptions::default().with_max_listeners(config.max_listeners);
        Self::with_emitter_options(items, config, options)
    }

    /// Create a manager with explicit emitter options (error and warning sinks).
    ///
    /// `options.max_listeners` takes precedence; `config.max_listeners` is not
    /// consulted here.
    pub fn with_emitter_options(
        items: Vec<BreadcrumbItem>,
        config: BreadcrumbConfig,
        options: EmitterOptions,
    ) -> BreadcrumbResult<Self> {
        let mut manager = Self {
            items: Vec::new(),
            expanded: false,
            visible: VisibleItems::default(),
            version: 0,
            history: config.enable_history.then(|| History::new(config.max_history_length)),
            emitter: EventEmitter::new(options),
            destroyed: false,
            config,
        };

        manager.items = manager.prepare_items(items)?;
        manager.refresh_visible();
        manager.record_history();

        log::debug!("Breadcrumb manager created with {} items", manager.items.len());
        Ok(manager)
    }

    // ---- queries ----

    /// The live configuration.
    pub fn config(&self) -> BreadcrumbConfig {
        self.config.clone()
    }

    /// Copy of the full state.
    pub fn state(&self) -> BreadcrumbState {
        BreadcrumbState {
            items: self.items.clone(),
            expanded: self.expanded,
            visible_items: self.visible.clone(),
            version: self.version,
        }
    }

    /// Get the current breadcrumb items
    pub fn items(&self) -> Vec<BreadcrumbItem> {
        self.items.clone()
    }

    /// The item with the given key.
    pub fn item(&self, key: &str) -> Option<BreadcrumbItem> {
        self.items.iter().find(|item| item.key == key).cloned()
    }

    /// Position of the item with the given key.
    pub fn item_index(&self, key: &str) -> Option<usize> {
        self.items.iter().position(|item| item.key == key)
    }

    /// The visible partition, honouring the expand flag.
    pub fn visible_items(&self) -> VisibleItems<BreadcrumbItem> {
        self.visible.clone()
    }

    /// Number of items.
    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Whether collapsing is currently suppressed.
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Version of the current state.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Whether [`BreadcrumbManager::destroy`] was called.
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Whether the item at `index` reacts to clicks.
    ///
    /// Disabled items never do. An explicit `clickable` wins otherwise; without
    /// one, every item but the last is clickable, and the last one follows
    /// `last_item_clickable`.
    pub fn is_clickable(&self, index: usize) -> bool {
        let Some(item) = self.items.get(index) else {
            return false;
        };
        if item.disabled {
            return false;
        }
        if let Some(clickable) = item.clickable {
            return clickable;
        }
        if index + 1 == self.items.len() {
            return self.config.last_item_clickable;
        }
        true
    }

    /// Whether [`BreadcrumbManager::undo`] would change anything.
    pub fn can_undo(&self) -> bool {
        !self.destroyed && self.history.as_ref().is_some_and(History::can_undo)
    }

    /// Whether [`BreadcrumbManager::redo`] would change anything.
    pub fn can_redo(&self) -> bool {
        !self.destroyed && self.history.as_ref().is_some_and(History::can_redo)
    }

    /// Number of recorded history entries.
    pub fn history_len(&self) -> usize {
        self.history.as_ref().map(History::len).unwrap_or(0)
    }

    // ---- mutations ----

    /// Replace the whole trail. Collapses the trail again.
    pub fn set_items(&mut self, items: Vec<BreadcrumbItem>) -> BreadcrumbResult<()> {
        self.ensure_alive()?;
        let items = self.prepare_items(items)?;
        self.commit_items(items);
        Ok(())
    }

    /// Insert an item at `index`, or append with `None`.
    pub fn add_item(&mut self, item: BreadcrumbItem, index: Option<usize>) -> BreadcrumbResult<()> {
        self.ensure_alive()?;
        let mut items = self.items.clone();
        insert_item(&mut items, item, index)?;
        self.set_items(items)
    }

    /// Remove the item with `key`. Returns whether it existed.
    pub fn remove_item(&mut self, key: &str) -> BreadcrumbResult<bool> {
        self.ensure_alive()?;
        let Some(index) = self.item_index(key) else {
            return Ok(false);
        };
        let mut items = self.items.clone();
        items.remove(index);
        self.set_items(items)?;
        Ok(true)
    }

    /// Patch the item with `key`. Returns whether it existed.
    pub fn update_item(&mut self, key: &str, patch: BreadcrumbItemPatch) -> BreadcrumbResult<bool> {
        self.ensure_alive()?;
        let Some(index) = self.item_index(key) else {
            return Ok(false);
        };
        let mut items = self.items.clone();
        items[index].apply(patch);
        self.set_items(items)?;
        Ok(true)
    }

    /// Apply several item operations as one change.
    ///
    /// The closure queues operations on a [`Batch`]. If it fails, or replaying
    /// the queue fails, nothing is committed. Otherwise the result is committed
    /// with a single version bump and a single history entry.
    pub fn batch<F>(&mut self, f: F) -> BreadcrumbResult<()>
    where
        F: FnOnce(&mut Batch) -> anyhow::Result<()>,
    {
        self.ensure_alive()?;

        let mut batch = Batch::default();
        f(&mut batch).map_err(BreadcrumbError::batch)?;
        if batch.is_empty() {
            return Ok(());
        }

        let mut items = self.items.clone();
        for op in batch.ops {
            match op {
                BatchOp::Add { item, index } => insert_item(&mut items, item, index)?,
                BatchOp::Remove { key } => items.retain(|item| item.key != key),
                BatchOp::Update { key, patch } => {
                    if let Some(item) = items.iter_mut().find(|item| item.key == key) {
                        item.apply(patch);
                    }
                },
            }
        }

        self.set_items(items)
    }

    /// Navigate to a specific breadcrumb by key (removes items after it).
    ///
    /// Returns whether the key exists.
    pub fn navigate_to(&mut self, key: &str) -> BreadcrumbResult<bool> {
        self.ensure_alive()?;
        let Some(index) = self.item_index(key) else {
            return Ok(false);
        };
        if index + 1 < self.items.len() {
            let items = self.items[..=index].to_vec();
            self.set_items(items)?;
        }
        Ok(true)
    }

    /// Remove the last breadcrumb item (navigate back).
    ///
    /// The injected home item is never popped.
    pub fn pop_item(&mut self) -> BreadcrumbResult<Option<BreadcrumbItem>> {
        self.ensure_alive()?;
        match self.items.last() {
            None => return Ok(None),
            Some(last) if self.config.show_home && last.key == HOME_KEY => return Ok(None),
            Some(_) => {},
        }
        let mut items = self.items.clone();
        let popped = items.pop();
        self.set_items(items)?;
        Ok(popped)
    }

    /// Clear all breadcrumb items. The home item comes back if configured.
    pub fn clear(&mut self) -> BreadcrumbResult<()> {
        self.set_items(Vec::new())
    }

    /// Flip the expand flag.
    pub fn toggle_expand(&mut self) -> BreadcrumbResult<()> {
        self.set_expanded(!self.expanded).map(|_| ())
    }

    /// Set the expand flag. Returns `false` if it already had that value.
    pub fn set_expanded(&mut self, expanded: bool) -> BreadcrumbResult<bool> {
        self.ensure_alive()?;
        if self.expanded == expanded {
            return Ok(false);
        }

        self.expanded = expanded;
        self.refresh_visible();
        self.bump_version();
        self.record_history();

        self.emitter
            .emit(&BreadcrumbEvent::ExpandChange(ExpandChangeEvent { expanded }));
        Ok(true)
    }

    /// Merge a configuration patch into the live configuration.
    ///
    /// Home changes strip the current home item and re-run home injection;
    /// collapse changes only recompute the visible partition.
    pub fn update_config(&mut self, patch: BreadcrumbConfigPatch) -> BreadcrumbResult<()> {
        self.ensure_alive()?;
        let changes = self.config.merge(patch);
        self.sync_history_config();

        if changes.home {
            let items = self
                .items
                .iter()
                .filter(|item| item.key != HOME_KEY)
                .cloned()
                .collect();
            self.set_items(items)?;
        } else if changes.collapse {
            self.refresh_visible();
            self.bump_version();
        }
        Ok(())
    }

    // ---- history ----

    /// Step back in history. Returns `false` at the oldest entry or when
    /// history is disabled.
    pub fn undo(&mut self) -> BreadcrumbResult<bool> {
        self.ensure_alive()?;
        let Some(snapshot) = self.history.as_mut().and_then(|h| h.undo().cloned()) else {
            return Ok(false);
        };
        self.apply_snapshot(snapshot);
        log::debug!("Undo to version {}", self.version);
        Ok(true)
    }

    /// Step forward in history. Returns `false` at the newest entry or when
    /// history is disabled.
    pub fn redo(&mut self) -> BreadcrumbResult<bool> {
        self.ensure_alive()?;
        let Some(snapshot) = self.history.as_mut().and_then(|h| h.redo().cloned()) else {
            return Ok(false);
        };
        self.apply_snapshot(snapshot);
        log::debug!("Redo to version {}", self.version);
        Ok(true)
    }

    /// Capture the current state.
    pub fn create_snapshot(&self) -> Snapshot {
        Snapshot {
            items: self.items.clone(),
            expanded: self.expanded,
            timestamp: SystemTime::now(),
            version: self.version,
        }
    }

    /// Restore a snapshot taken earlier.
    ///
    /// The snapshot's items go through the same key assignment, home injection
    /// and uniqueness check as [`BreadcrumbManager::set_items`]; on
    /// [`BreadcrumbError::DuplicateKey`] the live state is left untouched.
    /// Visibility is recomputed with the live configuration, not the one
    /// active when the snapshot was taken.
    pub fn restore_snapshot(&mut self, snapshot: &Snapshot) -> BreadcrumbResult<()> {
        self.ensure_alive()?;
        let items = self.prepare_items(snapshot.items.clone())?;
        self.apply_snapshot(Snapshot {
            items,
            expanded: snapshot.expanded,
            timestamp: snapshot.timestamp,
            version: snapshot.version,
        });
        self.record_history();
        Ok(())
    }

    /// Drop all subscriptions and history and refuse further mutations.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.emitter.clear();
        self.history = None;
        self.destroyed = true;
        log::debug!("Breadcrumb manager destroyed at version {}", self.version);
    }

    // ---- events ----

    /// Notify `click` subscribers.
    pub fn handle_click(&self, item: &BreadcrumbItem, index: usize, event: Option<NativeEvent>) -> bool {
        self.emitter.emit(&click_event(item, index, event))
    }

    /// Notify `click` subscribers, awaiting async handlers in order.
    pub async fn handle_click_async(&self, item: &BreadcrumbItem, index: usize, event: Option<NativeEvent>) -> bool {
        self.emitter.emit_async(click_event(item, index, event)).await
    }

    /// Notify `dropdownSelect` subscribers.
    pub fn handle_dropdown_select(
        &self,
        parent_item: &BreadcrumbItem,
        selected_item: &DropdownItem,
        event: Option<NativeEvent>,
    ) -> bool {
        self.emitter
            .emit(&dropdown_select_event(parent_item, selected_item, event))
    }

    /// Notify `dropdownSelect` subscribers, awaiting async handlers in order.
    pub async fn handle_dropdown_select_async(
        &self,
        parent_item: &BreadcrumbItem,
        selected_item: &DropdownItem,
        event: Option<NativeEvent>,
    ) -> bool {
        self.emitter
            .emit_async(dropdown_select_event(parent_item, selected_item, event))
            .await
    }

    /// Subscribe to an event kind.
    pub fn on<F>(&self, kind: BreadcrumbEventKind, handler: F) -> Subscription<BreadcrumbEvent>
    where
        F: Fn(&BreadcrumbEvent) -> HandlerResult + 'static,
    {
        self.emitter.on(kind, handler)
    }

    /// Subscribe with an explicit priority. Lower priorities run first.
    pub fn on_with_priority<F>(
        &self,
        kind: BreadcrumbEventKind,
        priority: i32,
        handler: F,
    ) -> Subscription<BreadcrumbEvent>
    where
        F: Fn(&BreadcrumbEvent) -> HandlerResult + 'static,
    {
        self.emitter.on_with_priority(kind, priority, handler)
    }

    /// Subscribe for a single delivery.
    pub fn once<F>(&self, kind: BreadcrumbEventKind, handler: F) -> Subscription<BreadcrumbEvent>
    where
        F: Fn(&BreadcrumbEvent) -> HandlerResult + 'static,
    {
        self.emitter.once(kind, handler)
    }

    /// Subscribe an async handler. It only runs for the `*_async` handlers.
    pub fn on_async<F, Fut>(&self, kind: BreadcrumbEventKind, handler: F) -> Subscription<BreadcrumbEvent>
    where
        F: Fn(BreadcrumbEvent) -> Fut + 'static,
        Fut: Future<Output = HandlerResult> + 'static,
    {
        self.emitter.on_async(kind, handler)
    }

    /// Remove one subscription.
    pub fn off(&self, kind: BreadcrumbEventKind, id: ListenerId) -> bool {
        self.emitter.off(kind, id)
    }

    /// Remove every subscription for `kind`.
    pub fn off_all(&self, kind: BreadcrumbEventKind) -> usize {
        self.emitter.off_all(kind)
    }

    /// Subscribe to clicks.
    pub fn on_click<F>(&self, handler: F) -> Subscription<BreadcrumbEvent>
    where
        F: Fn(&ClickEvent) -> HandlerResult + 'static,
    {
        self.emitter.on(BreadcrumbEventKind::Click, move |event| match event {
            BreadcrumbEvent::Click(click) => handler(click),
            _ => Ok(()),
        })
    }

    /// Subscribe to dropdown selections.
    pub fn on_dropdown_select<F>(&self, handler: F) -> Subscription<BreadcrumbEvent>
    where
        F: Fn(&DropdownSelectEvent) -> HandlerResult + 'static,
    {
        self.emitter
            .on(BreadcrumbEventKind::DropdownSelect, move |event| match event {
                BreadcrumbEvent::DropdownSelect(select) => handler(select),
                _ => Ok(()),
            })
    }

    /// Subscribe to expand changes.
    pub fn on_expand_change<F>(&self, handler: F) -> Subscription<BreadcrumbEvent>
    where
        F: Fn(&ExpandChangeEvent) -> HandlerResult + 'static,
    {
        self.emitter
            .on(BreadcrumbEventKind::ExpandChange, move |event| match event {
                BreadcrumbEvent::ExpandChange(change) => handler(change),
                _ => Ok(()),
            })
    }

    // ---- internals ----

    fn ensure_alive(&self) -> BreadcrumbResult<()> {
        if self.destroyed {
            return Err(BreadcrumbError::Destroyed);
        }
        Ok(())
    }

    /// Normalize keys, inject the home item and check key uniqueness.
    fn prepare_items(&self, items: Vec<BreadcrumbItem>) -> BreadcrumbResult<Vec<BreadcrumbItem>> {
        let mut items = normalize_items(items);

        if self.config.show_home && !items.iter().any(|item| item.key == HOME_KEY) {
            let mut home = self.config.home_item.clone();
            home.key = HOME_KEY.to_string();
            items.insert(0, home);
        }

        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(item.key.as_str()) {
                return Err(BreadcrumbError::duplicate_key(item.key.clone()));
            }
        }

        Ok(items)
    }

    fn commit_items(&mut self, items: Vec<BreadcrumbItem>) {
        self.items = items;
        self.expanded = false;
        self.refresh_visible();
        self.bump_version();
        self.record_history();
        log::debug!(
            "Committed breadcrumb version {} ({} items)",
            self.version,
            self.items.len()
        );
    }

    fn apply_snapshot(&mut self, snapshot: Snapshot) {
        self.items = snapshot.items;
        self.expanded = snapshot.expanded;
        self.refresh_visible();
        self.bump_version();
    }

    fn refresh_visible(&mut self) {
        let window = if self.expanded {
            CollapseWindow::default()
        } else {
            self.config.collapse_window()
        };
        self.visible = calculate_visible_items(&self.items, window);
    }

    fn bump_version(&mut self) {
        self.version += 1;
    }

    fn record_history(&mut self) {
        if self.history.is_none() {
            return;
        }
        let snapshot = self.create_snapshot();
        if let Some(history) = self.history.as_mut() {
            history.push(snapshot);
        }
    }

    /// Follow `enable_history` / `max_history_length` changes.
    fn sync_history_config(&mut self) {
        match (self.config.enable_history, self.history.as_mut()) {
            (true, Some(history)) => history.set_max_len(self.config.max_history_length),
            (true, None) => {
                self.history = Some(History::new(self.config.max_history_length));
                self.record_history();
            },
            (false, Some(_)) => self.history = None,
            (false, None) => {},
        }
    }
}

fn insert_item(items: &mut Vec<BreadcrumbItem>, item: BreadcrumbItem, index: Option<usize>) -> BreadcrumbResult<()> {
    let index = index.unwrap_or(items.len());
    if index > items.len() {
        return Err(BreadcrumbError::index_out_of_bounds(index, items.len()));
    }
    if !item.key.is_empty() && items.iter().any(|existing| existing.key == item.key) {
        return Err(BreadcrumbError::duplicate_key(item.key));
    }
    items.insert(index, item);
    Ok(())
}

fn click_event(item: &BreadcrumbItem, index: usize, event: Option<NativeEvent>) -> BreadcrumbEvent {
    BreadcrumbEvent::Click(ClickEvent {
        item: item.clone(),
        index,
        event,
    })
}

fn dropdown_select_event(
    parent_item: &BreadcrumbItem,
    selected_item: &DropdownItem,
    event: Option<NativeEvent>,
) -> BreadcrumbEvent {
    BreadcrumbEvent::DropdownSelect(DropdownSelectEvent {
        parent_item: parent_item.clone(),
        selected_item: selected_item.clone(),
        event,
    })
}
