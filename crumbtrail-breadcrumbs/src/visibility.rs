// SPDX-License-Identifier: LGPL-3.0-only
//! Splits a trail into the items shown before the ellipsis, the collapsed
//! items, and the items shown after it.

use serde::{Deserialize, Serialize};

/// The three numbers that decide collapsing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CollapseWindow {
    /// Collapse when the trail is longer than this. `0` never collapses.
    pub max_items: usize,
    /// Items kept before the collapsed range.
    pub items_before_collapse: usize,
    /// Items kept after the collapsed range.
    pub items_after_collapse: usize,
}

/// Partition of a trail for rendering.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibleItems<T> {
    /// Leading items. Holds the whole trail when nothing is collapsed.
    pub before_items: Vec<T>,
    /// Items hidden behind the ellipsis.
    pub collapsed_items: Vec<T>,
    /// Trailing items.
    pub after_items: Vec<T>,
    /// Whether an ellipsis should be rendered.
    pub needs_collapse: bool,
}

impl<T> Default for VisibleItems<T> {
    fn default() -> Self {
        Self {
            before_items: Vec::new(),
            collapsed_items: Vec::new(),
            after_items: Vec::new(),
            needs_collapse: false,
        }
    }
}

impl<T> VisibleItems<T> {
    /// Total number of items across all three segments.
    pub fn len(&self) -> usize {
        self.before_items.len() + self.collapsed_items.len() + self.after_items.len()
    }

    /// Whether the partition holds no items.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Items that are actually rendered, in order.
    pub fn shown(&self) -> impl Iterator<Item = &T> {
        self.before_items.iter().chain(self.after_items.iter())
    }
}

/// Compute the visible partition of `items`.
///
/// Window sizes larger than the trail are clamped, and the head never takes
/// the whole trail.
pub fn calculate_visible_items<T: Clone>(items: &[T], window: CollapseWindow) -> VisibleItems<T> {
    let len = items.len();

    if window.max_items == 0 || len <= window.max_items {
        return VisibleItems {
            before_items: items.to_vec(),
            ..Default::default()
        };
    }

    let before = window.items_before_collapse.min(len - 1);
    let after = window.items_after_collapse.min(len - before);
    let tail_start = len - after;

    VisibleItems {
        before_items: items[..before].to_vec(),
        collapsed_items: items[before..tail_start].to_vec(),
        after_items: items[tail_start..].to_vec(),
        needs_collapse: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(max_items: usize, before: usize, after: usize) -> CollapseWindow {
        CollapseWindow {
            max_items,
            items_before_collapse: before,
            items_after_collapse: after,
        }
    }

    #[test]
    fn test_zero_max_never_collapses() {
        let items: Vec<u32> = (0..20).collect();
        let visible = calculate_visible_items(&items, window(0, 1, 1));
        assert!(!visible.needs_collapse);
        assert_eq!(visible.before_items, items);
        assert!(visible.collapsed_items.is_empty());
        assert!(visible.after_items.is_empty());
    }

    #[test]
    fn test_short_trail_is_untouched() {
        let items = vec!["a", "b", "c"];
        let visible = calculate_visible_items(&items, window(3, 1, 1));
        assert!(!visible.needs_collapse);
        assert_eq!(visible.before_items, items);
    }

    #[test]
    fn test_collapse_head_and_tail() {
        let items: Vec<u32> = (0..6).collect();
        let visible = calculate_visible_items(&items, window(4, 1, 2));
        assert!(visible.needs_collapse);
        assert_eq!(visible.before_items, vec![0]);
        assert_eq!(visible.collapsed_items, vec![1, 2, 3]);
        assert_eq!(visible.after_items, vec![4, 5]);
    }

    #[test]
    fn test_partition_reconstructs_trail() {
        let items: Vec<u32> = (0..9).collect();
        for max in 1..9 {
            for before in 0..12 {
                for after in 0..12 {
                    let visible = calculate_visible_items(&items, window(max, before, after));
                    assert_eq!(visible.len(), items.len());
                    let rebuilt: Vec<u32> = visible
                        .before_items
                        .iter()
                        .chain(&visible.collapsed_items)
                        .chain(&visible.after_items)
                        .copied()
                        .collect();
                    assert_eq!(rebuilt, items);
                }
            }
        }
    }

    #[test]
    fn test_oversized_window_is_clamped() {
        let items = vec!["a", "b", "c", "d"];
        let visible = calculate_visible_items(&items, window(2, 10, 10));
        assert_eq!(visible.before_items, vec!["a", "b", "c"]);
        assert_eq!(visible.after_items, vec!["d"]);
        assert!(visible.collapsed_items.is_empty());
        assert!(visible.needs_collapse);
    }
}
