// SPDX-License-Identifier: LGPL-3.0-only
//! Key assignment for items entering a trail.

use crate::item::BreadcrumbItem;
use std::collections::HashSet;

/// Prefix of generated keys.
pub const KEY_PREFIX: &str = "breadcrumb";

/// Give every item without a key a generated one.
///
/// Items that already have a key are returned untouched and keep their
/// position. Generated keys are derived from the position and never collide
/// with another key in the same batch.
pub fn normalize_items(items: Vec<BreadcrumbItem>) -> Vec<BreadcrumbItem> {
    let mut taken: HashSet<String> = items
        .iter()
        .filter(|item| !item.key.is_empty())
        .map(|item| item.key.clone())
        .collect();

    items
        .into_iter()
        .enumerate()
        .map(|(index, mut item)| {
            if item.key.is_empty() {
                item.key = unique_key(index, &mut taken);
            }
            item
        })
        .collect()
}

fn unique_key(index: usize, taken: &mut HashSet<String>) -> String {
    let base = format!("{KEY_PREFIX}-{index}");
    let mut key = base.clone();
    let mut suffix = 1;
    while taken.contains(&key) {
        key = format!("{base}-{suffix}");
        suffix += 1;
    }
    taken.insert(key.clone());
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(items: &[BreadcrumbItem]) -> Vec<&str> {
        items.iter().map(|item| item.key.as_str()).collect()
    }

    #[test]
    fn test_missing_keys_are_generated() {
        let items = normalize_items(vec![
            BreadcrumbItem::new("Root"),
            BreadcrumbItem::new("Docs").with_key("docs"),
            BreadcrumbItem::new("Api"),
        ]);

        assert_eq!(keys(&items), vec!["breadcrumb-0", "docs", "breadcrumb-2"]);
        assert_eq!(items[1].label, "Docs");
    }

    #[test]
    fn test_generated_keys_avoid_existing_ones() {
        let items = normalize_items(vec![
            BreadcrumbItem::new("A"),
            BreadcrumbItem::new("B").with_key("breadcrumb-0"),
        ]);

        assert_eq!(keys(&items), vec!["breadcrumb-0-1", "breadcrumb-0"]);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize_items(vec![
            BreadcrumbItem::new("A"),
            BreadcrumbItem::new("B").with_key("b"),
            BreadcrumbItem::new("C"),
        ]);
        let twice = normalize_items(once.clone());
        assert_eq!(once, twice);
    }
}
