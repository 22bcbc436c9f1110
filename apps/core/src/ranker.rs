use std::cmp::Ordering;

use crate::config::DisplayOrder;
use crate::model::ResultItem;
use crate::text::collation_key;

pub fn rank(mut items: Vec<ResultItem>, order: DisplayOrder) -> Vec<ResultItem> {
    match order {
        DisplayOrder::SortedAlphabetically => {
            sort_alphabetically(&mut items);
            items
        }
        DisplayOrder::Default => prioritize(items),
    }
}

/// Title order, ties broken by the later window first.
pub fn sort_alphabetically(items: &mut [ResultItem]) {
    items.sort_by(|a, b| {
        locale_compare(a.plain_title(), b.plain_title())
            .then_with(|| b.window_index.cmp(&a.window_index))
    });
}

/// Spaces before tabs, context matches before the rest; otherwise the
/// incoming order is kept.
pub fn prioritize(mut items: Vec<ResultItem>) -> Vec<ResultItem> {
    items.sort_by_key(|item| (!item.is_space(), !item.is_context_match));
    items
}

pub fn locale_compare(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}
