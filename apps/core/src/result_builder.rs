use std::collections::BTreeMap;

use crate::model::{
    ActionDescriptor, DynamicState, ModifierAction, ModifierArg, ModifierKey, ResultItem,
    TabRecord, CONTEXT_MARKER,
};
use crate::text::normalize;

pub const FLUSH_CACHE_ARG: &str = "flush-cache";

/// One entry per (window, record) pair, window-major so output groups by
/// window and keeps record order inside each window.
pub fn build(records: &[TabRecord], dynamic: &DynamicState, cache_enabled: bool) -> Vec<ResultItem> {
    let mut items = Vec::with_capacity(records.len() * dynamic.number_of_windows);
    for window in 0..dynamic.number_of_windows {
        let active_space = dynamic.active_space(window);
        let active_key = active_space.map(normalize);
        for record in records {
            items.push(build_item(
                record,
                window,
                active_space,
                active_key.as_deref(),
                dynamic.number_of_windows,
                cache_enabled,
            ));
        }
    }
    items
}

fn build_item(
    record: &TabRecord,
    window: usize,
    active_space: Option<&str>,
    active_key: Option<&str>,
    number_of_windows: usize,
    cache_enabled: bool,
) -> ResultItem {
    let is_context_match = is_context_match(record, active_key);
    let title = if is_context_match {
        format!("{CONTEXT_MARKER}{}", record.title())
    } else {
        record.title().to_string()
    };

    let arg = action_descriptor(record, window);
    ResultItem {
        title,
        subtitle: compose_subtitle(record, window, active_space, number_of_windows),
        arg,
        icon: record.kind().icon_path().to_string(),
        modifier_actions: modifier_actions(record, arg, cache_enabled),
        is_context_match,
        kind: Some(record.kind()),
        window_index: window,
        valid: None,
    }
}

/// `active_key` is the already normalized active space title.
fn is_context_match(record: &TabRecord, active_key: Option<&str>) -> bool {
    let Some(active_key) = active_key else {
        return false;
    };
    let space_title = match record {
        TabRecord::Space { title, .. } => Some(title.as_str()),
        other => other.space_title(),
    };
    space_title.is_some_and(|title| normalize(title) == active_key)
}

fn compose_subtitle(
    record: &TabRecord,
    window: usize,
    active_space: Option<&str>,
    number_of_windows: usize,
) -> String {
    let mut subtitle = record.kind().label().to_string();
    if number_of_windows > 1 {
        match active_space {
            Some(active_space) => subtitle.push_str(&format!(" in window '{active_space}'")),
            None => subtitle.push_str(&format!(" in window {}", window + 1)),
        }
    }
    if let Some(space_title) = record.space_title() {
        subtitle.push_str(&format!(" in '{space_title}'"));
    }
    if let Some(url) = record.url() {
        let url = if url.is_empty() { "(no URL)" } else { url };
        subtitle.push_str(&format!(": {url}"));
    }
    subtitle
}

pub fn action_descriptor(record: &TabRecord, window: usize) -> ActionDescriptor {
    match record {
        TabRecord::Space { space_index, .. } => ActionDescriptor::Space {
            window,
            space: *space_index,
        },
        TabRecord::TopApp { tab_index, .. } => ActionDescriptor::TopTab {
            window,
            tab: *tab_index,
        },
        TabRecord::Pinned {
            space_index,
            tab_index,
            ..
        }
        | TabRecord::Unpinned {
            space_index,
            tab_index,
            ..
        } => ActionDescriptor::Full {
            window,
            space: *space_index,
            tab: *tab_index,
        },
    }
}

fn modifier_actions(
    record: &TabRecord,
    arg: ActionDescriptor,
    cache_enabled: bool,
) -> BTreeMap<ModifierKey, ModifierAction> {
    let mut mods = BTreeMap::new();

    let copy_url = match record.url() {
        Some(url) if !url.is_empty() => {
            ModifierAction::new(ModifierArg::Text(url.to_string()), "Copy URL")
        }
        _ => ModifierAction::disabled("No URL to copy"),
    };
    mods.insert(ModifierKey::Ctrl, copy_url);
    mods.insert(
        ModifierKey::Shift,
        ModifierAction::new(ModifierArg::Text(record.title().to_string()), "Copy title"),
    );

    if cache_enabled {
        mods.insert(
            ModifierKey::Alt,
            ModifierAction::new(ModifierArg::Text(FLUSH_CACHE_ARG.to_string()), "Flush tab cache"),
        );
    }

    let close = if record.is_space() {
        ModifierAction::disabled("Spaces cannot be closed")
    } else {
        ModifierAction::new(ModifierArg::Action(arg), "Close this tab")
    };
    mods.insert(ModifierKey::Cmd, close);

    mods
}
