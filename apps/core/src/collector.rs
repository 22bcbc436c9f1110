use std::path::Path;
use std::time::{Duration, Instant};

use crate::config::IncludeFlags;
use crate::model::{DynamicState, TabRecord, INCOGNITO_SPACE_TITLE};
use crate::source::{RawTab, SourceError, TabLocation, TabSource};
use crate::static_cache;

/// Every window shares the same tabs and spaces, so static data is read from
/// this one.
pub const CANONICAL_WINDOW: usize = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchPolicy {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CachePolicy<'a> {
    pub path: &'a Path,
    pub ttl_secs: f64,
}

/// Launches the source if needed and waits until it has a window.
pub fn ensure_ready(source: &dyn TabSource, policy: &LaunchPolicy) -> Result<(), SourceError> {
    if !source.is_installed()? {
        return Err(SourceError::Unavailable(source.app_name().to_string()));
    }
    if source.is_running()? {
        return Ok(());
    }

    tracing::info!(app = source.app_name(), "source not running; launching");
    source.launch()?;

    let started = Instant::now();
    loop {
        if source.window_count()? > 0 {
            tracing::debug!(waited_ms = started.elapsed().as_millis() as u64, "source ready");
            return Ok(());
        }
        if started.elapsed() >= policy.timeout {
            return Err(SourceError::LaunchTimedOut {
                app: source.app_name().to_string(),
                waited_ms: started.elapsed().as_millis(),
            });
        }
        std::thread::sleep(policy.poll_interval);
    }
}

/// All static records of every type, in source order: window-level tabs, then
/// each space followed by its tabs.
pub fn collect_all_static(source: &dyn TabSource) -> Result<Vec<TabRecord>, SourceError> {
    if source.window_count()? == 0 {
        return Ok(Vec::new());
    }

    let mut records = Vec::new();
    for (tab_index, tab) in source.list_tabs(CANONICAL_WINDOW)?.into_iter().enumerate() {
        if tab.location == TabLocation::TopApp {
            records.push(TabRecord::TopApp {
                title: tab.title,
                url: tab.url,
                tab_index,
            });
        }
    }

    for (space_index, space) in source.list_spaces(CANONICAL_WINDOW)?.into_iter().enumerate() {
        let space_title = space_label(&space.title);
        records.push(TabRecord::Space {
            title: space_title.clone(),
            space_index,
        });
        for (tab_index, tab) in space.tabs.into_iter().enumerate() {
            if let Some(record) = space_tab_record(tab, space_index, tab_index, &space_title) {
                records.push(record);
            }
        }
    }

    Ok(records)
}

pub fn collect_static(
    source: &dyn TabSource,
    include: &IncludeFlags,
) -> Result<Vec<TabRecord>, SourceError> {
    Ok(apply_include_flags(collect_all_static(source)?, include))
}

/// Static records through the snapshot cache. A missing, corrupt or stale
/// snapshot means a full recollect followed by a rewrite.
pub fn collect_static_cached(
    source: &dyn TabSource,
    include: &IncludeFlags,
    cache: &CachePolicy<'_>,
) -> Result<Vec<TabRecord>, SourceError> {
    if let Some(snapshot) = static_cache::read(cache.path) {
        if static_cache::is_valid(&snapshot, cache.ttl_secs) {
            tracing::debug!(records = snapshot.records.len(), "static cache hit");
            return Ok(apply_include_flags(snapshot.records, include));
        }
        tracing::debug!("static cache expired");
    }

    let records = collect_all_static(source)?;
    match static_cache::write(cache.path, &records) {
        Ok(()) => tracing::info!(records = records.len(), "static cache rewritten"),
        Err(error) => tracing::warn!(%error, "failed to rewrite static cache"),
    }
    Ok(apply_include_flags(records, include))
}

/// Space records only, for the empty-query listing.
pub fn collect_spaces_only(source: &dyn TabSource) -> Result<Vec<TabRecord>, SourceError> {
    if source.window_count()? == 0 {
        return Ok(Vec::new());
    }

    Ok(source
        .list_spaces(CANONICAL_WINDOW)?
        .into_iter()
        .enumerate()
        .map(|(space_index, space)| TabRecord::Space {
            title: space_label(&space.title),
            space_index,
        })
        .collect())
}

/// Active space of every window. Focus differs per window, so unlike static
/// data this cannot be read from the canonical window alone.
pub fn collect_dynamic(source: &dyn TabSource) -> Result<DynamicState, SourceError> {
    let number_of_windows = source.window_count()?;
    let mut state = DynamicState {
        number_of_windows,
        ..DynamicState::default()
    };
    for window in 0..number_of_windows {
        if let Some(title) = source.active_space_title(window)? {
            state.window_active_spaces.insert(window, space_label(&title));
        }
    }
    Ok(state)
}

pub fn apply_include_flags(records: Vec<TabRecord>, include: &IncludeFlags) -> Vec<TabRecord> {
    records
        .into_iter()
        .filter(|record| match record {
            TabRecord::TopApp { .. } => include.top_tabs,
            TabRecord::Pinned { .. } => include.pinned_tabs,
            TabRecord::Unpinned { .. } => include.unpinned_tabs,
            TabRecord::Space { .. } => include.spaces,
        })
        .collect()
}

fn space_label(title: &str) -> String {
    if title.trim().is_empty() {
        INCOGNITO_SPACE_TITLE.to_string()
    } else {
        title.to_string()
    }
}

fn space_tab_record(
    tab: RawTab,
    space_index: usize,
    tab_index: usize,
    space_title: &str,
) -> Option<TabRecord> {
    match tab.location {
        TabLocation::Pinned => Some(TabRecord::Pinned {
            title: tab.title,
            url: tab.url,
            space_index,
            tab_index,
            space_title: space_title.to_string(),
        }),
        TabLocation::Unpinned => Some(TabRecord::Unpinned {
            title: tab.title,
            url: tab.url,
            space_index,
            tab_index,
            space_title: space_title.to_string(),
        }),
        // Already listed at window level.
        TabLocation::TopApp => None,
    }
}
