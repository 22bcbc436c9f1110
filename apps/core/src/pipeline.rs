use crate::collector::{self, CachePolicy, LaunchPolicy};
use crate::config::{Config, ConfigError};
use crate::model::{ResultItem, TabRecord};
use crate::ranker;
use crate::result_builder;
use crate::search::{self, Matcher};
use crate::source::{SourceError, TabSource};

/// Runs one query end to end. Never fails: every error ends up as a row in
/// the returned list.
pub struct QueryPipeline<'a> {
    config: &'a Config,
    source: &'a dyn TabSource,
}

impl<'a> QueryPipeline<'a> {
    pub fn new(config: &'a Config, source: &'a dyn TabSource) -> Self {
        Self { config, source }
    }

    pub fn run(&self, query: &str) -> Vec<ResultItem> {
        let app = self.source.app_name();
        match self.execute(query) {
            Ok(items) if items.is_empty() => vec![no_results_item(query, app)],
            Ok(items) => items,
            Err(error) => {
                tracing::warn!(%error, "query pipeline halted");
                vec![source_error_item(&error, app)]
            }
        }
    }

    fn execute(&self, query: &str) -> Result<Vec<ResultItem>, SourceError> {
        let query = query.trim();
        let policy = LaunchPolicy {
            timeout: self.config.launch_timeout(),
            poll_interval: self.config.launch_poll_interval(),
        };
        collector::ensure_ready(self.source, &policy)?;

        if query.is_empty() && self.config.include.spaces {
            tracing::debug!("empty query; listing spaces only");
            let spaces = collector::collect_spaces_only(self.source)?;
            let dynamic = collector::collect_dynamic(self.source)?;
            let items = result_builder::build(&spaces, &dynamic, self.config.use_cache);
            return Ok(ranker::rank(items, self.config.display_order));
        }

        let records = self.collect_static()?;
        let matcher = Matcher::new(self.config.search_method, query);
        let records = if query.is_empty() {
            records
        } else {
            search::filter_records(records, &matcher)
        };
        tracing::debug!(records = records.len(), "pre-filter done");
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let dynamic = collector::collect_dynamic(self.source)?;
        let items = result_builder::build(&records, &dynamic, self.config.use_cache);
        let items = if query.is_empty() {
            items
        } else {
            search::filter_items(items, &matcher)
        };
        tracing::debug!(items = items.len(), "post-filter done");

        Ok(ranker::rank(items, self.config.display_order))
    }

    fn collect_static(&self) -> Result<Vec<TabRecord>, SourceError> {
        if !self.config.use_cache {
            return collector::collect_static(self.source, &self.config.include);
        }
        let path = self.config.cache_path();
        let cache = CachePolicy {
            path: &path,
            ttl_secs: self.config.cache_ttl_secs(),
        };
        collector::collect_static_cached(self.source, &self.config.include, &cache)
    }
}

pub fn no_results_item(query: &str, app: &str) -> ResultItem {
    let query = query.trim();
    if query.is_empty() {
        ResultItem::notice(
            "No tabs found",
            &format!("No tabs are currently open in {app}."),
        )
    } else {
        ResultItem::notice(
            &format!("No tabs found for \"{query}\""),
            "Try a different search query.",
        )
    }
}

pub fn source_error_item(error: &SourceError, app: &str) -> ResultItem {
    match error {
        SourceError::Unavailable(_) => ResultItem::notice(
            &format!("{app} application not found"),
            &format!("Install the {app} application in order to use this workflow."),
        ),
        SourceError::LaunchTimedOut { .. } => ResultItem::notice(
            &format!("Timed out waiting for {app}"),
            &format!("{app} did not open a window in time. Try again."),
        ),
        SourceError::Script(message) => {
            ResultItem::notice(&format!("Could not read tabs from {app}"), message)
        }
    }
}

pub fn config_error_item(error: &ConfigError) -> ResultItem {
    ResultItem::notice("Invalid workflow configuration", &error.to_string())
}

pub fn cache_flushed_item(removed: bool) -> ResultItem {
    let subtitle = if removed {
        "Cached tab data was removed."
    } else {
        "There was no cached tab data to remove."
    };
    ResultItem {
        valid: Some(false),
        ..ResultItem::notice("Tab cache flushed", subtitle)
    }
}
