use crate::config::SearchMethod;
use crate::model::{ResultItem, TabRecord};
use crate::text::fold_for_match;

/// Pure match predicate for one query under one strategy.
///
/// Only the title goes through Unicode normalization; the other fields are
/// compared as lowercased raw text.
#[derive(Debug, Clone)]
pub struct Matcher {
    method: SearchMethod,
    query: String,
    tokens: Vec<String>,
}

impl Matcher {
    pub fn new(method: SearchMethod, query: &str) -> Self {
        let query = fold_for_match(query.trim());
        let tokens = query.split_whitespace().map(str::to_string).collect();
        Self {
            method,
            query,
            tokens,
        }
    }

    pub fn matches_fields(&self, title: &str, others: &[&str]) -> bool {
        let title = fold_for_match(title);
        let others: Vec<String> = others
            .iter()
            .filter(|field| !field.is_empty())
            .map(|field| field.to_lowercase())
            .collect();
        let hit = |needle: &str| {
            title.contains(needle) || others.iter().any(|field| field.contains(needle))
        };

        match self.method {
            SearchMethod::Substring => hit(self.query.as_str()),
            SearchMethod::Tokenized => self.tokens.iter().all(|token| hit(token.as_str())),
        }
    }

    /// Pre-filter over the static fields of a collected record.
    pub fn matches_record(&self, record: &TabRecord) -> bool {
        let mut others = Vec::with_capacity(2);
        if let Some(url) = record.url() {
            others.push(url);
        }
        if let Some(space_title) = record.space_title() {
            others.push(space_title);
        }
        self.matches_fields(record.title(), &others)
    }

    /// Post-filter over the built title and composed subtitle.
    pub fn matches_item(&self, item: &ResultItem) -> bool {
        self.matches_fields(item.plain_title(), &[item.subtitle.as_str()])
    }
}

pub fn filter_records(records: Vec<TabRecord>, matcher: &Matcher) -> Vec<TabRecord> {
    records
        .into_iter()
        .filter(|record| matcher.matches_record(record))
        .collect()
}

pub fn filter_items(items: Vec<ResultItem>, matcher: &Matcher) -> Vec<ResultItem> {
    items
        .into_iter()
        .filter(|item| matcher.matches_item(item))
        .collect()
}
