use std::collections::HashMap;

use tabfind_core::config::{self, Config, ConfigError, DisplayOrder, SearchMethod};

fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_match_workflow_defaults() {
    let cfg = Config::default();
    assert_eq!(cfg.search_method, SearchMethod::Tokenized);
    assert_eq!(cfg.display_order, DisplayOrder::Default);
    assert!(!cfg.use_cache);
    assert_eq!(cfg.cache_life_minutes, 10);
    assert!(cfg.include.spaces && cfg.include.top_tabs);
    assert!(config::validate(&cfg).is_ok());
}

#[test]
fn reads_every_workflow_variable() {
    let cfg = Config::from_vars(vars(&[
        ("search_method", "substring"),
        ("includeTopTabs", "0"),
        ("includePinnedTabs", "1"),
        ("includeUnpinnedTabs", "0"),
        ("includeSpaces", "0"),
        ("displayOrder", "sorted_alphabetically"),
        ("use_cache", "1"),
        ("alfred_workflow_cache", "/tmp/tabfind-wf"),
        ("cache_life", "3"),
    ]))
    .unwrap();

    assert_eq!(cfg.search_method, SearchMethod::Substring);
    assert!(!cfg.include.top_tabs);
    assert!(cfg.include.pinned_tabs);
    assert!(!cfg.include.unpinned_tabs);
    assert!(!cfg.include.spaces);
    assert_eq!(cfg.display_order, DisplayOrder::SortedAlphabetically);
    assert!(cfg.use_cache);
    assert_eq!(cfg.cache_path(), std::path::Path::new("/tmp/tabfind-wf/static_records.cache"));
    assert_eq!(cfg.cache_ttl_secs(), 180.0);
}

#[test]
fn explicit_cache_dir_wins_over_workflow_cache() {
    let cfg = Config::from_vars(vars(&[
        ("cache_dir", "/tmp/explicit"),
        ("alfred_workflow_cache", "/tmp/workflow"),
    ]))
    .unwrap();
    assert_eq!(cfg.cache_dir, std::path::PathBuf::from("/tmp/explicit"));
}

#[test]
fn rejects_unknown_search_method() {
    let error = Config::from_vars(vars(&[("search_method", "fuzzy")])).unwrap_err();
    match error {
        ConfigError::InvalidValue { key, value } => {
            assert_eq!(key, "search_method");
            assert_eq!(value, "fuzzy");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn rejects_non_binary_flag() {
    assert!(Config::from_vars(vars(&[("use_cache", "yes")])).is_err());
}

#[test]
fn rejects_zero_cache_life_when_caching() {
    let result = config::load(None, vars(&[("use_cache", "1"), ("cache_life", "0")]));
    assert!(matches!(result, Err(ConfigError::Validation(_))));
}

#[test]
fn huge_cache_life_is_rejected_without_overflow() {
    let lookup = vars(&[("use_cache", "1"), ("cache_life", "999999999999999999")]);
    let cfg = Config::from_vars(&lookup).unwrap();

    assert_eq!(cfg.cache_ttl_secs(), (u64::MAX as f64));
    assert!(matches!(
        config::validate(&cfg),
        Err(ConfigError::Validation(_))
    ));
    assert!(matches!(
        config::load(None, lookup),
        Err(ConfigError::Validation(_))
    ));
}

#[test]
fn week_long_cache_life_is_accepted() {
    let cfg = config::load(None, vars(&[("use_cache", "1"), ("cache_life", "10080")])).unwrap();
    assert_eq!(cfg.cache_ttl_secs(), 604_800.0);
}

#[test]
fn toml_file_is_overridden_by_variables() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tabfind.toml");
    std::fs::write(
        &path,
        "search_method = \"substring\"\nuse_cache = true\ncache_life = 30\nincludeSpaces = false\n",
    )
    .unwrap();

    let cfg = config::load(Some(&path), vars(&[("cache_life", "5")])).unwrap();

    assert_eq!(cfg.search_method, SearchMethod::Substring);
    assert!(cfg.use_cache);
    assert!(!cfg.include.spaces);
    assert_eq!(cfg.cache_life_minutes, 5);
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    std::fs::write(&path, "use_cache = [").unwrap();

    let result = config::load(Some(&path), vars(&[]));
    assert!(matches!(result, Err(ConfigError::Parse { .. })));
}
