use std::collections::BTreeMap;
use std::time::Instant;

use crate::config::{DisplayOrder, SearchMethod};
use crate::model::{DynamicState, TabRecord};
use crate::ranker::rank;
use crate::result_builder::build;
use crate::search::{filter_items, filter_records, Matcher};

/// Nearest-rank percentile; `samples` is reordered.
fn percentile_ms(samples: &mut [f64], percentile: usize) -> f64 {
    let rank = (samples.len() * percentile).div_ceil(100).max(1);
    let (_, value, _) = samples.select_nth_unstable_by(rank - 1, f64::total_cmp);
    *value
}

#[test]
fn warm_query_p95_under_budget() {
    let mut records: Vec<TabRecord> = (0..10_000)
        .map(|i| TabRecord::Unpinned {
            title: format!("Document {i:05}"),
            url: format!("https://docs.example.com/{i:05}"),
            space_index: i % 8,
            tab_index: i,
            space_title: format!("Space {}", i % 8),
        })
        .collect();
    records.push(TabRecord::Pinned {
        title: "GitHub PR #42".to_string(),
        url: "https://github.com/acme/app/pull/42".to_string(),
        space_index: 0,
        tab_index: 0,
        space_title: "Space 0".to_string(),
    });

    let dynamic = DynamicState {
        number_of_windows: 1,
        window_active_spaces: BTreeMap::from([(0, "Space 0".to_string())]),
    };
    let matcher = Matcher::new(SearchMethod::Tokenized, "git pull");

    let run = || {
        let filtered = filter_records(records.clone(), &matcher);
        let items = filter_items(build(&filtered, &dynamic, false), &matcher);
        rank(items, DisplayOrder::Default)
    };

    for _ in 0..5 {
        assert_eq!(run().len(), 1);
    }

    let mut batch_p95 = Vec::with_capacity(3);
    for _ in 0..3 {
        let mut samples = Vec::with_capacity(20);
        for _ in 0..20 {
            let start = Instant::now();
            let _ = run();
            samples.push(start.elapsed().as_secs_f64() * 1000.0);
        }
        batch_p95.push(percentile_ms(&mut samples, 95));
    }

    let median_p95 = percentile_ms(&mut batch_p95, 50);

    assert!(
        median_p95 <= 500.0,
        "median batch p95 too high: {median_p95:.3}ms (budget 500.0ms); batches={batch_p95:?}",
    );
}
