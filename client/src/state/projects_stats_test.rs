use super::*;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

fn project(slug: &str, errors: u64) -> Project {
    Project {
        id: format!("id-{slug}"),
        slug: slug.to_owned(),
        stats: Some(vec![(0, errors)]),
        ..Project::default()
    }
}

// =============================================================
// projects_stats_store
// =============================================================

#[test]
fn new_store_has_no_projects() {
    let store = projects_stats_store();
    assert!(store.get_state().is_empty());
}

#[test]
fn store_compares_projects_by_value() {
    let store = projects_stats_store();
    assert!(store.publish_update("web", project("web", 5)));
    assert!(!store.publish_update("web", project("web", 5)));
    assert!(store.publish_update("web", project("web", 6)));
}

// =============================================================
// on_stats_load_success
// =============================================================

#[test]
fn load_success_keys_projects_by_slug() {
    let store = projects_stats_store();
    let changed = on_stats_load_success(&store, vec![project("web", 1), project("api", 2)]);

    assert_eq!(changed, 2);
    assert_eq!(store.get("web").unwrap().stats, Some(vec![(0, 1)]));
    assert_eq!(store.get("api").unwrap().stats, Some(vec![(0, 2)]));
}

#[test]
fn load_success_notifies_once_with_full_mapping() {
    let store = projects_stats_store();
    on_stats_load_success(&store, vec![project("old", 1)]);

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let _sub = store.subscribe(move |state| {
        let mut keys: Vec<String> = state.keys().cloned().collect();
        keys.sort();
        sink.lock().unwrap().push(keys);
    });

    on_stats_load_success(&store, vec![project("web", 1), project("api", 2)]);

    assert_eq!(*seen.lock().unwrap(), vec![vec!["api".to_owned(), "old".to_owned(), "web".to_owned()]]);
}

#[test]
fn load_success_with_unchanged_payload_is_silent() {
    let store = projects_stats_store();
    on_stats_load_success(&store, vec![project("web", 1)]);

    let calls = Arc::new(AtomicUsize::new(0));
    let sink = Arc::clone(&calls);
    let _sub = store.subscribe(move |_| {
        sink.fetch_add(1, Ordering::SeqCst);
    });

    assert_eq!(on_stats_load_success(&store, vec![project("web", 1)]), 0);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn load_success_with_empty_response_is_silent() {
    let store = projects_stats_store();
    assert_eq!(on_stats_load_success(&store, Vec::new()), 0);
    assert!(store.is_empty());
}
