use super::*;

// =============================================================
// Helpers
// =============================================================

fn base_project() -> Project {
    Project {
        id: "11".to_owned(),
        slug: "backend".to_owned(),
        name: "Backend".to_owned(),
        platform: Some("python".to_owned()),
        ..Project::default()
    }
}

// =============================================================
// Project serde
// =============================================================

#[test]
fn project_deserializes_camel_case_payload() {
    let json = serde_json::json!({
        "id": "11",
        "slug": "backend",
        "name": "Backend",
        "platform": "python",
        "firstEvent": "2021-01-01T00:00:00Z",
        "firstTransactionEvent": true,
        "stats": [[1_600_000_000, 3], [1_600_003_600, 4]],
        "transactionStats": [[1_600_000_000, 10]],
        "sessionStats": {
            "currentCrashFreeRate": 99.5,
            "previousCrashFreeRate": 98.25,
            "hasHealthData": true
        }
    });

    let project: Project = serde_json::from_value(json).unwrap();
    assert_eq!(project.slug, "backend");
    assert_eq!(project.first_event.as_deref(), Some("2021-01-01T00:00:00Z"));
    assert!(project.first_transaction_event);
    assert_eq!(project.stats, Some(vec![(1_600_000_000, 3), (1_600_003_600, 4)]));
    assert_eq!(project.transaction_stats, Some(vec![(1_600_000_000, 10)]));
    let session = project.session_stats.unwrap();
    assert_eq!(session.current_crash_free_rate, Some(99.5));
    assert_eq!(session.previous_crash_free_rate, Some(98.25));
    assert!(session.has_health_data);
}

#[test]
fn project_missing_optional_blocks_defaults_to_none() {
    let project: Project = serde_json::from_str(r#"{"id":"1","slug":"web"}"#).unwrap();
    assert_eq!(project.name, "");
    assert!(project.platform.is_none());
    assert!(project.stats.is_none());
    assert!(project.transaction_stats.is_none());
    assert!(project.session_stats.is_none());
    assert!(!project.first_transaction_event);
}

#[test]
fn project_null_series_is_none() {
    let project: Project = serde_json::from_str(r#"{"id":"1","slug":"web","stats":null}"#).unwrap();
    assert!(project.stats.is_none());
}

#[test]
fn series_accepts_integer_valued_floats() {
    let project: Project = serde_json::from_str(r#"{"id":"1","slug":"web","stats":[[10.0, 2.0]]}"#).unwrap();
    assert_eq!(project.stats, Some(vec![(10, 2)]));
}

#[test]
fn series_rejects_fractional_counts() {
    let err = serde_json::from_str::<Project>(r#"{"id":"1","slug":"web","stats":[[10, 2.5]]}"#).unwrap_err();
    assert!(err.to_string().contains("integer-compatible"));
}

#[test]
fn series_rejects_negative_counts() {
    let err = serde_json::from_str::<Project>(r#"{"id":"1","slug":"web","stats":[[10, -1]]}"#).unwrap_err();
    assert!(err.to_string().contains("negative count"));
}

#[test]
fn session_stats_tolerate_missing_rates() {
    let stats: SessionStats = serde_json::from_str(r#"{"hasHealthData":false}"#).unwrap();
    assert_eq!(stats, SessionStats::default());
}

// =============================================================
// Project::merged_with
// =============================================================

#[test]
fn merged_with_none_returns_base() {
    let project = base_project();
    assert_eq!(project.merged_with(None), project);
}

#[test]
fn merged_with_details_overlays_loaded_fields() {
    let project = base_project();
    let details = Project {
        id: "ignored".to_owned(),
        slug: "ignored".to_owned(),
        stats: Some(vec![(1, 5)]),
        session_stats: Some(SessionStats { has_health_data: true, ..SessionStats::default() }),
        ..Project::default()
    };

    let merged = project.merged_with(Some(&details));
    assert_eq!(merged.id, "11");
    assert_eq!(merged.slug, "backend");
    assert_eq!(merged.name, "Backend");
    assert_eq!(merged.platform.as_deref(), Some("python"));
    assert_eq!(merged.stats, Some(vec![(1, 5)]));
    assert!(merged.session_stats.unwrap().has_health_data);
}

#[test]
fn merged_with_prefers_detail_values_when_both_present() {
    let mut project = base_project();
    project.stats = Some(vec![(1, 1)]);
    let details = Project { name: "Backend API".to_owned(), stats: Some(vec![(1, 9)]), ..Project::default() };

    let merged = project.merged_with(Some(&details));
    assert_eq!(merged.name, "Backend API");
    assert_eq!(merged.stats, Some(vec![(1, 9)]));
}

#[test]
fn merged_with_takes_first_transaction_flag_from_details() {
    let project = Project { first_transaction_event: true, ..base_project() };

    let cleared = project.merged_with(Some(&Project::default()));
    assert!(!cleared.first_transaction_event);

    let details = Project {
        first_transaction_event: true,
        ..Project::default()
    };
    let set = base_project().merged_with(Some(&details));
    assert!(set.first_transaction_event);
}

// =============================================================
// Organization
// =============================================================

#[test]
fn organization_feature_lookup() {
    let org = Organization { slug: "acme".to_owned(), features: vec!["performance-view".to_owned()] };
    assert!(org.has_feature("performance-view"));
    assert!(org.has_performance());
    assert!(!org.has_feature("discover"));
}

#[test]
fn organization_without_features_has_no_performance() {
    let org = Organization { slug: "acme".to_owned(), features: Vec::new() };
    assert!(!org.has_performance());
}
