use std::collections::BTreeMap;

use chrono::{Duration, TimeZone, Utc};

use super::{ReportOptions, ReportRequest};

fn base_request() -> ReportRequest {
    let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).single().expect("valid time");
    let mut key_filters = BTreeMap::new();
    key_filters.insert(
        "Site".to_string(),
        vec!["site-a".to_string(), "site-b".to_string()],
    );
    ReportRequest {
        type_name: "JobActivity".to_string(),
        report_name: "Total Value".to_string(),
        start_time: start,
        end_time: start + Duration::hours(2),
        grouping: vec!["Site".to_string()],
        key_filters,
        options: ReportOptions::default(),
        generate_plot: true,
    }
}

#[test]
fn structurally_equal_requests_share_a_hash() {
    let first = base_request();
    let second = base_request();
    assert_eq!(first.content_hash(), second.content_hash());
}

#[test]
fn changing_a_filter_value_changes_the_hash() {
    let first = base_request();
    let mut second = base_request();
    second
        .key_filters
        .insert("Site".to_string(), vec!["site-a".to_string(), "site-c".to_string()]);
    assert_ne!(first.content_hash(), second.content_hash());
}

#[test]
fn filter_value_order_does_not_change_the_hash() {
    let first = base_request();
    let mut second = base_request();
    second
        .key_filters
        .insert("Site".to_string(), vec!["site-b".to_string(), "site-a".to_string()]);
    assert_eq!(first.content_hash(), second.content_hash());
}

#[test]
fn grouping_order_changes_the_hash() {
    let mut first = base_request();
    first.grouping = vec!["Site".to_string(), "Status".to_string()];
    let mut second = base_request();
    second.grouping = vec!["Status".to_string(), "Site".to_string()];
    assert_ne!(first.content_hash(), second.content_hash());
}

#[test]
fn options_are_part_of_the_hash() {
    let first = base_request();
    let mut second = base_request();
    second.options.width = Some(1024);
    assert_ne!(first.content_hash(), second.content_hash());
}

#[test]
fn generate_plot_is_not_part_of_the_hash() {
    let first = base_request();
    let mut second = base_request();
    second.generate_plot = false;
    assert_eq!(first.content_hash(), second.content_hash());
}

#[test]
fn validate_requires_start_before_end() {
    let mut request = base_request();
    request.end_time = request.start_time;
    assert!(request.validate().is_err());

    let request = base_request();
    assert!(request.validate().is_ok());
}
