use std::io::Write;

use serde_json::json;

use super::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn acme_summary() -> Value {
    json!({
        "ad": {
            "id": "A1",
            "first_shown_date": "20240101",
            "last_shown_date": "20240103",
            "reach": {"unique_users_seen": "10K"}
        },
        "advertiser": {"business_name": "Acme"}
    })
}

// ---------------------------------------------------------------------------
// payload shapes
// ---------------------------------------------------------------------------

#[test]
fn search_summary_shape_is_normalized() {
    let record = normalize_entry(&acme_summary()).unwrap();
    assert_eq!(
        record,
        AdRecord {
            id: AdId::new("A1"),
            first_shown: date(2024, 1, 1),
            last_shown: date(2024, 1, 3),
            reach_volume: 10_000.0,
            advertiser: "Acme".to_owned(),
        }
    );
}

#[test]
fn detail_shape_is_normalized() {
    let entry = json!({
        "data": {
            "ad": {
                "id": 1_789_000_000_123_u64,
                "first_shown_date": 20_240_201,
                "last_shown_date": "20240205",
                "reach": {"unique_users_seen": "1M-10M"}
            },
            "advertiser": {"business_name": "Globex"}
        },
        "error": {"code": "ok", "message": ""}
    });

    let record = normalize_entry(&entry).unwrap();

    assert_eq!(record.id, AdId::new("1789000000123"));
    assert_eq!(record.first_shown, date(2024, 2, 1));
    assert_eq!(record.last_shown, date(2024, 2, 5));
    assert!((record.reach_volume - 5_500_000.0).abs() < f64::EPSILON);
    assert_eq!(record.advertiser, "Globex");
}

#[test]
fn bare_ad_object_is_normalized() {
    let entry = json!({
        "id": "B7",
        "first_shown_date": "20240301",
        "last_shown_date": "20240301"
    });

    let record = normalize_entry(&entry).unwrap();

    assert_eq!(record.id, AdId::new("B7"));
    assert!(record.reach_volume.abs() < f64::EPSILON);
    assert_eq!(record.advertiser, UNKNOWN_ADVERTISER);
}

#[test]
fn collector_output_entry_is_unwrapped() {
    let entry = json!({"id": "A1", "basic_info": acme_summary()});
    let record = normalize_entry(&entry).unwrap();
    assert_eq!(record.id, AdId::new("A1"));
    assert_eq!(record.advertiser, "Acme");
}

// ---------------------------------------------------------------------------
// rejections
// ---------------------------------------------------------------------------

#[test]
fn non_ok_error_status_is_rejected() {
    let mut entry = acme_summary();
    entry["error"] = json!({"code": "access_denied", "message": "nope"});
    assert_eq!(normalize_entry(&entry), Err(Rejection::ErrorStatus));
}

#[test]
fn failed_fetch_marker_is_rejected() {
    let entry = json!({"ad_id": "A1", "error": "request timed out"});
    assert_eq!(normalize_entry(&entry), Err(Rejection::ErrorStatus));
}

#[test]
fn error_object_without_code_is_rejected() {
    let mut entry = acme_summary();
    entry["error"] = json!({"message": "?"});
    assert_eq!(normalize_entry(&entry), Err(Rejection::ErrorStatus));
}

#[test]
fn missing_id_is_rejected() {
    let mut entry = acme_summary();
    entry["ad"].as_object_mut().unwrap().remove("id");
    assert_eq!(normalize_entry(&entry), Err(Rejection::MissingId));
}

#[test]
fn detail_without_ad_is_rejected() {
    let entry = json!({"data": {"advertiser": {}}, "error": {"code": "ok"}});
    assert_eq!(normalize_entry(&entry), Err(Rejection::MissingId));
}

#[test]
fn missing_first_shown_is_rejected() {
    let mut entry = acme_summary();
    entry["ad"]
        .as_object_mut()
        .unwrap()
        .remove("first_shown_date");
    assert_eq!(normalize_entry(&entry), Err(Rejection::MissingFirstShown));
}

#[test]
fn missing_last_shown_is_rejected_even_with_first_shown() {
    let mut entry = acme_summary();
    entry["ad"].as_object_mut().unwrap().remove("last_shown_date");
    assert_eq!(normalize_entry(&entry), Err(Rejection::MissingLastShown));
}

#[test]
fn malformed_date_is_rejected_with_field_and_value() {
    let mut entry = acme_summary();
    entry["ad"]["last_shown_date"] = json!("2024-01-03");
    assert_eq!(
        normalize_entry(&entry),
        Err(Rejection::InvalidDate {
            field: "last_shown_date",
            value: "2024-01-03".to_owned(),
        })
    );
}

#[test]
fn inverted_range_is_rejected() {
    let mut entry = acme_summary();
    entry["ad"]["first_shown_date"] = json!("20240105");
    assert_eq!(normalize_entry(&entry), Err(Rejection::InvertedDateRange));
}

#[test]
fn unparseable_reach_is_rejected() {
    let mut entry = acme_summary();
    entry["ad"]["reach"]["unique_users_seen"] = json!("a lot");
    assert!(matches!(
        normalize_entry(&entry),
        Err(Rejection::InvalidReach(_))
    ));
}

#[test]
fn unparseable_country_reach_is_rejected() {
    let mut entry = acme_summary();
    entry["ad"]["reach"]["unique_users_seen_by_country"] = json!({"NL": "10K", "BE": "??"});
    assert!(matches!(
        normalize_entry(&entry),
        Err(Rejection::InvalidReach(_))
    ));
}

#[test]
fn non_object_entry_is_rejected() {
    assert_eq!(normalize_entry(&json!("A1")), Err(Rejection::NotAnObject));
    assert_eq!(normalize_entry(&json!(null)), Err(Rejection::NotAnObject));
}

// ---------------------------------------------------------------------------
// reach selection
// ---------------------------------------------------------------------------

#[test]
fn reach_takes_country_sum_when_larger() {
    let mut entry = acme_summary();
    entry["ad"]["reach"] = json!({
        "unique_users_seen": "50K",
        "unique_users_seen_by_country": {"NL": "100K", "BE": "20K"}
    });
    let record = normalize_entry(&entry).unwrap();
    assert!((record.reach_volume - 120_000.0).abs() < f64::EPSILON);
}

#[test]
fn reach_takes_global_when_larger() {
    let mut entry = acme_summary();
    entry["ad"]["reach"] = json!({
        "unique_users_seen": "1M",
        "unique_users_seen_by_country": {"NL": "100K"}
    });
    let record = normalize_entry(&entry).unwrap();
    assert!((record.reach_volume - 1_000_000.0).abs() < f64::EPSILON);
}

#[test]
fn numeric_reach_is_taken_literally() {
    let mut entry = acme_summary();
    entry["ad"]["reach"] = json!({"unique_users_seen": 4200});
    let record = normalize_entry(&entry).unwrap();
    assert!((record.reach_volume - 4_200.0).abs() < f64::EPSILON);
}

// ---------------------------------------------------------------------------
// batches
// ---------------------------------------------------------------------------

#[test]
fn batch_keeps_good_entries_and_counts_rejections() {
    let mut no_last = acme_summary();
    no_last["ad"].as_object_mut().unwrap().remove("last_shown_date");
    let data = json!([
        acme_summary(),
        no_last,
        {"ad_id": "9", "error": "timeout"},
        {"ad_id": "10", "error": "timeout"},
        {"id": "A2", "basic_info": {"ad": {"id": "A2", "first_shown_date": "20240102", "last_shown_date": "20240102"}}}
    ]);

    let outcome = load_records(&data);

    let ids: Vec<&str> = outcome.records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["A1", "A2"]);
    assert_eq!(outcome.rejected.get("missing_last_shown"), Some(&1));
    assert_eq!(outcome.rejected.get("error_status"), Some(&2));
    assert_eq!(outcome.rejected_total(), 3);
}

#[test]
fn single_object_is_a_batch_of_one() {
    let outcome = load_records(&acme_summary());
    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.rejected_total(), 0);
}

#[test]
fn load_from_path_reads_json_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", json!([acme_summary()])).unwrap();

    let outcome = load_records_from_path(file.path()).unwrap();

    assert_eq!(outcome.records.len(), 1);
}

#[test]
fn load_from_missing_path_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_records_from_path(&dir.path().join("absent.json"));
    assert!(matches!(result, Err(LoadError::NotFound { .. })));
}

#[test]
fn load_from_invalid_json_is_a_json_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "not json").unwrap();

    let result = load_records_from_path(file.path());

    assert!(matches!(result, Err(LoadError::Json { .. })));
}
