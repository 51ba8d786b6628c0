use super::*;
use chrono::NaiveDate;

fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, s)
        .unwrap()
}

#[test]
fn test_parse_without_fraction() {
    assert_eq!(
        parse_created("2021-01-01T00:00:00"),
        Some(at(2021, 1, 1, 0, 0, 0))
    );
}

#[test]
fn test_parse_truncates_fraction_and_zone() {
    assert_eq!(
        parse_created("2021-05-01T10:00:00.123456Z"),
        Some(at(2021, 5, 1, 10, 0, 0))
    );
}

#[test]
fn test_parse_truncates_nanoseconds() {
    assert_eq!(
        parse_created("2019-11-20T23:59:59.999999999Z"),
        Some(at(2019, 11, 20, 23, 59, 59))
    );
}

#[test]
fn test_parse_equals_parse_of_truncated_prefix() {
    for value in [
        "2020-02-29T12:30:45.1",
        "1999-12-31T23:59:59.000000Z",
        "2024-07-04T08:00:00.5+02:00",
    ] {
        let prefix = value.split('.').next().unwrap();
        assert_eq!(parse_created(value), parse_created(prefix));
        assert!(parse_created(value).is_some());
    }
}

#[test]
fn test_zone_suffix_without_fraction_is_rejected() {
    assert_eq!(parse_created("2021-05-01T10:00:00Z"), None);
}

#[test]
fn test_garbage_is_rejected() {
    assert_eq!(parse_created("not-a-date"), None);
    assert_eq!(parse_created(""), None);
    assert_eq!(parse_created("."), None);
}

#[test]
fn test_wrong_layout_is_rejected() {
    assert_eq!(parse_created("2021-05-01 10:00:00"), None);
    assert_eq!(parse_created("2021-05-01"), None);
    assert_eq!(parse_created("01/05/2021T10:00:00"), None);
}

#[test]
fn test_out_of_range_fields_are_rejected() {
    assert_eq!(parse_created("2021-13-01T10:00:00"), None);
    assert_eq!(parse_created("2021-02-30T10:00:00"), None);
    assert_eq!(parse_created("2021-05-01T25:00:00"), None);
}
