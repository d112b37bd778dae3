use approx::assert_relative_eq;
use chartkick::coerce::{
    Timestamp, format_number, parse_float, parse_time, to_float, to_str, to_time,
};
use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use serde_json::json;

fn millis(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> i64 {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, s)
        .single()
        .unwrap()
        .timestamp_millis()
}

#[test]
fn float_reads_leading_numeric_portion() {
    assert_eq!(to_float(&json!("12.5abc")), 12.5);
    assert_eq!(to_float(&json!("  -3e2x")), -300.0);
    assert_eq!(to_float(&json!(".5")), 0.5);
    assert_eq!(to_float(&json!("1e")), 1.0);
    assert_eq!(to_float(&json!(7)), 7.0);
    assert_eq!(to_float(&json!([3, 4])), 3.0);
    assert!(to_float(&json!("Infinity")).is_infinite());
}

#[test]
fn only_ascii_digits_count() {
    assert_eq!(parse_float("1\u{0663}"), 1.0);
    assert!(parse_float("\u{0663}").is_nan());
    assert!(!parse_time("\u{0662}\u{0660}\u{0662}\u{0663}-01-01").is_valid());
}

#[test]
fn float_fails_silently_to_nan() {
    assert!(to_float(&json!("abc")).is_nan());
    assert!(to_float(&json!("")).is_nan());
    assert!(to_float(&json!(null)).is_nan());
    assert!(to_float(&json!(true)).is_nan());
    assert!(to_float(&json!({"a": 1})).is_nan());
}

#[test]
fn strings_use_natural_representation() {
    assert_eq!(to_str(&json!(2020)), "2020");
    assert_eq!(to_str(&json!(2020.0)), "2020");
    assert_eq!(to_str(&json!(1.5)), "1.5");
    assert_eq!(to_str(&json!(-7)), "-7");
    assert_eq!(to_str(&json!(true)), "true");
    assert_eq!(to_str(&json!(null)), "null");
    assert_eq!(to_str(&json!("Jan")), "Jan");
    assert_eq!(to_str(&json!([1, null, "a"])), "1,,a");
    assert_eq!(to_str(&json!({"a": 1})), "[object Object]");
}

#[test]
fn extreme_magnitudes_use_exponent_notation() {
    assert_eq!(format_number(1e21), "1e+21");
    assert_eq!(format_number(1e-7), "1e-7");
    assert_eq!(format_number(0.000001), "0.000001");
    assert_eq!(format_number(f64::NAN), "NaN");
    assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
    assert_eq!(format_number(-0.0), "0");
}

proptest! {
    #[test]
    fn float_string_round_trip(x in -1e300f64..1e300f64) {
        let back = to_float(&json!(to_str(&json!(x))));
        assert_relative_eq!(back, x);
    }
}

#[test]
fn numbers_are_unix_seconds() {
    assert_eq!(
        to_time(&json!(1672531200)).millis(),
        Some(millis(2023, 1, 1, 0, 0, 0))
    );
}

#[test]
fn date_only_strings_are_utc_midnight() {
    assert_eq!(parse_time("2023-01-02").millis(), Some(millis(2023, 1, 2, 0, 0, 0)));
}

#[test]
fn space_and_utc_suffix_are_normalized() {
    assert_eq!(
        parse_time("2023-01-02 03:04:05 UTC").millis(),
        Some(millis(2023, 1, 2, 3, 4, 5))
    );
    assert_eq!(
        parse_time("2023-01-02 03:04").millis(),
        Some(millis(2023, 1, 2, 3, 4, 0))
    );
}

#[test]
fn fractional_seconds_accept_comma_and_dot() {
    let base = millis(2023, 1, 2, 3, 4, 5);
    assert_eq!(parse_time("2023-01-02T03:04:05.250Z").millis(), Some(base + 250));
    assert_eq!(parse_time("2023-01-02T03:04:05,5Z").millis(), Some(base + 500));
}

#[test]
fn offsets_shift_to_utc() {
    assert_eq!(
        parse_time("2023-01-02T03:04:05+02:00").millis(),
        Some(millis(2023, 1, 2, 1, 4, 5))
    );
    assert_eq!(
        parse_time("2023-01-02T03:04:05-0130").millis(),
        Some(millis(2023, 1, 2, 4, 34, 5))
    );
}

#[test]
fn compact_form_without_separators() {
    assert_eq!(parse_time("20230102T0304").millis(), Some(millis(2023, 1, 2, 3, 4, 0)));
}

#[test]
fn non_iso_strings_fall_back_to_common_formats() {
    assert_eq!(parse_time("2023/01/02").millis(), Some(millis(2023, 1, 2, 0, 0, 0)));
    assert_eq!(parse_time("Jan 02, 2023").millis(), Some(millis(2023, 1, 2, 0, 0, 0)));
    assert_eq!(
        parse_time("Mon, 02 Jan 2023 03:04:05 +0000").millis(),
        Some(millis(2023, 1, 2, 3, 4, 5))
    );
}

#[test]
fn unparseable_times_are_invalid_not_errors() {
    assert!(!parse_time("not a date").is_valid());
    assert!(!to_time(&json!(null)).is_valid());
    assert!(!to_time(&json!(true)).is_valid());
    assert!(!to_time(&json!({"y": 2023})).is_valid());
    assert_eq!(Timestamp::INVALID.to_string(), "Invalid Date");
}

#[test]
fn structured_dates_pass_through() {
    let d = Utc.with_ymd_and_hms(2020, 5, 6, 7, 8, 9).single().unwrap();
    assert_eq!(Timestamp::from(d).datetime(), Some(d));
}
