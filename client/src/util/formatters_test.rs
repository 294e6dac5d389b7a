use super::*;

// =============================================================
// round_to
// =============================================================

#[test]
fn round_to_three_places() {
    assert_eq!(round_to(1.23456, 3), 1.235);
    assert_eq!(round_to(0.1 + 0.2, 3), 0.3);
}

#[test]
fn round_to_handles_binary_representation_edge() {
    assert_eq!(round_to(1.005, 2), 1.01);
}

#[test]
fn round_to_negative_values_round_half_up() {
    assert_eq!(round_to(-1.2345, 3), -1.234);
    assert_eq!(round_to(-0.0001, 3), 0.0);
}

#[test]
fn round_to_zero_places() {
    assert_eq!(round_to(2.5, 0), 3.0);
    assert_eq!(round_to(2.4, 0), 2.0);
}

#[test]
fn round_to_passes_through_non_finite() {
    assert!(round_to(f64::NAN, 2).is_nan());
    assert_eq!(round_to(f64::INFINITY, 2), f64::INFINITY);
}

// =============================================================
// format_abbreviated_number
// =============================================================

#[test]
fn abbreviated_small_numbers_are_plain() {
    assert_eq!(format_abbreviated_number(0.0), "0");
    assert_eq!(format_abbreviated_number(7.0), "7");
    assert_eq!(format_abbreviated_number(999.0), "999");
}

#[test]
fn abbreviated_fractions_keep_three_digits() {
    assert_eq!(format_abbreviated_number(0.5), "0.5");
    assert_eq!(format_abbreviated_number(12.3456), "12.346");
}

#[test]
fn abbreviated_thousands() {
    assert_eq!(format_abbreviated_number(1000.0), "1k");
    assert_eq!(format_abbreviated_number(1500.0), "1.5k");
    assert_eq!(format_abbreviated_number(1234.0), "1.2k");
    assert_eq!(format_abbreviated_number(10_500.0), "10.5k");
    assert_eq!(format_abbreviated_number(15_000.0), "15k");
    assert_eq!(format_abbreviated_number(15_500.0), "15k");
}

#[test]
fn abbreviated_millions_and_billions() {
    assert_eq!(format_abbreviated_number(2_500_000.0), "2.5m");
    assert_eq!(format_abbreviated_number(3_000_000.0), "3m");
    assert_eq!(format_abbreviated_number(1_000_000_000.0), "1b");
    assert_eq!(format_abbreviated_number(42_000_000_000.0), "42b");
}

#[test]
fn abbreviated_negative_numbers_are_grouped() {
    assert_eq!(format_abbreviated_number(-1500.0), "-1,500");
    assert_eq!(format_abbreviated_number(-0.25), "-0.25");
}

// =============================================================
// display_crash_free_percent
// =============================================================

#[test]
fn crash_free_percent_keeps_three_decimals_above_threshold() {
    assert_eq!(display_crash_free_percent(99.12345), "99.123%");
    assert_eq!(display_crash_free_percent(98.5), "98.5%");
    assert_eq!(display_crash_free_percent(95.0001), "95%");
}

#[test]
fn crash_free_percent_below_threshold_is_whole() {
    assert_eq!(display_crash_free_percent(87.6543), "88%");
    assert_eq!(display_crash_free_percent(50.5), "51%");
    assert_eq!(display_crash_free_percent(95.0), "95%");
    assert_eq!(display_crash_free_percent(94.4), "94%");
}

#[test]
fn crash_free_percent_rounds_up_to_whole() {
    assert_eq!(display_crash_free_percent(99.9999), "100%");
    assert_eq!(display_crash_free_percent(100.0), "100%");
}

#[test]
fn crash_free_percent_below_one_is_clamped_label() {
    assert_eq!(display_crash_free_percent(0.5), "<1%");
    assert_eq!(display_crash_free_percent(0.0001), "<1%");
}

#[test]
fn crash_free_percent_zero_and_one() {
    assert_eq!(display_crash_free_percent(0.0), "0%");
    assert_eq!(display_crash_free_percent(1.0), "1%");
}

#[test]
fn crash_free_percent_nan_renders_dash() {
    assert_eq!(display_crash_free_percent(f64::NAN), NOT_A_NUMBER);
}
