#![allow(clippy::unwrap_used)]

use super::*;

fn strings(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_flag_value() {
    let args = strings(&["out.txt", "--currency", "USD"]);
    assert_eq!(flag_value(&args, "--currency"), Some("USD"));
    assert_eq!(flag_value(&args, "--csv"), None);
}

#[test]
fn test_positional_skips_flags() {
    let args = strings(&["--currency", "USD", "--csv", "out.csv"]);
    assert_eq!(positional(&args), vec!["out.csv"]);
    assert!(positional(&strings(&["--csv"])).is_empty());
}

#[test]
fn test_display_for_defaults_to_base() {
    let settings = Settings::default();
    let display = display_for(&[], &settings).unwrap();
    assert_eq!(display, DisplayState::identity(CurrencyCode::parse("INR").unwrap()));
}

#[test]
fn test_display_for_falls_back_when_unreachable() {
    let settings = Settings {
        rate_api_url: "http://127.0.0.1:9".to_string(),
        rate_timeout_secs: 1,
        ..Settings::default()
    };
    let args = strings(&["--currency", "usd"]);
    let display = display_for(&args, &settings).unwrap();
    assert_eq!(display.currency.as_str(), "INR");
}

#[test]
fn test_display_for_rejects_bad_code() {
    let args = strings(&["--currency", "dollars"]);
    assert!(display_for(&args, &Settings::default()).is_err());
}
