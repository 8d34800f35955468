#![allow(clippy::unwrap_used)]

use std::io::Write;

use super::*;

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_defaults() {
    let settings = Settings::default();
    assert_eq!(settings.base_currency, "INR");
    assert_eq!(settings.low_balance_percent, 10);
    assert_eq!(settings.storage_key, "cashflowData");
    assert!(settings.validate().is_ok());
}

#[test]
fn test_missing_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings::load_from(Some(&dir.path().join("nope.toml"))).unwrap();
    assert_eq!(settings.base_currency, "INR");
    assert_eq!(settings.rate_api_url, "https://api.frankfurter.app");
}

#[test]
fn test_file_overrides_defaults() {
    let file = write_config(
        r#"
base_currency = "EUR"
currencies = ["EUR", "GBP", "usd"]
low_balance_percent = 20
log_level = "debug"
"#,
    );
    let settings = Settings::load_from(Some(file.path())).unwrap();
    assert_eq!(settings.base_currency, "EUR");
    assert_eq!(settings.low_balance_percent, 20);
    assert_eq!(settings.log_level, "debug");
    // Untouched keys keep their defaults.
    assert_eq!(settings.storage_key, "cashflowData");
    let codes: Vec<String> = settings
        .display_currencies()
        .iter()
        .map(|c| c.to_string())
        .collect();
    assert_eq!(codes, vec!["EUR", "GBP", "USD"]);
}

#[test]
fn test_rejects_bad_base_currency() {
    let file = write_config(r#"base_currency = "rupees""#);
    assert!(Settings::load_from(Some(file.path())).is_err());
}

#[test]
fn test_rejects_out_of_range_threshold() {
    for bad in ["0", "101"] {
        let file = write_config(&format!("low_balance_percent = {bad}"));
        assert!(Settings::load_from(Some(file.path())).is_err(), "{bad}");
    }
}

#[test]
fn test_rejects_empty_storage_key() {
    let file = write_config(r#"storage_key = "  ""#);
    assert!(Settings::load_from(Some(file.path())).is_err());
}

#[test]
fn test_display_currencies_put_base_first() {
    let settings = Settings {
        base_currency: "INR".into(),
        currencies: vec!["USD".into(), "INR".into(), "bogus!".into()],
        ..Settings::default()
    };
    let codes: Vec<String> = settings
        .display_currencies()
        .iter()
        .map(|c| c.to_string())
        .collect();
    assert_eq!(codes, vec!["INR", "USD"]);
}

#[test]
fn test_data_dir_override_is_created() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("nested").join("data");
    let settings = Settings {
        data_dir: Some(target.clone()),
        ..Settings::default()
    };
    assert_eq!(settings.data_dir().unwrap(), target);
    assert!(target.is_dir());
}
