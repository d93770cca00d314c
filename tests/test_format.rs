// Format configuration provider and formatter tests
// Author: Gabriel Demetrios Lafis

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};

use dashboard_config_engine::format::{
    format_compact, format_currency, format_date, format_number, format_percent, global,
    DateFormat, FormatConfig, FormatConfigProvider, Separators,
};

fn locale(tag: &str) -> FormatConfig {
    FormatConfig {
        locale: tag.to_string(),
        ..FormatConfig::default()
    }
}

#[test]
fn test_subscribers_see_updates() {
    let provider = FormatConfigProvider::default();
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::new(Mutex::new(Vec::new()));

    let counter = calls.clone();
    let first = provider.subscribe(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    let sink = seen.clone();
    provider.subscribe(move |cfg| sink.lock().unwrap().push(cfg.currency.clone()));
    assert_eq!(provider.listener_count(), 2);

    provider.update(|cfg| cfg.currency = "EUR".to_string());
    provider.set(FormatConfig {
        currency: "GBP".to_string(),
        ..FormatConfig::default()
    });

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(*seen.lock().unwrap(), vec!["EUR", "GBP"]);
    assert_eq!(provider.get().currency, "GBP");

    assert!(provider.unsubscribe(first));
    assert!(!provider.unsubscribe(first));

    provider.update(|cfg| cfg.decimals = 0);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(seen.lock().unwrap().len(), 3);
}

#[test]
fn test_listener_can_read_provider() {
    let provider = Arc::new(FormatConfigProvider::default());
    let observed = Arc::new(Mutex::new(None));

    let inner = provider.clone();
    let slot = observed.clone();
    provider.subscribe(move |_| {
        *slot.lock().unwrap() = Some(inner.get().locale);
    });

    provider.update(|cfg| cfg.locale = "pt-BR".to_string());
    assert_eq!(observed.lock().unwrap().as_deref(), Some("pt-BR"));
}

#[test]
fn test_global_provider_is_shared() {
    assert!(Arc::ptr_eq(&global(), &global()));
}

#[test]
fn test_config_wire_shape() {
    let cfg: FormatConfig =
        serde_json::from_value(serde_json::json!({ "dateFormat": "long", "nullValue": "n/a" }))
            .unwrap();

    assert_eq!(cfg.date_format, DateFormat::Long);
    assert_eq!(cfg.null_value, "n/a");
    assert_eq!(cfg.currency, "USD");
}

#[test]
fn test_separators() {
    assert_eq!(Separators::for_locale("en-US").decimal, '.');
    assert_eq!(Separators::for_locale("de_DE").thousands, '.');
    assert_eq!(Separators::for_locale("fr").thousands, ' ');
}

#[test]
fn test_format_number() {
    let cfg = FormatConfig::default();
    assert_eq!(format_number(Some(1234567.891), &cfg), "1,234,567.89");
    assert_eq!(format_number(Some(-0.001), &cfg), "0.00");
    assert_eq!(format_number(Some(-42.0), &cfg), "-42.00");
    assert_eq!(format_number(None, &cfg), "-");
    assert_eq!(format_number(Some(f64::NAN), &cfg), "-");

    assert_eq!(format_number(Some(1234567.891), &locale("de-DE")), "1.234.567,89");
    assert_eq!(format_number(Some(1234567.891), &locale("fr-FR")), "1 234 567,89");
}

#[test]
fn test_format_currency() {
    let cfg = FormatConfig::default();
    assert_eq!(format_currency(Some(1234.5), &cfg), "$1,234.50");
    assert_eq!(format_currency(Some(-1234.5), &cfg), "-$1,234.50");

    let eur = FormatConfig {
        currency: "eur".to_string(),
        ..locale("de-DE")
    };
    assert_eq!(format_currency(Some(1234.5), &eur), "1.234,50 €");

    let chf = FormatConfig {
        currency: "CHF".to_string(),
        ..FormatConfig::default()
    };
    assert_eq!(format_currency(Some(1234.5), &chf), "CHF 1,234.50");
}

#[test]
fn test_format_percent_and_compact() {
    let cfg = FormatConfig::default();
    assert_eq!(format_percent(Some(0.256), &cfg), "25.60%");
    assert_eq!(format_compact(Some(1_500_000.0), &cfg), "1.5M");
    assert_eq!(format_compact(Some(-2_500.0), &cfg), "-2.5K");
    assert_eq!(format_compact(Some(999.0), &cfg), "999.00");
    assert_eq!(format_compact(None, &cfg), "-");
}

#[test]
fn test_format_compact_rounds_before_scaling() {
    let cfg = FormatConfig::default();
    assert_eq!(format_compact(Some(999_950.0), &cfg), "1.0M");
    assert_eq!(format_compact(Some(-999_950.0), &cfg), "-1.0M");
    assert_eq!(format_compact(Some(999_949.0), &cfg), "999.9K");
    assert_eq!(format_compact(Some(999.996), &cfg), "1.0K");
    assert_eq!(format_compact(Some(1e15), &cfg), "1,000.0T");
}

#[test]
fn test_format_date() {
    let ts = Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 0).unwrap();
    let mut cfg = FormatConfig::default();

    assert_eq!(format_date(Some(ts), &cfg), "Mar 5, 2024");

    cfg.date_format = DateFormat::Short;
    assert_eq!(format_date(Some(ts), &cfg), "03/05/2024");
    cfg.locale = "en-GB".to_string();
    assert_eq!(format_date(Some(ts), &cfg), "05/03/2024");

    cfg.date_format = DateFormat::Long;
    assert_eq!(format_date(Some(ts), &cfg), "March 5, 2024");

    cfg.date_format = DateFormat::Iso;
    cfg.include_time = true;
    assert_eq!(format_date(Some(ts), &cfg), "2024-03-05 14:30");
    assert_eq!(format_date(None, &cfg), "-");
}
