// Dashboard builder example
// Author: Gabriel Demetrios Lafis

use chrono::Utc;
use serde_json::json;

use dashboard_config_engine::{
    dashboard::{
        add_widget, apply_theme, build_save_payload, find_theme, get_auto_refresh_ms,
        get_effective_time_range, validate_config, DashboardFormConfig, DashboardGrid, PageMode,
        TimeRange, TimeRangeMode, TimeUnit, ValidationMessages,
    },
    format::{format_currency, format_number, FormatConfig},
    storage::MemoryStorage,
    widget::{build_chart_config, BucketType, ColumnInfo, Widget, WidgetFormStore, WidgetType},
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Configure a widget
    let mut store = WidgetFormStore::new(WidgetType::Bar);
    store.set_name("Revenue by region");
    store.update_metric(0, |metric| {
        metric.field = "revenue".to_string();
    })?;
    let bucket = store.add_bucket(BucketType::Terms)?;
    store.update_bucket(bucket, |b| b.field = "region".to_string())?;
    store.set_param("echarts.bar.barWidth", json!(24));

    // Point it at a data source that lost a column
    let columns = vec![ColumnInfo::new("revenue", "number"), ColumnInfo::new("country", "string")];
    for warning in store.attach_source("sales", &columns) {
        println!("warning: {}", warning.message());
    }

    // Keep a draft around while editing
    let drafts = MemoryStorage::new();
    store.save_draft(&drafts)?;
    let restored = WidgetFormStore::restore_draft(&drafts)?;
    println!("Draft restored: {}", restored.is_some());

    // Render configuration
    let payload = store.build_save_payload();
    let widget = Widget {
        id: Some("w-revenue".to_string()),
        name: payload.name.clone(),
        widget_type: payload.widget_type.as_str().to_string(),
        data_source_id: payload.data_source_id.clone(),
        config: payload.config.clone(),
    };
    let chart = build_chart_config(&widget)?;
    println!("Chart config:\n{}", serde_json::to_string_pretty(&chart)?);

    // Lay out a dashboard
    let mut config = DashboardFormConfig::default();
    config.title = "  Sales overview ".to_string();
    for id in ["w-revenue", "w-orders", "w-margin"] {
        let item = add_widget(&mut config, id)?;
        println!("{} placed at ({}, {})", id, item.x, item.y);
    }
    config.time_range = TimeRange {
        mode: TimeRangeMode::Relative,
        relative_value: Some(7),
        relative_unit: TimeUnit::Day,
        ..TimeRange::default()
    };
    config.auto_refresh.enabled = true;
    config.auto_refresh.interval_value = Some(5);

    apply_theme(&mut config, &find_theme("midnight")?);

    let errors = validate_config(&config, &ValidationMessages::default());
    println!("Validation errors: {:?}", errors);

    let range = get_effective_time_range(&config.time_range, Utc::now());
    println!("Effective range: {:?} .. {:?}", range.from, range.to);
    println!("Refresh every {:?} ms", get_auto_refresh_ms(&config.auto_refresh));

    // Mobile projection
    let mut grid = DashboardGrid::new(config.layout.clone(), PageMode::View);
    grid.set_container_width(480);
    for item in grid.grid_items() {
        println!("mobile {} -> x={} y={} w={}", item.i, item.x, item.y, item.w);
    }

    let saved = build_save_payload(&config);
    println!("Save payload:\n{}", serde_json::to_string_pretty(&saved)?);

    // Formatting preferences
    let prefs = FormatConfig {
        locale: "de-DE".to_string(),
        currency: "EUR".to_string(),
        ..FormatConfig::default()
    };
    println!("{} / {}", format_number(Some(1234567.891), &prefs), format_currency(Some(99.5), &prefs));

    Ok(())
}
