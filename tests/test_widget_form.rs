// Widget registry and form service tests
// Author: Gabriel Demetrios Lafis

use serde_json::{json, Map};

use dashboard_config_engine::widget::{
    apply_schema_defaults, apply_source_data, build_chart_config, create_form_config,
    get_nested_param, get_widget_config_schema, get_widget_data_config, set_nested_param,
    unsupported_type_message, Aggregation, BucketConfig, BucketType, ColumnInfo, DatasetShape,
    MetricConfig, MetricStyle, Renderer, WarningTarget, Widget, WidgetError, WidgetFormConfig,
    WidgetParams, WidgetType,
};

#[test]
fn test_registry_covers_every_type() {
    for widget_type in WidgetType::ALL.iter() {
        let schema = get_widget_config_schema(widget_type.as_str()).unwrap();
        let data = get_widget_data_config(widget_type.as_str()).unwrap();

        assert_eq!(schema.widget_type, *widget_type);
        assert!(schema.has_field("title.show"));
        assert!(data.min_metrics >= 1);
    }
}

#[test]
fn test_registry_unknown_type() {
    assert!(get_widget_config_schema("sankey").is_none());
    assert!(get_widget_data_config("sankey").is_none());
    assert!(unsupported_type_message("sankey").contains("sankey"));
}

#[test]
fn test_registry_shapes() {
    let scatter = get_widget_data_config("scatter").unwrap();
    assert_eq!(scatter.dataset_shape, DatasetShape::Xy);

    let bubble = get_widget_data_config("bubble").unwrap();
    assert_eq!(bubble.dataset_shape, DatasetShape::Xyr);

    let radar = get_widget_data_config("radar").unwrap();
    assert_eq!(radar.dataset_shape, DatasetShape::MultiAxis);

    let pie = get_widget_data_config("pie").unwrap();
    assert!(pie.is_single_metric());
    assert!(pie.allows_bucket_type(BucketType::Terms));
    assert!(!pie.allows_bucket_type(BucketType::DateHistogram));

    let kpi = get_widget_data_config("kpi").unwrap();
    assert!(!kpi.allow_buckets);

    assert_eq!(
        get_widget_config_schema("donut").unwrap().renderer,
        Renderer::PieChart
    );
}

#[test]
fn test_nested_param_preserves_siblings() {
    let params = set_nested_param(&WidgetParams::new(), "echarts.bar.barGap", json!(30));
    let updated = set_nested_param(&params, "echarts.bar.barWidth", json!(50));

    assert_eq!(get_nested_param(&updated, "echarts.bar.barGap"), Some(&json!(30)));
    assert_eq!(get_nested_param(&updated, "echarts.bar.barWidth"), Some(&json!(50)));

    // Idempotent
    let again = set_nested_param(&updated, "echarts.bar.barWidth", json!(50));
    assert_eq!(again, updated);

    // Input untouched
    assert!(get_nested_param(&params, "echarts.bar.barWidth").is_none());
}

#[test]
fn test_nested_param_replaces_scalar_intermediate() {
    let mut params = Map::new();
    params.insert("legend".to_string(), json!(true));

    let updated = set_nested_param(&params, "legend.show", json!(false));
    assert_eq!(updated["legend"], json!({ "show": false }));

    let unchanged = set_nested_param(&params, "legend..show", json!(false));
    assert_eq!(unchanged, params);
}

#[test]
fn test_create_form_config_defaults() {
    let config = create_form_config("bar", None);

    assert_eq!(config.metrics.len(), 1);
    assert_eq!(config.metric_styles.len(), 1);
    assert!(!config.metrics[0].id.is_empty());
    assert_eq!(
        get_nested_param(&config.widget_params, "echarts.bar.barWidth"),
        Some(&json!(60.0))
    );
}

#[test]
fn test_create_form_config_overlays_schema_keys_only() {
    let mut existing = WidgetFormConfig::default();
    existing.widget_params = set_nested_param(&existing.widget_params, "echarts.bar.barWidth", json!(25));
    existing.widget_params = set_nested_param(&existing.widget_params, "legacy.option", json!("x"));
    existing.buckets.push(BucketConfig::new("region", BucketType::Terms));
    existing.buckets.push(BucketConfig::new("rows", BucketType::SplitRows));

    let config = create_form_config("bar", Some(&existing));

    assert_eq!(
        get_nested_param(&config.widget_params, "echarts.bar.barWidth"),
        Some(&json!(25))
    );
    assert!(get_nested_param(&config.widget_params, "legacy.option").is_none());
    assert_eq!(config.buckets.len(), 1);
    assert_eq!(config.buckets[0].field, "region");
}

#[test]
fn test_create_form_config_unknown_type_keeps_existing() {
    let mut existing = WidgetFormConfig::default();
    existing.metrics.push(MetricConfig::new("amount", Aggregation::Sum));

    let config = create_form_config("sankey", Some(&existing));
    assert_eq!(config, existing);

    assert_eq!(create_form_config("sankey", None), WidgetFormConfig::default());
}

#[test]
fn test_apply_schema_defaults() {
    let pie_params = create_form_config("pie", None).widget_params;
    let mut params = set_nested_param(&pie_params, "legend.position", json!("right"));
    params = set_nested_param(&params, "tooltip.show", json!(false));

    let scatter = apply_schema_defaults("scatter", &params);

    // Shared keys keep their values
    assert_eq!(get_nested_param(&scatter, "legend.position"), Some(&json!("right")));
    assert_eq!(get_nested_param(&scatter, "tooltip.show"), Some(&json!(false)));
    // New keys take defaults, old ones are gone
    assert_eq!(get_nested_param(&scatter, "echarts.scatter.symbol"), Some(&json!("circle")));
    assert!(get_nested_param(&scatter, "echarts.pie.radius").is_none());

    assert_eq!(apply_schema_defaults("sankey", &params), params);
}

#[test]
fn test_apply_source_data_clears_missing_fields() {
    let columns = vec![ColumnInfo::new("amount", "number"), ColumnInfo::new("date", "date")];
    let metrics = vec![
        MetricConfig::new("amount", Aggregation::Sum),
        MetricConfig::new("discount", Aggregation::Avg),
    ];
    let buckets = vec![BucketConfig::new("region", BucketType::Terms)];

    let result = apply_source_data(&columns, DatasetShape::Metric, &metrics, &buckets);

    assert_eq!(result.metrics[0].field, "amount");
    assert_eq!(result.metrics[1].field, "");
    assert_eq!(result.buckets[0].field, "");
    assert_eq!(result.warnings.len(), 2);
    assert_eq!(result.warnings[0].target, WarningTarget::Metric);
    assert_eq!(result.warnings[0].field, "discount");
    assert_eq!(result.warnings[1].target, WarningTarget::Bucket);
    assert!(!result.is_clean());
}

#[test]
fn test_apply_source_data_reshapes() {
    let columns = vec![ColumnInfo::new("price", "number")];
    let metrics = vec![MetricConfig::new("price", Aggregation::Avg)];

    let result = apply_source_data(&columns, DatasetShape::Xy, &metrics, &[]);

    let metric = &result.metrics[0];
    assert_eq!(metric.y.as_ref().unwrap().field, "price");
    assert_eq!(metric.x.as_ref().unwrap().field, "");
    assert!(result.is_clean());
}

#[test]
fn test_build_chart_config() {
    let mut config = create_form_config("pie", None);
    config.metrics[0].field = "revenue".to_string();
    config.metrics[0].agg = Aggregation::Sum;
    config.metric_styles[0] = MetricStyle {
        color: Some("#ff0000".to_string()),
        ..MetricStyle::default()
    };
    // Second metric exceeds the pie limit
    config.metrics.push(MetricConfig::new("cost", Aggregation::Sum));
    config.metric_styles.push(MetricStyle::default());
    config.buckets.push(BucketConfig::new("region", BucketType::Terms));
    config.buckets.push(BucketConfig::new("", BucketType::Terms));

    let widget = Widget {
        id: Some("w1".to_string()),
        name: "Share".to_string(),
        widget_type: "pie".to_string(),
        data_source_id: None,
        config,
    };

    let chart = build_chart_config(&widget).unwrap();
    assert_eq!(chart.renderer, Renderer::PieChart);
    assert_eq!(chart.metrics.len(), 1);
    assert_eq!(chart.metrics[0].label, "sum(revenue)");
    assert_eq!(chart.styles.len(), 1);
    assert_eq!(chart.styles[0].color.as_deref(), Some("#ff0000"));
    assert_eq!(chart.buckets.len(), 1);
    assert_eq!(chart.buckets[0].label, "region");
}

#[test]
fn test_build_chart_config_skips_incomplete_metrics() {
    let mut config = WidgetFormConfig::default();
    config.metrics.push(MetricConfig::new("", Aggregation::Sum));
    config.metrics.push(MetricConfig::new("", Aggregation::Count));

    let widget = Widget {
        id: None,
        name: String::new(),
        widget_type: "line".to_string(),
        data_source_id: None,
        config,
    };

    let chart = build_chart_config(&widget).unwrap();
    assert_eq!(chart.metrics.len(), 1);
    assert_eq!(chart.metrics[0].agg, "count");
}

#[test]
fn test_build_chart_config_unknown_type() {
    let widget = Widget {
        id: None,
        name: String::new(),
        widget_type: "sankey".to_string(),
        data_source_id: None,
        config: WidgetFormConfig::default(),
    };

    assert!(matches!(
        build_chart_config(&widget),
        Err(WidgetError::UnsupportedType(name)) if name == "sankey"
    ));
}

#[test]
fn test_form_config_wire_shape() {
    let payload = json!({
        "metrics": [{ "field": "amount", "agg": "sum" }],
        "buckets": [{ "field": "day", "type": "date_histogram", "dateInterval": "week" }],
        "widgetParams": { "legend": { "show": false } }
    });

    let existing: WidgetFormConfig = serde_json::from_value(payload).unwrap();
    let config = create_form_config("line", Some(&existing));

    assert!(!config.metrics[0].id.is_empty());
    assert!(!config.buckets[0].id.is_empty());
    assert_eq!(get_nested_param(&config.widget_params, "legend.show"), Some(&json!(false)));

    let value = serde_json::to_value(&config).unwrap();
    assert!(value.get("metricStyles").is_some());
    assert!(value["metrics"][0].get("x").is_none());
}
