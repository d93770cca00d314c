// Widget form service: pure transformations over widget configuration
// Author: Gabriel Demetrios Lafis

use std::collections::HashSet;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::{
    data_config_for, generate_id, get_nested_param, leaf_paths, schema_for, set_nested_param,
    AxisMetric, BucketConfig, DatasetShape, DateInterval, Filter, MetricConfig, MetricEntry,
    MetricStyle, RangeSpec, Renderer, Widget, WidgetConfigSchema, WidgetError, WidgetFormConfig,
    WidgetParams, WidgetType,
};

/// Overlay the values of `existing` onto schema defaults, for schema keys only
fn overlay_params(schema: &WidgetConfigSchema, existing: &WidgetParams) -> WidgetParams {
    let mut params = schema.default_params();

    for field in &schema.fields {
        if let Some(value) = get_nested_param(existing, field.key) {
            params = set_nested_param(&params, field.key, value.clone());
        }
    }

    let ignored: Vec<String> = leaf_paths(existing)
        .into_iter()
        .filter(|path| !schema.has_field(path))
        .collect();
    if !ignored.is_empty() {
        debug!(
            "Ignoring {} parameter(s) unknown to the {} schema: {}",
            ignored.len(),
            schema.widget_type,
            ignored.join(", ")
        );
    }

    params
}

fn ensure_metric_id(mut metric: MetricConfig) -> MetricConfig {
    if metric.id.is_empty() {
        metric.id = generate_id("m");
    }
    metric
}

fn ensure_bucket_id(mut bucket: BucketConfig) -> BucketConfig {
    if bucket.id.is_empty() {
        bucket.id = generate_id("b");
    }
    bucket
}

/// Build a form configuration for a widget type, overlaying a persisted one
///
/// Persisted parameters whose keys are not in the type's schema are ignored.
/// An unknown type returns the persisted configuration untouched.
pub fn create_form_config(widget_type: &str, existing: Option<&WidgetFormConfig>) -> WidgetFormConfig {
    let kind = match WidgetType::parse(widget_type) {
        Some(kind) => kind,
        None => {
            warn!("Creating form config for unknown widget type '{}'", widget_type);
            return existing.cloned().unwrap_or_default();
        }
    };

    let schema = schema_for(kind);
    let data = data_config_for(kind);
    let empty = WidgetFormConfig::default();
    let existing = existing.unwrap_or(&empty);

    let mut entries: Vec<MetricEntry> = existing
        .entries()
        .into_iter()
        .map(|entry| MetricEntry {
            metric: ensure_metric_id(entry.metric).reshape(data.dataset_shape),
            style: entry.style,
        })
        .collect();

    if entries.len() < data.min_metrics {
        let missing = data.min_metrics - entries.len();
        entries.extend((0..missing).map(|_| MetricEntry::new(MetricConfig::for_shape(data.dataset_shape))));
    }

    let buckets: Vec<BucketConfig> = existing
        .buckets
        .iter()
        .cloned()
        .map(ensure_bucket_id)
        .filter(|bucket| {
            let allowed = data.allows_bucket_type(bucket.bucket_type);
            if !allowed {
                warn!(
                    "Dropping {} bucket on '{}': not supported by {} widgets",
                    bucket.bucket_type.as_str(),
                    bucket.field,
                    kind
                );
            }
            allowed
        })
        .collect();

    WidgetFormConfig::from_entries(
        &entries,
        buckets,
        existing.global_filters.clone(),
        overlay_params(schema, &existing.widget_params),
    )
}

/// Re-derive widget parameters after a type change
///
/// Keys shared with the new schema keep their current values; every other
/// schema key takes its default. Keys the new schema does not declare are
/// dropped. An unknown type leaves the parameters unchanged.
pub fn apply_schema_defaults(widget_type: &str, current_params: &WidgetParams) -> WidgetParams {
    match WidgetType::parse(widget_type) {
        Some(kind) => overlay_params(schema_for(kind), current_params),
        None => {
            warn!("No schema for widget type '{}', parameters left unchanged", widget_type);
            current_params.clone()
        }
    }
}

/// Column exposed by a data source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
}

impl ColumnInfo {
    /// Create a column description
    pub fn new(name: &str, data_type: &str) -> Self {
        ColumnInfo {
            name: name.to_string(),
            data_type: Some(data_type.to_string()),
        }
    }
}

/// Which collection a warning refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarningTarget {
    Metric,
    Bucket,
}

/// A field reference cleared because the data source no longer has it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldWarning {
    pub target: WarningTarget,
    pub index: usize,
    /// Which member held the reference: `field`, `x`, `y`, `r` or `fields`
    pub member: String,
    pub field: String,
}

impl FieldWarning {
    /// Human-readable description
    pub fn message(&self) -> String {
        let target = match self.target {
            WarningTarget::Metric => "Metric",
            WarningTarget::Bucket => "Bucket",
        };
        format!(
            "{} {} referenced column '{}' ({}), which is not in the selected data source",
            target,
            self.index + 1,
            self.field,
            self.member
        )
    }
}

/// Outcome of reconciling a configuration against a new column set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceDataResult {
    pub metrics: Vec<MetricConfig>,
    pub buckets: Vec<BucketConfig>,
    pub warnings: Vec<FieldWarning>,
}

impl SourceDataResult {
    /// Whether every field reference survived
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

fn clear_missing(
    field: &mut String,
    columns: &HashSet<&str>,
    target: WarningTarget,
    index: usize,
    member: &str,
    warnings: &mut Vec<FieldWarning>,
) {
    if !field.is_empty() && !columns.contains(field.as_str()) {
        warnings.push(FieldWarning {
            target,
            index,
            member: member.to_string(),
            field: std::mem::take(field),
        });
    }
}

/// Reconcile metric and bucket field references with a new column set
///
/// References to columns that are no longer present are cleared, and one
/// warning is reported per cleared reference. Metrics are reshaped to the
/// dataset shape first.
pub fn apply_source_data(
    columns: &[ColumnInfo],
    dataset_shape: DatasetShape,
    current_metrics: &[MetricConfig],
    current_buckets: &[BucketConfig],
) -> SourceDataResult {
    let names: HashSet<&str> = columns.iter().map(|c| c.name.as_str()).collect();
    let mut warnings = Vec::new();

    let metrics = current_metrics
        .iter()
        .cloned()
        .enumerate()
        .map(|(index, metric)| {
            let mut metric = metric.reshape(dataset_shape);
            let target = WarningTarget::Metric;

            clear_missing(&mut metric.field, &names, target, index, "field", &mut warnings);
            for (member, axis) in [("x", &mut metric.x), ("y", &mut metric.y), ("r", &mut metric.r)] {
                if let Some(axis) = axis.as_mut() {
                    clear_missing(&mut axis.field, &names, target, index, member, &mut warnings);
                }
            }
            if let Some(fields) = metric.fields.as_mut() {
                fields.retain(|field| {
                    let present = names.contains(field.as_str());
                    if !present {
                        warnings.push(FieldWarning {
                            target,
                            index,
                            member: "fields".to_string(),
                            field: field.clone(),
                        });
                    }
                    present
                });
            }
            metric
        })
        .collect();

    let buckets = current_buckets
        .iter()
        .cloned()
        .enumerate()
        .map(|(index, mut bucket)| {
            clear_missing(&mut bucket.field, &names, WarningTarget::Bucket, index, "field", &mut warnings);
            bucket
        })
        .collect();

    for warning in &warnings {
        warn!("{}", warning.message());
    }

    SourceDataResult {
        metrics,
        buckets,
        warnings,
    }
}

/// Axis of a renderer metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartAxis {
    pub field: String,
    pub agg: String,
}

impl From<&AxisMetric> for ChartAxis {
    fn from(axis: &AxisMetric) -> Self {
        ChartAxis {
            field: axis.field.clone(),
            agg: axis.agg.as_str().to_string(),
        }
    }
}

/// Metric in the shape the chart renderer expects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMetric {
    pub id: String,
    pub field: String,
    pub agg: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<ChartAxis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<ChartAxis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r: Option<ChartAxis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,
}

/// Bucket in the shape the chart renderer expects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartBucket {
    pub id: String,
    pub field: String,
    #[serde(rename = "type")]
    pub bucket_type: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_interval: Option<DateInterval>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ranges: Vec<RangeSpec>,
}

/// Everything the chart renderer needs to draw a widget
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfig {
    #[serde(rename = "type")]
    pub widget_type: WidgetType,
    pub renderer: Renderer,
    pub dataset_shape: DatasetShape,
    pub metrics: Vec<ChartMetric>,
    pub buckets: Vec<ChartBucket>,
    pub filters: Vec<Filter>,
    pub styles: Vec<MetricStyle>,
    pub params: WidgetParams,
}

fn is_renderable(metric: &MetricConfig, shape: DatasetShape) -> bool {
    let axis_set = |axis: &Option<AxisMetric>| axis.as_ref().map_or(false, |a| !a.field.is_empty());

    match shape {
        DatasetShape::Metric => !metric.field.is_empty() || metric.agg.is_fieldless(),
        DatasetShape::Xy => axis_set(&metric.x) && axis_set(&metric.y),
        DatasetShape::Xyr => axis_set(&metric.x) && axis_set(&metric.y) && axis_set(&metric.r),
        DatasetShape::MultiAxis => metric.fields.as_ref().map_or(false, |f| !f.is_empty()),
    }
}

/// Map a persisted widget into the renderer's configuration
///
/// Incomplete metrics and buckets the type cannot use are left out rather
/// than reported; only an unknown widget type is an error.
pub fn build_chart_config(widget: &Widget) -> Result<ChartConfig, WidgetError> {
    let kind = widget
        .kind()
        .ok_or_else(|| WidgetError::UnsupportedType(widget.widget_type.clone()))?;
    let schema = schema_for(kind);
    let data = data_config_for(kind);

    let mut entries: Vec<MetricEntry> = widget
        .config
        .entries()
        .into_iter()
        .map(|entry| MetricEntry {
            metric: entry.metric.reshape(data.dataset_shape),
            style: entry.style,
        })
        .filter(|entry| {
            let keep = is_renderable(&entry.metric, data.dataset_shape);
            if !keep {
                debug!("Skipping incomplete metric '{}' on {} widget", entry.metric.id, kind);
            }
            keep
        })
        .collect();

    if let Some(max) = data.max_metrics {
        entries.truncate(max);
    }

    let mut buckets: Vec<ChartBucket> = widget
        .config
        .buckets
        .iter()
        .filter(|bucket| !bucket.field.is_empty())
        .filter(|bucket| {
            let allowed = data.allows_bucket_type(bucket.bucket_type);
            if !allowed {
                warn!(
                    "Bucket type {} is not valid for {} widgets",
                    bucket.bucket_type.as_str(),
                    kind
                );
            }
            allowed
        })
        .map(|bucket| ChartBucket {
            id: bucket.id.clone(),
            field: bucket.field.clone(),
            bucket_type: bucket.bucket_type.as_str().to_string(),
            label: if bucket.label.trim().is_empty() {
                bucket.field.clone()
            } else {
                bucket.label.trim().to_string()
            },
            size: bucket.size,
            interval: bucket.interval,
            date_interval: bucket.date_interval,
            ranges: bucket.ranges.clone(),
        })
        .collect();

    if let Some(max) = data.max_buckets {
        buckets.truncate(max);
    }

    let metrics = entries
        .iter()
        .map(|entry| {
            let metric = &entry.metric;
            ChartMetric {
                id: metric.id.clone(),
                field: metric.field.clone(),
                agg: metric.agg.as_str().to_string(),
                label: metric.display_label(),
                x: metric.x.as_ref().map(ChartAxis::from),
                y: metric.y.as_ref().map(ChartAxis::from),
                r: metric.r.as_ref().map(ChartAxis::from),
                fields: metric.fields.clone(),
            }
        })
        .collect();

    Ok(ChartConfig {
        widget_type: kind,
        renderer: schema.renderer,
        dataset_shape: data.dataset_shape,
        metrics,
        buckets,
        filters: widget.config.global_filters.clone(),
        styles: entries.into_iter().map(|entry| entry.style).collect(),
        params: overlay_params(schema, &widget.config.widget_params),
    })
}
