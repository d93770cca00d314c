// API request and response models
// Author: Gabriel Demetrios Lafis

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dashboard::{
    AutoRefresh, DashboardFormConfig, EffectiveTimeRange, LayoutItem, TimeRange,
    ValidationMessages,
};
use crate::widget::{
    BucketConfig, ColumnInfo, DatasetShape, MetricConfig, Renderer, WidgetDataConfig,
    WidgetFormConfig, WidgetType,
};

/// Summary of a registered widget type
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetTypeInfo {
    #[serde(rename = "type")]
    pub widget_type: WidgetType,
    pub renderer: Renderer,
    pub data: WidgetDataConfig,
}

/// Request to normalize a widget form configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormConfigRequest {
    #[serde(rename = "type")]
    pub widget_type: String,
    #[serde(default)]
    pub existing: Option<WidgetFormConfig>,
}

/// Request to reconcile metrics and buckets with a data source
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceDataRequest {
    pub columns: Vec<ColumnInfo>,
    pub dataset_shape: DatasetShape,
    #[serde(default)]
    pub metrics: Vec<MetricConfig>,
    #[serde(default)]
    pub buckets: Vec<BucketConfig>,
}

/// Request for the next free grid position
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextPositionRequest {
    #[serde(default)]
    pub layout: Vec<LayoutItem>,
    pub cols: Option<u32>,
}

/// Request to validate a dashboard form
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateRequest {
    pub config: DashboardFormConfig,
    #[serde(default)]
    pub messages: Option<ValidationMessages>,
}

/// Result of a dashboard validation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateResponse {
    pub valid: bool,
    pub errors: BTreeMap<String, String>,
}

/// Request to resolve a time range and refresh period
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRangeRequest {
    pub time_range: TimeRange,
    #[serde(default)]
    pub auto_refresh: Option<AutoRefresh>,
    /// Reference instant; the server clock when absent
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
}

/// Resolved time range and refresh period
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRangeResponse {
    #[serde(flatten)]
    pub range: EffectiveTimeRange,
    pub auto_refresh_ms: Option<u64>,
}

/// Request to compare two colors
#[derive(Debug, Clone, Deserialize)]
pub struct ContrastRequest {
    pub foreground: String,
    pub background: String,
}

/// Contrast between two colors
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContrastResponse {
    pub ratio: f64,
    pub aa_normal_text: bool,
    pub aa_large_text: bool,
    pub foreground_luminance: f64,
    pub background_luminance: f64,
}

/// Request for a readable palette
#[derive(Debug, Clone, Deserialize)]
pub struct PaletteRequest {
    pub background: String,
}
