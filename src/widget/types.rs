// Widget configuration data model
// Author: Gabriel Demetrios Lafis

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// Nested widget parameters keyed by dot paths
pub type WidgetParams = Map<String, JsonValue>;

/// Every widget type the editor knows how to render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetType {
    Bar,
    Line,
    Area,
    Pie,
    Donut,
    Scatter,
    Bubble,
    Radar,
    Gauge,
    Kpi,
    Card,
    Table,
}

impl WidgetType {
    /// All widget types in catalog order
    pub const ALL: [WidgetType; 12] = [
        WidgetType::Bar,
        WidgetType::Line,
        WidgetType::Area,
        WidgetType::Pie,
        WidgetType::Donut,
        WidgetType::Scatter,
        WidgetType::Bubble,
        WidgetType::Radar,
        WidgetType::Gauge,
        WidgetType::Kpi,
        WidgetType::Card,
        WidgetType::Table,
    ];

    /// Wire name of the type
    pub fn as_str(&self) -> &'static str {
        match self {
            WidgetType::Bar => "bar",
            WidgetType::Line => "line",
            WidgetType::Area => "area",
            WidgetType::Pie => "pie",
            WidgetType::Donut => "donut",
            WidgetType::Scatter => "scatter",
            WidgetType::Bubble => "bubble",
            WidgetType::Radar => "radar",
            WidgetType::Gauge => "gauge",
            WidgetType::Kpi => "kpi",
            WidgetType::Card => "card",
            WidgetType::Table => "table",
        }
    }

    /// Parse a wire name; unknown names yield `None`
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase();
        Self::ALL.iter().copied().find(|t| t.as_str() == name)
    }
}

impl fmt::Display for WidgetType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structural requirement a widget type imposes on its metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatasetShape {
    #[serde(rename = "metric")]
    Metric,
    #[serde(rename = "xy")]
    Xy,
    #[serde(rename = "xyr")]
    Xyr,
    #[serde(rename = "multiAxis")]
    MultiAxis,
}

/// Aggregation applied to a metric field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    None,
    Sum,
    Avg,
    Min,
    Max,
    Count,
}

impl Aggregation {
    /// Wire name of the aggregation
    pub fn as_str(&self) -> &'static str {
        match self {
            Aggregation::None => "none",
            Aggregation::Sum => "sum",
            Aggregation::Avg => "avg",
            Aggregation::Min => "min",
            Aggregation::Max => "max",
            Aggregation::Count => "count",
        }
    }

    /// Whether the aggregation can run without a field
    pub fn is_fieldless(&self) -> bool {
        matches!(self, Aggregation::Count)
    }
}

impl Default for Aggregation {
    fn default() -> Self {
        Aggregation::Sum
    }
}

/// Grouping applied before aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BucketType {
    Terms,
    Histogram,
    DateHistogram,
    Range,
    SplitSeries,
    SplitRows,
    SplitChart,
}

impl BucketType {
    /// Wire name of the bucket type
    pub fn as_str(&self) -> &'static str {
        match self {
            BucketType::Terms => "terms",
            BucketType::Histogram => "histogram",
            BucketType::DateHistogram => "date_histogram",
            BucketType::Range => "range",
            BucketType::SplitSeries => "split_series",
            BucketType::SplitRows => "split_rows",
            BucketType::SplitChart => "split_chart",
        }
    }
}

/// Calendar interval for date histograms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateInterval {
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

/// One axis of an x/y(/r) metric
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AxisMetric {
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub agg: Aggregation,
}

impl AxisMetric {
    /// Create an axis metric
    pub fn new(field: &str, agg: Aggregation) -> Self {
        AxisMetric {
            field: field.to_string(),
            agg,
        }
    }
}

/// A field plus aggregation producing one series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricConfig {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub agg: Aggregation,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<AxisMetric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<AxisMetric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r: Option<AxisMetric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,
}

impl MetricConfig {
    /// Create a plain metric
    pub fn new(field: &str, agg: Aggregation) -> Self {
        MetricConfig {
            id: generate_id("m"),
            field: field.to_string(),
            agg,
            label: String::new(),
            x: None,
            y: None,
            r: None,
            fields: None,
        }
    }

    /// Factory: an empty metric with the members the shape requires
    pub fn for_shape(shape: DatasetShape) -> Self {
        let metric = match shape {
            DatasetShape::Metric => Self::new("", Aggregation::Count),
            _ => Self::new("", Aggregation::Sum),
        };
        metric.reshape(shape)
    }

    /// Convert a metric to another dataset shape
    ///
    /// For x/y shapes the metric's own field and aggregation become the y axis.
    pub fn reshape(mut self, shape: DatasetShape) -> Self {
        match shape {
            DatasetShape::Metric => {
                self.take_value_axis();
                self.x = None;
                self.y = None;
                self.r = None;
                self.fields = None;
            }
            DatasetShape::Xy | DatasetShape::Xyr => {
                if self.x.is_none() {
                    self.x = Some(AxisMetric::new("", Aggregation::None));
                }
                if self.y.is_none() {
                    self.y = Some(AxisMetric::new(&self.field, self.agg));
                }
                if shape == DatasetShape::Xyr {
                    if self.r.is_none() {
                        self.r = Some(AxisMetric::new("", Aggregation::Sum));
                    }
                } else {
                    self.r = None;
                }
                self.fields = None;
            }
            DatasetShape::MultiAxis => {
                self.take_value_axis();
                self.x = None;
                self.y = None;
                self.r = None;
                if self.fields.is_none() {
                    let seed = if self.field.is_empty() {
                        Vec::new()
                    } else {
                        vec![self.field.clone()]
                    };
                    self.fields = Some(seed);
                }
            }
        }
        self
    }

    // An empty field takes the y axis back, so x/y -> metric keeps the value column
    fn take_value_axis(&mut self) {
        if !self.field.is_empty() {
            return;
        }
        if let Some(y) = self.y.as_ref().filter(|y| !y.field.is_empty()) {
            self.field = y.field.clone();
            self.agg = y.agg;
        }
    }

    /// Label shown for the metric, falling back to `agg(field)`
    pub fn display_label(&self) -> String {
        if !self.label.trim().is_empty() {
            return self.label.trim().to_string();
        }
        if self.field.is_empty() {
            self.agg.as_str().to_string()
        } else {
            format!("{}({})", self.agg.as_str(), self.field)
        }
    }
}

/// Numeric range used by range buckets
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RangeSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// A grouping dimension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketConfig {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub field: String,
    #[serde(rename = "type")]
    pub bucket_type: BucketType,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_interval: Option<DateInterval>,
    #[serde(default)]
    pub ranges: Vec<RangeSpec>,
}

impl BucketConfig {
    /// Create a bucket with type-appropriate defaults
    pub fn new(field: &str, bucket_type: BucketType) -> Self {
        let (size, interval, date_interval) = match bucket_type {
            BucketType::Terms | BucketType::SplitSeries | BucketType::SplitRows
            | BucketType::SplitChart => (Some(10), None, None),
            BucketType::Histogram => (None, Some(10.0), None),
            BucketType::DateHistogram => (None, None, Some(DateInterval::Day)),
            BucketType::Range => (None, None, None),
        };

        BucketConfig {
            id: generate_id("b"),
            field: field.to_string(),
            bucket_type,
            label: String::new(),
            size,
            interval,
            date_interval,
            ranges: Vec::new(),
        }
    }
}

/// Comparison used by a filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    Contains,
    In,
    Between,
    Exists,
}

/// A predicate applied to the data before aggregation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub field: String,
    pub operator: FilterOperator,
    #[serde(default)]
    pub value: JsonValue,
}

/// Presentation overrides for one metric
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decimals: Option<u8>,
}

/// A metric together with its style
#[derive(Debug, Clone, PartialEq)]
pub struct MetricEntry {
    pub metric: MetricConfig,
    pub style: MetricStyle,
}

impl MetricEntry {
    /// Pair a metric with the default style
    pub fn new(metric: MetricConfig) -> Self {
        MetricEntry {
            metric,
            style: MetricStyle::default(),
        }
    }
}

/// Persisted widget configuration
///
/// `metric_styles` is index-aligned with `metrics`. Code that edits metrics
/// works on [`MetricEntry`] values and converts back with [`from_entries`].
///
/// [`from_entries`]: WidgetFormConfig::from_entries
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WidgetFormConfig {
    pub metrics: Vec<MetricConfig>,
    pub buckets: Vec<BucketConfig>,
    pub global_filters: Vec<Filter>,
    pub metric_styles: Vec<MetricStyle>,
    pub widget_params: WidgetParams,
}

impl WidgetFormConfig {
    /// Pair metrics with their styles, padding missing styles
    pub fn entries(&self) -> Vec<MetricEntry> {
        self.metrics
            .iter()
            .enumerate()
            .map(|(i, metric)| MetricEntry {
                metric: metric.clone(),
                style: self.metric_styles.get(i).cloned().unwrap_or_default(),
            })
            .collect()
    }

    /// Split entries back into the persisted parallel arrays
    pub fn from_entries(
        entries: &[MetricEntry],
        buckets: Vec<BucketConfig>,
        global_filters: Vec<Filter>,
        widget_params: WidgetParams,
    ) -> Self {
        WidgetFormConfig {
            metrics: entries.iter().map(|e| e.metric.clone()).collect(),
            metric_styles: entries.iter().map(|e| e.style.clone()).collect(),
            buckets,
            global_filters,
            widget_params,
        }
    }
}

/// A widget as stored by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Widget {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub widget_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_source_id: Option<String>,
    #[serde(default)]
    pub config: WidgetFormConfig,
}

impl Widget {
    /// Resolve the type name; unknown names yield `None`
    pub fn kind(&self) -> Option<WidgetType> {
        WidgetType::parse(&self.widget_type)
    }
}

/// Generate a short random identifier with a prefix
pub fn generate_id(prefix: &str) -> String {
    let value: u32 = rand::thread_rng().gen();
    format!("{}_{:08x}", prefix, value)
}
