// Static widget type registry
// Author: Gabriel Demetrios Lafis

use once_cell::sync::Lazy;
use serde::Serialize;
use serde_json::{json, Value as JsonValue};

use super::{set_nested_param, BucketType, DatasetShape, WidgetParams, WidgetType};

/// Component that draws a widget type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Renderer {
    BarChart,
    LineChart,
    AreaChart,
    PieChart,
    ScatterChart,
    RadarChart,
    GaugeChart,
    KpiCard,
    StatCard,
    DataTable,
}

/// Editor control used for a schema field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    Text,
    Number,
    Switch,
    Select,
    Color,
    Slider,
}

/// Section of the editor a field is shown in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldGroup {
    General,
    Legend,
    Axis,
    Series,
    Display,
}

/// Choice offered by a select field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
}

/// One stylable or parametrizable property of a widget type
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSchema {
    pub key: &'static str,
    pub default: JsonValue,
    pub input_type: InputType,
    pub label: &'static str,
    pub group: FieldGroup,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<SelectOption>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl FieldSchema {
    fn new(key: &'static str, label: &'static str, group: FieldGroup, input_type: InputType, default: JsonValue) -> Self {
        FieldSchema {
            key,
            default,
            input_type,
            label,
            group,
            options: None,
            min: None,
            max: None,
        }
    }

    fn switch(key: &'static str, label: &'static str, group: FieldGroup, default: bool) -> Self {
        Self::new(key, label, group, InputType::Switch, json!(default))
    }

    fn text(key: &'static str, label: &'static str, group: FieldGroup, default: &str) -> Self {
        Self::new(key, label, group, InputType::Text, json!(default))
    }

    fn number(key: &'static str, label: &'static str, group: FieldGroup, default: f64, min: f64, max: f64) -> Self {
        let mut field = Self::new(key, label, group, InputType::Number, json!(default));
        field.min = Some(min);
        field.max = Some(max);
        field
    }

    fn slider(key: &'static str, label: &'static str, group: FieldGroup, default: f64, min: f64, max: f64) -> Self {
        let mut field = Self::number(key, label, group, default, min, max);
        field.input_type = InputType::Slider;
        field
    }

    fn select(
        key: &'static str,
        label: &'static str,
        group: FieldGroup,
        default: &'static str,
        options: &[(&'static str, &'static str)],
    ) -> Self {
        let mut field = Self::new(key, label, group, InputType::Select, json!(default));
        field.options = Some(
            options
                .iter()
                .map(|&(value, label)| SelectOption { value, label })
                .collect(),
        );
        field
    }

    fn color(key: &'static str, label: &'static str, group: FieldGroup, default: &str) -> Self {
        Self::new(key, label, group, InputType::Color, json!(default))
    }
}

/// Field schema and renderer of one widget type
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetConfigSchema {
    pub widget_type: WidgetType,
    pub renderer: Renderer,
    pub fields: Vec<FieldSchema>,
}

impl WidgetConfigSchema {
    /// Look up a field by key
    pub fn field(&self, key: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Whether the schema declares a key
    pub fn has_field(&self, key: &str) -> bool {
        self.field(key).is_some()
    }

    /// Nested parameter map holding every default
    pub fn default_params(&self) -> WidgetParams {
        self.fields.iter().fold(WidgetParams::new(), |params, field| {
            set_nested_param(&params, field.key, field.default.clone())
        })
    }
}

/// Metric and bucket cardinality of one widget type
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetDataConfig {
    pub dataset_shape: DatasetShape,
    pub min_metrics: usize,
    pub max_metrics: Option<usize>,
    pub allow_buckets: bool,
    pub max_buckets: Option<usize>,
    pub bucket_types: &'static [BucketType],
}

impl WidgetDataConfig {
    /// Whether the type renders exactly one metric
    pub fn is_single_metric(&self) -> bool {
        self.max_metrics == Some(1)
    }

    /// Whether a bucket type may be used with this widget type
    pub fn allows_bucket_type(&self, bucket_type: BucketType) -> bool {
        self.allow_buckets && self.bucket_types.contains(&bucket_type)
    }
}

const SERIES_BUCKETS: &[BucketType] = &[
    BucketType::Terms,
    BucketType::Histogram,
    BucketType::DateHistogram,
    BucketType::Range,
    BucketType::SplitSeries,
];
const SLICE_BUCKETS: &[BucketType] = &[BucketType::Terms, BucketType::Histogram, BucketType::Range];
const SPLIT_BUCKETS: &[BucketType] = &[BucketType::Terms, BucketType::SplitSeries];
const TABLE_BUCKETS: &[BucketType] = &[
    BucketType::Terms,
    BucketType::Histogram,
    BucketType::DateHistogram,
    BucketType::Range,
    BucketType::SplitRows,
];

const fn data_config(
    dataset_shape: DatasetShape,
    min_metrics: usize,
    max_metrics: Option<usize>,
    max_buckets: Option<usize>,
    bucket_types: &'static [BucketType],
) -> WidgetDataConfig {
    WidgetDataConfig {
        dataset_shape,
        min_metrics,
        max_metrics,
        allow_buckets: !bucket_types.is_empty(),
        max_buckets,
        bucket_types,
    }
}

// Indexed by `WidgetType` discriminant.
static DATA_CONFIGS: [WidgetDataConfig; 12] = [
    data_config(DatasetShape::Metric, 1, None, Some(2), SERIES_BUCKETS),
    data_config(DatasetShape::Metric, 1, None, Some(2), SERIES_BUCKETS),
    data_config(DatasetShape::Metric, 1, None, Some(2), SERIES_BUCKETS),
    data_config(DatasetShape::Metric, 1, Some(1), Some(1), SLICE_BUCKETS),
    data_config(DatasetShape::Metric, 1, Some(1), Some(1), SLICE_BUCKETS),
    data_config(DatasetShape::Xy, 1, None, Some(1), SPLIT_BUCKETS),
    data_config(DatasetShape::Xyr, 1, None, Some(1), SPLIT_BUCKETS),
    data_config(DatasetShape::MultiAxis, 1, None, Some(1), SPLIT_BUCKETS),
    data_config(DatasetShape::Metric, 1, Some(1), Some(0), &[]),
    data_config(DatasetShape::Metric, 1, Some(1), Some(0), &[]),
    data_config(DatasetShape::Metric, 1, Some(1), Some(0), &[]),
    data_config(DatasetShape::Metric, 1, None, None, TABLE_BUCKETS),
];

fn common_fields(with_legend: bool) -> Vec<FieldSchema> {
    use FieldGroup::*;

    let mut fields = vec![
        FieldSchema::switch("title.show", "Show title", General, true),
        FieldSchema::switch("tooltip.show", "Show tooltip", General, true),
        FieldSchema::switch("animation", "Animate", General, true),
    ];
    if with_legend {
        fields.push(FieldSchema::switch("legend.show", "Show legend", Legend, true));
        fields.push(FieldSchema::select(
            "legend.position",
            "Legend position",
            Legend,
            "bottom",
            &[("top", "Top"), ("bottom", "Bottom"), ("left", "Left"), ("right", "Right")],
        ));
    }
    fields
}

fn axis_fields() -> Vec<FieldSchema> {
    use FieldGroup::Axis;

    vec![
        FieldSchema::switch("echarts.xAxis.show", "Show X axis", Axis, true),
        FieldSchema::text("echarts.xAxis.name", "X axis name", Axis, ""),
        FieldSchema::switch("echarts.yAxis.show", "Show Y axis", Axis, true),
        FieldSchema::text("echarts.yAxis.name", "Y axis name", Axis, ""),
        FieldSchema::switch("echarts.grid.containLabel", "Keep labels inside grid", Axis, true),
        FieldSchema::switch("echarts.splitLine.show", "Show grid lines", Axis, true),
    ]
}

fn pie_fields(donut: bool) -> Vec<FieldSchema> {
    use FieldGroup::Series;

    let mut fields = vec![
        FieldSchema::slider("echarts.pie.radius", "Radius (%)", Series, 70.0, 10.0, 100.0),
        FieldSchema::switch("echarts.pie.showLabel", "Show labels", Series, true),
        FieldSchema::select(
            "echarts.pie.labelPosition",
            "Label position",
            Series,
            "outside",
            &[("outside", "Outside"), ("inside", "Inside"), ("center", "Center")],
        ),
        FieldSchema::switch("echarts.pie.roseType", "Nightingale rose", Series, false),
    ];
    if donut {
        fields.push(FieldSchema::slider("echarts.pie.innerRadius", "Inner radius (%)", Series, 40.0, 0.0, 90.0));
    }
    fields
}

fn type_fields(widget_type: WidgetType) -> Vec<FieldSchema> {
    use FieldGroup::*;

    match widget_type {
        WidgetType::Bar => vec![
            FieldSchema::slider("echarts.bar.barWidth", "Bar width (%)", Series, 60.0, 10.0, 100.0),
            FieldSchema::slider("echarts.bar.barGap", "Bar gap (%)", Series, 30.0, 0.0, 100.0),
            FieldSchema::switch("echarts.bar.stack", "Stack series", Series, false),
            FieldSchema::switch("echarts.bar.horizontal", "Horizontal bars", Series, false),
            FieldSchema::switch("echarts.bar.showLabel", "Show values", Series, false),
            FieldSchema::number("echarts.bar.borderRadius", "Corner radius", Series, 0.0, 0.0, 20.0),
        ],
        WidgetType::Line => vec![
            FieldSchema::switch("echarts.line.smooth", "Smooth lines", Series, false),
            FieldSchema::switch("echarts.line.showSymbol", "Show points", Series, true),
            FieldSchema::number("echarts.line.lineWidth", "Line width", Series, 2.0, 1.0, 10.0),
            FieldSchema::switch("echarts.line.stack", "Stack series", Series, false),
            FieldSchema::switch("echarts.line.step", "Step line", Series, false),
        ],
        WidgetType::Area => vec![
            FieldSchema::switch("echarts.line.smooth", "Smooth lines", Series, true),
            FieldSchema::switch("echarts.line.stack", "Stack series", Series, false),
            FieldSchema::slider("echarts.area.opacity", "Fill opacity", Series, 0.4, 0.0, 1.0),
        ],
        WidgetType::Pie => pie_fields(false),
        WidgetType::Donut => pie_fields(true),
        WidgetType::Scatter => vec![
            FieldSchema::number("echarts.scatter.symbolSize", "Point size", Series, 10.0, 2.0, 60.0),
            FieldSchema::select(
                "echarts.scatter.symbol",
                "Point shape",
                Series,
                "circle",
                &[("circle", "Circle"), ("rect", "Square"), ("triangle", "Triangle"), ("diamond", "Diamond")],
            ),
        ],
        WidgetType::Bubble => vec![
            FieldSchema::number("echarts.bubble.minSize", "Minimum size", Series, 8.0, 2.0, 100.0),
            FieldSchema::number("echarts.bubble.maxSize", "Maximum size", Series, 48.0, 4.0, 200.0),
            FieldSchema::slider("echarts.bubble.opacity", "Opacity", Series, 0.7, 0.1, 1.0),
        ],
        WidgetType::Radar => vec![
            FieldSchema::select(
                "echarts.radar.shape",
                "Grid shape",
                Series,
                "polygon",
                &[("polygon", "Polygon"), ("circle", "Circle")],
            ),
            FieldSchema::slider("echarts.radar.areaOpacity", "Area opacity", Series, 0.2, 0.0, 1.0),
            FieldSchema::number("echarts.radar.splitNumber", "Rings", Series, 5.0, 1.0, 10.0),
        ],
        WidgetType::Gauge => vec![
            FieldSchema::number("echarts.gauge.min", "Minimum", Series, 0.0, f64::MIN, f64::MAX),
            FieldSchema::number("echarts.gauge.max", "Maximum", Series, 100.0, f64::MIN, f64::MAX),
            FieldSchema::number("echarts.gauge.startAngle", "Start angle", Series, 225.0, -360.0, 360.0),
            FieldSchema::number("echarts.gauge.endAngle", "End angle", Series, -45.0, -360.0, 360.0),
            FieldSchema::switch("echarts.gauge.showProgress", "Show progress", Series, true),
            FieldSchema::color("echarts.gauge.color", "Gauge color", Display, "#3b82f6"),
        ],
        WidgetType::Kpi => vec![
            FieldSchema::switch("kpi.showTrend", "Show trend", Display, true),
            FieldSchema::select(
                "kpi.comparisonPeriod",
                "Compare with",
                Display,
                "previous_period",
                &[
                    ("previous_period", "Previous period"),
                    ("previous_year", "Same period last year"),
                    ("none", "No comparison"),
                ],
            ),
            FieldSchema::number("kpi.fontSize", "Value size", Display, 32.0, 12.0, 96.0),
            FieldSchema::select(
                "kpi.align",
                "Alignment",
                Display,
                "center",
                &[("left", "Left"), ("center", "Center"), ("right", "Right")],
            ),
            FieldSchema::color("kpi.valueColor", "Value color", Display, ""),
        ],
        WidgetType::Card => vec![
            FieldSchema::select(
                "card.layout",
                "Layout",
                Display,
                "vertical",
                &[("vertical", "Vertical"), ("horizontal", "Horizontal")],
            ),
            FieldSchema::switch("card.showIcon", "Show icon", Display, false),
            FieldSchema::text("card.icon", "Icon", Display, ""),
            FieldSchema::text("card.subtitle", "Subtitle", Display, ""),
        ],
        WidgetType::Table => vec![
            FieldSchema::number("table.pageSize", "Rows per page", Display, 10.0, 5.0, 500.0),
            FieldSchema::switch("table.striped", "Striped rows", Display, true),
            FieldSchema::switch("table.showPagination", "Show pagination", Display, true),
            FieldSchema::select(
                "table.density",
                "Density",
                Display,
                "normal",
                &[("compact", "Compact"), ("normal", "Normal"), ("comfortable", "Comfortable")],
            ),
        ],
    }
}

fn renderer(widget_type: WidgetType) -> Renderer {
    match widget_type {
        WidgetType::Bar => Renderer::BarChart,
        WidgetType::Line => Renderer::LineChart,
        WidgetType::Area => Renderer::AreaChart,
        WidgetType::Pie | WidgetType::Donut => Renderer::PieChart,
        WidgetType::Scatter | WidgetType::Bubble => Renderer::ScatterChart,
        WidgetType::Radar => Renderer::RadarChart,
        WidgetType::Gauge => Renderer::GaugeChart,
        WidgetType::Kpi => Renderer::KpiCard,
        WidgetType::Card => Renderer::StatCard,
        WidgetType::Table => Renderer::DataTable,
    }
}

fn build_schema(widget_type: WidgetType) -> WidgetConfigSchema {
    let with_legend = !matches!(
        widget_type,
        WidgetType::Gauge | WidgetType::Kpi | WidgetType::Card | WidgetType::Table
    );
    let with_axes = matches!(
        widget_type,
        WidgetType::Bar | WidgetType::Line | WidgetType::Area | WidgetType::Scatter | WidgetType::Bubble
    );

    let mut fields = common_fields(with_legend);
    if with_axes {
        fields.extend(axis_fields());
    }
    fields.extend(type_fields(widget_type));

    WidgetConfigSchema {
        widget_type,
        renderer: renderer(widget_type),
        fields,
    }
}

// Indexed by `WidgetType` discriminant.
static SCHEMAS: Lazy<Vec<WidgetConfigSchema>> =
    Lazy::new(|| WidgetType::ALL.iter().map(|t| build_schema(*t)).collect());

/// Field schema of a known widget type
pub fn schema_for(widget_type: WidgetType) -> &'static WidgetConfigSchema {
    &SCHEMAS[widget_type as usize]
}

/// Data requirements of a known widget type
pub fn data_config_for(widget_type: WidgetType) -> &'static WidgetDataConfig {
    &DATA_CONFIGS[widget_type as usize]
}

/// Field schema by type name; unknown names yield `None`
pub fn get_widget_config_schema(type_name: &str) -> Option<&'static WidgetConfigSchema> {
    WidgetType::parse(type_name).map(schema_for)
}

/// Data requirements by type name; unknown names yield `None`
pub fn get_widget_data_config(type_name: &str) -> Option<&'static WidgetDataConfig> {
    WidgetType::parse(type_name).map(data_config_for)
}

/// Message shown in place of a widget whose type is not registered
pub fn unsupported_type_message(type_name: &str) -> String {
    format!("Unsupported widget type: {}", type_name)
}
