// Dashboard configuration data model
// Author: Gabriel Demetrios Lafis

use serde::{Deserialize, Serialize};

use crate::widget::Filter;

/// Smallest allowed page size for dashboard queries
pub const MIN_PAGE_SIZE: u32 = 100;

/// Largest allowed page size for dashboard queries
pub const MAX_PAGE_SIZE: u32 = 10_000;

/// Page size used when none is stored
pub const DEFAULT_PAGE_SIZE: u32 = 1_000;

/// Clamp a page size to the supported range
pub fn clamp_page_size(page_size: u32) -> u32 {
    page_size.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE)
}

/// Who can see a dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Private,
    Public,
    Shared,
}

impl Default for Visibility {
    fn default() -> Self {
        Visibility::Private
    }
}

/// Dashboard-level style tokens
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardStyles {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_gradient: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gap: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
}

/// Style tokens of one widget's frame on the grid
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WidgetItemStyles {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_gradient: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
}

/// One widget's position, size and frame style on the grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutItem {
    /// Stable grid key; empty means "use the widget id"
    #[serde(default)]
    pub i: String,
    pub widget_id: String,
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_w: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_h: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<WidgetItemStyles>,
}

impl LayoutItem {
    /// Create an item keyed by its widget id
    pub fn new(widget_id: &str, x: u32, y: u32, w: u32, h: u32) -> Self {
        LayoutItem {
            i: widget_id.to_string(),
            widget_id: widget_id.to_string(),
            x,
            y,
            w,
            h,
            min_w: None,
            min_h: None,
            styles: None,
        }
    }

    /// Grid key of the item
    pub fn key(&self) -> &str {
        if self.i.is_empty() {
            &self.widget_id
        } else {
            &self.i
        }
    }

    /// Row just below the item
    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.h)
    }

    /// Column just right of the item
    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.w)
    }

    /// Whether two items share any grid cell
    pub fn overlaps(&self, other: &LayoutItem) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Unit for relative time ranges and refresh intervals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
}

impl TimeUnit {
    /// Length of the unit in milliseconds
    ///
    /// A month is a fixed 30 days; saved relative ranges depend on it.
    pub fn millis(&self) -> u64 {
        const SECOND: u64 = 1_000;
        const MINUTE: u64 = 60 * SECOND;
        const HOUR: u64 = 60 * MINUTE;
        const DAY: u64 = 24 * HOUR;

        match self {
            TimeUnit::Second => SECOND,
            TimeUnit::Minute => MINUTE,
            TimeUnit::Hour => HOUR,
            TimeUnit::Day => DAY,
            TimeUnit::Week => 7 * DAY,
            TimeUnit::Month => 30 * DAY,
        }
    }
}

/// How a time range is expressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRangeMode {
    Absolute,
    Relative,
}

/// Dashboard-wide time window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRange {
    pub mode: TimeRangeMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_value: Option<u32>,
    #[serde(default = "default_relative_unit")]
    pub relative_unit: TimeUnit,
}

fn default_relative_unit() -> TimeUnit {
    TimeUnit::Day
}

impl Default for TimeRange {
    fn default() -> Self {
        TimeRange {
            mode: TimeRangeMode::Relative,
            from: None,
            to: None,
            relative_value: None,
            relative_unit: default_relative_unit(),
        }
    }
}

impl TimeRange {
    /// Whether the range constrains anything
    pub fn is_meaningful(&self) -> bool {
        match self.mode {
            TimeRangeMode::Absolute => {
                let set = |v: &Option<String>| v.as_ref().map_or(false, |s| !s.trim().is_empty());
                set(&self.from) || set(&self.to)
            }
            TimeRangeMode::Relative => self.relative_value.map_or(false, |v| v != 0),
        }
    }
}

/// Periodic data reload settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoRefresh {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_value: Option<u32>,
    #[serde(default = "default_interval_unit")]
    pub interval_unit: TimeUnit,
}

fn default_interval_unit() -> TimeUnit {
    TimeUnit::Minute
}

impl Default for AutoRefresh {
    fn default() -> Self {
        AutoRefresh {
            enabled: false,
            interval_value: None,
            interval_unit: default_interval_unit(),
        }
    }
}

/// Editable dashboard configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardFormConfig {
    pub title: String,
    pub description: String,
    pub visibility: Visibility,
    pub layout: Vec<LayoutItem>,
    pub styles: DashboardStyles,
    pub time_range: TimeRange,
    pub auto_refresh: AutoRefresh,
    pub global_filters: Vec<Filter>,
    pub page_size: u32,
}

impl Default for DashboardFormConfig {
    fn default() -> Self {
        DashboardFormConfig {
            title: String::new(),
            description: String::new(),
            visibility: Visibility::default(),
            layout: Vec::new(),
            styles: DashboardStyles::default(),
            time_range: TimeRange::default(),
            auto_refresh: AutoRefresh::default(),
            global_filters: Vec::new(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl DashboardFormConfig {
    /// Set the page size, clamped to the supported range
    pub fn set_page_size(&mut self, page_size: u32) {
        self.page_size = clamp_page_size(page_size);
    }
}

/// A dashboard as stored by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub layout: Vec<LayoutItem>,
    #[serde(default)]
    pub styles: DashboardStyles,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_range: Option<TimeRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_refresh: Option<AutoRefresh>,
    #[serde(default)]
    pub global_filters: Vec<Filter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}
