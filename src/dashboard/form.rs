// Dashboard form service: placement, save payloads and validation
// Author: Gabriel Demetrios Lafis

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::{
    clamp_page_size, AutoRefresh, Dashboard, DashboardError, DashboardFormConfig, LayoutItem,
    TimeRange, TimeRangeMode, DEFAULT_PAGE_SIZE,
};
use crate::utils::{validate_length, validate_not_empty};

/// Width of a newly added widget, in grid columns
pub const DEFAULT_WIDGET_WIDTH: u32 = 6;

/// Height of a newly added widget, in grid rows
pub const DEFAULT_WIDGET_HEIGHT: u32 = 4;

/// Number of columns of the dashboard grid
pub const GRID_COLS: u32 = 12;

pub const TITLE_MIN_LENGTH: usize = 2;
pub const TITLE_MAX_LENGTH: usize = 100;

/// Error key for the title field
pub const TITLE_FIELD: &str = "title";

/// Error key for the auto-refresh interval field
pub const AUTO_REFRESH_FIELD: &str = "autoRefreshInterval";

/// A cell on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridPosition {
    pub x: u32,
    pub y: u32,
}

/// Find where the next widget goes
///
/// Takes the bottom row (largest `y + h`), then the item on that row with
/// the largest right edge. The new widget goes to its right when
/// `DEFAULT_WIDGET_WIDTH` more columns fit, otherwise it starts a new row
/// at `x = 0` below everything. Saved layouts rely on this exact tie-break.
pub fn calculate_next_position(layout: &[LayoutItem], cols: u32) -> GridPosition {
    let max_bottom = match layout.iter().map(LayoutItem::bottom).max() {
        Some(bottom) => bottom,
        None => return GridPosition { x: 0, y: 0 },
    };

    let mut rightmost: Option<&LayoutItem> = None;
    for item in layout.iter().filter(|item| item.bottom() == max_bottom) {
        match rightmost {
            Some(current) if current.right() >= item.right() => {}
            _ => rightmost = Some(item),
        }
    }

    match rightmost {
        Some(item) if item.right().saturating_add(DEFAULT_WIDGET_WIDTH) <= cols => GridPosition {
            x: item.right(),
            y: item.y,
        },
        _ => GridPosition {
            x: 0,
            y: max_bottom,
        },
    }
}

/// Append a widget to the layout at the next free position
pub fn add_widget<'a>(
    config: &'a mut DashboardFormConfig,
    widget_id: &str,
) -> Result<&'a LayoutItem, DashboardError> {
    if config.layout.iter().any(|item| item.widget_id == widget_id) {
        return Err(DashboardError::DuplicateWidget(widget_id.to_string()));
    }

    let position = calculate_next_position(&config.layout, GRID_COLS);
    debug!(
        "Placing widget '{}' at ({}, {})",
        widget_id, position.x, position.y
    );

    config.layout.push(LayoutItem::new(
        widget_id,
        position.x,
        position.y,
        DEFAULT_WIDGET_WIDTH,
        DEFAULT_WIDGET_HEIGHT,
    ));

    // Just pushed
    Ok(&config.layout[config.layout.len() - 1])
}

/// Take a widget off the layout
pub fn remove_widget(
    config: &mut DashboardFormConfig,
    widget_id: &str,
) -> Result<LayoutItem, DashboardError> {
    let index = config
        .layout
        .iter()
        .position(|item| item.widget_id == widget_id)
        .ok_or_else(|| DashboardError::WidgetNotFound(widget_id.to_string()))?;

    Ok(config.layout.remove(index))
}

impl DashboardFormConfig {
    /// Build the editable form state from a stored dashboard
    pub fn from_dashboard(dashboard: &Dashboard) -> Self {
        let layout = dashboard
            .layout
            .iter()
            .cloned()
            .map(|mut item| {
                if item.i.is_empty() {
                    item.i = item.widget_id.clone();
                }
                item
            })
            .collect();

        let page_size = dashboard.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        let clamped = clamp_page_size(page_size);
        if clamped != page_size {
            warn!("Page size {} out of range, using {}", page_size, clamped);
        }

        DashboardFormConfig {
            title: dashboard.title.clone(),
            description: dashboard.description.clone().unwrap_or_default(),
            visibility: dashboard.visibility,
            layout,
            styles: dashboard.styles.clone(),
            time_range: dashboard.time_range.clone().unwrap_or_default(),
            auto_refresh: dashboard.auto_refresh.clone().unwrap_or_default(),
            global_filters: dashboard.global_filters.clone(),
            page_size: clamped,
        }
    }
}

/// Build the body sent to the backend when saving
///
/// Unset optional fields are left out rather than sent as null.
pub fn build_save_payload(config: &DashboardFormConfig) -> Dashboard {
    let description = config.description.trim();

    let time_range = if config.time_range.is_meaningful() {
        Some(config.time_range.clone())
    } else {
        None
    };

    let auto_refresh = match config.auto_refresh.interval_value {
        Some(value) if config.auto_refresh.enabled && value > 0 => {
            Some(config.auto_refresh.clone())
        }
        _ => None,
    };

    Dashboard {
        id: None,
        title: config.title.trim().to_string(),
        description: if description.is_empty() {
            None
        } else {
            Some(description.to_string())
        },
        visibility: config.visibility,
        layout: config.layout.clone(),
        styles: config.styles.clone(),
        time_range,
        auto_refresh,
        global_filters: config.global_filters.clone(),
        page_size: Some(clamp_page_size(config.page_size)),
    }
}

/// A resolved time window; either end may be open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveTimeRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

fn parse_instant(value: &Option<String>) -> Option<DateTime<Utc>> {
    let raw = value.as_deref()?.trim();
    if raw.is_empty() {
        return None;
    }

    match DateTime::parse_from_rfc3339(raw) {
        Ok(instant) => Some(instant.with_timezone(&Utc)),
        Err(err) => {
            debug!("Ignoring unparsable time '{}': {}", raw, err);
            None
        }
    }
}

/// Resolve a time range against the current instant
pub fn get_effective_time_range(range: &TimeRange, now: DateTime<Utc>) -> EffectiveTimeRange {
    match range.mode {
        TimeRangeMode::Absolute => EffectiveTimeRange {
            from: parse_instant(&range.from),
            to: parse_instant(&range.to),
        },
        TimeRangeMode::Relative => match range.relative_value {
            Some(value) if value > 0 => {
                // Spans past chrono's range leave the start open
                let from = i64::try_from(range.relative_unit.millis())
                    .ok()
                    .and_then(|unit| unit.checked_mul(i64::from(value)))
                    .and_then(Duration::try_milliseconds)
                    .and_then(|span| now.checked_sub_signed(span));
                if from.is_none() {
                    debug!(
                        "Relative range of {} {:?} exceeds the calendar",
                        value, range.relative_unit
                    );
                }
                EffectiveTimeRange {
                    from,
                    to: Some(now),
                }
            }
            _ => EffectiveTimeRange::default(),
        },
    }
}

/// Refresh period in milliseconds, if auto-refresh is active
pub fn get_auto_refresh_ms(auto_refresh: &AutoRefresh) -> Option<u64> {
    match auto_refresh.interval_value {
        Some(value) if auto_refresh.enabled && value >= 1 => {
            Some(value as u64 * auto_refresh.interval_unit.millis())
        }
        _ => None,
    }
}

/// Texts used for validation errors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValidationMessages {
    pub title_required: String,
    pub title_length: String,
    pub auto_refresh_interval: String,
}

impl Default for ValidationMessages {
    fn default() -> Self {
        ValidationMessages {
            title_required: "Title is required".to_string(),
            title_length: format!(
                "Title must be between {} and {} characters",
                TITLE_MIN_LENGTH, TITLE_MAX_LENGTH
            ),
            auto_refresh_interval: "Refresh interval must be at least 1".to_string(),
        }
    }
}

/// Validate a dashboard form; an empty map means valid
pub fn validate_config(
    config: &DashboardFormConfig,
    messages: &ValidationMessages,
) -> BTreeMap<String, String> {
    let mut errors = BTreeMap::new();
    let title = config.title.trim();

    if validate_not_empty(title, TITLE_FIELD).is_err() {
        errors.insert(TITLE_FIELD.to_string(), messages.title_required.clone());
    } else if validate_length(title, TITLE_MIN_LENGTH, TITLE_MAX_LENGTH, TITLE_FIELD).is_err() {
        errors.insert(TITLE_FIELD.to_string(), messages.title_length.clone());
    }

    if config.auto_refresh.enabled && config.auto_refresh.interval_value.unwrap_or(0) < 1 {
        errors.insert(
            AUTO_REFRESH_FIELD.to_string(),
            messages.auto_refresh_interval.clone(),
        );
    }

    errors
}
