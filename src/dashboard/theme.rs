// Dashboard theme presets
// Author: Gabriel Demetrios Lafis

use log::info;
use serde::Serialize;

use super::{DashboardError, DashboardFormConfig, DashboardStyles, WidgetItemStyles};
use crate::style::{generate_accessible_colors, AccessibleColors};

/// Background assumed for items without one
const DEFAULT_ITEM_BACKGROUND: &str = "#ffffff";

/// A preset bundle of dashboard and widget-item styles
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardTheme {
    pub id: &'static str,
    pub name: &'static str,
    pub dashboard: DashboardStyles,
    pub widget: WidgetItemStyles,
}

struct Palette {
    page: &'static str,
    gradient: Option<&'static str>,
    title: &'static str,
    card: &'static str,
    border: &'static str,
    text: &'static str,
    shadow: &'static str,
}

fn build(id: &'static str, name: &'static str, p: Palette) -> DashboardTheme {
    DashboardTheme {
        id,
        name,
        dashboard: DashboardStyles {
            background_color: Some(p.page.to_string()),
            background_gradient: p.gradient.map(str::to_string),
            padding: Some(16),
            gap: Some(16),
            title_color: Some(p.title.to_string()),
            font_family: None,
        },
        widget: WidgetItemStyles {
            background_color: Some(p.card.to_string()),
            background_gradient: None,
            border_color: Some(p.border.to_string()),
            border_width: Some(1),
            border_radius: Some(8),
            shadow: Some(p.shadow.to_string()),
            padding: Some(12),
            title_color: Some(p.title.to_string()),
            text_color: Some(p.text.to_string()),
        },
    }
}

/// All preset themes, in display order
pub fn theme_presets() -> Vec<DashboardTheme> {
    vec![
        build(
            "light",
            "Light",
            Palette {
                page: "#f5f7fa",
                gradient: None,
                title: "#1f2937",
                card: "#ffffff",
                border: "#e5e7eb",
                text: "#374151",
                shadow: "0 1px 3px rgba(0, 0, 0, 0.1)",
            },
        ),
        build(
            "dark",
            "Dark",
            Palette {
                page: "#111827",
                gradient: None,
                title: "#f9fafb",
                card: "#1f2937",
                border: "#374151",
                text: "#d1d5db",
                shadow: "0 1px 3px rgba(0, 0, 0, 0.5)",
            },
        ),
        build(
            "ocean",
            "Ocean",
            Palette {
                page: "#e0f2fe",
                gradient: Some("linear-gradient(135deg, #e0f2fe 0%, #bae6fd 100%)"),
                title: "#0c4a6e",
                card: "#ffffff",
                border: "#7dd3fc",
                text: "#075985",
                shadow: "0 2px 6px rgba(14, 116, 144, 0.15)",
            },
        ),
        build(
            "sunset",
            "Sunset",
            Palette {
                page: "#fff7ed",
                gradient: Some("linear-gradient(135deg, #fff7ed 0%, #fed7aa 100%)"),
                title: "#7c2d12",
                card: "#ffffff",
                border: "#fdba74",
                text: "#9a3412",
                shadow: "0 2px 6px rgba(194, 65, 12, 0.15)",
            },
        ),
        build(
            "forest",
            "Forest",
            Palette {
                page: "#ecfdf5",
                gradient: None,
                title: "#064e3b",
                card: "#ffffff",
                border: "#6ee7b7",
                text: "#065f46",
                shadow: "0 2px 6px rgba(4, 120, 87, 0.15)",
            },
        ),
        build(
            "midnight",
            "Midnight",
            Palette {
                page: "#0f172a",
                gradient: Some("linear-gradient(135deg, #0f172a 0%, #1e1b4b 100%)"),
                title: "#e0e7ff",
                card: "#1e293b",
                border: "#4338ca",
                text: "#c7d2fe",
                shadow: "0 4px 12px rgba(0, 0, 0, 0.6)",
            },
        ),
    ]
}

/// Look up a preset by id
pub fn find_theme(id: &str) -> Result<DashboardTheme, DashboardError> {
    theme_presets()
        .into_iter()
        .find(|theme| theme.id == id)
        .ok_or_else(|| DashboardError::UnknownTheme(id.to_string()))
}

/// Apply a theme to the whole dashboard
///
/// Dashboard styles and every layout item's style block are replaced
/// outright; earlier per-item overrides do not survive.
pub fn apply_theme(config: &mut DashboardFormConfig, theme: &DashboardTheme) {
    config.styles = theme.dashboard.clone();
    for item in config.layout.iter_mut() {
        item.styles = Some(theme.widget.clone());
    }

    info!(
        "Applied theme '{}' to {} widget(s)",
        theme.id,
        config.layout.len()
    );
}

/// Readable chart colors for a widget item's background
pub fn chart_palette(styles: Option<&WidgetItemStyles>) -> AccessibleColors {
    let background = styles
        .and_then(|s| s.background_color.as_deref())
        .unwrap_or(DEFAULT_ITEM_BACKGROUND);

    generate_accessible_colors(background)
}
