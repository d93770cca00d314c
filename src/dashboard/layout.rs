// Grid layout engine
// Author: Gabriel Demetrios Lafis

use log::debug;
use serde::{Deserialize, Serialize};

use super::{LayoutItem, GRID_COLS};

/// Container widths below this many pixels use the mobile layout
pub const MOBILE_BREAKPOINT: u32 = 768;

/// Whether the grid can be rearranged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridMode {
    Viewing,
    Editing,
}

/// How the dashboard page was opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageMode {
    Create,
    View,
}

/// One item as handed to (and reported back by) the visual grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridItem {
    pub i: String,
    #[serde(default)]
    pub widget_id: String,
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_w: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_h: Option<u32>,
    #[serde(default, rename = "static")]
    pub is_static: bool,
}

/// Bridges the persisted layout and the visual grid
#[derive(Debug, Clone)]
pub struct DashboardGrid {
    layout: Vec<LayoutItem>,
    page_mode: PageMode,
    mode: GridMode,
    container_width: Option<u32>,
}

impl DashboardGrid {
    /// Create a grid; create-mode pages start (and stay) in editing mode
    pub fn new(layout: Vec<LayoutItem>, page_mode: PageMode) -> Self {
        let mode = match page_mode {
            PageMode::Create => GridMode::Editing,
            PageMode::View => GridMode::Viewing,
        };

        DashboardGrid {
            layout,
            page_mode,
            mode,
            container_width: None,
        }
    }

    pub fn layout(&self) -> &[LayoutItem] {
        &self.layout
    }

    pub fn into_layout(self) -> Vec<LayoutItem> {
        self.layout
    }

    pub fn mode(&self) -> GridMode {
        self.mode
    }

    pub fn page_mode(&self) -> PageMode {
        self.page_mode
    }

    /// Switch between viewing and editing
    pub fn toggle_edit(&mut self) -> GridMode {
        if self.page_mode == PageMode::Create {
            return self.mode;
        }

        self.mode = match self.mode {
            GridMode::Viewing => GridMode::Editing,
            GridMode::Editing => GridMode::Viewing,
        };
        self.mode
    }

    /// Record the measured container width
    pub fn set_container_width(&mut self, width: u32) {
        self.container_width = Some(width);
    }

    /// Whether the mobile projection is active
    ///
    /// The width is unknown until the first measurement; the grid renders
    /// as desktop until then.
    pub fn is_mobile(&self) -> bool {
        self.container_width
            .map_or(false, |width| width < MOBILE_BREAKPOINT)
    }

    /// Whether drag and resize are disabled
    pub fn is_static(&self) -> bool {
        self.is_mobile() || self.mode == GridMode::Viewing
    }

    /// Project the layout onto grid items
    pub fn grid_items(&self) -> Vec<GridItem> {
        if self.is_mobile() {
            let mut y = 0;
            return self
                .layout
                .iter()
                .map(|item| {
                    let grid_item = GridItem {
                        i: item.key().to_string(),
                        widget_id: item.widget_id.clone(),
                        x: 0,
                        y,
                        w: GRID_COLS,
                        h: item.h,
                        min_w: item.min_w,
                        min_h: item.min_h,
                        is_static: true,
                    };
                    y = y.saturating_add(item.h);
                    grid_item
                })
                .collect();
        }

        let is_static = self.mode == GridMode::Viewing;
        self.layout
            .iter()
            .map(|item| GridItem {
                i: item.key().to_string(),
                widget_id: item.widget_id.clone(),
                x: item.x,
                y: item.y,
                w: item.w,
                h: item.h,
                min_w: item.min_w,
                min_h: item.min_h,
                is_static,
            })
            .collect()
    }

    /// Apply positions reported by the grid after a drag or resize
    ///
    /// Returns whether anything was updated. Reports are ignored while the
    /// grid is static, and reported items that match no layout item are
    /// skipped.
    pub fn on_layout_change(&mut self, items: &[GridItem]) -> bool {
        if self.is_static() {
            debug!("Ignoring layout change on a static grid");
            return false;
        }

        let mut changed = false;
        for reported in items {
            let index = self
                .layout
                .iter()
                .position(|item| item.key() == reported.i)
                .or_else(|| {
                    self.layout.iter().position(|item| {
                        !reported.widget_id.is_empty() && item.widget_id == reported.widget_id
                    })
                });

            match index {
                Some(index) => {
                    let item = &mut self.layout[index];
                    if (item.x, item.y, item.w, item.h)
                        != (reported.x, reported.y, reported.w, reported.h)
                    {
                        item.x = reported.x;
                        item.y = reported.y;
                        item.w = reported.w;
                        item.h = reported.h;
                        changed = true;
                    }
                }
                None => debug!("Ignoring unknown grid item '{}'", reported.i),
            }
        }

        changed
    }
}
