// Dashboard Configuration Engine
// Author: Gabriel Demetrios Lafis

//! # Dashboard Configuration Engine
//!
//! Widget configuration and layout engine for a dashboard builder.
//!
//! ## Features
//!
//! - Widget type registry with field schemas and data-shape requirements
//! - Widget form normalization, type switching and chart configuration
//! - Dashboard placement, save payloads, time ranges and validation
//! - Responsive grid projection with drag/resize reconciliation
//! - Theme presets and WCAG contrast helpers
//! - Process-wide formatting preferences with debounced sync
//! - REST API for remote access
//!
//! ## Example
//!
//! ```rust
//! use dashboard_config_engine::{
//!     dashboard::{add_widget, apply_theme, find_theme, validate_config, DashboardFormConfig, ValidationMessages},
//!     widget::{WidgetFormStore, WidgetType},
//! };
//!
//! // Configure a widget
//! let mut store = WidgetFormStore::new(WidgetType::Pie);
//! store.set_name("Revenue share");
//! store.set_type(WidgetType::Scatter);
//! assert!(store.entries()[0].metric.x.is_some());
//!
//! // Lay out a dashboard
//! let mut config = DashboardFormConfig::default();
//! config.title = "Sales".to_string();
//! add_widget(&mut config, "w1").unwrap();
//! add_widget(&mut config, "w2").unwrap();
//! assert_eq!((config.layout[1].x, config.layout[1].y), (6, 0));
//!
//! // Theme it
//! let theme = find_theme("ocean").unwrap();
//! apply_theme(&mut config, &theme);
//!
//! assert!(validate_config(&config, &ValidationMessages::default()).is_empty());
//! ```

pub mod api;
pub mod dashboard;
pub mod format;
pub mod storage;
pub mod style;
pub mod utils;
pub mod widget;

// Re-export main types
pub use api::{ApiError, Server};
pub use dashboard::{DashboardFormConfig, DashboardGrid, LayoutItem};
pub use format::{FormatConfig, FormatConfigProvider};
pub use storage::{DraftStorage, FileStorage, MemoryStorage};
pub use utils::Config;
pub use widget::{Widget, WidgetFormConfig, WidgetFormStore, WidgetType};
