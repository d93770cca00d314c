// Dashboard module: form service, grid layout and themes
// Author: Gabriel Demetrios Lafis

mod types;
mod form;
mod layout;
mod theme;

pub use types::*;
pub use form::*;
pub use layout::*;
pub use theme::*;

use thiserror::Error;

/// Represents an error in the dashboard module
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Widget '{0}' is already on the dashboard")]
    DuplicateWidget(String),
    #[error("Widget '{0}' is not on the dashboard")]
    WidgetNotFound(String),
    #[error("Unknown theme '{0}'")]
    UnknownTheme(String),
}
