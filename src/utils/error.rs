// Error handling utilities
// Author: Gabriel Demetrios Lafis

use thiserror::Error;

use crate::api::ApiError;
use crate::dashboard::DashboardError;
use crate::format::FormatError;
use crate::storage::StorageError;
use crate::widget::WidgetError;

/// Application error type
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Widget error: {0}")]
    Widget(#[from] WidgetError),
    #[error("Dashboard error: {0}")]
    Dashboard(#[from] DashboardError),
    #[error("Format error: {0}")]
    Format(#[from] FormatError),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("API error: {0}")]
    Api(#[from] ApiError),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for AppError
pub type AppResult<T> = Result<T, AppError>;
