// API module: error taxonomy and HTTP surface
// Author: Gabriel Demetrios Lafis

mod errors;
mod server;
mod routes;
mod handlers;
mod models;

pub use errors::*;
pub use server::*;
pub use routes::*;
pub use handlers::*;
pub use models::*;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use crate::dashboard::DashboardError;
use crate::storage::StorageError;
use crate::widget::WidgetError;

/// Represents an error in the API module
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Widget error: {0}")]
    Widget(#[from] WidgetError),
    #[error("Dashboard error: {0}")]
    Dashboard(#[from] DashboardError),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApiError {
    /// Taxonomy class of the error
    pub fn kind(&self) -> ApiErrorKind {
        match self {
            ApiError::Widget(WidgetError::UnsupportedType(_)) => ApiErrorKind::NotFound,
            ApiError::Widget(WidgetError::Storage(err)) | ApiError::Storage(err) => match err {
                StorageError::InvalidKey(_) => ApiErrorKind::BadRequest,
                _ => ApiErrorKind::ServerError,
            },
            ApiError::Widget(_) => ApiErrorKind::Validation,
            ApiError::Dashboard(DashboardError::DuplicateWidget(_)) => ApiErrorKind::Conflict,
            ApiError::Dashboard(_) => ApiErrorKind::NotFound,
            ApiError::BadRequest(_) => ApiErrorKind::BadRequest,
            ApiError::ValidationError(_) => ApiErrorKind::Validation,
            ApiError::NotFound(_) => ApiErrorKind::NotFound,
            ApiError::InternalError(_) => ApiErrorKind::ServerError,
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "error": {
                "kind": self.kind().as_str(),
                "message": self.to_string(),
            }
        }))
    }
}
