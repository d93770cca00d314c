// Backend error classification and user-facing messages
// Author: Gabriel Demetrios Lafis

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Raw message an HTTP client reports when no response arrived
pub const NETWORK_ERROR: &str = "Network Error";

/// Class of a failed backend call, derived from its HTTP status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorKind {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict,
    Validation,
    RateLimited,
    ServerError,
    ServiceUnavailable,
    Unknown,
}

impl ApiErrorKind {
    /// Classify an HTTP status
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => ApiErrorKind::BadRequest,
            401 => ApiErrorKind::Unauthorized,
            403 => ApiErrorKind::Forbidden,
            404 => ApiErrorKind::NotFound,
            409 => ApiErrorKind::Conflict,
            422 => ApiErrorKind::Validation,
            429 => ApiErrorKind::RateLimited,
            503 => ApiErrorKind::ServiceUnavailable,
            500..=599 => ApiErrorKind::ServerError,
            _ => ApiErrorKind::Unknown,
        }
    }

    /// Representative status code for responses of this kind
    pub fn status(&self) -> u16 {
        match self {
            ApiErrorKind::BadRequest => 400,
            ApiErrorKind::Unauthorized => 401,
            ApiErrorKind::Forbidden => 403,
            ApiErrorKind::NotFound => 404,
            ApiErrorKind::Conflict => 409,
            ApiErrorKind::Validation => 422,
            ApiErrorKind::RateLimited => 429,
            ApiErrorKind::ServerError | ApiErrorKind::Unknown => 500,
            ApiErrorKind::ServiceUnavailable => 503,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ApiErrorKind::BadRequest => "bad_request",
            ApiErrorKind::Unauthorized => "unauthorized",
            ApiErrorKind::Forbidden => "forbidden",
            ApiErrorKind::NotFound => "not_found",
            ApiErrorKind::Conflict => "conflict",
            ApiErrorKind::Validation => "validation",
            ApiErrorKind::RateLimited => "rate_limited",
            ApiErrorKind::ServerError => "server_error",
            ApiErrorKind::ServiceUnavailable => "service_unavailable",
            ApiErrorKind::Unknown => "unknown",
        }
    }
}

/// Operation a failed call belonged to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorContext {
    Save,
    Delete,
    Load,
    Create,
    Update,
    Fetch,
}

/// Message catalog for API failures
///
/// English defaults; callers inject translated texts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ErrorMessages {
    pub bad_request: String,
    pub unauthorized: String,
    pub forbidden: String,
    pub not_found: String,
    pub conflict: String,
    pub validation: String,
    pub rate_limited: String,
    pub server_error: String,
    pub service_unavailable: String,
    pub generic: String,
    pub save_failed: String,
    pub delete_failed: String,
    pub load_failed: String,
    pub create_failed: String,
    pub update_failed: String,
    pub fetch_failed: String,
}

impl Default for ErrorMessages {
    fn default() -> Self {
        ErrorMessages {
            bad_request: "The request was invalid".to_string(),
            unauthorized: "Your session has expired, please sign in again".to_string(),
            forbidden: "You do not have permission to perform this action".to_string(),
            not_found: "The requested resource was not found".to_string(),
            conflict: "The resource was modified by someone else".to_string(),
            validation: "Some fields are invalid".to_string(),
            rate_limited: "Too many requests, please try again later".to_string(),
            server_error: "The server encountered an error".to_string(),
            service_unavailable: "The service is temporarily unavailable".to_string(),
            generic: "An unexpected error occurred".to_string(),
            save_failed: "Failed to save".to_string(),
            delete_failed: "Failed to delete".to_string(),
            load_failed: "Failed to load".to_string(),
            create_failed: "Failed to create".to_string(),
            update_failed: "Failed to update".to_string(),
            fetch_failed: "Failed to fetch data".to_string(),
        }
    }
}

impl ErrorMessages {
    /// Message for a kind; unknown failures get the generic text
    pub fn for_kind(&self, kind: ApiErrorKind) -> &str {
        match kind {
            ApiErrorKind::BadRequest => &self.bad_request,
            ApiErrorKind::Unauthorized => &self.unauthorized,
            ApiErrorKind::Forbidden => &self.forbidden,
            ApiErrorKind::NotFound => &self.not_found,
            ApiErrorKind::Conflict => &self.conflict,
            ApiErrorKind::Validation => &self.validation,
            ApiErrorKind::RateLimited => &self.rate_limited,
            ApiErrorKind::ServerError => &self.server_error,
            ApiErrorKind::ServiceUnavailable => &self.service_unavailable,
            ApiErrorKind::Unknown => &self.generic,
        }
    }

    pub fn for_context(&self, context: ErrorContext) -> &str {
        match context {
            ErrorContext::Save => &self.save_failed,
            ErrorContext::Delete => &self.delete_failed,
            ErrorContext::Load => &self.load_failed,
            ErrorContext::Create => &self.create_failed,
            ErrorContext::Update => &self.update_failed,
            ErrorContext::Fetch => &self.fetch_failed,
        }
    }
}

fn non_empty(value: Option<&JsonValue>) -> Option<String> {
    match value? {
        JsonValue::String(s) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Message carried by a backend error body, if any
fn body_message(body: &JsonValue) -> Option<String> {
    if body.is_string() {
        return non_empty(Some(body));
    }

    non_empty(body.get("message"))
        .or_else(|| non_empty(body.get("error")))
        .or_else(|| non_empty(body.pointer("/error/message")))
        .or_else(|| non_empty(body.pointer("/errors/0/message")))
        .or_else(|| non_empty(body.get("detail")))
}

/// Turn a failed call into a message for the user
///
/// The backend's own message wins; otherwise the status decides. A
/// missing status (no response at all) classifies as unknown.
pub fn extract_error_message(
    status: Option<u16>,
    body: Option<&JsonValue>,
    messages: &ErrorMessages,
) -> String {
    if let Some(message) = body.and_then(body_message) {
        return message;
    }

    let kind = status.map_or(ApiErrorKind::Unknown, ApiErrorKind::from_status);
    messages.for_kind(kind).to_string()
}

/// Like `extract_error_message`, but names the failed operation when the
/// extracted text would otherwise be the generic fallback or a raw
/// network error
pub fn contextual_error_message(
    context: ErrorContext,
    status: Option<u16>,
    body: Option<&JsonValue>,
    messages: &ErrorMessages,
) -> String {
    let message = extract_error_message(status, body, messages);

    if message == messages.generic || message == NETWORK_ERROR {
        messages.for_context(context).to_string()
    } else {
        message
    }
}
