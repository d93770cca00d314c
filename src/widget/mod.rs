// Widget module: type registry, form service and editor state
// Author: Gabriel Demetrios Lafis

mod types;
mod params;
mod registry;
mod form;
mod store;

pub use types::*;
pub use params::*;
pub use registry::*;
pub use form::*;
pub use store::*;

use thiserror::Error;

use crate::storage::StorageError;

/// Represents an error in the widget module
#[derive(Debug, Error)]
pub enum WidgetError {
    #[error("{}", unsupported_type_message(.0))]
    UnsupportedType(String),
    #[error("{widget_type} widgets support at most {max} metric(s)")]
    TooManyMetrics { widget_type: WidgetType, max: usize },
    #[error("{widget_type} widgets need at least {min} metric(s)")]
    TooFewMetrics { widget_type: WidgetType, min: usize },
    #[error("{0} widgets do not support buckets")]
    BucketsNotAllowed(WidgetType),
    #[error("{} widgets do not support {} buckets", .widget_type, .bucket_type.as_str())]
    BucketTypeNotAllowed {
        widget_type: WidgetType,
        bucket_type: BucketType,
    },
    #[error("{widget_type} widgets support at most {max} bucket(s)")]
    TooManyBuckets { widget_type: WidgetType, max: usize },
    #[error("Index {index} out of range (length {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Draft storage error: {0}")]
    Storage(#[from] StorageError),
}
