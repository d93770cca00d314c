// Widget editor state
// Author: Gabriel Demetrios Lafis

use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::storage::{load_draft, save_draft, DraftStorage};
use super::{
    apply_schema_defaults, apply_source_data, create_form_config, data_config_for,
    get_nested_param, set_nested_param, BucketConfig, BucketType, ColumnInfo, FieldWarning,
    Filter, MetricConfig, MetricEntry, MetricStyle, Widget, WidgetError, WidgetFormConfig,
    WidgetParams, WidgetType,
};

/// Storage key of the widget editor draft
pub const WIDGET_DRAFT_KEY: &str = "widget-form-draft";

/// Body sent to the backend when saving a widget (also the draft format)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetSavePayload {
    pub name: String,
    #[serde(rename = "type")]
    pub widget_type: WidgetType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_source_id: Option<String>,
    pub config: WidgetFormConfig,
}

/// Working state of the widget editor
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetFormStore {
    name: String,
    widget_type: WidgetType,
    data_source_id: Option<String>,
    entries: Vec<MetricEntry>,
    buckets: Vec<BucketConfig>,
    filters: Vec<Filter>,
    params: WidgetParams,
    source_warnings: Vec<FieldWarning>,
}

impl WidgetFormStore {
    /// Start a new widget of the given type
    pub fn new(widget_type: WidgetType) -> Self {
        Self::from_parts(String::new(), widget_type, None, create_form_config(widget_type.as_str(), None))
    }

    /// Load a persisted widget into the editor
    pub fn from_widget(widget: &Widget) -> Result<Self, WidgetError> {
        let kind = widget
            .kind()
            .ok_or_else(|| WidgetError::UnsupportedType(widget.widget_type.clone()))?;
        let config = create_form_config(kind.as_str(), Some(&widget.config));
        Ok(Self::from_parts(widget.name.clone(), kind, widget.data_source_id.clone(), config))
    }

    fn from_parts(
        name: String,
        widget_type: WidgetType,
        data_source_id: Option<String>,
        config: WidgetFormConfig,
    ) -> Self {
        WidgetFormStore {
            name,
            widget_type,
            data_source_id,
            entries: config.entries(),
            buckets: config.buckets,
            filters: config.global_filters,
            params: config.widget_params,
            source_warnings: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    pub fn widget_type(&self) -> WidgetType {
        self.widget_type
    }

    pub fn data_source_id(&self) -> Option<&str> {
        self.data_source_id.as_deref()
    }

    pub fn entries(&self) -> &[MetricEntry] {
        &self.entries
    }

    pub fn buckets(&self) -> &[BucketConfig] {
        &self.buckets
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn params(&self) -> &WidgetParams {
        &self.params
    }

    /// Warnings left by the last data source change
    pub fn source_warnings(&self) -> &[FieldWarning] {
        &self.source_warnings
    }

    /// Switch the widget to another type
    ///
    /// Metrics are reshaped for the new dataset shape and trimmed to its
    /// metric limit, unsupported buckets are dropped and parameters are
    /// re-derived from the new schema.
    pub fn set_type(&mut self, widget_type: WidgetType) {
        if widget_type == self.widget_type {
            return;
        }

        let data = data_config_for(widget_type);
        let shape = data.dataset_shape;

        let mut entries: Vec<MetricEntry> = std::mem::take(&mut self.entries)
            .into_iter()
            .map(|entry| MetricEntry {
                metric: entry.metric.reshape(shape),
                style: entry.style,
            })
            .collect();
        if let Some(max) = data.max_metrics {
            entries.truncate(max);
        }
        while entries.len() < data.min_metrics {
            entries.push(MetricEntry::new(MetricConfig::for_shape(shape)));
        }
        self.entries = entries;

        self.buckets.retain(|bucket| data.allows_bucket_type(bucket.bucket_type));
        if let Some(max) = data.max_buckets {
            self.buckets.truncate(max);
        }

        self.params = apply_schema_defaults(widget_type.as_str(), &self.params);

        debug!("Widget type changed from {} to {}", self.widget_type, widget_type);
        self.widget_type = widget_type;
    }

    fn check_metric_index(&self, index: usize) -> Result<(), WidgetError> {
        if index < self.entries.len() {
            Ok(())
        } else {
            Err(WidgetError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            })
        }
    }

    /// Append a metric built for the current dataset shape
    pub fn add_metric(&mut self) -> Result<usize, WidgetError> {
        let data = data_config_for(self.widget_type);
        if let Some(max) = data.max_metrics {
            if self.entries.len() >= max {
                return Err(WidgetError::TooManyMetrics {
                    widget_type: self.widget_type,
                    max,
                });
            }
        }

        self.entries
            .push(MetricEntry::new(MetricConfig::for_shape(data.dataset_shape)));
        Ok(self.entries.len() - 1)
    }

    /// Modify the metric at `index`
    pub fn update_metric<F>(&mut self, index: usize, f: F) -> Result<(), WidgetError>
    where
        F: FnOnce(&mut MetricConfig),
    {
        self.check_metric_index(index)?;
        f(&mut self.entries[index].metric);
        Ok(())
    }

    /// Remove the metric at `index` together with its style
    pub fn remove_metric(&mut self, index: usize) -> Result<MetricEntry, WidgetError> {
        self.check_metric_index(index)?;

        let min = data_config_for(self.widget_type).min_metrics;
        if self.entries.len() <= min {
            return Err(WidgetError::TooFewMetrics {
                widget_type: self.widget_type,
                min,
            });
        }

        Ok(self.entries.remove(index))
    }

    /// Move a metric (and its style) to another position
    pub fn move_metric(&mut self, from: usize, to: usize) -> Result<(), WidgetError> {
        self.check_metric_index(from)?;
        self.check_metric_index(to)?;

        let entry = self.entries.remove(from);
        self.entries.insert(to, entry);
        Ok(())
    }

    /// Replace the style of the metric at `index`
    pub fn set_metric_style(&mut self, index: usize, style: MetricStyle) -> Result<(), WidgetError> {
        self.check_metric_index(index)?;
        self.entries[index].style = style;
        Ok(())
    }

    /// Append an empty bucket of the given type
    pub fn add_bucket(&mut self, bucket_type: BucketType) -> Result<usize, WidgetError> {
        let data = data_config_for(self.widget_type);
        if !data.allow_buckets {
            return Err(WidgetError::BucketsNotAllowed(self.widget_type));
        }
        if !data.allows_bucket_type(bucket_type) {
            return Err(WidgetError::BucketTypeNotAllowed {
                widget_type: self.widget_type,
                bucket_type,
            });
        }
        if let Some(max) = data.max_buckets {
            if self.buckets.len() >= max {
                return Err(WidgetError::TooManyBuckets {
                    widget_type: self.widget_type,
                    max,
                });
            }
        }

        self.buckets.push(BucketConfig::new("", bucket_type));
        Ok(self.buckets.len() - 1)
    }

    /// Modify the bucket at `index`
    pub fn update_bucket<F>(&mut self, index: usize, f: F) -> Result<(), WidgetError>
    where
        F: FnOnce(&mut BucketConfig),
    {
        let len = self.buckets.len();
        let bucket = self
            .buckets
            .get_mut(index)
            .ok_or(WidgetError::IndexOutOfRange { index, len })?;
        f(bucket);
        Ok(())
    }

    /// Remove the bucket at `index`
    pub fn remove_bucket(&mut self, index: usize) -> Result<BucketConfig, WidgetError> {
        if index >= self.buckets.len() {
            return Err(WidgetError::IndexOutOfRange {
                index,
                len: self.buckets.len(),
            });
        }
        Ok(self.buckets.remove(index))
    }

    /// Set a nested widget parameter
    pub fn set_param(&mut self, path: &str, value: JsonValue) {
        self.params = set_nested_param(&self.params, path, value);
    }

    /// Read a nested widget parameter
    pub fn param(&self, path: &str) -> Option<&JsonValue> {
        get_nested_param(&self.params, path)
    }

    pub fn set_filters(&mut self, filters: Vec<Filter>) {
        self.filters = filters;
    }

    /// Attach a data source and clear references to columns it lacks
    pub fn attach_source(&mut self, data_source_id: &str, columns: &[ColumnInfo]) -> &[FieldWarning] {
        let shape = data_config_for(self.widget_type).dataset_shape;
        let metrics: Vec<MetricConfig> = self.entries.iter().map(|e| e.metric.clone()).collect();
        let result = apply_source_data(columns, shape, &metrics, &self.buckets);

        for (entry, metric) in self.entries.iter_mut().zip(result.metrics) {
            entry.metric = metric;
        }
        self.buckets = result.buckets;
        self.source_warnings = result.warnings;
        self.data_source_id = Some(data_source_id.to_string());

        &self.source_warnings
    }

    /// Persisted form of the current state
    pub fn to_config(&self) -> WidgetFormConfig {
        WidgetFormConfig::from_entries(
            &self.entries,
            self.buckets.clone(),
            self.filters.clone(),
            self.params.clone(),
        )
    }

    /// Body for the widget create/update request
    pub fn build_save_payload(&self) -> WidgetSavePayload {
        WidgetSavePayload {
            name: self.name.trim().to_string(),
            widget_type: self.widget_type,
            data_source_id: self.data_source_id.clone(),
            config: self.to_config(),
        }
    }

    /// Persist the current state as the editor draft
    pub fn save_draft(&self, storage: &dyn DraftStorage) -> Result<(), WidgetError> {
        let draft = WidgetSavePayload {
            name: self.name.clone(),
            ..self.build_save_payload()
        };
        save_draft(storage, WIDGET_DRAFT_KEY, &draft)?;
        Ok(())
    }

    /// Restore the editor draft, if one was saved
    pub fn restore_draft(storage: &dyn DraftStorage) -> Result<Option<Self>, WidgetError> {
        let draft: Option<WidgetSavePayload> = load_draft(storage, WIDGET_DRAFT_KEY)?;

        Ok(draft.map(|draft| {
            info!("Restored widget draft '{}'", draft.name);
            let config = create_form_config(draft.widget_type.as_str(), Some(&draft.config));
            Self::from_parts(draft.name, draft.widget_type, draft.data_source_id, config)
        }))
    }

    /// Remove the editor draft
    pub fn clear_draft(storage: &dyn DraftStorage) -> Result<(), WidgetError> {
        storage.remove(WIDGET_DRAFT_KEY)?;
        Ok(())
    }
}
