// API request handlers
// Author: Gabriel Demetrios Lafis

use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use log::{debug, info};
use serde_json::{json, Value as JsonValue};

use super::{models::*, ApiError, AppState};
use crate::dashboard::{
    apply_theme, build_save_payload, calculate_next_position, find_theme, get_auto_refresh_ms,
    get_effective_time_range, theme_presets, validate_config, DashboardFormConfig, GRID_COLS,
};
use crate::format::FormatConfig;
use crate::style::{
    generate_accessible_colors, get_contrast_ratio, get_luminance, has_good_contrast,
    has_good_contrast_large_text,
};
use crate::utils::{validate_color, validate_range};
use crate::widget::{
    apply_source_data, build_chart_config, create_form_config, data_config_for,
    get_widget_config_schema, get_widget_data_config, schema_for, unsupported_type_message,
    Widget, WidgetType,
};

/// Most fraction digits a formatter will render
const MAX_DECIMALS: u8 = 10;

/// List every registered widget type
pub async fn list_widget_types() -> Result<impl Responder, ApiError> {
    let types: Vec<WidgetTypeInfo> = WidgetType::ALL
        .iter()
        .map(|&widget_type| WidgetTypeInfo {
            widget_type,
            renderer: schema_for(widget_type).renderer,
            data: data_config_for(widget_type).clone(),
        })
        .collect();

    Ok(HttpResponse::Ok().json(json!({ "types": types })))
}

/// Get the field schema and data requirements of a widget type
pub async fn get_widget_schema(path: web::Path<String>) -> Result<impl Responder, ApiError> {
    let type_name = path.into_inner();

    let schema = get_widget_config_schema(&type_name)
        .ok_or_else(|| ApiError::NotFound(unsupported_type_message(&type_name)))?;
    let data = get_widget_data_config(&type_name)
        .ok_or_else(|| ApiError::NotFound(unsupported_type_message(&type_name)))?;

    Ok(HttpResponse::Ok().json(json!({
        "schema": schema,
        "data": data,
    })))
}

/// Normalize a widget form configuration for a type
pub async fn widget_form_config(
    payload: web::Json<FormConfigRequest>,
) -> Result<impl Responder, ApiError> {
    let req = payload.into_inner();
    let config = create_form_config(&req.widget_type, req.existing.as_ref());

    Ok(HttpResponse::Ok().json(config))
}

/// Build the renderer-ready configuration of a widget
pub async fn widget_chart_config(payload: web::Json<Widget>) -> Result<impl Responder, ApiError> {
    let chart = build_chart_config(&payload.into_inner())?;

    Ok(HttpResponse::Ok().json(chart))
}

/// Reconcile a widget's field references with a data source
pub async fn widget_source_data(
    payload: web::Json<SourceDataRequest>,
) -> Result<impl Responder, ApiError> {
    let req = payload.into_inner();
    let result = apply_source_data(&req.columns, req.dataset_shape, &req.metrics, &req.buckets);

    if !result.is_clean() {
        debug!("Cleared {} stale field reference(s)", result.warnings.len());
    }

    Ok(HttpResponse::Ok().json(result))
}

/// Find where the next widget goes on a layout
pub async fn next_position(
    payload: web::Json<NextPositionRequest>,
) -> Result<impl Responder, ApiError> {
    let req = payload.into_inner();
    let cols = req.cols.unwrap_or(GRID_COLS);
    if cols == 0 {
        return Err(ApiError::ValidationError(
            "'cols' must be positive".to_string(),
        ));
    }

    Ok(HttpResponse::Ok().json(calculate_next_position(&req.layout, cols)))
}

/// Validate a dashboard form
pub async fn validate_dashboard(
    payload: web::Json<ValidateRequest>,
) -> Result<impl Responder, ApiError> {
    let req = payload.into_inner();
    let messages = req.messages.unwrap_or_default();
    let errors = validate_config(&req.config, &messages);

    Ok(HttpResponse::Ok().json(ValidateResponse {
        valid: errors.is_empty(),
        errors,
    }))
}

/// Build the save payload of a dashboard form
pub async fn dashboard_save_payload(
    payload: web::Json<DashboardFormConfig>,
) -> Result<impl Responder, ApiError> {
    Ok(HttpResponse::Ok().json(build_save_payload(&payload.into_inner())))
}

/// Resolve a time range and refresh period
pub async fn resolve_time_range(
    payload: web::Json<TimeRangeRequest>,
) -> Result<impl Responder, ApiError> {
    let req = payload.into_inner();
    let now = req.now.unwrap_or_else(Utc::now);

    Ok(HttpResponse::Ok().json(TimeRangeResponse {
        range: get_effective_time_range(&req.time_range, now),
        auto_refresh_ms: req.auto_refresh.as_ref().and_then(get_auto_refresh_ms),
    }))
}

/// List the preset themes
pub async fn list_themes() -> Result<impl Responder, ApiError> {
    Ok(HttpResponse::Ok().json(json!({ "themes": theme_presets() })))
}

/// Apply a preset theme to a dashboard form
pub async fn apply_dashboard_theme(
    path: web::Path<String>,
    payload: web::Json<DashboardFormConfig>,
) -> Result<impl Responder, ApiError> {
    let theme = find_theme(&path.into_inner())?;
    let mut config = payload.into_inner();
    apply_theme(&mut config, &theme);

    Ok(HttpResponse::Ok().json(config))
}

/// Contrast ratio and WCAG checks for two colors
pub async fn color_contrast(
    payload: web::Json<ContrastRequest>,
) -> Result<impl Responder, ApiError> {
    let req = payload.into_inner();
    validate_color(&req.foreground, "foreground").map_err(ApiError::ValidationError)?;
    validate_color(&req.background, "background").map_err(ApiError::ValidationError)?;

    Ok(HttpResponse::Ok().json(ContrastResponse {
        ratio: get_contrast_ratio(&req.foreground, &req.background),
        aa_normal_text: has_good_contrast(&req.foreground, &req.background),
        aa_large_text: has_good_contrast_large_text(&req.foreground, &req.background),
        foreground_luminance: get_luminance(&req.foreground),
        background_luminance: get_luminance(&req.background),
    }))
}

/// Readable chart colors for a background
pub async fn color_palette(payload: web::Json<PaletteRequest>) -> Result<impl Responder, ApiError> {
    let req = payload.into_inner();
    validate_color(&req.background, "background").map_err(ApiError::ValidationError)?;

    Ok(HttpResponse::Ok().json(generate_accessible_colors(&req.background)))
}

/// Current formatting preferences
pub async fn get_format(state: web::Data<AppState>) -> Result<impl Responder, ApiError> {
    Ok(HttpResponse::Ok().json(state.format.get()))
}

/// Replace the formatting preferences
pub async fn update_format(
    state: web::Data<AppState>,
    payload: web::Json<FormatConfig>,
) -> Result<impl Responder, ApiError> {
    let config = payload.into_inner();
    validate_range(config.decimals, 0, MAX_DECIMALS, "decimals").map_err(ApiError::ValidationError)?;
    info!("Updating format preferences (locale {})", config.locale);
    state.format.set(config);

    Ok(HttpResponse::Ok().json(state.format.get()))
}

/// Get a stored draft
pub async fn get_draft(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<impl Responder, ApiError> {
    let key = path.into_inner();

    let raw = state
        .storage
        .get(&key)?
        .ok_or_else(|| ApiError::NotFound(format!("Draft '{}' not found", key)))?;

    let value: JsonValue = serde_json::from_str(&raw).map_err(|e| {
        ApiError::InternalError(format!("Draft '{}' is unreadable: {}", key, e))
    })?;

    Ok(HttpResponse::Ok().json(value))
}

/// Store a draft
pub async fn put_draft(
    state: web::Data<AppState>,
    path: web::Path<String>,
    payload: web::Json<JsonValue>,
) -> Result<impl Responder, ApiError> {
    let key = path.into_inner();
    let raw = serde_json::to_string(&payload.into_inner())
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    state.storage.set(&key, &raw)?;

    Ok(HttpResponse::Ok().json(json!({
        "key": key,
        "status": "saved",
    })))
}

/// Delete a draft
pub async fn delete_draft(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<impl Responder, ApiError> {
    let key = path.into_inner();
    state.storage.remove(&key)?;

    Ok(HttpResponse::NoContent().finish())
}

/// List stored draft keys
pub async fn list_drafts(state: web::Data<AppState>) -> Result<impl Responder, ApiError> {
    let keys = state.storage.keys()?;

    Ok(HttpResponse::Ok().json(json!({ "drafts": keys })))
}
