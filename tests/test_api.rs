// API error taxonomy and HTTP surface tests
// Author: Gabriel Demetrios Lafis

use std::sync::Arc;

use actix_web::{http::StatusCode, test, web, App};
use chrono::{TimeZone, Utc};
use serde_json::{json, Value as JsonValue};

use dashboard_config_engine::{
    api::{
        configure, contextual_error_message, extract_error_message, ApiError, ApiErrorKind,
        AppState, ContrastResponse, ErrorContext, ErrorMessages, TimeRangeResponse,
        ValidateResponse, NETWORK_ERROR,
    },
    dashboard::DashboardError,
    format::FormatConfigProvider,
    storage::{FileStorage, MemoryStorage, StorageError},
    widget::WidgetError,
};

fn memory_state() -> AppState {
    AppState::new(
        Arc::new(MemoryStorage::new()),
        Arc::new(FormatConfigProvider::default()),
    )
}

#[::core::prelude::v1::test]
fn test_kind_from_status() {
    assert_eq!(ApiErrorKind::from_status(400), ApiErrorKind::BadRequest);
    assert_eq!(ApiErrorKind::from_status(409), ApiErrorKind::Conflict);
    assert_eq!(ApiErrorKind::from_status(422), ApiErrorKind::Validation);
    assert_eq!(ApiErrorKind::from_status(503), ApiErrorKind::ServiceUnavailable);
    assert_eq!(ApiErrorKind::from_status(502), ApiErrorKind::ServerError);
    assert_eq!(ApiErrorKind::from_status(418), ApiErrorKind::Unknown);
}

#[::core::prelude::v1::test]
fn test_backend_message_wins() {
    let messages = ErrorMessages::default();

    let flat = json!({ "message": "Title already taken" });
    assert_eq!(
        extract_error_message(Some(409), Some(&flat), &messages),
        "Title already taken"
    );

    let nested = json!({ "error": { "message": "Quota exceeded" } });
    assert_eq!(extract_error_message(Some(429), Some(&nested), &messages), "Quota exceeded");

    let list = json!({ "errors": [{ "message": "name is required" }] });
    assert_eq!(extract_error_message(Some(422), Some(&list), &messages), "name is required");

    let text = json!("Gateway exploded");
    assert_eq!(extract_error_message(Some(502), Some(&text), &messages), "Gateway exploded");
}

#[::core::prelude::v1::test]
fn test_status_fallback() {
    let messages = ErrorMessages::default();

    let blank = json!({ "message": "   " });
    assert_eq!(
        extract_error_message(Some(404), Some(&blank), &messages),
        messages.not_found
    );
    assert_eq!(extract_error_message(Some(503), None, &messages), messages.service_unavailable);
    assert_eq!(extract_error_message(None, None, &messages), messages.generic);
}

#[::core::prelude::v1::test]
fn test_contextual_messages() {
    let messages = ErrorMessages {
        save_failed: "Falha ao salvar".to_string(),
        ..ErrorMessages::default()
    };

    // No response at all
    assert_eq!(
        contextual_error_message(ErrorContext::Save, None, None, &messages),
        "Falha ao salvar"
    );

    // Raw network error text from the client
    let network = JsonValue::String(NETWORK_ERROR.to_string());
    assert_eq!(
        contextual_error_message(ErrorContext::Delete, None, Some(&network), &messages),
        messages.delete_failed
    );

    // A specific status keeps its own message
    assert_eq!(
        contextual_error_message(ErrorContext::Load, Some(403), None, &messages),
        messages.forbidden
    );
}

#[::core::prelude::v1::test]
fn test_api_error_kinds() {
    assert_eq!(
        ApiError::from(WidgetError::UnsupportedType("sankey".to_string())).kind(),
        ApiErrorKind::NotFound
    );
    assert_eq!(
        ApiError::from(DashboardError::DuplicateWidget("w1".to_string())).kind(),
        ApiErrorKind::Conflict
    );
    assert_eq!(
        ApiError::from(StorageError::InvalidKey("../x".to_string())).kind(),
        ApiErrorKind::BadRequest
    );
    assert_eq!(
        ApiError::InternalError("boom".to_string()).kind(),
        ApiErrorKind::ServerError
    );
}

#[actix_web::test]
async fn test_health_and_widget_types() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(memory_state()))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let body: JsonValue = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], json!("ok"));

    let req = test::TestRequest::get().uri("/api/v1/widgets/types").to_request();
    let body: JsonValue = test::call_and_read_body_json(&app, req).await;
    let types = body["types"].as_array().unwrap();
    assert!(types.iter().any(|t| t["type"] == json!("scatter")));

    let req = test::TestRequest::get()
        .uri("/api/v1/widgets/types/sankey/schema")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: JsonValue = test::read_body_json(resp).await;
    assert_eq!(body["error"]["kind"], json!("not_found"));
}

#[actix_web::test]
async fn test_dashboard_endpoints() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(memory_state()))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/dashboards/next-position")
        .set_json(json!({ "layout": [{ "widgetId": "a", "x": 0, "y": 0, "w": 6, "h": 4 }] }))
        .to_request();
    let body: JsonValue = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({ "x": 6, "y": 0 }));

    let req = test::TestRequest::post()
        .uri("/api/v1/dashboards/next-position")
        .set_json(json!({ "layout": [], "cols": 0 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let req = test::TestRequest::post()
        .uri("/api/v1/dashboards/validate")
        .set_json(json!({ "config": { "title": "A" } }))
        .to_request();
    let body: ValidateResponse = test::call_and_read_body_json(&app, req).await;
    assert!(!body.valid);
    assert!(body.errors.contains_key("title"));

    let req = test::TestRequest::post()
        .uri("/api/v1/dashboards/time-range")
        .set_json(json!({
            "timeRange": { "mode": "relative", "relativeValue": 1, "relativeUnit": "day" },
            "autoRefresh": { "enabled": true, "intervalValue": 5, "intervalUnit": "minute" },
            "now": "2024-03-31T12:00:00Z"
        }))
        .to_request();
    let body: TimeRangeResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.range.from, Some(Utc.with_ymd_and_hms(2024, 3, 30, 12, 0, 0).unwrap()));
    assert_eq!(body.auto_refresh_ms, Some(300_000));

    let req = test::TestRequest::post()
        .uri("/api/v1/dashboards/time-range")
        .set_json(json!({
            "timeRange": { "mode": "relative", "relativeValue": u32::MAX, "relativeUnit": "month" },
            "now": "2024-03-31T12:00:00Z"
        }))
        .to_request();
    let body: TimeRangeResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.range.from, None);
    assert_eq!(body.range.to, Some(Utc.with_ymd_and_hms(2024, 3, 31, 12, 0, 0).unwrap()));
}

#[actix_web::test]
async fn test_theme_and_color_endpoints() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(memory_state()))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/themes/dark/apply")
        .set_json(json!({
            "title": "Ops",
            "layout": [{ "i": "w1", "widgetId": "w1", "x": 0, "y": 0, "w": 6, "h": 4,
                         "styles": { "backgroundColor": "#ff0000" } }]
        }))
        .to_request();
    let body: JsonValue = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["styles"]["backgroundColor"], json!("#111827"));
    assert_eq!(body["layout"][0]["styles"]["backgroundColor"], json!("#1f2937"));

    let req = test::TestRequest::post()
        .uri("/api/v1/themes/neon/apply")
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::post()
        .uri("/api/v1/colors/contrast")
        .set_json(json!({ "foreground": "#000", "background": "rgb(255, 255, 255)" }))
        .to_request();
    let body: ContrastResponse = test::call_and_read_body_json(&app, req).await;
    assert!((body.ratio - 21.0).abs() < 1e-6);
    assert!(body.aa_normal_text && body.aa_large_text);

    let req = test::TestRequest::post()
        .uri("/api/v1/colors/palette")
        .set_json(json!({ "background": "chartreuse-ish" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn test_format_and_drafts() {
    let format = Arc::new(FormatConfigProvider::default());
    let state = AppState::new(Arc::new(MemoryStorage::new()), format.clone());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::put()
        .uri("/api/v1/format")
        .set_json(json!({ "locale": "de-DE", "currency": "EUR" }))
        .to_request();
    let body: JsonValue = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["currency"], json!("EUR"));
    assert_eq!(format.get().locale, "de-DE");

    let req = test::TestRequest::get().uri("/api/v1/drafts/dashboard-draft").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::put()
        .uri("/api/v1/drafts/dashboard-draft")
        .set_json(json!({ "title": "WIP" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let req = test::TestRequest::get().uri("/api/v1/drafts/dashboard-draft").to_request();
    let body: JsonValue = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({ "title": "WIP" }));

    let req = test::TestRequest::get().uri("/api/v1/drafts").to_request();
    let body: JsonValue = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["drafts"], json!(["dashboard-draft"]));

    let req = test::TestRequest::delete().uri("/api/v1/drafts/dashboard-draft").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

#[actix_web::test]
async fn test_invalid_draft_key() {
    let dir = tempfile::tempdir().unwrap();
    let state = AppState::new(
        Arc::new(FileStorage::new(dir.path()).unwrap()),
        Arc::new(FormatConfigProvider::default()),
    );
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::put()
        .uri("/api/v1/drafts/bad.key")
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_format_update_is_validated() {
    let format = Arc::new(FormatConfigProvider::default());
    let state = AppState::new(Arc::new(MemoryStorage::new()), format.clone());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::put()
        .uri("/api/v1/format")
        .set_json(json!({ "decimals": 42 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(format.get().decimals, 2);
}
