// API routes configuration
// Author: Gabriel Demetrios Lafis

use actix_web::{web, HttpResponse, Responder};

use super::handlers;

/// Configure API routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            // Health check
            .route("/health", web::get().to(health_check))

            // Widgets
            .service(
                web::scope("/widgets")
                    .route("/types", web::get().to(handlers::list_widget_types))
                    .route("/types/{type}/schema", web::get().to(handlers::get_widget_schema))
                    .route("/form-config", web::post().to(handlers::widget_form_config))
                    .route("/chart-config", web::post().to(handlers::widget_chart_config))
                    .route("/source-data", web::post().to(handlers::widget_source_data))
            )

            // Dashboards
            .service(
                web::scope("/dashboards")
                    .route("/next-position", web::post().to(handlers::next_position))
                    .route("/validate", web::post().to(handlers::validate_dashboard))
                    .route("/save-payload", web::post().to(handlers::dashboard_save_payload))
                    .route("/time-range", web::post().to(handlers::resolve_time_range))
            )

            // Themes and colors
            .service(
                web::scope("/themes")
                    .route("", web::get().to(handlers::list_themes))
                    .route("/{id}/apply", web::post().to(handlers::apply_dashboard_theme))
            )
            .service(
                web::scope("/colors")
                    .route("/contrast", web::post().to(handlers::color_contrast))
                    .route("/palette", web::post().to(handlers::color_palette))
            )

            // Preferences
            .route("/format", web::get().to(handlers::get_format))
            .route("/format", web::put().to(handlers::update_format))

            // Drafts
            .service(
                web::scope("/drafts")
                    .route("", web::get().to(handlers::list_drafts))
                    .route("/{key}", web::get().to(handlers::get_draft))
                    .route("/{key}", web::put().to(handlers::put_draft))
                    .route("/{key}", web::delete().to(handlers::delete_draft))
            )
    );
}

/// Health check handler
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
