//! HTTP handlers and route configuration.

mod health;
mod posts;

use actix_web::{HttpRequest, HttpResponse, web};

use crate::middleware::error::{AppError, AppResult};

/// Configure all application routes, capping url-encoded bodies at
/// `max_form_bytes`.
pub fn configure_routes(max_form_bytes: usize) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| routes(cfg, max_form_bytes)
}

fn routes(cfg: &mut web::ServiceConfig, max_form_bytes: usize) {
    cfg.app_data(
        // A malformed id can never name a post.
        web::PathConfig::default()
            .error_handler(|err, _req| AppError::NotFound(err.to_string()).into()),
    )
    .app_data(
        web::FormConfig::default()
            .limit(max_form_bytes)
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .route("/", web::get().to(posts::index))
    .route("/health", web::get().to(health::health_check))
    .service(
        web::scope("/posts")
            .route("/", web::get().to(posts::list))
            // Registered before "/{id}/" so "new" is never parsed as an id.
            .route("/new/", web::get().to(posts::create_form))
            .route("/new/", web::post().to(posts::create))
            .route("/{id}/", web::get().to(posts::detail))
            .route("/{id}/edit/", web::get().to(posts::edit_form))
            .route("/{id}/edit/", web::post().to(posts::update))
            .route("/{id}/delete/", web::get().to(posts::confirm_delete))
            .route("/{id}/delete/", web::post().to(posts::delete)),
    )
    .default_service(web::to(not_found));
}

async fn not_found(req: HttpRequest) -> AppResult<HttpResponse> {
    Err(AppError::NotFound(format!("no route for {}", req.path())))
}
