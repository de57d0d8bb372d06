/// HTTP handlers for geo-content-service
///
/// This module contains handlers for:
/// - Content: proximity, get, create, sync, edit and delete for posts/threads/events
/// - Likes: toggle and status per resource
/// - Threads: replies and comments
pub mod content;
pub mod likes;
pub mod threads;

use crate::db::ContentStore;
use crate::error::AppError;
use crate::metrics;
use crate::services::{CommentService, LikeService, ResourceEngine};
use actix_web::{web, HttpResponse};
use std::sync::Arc;

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "service": "geo-content-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Malformed path segments (a non-numeric id) answer with the JSON error body
fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|err, _req| AppError::Validation(format!("invalid path: {}", err)).into())
}

/// Register services built on `store` and every route of the service.
///
/// Used both by the binary and by HTTP tests, so the wiring is identical.
pub fn configure(store: Arc<dyn ContentStore>) -> impl Fn(&mut web::ServiceConfig) + Clone {
    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(web::Data::new(ResourceEngine::new(store.clone())))
            .app_data(web::Data::new(LikeService::new(store.clone())))
            .app_data(web::Data::new(CommentService::new(store.clone())))
            .app_data(path_config())
            .route("/metrics", web::get().to(metrics::serve_metrics))
            .service(
                web::scope("/api/v1")
                    .route("/health", web::get().to(health))
                    .route("/around/{kind}", web::post().to(content::around))
                    .route("/create/{kind}", web::post().to(content::create_content))
                    .route("/update/{kind}/{from}", web::get().to(content::updated_since))
                    .route("/edit/{kind}/{id}", web::put().to(content::edit_content))
                    .route("/delete/{kind}/{id}", web::delete().to(content::delete_content))
                    .route("/comment/{id}", web::delete().to(threads::delete_comment))
                    .service(
                        web::resource("/thread/{id}/replies")
                            .route(web::get().to(threads::get_replies))
                            .route(web::post().to(threads::create_reply)),
                    )
                    .service(
                        web::resource("/thread/{id}/comments")
                            .route(web::get().to(threads::list_comments))
                            .route(web::post().to(threads::create_comment)),
                    )
                    .route("/{kind}/{id}/like", web::post().to(likes::toggle_like))
                    .route("/{kind}/{id}/like/status", web::get().to(likes::like_status))
                    .route("/{kind}/{id}", web::get().to(content::get_content)),
            );
    }
}
