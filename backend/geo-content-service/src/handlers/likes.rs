/// Like handlers - toggle and inspect likes on posts, threads and events
use crate::entity::ResourceKind;
use crate::error::Result;
use crate::middleware::UserId;
use crate::services::LikeService;
use actix_web::{web, HttpResponse};

/// Like the resource, or unlike it if the caller already likes it
pub async fn toggle_like(
    likes: web::Data<LikeService>,
    path: web::Path<(String, i64)>,
    user_id: UserId,
) -> Result<HttpResponse> {
    let (kind, id) = path.into_inner();
    let kind: ResourceKind = kind.parse()?;

    let outcome = likes.toggle(user_id.0, kind, id).await?;
    Ok(HttpResponse::Ok().json(outcome))
}

pub async fn like_status(
    likes: web::Data<LikeService>,
    path: web::Path<(String, i64)>,
    user_id: UserId,
) -> Result<HttpResponse> {
    let (kind, id) = path.into_inner();
    let kind: ResourceKind = kind.parse()?;

    let status = likes.status(user_id.0, kind, id).await?;
    Ok(HttpResponse::Ok().json(status))
}
