/// Thread handlers - replies and comments inside a thread
use crate::error::Result;
use crate::middleware::UserId;
use crate::services::{CommentService, ResourceEngine};
use actix_web::{web, HttpResponse};

/// A thread with its replies, oldest first
pub async fn get_replies(
    engine: web::Data<ResourceEngine>,
    thread_id: web::Path<i64>,
) -> Result<HttpResponse> {
    let thread = engine.thread_with_replies(thread_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(thread))
}

pub async fn create_reply(
    engine: web::Data<ResourceEngine>,
    thread_id: web::Path<i64>,
    user_id: UserId,
    body: web::Bytes,
) -> Result<HttpResponse> {
    let reply = engine
        .create_reply(thread_id.into_inner(), &body, user_id.0)
        .await?;
    Ok(HttpResponse::Created().json(reply))
}

pub async fn list_comments(
    comments: web::Data<CommentService>,
    thread_id: web::Path<i64>,
) -> Result<HttpResponse> {
    let items = comments.list_by_thread(thread_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(items))
}

pub async fn create_comment(
    comments: web::Data<CommentService>,
    thread_id: web::Path<i64>,
    user_id: UserId,
    body: web::Bytes,
) -> Result<HttpResponse> {
    let comment = comments
        .create(thread_id.into_inner(), &body, user_id.0)
        .await?;
    Ok(HttpResponse::Created().json(comment))
}

pub async fn delete_comment(
    comments: web::Data<CommentService>,
    comment_id: web::Path<i64>,
    _user_id: UserId,
) -> Result<HttpResponse> {
    let ack = comments.delete(comment_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ack))
}
