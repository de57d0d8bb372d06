/// Content handlers - generic endpoints for posts, threads and events
///
/// The `{kind}` path segment picks the entity type; each handler dispatches
/// to the engine's generic operation for that type.
use crate::entity::{Event, Post, Resource, ResourceKind, Thread};
use crate::error::Result;
use crate::middleware::UserId;
use crate::services::ResourceEngine;
use actix_web::{web, HttpResponse};

macro_rules! dispatch {
    ($kind:expr, $handler:ident($($arg:expr),*)) => {
        match $kind {
            ResourceKind::Post => $handler::<Post>($($arg),*).await,
            ResourceKind::Thread => $handler::<Thread>($($arg),*).await,
            ResourceKind::Event => $handler::<Event>($($arg),*).await,
        }
    };
}

async fn nearby_as<T: Resource>(engine: &ResourceEngine, body: &[u8]) -> Result<HttpResponse> {
    let items = engine.nearby::<T>(Some(body)).await?;
    Ok(HttpResponse::Ok().json(items))
}

async fn get_as<T: Resource>(engine: &ResourceEngine, id: i64) -> Result<HttpResponse> {
    let item = engine.get::<T>(id).await?;
    Ok(HttpResponse::Ok().json(item))
}

async fn create_as<T: Resource>(
    engine: &ResourceEngine,
    body: &[u8],
    user_id: UserId,
) -> Result<HttpResponse> {
    let item = engine.create::<T>(body, user_id.0).await?;
    Ok(HttpResponse::Created().json(item))
}

async fn sync_as<T: Resource>(engine: &ResourceEngine, from: &str) -> Result<HttpResponse> {
    let items = engine.updated_since::<T>(from).await?;
    Ok(HttpResponse::Ok().json(items))
}

async fn edit_as<T: Resource>(
    engine: &ResourceEngine,
    id: i64,
    body: &[u8],
    user_id: UserId,
) -> Result<HttpResponse> {
    let item = engine.edit::<T>(id, body, user_id.0).await?;
    Ok(HttpResponse::Ok().json(item))
}

async fn delete_as<T: Resource>(engine: &ResourceEngine, id: i64) -> Result<HttpResponse> {
    let ack = engine.delete::<T>(id).await?;
    Ok(HttpResponse::Ok().json(ack))
}

/// Content visible around the coordinate in the body (body optional)
pub async fn around(
    engine: web::Data<ResourceEngine>,
    kind: web::Path<String>,
    body: web::Bytes,
) -> Result<HttpResponse> {
    let kind: ResourceKind = kind.parse()?;
    dispatch!(kind, nearby_as(&engine, &body))
}

/// Get one item by id
pub async fn get_content(
    engine: web::Data<ResourceEngine>,
    path: web::Path<(String, i64)>,
) -> Result<HttpResponse> {
    let (kind, id) = path.into_inner();
    let kind: ResourceKind = kind.parse()?;
    dispatch!(kind, get_as(&engine, id))
}

/// Create an item owned by the caller
pub async fn create_content(
    engine: web::Data<ResourceEngine>,
    kind: web::Path<String>,
    user_id: UserId,
    body: web::Bytes,
) -> Result<HttpResponse> {
    let kind: ResourceKind = kind.parse()?;
    dispatch!(kind, create_as(&engine, &body, user_id))
}

/// Items changed after the `from` watermark (Unix seconds)
pub async fn updated_since(
    engine: web::Data<ResourceEngine>,
    path: web::Path<(String, String)>,
    _user_id: UserId,
) -> Result<HttpResponse> {
    let (kind, from) = path.into_inner();
    let kind: ResourceKind = kind.parse()?;
    dispatch!(kind, sync_as(&engine, &from))
}

pub async fn edit_content(
    engine: web::Data<ResourceEngine>,
    path: web::Path<(String, i64)>,
    user_id: UserId,
    body: web::Bytes,
) -> Result<HttpResponse> {
    let (kind, id) = path.into_inner();
    let kind: ResourceKind = kind.parse()?;
    dispatch!(kind, edit_as(&engine, id, &body, user_id))
}

pub async fn delete_content(
    engine: web::Data<ResourceEngine>,
    path: web::Path<(String, i64)>,
    _user_id: UserId,
) -> Result<HttpResponse> {
    let (kind, id) = path.into_inner();
    let kind: ResourceKind = kind.parse()?;
    dispatch!(kind, delete_as(&engine, id))
}
