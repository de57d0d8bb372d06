/// Request identity for geo-content-service
///
/// Authentication happens upstream. The gateway forwards the authenticated
/// user's id in the `X-User-Id` header; handlers that need an owner take a
/// [`UserId`] argument and reject the request with 401 when it is missing.
use crate::error::AppError;
use actix_web::{dev::Payload, FromRequest, HttpRequest};
use std::future::{ready, Ready};
use uuid::Uuid;

pub const USER_ID_HEADER: &str = "X-User-Id";

/// Authenticated user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserId(pub Uuid);

impl FromRequest for UserId {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result = req
            .headers()
            .get(USER_ID_HEADER)
            .ok_or_else(|| AppError::Unauthorized("User ID missing".to_string()))
            .and_then(|value| {
                value
                    .to_str()
                    .ok()
                    .and_then(|raw| Uuid::parse_str(raw.trim()).ok())
                    .map(UserId)
                    .ok_or_else(|| AppError::Unauthorized("User ID malformed".to_string()))
            });
        ready(result)
    }
}
