use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use uuid::Uuid;

use crate::errors::AppError;

pub const USER_ID_HEADER: &str = "X-User-Id";

/// The authenticated caller's id, taken from the `X-User-Id` header.
/// Token verification happens upstream of this service; by the time a
/// request arrives here the header is trusted. Missing or malformed
/// values still get a 401 rather than a panic or a garbage id.
#[derive(Debug, Clone, Copy)]
pub struct CallerId(pub Uuid);

impl FromRequest for CallerId {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let caller = req
            .headers()
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| Uuid::parse_str(value).ok())
            .map(CallerId)
            .ok_or(AppError::Unauthorized);
        ready(caller)
    }
}
