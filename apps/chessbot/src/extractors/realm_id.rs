use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};

use crate::domain::RealmId;
use crate::error::AppError;
use crate::errors::ErrorCode;

const MAX_REALM_ID_LEN: usize = 64;

/// Realm id taken from the `{realm_id}` path segment.
///
/// Realms are created lazily, so only the shape of the id is checked here.
#[derive(Debug, Clone)]
pub struct RealmPath(pub RealmId);

impl FromRequest for RealmPath {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(parse(req.match_info().get("realm_id")))
    }
}

fn parse(raw: Option<&str>) -> Result<RealmPath, AppError> {
    let raw = raw.ok_or_else(|| {
        AppError::bad_request(ErrorCode::BadRequest, "Missing realm_id parameter")
    })?;
    let valid = !raw.is_empty()
        && raw.len() <= MAX_REALM_ID_LEN
        && raw
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'));
    if !valid {
        return Err(AppError::bad_request(
            ErrorCode::BadRequest,
            format!("Invalid realm id: {raw}"),
        ));
    }
    Ok(RealmPath(RealmId::new(raw)))
}
