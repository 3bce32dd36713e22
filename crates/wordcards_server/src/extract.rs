//! Request authorization extractor.
//!
//! Wraps the core gate so handlers receive a verified [`Identity`] as a plain
//! argument. Declaring `AuthUser` first in a handler's signature rejects
//! unauthenticated calls before the body is read or any store is touched.

use crate::error::ApiError;
use crate::AppState;
use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, FromRequest, HttpRequest};
use std::future::{ready, Ready};
use wordcards_core::{authorize, CoreError, Identity, UserId};

/// Extractor for authenticated requests.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Identity);

impl AuthUser {
    pub fn id(&self) -> UserId {
        self.0.id
    }
}

impl FromRequest for AuthUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthUser, ApiError> {
    let state = req.app_data::<web::Data<AppState>>().ok_or_else(|| {
        ApiError::Core(CoreError::Internal(
            "application state not configured".to_string(),
        ))
    })?;
    let header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    authorize(header, state.tokens()).map(AuthUser).map_err(|rejection| {
        log::info!(
            "event=request_rejected module=server status={} path={}",
            rejection.status_code(),
            req.path()
        );
        ApiError::from(rejection)
    })
}
