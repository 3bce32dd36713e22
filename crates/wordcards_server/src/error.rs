//! HTTP error mapping.
//!
//! # Invariants
//! - Every error body is `{"message": string}`.
//! - Internal failures are logged with detail and rendered as `"Server error"`.

use actix_web::error::BlockingError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use log::error;
use serde::Serialize;
use std::fmt::{Display, Formatter};
use wordcards_core::{AuthFailure, CoreError, EntityRef, Rejection};

#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    Core(CoreError),
    Rejected(Rejection),
    /// Request body could not be decoded.
    BadRequest,
    /// Path did not match a resource shape (e.g. non-numeric id).
    NotFound,
}

impl ApiError {
    fn message(&self) -> String {
        match self {
            Self::Core(CoreError::Validation(err)) => err.to_string(),
            Self::Core(CoreError::Authentication(AuthFailure::InvalidCredentials)) => {
                "Invalid credentials".to_string()
            }
            Self::Core(CoreError::Authentication(AuthFailure::InvalidToken)) => {
                Rejection::InvalidToken.message().to_string()
            }
            Self::Core(CoreError::Authorization(_)) => "Unauthorized".to_string(),
            Self::Core(CoreError::NotFound(entity)) => not_found_message(*entity).to_string(),
            Self::Core(CoreError::Conflict(message)) => message.clone(),
            Self::Core(CoreError::Internal(_)) => "Server error".to_string(),
            Self::Rejected(rejection) => rejection.message().to_string(),
            Self::BadRequest => "Invalid request body".to_string(),
            Self::NotFound => "Not found".to_string(),
        }
    }
}

fn not_found_message(entity: EntityRef) -> &'static str {
    match entity {
        EntityRef::User(_) => "User not found",
        EntityRef::WordList(_) => "Word list not found",
        EntityRef::Card(_) => "Card not found",
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Core(err) => write!(f, "{err}"),
            other => write!(f, "{}", other.message()),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Core(CoreError::Validation(_)) | Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::Core(CoreError::Authentication(AuthFailure::InvalidToken)) => {
                StatusCode::FORBIDDEN
            }
            Self::Core(CoreError::Authentication(_)) => StatusCode::UNAUTHORIZED,
            Self::Core(CoreError::Authorization(_)) => StatusCode::FORBIDDEN,
            Self::Core(CoreError::NotFound(_)) | Self::NotFound => StatusCode::NOT_FOUND,
            Self::Core(CoreError::Conflict(_)) => StatusCode::CONFLICT,
            Self::Core(CoreError::Internal(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Rejected(rejection) => StatusCode::from_u16(rejection.status_code())
                .unwrap_or(StatusCode::UNAUTHORIZED),
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let Self::Core(CoreError::Internal(detail)) = self {
            error!("event=request_failed module=server status=error error={detail}");
        }
        HttpResponse::build(self.status_code()).json(MessageBody::new(self.message()))
    }
}

impl From<CoreError> for ApiError {
    fn from(value: CoreError) -> Self {
        Self::Core(value)
    }
}

impl From<Rejection> for ApiError {
    fn from(value: Rejection) -> Self {
        Self::Rejected(value)
    }
}

impl From<BlockingError> for ApiError {
    fn from(value: BlockingError) -> Self {
        Self::Core(CoreError::Internal(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::ApiError;
    use actix_web::http::StatusCode;
    use actix_web::ResponseError;
    use wordcards_core::{
        AuthFailure, CardId, CoreError, EntityRef, ListId, Rejection, ValidationError,
    };

    #[test]
    fn core_errors_map_to_contract_statuses() {
        let cases = [
            (
                ApiError::from(CoreError::Validation(ValidationError::TitleRequired)),
                StatusCode::BAD_REQUEST,
                "Title is required",
            ),
            (
                ApiError::from(CoreError::Authentication(AuthFailure::InvalidCredentials)),
                StatusCode::UNAUTHORIZED,
                "Invalid credentials",
            ),
            (
                ApiError::from(CoreError::Authentication(AuthFailure::InvalidToken)),
                StatusCode::FORBIDDEN,
                "Invalid token",
            ),
            (
                ApiError::from(CoreError::Authorization(EntityRef::Card(CardId(1)))),
                StatusCode::FORBIDDEN,
                "Unauthorized",
            ),
            (
                ApiError::from(CoreError::NotFound(EntityRef::WordList(ListId(1)))),
                StatusCode::NOT_FOUND,
                "Word list not found",
            ),
            (
                ApiError::from(CoreError::Conflict("User already exists".to_string())),
                StatusCode::CONFLICT,
                "User already exists",
            ),
            (
                ApiError::from(CoreError::Internal("disk I/O error".to_string())),
                StatusCode::INTERNAL_SERVER_ERROR,
                "Server error",
            ),
        ];
        for (err, status, message) in cases {
            assert_eq!(err.status_code(), status);
            assert_eq!(err.message(), message);
        }
    }

    #[test]
    fn gate_rejections_keep_their_split() {
        assert_eq!(
            ApiError::from(Rejection::MissingToken).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(Rejection::InvalidToken).status_code(),
            StatusCode::FORBIDDEN
        );
    }
}
