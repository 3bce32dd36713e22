//! Caller-facing error taxonomy for every core use-case.
//!
//! # Invariants
//! - `Internal` carries diagnostic detail for logs only; callers must render a
//!   generic message.
//! - Denied ownership checks always surface as `Authorization`, whether the
//!   target row was missing or belonged to someone else. Owner-scoped list
//!   queries never produce a denial; they yield `NotFound`.

use crate::auth::password::PasswordError;
use crate::auth::token::TokenError;
use crate::db::DbError;
use crate::model::validation::ValidationError;
use crate::ownership::EntityRef;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type CoreResult<T> = Result<T, CoreError>;

/// Authentication failure flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    /// Unknown email or wrong password (deliberately indistinguishable).
    InvalidCredentials,
    /// Token failed signature/format/expiry checks.
    InvalidToken,
}

#[derive(Debug)]
pub enum CoreError {
    Validation(ValidationError),
    Authentication(AuthFailure),
    Authorization(EntityRef),
    NotFound(EntityRef),
    Conflict(String),
    Internal(String),
}

impl CoreError {
    /// Stable machine-readable kind, used in log events.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Authentication(_) => "authentication",
            Self::Authorization(_) => "authorization",
            Self::NotFound(_) => "not_found",
            Self::Conflict(_) => "conflict",
            Self::Internal(_) => "internal",
        }
    }
}

impl Display for CoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Authentication(AuthFailure::InvalidCredentials) => {
                write!(f, "Invalid credentials")
            }
            Self::Authentication(AuthFailure::InvalidToken) => write!(f, "Invalid token"),
            Self::Authorization(entity) => write!(f, "not authorized for {entity}"),
            Self::NotFound(entity) => write!(f, "{} not found: {entity}", entity.kind()),
            Self::Conflict(details) => write!(f, "{details}"),
            Self::Internal(details) => write!(f, "internal error: {details}"),
        }
    }
}

impl Error for CoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for CoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for CoreError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::NotFound(entity) => Self::NotFound(entity),
            RepoError::Denied { entity, .. } => Self::Authorization(entity),
            RepoError::Conflict(details) => Self::Conflict(details.to_string()),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<DbError> for CoreError {
    fn from(value: DbError) -> Self {
        Self::Internal(value.to_string())
    }
}

impl From<PasswordError> for CoreError {
    fn from(value: PasswordError) -> Self {
        Self::Internal(value.to_string())
    }
}

impl From<TokenError> for CoreError {
    fn from(value: TokenError) -> Self {
        Self::Internal(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{AuthFailure, CoreError};
    use crate::model::ids::{CardId, ListId};
    use crate::ownership::{EntityRef, Ownership};
    use crate::repo::RepoError;

    #[test]
    fn denied_card_collapses_to_authorization_for_both_outcomes() {
        for ownership in [Ownership::NotOwned, Ownership::NotFound] {
            let err = CoreError::from(RepoError::Denied {
                entity: EntityRef::Card(CardId(1)),
                ownership,
            });
            assert!(matches!(err, CoreError::Authorization(EntityRef::Card(_))));
        }
    }

    #[test]
    fn scoped_miss_stays_not_found() {
        let err = CoreError::from(RepoError::NotFound(EntityRef::WordList(ListId(4))));
        assert!(matches!(err, CoreError::NotFound(EntityRef::WordList(ListId(4)))));
        assert_eq!(err.kind(), "not_found");
    }

    #[test]
    fn credential_failures_render_contract_messages() {
        assert_eq!(
            CoreError::Authentication(AuthFailure::InvalidCredentials).to_string(),
            "Invalid credentials"
        );
        assert_eq!(
            CoreError::Authentication(AuthFailure::InvalidToken).to_string(),
            "Invalid token"
        );
    }
}
