//! Credential use-case service.
//!
//! # Responsibility
//! - Register accounts with unique username/email and hashed credentials.
//! - Authenticate by email/password and issue session tokens.
//! - Verify session tokens statelessly.
//!
//! # Invariants
//! - Plaintext passwords never reach storage or logs.
//! - Unknown email and wrong password produce the same failure.

use crate::auth::password;
use crate::auth::token::{SessionToken, TokenService};
use crate::error::{AuthFailure, CoreError, CoreResult};
use crate::model::ids::UserId;
use crate::model::user::{NewUser, User};
use crate::model::validation::{is_blank, ValidationError};
use crate::repo::user_repo::UserRepository;
use log::{info, warn};
use serde::{Deserialize, Serialize};

const DUPLICATE_USER: &str = "User already exists";

/// Successful login result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub user: User,
    pub token: SessionToken,
}

/// Credential service facade over a user repository and a token service.
pub struct CredentialService<'t, R: UserRepository> {
    repo: R,
    tokens: &'t TokenService,
}

impl<'t, R: UserRepository> CredentialService<'t, R> {
    pub fn new(repo: R, tokens: &'t TokenService) -> Self {
        Self { repo, tokens }
    }

    /// Creates an account. Fails with `Conflict` if username or email is taken.
    pub fn register(&self, new_user: NewUser) -> CoreResult<User> {
        new_user.validate()?;

        if self.repo.exists(&new_user.username, &new_user.email)? {
            info!("event=register module=credential status=conflict");
            return Err(CoreError::Conflict(DUPLICATE_USER.to_string()));
        }

        let password_hash = password::hash(&new_user.password)?;
        let user = self
            .repo
            .create_user(&new_user, &password_hash)
            .map_err(|err| match CoreError::from(err) {
                CoreError::Conflict(_) => CoreError::Conflict(DUPLICATE_USER.to_string()),
                other => other,
            })?;

        info!(
            "event=register module=credential status=ok user_id={}",
            user.id
        );
        Ok(user)
    }

    /// Checks email/password and issues a session token.
    pub fn authenticate(&self, email: &str, password: &str) -> CoreResult<AuthSession> {
        let email = email.trim();
        if is_blank(email) {
            return Err(ValidationError::MissingField("email").into());
        }
        if password.is_empty() {
            return Err(ValidationError::MissingField("password").into());
        }

        let Some(stored) = self.repo.find_credentials(email)? else {
            warn!("event=login module=credential status=rejected reason=unknown_email");
            return Err(CoreError::Authentication(AuthFailure::InvalidCredentials));
        };
        if !password::verify(password, &stored.password_hash) {
            warn!(
                "event=login module=credential status=rejected reason=bad_password user_id={}",
                stored.user.id
            );
            return Err(CoreError::Authentication(AuthFailure::InvalidCredentials));
        }

        let token = self.tokens.issue(stored.user.id)?;
        info!(
            "event=login module=credential status=ok user_id={}",
            stored.user.id
        );
        Ok(AuthSession {
            user: stored.user,
            token,
        })
    }

    /// Verifies a session token and returns the identity it carries.
    pub fn verify(&self, token: &str) -> CoreResult<UserId> {
        self.tokens
            .verify(token)
            .map(|claims| claims.id)
            .map_err(|_| CoreError::Authentication(AuthFailure::InvalidToken))
    }
}
